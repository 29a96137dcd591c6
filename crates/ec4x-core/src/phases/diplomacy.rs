// SPDX-License-Identifier: Apache-2.0
//! The diplomacy phase: queued actions over the pairwise state machine.
//!
//! Combat auto-escalation was already written during the combat phase; this
//! phase only applies the deliberate actions, in actor-house order. All
//! transitions are symmetric.

use crate::event::{DiploCause, EventKind, EventLog, Observers};
use crate::house::DiploState;
use crate::ident::HouseId;
use crate::order::DiplomaticAction;
use crate::state::GameState;

/// Applies queued diplomatic actions.
pub fn run(
    state: &mut GameState,
    actions: &[(HouseId, DiplomaticAction)],
    events: &mut EventLog,
) {
    let mut sorted: Vec<&(HouseId, DiplomaticAction)> = actions.iter().collect();
    sorted.sort_by_key(|(house, _)| *house);
    let turn = state.turn;

    for &(actor, action) in sorted {
        match action {
            DiplomaticAction::Propose { to, state: proposed } => {
                if actor != to && state.houses.contains(to) {
                    state.proposals.insert((actor, to), proposed);
                }
            }
            DiplomaticAction::Accept { from } => {
                if let Some(proposed) = state.proposals.remove(&(from, actor)) {
                    apply_change(state, events, actor, from, proposed, turn);
                }
            }
            DiplomaticAction::Reject { from } => {
                state.proposals.remove(&(from, actor));
            }
            DiplomaticAction::Break { with } => {
                if state.relation(actor, with) == DiploState::Allied {
                    apply_change(state, events, actor, with, DiploState::Neutral, turn);
                }
            }
            DiplomaticAction::Declare { on } => {
                if actor != on && state.houses.contains(on) {
                    apply_change(state, events, actor, on, DiploState::Enemy, turn);
                }
            }
            DiplomaticAction::Normalize { with } => {
                if state.relation(actor, with) == DiploState::Hostile {
                    apply_change(state, events, actor, with, DiploState::Neutral, turn);
                }
            }
        }
    }
}

fn apply_change(
    state: &mut GameState,
    events: &mut EventLog,
    a: HouseId,
    b: HouseId,
    new_state: DiploState,
    turn: u32,
) {
    if state.relation(a, b) == new_state {
        return;
    }
    state.set_relation(a, b, new_state, turn);
    events.push(
        Observers::pair(a, b),
        EventKind::DiplomaticStateChanged {
            a,
            b,
            state: new_state,
            cause: DiploCause::Action,
        },
    );
}

// SPDX-License-Identifier: Apache-2.0
//! The prestige and elimination phase.
//!
//! Houses ending a third consecutive turn with negative prestige are out,
//! as are houses with no colonies and no way to ever take one. Eliminated
//! houses keep their assets on the map as geometry; nothing is deleted.

use crate::event::{EliminationReason, EventKind, EventLog, Observers};
use crate::ident::HouseId;
use crate::state::GameState;

/// Turns of negative prestige that end a house.
const NEGATIVE_PRESTIGE_LIMIT: u32 = 3;

/// Runs the elimination checks.
pub fn run(state: &mut GameState, events: &mut EventLog) {
    let turn = state.turn;
    for house_id in state.house_ids() {
        let Some(house) = state.houses.get(house_id) else {
            continue;
        };
        if house.is_eliminated {
            continue;
        }

        let negative = house.prestige < 0;
        if let Some(house) = state.houses.get_mut(house_id) {
            house.negative_prestige_turns = if negative {
                house.negative_prestige_turns + 1
            } else {
                0
            };
        }

        let prestige_out = state
            .houses
            .get(house_id)
            .is_some_and(|house| house.negative_prestige_turns >= NEGATIVE_PRESTIGE_LIMIT);
        if prestige_out {
            eliminate(state, events, house_id, EliminationReason::Prestige, turn);
            continue;
        }

        let has_colonies = state
            .indexes
            .colonies_by_owner
            .get(&house_id)
            .is_some_and(|colonies| !colonies.is_empty());
        if !has_colonies && !has_invasion_capability(state, house_id) {
            eliminate(state, events, house_id, EliminationReason::NoColonies, turn);
        }
    }
}

/// A house without colonies survives only while it can still take one:
/// marines embarked somewhere, or colonists aboard an expansion squadron.
fn has_invasion_capability(state: &GameState, house: HouseId) -> bool {
    state
        .indexes
        .fleets_by_owner
        .get(&house)
        .is_some_and(|fleets| {
            fleets.iter().any(|&fleet| {
                state.fleets.get(fleet).is_some_and(|record| {
                    record.squadrons.iter().any(|&squadron| {
                        state.squadrons.get(squadron).is_some_and(|sqn| {
                            !sqn.marine_unit_ids.is_empty() || sqn.colonists_ptu > 0
                        })
                    })
                })
            })
        })
}

fn eliminate(
    state: &mut GameState,
    events: &mut EventLog,
    house_id: HouseId,
    reason: EliminationReason,
    turn: u32,
) {
    if let Some(house) = state.houses.get_mut(house_id) {
        house.is_eliminated = true;
        house.eliminated_turn = Some(turn);
    }
    events.push(
        Observers::All,
        EventKind::HouseEliminated {
            house: house_id,
            reason,
        },
    );
}

// SPDX-License-Identifier: Apache-2.0
//! Fleet writes and fleet-level queries.

use crate::config::GameConfig;
use crate::fleet::{CombatState, Fleet, FleetStatus, SquadronHome};
use crate::ident::{FleetId, HouseId, SystemId};
use crate::ops::squadron_ops;
use crate::order::FleetOrder;
use crate::state::{index_insert, index_remove, GameState};

/// Creates an empty Active fleet and registers it in both fleet indexes.
pub fn create_fleet(state: &mut GameState, owner: HouseId, system: SystemId) -> FleetId {
    let id = state.counters.next_fleet();
    state.fleets.add(
        id,
        Fleet {
            id,
            owner,
            system,
            squadrons: Vec::new(),
            status: FleetStatus::Active,
            roe: 5,
            order: None,
            standing_orders: Vec::new(),
        },
    );
    index_insert(&mut state.indexes.fleets_by_system, system, id);
    index_insert(&mut state.indexes.fleets_by_owner, owner, id);
    id
}

/// Moves a fleet to `to`, swapping its system-index entry in the same call.
pub fn move_fleet(state: &mut GameState, fleet: FleetId, to: SystemId) {
    let Some(record) = state.fleets.get_mut(fleet) else {
        tracing::warn!(%fleet, "move for missing fleet ignored");
        return;
    };
    let from = record.system;
    if from == to {
        return;
    }
    record.system = to;
    index_remove(&mut state.indexes.fleets_by_system, from, fleet);
    index_insert(&mut state.indexes.fleets_by_system, to, fleet);
}

/// Removes a fleet, cascading through its squadrons and ships and clearing
/// its orders with it. Idempotent.
pub fn remove_fleet(state: &mut GameState, fleet: FleetId) {
    let Some(record) = state.fleets.remove(fleet) else {
        return;
    };
    for squadron in record.squadrons {
        squadron_ops::remove_squadron(state, squadron);
    }
    index_remove(&mut state.indexes.fleets_by_system, record.system, fleet);
    index_remove(&mut state.indexes.fleets_by_owner, record.owner, fleet);
}

/// Merges every squadron of `source` into `target`, then deletes the empty
/// source fleet. Caller has validated ownership and co-location.
pub fn merge_fleets(state: &mut GameState, source: FleetId, target: FleetId) {
    let squadrons = match state.fleets.get(source) {
        Some(fleet) => fleet.squadrons.clone(),
        None => {
            tracing::warn!(%source, "merge source missing");
            return;
        }
    };
    for squadron in &squadrons {
        if let Some(record) = state.squadrons.get_mut(*squadron) {
            record.home = SquadronHome::Fleet(target);
        }
    }
    if let Some(target_record) = state.fleets.get_mut(target) {
        target_record.squadrons.extend(squadrons);
    }
    // The source's squadrons were re-homed above; drop the shell directly so
    // the cascade in `remove_fleet` cannot touch them.
    if let Some(record) = state.fleets.remove(source) {
        index_remove(&mut state.indexes.fleets_by_system, record.system, source);
        index_remove(&mut state.indexes.fleets_by_owner, record.owner, source);
    }
}

/// Sets a fleet's one-shot order.
pub fn set_order(state: &mut GameState, fleet: FleetId, order: Option<FleetOrder>) {
    if let Some(record) = state.fleets.get_mut(fleet) {
        record.order = order;
    }
}

/// Total command cost of the fleet's surviving ships.
pub fn command_cost(state: &GameState, config: &GameConfig, fleet: FleetId) -> u32 {
    let Some(record) = state.fleets.get(fleet) else {
        return 0;
    };
    let mut total = 0;
    for &squadron in &record.squadrons {
        let Some(sqn) = state.squadrons.get(squadron) else {
            continue;
        };
        for ship_id in sqn.ship_ids() {
            let Some(ship) = state.ships.get(ship_id) else {
                continue;
            };
            if ship.state == CombatState::Destroyed {
                continue;
            }
            if let Some(spec) = config.ship_spec(&ship.class) {
                total += spec.command_cost;
            }
        }
    }
    total
}

/// Whether any squadron of the fleet contains a crippled ship.
pub fn has_crippled_squadron(state: &GameState, fleet: FleetId) -> bool {
    let Some(record) = state.fleets.get(fleet) else {
        return false;
    };
    record.squadrons.iter().any(|&squadron| {
        state.squadrons.get(squadron).is_some_and(|sqn| {
            sqn.ship_ids().iter().any(|&ship| {
                state
                    .ships
                    .get(ship)
                    .is_some_and(|s| s.state == CombatState::Crippled)
            })
        })
    })
}

/// Whether the fleet carries any Expansion or Auxiliary squadron.
pub fn has_spacelift(state: &GameState, fleet: FleetId) -> bool {
    let Some(record) = state.fleets.get(fleet) else {
        return false;
    };
    record.squadrons.iter().any(|&squadron| {
        state
            .squadrons
            .get(squadron)
            .is_some_and(crate::fleet::Squadron::is_spacelift)
    })
}

/// Current attack strength across all squadrons: crippled ships fight at
/// half strength, destroyed ships not at all.
pub fn operational_attack(state: &GameState, config: &GameConfig, fleet: FleetId) -> f64 {
    let Some(record) = state.fleets.get(fleet) else {
        return 0.0;
    };
    let mut total = 0.0;
    for &squadron in &record.squadrons {
        let Some(sqn) = state.squadrons.get(squadron) else {
            continue;
        };
        for ship_id in sqn.ship_ids() {
            let Some(ship) = state.ships.get(ship_id) else {
                continue;
            };
            let Some(spec) = config.ship_spec(&ship.class) else {
                continue;
            };
            total += match ship.state {
                CombatState::Undamaged => f64::from(spec.attack),
                CombatState::Crippled => f64::from(spec.attack) * 0.5,
                CombatState::Destroyed => 0.0,
            };
        }
    }
    total
}

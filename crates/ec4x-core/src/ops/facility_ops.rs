// SPDX-License-Identifier: Apache-2.0
//! Facility and ground-unit writes.

use std::collections::VecDeque;

use ec4x_rules_schema::GroundClass;

use crate::facility::{Kastra, Neoria, NeoriaClass};
use crate::fleet::CombatState;
use crate::ground::{GroundLocation, GroundUnit};
use crate::ident::{ColonyId, GroundUnitId, KastraId, NeoriaId};
use crate::ops::project_ops;
use crate::state::GameState;

/// Erects a neoria at a colony.
pub fn create_neoria(state: &mut GameState, colony: ColonyId, class: NeoriaClass) -> NeoriaId {
    let id = state.counters.next_neoria();
    state.neorias.add(
        id,
        Neoria {
            id,
            colony,
            class,
            state: CombatState::Undamaged,
            damage: 0,
            active: Vec::new(),
            queue: VecDeque::new(),
        },
    );
    if let Some(record) = state.colonies.get_mut(colony) {
        record.neoria_ids.push(id);
    }
    id
}

/// Erects a starbase over a colony.
pub fn create_kastra(state: &mut GameState, colony: ColonyId) -> KastraId {
    let id = state.counters.next_kastra();
    state.kastras.add(
        id,
        Kastra {
            id,
            colony,
            state: CombatState::Undamaged,
            damage: 0,
        },
    );
    if let Some(record) = state.colonies.get_mut(colony) {
        record.kastra_ids.push(id);
    }
    id
}

/// Raises a ground unit at a colony.
pub fn create_ground_unit(
    state: &mut GameState,
    colony: ColonyId,
    class: GroundClass,
) -> GroundUnitId {
    let id = state.counters.next_ground_unit();
    state.ground_units.add(
        id,
        GroundUnit {
            id,
            location: GroundLocation::Colony(colony),
            class,
            state: CombatState::Undamaged,
            damage: 0,
        },
    );
    if let Some(record) = state.colonies.get_mut(colony) {
        record.ground_unit_ids.push(id);
    }
    id
}

/// Destroys a neoria, cancelling every active and queued project it owned.
///
/// Returns the number of projects lost (for the `ColonyProjectsLost` event).
/// Cancelled work is forfeited — no refunds. Idempotent.
pub fn destroy_neoria(state: &mut GameState, neoria: NeoriaId) -> u32 {
    let Some(record) = state.neorias.remove(neoria) else {
        return 0;
    };
    let mut lost = 0;
    for project in record.active.iter().chain(record.queue.iter()) {
        project_ops::discard_project(state, *project);
        lost += 1;
    }
    if let Some(colony) = state.colonies.get_mut(record.colony) {
        colony.neoria_ids.retain(|&id| id != neoria);
    }
    lost
}

/// Destroys a starbase. Idempotent.
pub fn destroy_kastra(state: &mut GameState, kastra: KastraId) {
    let Some(record) = state.kastras.remove(kastra) else {
        return;
    };
    if let Some(colony) = state.colonies.get_mut(record.colony) {
        colony.kastra_ids.retain(|&id| id != kastra);
    }
}

/// Destroys a ground unit wherever it is. Idempotent.
pub fn destroy_ground_unit(state: &mut GameState, unit: GroundUnitId) {
    let Some(record) = state.ground_units.remove(unit) else {
        return;
    };
    match record.location {
        GroundLocation::Colony(colony) => {
            if let Some(record) = state.colonies.get_mut(colony) {
                record.ground_unit_ids.retain(|&id| id != unit);
            }
        }
        GroundLocation::Embarked(squadron) => {
            if let Some(record) = state.squadrons.get_mut(squadron) {
                record.marine_unit_ids.retain(|&id| id != unit);
            }
        }
    }
}

// SPDX-License-Identifier: Apache-2.0
//! Colony writes.

use std::collections::VecDeque;

use ec4x_rules_schema::EconomyRules;

use crate::colony::{Colony, SOULS_PER_PTU, SOULS_PER_PU};
use crate::ident::{ColonyId, HouseId, SystemId};
use crate::state::{index_insert, index_remove, GameState};

/// Founds a colony in an uncolonized system.
///
/// A landing of any size establishes at least one population unit — a colony
/// below that is not viable. Returns `None` when the system is missing or
/// already colonized.
pub fn found_colony(
    state: &mut GameState,
    economy: &EconomyRules,
    system: SystemId,
    owner: HouseId,
    ptu: u32,
) -> Option<ColonyId> {
    let record = state.systems.get(system)?;
    if record.colony.is_some() {
        return None;
    }
    let planet_class = record.planet_class;
    let resource_rating = record.resource_rating;
    let id = state.counters.next_colony();
    let souls = (u64::from(ptu) * SOULS_PER_PTU).max(SOULS_PER_PU);
    state.colonies.add(
        id,
        Colony {
            id,
            system,
            owner,
            souls,
            infrastructure: 0,
            industrial_units: 0,
            planet_class,
            resource_rating,
            tax_percent: economy.default_tax_percent,
            shield_level: 0,
            is_homeworld: false,
            kastra_ids: Vec::new(),
            neoria_ids: Vec::new(),
            ground_unit_ids: Vec::new(),
            fighter_squadron_ids: Vec::new(),
            build_queue: VecDeque::new(),
            active_project: None,
            repair_queue: VecDeque::new(),
            blockaded: false,
            blockaded_by: Vec::new(),
            blockade_turns: 0,
            violations: Vec::new(),
            auto_repair: false,
            auto_load_marines: false,
            auto_load_fighters: false,
        },
    );
    if let Some(system_record) = state.systems.get_mut(system) {
        system_record.colony = Some(id);
    }
    index_insert(&mut state.indexes.colonies_by_owner, owner, id);
    state.indexes.colonies_by_system.insert(system, id);
    Some(id)
}

/// Hands a colony to a new owner (conquest), moving the ownership index in
/// the same call. Facilities, garrison, and queues stay with the ground.
pub fn transfer_colony(state: &mut GameState, colony: ColonyId, to: HouseId) {
    let Some(record) = state.colonies.get_mut(colony) else {
        tracing::warn!(%colony, "transfer of missing colony ignored");
        return;
    };
    let from = record.owner;
    if from == to {
        return;
    }
    record.owner = to;
    record.is_homeworld = false;
    record.blockaded = false;
    record.blockaded_by.clear();
    record.blockade_turns = 0;
    index_remove(&mut state.indexes.colonies_by_owner, from, colony);
    index_insert(&mut state.indexes.colonies_by_owner, to, colony);
}

/// Kills population, whole PTUs at a time, never below zero.
pub fn kill_population(colony: &mut Colony, souls: u64) {
    let whole_ptu = souls / SOULS_PER_PTU * SOULS_PER_PTU;
    colony.souls = colony.souls.saturating_sub(whole_ptu);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ec4x_rules_schema::{PlanetClass, ResourceRating};

    #[test]
    fn kill_population_rounds_to_whole_ptu() {
        let mut colony = Colony {
            id: ColonyId(0),
            system: SystemId(0),
            owner: HouseId(0),
            souls: SOULS_PER_PU,
            infrastructure: 0,
            industrial_units: 0,
            planet_class: PlanetClass::Habitable,
            resource_rating: ResourceRating::Normal,
            tax_percent: 50,
            shield_level: 0,
            is_homeworld: false,
            kastra_ids: Vec::new(),
            neoria_ids: Vec::new(),
            ground_unit_ids: Vec::new(),
            fighter_squadron_ids: Vec::new(),
            build_queue: VecDeque::new(),
            active_project: None,
            repair_queue: VecDeque::new(),
            blockaded: false,
            blockaded_by: Vec::new(),
            blockade_turns: 0,
            violations: Vec::new(),
            auto_repair: false,
            auto_load_marines: false,
            auto_load_fighters: false,
        };
        kill_population(&mut colony, 3 * SOULS_PER_PTU + 10_000);
        assert_eq!(colony.souls, SOULS_PER_PU - 3 * SOULS_PER_PTU);
    }
}

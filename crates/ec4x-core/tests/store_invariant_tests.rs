// SPDX-License-Identifier: Apache-2.0
//! Cross-table invariants that must hold after every turn.
#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use ec4x_core::ops::fleet_ops;
use ec4x_core::{advance_turn, new_game, GameState, ProjectId, SOULS_PER_PTU};

fn assert_world_consistent(state: &GameState) {
    let config = common::config();

    // Facility back-references.
    for (colony_id, colony) in state.colonies.iter() {
        for &neoria in &colony.neoria_ids {
            let record = state.neorias.get(neoria).unwrap();
            assert_eq!(record.colony, colony_id, "{neoria} back-reference");
        }
        for &kastra in &colony.kastra_ids {
            assert_eq!(state.kastras.get(kastra).unwrap().colony, colony_id);
        }
        assert_eq!(
            state.indexes.colonies_by_system.get(&colony.system),
            Some(&colony_id)
        );
        // Whole-PTU population.
        assert_eq!(colony.souls % SOULS_PER_PTU, 0);
    }

    // Projects and their facility bindings.
    for (neoria_id, neoria) in state.neorias.iter() {
        for pid in neoria.active.iter().chain(neoria.queue.iter()) {
            match pid {
                ProjectId::Construction(id) => {
                    let project = state.construction_projects.get(*id).unwrap();
                    assert_eq!(project.facility, Some(neoria_id));
                }
                ProjectId::Repair(id) => {
                    let project = state.repair_projects.get(*id).unwrap();
                    assert_eq!(project.facility, Some(neoria_id));
                }
            }
            assert!(state
                .indexes
                .projects_by_facility
                .get(&neoria_id)
                .unwrap()
                .contains(pid));
        }
    }

    // Ship ↔ squadron ↔ index agreement.
    for (ship_id, ship) in state.ships.iter() {
        let squadron = state.squadrons.get(ship.squadron).unwrap();
        assert!(squadron.ship_ids().contains(&ship_id));
        assert!(state
            .indexes
            .ships_by_squadron
            .get(&ship.squadron)
            .unwrap()
            .contains(&ship_id));
    }

    // Fleet indexes are exact.
    for (fleet_id, fleet) in state.fleets.iter() {
        assert!(state.indexes.fleets_by_system[&fleet.system].contains(&fleet_id));
        assert!(state.indexes.fleets_by_owner[&fleet.owner].contains(&fleet_id));
    }
    for (system, fleets) in &state.indexes.fleets_by_system {
        for fleet in fleets {
            assert_eq!(state.fleets.get(*fleet).unwrap().system, *system);
        }
    }

    // Map: every lane is mirrored, no phantom directed edges.
    let directed: usize = state.map.adjacency.values().map(Vec::len).sum();
    assert_eq!(directed, state.map.lanes.len() * 2);
    for lane in &state.map.lanes {
        assert_eq!(state.map.lane_between(lane.a, lane.b), Some(lane.class));
        assert_eq!(state.map.lane_between(lane.b, lane.a), Some(lane.class));
    }

    // Command capacity: within pool, or a violation with grace remaining.
    for house_id in state.house_ids() {
        let house = state.houses.get(house_id).unwrap();
        let usage: u32 = state
            .indexes
            .fleets_by_owner
            .get(&house_id)
            .map_or(&[][..], Vec::as_slice)
            .iter()
            .filter(|&&fleet| {
                state
                    .fleets
                    .get(fleet)
                    .is_some_and(|record| record.status == ec4x_core::FleetStatus::Active)
            })
            .map(|&fleet| fleet_ops::command_cost(state, &config, fleet))
            .sum();
        let pool = house.c2_pool(&config.sections.limits);
        let has_grace = house
            .violations
            .iter()
            .any(|violation| violation.grace_turns_remaining > 0);
        assert!(usage <= pool || has_grace, "house {house_id} over C2 pool");
    }
}

#[test]
fn invariants_hold_through_several_turns() {
    let config = common::config();
    let mut state = new_game(&config, 3, 21).unwrap();
    assert_world_consistent(&state);
    for _ in 0..4 {
        advance_turn(&mut state, &config, &[]);
        assert_world_consistent(&state);
    }
}

#[test]
fn fleet_removal_cascades_without_orphans() {
    let config = common::config();
    let mut state = common::line_state(2);
    let house = common::add_house(&mut state, "House Test");
    let hub = state.map.hub;
    let fleet = common::add_fleet(&mut state, &config, house, hub, &["Cruiser", "Corvette"]);
    let squadrons = state.fleets.get(fleet).unwrap().squadrons.clone();
    assert_eq!(state.ships.len(), 2);

    fleet_ops::remove_fleet(&mut state, fleet);
    assert!(state.fleets.get(fleet).is_none());
    assert!(state.ships.is_empty());
    for squadron in squadrons {
        assert!(state.squadrons.get(squadron).is_none());
        assert!(!state.indexes.ships_by_squadron.contains_key(&squadron));
    }
    assert!(state.indexes.fleets_by_owner.get(&house).is_none());
    // Removing again is harmless.
    fleet_ops::remove_fleet(&mut state, fleet);
}

// SPDX-License-Identifier: Apache-2.0
//! Dock queues, cost debiting, the commissioning split, and cancellation on
//! facility loss.
#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use ec4x_core::ops::{facility_ops, project_ops};
use ec4x_core::{
    advance_turn, BuildWork, EventKind, NeoriaClass, ProjectId, SystemId,
};

#[test]
fn corvette_built_in_one_turn_commissions_next_turn() {
    let config = common::config();
    let mut state = common::line_state(2);
    let house = common::add_house(&mut state, "House Alba");
    let colony = common::add_colony(&mut state, &config, SystemId(0), house, 10);
    let shipyard = facility_ops::create_neoria(&mut state, colony, NeoriaClass::Shipyard);

    let before = state.houses.get(house).unwrap().treasury;
    project_ops::submit_construction(
        &mut state,
        &config,
        colony,
        BuildWork::Ship {
            class: "Corvette".to_owned(),
        },
        Some(shipyard),
    )
    .unwrap();
    // Full cost debited at submission.
    let cost = i64::from(config.ship_spec("Corvette").unwrap().cost);
    assert_eq!(state.houses.get(house).unwrap().treasury, before - cost);

    // Turn 1: the one-turn hull finishes in the cycle it starts, but waits
    // out the turn's combat as a pending commission.
    advance_turn(&mut state, &config, &[]);
    assert_eq!(state.pending_commissions.len(), 1);
    assert!(state.ships.is_empty());

    // Turn 2: commissioned at the command step.
    let outcome = advance_turn(&mut state, &config, &[]);
    assert!(state.pending_commissions.is_empty());
    assert_eq!(state.ships.len(), 1);
    let fleet = state.fleets_in_system(SystemId(0));
    assert_eq!(fleet.len(), 1);
    assert!(outcome.events.iter().any(|event| matches!(
        &event.kind,
        EventKind::ShipCommissioned { class, .. } if class == "Corvette"
    )));
}

#[test]
fn spaceport_charges_double_for_ships() {
    let config = common::config();
    let mut state = common::line_state(2);
    let house = common::add_house(&mut state, "House Alba");
    let colony = common::add_colony(&mut state, &config, SystemId(0), house, 10);
    let spaceport = facility_ops::create_neoria(&mut state, colony, NeoriaClass::Spaceport);

    let before = state.houses.get(house).unwrap().treasury;
    project_ops::submit_construction(
        &mut state,
        &config,
        colony,
        BuildWork::Ship {
            class: "Corvette".to_owned(),
        },
        Some(spaceport),
    )
    .unwrap();
    let cost = i64::from(config.ship_spec("Corvette").unwrap().cost) * 2;
    assert_eq!(state.houses.get(house).unwrap().treasury, before - cost);
}

#[test]
fn insufficient_funds_reject_without_state_change() {
    let config = common::config();
    let mut state = common::line_state(2);
    let house = common::add_house(&mut state, "House Alba");
    let colony = common::add_colony(&mut state, &config, SystemId(0), house, 10);
    let shipyard = facility_ops::create_neoria(&mut state, colony, NeoriaClass::Shipyard);
    common::edit_house(&mut state, house, |record| record.treasury = 1);

    let result = project_ops::submit_construction(
        &mut state,
        &config,
        colony,
        BuildWork::Ship {
            class: "Battleship".to_owned(),
        },
        Some(shipyard),
    );
    assert!(matches!(
        result,
        Err(project_ops::BuildRejection::InsufficientFunds { .. })
    ));
    assert_eq!(state.houses.get(house).unwrap().treasury, 1);
    assert!(state.construction_projects.is_empty());
    assert!(state.neorias.get(shipyard).unwrap().queue.is_empty());
}

#[test]
fn destroying_a_facility_cancels_its_projects_without_refund() {
    let config = common::config();
    let mut state = common::line_state(2);
    let house = common::add_house(&mut state, "House Alba");
    let colony = common::add_colony(&mut state, &config, SystemId(0), house, 10);
    let shipyard = facility_ops::create_neoria(&mut state, colony, NeoriaClass::Shipyard);

    let project = project_ops::submit_construction(
        &mut state,
        &config,
        colony,
        BuildWork::Ship {
            class: "Cruiser".to_owned(),
        },
        Some(shipyard),
    )
    .unwrap();
    let after_submit = state.houses.get(house).unwrap().treasury;

    let lost = facility_ops::destroy_neoria(&mut state, shipyard);
    assert_eq!(lost, 1);
    assert!(state.construction_projects.get(project).is_none());
    assert!(!state.indexes.projects_by_facility.contains_key(&shipyard));
    assert!(state
        .indexes
        .projects_by_colony
        .get(&colony)
        .is_none_or(|projects| !projects.contains(&ProjectId::Construction(project))));
    // No refund.
    assert_eq!(state.houses.get(house).unwrap().treasury, after_submit);
    // The colony no longer lists the dead yard.
    assert!(!state
        .colonies
        .get(colony)
        .unwrap()
        .neoria_ids
        .contains(&shipyard));
}

#[test]
fn colony_level_queue_advances_one_project_per_turn() {
    let config = common::config();
    let mut state = common::line_state(2);
    let house = common::add_house(&mut state, "House Alba");
    let colony = common::add_colony(&mut state, &config, SystemId(0), house, 10);

    // Two one-turn investments; only one may finish per turn.
    for _ in 0..2 {
        project_ops::submit_construction(
            &mut state,
            &config,
            colony,
            BuildWork::IndustrialUnits { count: 2 },
            None,
        )
        .unwrap();
    }
    assert_eq!(state.colonies.get(colony).unwrap().industrial_units, 0);
    advance_turn(&mut state, &config, &[]);
    assert_eq!(state.colonies.get(colony).unwrap().industrial_units, 2);
    advance_turn(&mut state, &config, &[]);
    assert_eq!(state.colonies.get(colony).unwrap().industrial_units, 4);
}

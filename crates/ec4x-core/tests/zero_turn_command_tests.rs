// SPDX-License-Identifier: Apache-2.0
//! Zero-turn command validation layers: ownership, location, composition.
#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use ec4x_core::cmd::{
    execute_cargo_command, execute_fleet_command, CargoCommand, CommandError, CommandWarning,
    FleetCommand,
};
use ec4x_core::ops::facility_ops;
use ec4x_core::{SystemId, SOULS_PER_PU};
use ec4x_rules_schema::GroundClass;

#[test]
fn detach_needs_a_friendly_colony() {
    let config = common::config();
    let mut state = common::line_state(2);
    let house = common::add_house(&mut state, "House Alba");
    // No colony anywhere; the fleet floats in deep space.
    let fleet = common::add_fleet(
        &mut state,
        &config,
        house,
        SystemId(1),
        &["Cruiser", "Corvette"],
    );
    let squadron = state.fleets.get(fleet).unwrap().squadrons[0];

    let outcome = execute_fleet_command(
        &mut state,
        &config,
        house,
        &FleetCommand::Detach {
            fleet,
            squadrons: vec![squadron],
        },
    );
    assert!(!outcome.success);
    assert_eq!(outcome.error, Some(CommandError::NotAtFriendlyColony));
}

#[test]
fn spacelift_cannot_detach_alone() {
    let config = common::config();
    let mut state = common::line_state(2);
    let house = common::add_house(&mut state, "House Alba");
    common::add_colony(&mut state, &config, SystemId(0), house, 10);
    let fleet = common::add_fleet(&mut state, &config, house, SystemId(0), &["Cruiser"]);
    let train = ec4x_core::ops::squadron_ops::create_squadron(
        &mut state,
        &config,
        ec4x_core::SquadronHome::Fleet(fleet),
        &["Etac"],
    )
    .unwrap()
    .0;

    let outcome = execute_fleet_command(
        &mut state,
        &config,
        house,
        &FleetCommand::Detach {
            fleet,
            squadrons: vec![train],
        },
    );
    assert!(!outcome.success);
    assert_eq!(outcome.error, Some(CommandError::SpaceliftNeedsEscort));
    // Nothing moved.
    assert_eq!(state.fleets.get(fleet).unwrap().squadrons.len(), 2);
}

#[test]
fn detach_with_escort_creates_a_new_fleet() {
    let config = common::config();
    let mut state = common::line_state(2);
    let house = common::add_house(&mut state, "House Alba");
    common::add_colony(&mut state, &config, SystemId(0), house, 10);
    let fleet = common::add_fleet(&mut state, &config, house, SystemId(0), &["Cruiser"]);
    let escort = ec4x_core::ops::squadron_ops::create_squadron(
        &mut state,
        &config,
        ec4x_core::SquadronHome::Fleet(fleet),
        &["Corvette"],
    )
    .unwrap()
    .0;
    let train = ec4x_core::ops::squadron_ops::create_squadron(
        &mut state,
        &config,
        ec4x_core::SquadronHome::Fleet(fleet),
        &["Etac"],
    )
    .unwrap()
    .0;

    let outcome = execute_fleet_command(
        &mut state,
        &config,
        house,
        &FleetCommand::Detach {
            fleet,
            squadrons: vec![escort, train],
        },
    );
    assert!(outcome.success);
    let new_fleet = outcome.new_fleet.unwrap();
    assert_eq!(
        state.fleets.get(new_fleet).unwrap().squadrons,
        vec![escort, train]
    );
    assert_eq!(state.fleets.get(fleet).unwrap().squadrons.len(), 1);
    // Indexes moved with the squadrons.
    assert!(state.fleets_in_system(SystemId(0)).contains(&new_fleet));
}

#[test]
fn merge_rejects_mixed_intel_formations() {
    let config = common::config();
    let mut state = common::line_state(2);
    let house = common::add_house(&mut state, "House Alba");
    common::add_colony(&mut state, &config, SystemId(0), house, 10);
    let warfleet = common::add_fleet(&mut state, &config, house, SystemId(0), &["Cruiser"]);
    let spies = common::add_fleet(&mut state, &config, house, SystemId(0), &["Scout"]);

    let outcome = execute_fleet_command(
        &mut state,
        &config,
        house,
        &FleetCommand::Merge {
            source: spies,
            target: warfleet,
        },
    );
    assert!(!outcome.success);
    assert_eq!(outcome.error, Some(CommandError::CompositionViolation));
    assert!(state.fleets.get(spies).is_some());
}

#[test]
fn merge_source_must_differ_from_target() {
    let config = common::config();
    let mut state = common::line_state(2);
    let house = common::add_house(&mut state, "House Alba");
    common::add_colony(&mut state, &config, SystemId(0), house, 10);
    let fleet = common::add_fleet(&mut state, &config, house, SystemId(0), &["Cruiser"]);

    let outcome = execute_fleet_command(
        &mut state,
        &config,
        house,
        &FleetCommand::Merge {
            source: fleet,
            target: fleet,
        },
    );
    assert_eq!(outcome.error, Some(CommandError::SourceEqualsTarget));
}

#[test]
fn marine_loading_respects_capacity_and_location() {
    let config = common::config();
    let mut state = common::line_state(2);
    let house = common::add_house(&mut state, "House Alba");
    let colony = common::add_colony(&mut state, &config, SystemId(0), house, 10);
    for _ in 0..6 {
        facility_ops::create_ground_unit(&mut state, colony, GroundClass::Marine);
    }
    let fleet = common::add_fleet(&mut state, &config, house, SystemId(0), &["Transport"]);
    let squadron = state.fleets.get(fleet).unwrap().squadrons[0];
    let marines = state.colonies.get(colony).unwrap().ground_unit_ids.clone();

    // One transport carries four: six is too many.
    let outcome = execute_cargo_command(
        &mut state,
        &config,
        house,
        &CargoCommand::LoadMarines {
            squadron,
            units: marines.clone(),
        },
    );
    assert!(!outcome.success);
    assert_eq!(outcome.error, Some(CommandError::CargoCapacityExceeded));

    let outcome = execute_cargo_command(
        &mut state,
        &config,
        house,
        &CargoCommand::LoadMarines {
            squadron,
            units: marines[..4].to_vec(),
        },
    );
    assert!(outcome.success);
    assert_eq!(
        state.squadrons.get(squadron).unwrap().marine_unit_ids.len(),
        4
    );
    assert_eq!(
        state.colonies.get(colony).unwrap().ground_unit_ids.len(),
        2
    );
}

#[test]
fn colonist_loading_stops_at_the_population_floor() {
    let config = common::config();
    let mut state = common::line_state(2);
    let house = common::add_house(&mut state, "House Alba");
    let colony = common::add_colony(&mut state, &config, SystemId(0), house, 1);
    assert_eq!(state.colonies.get(colony).unwrap().souls, SOULS_PER_PU);
    let fleet = common::add_fleet(&mut state, &config, house, SystemId(0), &["Etac"]);
    let squadron = state.fleets.get(fleet).unwrap().squadrons[0];

    // The colony sits exactly at the floor: zero PTUs load, with a warning.
    let outcome = execute_cargo_command(
        &mut state,
        &config,
        house,
        &CargoCommand::LoadColonists { squadron, ptu: 5 },
    );
    assert!(outcome.success);
    assert!(outcome.warnings.iter().any(|warning| matches!(
        warning,
        CommandWarning::PopulationFloor { requested: 5, loaded: 0 }
    )));
    assert_eq!(state.squadrons.get(squadron).unwrap().colonists_ptu, 0);
    assert_eq!(state.colonies.get(colony).unwrap().souls, SOULS_PER_PU);
}

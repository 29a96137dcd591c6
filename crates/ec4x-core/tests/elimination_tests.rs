// SPDX-License-Identifier: Apache-2.0
//! Elimination rules: prestige collapse and landless houses.
#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use ec4x_core::{advance_turn, EliminationReason, EventKind, SystemId};

#[test]
fn three_negative_prestige_turns_eliminate_a_house() {
    let config = common::config();
    let mut state = common::line_state(2);
    let alba = common::add_house(&mut state, "House Alba");
    let boreas = common::add_house(&mut state, "House Boreas");
    common::add_colony(&mut state, &config, SystemId(0), alba, 10);
    let colony = common::add_colony(&mut state, &config, SystemId(1), boreas, 10);
    common::edit_house(&mut state, boreas, |record| record.prestige = -5);

    advance_turn(&mut state, &config, &[]);
    advance_turn(&mut state, &config, &[]);
    assert!(!state.houses.get(boreas).unwrap().is_eliminated);

    let outcome = advance_turn(&mut state, &config, &[]);
    let fallen = state.houses.get(boreas).unwrap();
    assert!(fallen.is_eliminated);
    assert_eq!(fallen.eliminated_turn, Some(3));
    assert!(outcome.events.iter().any(|event| matches!(
        event.kind,
        EventKind::HouseEliminated { house, reason: EliminationReason::Prestige }
            if house == boreas
    )));

    // Assets persist as map geometry.
    assert!(state.colonies.get(colony).is_some());
    assert_eq!(state.colonies.get(colony).unwrap().owner, boreas);
}

#[test]
fn recovering_prestige_resets_the_countdown() {
    let config = common::config();
    let mut state = common::line_state(2);
    let alba = common::add_house(&mut state, "House Alba");
    common::add_colony(&mut state, &config, SystemId(0), alba, 10);
    common::edit_house(&mut state, alba, |record| record.prestige = -1);

    advance_turn(&mut state, &config, &[]);
    advance_turn(&mut state, &config, &[]);
    // Fortune turns before the third strike.
    common::edit_house(&mut state, alba, |record| record.prestige = 10);
    advance_turn(&mut state, &config, &[]);
    let house = state.houses.get(alba).unwrap();
    assert!(!house.is_eliminated);
    assert_eq!(house.negative_prestige_turns, 0);
}

#[test]
fn landless_house_without_lift_capability_is_out() {
    let config = common::config();
    let mut state = common::line_state(2);
    let alba = common::add_house(&mut state, "House Alba");
    let boreas = common::add_house(&mut state, "House Boreas");
    common::add_colony(&mut state, &config, SystemId(0), alba, 10);
    // Boreas has only a warship: no colonies, no colonists, no marines.
    common::add_fleet(&mut state, &config, boreas, SystemId(1), &["Cruiser"]);

    advance_turn(&mut state, &config, &[]);
    let fallen = state.houses.get(boreas).unwrap();
    assert!(fallen.is_eliminated);
    assert_eq!(fallen.eliminated_turn, Some(1));
    // The hull stays on the map.
    assert_eq!(state.fleets_in_system(SystemId(1)).len(), 1);
}

#[test]
fn landless_house_with_colonists_aboard_survives() {
    let config = common::config();
    let mut state = common::line_state(2);
    let alba = common::add_house(&mut state, "House Alba");
    let boreas = common::add_house(&mut state, "House Boreas");
    common::add_colony(&mut state, &config, SystemId(0), alba, 10);
    let fleet = common::add_fleet(&mut state, &config, boreas, SystemId(1), &["Etac"]);
    let squadron = state.fleets.get(fleet).unwrap().squadrons[0];
    common::edit_squadron(&mut state, squadron, |sqn| sqn.colonists_ptu = 20);

    advance_turn(&mut state, &config, &[]);
    assert!(!state.houses.get(boreas).unwrap().is_eliminated);
}

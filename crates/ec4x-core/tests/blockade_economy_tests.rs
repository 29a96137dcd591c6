// SPDX-License-Identifier: Apache-2.0
//! Blockade mechanics: output penalty, prestige bleed, co-blockades.
#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use ec4x_core::{
    advance_turn, net_colony_income, DiploState, EventKind, SystemId,
};

#[test]
fn hostile_fleet_blockades_and_bleeds_prestige() {
    let config = common::config();
    let mut state = common::line_state(2);
    let alba = common::add_house(&mut state, "House Alba");
    let boreas = common::add_house(&mut state, "House Boreas");
    common::set_relation(&mut state, alba, boreas, DiploState::Enemy);
    let colony_id = common::add_colony(&mut state, &config, SystemId(0), alba, 10);
    common::add_fleet(&mut state, &config, boreas, SystemId(0), &["Cruiser"]);

    let prestige_before = state.houses.get(alba).unwrap().prestige;
    let outcome = advance_turn(&mut state, &config, &[]);

    let colony = state.colonies.get(colony_id).unwrap();
    assert!(colony.blockaded);
    assert_eq!(colony.blockaded_by, vec![boreas]);
    assert_eq!(colony.blockade_turns, 1);

    // Net output under blockade is 40% of the open figure.
    let mut open = colony.clone();
    open.blockaded = false;
    let open_income = net_colony_income(&open, &config.sections.economy, 0);
    let blocked_income = net_colony_income(colony, &config.sections.economy, 0);
    assert_eq!(blocked_income, open_income * 40 / 100);

    // Exactly the blockade penalty came off Alba's prestige this turn.
    assert_eq!(
        state.houses.get(alba).unwrap().prestige,
        prestige_before - config.sections.economy.blockade_prestige_penalty
    );
    assert!(outcome.events.iter().any(|event| matches!(
        &event.kind,
        EventKind::BlockadeEstablished { colony, by }
            if *colony == colony_id && by.contains(&boreas)
    )));
}

#[test]
fn toothless_fleets_do_not_blockade() {
    let config = common::config();
    let mut state = common::line_state(2);
    let alba = common::add_house(&mut state, "House Alba");
    let boreas = common::add_house(&mut state, "House Boreas");
    common::set_relation(&mut state, alba, boreas, DiploState::Enemy);
    let colony_id = common::add_colony(&mut state, &config, SystemId(0), alba, 10);
    // An unarmed transport has no operational combat strength.
    common::add_fleet(&mut state, &config, boreas, SystemId(0), &["Transport"]);

    advance_turn(&mut state, &config, &[]);
    let colony = state.colonies.get(colony_id).unwrap();
    assert!(!colony.blockaded);
    assert!(colony.blockaded_by.is_empty());
}

#[test]
fn blockade_lifts_when_the_fleet_withdraws() {
    let config = common::config();
    let mut state = common::line_state(2);
    let alba = common::add_house(&mut state, "House Alba");
    let boreas = common::add_house(&mut state, "House Boreas");
    common::set_relation(&mut state, alba, boreas, DiploState::Enemy);
    let colony_id = common::add_colony(&mut state, &config, SystemId(0), alba, 10);
    let raider = common::add_fleet(&mut state, &config, boreas, SystemId(0), &["Cruiser"]);

    advance_turn(&mut state, &config, &[]);
    assert!(state.colonies.get(colony_id).unwrap().blockaded);

    // Withdraw the blockader by hand and re-run the economy.
    ec4x_core::ops::fleet_ops::move_fleet(&mut state, raider, SystemId(1));
    let outcome = advance_turn(&mut state, &config, &[]);
    let colony = state.colonies.get(colony_id).unwrap();
    assert!(!colony.blockaded);
    assert_eq!(colony.blockade_turns, 0);
    assert!(outcome.events.iter().any(|event| matches!(
        &event.kind,
        EventKind::BlockadeLifted { colony } if *colony == colony_id
    )));
}

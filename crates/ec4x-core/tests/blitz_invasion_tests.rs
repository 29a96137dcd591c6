// SPDX-License-Identifier: Apache-2.0
//! Blitz assaults: land under fire, capture the works intact.
#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use ec4x_core::ops::squadron_ops;
use ec4x_core::{
    advance_turn, DiploState, EventKind, FleetOrder, FleetOrderKind, FleetOrderRequest,
    OrderPacket, SquadronHome, SystemId,
};
use ec4x_rules_schema::GroundClass;

/// Scenario: a blitz against a defended colony. One bombardment round, then
/// the marines go in with the surviving batteries still shooting. Victory
/// hands the colony over with its infrastructure intact.
#[test]
fn blitz_captures_infrastructure_intact() {
    let config = common::config();
    let mut state = common::line_state(2);
    let alba = common::add_house(&mut state, "House Alba");
    let boreas = common::add_house(&mut state, "House Boreas");
    common::set_relation(&mut state, alba, boreas, DiploState::Enemy);

    let colony = common::add_colony(&mut state, &config, SystemId(0), boreas, 10);
    common::edit_colony(&mut state, colony, |record| {
        record.infrastructure = 4;
        record.shield_level = 1;
    });
    common::add_garrison(&mut state, colony, GroundClass::Battery, 1);
    common::add_garrison(&mut state, colony, GroundClass::Army, 1);
    let infrastructure_before = 4;

    // Assault fleet: heavy line plus a transport squadron with a full
    // marine complement, staged one jump out.
    let fleet = common::add_fleet(
        &mut state,
        &config,
        alba,
        SystemId(1),
        &["Battleship", "Battleship"],
    );
    squadron_ops::create_squadron(
        &mut state,
        &config,
        SquadronHome::Fleet(fleet),
        &["Transport", "Transport", "Transport"],
    )
    .unwrap();
    let transports = state.fleets.get(fleet).unwrap().squadrons[1];
    // Twelve marine formations: decisive odds against one army and one
    // battery even on the coldest dice.
    let marine_fleet_units = {
        let mut units = Vec::new();
        for _ in 0..12 {
            let id = state.counters.next_ground_unit();
            state.ground_units.add(
                id,
                ec4x_core::GroundUnit {
                    id,
                    location: ec4x_core::GroundLocation::Embarked(transports),
                    class: GroundClass::Marine,
                    state: ec4x_core::CombatState::Undamaged,
                    damage: 0,
                },
            );
            units.push(id);
        }
        units
    };
    common::edit_squadron(&mut state, transports, |sqn| {
        sqn.marine_unit_ids.extend(marine_fleet_units.iter().copied());
    });

    let mut packet = OrderPacket::empty(alba, 1);
    packet.fleet_orders.push(FleetOrderRequest {
        fleet,
        order: FleetOrder::to_system(FleetOrderKind::Blitz, SystemId(0)),
    });
    let outcome = advance_turn(&mut state, &config, &[packet]);

    // The colony changed hands with the works untouched.
    let captured = state.colonies.get(colony).unwrap();
    assert_eq!(captured.owner, alba);
    assert_eq!(captured.infrastructure, infrastructure_before);
    assert!(outcome.events.iter().any(|event| matches!(
        event.kind,
        EventKind::InvasionResolved { success: true, blitz: true, .. }
    )));
    assert!(outcome.events.iter().any(|event| matches!(
        event.kind,
        EventKind::ColonyCaptured { by, infrastructure_destroyed_percent: 0, .. } if by == alba
    )));

    // The occupation garrison is the surviving marines; surviving batteries
    // were captured with the ground.
    let garrison_marines = captured
        .ground_unit_ids
        .iter()
        .filter(|&&unit| {
            state
                .ground_units
                .get(unit)
                .is_some_and(|record| record.class == GroundClass::Marine)
        })
        .count();
    assert!(garrison_marines > 0);
}

/// A blitz with no marines aboard fails without touching ownership.
#[test]
fn blitz_without_marines_fails() {
    let config = common::config();
    let mut state = common::line_state(2);
    let alba = common::add_house(&mut state, "House Alba");
    let boreas = common::add_house(&mut state, "House Boreas");
    common::set_relation(&mut state, alba, boreas, DiploState::Enemy);
    let colony = common::add_colony(&mut state, &config, SystemId(0), boreas, 10);

    let fleet = common::add_fleet(&mut state, &config, alba, SystemId(1), &["Battleship"]);
    let mut packet = OrderPacket::empty(alba, 1);
    packet.fleet_orders.push(FleetOrderRequest {
        fleet,
        order: FleetOrder::to_system(FleetOrderKind::Blitz, SystemId(0)),
    });
    let outcome = advance_turn(&mut state, &config, &[packet]);

    assert_eq!(state.colonies.get(colony).unwrap().owner, boreas);
    assert!(outcome.events.iter().any(|event| matches!(
        event.kind,
        EventKind::InvasionResolved { success: false, blitz: true, .. }
    )));
}

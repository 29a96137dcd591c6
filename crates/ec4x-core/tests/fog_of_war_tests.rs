// SPDX-License-Identifier: Apache-2.0
//! Fog-of-war projection: visibility justification and staleness.
#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use ec4x_core::{
    advance_turn, DiploState, FleetOrder, FleetOrderKind, FleetOrderRequest, OrderPacket,
    SystemId, VisibilityLevel,
};

#[test]
fn snapshots_contain_only_justifiable_information() {
    let config = common::config();
    let mut state = common::line_state(4);
    let alba = common::add_house(&mut state, "House Alba");
    let boreas = common::add_house(&mut state, "House Boreas");
    common::add_colony(&mut state, &config, SystemId(0), alba, 10);
    // Boreas sits three jumps away: out of sight of Alba.
    common::add_colony(&mut state, &config, SystemId(3), boreas, 10);
    common::add_fleet(&mut state, &config, boreas, SystemId(3), &["Cruiser"]);

    let outcome = advance_turn(&mut state, &config, &[]);
    let alba_view = &outcome.views[&alba];

    // Own colony: full detail.
    assert_eq!(alba_view.colonies.len(), 1);
    assert_eq!(alba_view.colonies[0].owner, alba);
    // The far colony is not in Alba's intel at all.
    let far = alba_view.intel.system(SystemId(3));
    assert!(far.is_none() || far.unwrap().colony.is_none());
    // Adjacent system is classified Adjacent.
    assert_eq!(
        alba_view.intel.system(SystemId(1)).unwrap().visibility,
        VisibilityLevel::Adjacent
    );
}

#[test]
fn foreign_fleets_in_view_are_reported_fresh() {
    let config = common::config();
    let mut state = common::line_state(3);
    let alba = common::add_house(&mut state, "House Alba");
    let boreas = common::add_house(&mut state, "House Boreas");
    common::add_colony(&mut state, &config, SystemId(0), alba, 10);
    // A Boreas fleet parks right next door (adjacent visibility).
    common::add_fleet(&mut state, &config, boreas, SystemId(1), &["Cruiser"]);

    let outcome = advance_turn(&mut state, &config, &[]);
    let alba_view = &outcome.views[&alba];
    let row = alba_view.intel.system(SystemId(1)).unwrap();
    assert_eq!(row.fleets.len(), 1);
    assert_eq!(row.fleets[0].owner, boreas);
    assert_eq!(row.fleets[0].last_turn_updated, state.turn);
}

#[test]
fn intel_rows_decay_to_scouted_and_keep_their_stamps() {
    let config = common::config();
    let mut state = common::line_state(4);
    let alba = common::add_house(&mut state, "House Alba");
    let boreas = common::add_house(&mut state, "House Boreas");
    common::add_colony(&mut state, &config, SystemId(0), alba, 10);
    common::add_colony(&mut state, &config, SystemId(3), boreas, 10);

    // A scout sweeps the far colony, then goes home.
    let scout = common::add_fleet(&mut state, &config, alba, SystemId(0), &["Scout"]);
    let mut packet = OrderPacket::empty(alba, 1);
    packet.fleet_orders.push(FleetOrderRequest {
        fleet: scout,
        order: FleetOrder::to_system(FleetOrderKind::SpySystem, SystemId(3)),
    });
    advance_turn(&mut state, &config, &[packet]); // turn 1: en route
    advance_turn(&mut state, &config, &[]); // turn 2: en route
    advance_turn(&mut state, &config, &[]); // turn 3: arrives, surveys
    let scouted_turn = state.turn;
    let house = state.houses.get(alba).unwrap();
    let row = house.intel.system(SystemId(3)).unwrap();
    assert_eq!(row.last_scouted_turn, Some(scouted_turn));
    assert!(row.colony.is_some());
    assert_eq!(row.colony.as_ref().unwrap().owner, boreas);

    // Send the scout home; the row goes stale but survives.
    let mut recall = OrderPacket::empty(alba, state.turn + 1);
    recall.fleet_orders.push(FleetOrderRequest {
        fleet: scout,
        order: FleetOrder::to_system(FleetOrderKind::Move, SystemId(0)),
    });
    advance_turn(&mut state, &config, &[recall]);
    advance_turn(&mut state, &config, &[]);
    advance_turn(&mut state, &config, &[]);
    let house = state.houses.get(alba).unwrap();
    let row = house.intel.system(SystemId(3)).unwrap();
    assert_eq!(row.visibility, VisibilityLevel::Scouted);
    let stamp = row.colony.as_ref().unwrap().last_turn_updated;
    assert!(stamp < state.turn, "stale row keeps its old stamp");
}

#[test]
fn events_are_filtered_per_observer() {
    let config = common::config();
    let mut state = common::line_state(2);
    let alba = common::add_house(&mut state, "House Alba");
    let boreas = common::add_house(&mut state, "House Boreas");
    common::set_relation(&mut state, alba, boreas, DiploState::Enemy);
    common::add_colony(&mut state, &config, SystemId(0), alba, 10);
    common::add_fleet(&mut state, &config, boreas, SystemId(0), &["Cruiser"]);

    let outcome = advance_turn(&mut state, &config, &[]);
    for (&house, view) in &outcome.views {
        for event in &view.events {
            assert!(event.observers.can_see(house));
        }
    }
    // The full stream is a superset of every filtered view.
    let total = outcome.events.len();
    for view in outcome.views.values() {
        assert!(view.events.len() <= total);
    }
}

// SPDX-License-Identifier: Apache-2.0
//! The two-turn colonization scenario.
#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use ec4x_core::{
    advance_turn, EventKind, FleetOrder, FleetOrderKind, FleetOrderRequest, OrderPacket,
    SystemId, SOULS_PER_PU,
};

#[test]
fn etac_fleet_colonizes_an_adjacent_system_in_two_turns() {
    let config = common::config();
    let mut state = common::line_state(3);
    let house = common::add_house(&mut state, "House Alba");
    let homeworld = common::add_colony(&mut state, &config, SystemId(0), house, 10);
    common::edit_colony(&mut state, homeworld, |colony| colony.is_homeworld = true);

    let fleet = common::add_fleet(&mut state, &config, house, SystemId(0), &["Etac"]);
    let squadron = state.fleets.get(fleet).unwrap().squadrons[0];
    common::edit_squadron(&mut state, squadron, |sqn| sqn.colonists_ptu = 1);

    let target = SystemId(1);
    let mut packet = OrderPacket::empty(house, 1);
    packet.fleet_orders.push(FleetOrderRequest {
        fleet,
        order: FleetOrder::to_system(FleetOrderKind::Colonize, target),
    });

    // Turn 1: the ETAC transits; nothing is founded yet.
    advance_turn(&mut state, &config, &[packet]);
    assert_eq!(state.fleets.get(fleet).unwrap().system, target);
    assert!(state.colony_in_system(target).is_none());

    // Turn 2: the landing takes.
    let outcome = advance_turn(&mut state, &config, &[]);
    let colony_id = state.colony_in_system(target).unwrap();
    let colony = state.colonies.get(colony_id).unwrap();
    assert_eq!(colony.owner, house);
    assert_eq!(colony.souls, SOULS_PER_PU);
    assert_eq!(colony.population_units(), 1);
    assert!(colony.neoria_ids.is_empty());
    assert!(colony.kastra_ids.is_empty());

    // The delivering ETAC hull was expended.
    assert!(state.squadrons.get(squadron).is_none());
    assert!(outcome.events.iter().any(|event| matches!(
        event.kind,
        EventKind::ColonyFounded { system, house: founder, .. }
            if system == target && founder == house
    )));
}

#[test]
fn colonize_against_an_occupied_system_is_dropped() {
    let config = common::config();
    let mut state = common::line_state(2);
    let alba = common::add_house(&mut state, "House Alba");
    let boreas = common::add_house(&mut state, "House Boreas");
    common::add_colony(&mut state, &config, SystemId(1), boreas, 5);

    let fleet = common::add_fleet(&mut state, &config, alba, SystemId(0), &["Etac"]);
    let squadron = state.fleets.get(fleet).unwrap().squadrons[0];
    common::edit_squadron(&mut state, squadron, |sqn| sqn.colonists_ptu = 20);

    let mut packet = OrderPacket::empty(alba, 1);
    packet.fleet_orders.push(FleetOrderRequest {
        fleet,
        order: FleetOrder::to_system(FleetOrderKind::Colonize, SystemId(1)),
    });
    advance_turn(&mut state, &config, &[packet]);
    advance_turn(&mut state, &config, &[]);

    // The system stays Boreas'; the colonists stay aboard.
    let colony = state.colonies.get(state.colony_in_system(SystemId(1)).unwrap()).unwrap();
    assert_eq!(colony.owner, boreas);
    assert_eq!(state.squadrons.get(squadron).unwrap().colonists_ptu, 20);
}

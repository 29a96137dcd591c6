// SPDX-License-Identifier: Apache-2.0
//! Lane pathfinding, restrictions, and the multi-jump ETA simulation.
#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use ec4x_core::{eta_turns, find_path, mobility_of, LaneClass, Mobility, SystemId};

const OPEN: Mobility = Mobility {
    restricted_barred: false,
};

#[test]
fn straight_line_path_costs_one_per_major_lane() {
    let state = common::line_state(4);
    let (path, cost) = find_path(&state, SystemId(0), SystemId(3), OPEN).unwrap();
    assert_eq!(path, vec![SystemId(0), SystemId(1), SystemId(2), SystemId(3)]);
    assert_eq!(cost, 3);
}

#[test]
fn lane_class_weights_steer_route_choice() {
    let mut state = common::line_state(3);
    // Degrade the middle lane; the only route still uses it but costs more.
    let lane = state.map.lanes[1];
    state.map.lanes[1].class = LaneClass::Minor;
    for (from, to) in [(lane.a, lane.b), (lane.b, lane.a)] {
        for entry in state.map.adjacency.get_mut(&from).unwrap() {
            if entry.0 == to {
                entry.1 = LaneClass::Minor;
            }
        }
    }
    let (_, cost) = find_path(&state, SystemId(0), SystemId(2), OPEN).unwrap();
    assert_eq!(cost, 1 + 2);
}

#[test]
fn restricted_lanes_bar_spacelift_fleets() {
    let config = common::config();
    let mut state = common::line_state(3);
    let house = common::add_house(&mut state, "House Test");
    // Make the second hop Restricted, both directions.
    let lane = state.map.lanes[1];
    state.map.lanes[1].class = LaneClass::Restricted;
    for (from, to) in [(lane.a, lane.b), (lane.b, lane.a)] {
        for entry in state.map.adjacency.get_mut(&from).unwrap() {
            if entry.0 == to {
                entry.1 = LaneClass::Restricted;
            }
        }
    }
    let spacelift = common::add_fleet(&mut state, &config, house, SystemId(0), &["Etac"]);
    let warship = common::add_fleet(&mut state, &config, house, SystemId(0), &["Corvette"]);

    let lift_mobility = mobility_of(&state, spacelift);
    assert!(lift_mobility.restricted_barred);
    assert!(find_path(&state, SystemId(0), SystemId(2), lift_mobility).is_none());

    let war_mobility = mobility_of(&state, warship);
    assert!(!war_mobility.restricted_barred);
    assert!(find_path(&state, SystemId(0), SystemId(2), war_mobility).is_some());
}

#[test]
fn multi_jump_eta_requires_owned_major_corridor() {
    let config = common::config();
    let mut state = common::line_state(5);
    let house = common::add_house(&mut state, "House Test");
    let path: Vec<SystemId> = (0..5).map(SystemId).collect();

    // Foreign corridor: one jump per turn.
    assert_eq!(eta_turns(&state, house, &path), 4);

    // Own every system on the way: two Major jumps per turn.
    for system in path.iter().copied() {
        common::add_colony(&mut state, &config, system, house, 1);
    }
    assert_eq!(eta_turns(&state, house, &path), 2);
}

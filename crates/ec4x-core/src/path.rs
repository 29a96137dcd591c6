// SPDX-License-Identifier: Apache-2.0
//! Pathfinding over the lane graph.
//!
//! A* with the hex-distance heuristic and lane-class edge weights
//! (Major 1, Minor 2, Restricted 3). Ties break on system id so routes are
//! deterministic. ETAs come from a turn-by-turn simulation applying the
//! multi-jump rule, not from lane counts.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use rustc_hash::FxHashMap;

use crate::config::GameConfig;
use crate::ident::{FleetId, HouseId, SystemId};
use crate::intel::IntelDatabase;
use crate::map::LaneClass;
use crate::ops::fleet_ops;
use crate::state::GameState;

/// Movement constraints derived from a fleet's composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mobility {
    /// Restricted lanes are barred (crippled squadron or spacelift aboard).
    pub restricted_barred: bool,
}

/// Derives movement constraints for a fleet.
pub fn mobility_of(state: &GameState, fleet: FleetId) -> Mobility {
    Mobility {
        restricted_barred: fleet_ops::has_crippled_squadron(state, fleet)
            || fleet_ops::has_spacelift(state, fleet),
    }
}

fn heuristic(state: &GameState, from: SystemId, to: SystemId) -> u32 {
    match (state.systems.get(from), state.systems.get(to)) {
        (Some(a), Some(b)) => a.coord.distance(b.coord),
        _ => 0,
    }
}

/// Finds the cheapest lane path from `from` to `to` under `mobility`.
///
/// Returns the system sequence including both endpoints, plus total lane
/// cost. `None` when unreachable.
pub fn find_path(
    state: &GameState,
    from: SystemId,
    to: SystemId,
    mobility: Mobility,
) -> Option<(Vec<SystemId>, u32)> {
    if from == to {
        return Some((vec![from], 0));
    }
    // Lookup-only maps; iteration order is never observed.
    let mut g_score: FxHashMap<SystemId, u32> = FxHashMap::default();
    let mut came_from: FxHashMap<SystemId, SystemId> = FxHashMap::default();
    let mut open: BinaryHeap<Reverse<(u32, u32, SystemId)>> = BinaryHeap::new();

    g_score.insert(from, 0);
    open.push(Reverse((heuristic(state, from, to), 0, from)));

    while let Some(Reverse((_, g, current))) = open.pop() {
        if current == to {
            let mut path = vec![to];
            let mut cursor = to;
            while let Some(&prev) = came_from.get(&cursor) {
                path.push(prev);
                cursor = prev;
            }
            path.reverse();
            return Some((path, g));
        }
        if g_score.get(&current).is_some_and(|&best| g > best) {
            continue;
        }
        for &(neighbor, class) in state.map.neighbors_of(current) {
            if mobility.restricted_barred && class == LaneClass::Restricted {
                continue;
            }
            let tentative = g + class.cost();
            if g_score
                .get(&neighbor)
                .is_none_or(|&best| tentative < best)
            {
                g_score.insert(neighbor, tentative);
                came_from.insert(neighbor, current);
                open.push(Reverse((
                    tentative + heuristic(state, neighbor, to),
                    tentative,
                    neighbor,
                )));
            }
        }
    }
    None
}

/// How many systems along `path` the fleet advances this turn.
///
/// Two jumps are allowed only when every system on the sub-path (inclusive)
/// is owned by `owner` and both lanes are Major; otherwise one.
pub fn steps_this_turn(state: &GameState, owner: HouseId, path: &[SystemId]) -> usize {
    if path.len() < 2 {
        return 0;
    }
    if path.len() >= 3 {
        let owned = path[..3].iter().all(|&system| {
            state
                .colony_in_system(system)
                .and_then(|colony| state.colonies.get(colony))
                .is_some_and(|colony| colony.owner == owner)
        });
        let both_major = state.map.lane_between(path[0], path[1]) == Some(LaneClass::Major)
            && state.map.lane_between(path[1], path[2]) == Some(LaneClass::Major);
        if owned && both_major {
            return 2;
        }
    }
    1
}

/// Simulated travel time in turns for a fleet of `owner` along `path`.
pub fn eta_turns(state: &GameState, owner: HouseId, path: &[SystemId]) -> u32 {
    let mut position = 0;
    let mut turns = 0;
    while position + 1 < path.len() {
        let steps = steps_this_turn(state, owner, &path[position..]);
        if steps == 0 {
            break;
        }
        position += steps;
        turns += 1;
    }
    turns
}

/// Risk weight of transiting a system, judged against the mover's intel.
fn system_risk(
    state: &GameState,
    intel: &IntelDatabase,
    mover: HouseId,
    system: SystemId,
) -> u32 {
    if let Some(colony) = state
        .colony_in_system(system)
        .and_then(|id| state.colonies.get(id))
    {
        if colony.owner == mover {
            return 0;
        }
    }
    let Some(row) = intel.system(system) else {
        return 1;
    };
    match &row.colony {
        Some(seen) if seen.owner != mover => {
            if state.relation(mover, seen.owner).permits_combat() {
                10
            } else {
                3
            }
        }
        _ => 1,
    }
}

/// Chooses a seek-home destination for a fleet.
///
/// Pre-planned fallback routes win when still valid (the destination still
/// holds an own colony and is reachable); otherwise every own colony is
/// scored by `path cost + 3 · summed transit risk` and the best (ties to the
/// lower system id) is taken. `None` when no destination is reachable — the
/// fleet holds position rather than disappearing.
pub fn seek_home_destination(
    state: &GameState,
    _config: &GameConfig,
    fleet: FleetId,
) -> Option<SystemId> {
    let record = state.fleets.get(fleet)?;
    let owner = record.owner;
    let origin = record.system;
    let mobility = mobility_of(state, fleet);
    let house = state.houses.get(owner)?;

    for &destination in &house.fallback_destinations {
        let still_ours = state
            .colony_in_system(destination)
            .and_then(|id| state.colonies.get(id))
            .is_some_and(|colony| colony.owner == owner);
        if still_ours && find_path(state, origin, destination, mobility).is_some() {
            return Some(destination);
        }
    }

    let mut best: Option<(u32, SystemId)> = None;
    for &colony_id in state
        .indexes
        .colonies_by_owner
        .get(&owner)
        .map_or(&[][..], Vec::as_slice)
    {
        let Some(colony) = state.colonies.get(colony_id) else {
            continue;
        };
        if colony.system == origin {
            return Some(origin);
        }
        let Some((path, cost)) = find_path(state, origin, colony.system, mobility) else {
            continue;
        };
        let risk: u32 = path
            .iter()
            .skip(1)
            .map(|&system| system_risk(state, &house.intel, owner, system))
            .sum();
        let score = cost + 3 * risk;
        if best.is_none_or(|(best_score, best_system)| {
            score < best_score || (score == best_score && colony.system < best_system)
        }) {
            best = Some((score, colony.system));
        }
    }
    best.map(|(_, system)| system)
}

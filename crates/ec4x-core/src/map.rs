// SPDX-License-Identifier: Apache-2.0
//! The hex star map: systems, jump lanes, and map generation.
//!
//! Axial coordinates are wrapped in [`HexCoord`] so the rest of the engine
//! never touches `hexx::Hex` directly; the wrapper converts at the boundary
//! for neighbor and range math. Lanes are stored once per undirected edge;
//! the adjacency index holds both traversal directions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use ec4x_rules_schema::{PlanetClass, ResourceRating};

use crate::ident::{ColonyId, IdCounters, SystemId};
use crate::prng::Prng;
use crate::store::Table;

/// Axial hex coordinate `(q, r)`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct HexCoord {
    /// Axial q.
    pub q: i32,
    /// Axial r.
    pub r: i32,
}

impl HexCoord {
    /// The hub coordinate `(0, 0)`.
    pub const ORIGIN: HexCoord = HexCoord { q: 0, r: 0 };

    /// Creates a coordinate.
    #[must_use]
    pub fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Converts to `hexx::Hex` for math operations.
    #[must_use]
    pub fn to_hex(self) -> hexx::Hex {
        hexx::Hex::new(self.q, self.r)
    }

    /// Converts from `hexx::Hex`.
    #[must_use]
    pub fn from_hex(hex: hexx::Hex) -> Self {
        Self {
            q: hex.x,
            r: hex.y,
        }
    }

    /// Ring index from the hub: `max(|q|, |r|, |q + r|)`.
    #[must_use]
    pub fn ring(self) -> u32 {
        self.q
            .abs()
            .max(self.r.abs())
            .max((self.q + self.r).abs()) as u32
    }

    /// Hex distance to another coordinate.
    #[must_use]
    pub fn distance(self, other: HexCoord) -> u32 {
        let dq = self.q - other.q;
        let dr = self.r - other.r;
        ((dq.abs() + dr.abs() + (dq + dr).abs()) / 2) as u32
    }

    /// The six adjacent coordinates.
    #[must_use]
    pub fn neighbors(self) -> [HexCoord; 6] {
        self.to_hex().all_neighbors().map(HexCoord::from_hex)
    }
}

/// Jump-lane classification; the class sets the traversal cost.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum LaneClass {
    /// Established trunk route.
    Major,
    /// Charted secondary route.
    Minor,
    /// Hazardous passage; barred to crippled and spacelift formations.
    Restricted,
}

impl LaneClass {
    /// Pathfinding cost of one jump along a lane of this class.
    #[must_use]
    pub fn cost(self) -> u32 {
        match self {
            LaneClass::Major => 1,
            LaneClass::Minor => 2,
            LaneClass::Restricted => 3,
        }
    }
}

/// One undirected jump lane between two adjacent systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JumpLane {
    /// Lower-id endpoint.
    pub a: SystemId,
    /// Higher-id endpoint.
    pub b: SystemId,
    /// Lane class.
    pub class: LaneClass,
}

/// A star system on the map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct System {
    /// System id.
    pub id: SystemId,
    /// Axial coordinate.
    pub coord: HexCoord,
    /// Habitability of the primary world.
    pub planet_class: PlanetClass,
    /// Mineral wealth of the primary world.
    pub resource_rating: ResourceRating,
    /// Colony occupying the system, if any.
    pub colony: Option<ColonyId>,
}

/// Map geometry: lanes and the derived traversal index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarMap {
    /// Map radius (equals the player count at generation).
    pub radius: u32,
    /// Hub system at the origin.
    pub hub: SystemId,
    /// Undirected lanes, one record per edge.
    pub lanes: Vec<JumpLane>,
    /// Directed traversal index: both directions of every lane.
    pub adjacency: BTreeMap<SystemId, Vec<(SystemId, LaneClass)>>,
    /// Coordinate → system lookup.
    pub by_coord: BTreeMap<HexCoord, SystemId>,
}

impl StarMap {
    /// Systems adjacent to `system`, with the lane class of each connection.
    pub fn neighbors_of(&self, system: SystemId) -> &[(SystemId, LaneClass)] {
        self.adjacency.get(&system).map_or(&[], Vec::as_slice)
    }

    /// Lane class between two systems, if a lane exists.
    pub fn lane_between(&self, a: SystemId, b: SystemId) -> Option<LaneClass> {
        self.neighbors_of(a)
            .iter()
            .find(|(other, _)| *other == b)
            .map(|(_, class)| *class)
    }

    /// Whether two systems are joined by a lane.
    #[must_use]
    pub fn connected(&self, a: SystemId, b: SystemId) -> bool {
        self.lane_between(a, b).is_some()
    }
}

fn roll_planet_class(prng: &mut Prng) -> PlanetClass {
    match prng.next_int(0, 9) {
        0 | 1 => PlanetClass::Barren,
        2..=4 => PlanetClass::Marginal,
        5..=8 => PlanetClass::Habitable,
        _ => PlanetClass::Lush,
    }
}

fn roll_resource_rating(prng: &mut Prng) -> ResourceRating {
    match prng.next_int(0, 9) {
        0 | 1 => ResourceRating::Poor,
        2..=6 => ResourceRating::Normal,
        7 | 8 => ResourceRating::Rich,
        _ => ResourceRating::VeryRich,
    }
}

fn roll_lane_class(prng: &mut Prng) -> LaneClass {
    match prng.next_int(0, 9) {
        0..=4 => LaneClass::Major,
        5..=7 => LaneClass::Minor,
        _ => LaneClass::Restricted,
    }
}

/// The six corner coordinates of the outer ring: the "vertex" cells with only
/// three in-map neighbors, preferred as homeworld sites at small player
/// counts.
fn corner_coords(radius: i32) -> [HexCoord; 6] {
    [
        HexCoord::new(radius, 0),
        HexCoord::new(0, radius),
        HexCoord::new(-radius, radius),
        HexCoord::new(-radius, 0),
        HexCoord::new(0, -radius),
        HexCoord::new(radius, -radius),
    ]
}

/// Picks `players` homeworld sites maximizing minimum pairwise distance.
///
/// Up to six players take evenly spaced outer-ring corners; beyond that a
/// greedy farthest-point sweep over the outer ring fills the rest.
fn place_homeworlds(
    players: u32,
    radius: u32,
    by_coord: &BTreeMap<HexCoord, SystemId>,
) -> Vec<SystemId> {
    let corners = corner_coords(radius as i32);
    let mut picked: Vec<HexCoord> = Vec::new();
    if players <= 6 {
        let step = 6 / players as usize;
        for i in 0..players as usize {
            picked.push(corners[i * step]);
        }
    } else {
        let ring: Vec<HexCoord> = HexCoord::ORIGIN
            .to_hex()
            .ring(radius)
            .map(HexCoord::from_hex)
            .collect();
        picked.extend_from_slice(&corners);
        while picked.len() < players as usize {
            let best = ring
                .iter()
                .filter(|c| !picked.contains(c))
                .max_by_key(|c| {
                    picked
                        .iter()
                        .map(|p| c.distance(*p))
                        .min()
                        .unwrap_or(u32::MAX)
                })
                .copied();
            match best {
                Some(coord) => picked.push(coord),
                None => break,
            }
        }
    }
    picked
        .into_iter()
        .filter_map(|coord| by_coord.get(&coord).copied())
        .collect()
}

/// Generates the map for `players` houses: `1 + 3·n·(n+1)` systems out to
/// ring `n`, fully laned between adjacent hexes, hub lanes Major.
///
/// Returns the map plus the chosen homeworld system ids in house order.
/// Homeworld systems are normalized to Habitable/Normal so no house starts
/// disadvantaged by terrain.
pub fn generate(
    counters: &mut IdCounters,
    systems: &mut Table<SystemId, System>,
    players: u32,
    prng: &mut Prng,
) -> (StarMap, Vec<SystemId>) {
    let radius = players.max(1);
    let mut by_coord: BTreeMap<HexCoord, SystemId> = BTreeMap::new();

    // hexx::Hex::range yields the hub first, then expanding rings.
    let coords: Vec<HexCoord> = HexCoord::ORIGIN
        .to_hex()
        .range(radius)
        .map(HexCoord::from_hex)
        .collect();
    for coord in coords {
        let id = counters.next_system();
        by_coord.insert(coord, id);
        systems.add(
            id,
            System {
                id,
                coord,
                planet_class: roll_planet_class(prng),
                resource_rating: roll_resource_rating(prng),
                colony: None,
            },
        );
    }
    let hub = by_coord[&HexCoord::ORIGIN];

    let mut lanes: Vec<JumpLane> = Vec::new();
    let mut adjacency: BTreeMap<SystemId, Vec<(SystemId, LaneClass)>> = BTreeMap::new();
    for (&coord, &id) in &by_coord {
        for neighbor in coord.neighbors() {
            let Some(&other) = by_coord.get(&neighbor) else {
                continue;
            };
            // One record per undirected edge.
            if id.value() >= other.value() {
                continue;
            }
            let class = if id == hub || other == hub {
                LaneClass::Major
            } else {
                roll_lane_class(prng)
            };
            lanes.push(JumpLane {
                a: id,
                b: other,
                class,
            });
            adjacency.entry(id).or_default().push((other, class));
            adjacency.entry(other).or_default().push((id, class));
        }
    }
    for edges in adjacency.values_mut() {
        edges.sort_by_key(|(id, _)| *id);
    }

    let homeworlds = place_homeworlds(players, radius, &by_coord);
    for &site in &homeworlds {
        if let Some(system) = systems.get_mut(site) {
            system.planet_class = PlanetClass::Habitable;
            system.resource_rating = ResourceRating::Normal;
        }
    }

    (
        StarMap {
            radius,
            hub,
            lanes,
            adjacency,
            by_coord,
        },
        homeworlds,
    )
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn build(players: u32) -> (StarMap, Table<SystemId, System>, Vec<SystemId>) {
        let mut counters = IdCounters::default();
        let mut systems = Table::new();
        let mut prng = Prng::from_seed_u64(7);
        let (map, homeworlds) = generate(&mut counters, &mut systems, players, &mut prng);
        (map, systems, homeworlds)
    }

    #[test]
    fn system_count_matches_closed_form() {
        for players in 2..=5 {
            let (_, systems, _) = build(players);
            let n = u64::from(players);
            assert_eq!(systems.len() as u64, 1 + 3 * n * (n + 1));
        }
    }

    #[test]
    fn hub_has_exactly_six_lanes() {
        let (map, _, _) = build(3);
        assert_eq!(map.neighbors_of(map.hub).len(), 6);
        for (_, class) in map.neighbors_of(map.hub) {
            assert_eq!(*class, LaneClass::Major);
        }
    }

    #[test]
    fn every_ring_has_six_r_systems() {
        let (_, systems, _) = build(4);
        let mut per_ring: BTreeMap<u32, u32> = BTreeMap::new();
        for (_, system) in systems.iter() {
            *per_ring.entry(system.coord.ring()).or_default() += 1;
        }
        assert_eq!(per_ring[&0], 1);
        for ring in 1..=4 {
            assert_eq!(per_ring[&ring], 6 * ring);
        }
    }

    #[test]
    fn lanes_are_mirrored_in_the_adjacency_index() {
        let (map, _, _) = build(3);
        for lane in &map.lanes {
            assert_eq!(map.lane_between(lane.a, lane.b), Some(lane.class));
            assert_eq!(map.lane_between(lane.b, lane.a), Some(lane.class));
        }
        let directed: usize = map.adjacency.values().map(Vec::len).sum();
        assert_eq!(directed, map.lanes.len() * 2);
    }

    #[test]
    fn homeworlds_sit_on_the_outer_ring_far_apart() {
        let (map, systems, homeworlds) = build(4);
        assert_eq!(homeworlds.len(), 4);
        for &site in &homeworlds {
            let system = systems.get(site).unwrap();
            assert_eq!(system.coord.ring(), map.radius);
        }
        for (i, &a) in homeworlds.iter().enumerate() {
            for &b in &homeworlds[i + 1..] {
                let ca = systems.get(a).unwrap().coord;
                let cb = systems.get(b).unwrap().coord;
                assert!(ca.distance(cb) >= map.radius);
            }
        }
    }

    #[test]
    fn generation_is_deterministic_for_a_seed() {
        let (map_a, _, hw_a) = build(3);
        let (map_b, _, hw_b) = build(3);
        assert_eq!(map_a, map_b);
        assert_eq!(hw_a, hw_b);
    }
}

// SPDX-License-Identifier: Apache-2.0
//! Shared scenario builders for the integration tests.
#![allow(missing_docs, clippy::unwrap_used, dead_code)]

use std::collections::BTreeMap;

use ec4x_core::ops::{facility_ops, fleet_ops, squadron_ops};
use ec4x_core::{
    DiploState, EspionageState, GameConfig, GameState, GroundLocation, GroundUnit, HexCoord,
    House, HouseId, IdCounters, Indexes, IntelDatabase, JumpLane, LaneClass, ResearchAllocation,
    ResearchProgress, SquadronHome, StarMap, System, SystemId, Table, TechLevels,
};
use ec4x_rules_schema::{GroundClass, PlanetClass, ResourceRating};

pub fn config() -> GameConfig {
    GameConfig::standard()
}

/// A line of `n` systems joined by Major lanes: `sys-0 — sys-1 — … — sys-n-1`.
pub fn line_state(n: usize) -> GameState {
    let mut counters = IdCounters::default();
    let mut systems = Table::new();
    let mut ids: Vec<SystemId> = Vec::new();
    let mut by_coord = BTreeMap::new();
    for i in 0..n {
        let id = counters.next_system();
        let coord = HexCoord::new(i as i32, 0);
        systems.add(
            id,
            System {
                id,
                coord,
                planet_class: PlanetClass::Habitable,
                resource_rating: ResourceRating::Normal,
                colony: None,
            },
        );
        by_coord.insert(coord, id);
        ids.push(id);
    }
    let mut lanes = Vec::new();
    let mut adjacency: BTreeMap<SystemId, Vec<(SystemId, LaneClass)>> = BTreeMap::new();
    for pair in ids.windows(2) {
        lanes.push(JumpLane {
            a: pair[0],
            b: pair[1],
            class: LaneClass::Major,
        });
        adjacency
            .entry(pair[0])
            .or_default()
            .push((pair[1], LaneClass::Major));
        adjacency
            .entry(pair[1])
            .or_default()
            .push((pair[0], LaneClass::Major));
    }
    GameState {
        turn: 0,
        base_seed: 7,
        counters,
        map: StarMap {
            radius: n as u32,
            hub: ids[0],
            lanes,
            adjacency,
            by_coord,
        },
        systems,
        houses: Table::new(),
        colonies: Table::new(),
        fleets: Table::new(),
        squadrons: Table::new(),
        ships: Table::new(),
        neorias: Table::new(),
        kastras: Table::new(),
        ground_units: Table::new(),
        construction_projects: Table::new(),
        repair_projects: Table::new(),
        indexes: Indexes::default(),
        proposals: BTreeMap::new(),
        pending_commissions: Vec::new(),
    }
}

pub fn add_house(state: &mut GameState, name: &str) -> HouseId {
    let id = state.counters.next_house();
    state.houses.add(
        id,
        House {
            id,
            name: name.to_owned(),
            treasury: 1_000,
            prestige: 50,
            negative_prestige_turns: 0,
            is_eliminated: false,
            eliminated_turn: None,
            homeworld: None,
            tech: TechLevels::default(),
            research: ResearchProgress::default(),
            allocation: ResearchAllocation::default(),
            relations: BTreeMap::new(),
            intel: IntelDatabase::default(),
            espionage: EspionageState::default(),
            violations: Vec::new(),
            fallback_destinations: Vec::new(),
            fallback_refreshed_turn: 0,
        },
    );
    id
}

pub fn add_colony(
    state: &mut GameState,
    config: &GameConfig,
    system: SystemId,
    owner: HouseId,
    population_units: u64,
) -> ec4x_core::ColonyId {
    let ptu = u32::try_from(population_units * 20).unwrap();
    ec4x_core::ops::colony_ops::found_colony(state, &config.sections.economy, system, owner, ptu)
        .unwrap()
}

/// One fleet holding a single squadron of the given classes, flagship first.
pub fn add_fleet(
    state: &mut GameState,
    config: &GameConfig,
    owner: HouseId,
    system: SystemId,
    classes: &[&str],
) -> ec4x_core::FleetId {
    let fleet = fleet_ops::create_fleet(state, owner, system);
    squadron_ops::create_squadron(state, config, SquadronHome::Fleet(fleet), classes).unwrap();
    fleet
}

/// Embarks `count` fresh marine formations aboard the first squadron of a
/// fleet.
pub fn embark_marines(
    state: &mut GameState,
    fleet: ec4x_core::FleetId,
    count: u32,
) -> Vec<ec4x_core::GroundUnitId> {
    let squadron = state.fleets.get(fleet).unwrap().squadrons[0];
    let mut units = Vec::new();
    for _ in 0..count {
        let id = state.counters.next_ground_unit();
        state.ground_units.add(
            id,
            GroundUnit {
                id,
                location: GroundLocation::Embarked(squadron),
                class: GroundClass::Marine,
                state: ec4x_core::CombatState::Undamaged,
                damage: 0,
            },
        );
        units.push(id);
    }
    let mut record = state.squadrons.get(squadron).unwrap().clone();
    record.marine_unit_ids.extend(units.iter().copied());
    state.squadrons.update(squadron, record);
    units
}

/// Adds `count` garrison units of `class` to a colony.
pub fn add_garrison(
    state: &mut GameState,
    colony: ec4x_core::ColonyId,
    class: GroundClass,
    count: u32,
) {
    for _ in 0..count {
        facility_ops::create_ground_unit(state, colony, class);
    }
}

/// Sets a symmetric diplomatic state between two houses at turn zero.
pub fn set_relation(state: &mut GameState, a: HouseId, b: HouseId, relation: DiploState) {
    state.set_relation(a, b, relation, 0);
}

/// Replaces a house row through the update API (the sanctioned way to poke
/// a single field from outside the ops layer).
pub fn edit_house(state: &mut GameState, house: HouseId, edit: impl FnOnce(&mut House)) {
    let mut record = state.houses.get(house).unwrap().clone();
    edit(&mut record);
    state.houses.update(house, record);
}

pub fn edit_colony(
    state: &mut GameState,
    colony: ec4x_core::ColonyId,
    edit: impl FnOnce(&mut ec4x_core::Colony),
) {
    let mut record = state.colonies.get(colony).unwrap().clone();
    edit(&mut record);
    state.colonies.update(colony, record);
}

pub fn edit_squadron(
    state: &mut GameState,
    squadron: ec4x_core::SquadronId,
    edit: impl FnOnce(&mut ec4x_core::Squadron),
) {
    let mut record = state.squadrons.get(squadron).unwrap().clone();
    edit(&mut record);
    state.squadrons.update(squadron, record);
}

pub fn edit_fleet(
    state: &mut GameState,
    fleet: ec4x_core::FleetId,
    edit: impl FnOnce(&mut ec4x_core::Fleet),
) {
    let mut record = state.fleets.get(fleet).unwrap().clone();
    edit(&mut record);
    state.fleets.update(fleet, record);
}

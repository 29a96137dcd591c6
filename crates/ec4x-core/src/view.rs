// SPDX-License-Identifier: Apache-2.0
//! The fog-of-war projection.
//!
//! The bridge is one-way: the engine refreshes each house's intelligence
//! database from what that house can currently see, then clones a filtered
//! `PlayerState` for delivery. A snapshot never contains information the
//! house's visibility cannot justify; staleness is readable from each intel
//! row's turn stamps.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use ec4x_rules_schema::GroundClass;

use crate::colony::Colony;
use crate::config::GameConfig;
use crate::economy::CapacityViolation;
use crate::event::GameEvent;
use crate::facility::{Kastra, Neoria};
use crate::fleet::{Fleet, Ship, Squadron};
use crate::ground::GroundUnit;
use crate::house::{DiploState, ResearchProgress, TechLevels};
use crate::ident::{HouseId, SystemId};
use crate::intel::{ColonyIntel, FleetIntel, IntelDatabase, VisibilityLevel};
use crate::map::{HexCoord, JumpLane};
use crate::ops::fleet_ops;
use crate::state::GameState;

/// Public map geometry: coordinates and lanes, no ownership data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemView {
    /// System id.
    pub id: SystemId,
    /// Axial coordinate.
    pub coord: HexCoord,
}

/// Everything one house is allowed to see after a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    /// The viewing house.
    pub house: HouseId,
    /// Turn this snapshot reflects.
    pub turn: u32,
    /// Own treasury.
    pub treasury: i64,
    /// Own prestige.
    pub prestige: i64,
    /// Own technology levels.
    pub tech: TechLevels,
    /// Own research progress.
    pub research: ResearchProgress,
    /// Map geometry (public).
    pub map_systems: Vec<SystemView>,
    /// Jump lanes (public).
    pub map_lanes: Vec<JumpLane>,
    /// Owned colonies, full detail.
    pub colonies: Vec<Colony>,
    /// Owned fleets, full detail.
    pub fleets: Vec<Fleet>,
    /// Squadrons of owned fleets and colonies.
    pub squadrons: Vec<Squadron>,
    /// Ships of those squadrons.
    pub ships: Vec<Ship>,
    /// Owned facilities.
    pub neorias: Vec<Neoria>,
    /// Owned starbases.
    pub kastras: Vec<Kastra>,
    /// Owned ground units.
    pub ground_units: Vec<GroundUnit>,
    /// The house's intelligence database; rows fresh this turn are the
    /// currently visible foreign entities.
    pub intel: IntelDatabase,
    /// Public prestige table.
    pub prestige_table: BTreeMap<HouseId, i64>,
    /// Public colony counts per house.
    pub colony_counts: BTreeMap<HouseId, u32>,
    /// Diplomatic states involving the house.
    pub relations: BTreeMap<HouseId, DiploState>,
    /// Outstanding capacity violations against the house.
    pub violations: Vec<CapacityViolation>,
    /// The turn's events this house may observe.
    pub events: Vec<GameEvent>,
}

/// Projects a `PlayerState` for every house, refreshing intel first.
pub fn project_all(
    state: &mut GameState,
    config: &GameConfig,
    events: &[GameEvent],
) -> BTreeMap<HouseId, PlayerState> {
    let houses = state.house_ids();
    for &house in &houses {
        refresh_intel(state, config, house);
    }
    houses
        .into_iter()
        .map(|house| (house, project_one(state, house, events)))
        .collect()
}

/// Visibility classification for every system the house can currently see.
fn visible_systems(state: &GameState, house: HouseId) -> BTreeMap<SystemId, VisibilityLevel> {
    let mut visible: BTreeMap<SystemId, VisibilityLevel> = BTreeMap::new();

    let owned: Vec<SystemId> = state
        .indexes
        .colonies_by_owner
        .get(&house)
        .map_or_else(Vec::new, |colonies| {
            colonies
                .iter()
                .filter_map(|&colony| state.colonies.get(colony))
                .map(|record| record.system)
                .collect()
        });
    for &system in &owned {
        visible.insert(system, VisibilityLevel::Owned);
    }
    if let Some(fleets) = state.indexes.fleets_by_owner.get(&house) {
        for &fleet in fleets {
            if let Some(record) = state.fleets.get(fleet) {
                visible
                    .entry(record.system)
                    .or_insert(VisibilityLevel::Occupied);
            }
        }
    }
    for &system in &owned {
        for &(neighbor, _) in state.map.neighbors_of(system) {
            visible.entry(neighbor).or_insert(VisibilityLevel::Adjacent);
        }
    }
    visible
}

/// Refreshes one house's intel database from its current visibility.
fn refresh_intel(state: &mut GameState, config: &GameConfig, house: HouseId) {
    let turn = state.turn;
    let visible = visible_systems(state, house);
    let mut rows: Vec<(SystemId, VisibilityLevel, Option<ColonyIntel>, Vec<FleetIntel>)> =
        Vec::new();
    let mut hostile_colony_systems: BTreeSet<SystemId> = BTreeSet::new();

    for (&system, &level) in &visible {
        let colony_snapshot = state
            .colony_in_system(system)
            .and_then(|id| state.colonies.get(id))
            .map(|colony| ColonyIntel {
                owner: colony.owner,
                souls: colony.souls,
                infrastructure: colony.infrastructure,
                kastra_count: colony.kastra_ids.len() as u32,
                battery_count: colony
                    .ground_unit_ids
                    .iter()
                    .filter(|&&unit| {
                        state
                            .ground_units
                            .get(unit)
                            .is_some_and(|record| record.class == GroundClass::Battery)
                    })
                    .count() as u32,
                last_turn_updated: turn,
            });
        if let Some(snapshot) = &colony_snapshot {
            if snapshot.owner != house && state.relation(house, snapshot.owner).permits_combat()
            {
                hostile_colony_systems.insert(system);
            }
        }
        let fleet_snapshots: Vec<FleetIntel> = state
            .fleets_in_system(system)
            .into_iter()
            .filter_map(|fleet| state.fleets.get(fleet))
            .filter(|record| record.owner != house)
            .map(|record| FleetIntel {
                owner: record.owner,
                squadron_count: record.squadrons.len() as u32,
                estimated_attack: fleet_ops::operational_attack(state, config, record.id) as u32,
                last_turn_updated: turn,
            })
            .collect();
        rows.push((system, level, colony_snapshot, fleet_snapshots));
    }

    let Some(record) = state.houses.get_mut(house) else {
        return;
    };
    for (system, level, colony, fleets) in rows {
        let row = record.intel.system_mut(system);
        row.visibility = level;
        row.last_scouted_turn = Some(turn);
        row.colony = colony;
        row.fleets = fleets;
    }
    record
        .intel
        .known_enemy_colony_systems
        .extend(hostile_colony_systems);
    // Rows that fell out of sight decay to Scouted; their data stays stale.
    for (system, row) in &mut record.intel.systems {
        if !visible.contains_key(system) && row.visibility != VisibilityLevel::None {
            row.visibility = VisibilityLevel::Scouted;
        }
    }
}

/// Builds one house's snapshot from refreshed intel.
fn project_one(state: &GameState, house: HouseId, events: &[GameEvent]) -> PlayerState {
    let record = state.houses.get(house);

    let colonies: Vec<Colony> = state
        .indexes
        .colonies_by_owner
        .get(&house)
        .map_or_else(Vec::new, |ids| {
            ids.iter()
                .filter_map(|&id| state.colonies.get(id))
                .cloned()
                .collect()
        });
    let fleets: Vec<Fleet> = state
        .indexes
        .fleets_by_owner
        .get(&house)
        .map_or_else(Vec::new, |ids| {
            ids.iter()
                .filter_map(|&id| state.fleets.get(id))
                .cloned()
                .collect()
        });
    let mut squadrons: Vec<Squadron> = Vec::new();
    for fleet in &fleets {
        for &squadron in &fleet.squadrons {
            if let Some(sqn) = state.squadrons.get(squadron) {
                squadrons.push(sqn.clone());
            }
        }
    }
    for colony in &colonies {
        for &squadron in &colony.fighter_squadron_ids {
            if let Some(sqn) = state.squadrons.get(squadron) {
                squadrons.push(sqn.clone());
            }
        }
    }
    let ships: Vec<Ship> = squadrons
        .iter()
        .flat_map(Squadron::ship_ids)
        .filter_map(|ship| state.ships.get(ship))
        .cloned()
        .collect();
    let neorias: Vec<Neoria> = colonies
        .iter()
        .flat_map(|colony| colony.neoria_ids.iter())
        .filter_map(|&id| state.neorias.get(id))
        .cloned()
        .collect();
    let kastras: Vec<Kastra> = colonies
        .iter()
        .flat_map(|colony| colony.kastra_ids.iter())
        .filter_map(|&id| state.kastras.get(id))
        .cloned()
        .collect();
    let ground_units: Vec<GroundUnit> = colonies
        .iter()
        .flat_map(|colony| colony.ground_unit_ids.iter())
        .chain(squadrons.iter().flat_map(|sqn| sqn.marine_unit_ids.iter()))
        .filter_map(|&id| state.ground_units.get(id))
        .cloned()
        .collect();

    let prestige_table: BTreeMap<HouseId, i64> = state
        .houses
        .iter()
        .map(|(id, record)| (id, record.prestige))
        .collect();
    let colony_counts: BTreeMap<HouseId, u32> = state
        .houses
        .iter()
        .map(|(id, _)| {
            let count = state
                .indexes
                .colonies_by_owner
                .get(&id)
                .map_or(0, |ids| ids.len() as u32);
            (id, count)
        })
        .collect();
    let relations: BTreeMap<HouseId, DiploState> = state
        .houses
        .iter()
        .filter(|(id, _)| *id != house)
        .map(|(id, _)| (id, state.relation(house, id)))
        .collect();

    PlayerState {
        house,
        turn: state.turn,
        treasury: record.map_or(0, |r| r.treasury),
        prestige: record.map_or(0, |r| r.prestige),
        tech: record.map(|r| r.tech.clone()).unwrap_or_default(),
        research: record.map(|r| r.research.clone()).unwrap_or_default(),
        map_systems: state
            .systems
            .iter()
            .map(|(id, system)| SystemView {
                id,
                coord: system.coord,
            })
            .collect(),
        map_lanes: state.map.lanes.clone(),
        colonies,
        fleets,
        squadrons,
        ships,
        neorias,
        kastras,
        ground_units,
        intel: record.map(|r| r.intel.clone()).unwrap_or_default(),
        prestige_table,
        colony_counts,
        relations,
        violations: record.map(|r| r.violations.clone()).unwrap_or_default(),
        events: events
            .iter()
            .filter(|event| event.observers.can_see(house))
            .cloned()
            .collect(),
    }
}

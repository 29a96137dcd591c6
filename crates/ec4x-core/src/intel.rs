// SPDX-License-Identifier: Apache-2.0
//! Per-house intelligence databases.
//!
//! Intel rows are snapshots, not live references: they record what a house
//! last observed and when, so clients can render staleness. The engine writes
//! intel during movement (scout arrivals), combat, and the fog-of-war
//! projection; clients may overlay local notes but never write back.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::house::TechLevels;
use crate::ident::{HouseId, SystemId};

/// How well a house currently sees a system.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum VisibilityLevel {
    /// The house owns a colony here.
    Owned,
    /// A house fleet is present.
    Occupied,
    /// Scouted this turn or earlier; data may be stale.
    Scouted,
    /// Adjacent to an owned system.
    Adjacent,
    /// Never observed.
    None,
}

/// Last-known facts about a colony.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColonyIntel {
    /// Colony owner when observed.
    pub owner: HouseId,
    /// Population in souls when observed.
    pub souls: u64,
    /// Infrastructure level when observed.
    pub infrastructure: u32,
    /// Starbases counted in orbit.
    pub kastra_count: u32,
    /// Ground batteries counted planet-side.
    pub battery_count: u32,
    /// Turn this row was refreshed.
    pub last_turn_updated: u32,
}

/// Last-known facts about a fleet sighting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetIntel {
    /// Fleet owner when observed.
    pub owner: HouseId,
    /// Squadrons counted.
    pub squadron_count: u32,
    /// Estimated total attack strength.
    pub estimated_attack: u32,
    /// Turn this row was refreshed.
    pub last_turn_updated: u32,
}

/// Everything a house knows about one system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemIntel {
    /// Turn the system was last scouted, if ever.
    pub last_scouted_turn: Option<u32>,
    /// Visibility classification as of the latest projection.
    pub visibility: VisibilityLevel,
    /// Last-known colony, if one was observed.
    pub colony: Option<ColonyIntel>,
    /// Last-known foreign fleets seen here.
    pub fleets: Vec<FleetIntel>,
}

impl Default for SystemIntel {
    fn default() -> Self {
        Self {
            last_scouted_turn: None,
            visibility: VisibilityLevel::None,
            colony: None,
            fleets: Vec::new(),
        }
    }
}

/// A house's accumulated intelligence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntelDatabase {
    /// Per-system intel rows.
    pub systems: BTreeMap<SystemId, SystemIntel>,
    /// Enemy tech levels learned through espionage, with the turn learned.
    pub known_enemy_tech: BTreeMap<HouseId, (TechLevels, u32)>,
    /// Systems known to contain an enemy colony.
    pub known_enemy_colony_systems: BTreeSet<SystemId>,
}

impl IntelDatabase {
    /// The intel row for `system`, creating an empty one on first touch.
    pub fn system_mut(&mut self, system: SystemId) -> &mut SystemIntel {
        self.systems.entry(system).or_default()
    }

    /// Read-only intel for `system`, if any has been gathered.
    pub fn system(&self, system: SystemId) -> Option<&SystemIntel> {
        self.systems.get(&system)
    }
}

// SPDX-License-Identifier: Apache-2.0
//! Colonies.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use ec4x_rules_schema::{PlanetClass, ResourceRating};

use crate::economy::CapacityViolation;
use crate::ident::{
    ColonyId, ConstructionProjectId, GroundUnitId, HouseId, KastraId, NeoriaId, RepairProjectId,
    SquadronId, SystemId,
};

/// Souls per population unit.
pub const SOULS_PER_PU: u64 = 1_000_000;
/// Souls per population transfer unit.
pub const SOULS_PER_PTU: u64 = 50_000;

/// A colony inside a system, owned by exactly one house.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Colony {
    /// Colony id.
    pub id: ColonyId,
    /// Host system.
    pub system: SystemId,
    /// Owning house.
    pub owner: HouseId,
    /// Population in souls. Population units are derived:
    /// `population_units() == souls / 1_000_000`.
    pub souls: u64,
    /// Infrastructure level.
    pub infrastructure: u32,
    /// Industrial units.
    pub industrial_units: u32,
    /// Habitability of the colonized world.
    pub planet_class: PlanetClass,
    /// Mineral wealth of the colonized world.
    pub resource_rating: ResourceRating,
    /// Tax rate in percent.
    pub tax_percent: u64,
    /// Planetary shield levels.
    pub shield_level: u32,
    /// Whether this is a house homeworld (affects retreat and invasion DRMs).
    pub is_homeworld: bool,
    /// Starbases in orbit.
    pub kastra_ids: Vec<KastraId>,
    /// Production facilities.
    pub neoria_ids: Vec<NeoriaId>,
    /// Garrisoned ground units.
    pub ground_unit_ids: Vec<GroundUnitId>,
    /// Fighter squadrons based planet-side.
    pub fighter_squadron_ids: Vec<SquadronId>,
    /// Colony-level construction queue (fighters, buildings, infrastructure,
    /// industrial investment). One project advances per turn.
    pub build_queue: VecDeque<ConstructionProjectId>,
    /// The colony-level project currently in work.
    pub active_project: Option<ConstructionProjectId>,
    /// Colony-level repair queue awaiting drydock docks.
    pub repair_queue: VecDeque<RepairProjectId>,
    /// Whether a hostile blockade is in force.
    pub blockaded: bool,
    /// Houses enforcing the blockade.
    pub blockaded_by: Vec<HouseId>,
    /// Consecutive turns under blockade.
    pub blockade_turns: u32,
    /// Outstanding capacity violations.
    pub violations: Vec<CapacityViolation>,
    /// Automatically queue repairs for crippled ships in orbit.
    pub auto_repair: bool,
    /// Automatically load marines onto auxiliaries in orbit.
    pub auto_load_marines: bool,
    /// Automatically assign completed fighters to defense squadrons.
    pub auto_load_fighters: bool,
}

impl Colony {
    /// Population units: `souls / 1_000_000`, exact by construction since all
    /// population mutations move whole PTUs.
    #[must_use]
    pub fn population_units(&self) -> u64 {
        self.souls / SOULS_PER_PU
    }

    /// Population in PTUs.
    #[must_use]
    pub fn population_ptu(&self) -> u64 {
        self.souls / SOULS_PER_PTU
    }
}

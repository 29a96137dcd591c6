// SPDX-License-Identifier: Apache-2.0
//! Neorias (spaceport, shipyard, drydock) and kastras (starbases).

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use ec4x_rules_schema::{FacilityRules, TechRules};

use crate::fleet::CombatState;
use crate::ident::{ColonyId, KastraId, NeoriaId};
use crate::project::ProjectId;

/// Neoria specialization.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum NeoriaClass {
    /// Planet-side launch facility; construction only, small, ships cost
    /// double here.
    Spaceport,
    /// Orbital construction yard.
    Shipyard,
    /// Orbital repair yard; repair only.
    Drydock,
}

impl NeoriaClass {
    /// Base dock count from the facility rules.
    #[must_use]
    pub fn base_docks(self, rules: &FacilityRules) -> u32 {
        match self {
            NeoriaClass::Spaceport => rules.spaceport_docks,
            NeoriaClass::Shipyard => rules.shipyard_docks,
            NeoriaClass::Drydock => rules.drydock_docks,
        }
    }

    /// Whether this class runs construction projects (as opposed to repair).
    #[must_use]
    pub fn builds(self) -> bool {
        !matches!(self, NeoriaClass::Drydock)
    }

    /// Whether the facility orbits (true) or sits planet-side (false).
    #[must_use]
    pub fn is_orbital(self) -> bool {
        !matches!(self, NeoriaClass::Spaceport)
    }
}

/// A production facility owned by a colony.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neoria {
    /// Facility id.
    pub id: NeoriaId,
    /// Owning colony.
    pub colony: ColonyId,
    /// Specialization.
    pub class: NeoriaClass,
    /// Damage state; a crippled facility has zero effective docks.
    pub state: CombatState,
    /// Hits accumulated toward the next state transition.
    pub damage: u32,
    /// Projects currently occupying docks.
    pub active: Vec<ProjectId>,
    /// Projects waiting for a free dock, FIFO.
    pub queue: VecDeque<ProjectId>,
}

impl Neoria {
    /// Dock capacity after the construction-tech multiplier and damage.
    ///
    /// `construction_level` is the owner's Construction tech level.
    #[must_use]
    pub fn effective_docks(
        &self,
        facilities: &FacilityRules,
        tech: &TechRules,
        construction_level: u32,
    ) -> u32 {
        if self.state != CombatState::Undamaged {
            return 0;
        }
        let base = self.class.base_docks(facilities);
        base + base * construction_level * tech.construction_dock_bonus_percent / 100
    }
}

/// Starbase: an orbital defensive facility with a combat role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kastra {
    /// Starbase id.
    pub id: KastraId,
    /// Owning colony.
    pub colony: ColonyId,
    /// Damage state.
    pub state: CombatState,
    /// Hits accumulated toward the next state transition.
    pub damage: u32,
}

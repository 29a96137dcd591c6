// SPDX-License-Identifier: Apache-2.0
//! Construction and repair projects.
//!
//! Cost is debited in full when the order is accepted; `turns_remaining`
//! tracks schedule only. Completion commissions the artifact into the right
//! collection; cancellation forfeits the cost.

use serde::{Deserialize, Serialize};

use ec4x_rules_schema::GroundClass;

use crate::facility::NeoriaClass;
use crate::ident::{ColonyId, ConstructionProjectId, NeoriaId, RepairProjectId, ShipId};

/// Either kind of project, for mixed queues and indexes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ProjectId {
    /// A construction project.
    Construction(ConstructionProjectId),
    /// A repair project.
    Repair(RepairProjectId),
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectId::Construction(id) => write!(f, "{id}"),
            ProjectId::Repair(id) => write!(f, "{id}"),
        }
    }
}

/// What a construction project produces. Exactly one specialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildWork {
    /// A ship of the named class, laid down at a dock (or colony-side for
    /// fighters).
    Ship {
        /// Class name, resolved against the ship rules section.
        class: String,
    },
    /// A new neoria at the colony.
    Neoria {
        /// Facility class to erect.
        class: NeoriaClass,
    },
    /// A new starbase in orbit.
    Kastra,
    /// One planetary shield level.
    ShieldLevel,
    /// A ground unit of the named class.
    Ground {
        /// Unit class.
        class: GroundClass,
    },
    /// Industrial-unit investment.
    IndustrialUnits {
        /// Units added on completion.
        count: u32,
    },
    /// One infrastructure level.
    Infrastructure,
}

/// A construction project owned by a colony, optionally bound to a facility
/// dock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructionProject {
    /// Project id.
    pub id: ConstructionProjectId,
    /// Owning colony.
    pub colony: ColonyId,
    /// Dock facility, when the work is dock-built.
    pub facility: Option<NeoriaId>,
    /// Turns until completion; commissioned at zero or below.
    pub turns_remaining: i32,
    /// The artifact under construction.
    pub work: BuildWork,
}

/// A repair project restoring a crippled ship at a drydock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairProject {
    /// Project id.
    pub id: RepairProjectId,
    /// Owning colony.
    pub colony: ColonyId,
    /// Drydock performing the work.
    pub facility: Option<NeoriaId>,
    /// Turns until the hull is restored.
    pub turns_remaining: i32,
    /// The hull under repair.
    pub ship: ShipId,
}

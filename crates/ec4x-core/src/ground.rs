// SPDX-License-Identifier: Apache-2.0
//! Planet-side ground units.

use serde::{Deserialize, Serialize};

use ec4x_rules_schema::GroundClass;

use crate::fleet::CombatState;
use crate::ident::{ColonyId, GroundUnitId, SquadronId};

/// Where a ground unit currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroundLocation {
    /// Garrisoned at a colony.
    Colony(ColonyId),
    /// Embarked aboard a spacelift squadron.
    Embarked(SquadronId),
}

/// One ground-unit formation.
///
/// Damage is tracked per unit: cumulative hits at or above the class DS
/// cripple the unit, and a crippled unit is destroyed by a further half-DS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundUnit {
    /// Unit id.
    pub id: GroundUnitId,
    /// Current location.
    pub location: GroundLocation,
    /// Unit class.
    pub class: GroundClass,
    /// Damage state.
    pub state: CombatState,
    /// Hits accumulated toward the next state transition.
    pub damage: u32,
}

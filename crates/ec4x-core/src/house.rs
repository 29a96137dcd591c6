// SPDX-License-Identifier: Apache-2.0
//! Great houses: treasury, prestige, technology, diplomacy, espionage.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use ec4x_rules_schema::{LimitsRules, TechField};

use crate::economy::CapacityViolation;
use crate::ident::{ColonyId, HouseId, SystemId};
use crate::intel::IntelDatabase;

/// Diplomatic state between a pair of houses.
///
/// Variant order is escalation order; `max` of two states is the more
/// hostile one, which is what combat auto-escalation relies on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum DiploState {
    /// Formal alliance.
    Allied,
    /// Default stance.
    Neutral,
    /// Armed hostility; combat permitted.
    Hostile,
    /// Open war.
    Enemy,
}

impl DiploState {
    /// Whether fleets of the two houses may engage each other.
    #[must_use]
    pub fn permits_combat(self) -> bool {
        matches!(self, DiploState::Hostile | DiploState::Enemy)
    }
}

/// One row of a house's relations table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiploRelation {
    /// Current state.
    pub state: DiploState,
    /// Turn the state last changed.
    pub since_turn: u32,
}

/// Integer tech levels per ladder and field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechLevels {
    /// Economic level.
    pub el: u32,
    /// Science level.
    pub sl: u32,
    /// Per-field technology levels.
    pub fields: BTreeMap<TechField, u32>,
}

impl TechLevels {
    /// Level of a technology field (zero when never researched).
    #[must_use]
    pub fn field(&self, field: TechField) -> u32 {
        self.fields.get(&field).copied().unwrap_or(0)
    }
}

/// Accumulated research points per ladder and field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchProgress {
    /// Toward the next economic level.
    pub el: u64,
    /// Toward the next science level.
    pub sl: u64,
    /// Toward the next level of each field.
    pub fields: BTreeMap<TechField, u64>,
}

/// Per-turn research budget in PP, split by the house.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchAllocation {
    /// PP toward the economic ladder.
    pub el: u32,
    /// PP toward the science ladder.
    pub sl: u32,
    /// PP toward individual technology fields.
    pub fields: BTreeMap<TechField, u32>,
}

impl ResearchAllocation {
    /// Total PP this allocation requests.
    #[must_use]
    pub fn total(&self) -> u64 {
        u64::from(self.el)
            + u64::from(self.sl)
            + self.fields.values().map(|&pp| u64::from(pp)).sum::<u64>()
    }
}

/// Espionage budget pools.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EspionageState {
    /// Espionage budget points available.
    pub ebp: u32,
    /// Counter-intelligence points available.
    pub cip: u32,
}

/// A great house.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct House {
    /// House id.
    pub id: HouseId,
    /// Display name.
    pub name: String,
    /// Treasury in production points. May run negative between turns; debts
    /// carry forward.
    pub treasury: i64,
    /// Prestige. Zero-sum across houses for combat outcomes.
    pub prestige: i64,
    /// Consecutive turns finished with negative prestige.
    pub negative_prestige_turns: u32,
    /// Whether the house has been eliminated.
    pub is_eliminated: bool,
    /// Turn of elimination, if eliminated.
    pub eliminated_turn: Option<u32>,
    /// Homeworld colony, while it stands.
    pub homeworld: Option<ColonyId>,
    /// Technology levels.
    pub tech: TechLevels,
    /// Research accumulated toward next levels.
    pub research: ResearchProgress,
    /// Standing research budget split, replaced by order packets.
    pub allocation: ResearchAllocation,
    /// Relations with every other house.
    pub relations: BTreeMap<HouseId, DiploRelation>,
    /// Accumulated intelligence.
    pub intel: IntelDatabase,
    /// Espionage pools.
    pub espionage: EspionageState,
    /// Outstanding capacity violations (C2 pool).
    pub violations: Vec<CapacityViolation>,
    /// Pre-planned retreat destinations, best first.
    pub fallback_destinations: Vec<SystemId>,
    /// Turn the fallback routes were last refreshed.
    pub fallback_refreshed_turn: u32,
}

impl House {
    /// Diplomatic state toward `other`; houses start Neutral.
    #[must_use]
    pub fn relation_with(&self, other: HouseId) -> DiploState {
        self.relations
            .get(&other)
            .map_or(DiploState::Neutral, |r| r.state)
    }

    /// Morale modifier from prestige, applied to CER and effective ROE.
    #[must_use]
    pub fn morale_modifier(&self) -> i32 {
        if self.prestige >= 100 {
            1
        } else if self.prestige < 0 {
            -1
        } else {
            0
        }
    }

    /// C2 command pool: base plus the science-level bonus.
    #[must_use]
    pub fn c2_pool(&self, limits: &LimitsRules) -> u32 {
        limits.c2_base + limits.c2_per_sl * self.tech.sl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escalation_is_the_max_of_two_states() {
        assert_eq!(
            DiploState::Neutral.max(DiploState::Hostile),
            DiploState::Hostile
        );
        assert_eq!(DiploState::Enemy.max(DiploState::Hostile), DiploState::Enemy);
        assert_eq!(
            DiploState::Allied.max(DiploState::Neutral),
            DiploState::Neutral
        );
    }

    #[test]
    fn neutral_does_not_permit_combat() {
        assert!(!DiploState::Neutral.permits_combat());
        assert!(DiploState::Hostile.permits_combat());
        assert!(DiploState::Enemy.permits_combat());
    }
}

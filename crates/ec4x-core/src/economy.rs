// SPDX-License-Identifier: Apache-2.0
//! Economic primitives: colony output, capacity violations.
//!
//! Pure calculations only; the economy phase applies them to the world.

use serde::{Deserialize, Serialize};

use ec4x_rules_schema::EconomyRules;

use crate::colony::Colony;

/// What a capacity violation is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationKind {
    /// House-level C2 command pool exceeded by active fleets.
    CommandPool,
}

/// A recorded capacity violation with a cure window.
///
/// If the grace period expires without the overage being cured, units are
/// forcibly scrapped until the house is back within the pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityViolation {
    /// Violation category.
    pub kind: ViolationKind,
    /// Size of the overage when last measured.
    pub severity: u32,
    /// Turns left to cure before forced scrapping.
    pub grace_turns_remaining: u32,
    /// Turn the violation was first recorded.
    pub noted_turn: u32,
}

/// Gross colony output in PP before tax and penalties.
///
/// Population and industry earn base output, scaled by planet class,
/// resource rating, infrastructure, and the owner's economic level.
pub fn gross_colony_output(colony: &Colony, rules: &EconomyRules, el_level: u32) -> u64 {
    let base = colony.population_units() * rules.output_per_population_unit
        + u64::from(colony.industrial_units) * rules.output_per_industrial_unit;
    let scaled = base * colony.planet_class.output_percent() / 100
        * colony.resource_rating.output_percent() / 100;
    let infra = 100 + u64::from(colony.infrastructure) * rules.infrastructure_bonus_percent;
    let el = 100 + u64::from(el_level) * rules.el_bonus_percent;
    scaled * infra / 100 * el / 100
}

/// Net treasury income from a colony: gross output under tax, reduced by the
/// blockade penalty when the colony is blockaded.
pub fn net_colony_income(colony: &Colony, rules: &EconomyRules, el_level: u32) -> u64 {
    let gross = gross_colony_output(colony, rules, el_level);
    let taxed = gross * colony.tax_percent / 100;
    if colony.blockaded {
        taxed * (100 - rules.blockade_penalty_percent) / 100
    } else {
        taxed
    }
}

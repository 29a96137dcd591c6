// SPDX-License-Identifier: Apache-2.0
//! Engine configuration.
//!
//! All rules are explicit values threaded in at construction — no process
//! globals. Reloading produces a new `GameConfig`; running games keep the
//! value they were built with and only new games observe the reload.

use serde::{Deserialize, Serialize};

use ec4x_rules_schema::{
    GroundClass, GroundUnitSpec, RulesSections, RulesSnapshot, SchemaError, ShipSpec,
};

/// New-game parameters (the `game_setup` document).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupConfig {
    /// Starting treasury in PP.
    pub starting_treasury: i64,
    /// Homeworld population in population units.
    pub homeworld_population_pu: u64,
    /// Homeworld infrastructure level.
    pub homeworld_infrastructure: u32,
    /// Homeworld industrial units.
    pub homeworld_industrial_units: u32,
    /// Ground batteries dug in at the homeworld.
    pub homeworld_batteries: u32,
    /// Garrison armies at the homeworld.
    pub homeworld_armies: u32,
    /// Marine formations at the homeworld.
    pub homeworld_marines: u32,
    /// Combat hulls of the starting fleet, flagship first.
    pub starting_combat_ships: Vec<String>,
    /// Expansion hulls of the starting fleet (the colonization train).
    pub starting_expansion_ships: Vec<String>,
    /// Starting prestige.
    pub starting_prestige: i64,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            starting_treasury: 400,
            homeworld_population_pu: 20,
            homeworld_infrastructure: 3,
            homeworld_industrial_units: 15,
            homeworld_batteries: 2,
            homeworld_armies: 3,
            homeworld_marines: 2,
            starting_combat_ships: vec![
                "Cruiser".to_owned(),
                "Destroyer".to_owned(),
                "Corvette".to_owned(),
                "Corvette".to_owned(),
            ],
            starting_expansion_ships: vec!["Etac".to_owned(), "Transport".to_owned()],
            starting_prestige: 50,
        }
    }
}

/// The full engine configuration: rule sections plus setup parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Rule sections shared with clients through the rules snapshot.
    pub sections: RulesSections,
    /// Engine-side setup parameters (not part of the client payload).
    pub setup: SetupConfig,
}

impl GameConfig {
    /// The standard ruleset.
    #[must_use]
    pub fn standard() -> Self {
        Self::default()
    }

    /// Looks up a ship class.
    #[must_use]
    pub fn ship_spec(&self, class: &str) -> Option<&ShipSpec> {
        self.sections.ships.classes.get(class)
    }

    /// Looks up a ground-unit class.
    #[must_use]
    pub fn ground_spec(&self, class: GroundClass) -> Option<&GroundUnitSpec> {
        self.sections.ground_units.classes.get(&class)
    }

    /// Builds the hashed rules payload for clients.
    pub fn rules_snapshot(&self) -> Result<RulesSnapshot, SchemaError> {
        RulesSnapshot::new(self.sections.clone())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn standard_config_contains_the_scenario_classes() {
        let config = GameConfig::standard();
        for class in ["Corvette", "Cruiser", "Battleship", "Raider", "Etac", "Transport"] {
            assert!(config.ship_spec(class).is_some(), "missing {class}");
        }
    }

    #[test]
    fn rules_snapshot_verifies() {
        let config = GameConfig::standard();
        config.rules_snapshot().unwrap().verify().unwrap();
    }
}

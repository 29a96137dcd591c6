// SPDX-License-Identifier: Apache-2.0
//! New-game construction: map, houses, homeworlds, starting forces.

use std::collections::BTreeMap;

use crate::colony::{Colony, SOULS_PER_PU};
use crate::config::GameConfig;
use crate::facility::NeoriaClass;
use crate::fleet::SquadronHome;
use crate::house::{EspionageState, House, ResearchAllocation, ResearchProgress, TechLevels};
use crate::ident::{HouseId, IdCounters, SystemId};
use crate::intel::VisibilityLevel;
use crate::map;
use crate::ops::{facility_ops, fleet_ops, squadron_ops};
use crate::prng::{phase_seed, Prng};
use crate::state::{GameState, Indexes};
use crate::store::Table;

/// House names assigned in seat order.
const HOUSE_NAMES: [&str; 12] = [
    "House Alba", "House Boreas", "House Castor", "House Draco", "House Eos", "House Fornax",
    "House Gyre", "House Helix", "House Icarus", "House Jovan", "House Kraken", "House Lyra",
];

/// Why a game could not be created.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SetupError {
    /// EC4X needs at least two houses.
    #[error("player count {0} below minimum of 2")]
    TooFewPlayers(u32),
    /// More seats than the map generator supports.
    #[error("player count {0} above maximum of 12")]
    TooManyPlayers(u32),
}

/// Builds a fresh game for `players` houses from `seed`.
///
/// Each house gets a homeworld colony (population, infrastructure,
/// industry, garrison, batteries), a spaceport, a shipyard, a drydock, a
/// starbase, a combat fleet, and a colonization train. All pairs start
/// Neutral.
pub fn new_game(config: &GameConfig, players: u32, seed: u64) -> Result<GameState, SetupError> {
    if players < 2 {
        return Err(SetupError::TooFewPlayers(players));
    }
    if players > 12 {
        return Err(SetupError::TooManyPlayers(players));
    }

    let mut counters = IdCounters::default();
    let mut systems = Table::new();
    let mut prng = Prng::from_seed_u64(phase_seed(seed, 0, None, "setup"));
    let (star_map, homeworld_sites) =
        map::generate(&mut counters, &mut systems, players, &mut prng);

    let mut state = GameState {
        turn: 0,
        base_seed: seed,
        counters,
        map: star_map,
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
    };

    for (seat, &site) in homeworld_sites.iter().enumerate() {
        let house_id = state.counters.next_house();
        state.houses.add(
            house_id,
            House {
                id: house_id,
                name: HOUSE_NAMES
                    .get(seat)
                    .copied()
                    .unwrap_or("House Ultima")
                    .to_owned(),
                treasury: config.setup.starting_treasury,
                prestige: config.setup.starting_prestige,
                negative_prestige_turns: 0,
                is_eliminated: false,
                eliminated_turn: None,
                homeworld: None,
                tech: TechLevels::default(),
                research: ResearchProgress::default(),
                allocation: ResearchAllocation::default(),
                relations: BTreeMap::new(),
                intel: crate::intel::IntelDatabase::default(),
                espionage: EspionageState::default(),
                violations: Vec::new(),
                fallback_destinations: Vec::new(),
                fallback_refreshed_turn: 0,
            },
        );
        found_homeworld(&mut state, config, house_id, site);
    }
    Ok(state)
}

fn found_homeworld(state: &mut GameState, config: &GameConfig, house: HouseId, site: SystemId) {
    let setup = &config.setup;
    let colony_id = state.counters.next_colony();
    let (planet_class, resource_rating) = state
        .systems
        .get(site)
        .map(|system| (system.planet_class, system.resource_rating))
        .unwrap_or((
            ec4x_rules_schema::PlanetClass::Habitable,
            ec4x_rules_schema::ResourceRating::Normal,
        ));
    state.colonies.add(
        colony_id,
        Colony {
            id: colony_id,
            system: site,
            owner: house,
            souls: setup.homeworld_population_pu * SOULS_PER_PU,
            infrastructure: setup.homeworld_infrastructure,
            industrial_units: setup.homeworld_industrial_units,
            planet_class,
            resource_rating,
            tax_percent: config.sections.economy.default_tax_percent,
            shield_level: 1,
            is_homeworld: true,
            kastra_ids: Vec::new(),
            neoria_ids: Vec::new(),
            ground_unit_ids: Vec::new(),
            fighter_squadron_ids: Vec::new(),
            build_queue: std::collections::VecDeque::new(),
            active_project: None,
            repair_queue: std::collections::VecDeque::new(),
            blockaded: false,
            blockaded_by: Vec::new(),
            blockade_turns: 0,
            violations: Vec::new(),
            auto_repair: false,
            auto_load_marines: false,
            auto_load_fighters: false,
        },
    );
    if let Some(system) = state.systems.get_mut(site) {
        system.colony = Some(colony_id);
    }
    crate::state::index_insert(&mut state.indexes.colonies_by_owner, house, colony_id);
    state.indexes.colonies_by_system.insert(site, colony_id);
    if let Some(record) = state.houses.get_mut(house) {
        record.homeworld = Some(colony_id);
    }

    // The industrial base every homeworld starts with.
    facility_ops::create_neoria(state, colony_id, NeoriaClass::Spaceport);
    facility_ops::create_neoria(state, colony_id, NeoriaClass::Shipyard);
    facility_ops::create_neoria(state, colony_id, NeoriaClass::Drydock);
    facility_ops::create_kastra(state, colony_id);
    for _ in 0..config.setup.homeworld_batteries {
        facility_ops::create_ground_unit(state, colony_id, ec4x_rules_schema::GroundClass::Battery);
    }
    for _ in 0..config.setup.homeworld_armies {
        facility_ops::create_ground_unit(state, colony_id, ec4x_rules_schema::GroundClass::Army);
    }
    for _ in 0..config.setup.homeworld_marines {
        facility_ops::create_ground_unit(state, colony_id, ec4x_rules_schema::GroundClass::Marine);
    }

    // Combat fleet.
    if !config.setup.starting_combat_ships.is_empty() {
        let fleet = fleet_ops::create_fleet(state, house, site);
        let classes: Vec<&str> = config
            .setup
            .starting_combat_ships
            .iter()
            .map(String::as_str)
            .collect();
        squadron_ops::create_squadron(state, config, SquadronHome::Fleet(fleet), &classes);
    }
    // Colonization train: each hull its own squadron, one fleet.
    if !config.setup.starting_expansion_ships.is_empty() {
        let fleet = fleet_ops::create_fleet(state, house, site);
        for class in &config.setup.starting_expansion_ships {
            squadron_ops::create_squadron(
                state,
                config,
                SquadronHome::Fleet(fleet),
                &[class.as_str()],
            );
        }
    }

    // The house knows its own ground from day one.
    if let Some(record) = state.houses.get_mut(house) {
        let row = record.intel.system_mut(site);
        row.visibility = VisibilityLevel::Owned;
        row.last_scouted_turn = Some(0);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn two_house_game_builds_a_full_start() {
        let config = GameConfig::standard();
        let state = new_game(&config, 2, 42).unwrap();
        assert_eq!(state.houses.len(), 2);
        assert_eq!(state.colonies.len(), 2);
        assert_eq!(state.systems.len(), 19);
        for (_, colony) in state.colonies.iter() {
            assert!(colony.is_homeworld);
            assert_eq!(colony.neoria_ids.len(), 3);
            assert_eq!(colony.kastra_ids.len(), 1);
        }
        // One combat fleet and one colonization train per house.
        assert_eq!(state.fleets.len(), 4);
    }

    #[test]
    fn player_count_is_validated() {
        let config = GameConfig::standard();
        assert_eq!(new_game(&config, 1, 1), Err(SetupError::TooFewPlayers(1)));
        assert_eq!(new_game(&config, 13, 1), Err(SetupError::TooManyPlayers(13)));
    }

    #[test]
    fn same_seed_builds_identical_games() {
        let config = GameConfig::standard();
        let a = new_game(&config, 3, 7).unwrap();
        let b = new_game(&config, 3, 7).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.digest().unwrap(), b.digest().unwrap());
    }
}

// SPDX-License-Identifier: Apache-2.0
//! Zero-turn administrative commands.
//!
//! These execute synchronously at submission (and are re-validated when a
//! packet is replayed): fleet detach/transfer/merge, squadron formation and
//! assignment, cargo loading. Every command requires the subject fleet to
//! sit at a friendly colony, validates in layers — ownership, then location,
//! then command-specific rules — and returns a structured outcome without
//! touching state on rejection.

use serde::{Deserialize, Serialize};

use crate::colony::{SOULS_PER_PTU, SOULS_PER_PU};
use crate::config::GameConfig;
use crate::fleet::{FleetStatus, SquadronHome, SquadronKind};
use crate::ground::GroundLocation;
use crate::house::DiploState;
use crate::ident::{ColonyId, FleetId, GroundUnitId, HouseId, ShipId, SquadronId};
use crate::ops::{fleet_ops, squadron_ops};
use crate::state::{index_insert, index_remove, GameState};

/// Fleet-level admin commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FleetCommand {
    /// Split the listed squadrons into a new fleet at the same system.
    Detach {
        /// Fleet to split.
        fleet: FleetId,
        /// Squadrons to take along.
        squadrons: Vec<SquadronId>,
    },
    /// Fold `source` into `target`.
    Merge {
        /// Fleet that disappears.
        source: FleetId,
        /// Fleet that absorbs it.
        target: FleetId,
    },
    /// Move one squadron to another fleet in the same system.
    TransferSquadron {
        /// Squadron to move.
        squadron: SquadronId,
        /// Receiving fleet.
        to: FleetId,
    },
    /// Change readiness status.
    SetStatus {
        /// Fleet to change.
        fleet: FleetId,
        /// New status.
        status: FleetStatus,
    },
    /// Change rules of engagement.
    SetRoe {
        /// Fleet to change.
        fleet: FleetId,
        /// New ROE, `0..=10`.
        roe: u8,
    },
}

/// Squadron-level admin commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SquadronCommand {
    /// Regroup existing ships of one fleet into a new squadron; the first
    /// ship becomes flagship.
    Form {
        /// Fleet whose ships regroup.
        fleet: FleetId,
        /// Ships, flagship first.
        ships: Vec<ShipId>,
    },
    /// Move one ship into a squadron as an escort. Command-rating overflow
    /// is force-allowed and flagged rather than losing the hull.
    AssignShip {
        /// Receiving squadron.
        squadron: SquadronId,
        /// Ship to assign.
        ship: ShipId,
    },
}

/// Cargo admin commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CargoCommand {
    /// Embark garrisoned marine units onto an auxiliary squadron.
    LoadMarines {
        /// Receiving squadron.
        squadron: SquadronId,
        /// Units to embark.
        units: Vec<GroundUnitId>,
    },
    /// Disembark every marine aboard to the local colony garrison.
    UnloadMarines {
        /// Squadron to empty.
        squadron: SquadronId,
    },
    /// Embark colonists (PTUs) onto an expansion squadron.
    LoadColonists {
        /// Receiving squadron.
        squadron: SquadronId,
        /// PTUs requested.
        ptu: u32,
    },
    /// Disembark every colonist aboard into the local colony.
    UnloadColonists {
        /// Squadron to empty.
        squadron: SquadronId,
    },
}

/// Why a command was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum CommandError {
    /// No such fleet.
    #[error("unknown fleet")]
    UnknownFleet,
    /// No such squadron.
    #[error("unknown squadron")]
    UnknownSquadron,
    /// No such ship.
    #[error("unknown ship")]
    UnknownShip,
    /// No such ground unit.
    #[error("unknown ground unit")]
    UnknownGroundUnit,
    /// The subject is not owned by the commanding house.
    #[error("not your command")]
    NotYours,
    /// The fleet is not at a friendly colony.
    #[error("fleet is not at a friendly colony")]
    NotAtFriendlyColony,
    /// Merge source and target are the same fleet.
    #[error("source and target are the same fleet")]
    SourceEqualsTarget,
    /// The fleets are not in the same system.
    #[error("fleets are in different systems")]
    DifferentSystems,
    /// Intel squadrons may not mix with non-Intel squadrons.
    #[error("intel squadrons may not mix with combat formations")]
    CompositionViolation,
    /// A detachment may not consist of spacelift squadrons alone.
    #[error("spacelift cannot detach without escort")]
    SpaceliftNeedsEscort,
    /// The squadron cannot carry that cargo.
    #[error("squadron cannot carry that cargo")]
    WrongCargoKind,
    /// Cargo exceeds the squadron's capacity.
    #[error("cargo capacity exceeded")]
    CargoCapacityExceeded,
    /// ROE must be 0..=10.
    #[error("invalid rules of engagement")]
    InvalidRoe,
    /// The listed ships do not all belong to the subject fleet.
    #[error("ship is not part of the fleet")]
    ShipNotInFleet,
}

/// Structured side-notes attached to a successful command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandWarning {
    /// Escort command cost now exceeds the flagship's rating.
    CommandOverflow {
        /// Overloaded squadron.
        squadron: SquadronId,
        /// Cost in excess of the rating.
        excess: u32,
    },
    /// The colony was at its population floor; fewer PTUs were loaded than
    /// requested (possibly zero).
    PopulationFloor {
        /// PTUs requested.
        requested: u32,
        /// PTUs actually loaded.
        loaded: u32,
    },
}

/// Result of a zero-turn command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutcome {
    /// Whether the command took effect.
    pub success: bool,
    /// Rejection reason when it did not.
    pub error: Option<CommandError>,
    /// Fleet created by the command, if any.
    pub new_fleet: Option<FleetId>,
    /// Squadron created by the command, if any.
    pub new_squadron: Option<SquadronId>,
    /// Side-notes on a successful command.
    pub warnings: Vec<CommandWarning>,
}

impl CommandOutcome {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            new_fleet: None,
            new_squadron: None,
            warnings: Vec::new(),
        }
    }

    fn fail(error: CommandError) -> Self {
        Self {
            success: false,
            error: Some(error),
            new_fleet: None,
            new_squadron: None,
            warnings: Vec::new(),
        }
    }
}

/// The colony at the fleet's system, provided it is friendly to `house`
/// (owned or allied).
fn friendly_colony_at(state: &GameState, house: HouseId, fleet: FleetId) -> Option<ColonyId> {
    let record = state.fleets.get(fleet)?;
    let colony_id = state.colony_in_system(record.system)?;
    let colony = state.colonies.get(colony_id)?;
    let friendly = colony.owner == house
        || state.relation(house, colony.owner) == DiploState::Allied;
    friendly.then_some(colony_id)
}

fn owned_fleet(state: &GameState, house: HouseId, fleet: FleetId) -> Result<(), CommandError> {
    let record = state.fleets.get(fleet).ok_or(CommandError::UnknownFleet)?;
    if record.owner != house {
        return Err(CommandError::NotYours);
    }
    Ok(())
}

fn fleet_kinds(state: &GameState, fleet: FleetId) -> Vec<SquadronKind> {
    state.fleets.get(fleet).map_or_else(Vec::new, |record| {
        record
            .squadrons
            .iter()
            .filter_map(|&squadron| state.squadrons.get(squadron))
            .map(|sqn| sqn.kind)
            .collect()
    })
}

/// Executes a fleet admin command for `house`.
pub fn execute_fleet_command(
    state: &mut GameState,
    config: &GameConfig,
    house: HouseId,
    command: &FleetCommand,
) -> CommandOutcome {
    match command {
        FleetCommand::Detach { fleet, squadrons } => {
            detach_fleet(state, house, *fleet, squadrons)
        }
        FleetCommand::Merge { source, target } => merge_fleets(state, house, *source, *target),
        FleetCommand::TransferSquadron { squadron, to } => {
            transfer_squadron(state, house, *squadron, *to)
        }
        FleetCommand::SetStatus { fleet, status } => {
            if let Err(error) = owned_fleet(state, house, *fleet) {
                return CommandOutcome::fail(error);
            }
            if friendly_colony_at(state, house, *fleet).is_none() {
                return CommandOutcome::fail(CommandError::NotAtFriendlyColony);
            }
            if let Some(record) = state.fleets.get_mut(*fleet) {
                record.status = *status;
            }
            CommandOutcome::ok()
        }
        FleetCommand::SetRoe { fleet, roe } => {
            if let Err(error) = owned_fleet(state, house, *fleet) {
                return CommandOutcome::fail(error);
            }
            if *roe > 10 {
                return CommandOutcome::fail(CommandError::InvalidRoe);
            }
            if let Some(record) = state.fleets.get_mut(*fleet) {
                record.roe = *roe;
            }
            let _ = config;
            CommandOutcome::ok()
        }
    }
}

fn detach_fleet(
    state: &mut GameState,
    house: HouseId,
    fleet: FleetId,
    squadrons: &[SquadronId],
) -> CommandOutcome {
    if let Err(error) = owned_fleet(state, house, fleet) {
        return CommandOutcome::fail(error);
    }
    if friendly_colony_at(state, house, fleet).is_none() {
        return CommandOutcome::fail(CommandError::NotAtFriendlyColony);
    }
    let Some(record) = state.fleets.get(fleet) else {
        return CommandOutcome::fail(CommandError::UnknownFleet);
    };
    let system = record.system;
    if squadrons.is_empty()
        || !squadrons.iter().all(|s| record.squadrons.contains(s))
    {
        return CommandOutcome::fail(CommandError::UnknownSquadron);
    }
    let all_spacelift = squadrons.iter().all(|&squadron| {
        state
            .squadrons
            .get(squadron)
            .is_some_and(crate::fleet::Squadron::is_spacelift)
    });
    if all_spacelift {
        return CommandOutcome::fail(CommandError::SpaceliftNeedsEscort);
    }
    let new_fleet = fleet_ops::create_fleet(state, house, system);
    for &squadron in squadrons {
        squadron_ops::transfer_squadron(state, squadron, new_fleet);
    }
    let mut outcome = CommandOutcome::ok();
    outcome.new_fleet = Some(new_fleet);
    outcome
}

fn merge_fleets(
    state: &mut GameState,
    house: HouseId,
    source: FleetId,
    target: FleetId,
) -> CommandOutcome {
    if source == target {
        return CommandOutcome::fail(CommandError::SourceEqualsTarget);
    }
    for fleet in [source, target] {
        if let Err(error) = owned_fleet(state, house, fleet) {
            return CommandOutcome::fail(error);
        }
    }
    let (source_system, target_system) = match (state.fleets.get(source), state.fleets.get(target))
    {
        (Some(a), Some(b)) => (a.system, b.system),
        _ => return CommandOutcome::fail(CommandError::UnknownFleet),
    };
    if source_system != target_system {
        return CommandOutcome::fail(CommandError::DifferentSystems);
    }
    if friendly_colony_at(state, house, source).is_none() {
        return CommandOutcome::fail(CommandError::NotAtFriendlyColony);
    }
    let target_kinds = fleet_kinds(state, target);
    for kind in fleet_kinds(state, source) {
        if !squadron_ops::composition_allows(&target_kinds, kind) {
            return CommandOutcome::fail(CommandError::CompositionViolation);
        }
    }
    fleet_ops::merge_fleets(state, source, target);
    CommandOutcome::ok()
}

fn transfer_squadron(
    state: &mut GameState,
    house: HouseId,
    squadron: SquadronId,
    to: FleetId,
) -> CommandOutcome {
    let Some(record) = state.squadrons.get(squadron) else {
        return CommandOutcome::fail(CommandError::UnknownSquadron);
    };
    let SquadronHome::Fleet(from) = record.home else {
        return CommandOutcome::fail(CommandError::UnknownSquadron);
    };
    let kind = record.kind;
    for fleet in [from, to] {
        if let Err(error) = owned_fleet(state, house, fleet) {
            return CommandOutcome::fail(error);
        }
    }
    let (from_system, to_system) = match (state.fleets.get(from), state.fleets.get(to)) {
        (Some(a), Some(b)) => (a.system, b.system),
        _ => return CommandOutcome::fail(CommandError::UnknownFleet),
    };
    if from_system != to_system {
        return CommandOutcome::fail(CommandError::DifferentSystems);
    }
    if friendly_colony_at(state, house, from).is_none() {
        return CommandOutcome::fail(CommandError::NotAtFriendlyColony);
    }
    if !squadron_ops::composition_allows(&fleet_kinds(state, to), kind) {
        return CommandOutcome::fail(CommandError::CompositionViolation);
    }
    squadron_ops::transfer_squadron(state, squadron, to);
    CommandOutcome::ok()
}

/// Executes a squadron admin command for `house`.
pub fn execute_squadron_command(
    state: &mut GameState,
    config: &GameConfig,
    house: HouseId,
    command: &SquadronCommand,
) -> CommandOutcome {
    match command {
        SquadronCommand::Form { fleet, ships } => form_squadron(state, config, house, *fleet, ships),
        SquadronCommand::AssignShip { squadron, ship } => {
            assign_ship(state, config, house, *squadron, *ship)
        }
    }
}

fn form_squadron(
    state: &mut GameState,
    config: &GameConfig,
    house: HouseId,
    fleet: FleetId,
    ships: &[ShipId],
) -> CommandOutcome {
    if let Err(error) = owned_fleet(state, house, fleet) {
        return CommandOutcome::fail(error);
    }
    if friendly_colony_at(state, house, fleet).is_none() {
        return CommandOutcome::fail(CommandError::NotAtFriendlyColony);
    }
    let Some(&flagship) = ships.first() else {
        return CommandOutcome::fail(CommandError::UnknownShip);
    };
    // Every ship must already fly with this fleet.
    let fleet_squadrons = match state.fleets.get(fleet) {
        Some(record) => record.squadrons.clone(),
        None => return CommandOutcome::fail(CommandError::UnknownFleet),
    };
    for &ship in ships {
        let Some(hull) = state.ships.get(ship) else {
            return CommandOutcome::fail(CommandError::UnknownShip);
        };
        if !fleet_squadrons.contains(&hull.squadron) {
            return CommandOutcome::fail(CommandError::ShipNotInFleet);
        }
    }
    let kind = match state
        .ships
        .get(flagship)
        .and_then(|hull| config.ship_spec(&hull.class))
    {
        Some(spec) => spec.role,
        None => return CommandOutcome::fail(CommandError::UnknownShip),
    };
    if !squadron_ops::composition_allows(&fleet_kinds(state, fleet), kind) {
        return CommandOutcome::fail(CommandError::CompositionViolation);
    }

    // Pull the ships out of their old squadrons, then stand up the new one.
    let squadron_id = state.counters.next_squadron();
    for &ship in ships {
        detach_ship_from_squadron(state, ship);
    }
    state.squadrons.add(
        squadron_id,
        crate::fleet::Squadron {
            id: squadron_id,
            home: SquadronHome::Fleet(fleet),
            kind,
            flagship,
            escorts: ships[1..].to_vec(),
            marine_unit_ids: Vec::new(),
            colonists_ptu: 0,
        },
    );
    for &ship in ships {
        if let Some(hull) = state.ships.get_mut(ship) {
            hull.squadron = squadron_id;
        }
        index_insert(&mut state.indexes.ships_by_squadron, squadron_id, ship);
    }
    if let Some(record) = state.fleets.get_mut(fleet) {
        record.squadrons.push(squadron_id);
    }

    let mut outcome = CommandOutcome::ok();
    outcome.new_squadron = Some(squadron_id);
    let excess = squadron_ops::command_overflow(state, config, squadron_id);
    if excess > 0 {
        outcome.warnings.push(CommandWarning::CommandOverflow {
            squadron: squadron_id,
            excess,
        });
    }
    outcome
}

/// Removes a ship from its current squadron without touching the ship row,
/// dissolving the squadron when the ship was its last hull.
fn detach_ship_from_squadron(state: &mut GameState, ship: ShipId) {
    let Some(squadron) = state.ships.get(ship).map(|hull| hull.squadron) else {
        return;
    };
    index_remove(&mut state.indexes.ships_by_squadron, squadron, ship);
    let Some(record) = state.squadrons.get_mut(squadron) else {
        return;
    };
    if record.flagship == ship {
        if record.escorts.is_empty() {
            // Last hull out; the empty shell is dissolved (cargo with it).
            squadron_dissolve_empty(state, squadron);
        } else {
            record.flagship = record.escorts.remove(0);
        }
    } else {
        record.escorts.retain(|&s| s != ship);
    }
}

fn squadron_dissolve_empty(state: &mut GameState, squadron: SquadronId) {
    let Some(record) = state.squadrons.remove(squadron) else {
        return;
    };
    for unit in record.marine_unit_ids {
        state.ground_units.remove(unit);
    }
    match record.home {
        SquadronHome::Fleet(fleet) => {
            if let Some(f) = state.fleets.get_mut(fleet) {
                f.squadrons.retain(|&s| s != squadron);
            }
        }
        SquadronHome::Colony(colony) => {
            if let Some(c) = state.colonies.get_mut(colony) {
                c.fighter_squadron_ids.retain(|&s| s != squadron);
            }
        }
    }
}

fn assign_ship(
    state: &mut GameState,
    config: &GameConfig,
    house: HouseId,
    squadron: SquadronId,
    ship: ShipId,
) -> CommandOutcome {
    let Some(record) = state.squadrons.get(squadron) else {
        return CommandOutcome::fail(CommandError::UnknownSquadron);
    };
    let SquadronHome::Fleet(fleet) = record.home else {
        return CommandOutcome::fail(CommandError::UnknownSquadron);
    };
    if let Err(error) = owned_fleet(state, house, fleet) {
        return CommandOutcome::fail(error);
    }
    if friendly_colony_at(state, house, fleet).is_none() {
        return CommandOutcome::fail(CommandError::NotAtFriendlyColony);
    }
    let Some(hull) = state.ships.get(ship) else {
        return CommandOutcome::fail(CommandError::UnknownShip);
    };
    let old_squadron = hull.squadron;
    let in_same_fleet = state
        .fleets
        .get(fleet)
        .is_some_and(|record| record.squadrons.contains(&old_squadron));
    if !in_same_fleet {
        return CommandOutcome::fail(CommandError::ShipNotInFleet);
    }
    detach_ship_from_squadron(state, ship);
    if let Some(record) = state.squadrons.get_mut(squadron) {
        record.escorts.push(ship);
    }
    if let Some(hull) = state.ships.get_mut(ship) {
        hull.squadron = squadron;
    }
    index_insert(&mut state.indexes.ships_by_squadron, squadron, ship);

    let mut outcome = CommandOutcome::ok();
    let excess = squadron_ops::command_overflow(state, config, squadron);
    if excess > 0 {
        outcome
            .warnings
            .push(CommandWarning::CommandOverflow { squadron, excess });
    }
    outcome
}

/// Executes a cargo admin command for `house`.
pub fn execute_cargo_command(
    state: &mut GameState,
    config: &GameConfig,
    house: HouseId,
    command: &CargoCommand,
) -> CommandOutcome {
    let squadron = match command {
        CargoCommand::LoadMarines { squadron, .. }
        | CargoCommand::UnloadMarines { squadron }
        | CargoCommand::LoadColonists { squadron, .. }
        | CargoCommand::UnloadColonists { squadron } => *squadron,
    };
    let Some(record) = state.squadrons.get(squadron) else {
        return CommandOutcome::fail(CommandError::UnknownSquadron);
    };
    let SquadronHome::Fleet(fleet) = record.home else {
        return CommandOutcome::fail(CommandError::WrongCargoKind);
    };
    if let Err(error) = owned_fleet(state, house, fleet) {
        return CommandOutcome::fail(error);
    }
    let Some(colony) = friendly_colony_at(state, house, fleet) else {
        return CommandOutcome::fail(CommandError::NotAtFriendlyColony);
    };
    match command {
        CargoCommand::LoadMarines { units, .. } => load_marines(state, config, squadron, colony, units),
        CargoCommand::UnloadMarines { .. } => unload_marines(state, squadron, colony),
        CargoCommand::LoadColonists { ptu, .. } => {
            load_colonists(state, config, squadron, colony, *ptu)
        }
        CargoCommand::UnloadColonists { .. } => unload_colonists(state, squadron, colony),
    }
}

fn squadron_capacity(
    state: &GameState,
    config: &GameConfig,
    squadron: SquadronId,
    marines: bool,
) -> u32 {
    state.squadrons.get(squadron).map_or(0, |record| {
        record
            .ship_ids()
            .iter()
            .filter_map(|&ship| state.ships.get(ship))
            .filter_map(|hull| config.ship_spec(&hull.class))
            .map(|spec| if marines { spec.carry_marines } else { spec.carry_ptu })
            .sum()
    })
}

fn load_marines(
    state: &mut GameState,
    config: &GameConfig,
    squadron: SquadronId,
    colony: ColonyId,
    units: &[GroundUnitId],
) -> CommandOutcome {
    let Some(record) = state.squadrons.get(squadron) else {
        return CommandOutcome::fail(CommandError::UnknownSquadron);
    };
    if record.kind != SquadronKind::Auxiliary {
        return CommandOutcome::fail(CommandError::WrongCargoKind);
    }
    let aboard = record.marine_unit_ids.len() as u32;
    let capacity = squadron_capacity(state, config, squadron, true);
    if aboard + units.len() as u32 > capacity {
        return CommandOutcome::fail(CommandError::CargoCapacityExceeded);
    }
    for &unit in units {
        let garrisoned = state.ground_units.get(unit).is_some_and(|record| {
            record.location == GroundLocation::Colony(colony)
                && record.class == ec4x_rules_schema::GroundClass::Marine
        });
        if !garrisoned {
            return CommandOutcome::fail(CommandError::UnknownGroundUnit);
        }
    }
    for &unit in units {
        if let Some(record) = state.ground_units.get_mut(unit) {
            record.location = GroundLocation::Embarked(squadron);
        }
        if let Some(record) = state.colonies.get_mut(colony) {
            record.ground_unit_ids.retain(|&id| id != unit);
        }
        if let Some(record) = state.squadrons.get_mut(squadron) {
            record.marine_unit_ids.push(unit);
        }
    }
    CommandOutcome::ok()
}

fn unload_marines(state: &mut GameState, squadron: SquadronId, colony: ColonyId) -> CommandOutcome {
    let units = match state.squadrons.get_mut(squadron) {
        Some(record) => std::mem::take(&mut record.marine_unit_ids),
        None => return CommandOutcome::fail(CommandError::UnknownSquadron),
    };
    for &unit in &units {
        if let Some(record) = state.ground_units.get_mut(unit) {
            record.location = GroundLocation::Colony(colony);
        }
        if let Some(record) = state.colonies.get_mut(colony) {
            record.ground_unit_ids.push(unit);
        }
    }
    CommandOutcome::ok()
}

fn load_colonists(
    state: &mut GameState,
    config: &GameConfig,
    squadron: SquadronId,
    colony: ColonyId,
    ptu: u32,
) -> CommandOutcome {
    let Some(record) = state.squadrons.get(squadron) else {
        return CommandOutcome::fail(CommandError::UnknownSquadron);
    };
    if record.kind != SquadronKind::Expansion {
        return CommandOutcome::fail(CommandError::WrongCargoKind);
    }
    let aboard = record.colonists_ptu;
    let capacity = squadron_capacity(state, config, squadron, false);
    let room = capacity.saturating_sub(aboard);
    let Some(colony_record) = state.colonies.get(colony) else {
        return CommandOutcome::fail(CommandError::NotAtFriendlyColony);
    };
    // The colony may not be emptied below one population unit.
    let spare_souls = colony_record.souls.saturating_sub(SOULS_PER_PU);
    let spare_ptu = (spare_souls / SOULS_PER_PTU) as u32;
    let loaded = ptu.min(room).min(spare_ptu);

    if let Some(record) = state.colonies.get_mut(colony) {
        record.souls -= u64::from(loaded) * SOULS_PER_PTU;
    }
    if let Some(record) = state.squadrons.get_mut(squadron) {
        record.colonists_ptu += loaded;
    }
    let mut outcome = CommandOutcome::ok();
    if loaded < ptu {
        outcome.warnings.push(CommandWarning::PopulationFloor {
            requested: ptu,
            loaded,
        });
    }
    outcome
}

fn unload_colonists(
    state: &mut GameState,
    squadron: SquadronId,
    colony: ColonyId,
) -> CommandOutcome {
    let ptu = match state.squadrons.get_mut(squadron) {
        Some(record) => std::mem::take(&mut record.colonists_ptu),
        None => return CommandOutcome::fail(CommandError::UnknownSquadron),
    };
    if let Some(record) = state.colonies.get_mut(colony) {
        record.souls += u64::from(ptu) * SOULS_PER_PTU;
    }
    CommandOutcome::ok()
}

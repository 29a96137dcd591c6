// SPDX-License-Identifier: Apache-2.0
//! ec4x-core: the deterministic turn-resolution engine of EC4X.
//!
//! The engine advances a multi-house galactic state one turn at a time:
//! per-house order packets go in; a new state, a typed event stream, and
//! per-house fog-of-war views come out. A turn is a pure function of
//! `(state, orders, seed)` — identical inputs replay byte-identically, and
//! a serialized state plus its seed is everything needed to resume.
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::unreadable_literal,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions,
    clippy::use_self,
    clippy::doc_markdown,
    clippy::too_many_lines,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::similar_names,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_lossless,
    clippy::trivially_copy_pass_by_ref,
    clippy::manual_let_else,
    clippy::needless_pass_by_value,
    clippy::struct_excessive_bools
)]

pub mod cmd;
mod combat;
mod colony;
mod config;
mod economy;
mod engine;
mod event;
mod facility;
mod fleet;
mod ground;
mod house;
mod ident;
mod intel;
mod map;
pub mod ops;
mod order;
mod path;
mod prng;
mod project;
mod setup;
mod state;
mod store;
mod turn;
mod view;

pub mod phases;

// Re-exports for a stable public API.
/// Colony entity and population constants.
pub use colony::{Colony, SOULS_PER_PTU, SOULS_PER_PU};
/// Engine configuration values.
pub use config::{GameConfig, SetupConfig};
/// Economic primitives.
pub use economy::{
    gross_colony_output, net_colony_income, CapacityViolation, ViolationKind,
};
/// The engine facade.
pub use engine::{Engine, EngineError};
/// The event stream.
pub use event::{
    CombatTheater, CombatantRef, DiploCause, EliminationReason, EventKind, EventLog, GameEvent,
    Observers, PrestigeReason, ResearchLadder, TheaterOutcome,
};
/// Facilities.
pub use facility::{Kastra, Neoria, NeoriaClass};
/// Fleets, squadrons, ships.
pub use fleet::{CombatState, Fleet, FleetStatus, Ship, Squadron, SquadronHome, SquadronKind};
/// Ground units.
pub use ground::{GroundLocation, GroundUnit};
/// Houses, diplomacy, technology.
pub use house::{
    DiploRelation, DiploState, EspionageState, House, ResearchAllocation, ResearchProgress,
    TechLevels,
};
/// Typed identifiers.
pub use ident::{
    ColonyId, ConstructionProjectId, FleetId, GroundUnitId, HouseId, IdCounters, KastraId,
    NeoriaId, RepairProjectId, ShipId, SquadronId, SystemId,
};
/// Intelligence database types.
pub use intel::{ColonyIntel, FleetIntel, IntelDatabase, SystemIntel, VisibilityLevel};
/// The star map.
pub use map::{generate as generate_map, HexCoord, JumpLane, LaneClass, StarMap, System};
/// Order packets and the order vocabulary.
pub use order::{
    BuildOrder, DiplomaticAction, EspionageAttempt, EspionageInvestment, EspionageKind,
    FleetOrder, FleetOrderKind, FleetOrderRequest, OrderPacket, PopulationTransfer, RepairOrder,
    StandingOrder, StandingOrderRequest,
};
/// Pathfinding helpers exposed for clients.
pub use path::{eta_turns, find_path, mobility_of, seek_home_destination, Mobility};
/// Deterministic PRNG and phase seeding.
pub use prng::{phase_seed, Prng};
/// Projects.
pub use project::{BuildWork, ConstructionProject, ProjectId, RepairProject};
/// Game setup.
pub use setup::{new_game, SetupError};
/// The world state.
pub use state::{GameState, Indexes, PendingCommission, StateCodecError};
/// Generic entity tables.
pub use store::Table;
/// The turn pipeline.
pub use turn::{advance_turn, TurnOutcome};
/// Fog-of-war snapshots.
pub use view::{PlayerState, SystemView};

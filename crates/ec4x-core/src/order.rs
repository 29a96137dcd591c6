// SPDX-License-Identifier: Apache-2.0
//! Per-house order packets and the closed order vocabulary.
//!
//! A house submits one [`OrderPacket`] per turn; a later packet replaces an
//! earlier one until the turn is advanced. Everything is a closed sum type —
//! there is no string-dispatched behavior anywhere in the order path.

use serde::{Deserialize, Serialize};

use crate::cmd::{CargoCommand, FleetCommand, SquadronCommand};
use crate::house::{DiploState, ResearchAllocation};
use crate::ident::{ColonyId, FleetId, HouseId, NeoriaId, ShipId, SystemId};
use crate::project::BuildWork;

/// The closed set of fleet order types.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum FleetOrderKind {
    /// Move to the target system.
    Move,
    /// Hold position.
    Hold,
    /// Hold position and engage hostiles.
    Patrol,
    /// Defend the colony's starbases; fights in the orbital theater.
    GuardStarbase,
    /// Defend the planet; fights in the orbital theater.
    GuardPlanet,
    /// Interdict the colony in the target system.
    BlockadePlanet,
    /// Withdraw to the safest friendly system.
    SeekHome,
    /// Move to and merge into the target fleet.
    JoinFleet,
    /// Found a colony at the target system (requires embarked colonists).
    Colonize,
    /// Invade the colony at the target system (bombard, then land).
    Invade,
    /// Lightning assault: one bombardment round, then land under fire.
    Blitz,
    /// Move to the target system and await further orders.
    Rendezvous,
    /// Intel: survey the colony at the target system.
    SpyPlanet,
    /// Intel: survey the target system.
    SpySystem,
    /// Intel: infiltrate the starbase at the target system.
    HackStarbase,
}

/// One fleet order with its targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetOrder {
    /// Order type.
    pub kind: FleetOrderKind,
    /// Target system, where the type takes one.
    pub target_system: Option<SystemId>,
    /// Target fleet, where the type takes one.
    pub target_fleet: Option<FleetId>,
    /// Relative priority among a house's orders; lower runs first.
    pub priority: u8,
}

impl FleetOrder {
    /// Shorthand for an order with only a kind.
    #[must_use]
    pub fn of(kind: FleetOrderKind) -> Self {
        Self {
            kind,
            target_system: None,
            target_fleet: None,
            priority: 0,
        }
    }

    /// Shorthand for a system-targeted order.
    #[must_use]
    pub fn to_system(kind: FleetOrderKind, system: SystemId) -> Self {
        Self {
            kind,
            target_system: Some(system),
            target_fleet: None,
            priority: 0,
        }
    }

    /// Whether this is a guard order (starbase or planet).
    #[must_use]
    pub fn is_guard(&self) -> bool {
        matches!(
            self.kind,
            FleetOrderKind::GuardStarbase | FleetOrderKind::GuardPlanet
        )
    }

    /// Whether the order keeps the fleet stationary.
    #[must_use]
    pub fn is_stationary(&self) -> bool {
        matches!(
            self.kind,
            FleetOrderKind::Hold
                | FleetOrderKind::Patrol
                | FleetOrderKind::GuardStarbase
                | FleetOrderKind::GuardPlanet
                | FleetOrderKind::BlockadePlanet
        )
    }
}

/// Standing orders reuse the fleet-order shape; they persist across turns
/// and are evaluated before the one-shot order.
pub type StandingOrder = FleetOrder;

/// Assignment of a one-shot order to a fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetOrderRequest {
    /// Fleet to order.
    pub fleet: FleetId,
    /// The order.
    pub order: FleetOrder,
}

/// Replacement of a fleet's standing-order list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingOrderRequest {
    /// Fleet whose standing orders are replaced.
    pub fleet: FleetId,
    /// New standing orders, first evaluated first.
    pub orders: Vec<StandingOrder>,
}

/// A build order against a colony.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildOrder {
    /// Colony doing the work.
    pub colony: ColonyId,
    /// What to build.
    pub work: BuildWork,
    /// Dock facility; required for dock-built ships and repairs, empty for
    /// colony-level work.
    pub facility: Option<NeoriaId>,
    /// How many copies of the work to enqueue.
    pub quantity: u32,
}

/// A repair order for a crippled ship in orbit of a colony.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairOrder {
    /// Colony hosting the work.
    pub colony: ColonyId,
    /// The crippled hull.
    pub ship: ShipId,
    /// Drydock to use; empty routes through the colony repair queue.
    pub facility: Option<NeoriaId>,
}

/// Population moved between two owned colonies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationTransfer {
    /// Source colony.
    pub from: ColonyId,
    /// Destination colony.
    pub to: ColonyId,
    /// PTUs to move.
    pub ptu: u32,
}

/// A queued diplomatic action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiplomaticAction {
    /// Propose a new state to a peer (e.g. an alliance).
    Propose {
        /// Recipient.
        to: HouseId,
        /// Proposed state.
        state: DiploState,
    },
    /// Accept a peer's pending proposal.
    Accept {
        /// Proposer.
        from: HouseId,
    },
    /// Reject a peer's pending proposal.
    Reject {
        /// Proposer.
        from: HouseId,
    },
    /// Break an alliance, dropping to Neutral.
    Break {
        /// Counterparty.
        with: HouseId,
    },
    /// Declare war.
    Declare {
        /// Target of the declaration.
        on: HouseId,
    },
    /// Normalize a Hostile relation back to Neutral (requires no combat
    /// between the pair this turn).
    Normalize {
        /// Counterparty.
        with: HouseId,
    },
}

/// Covert operation categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EspionageKind {
    /// Steal a readout of the target's tech levels.
    TechProbe,
    /// Delay a target construction project.
    Sabotage,
}

/// The one espionage attempt a house may make per turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EspionageAttempt {
    /// Target house.
    pub target: HouseId,
    /// Operation.
    pub kind: EspionageKind,
}

/// Per-turn investment into the espionage pools.
///
/// EBP investment is capped at the detection threshold during intake.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EspionageInvestment {
    /// PP converted to espionage budget points.
    pub ebp: u32,
    /// PP converted to counter-intelligence points.
    pub cip: u32,
}

/// Everything one house submits for one turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPacket {
    /// Submitting house.
    pub house: HouseId,
    /// Turn the packet is for.
    pub turn: u32,
    /// One-shot fleet orders.
    pub fleet_orders: Vec<FleetOrderRequest>,
    /// Standing-order replacements.
    pub standing_orders: Vec<StandingOrderRequest>,
    /// Build orders.
    pub build_orders: Vec<BuildOrder>,
    /// Repair orders.
    pub repair_orders: Vec<RepairOrder>,
    /// Research budget split; replaces the standing allocation when present.
    pub research: Option<ResearchAllocation>,
    /// Diplomatic actions.
    pub diplomacy: Vec<DiplomaticAction>,
    /// Population transfers between owned colonies.
    pub population_transfers: Vec<PopulationTransfer>,
    /// Fleet admin commands (zero-turn; replayed and re-validated here).
    pub fleet_commands: Vec<FleetCommand>,
    /// Squadron admin commands (zero-turn).
    pub squadron_commands: Vec<SquadronCommand>,
    /// Cargo admin commands (zero-turn).
    pub cargo_commands: Vec<CargoCommand>,
    /// The one covert attempt this turn, if any.
    pub espionage_attempt: Option<EspionageAttempt>,
    /// Espionage pool investment.
    pub espionage_investment: Option<EspionageInvestment>,
}

impl OrderPacket {
    /// An empty packet for `house` and `turn`.
    #[must_use]
    pub fn empty(house: HouseId, turn: u32) -> Self {
        Self {
            house,
            turn,
            fleet_orders: Vec::new(),
            standing_orders: Vec::new(),
            build_orders: Vec::new(),
            repair_orders: Vec::new(),
            research: None,
            diplomacy: Vec::new(),
            population_transfers: Vec::new(),
            fleet_commands: Vec::new(),
            squadron_commands: Vec::new(),
            cargo_commands: Vec::new(),
            espionage_attempt: None,
            espionage_investment: None,
        }
    }
}

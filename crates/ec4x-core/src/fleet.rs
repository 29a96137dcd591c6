// SPDX-License-Identifier: Apache-2.0
//! Fleets, squadrons, and ships.
//!
//! A fleet belongs to one house and sits in one system; it owns an ordered
//! sequence of squadrons. A squadron is a flagship plus escorts of one
//! classification. Ships never refer to each other directly — everything is
//! id-linked and resolved through the entity tables.

use serde::{Deserialize, Serialize};

use ec4x_rules_schema::ShipRole;

use crate::ident::{ColonyId, FleetId, GroundUnitId, HouseId, ShipId, SquadronId, SystemId};
use crate::order::{FleetOrder, StandingOrder};

/// Squadron classification; shares the closed set with ship roles.
pub type SquadronKind = ShipRole;

/// Readiness status of a fleet.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum FleetStatus {
    /// Fully crewed; moves, fights, pays full maintenance.
    Active,
    /// Half crews; cannot move, pays half maintenance.
    Reserve,
    /// Skeleton crews; cannot move, screened in combat, free upkeep.
    Mothballed,
}

impl FleetStatus {
    /// Whether this status permits movement orders.
    #[must_use]
    pub fn can_move(self) -> bool {
        matches!(self, FleetStatus::Active)
    }
}

/// Damage state of a hull, facility, or ground unit.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum CombatState {
    /// Full capability.
    Undamaged,
    /// Fights at half attack and defense strength.
    Crippled,
    /// Removed from play at cleanup.
    Destroyed,
}

impl CombatState {
    /// Whether the unit still contributes anything.
    #[must_use]
    pub fn is_operational(self) -> bool {
        !matches!(self, CombatState::Destroyed)
    }
}

/// A single hull.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ship {
    /// Ship id.
    pub id: ShipId,
    /// Ship class name; resolved against the ship rules section.
    pub class: String,
    /// Owning squadron.
    pub squadron: SquadronId,
    /// Damage state.
    pub state: CombatState,
    /// Hits accumulated toward the next state transition.
    pub damage: u32,
}

/// Where a squadron is brigaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SquadronHome {
    /// Part of a fleet.
    Fleet(FleetId),
    /// Based at a colony (unassigned fighter squadrons); these join the
    /// orbital defense when the colony is attacked.
    Colony(ColonyId),
}

/// A squadron: one flagship and its escorts, plus any embarked spacelift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Squadron {
    /// Squadron id.
    pub id: SquadronId,
    /// Fleet or colony the squadron belongs to.
    pub home: SquadronHome,
    /// Classification (Combat, Intel, Expansion, Auxiliary, Fighter).
    pub kind: SquadronKind,
    /// Flagship hull.
    pub flagship: ShipId,
    /// Escort hulls; their summed command cost should not exceed the
    /// flagship's command rating (force-adds are flagged, not rejected).
    pub escorts: Vec<ShipId>,
    /// Embarked marine formations (Auxiliary squadrons).
    pub marine_unit_ids: Vec<GroundUnitId>,
    /// Embarked colonists in PTUs (Expansion squadrons).
    pub colonists_ptu: u32,
}

impl Squadron {
    /// Flagship followed by escorts, in slot order.
    #[must_use]
    pub fn ship_ids(&self) -> Vec<ShipId> {
        let mut ids = Vec::with_capacity(1 + self.escorts.len());
        ids.push(self.flagship);
        ids.extend_from_slice(&self.escorts);
        ids
    }

    /// Whether this squadron is spacelift (Expansion or Auxiliary).
    #[must_use]
    pub fn is_spacelift(&self) -> bool {
        matches!(self.kind, SquadronKind::Expansion | SquadronKind::Auxiliary)
    }
}

/// A fleet of squadrons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fleet {
    /// Fleet id.
    pub id: FleetId,
    /// Owning house.
    pub owner: HouseId,
    /// Current system.
    pub system: SystemId,
    /// Squadron sequence.
    pub squadrons: Vec<SquadronId>,
    /// Readiness status.
    pub status: FleetStatus,
    /// Rules of engagement, `0..=10`; sets the retreat threshold.
    pub roe: u8,
    /// One-shot order for the current turn, if any.
    pub order: Option<FleetOrder>,
    /// Standing orders, evaluated before the one-shot order each turn.
    pub standing_orders: Vec<StandingOrder>,
}

impl Fleet {
    /// Whether the fleet is flying a guard order (starbase or planet).
    #[must_use]
    pub fn is_guarding(&self) -> bool {
        self.order.as_ref().is_some_and(FleetOrder::is_guard)
    }
}

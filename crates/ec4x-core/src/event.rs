// SPDX-License-Identifier: Apache-2.0
//! The typed, append-only event stream.
//!
//! Every observable outcome of a turn is an event. Events carry their own
//! audience: the fog-of-war projection delivers to each house only the events
//! it may observe.

use serde::{Deserialize, Serialize};

use ec4x_rules_schema::{GroundClass, TechField};

use crate::house::DiploState;
use crate::ident::{
    ColonyId, FleetId, HouseId, KastraId, ShipId, SquadronId, SystemId,
};
use crate::order::EspionageKind;
use crate::project::BuildWork;

/// Which houses may observe an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Observers {
    /// Public knowledge.
    All,
    /// Only the listed houses.
    Houses(Vec<HouseId>),
}

impl Observers {
    /// Whether `house` may observe the event.
    #[must_use]
    pub fn can_see(&self, house: HouseId) -> bool {
        match self {
            Observers::All => true,
            Observers::Houses(houses) => houses.contains(&house),
        }
    }

    /// Audience of exactly one house.
    #[must_use]
    pub fn one(house: HouseId) -> Self {
        Observers::Houses(vec![house])
    }

    /// Audience of two houses.
    #[must_use]
    pub fn pair(a: HouseId, b: HouseId) -> Self {
        Observers::Houses(vec![a, b])
    }
}

/// Combat theaters, in resolution order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum CombatTheater {
    /// Deep-space engagement between mobile formations.
    Space,
    /// Orbital assault against guard fleets and starbases.
    Orbital,
    /// Planetary operations: bombardment, invasion, blitz.
    Planetary,
}

/// Outcome of one theater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TheaterOutcome {
    /// The attackers hold the field; the next theater may open.
    AttackerSupremacy,
    /// The defenders hold; progression stops.
    DefenderHolds,
    /// Neither side could force a decision.
    Stalemate,
}

/// A combatant reference inside battle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatantRef {
    /// A squadron.
    Squadron(SquadronId),
    /// A starbase.
    Starbase(KastraId),
}

/// Why prestige moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrestigeReason {
    /// Won a battle.
    BattleVictory,
    /// Lost a battle.
    BattleDefeat,
    /// Destroyed an enemy squadron.
    SquadronKill,
    /// Lost a squadron.
    SquadronLost,
    /// Destroyed an enemy starbase.
    StarbaseKill,
    /// Lost a starbase.
    StarbaseLost,
    /// A colony spent the turn blockaded.
    ColonyBlockaded,
    /// Espionage attempt was detected.
    EspionageDetected,
}

/// Which research ladder advanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResearchLadder {
    /// Economic level.
    El,
    /// Science level.
    Sl,
    /// A technology field.
    Field(TechField),
}

/// Why a house was eliminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EliminationReason {
    /// Three consecutive turns of negative prestige.
    Prestige,
    /// No colonies and no invasion capability.
    NoColonies,
}

/// What changed a diplomatic state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiploCause {
    /// A queued diplomatic action.
    Action,
    /// Auto-escalation from combat.
    CombatEscalation,
}

/// The event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    /// A battle was fought in a system.
    Battle {
        /// Contested system.
        system: SystemId,
        /// Houses that fielded forces.
        participants: Vec<HouseId>,
        /// Winning house, if the field was held.
        victor: Option<HouseId>,
    },
    /// A combat theater opened.
    CombatTheaterBegan {
        /// Contested system.
        system: SystemId,
        /// Theater.
        theater: CombatTheater,
    },
    /// A combat theater closed.
    CombatTheaterCompleted {
        /// Contested system.
        system: SystemId,
        /// Theater.
        theater: CombatTheater,
        /// Outcome.
        outcome: TheaterOutcome,
    },
    /// A combat round opened.
    CombatPhaseBegan {
        /// Contested system.
        system: SystemId,
        /// Theater.
        theater: CombatTheater,
        /// One-based round number.
        round: u32,
    },
    /// A combat round closed.
    CombatPhaseCompleted {
        /// Contested system.
        system: SystemId,
        /// Theater.
        theater: CombatTheater,
        /// One-based round number.
        round: u32,
    },
    /// A shooter delivered a volley.
    WeaponFired {
        /// Contested system.
        system: SystemId,
        /// Firing combatant.
        shooter: CombatantRef,
        /// House absorbing the volley.
        target_house: HouseId,
        /// Hits delivered.
        hits: u32,
    },
    /// A ship changed damage state.
    ShipDamaged {
        /// Contested system.
        system: SystemId,
        /// The ship.
        ship: ShipId,
        /// Owning house.
        owner: HouseId,
    },
    /// A ship was destroyed.
    ShipDestroyed {
        /// Contested system.
        system: SystemId,
        /// The ship.
        ship: ShipId,
        /// Class name.
        class: String,
        /// Owning house.
        owner: HouseId,
    },
    /// A cloaked raider force was detected before battle.
    RaiderDetected {
        /// Contested system.
        system: SystemId,
        /// House whose raiders were unmasked.
        raider_house: HouseId,
        /// Detecting house.
        detector_house: HouseId,
    },
    /// A cloaked raider force stayed hidden (visible only to its owner).
    RaiderStealthSuccess {
        /// Contested system.
        system: SystemId,
        /// House whose raiders stayed cloaked.
        raider_house: HouseId,
    },
    /// A fleet broke off and retreated.
    FleetRetreat {
        /// System the fleet fled.
        system: SystemId,
        /// The fleet.
        fleet: FleetId,
        /// Where it is heading, when a safe destination existed.
        destination: Option<SystemId>,
    },
    /// A facility died and took its project queue with it.
    ColonyProjectsLost {
        /// Colony that owned the facility.
        colony: ColonyId,
        /// Projects cancelled without refund.
        count: u32,
    },
    /// Prestige moved (zero-sum for combat reasons).
    PrestigeEvent {
        /// House affected.
        house: HouseId,
        /// Signed change.
        delta: i64,
        /// Why.
        reason: PrestigeReason,
    },
    /// A pairwise diplomatic state changed.
    DiplomaticStateChanged {
        /// One house.
        a: HouseId,
        /// The other house.
        b: HouseId,
        /// New state.
        state: DiploState,
        /// What caused the change.
        cause: DiploCause,
    },
    /// A blockade took effect.
    BlockadeEstablished {
        /// Colony interdicted.
        colony: ColonyId,
        /// Houses enforcing it.
        by: Vec<HouseId>,
    },
    /// A blockade ended.
    BlockadeLifted {
        /// Colony released.
        colony: ColonyId,
    },
    /// A new colony was founded.
    ColonyFounded {
        /// New colony.
        colony: ColonyId,
        /// Host system.
        system: SystemId,
        /// Founding house.
        house: HouseId,
    },
    /// A colony changed hands by invasion.
    ColonyCaptured {
        /// The colony.
        colony: ColonyId,
        /// New owner.
        by: HouseId,
        /// Percentage of infrastructure destroyed in the capture.
        infrastructure_destroyed_percent: u32,
    },
    /// Orbital bombardment struck a colony.
    Bombardment {
        /// Target colony.
        colony: ColonyId,
        /// Bombarding house.
        attacker: HouseId,
        /// Ground batteries destroyed.
        batteries_destroyed: u32,
        /// Souls killed.
        souls_killed: u64,
    },
    /// A ground invasion resolved.
    InvasionResolved {
        /// Target colony.
        colony: ColonyId,
        /// Invading house.
        attacker: HouseId,
        /// Whether the invaders took the colony.
        success: bool,
        /// Whether this was a blitz.
        blitz: bool,
    },
    /// A colony-level or facility project completed.
    ProjectCompleted {
        /// Owning colony.
        colony: ColonyId,
        /// What was produced.
        work: BuildWork,
    },
    /// A dock-built ship was commissioned into service.
    ShipCommissioned {
        /// Commissioning colony.
        colony: ColonyId,
        /// The new hull.
        ship: ShipId,
        /// Class name.
        class: String,
    },
    /// A crippled ship was restored at a drydock.
    RepairCompleted {
        /// Colony hosting the drydock.
        colony: ColonyId,
        /// The restored hull.
        ship: ShipId,
    },
    /// A covert operation resolved.
    EspionageResolved {
        /// Acting house.
        actor: HouseId,
        /// Target house.
        target: HouseId,
        /// Operation.
        kind: EspionageKind,
        /// Whether it succeeded.
        success: bool,
        /// Whether the target detected the actor.
        detected: bool,
    },
    /// A research ladder reached a new level.
    ResearchAdvanced {
        /// Researching house.
        house: HouseId,
        /// Which ladder.
        ladder: ResearchLadder,
        /// New level.
        new_level: u32,
    },
    /// A capacity violation was recorded.
    CapacityViolationRecorded {
        /// House in violation.
        house: HouseId,
        /// Overage size.
        severity: u32,
        /// Turns left to cure.
        grace_turns_remaining: u32,
    },
    /// Grace expired; units were forcibly scrapped back to the pool.
    UnitsForceScrapped {
        /// House scrapped.
        house: HouseId,
        /// Ships lost.
        ships: u32,
    },
    /// A ground unit was destroyed.
    GroundUnitDestroyed {
        /// Colony where it fell.
        colony: ColonyId,
        /// Unit class.
        class: GroundClass,
        /// Owning house.
        owner: HouseId,
    },
    /// A house was eliminated.
    HouseEliminated {
        /// The house.
        house: HouseId,
        /// Why.
        reason: EliminationReason,
    },
    /// A fleet completed movement (owner-visible).
    FleetMoved {
        /// The fleet.
        fleet: FleetId,
        /// Origin system.
        from: SystemId,
        /// Destination system.
        to: SystemId,
    },
}

/// One event with its turn stamp and audience.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Turn the event occurred.
    pub turn: u32,
    /// Who may observe it.
    pub observers: Observers,
    /// Payload.
    pub kind: EventKind,
}

/// Append-only event sink for one turn.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<GameEvent>,
    turn: u32,
}

impl EventLog {
    /// Creates a log stamping events with `turn`.
    #[must_use]
    pub fn new(turn: u32) -> Self {
        Self {
            events: Vec::new(),
            turn,
        }
    }

    /// Appends an event.
    pub fn push(&mut self, observers: Observers, kind: EventKind) {
        self.events.push(GameEvent {
            turn: self.turn,
            observers,
            kind,
        });
    }

    /// Consumes the log, returning the ordered event list.
    #[must_use]
    pub fn into_events(self) -> Vec<GameEvent> {
        self.events
    }

    /// Events recorded so far.
    #[must_use]
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }
}

// SPDX-License-Identifier: Apache-2.0
//! The engine facade.
//!
//! An `Engine` owns one game's configuration and world state, accepts order
//! packets and zero-turn commands between turns, and advances the world on
//! demand. All configuration is captured at construction; reloading rules
//! means building a new engine for the next game.

use std::collections::BTreeMap;

use ec4x_rules_schema::RulesSnapshot;

use crate::cmd::{
    self, CargoCommand, CommandOutcome, FleetCommand, SquadronCommand,
};
use crate::config::GameConfig;
use crate::ident::{FleetId, HouseId, SystemId};
use crate::order::OrderPacket;
use crate::path;
use crate::setup::{self, SetupError};
use crate::state::{GameState, StateCodecError};
use crate::turn::{self, TurnOutcome};

/// Errors surfaced by the engine facade.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The submitting house does not exist.
    #[error("unknown house: {0}")]
    UnknownHouse(HouseId),
    /// The submitting house has been eliminated.
    #[error("house is eliminated: {0}")]
    HouseEliminated(HouseId),
    /// The packet names the wrong turn.
    #[error("packet for turn {got}, expected {expected}")]
    WrongTurn {
        /// Turn the engine will resolve next.
        expected: u32,
        /// Turn named by the packet.
        got: u32,
    },
    /// Game creation failed.
    #[error(transparent)]
    Setup(#[from] SetupError),
    /// State serialization failed.
    #[error(transparent)]
    Codec(#[from] StateCodecError),
    /// Rules payload construction failed.
    #[error(transparent)]
    Schema(#[from] ec4x_rules_schema::SchemaError),
}

/// One game: configuration, world, and the packets waiting on the next turn.
#[derive(Debug)]
pub struct Engine {
    config: GameConfig,
    state: GameState,
    pending: BTreeMap<HouseId, OrderPacket>,
}

impl Engine {
    /// Creates a fresh game.
    pub fn new_game(config: GameConfig, players: u32, seed: u64) -> Result<Self, EngineError> {
        let state = setup::new_game(&config, players, seed)?;
        Ok(Self {
            config,
            state,
            pending: BTreeMap::new(),
        })
    }

    /// Resumes from a saved state.
    #[must_use]
    pub fn from_state(config: GameConfig, state: GameState) -> Self {
        Self {
            config,
            state,
            pending: BTreeMap::new(),
        }
    }

    /// Read access to the world.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// The configuration this game runs under.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The turn the engine will resolve on the next [`Engine::advance_turn`].
    #[must_use]
    pub fn next_turn(&self) -> u32 {
        self.state.turn + 1
    }

    /// The hashed rules payload for client handshakes.
    pub fn rules_snapshot(&self) -> Result<RulesSnapshot, EngineError> {
        Ok(self.config.rules_snapshot()?)
    }

    /// Serializes the world for persistence.
    pub fn save(&self) -> Result<Vec<u8>, EngineError> {
        Ok(self.state.to_bytes()?)
    }

    /// Accepts a house's packet for the next turn, replacing any earlier
    /// packet from the same house.
    pub fn submit_orders(&mut self, packet: OrderPacket) -> Result<(), EngineError> {
        let house = self
            .state
            .houses
            .get(packet.house)
            .ok_or(EngineError::UnknownHouse(packet.house))?;
        if house.is_eliminated {
            return Err(EngineError::HouseEliminated(packet.house));
        }
        let expected = self.next_turn();
        if packet.turn != expected {
            return Err(EngineError::WrongTurn {
                expected,
                got: packet.turn,
            });
        }
        self.pending.insert(packet.house, packet);
        Ok(())
    }

    /// Executes a zero-turn fleet command synchronously.
    pub fn fleet_command(&mut self, house: HouseId, command: &FleetCommand) -> CommandOutcome {
        cmd::execute_fleet_command(&mut self.state, &self.config, house, command)
    }

    /// Executes a zero-turn squadron command synchronously.
    pub fn squadron_command(
        &mut self,
        house: HouseId,
        command: &SquadronCommand,
    ) -> CommandOutcome {
        cmd::execute_squadron_command(&mut self.state, &self.config, house, command)
    }

    /// Executes a zero-turn cargo command synchronously.
    pub fn cargo_command(&mut self, house: HouseId, command: &CargoCommand) -> CommandOutcome {
        cmd::execute_cargo_command(&mut self.state, &self.config, house, command)
    }

    /// Client helper: simulated travel time for a fleet to a system,
    /// honoring lane restrictions and the multi-jump rule.
    #[must_use]
    pub fn eta(&self, fleet: FleetId, to: SystemId) -> Option<u32> {
        let record = self.state.fleets.get(fleet)?;
        let mobility = path::mobility_of(&self.state, fleet);
        let (route, _) = path::find_path(&self.state, record.system, to, mobility)?;
        Some(path::eta_turns(&self.state, record.owner, &route))
    }

    /// Resolves the next turn with every packet submitted so far.
    pub fn advance_turn(&mut self) -> TurnOutcome {
        let packets: Vec<OrderPacket> = std::mem::take(&mut self.pending).into_values().collect();
        turn::advance_turn(&mut self.state, &self.config, &packets)
    }
}

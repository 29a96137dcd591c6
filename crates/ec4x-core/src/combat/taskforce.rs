// SPDX-License-Identifier: Apache-2.0
//! Participant classification and task-force assembly.

use crate::config::GameConfig;
use crate::fleet::{FleetStatus, SquadronKind};
use crate::ident::{ColonyId, FleetId, HouseId, KastraId, SquadronId, SystemId};
use crate::state::GameState;

/// Who is present at a contested system, bucketed by battle role.
#[derive(Debug, Clone)]
pub(crate) struct Classification {
    /// Contested system.
    pub system: SystemId,
    /// Colony in the system, if any.
    pub colony: Option<ColonyId>,
    /// Colony owner, if any.
    pub owner: Option<HouseId>,
    /// Owner fleets free to maneuver: Active, no guard order.
    pub mobile_defenders: Vec<FleetId>,
    /// Owner fleets bound to the colony: guard orders or Reserve status.
    pub orbital_defenders: Vec<FleetId>,
    /// Non-owner fleets able to engage.
    pub attackers: Vec<FleetId>,
}

impl Classification {
    /// Houses fielding forces, ascending and unique.
    pub fn participant_houses(&self, state: &GameState) -> Vec<HouseId> {
        let mut houses: Vec<HouseId> = self
            .mobile_defenders
            .iter()
            .chain(&self.orbital_defenders)
            .chain(&self.attackers)
            .filter_map(|&fleet| state.fleets.get(fleet))
            .map(|record| record.owner)
            .collect();
        if let Some(owner) = self.owner {
            if !self.orbital_defenders.is_empty() || !self.mobile_defenders.is_empty() {
                houses.push(owner);
            }
        }
        houses.sort_unstable();
        houses.dedup();
        houses
    }

    /// Whether any hostile pair is actually present.
    pub fn combat_possible(&self) -> bool {
        !self.attackers.is_empty()
    }
}

/// Whether a fleet is intel-only (every squadron Intel class); such fleets
/// are excluded from combat entirely.
fn is_intel_only(state: &GameState, fleet: FleetId) -> bool {
    let Some(record) = state.fleets.get(fleet) else {
        return false;
    };
    !record.squadrons.is_empty()
        && record.squadrons.iter().all(|&squadron| {
            state
                .squadrons
                .get(squadron)
                .is_some_and(|sqn| sqn.kind == SquadronKind::Intel)
        })
}

/// Classifies every fleet at `system` into battle roles.
pub(crate) fn classify(
    state: &GameState,
    _config: &GameConfig,
    system: SystemId,
) -> Classification {
    let colony = state.colony_in_system(system);
    let owner = colony
        .and_then(|id| state.colonies.get(id))
        .map(|record| record.owner);

    let mut classification = Classification {
        system,
        colony,
        owner,
        mobile_defenders: Vec::new(),
        orbital_defenders: Vec::new(),
        attackers: Vec::new(),
    };

    for fleet in state.fleets_in_system(system) {
        let Some(record) = state.fleets.get(fleet) else {
            continue;
        };
        if record.status == FleetStatus::Mothballed || is_intel_only(state, fleet) {
            continue;
        }
        if Some(record.owner) == owner {
            if record.is_guarding() || record.status == FleetStatus::Reserve {
                classification.orbital_defenders.push(fleet);
            } else {
                classification.mobile_defenders.push(fleet);
            }
        } else {
            // Non-owner fleets engage only where the diplomatic state permits.
            let hostile_to_someone = state
                .fleets_in_system(system)
                .iter()
                .filter_map(|&other| state.fleets.get(other))
                .any(|other| {
                    other.owner != record.owner
                        && state.relation(record.owner, other.owner).permits_combat()
                })
                || owner.is_some_and(|o| state.relation(record.owner, o).permits_combat());
            if hostile_to_someone {
                classification.attackers.push(fleet);
            }
        }
    }
    classification
}

/// A per-house combat formation for one theater.
#[derive(Debug, Clone)]
pub(crate) struct TaskForce {
    /// Fielding house.
    pub house: HouseId,
    /// Fleets contributing squadrons (empty for a pure-garrison force).
    pub fleets: Vec<FleetId>,
    /// Participating squadrons (Combat class, plus colony fighters in the
    /// orbital theater).
    pub squadrons: Vec<SquadronId>,
    /// Screened squadrons riding with the fleets (Intel / Expansion /
    /// Auxiliary / fleet Fighter); they absorb proportional losses on
    /// retreat but never shoot.
    pub screened: Vec<SquadronId>,
    /// Starbases (orbital theater only).
    pub starbases: Vec<KastraId>,
}

fn force_for_house<'a>(forces: &'a mut Vec<TaskForce>, house: HouseId) -> &'a mut TaskForce {
    if let Some(pos) = forces.iter().position(|tf| tf.house == house) {
        &mut forces[pos]
    } else {
        forces.push(TaskForce {
            house,
            fleets: Vec::new(),
            squadrons: Vec::new(),
            screened: Vec::new(),
            starbases: Vec::new(),
        });
        let last = forces.len() - 1;
        &mut forces[last]
    }
}

fn add_fleet_to_force(state: &GameState, forces: &mut Vec<TaskForce>, fleet: FleetId) {
    let Some(record) = state.fleets.get(fleet) else {
        return;
    };
    let force = force_for_house(forces, record.owner);
    force.fleets.push(fleet);
    for &squadron in &record.squadrons {
        let Some(sqn) = state.squadrons.get(squadron) else {
            continue;
        };
        if sqn.kind == SquadronKind::Combat {
            force.squadrons.push(squadron);
        } else {
            force.screened.push(squadron);
        }
    }
}

fn sort_forces(forces: &mut [TaskForce]) {
    forces.sort_by_key(|tf| tf.house);
    for force in forces {
        force.fleets.sort_unstable();
        force.squadrons.sort_unstable();
        force.screened.sort_unstable();
        force.starbases.sort_unstable();
    }
}

/// Builds the space-theater forces: mobile defenders plus attackers.
pub(crate) fn build_space_forces(
    state: &GameState,
    _config: &GameConfig,
    classification: &Classification,
) -> Vec<TaskForce> {
    let mut forces = Vec::new();
    for &fleet in classification
        .mobile_defenders
        .iter()
        .chain(&classification.attackers)
    {
        add_fleet_to_force(state, &mut forces, fleet);
    }
    sort_forces(&mut forces);
    forces
}

/// Builds the orbital-theater forces: surviving attackers against guard
/// fleets, starbases, and unassigned colony fighter squadrons.
pub(crate) fn build_orbital_forces(
    state: &GameState,
    _config: &GameConfig,
    classification: &Classification,
) -> Vec<TaskForce> {
    let mut forces = Vec::new();
    for &fleet in classification
        .attackers
        .iter()
        .chain(&classification.orbital_defenders)
    {
        // A fleet may have died or broken off in the space theater; a
        // seek-home order is the retreat marker.
        let still_fighting = state.fleets.get(fleet).is_some_and(|record| {
            record.system == classification.system
                && !record
                    .order
                    .is_some_and(|order| order.kind == crate::order::FleetOrderKind::SeekHome)
        });
        if still_fighting {
            add_fleet_to_force(state, &mut forces, fleet);
        }
    }
    if let (Some(colony_id), Some(owner)) = (classification.colony, classification.owner) {
        if let Some(colony) = state.colonies.get(colony_id) {
            let force = force_for_house(&mut forces, owner);
            for &kastra in &colony.kastra_ids {
                if state
                    .kastras
                    .get(kastra)
                    .is_some_and(|record| record.state.is_operational())
                {
                    force.starbases.push(kastra);
                }
            }
            for &squadron in &colony.fighter_squadron_ids {
                if state.squadrons.contains(squadron) {
                    force.squadrons.push(squadron);
                }
            }
        }
    }
    sort_forces(&mut forces);
    forces
}

/// Current total attack strength of a task force.
pub(crate) fn force_attack(state: &GameState, config: &GameConfig, force: &TaskForce) -> f64 {
    let weapons = super::weapons_level(state, force.house);
    let mut total = 0.0;
    for &squadron in &force.squadrons {
        total += squadron_attack(state, config, squadron, weapons);
    }
    for &kastra in &force.starbases {
        total += super::kastra_attack(state, config, kastra);
    }
    total
}

/// Current attack strength of one squadron.
pub(crate) fn squadron_attack(
    state: &GameState,
    config: &GameConfig,
    squadron: SquadronId,
    weapons: u32,
) -> f64 {
    let Some(record) = state.squadrons.get(squadron) else {
        return 0.0;
    };
    record
        .ship_ids()
        .iter()
        .filter_map(|&ship| state.ships.get(ship))
        .map(|ship| super::ship_attack(config, ship, weapons))
        .sum()
}

// SPDX-License-Identifier: Apache-2.0
//! The movement phase.
//!
//! Every fleet executes its effective order — the first valid standing order
//! when no one-shot order was given. Fleets advance one jump per turn, or
//! two under the multi-jump rule. Arrival side effects (colonization,
//! merging, intel sweeps, invasion escalations) happen the moment the fleet
//! reaches its target; combat is the next phase's business.

use std::collections::BTreeSet;

use ec4x_rules_schema::TechField;

use crate::config::GameConfig;
use crate::event::{EventKind, EventLog, Observers};
use crate::fleet::SquadronKind;
use crate::house::DiploState;
use crate::ident::{FleetId, HouseId, SystemId};
use crate::intel::{ColonyIntel, FleetIntel, VisibilityLevel};
use crate::ops::{colony_ops, fleet_ops, squadron_ops};
use crate::order::{EspionageKind, FleetOrder, FleetOrderKind};
use crate::path;
use crate::prng::{phase_seed, Prng};
use crate::state::GameState;

/// Runs movement for every fleet. Returns the set of fleets whose movement
/// completed this turn (they alone may execute planetary operations).
pub fn run(state: &mut GameState, config: &GameConfig, events: &mut EventLog) -> BTreeSet<FleetId> {
    let mut arrivals = BTreeSet::new();
    let seed = phase_seed(state.base_seed, state.turn, None, "movement");
    let mut prng = Prng::from_seed_u64(seed);

    // Canonical order: priority first, then fleet id.
    let mut fleet_ids = state.fleets.ids();
    fleet_ids.sort_by_key(|&fleet| {
        let priority = state
            .fleets
            .get(fleet)
            .and_then(|record| record.order.as_ref().map(|order| order.priority))
            .unwrap_or(u8::MAX);
        (priority, fleet)
    });

    for fleet in fleet_ids {
        step_fleet(state, config, fleet, &mut arrivals, &mut prng, events);
    }
    arrivals
}

/// Standing orders fill the gap when no one-shot order is present.
fn effective_order(state: &GameState, fleet: FleetId) -> Option<FleetOrder> {
    let record = state.fleets.get(fleet)?;
    if record.order.is_some() {
        return record.order;
    }
    record
        .standing_orders
        .iter()
        .find(|order| match order.kind {
            FleetOrderKind::Move
            | FleetOrderKind::Rendezvous
            | FleetOrderKind::Colonize
            | FleetOrderKind::Invade
            | FleetOrderKind::Blitz
            | FleetOrderKind::BlockadePlanet
            | FleetOrderKind::SpyPlanet
            | FleetOrderKind::SpySystem
            | FleetOrderKind::HackStarbase => order.target_system.is_some(),
            FleetOrderKind::JoinFleet => order.target_fleet.is_some(),
            _ => true,
        })
        .copied()
}

fn step_fleet(
    state: &mut GameState,
    config: &GameConfig,
    fleet: FleetId,
    arrivals: &mut BTreeSet<FleetId>,
    prng: &mut Prng,
    events: &mut EventLog,
) {
    let Some(record) = state.fleets.get(fleet) else {
        return;
    };
    let owner = record.owner;
    let origin = record.system;
    if !record.status.can_move() {
        return;
    }
    let Some(order) = effective_order(state, fleet) else {
        return;
    };
    if state.fleets.get(fleet).is_some_and(|r| r.order.is_none()) {
        fleet_ops::set_order(state, fleet, Some(order));
    }

    let destination = match order.kind {
        FleetOrderKind::Hold
        | FleetOrderKind::Patrol
        | FleetOrderKind::GuardStarbase
        | FleetOrderKind::GuardPlanet => return,
        FleetOrderKind::JoinFleet => {
            let Some(target) = order
                .target_fleet
                .and_then(|target| state.fleets.get(target))
            else {
                // Target gone; the order dies with it.
                fleet_ops::set_order(state, fleet, None);
                return;
            };
            target.system
        }
        FleetOrderKind::SeekHome => match order.target_system {
            Some(target) => target,
            None => match path::seek_home_destination(state, config, fleet) {
                Some(target) => target,
                None => return,
            },
        },
        _ => match order.target_system {
            Some(target) => target,
            None => return,
        },
    };

    let mut moved = false;
    if destination != origin {
        let mobility = path::mobility_of(state, fleet);
        let Some((route, _)) = path::find_path(state, origin, destination, mobility) else {
            return;
        };
        let steps = path::steps_this_turn(state, owner, &route);
        if steps == 0 {
            return;
        }
        let next = route[steps.min(route.len() - 1)];
        fleet_ops::move_fleet(state, fleet, next);
        moved = true;
        events.push(
            Observers::one(owner),
            EventKind::FleetMoved {
                fleet,
                from: origin,
                to: next,
            },
        );
        if next != destination {
            return;
        }
    }

    // Arrived (or already on station).
    arrivals.insert(fleet);
    on_arrival(
        state, config, fleet, owner, destination, order, moved, prng, events,
    );
}

#[allow(clippy::too_many_arguments)]
fn on_arrival(
    state: &mut GameState,
    config: &GameConfig,
    fleet: FleetId,
    owner: HouseId,
    system: SystemId,
    order: FleetOrder,
    moved: bool,
    prng: &mut Prng,
    events: &mut EventLog,
) {
    match order.kind {
        FleetOrderKind::Move | FleetOrderKind::Rendezvous | FleetOrderKind::SeekHome => {
            fleet_ops::set_order(state, fleet, None);
        }
        FleetOrderKind::JoinFleet => {
            if let Some(target) = order.target_fleet {
                let valid = state
                    .fleets
                    .get(target)
                    .is_some_and(|record| record.owner == owner && record.system == system);
                if valid && target != fleet {
                    fleet_ops::merge_fleets(state, fleet, target);
                } else {
                    fleet_ops::set_order(state, fleet, None);
                }
            }
        }
        FleetOrderKind::Colonize => {
            // Landing colonists takes the turn after the transit ends; a
            // fleet that jumped in this turn settles next turn.
            if !moved {
                colonize_here(state, config, fleet, owner, system, events);
            }
        }
        FleetOrderKind::Invade | FleetOrderKind::Blitz | FleetOrderKind::BlockadePlanet => {
            // Hostile intent against a non-hostile owner is a declaration by
            // deed; the relation escalates the moment the fleet arrives.
            if let Some(colony_owner) = state
                .colony_in_system(system)
                .and_then(|colony| state.colonies.get(colony))
                .map(|colony| colony.owner)
            {
                if colony_owner != owner
                    && !state.relation(owner, colony_owner).permits_combat()
                {
                    crate::combat::escalate(state, events, owner, colony_owner, DiploState::Hostile);
                }
            }
        }
        FleetOrderKind::SpySystem | FleetOrderKind::SpyPlanet => {
            record_survey(state, config, owner, system);
        }
        FleetOrderKind::HackStarbase => {
            hack_starbase(state, config, fleet, owner, system, prng, events);
        }
        _ => {}
    }
}

/// Founds a colony with the colonists aboard; the delivering ETAC hull is
/// expended in the landing.
fn colonize_here(
    state: &mut GameState,
    config: &GameConfig,
    fleet: FleetId,
    owner: HouseId,
    system: SystemId,
    events: &mut EventLog,
) {
    if state.colony_in_system(system).is_some() {
        fleet_ops::set_order(state, fleet, None);
        return;
    }
    // First expansion squadron with colonists aboard does the landing.
    let Some((squadron, ptu)) = state.fleets.get(fleet).and_then(|record| {
        record
            .squadrons
            .iter()
            .filter_map(|&squadron| state.squadrons.get(squadron))
            .find(|sqn| sqn.kind == SquadronKind::Expansion && sqn.colonists_ptu > 0)
            .map(|sqn| (sqn.id, sqn.colonists_ptu))
    }) else {
        fleet_ops::set_order(state, fleet, None);
        return;
    };
    let Some(colony) =
        colony_ops::found_colony(state, &config.sections.economy, system, owner, ptu)
    else {
        fleet_ops::set_order(state, fleet, None);
        return;
    };
    if let Some(record) = state.squadrons.get_mut(squadron) {
        record.colonists_ptu = 0;
    }
    // The transport hull is expended establishing the landing site.
    let etac = state.squadrons.get(squadron).and_then(|sqn| {
        sqn.ship_ids().into_iter().find(|&ship| {
            state
                .ships
                .get(ship)
                .and_then(|hull| config.ship_spec(&hull.class))
                .is_some_and(|spec| spec.carry_ptu > 0)
        })
    });
    if let Some(ship) = etac {
        squadron_ops::remove_ship(state, ship);
    }
    fleet_ops::set_order(state, fleet, None);
    events.push(
        Observers::one(owner),
        EventKind::ColonyFounded {
            colony,
            system,
            house: owner,
        },
    );
}

/// Writes a full survey of `system` into the surveying house's intel.
fn record_survey(state: &mut GameState, config: &GameConfig, owner: HouseId, system: SystemId) {
    let turn = state.turn;
    let colony_snapshot = state
        .colony_in_system(system)
        .and_then(|id| state.colonies.get(id))
        .map(|colony| ColonyIntel {
            owner: colony.owner,
            souls: colony.souls,
            infrastructure: colony.infrastructure,
            kastra_count: colony.kastra_ids.len() as u32,
            battery_count: colony
                .ground_unit_ids
                .iter()
                .filter(|&&unit| {
                    state.ground_units.get(unit).is_some_and(|record| {
                        record.class == ec4x_rules_schema::GroundClass::Battery
                    })
                })
                .count() as u32,
            last_turn_updated: turn,
        });
    let foreign_owner = colony_snapshot
        .as_ref()
        .map(|snapshot| snapshot.owner)
        .filter(|&colony_owner| colony_owner != owner);
    let fleet_snapshots: Vec<FleetIntel> = state
        .fleets_in_system(system)
        .into_iter()
        .filter_map(|fleet| state.fleets.get(fleet))
        .filter(|record| record.owner != owner)
        .map(|record| FleetIntel {
            owner: record.owner,
            squadron_count: record.squadrons.len() as u32,
            estimated_attack: crate::ops::fleet_ops::operational_attack(state, config, record.id)
                as u32,
            last_turn_updated: turn,
        })
        .collect();

    let Some(house) = state.houses.get_mut(owner) else {
        return;
    };
    let row = house.intel.system_mut(system);
    row.last_scouted_turn = Some(turn);
    row.visibility = VisibilityLevel::Scouted;
    row.colony = colony_snapshot;
    row.fleets = fleet_snapshots;
    if let Some(colony_owner) = foreign_owner {
        let _ = colony_owner;
        house.intel.known_enemy_colony_systems.insert(system);
    }
}

/// Intel strike against a starbase: success steals a tech readout, failure
/// burns the operatives.
fn hack_starbase(
    state: &mut GameState,
    config: &GameConfig,
    fleet: FleetId,
    owner: HouseId,
    system: SystemId,
    prng: &mut Prng,
    events: &mut EventLog,
) {
    let Some((target_house, has_kastra)) = state
        .colony_in_system(system)
        .and_then(|id| state.colonies.get(id))
        .map(|colony| (colony.owner, !colony.kastra_ids.is_empty()))
    else {
        fleet_ops::set_order(state, fleet, None);
        return;
    };
    if !has_kastra || target_house == owner {
        fleet_ops::set_order(state, fleet, None);
        return;
    }
    let eli = state
        .houses
        .get(owner)
        .map_or(0, |house| house.tech.field(TechField::ElectronicIntel)) as i32;
    let target_eli = state
        .houses
        .get(target_house)
        .map_or(0, |house| house.tech.field(TechField::ElectronicIntel))
        as i32;
    let bonus = config.sections.facilities.kastra_detection_bonus;
    let actor_roll = prng.d10() + eli;
    let defense_roll = prng.d10() + target_eli + bonus;
    let success = actor_roll > defense_roll;
    if success {
        record_survey(state, config, owner, system);
        let stolen = state.houses.get(target_house).map(|house| house.tech.clone());
        if let (Some(tech), Some(house)) = (stolen, state.houses.get_mut(owner)) {
            let turn = state.turn;
            house.intel.known_enemy_tech.insert(target_house, (tech, turn));
        }
        events.push(
            Observers::one(owner),
            EventKind::EspionageResolved {
                actor: owner,
                target: target_house,
                kind: EspionageKind::TechProbe,
                success: true,
                detected: false,
            },
        );
    } else {
        events.push(
            Observers::pair(owner, target_house),
            EventKind::EspionageResolved {
                actor: owner,
                target: target_house,
                kind: EspionageKind::TechProbe,
                success: false,
                detected: true,
            },
        );
    }
    fleet_ops::set_order(state, fleet, None);
}

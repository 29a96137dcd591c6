// SPDX-License-Identifier: Apache-2.0
//! Planetary operations: bombardment, standard invasion, blitz.
//!
//! Only fleets whose movement completed this turn may act here, and only
//! after orbital supremacy. Invade bombards the batteries flat (up to three
//! rounds per turn) and lands once they are gone. Blitz takes one
//! bombardment round — with the batteries free to shoot at the transports —
//! and then lands under fire, trading casualties for an intact prize.

use std::collections::BTreeSet;

use ec4x_rules_schema::GroundClass;

use crate::colony::SOULS_PER_PTU;
use crate::config::GameConfig;
use crate::event::{EventKind, EventLog, Observers};
use crate::facility::NeoriaClass;
use crate::fleet::{CombatState, SquadronKind};
use crate::ground::GroundLocation;
use crate::ident::{ColonyId, FleetId, GroundUnitId, HouseId, SystemId};
use crate::ops::colony_ops;
use crate::order::FleetOrderKind;
use crate::prng::Prng;
use crate::state::GameState;

use super::BOMBARDMENT_ROUNDS_PER_TURN;
use super::INFRA_HITS_PER_LEVEL;

/// Resolves planetary operations at a colony for every eligible fleet.
pub(crate) fn resolve_planetary(
    state: &mut GameState,
    config: &GameConfig,
    system: SystemId,
    colony_id: ColonyId,
    arrivals: &BTreeSet<FleetId>,
    prng: &mut Prng,
    events: &mut EventLog,
) {
    let assault_fleets: Vec<(FleetId, FleetOrderKind)> = state
        .fleets_in_system(system)
        .into_iter()
        .filter_map(|fleet| {
            let record = state.fleets.get(fleet)?;
            let order = record.order?;
            let kind = order.kind;
            if !matches!(kind, FleetOrderKind::Invade | FleetOrderKind::Blitz) {
                return None;
            }
            if order.target_system != Some(system) || !arrivals.contains(&fleet) {
                return None;
            }
            let owner = state.colonies.get(colony_id)?.owner;
            if record.owner == owner || !state.relation(record.owner, owner).permits_combat() {
                return None;
            }
            Some((fleet, kind))
        })
        .collect();

    for (fleet, kind) in assault_fleets {
        // The colony may already have fallen to an earlier assault.
        let Some(colony) = state.colonies.get(colony_id) else {
            return;
        };
        let Some(attacker) = state.fleets.get(fleet).map(|record| record.owner) else {
            continue;
        };
        if colony.owner == attacker {
            continue;
        }
        match kind {
            FleetOrderKind::Invade => {
                run_invasion(state, config, system, colony_id, fleet, attacker, prng, events);
            }
            FleetOrderKind::Blitz => {
                run_blitz(state, config, system, colony_id, fleet, attacker, prng, events);
            }
            _ => {}
        }
    }
}

fn cer(prng: &mut Prng, modifier: i32) -> f64 {
    f64::from((prng.d10() + modifier).clamp(1, 15)) / 10.0
}

/// Garrison units of a class at a colony, operational only, id order.
fn garrison(state: &GameState, colony: ColonyId, classes: &[GroundClass]) -> Vec<GroundUnitId> {
    state.colonies.get(colony).map_or_else(Vec::new, |record| {
        record
            .ground_unit_ids
            .iter()
            .copied()
            .filter(|&unit| {
                state.ground_units.get(unit).is_some_and(|record| {
                    classes.contains(&record.class) && record.state.is_operational()
                })
            })
            .collect()
    })
}

fn ground_attack(state: &GameState, config: &GameConfig, units: &[GroundUnitId]) -> f64 {
    units
        .iter()
        .filter_map(|&unit| state.ground_units.get(unit))
        .filter_map(|record| {
            config.ground_spec(record.class).map(|spec| match record.state {
                CombatState::Undamaged => f64::from(spec.attack),
                CombatState::Crippled => f64::from(spec.attack) * 0.5,
                CombatState::Destroyed => 0.0,
            })
        })
        .sum()
}

/// Applies hits across ground units in order; returns unspent hits and the
/// number of units destroyed.
fn damage_ground_units(
    state: &mut GameState,
    config: &GameConfig,
    units: &[GroundUnitId],
    mut hits: u32,
) -> (u32, u32) {
    let mut destroyed = 0;
    for &unit in units {
        if hits == 0 {
            break;
        }
        let Some(ds) = state
            .ground_units
            .get(unit)
            .and_then(|record| config.ground_spec(record.class))
            .map(|spec| spec.defense.max(1))
        else {
            continue;
        };
        let Some(record) = state.ground_units.get_mut(unit) else {
            continue;
        };
        if record.state == CombatState::Undamaged && hits > 0 {
            let to_cripple = ds.saturating_sub(record.damage);
            if hits >= to_cripple {
                hits -= to_cripple;
                record.damage = 0;
                record.state = CombatState::Crippled;
            } else {
                record.damage += hits;
                hits = 0;
            }
        }
        if record.state == CombatState::Crippled && hits > 0 {
            let to_destroy = (ds / 2).max(1).saturating_sub(record.damage);
            if hits >= to_destroy {
                hits -= to_destroy;
                record.damage = 0;
                record.state = CombatState::Destroyed;
                destroyed += 1;
            } else {
                record.damage += hits;
                hits = 0;
            }
        }
    }
    (hits, destroyed)
}

/// Fleet bombardment strength: planet-breaker hulls at full value, the rest
/// soaked by the planetary shield.
fn bombard_attack(
    state: &GameState,
    config: &GameConfig,
    fleet: FleetId,
    shield_level: u32,
) -> f64 {
    let Some(record) = state.fleets.get(fleet) else {
        return 0.0;
    };
    let weapons = super::weapons_level(state, record.owner);
    let soak =
        f64::from((shield_level * config.sections.facilities.shield_reduction_percent).min(75))
            / 100.0;
    let mut total = 0.0;
    for &squadron in &record.squadrons {
        let Some(sqn) = state.squadrons.get(squadron) else {
            continue;
        };
        if sqn.kind != SquadronKind::Combat {
            continue;
        }
        for ship_id in sqn.ship_ids() {
            let Some(ship) = state.ships.get(ship_id) else {
                continue;
            };
            let Some(spec) = config.ship_spec(&ship.class) else {
                continue;
            };
            let strength = super::ship_attack(config, ship, weapons);
            total += if spec.planet_breaker {
                strength
            } else {
                strength * (1.0 - soak)
            };
        }
    }
    total
}

/// Ships of a fleet eligible to absorb battery fire. Blitz exposes every
/// hull including the transports; standard bombardment only the line.
fn exposed_ships(state: &GameState, fleet: FleetId, include_spacelift: bool) -> Vec<crate::ident::ShipId> {
    state.fleets.get(fleet).map_or_else(Vec::new, |record| {
        record
            .squadrons
            .iter()
            .filter_map(|&squadron| state.squadrons.get(squadron))
            .filter(|sqn| include_spacelift || sqn.kind == SquadronKind::Combat)
            .flat_map(crate::fleet::Squadron::ship_ids)
            .filter(|&ship| {
                state
                    .ships
                    .get(ship)
                    .is_some_and(|hull| hull.state.is_operational())
            })
            .collect()
    })
}

/// One bombardment exchange. Returns `(batteries_destroyed, souls_killed)`.
#[allow(clippy::too_many_arguments)]
fn bombardment_round(
    state: &mut GameState,
    config: &GameConfig,
    system: SystemId,
    colony_id: ColonyId,
    fleet: FleetId,
    attacker: HouseId,
    batteries_fire_at_everything: bool,
    prng: &mut Prng,
    events: &mut EventLog,
) -> (u32, u64) {
    let shield_level = state.colonies.get(colony_id).map_or(0, |c| c.shield_level);
    let fleet_strength = bombard_attack(state, config, fleet, shield_level);
    let batteries = garrison(state, colony_id, &[GroundClass::Battery]);
    let battery_strength = ground_attack(state, config, &batteries);

    let fleet_hits = (fleet_strength * cer(prng, 0)).floor() as u32;
    let battery_hits = (battery_strength * cer(prng, 0)).floor() as u32;

    // Batteries return fire first — simultaneous resolution, but the fleet's
    // volley is computed from the pre-round state either way.
    let targets = exposed_ships(state, fleet, batteries_fire_at_everything);
    let mut remaining = battery_hits;
    let observers = observers_for(state, colony_id, attacker);
    for ship in targets {
        if remaining == 0 {
            break;
        }
        let (left, _) =
            super::round::damage_ship(state, config, system, ship, remaining, events, &observers);
        remaining = left;
    }

    // Fleet volley walks down the target ladder.
    let (left, batteries_destroyed) = damage_ground_units(state, config, &batteries, fleet_hits);
    let mut hits = left;
    if batteries_destroyed < batteries.len() as u32 {
        // Batteries still stand; no deeper damage this round.
        hits = 0;
    }
    let mut souls_killed = 0;
    if hits > 0 {
        let forces = garrison(state, colony_id, &[GroundClass::Army, GroundClass::Marine]);
        let (left, _) = damage_ground_units(state, config, &forces, hits);
        hits = left;
    }
    if hits > 0 {
        hits = damage_spaceports(state, config, colony_id, hits);
    }
    if hits > 0 {
        let to_infra = hits / 2;
        let to_souls = hits - to_infra;
        if let Some(colony) = state.colonies.get_mut(colony_id) {
            colony.infrastructure = colony
                .infrastructure
                .saturating_sub(to_infra / INFRA_HITS_PER_LEVEL);
        }
        souls_killed = u64::from(to_souls) * SOULS_PER_PTU;
        if let Some(colony) = state.colonies.get_mut(colony_id) {
            colony_ops::kill_population(colony, souls_killed);
        }
    }
    events.push(
        observers,
        EventKind::Bombardment {
            colony: colony_id,
            attacker,
            batteries_destroyed,
            souls_killed,
        },
    );
    (batteries_destroyed, souls_killed)
}

fn damage_spaceports(
    state: &mut GameState,
    config: &GameConfig,
    colony_id: ColonyId,
    mut hits: u32,
) -> u32 {
    let spaceports: Vec<_> = state
        .colonies
        .get(colony_id)
        .map_or_else(Vec::new, |colony| {
            colony
                .neoria_ids
                .iter()
                .copied()
                .filter(|&id| {
                    state.neorias.get(id).is_some_and(|record| {
                        record.class == NeoriaClass::Spaceport && record.state.is_operational()
                    })
                })
                .collect()
        });
    let ds = config.sections.facilities.neoria_defense.max(1);
    for neoria in spaceports {
        if hits == 0 {
            break;
        }
        let Some(record) = state.neorias.get_mut(neoria) else {
            continue;
        };
        if record.state == CombatState::Undamaged && hits > 0 {
            let to_cripple = ds.saturating_sub(record.damage);
            if hits >= to_cripple {
                hits -= to_cripple;
                record.damage = 0;
                record.state = CombatState::Crippled;
            } else {
                record.damage += hits;
                hits = 0;
            }
        }
        if record.state == CombatState::Crippled && hits > 0 {
            let to_destroy = (ds / 2).max(1).saturating_sub(record.damage);
            if hits >= to_destroy {
                hits -= to_destroy;
                record.damage = 0;
                record.state = CombatState::Destroyed;
            } else {
                record.damage += hits;
                hits = 0;
            }
        }
    }
    hits
}

fn observers_for(state: &GameState, colony: ColonyId, attacker: HouseId) -> Observers {
    state.colonies.get(colony).map_or_else(
        || Observers::one(attacker),
        |record| Observers::pair(attacker, record.owner),
    )
}

/// Marines embarked across a fleet's squadrons, operational only.
fn embarked_marines(state: &GameState, fleet: FleetId) -> Vec<GroundUnitId> {
    state.fleets.get(fleet).map_or_else(Vec::new, |record| {
        record
            .squadrons
            .iter()
            .filter_map(|&squadron| state.squadrons.get(squadron))
            .flat_map(|sqn| sqn.marine_unit_ids.iter().copied())
            .filter(|&unit| {
                state
                    .ground_units
                    .get(unit)
                    .is_some_and(|record| record.state.is_operational())
            })
            .collect()
    })
}

/// Ground combat to the finish. Returns true when the attacker holds the
/// field. Ten-round bound; a stalled siege counts as a repulse.
fn ground_battle(
    state: &mut GameState,
    config: &GameConfig,
    attackers: &[GroundUnitId],
    defenders: &[GroundUnitId],
    defender_drm: i32,
    prng: &mut Prng,
) -> bool {
    for _ in 0..10 {
        let attacker_strength = ground_attack(state, config, attackers);
        let defender_strength = ground_attack(state, config, defenders);
        if defender_strength <= 0.0 {
            return attacker_strength > 0.0;
        }
        if attacker_strength <= 0.0 {
            return false;
        }
        let attacker_hits = (attacker_strength * cer(prng, 0)).floor() as u32;
        let defender_hits = (defender_strength * cer(prng, defender_drm)).floor() as u32;
        damage_ground_units(state, config, defenders, attacker_hits);
        damage_ground_units(state, config, attackers, defender_hits);
    }
    false
}

/// Hands the colony to the attacker: surviving marines land as the new
/// garrison and the losing garrison is wiped.
fn capture_colony(
    state: &mut GameState,
    colony_id: ColonyId,
    fleet: FleetId,
    attacker: HouseId,
    infrastructure_destroyed_percent: u32,
    events: &mut EventLog,
) {
    let previous_owner = state.colonies.get(colony_id).map(|record| record.owner);
    // The defeated garrison is gone.
    let defeated = garrison(
        state,
        colony_id,
        &[GroundClass::Army, GroundClass::Marine],
    );
    for unit in defeated {
        if let Some(record) = state.ground_units.get_mut(unit) {
            record.state = CombatState::Destroyed;
        }
    }
    if infrastructure_destroyed_percent > 0 {
        if let Some(colony) = state.colonies.get_mut(colony_id) {
            colony.infrastructure -=
                colony.infrastructure * infrastructure_destroyed_percent / 100;
        }
    }
    colony_ops::transfer_colony(state, colony_id, attacker);
    // Surviving marines disembark as the occupation garrison.
    let marines = embarked_marines(state, fleet);
    for unit in marines {
        if let Some(record) = state.ground_units.get_mut(unit) {
            if let GroundLocation::Embarked(squadron) = record.location {
                record.location = GroundLocation::Colony(colony_id);
                if let Some(sqn) = state.squadrons.get_mut(squadron) {
                    sqn.marine_unit_ids.retain(|&id| id != unit);
                }
            }
        }
        if let Some(colony) = state.colonies.get_mut(colony_id) {
            colony.ground_unit_ids.push(unit);
        }
    }
    let mut observers = vec![attacker];
    if let Some(previous) = previous_owner {
        observers.push(previous);
    }
    events.push(
        Observers::Houses(observers),
        EventKind::ColonyCaptured {
            colony: colony_id,
            by: attacker,
            infrastructure_destroyed_percent,
        },
    );
}

/// Standard invasion: bombard until the batteries are gone, then land.
/// Landing levels the shields and spaceports; victory costs the colony half
/// its infrastructure.
#[allow(clippy::too_many_arguments)]
fn run_invasion(
    state: &mut GameState,
    config: &GameConfig,
    system: SystemId,
    colony_id: ColonyId,
    fleet: FleetId,
    attacker: HouseId,
    prng: &mut Prng,
    events: &mut EventLog,
) {
    for _ in 0..BOMBARDMENT_ROUNDS_PER_TURN {
        if garrison(state, colony_id, &[GroundClass::Battery]).is_empty() {
            break;
        }
        bombardment_round(
            state, config, system, colony_id, fleet, attacker, false, prng, events,
        );
    }
    if !garrison(state, colony_id, &[GroundClass::Battery]).is_empty() {
        // Prerequisite unmet: the siege continues next turn, nothing lands.
        return;
    }
    let marines = embarked_marines(state, fleet);
    if marines.is_empty() {
        return;
    }
    // Landing destroys shields and spaceports immediately.
    if let Some(colony) = state.colonies.get_mut(colony_id) {
        colony.shield_level = 0;
    }
    damage_spaceports(state, config, colony_id, u32::MAX);
    let is_homeworld = state
        .colonies
        .get(colony_id)
        .is_some_and(|record| record.is_homeworld);
    let drm = 2 + i32::from(is_homeworld);
    let defenders = garrison(state, colony_id, &[GroundClass::Army, GroundClass::Marine]);
    let won = ground_battle(state, config, &marines, &defenders, drm, prng);
    let observers = observers_for(state, colony_id, attacker);
    events.push(
        observers,
        EventKind::InvasionResolved {
            colony: colony_id,
            attacker,
            success: won,
            blitz: false,
        },
    );
    if won {
        capture_colony(state, colony_id, fleet, attacker, 50, events);
    }
}

/// Blitz: one bombardment round with the batteries firing at everything,
/// then marines land under fire with the surviving batteries joining the
/// defense. Victory captures the works intact.
#[allow(clippy::too_many_arguments)]
fn run_blitz(
    state: &mut GameState,
    config: &GameConfig,
    system: SystemId,
    colony_id: ColonyId,
    fleet: FleetId,
    attacker: HouseId,
    prng: &mut Prng,
    events: &mut EventLog,
) {
    bombardment_round(
        state, config, system, colony_id, fleet, attacker, true, prng, events,
    );
    let marines = embarked_marines(state, fleet);
    if marines.is_empty() {
        let observers = observers_for(state, colony_id, attacker);
        events.push(
            observers,
            EventKind::InvasionResolved {
                colony: colony_id,
                attacker,
                success: false,
                blitz: true,
            },
        );
        return;
    }
    let is_homeworld = state
        .colonies
        .get(colony_id)
        .is_some_and(|record| record.is_homeworld);
    let drm = 3 + i32::from(is_homeworld);
    // Shields stay up and the batteries fight on the ground line.
    let defenders = garrison(
        state,
        colony_id,
        &[GroundClass::Battery, GroundClass::Army, GroundClass::Marine],
    );
    let won = ground_battle(state, config, &marines, &defenders, drm, prng);
    let observers = observers_for(state, colony_id, attacker);
    events.push(
        observers,
        EventKind::InvasionResolved {
            colony: colony_id,
            attacker,
            success: won,
            blitz: true,
        },
    );
    if won {
        capture_colony(state, colony_id, fleet, attacker, 0, events);
    }
}

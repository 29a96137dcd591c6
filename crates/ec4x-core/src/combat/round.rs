// SPDX-License-Identifier: Apache-2.0
//! The round engine shared by the space and orbital theaters.
//!
//! Per round: every house rolls a combat effectiveness rating, every shooter
//! turns `⌊AS · CER⌋` into hits, hits spread across the most-hostile tier of
//! targets in weighted proportional shares, damage lands, and every fleet
//! checks its nerve against its rules of engagement. Shooters and targets
//! are walked in canonical order and all variance comes from the theater
//! PRNG, so identical seeds replay identical battles.

use std::collections::{BTreeMap, BTreeSet};

use ec4x_rules_schema::{TargetBucket, TechField};

use crate::config::GameConfig;
use crate::event::{
    CombatTheater, CombatantRef, EventKind, EventLog, Observers, TheaterOutcome,
};
use crate::fleet::CombatState;
use crate::ident::{FleetId, HouseId, SystemId};
use crate::order::{FleetOrder, FleetOrderKind};
use crate::prng::Prng;
use crate::state::GameState;

use super::taskforce::{self, TaskForce};
use super::{
    AMBUSH_CER_BONUS, DESPERATION_CER_BONUS, MAX_ROUNDS, STALE_ROUND_LIMIT, SURPRISE_CER_BONUS,
};

/// Battle bookkeeping fed into prestige settlement after all theaters.
#[derive(Debug, Default)]
pub(crate) struct BattleTally {
    /// Field holder and the houses it defeated.
    pub victory: Option<(HouseId, Vec<HouseId>)>,
    /// `(killer, victim)` per squadron destroyed.
    pub squadron_kills: Vec<(HouseId, HouseId)>,
    /// `(killer, victim)` per starbase destroyed.
    pub starbase_kills: Vec<(HouseId, HouseId)>,
}

/// One combat unit frozen at the top of a round.
struct UnitSnap {
    house: HouseId,
    unit: CombatantRef,
    weight: f64,
    attack: f64,
    planet_breaker: bool,
}

fn snapshot_units(state: &GameState, config: &GameConfig, forces: &[TaskForce]) -> Vec<UnitSnap> {
    let mut snaps = Vec::new();
    for force in forces {
        let weapons = super::weapons_level(state, force.house);
        for &squadron in &force.squadrons {
            let Some(record) = state.squadrons.get(squadron) else {
                continue;
            };
            let alive = record.ship_ids().iter().any(|&ship| {
                state
                    .ships
                    .get(ship)
                    .is_some_and(|hull| hull.state.is_operational())
            });
            if !alive {
                continue;
            }
            let bucket = state
                .ships
                .get(record.flagship)
                .and_then(|hull| config.ship_spec(&hull.class))
                .map_or(TargetBucket::Escort, |spec| spec.bucket);
            let planet_breaker = record.ship_ids().iter().any(|&ship| {
                state
                    .ships
                    .get(ship)
                    .filter(|hull| hull.state.is_operational())
                    .and_then(|hull| config.ship_spec(&hull.class))
                    .is_some_and(|spec| spec.planet_breaker)
            });
            snaps.push(UnitSnap {
                house: force.house,
                unit: CombatantRef::Squadron(squadron),
                weight: bucket.weight(),
                attack: taskforce::squadron_attack(state, config, squadron, weapons),
                planet_breaker,
            });
        }
        for &kastra in &force.starbases {
            if state
                .kastras
                .get(kastra)
                .is_some_and(|record| record.state.is_operational())
            {
                snaps.push(UnitSnap {
                    house: force.house,
                    unit: CombatantRef::Starbase(kastra),
                    weight: TargetBucket::Starbase.weight(),
                    attack: super::kastra_attack(state, config, kastra),
                    planet_breaker: false,
                });
            }
        }
    }
    snaps
}

fn hostility_tier(state: &GameState, shooter: HouseId, target: HouseId) -> Option<u8> {
    match state.relation(shooter, target) {
        crate::house::DiploState::Enemy => Some(0),
        crate::house::DiploState::Hostile => Some(1),
        _ => None,
    }
}

/// Applies `hits` to one ship, returning `(unspent hits, state transitions)`.
pub(crate) fn damage_ship(
    state: &mut GameState,
    config: &GameConfig,
    system: SystemId,
    ship: crate::ident::ShipId,
    mut hits: u32,
    events: &mut EventLog,
    observers: &Observers,
) -> (u32, u32) {
    let mut transitions = 0;
    let Some(hull) = state.ships.get(ship) else {
        return (hits, 0);
    };
    let owner_house = hull_owner(state, ship);
    let Some(spec) = config.ship_spec(&hull.class) else {
        return (hits, 0);
    };
    let ds = spec.defense.max(1);
    let is_fighter = spec.bucket == TargetBucket::Fighter;
    let class = hull.class.clone();

    let Some(hull) = state.ships.get_mut(ship) else {
        return (hits, 0);
    };
    if hull.state == CombatState::Undamaged && hits > 0 {
        let to_cripple = ds.saturating_sub(hull.damage);
        if hits >= to_cripple {
            hits -= to_cripple;
            hull.damage = 0;
            hull.state = CombatState::Crippled;
            transitions += 1;
            if is_fighter {
                // Fighters have no crippled state to limp home in.
                hull.state = CombatState::Destroyed;
            }
        } else {
            hull.damage += hits;
            hits = 0;
        }
    }
    if hull.state == CombatState::Crippled && hits > 0 {
        let to_destroy = (ds / 2).max(1).saturating_sub(hull.damage);
        if hits >= to_destroy {
            hits -= to_destroy;
            hull.damage = 0;
            hull.state = CombatState::Destroyed;
            transitions += 1;
        } else {
            hull.damage += hits;
            hits = 0;
        }
    }
    let final_state = hull.state;
    match final_state {
        CombatState::Destroyed => {
            if let Some(owner) = owner_house {
                events.push(
                    observers.clone(),
                    EventKind::ShipDestroyed {
                        system,
                        ship,
                        class,
                        owner,
                    },
                );
            }
        }
        CombatState::Crippled if transitions > 0 => {
            if let Some(owner) = owner_house {
                events.push(
                    observers.clone(),
                    EventKind::ShipDamaged {
                        system,
                        ship,
                        owner,
                    },
                );
            }
        }
        _ => {}
    }
    (hits, transitions)
}

/// Owner house of a ship, through its squadron's home.
fn hull_owner(state: &GameState, ship: crate::ident::ShipId) -> Option<HouseId> {
    let squadron = state.ships.get(ship)?.squadron;
    match state.squadrons.get(squadron)?.home {
        crate::fleet::SquadronHome::Fleet(fleet) => state.fleets.get(fleet).map(|f| f.owner),
        crate::fleet::SquadronHome::Colony(colony) => {
            state.colonies.get(colony).map(|c| c.owner)
        }
    }
}

/// Applies a volley to one snapshot target. Returns state transitions.
#[allow(clippy::too_many_arguments)]
fn apply_volley(
    state: &mut GameState,
    config: &GameConfig,
    system: SystemId,
    shooter_house: HouseId,
    target: &UnitSnap,
    mut hits: u32,
    planet_breaker: bool,
    events: &mut EventLog,
    observers: &Observers,
    tally: &mut BattleTally,
) -> u32 {
    let mut transitions = 0;
    match target.unit {
        CombatantRef::Squadron(squadron) => {
            // Shield tech soaks part of a conventional volley; planet-breaker
            // ordnance punches straight through.
            if !planet_breaker {
                let shields = state
                    .houses
                    .get(target.house)
                    .map_or(0, |house| house.tech.field(TechField::Shields));
                let soak = (u64::from(hits) * u64::from(shields.min(10)) * 5 / 100) as u32;
                hits = hits.saturating_sub(soak);
            }
            let ships: Vec<_> = state.squadrons.get(squadron).map_or_else(Vec::new, |sqn| {
                // Escorts screen the flagship: they absorb first.
                let mut order = sqn.escorts.clone();
                order.push(sqn.flagship);
                order
            });
            for ship in ships {
                if hits == 0 {
                    break;
                }
                let (left, t) =
                    damage_ship(state, config, system, ship, hits, events, observers);
                hits = left;
                transitions += t;
            }
            let wiped = state.squadrons.get(squadron).is_some_and(|sqn| {
                sqn.ship_ids().iter().all(|&ship| {
                    state
                        .ships
                        .get(ship)
                        .is_none_or(|hull| hull.state == CombatState::Destroyed)
                })
            });
            if wiped && transitions > 0 {
                tally.squadron_kills.push((shooter_house, target.house));
            }
        }
        CombatantRef::Starbase(kastra) => {
            let ds = config.sections.facilities.kastra_defense.max(1);
            if let Some(record) = state.kastras.get_mut(kastra) {
                if record.state == CombatState::Undamaged && hits > 0 {
                    let to_cripple = ds.saturating_sub(record.damage);
                    if hits >= to_cripple {
                        hits -= to_cripple;
                        record.damage = 0;
                        record.state = CombatState::Crippled;
                        transitions += 1;
                    } else {
                        record.damage += hits;
                        hits = 0;
                    }
                }
                if record.state == CombatState::Crippled && hits > 0 {
                    let to_destroy = (ds / 2).max(1).saturating_sub(record.damage);
                    if hits >= to_destroy {
                        record.damage = 0;
                        record.state = CombatState::Destroyed;
                        transitions += 1;
                        tally.starbase_kills.push((shooter_house, target.house));
                    } else {
                        record.damage += hits;
                    }
                }
            }
        }
    }
    transitions
}

/// Runs one theater to termination. Returns the theater outcome.
#[allow(clippy::too_many_arguments)]
pub(crate) fn run_theater(
    state: &mut GameState,
    config: &GameConfig,
    system: SystemId,
    theater: CombatTheater,
    forces: &mut Vec<TaskForce>,
    detected: &BTreeSet<HouseId>,
    surprised: &BTreeSet<HouseId>,
    owner: Option<HouseId>,
    prng: &mut Prng,
    events: &mut EventLog,
    tally: &mut BattleTally,
) -> TheaterOutcome {
    let participant_houses: Vec<HouseId> = forces.iter().map(|force| force.house).collect();
    let observers = Observers::Houses(participant_houses.clone());

    // Initial operational combat-ship counts per fleet, for the screened
    // casualty rate applied on retreat.
    let initial_ships: BTreeMap<FleetId, u32> = forces
        .iter()
        .flat_map(|force| force.fleets.iter().copied())
        .map(|fleet| (fleet, fleet_combat_ships(state, fleet)))
        .collect();

    let mut stale_rounds = 0;
    let mut desperation_this_round = false;
    let mut desperation_spent = false;

    for round in 1..=MAX_ROUNDS {
        let snaps = snapshot_units(state, config, forces);
        let mut houses_alive: Vec<HouseId> = snaps
            .iter()
            .filter(|snap| snap.attack > 0.0)
            .map(|snap| snap.house)
            .collect();
        houses_alive.sort_unstable();
        houses_alive.dedup();
        if houses_alive.len() <= 1 {
            break;
        }

        events.push(
            observers.clone(),
            EventKind::CombatPhaseBegan {
                system,
                theater,
                round,
            },
        );

        // CER per house, rolled in house order.
        let mut cer: BTreeMap<HouseId, f64> = BTreeMap::new();
        for &house in &participant_houses {
            let mut modifier = state
                .houses
                .get(house)
                .map_or(0, crate::house::House::morale_modifier);
            if round == 1 {
                if !detected.contains(&house)
                    && super::detection::fields_cloaked(state, config, forces, house)
                {
                    modifier += AMBUSH_CER_BONUS;
                }
                if surprised.contains(&house) {
                    modifier += SURPRISE_CER_BONUS;
                }
            }
            if desperation_this_round && Some(house) != owner {
                modifier += DESPERATION_CER_BONUS;
            }
            let roll = prng.d10() + modifier;
            cer.insert(house, f64::from(roll.clamp(1, 15)) / 10.0);
        }

        // Every shooter fires from the pre-round snapshot.
        let mut transitions = 0;
        for shooter in &snaps {
            let hits = (shooter.attack * cer.get(&shooter.house).copied().unwrap_or(1.0))
                .floor() as u32;
            if hits == 0 {
                continue;
            }
            // Most-hostile tier present wins all the hits.
            let best_tier = snaps
                .iter()
                .filter(|snap| snap.house != shooter.house)
                .filter_map(|snap| hostility_tier(state, shooter.house, snap.house))
                .min();
            let Some(tier) = best_tier else {
                continue;
            };
            let target_idx: Vec<usize> = snaps
                .iter()
                .enumerate()
                .filter(|(_, snap)| {
                    snap.house != shooter.house
                        && hostility_tier(state, shooter.house, snap.house) == Some(tier)
                })
                .map(|(idx, _)| idx)
                .collect();
            if target_idx.is_empty() {
                continue;
            }

            // Weighted proportional shares with ±5% variance, summing to one.
            let mut shares: Vec<f64> = target_idx
                .iter()
                .map(|&idx| {
                    let snap = &snaps[idx];
                    snap.weight * snap.attack * prng.variance(0.05)
                })
                .collect();
            let total: f64 = shares.iter().sum();
            if total <= f64::EPSILON {
                shares = vec![1.0; target_idx.len()];
            }
            let total: f64 = shares.iter().sum();
            let mut allocated: Vec<u32> = shares
                .iter()
                .map(|share| (f64::from(hits) * share / total).floor() as u32)
                .collect();
            let mut remainder = hits - allocated.iter().sum::<u32>();
            // Largest fractional parts take the leftover, ties to the lower
            // snapshot index.
            let mut frac_order: Vec<usize> = (0..target_idx.len()).collect();
            frac_order.sort_by(|&a, &b| {
                let fa = f64::from(hits) * shares[a] / total - f64::from(allocated[a]);
                let fb = f64::from(hits) * shares[b] / total - f64::from(allocated[b]);
                fb.partial_cmp(&fa).unwrap_or(std::cmp::Ordering::Equal).then(a.cmp(&b))
            });
            let mut cursor = 0;
            while remainder > 0 && !frac_order.is_empty() {
                allocated[frac_order[cursor % frac_order.len()]] += 1;
                remainder -= 1;
                cursor += 1;
            }

            // Deliver, aggregating the volley event per target house.
            let mut per_house: BTreeMap<HouseId, u32> = BTreeMap::new();
            for (slot, &idx) in target_idx.iter().enumerate() {
                let volley = allocated[slot];
                if volley == 0 {
                    continue;
                }
                let target_house = snaps[idx].house;
                *per_house.entry(target_house).or_default() += volley;
                transitions += apply_volley(
                    state,
                    config,
                    system,
                    shooter.house,
                    &snaps[idx],
                    volley,
                    shooter.planet_breaker,
                    events,
                    &observers,
                    tally,
                );
            }
            for (target_house, volley) in per_house {
                events.push(
                    observers.clone(),
                    EventKind::WeaponFired {
                        system,
                        shooter: shooter.unit,
                        target_house,
                        hits: volley,
                    },
                );
            }
        }

        events.push(
            observers.clone(),
            EventKind::CombatPhaseCompleted {
                system,
                theater,
                round,
            },
        );

        // Retreat checks, per fleet, against total hostile AS.
        transitions += evaluate_retreats(state, config, forces, owner, &initial_ships);

        if transitions == 0 {
            stale_rounds += 1;
        } else {
            stale_rounds = 0;
        }
        if desperation_this_round {
            desperation_this_round = false;
            if transitions == 0 {
                // The desperation round changed nothing: declared stalemate.
                return TheaterOutcome::Stalemate;
            }
        } else if stale_rounds >= STALE_ROUND_LIMIT && !desperation_spent {
            desperation_this_round = true;
            desperation_spent = true;
        } else if stale_rounds >= STALE_ROUND_LIMIT {
            return TheaterOutcome::Stalemate;
        }
    }

    // Outcome from whoever still has teeth.
    let snaps = snapshot_units(state, config, forces);
    let mut survivors: Vec<HouseId> = snaps
        .iter()
        .filter(|snap| snap.attack > 0.0)
        .map(|snap| snap.house)
        .collect();
    survivors.sort_unstable();
    survivors.dedup();

    if survivors.len() == 1 {
        let victor = survivors[0];
        let losers: Vec<HouseId> = participant_houses
            .iter()
            .copied()
            .filter(|&house| house != victor && state.relation(victor, house).permits_combat())
            .collect();
        if !losers.is_empty() {
            tally.victory = Some((victor, losers));
        }
    }

    match owner {
        Some(owner_house) => {
            let defender_alive = survivors.contains(&owner_house);
            let attacker_alive = survivors.iter().any(|&house| house != owner_house);
            if attacker_alive && !defender_alive {
                TheaterOutcome::AttackerSupremacy
            } else if defender_alive && !attacker_alive {
                TheaterOutcome::DefenderHolds
            } else if defender_alive {
                TheaterOutcome::DefenderHolds
            } else {
                TheaterOutcome::Stalemate
            }
        }
        None => {
            if survivors.len() == 1 {
                TheaterOutcome::AttackerSupremacy
            } else {
                TheaterOutcome::Stalemate
            }
        }
    }
}

/// Operational ships in a fleet's combat squadrons.
fn fleet_combat_ships(state: &GameState, fleet: FleetId) -> u32 {
    let Some(record) = state.fleets.get(fleet) else {
        return 0;
    };
    record
        .squadrons
        .iter()
        .filter_map(|&squadron| state.squadrons.get(squadron))
        .filter(|sqn| sqn.kind == crate::fleet::SquadronKind::Combat)
        .flat_map(|sqn| sqn.ship_ids())
        .filter(|&ship| {
            state
                .ships
                .get(ship)
                .is_some_and(|hull| hull.state.is_operational())
        })
        .count() as u32
}

/// Evaluates retreat per fleet. A retreating fleet leaves the battle at
/// once: its squadrons leave the force lists, its screened squadrons take
/// the combat casualty rate, and it is flagged for a post-combat seek-home
/// order. Returns the number of state transitions caused.
fn evaluate_retreats(
    state: &mut GameState,
    config: &GameConfig,
    forces: &mut Vec<TaskForce>,
    owner: Option<HouseId>,
    initial_ships: &BTreeMap<FleetId, u32>,
) -> u32 {
    let mut transitions = 0;
    let homeworld_system: Option<SystemId> = owner
        .and_then(|house| state.houses.get(house))
        .and_then(|house| house.homeworld)
        .and_then(|colony| state.colonies.get(colony))
        .map(|colony| colony.system);

    for force_idx in 0..forces.len() {
        let house = forces[force_idx].house;
        let enemy_attack: f64 = forces
            .iter()
            .filter(|other| {
                other.house != house && state.relation(house, other.house).permits_combat()
            })
            .map(|other| taskforce::force_attack(state, config, other))
            .sum();
        if enemy_attack <= 0.0 {
            continue;
        }
        let fleets = forces[force_idx].fleets.clone();
        for fleet in fleets {
            let Some(record) = state.fleets.get(fleet) else {
                continue;
            };
            // A house defending its homeworld never retreats.
            if Some(house) == owner && homeworld_system == Some(record.system) {
                continue;
            }
            let morale = state
                .houses
                .get(house)
                .map_or(0, crate::house::House::morale_modifier);
            let effective_roe = i32::from(record.roe) + morale;
            let threshold = super::roe_threshold(effective_roe);
            let weapons = super::weapons_level(state, house);
            let fleet_attack: f64 = record
                .squadrons
                .iter()
                .filter(|&&squadron| {
                    state
                        .squadrons
                        .get(squadron)
                        .is_some_and(|sqn| sqn.kind == crate::fleet::SquadronKind::Combat)
                })
                .map(|&squadron| taskforce::squadron_attack(state, config, squadron, weapons))
                .sum();
            // Strictly below the threshold: a fleet exactly at it stands.
            if fleet_attack / enemy_attack >= threshold {
                continue;
            }

            // Screened squadrons pay the combat casualty rate on the way out.
            let initial = initial_ships.get(&fleet).copied().unwrap_or(0);
            let current = fleet_combat_ships(state, fleet);
            let rate = if initial == 0 {
                0.0
            } else {
                1.0 - f64::from(current) / f64::from(initial)
            };
            transitions += apply_screened_losses(state, fleet, rate);

            let force = &mut forces[force_idx];
            if let Some(fleet_record) = state.fleets.get(fleet) {
                force
                    .squadrons
                    .retain(|squadron| !fleet_record.squadrons.contains(squadron));
                force
                    .screened
                    .retain(|squadron| !fleet_record.squadrons.contains(squadron));
            }
            force.fleets.retain(|&f| f != fleet);
            // Marked for the post-combat seek-home pass.
            if let Some(fleet_record) = state.fleets.get_mut(fleet) {
                fleet_record.order = Some(FleetOrder::of(FleetOrderKind::SeekHome));
            }
            transitions += 1;
        }
    }
    transitions
}

/// Destroys a share of a retreating fleet's screened ships equal to the
/// combat casualty rate.
fn apply_screened_losses(state: &mut GameState, fleet: FleetId, rate: f64) -> u32 {
    if rate <= 0.0 {
        return 0;
    }
    let screened_ships: Vec<crate::ident::ShipId> = state
        .fleets
        .get(fleet)
        .map_or_else(Vec::new, |record| {
            record
                .squadrons
                .iter()
                .filter_map(|&squadron| state.squadrons.get(squadron))
                .filter(|sqn| sqn.kind != crate::fleet::SquadronKind::Combat)
                .flat_map(crate::fleet::Squadron::ship_ids)
                .filter(|&ship| {
                    state
                        .ships
                        .get(ship)
                        .is_some_and(|hull| hull.state.is_operational())
                })
                .collect()
        });
    let losses = (rate * screened_ships.len() as f64).floor() as usize;
    let mut transitions = 0;
    for &ship in screened_ships.iter().take(losses) {
        if let Some(hull) = state.ships.get_mut(ship) {
            hull.state = CombatState::Destroyed;
            transitions += 1;
        }
    }
    transitions
}

// SPDX-License-Identifier: Apache-2.0
//! The multi-theater combat resolver.
//!
//! One entry point per contested system. Theaters run Space → Orbital →
//! Planetary; progression stops the moment the attacker fails to hold the
//! field. Every roll comes from a PRNG seeded by `(turn, system, theater)`,
//! so a replay reproduces the battle hit for hit.

mod detection;
mod planetary;
mod round;
mod taskforce;

use std::collections::BTreeSet;

use crate::config::GameConfig;
use crate::event::{
    CombatTheater, EventKind, EventLog, Observers, PrestigeReason, TheaterOutcome,
};
use crate::fleet::{CombatState, Ship};
use crate::house::DiploState;
use crate::ident::{FleetId, HouseId, KastraId, SystemId};
use crate::ops::{facility_ops, fleet_ops, squadron_ops};
use crate::order::{FleetOrder, FleetOrderKind};
use crate::path;
use crate::prng::{phase_seed, Prng};
use crate::state::GameState;

pub(crate) use round::BattleTally;

/// Hard cap on rounds per theater.
pub(crate) const MAX_ROUNDS: u32 = 20;
/// Consecutive no-change rounds before the desperation round fires.
pub(crate) const STALE_ROUND_LIMIT: u32 = 5;
/// CER bonus for an undetected raider force in its first round.
pub(crate) const AMBUSH_CER_BONUS: i32 = 4;
/// CER bonus for the detection winner in its first round.
pub(crate) const SURPRISE_CER_BONUS: i32 = 3;
/// CER bonus handed to attackers in the desperation round.
pub(crate) const DESPERATION_CER_BONUS: i32 = 2;
/// Bombardment rounds allowed per turn.
pub(crate) const BOMBARDMENT_ROUNDS_PER_TURN: u32 = 3;
/// Bombardment hits needed to level one infrastructure step.
pub(crate) const INFRA_HITS_PER_LEVEL: u32 = 2;

/// Zero-sum prestige for winning a battle.
const PRESTIGE_BATTLE_VICTORY: i64 = 10;
/// Zero-sum prestige per enemy squadron destroyed.
const PRESTIGE_SQUADRON_KILL: i64 = 2;
/// Zero-sum prestige per enemy starbase destroyed.
const PRESTIGE_STARBASE_KILL: i64 = 5;

/// Retreat threshold by effective ROE: a fleet disengages when its own AS
/// over total enemy AS drops strictly below the threshold.
pub(crate) fn roe_threshold(effective_roe: i32) -> f64 {
    match effective_roe.clamp(0, 10) {
        1 => 999.0,
        2 => 4.0,
        3 => 3.0,
        4 => 2.0,
        5 => 1.5,
        6 => 1.0,
        7 => 0.67,
        8 => 0.5,
        9 => 0.33,
        // 0 never fields a threshold; 10 never retreats.
        _ => 0.0,
    }
}

/// Attack strength of one hull: class AS with the weapons-tech bonus,
/// halved when crippled, zero when destroyed.
pub(crate) fn ship_attack(config: &GameConfig, ship: &Ship, weapons_level: u32) -> f64 {
    let Some(spec) = config.ship_spec(&ship.class) else {
        return 0.0;
    };
    let base = f64::from(spec.attack) * (1.0 + f64::from(weapons_level) * 0.05);
    match ship.state {
        CombatState::Undamaged => base,
        CombatState::Crippled => base * 0.5,
        CombatState::Destroyed => 0.0,
    }
}

/// Attack strength of a starbase.
pub(crate) fn kastra_attack(state: &GameState, config: &GameConfig, kastra: KastraId) -> f64 {
    let Some(record) = state.kastras.get(kastra) else {
        return 0.0;
    };
    let base = f64::from(config.sections.facilities.kastra_attack);
    match record.state {
        CombatState::Undamaged => base,
        CombatState::Crippled => base * 0.5,
        CombatState::Destroyed => 0.0,
    }
}

/// Weapons tech level of a house.
pub(crate) fn weapons_level(state: &GameState, house: HouseId) -> u32 {
    state
        .houses
        .get(house)
        .map_or(0, |h| h.tech.field(ec4x_rules_schema::TechField::Weapons))
}

/// Escalates the relation between two houses to at least `floor`, emitting
/// the diplomatic event when something actually changed. Monotonic.
pub(crate) fn escalate(
    state: &mut GameState,
    events: &mut EventLog,
    a: HouseId,
    b: HouseId,
    floor: DiploState,
) {
    let current = state.relation(a, b);
    let next = current.max(floor);
    if next != current {
        let turn = state.turn;
        state.set_relation(a, b, next, turn);
        events.push(
            Observers::pair(a, b),
            EventKind::DiplomaticStateChanged {
                a,
                b,
                state: next,
                cause: crate::event::DiploCause::CombatEscalation,
            },
        );
    }
}

/// Applies a zero-sum prestige transfer: `winner` gains `amount`, `loser`
/// pays it.
pub(crate) fn prestige_transfer(
    state: &mut GameState,
    events: &mut EventLog,
    winner: HouseId,
    loser: HouseId,
    amount: i64,
    winner_reason: PrestigeReason,
    loser_reason: PrestigeReason,
) {
    if let Some(house) = state.houses.get_mut(winner) {
        house.prestige += amount;
    }
    if let Some(house) = state.houses.get_mut(loser) {
        house.prestige -= amount;
    }
    events.push(
        Observers::All,
        EventKind::PrestigeEvent {
            house: winner,
            delta: amount,
            reason: winner_reason,
        },
    );
    events.push(
        Observers::All,
        EventKind::PrestigeEvent {
            house: loser,
            delta: -amount,
            reason: loser_reason,
        },
    );
}

/// Resolves every theater of combat in one contested system.
///
/// `arrivals` lists fleets whose movement completed this turn; only they may
/// execute planetary operations after orbital supremacy.
pub fn resolve_system_combat(
    state: &mut GameState,
    config: &GameConfig,
    system: SystemId,
    arrivals: &BTreeSet<FleetId>,
    events: &mut EventLog,
) {
    let classification = taskforce::classify(state, config, system);
    if !classification.combat_possible() {
        return;
    }
    let owner = classification.owner;
    let participants = classification.participant_houses(state);
    events.push(
        Observers::Houses(participants.clone()),
        EventKind::Battle {
            system,
            participants: participants.clone(),
            victor: None,
        },
    );

    // Space combat escalates toward Hostile between every engaged pair.
    for (i, &a) in participants.iter().enumerate() {
        for &b in &participants[i + 1..] {
            if state.relation(a, b).permits_combat() {
                escalate(state, events, a, b, DiploState::Hostile);
            }
        }
    }

    let mut tally = BattleTally::default();
    let mut detected: BTreeSet<HouseId> = BTreeSet::new();
    let mut surprised: BTreeSet<HouseId> = BTreeSet::new();
    let mut detection_done = false;

    // ── Space ────────────────────────────────────────────────────────
    let mut space_forces =
        taskforce::build_space_forces(state, config, &classification);
    let hostile_pair_present = space_forces.iter().enumerate().any(|(i, a)| {
        space_forces[i + 1..]
            .iter()
            .any(|b| state.relation(a.house, b.house).permits_combat())
    });
    let mut attackers_survive = true;
    if space_forces.len() >= 2 && hostile_pair_present {
        let seed = phase_seed(state.base_seed, state.turn, Some(system), "space-combat");
        let mut prng = Prng::from_seed_u64(seed);
        detection::resolve_detection(
            state,
            config,
            system,
            &space_forces,
            &mut detected,
            &mut surprised,
            &mut prng,
            events,
        );
        detection_done = true;
        events.push(
            Observers::Houses(participants.clone()),
            EventKind::CombatTheaterBegan {
                system,
                theater: CombatTheater::Space,
            },
        );
        let outcome = round::run_theater(
            state,
            config,
            system,
            CombatTheater::Space,
            &mut space_forces,
            &detected,
            &surprised,
            owner,
            &mut prng,
            events,
            &mut tally,
        );
        events.push(
            Observers::Houses(participants.clone()),
            EventKind::CombatTheaterCompleted {
                system,
                theater: CombatTheater::Space,
                outcome,
            },
        );
        attackers_survive = outcome == TheaterOutcome::AttackerSupremacy;
        cleanup_system(state, system, events);
    }

    // ── Orbital ──────────────────────────────────────────────────────
    let mut orbital_supremacy = false;
    if let Some(owner_house) = owner {
        if attackers_survive {
            let mut orbital_forces =
                taskforce::build_orbital_forces(state, config, &classification);
            let attackers_present = orbital_forces.iter().any(|tf| {
                tf.house != owner_house
                    && state.relation(tf.house, owner_house).permits_combat()
                    && taskforce::force_attack(state, config, tf) > 0.0
            });
            let defense_present = orbital_forces.iter().any(|tf| tf.house == owner_house);
            if attackers_present {
                let assaulting: Vec<HouseId> = orbital_forces
                    .iter()
                    .map(|tf| tf.house)
                    .filter(|&house| {
                        house != owner_house
                            && state.relation(house, owner_house).permits_combat()
                    })
                    .collect();
                for house in assaulting {
                    escalate(state, events, house, owner_house, DiploState::Enemy);
                }
                if defense_present {
                    let seed =
                        phase_seed(state.base_seed, state.turn, Some(system), "orbital-combat");
                    let mut prng = Prng::from_seed_u64(seed);
                    // A house detected in space combat stays detected here;
                    // when no space battle happened, the contest runs now.
                    if !detection_done {
                        detection::resolve_detection(
                            state,
                            config,
                            system,
                            &orbital_forces,
                            &mut detected,
                            &mut surprised,
                            &mut prng,
                            events,
                        );
                    }
                    events.push(
                        Observers::Houses(participants.clone()),
                        EventKind::CombatTheaterBegan {
                            system,
                            theater: CombatTheater::Orbital,
                        },
                    );
                    let outcome = round::run_theater(
                        state,
                        config,
                        system,
                        CombatTheater::Orbital,
                        &mut orbital_forces,
                        &detected,
                        &surprised,
                        owner,
                        &mut prng,
                        events,
                        &mut tally,
                    );
                    events.push(
                        Observers::Houses(participants.clone()),
                        EventKind::CombatTheaterCompleted {
                            system,
                            theater: CombatTheater::Orbital,
                            outcome,
                        },
                    );
                    orbital_supremacy = outcome == TheaterOutcome::AttackerSupremacy;
                    cleanup_system(state, system, events);
                } else {
                    orbital_supremacy = true;
                }
            }
        }
    }

    // ── Planetary ────────────────────────────────────────────────────
    if orbital_supremacy {
        if let Some(colony_id) = state.colony_in_system(system) {
            let seed = phase_seed(state.base_seed, state.turn, Some(system), "planetary-combat");
            let mut prng = Prng::from_seed_u64(seed);
            planetary::resolve_planetary(
                state, config, system, colony_id, arrivals, &mut prng, events,
            );
            cleanup_system(state, system, events);
        }
    }

    settle_prestige(state, events, &tally);
    apply_retreats(state, config, system, events);
}

/// Converts the battle tally into zero-sum prestige.
fn settle_prestige(state: &mut GameState, events: &mut EventLog, tally: &BattleTally) {
    if let Some((winner, losers)) = &tally.victory {
        for &loser in losers {
            prestige_transfer(
                state,
                events,
                *winner,
                loser,
                PRESTIGE_BATTLE_VICTORY,
                PrestigeReason::BattleVictory,
                PrestigeReason::BattleDefeat,
            );
        }
    }
    for &(killer, victim) in &tally.squadron_kills {
        prestige_transfer(
            state,
            events,
            killer,
            victim,
            PRESTIGE_SQUADRON_KILL,
            PrestigeReason::SquadronKill,
            PrestigeReason::SquadronLost,
        );
    }
    for &(killer, victim) in &tally.starbase_kills {
        prestige_transfer(
            state,
            events,
            killer,
            victim,
            PRESTIGE_STARBASE_KILL,
            PrestigeReason::StarbaseKill,
            PrestigeReason::StarbaseLost,
        );
    }
}

/// Post-combat retreat orders: every fleet flagged as retreating gets a
/// seek-home destination, or holds if none is reachable.
fn apply_retreats(
    state: &mut GameState,
    config: &GameConfig,
    system: SystemId,
    events: &mut EventLog,
) {
    let retreating: Vec<FleetId> = state
        .fleets_in_system(system)
        .into_iter()
        .filter(|&fleet| {
            state
                .fleets
                .get(fleet)
                .is_some_and(|record| record.order.is_some_and(|o| o.kind == FleetOrderKind::SeekHome && o.target_system.is_none()))
        })
        .collect();
    for fleet in retreating {
        let Some(owner) = state.fleets.get(fleet).map(|f| f.owner) else {
            continue;
        };
        let destination = path::seek_home_destination(state, config, fleet);
        match destination {
            Some(target) if target != system => {
                fleet_ops::set_order(
                    state,
                    fleet,
                    Some(FleetOrder::to_system(FleetOrderKind::SeekHome, target)),
                );
                events.push(
                    Observers::one(owner),
                    EventKind::FleetRetreat {
                        system,
                        fleet,
                        destination: Some(target),
                    },
                );
            }
            _ => {
                // Nowhere safe to run; hold position rather than vanish.
                fleet_ops::set_order(state, fleet, Some(FleetOrder::of(FleetOrderKind::Hold)));
                events.push(
                    Observers::one(owner),
                    EventKind::FleetRetreat {
                        system,
                        fleet,
                        destination: None,
                    },
                );
            }
        }
    }
}

/// Post-theater cleanup, in the mandated order: destroyed ships, then empty
/// fleets, then destroyed facilities (cancelling their projects), then
/// destroyed ground units. Ids are collected before any mutation.
pub(crate) fn cleanup_system(state: &mut GameState, system: SystemId, events: &mut EventLog) {
    // Destroyed ships.
    let dead_ships: Vec<_> = state
        .ships
        .iter()
        .filter(|(_, ship)| ship.state == CombatState::Destroyed)
        .map(|(id, _)| id)
        .collect();
    for ship in dead_ships {
        squadron_ops::remove_ship(state, ship);
    }

    // Fleets with nothing left.
    let empty_fleets: Vec<_> = state
        .fleets
        .iter()
        .filter(|(_, fleet)| fleet.system == system && fleet.squadrons.is_empty())
        .map(|(id, _)| id)
        .collect();
    for fleet in empty_fleets {
        fleet_ops::remove_fleet(state, fleet);
    }

    // Destroyed facilities; their queues die with them.
    let dead_kastras: Vec<_> = state
        .kastras
        .iter()
        .filter(|(_, kastra)| kastra.state == CombatState::Destroyed)
        .map(|(id, _)| id)
        .collect();
    for kastra in dead_kastras {
        facility_ops::destroy_kastra(state, kastra);
    }
    let dead_neorias: Vec<_> = state
        .neorias
        .iter()
        .filter(|(_, neoria)| neoria.state == CombatState::Destroyed)
        .map(|(id, neoria)| (id, neoria.colony))
        .collect();
    for (neoria, colony) in dead_neorias {
        let lost = facility_ops::destroy_neoria(state, neoria);
        if lost > 0 {
            let observers = state
                .colonies
                .get(colony)
                .map_or(Observers::All, |c| Observers::one(c.owner));
            events.push(observers, EventKind::ColonyProjectsLost { colony, count: lost });
        }
    }

    // Destroyed ground units.
    let dead_ground: Vec<_> = state
        .ground_units
        .iter()
        .filter(|(_, unit)| unit.state == CombatState::Destroyed)
        .map(|(id, unit)| (id, unit.class, unit.location))
        .collect();
    for (unit, class, location) in dead_ground {
        if let crate::ground::GroundLocation::Colony(colony) = location {
            if let Some(owner) = state.colonies.get(colony).map(|record| record.owner) {
                events.push(
                    Observers::one(owner),
                    EventKind::GroundUnitDestroyed {
                        colony,
                        class,
                        owner,
                    },
                );
            }
        }
        facility_ops::destroy_ground_unit(state, unit);
    }
}

#[cfg(test)]
mod tests {
    use super::roe_threshold;

    #[test]
    fn roe_thresholds_match_the_doctrine_table() {
        let expected = [0.0, 999.0, 4.0, 3.0, 2.0, 1.5, 1.0, 0.67, 0.5, 0.33, 0.0];
        for (roe, &threshold) in expected.iter().enumerate() {
            assert!((roe_threshold(roe as i32) - threshold).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn effective_roe_is_clamped() {
        assert!((roe_threshold(-3) - roe_threshold(0)).abs() < f64::EPSILON);
        assert!((roe_threshold(14) - roe_threshold(10)).abs() < f64::EPSILON);
    }

    #[test]
    fn ratio_exactly_at_threshold_stands() {
        // The retreat rule is strictly-less-than; parity holds the line.
        let threshold = roe_threshold(5);
        let ratio = threshold;
        assert!(ratio >= threshold);
    }
}

// SPDX-License-Identifier: Apache-2.0
//! The espionage phase: one covert attempt per house per turn.
//!
//! Attempts resolve in house order against the target's counter-intelligence
//! pool. Investment is capped at the detection threshold during intake, so
//! the penalty path here only fires when the contest itself goes badly
//! wrong.

use crate::config::GameConfig;
use crate::event::{EventKind, EventLog, Observers, PrestigeReason};
use crate::ident::HouseId;
use crate::order::{EspionageAttempt, EspionageKind};
use crate::prng::{phase_seed, Prng};
use crate::state::GameState;

/// EBP consumed by mounting one attempt.
const ATTEMPT_EBP_COST: u32 = 5;
/// Margin by which the defense roll must win to burn the operatives.
const DETECTION_MARGIN: i32 = 3;
/// Prestige lost when an attempt is detected.
const DETECTION_PRESTIGE_PENALTY: i64 = 2;

/// Resolves the turn's espionage attempts, in actor-house order.
pub fn run(
    state: &mut GameState,
    config: &GameConfig,
    attempts: &[(HouseId, EspionageAttempt)],
    events: &mut EventLog,
) {
    let seed = phase_seed(state.base_seed, state.turn, None, "espionage");
    let mut prng = Prng::from_seed_u64(seed);
    let _ = config;

    let mut sorted: Vec<&(HouseId, EspionageAttempt)> = attempts.iter().collect();
    sorted.sort_by_key(|(house, _)| *house);

    for &(actor, attempt) in sorted {
        let target = attempt.target;
        if actor == target
            || !state.houses.contains(actor)
            || !state.houses.contains(target)
        {
            continue;
        }
        let ebp = state
            .houses
            .get(actor)
            .map_or(0, |house| house.espionage.ebp);
        let cip = state
            .houses
            .get(target)
            .map_or(0, |house| house.espionage.cip);
        if let Some(house) = state.houses.get_mut(actor) {
            house.espionage.ebp = house.espionage.ebp.saturating_sub(ATTEMPT_EBP_COST);
        }

        let actor_roll = prng.d10() + i32::try_from(ebp.min(10)).unwrap_or(10);
        let defense_roll = prng.d10() + i32::try_from(cip.min(10)).unwrap_or(10);
        let success = actor_roll > defense_roll;
        let detected = defense_roll >= actor_roll + DETECTION_MARGIN;

        if success {
            apply_effect(state, actor, attempt);
        }
        if detected {
            if let Some(house) = state.houses.get_mut(actor) {
                house.prestige -= DETECTION_PRESTIGE_PENALTY;
            }
            events.push(
                Observers::All,
                EventKind::PrestigeEvent {
                    house: actor,
                    delta: -DETECTION_PRESTIGE_PENALTY,
                    reason: PrestigeReason::EspionageDetected,
                },
            );
        }
        let observers = if detected {
            Observers::pair(actor, target)
        } else {
            Observers::one(actor)
        };
        events.push(
            observers,
            EventKind::EspionageResolved {
                actor,
                target,
                kind: attempt.kind,
                success,
                detected,
            },
        );
    }
}

fn apply_effect(state: &mut GameState, actor: HouseId, attempt: EspionageAttempt) {
    match attempt.kind {
        EspionageKind::TechProbe => {
            let stolen = state
                .houses
                .get(attempt.target)
                .map(|house| house.tech.clone());
            let turn = state.turn;
            if let (Some(tech), Some(house)) = (stolen, state.houses.get_mut(actor)) {
                house
                    .intel
                    .known_enemy_tech
                    .insert(attempt.target, (tech, turn));
            }
        }
        EspionageKind::Sabotage => {
            // Delay the target's first active construction project.
            let victim_project = state
                .indexes
                .colonies_by_owner
                .get(&attempt.target)
                .and_then(|colonies| {
                    colonies.iter().find_map(|colony| {
                        state
                            .indexes
                            .projects_by_colony
                            .get(colony)
                            .and_then(|projects| {
                                projects.iter().find_map(|project| match project {
                                    crate::project::ProjectId::Construction(id) => Some(*id),
                                    crate::project::ProjectId::Repair(_) => None,
                                })
                            })
                    })
                });
            if let Some(id) = victim_project {
                if let Some(project) = state.construction_projects.get_mut(id) {
                    project.turns_remaining += 1;
                }
            }
        }
    }
}

// SPDX-License-Identifier: Apache-2.0
//! Pre-combat raider detection.
//!
//! Raider squadrons open the battle cloaked. Each cloaked force rolls its
//! cloaking tech against every hostile detector's electronic intelligence
//! (plus the starbase bonus when the detector owns an operational starbase
//! here). A stripped cloak is public; a successful sneak is visible only to
//! the raider's own house. Detection in the space theater persists into the
//! orbital theater.

use std::collections::BTreeSet;

use ec4x_rules_schema::TechField;

use crate::config::GameConfig;
use crate::event::{EventKind, EventLog, Observers};
use crate::ident::{HouseId, SystemId};
use crate::prng::Prng;
use crate::state::GameState;

use super::taskforce::TaskForce;

/// Whether a force fields any cloak-capable squadron.
fn has_cloaked_squadrons(state: &GameState, config: &GameConfig, force: &TaskForce) -> bool {
    force.squadrons.iter().any(|&squadron| {
        state.squadrons.get(squadron).is_some_and(|sqn| {
            sqn.ship_ids().iter().any(|&ship| {
                state
                    .ships
                    .get(ship)
                    .and_then(|hull| config.ship_spec(&hull.class))
                    .is_some_and(|spec| spec.cloaked)
            })
        })
    })
}

fn tech_level(state: &GameState, house: HouseId, field: TechField) -> i32 {
    state
        .houses
        .get(house)
        .map_or(0, |record| record.tech.field(field)) as i32
}

/// Starbase detection bonus for `house` at `system` (its colony must hold an
/// operational starbase there).
fn starbase_bonus(state: &GameState, config: &GameConfig, house: HouseId, system: SystemId) -> i32 {
    let Some(colony) = state
        .colony_in_system(system)
        .and_then(|id| state.colonies.get(id))
    else {
        return 0;
    };
    if colony.owner != house {
        return 0;
    }
    let armed = colony.kastra_ids.iter().any(|&kastra| {
        state
            .kastras
            .get(kastra)
            .is_some_and(|record| record.state.is_operational())
    });
    if armed {
        config.sections.facilities.kastra_detection_bonus
    } else {
        0
    }
}

/// Rolls the detection contest for every cloaked force.
///
/// Fills `detected` with houses whose cloak was stripped and `surprised` with
/// the houses that stripped one (they fire with the surprise bonus in round
/// one).
#[allow(clippy::too_many_arguments)]
pub(crate) fn resolve_detection(
    state: &GameState,
    config: &GameConfig,
    system: SystemId,
    forces: &[TaskForce],
    detected: &mut BTreeSet<HouseId>,
    surprised: &mut BTreeSet<HouseId>,
    prng: &mut Prng,
    events: &mut EventLog,
) {
    for raider in forces {
        if !has_cloaked_squadrons(state, config, raider) {
            continue;
        }
        let clk = tech_level(state, raider.house, TechField::Cloaking);
        let mut was_detected = false;
        for detector in forces {
            if detector.house == raider.house
                || !state.relation(raider.house, detector.house).permits_combat()
            {
                continue;
            }
            let eli = tech_level(state, detector.house, TechField::ElectronicIntel);
            let bonus = starbase_bonus(state, config, detector.house, system);
            let attacker_roll = prng.d10() + clk;
            let defender_roll = prng.d10() + eli + bonus;
            if defender_roll >= attacker_roll {
                was_detected = true;
                surprised.insert(detector.house);
                events.push(
                    Observers::pair(raider.house, detector.house),
                    EventKind::RaiderDetected {
                        system,
                        raider_house: raider.house,
                        detector_house: detector.house,
                    },
                );
                break;
            }
        }
        if was_detected {
            detected.insert(raider.house);
        } else {
            events.push(
                Observers::one(raider.house),
                EventKind::RaiderStealthSuccess {
                    system,
                    raider_house: raider.house,
                },
            );
        }
    }
}

/// Whether a house still fields cloaked squadrons (used for the ambush
/// bonus: cloaked and undetected in round one).
pub(crate) fn fields_cloaked(
    state: &GameState,
    config: &GameConfig,
    forces: &[TaskForce],
    house: HouseId,
) -> bool {
    forces
        .iter()
        .filter(|force| force.house == house)
        .any(|force| has_cloaked_squadrons(state, config, force))
}

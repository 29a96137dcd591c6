// SPDX-License-Identifier: Apache-2.0
//! The research phase.
//!
//! Each house spends its standing allocation — treasury permitting — across
//! the EL and SL ladders and individual technology fields. Progress carries
//! over; a ladder advances whenever accumulated points cover the next
//! level's price (`base · next_level`).

use crate::config::GameConfig;
use crate::event::{EventKind, EventLog, Observers, ResearchLadder};
use crate::state::GameState;

/// Runs the research phase for every living house.
pub fn run(state: &mut GameState, config: &GameConfig, events: &mut EventLog) {
    let tech_rules = &config.sections.tech;
    for house_id in state.house_ids() {
        let Some(house) = state.houses.get(house_id) else {
            continue;
        };
        if house.is_eliminated {
            continue;
        }
        let allocation = house.allocation.clone();
        let affordable = house.treasury.max(0) as u64;
        let requested = allocation.total();
        if requested == 0 {
            continue;
        }
        // Partial funding scales every line down proportionally.
        let funded = requested.min(affordable);
        let scale = |pp: u32| u64::from(pp) * funded / requested;

        let Some(house) = state.houses.get_mut(house_id) else {
            continue;
        };
        house.treasury -= funded as i64;
        house.research.el += scale(allocation.el);
        house.research.sl += scale(allocation.sl);
        for (&field, &pp) in &allocation.fields {
            *house.research.fields.entry(field).or_default() += scale(pp);
        }

        // Advance ladders while thresholds are met.
        loop {
            let next = u64::from(house.tech.el) + 1;
            let cost = tech_rules.el_cost_base * next;
            if house.research.el < cost {
                break;
            }
            house.research.el -= cost;
            house.tech.el += 1;
            let new_level = house.tech.el;
            events.push(
                Observers::one(house_id),
                EventKind::ResearchAdvanced {
                    house: house_id,
                    ladder: ResearchLadder::El,
                    new_level,
                },
            );
        }
        loop {
            let next = u64::from(house.tech.sl) + 1;
            let cost = tech_rules.sl_cost_base * next;
            if house.research.sl < cost {
                break;
            }
            house.research.sl -= cost;
            house.tech.sl += 1;
            let new_level = house.tech.sl;
            events.push(
                Observers::one(house_id),
                EventKind::ResearchAdvanced {
                    house: house_id,
                    ladder: ResearchLadder::Sl,
                    new_level,
                },
            );
        }
        for field in ec4x_rules_schema::TechField::ALL {
            loop {
                let level = house.tech.field(field);
                let cost = tech_rules.tech_cost_base * (u64::from(level) + 1);
                let progress = house.research.fields.get(&field).copied().unwrap_or(0);
                if progress < cost {
                    break;
                }
                *house.research.fields.entry(field).or_default() -= cost;
                *house.tech.fields.entry(field).or_default() += 1;
                events.push(
                    Observers::one(house_id),
                    EventKind::ResearchAdvanced {
                        house: house_id,
                        ladder: ResearchLadder::Field(field),
                        new_level: level + 1,
                    },
                );
            }
        }
    }
}

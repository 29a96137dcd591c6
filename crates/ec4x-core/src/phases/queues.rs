// SPDX-License-Identifier: Apache-2.0
//! The queues phase: dock assignment, queue advancement, commissioning.
//!
//! Every facility advances its active projects, then fills free docks from
//! its queue — decrementing the freshly started project once, so one-turn
//! work finishes in the cycle it starts. Planet-side artifacts commission
//! here; dock-built ships wait for the start of next turn.

use crate::config::GameConfig;
use crate::event::EventLog;
use crate::fleet::CombatState;
use crate::ident::{ColonyId, NeoriaId};
use crate::ops::project_ops;
use crate::project::ProjectId;
use crate::state::{index_insert, GameState};

/// Runs the queues phase.
pub fn run(state: &mut GameState, config: &GameConfig, events: &mut EventLog) {
    for colony in state.colonies.ids() {
        queue_auto_repairs(state, config, colony);
        auto_load_marines(state, config, colony);
        assign_colony_repairs(state, colony);
        let facilities = state
            .colonies
            .get(colony)
            .map_or_else(Vec::new, |record| record.neoria_ids.clone());
        for neoria in facilities {
            advance_facility(state, config, neoria, events);
        }
        advance_colony_queue(state, config, colony, events);
    }
}

/// Auto-repair: a flagged colony books repairs for every crippled own ship
/// in orbit, funds permitting.
fn queue_auto_repairs(state: &mut GameState, config: &GameConfig, colony: ColonyId) {
    let Some((system, owner, auto)) = state
        .colonies
        .get(colony)
        .map(|record| (record.system, record.owner, record.auto_repair))
    else {
        return;
    };
    if !auto {
        return;
    }
    let already_queued: Vec<_> = state
        .repair_projects
        .iter()
        .map(|(_, project)| project.ship)
        .collect();
    let crippled: Vec<_> = state
        .fleets_in_system(system)
        .into_iter()
        .filter_map(|fleet| state.fleets.get(fleet))
        .filter(|record| record.owner == owner)
        .flat_map(|record| record.squadrons.clone())
        .filter_map(|squadron| state.squadrons.get(squadron))
        .flat_map(crate::fleet::Squadron::ship_ids)
        .filter(|&ship| {
            state
                .ships
                .get(ship)
                .is_some_and(|hull| hull.state == CombatState::Crippled)
                && !already_queued.contains(&ship)
        })
        .collect();
    for ship in crippled {
        // Funds may run out mid-list; later hulls just wait a turn.
        let _ = project_ops::submit_repair(state, config, colony, ship, None);
    }
}

/// Auto-load: a flagged colony embarks garrisoned marines onto own
/// auxiliary squadrons in orbit, up to their carry capacity.
fn auto_load_marines(state: &mut GameState, config: &GameConfig, colony: ColonyId) {
    let Some((system, owner, auto)) = state
        .colonies
        .get(colony)
        .map(|record| (record.system, record.owner, record.auto_load_marines))
    else {
        return;
    };
    if !auto {
        return;
    }
    let auxiliaries: Vec<_> = state
        .fleets_in_system(system)
        .into_iter()
        .filter_map(|fleet| state.fleets.get(fleet))
        .filter(|record| record.owner == owner)
        .flat_map(|record| record.squadrons.clone())
        .filter(|&squadron| {
            state
                .squadrons
                .get(squadron)
                .is_some_and(|sqn| sqn.kind == crate::fleet::SquadronKind::Auxiliary)
        })
        .collect();
    for squadron in auxiliaries {
        let capacity: u32 = state.squadrons.get(squadron).map_or(0, |sqn| {
            sqn.ship_ids()
                .iter()
                .filter_map(|&ship| state.ships.get(ship))
                .filter_map(|hull| config.ship_spec(&hull.class))
                .map(|spec| spec.carry_marines)
                .sum()
        });
        let aboard = state
            .squadrons
            .get(squadron)
            .map_or(0, |sqn| sqn.marine_unit_ids.len() as u32);
        let room = capacity.saturating_sub(aboard);
        if room == 0 {
            continue;
        }
        let garrisoned: Vec<_> = state
            .colonies
            .get(colony)
            .map_or_else(Vec::new, |record| {
                record
                    .ground_unit_ids
                    .iter()
                    .copied()
                    .filter(|&unit| {
                        state.ground_units.get(unit).is_some_and(|record| {
                            record.class == ec4x_rules_schema::GroundClass::Marine
                                && record.state == CombatState::Undamaged
                        })
                    })
                    .take(room as usize)
                    .collect()
            });
        for unit in garrisoned {
            if let Some(record) = state.ground_units.get_mut(unit) {
                record.location = crate::ground::GroundLocation::Embarked(squadron);
            }
            if let Some(record) = state.colonies.get_mut(colony) {
                record.ground_unit_ids.retain(|&id| id != unit);
            }
            if let Some(record) = state.squadrons.get_mut(squadron) {
                record.marine_unit_ids.push(unit);
            }
        }
    }
}

/// Moves colony-queued repairs onto the least-loaded operational drydock.
fn assign_colony_repairs(state: &mut GameState, colony: ColonyId) {
    let Some(record) = state.colonies.get(colony) else {
        return;
    };
    let drydocks: Vec<NeoriaId> = record
        .neoria_ids
        .iter()
        .copied()
        .filter(|&neoria| {
            state.neorias.get(neoria).is_some_and(|facility| {
                facility.class == crate::facility::NeoriaClass::Drydock
                    && facility.state == CombatState::Undamaged
            })
        })
        .collect();
    if drydocks.is_empty() {
        return;
    }
    let pending: Vec<_> = state
        .colonies
        .get_mut(colony)
        .map_or_else(Vec::new, |record| record.repair_queue.drain(..).collect());
    for repair in pending {
        let dock = drydocks
            .iter()
            .copied()
            .min_by_key(|&neoria| {
                state
                    .neorias
                    .get(neoria)
                    .map_or(usize::MAX, |facility| {
                        facility.active.len() + facility.queue.len()
                    })
            })
            .unwrap_or(drydocks[0]);
        let pid = ProjectId::Repair(repair);
        if let Some(project) = state.repair_projects.get_mut(repair) {
            project.facility = Some(dock);
        }
        index_insert(&mut state.indexes.projects_by_facility, dock, pid);
        if let Some(facility) = state.neorias.get_mut(dock) {
            facility.queue.push_back(pid);
        }
    }
}

/// Advances one facility: tick actives, commission finishers, then pull
/// queued work into free docks.
fn advance_facility(
    state: &mut GameState,
    config: &GameConfig,
    neoria: NeoriaId,
    events: &mut EventLog,
) {
    let Some((owner, construction_level)) = state
        .neorias
        .get(neoria)
        .and_then(|facility| state.colonies.get(facility.colony))
        .map(|colony| colony.owner)
        .map(|owner| {
            let level = state.houses.get(owner).map_or(0, |house| {
                house.tech.field(ec4x_rules_schema::TechField::Construction)
            });
            (owner, level)
        })
    else {
        return;
    };
    let _ = owner;

    // Tick every active project; collect finishers.
    let actives = state
        .neorias
        .get(neoria)
        .map_or_else(Vec::new, |facility| facility.active.clone());
    let mut finished: Vec<ProjectId> = Vec::new();
    for pid in &actives {
        if tick_project(state, *pid) {
            finished.push(*pid);
        }
    }
    if let Some(facility) = state.neorias.get_mut(neoria) {
        facility.active.retain(|pid| !finished.contains(pid));
    }
    for pid in finished {
        commission(state, config, pid, events);
    }

    // Fill free docks from the queue; a freshly started project ticks once
    // so one-turn work completes in its starting cycle.
    loop {
        let Some(facility) = state.neorias.get(neoria) else {
            return;
        };
        let docks = facility.effective_docks(
            &config.sections.facilities,
            &config.sections.tech,
            construction_level,
        );
        if facility.active.len() as u32 >= docks || facility.queue.is_empty() {
            break;
        }
        let Some(pid) = state
            .neorias
            .get_mut(neoria)
            .and_then(|facility| facility.queue.pop_front())
        else {
            break;
        };
        if tick_project(state, pid) {
            commission(state, config, pid, events);
        } else if let Some(facility) = state.neorias.get_mut(neoria) {
            facility.active.push(pid);
        }
    }
}

/// Decrements a project's clock. Returns true when it completed.
fn tick_project(state: &mut GameState, pid: ProjectId) -> bool {
    match pid {
        ProjectId::Construction(id) => {
            state
                .construction_projects
                .get_mut(id)
                .is_some_and(|project| {
                    project.turns_remaining -= 1;
                    project.turns_remaining <= 0
                })
        }
        ProjectId::Repair(id) => state.repair_projects.get_mut(id).is_some_and(|project| {
            project.turns_remaining -= 1;
            project.turns_remaining <= 0
        }),
    }
}

fn commission(state: &mut GameState, config: &GameConfig, pid: ProjectId, events: &mut EventLog) {
    match pid {
        ProjectId::Construction(id) => {
            if let Some(project) = state.construction_projects.get(id).cloned() {
                project_ops::complete_construction(state, config, project, events);
            }
        }
        ProjectId::Repair(id) => {
            if let Some(project) = state.repair_projects.get(id).cloned() {
                project_ops::complete_repair(state, project, events);
            }
        }
    }
}

/// The colony-level legacy queue: one project in work at a time, one tick
/// per turn; completion pulls the queue head into the active slot.
fn advance_colony_queue(
    state: &mut GameState,
    config: &GameConfig,
    colony: ColonyId,
    events: &mut EventLog,
) {
    let active = state
        .colonies
        .get(colony)
        .and_then(|record| record.active_project);
    match active {
        Some(project) => {
            if tick_project(state, ProjectId::Construction(project)) {
                commission(state, config, ProjectId::Construction(project), events);
                // Pull the next job into the vacated slot.
                if let Some(record) = state.colonies.get_mut(colony) {
                    record.active_project = record.build_queue.pop_front();
                }
            }
        }
        None => {
            let Some(next) = state
                .colonies
                .get_mut(colony)
                .and_then(|record| record.build_queue.pop_front())
            else {
                return;
            };
            if let Some(record) = state.colonies.get_mut(colony) {
                record.active_project = Some(next);
            }
            // Work starts immediately; one-turn projects finish at once.
            if tick_project(state, ProjectId::Construction(next)) {
                commission(state, config, ProjectId::Construction(next), events);
                if let Some(record) = state.colonies.get_mut(colony) {
                    record.active_project = record.build_queue.pop_front();
                }
            }
        }
    }
}

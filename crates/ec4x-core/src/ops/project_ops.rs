// SPDX-License-Identifier: Apache-2.0
//! Project writes: submission, cancellation, commissioning.
//!
//! The full PP cost is debited when a submission is accepted; schedule is
//! tracked separately in `turns_remaining`. Cancellation forfeits the cost.

use crate::config::GameConfig;
use crate::event::{EventKind, EventLog, Observers};
use crate::facility::NeoriaClass;
use crate::fleet::{CombatState, SquadronHome};
use crate::ident::{ColonyId, NeoriaId, RepairProjectId, ShipId};
use crate::ops::{facility_ops, squadron_ops};
use crate::project::{BuildWork, ConstructionProject, ProjectId, RepairProject};
use crate::state::{index_insert, index_remove, GameState, PendingCommission};

/// Why a build or repair submission was rejected. State is unchanged on
/// rejection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildRejection {
    /// The colony does not exist.
    #[error("unknown colony")]
    UnknownColony,
    /// The named facility does not exist.
    #[error("unknown facility")]
    UnknownFacility,
    /// The facility belongs to a different colony.
    #[error("facility belongs to another colony")]
    FacilityMismatch,
    /// The facility is crippled or destroyed.
    #[error("facility is not operational")]
    FacilityUnavailable,
    /// The facility class cannot run this kind of project.
    #[error("facility class cannot take this work")]
    WrongFacilityClass,
    /// Non-fighter ships must be laid down at a dock.
    #[error("ship class requires a dock")]
    ShipRequiresDock,
    /// Colony-level work cannot be bound to a dock.
    #[error("work is colony-level, not dock work")]
    ColonyLevelWork,
    /// The ship class is not in the rules.
    #[error("unknown ship class: {0}")]
    UnknownShipClass(String),
    /// The ground class has no spec in the rules.
    #[error("ground class missing from rules")]
    UnknownGroundClass,
    /// The owner's treasury cannot cover the cost.
    #[error("insufficient production points: need {need}, have {have}")]
    InsufficientFunds {
        /// PP required.
        need: i64,
        /// PP available.
        have: i64,
    },
    /// The ship to repair is not crippled.
    #[error("ship is not crippled")]
    ShipNotCrippled,
    /// The ship to repair does not exist.
    #[error("unknown ship")]
    UnknownShip,
}

/// PP cost of a work item, including the spaceport surcharge for ships.
pub fn cost_of(
    config: &GameConfig,
    work: &BuildWork,
    facility_class: Option<NeoriaClass>,
) -> Result<i64, BuildRejection> {
    let sections = &config.sections;
    let cost = match work {
        BuildWork::Ship { class } => {
            let spec = config
                .ship_spec(class)
                .ok_or_else(|| BuildRejection::UnknownShipClass(class.clone()))?;
            let base = i64::from(spec.cost);
            if facility_class == Some(NeoriaClass::Spaceport) {
                base * i64::from(sections.facilities.spaceport_cost_factor)
            } else {
                base
            }
        }
        BuildWork::Neoria { class } => i64::from(match class {
            NeoriaClass::Spaceport => sections.facilities.spaceport_cost,
            NeoriaClass::Shipyard => sections.facilities.shipyard_cost,
            NeoriaClass::Drydock => sections.facilities.drydock_cost,
        }),
        BuildWork::Kastra => i64::from(sections.facilities.kastra_cost),
        BuildWork::ShieldLevel => i64::from(sections.facilities.shield_cost),
        BuildWork::Ground { class } => i64::from(
            config
                .ground_spec(*class)
                .ok_or(BuildRejection::UnknownGroundClass)?
                .cost,
        ),
        BuildWork::IndustrialUnits { count } => {
            i64::from(sections.construction.industrial_unit_cost) * i64::from(*count)
        }
        BuildWork::Infrastructure => {
            i64::from(sections.construction.infrastructure_cost_per_level)
        }
    };
    Ok(cost)
}

/// Scheduled turns for a work item.
pub fn turns_of(config: &GameConfig, work: &BuildWork) -> Result<i32, BuildRejection> {
    let sections = &config.sections;
    let turns = match work {
        BuildWork::Ship { class } => config
            .ship_spec(class)
            .ok_or_else(|| BuildRejection::UnknownShipClass(class.clone()))?
            .build_turns,
        BuildWork::Neoria { .. } => sections.facilities.neoria_build_turns,
        BuildWork::Kastra => sections.facilities.kastra_build_turns,
        BuildWork::ShieldLevel => sections.facilities.shield_build_turns,
        BuildWork::Ground { class } => {
            config
                .ground_spec(*class)
                .ok_or(BuildRejection::UnknownGroundClass)?
                .build_turns
        }
        BuildWork::IndustrialUnits { .. } => sections.construction.industrial_unit_build_turns,
        BuildWork::Infrastructure => sections.construction.infrastructure_build_turns,
    };
    Ok(turns as i32)
}

fn debit_owner(
    state: &mut GameState,
    colony: ColonyId,
    cost: i64,
) -> Result<(), BuildRejection> {
    let owner = state
        .colonies
        .get(colony)
        .ok_or(BuildRejection::UnknownColony)?
        .owner;
    let Some(house) = state.houses.get_mut(owner) else {
        return Err(BuildRejection::UnknownColony);
    };
    if house.treasury < cost {
        return Err(BuildRejection::InsufficientFunds {
            need: cost,
            have: house.treasury,
        });
    }
    house.treasury -= cost;
    Ok(())
}

/// Submits a construction project, debiting the owner's treasury.
///
/// Dock work (`facility` set) queues at the facility; colony-level work
/// queues at the colony. Validation layers: colony → facility →
/// work-vs-facility compatibility → funds.
pub fn submit_construction(
    state: &mut GameState,
    config: &GameConfig,
    colony: ColonyId,
    work: BuildWork,
    facility: Option<NeoriaId>,
) -> Result<crate::ident::ConstructionProjectId, BuildRejection> {
    if !state.colonies.contains(colony) {
        return Err(BuildRejection::UnknownColony);
    }
    let facility_class = match facility {
        None => None,
        Some(id) => {
            let neoria = state.neorias.get(id).ok_or(BuildRejection::UnknownFacility)?;
            if neoria.colony != colony {
                return Err(BuildRejection::FacilityMismatch);
            }
            if neoria.state != CombatState::Undamaged {
                return Err(BuildRejection::FacilityUnavailable);
            }
            if !neoria.class.builds() {
                return Err(BuildRejection::WrongFacilityClass);
            }
            Some(neoria.class)
        }
    };
    match &work {
        BuildWork::Ship { class } => {
            let spec = config
                .ship_spec(class)
                .ok_or_else(|| BuildRejection::UnknownShipClass(class.clone()))?;
            if facility.is_none() && spec.role != ec4x_rules_schema::ShipRole::Fighter {
                return Err(BuildRejection::ShipRequiresDock);
            }
        }
        _ => {
            if facility.is_some() {
                return Err(BuildRejection::ColonyLevelWork);
            }
        }
    }
    let cost = cost_of(config, &work, facility_class)?;
    let turns = turns_of(config, &work)?;
    debit_owner(state, colony, cost)?;

    let id = state.counters.next_construction_project();
    state.construction_projects.add(
        id,
        ConstructionProject {
            id,
            colony,
            facility,
            turns_remaining: turns,
            work,
        },
    );
    let pid = ProjectId::Construction(id);
    index_insert(&mut state.indexes.projects_by_colony, colony, pid);
    match facility {
        Some(neoria) => {
            index_insert(&mut state.indexes.projects_by_facility, neoria, pid);
            if let Some(record) = state.neorias.get_mut(neoria) {
                record.queue.push_back(pid);
            }
        }
        None => {
            if let Some(record) = state.colonies.get_mut(colony) {
                record.build_queue.push_back(id);
            }
        }
    }
    Ok(id)
}

/// Submits a repair for a crippled ship.
///
/// With a drydock given, the project queues at its docks; without one it
/// waits on the colony repair queue until the queues phase finds a dock.
pub fn submit_repair(
    state: &mut GameState,
    config: &GameConfig,
    colony: ColonyId,
    ship: ShipId,
    facility: Option<NeoriaId>,
) -> Result<RepairProjectId, BuildRejection> {
    if !state.colonies.contains(colony) {
        return Err(BuildRejection::UnknownColony);
    }
    if let Some(id) = facility {
        let neoria = state.neorias.get(id).ok_or(BuildRejection::UnknownFacility)?;
        if neoria.colony != colony {
            return Err(BuildRejection::FacilityMismatch);
        }
        if neoria.state != CombatState::Undamaged {
            return Err(BuildRejection::FacilityUnavailable);
        }
        if neoria.class != NeoriaClass::Drydock {
            return Err(BuildRejection::WrongFacilityClass);
        }
    }
    let hull = state.ships.get(ship).ok_or(BuildRejection::UnknownShip)?;
    if hull.state != CombatState::Crippled {
        return Err(BuildRejection::ShipNotCrippled);
    }
    let spec = config
        .ship_spec(&hull.class)
        .ok_or_else(|| BuildRejection::UnknownShipClass(hull.class.clone()))?;
    let cost = i64::from(spec.cost) / 4;
    let turns = (spec.build_turns / 2).max(1) as i32;
    debit_owner(state, colony, cost)?;

    let id = state.counters.next_repair_project();
    state.repair_projects.add(
        id,
        RepairProject {
            id,
            colony,
            facility,
            turns_remaining: turns,
            ship,
        },
    );
    let pid = ProjectId::Repair(id);
    index_insert(&mut state.indexes.projects_by_colony, colony, pid);
    match facility {
        Some(neoria) => {
            index_insert(&mut state.indexes.projects_by_facility, neoria, pid);
            if let Some(record) = state.neorias.get_mut(neoria) {
                record.queue.push_back(pid);
            }
        }
        None => {
            if let Some(record) = state.colonies.get_mut(colony) {
                record.repair_queue.push_back(id);
            }
        }
    }
    Ok(id)
}

/// Drops a project's row and index entries. No refund, no queue surgery —
/// the caller owns whatever queue the id sat in.
pub fn discard_project(state: &mut GameState, project: ProjectId) {
    let (colony, facility) = match project {
        ProjectId::Construction(id) => match state.construction_projects.remove(id) {
            Some(row) => (row.colony, row.facility),
            None => return,
        },
        ProjectId::Repair(id) => match state.repair_projects.remove(id) {
            Some(row) => (row.colony, row.facility),
            None => return,
        },
    };
    index_remove(&mut state.indexes.projects_by_colony, colony, project);
    if let Some(neoria) = facility {
        index_remove(&mut state.indexes.projects_by_facility, neoria, project);
    }
}

/// Commissions a finished construction project into the world.
///
/// Planet-side artifacts materialize immediately. Dock-built ships join the
/// pending-commission list and enter service at the start of next turn, after
/// this turn's combat is already history.
pub fn complete_construction(
    state: &mut GameState,
    config: &GameConfig,
    project: ConstructionProject,
    events: &mut EventLog,
) {
    discard_project(state, ProjectId::Construction(project.id));
    let colony_id = project.colony;
    let Some(colony) = state.colonies.get(colony_id) else {
        tracing::warn!(%colony_id, "completed project for missing colony dropped");
        return;
    };
    let owner = colony.owner;
    match &project.work {
        BuildWork::Ship { class } => {
            if project.facility.is_some() {
                state.pending_commissions.push(PendingCommission {
                    colony: colony_id,
                    class: class.clone(),
                });
            } else {
                // Colony-built fighters stand up as a planet-side squadron at
                // once; they never leave home.
                squadron_ops::create_squadron(
                    state,
                    config,
                    SquadronHome::Colony(colony_id),
                    &[class.as_str()],
                );
            }
        }
        BuildWork::Neoria { class } => {
            facility_ops::create_neoria(state, colony_id, *class);
        }
        BuildWork::Kastra => {
            facility_ops::create_kastra(state, colony_id);
        }
        BuildWork::ShieldLevel => {
            if let Some(record) = state.colonies.get_mut(colony_id) {
                record.shield_level += 1;
            }
        }
        BuildWork::Ground { class } => {
            facility_ops::create_ground_unit(state, colony_id, *class);
        }
        BuildWork::IndustrialUnits { count } => {
            if let Some(record) = state.colonies.get_mut(colony_id) {
                record.industrial_units += count;
            }
        }
        BuildWork::Infrastructure => {
            if let Some(record) = state.colonies.get_mut(colony_id) {
                record.infrastructure += 1;
            }
        }
    }
    events.push(
        Observers::one(owner),
        EventKind::ProjectCompleted {
            colony: colony_id,
            work: project.work,
        },
    );
}

/// Completes a repair: the hull returns to full capability.
pub fn complete_repair(state: &mut GameState, project: RepairProject, events: &mut EventLog) {
    discard_project(state, ProjectId::Repair(project.id));
    let owner = state.colonies.get(project.colony).map(|c| c.owner);
    if let Some(ship) = state.ships.get_mut(project.ship) {
        if ship.state == CombatState::Crippled {
            ship.state = CombatState::Undamaged;
            ship.damage = 0;
        }
    }
    if let Some(owner) = owner {
        events.push(
            Observers::one(owner),
            EventKind::RepairCompleted {
                colony: project.colony,
                ship: project.ship,
            },
        );
    }
}

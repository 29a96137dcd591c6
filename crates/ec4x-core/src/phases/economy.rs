// SPDX-License-Identifier: Apache-2.0
//! The economy phase: blockade scan, income, maintenance, C2 capacity.

use std::collections::BTreeMap;

use crate::config::GameConfig;
use crate::economy::{net_colony_income, CapacityViolation, ViolationKind};
use crate::event::{EventKind, EventLog, Observers, PrestigeReason};
use crate::fleet::FleetStatus;
use crate::ident::{ColonyId, FleetId, HouseId};
use crate::ops::fleet_ops;
use crate::state::GameState;

/// Runs the economy phase.
pub fn run(state: &mut GameState, config: &GameConfig, events: &mut EventLog) {
    scan_blockades(state, config, events);
    collect_income(state, config);
    pay_maintenance(state, config);
    enforce_command_pool(state, config, events);
    blockade_prestige(state, config, events);
}

/// A colony is blockaded when any hostile non-owner fleet with operational
/// combat strength sits in its system. All such houses co-blockade.
fn scan_blockades(state: &mut GameState, config: &GameConfig, events: &mut EventLog) {
    for colony_id in state.colonies.ids() {
        let Some((system, owner, was_blockaded)) = state
            .colonies
            .get(colony_id)
            .map(|colony| (colony.system, colony.owner, colony.blockaded))
        else {
            continue;
        };
        let mut blockaders: Vec<HouseId> = state
            .fleets_in_system(system)
            .into_iter()
            .filter_map(|fleet| {
                let record = state.fleets.get(fleet)?;
                let hostile = record.owner != owner
                    && state.relation(record.owner, owner).permits_combat();
                let armed = fleet_ops::operational_attack(state, config, fleet) > 0.0;
                (hostile && armed).then_some(record.owner)
            })
            .collect();
        blockaders.sort_unstable();
        blockaders.dedup();

        let now_blockaded = !blockaders.is_empty();
        if let Some(colony) = state.colonies.get_mut(colony_id) {
            colony.blockaded = now_blockaded;
            colony.blockaded_by.clone_from(&blockaders);
            colony.blockade_turns = if now_blockaded {
                colony.blockade_turns + 1
            } else {
                0
            };
        }
        if now_blockaded && !was_blockaded {
            let mut audience = blockaders.clone();
            audience.push(owner);
            events.push(
                Observers::Houses(audience),
                EventKind::BlockadeEstablished {
                    colony: colony_id,
                    by: blockaders,
                },
            );
        } else if !now_blockaded && was_blockaded {
            events.push(
                Observers::one(owner),
                EventKind::BlockadeLifted { colony: colony_id },
            );
        }
    }
}

/// Credits each house with the net output of its colonies.
fn collect_income(state: &mut GameState, config: &GameConfig) {
    let mut income: BTreeMap<HouseId, u64> = BTreeMap::new();
    for (_, colony) in state.colonies.iter() {
        let el = state
            .houses
            .get(colony.owner)
            .map_or(0, |house| house.tech.el);
        *income.entry(colony.owner).or_default() +=
            net_colony_income(colony, &config.sections.economy, el);
    }
    for (house_id, amount) in income {
        if let Some(house) = state.houses.get_mut(house_id) {
            house.treasury += amount as i64;
        }
    }
}

/// Deducts ship, facility, and ground-unit upkeep. Fleet status scales ship
/// upkeep: Active full, Reserve half, Mothballed free.
fn pay_maintenance(state: &mut GameState, config: &GameConfig) {
    let economy = &config.sections.economy;
    let mut upkeep: BTreeMap<HouseId, i64> = BTreeMap::new();

    for (_, fleet) in state.fleets.iter() {
        let multiplier = match fleet.status {
            FleetStatus::Active => 100,
            FleetStatus::Reserve => economy.reserve_maintenance_percent,
            FleetStatus::Mothballed => economy.mothball_maintenance_percent,
        };
        if multiplier == 0 {
            continue;
        }
        let mut fleet_upkeep: u32 = 0;
        for &squadron in &fleet.squadrons {
            let Some(sqn) = state.squadrons.get(squadron) else {
                continue;
            };
            for ship in sqn.ship_ids() {
                if let Some(spec) = state
                    .ships
                    .get(ship)
                    .and_then(|hull| config.ship_spec(&hull.class))
                {
                    fleet_upkeep += spec.maintenance;
                }
            }
        }
        *upkeep.entry(fleet.owner).or_default() +=
            i64::from(fleet_upkeep * multiplier / 100);
    }

    for (_, colony) in state.colonies.iter() {
        let facilities = &config.sections.facilities;
        let mut colony_upkeep = 0i64;
        colony_upkeep +=
            i64::from(facilities.neoria_maintenance) * colony.neoria_ids.len() as i64;
        colony_upkeep +=
            i64::from(facilities.kastra_maintenance) * colony.kastra_ids.len() as i64;
        for &unit in &colony.ground_unit_ids {
            if let Some(spec) = state
                .ground_units
                .get(unit)
                .and_then(|record| config.ground_spec(record.class))
            {
                colony_upkeep += i64::from(spec.maintenance);
            }
        }
        *upkeep.entry(colony.owner).or_default() += colony_upkeep;
    }

    for (house_id, amount) in upkeep {
        if let Some(house) = state.houses.get_mut(house_id) {
            house.treasury -= amount;
        }
    }
}

/// Checks every house against its C2 pool. Fresh overages record a violation
/// with grace turns; an expired grace force-scraps fleets (highest id first)
/// until the house fits its pool again.
fn enforce_command_pool(state: &mut GameState, config: &GameConfig, events: &mut EventLog) {
    let turn = state.turn;
    for house_id in state.house_ids() {
        let Some(house) = state.houses.get(house_id) else {
            continue;
        };
        if house.is_eliminated {
            continue;
        }
        let pool = house.c2_pool(&config.sections.limits);
        let usage = active_command_usage(state, config, house_id);

        if usage <= pool {
            if let Some(house) = state.houses.get_mut(house_id) {
                house
                    .violations
                    .retain(|violation| violation.kind != ViolationKind::CommandPool);
            }
            continue;
        }

        let severity = usage - pool;
        let existing_expired = state.houses.get(house_id).is_some_and(|house| {
            house
                .violations
                .iter()
                .any(|violation| {
                    violation.kind == ViolationKind::CommandPool
                        && violation.grace_turns_remaining == 0
                })
        });

        if existing_expired {
            let scrapped = force_scrap(state, config, house_id, pool);
            events.push(
                Observers::one(house_id),
                EventKind::UnitsForceScrapped {
                    house: house_id,
                    ships: scrapped,
                },
            );
            if let Some(house) = state.houses.get_mut(house_id) {
                house
                    .violations
                    .retain(|violation| violation.kind != ViolationKind::CommandPool);
            }
            continue;
        }

        let grace = config.sections.limits.violation_grace_turns;
        if let Some(house) = state.houses.get_mut(house_id) {
            match house
                .violations
                .iter_mut()
                .find(|violation| violation.kind == ViolationKind::CommandPool)
            {
                Some(violation) => {
                    violation.severity = severity;
                    violation.grace_turns_remaining =
                        violation.grace_turns_remaining.saturating_sub(1);
                }
                None => house.violations.push(CapacityViolation {
                    kind: ViolationKind::CommandPool,
                    severity,
                    grace_turns_remaining: grace,
                    noted_turn: turn,
                }),
            }
        }
        let grace_left = state.houses.get(house_id).map_or(0, |house| {
            house
                .violations
                .iter()
                .find(|violation| violation.kind == ViolationKind::CommandPool)
                .map_or(0, |violation| violation.grace_turns_remaining)
        });
        events.push(
            Observers::one(house_id),
            EventKind::CapacityViolationRecorded {
                house: house_id,
                severity,
                grace_turns_remaining: grace_left,
            },
        );
    }
}

/// Command cost of a house's Active fleets.
fn active_command_usage(state: &GameState, config: &GameConfig, house: HouseId) -> u32 {
    state
        .indexes
        .fleets_by_owner
        .get(&house)
        .map_or(&[][..], Vec::as_slice)
        .iter()
        .filter(|&&fleet| {
            state
                .fleets
                .get(fleet)
                .is_some_and(|record| record.status == FleetStatus::Active)
        })
        .map(|&fleet| fleet_ops::command_cost(state, config, fleet))
        .sum()
}

/// Scraps whole fleets, highest id first, until the house is inside its
/// pool. Returns the number of ships lost.
fn force_scrap(state: &mut GameState, config: &GameConfig, house: HouseId, pool: u32) -> u32 {
    let mut scrapped_ships = 0;
    let mut fleets: Vec<FleetId> = state
        .indexes
        .fleets_by_owner
        .get(&house)
        .cloned()
        .unwrap_or_default();
    fleets.sort_unstable();
    while active_command_usage(state, config, house) > pool {
        let Some(fleet) = fleets.pop() else {
            break;
        };
        let is_active = state
            .fleets
            .get(fleet)
            .is_some_and(|record| record.status == FleetStatus::Active);
        if !is_active {
            continue;
        }
        scrapped_ships += state.fleets.get(fleet).map_or(0, |record| {
            record
                .squadrons
                .iter()
                .filter_map(|&squadron| state.squadrons.get(squadron))
                .map(|sqn| sqn.ship_ids().len() as u32)
                .sum()
        });
        fleet_ops::remove_fleet(state, fleet);
    }
    scrapped_ships
}

/// −2 prestige per blockaded colony per turn.
fn blockade_prestige(state: &mut GameState, config: &GameConfig, events: &mut EventLog) {
    let penalty = config.sections.economy.blockade_prestige_penalty;
    let blockaded: Vec<(HouseId, ColonyId)> = state
        .colonies
        .iter()
        .filter(|(_, colony)| colony.blockaded)
        .map(|(id, colony)| (colony.owner, id))
        .collect();
    for (house_id, _) in blockaded {
        if let Some(house) = state.houses.get_mut(house_id) {
            house.prestige -= penalty;
        }
        events.push(
            Observers::one(house_id),
            EventKind::PrestigeEvent {
                house: house_id,
                delta: -penalty,
                reason: PrestigeReason::ColonyBlockaded,
            },
        );
    }
}

// SPDX-License-Identifier: Apache-2.0
//! The turn pipeline.
//!
//! One call to [`advance_turn`] is a pure transformation
//! `(state, orders, seed) → (state', events, views)`. Phases run in a fixed
//! order; order packets apply in ascending house order wherever application
//! order matters; every roll is derived from the state's base seed. Running
//! the same state and orders twice produces byte-identical results.

use std::collections::BTreeMap;

use crate::cmd;
use crate::combat;
use crate::config::GameConfig;
use crate::event::{EventKind, EventLog, GameEvent, Observers};
use crate::fleet::SquadronHome;
use crate::ident::{HouseId, SystemId};
use crate::ops::{fleet_ops, project_ops, squadron_ops};
use crate::order::{DiplomaticAction, EspionageAttempt, OrderPacket};
use crate::phases;
use crate::state::GameState;
use crate::view::{self, PlayerState};

/// Everything a resolved turn hands back to the host.
#[derive(Debug)]
pub struct TurnOutcome {
    /// The full event stream, unfiltered.
    pub events: Vec<GameEvent>,
    /// Per-house fog-of-war snapshots, with per-house filtered events.
    pub views: BTreeMap<HouseId, PlayerState>,
}

/// Advances the world one turn.
///
/// `packets` may arrive in any order and may contain several packets per
/// house; the last one submitted for a house wins, matching the
/// replace-until-advance contract of the engine layer.
pub fn advance_turn(
    state: &mut GameState,
    config: &GameConfig,
    packets: &[OrderPacket],
) -> TurnOutcome {
    state.turn += 1;
    let turn = state.turn;
    let mut events = EventLog::new(turn);

    // Command step: hulls finished in last turn's queues enter service now,
    // after last turn's combat is history.
    commission_pending(state, config, &mut events);

    // Intake: last packet per house, applied in ascending house order.
    let mut by_house: BTreeMap<HouseId, &OrderPacket> = BTreeMap::new();
    for packet in packets {
        by_house.insert(packet.house, packet);
    }
    let mut espionage_attempts: Vec<(HouseId, EspionageAttempt)> = Vec::new();
    let mut diplomacy_actions: Vec<(HouseId, DiplomaticAction)> = Vec::new();
    for (&house, packet) in &by_house {
        intake_packet(
            state,
            config,
            house,
            packet,
            &mut espionage_attempts,
            &mut diplomacy_actions,
        );
    }
    refresh_fallback_routes(state);

    // Movement, then combat wherever hostile parties now coincide.
    let arrivals = phases::movement::run(state, config, &mut events);
    let contested: Vec<SystemId> = state.indexes.fleets_by_system.keys().copied().collect();
    for system in contested {
        combat::resolve_system_combat(state, config, system, &arrivals, &mut events);
    }

    phases::espionage::run(state, config, &espionage_attempts, &mut events);
    phases::economy::run(state, config, &mut events);
    phases::queues::run(state, config, &mut events);
    phases::research::run(state, config, &mut events);
    phases::diplomacy::run(state, &diplomacy_actions, &mut events);
    phases::prestige::run(state, &mut events);

    let views = view::project_all(state, config, events.events());
    TurnOutcome {
        events: events.into_events(),
        views,
    }
}

/// Commissions dock-built hulls into new fleets over their build colonies.
fn commission_pending(state: &mut GameState, config: &GameConfig, events: &mut EventLog) {
    let pending = std::mem::take(&mut state.pending_commissions);
    let mut fleets_by_colony: BTreeMap<crate::ident::ColonyId, crate::ident::FleetId> =
        BTreeMap::new();
    for commission in pending {
        let Some((system, owner)) = state
            .colonies
            .get(commission.colony)
            .map(|colony| (colony.system, colony.owner))
        else {
            tracing::warn!(colony = %commission.colony, "pending hull lost its colony");
            continue;
        };
        let fleet = *fleets_by_colony
            .entry(commission.colony)
            .or_insert_with(|| fleet_ops::create_fleet(state, owner, system));
        let created = squadron_ops::create_squadron(
            state,
            config,
            SquadronHome::Fleet(fleet),
            &[commission.class.as_str()],
        );
        if let Some((_, ships)) = created {
            if let Some(&ship) = ships.first() {
                events.push(
                    Observers::one(owner),
                    EventKind::ShipCommissioned {
                        colony: commission.colony,
                        ship,
                        class: commission.class.clone(),
                    },
                );
            }
        }
    }
}

/// Applies one house's packet: zero-turn replays, order binding, builds,
/// research, transfers, espionage investment. Invalid items are skipped
/// one by one — a house's bad order never harms its neighbors.
fn intake_packet(
    state: &mut GameState,
    config: &GameConfig,
    house: HouseId,
    packet: &OrderPacket,
    espionage_attempts: &mut Vec<(HouseId, EspionageAttempt)>,
    diplomacy_actions: &mut Vec<(HouseId, DiplomaticAction)>,
) {
    let valid_house = state
        .houses
        .get(house)
        .is_some_and(|record| !record.is_eliminated);
    if !valid_house || packet.house != house {
        tracing::warn!(%house, "packet for invalid or eliminated house dropped");
        return;
    }
    if packet.turn != state.turn {
        tracing::warn!(%house, packet_turn = packet.turn, turn = state.turn, "stale packet dropped");
        return;
    }

    // Zero-turn admin, re-validated on replay.
    for command in &packet.fleet_commands {
        let outcome = cmd::execute_fleet_command(state, config, house, command);
        if !outcome.success {
            tracing::debug!(%house, error = ?outcome.error, "fleet command rejected on replay");
        }
    }
    for command in &packet.squadron_commands {
        let outcome = cmd::execute_squadron_command(state, config, house, command);
        if !outcome.success {
            tracing::debug!(%house, error = ?outcome.error, "squadron command rejected on replay");
        }
    }
    for command in &packet.cargo_commands {
        let outcome = cmd::execute_cargo_command(state, config, house, command);
        if !outcome.success {
            tracing::debug!(%house, error = ?outcome.error, "cargo command rejected on replay");
        }
    }

    // Standing-order replacements, then one-shot orders.
    for request in &packet.standing_orders {
        let owned = state
            .fleets
            .get(request.fleet)
            .is_some_and(|record| record.owner == house);
        if owned {
            if let Some(record) = state.fleets.get_mut(request.fleet) {
                record.standing_orders.clone_from(&request.orders);
            }
        }
    }
    for request in &packet.fleet_orders {
        let owned = state
            .fleets
            .get(request.fleet)
            .is_some_and(|record| record.owner == house);
        if owned {
            fleet_ops::set_order(state, request.fleet, Some(request.order));
        } else {
            tracing::debug!(%house, fleet = %request.fleet, "order for foreign fleet dropped");
        }
    }

    // Builds and repairs; cost is debited here, rejection leaves no trace.
    for order in &packet.build_orders {
        let owned = state
            .colonies
            .get(order.colony)
            .is_some_and(|colony| colony.owner == house);
        if !owned {
            continue;
        }
        for _ in 0..order.quantity.max(1) {
            if let Err(rejection) = project_ops::submit_construction(
                state,
                config,
                order.colony,
                order.work.clone(),
                order.facility,
            ) {
                tracing::debug!(%house, %rejection, "build order rejected");
                break;
            }
        }
    }
    for order in &packet.repair_orders {
        let owned = state
            .colonies
            .get(order.colony)
            .is_some_and(|colony| colony.owner == house);
        if !owned {
            continue;
        }
        if let Err(rejection) =
            project_ops::submit_repair(state, config, order.colony, order.ship, order.facility)
        {
            tracing::debug!(%house, %rejection, "repair order rejected");
        }
    }

    // Population transfers between owned colonies.
    for transfer in &packet.population_transfers {
        let both_owned = [transfer.from, transfer.to].iter().all(|&colony| {
            state
                .colonies
                .get(colony)
                .is_some_and(|record| record.owner == house)
        });
        if !both_owned || transfer.from == transfer.to {
            continue;
        }
        let available = state.colonies.get(transfer.from).map_or(0, |colony| {
            (colony.souls.saturating_sub(crate::colony::SOULS_PER_PU)
                / crate::colony::SOULS_PER_PTU) as u32
        });
        let moved = u64::from(transfer.ptu.min(available)) * crate::colony::SOULS_PER_PTU;
        if let Some(colony) = state.colonies.get_mut(transfer.from) {
            colony.souls -= moved;
        }
        if let Some(colony) = state.colonies.get_mut(transfer.to) {
            colony.souls += moved;
        }
    }

    // Research allocation replaces the standing split.
    if let Some(allocation) = &packet.research {
        if let Some(record) = state.houses.get_mut(house) {
            record.allocation = allocation.clone();
        }
    }

    // Espionage investment, capped at the detection threshold.
    if let Some(investment) = packet.espionage_investment {
        let cap = config.sections.limits.espionage_detection_threshold;
        let ebp = investment.ebp.min(cap);
        let cip = investment.cip;
        if let Some(record) = state.houses.get_mut(house) {
            let cost = i64::from(ebp) + i64::from(cip);
            if record.treasury >= cost {
                record.treasury -= cost;
                record.espionage.ebp += ebp;
                record.espionage.cip += cip;
            }
        }
    }
    if let Some(attempt) = packet.espionage_attempt {
        espionage_attempts.push((house, attempt));
    }
    for &action in &packet.diplomacy {
        diplomacy_actions.push((house, action));
    }
}

/// Refreshes each house's fallback retreat routes every five turns: own
/// colony systems, biggest first.
fn refresh_fallback_routes(state: &mut GameState) {
    let turn = state.turn;
    for house_id in state.house_ids() {
        let due = state.houses.get(house_id).is_some_and(|house| {
            !house.is_eliminated
                && (house.fallback_destinations.is_empty()
                    || turn.saturating_sub(house.fallback_refreshed_turn) >= 5)
        });
        if !due {
            continue;
        }
        let mut destinations: Vec<(u64, SystemId)> = state
            .indexes
            .colonies_by_owner
            .get(&house_id)
            .map_or_else(Vec::new, |ids| {
                ids.iter()
                    .filter_map(|&id| state.colonies.get(id))
                    .map(|colony| (colony.souls, colony.system))
                    .collect()
            });
        destinations.sort_by_key(|&(souls, system)| (std::cmp::Reverse(souls), system));
        if let Some(house) = state.houses.get_mut(house_id) {
            house.fallback_destinations = destinations
                .into_iter()
                .map(|(_, system)| system)
                .collect();
            house.fallback_refreshed_turn = turn;
        }
    }
}

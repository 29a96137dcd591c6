// SPDX-License-Identifier: Apache-2.0
//! Squadron and ship writes.

use crate::config::GameConfig;
use crate::fleet::{CombatState, Ship, Squadron, SquadronHome, SquadronKind};
use crate::ident::{FleetId, ShipId, SquadronId};
use crate::state::{index_insert, index_remove, GameState};

/// Creates a squadron of freshly commissioned ships, flagship first.
///
/// The squadron's classification comes from the flagship's class role.
/// Returns `None` when `classes` is empty or names an unknown class.
pub fn create_squadron(
    state: &mut GameState,
    config: &GameConfig,
    home: SquadronHome,
    classes: &[&str],
) -> Option<(SquadronId, Vec<ShipId>)> {
    let flagship_class = *classes.first()?;
    let kind = config.ship_spec(flagship_class)?.role;
    let squadron_id = state.counters.next_squadron();
    let mut ship_ids = Vec::with_capacity(classes.len());
    for &class in classes {
        if config.ship_spec(class).is_none() {
            tracing::warn!(class, "unknown ship class in squadron creation");
            return None;
        }
        let ship_id = state.counters.next_ship();
        state.ships.add(
            ship_id,
            Ship {
                id: ship_id,
                class: class.to_owned(),
                squadron: squadron_id,
                state: CombatState::Undamaged,
                damage: 0,
            },
        );
        index_insert(&mut state.indexes.ships_by_squadron, squadron_id, ship_id);
        ship_ids.push(ship_id);
    }
    let flagship = ship_ids[0];
    let escorts = ship_ids[1..].to_vec();
    state.squadrons.add(
        squadron_id,
        Squadron {
            id: squadron_id,
            home,
            kind,
            flagship,
            escorts,
            marine_unit_ids: Vec::new(),
            colonists_ptu: 0,
        },
    );
    attach_to_home(state, squadron_id, home);
    Some((squadron_id, ship_ids))
}

fn attach_to_home(state: &mut GameState, squadron: SquadronId, home: SquadronHome) {
    match home {
        SquadronHome::Fleet(fleet) => {
            if let Some(record) = state.fleets.get_mut(fleet) {
                record.squadrons.push(squadron);
            }
        }
        SquadronHome::Colony(colony) => {
            if let Some(record) = state.colonies.get_mut(colony) {
                record.fighter_squadron_ids.push(squadron);
            }
        }
    }
}

fn detach_from_home(state: &mut GameState, squadron: SquadronId, home: SquadronHome) {
    match home {
        SquadronHome::Fleet(fleet) => {
            if let Some(record) = state.fleets.get_mut(fleet) {
                record.squadrons.retain(|&s| s != squadron);
            }
        }
        SquadronHome::Colony(colony) => {
            if let Some(record) = state.colonies.get_mut(colony) {
                record.fighter_squadron_ids.retain(|&s| s != squadron);
            }
        }
    }
}

/// Adds an existing ship to a squadron's escort list.
pub fn attach_escort(state: &mut GameState, squadron: SquadronId, ship: ShipId) {
    let Some(record) = state.squadrons.get_mut(squadron) else {
        tracing::warn!(%squadron, "escort attach to missing squadron ignored");
        return;
    };
    record.escorts.push(ship);
    if let Some(hull) = state.ships.get_mut(ship) {
        let old = hull.squadron;
        hull.squadron = squadron;
        index_remove(&mut state.indexes.ships_by_squadron, old, ship);
    }
    index_insert(&mut state.indexes.ships_by_squadron, squadron, ship);
}

/// Removes a single ship from play.
///
/// The squadron's escort list (or flagship slot) is cleaned up in the same
/// call; losing the flagship promotes the senior escort, and losing the last
/// hull removes the squadron itself.
pub fn remove_ship(state: &mut GameState, ship: ShipId) {
    let Some(record) = state.ships.remove(ship) else {
        return;
    };
    let squadron = record.squadron;
    index_remove(&mut state.indexes.ships_by_squadron, squadron, ship);
    let Some(sqn) = state.squadrons.get_mut(squadron) else {
        return;
    };
    if sqn.flagship == ship {
        if sqn.escorts.is_empty() {
            remove_squadron(state, squadron);
        } else {
            sqn.flagship = sqn.escorts.remove(0);
        }
    } else {
        sqn.escorts.retain(|&s| s != ship);
    }
}

/// Removes a squadron, its ships, and anything embarked aboard it.
/// Idempotent.
pub fn remove_squadron(state: &mut GameState, squadron: SquadronId) {
    let Some(record) = state.squadrons.remove(squadron) else {
        return;
    };
    for ship in record.ship_ids() {
        state.ships.remove(ship);
        index_remove(&mut state.indexes.ships_by_squadron, squadron, ship);
    }
    // Embarked formations go down with the lift.
    for unit in record.marine_unit_ids {
        state.ground_units.remove(unit);
    }
    detach_from_home(state, squadron, record.home);
}

/// Moves a squadron between fleets, updating both fleets' squadron lists.
pub fn transfer_squadron(state: &mut GameState, squadron: SquadronId, to: FleetId) {
    let Some(record) = state.squadrons.get(squadron) else {
        tracing::warn!(%squadron, "transfer of missing squadron ignored");
        return;
    };
    let old_home = record.home;
    detach_from_home(state, squadron, old_home);
    if let Some(record) = state.squadrons.get_mut(squadron) {
        record.home = SquadronHome::Fleet(to);
    }
    attach_to_home(state, squadron, SquadronHome::Fleet(to));
}

/// Escort command cost in excess of the flagship's command rating. Zero when
/// the squadron is within limits.
pub fn command_overflow(state: &GameState, config: &GameConfig, squadron: SquadronId) -> u32 {
    let Some(record) = state.squadrons.get(squadron) else {
        return 0;
    };
    let rating = state
        .ships
        .get(record.flagship)
        .and_then(|ship| config.ship_spec(&ship.class))
        .map_or(0, |spec| spec.command_rating);
    let cost: u32 = record
        .escorts
        .iter()
        .filter_map(|&escort| state.ships.get(escort))
        .filter_map(|ship| config.ship_spec(&ship.class))
        .map(|spec| spec.command_cost)
        .sum();
    cost.saturating_sub(rating)
}

/// Whether `kind` may share a fleet with the kinds already present.
///
/// Intel squadrons never brigade with non-Intel squadrons.
pub fn composition_allows(existing: &[SquadronKind], adding: SquadronKind) -> bool {
    if existing.is_empty() {
        return true;
    }
    let any_intel = existing.contains(&SquadronKind::Intel);
    match adding {
        SquadronKind::Intel => any_intel,
        _ => !any_intel,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intel_never_mixes_with_other_kinds() {
        assert!(composition_allows(&[], SquadronKind::Intel));
        assert!(composition_allows(&[SquadronKind::Intel], SquadronKind::Intel));
        assert!(!composition_allows(&[SquadronKind::Intel], SquadronKind::Combat));
        assert!(!composition_allows(&[SquadronKind::Combat], SquadronKind::Intel));
        assert!(composition_allows(
            &[SquadronKind::Combat, SquadronKind::Auxiliary],
            SquadronKind::Expansion
        ));
    }
}

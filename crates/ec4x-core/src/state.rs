// SPDX-License-Identifier: Apache-2.0
//! The world state: every entity table, every secondary index, the map, and
//! the id counters.
//!
//! `GameState` is a plain serializable value — no hidden handles, no
//! process-local caches. A saved `(state, base_seed)` pair is sufficient to
//! resume and will replay byte-identically.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::colony::Colony;
use crate::facility::{Kastra, Neoria};
use crate::fleet::{Fleet, Ship, Squadron};
use crate::ground::GroundUnit;
use crate::house::{DiploRelation, DiploState, House};
use crate::ident::{
    ColonyId, ConstructionProjectId, FleetId, GroundUnitId, HouseId, IdCounters, KastraId,
    NeoriaId, RepairProjectId, ShipId, SquadronId, SystemId,
};
use crate::map::{StarMap, System};
use crate::project::{ConstructionProject, ProjectId, RepairProject};
use crate::store::Table;

/// Errors from state serialization.
#[derive(Debug, thiserror::Error)]
pub enum StateCodecError {
    /// CBOR encoding failed.
    #[error("state encode failed: {0}")]
    Encode(String),
    /// CBOR decoding failed.
    #[error("state decode failed: {0}")]
    Decode(String),
}

/// Secondary indexes, maintained in the same call as every primary write.
///
/// Vec-valued entries are kept sorted so index contents are canonical
/// regardless of insertion history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Indexes {
    /// Fleets present in each system.
    pub fleets_by_system: BTreeMap<SystemId, Vec<FleetId>>,
    /// Fleets owned by each house.
    pub fleets_by_owner: BTreeMap<HouseId, Vec<FleetId>>,
    /// The colony in each colonized system.
    pub colonies_by_system: BTreeMap<SystemId, ColonyId>,
    /// Colonies owned by each house.
    pub colonies_by_owner: BTreeMap<HouseId, Vec<ColonyId>>,
    /// Ships of each squadron.
    pub ships_by_squadron: BTreeMap<SquadronId, Vec<ShipId>>,
    /// Projects owned by each colony.
    pub projects_by_colony: BTreeMap<ColonyId, Vec<ProjectId>>,
    /// Projects bound to each facility's docks.
    pub projects_by_facility: BTreeMap<NeoriaId, Vec<ProjectId>>,
}

/// Inserts `value` into the sorted bucket under `key`.
pub(crate) fn index_insert<K: Ord, V: Ord + Copy>(
    map: &mut BTreeMap<K, Vec<V>>,
    key: K,
    value: V,
) {
    let bucket = map.entry(key).or_default();
    if let Err(pos) = bucket.binary_search(&value) {
        bucket.insert(pos, value);
    }
}

/// Removes `value` from the bucket under `key`, dropping empty buckets.
pub(crate) fn index_remove<K: Ord, V: Ord + Copy>(
    map: &mut BTreeMap<K, Vec<V>>,
    key: K,
    value: V,
) {
    if let Some(bucket) = map.get_mut(&key) {
        if let Ok(pos) = bucket.binary_search(&value) {
            bucket.remove(pos);
        }
        if bucket.is_empty() {
            map.remove(&key);
        }
    }
}

/// A dock-built ship awaiting commissioning at the start of the next turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingCommission {
    /// Colony that built the hull.
    pub colony: ColonyId,
    /// Class name.
    pub class: String,
}

/// The complete world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Current turn number; turn 1 is the first resolved turn.
    pub turn: u32,
    /// Base seed every phase seed derives from.
    pub base_seed: u64,
    /// Monotone id allocation.
    pub counters: IdCounters,
    /// Map geometry.
    pub map: StarMap,
    /// Star systems.
    pub systems: Table<SystemId, System>,
    /// Houses.
    pub houses: Table<HouseId, House>,
    /// Colonies.
    pub colonies: Table<ColonyId, Colony>,
    /// Fleets.
    pub fleets: Table<FleetId, Fleet>,
    /// Squadrons.
    pub squadrons: Table<SquadronId, Squadron>,
    /// Ships.
    pub ships: Table<ShipId, Ship>,
    /// Neorias.
    pub neorias: Table<NeoriaId, Neoria>,
    /// Kastras.
    pub kastras: Table<KastraId, Kastra>,
    /// Ground units.
    pub ground_units: Table<GroundUnitId, GroundUnit>,
    /// Construction projects.
    pub construction_projects: Table<ConstructionProjectId, ConstructionProject>,
    /// Repair projects.
    pub repair_projects: Table<RepairProjectId, RepairProject>,
    /// Secondary indexes.
    pub indexes: Indexes,
    /// Outstanding diplomatic proposals, keyed `(from, to)`.
    pub proposals: BTreeMap<(HouseId, HouseId), DiploState>,
    /// Dock-built hulls commissioning at the top of next turn.
    pub pending_commissions: Vec<PendingCommission>,
}

impl GameState {
    /// House ids in canonical (ascending) order, eliminated houses included.
    #[must_use]
    pub fn house_ids(&self) -> Vec<HouseId> {
        self.houses.ids()
    }

    /// House ids still in play.
    #[must_use]
    pub fn living_house_ids(&self) -> Vec<HouseId> {
        self.houses
            .iter()
            .filter(|(_, house)| !house.is_eliminated)
            .map(|(id, _)| id)
            .collect()
    }

    /// Diplomatic state between two houses (Neutral if unset).
    #[must_use]
    pub fn relation(&self, a: HouseId, b: HouseId) -> DiploState {
        self.houses
            .get(a)
            .map_or(DiploState::Neutral, |house| house.relation_with(b))
    }

    /// Sets the symmetric diplomatic state between two houses.
    pub fn set_relation(&mut self, a: HouseId, b: HouseId, state: DiploState, turn: u32) {
        for (me, peer) in [(a, b), (b, a)] {
            if let Some(house) = self.houses.get_mut(me) {
                house
                    .relations
                    .insert(peer, DiploRelation { state, since_turn: turn });
            }
        }
    }

    /// Fleets currently in `system`, in id order.
    #[must_use]
    pub fn fleets_in_system(&self, system: SystemId) -> Vec<FleetId> {
        self.indexes
            .fleets_by_system
            .get(&system)
            .cloned()
            .unwrap_or_default()
    }

    /// The colony in `system`, if colonized.
    #[must_use]
    pub fn colony_in_system(&self, system: SystemId) -> Option<ColonyId> {
        self.indexes.colonies_by_system.get(&system).copied()
    }

    /// Serializes the state to canonical CBOR bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, StateCodecError> {
        let mut bytes = Vec::new();
        ciborium::ser::into_writer(self, &mut bytes)
            .map_err(|e| StateCodecError::Encode(e.to_string()))?;
        Ok(bytes)
    }

    /// Deserializes a state from CBOR bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StateCodecError> {
        ciborium::de::from_reader(bytes).map_err(|e: ciborium::de::Error<std::io::Error>| {
            StateCodecError::Decode(e.to_string())
        })
    }

    /// BLAKE3 digest of the canonical serialization.
    ///
    /// Two states with equal digests resolve future turns identically; the
    /// determinism tests compare digests across replays.
    pub fn digest(&self) -> Result<[u8; 32], StateCodecError> {
        let bytes = self.to_bytes()?;
        Ok(*blake3::hash(&bytes).as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_insert_keeps_buckets_sorted_and_unique() {
        let mut map: BTreeMap<SystemId, Vec<FleetId>> = BTreeMap::new();
        index_insert(&mut map, SystemId(0), FleetId(2));
        index_insert(&mut map, SystemId(0), FleetId(0));
        index_insert(&mut map, SystemId(0), FleetId(1));
        index_insert(&mut map, SystemId(0), FleetId(1));
        assert_eq!(map[&SystemId(0)], vec![FleetId(0), FleetId(1), FleetId(2)]);
    }

    #[test]
    fn index_remove_drops_empty_buckets() {
        let mut map: BTreeMap<SystemId, Vec<FleetId>> = BTreeMap::new();
        index_insert(&mut map, SystemId(3), FleetId(9));
        index_remove(&mut map, SystemId(3), FleetId(9));
        assert!(map.is_empty());
        // Removing again is harmless.
        index_remove(&mut map, SystemId(3), FleetId(9));
    }
}

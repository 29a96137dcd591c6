// SPDX-License-Identifier: Apache-2.0
//! Generic id-keyed entity tables.
//!
//! Every entity kind lives in a [`Table`] keyed by its typed id. Tables are
//! `BTreeMap`-backed so iteration order is the id order — deterministic and
//! stable across serialization round trips. Cross-entity writes (anything
//! that must also touch a secondary index or a parent's back-reference) go
//! through the `ops` modules, never through a bare table handle.

use std::collections::BTreeMap;
use std::fmt::Debug;

use serde::{Deserialize, Serialize};

/// An id-keyed entity table.
///
/// Failure behavior follows the store contract: `get` on a missing id is
/// `None`, [`Table::update`] on a missing id warns and leaves the table
/// untouched, and [`Table::remove`] is idempotent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table<I: Ord, T> {
    rows: BTreeMap<I, T>,
}

impl<I: Ord, T> Default for Table<I, T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
        }
    }
}

impl<I, T> Table<I, T>
where
    I: Ord + Copy + Debug + std::fmt::Display,
{
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a fresh row under `id`.
    ///
    /// Ids are allocated by monotone counters and never reused, so a
    /// collision indicates an engine bug; the row is still replaced to keep
    /// the table authoritative.
    pub fn add(&mut self, id: I, row: T) {
        if self.rows.insert(id, row).is_some() {
            debug_assert!(false, "duplicate add for id {id}");
            tracing::warn!(%id, "table add replaced an existing row");
        }
    }

    /// Returns the row under `id`, if present.
    pub fn get(&self, id: I) -> Option<&T> {
        self.rows.get(&id)
    }

    /// Returns a mutable reference to the row under `id`, if present.
    ///
    /// Crate-internal: callers outside the ops layer must not mutate rows
    /// whose fields feed a secondary index.
    pub(crate) fn get_mut(&mut self, id: I) -> Option<&mut T> {
        self.rows.get_mut(&id)
    }

    /// Replaces the row under `id`.
    ///
    /// A missing id is logged and ignored; the caller raced a removal and
    /// the removal wins.
    pub fn update(&mut self, id: I, row: T) {
        match self.rows.get_mut(&id) {
            Some(slot) => *slot = row,
            None => tracing::warn!(%id, "update for missing id ignored"),
        }
    }

    /// Removes and returns the row under `id`. Idempotent.
    pub fn remove(&mut self, id: I) -> Option<T> {
        self.rows.remove(&id)
    }

    /// Whether a row exists under `id`.
    #[must_use]
    pub fn contains(&self, id: I) -> bool {
        self.rows.contains_key(&id)
    }

    /// Iterates rows in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (I, &T)> {
        self.rows.iter().map(|(id, row)| (*id, row))
    }

    /// Collects every id, in ascending order, into an owned buffer.
    ///
    /// This is the iterate-then-mutate pattern: phases snapshot the id list
    /// first so mutation never happens under an open iterator.
    #[must_use]
    pub fn ids(&self) -> Vec<I> {
        self.rows.keys().copied().collect()
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ident::FleetId;

    #[test]
    fn get_on_missing_id_is_none() {
        let table: Table<FleetId, u32> = Table::new();
        assert!(table.get(FleetId(3)).is_none());
    }

    #[test]
    fn update_on_missing_id_is_a_no_op() {
        let mut table: Table<FleetId, u32> = Table::new();
        table.update(FleetId(0), 7);
        assert!(table.is_empty());
    }

    #[test]
    fn remove_is_idempotent() {
        let mut table: Table<FleetId, u32> = Table::new();
        table.add(FleetId(0), 1);
        assert_eq!(table.remove(FleetId(0)), Some(1));
        assert_eq!(table.remove(FleetId(0)), None);
    }

    #[test]
    fn iteration_is_in_id_order() {
        let mut table: Table<FleetId, u32> = Table::new();
        table.add(FleetId(2), 20);
        table.add(FleetId(0), 0);
        table.add(FleetId(1), 10);
        let ids: Vec<FleetId> = table.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![FleetId(0), FleetId(1), FleetId(2)]);
    }
}

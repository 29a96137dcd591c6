// SPDX-License-Identifier: Apache-2.0
//! Typed identifiers and their monotone allocation counters.
//!
//! Every entity kind gets its own opaque id newtype so two ids of different
//! kinds can never be confused at a call site. Ids are plain `u32` indices
//! allocated by [`IdCounters`], which lives inside the game state so that
//! allocation is part of the deterministic, serializable world.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$doc:meta])* $name:ident, $prefix:literal) => {
        $(#[$doc])*
        #[repr(transparent)]
        #[derive(
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            Debug,
            Serialize,
            Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            /// Returns the raw index value of this id.
            #[must_use]
            pub fn value(self) -> u32 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, "-{}"), self.0)
            }
        }
    };
}

define_id!(
    /// A star system on the hex map.
    SystemId,
    "sys"
);
define_id!(
    /// A colony inside a system.
    ColonyId,
    "col"
);
define_id!(
    /// A great house (player).
    HouseId,
    "house"
);
define_id!(
    /// A fleet of squadrons in one system.
    FleetId,
    "fleet"
);
define_id!(
    /// A single hull.
    ShipId,
    "ship"
);
define_id!(
    /// A squadron: flagship plus escorts.
    SquadronId,
    "sqn"
);
define_id!(
    /// A neoria: spaceport, shipyard, or drydock.
    NeoriaId,
    "neo"
);
define_id!(
    /// A kastra: orbital starbase.
    KastraId,
    "kas"
);
define_id!(
    /// A planet-side ground unit.
    GroundUnitId,
    "gnd"
);
define_id!(
    /// A construction project in a queue or dock.
    ConstructionProjectId,
    "build"
);
define_id!(
    /// A repair project in a drydock.
    RepairProjectId,
    "repair"
);

macro_rules! counter_method {
    ($(#[$doc:meta])* $method:ident, $field:ident, $id:ident) => {
        $(#[$doc])*
        pub fn $method(&mut self) -> $id {
            let id = $id(self.$field);
            self.$field += 1;
            id
        }
    };
}

/// Per-kind monotonically increasing id counters.
///
/// Stored inside the game state; never reset, never reused, so a saved state
/// resumes allocation exactly where it left off.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdCounters {
    /// Next system index.
    pub systems: u32,
    /// Next colony index.
    pub colonies: u32,
    /// Next house index.
    pub houses: u32,
    /// Next fleet index.
    pub fleets: u32,
    /// Next ship index.
    pub ships: u32,
    /// Next squadron index.
    pub squadrons: u32,
    /// Next neoria index.
    pub neorias: u32,
    /// Next kastra index.
    pub kastras: u32,
    /// Next ground-unit index.
    pub ground_units: u32,
    /// Next construction-project index.
    pub construction_projects: u32,
    /// Next repair-project index.
    pub repair_projects: u32,
}

impl IdCounters {
    counter_method!(
        /// Allocates the next [`SystemId`].
        next_system,
        systems,
        SystemId
    );
    counter_method!(
        /// Allocates the next [`ColonyId`].
        next_colony,
        colonies,
        ColonyId
    );
    counter_method!(
        /// Allocates the next [`HouseId`].
        next_house,
        houses,
        HouseId
    );
    counter_method!(
        /// Allocates the next [`FleetId`].
        next_fleet,
        fleets,
        FleetId
    );
    counter_method!(
        /// Allocates the next [`ShipId`].
        next_ship,
        ships,
        ShipId
    );
    counter_method!(
        /// Allocates the next [`SquadronId`].
        next_squadron,
        squadrons,
        SquadronId
    );
    counter_method!(
        /// Allocates the next [`NeoriaId`].
        next_neoria,
        neorias,
        NeoriaId
    );
    counter_method!(
        /// Allocates the next [`KastraId`].
        next_kastra,
        kastras,
        KastraId
    );
    counter_method!(
        /// Allocates the next [`GroundUnitId`].
        next_ground_unit,
        ground_units,
        GroundUnitId
    );
    counter_method!(
        /// Allocates the next [`ConstructionProjectId`].
        next_construction_project,
        construction_projects,
        ConstructionProjectId
    );
    counter_method!(
        /// Allocates the next [`RepairProjectId`].
        next_repair_project,
        repair_projects,
        RepairProjectId
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_are_monotone_per_kind() {
        let mut counters = IdCounters::default();
        assert_eq!(counters.next_fleet(), FleetId(0));
        assert_eq!(counters.next_fleet(), FleetId(1));
        // A different kind runs on its own counter.
        assert_eq!(counters.next_ship(), ShipId(0));
        assert_eq!(counters.next_fleet(), FleetId(2));
    }

    #[test]
    fn ids_render_with_kind_prefix() {
        assert_eq!(SystemId(7).to_string(), "sys-7");
        assert_eq!(KastraId(0).to_string(), "kas-0");
    }
}

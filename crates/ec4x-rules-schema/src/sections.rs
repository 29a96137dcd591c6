// SPDX-License-Identifier: Apache-2.0
//! Rule sections: the strongly-typed bodies of the rules payload.
//!
//! Each section carries its own `version` so clients can tolerate additive
//! changes section by section. `Default` for every section yields the
//! standard EC4X ruleset; scenario files may override individual values
//! before the engine is constructed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Technology fields researchable beyond the economic (EL) and science (SL)
/// ladders.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum TechField {
    /// Electronic intelligence: detection rolls, espionage defense.
    ElectronicIntel,
    /// Cloaking: raider stealth rolls.
    Cloaking,
    /// Construction: dock throughput multiplier.
    Construction,
    /// Weapons: attack-strength bonuses.
    Weapons,
    /// Shields: defense-strength and planetary-shield bonuses.
    Shields,
    /// Drive: reserved for movement-rate upgrades.
    Drive,
}

impl TechField {
    /// All researchable fields in canonical order.
    pub const ALL: [TechField; 6] = [
        TechField::ElectronicIntel,
        TechField::Cloaking,
        TechField::Construction,
        TechField::Weapons,
        TechField::Shields,
        TechField::Drive,
    ];
}

/// Squadron classification a ship class belongs to when it leads or joins a
/// squadron.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ShipRole {
    /// Line combatant.
    Combat,
    /// Intelligence platform; never brigaded with other roles.
    Intel,
    /// Colonization spacelift (carries PTUs).
    Expansion,
    /// Logistics spacelift (carries marines and stores).
    Auxiliary,
    /// Short-range fighter.
    Fighter,
}

/// Targeting bucket a ship or facility occupies inside a battle.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum TargetBucket {
    /// Cloak-capable raiders.
    Raider,
    /// Capital ships.
    Capital,
    /// Escorts and pickets.
    Escort,
    /// Fighter squadrons.
    Fighter,
    /// Orbital starbases.
    Starbase,
}

impl TargetBucket {
    /// Targeting weight applied when building a shooter's priority matrix.
    pub fn weight(self) -> f64 {
        match self {
            TargetBucket::Raider => 1.5,
            TargetBucket::Capital => 1.2,
            TargetBucket::Escort => 1.0,
            TargetBucket::Fighter => 0.8,
            TargetBucket::Starbase => 2.0,
        }
    }
}

/// Habitability class of a colonizable planet.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum PlanetClass {
    /// Airless rock; minimal output.
    Barren,
    /// Hostile but workable.
    Marginal,
    /// Earthlike.
    Habitable,
    /// Garden world; maximal output.
    Lush,
}

impl PlanetClass {
    /// Gross-output multiplier in percent.
    pub fn output_percent(self) -> u64 {
        match self {
            PlanetClass::Barren => 40,
            PlanetClass::Marginal => 70,
            PlanetClass::Habitable => 100,
            PlanetClass::Lush => 130,
        }
    }
}

/// Mineral wealth rating of a system's primary world.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ResourceRating {
    /// Depleted crusts.
    Poor,
    /// Baseline.
    Normal,
    /// Abundant.
    Rich,
    /// Motherlode.
    VeryRich,
}

impl ResourceRating {
    /// Gross-output multiplier in percent.
    pub fn output_percent(self) -> u64 {
        match self {
            ResourceRating::Poor => 70,
            ResourceRating::Normal => 100,
            ResourceRating::Rich => 120,
            ResourceRating::VeryRich => 150,
        }
    }
}

/// Static description of one ship class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipSpec {
    /// Attack strength at full capability.
    pub attack: u32,
    /// Defense strength; cumulative hits at or above this cripple the hull.
    pub defense: u32,
    /// Command rating: escort command cost a flagship of this class can lead.
    pub command_rating: u32,
    /// Command cost this hull charges against a flagship and the house C2 pool.
    pub command_cost: u32,
    /// Production-point cost, debited at order submission.
    pub cost: u32,
    /// Build time in turns at a dock.
    pub build_turns: u32,
    /// Per-turn maintenance in PP for an Active fleet.
    pub maintenance: u32,
    /// Squadron classification.
    pub role: ShipRole,
    /// Targeting bucket.
    pub bucket: TargetBucket,
    /// Whether the class begins battles cloaked.
    pub cloaked: bool,
    /// Whether the class mounts planet-breaker ordnance (ignores shields).
    pub planet_breaker: bool,
    /// Colonist capacity in PTUs (Expansion hulls).
    pub carry_ptu: u32,
    /// Marine capacity (Auxiliary hulls).
    pub carry_marines: u32,
}

/// Section: every buildable ship class, keyed by class name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipRules {
    /// Section version for additive evolution.
    pub version: u16,
    /// Class table in canonical (name) order.
    pub classes: BTreeMap<String, ShipSpec>,
}

#[allow(clippy::too_many_arguments)]
fn ship(
    attack: u32,
    defense: u32,
    command_rating: u32,
    command_cost: u32,
    cost: u32,
    build_turns: u32,
    maintenance: u32,
    role: ShipRole,
    bucket: TargetBucket,
) -> ShipSpec {
    ShipSpec {
        attack,
        defense,
        command_rating,
        command_cost,
        cost,
        build_turns,
        maintenance,
        role,
        bucket,
        cloaked: false,
        planet_breaker: false,
        carry_ptu: 0,
        carry_marines: 0,
    }
}

impl Default for ShipRules {
    fn default() -> Self {
        let mut classes = BTreeMap::new();
        classes.insert(
            "Corvette".to_owned(),
            ship(2, 2, 1, 1, 20, 1, 1, ShipRole::Combat, TargetBucket::Escort),
        );
        classes.insert(
            "Frigate".to_owned(),
            ship(3, 4, 2, 1, 35, 2, 1, ShipRole::Combat, TargetBucket::Escort),
        );
        classes.insert(
            "Destroyer".to_owned(),
            ship(5, 5, 3, 2, 50, 2, 2, ShipRole::Combat, TargetBucket::Escort),
        );
        classes.insert(
            "Cruiser".to_owned(),
            ship(8, 8, 5, 3, 90, 3, 3, ShipRole::Combat, TargetBucket::Capital),
        );
        classes.insert(
            "Battleship".to_owned(),
            ship(14, 14, 8, 5, 160, 4, 5, ShipRole::Combat, TargetBucket::Capital),
        );
        let mut dreadnought = ship(
            20,
            20,
            10,
            7,
            240,
            5,
            7,
            ShipRole::Combat,
            TargetBucket::Capital,
        );
        dreadnought.planet_breaker = true;
        classes.insert("Dreadnought".to_owned(), dreadnought);
        let mut raider = ship(6, 4, 3, 2, 70, 3, 2, ShipRole::Combat, TargetBucket::Raider);
        raider.cloaked = true;
        classes.insert("Raider".to_owned(), raider);
        classes.insert(
            "Fighter".to_owned(),
            ship(2, 1, 0, 1, 10, 1, 1, ShipRole::Fighter, TargetBucket::Fighter),
        );
        classes.insert(
            "Scout".to_owned(),
            ship(0, 2, 2, 1, 30, 2, 1, ShipRole::Intel, TargetBucket::Escort),
        );
        let mut etac = ship(0, 3, 1, 2, 60, 3, 1, ShipRole::Expansion, TargetBucket::Escort);
        etac.carry_ptu = 20;
        classes.insert("Etac".to_owned(), etac);
        let mut transport = ship(0, 4, 1, 2, 45, 2, 1, ShipRole::Auxiliary, TargetBucket::Escort);
        transport.carry_marines = 4;
        classes.insert("Transport".to_owned(), transport);
        Self {
            version: 1,
            classes,
        }
    }
}

/// Ground-unit classification.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum GroundClass {
    /// Planet-side defense battery; fires at orbiting and landing ships.
    Battery,
    /// Garrison army.
    Army,
    /// Marine assault formation; the only class that can invade.
    Marine,
}

impl GroundClass {
    /// All ground classes in canonical order.
    pub const ALL: [GroundClass; 3] = [GroundClass::Battery, GroundClass::Army, GroundClass::Marine];
}

/// Static description of one ground-unit class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundUnitSpec {
    /// Attack strength.
    pub attack: u32,
    /// Defense strength; cripple at DS, destroy a crippled unit at 0.5·DS more.
    pub defense: u32,
    /// Production-point cost.
    pub cost: u32,
    /// Build time in turns at colony level.
    pub build_turns: u32,
    /// Per-turn maintenance in PP.
    pub maintenance: u32,
}

/// Section: ground-unit classes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundUnitRules {
    /// Section version for additive evolution.
    pub version: u16,
    /// Class table in canonical order.
    pub classes: BTreeMap<GroundClass, GroundUnitSpec>,
}

impl Default for GroundUnitRules {
    fn default() -> Self {
        let mut classes = BTreeMap::new();
        classes.insert(
            GroundClass::Battery,
            GroundUnitSpec {
                attack: 6,
                defense: 8,
                cost: 40,
                build_turns: 2,
                maintenance: 1,
            },
        );
        classes.insert(
            GroundClass::Army,
            GroundUnitSpec {
                attack: 4,
                defense: 6,
                cost: 25,
                build_turns: 1,
                maintenance: 1,
            },
        );
        classes.insert(
            GroundClass::Marine,
            GroundUnitSpec {
                attack: 5,
                defense: 5,
                cost: 30,
                build_turns: 1,
                maintenance: 1,
            },
        );
        Self {
            version: 1,
            classes,
        }
    }
}

/// Section: orbital and planet-side facilities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilityRules {
    /// Section version for additive evolution.
    pub version: u16,
    /// Construction docks at a spaceport.
    pub spaceport_docks: u32,
    /// Construction docks at a shipyard.
    pub shipyard_docks: u32,
    /// Repair docks at a drydock.
    pub drydock_docks: u32,
    /// Cost multiplier for ships laid down at a planet-side spaceport.
    pub spaceport_cost_factor: u32,
    /// PP cost of a spaceport.
    pub spaceport_cost: u32,
    /// PP cost of a shipyard.
    pub shipyard_cost: u32,
    /// PP cost of a drydock.
    pub drydock_cost: u32,
    /// Build time in turns for any neoria.
    pub neoria_build_turns: u32,
    /// Per-turn maintenance of any neoria.
    pub neoria_maintenance: u32,
    /// Defense strength of any neoria under bombardment.
    pub neoria_defense: u32,
    /// Starbase attack strength.
    pub kastra_attack: u32,
    /// Starbase defense strength.
    pub kastra_defense: u32,
    /// Starbase bonus to raider-detection rolls.
    pub kastra_detection_bonus: i32,
    /// PP cost of a starbase.
    pub kastra_cost: u32,
    /// Starbase build time in turns.
    pub kastra_build_turns: u32,
    /// Per-turn maintenance of a starbase.
    pub kastra_maintenance: u32,
    /// Percentage of incoming non-planet-breaker bombardment hits absorbed
    /// per planetary shield level.
    pub shield_reduction_percent: u32,
    /// PP cost of one planetary shield level.
    pub shield_cost: u32,
    /// Build time in turns for one planetary shield level.
    pub shield_build_turns: u32,
}

impl Default for FacilityRules {
    fn default() -> Self {
        Self {
            version: 1,
            spaceport_docks: 5,
            shipyard_docks: 10,
            drydock_docks: 10,
            spaceport_cost_factor: 2,
            spaceport_cost: 100,
            shipyard_cost: 200,
            drydock_cost: 150,
            neoria_build_turns: 3,
            neoria_maintenance: 2,
            neoria_defense: 12,
            kastra_attack: 16,
            kastra_defense: 24,
            kastra_detection_bonus: 2,
            kastra_cost: 300,
            kastra_build_turns: 5,
            kastra_maintenance: 4,
            shield_reduction_percent: 25,
            shield_cost: 120,
            shield_build_turns: 2,
        }
    }
}

/// Section: construction pricing for colony-level work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructionRules {
    /// Section version for additive evolution.
    pub version: u16,
    /// PP cost of raising infrastructure by one level.
    pub infrastructure_cost_per_level: u32,
    /// Build time in turns for one infrastructure level.
    pub infrastructure_build_turns: u32,
    /// PP cost per industrial unit invested.
    pub industrial_unit_cost: u32,
    /// Build time in turns for an industrial-unit investment.
    pub industrial_unit_build_turns: u32,
}

impl Default for ConstructionRules {
    fn default() -> Self {
        Self {
            version: 1,
            infrastructure_cost_per_level: 60,
            infrastructure_build_turns: 2,
            industrial_unit_cost: 15,
            industrial_unit_build_turns: 1,
        }
    }
}

/// Section: command, capacity, and espionage limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitsRules {
    /// Section version for additive evolution.
    pub version: u16,
    /// Base C2 command pool per house.
    pub c2_base: u32,
    /// Additional C2 per science level.
    pub c2_per_sl: u32,
    /// Grace turns before a capacity violation force-scraps units.
    pub violation_grace_turns: u32,
    /// EBP investment above this threshold risks detection penalties; the
    /// engine caps per-turn investment here.
    pub espionage_detection_threshold: u32,
}

impl Default for LimitsRules {
    fn default() -> Self {
        Self {
            version: 1,
            c2_base: 30,
            c2_per_sl: 5,
            violation_grace_turns: 3,
            espionage_detection_threshold: 25,
        }
    }
}

/// Section: colony output, taxation, maintenance, and blockade economics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EconomyRules {
    /// Section version for additive evolution.
    pub version: u16,
    /// Default tax rate in percent for new colonies.
    pub default_tax_percent: u64,
    /// Output reduction in percent while blockaded.
    pub blockade_penalty_percent: u64,
    /// Maintenance multiplier in percent for Reserve fleets.
    pub reserve_maintenance_percent: u32,
    /// Maintenance multiplier in percent for Mothballed fleets.
    pub mothball_maintenance_percent: u32,
    /// Gross output in PP per population unit before multipliers.
    pub output_per_population_unit: u64,
    /// Gross output in PP per industrial unit before multipliers.
    pub output_per_industrial_unit: u64,
    /// Output bonus in percent per infrastructure level.
    pub infrastructure_bonus_percent: u64,
    /// Output bonus in percent per economic level (EL).
    pub el_bonus_percent: u64,
    /// Prestige lost per blockaded colony per turn.
    pub blockade_prestige_penalty: i64,
}

impl Default for EconomyRules {
    fn default() -> Self {
        Self {
            version: 1,
            default_tax_percent: 50,
            blockade_penalty_percent: 60,
            reserve_maintenance_percent: 50,
            mothball_maintenance_percent: 0,
            output_per_population_unit: 2,
            output_per_industrial_unit: 3,
            infrastructure_bonus_percent: 5,
            el_bonus_percent: 5,
            blockade_prestige_penalty: 2,
        }
    }
}

/// Section: research ladders and their pricing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechRules {
    /// Section version for additive evolution.
    pub version: u16,
    /// PP of research needed for EL level `n` is `el_cost_base · n`.
    pub el_cost_base: u64,
    /// PP of research needed for SL level `n` is `sl_cost_base · n`.
    pub sl_cost_base: u64,
    /// PP of research needed for a technology level `n` is
    /// `tech_cost_base · n`.
    pub tech_cost_base: u64,
    /// Dock-throughput bonus in percent per Construction tech level.
    pub construction_dock_bonus_percent: u32,
}

impl Default for TechRules {
    fn default() -> Self {
        Self {
            version: 1,
            el_cost_base: 40,
            sl_cost_base: 50,
            tech_cost_base: 30,
            construction_dock_bonus_percent: 10,
        }
    }
}

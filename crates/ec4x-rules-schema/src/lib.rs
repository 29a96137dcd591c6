// SPDX-License-Identifier: Apache-2.0
//! ec4x-rules-schema: the game-rule payload shared between engine and clients.
//!
//! The engine consumes these sections as plain values at construction time;
//! clients receive the same sections inside a [`RulesSnapshot`] and verify
//! rule parity via the snapshot's SHA-256 hash. Sections are versioned
//! individually so additive changes do not break older clients.
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::unreadable_literal,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions,
    clippy::doc_markdown,
    clippy::missing_errors_doc,
    clippy::use_self
)]

mod sections;
mod snapshot;

pub use sections::{
    ConstructionRules, EconomyRules, FacilityRules, GroundClass, GroundUnitRules, GroundUnitSpec,
    LimitsRules, PlanetClass, ResourceRating, ShipRole, ShipRules, ShipSpec, TargetBucket,
    TechField, TechRules,
};
pub use snapshot::{
    Capability, RulesSections, RulesSnapshot, SchemaError, RULES_SCHEMA_VERSION,
};

// SPDX-License-Identifier: Apache-2.0
//! Turn phases.
//!
//! The driver in `turn.rs` runs these in a fixed order; each phase sees the
//! effects of every earlier phase of the same turn and nothing later. Phase
//! modules own their semantics; cross-entity writes still go through the
//! `ops` layer.

pub mod diplomacy;
pub mod economy;
pub mod espionage;
pub mod movement;
pub mod prestige;
pub mod queues;
pub mod research;

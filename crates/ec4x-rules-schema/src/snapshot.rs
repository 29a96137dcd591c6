// SPDX-License-Identifier: Apache-2.0
//! The versioned, hashed rules payload delivered to clients.
//!
//! The snapshot hash is SHA-256 over the canonical CBOR serialization of the
//! payload with the `hash` field zeroed. Clients recompute it to verify rule
//! parity with the engine before accepting a game. Capability strings let a
//! client refuse a game whose rules require features it does not implement.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::sections::{
    ConstructionRules, EconomyRules, FacilityRules, GroundUnitRules, LimitsRules, ShipRules,
    TechRules,
};

/// Version of the snapshot envelope itself.
pub const RULES_SCHEMA_VERSION: u16 = 1;

/// Capability strings a client must understand to join a game using the
/// corresponding section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Capability {
    /// Research and development ladders.
    #[serde(rename = "rd.v1")]
    ResearchV1,
    /// Construction queues and dock capacity.
    #[serde(rename = "build.v1")]
    BuildV1,
    /// Command-pool and violation limits.
    #[serde(rename = "limits.v1")]
    LimitsV1,
    /// Colony output, taxation, and blockade economics.
    #[serde(rename = "economy.v1")]
    EconomyV1,
}

impl Capability {
    /// Every capability the current engine requires.
    pub const REQUIRED: [Capability; 4] = [
        Capability::ResearchV1,
        Capability::BuildV1,
        Capability::LimitsV1,
        Capability::EconomyV1,
    ];
}

/// Errors produced while encoding or verifying a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Canonical CBOR encoding failed.
    #[error("canonical encode failed: {0}")]
    Encode(String),
    /// The embedded hash does not match the recomputed payload hash.
    #[error("snapshot hash mismatch: embedded {embedded}, computed {computed}")]
    HashMismatch {
        /// Hash carried inside the payload, hex encoded.
        embedded: String,
        /// Hash recomputed from the payload body, hex encoded.
        computed: String,
    },
}

/// The rule sections bundled into one payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RulesSections {
    /// Research ladders.
    pub tech: TechRules,
    /// Ship classes.
    pub ships: ShipRules,
    /// Ground-unit classes.
    pub ground_units: GroundUnitRules,
    /// Facilities.
    pub facilities: FacilityRules,
    /// Colony-level construction pricing.
    pub construction: ConstructionRules,
    /// Command and espionage limits.
    pub limits: LimitsRules,
    /// Output, taxation, maintenance, blockades.
    pub economy: EconomyRules,
}

/// Versioned, hashed rules payload shared with clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesSnapshot {
    /// Envelope schema version.
    pub schema_version: u16,
    /// Capabilities a client must support to join.
    pub capabilities: Vec<Capability>,
    /// SHA-256 over the canonical serialization with this field zeroed.
    pub hash: [u8; 32],
    /// The rule sections.
    pub sections: RulesSections,
}

impl RulesSnapshot {
    /// Builds a snapshot from rule sections, computing the payload hash.
    pub fn new(sections: RulesSections) -> Result<Self, SchemaError> {
        let mut snapshot = Self {
            schema_version: RULES_SCHEMA_VERSION,
            capabilities: Capability::REQUIRED.to_vec(),
            hash: [0u8; 32],
            sections,
        };
        snapshot.hash = snapshot.compute_hash()?;
        Ok(snapshot)
    }

    /// Recomputes the payload hash (with the embedded hash zeroed).
    pub fn compute_hash(&self) -> Result<[u8; 32], SchemaError> {
        let mut zeroed = self.clone();
        zeroed.hash = [0u8; 32];
        let mut bytes = Vec::new();
        ciborium::ser::into_writer(&zeroed, &mut bytes)
            .map_err(|e| SchemaError::Encode(e.to_string()))?;
        let digest = Sha256::digest(&bytes);
        let mut out = [0u8; 32];
        out.copy_from_slice(&digest);
        Ok(out)
    }

    /// Verifies that the embedded hash matches the payload body.
    pub fn verify(&self) -> Result<(), SchemaError> {
        let computed = self.compute_hash()?;
        if computed == self.hash {
            Ok(())
        } else {
            Err(SchemaError::HashMismatch {
                embedded: hex::encode(self.hash),
                computed: hex::encode(computed),
            })
        }
    }

    /// Hex rendering of the payload hash for logs and client handshakes.
    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn snapshot_hash_round_trips() {
        let snapshot = RulesSnapshot::new(RulesSections::default()).unwrap();
        snapshot.verify().unwrap();
    }

    #[test]
    fn tampering_breaks_verification() {
        let mut snapshot = RulesSnapshot::new(RulesSections::default()).unwrap();
        snapshot.sections.economy.blockade_penalty_percent = 10;
        assert!(snapshot.verify().is_err());
    }

    #[test]
    fn hash_is_stable_for_equal_sections() {
        let a = RulesSnapshot::new(RulesSections::default()).unwrap();
        let b = RulesSnapshot::new(RulesSections::default()).unwrap();
        assert_eq!(a.hash, b.hash);
    }

    #[test]
    fn required_capabilities_are_advertised() {
        let snapshot = RulesSnapshot::new(RulesSections::default()).unwrap();
        for cap in Capability::REQUIRED {
            assert!(snapshot.capabilities.contains(&cap));
        }
    }
}

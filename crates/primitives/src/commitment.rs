//! The commitment hash the on-chain verifier compares against.
//!
//! The verifier computes `keccak256(abi.encodePacked(txid, address, value))` over the three
//! strings it stored when the user registered the deposit. The adapter recomputes the same digest
//! from the claim once the ledger confirms it, so the contract never has to trust the raw claim.

use std::{fmt, str::FromStr};

use alloy_primitives::keccak256;
use alloy_sol_types::SolValue;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{constants::COMMITMENT_HEX_PREFIX, errors::CommitmentParseError};

/// A 32-byte Keccak-256 digest over a tightly packed `(string, string, string)` triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommitmentHash([u8; 32]);

impl CommitmentHash {
    /// Computes the commitment over the given deposit triple.
    pub fn compute(txid: &str, address: &str, value: &str) -> Self {
        let packed = tight_pack(txid, address, value);
        Self(keccak256(packed).0)
    }

    /// Returns the raw digest.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

/// Packs three strings the way Solidity's `abi.encodePacked(string, string, string)` does i.e.,
/// their UTF-8 bytes back to back with no length prefixes or padding.
pub fn tight_pack(txid: &str, address: &str, value: &str) -> Vec<u8> {
    (txid.to_owned(), address.to_owned(), value.to_owned()).abi_encode_packed()
}

impl From<[u8; 32]> for CommitmentHash {
    fn from(value: [u8; 32]) -> Self {
        Self(value)
    }
}

impl fmt::Display for CommitmentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{COMMITMENT_HEX_PREFIX}{}", hex::encode(self.0))
    }
}

impl FromStr for CommitmentHash {
    type Err = CommitmentParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix(COMMITMENT_HEX_PREFIX)
            .ok_or(CommitmentParseError::MissingPrefix)?;
        let bytes = hex::decode(digits)?;
        let digest: [u8; 32] = bytes
            .try_into()
            .map_err(|b: Vec<u8>| CommitmentParseError::InvalidLength(b.len()))?;

        Ok(Self(digest))
    }
}

impl Serialize for CommitmentHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CommitmentHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

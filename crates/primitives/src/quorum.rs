//! The signing quorum that guards the multisig locker.

use bitcoin::secp256k1::PublicKey;
use serde::{Deserialize, Serialize};

use crate::{
    constants::{DEFAULT_REQUIRED_SIGNATURES, DEFAULT_TOTAL_SIGNERS},
    errors::QuorumError,
};

/// An `m`-of-`n` quorum over an ordered set of signer keys.
///
/// The order of [`Self::pubkeys`] is consensus-critical: the ledger service derives the locker
/// script from it, so all signer nodes must be configured with the same order or the partial
/// signatures they submit will never be collated into one transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawQuorumPolicy", into = "RawQuorumPolicy")]
pub struct QuorumPolicy {
    required_signatures: usize,
    pubkeys: Vec<PublicKey>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawQuorumPolicy {
    #[serde(default = "default_required_signatures")]
    required_signatures: usize,
    pubkeys: Vec<PublicKey>,
}

const fn default_required_signatures() -> usize {
    DEFAULT_REQUIRED_SIGNATURES
}

impl QuorumPolicy {
    /// Creates a new [`QuorumPolicy`] after checking that it can actually be satisfied.
    pub fn new(required_signatures: usize, pubkeys: Vec<PublicKey>) -> Result<Self, QuorumError> {
        if required_signatures == 0 {
            return Err(QuorumError::ZeroThreshold);
        }

        if required_signatures > pubkeys.len() {
            return Err(QuorumError::ThresholdTooHigh {
                required: required_signatures,
                total: pubkeys.len(),
            });
        }

        if let Some(dup) = pubkeys
            .iter()
            .enumerate()
            .find_map(|(i, key)| pubkeys[..i].contains(key).then_some(i))
        {
            return Err(QuorumError::DuplicateKey(dup));
        }

        Ok(Self {
            required_signatures,
            pubkeys,
        })
    }

    /// Creates the standard 2-of-3 quorum.
    pub fn two_of_three(pubkeys: [PublicKey; DEFAULT_TOTAL_SIGNERS]) -> Result<Self, QuorumError> {
        Self::new(DEFAULT_REQUIRED_SIGNATURES, pubkeys.to_vec())
    }

    /// Number of partial signatures needed to finalize a spend.
    pub const fn required_signatures(&self) -> usize {
        self.required_signatures
    }

    /// Total number of signers.
    pub fn total_signers(&self) -> usize {
        self.pubkeys.len()
    }

    /// The signer keys in their consensus-critical order.
    pub fn pubkeys(&self) -> &[PublicKey] {
        &self.pubkeys
    }

    /// Returns `true` if `key` is one of the signers.
    pub fn contains(&self, key: &PublicKey) -> bool {
        self.pubkeys.contains(key)
    }

    /// The script type label the ledger service uses for this quorum, e.g. `multisig-2-of-3`.
    pub fn script_type(&self) -> String {
        format!(
            "multisig-{}-of-{}",
            self.required_signatures,
            self.total_signers()
        )
    }
}

impl TryFrom<RawQuorumPolicy> for QuorumPolicy {
    type Error = QuorumError;

    fn try_from(raw: RawQuorumPolicy) -> Result<Self, Self::Error> {
        Self::new(raw.required_signatures, raw.pubkeys)
    }
}

impl From<QuorumPolicy> for RawQuorumPolicy {
    fn from(policy: QuorumPolicy) -> Self {
        Self {
            required_signatures: policy.required_signatures,
            pubkeys: policy.pubkeys,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use bitcoin::secp256k1::{Secp256k1, SecretKey};

    use super::*;

    pub(crate) fn test_keys() -> [PublicKey; 3] {
        let secp = Secp256k1::signing_only();
        [1u8, 2, 3].map(|b| {
            let sk = SecretKey::from_slice(&[b; 32]).expect("valid secret key");
            PublicKey::from_secret_key(&secp, &sk)
        })
    }

    #[test]
    fn two_of_three_script_type() {
        let policy = QuorumPolicy::two_of_three(test_keys()).expect("valid policy");

        assert_eq!(policy.required_signatures(), 2);
        assert_eq!(policy.total_signers(), 3);
        assert_eq!(policy.script_type(), "multisig-2-of-3");
        assert!(policy.contains(&test_keys()[2]));
    }

    #[test]
    fn rejects_unsatisfiable_policies() {
        let keys = test_keys();

        assert_eq!(
            QuorumPolicy::new(0, keys.to_vec()),
            Err(QuorumError::ZeroThreshold)
        );
        assert_eq!(
            QuorumPolicy::new(4, keys.to_vec()),
            Err(QuorumError::ThresholdTooHigh {
                required: 4,
                total: 3
            })
        );
        assert_eq!(
            QuorumPolicy::new(2, vec![keys[0], keys[1], keys[0]]),
            Err(QuorumError::DuplicateKey(2))
        );
    }

    #[test]
    fn decodes_from_hex_keys_and_preserves_order() {
        let keys = test_keys();
        let json = format!(
            r#"{{ "required_signatures": 2, "pubkeys": ["{}", "{}", "{}"] }}"#,
            keys[2], keys[0], keys[1]
        );

        let policy: QuorumPolicy = serde_json::from_str(&json).expect("must decode");
        assert_eq!(policy.pubkeys(), &[keys[2], keys[0], keys[1]]);

        let duplicated = format!(
            r#"{{ "required_signatures": 2, "pubkeys": ["{}", "{}"] }}"#,
            keys[0], keys[0]
        );
        assert!(serde_json::from_str::<QuorumPolicy>(&duplicated).is_err());
    }
}

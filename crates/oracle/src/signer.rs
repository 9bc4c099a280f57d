//! This node's share of the payout quorum.

use std::{fmt, str::FromStr};

use linkedbtc_primitives::{quorum::QuorumPolicy, skeleton::TransactionSkeleton};
use secp256k1::{Message, PublicKey, SecretKey, SECP256K1};
use tracing::debug;

use crate::errors::SigningError;

/// The secp256k1 key this node signs payouts with.
///
/// The secret never leaves this struct; [`fmt::Debug`] only shows the public key.
pub struct SignerKey {
    secret: SecretKey,
    pubkey: PublicKey,
}

impl fmt::Debug for SignerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignerKey")
            .field("pubkey", &self.pubkey)
            .finish_non_exhaustive()
    }
}

impl From<SecretKey> for SignerKey {
    fn from(secret: SecretKey) -> Self {
        Self {
            pubkey: secret.public_key(SECP256K1),
            secret,
        }
    }
}

impl FromStr for SignerKey {
    type Err = SigningError;

    /// Parses a hex-encoded 32-byte secret key.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SecretKey::from_str(s.trim())
            .map(Self::from)
            .map_err(|e| SigningError::InvalidKey(e.to_string()))
    }
}

impl SignerKey {
    /// The public key matching this signer's secret.
    pub const fn public_key(&self) -> PublicKey {
        self.pubkey
    }

    /// Fails unless this signer is one of the quorum's keys.
    pub fn ensure_in_quorum(&self, policy: &QuorumPolicy) -> Result<(), SigningError> {
        if policy.contains(&self.pubkey) {
            Ok(())
        } else {
            Err(SigningError::KeyNotInQuorum(self.pubkey.to_string()))
        }
    }

    /// Attaches this node's partial signature to `skeleton`.
    ///
    /// Every digest in `tosign` gets a DER-encoded ECDSA signature appended to `signatures` and
    /// this node's public key appended to `pubkeys`, keeping the two lists positionally paired.
    /// All digests are checked before anything is attached, so on error the skeleton is left
    /// untouched. Returns the number of signatures attached.
    pub fn sign_skeleton(
        &self,
        skeleton: &mut TransactionSkeleton,
        policy: &QuorumPolicy,
    ) -> Result<usize, SigningError> {
        self.ensure_in_quorum(policy)?;

        if skeleton.tosign.is_empty() {
            return Err(SigningError::EmptySkeleton);
        }

        let messages = skeleton
            .tosign
            .iter()
            .enumerate()
            .map(|(index, digest)| parse_digest(index, digest))
            .collect::<Result<Vec<_>, _>>()?;

        let pubkey = self.pubkey.to_string();
        for msg in &messages {
            // Signatures from libsecp256k1 are already low-S normalized.
            let sig = SECP256K1.sign_ecdsa(msg, &self.secret);
            skeleton.signatures.push(hex::encode(&sig.serialize_der()[..]));
            skeleton.pubkeys.push(pubkey.clone());
        }
        debug!(count = messages.len(), %pubkey, "attached partial signatures");

        Ok(messages.len())
    }
}

fn parse_digest(index: usize, digest: &str) -> Result<Message, SigningError> {
    let bytes = hex::decode(digest).map_err(|e| SigningError::MalformedDigest {
        index,
        reason: e.to_string(),
    })?;
    let digest: [u8; 32] = bytes
        .try_into()
        .map_err(|b: Vec<u8>| SigningError::MalformedDigest {
            index,
            reason: format!("expected 32 bytes, got {}", b.len()),
        })?;

    Ok(Message::from_digest(digest))
}

use linkedbtc_primitives::quorum::QuorumPolicy;
use serde::{Deserialize, Serialize};

/// The consensus-critical parameters that dictate the behavior of the adapter node.
///
/// All three signer nodes must run with identical params; a different key order derives a
/// different locker and the partial signatures never add up to a quorum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Params {
    /// The quorum guarding the payout locker.
    pub quorum: QuorumPolicy,
}

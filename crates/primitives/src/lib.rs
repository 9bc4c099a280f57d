//! This crate contains the types and pure functions shared by the ledger client, the oracle core
//! and the RPC surface of the LinkedBTC adapter.
//!
//! It lies at the bottom of the crate-hierarchy in this workspace i.e., it does not depend on any
//! other crate in this workspace.

pub mod commitment;
pub mod constants;
pub mod deposit;
pub mod errors;
pub mod ledger;
pub mod quorum;
pub mod skeleton;

//! # Chaincode Vocabulary
//!
//! Request and ledger-metadata types for chaincode-scoped queries.
//!
//! `ChaincodeMetadata` is what the ledger records for a committed
//! chaincode; `ChaincodeInterest` is what a client sends when asking
//! which peers can endorse for it.

use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════
// LEDGER METADATA
// ════════════════════════════════════════════════════════════════════════════

/// Ledger-recorded metadata for one committed chaincode.
///
/// A peer only counts as an endorsement candidate for this chaincode if
/// it advertises an installed chaincode matching both `name` and
/// `version` exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaincodeMetadata {
    /// Chaincode name as committed to the channel.
    pub name: String,
    /// Chaincode version as committed to the channel.
    pub version: String,
}

impl ChaincodeMetadata {
    /// Creates chaincode metadata.
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// CHAINCODE INTEREST
// ════════════════════════════════════════════════════════════════════════════

/// One chaincode named by an endorsement query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaincodeCall {
    /// Name of the chaincode the client intends to invoke.
    pub name: String,
}

impl ChaincodeCall {
    /// Creates a chaincode call entry.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A client's declaration of which chaincode(s) a transaction will touch.
///
/// The endorsement analyzer currently supports exactly one chaincode per
/// interest; longer chains are rejected at the analyzer boundary because
/// their combination semantics are not yet specified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaincodeInterest {
    /// The chaincodes the transaction will invoke.
    pub chaincodes: Vec<ChaincodeCall>,
}

impl ChaincodeInterest {
    /// Creates an interest for a single chaincode.
    #[must_use]
    pub fn single(name: impl Into<String>) -> Self {
        Self {
            chaincodes: vec![ChaincodeCall::new(name)],
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// UNIT TESTS
// ════════════════════════════════════════════════════════════════════════════

//! # Discovery Error Types
//!
//! The public error contract of the endorsement analyzer. Every failure
//! of [`peers_for_endorsement`](crate::analyzer::EndorsementAnalyzer::peers_for_endorsement)
//! maps to exactly one variant; no partial descriptor is ever produced
//! alongside an error.
//!
//! Principal-evaluation failures are deliberately NOT represented here:
//! an identity failing to satisfy a principal is a per-pair verdict
//! (logged at debug level), not an analyzer failure, because identity
//! gossip is routinely partial and transient.

use nexum_common::SupportError;
use thiserror::Error;

/// Failure modes of one endorsement analysis.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscoveryError {
    /// No chaincode metadata is committed for (channel, chaincode).
    #[error("no metadata found for chaincode {chaincode} in channel {channel}")]
    MetadataNotFound {
        /// The channel that was queried.
        channel: String,
        /// The chaincode that was queried.
        chaincode: String,
    },

    /// No endorsement policy could be retrieved for (channel, chaincode).
    #[error("no endorsement policy found for chaincode {chaincode} in channel {channel}")]
    PolicyNotFound {
        /// The channel that was queried.
        channel: String,
        /// The chaincode that was queried.
        chaincode: String,
    },

    /// After MSP pre-filtering and graph feasibility checks, no principal
    /// combination can be fulfilled by the current peers.
    #[error("cannot satisfy any principal combination")]
    CannotSatisfyAnyPrincipalCombination,

    /// The interest did not name exactly one chaincode. Multi-chaincode
    /// combination semantics are unspecified, so such requests are
    /// rejected instead of guessed at.
    #[error("endorsement interest must name exactly one chaincode, got {count}")]
    InvalidInterest {
        /// Number of chaincodes the interest named.
        count: usize,
    },

    /// A non-policy collaborator call failed; carries the originating
    /// cause.
    #[error("collaborator call failed: {0}")]
    Collaborator(#[from] SupportError),

    /// The caller cancelled the analysis; observed at a collaborator
    /// boundary.
    #[error("analysis cancelled by caller")]
    Cancelled,
}

// ════════════════════════════════════════════════════════════════════════════
// UNIT TESTS
// ════════════════════════════════════════════════════════════════════════════

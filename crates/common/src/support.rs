//! # Collaborator Contracts
//!
//! The trait seams through which the discovery layer consumes the rest
//! of the peer: gossip membership, identity knowledge, ledger metadata,
//! endorsement policies, and principal evaluation.
//!
//! ## Contract for implementors
//!
//! Implementations MUST be thread-safe (`Send + Sync`) and MUST return
//! point-in-time snapshots by value; callers never observe later
//! mutations. A transient backend failure is reported as
//! `Err(SupportError)`, never retried by the caller. Implementations
//! must not block indefinitely; the caller owns the timeout budget.
//!
//! ## Cancellation
//!
//! Long computations accept a [`CallContext`]. The context carries a
//! shared cancellation flag the caller may set from another thread;
//! cooperative consumers check it between collaborator calls.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::chaincode::ChaincodeMetadata;
use crate::identity::PeerIdentitySet;
use crate::membership::Members;
use crate::policy::{InquireablePolicy, Principal};

// ════════════════════════════════════════════════════════════════════════════
// CHANNEL ID
// ════════════════════════════════════════════════════════════════════════════

/// Name of a channel, the unit of membership and policy scoping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChannelId(String);

impl ChannelId {
    /// Creates a channel id.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the channel name.
    #[must_use]
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ChannelId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// CALL CONTEXT
// ════════════════════════════════════════════════════════════════════════════

/// Per-call context owned by the caller.
///
/// The context is cheap to clone; clones share the cancellation flag.
/// Setting the flag does not interrupt an in-flight collaborator call,
/// it only stops the computation at the next boundary.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    cancelled: Arc<AtomicBool>,
}

impl CallContext {
    /// Creates a context that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation of the call this context was passed to.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ERRORS
// ════════════════════════════════════════════════════════════════════════════

/// Failure of a collaborator call.
///
/// Value type: `Clone`, `PartialEq`, deterministic `Display` messages
/// suitable for logs and operator output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupportError {
    /// The named channel is unknown to this peer.
    ChannelNotFound(String),
    /// The backing subsystem is not available.
    Unavailable,
    /// Any other failure, with its originating description.
    Other(String),
}

impl fmt::Display for SupportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SupportError::ChannelNotFound(channel) => {
                write!(f, "channel {} not found", channel)
            }
            SupportError::Unavailable => write!(f, "support subsystem unavailable"),
            SupportError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for SupportError {}

/// Failure of a single principal evaluation.
///
/// Evaluation failures are expected in steady state because identity
/// gossip is partial and transient; consumers treat them as "does not
/// satisfy" rather than as call failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvaluationError {
    /// The identity bytes could not be deserialized.
    MalformedIdentity,
    /// The identity does not satisfy the principal.
    NotSatisfied(String),
    /// The principal payload could not be interpreted.
    MalformedPrincipal,
}

impl fmt::Display for EvaluationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvaluationError::MalformedIdentity => write!(f, "malformed identity"),
            EvaluationError::NotSatisfied(reason) => {
                write!(f, "principal not satisfied: {}", reason)
            }
            EvaluationError::MalformedPrincipal => write!(f, "malformed principal"),
        }
    }
}

impl std::error::Error for EvaluationError {}

// ════════════════════════════════════════════════════════════════════════════
// COLLABORATOR TRAITS
// ════════════════════════════════════════════════════════════════════════════

/// Gossip-layer view of network and channel membership.
pub trait GossipSupport: Send + Sync {
    /// Returns identity information for every peer currently known.
    fn identity_info(&self) -> Result<PeerIdentitySet, SupportError>;

    /// Returns the members considered alive that have also joined the
    /// given channel. Their envelopes are channel-state envelopes.
    fn peers_of_channel(&self, channel: &ChannelId) -> Result<Members, SupportError>;

    /// Returns the members considered alive. Their envelopes are
    /// alive-membership envelopes.
    fn peers(&self) -> Result<Members, SupportError>;
}

/// Ledger view of committed chaincode metadata.
pub trait MetadataSupport: Send + Sync {
    /// Returns the metadata of the chaincode as committed to the
    /// channel, or `None` if the channel or chaincode is unknown.
    fn metadata(
        &self,
        channel: &ChannelId,
        chaincode: &str,
    ) -> Result<Option<ChaincodeMetadata>, SupportError>;
}

/// Access to a chaincode's endorsement policy in inquireable form.
pub trait PolicySupport: Send + Sync {
    /// Returns the endorsement policy of the chaincode, or `None` if no
    /// policy can be retrieved.
    fn policy_by_chaincode(
        &self,
        channel: &ChannelId,
        chaincode: &str,
    ) -> Result<Option<Box<dyn InquireablePolicy>>, SupportError>;
}

/// Evaluation of identities against principals under channel MSP rules.
pub trait PrincipalEvaluator: Send + Sync {
    /// Returns `Ok(())` iff the identity satisfies the principal on the
    /// given channel. An `Err` is a per-pair verdict, not a call
    /// failure.
    fn satisfies_principal(
        &self,
        channel: &ChannelId,
        identity: &[u8],
        principal: &Principal,
    ) -> Result<(), EvaluationError>;

    /// Returns the MSP id the principal refers to, or the empty string
    /// when the principal is unknown or ineligible.
    fn msp_of_principal(&self, principal: &Principal) -> String;
}

// ════════════════════════════════════════════════════════════════════════════
// UNIT TESTS
// ════════════════════════════════════════════════════════════════════════════

//! # Mock Collaborators for Testing
//!
//! Fully in-memory implementations of the collaborator contracts in
//! [`crate::support`]. `MockSupport` performs no I/O and is
//! deterministic: the same injected state always produces the same
//! answers, which keeps analyzer tests reproducible.
//!
//! # Features
//!
//! - Injection helpers for every view (identities, channel peers, alive
//!   peers, metadata, policies)
//! - A per-pair satisfaction table driving `satisfies_principal`
//! - Injectable failure that makes every support call return an error
//!
//! # Example
//!
//! ```ignore
//! use nexum_common::MockSupport;
//!
//! let support = MockSupport::new();
//! support.set_alive_peers(peers);
//! support.allow(b"identity-bytes", &principal);
//! ```

use std::collections::HashMap;
use std::sync::RwLock;

use tracing::debug;

use crate::chaincode::ChaincodeMetadata;
use crate::identity::{PeerIdentityInfo, PeerIdentitySet};
use crate::membership::Members;
use crate::policy::{InquireablePolicy, Principal, PrincipalSets};
use crate::support::{
    ChannelId, EvaluationError, GossipSupport, MetadataSupport, PolicySupport,
    PrincipalEvaluator, SupportError,
};

// ════════════════════════════════════════════════════════════════════════════
// MOCK POLICY
// ════════════════════════════════════════════════════════════════════════════

/// An inquireable policy backed by a fixed list of principal sets.
#[derive(Debug, Clone)]
pub struct MockPolicy {
    sets: PrincipalSets,
}

impl MockPolicy {
    /// Creates a policy that is satisfied by exactly the given sets, in
    /// the given order.
    #[must_use]
    pub fn new(sets: PrincipalSets) -> Self {
        Self { sets }
    }
}

impl InquireablePolicy for MockPolicy {
    fn satisfied_by(&self) -> PrincipalSets {
        self.sets.clone()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// MOCK SUPPORT
// ════════════════════════════════════════════════════════════════════════════

/// In-memory implementation of all four collaborator contracts.
///
/// State is injected through the setter helpers and then served
/// verbatim. The satisfaction table is keyed by (identity bytes,
/// principal); pairs not present in the table do not satisfy.
#[derive(Debug, Default)]
pub struct MockSupport {
    identities: RwLock<Vec<PeerIdentityInfo>>,
    channel_peers: RwLock<HashMap<ChannelId, Members>>,
    alive_peers: RwLock<Members>,
    metadata: RwLock<HashMap<(ChannelId, String), ChaincodeMetadata>>,
    policies: RwLock<HashMap<(ChannelId, String), PrincipalSets>>,
    satisfaction: RwLock<HashMap<(Vec<u8>, Principal), bool>>,
    msp_ids: RwLock<HashMap<Principal, String>>,
    failure: RwLock<Option<SupportError>>,
}

impl MockSupport {
    /// Creates a mock with empty views and no injected failure.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ────────────────────────────────────────────────────────────────────
    // INJECTION HELPERS
    // ────────────────────────────────────────────────────────────────────

    /// Replaces the identity view.
    pub fn set_identities(&self, identities: Vec<PeerIdentityInfo>) {
        *self.identities.write().unwrap() = identities;
    }

    /// Replaces the channel membership view for one channel.
    pub fn set_channel_peers(&self, channel: ChannelId, members: Members) {
        self.channel_peers.write().unwrap().insert(channel, members);
    }

    /// Replaces the alive membership view.
    pub fn set_alive_peers(&self, members: Members) {
        *self.alive_peers.write().unwrap() = members;
    }

    /// Records chaincode metadata for (channel, name).
    pub fn set_metadata(&self, channel: ChannelId, metadata: ChaincodeMetadata) {
        self.metadata
            .write()
            .unwrap()
            .insert((channel, metadata.name.clone()), metadata);
    }

    /// Records the endorsement policy for (channel, chaincode).
    pub fn set_policy(&self, channel: ChannelId, chaincode: &str, sets: PrincipalSets) {
        self.policies
            .write()
            .unwrap()
            .insert((channel, chaincode.to_string()), sets);
    }

    /// Marks the (identity, principal) pair as satisfying.
    pub fn allow(&self, identity: &[u8], principal: &Principal) {
        self.satisfaction
            .write()
            .unwrap()
            .insert((identity.to_vec(), principal.clone()), true);
    }

    /// Records the MSP id a principal resolves to.
    pub fn set_msp_of_principal(&self, principal: &Principal, msp_id: &str) {
        self.msp_ids
            .write()
            .unwrap()
            .insert(principal.clone(), msp_id.to_string());
    }

    /// Makes every subsequent support call fail with `error`.
    pub fn inject_failure(&self, error: SupportError) {
        *self.failure.write().unwrap() = Some(error);
    }

    /// Clears a previously injected failure.
    pub fn clear_failure(&self) {
        *self.failure.write().unwrap() = None;
    }

    fn check_failure(&self) -> Result<(), SupportError> {
        match &*self.failure.read().unwrap() {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

impl GossipSupport for MockSupport {
    fn identity_info(&self) -> Result<PeerIdentitySet, SupportError> {
        self.check_failure()?;
        Ok(PeerIdentitySet::from(self.identities.read().unwrap().clone()))
    }

    fn peers_of_channel(&self, channel: &ChannelId) -> Result<Members, SupportError> {
        self.check_failure()?;
        Ok(self
            .channel_peers
            .read()
            .unwrap()
            .get(channel)
            .cloned()
            .unwrap_or_default())
    }

    fn peers(&self) -> Result<Members, SupportError> {
        self.check_failure()?;
        Ok(self.alive_peers.read().unwrap().clone())
    }
}

impl MetadataSupport for MockSupport {
    fn metadata(
        &self,
        channel: &ChannelId,
        chaincode: &str,
    ) -> Result<Option<ChaincodeMetadata>, SupportError> {
        self.check_failure()?;
        Ok(self
            .metadata
            .read()
            .unwrap()
            .get(&(channel.clone(), chaincode.to_string()))
            .cloned())
    }
}

impl PolicySupport for MockSupport {
    fn policy_by_chaincode(
        &self,
        channel: &ChannelId,
        chaincode: &str,
    ) -> Result<Option<Box<dyn InquireablePolicy>>, SupportError> {
        self.check_failure()?;
        Ok(self
            .policies
            .read()
            .unwrap()
            .get(&(channel.clone(), chaincode.to_string()))
            .map(|sets| Box::new(MockPolicy::new(sets.clone())) as Box<dyn InquireablePolicy>))
    }
}

impl PrincipalEvaluator for MockSupport {
    fn satisfies_principal(
        &self,
        _channel: &ChannelId,
        identity: &[u8],
        principal: &Principal,
    ) -> Result<(), EvaluationError> {
        let allowed = self
            .satisfaction
            .read()
            .unwrap()
            .get(&(identity.to_vec(), principal.clone()))
            .copied()
            .unwrap_or(false);
        if allowed {
            Ok(())
        } else {
            debug!(principal = ?principal.class, "mock: pair not in satisfaction table");
            Err(EvaluationError::NotSatisfied(
                "pair not in satisfaction table".to_string(),
            ))
        }
    }

    fn msp_of_principal(&self, principal: &Principal) -> String {
        self.msp_ids
            .read()
            .unwrap()
            .get(principal)
            .cloned()
            .unwrap_or_default()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// UNIT TESTS
// ════════════════════════════════════════════════════════════════════════════

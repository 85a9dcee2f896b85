//! # Peer Identity Types
//!
//! The peer's gossip-learned view of other peers' identities. Identity
//! material is carried as opaque bytes; validation and parsing belong to
//! the membership-service layer, not to this crate.
//!
//! ## Partiality
//!
//! Identity gossip is routinely partial: a peer can appear in a
//! membership snapshot before its identity has arrived. Consumers must
//! tolerate missing entries, which is why lookups return `Option`.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::membership::PkiId;

// ════════════════════════════════════════════════════════════════════════════
// PEER IDENTITY
// ════════════════════════════════════════════════════════════════════════════

/// Identity information for one peer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerIdentityInfo {
    /// The peer's PKI-ID.
    pub pki_id: PkiId,
    /// The raw identity blob (certificate bytes or equivalent), opaque
    /// to this crate.
    pub identity: Vec<u8>,
    /// The MSP (organization) the identity belongs to.
    pub organization: String,
}

impl PeerIdentityInfo {
    /// Creates an identity record.
    #[must_use]
    pub fn new(
        pki_id: PkiId,
        identity: impl Into<Vec<u8>>,
        organization: impl Into<String>,
    ) -> Self {
        Self {
            pki_id,
            identity: identity.into(),
            organization: organization.into(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// PEER IDENTITY SET
// ════════════════════════════════════════════════════════════════════════════

/// A snapshot of all identities the peer currently knows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerIdentitySet(Vec<PeerIdentityInfo>);

impl PeerIdentitySet {
    /// Creates an empty identity set.
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Number of identities in the set.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the set is empty.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the identities in snapshot order.
    pub fn iter(&self) -> std::slice::Iter<'_, PeerIdentityInfo> {
        self.0.iter()
    }

    /// Indexes the set by PKI-ID. Last entry wins on duplicates.
    #[must_use]
    pub fn by_id(&self) -> HashMap<PkiId, PeerIdentityInfo> {
        self.0
            .iter()
            .map(|info| (info.pki_id.clone(), info.clone()))
            .collect()
    }

    /// Collects the organizations of the given PKI-IDs.
    ///
    /// PKI-IDs with no known identity contribute nothing; the result is
    /// the set of organizations the identified subset spans.
    #[must_use]
    pub fn organizations_of(&self, ids: impl IntoIterator<Item = PkiId>) -> HashSet<String> {
        let index = self.by_id();
        ids.into_iter()
            .filter_map(|id| index.get(&id).map(|info| info.organization.clone()))
            .collect()
    }
}

impl From<Vec<PeerIdentityInfo>> for PeerIdentitySet {
    fn from(identities: Vec<PeerIdentityInfo>) -> Self {
        Self(identities)
    }
}

impl<'a> IntoIterator for &'a PeerIdentitySet {
    type Item = &'a PeerIdentityInfo;
    type IntoIter = std::slice::Iter<'a, PeerIdentityInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// UNIT TESTS
// ════════════════════════════════════════════════════════════════════════════

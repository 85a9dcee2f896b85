//! # Peer Membership Types
//!
//! Vocabulary types for the peer's gossip-derived view of the network:
//! who is alive, who has joined a channel, and what each peer advertises.
//!
//! ## Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | `PkiId` | Opaque peer identifier (PKI-ID), hex-rendered byte string |
//! | `InstalledChaincode` | One (name, version) entry a peer advertises |
//! | `MemberProperties` | Advertised properties carried in gossip state |
//! | `NetworkMember` | One peer as seen by gossip: PKI-ID, envelope, properties |
//! | `Members` | A membership snapshot with filter / intersect / index support |
//!
//! ## Snapshots
//!
//! A `Members` value is a point-in-time snapshot handed to a single
//! analysis. The same `NetworkMember` type serves both the channel view
//! (where `envelope` is the signed channel-state envelope) and the alive
//! view (where `envelope` is the signed alive-membership envelope); which
//! one a member carries depends on the snapshot it came from.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════
// PKI-ID
// ════════════════════════════════════════════════════════════════════════════

/// Opaque peer identifier as distributed through gossip.
///
/// A `PkiId` is an arbitrary-length byte string. It is unique per peer
/// within one analysis and is used as the indexing key for membership
/// and identity lookups.
///
/// ## Rendering
///
/// `Display` renders the bytes as lowercase hex, which is also the form
/// used in log output.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PkiId(Vec<u8>);

impl PkiId {
    /// Creates a `PkiId` from raw bytes.
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Returns the raw identifier bytes.
    #[must_use]
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns `true` if the identifier is empty.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PkiId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0))
    }
}

impl fmt::Debug for PkiId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PkiId({})", hex::encode(&self.0))
    }
}

impl From<&[u8]> for PkiId {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<Vec<u8>> for PkiId {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ADVERTISED PROPERTIES
// ════════════════════════════════════════════════════════════════════════════

/// One chaincode a peer advertises as installed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledChaincode {
    /// Chaincode name.
    pub name: String,
    /// Chaincode version. Both name and version must match the ledger
    /// metadata for the peer to count as an endorsement candidate.
    pub version: String,
}

impl InstalledChaincode {
    /// Creates an installed-chaincode entry.
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// Properties a peer attaches to its gossip state.
///
/// Absent properties mean the peer has advertised nothing; such a peer is
/// never considered to have any chaincode installed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberProperties {
    /// Chaincodes the peer advertises as installed.
    pub chaincodes: Vec<InstalledChaincode>,
}

// ════════════════════════════════════════════════════════════════════════════
// NETWORK MEMBER
// ════════════════════════════════════════════════════════════════════════════

/// One peer as seen through a gossip membership snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkMember {
    /// The peer's PKI-ID.
    pub pki_id: PkiId,
    /// The signed gossip envelope for this member in the snapshot it came
    /// from (channel-state or alive-membership).
    pub envelope: Vec<u8>,
    /// Advertised properties, absent if the peer published none.
    pub properties: Option<MemberProperties>,
}

impl NetworkMember {
    /// Creates a member with no advertised properties.
    #[must_use]
    pub fn new(pki_id: PkiId, envelope: Vec<u8>) -> Self {
        Self {
            pki_id,
            envelope,
            properties: None,
        }
    }

    /// Attaches advertised properties to this member.
    #[must_use]
    pub fn with_properties(mut self, properties: MemberProperties) -> Self {
        self.properties = Some(properties);
        self
    }

    /// Returns `true` if the member advertises the given chaincode at
    /// exactly the given version.
    ///
    /// Members without properties advertise nothing and always return
    /// `false`.
    #[must_use]
    pub fn has_chaincode(&self, name: &str, version: &str) -> bool {
        match &self.properties {
            None => false,
            Some(props) => props
                .chaincodes
                .iter()
                .any(|cc| cc.name == name && cc.version == version),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// MEMBERS
// ════════════════════════════════════════════════════════════════════════════

/// A membership snapshot: an ordered collection of `NetworkMember`s.
///
/// Order is the order the gossip layer returned and is preserved by
/// `filter` and `intersect`, which keeps downstream processing
/// deterministic for a fixed input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Members(Vec<NetworkMember>);

impl Members {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Number of members in the snapshot.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the snapshot is empty.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the members in snapshot order.
    pub fn iter(&self) -> std::slice::Iter<'_, NetworkMember> {
        self.0.iter()
    }

    /// Returns the members that satisfy `pred`, preserving order.
    #[must_use]
    pub fn filter(&self, pred: impl Fn(&NetworkMember) -> bool) -> Members {
        Members(self.0.iter().filter(|m| pred(m)).cloned().collect())
    }

    /// Intersects two snapshots by PKI-ID.
    ///
    /// The result contains this snapshot's entries (envelope and
    /// properties included) for every PKI-ID also present in `other`.
    /// Keeping the receiver's entries matters: intersecting the alive
    /// view with the channel view must yield alive-membership envelopes,
    /// not channel-state ones.
    #[must_use]
    pub fn intersect(&self, other: &Members) -> Members {
        let other_ids: std::collections::HashSet<&PkiId> =
            other.0.iter().map(|m| &m.pki_id).collect();
        Members(
            self.0
                .iter()
                .filter(|m| other_ids.contains(&m.pki_id))
                .cloned()
                .collect(),
        )
    }

    /// Indexes the snapshot by PKI-ID.
    ///
    /// If the snapshot contains duplicate PKI-IDs the last entry wins;
    /// well-formed snapshots never do.
    #[must_use]
    pub fn by_id(&self) -> HashMap<PkiId, NetworkMember> {
        self.0
            .iter()
            .map(|m| (m.pki_id.clone(), m.clone()))
            .collect()
    }
}

impl From<Vec<NetworkMember>> for Members {
    fn from(members: Vec<NetworkMember>) -> Self {
        Self(members)
    }
}

impl IntoIterator for Members {
    type Item = NetworkMember;
    type IntoIter = std::vec::IntoIter<NetworkMember>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Members {
    type Item = &'a NetworkMember;
    type IntoIter = std::slice::Iter<'a, NetworkMember>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// UNIT TESTS
// ════════════════════════════════════════════════════════════════════════════

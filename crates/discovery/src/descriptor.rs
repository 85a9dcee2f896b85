//! # Endorsement Descriptor Wire Types
//!
//! The structures returned to the client: feasible layouts plus, for
//! every group referenced by any layout, the peers that can endorse
//! under that group's principal. Exact byte layout is the service
//! boundary's concern; serde derives carry the structural content.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::layout::Layout;

// ════════════════════════════════════════════════════════════════════════════
// PEERS
// ════════════════════════════════════════════════════════════════════════════

/// One endorsement candidate, with everything a client needs to contact
/// and verify it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndorsementPeer {
    /// The peer's raw identity blob. Empty when the identity has not
    /// arrived through gossip yet; descriptors are still produced in
    /// that case so clients can observe the gap.
    pub identity: Vec<u8>,
    /// The peer's signed channel-state envelope.
    pub state_info: Vec<u8>,
    /// The peer's signed alive-membership envelope.
    pub membership_info: Vec<u8>,
}

/// The endorsement candidates of one group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerGroup {
    /// The peers satisfying the group's principal.
    pub peers: Vec<EndorsementPeer>,
}

// ════════════════════════════════════════════════════════════════════════════
// DESCRIPTOR
// ════════════════════════════════════════════════════════════════════════════

/// The result of one endorsement analysis.
///
/// Invariant: every key of `endorsers_by_group` appears in at least one
/// layout's `quantities_by_group`, and every group referenced by a
/// layout appears as a key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndorsementDescriptor {
    /// The chaincode the descriptor answers for.
    pub chaincode: String,
    /// The feasible layouts, in policy enumeration order.
    pub layouts: Vec<Layout>,
    /// Endorsement candidates per referenced group, keyed by alias.
    pub endorsers_by_group: BTreeMap<String, PeerGroup>,
}

// ════════════════════════════════════════════════════════════════════════════
// UNIT TESTS
// ════════════════════════════════════════════════════════════════════════════

//! # Satisfaction Graph
//!
//! The bipartite graph connecting candidate peers to the principals
//! they satisfy. Peer vertices and principal vertices live in two typed
//! arrays; an edge is a flat `(peer_index, principal_index)` pair. The
//! neighbor view needed for grouping is derived from the edge list on
//! demand, so the structure stays index-based end to end.
//!
//! ## Construction
//!
//! Every (peer, principal) pair is evaluated exactly once, in vertex
//! order, with no short-circuiting: a peer satisfying one principal is
//! still evaluated against all others, because layouts may draw the
//! same peer into several groups.

use nexum_common::{Members, NetworkMember, Principal};
use std::collections::HashMap;

use crate::group_mapper::PrincipalGroupMapper;

// ════════════════════════════════════════════════════════════════════════════
// VERTICES
// ════════════════════════════════════════════════════════════════════════════

/// One principal vertex: the group alias and the principal it stands
/// for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalVertex {
    /// Opaque group alias (`G<n>`).
    pub alias: String,
    /// The interned principal.
    pub principal: Principal,
}

// ════════════════════════════════════════════════════════════════════════════
// SATISFACTION GRAPH
// ════════════════════════════════════════════════════════════════════════════

/// Bipartite peer-to-principal satisfaction graph for one analysis.
#[derive(Debug, Clone, Default)]
pub struct SatisfactionGraph {
    peers: Vec<NetworkMember>,
    principals: Vec<PrincipalVertex>,
    alias_index: HashMap<String, usize>,
    edges: Vec<(usize, usize)>,
}

impl SatisfactionGraph {
    /// Builds the graph over `members` and the principals interned in
    /// `groups`.
    ///
    /// `satisfies` is the peer-against-principal predicate; evaluation
    /// errors must already be folded into a `false` verdict by the
    /// caller. The predicate is invoked for every pair, principals in
    /// alias order and peers in snapshot order, which fixes edge order
    /// for a fixed input.
    #[must_use]
    pub fn build(
        members: &Members,
        groups: &PrincipalGroupMapper,
        satisfies: impl Fn(&NetworkMember, &Principal) -> bool,
    ) -> Self {
        let peers: Vec<NetworkMember> = members.iter().cloned().collect();

        let mut principals = Vec::with_capacity(groups.len());
        let mut alias_index = HashMap::with_capacity(groups.len());
        for (alias, principal) in groups.entries() {
            alias_index.insert(alias.clone(), principals.len());
            principals.push(PrincipalVertex {
                alias,
                principal: principal.clone(),
            });
        }

        let mut edges = Vec::new();
        for (principal_idx, vertex) in principals.iter().enumerate() {
            for (peer_idx, peer) in peers.iter().enumerate() {
                if satisfies(peer, &vertex.principal) {
                    edges.push((peer_idx, principal_idx));
                }
            }
        }

        Self {
            peers,
            principals,
            alias_index,
            edges,
        }
    }

    /// Number of peer vertices.
    #[must_use]
    #[inline]
    pub fn peer_count(&self) -> usize {
        self.peers.len()
    }

    /// The principal vertices in alias order.
    #[must_use]
    #[inline]
    pub fn principal_vertices(&self) -> &[PrincipalVertex] {
        &self.principals
    }

    /// Number of edges.
    #[must_use]
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of peers connected to the principal vertex of `alias`.
    ///
    /// An alias the graph does not know has zero neighbors.
    #[must_use]
    pub fn neighbor_count(&self, alias: &str) -> usize {
        match self.alias_index.get(alias) {
            None => 0,
            Some(&idx) => self
                .edges
                .iter()
                .filter(|(_, principal_idx)| *principal_idx == idx)
                .count(),
        }
    }

    /// The peers connected to the principal vertex of `alias`, in peer
    /// vertex order.
    #[must_use]
    pub fn peer_neighbors(&self, alias: &str) -> Vec<&NetworkMember> {
        match self.alias_index.get(alias) {
            None => Vec::new(),
            Some(&idx) => self
                .edges
                .iter()
                .filter(|(_, principal_idx)| *principal_idx == idx)
                .map(|(peer_idx, _)| &self.peers[*peer_idx])
                .collect(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// UNIT TESTS
// ════════════════════════════════════════════════════════════════════════════

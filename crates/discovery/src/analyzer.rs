//! # Endorsement Analyzer
//!
//! Orchestrator of one endorsement analysis. Given a channel and a
//! chaincode interest, the analyzer consults its collaborators and runs
//! a single one-pass pipeline:
//!
//! 1. Validate the interest (exactly one chaincode).
//! 2. Fetch the chaincode's ledger metadata.
//! 3. Filter channel membership to peers advertising that exact
//!    (name, version), then intersect with the alive view.
//! 4. Index member identities by PKI-ID.
//! 5. Fetch the endorsement policy and enumerate its satisfying
//!    principal combinations.
//! 6. Drop combinations referencing MSPs with no alive channel peer.
//! 7. Intern principals as group aliases, build the satisfaction graph,
//!    and keep the feasible layouts.
//! 8. Group the endorsement candidates per referenced alias.
//!
//! ## Properties
//!
//! - **Stateless**: nothing survives a call; collaborator snapshots are
//!   taken fresh every time and never cached.
//! - **Deterministic**: for fixed collaborator outputs the descriptor
//!   is identical call to call, group aliases included.
//! - **Cooperative cancellation**: the caller's [`CallContext`] is
//!   checked before every collaborator call; a cancelled analysis
//!   returns [`DiscoveryError::Cancelled`] and no descriptor.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use nexum_common::{
    CallContext, ChaincodeInterest, ChannelId, GossipSupport, MetadataSupport, NetworkMember,
    PeerIdentitySet, PkiId, PolicySupport, Principal, PrincipalEvaluator,
};

use crate::descriptor::{EndorsementDescriptor, EndorsementPeer, PeerGroup};
use crate::error::DiscoveryError;
use crate::graph::SatisfactionGraph;
use crate::group_mapper::PrincipalGroupMapper;
use crate::layout::{compute_layouts, Layouts};

// ════════════════════════════════════════════════════════════════════════════
// MEMBER IDENTITY INDEX
// ════════════════════════════════════════════════════════════════════════════

/// Identity bytes per member PKI-ID, restricted to the members of one
/// analysis.
///
/// Identity gossip is partial: a member can be alive before its
/// identity arrives. Lookups for such members return empty bytes so the
/// descriptor can still be produced, which is deliberate; clients can
/// observe the gap instead of the whole analysis failing.
#[derive(Debug, Clone, Default)]
pub struct MemberIdentityIndex {
    identities: HashMap<PkiId, Vec<u8>>,
}

impl MemberIdentityIndex {
    /// Builds the index from the full identity set, keeping only
    /// entries for the given members.
    #[must_use]
    pub fn compute(
        identity_set: &PeerIdentitySet,
        members_by_id: &HashMap<PkiId, NetworkMember>,
    ) -> Self {
        let all = identity_set.by_id();
        let mut identities = HashMap::with_capacity(members_by_id.len());
        for pki_id in members_by_id.keys() {
            if let Some(info) = all.get(pki_id) {
                identities.insert(pki_id.clone(), info.identity.clone());
            }
        }
        Self { identities }
    }

    /// The identity bytes of `pki_id`, or empty bytes when unknown.
    #[must_use]
    pub fn identity_of(&self, pki_id: &PkiId) -> Vec<u8> {
        self.identities.get(pki_id).cloned().unwrap_or_default()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ENDORSEMENT ANALYZER
// ════════════════════════════════════════════════════════════════════════════

/// Computes endorsement descriptors from the peer's current views.
///
/// Collaborators are held behind `Arc<dyn Trait>`; the analyzer itself
/// carries no other state, so concurrent analyses need no
/// synchronization.
pub struct EndorsementAnalyzer {
    gossip: Arc<dyn GossipSupport>,
    policies: Arc<dyn PolicySupport>,
    evaluator: Arc<dyn PrincipalEvaluator>,
    metadata: Arc<dyn MetadataSupport>,
}

impl EndorsementAnalyzer {
    /// Creates an analyzer over the given collaborators.
    #[must_use]
    pub fn new(
        gossip: Arc<dyn GossipSupport>,
        policies: Arc<dyn PolicySupport>,
        evaluator: Arc<dyn PrincipalEvaluator>,
        metadata: Arc<dyn MetadataSupport>,
    ) -> Self {
        Self {
            gossip,
            policies,
            evaluator,
            metadata,
        }
    }

    /// Computes the endorsement descriptor for `interest` on `channel`.
    ///
    /// # Errors
    ///
    /// - [`DiscoveryError::InvalidInterest`] unless the interest names
    ///   exactly one chaincode.
    /// - [`DiscoveryError::MetadataNotFound`] /
    ///   [`DiscoveryError::PolicyNotFound`] when the ledger or policy
    ///   view has no entry for the chaincode.
    /// - [`DiscoveryError::CannotSatisfyAnyPrincipalCombination`] when
    ///   filtering and graph checks leave no feasible layout.
    /// - [`DiscoveryError::Collaborator`] when a support call fails.
    /// - [`DiscoveryError::Cancelled`] when the context is cancelled at
    ///   a collaborator boundary.
    pub fn peers_for_endorsement(
        &self,
        ctx: &CallContext,
        channel: &ChannelId,
        interest: &ChaincodeInterest,
    ) -> Result<EndorsementDescriptor, DiscoveryError> {
        if interest.chaincodes.len() != 1 {
            return Err(DiscoveryError::InvalidInterest {
                count: interest.chaincodes.len(),
            });
        }
        let chaincode = &interest.chaincodes[0].name;

        ensure_live(ctx)?;
        let cc_metadata = self
            .metadata
            .metadata(channel, chaincode)?
            .ok_or_else(|| DiscoveryError::MetadataNotFound {
                channel: channel.as_str().to_string(),
                chaincode: chaincode.clone(),
            })?;

        // Keep only channel peers that advertise the committed
        // (name, version); their envelopes are channel-state envelopes.
        ensure_live(ctx)?;
        let chan_membership = self
            .gossip
            .peers_of_channel(channel)?
            .filter(|member| member.has_chaincode(&cc_metadata.name, &cc_metadata.version));
        let channel_members_by_id = chan_membership.by_id();

        // Of those, keep the ones currently alive; their envelopes are
        // alive-membership envelopes.
        ensure_live(ctx)?;
        let alive_membership = self.gossip.peers()?.intersect(&chan_membership);
        let members_by_id = alive_membership.by_id();

        ensure_live(ctx)?;
        let identities = self.gossip.identity_info()?;
        let identities_of_members = MemberIdentityIndex::compute(&identities, &members_by_id);

        ensure_live(ctx)?;
        let policy = match self.policies.policy_by_chaincode(channel, chaincode)? {
            Some(policy) => policy,
            None => {
                debug!(%channel, %chaincode, "no endorsement policy retrievable");
                return Err(DiscoveryError::PolicyNotFound {
                    channel: channel.as_str().to_string(),
                    chaincode: chaincode.clone(),
                });
            }
        };
        let principals_sets = policy.satisfied_by();

        // Drop combinations naming an MSP with no alive channel peer;
        // such a combination can never be fulfilled here.
        let msp_ids_of_channel_peers =
            identities.organizations_of(members_by_id.keys().cloned());
        let principals_sets = principals_sets.containing_only(|principal| {
            let msp_id = self.evaluator.msp_of_principal(principal);
            !msp_id.is_empty() && msp_ids_of_channel_peers.contains(&msp_id)
        });

        let mut principal_groups = PrincipalGroupMapper::from_principal_sets(&principals_sets);

        let sat_graph = SatisfactionGraph::build(
            &alive_membership,
            &principal_groups,
            self.satisfies_principal(channel, &identities_of_members),
        );

        let layouts = compute_layouts(&principals_sets, &mut principal_groups, &sat_graph);
        if layouts.is_empty() {
            return Err(DiscoveryError::CannotSatisfyAnyPrincipalCombination);
        }

        let endorsers_by_group = endorsers_by_group(
            &sat_graph,
            &layouts,
            &channel_members_by_id,
            &identities_of_members,
        );

        Ok(EndorsementDescriptor {
            chaincode: cc_metadata.name,
            layouts: layouts.into_vec(),
            endorsers_by_group,
        })
    }

    /// Returns the peer-against-principal predicate used while building
    /// the satisfaction graph. An evaluation error is a negative
    /// verdict, logged at debug level, never a call failure.
    fn satisfies_principal<'a>(
        &'a self,
        channel: &'a ChannelId,
        identities_of_members: &'a MemberIdentityIndex,
    ) -> impl Fn(&NetworkMember, &Principal) -> bool + 'a {
        move |member, principal| {
            let identity = identities_of_members.identity_of(&member.pki_id);
            match self
                .evaluator
                .satisfies_principal(channel, &identity, principal)
            {
                Ok(()) => {
                    debug!(peer = %member.pki_id, ?principal, "peer satisfies principal");
                    true
                }
                Err(err) => {
                    debug!(peer = %member.pki_id, ?principal, %err, "peer does not satisfy principal");
                    false
                }
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ENDORSER GROUPING
// ════════════════════════════════════════════════════════════════════════════

/// Computes the per-group endorsement candidates.
///
/// Only groups referenced by at least one feasible layout are emitted;
/// a group absent from the result means no surviving principal
/// combination includes its principal. Each candidate record carries
/// the identity bytes (empty when unknown), the channel-state envelope
/// (from the channel snapshot), and the alive-membership envelope (from
/// the graph's peer vertex).
fn endorsers_by_group(
    sat_graph: &SatisfactionGraph,
    layouts: &Layouts,
    channel_members_by_id: &HashMap<PkiId, NetworkMember>,
    identities_of_members: &MemberIdentityIndex,
) -> std::collections::BTreeMap<String, PeerGroup> {
    let included_groups = layouts.groups_set();

    let mut result = std::collections::BTreeMap::new();
    for vertex in sat_graph.principal_vertices() {
        if !included_groups.contains(&vertex.alias) {
            continue;
        }
        let peers = sat_graph
            .peer_neighbors(&vertex.alias)
            .into_iter()
            .map(|member| EndorsementPeer {
                identity: identities_of_members.identity_of(&member.pki_id),
                state_info: channel_members_by_id
                    .get(&member.pki_id)
                    .map(|m| m.envelope.clone())
                    .unwrap_or_default(),
                membership_info: member.envelope.clone(),
            })
            .collect();
        result.insert(vertex.alias.clone(), PeerGroup { peers });
    }
    result
}

/// Errors out with [`DiscoveryError::Cancelled`] once the caller has
/// cancelled the context. Called before every collaborator boundary.
fn ensure_live(ctx: &CallContext) -> Result<(), DiscoveryError> {
    if ctx.is_cancelled() {
        return Err(DiscoveryError::Cancelled);
    }
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// UNIT TESTS
// ════════════════════════════════════════════════════════════════════════════

//! # Endorsement Analysis Integration Tests
//!
//! End-to-end scenarios driven through the mock collaborators: org-based
//! threshold policies, membership and version filtering, MSP
//! pre-filtering, error propagation, cancellation, and the structural
//! invariants of the returned descriptor.

use std::sync::Arc;

use nexum_common::{
    CallContext, ChaincodeInterest, ChaincodeMetadata, ChannelId, InstalledChaincode,
    MemberProperties, Members, MockSupport, NetworkMember, PeerIdentityInfo, PkiId, Principal,
    PrincipalSet, PrincipalSets, SupportError,
};
use nexum_discovery::{DiscoveryError, EndorsementAnalyzer, EndorsementDescriptor};

// ════════════════════════════════════════════════════════════════════════════
// HELPERS
// ════════════════════════════════════════════════════════════════════════════

const CHANNEL: &str = "trade";
const CHAINCODE: &str = "asset";
const VERSION: &str = "1.0";

fn pki(id: u8) -> PkiId {
    PkiId::new([id; 8])
}

fn identity_bytes(id: u8) -> Vec<u8> {
    format!("id-{}", id).into_bytes()
}

fn principal(org: &str) -> Principal {
    Principal::role(org.as_bytes())
}

fn sets(groups: &[&[&str]]) -> PrincipalSets {
    PrincipalSets::new(
        groups
            .iter()
            .map(|set| PrincipalSet::new(set.iter().map(|org| principal(org)).collect()))
            .collect(),
    )
}

/// Test network builder around one `MockSupport` instance.
struct Harness {
    support: Arc<MockSupport>,
    channel: ChannelId,
    channel_peers: Vec<NetworkMember>,
    alive_peers: Vec<NetworkMember>,
    identities: Vec<PeerIdentityInfo>,
}

impl Harness {
    fn new() -> Self {
        Self {
            support: Arc::new(MockSupport::new()),
            channel: ChannelId::new(CHANNEL),
            channel_peers: Vec::new(),
            alive_peers: Vec::new(),
            identities: Vec::new(),
        }
    }

    /// Adds a peer that has joined the channel, is alive, advertises
    /// the chaincode at `version`, and belongs to `org`.
    fn peer(&mut self, id: u8, org: &str, version: &str) -> &mut Self {
        self.channel_peers.push(
            NetworkMember::new(pki(id), format!("state-{}", id).into_bytes()).with_properties(
                MemberProperties {
                    chaincodes: vec![InstalledChaincode::new(CHAINCODE, version)],
                },
            ),
        );
        self.alive_peers
            .push(NetworkMember::new(pki(id), format!("alive-{}", id).into_bytes()));
        self.identities
            .push(PeerIdentityInfo::new(pki(id), identity_bytes(id), org));
        self
    }

    /// Adds a channel-joined peer that is not alive.
    fn channel_only_peer(&mut self, id: u8, org: &str) -> &mut Self {
        self.channel_peers.push(
            NetworkMember::new(pki(id), format!("state-{}", id).into_bytes()).with_properties(
                MemberProperties {
                    chaincodes: vec![InstalledChaincode::new(CHAINCODE, VERSION)],
                },
            ),
        );
        self.identities
            .push(PeerIdentityInfo::new(pki(id), identity_bytes(id), org));
        self
    }

    /// Adds an alive peer that has not joined the channel.
    fn alive_only_peer(&mut self, id: u8, org: &str) -> &mut Self {
        self.alive_peers
            .push(NetworkMember::new(pki(id), format!("alive-{}", id).into_bytes()));
        self.identities
            .push(PeerIdentityInfo::new(pki(id), identity_bytes(id), org));
        self
    }

    /// Marks peer `id` as satisfying `principal`.
    fn allow(&self, id: u8, p: &Principal) -> &Self {
        self.support.allow(&identity_bytes(id), p);
        self
    }

    /// Registers the MSP id a principal resolves to.
    fn msp(&self, p: &Principal, org: &str) -> &Self {
        self.support.set_msp_of_principal(p, org);
        self
    }

    /// Installs metadata and policy, pushes the accumulated views into
    /// the mock, and builds the analyzer.
    fn build(&self, policy_sets: PrincipalSets) -> EndorsementAnalyzer {
        self.support.set_metadata(
            self.channel.clone(),
            ChaincodeMetadata::new(CHAINCODE, VERSION),
        );
        self.support
            .set_policy(self.channel.clone(), CHAINCODE, policy_sets);
        self.build_without_policy()
    }

    /// Same as `build` but leaves metadata/policy to the caller.
    fn build_without_policy(&self) -> EndorsementAnalyzer {
        self.support.set_channel_peers(
            self.channel.clone(),
            Members::from(self.channel_peers.clone()),
        );
        self.support
            .set_alive_peers(Members::from(self.alive_peers.clone()));
        self.support.set_identities(self.identities.clone());
        EndorsementAnalyzer::new(
            self.support.clone(),
            self.support.clone(),
            self.support.clone(),
            self.support.clone(),
        )
    }

    fn run(&self, analyzer: &EndorsementAnalyzer) -> Result<EndorsementDescriptor, DiscoveryError> {
        analyzer.peers_for_endorsement(
            &CallContext::new(),
            &self.channel,
            &ChaincodeInterest::single(CHAINCODE),
        )
    }
}

/// Collects the identity blobs of one group's peers.
fn group_identities(descriptor: &EndorsementDescriptor, alias: &str) -> Vec<Vec<u8>> {
    descriptor.endorsers_by_group[alias]
        .peers
        .iter()
        .map(|p| p.identity.clone())
        .collect()
}

// ════════════════════════════════════════════════════════════════════════════
// S1: SINGLE-ORG AND POLICY, SUFFICIENT PEERS
// ════════════════════════════════════════════════════════════════════════════

#[test]
fn test_two_of_one_org_with_enough_peers() {
    let p_a = principal("orgA");
    let mut harness = Harness::new();
    harness
        .peer(1, "orgA", VERSION)
        .peer(2, "orgA", VERSION)
        .peer(3, "orgB", VERSION);
    harness.allow(1, &p_a).allow(2, &p_a).msp(&p_a, "orgA");

    let analyzer = harness.build(sets(&[&["orgA", "orgA"]]));
    let descriptor = harness.run(&analyzer).expect("descriptor");

    assert_eq!(descriptor.chaincode, CHAINCODE);
    assert_eq!(descriptor.layouts.len(), 1);
    let layout = &descriptor.layouts[0];
    assert_eq!(layout.quantities_by_group.len(), 1);
    assert_eq!(layout.quantities_by_group["G0"], 2);

    let ids = group_identities(&descriptor, "G0");
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&identity_bytes(1)));
    assert!(ids.contains(&identity_bytes(2)));
    assert!(!ids.contains(&identity_bytes(3)));
}

#[test]
fn test_envelopes_come_from_the_right_snapshots() {
    let p_a = principal("orgA");
    let mut harness = Harness::new();
    harness.peer(1, "orgA", VERSION);
    harness.allow(1, &p_a).msp(&p_a, "orgA");

    let analyzer = harness.build(sets(&[&["orgA"]]));
    let descriptor = harness.run(&analyzer).expect("descriptor");

    let peer = &descriptor.endorsers_by_group["G0"].peers[0];
    assert_eq!(peer.state_info, b"state-1");
    assert_eq!(peer.membership_info, b"alive-1");
    assert_eq!(peer.identity, identity_bytes(1));
}

// ════════════════════════════════════════════════════════════════════════════
// S2: TWO-ORG OR-OF-AND POLICY, ONE BRANCH FEASIBLE
// ════════════════════════════════════════════════════════════════════════════

#[test]
fn test_infeasible_branch_is_dropped() {
    let p_a = principal("orgA");
    let p_b = principal("orgB");
    let mut harness = Harness::new();
    harness
        .peer(1, "orgA", VERSION)
        .peer(2, "orgA", VERSION)
        .peer(3, "orgB", VERSION);
    harness
        .allow(1, &p_a)
        .allow(2, &p_a)
        .allow(3, &p_b)
        .msp(&p_a, "orgA")
        .msp(&p_b, "orgB");

    // Two ways to satisfy: two orgA peers, or two orgB peers. Only one
    // orgB peer exists, so the second branch cannot be fulfilled.
    let analyzer = harness.build(sets(&[&["orgA", "orgA"], &["orgB", "orgB"]]));
    let descriptor = harness.run(&analyzer).expect("descriptor");

    assert_eq!(descriptor.layouts.len(), 1);
    assert_eq!(descriptor.layouts[0].quantities_by_group["G0"], 2);

    // Only the surviving branch's group is listed.
    assert_eq!(descriptor.endorsers_by_group.len(), 1);
    assert!(descriptor.endorsers_by_group.contains_key("G0"));
}

// ════════════════════════════════════════════════════════════════════════════
// S3 / S4: MISSING METADATA, MISSING POLICY
// ════════════════════════════════════════════════════════════════════════════

#[test]
fn test_missing_metadata() {
    let mut harness = Harness::new();
    harness.peer(1, "orgA", VERSION);
    // No metadata, no policy installed.
    let analyzer = harness.build_without_policy();

    let err = harness.run(&analyzer).unwrap_err();
    assert_eq!(
        err,
        DiscoveryError::MetadataNotFound {
            channel: CHANNEL.to_string(),
            chaincode: CHAINCODE.to_string(),
        }
    );
}

#[test]
fn test_missing_policy() {
    let mut harness = Harness::new();
    harness.peer(1, "orgA", VERSION);
    harness.support.set_metadata(
        harness.channel.clone(),
        ChaincodeMetadata::new(CHAINCODE, VERSION),
    );
    let analyzer = harness.build_without_policy();

    let err = harness.run(&analyzer).unwrap_err();
    assert_eq!(
        err,
        DiscoveryError::PolicyNotFound {
            channel: CHANNEL.to_string(),
            chaincode: CHAINCODE.to_string(),
        }
    );
}

// ════════════════════════════════════════════════════════════════════════════
// S5: UNSATISFIABLE AFTER MSP PRE-FILTER
// ════════════════════════════════════════════════════════════════════════════

#[test]
fn test_policy_org_has_no_alive_channel_peer() {
    let p_x = principal("orgX");
    let mut harness = Harness::new();
    harness.peer(1, "orgA", VERSION);
    harness.msp(&p_x, "orgX");

    let analyzer = harness.build(sets(&[&["orgX"]]));
    let err = harness.run(&analyzer).unwrap_err();
    assert_eq!(err, DiscoveryError::CannotSatisfyAnyPrincipalCombination);
}

#[test]
fn test_principal_with_unknown_msp_is_filtered() {
    // msp_of_principal returns "" for unregistered principals; such a
    // combination must never survive even if peers would satisfy it.
    let p_a = principal("orgA");
    let mut harness = Harness::new();
    harness.peer(1, "orgA", VERSION);
    harness.allow(1, &p_a);
    // Deliberately no msp() registration.

    let analyzer = harness.build(sets(&[&["orgA"]]));
    let err = harness.run(&analyzer).unwrap_err();
    assert_eq!(err, DiscoveryError::CannotSatisfyAnyPrincipalCombination);
}

#[test]
fn test_mixed_set_dropped_when_one_principal_fails_prefilter() {
    // A set is kept only if all of its principals pass; one orgX
    // principal poisons the whole combination.
    let p_a = principal("orgA");
    let p_x = principal("orgX");
    let mut harness = Harness::new();
    harness.peer(1, "orgA", VERSION).peer(2, "orgA", VERSION);
    harness
        .allow(1, &p_a)
        .allow(2, &p_a)
        .msp(&p_a, "orgA")
        .msp(&p_x, "orgX");

    let analyzer = harness.build(sets(&[&["orgA", "orgX"]]));
    let err = harness.run(&analyzer).unwrap_err();
    assert_eq!(err, DiscoveryError::CannotSatisfyAnyPrincipalCombination);
}

// ════════════════════════════════════════════════════════════════════════════
// S6: INSTALLED-VERSION MISMATCH
// ════════════════════════════════════════════════════════════════════════════

#[test]
fn test_version_mismatch_eliminates_peers() {
    let p_a = principal("orgA");
    let mut harness = Harness::new();
    // Committed metadata is 1.0 (harness default); peers advertise 0.9.
    harness.peer(1, "orgA", "0.9").peer(2, "orgA", "0.9");
    harness.allow(1, &p_a).allow(2, &p_a).msp(&p_a, "orgA");

    let analyzer = harness.build(sets(&[&["orgA"]]));
    let err = harness.run(&analyzer).unwrap_err();
    assert_eq!(err, DiscoveryError::CannotSatisfyAnyPrincipalCombination);
}

// ════════════════════════════════════════════════════════════════════════════
// MEMBERSHIP FILTER SOUNDNESS
// ════════════════════════════════════════════════════════════════════════════

#[test]
fn test_only_alive_channel_peers_appear() {
    let p_a = principal("orgA");
    let mut harness = Harness::new();
    harness.peer(1, "orgA", VERSION);
    harness.channel_only_peer(2, "orgA");
    harness.alive_only_peer(3, "orgA");
    harness
        .allow(1, &p_a)
        .allow(2, &p_a)
        .allow(3, &p_a)
        .msp(&p_a, "orgA");

    let analyzer = harness.build(sets(&[&["orgA"]]));
    let descriptor = harness.run(&analyzer).expect("descriptor");

    let ids = group_identities(&descriptor, "G0");
    assert_eq!(ids, vec![identity_bytes(1)]);
}

// ════════════════════════════════════════════════════════════════════════════
// STRUCTURAL INVARIANTS
// ════════════════════════════════════════════════════════════════════════════

#[test]
fn test_groups_match_between_layouts_and_endorsers() {
    let p_a = principal("orgA");
    let p_b = principal("orgB");
    let mut harness = Harness::new();
    harness.peer(1, "orgA", VERSION).peer(2, "orgB", VERSION);
    harness
        .allow(1, &p_a)
        .allow(2, &p_b)
        .msp(&p_a, "orgA")
        .msp(&p_b, "orgB");

    let analyzer = harness.build(sets(&[&["orgA"], &["orgB"]]));
    let descriptor = harness.run(&analyzer).expect("descriptor");

    let layout_groups: std::collections::HashSet<&String> = descriptor
        .layouts
        .iter()
        .flat_map(|l| l.quantities_by_group.keys())
        .collect();
    let endorser_groups: std::collections::HashSet<&String> =
        descriptor.endorsers_by_group.keys().collect();
    assert_eq!(layout_groups, endorser_groups);
}

#[test]
fn test_every_layout_entry_is_backed_by_enough_peers() {
    let p_a = principal("orgA");
    let p_b = principal("orgB");
    let mut harness = Harness::new();
    harness
        .peer(1, "orgA", VERSION)
        .peer(2, "orgA", VERSION)
        .peer(3, "orgB", VERSION);
    harness
        .allow(1, &p_a)
        .allow(2, &p_a)
        .allow(3, &p_b)
        .msp(&p_a, "orgA")
        .msp(&p_b, "orgB");

    let analyzer = harness.build(sets(&[&["orgA", "orgA", "orgB"]]));
    let descriptor = harness.run(&analyzer).expect("descriptor");

    for layout in &descriptor.layouts {
        for (alias, quantity) in &layout.quantities_by_group {
            let available = descriptor.endorsers_by_group[alias].peers.len();
            assert!(
                available >= *quantity as usize,
                "group {} needs {} peers but only {} are listed",
                alias,
                quantity,
                available,
            );
        }
    }
}

#[test]
fn test_duplicate_layouts_are_preserved() {
    let p_a = principal("orgA");
    let mut harness = Harness::new();
    harness.peer(1, "orgA", VERSION);
    harness.allow(1, &p_a).msp(&p_a, "orgA");

    // Two identical combinations enumerate to two identical layouts.
    let analyzer = harness.build(sets(&[&["orgA"], &["orgA"]]));
    let descriptor = harness.run(&analyzer).expect("descriptor");

    assert_eq!(descriptor.layouts.len(), 2);
    assert_eq!(descriptor.layouts[0], descriptor.layouts[1]);
}

#[test]
fn test_repeated_analysis_is_identical() {
    let p_a = principal("orgA");
    let p_b = principal("orgB");
    let mut harness = Harness::new();
    harness
        .peer(1, "orgA", VERSION)
        .peer(2, "orgA", VERSION)
        .peer(3, "orgB", VERSION);
    harness
        .allow(1, &p_a)
        .allow(2, &p_a)
        .allow(3, &p_b)
        .msp(&p_a, "orgA")
        .msp(&p_b, "orgB");

    let analyzer = harness.build(sets(&[&["orgA", "orgA"], &["orgB"]]));
    let first = harness.run(&analyzer).expect("descriptor");
    let second = harness.run(&analyzer).expect("descriptor");
    assert_eq!(first, second);
}

// ════════════════════════════════════════════════════════════════════════════
// PARTIAL IDENTITY GOSSIP
// ════════════════════════════════════════════════════════════════════════════

#[test]
fn test_member_without_identity_gets_empty_identity_bytes() {
    let p_a = principal("orgA");
    let mut harness = Harness::new();
    harness.peer(1, "orgA", VERSION);
    // Peer 2 is alive, on the channel, has the chaincode, but its
    // identity never arrived through gossip.
    harness.channel_peers.push(
        NetworkMember::new(pki(2), b"state-2".to_vec()).with_properties(MemberProperties {
            chaincodes: vec![InstalledChaincode::new(CHAINCODE, VERSION)],
        }),
    );
    harness
        .alive_peers
        .push(NetworkMember::new(pki(2), b"alive-2".to_vec()));
    harness.allow(1, &p_a).msp(&p_a, "orgA");
    // The evaluator sees empty identity bytes for peer 2; mark that
    // pair as satisfying to show the record is still emitted.
    harness.support.allow(b"", &p_a);

    let analyzer = harness.build(sets(&[&["orgA"]]));
    let descriptor = harness.run(&analyzer).expect("descriptor");

    let peers = &descriptor.endorsers_by_group["G0"].peers;
    assert_eq!(peers.len(), 2);
    let anonymous = peers
        .iter()
        .find(|p| p.membership_info == b"alive-2")
        .expect("identityless peer is listed");
    assert!(anonymous.identity.is_empty());
    assert_eq!(anonymous.state_info, b"state-2");
}

// ════════════════════════════════════════════════════════════════════════════
// REQUEST VALIDATION, FAILURES, CANCELLATION
// ════════════════════════════════════════════════════════════════════════════

#[test]
fn test_empty_interest_is_rejected() {
    let mut harness = Harness::new();
    harness.peer(1, "orgA", VERSION);
    let analyzer = harness.build(sets(&[&["orgA"]]));

    let err = analyzer
        .peers_for_endorsement(
            &CallContext::new(),
            &harness.channel,
            &ChaincodeInterest::default(),
        )
        .unwrap_err();
    assert_eq!(err, DiscoveryError::InvalidInterest { count: 0 });
}

#[test]
fn test_multi_chaincode_interest_is_rejected() {
    let mut harness = Harness::new();
    harness.peer(1, "orgA", VERSION);
    let analyzer = harness.build(sets(&[&["orgA"]]));

    let interest = ChaincodeInterest {
        chaincodes: vec![
            nexum_common::ChaincodeCall::new("asset"),
            nexum_common::ChaincodeCall::new("transfer"),
        ],
    };
    let err = analyzer
        .peers_for_endorsement(&CallContext::new(), &harness.channel, &interest)
        .unwrap_err();
    assert_eq!(err, DiscoveryError::InvalidInterest { count: 2 });
}

#[test]
fn test_collaborator_failure_surfaces_with_cause() {
    let p_a = principal("orgA");
    let mut harness = Harness::new();
    harness.peer(1, "orgA", VERSION);
    harness.allow(1, &p_a).msp(&p_a, "orgA");
    let analyzer = harness.build(sets(&[&["orgA"]]));

    harness.support.inject_failure(SupportError::Unavailable);
    let err = harness.run(&analyzer).unwrap_err();
    assert_eq!(
        err,
        DiscoveryError::Collaborator(SupportError::Unavailable)
    );
}

#[test]
fn test_cancelled_context_stops_the_analysis() {
    let p_a = principal("orgA");
    let mut harness = Harness::new();
    harness.peer(1, "orgA", VERSION);
    harness.allow(1, &p_a).msp(&p_a, "orgA");
    let analyzer = harness.build(sets(&[&["orgA"]]));

    let ctx = CallContext::new();
    ctx.cancel();
    let err = analyzer
        .peers_for_endorsement(&ctx, &harness.channel, &ChaincodeInterest::single(CHAINCODE))
        .unwrap_err();
    assert_eq!(err, DiscoveryError::Cancelled);
}

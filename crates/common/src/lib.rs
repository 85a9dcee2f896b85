//! # Nexum Common Crate
//!
//! Shared vocabulary types and collaborator contracts for the Nexum peer.
//!
//! ## Modules
//! - `membership`: PKI-IDs, network members, membership snapshots
//! - `identity`: peer identity records and the identity set
//! - `chaincode`: ledger metadata and endorsement-interest vocabulary
//! - `policy`: principals, principal sets, the inquireable-policy contract
//! - `support`: collaborator traits, call context, support errors
//! - `mock_support`: in-memory mock collaborators for testing
//!
//! ## Collaborator Architecture
//! ```text
//! ┌──────────────┐ ┌─────────────────┐ ┌───────────────┐ ┌────────────────────┐
//! │ GossipSupport│ │ MetadataSupport │ │ PolicySupport │ │ PrincipalEvaluator │
//! └──────┬───────┘ └───────┬─────────┘ └──────┬────────┘ └─────────┬──────────┘
//!        │                 │                  │                    │
//!        └────────────┬────┴──────────────────┴────────────────────┘
//!                     │
//!            ┌────────▼────────┐
//!            │   MockSupport   │  <- single in-memory test double
//!            └─────────────────┘
//! ```
//!
//! Production implementations of the contracts live with the subsystems
//! they wrap (gossip, ledger, policy manager, MSP); this crate defines
//! the seams and ships the mock.

pub mod chaincode;
pub mod identity;
pub mod membership;
pub mod mock_support;
pub mod policy;
pub mod support;

pub use chaincode::{ChaincodeCall, ChaincodeInterest, ChaincodeMetadata};
pub use identity::{PeerIdentityInfo, PeerIdentitySet};
pub use membership::{InstalledChaincode, MemberProperties, Members, NetworkMember, PkiId};
pub use mock_support::{MockPolicy, MockSupport};
pub use policy::{InquireablePolicy, Principal, PrincipalClass, PrincipalSet, PrincipalSets};
pub use support::{
    CallContext, ChannelId, EvaluationError, GossipSupport, MetadataSupport, PolicySupport,
    PrincipalEvaluator, SupportError,
};

//! # Nexum Discovery Crate
//!
//! The endorsement discovery analyzer: given a channel, a chaincode of
//! interest, and the peer's current views of membership, identities,
//! ledger metadata, and the chaincode's endorsement policy, compute the
//! endorsement descriptor a client needs to assemble a valid
//! transaction.
//!
//! ## Modules
//! - `analyzer`: the `EndorsementAnalyzer` pipeline
//! - `group_mapper`: principal-to-group-alias interning
//! - `graph`: the bipartite peer/principal satisfaction graph
//! - `layout`: layouts and feasibility filtering
//! - `descriptor`: wire-level result types
//! - `error`: the `DiscoveryError` contract
//!
//! ## Dataflow
//! ```text
//! inputs -> filtered membership -> principal combinations -> group mapping
//!        -> satisfaction graph -> feasible layouts -> grouped endorsers
//!        -> EndorsementDescriptor
//! ```
//!
//! The analyzer is stateless across calls and holds its collaborators
//! (defined in `nexum_common::support`) behind `Arc<dyn Trait>`, so
//! independent analyses can run concurrently without synchronization.

pub mod analyzer;
pub mod descriptor;
pub mod error;
pub mod graph;
pub mod group_mapper;
pub mod layout;

pub use analyzer::{EndorsementAnalyzer, MemberIdentityIndex};
pub use descriptor::{EndorsementDescriptor, EndorsementPeer, PeerGroup};
pub use error::DiscoveryError;
pub use graph::{PrincipalVertex, SatisfactionGraph};
pub use group_mapper::PrincipalGroupMapper;
pub use layout::{compute_layouts, Layout, Layouts};

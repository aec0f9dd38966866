//! A dual-tree Borůvka minimum-spanning-tree engine for mutual reachability
//! graphs, the core combinatorial step of density-based clustering
//! algorithms in the HDBSCAN family.
//!
//! Given a spatial tree over a point set (a [`TreeView`] the caller has
//! already built) and a [`Metric`], this crate computes the mutual
//! reachability minimum spanning tree without ever materializing the
//! dense `n x n` distance graph: each sweep of the Borůvka loop walks the
//! tree against itself, pruning node pairs whose bounds rule out a better
//! merge than what has already been found.
//!
//! ## Algorithm families
//!
//! - [`core_distance`]: bulk k-nearest-neighbors initialization of each
//!   point's core distance.
//! - [`bounds`]: per-node-pair lower bounds on mutual reachability
//!   distance, and the per-component candidate edges a sweep accumulates.
//! - [`driver`]: the sweep loop itself, exposed as [`spanning_tree`] and
//!   [`Driver`] for callers that want to reuse state across repeated runs.
//!
//! ## Features
//!
//! None. The metric set is closed (see [`Metric`]); new metrics are added
//! by extending the enum, not by a crate feature.

mod bounds;
mod components;
mod config;
mod core_distance;
mod distance_oracle;
mod driver;
mod error;
mod tree_view;
mod union_find;

#[doc(hidden)]
pub mod test_support;

pub use config::BoruvkaConfig;
pub use distance_oracle::Metric;
pub use driver::{spanning_tree, Driver, Edge};
pub use error::{MstError, MstResult};
pub use tree_view::{TreeKind, TreeView};

//! Error types surfaced by the Borůvka MST engine.

use thiserror::Error;

/// Errors returned from [`crate::spanning_tree`] and [`crate::Driver::new`].
#[derive(Debug, Error)]
pub enum MstError {
    /// A contract was violated at construction time: an empty tree, an
    /// unknown metric, inconsistent tree shapes, or `min_samples` larger
    /// than the number of points.
    #[error("precondition failed: {0}")]
    PreconditionFailure(String),

    /// A non-finite value appeared in a distance computation.
    #[error("non-finite distance computed between points {point_a} and {point_b}")]
    NumericDegeneracy {
        /// The first point involved in the offending computation.
        point_a: usize,
        /// The second point involved in the offending computation.
        point_b: usize,
    },

    /// A post-condition that the algorithm guarantees was violated, e.g. a
    /// sweep failed to reduce the number of components in exact mode. This
    /// indicates a bug in the engine or in the caller's `TreeView`
    /// implementation, not a recoverable input problem.
    #[error("internal invariant violated: {0}")]
    Unreachable(String),
}

/// Convenience alias for results returned by this crate.
pub type MstResult<T> = Result<T, MstError>;

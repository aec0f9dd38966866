//! Configuration for the Borůvka MST engine.

use crate::error::{MstError, MstResult};

/// Named configuration for a [`crate::Driver`].
#[derive(Debug, Clone, Copy)]
pub struct BoruvkaConfig {
    /// Number of neighbors (including self) used to compute core distances.
    pub min_samples: usize,
    /// Scaling factor applied to the true distance term of mutual
    /// reachability. Must be strictly positive.
    pub alpha: f64,
    /// When set, a sweep that fails to merge any components skips the bound
    /// reset instead of failing, trading MST optimality for guaranteed
    /// progress.
    pub approx_min_span_tree: bool,
    /// Advisory leaf size used by callers when building the `TreeView`; the
    /// core engine itself does not use this value directly.
    pub leaf_size: usize,
    /// Number of worker threads used to parallelize the core-distance kNN
    /// pass. Only consulted when the point count exceeds the parallelism
    /// threshold in [`crate::core_distance`].
    pub n_jobs: usize,
}

impl Default for BoruvkaConfig {
    fn default() -> Self {
        Self {
            min_samples: 1,
            alpha: 1.0,
            approx_min_span_tree: false,
            leaf_size: 20,
            n_jobs: 4,
        }
    }
}

impl BoruvkaConfig {
    /// Validates the configuration against a point count `n`.
    pub(crate) fn validate(&self, n: usize) -> MstResult<()> {
        if self.min_samples == 0 {
            return Err(MstError::PreconditionFailure("min_samples must be >= 1".to_string()));
        }
        if self.min_samples > n {
            return Err(MstError::PreconditionFailure(format!(
                "min_samples ({}) cannot exceed the number of points ({n})",
                self.min_samples
            )));
        }
        if !(self.alpha > 0.0) {
            return Err(MstError::PreconditionFailure(format!("alpha must be > 0, got {}", self.alpha)));
        }
        if self.leaf_size == 0 {
            return Err(MstError::PreconditionFailure("leaf_size must be > 0".to_string()));
        }
        if self.n_jobs == 0 {
            return Err(MstError::PreconditionFailure("n_jobs must be >= 1".to_string()));
        }
        Ok(())
    }
}

//! Lp-norm distances between vectors of `f64`.
//!
//! See the [`crate::vectors`] module's functions for the individual norms.
//! All functions assume `x` and `y` have equal length; behavior is
//! unspecified otherwise.

mod lp_norms;

pub use lp_norms::{chebyshev, euclidean, euclidean_sq, manhattan, minkowski, minkowski_p};

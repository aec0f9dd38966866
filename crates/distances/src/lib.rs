//! Vector distance kernels used by the Borůvka MST engine's metric layer.
//!
//! This is a trimmed, `f64`-specialized descendant of the original `distances`
//! crate: only the Lp-norm family needed by the closed metric set in
//! `clam_mst::Metric` is kept here. The string, set, and BLAS-backed kernels
//! from the original crate are commodity vectorized loops that belong to
//! callers building their own spatial trees, not to this crate.

pub mod vectors;

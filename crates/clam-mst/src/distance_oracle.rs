//! The distance metric abstraction: true distance, reduced distance
//! (`rdist`), and conversions between the two.

use distances::vectors::{chebyshev, euclidean, euclidean_sq, manhattan, minkowski, minkowski_p};

/// A tagged-variant distance oracle over the closed metric set this engine
/// supports.
///
/// Dispatch on `Metric` is resolved once per call site (never virtually
/// inside the dual-tree traversal's hot loop): the closed metrics
/// (Euclidean, Manhattan, Chebyshev) get inlined specializations, and a
/// single generic `Minkowski(p)` arm covers the open case.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metric {
    /// L2-norm. `rdist` is the squared Euclidean distance.
    Euclidean,
    /// L1-norm (taxicab distance). `rdist` equals `dist`.
    Manhattan,
    /// L-infinity norm (Chebyshev distance). `rdist` equals `dist`.
    Chebyshev,
    /// General Lp-norm. `rdist` is the p-th power of the Lp-norm.
    Minkowski(f64),
}

impl Metric {
    /// The exponent `p` of this metric, with Chebyshev reported as `+inf`.
    #[must_use]
    pub fn p(&self) -> f64 {
        match self {
            Self::Euclidean => 2.0,
            Self::Manhattan => 1.0,
            Self::Chebyshev => f64::INFINITY,
            Self::Minkowski(p) => *p,
        }
    }

    /// The true distance between two points.
    #[must_use]
    pub fn dist(&self, x: &[f64], y: &[f64]) -> f64 {
        match self {
            Self::Euclidean => euclidean(x, y),
            Self::Manhattan => manhattan(x, y),
            Self::Chebyshev => chebyshev(x, y),
            Self::Minkowski(p) => minkowski(*p, x, y),
        }
    }

    /// The reduced distance (`rdist`) between two points: a monotone,
    /// cheaper-to-compute surrogate for [`Self::dist`].
    #[must_use]
    pub fn rdist(&self, x: &[f64], y: &[f64]) -> f64 {
        match self {
            Self::Euclidean => euclidean_sq(x, y),
            Self::Manhattan => manhattan(x, y),
            Self::Chebyshev => chebyshev(x, y),
            Self::Minkowski(p) => minkowski_p(*p, x, y),
        }
    }

    /// Converts a true distance to its reduced form. Inverse of
    /// [`Self::rdist_to_dist`].
    #[must_use]
    pub fn dist_to_rdist(&self, d: f64) -> f64 {
        match self {
            Self::Euclidean => d * d,
            Self::Manhattan | Self::Chebyshev => d,
            Self::Minkowski(p) => d.powf(*p),
        }
    }

    /// Converts a reduced distance back to true distance. Inverse of
    /// [`Self::dist_to_rdist`].
    #[must_use]
    pub fn rdist_to_dist(&self, r: f64) -> f64 {
        match self {
            Self::Euclidean => r.sqrt(),
            Self::Manhattan | Self::Chebyshev => r,
            Self::Minkowski(p) => r.powf(1.0 / p),
        }
    }
}

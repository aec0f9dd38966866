//! Provides functions for calculating Lp-norms between two vectors of `f64`.

use core::cmp::Ordering;

/// Euclidean distance between two vectors.
///
/// Also known as the L2-norm, defined as the square root of the sum of the
/// squares of the differences between corresponding elements.
///
/// # Examples
///
/// ```
/// use distances::vectors::euclidean;
///
/// let x = [1.0, 2.0, 3.0];
/// let y = [4.0, 5.0, 6.0];
///
/// let distance = euclidean(&x, &y);
///
/// assert!((distance - (27.0_f64).sqrt()).abs() <= f64::EPSILON);
/// ```
pub fn euclidean(x: &[f64], y: &[f64]) -> f64 {
    euclidean_sq(x, y).sqrt()
}

/// Squared Euclidean distance between two vectors.
///
/// This is the L2-norm's reduced (cheaper) form: the sum of the squares of
/// the differences between corresponding elements, with no final square
/// root.
///
/// # Examples
///
/// ```
/// use distances::vectors::euclidean_sq;
///
/// let x = [1.0, 2.0, 3.0];
/// let y = [4.0, 5.0, 6.0];
///
/// let distance = euclidean_sq(&x, &y);
///
/// assert!((distance - 27.0).abs() <= f64::EPSILON);
/// ```
pub fn euclidean_sq(x: &[f64], y: &[f64]) -> f64 {
    x.iter().zip(y.iter()).map(|(a, b)| (a - b) * (a - b)).sum()
}

/// Manhattan (L1, taxicab) distance between two vectors.
///
/// # Examples
///
/// ```
/// use distances::vectors::manhattan;
///
/// let x = [1.0, 2.0, 3.0];
/// let y = [4.0, 5.0, 6.0];
///
/// let distance = manhattan(&x, &y);
///
/// assert!((distance - 9.0).abs() <= f64::EPSILON);
/// ```
pub fn manhattan(x: &[f64], y: &[f64]) -> f64 {
    x.iter().zip(y.iter()).map(|(a, b)| (a - b).abs()).sum()
}

/// Chebyshev (L-infinity) distance between two vectors.
///
/// Defined as the maximum absolute difference between corresponding
/// elements.
///
/// # Examples
///
/// ```
/// use distances::vectors::chebyshev;
///
/// let x = [1.0, 2.0, 3.0];
/// let y = [6.0, 5.0, 4.0];
///
/// let distance = chebyshev(&x, &y);
///
/// assert!((distance - 5.0).abs() <= f64::EPSILON);
/// ```
pub fn chebyshev(x: &[f64], y: &[f64]) -> f64 {
    x.iter()
        .zip(y.iter())
        .map(|(a, b)| (a - b).abs())
        .fold(0.0_f64, |acc, d| if d.partial_cmp(&acc) == Some(Ordering::Greater) { d } else { acc })
}

/// The p-th power of the Lp-norm (Minkowski distance) between two vectors.
///
/// This is the reduced form used as `rdist` for the Minkowski metric: the
/// sum of the p-th powers of the absolute differences, with no final p-th
/// root.
///
/// # Examples
///
/// ```
/// use distances::vectors::minkowski_p;
///
/// let x = [1.0, 2.0, 3.0];
/// let y = [4.0, 5.0, 6.0];
///
/// let distance = minkowski_p(3.0, &x, &y);
/// assert!((distance - 81.0).abs() <= 1e-9);
/// ```
pub fn minkowski_p(p: f64, x: &[f64], y: &[f64]) -> f64 {
    x.iter().zip(y.iter()).map(|(a, b)| (a - b).abs().powf(p)).sum()
}

/// The general Lp-norm (Minkowski distance) between two vectors.
///
/// # Examples
///
/// ```
/// use distances::vectors::minkowski;
///
/// let x = [1.0, 2.0, 3.0];
/// let y = [4.0, 5.0, 6.0];
///
/// let distance = minkowski(3.0, &x, &y);
/// assert!((distance - (81.0_f64).cbrt()).abs() <= 1e-9);
/// ```
pub fn minkowski(p: f64, x: &[f64], y: &[f64]) -> f64 {
    minkowski_p(p, x, y).powf(1.0 / p)
}

#[cfg(test)]
mod tests {
    use super::{chebyshev, euclidean, euclidean_sq, manhattan, minkowski, minkowski_p};

    #[test]
    fn agree_with_euclidean_at_p_two() {
        let x = [1.0, -2.0, 3.5];
        let y = [4.0, 0.0, -1.5];
        assert!((minkowski(2.0, &x, &y) - euclidean(&x, &y)).abs() < 1e-9);
        assert!((minkowski_p(2.0, &x, &y) - euclidean_sq(&x, &y)).abs() < 1e-9);
    }

    #[test]
    fn agree_with_manhattan_at_p_one() {
        let x = [1.0, -2.0, 3.5];
        let y = [4.0, 0.0, -1.5];
        assert!((minkowski(1.0, &x, &y) - manhattan(&x, &y)).abs() < 1e-9);
    }

    #[test]
    fn chebyshev_is_max_abs_diff() {
        let x = [1.0, -2.0, 3.5];
        let y = [4.0, 0.0, -1.5];
        assert!((chebyshev(&x, &y) - 5.0).abs() < 1e-9);
    }
}

//! Deterministic synthetic data generators for the integration suite.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A 1-D line of exponentially-growing gaps, with deltas small enough to
/// stress floating-point precision near the start of the line.
pub fn pathological_line() -> Vec<f64> {
    let min_delta = 1e-12;
    let mut delta = min_delta;
    let mut line = vec![0_f64];

    while line.len() < 900 {
        let last = *line.last().unwrap_or(&0.0);
        line.push(last + delta);
        delta *= 2.0;
        delta += min_delta;
    }

    line
}

/// A uniform 1-D line of integers in `[-max, max]`.
pub fn line(max: i32) -> Vec<i32> {
    (-max..=max).collect()
}

/// A 2-D integer grid covering `[-max, max] x [-max, max]`.
pub fn grid(max: i32) -> Vec<(f32, f32)> {
    (-max..=max).flat_map(|x| (-max..=max).map(move |y| (x as f32, y as f32))).collect()
}

/// `n` random rows of `dim` features each, uniform over `[min, max)`, drawn
/// from a fixed seed so test runs are reproducible.
pub fn tabular(n: usize, dim: usize, min: f64, max: f64) -> Vec<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..n).map(|_| (0..dim).map(|_| rng.random_range(min..max)).collect()).collect()
}

/// Several well-separated Gaussian-ish blobs, useful for checking that the
/// spanning tree's heaviest edges fall between clusters rather than within
/// one.
pub fn blobs(points_per_blob: usize, dim: usize, num_blobs: usize, spread: f64) -> Vec<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(7);
    let mut rows = Vec::with_capacity(points_per_blob * num_blobs);
    for blob in 0..num_blobs {
        let center: Vec<f64> = (0..dim).map(|axis| (blob * 100 + axis) as f64).collect();
        for _ in 0..points_per_blob {
            rows.push(center.iter().map(|&c| c + rng.random_range(-spread..spread)).collect());
        }
    }
    rows
}

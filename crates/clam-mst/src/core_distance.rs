//! Core distance initialization: one bulk k-nearest-neighbors query per
//! point, plus the "first qualifying neighbor" seed for each point's
//! initial candidate edge.

use rayon::prelude::*;

use crate::distance_oracle::Metric;
use crate::tree_view::{TreeKind, TreeView};

/// Above this many points, and only when the caller asked for more than one
/// worker, core distance initialization is split into chunks and run across
/// a rayon thread pool. Below it, a single kNN query per point beats the
/// overhead of spinning up parallel work.
///
/// Lowered under `#[cfg(test)]` so the parallel path can actually be
/// exercised by a unit test without building a tree tens of thousands of
/// points wide.
#[cfg(not(test))]
const PARALLEL_THRESHOLD: usize = 16_384;
#[cfg(test)]
const PARALLEL_THRESHOLD: usize = 32;

/// The output of [`initialize`]: per-point core distances, and an initial
/// candidate edge seeded from each point's own neighbor list.
pub struct CoreDistanceSeed {
    /// `core_distance[p]`: the distance to `p`'s `min_samples`-th nearest
    /// neighbor, counting itself as rank 0. Reduced distance for a KD-tree
    /// run, true distance for a Ball-tree run.
    pub core_distance: Vec<f64>,
    /// `candidate_point[p]`, seeded to `p` itself when a qualifying
    /// neighbor was found, else `-1`.
    pub candidate_point: Vec<i64>,
    /// `candidate_neighbor[p]`: the first of `p`'s neighbors (in rank
    /// order) whose own core distance does not exceed `p`'s, or `-1` if
    /// none of `p`'s `min_samples` neighbors qualify.
    pub candidate_neighbor: Vec<i64>,
    /// `candidate_distance[p]`, seeded to `core_distance[p]` when a
    /// qualifying neighbor was found, else `+infinity`.
    pub candidate_distance: Vec<f64>,
}

/// Computes the core distance of every point in `tree`, then seeds an
/// initial candidate edge per point from its own `min_samples`-nearest
/// neighbor list.
///
/// `min_samples` must already have been validated against `tree.n()` by
/// [`crate::config::BoruvkaConfig::validate`].
pub fn initialize<T: TreeView + Sync>(tree: &T, metric: &Metric, min_samples: usize, n_jobs: usize) -> CoreDistanceSeed {
    let n = tree.n();
    ftlog::info!("computing core distances for {n} points, min_samples={min_samples}");

    let query = |p: usize| -> (f64, Vec<usize>) {
        let (distances, indices) = tree.knn_query(p, min_samples);
        let raw = distances[min_samples - 1];
        let core = match tree.kind() {
            TreeKind::Kd => metric.dist_to_rdist(raw),
            TreeKind::Ball => raw,
        };
        (core, indices)
    };

    let results: Vec<(f64, Vec<usize>)> = if n > PARALLEL_THRESHOLD && n_jobs > 1 {
        ftlog::debug!("core distance query parallelized across {n_jobs} workers");
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(n_jobs)
            .build()
            .expect("building a bounded rayon thread pool should never fail");
        pool.install(|| (0..n).into_par_iter().map(query).collect())
    } else {
        (0..n).map(query).collect()
    };

    let core_distance: Vec<f64> = results.iter().map(|(core, _)| *core).collect();

    let mut candidate_point = vec![-1_i64; n];
    let mut candidate_neighbor = vec![-1_i64; n];
    let mut candidate_distance = vec![f64::INFINITY; n];
    for (p, (_, neighbors)) in results.iter().enumerate() {
        for &m in neighbors.iter().skip(1) {
            if core_distance[m] <= core_distance[p] {
                candidate_point[p] = p as i64;
                candidate_neighbor[p] = m as i64;
                candidate_distance[p] = core_distance[p];
                break;
            }
        }
    }

    ftlog::info!("core distance computation complete");
    CoreDistanceSeed { core_distance, candidate_point, candidate_neighbor, candidate_distance }
}

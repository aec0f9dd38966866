//! Minimal reference `TreeView` implementations used to exercise the engine
//! end-to-end in tests.
//!
//! Building a real KD-tree or Ball-tree is explicitly out of scope for this
//! crate (see the crate-level docs); these two builders exist only so the
//! Borůvka driver has something concrete to traverse in its own test suite.
//! They are not tuned for performance and are not meant for production use.

use crate::distance_oracle::Metric;
use crate::tree_view::{TreeKind, TreeView};

fn point_at(raw_data: &[f64], num_features: usize, p: usize) -> &[f64] {
    &raw_data[p * num_features..(p + 1) * num_features]
}

fn tree_levels(n: usize, leaf_size: usize) -> usize {
    let leaf_size = leaf_size.max(1);
    let mut levels = 1usize;
    while n.div_ceil(1usize << (levels - 1)) > leaf_size {
        levels += 1;
    }
    levels
}

fn brute_force_knn(raw_data: &[f64], num_features: usize, n: usize, point: usize, m: usize, metric: &Metric) -> (Vec<f64>, Vec<usize>) {
    let query = point_at(raw_data, num_features, point);
    let mut all: Vec<(f64, usize)> = (0..n)
        .map(|p| (metric.dist(query, point_at(raw_data, num_features, p)), p))
        .collect();
    all.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(core::cmp::Ordering::Equal).then(a.1.cmp(&b.1)));
    all.truncate(m);
    all.into_iter().unzip()
}

/// A reference axis-aligned KD-tree over row-major `f64` data.
#[doc(hidden)]
pub struct ReferenceKdTree {
    n: usize,
    m: usize,
    num_features: usize,
    raw_data: Vec<f64>,
    idx_array: Vec<usize>,
    idx_start: Vec<usize>,
    idx_end: Vec<usize>,
    is_leaf: Vec<bool>,
    radius: Vec<f64>,
    lo: Vec<Vec<f64>>,
    hi: Vec<Vec<f64>>,
    metric: Metric,
}

impl ReferenceKdTree {
    /// Builds a KD-tree over `rows` under the Euclidean metric.
    #[must_use]
    pub fn from_rows(rows: &[Vec<f64>], leaf_size: usize) -> Self {
        Self::with_metric(rows, leaf_size, Metric::Euclidean)
    }

    /// Builds a KD-tree over `rows` under the given metric.
    #[must_use]
    pub fn with_metric(rows: &[Vec<f64>], leaf_size: usize, metric: Metric) -> Self {
        let n = rows.len();
        let num_features = rows.first().map_or(0, Vec::len);
        let raw_data: Vec<f64> = rows.iter().flatten().copied().collect();
        let mut idx_array: Vec<usize> = (0..n).collect();

        let levels = tree_levels(n.max(1), leaf_size);
        let m = (1usize << levels) - 1;

        let mut idx_start = vec![0usize; m];
        let mut idx_end = vec![0usize; m];
        let mut is_leaf = vec![false; m];

        build_kd_node(0, 0, n, 0, levels, &raw_data, num_features, &mut idx_array, &mut idx_start, &mut idx_end, &mut is_leaf);

        let mut lo = vec![vec![0.0; num_features]; m];
        let mut hi = vec![vec![0.0; num_features]; m];
        let mut radius = vec![0.0; m];
        for node in 0..m {
            let (s, e) = (idx_start[node], idx_end[node]);
            if s == e {
                continue;
            }
            for axis in 0..num_features {
                let (mut axis_lo, mut axis_hi) = (f64::INFINITY, f64::NEG_INFINITY);
                for &p in &idx_array[s..e] {
                    let v = raw_data[p * num_features + axis];
                    axis_lo = axis_lo.min(v);
                    axis_hi = axis_hi.max(v);
                }
                lo[node][axis] = axis_lo;
                hi[node][axis] = axis_hi;
            }
            let center: Vec<f64> = (0..num_features).map(|axis| 0.5 * (lo[node][axis] + hi[node][axis])).collect();
            radius[node] = idx_array[s..e]
                .iter()
                .map(|&p| metric.dist(&center, point_at(&raw_data, num_features, p)))
                .fold(0.0_f64, f64::max);
        }

        Self {
            n,
            m,
            num_features,
            raw_data,
            idx_array,
            idx_start,
            idx_end,
            is_leaf,
            radius,
            lo,
            hi,
            metric,
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn build_kd_node(
    node: usize,
    start: usize,
    end: usize,
    depth: usize,
    levels: usize,
    raw_data: &[f64],
    num_features: usize,
    idx_array: &mut [usize],
    idx_start: &mut [usize],
    idx_end: &mut [usize],
    is_leaf: &mut [bool],
) {
    idx_start[node] = start;
    idx_end[node] = end;

    if depth + 1 >= levels {
        is_leaf[node] = true;
        return;
    }

    let mid = if end - start >= 2 && num_features > 0 {
        let axis = widest_axis(raw_data, num_features, &idx_array[start..end]);
        idx_array[start..end].sort_by(|&a, &b| {
            raw_data[a * num_features + axis]
                .partial_cmp(&raw_data[b * num_features + axis])
                .unwrap_or(core::cmp::Ordering::Equal)
        });
        start + (end - start) / 2
    } else {
        end
    };

    let (left, right) = (2 * node + 1, 2 * node + 2);
    build_kd_node(left, start, mid, depth + 1, levels, raw_data, num_features, idx_array, idx_start, idx_end, is_leaf);
    build_kd_node(right, mid, end, depth + 1, levels, raw_data, num_features, idx_array, idx_start, idx_end, is_leaf);
}

fn widest_axis(raw_data: &[f64], num_features: usize, points: &[usize]) -> usize {
    let spread = |axis: usize| {
        let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
        for &p in points {
            let v = raw_data[p * num_features + axis];
            lo = lo.min(v);
            hi = hi.max(v);
        }
        hi - lo
    };
    (0..num_features)
        .max_by(|&a, &b| spread(a).partial_cmp(&spread(b)).unwrap_or(core::cmp::Ordering::Equal))
        .unwrap_or(0)
}

impl TreeView for ReferenceKdTree {
    fn n(&self) -> usize {
        self.n
    }

    fn m(&self) -> usize {
        self.m
    }

    fn num_features(&self) -> usize {
        self.num_features
    }

    fn kind(&self) -> TreeKind {
        TreeKind::Kd
    }

    fn raw_data(&self) -> &[f64] {
        &self.raw_data
    }

    fn idx_array(&self) -> &[usize] {
        &self.idx_array
    }

    fn idx_start(&self, node: usize) -> usize {
        self.idx_start[node]
    }

    fn idx_end(&self, node: usize) -> usize {
        self.idx_end[node]
    }

    fn is_leaf(&self, node: usize) -> bool {
        self.is_leaf[node]
    }

    fn radius(&self, node: usize) -> f64 {
        self.radius[node]
    }

    fn kd_bounds(&self, node: usize) -> Option<(&[f64], &[f64])> {
        Some((&self.lo[node], &self.hi[node]))
    }

    fn centroid(&self, _node: usize) -> Option<&[f64]> {
        None
    }

    fn knn_query(&self, point: usize, m: usize) -> (Vec<f64>, Vec<usize>) {
        brute_force_knn(&self.raw_data, self.num_features, self.n, point, m, &self.metric)
    }
}

/// A reference Ball-tree over row-major `f64` data, partitioned by a
/// farthest-pair ("bipolar") split.
#[doc(hidden)]
pub struct ReferenceBallTree {
    n: usize,
    m: usize,
    num_features: usize,
    raw_data: Vec<f64>,
    idx_array: Vec<usize>,
    idx_start: Vec<usize>,
    idx_end: Vec<usize>,
    is_leaf: Vec<bool>,
    radius: Vec<f64>,
    centroid: Vec<Vec<f64>>,
    metric: Metric,
}

impl ReferenceBallTree {
    /// Builds a Ball-tree over `rows` under the Euclidean metric.
    #[must_use]
    pub fn from_rows(rows: &[Vec<f64>], leaf_size: usize) -> Self {
        Self::with_metric(rows, leaf_size, Metric::Euclidean)
    }

    /// Builds a Ball-tree over `rows` under the given metric.
    #[must_use]
    pub fn with_metric(rows: &[Vec<f64>], leaf_size: usize, metric: Metric) -> Self {
        let n = rows.len();
        let num_features = rows.first().map_or(0, Vec::len);
        let raw_data: Vec<f64> = rows.iter().flatten().copied().collect();
        let mut idx_array: Vec<usize> = (0..n).collect();

        let levels = tree_levels(n.max(1), leaf_size);
        let m = (1usize << levels) - 1;

        let mut idx_start = vec![0usize; m];
        let mut idx_end = vec![0usize; m];
        let mut is_leaf = vec![false; m];

        build_ball_node(0, 0, n, 0, levels, &raw_data, num_features, &metric, &mut idx_array, &mut idx_start, &mut idx_end, &mut is_leaf);

        let mut centroid = vec![vec![0.0; num_features]; m];
        let mut radius = vec![0.0; m];
        for node in 0..m {
            let (s, e) = (idx_start[node], idx_end[node]);
            if s == e {
                continue;
            }
            let count = (e - s) as f64;
            for axis in 0..num_features {
                centroid[node][axis] = idx_array[s..e].iter().map(|&p| raw_data[p * num_features + axis]).sum::<f64>() / count;
            }
            radius[node] = idx_array[s..e]
                .iter()
                .map(|&p| metric.dist(&centroid[node], point_at(&raw_data, num_features, p)))
                .fold(0.0_f64, f64::max);
        }

        Self {
            n,
            m,
            num_features,
            raw_data,
            idx_array,
            idx_start,
            idx_end,
            is_leaf,
            radius,
            centroid,
            metric,
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn build_ball_node(
    node: usize,
    start: usize,
    end: usize,
    depth: usize,
    levels: usize,
    raw_data: &[f64],
    num_features: usize,
    metric: &Metric,
    idx_array: &mut [usize],
    idx_start: &mut [usize],
    idx_end: &mut [usize],
    is_leaf: &mut [bool],
) {
    idx_start[node] = start;
    idx_end[node] = end;

    if depth + 1 >= levels {
        is_leaf[node] = true;
        return;
    }

    let mid = if end - start >= 2 && num_features > 0 {
        split_by_poles(idx_array, start, end, raw_data, num_features, metric)
    } else {
        end
    };

    let (left, right) = (2 * node + 1, 2 * node + 2);
    build_ball_node(left, start, mid, depth + 1, levels, raw_data, num_features, metric, idx_array, idx_start, idx_end, is_leaf);
    build_ball_node(right, mid, end, depth + 1, levels, raw_data, num_features, metric, idx_array, idx_start, idx_end, is_leaf);
}

/// Splits `idx_array[start..end]` by distance to two "poles": the point
/// farthest from an arbitrary pivot, and the point farthest from that pole.
/// Points closer to the first pole sort first; the range is then bisected.
fn split_by_poles(idx_array: &mut [usize], start: usize, end: usize, raw_data: &[f64], num_features: usize, metric: &Metric) -> usize {
    let pivot = point_at(raw_data, num_features, idx_array[start]).to_vec();
    let pole_a = *idx_array[start..end]
        .iter()
        .max_by(|&&p, &&q| {
            metric
                .dist(&pivot, point_at(raw_data, num_features, p))
                .partial_cmp(&metric.dist(&pivot, point_at(raw_data, num_features, q)))
                .unwrap_or(core::cmp::Ordering::Equal)
        })
        .unwrap_or(&idx_array[start]);
    let pole_a_pt = point_at(raw_data, num_features, pole_a).to_vec();
    let pole_b = *idx_array[start..end]
        .iter()
        .max_by(|&&p, &&q| {
            metric
                .dist(&pole_a_pt, point_at(raw_data, num_features, p))
                .partial_cmp(&metric.dist(&pole_a_pt, point_at(raw_data, num_features, q)))
                .unwrap_or(core::cmp::Ordering::Equal)
        })
        .unwrap_or(&idx_array[start]);
    let pole_b_pt = point_at(raw_data, num_features, pole_b).to_vec();

    idx_array[start..end].sort_by(|&p, &q| {
        let dp = metric.dist(&pole_a_pt, point_at(raw_data, num_features, p)) - metric.dist(&pole_b_pt, point_at(raw_data, num_features, p));
        let dq = metric.dist(&pole_a_pt, point_at(raw_data, num_features, q)) - metric.dist(&pole_b_pt, point_at(raw_data, num_features, q));
        dp.partial_cmp(&dq).unwrap_or(core::cmp::Ordering::Equal)
    });

    start + (end - start) / 2
}

impl TreeView for ReferenceBallTree {
    fn n(&self) -> usize {
        self.n
    }

    fn m(&self) -> usize {
        self.m
    }

    fn num_features(&self) -> usize {
        self.num_features
    }

    fn kind(&self) -> TreeKind {
        TreeKind::Ball
    }

    fn raw_data(&self) -> &[f64] {
        &self.raw_data
    }

    fn idx_array(&self) -> &[usize] {
        &self.idx_array
    }

    fn idx_start(&self, node: usize) -> usize {
        self.idx_start[node]
    }

    fn idx_end(&self, node: usize) -> usize {
        self.idx_end[node]
    }

    fn is_leaf(&self, node: usize) -> bool {
        self.is_leaf[node]
    }

    fn radius(&self, node: usize) -> f64 {
        self.radius[node]
    }

    fn kd_bounds(&self, _node: usize) -> Option<(&[f64], &[f64])> {
        None
    }

    fn centroid(&self, node: usize) -> Option<&[f64]> {
        Some(&self.centroid[node])
    }

    fn knn_query(&self, point: usize, m: usize) -> (Vec<f64>, Vec<usize>) {
        brute_force_knn(&self.raw_data, self.num_features, self.n, point, m, &self.metric)
    }
}

#[cfg(test)]
mod tests {
    use super::{ReferenceBallTree, ReferenceKdTree};
    use crate::tree_view::TreeView;

    #[test]
    fn kd_tree_covers_every_point_exactly_once() {
        let rows: Vec<Vec<f64>> = (0..20).map(|i| vec![f64::from(i)]).collect();
        let tree = ReferenceKdTree::from_rows(&rows, 4);
        let mut seen = vec![false; tree.n()];
        for node in 0..tree.m() {
            if tree.is_leaf(node) {
                for &p in tree.points_of(node) {
                    assert!(!seen[p], "point {p} covered by more than one leaf");
                    seen[p] = true;
                }
            }
        }
        assert!(seen.iter().all(|&s| s), "every point must be covered by some leaf");
    }

    #[test]
    fn ball_tree_covers_every_point_exactly_once() {
        let rows: Vec<Vec<f64>> = (0..20).map(|i| vec![f64::from(i), f64::from(i * i)]).collect();
        let tree = ReferenceBallTree::from_rows(&rows, 4);
        let mut seen = vec![false; tree.n()];
        for node in 0..tree.m() {
            if tree.is_leaf(node) {
                for &p in tree.points_of(node) {
                    assert!(!seen[p], "point {p} covered by more than one leaf");
                    seen[p] = true;
                }
            }
        }
        assert!(seen.iter().all(|&s| s), "every point must be covered by some leaf");
    }
}

//! Per-node pruning bounds and the per-component candidate edges a sweep
//! accumulates while walking the tree.
//!
//! Two kinds of state live here:
//!
//! - [`geometric_lower_bound`]: a lower bound on the (reduced, for KD-tree
//!   views; true, for Ball-tree views) distance between *any* pair of
//!   points drawn from two nodes. Purely geometric: it knows nothing about
//!   core distances or mutual reachability.
//! - [`BoundsState`]: the best candidate merge edge found so far for each
//!   component, and an upper bound per node summarizing how much better a
//!   candidate could still be hiding under that node. A node whose bound
//!   already matches (or beats) what a comparison could offer is pruned.

use crate::distance_oracle::Metric;
use crate::tree_view::{TreeKind, TreeView};

/// A lower bound on the distance between any pair of points drawn from
/// `node1` and `node2`. For a KD-tree view this is in reduced-distance
/// units; for a Ball-tree view it is true distance.
pub fn geometric_lower_bound<T: TreeView + ?Sized>(tree: &T, node1: usize, node2: usize, metric: &Metric) -> f64 {
    match tree.kind() {
        TreeKind::Kd => kd_lower_bound(tree, node1, node2, metric),
        TreeKind::Ball => ball_lower_bound(tree, node1, node2, metric),
    }
}

/// Per axis, the bounding-box gap between `node1` and `node2` is
/// `0.5 * ((d1 + |d1|) + (d2 + |d2|))` where `d1 = lo1 - hi2` and
/// `d2 = lo2 - hi1`; at most one of the two terms is ever positive. For
/// `p = infinity` the overall bound is the max gap across axes; otherwise
/// it is the sum of the `p`-th powers of the per-axis gaps, left unrooted
/// as reduced distance.
fn kd_lower_bound<T: TreeView + ?Sized>(tree: &T, node1: usize, node2: usize, metric: &Metric) -> f64 {
    let (lo1, hi1) = tree.kd_bounds(node1).expect("KD tree view must report kd_bounds");
    let (lo2, hi2) = tree.kd_bounds(node2).expect("KD tree view must report kd_bounds");

    let p = metric.p();
    if p.is_infinite() {
        let mut max_gap = 0.0_f64;
        for axis in 0..tree.num_features() {
            max_gap = max_gap.max(axis_gap(lo1[axis], hi1[axis], lo2[axis], hi2[axis]));
        }
        max_gap
    } else {
        let mut rdist_sum = 0.0_f64;
        for axis in 0..tree.num_features() {
            rdist_sum += axis_gap(lo1[axis], hi1[axis], lo2[axis], hi2[axis]).powf(p);
        }
        rdist_sum
    }
}

fn axis_gap(lo1: f64, hi1: f64, lo2: f64, hi2: f64) -> f64 {
    let d1 = lo1 - hi2;
    let d2 = lo2 - hi1;
    0.5 * ((d1 + d1.abs()) + (d2 + d2.abs()))
}

/// Ball-tree node-to-node distance lower bound: `centroid_dist - r1 - r2`,
/// floored at zero, in true-distance units.
fn ball_lower_bound<T: TreeView + ?Sized>(tree: &T, node1: usize, node2: usize, metric: &Metric) -> f64 {
    let c1 = tree.centroid(node1).expect("Ball tree view must report centroid");
    let c2 = tree.centroid(node2).expect("Ball tree view must report centroid");
    let centroid_dist = metric.dist(c1, c2);
    (centroid_dist - tree.radius(node1) - tree.radius(node2)).max(0.0)
}

/// The best candidate merge edge found so far per component, plus a
/// per-node upper bound used to prune subtrees that cannot improve on it.
///
/// For a KD-tree run every distance-valued field is in reduced-distance
/// units; for a Ball-tree run they are true distance. Converting to true
/// distance for edge weights happens only when an edge is emitted.
#[derive(Debug)]
pub struct BoundsState {
    /// `candidate_distance[c]` is the smallest mutual reachability distance
    /// found so far from a point in component `c` to a point outside it.
    /// Only indices that are currently component roots are meaningful.
    pub candidate_distance: Vec<f64>,
    /// The point in component `c` achieving [`Self::candidate_distance`].
    pub candidate_point: Vec<i64>,
    /// The point outside component `c` achieving [`Self::candidate_distance`].
    pub candidate_neighbor: Vec<i64>,
    /// Per-node upper bound on the best candidate distance still reachable
    /// under that node. Lowered only inside leaf-vs-leaf traversals.
    pub bounds: Vec<f64>,
}

impl BoundsState {
    /// Creates a fresh `BoundsState` for `n` points and `m` nodes, with no
    /// candidates found yet.
    #[must_use]
    pub fn new(n: usize, m: usize) -> Self {
        Self {
            candidate_distance: vec![f64::INFINITY; n],
            candidate_point: vec![-1; n],
            candidate_neighbor: vec![-1; n],
            bounds: vec![f64::INFINITY; m],
        }
    }

    /// Clears all per-component candidates found in the previous sweep.
    /// Node bounds are left untouched: the caller decides whether to reset
    /// them (see `BoruvkaConfig::approx_min_span_tree`).
    pub fn reset_candidates(&mut self) {
        self.candidate_distance.fill(f64::INFINITY);
        self.candidate_point.fill(-1);
        self.candidate_neighbor.fill(-1);
    }

    /// Resets every node's bound to "unknown" (infinite), forcing the next
    /// sweep to fully re-derive pruning bounds rather than trust stale
    /// ones that may be too tight for the new component structure.
    pub fn reset_bounds(&mut self) {
        self.bounds.fill(f64::INFINITY);
    }

    /// Offers a new candidate edge for component `component`, keeping it
    /// only if it improves on the one already recorded.
    pub fn offer(&mut self, component: usize, point: usize, neighbor: usize, distance: f64) {
        if distance < self.candidate_distance[component] {
            self.candidate_distance[component] = distance;
            self.candidate_point[component] = point as i64;
            self.candidate_neighbor[component] = neighbor as i64;
        }
    }

    /// Propagates a bound improvement at `node` up through its ancestors.
    ///
    /// For a KD-tree, `parent.bound = max(left.bound, right.bound)`. For a
    /// Ball-tree, the same max is additionally clamped by
    /// `min(left.bound + 2*(r_parent - r_left), right.bound + 2*(r_parent -
    /// r_right))`, but only when the *sum* of the two `radius - child.radius`
    /// terms is positive; otherwise the plain max is used. Propagation
    /// stops as soon as a parent fails to improve.
    pub fn propagate<T: TreeView + ?Sized>(&mut self, tree: &T, mut node: usize) {
        while let Some(parent) = T::parent(node) {
            let (left, right) = T::children(parent);
            let max_term = self.bounds[left].max(self.bounds[right]);

            let candidate = match tree.kind() {
                TreeKind::Kd => max_term,
                TreeKind::Ball => {
                    let slack_left = tree.radius(parent) - tree.radius(left);
                    let slack_right = tree.radius(parent) - tree.radius(right);
                    if slack_left + slack_right > 0.0 {
                        max_term.min(self.bounds[left] + 2.0 * slack_left).min(self.bounds[right] + 2.0 * slack_right)
                    } else {
                        max_term
                    }
                }
            };

            if candidate < self.bounds[parent] {
                self.bounds[parent] = candidate;
                node = parent;
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{axis_gap, geometric_lower_bound, BoundsState};
    use crate::distance_oracle::Metric;
    use crate::tree_view::{TreeKind, TreeView};

    /// A hand-populated `TreeView` with fixed per-node geometry, so the
    /// bound formulas below can be checked against arithmetic worked out by
    /// hand instead of whatever a real tree builder happens to produce.
    struct StubTree {
        kind: TreeKind,
        lo: Vec<Vec<f64>>,
        hi: Vec<Vec<f64>>,
        centroid: Vec<Vec<f64>>,
        radius: Vec<f64>,
    }

    impl TreeView for StubTree {
        fn n(&self) -> usize {
            0
        }
        fn m(&self) -> usize {
            self.radius.len()
        }
        fn num_features(&self) -> usize {
            self.lo.first().map_or(self.centroid.first().map_or(0, Vec::len), Vec::len)
        }
        fn kind(&self) -> TreeKind {
            self.kind
        }
        fn raw_data(&self) -> &[f64] {
            &[]
        }
        fn idx_array(&self) -> &[usize] {
            &[]
        }
        fn idx_start(&self, _node: usize) -> usize {
            0
        }
        fn idx_end(&self, _node: usize) -> usize {
            0
        }
        fn is_leaf(&self, _node: usize) -> bool {
            true
        }
        fn radius(&self, node: usize) -> f64 {
            self.radius[node]
        }
        fn kd_bounds(&self, node: usize) -> Option<(&[f64], &[f64])> {
            if self.kind == TreeKind::Kd {
                Some((&self.lo[node], &self.hi[node]))
            } else {
                None
            }
        }
        fn centroid(&self, node: usize) -> Option<&[f64]> {
            if self.kind == TreeKind::Ball {
                Some(&self.centroid[node])
            } else {
                None
            }
        }
        fn knn_query(&self, _point: usize, _m: usize) -> (Vec<f64>, Vec<usize>) {
            (vec![], vec![])
        }
    }

    fn kd_tree(lo: Vec<Vec<f64>>, hi: Vec<Vec<f64>>) -> StubTree {
        let m = lo.len();
        StubTree { kind: TreeKind::Kd, lo, hi, centroid: vec![], radius: vec![0.0; m] }
    }

    fn ball_tree(centroid: Vec<Vec<f64>>, radius: Vec<f64>) -> StubTree {
        StubTree { kind: TreeKind::Ball, lo: vec![], hi: vec![], centroid, radius }
    }

    #[test]
    fn axis_gap_is_zero_when_ranges_overlap() {
        assert!((axis_gap(0.0, 2.0, 1.0, 3.0) - 0.0).abs() < 1e-12);
    }

    #[test]
    fn axis_gap_is_zero_when_ranges_touch() {
        assert!((axis_gap(0.0, 1.0, 1.0, 2.0) - 0.0).abs() < 1e-12);
    }

    #[test]
    fn axis_gap_is_positive_when_ranges_are_separated() {
        assert!((axis_gap(0.0, 1.0, 4.0, 5.0) - 3.0).abs() < 1e-12);
        // Symmetric in which range comes first.
        assert!((axis_gap(4.0, 5.0, 0.0, 1.0) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn kd_lower_bound_is_zero_when_boxes_overlap() {
        let tree = kd_tree(vec![vec![0.0], vec![1.0]], vec![vec![2.0], vec![3.0]]);
        assert!((geometric_lower_bound(&tree, 0, 1, &Metric::Euclidean) - 0.0).abs() < 1e-12);
    }

    #[test]
    fn kd_lower_bound_is_squared_gap_for_euclidean() {
        // Single axis, gap of 3.0 between [0, 1] and [4, 5]; Euclidean
        // stays in reduced-distance units, so the bound is 3^2 = 9, not 3.
        let tree = kd_tree(vec![vec![0.0], vec![4.0]], vec![vec![1.0], vec![5.0]]);
        assert!((geometric_lower_bound(&tree, 0, 1, &Metric::Euclidean) - 9.0).abs() < 1e-9);
    }

    #[test]
    fn kd_lower_bound_sums_axis_powers_for_manhattan() {
        // Gaps of 3.0 and 5.0 across two axes; Manhattan's rdist is the sum
        // of the (p=1) per-axis gaps, so 3 + 5 = 8.
        let tree = kd_tree(vec![vec![0.0, 0.0], vec![4.0, 6.0]], vec![vec![1.0, 1.0], vec![5.0, 7.0]]);
        assert!((geometric_lower_bound(&tree, 0, 1, &Metric::Manhattan) - 8.0).abs() < 1e-9);
    }

    #[test]
    fn kd_lower_bound_takes_max_across_axes_for_chebyshev() {
        // Same two-axis gaps (3.0, 5.0); Chebyshev's p = infinity path
        // takes the max across axes instead of summing.
        let tree = kd_tree(vec![vec![0.0, 0.0], vec![4.0, 6.0]], vec![vec![1.0, 1.0], vec![5.0, 7.0]]);
        assert!((geometric_lower_bound(&tree, 0, 1, &Metric::Chebyshev) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn ball_lower_bound_floors_at_zero_when_balls_overlap() {
        let tree = ball_tree(vec![vec![0.0], vec![1.0]], vec![5.0, 5.0]);
        assert!((geometric_lower_bound(&tree, 0, 1, &Metric::Euclidean) - 0.0).abs() < 1e-12);
    }

    #[test]
    fn ball_lower_bound_is_centroid_distance_minus_radii() {
        // Centroids 10 apart on a line, radii 2 and 3: 10 - 2 - 3 = 5.
        let tree = ball_tree(vec![vec![0.0], vec![10.0]], vec![2.0, 3.0]);
        assert!((geometric_lower_bound(&tree, 0, 1, &Metric::Euclidean) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn propagate_uses_plain_max_for_kd_trees() {
        // 3-node tree: root 0, children 1 and 2. Kd never applies the
        // parent-bound guard, so the parent's bound is always the plain
        // max of its children's bounds.
        let tree = kd_tree(vec![vec![0.0]; 3], vec![vec![1.0]; 3]);
        let mut state = BoundsState::new(1, 3);
        state.bounds = vec![f64::INFINITY, 2.0, 5.0];
        state.propagate(&tree, 1);
        assert!((state.bounds[0] - 5.0).abs() < 1e-12, "parent bound should be max(2.0, 5.0)");
    }

    #[test]
    fn propagate_applies_ball_guard_when_slack_sum_is_positive() {
        // Parent radius 10, children 9.99 and 0.0: slack_left = 0.01,
        // slack_right = 10.0, sum positive, so the guard applies.
        let tree = ball_tree(vec![vec![0.0]; 3], vec![10.0, 9.99, 0.0]);
        let mut state = BoundsState::new(1, 3);
        state.bounds = vec![f64::INFINITY, 1.0, 20.0];
        state.propagate(&tree, 1);
        // max_term = max(1.0, 20.0) = 20.0
        // left_term = 1.0 + 2*0.01 = 1.02, right_term = 20.0 + 2*10.0 = 40.0
        // candidate = min(20.0, 1.02, 40.0) = 1.02, tighter than the plain max.
        assert!((state.bounds[0] - 1.02).abs() < 1e-9, "guard should tighten below plain max, got {}", state.bounds[0]);
    }

    #[test]
    fn propagate_falls_back_to_max_when_ball_slack_sum_is_not_positive() {
        // Parent radius 1.0, both children radius 5.0: both slacks are
        // negative, sum is negative, guard must not apply.
        let tree = ball_tree(vec![vec![0.0]; 3], vec![1.0, 5.0, 5.0]);
        let mut state = BoundsState::new(1, 3);
        state.bounds = vec![f64::INFINITY, 2.0, 5.0];
        state.propagate(&tree, 1);
        assert!((state.bounds[0] - 5.0).abs() < 1e-12, "negative slack sum should fall back to plain max");
    }

    #[test]
    fn propagate_never_loosens_a_bound() {
        // P6: propagation only ever lowers (or leaves unchanged) a node's
        // bound, never raises it.
        let tree = kd_tree(vec![vec![0.0]; 3], vec![vec![1.0]; 3]);
        let mut state = BoundsState::new(1, 3);
        state.bounds = vec![3.0, 2.0, 5.0];
        let before = state.bounds[0];
        state.propagate(&tree, 1);
        assert!(state.bounds[0] <= before, "bound must not increase");
    }

    #[test]
    fn propagate_stops_as_soon_as_a_parent_does_not_improve() {
        // 7-node tree: root 0, level-1 nodes 1 and 2, leaves 3..6. Node 3's
        // sibling (4) already has a tighter bound than 3's new one, so the
        // candidate for node 1 (max(5.0, 1.0) = 5.0) does not beat node 1's
        // current 3.0 and propagation must stop before touching the root.
        let tree = kd_tree(vec![vec![0.0]; 7], vec![vec![1.0]; 7]);
        let mut state = BoundsState::new(1, 7);
        state.bounds = vec![100.0, 3.0, f64::INFINITY, 5.0, 1.0, f64::INFINITY, f64::INFINITY];
        state.propagate(&tree, 3);
        assert!((state.bounds[1] - 3.0).abs() < 1e-12, "node 1's bound must be untouched");
        assert!((state.bounds[0] - 100.0).abs() < 1e-12, "propagation must not reach the root");
    }
}

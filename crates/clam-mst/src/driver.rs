//! The dual-tree Borůvka sweep driver: repeatedly traverses the tree
//! against itself, finds each component's cheapest outgoing edge, and
//! unions components until one remains.

use crate::bounds::{geometric_lower_bound, BoundsState};
use crate::components::ComponentMap;
use crate::config::BoruvkaConfig;
use crate::core_distance;
use crate::distance_oracle::Metric;
use crate::error::{MstError, MstResult};
use crate::tree_view::{TreeKind, TreeView};
use crate::union_find::UnionFind;

/// One edge of the computed minimum spanning tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    /// One endpoint of the edge.
    pub point_a: usize,
    /// The other endpoint of the edge.
    pub point_b: usize,
    /// The mutual reachability distance between the two endpoints, in true
    /// distance units.
    pub distance: f64,
}

/// Runs the dual-tree Borůvka algorithm against `tree` under `metric`.
///
/// See [`Driver`] for a version that reuses its own core-distance and
/// bound state across repeated calls.
pub fn spanning_tree<T: TreeView + Sync>(tree: &T, metric: Metric, config: BoruvkaConfig) -> MstResult<Vec<Edge>> {
    Driver::new(tree, metric, config)?.spanning_tree()
}

/// Owns the mutable state of a single minimum-spanning-tree computation:
/// core distances, the union-find, per-sweep component assignments, and
/// per-node pruning bounds.
pub struct Driver<'a, T: TreeView> {
    tree: &'a T,
    metric: Metric,
    config: BoruvkaConfig,
    core_distance: Vec<f64>,
    uf: UnionFind,
    components: ComponentMap,
    state: BoundsState,
    edges: Vec<Edge>,
}

impl<'a, T: TreeView + Sync> Driver<'a, T> {
    /// Builds a `Driver`, computing core distances and the initial
    /// candidate seed up front.
    ///
    /// # Errors
    /// Returns [`MstError::PreconditionFailure`] if `config` is invalid for
    /// `tree.n()` points.
    pub fn new(tree: &'a T, metric: Metric, config: BoruvkaConfig) -> MstResult<Self> {
        config.validate(tree.n())?;

        let seed = core_distance::initialize(tree, &metric, config.min_samples, config.n_jobs);
        let uf = UnionFind::new(tree.n());
        let components = ComponentMap::new(tree.n(), tree.m());
        let mut state = BoundsState::new(tree.n(), tree.m());
        state.candidate_point = seed.candidate_point;
        state.candidate_neighbor = seed.candidate_neighbor;
        state.candidate_distance = seed.candidate_distance;

        Ok(Self {
            tree,
            metric,
            config,
            core_distance: seed.core_distance,
            uf,
            components,
            state,
            edges: Vec::with_capacity(tree.n().saturating_sub(1)),
        })
    }

    /// Runs sweeps until a single component remains, returning the
    /// `n - 1` edges of the minimum spanning tree.
    ///
    /// # Errors
    /// Returns [`MstError::NumericDegeneracy`] if a non-finite mutual
    /// reachability distance is computed, or [`MstError::Unreachable`] if
    /// the algorithm terminates without producing exactly `n - 1` edges.
    pub fn spanning_tree(mut self) -> MstResult<Vec<Edge>> {
        // The first sweep reuses the candidate seed from core distance
        // initialization; every later sweep starts from a clean slate.
        self.components.update(&mut self.uf, self.tree);

        let mut sweep = 0usize;
        let mut first_sweep = true;
        while self.uf.num_components() > 1 {
            sweep += 1;
            ftlog::debug!("sweep {sweep}: {} components remaining", self.uf.num_components());

            if !first_sweep {
                self.state.reset_candidates();
            }
            first_sweep = false;

            self.traverse(0, 0)?;
            let merged = self.drain_candidates()?;

            self.components.update(&mut self.uf, self.tree);
            if !self.config.approx_min_span_tree || merged {
                self.state.reset_bounds();
            }
        }

        if self.edges.len() != self.tree.n().saturating_sub(1) {
            return Err(MstError::Unreachable(format!(
                "expected {} edges, produced {}",
                self.tree.n().saturating_sub(1),
                self.edges.len()
            )));
        }

        ftlog::info!("spanning tree complete: {} edges over {sweep} sweeps", self.edges.len());
        Ok(self.edges)
    }

    /// The pairwise distance between `p` and `q`, in whichever units this
    /// run's tree kind uses: reduced distance for a KD-tree, true distance
    /// for a Ball-tree.
    fn pairwise_distance(&self, p: usize, q: usize) -> f64 {
        let (a, b) = (self.tree.point(p), self.tree.point(q));
        match self.tree.kind() {
            TreeKind::Kd => self.metric.rdist(a, b),
            TreeKind::Ball => self.metric.dist(a, b),
        }
    }

    /// The mutual reachability distance between points `p` and `q`, in the
    /// same units as [`Self::pairwise_distance`].
    fn mutual_reachability(&self, p: usize, q: usize) -> MstResult<f64> {
        let d = self.pairwise_distance(p, q) / self.config.alpha;
        let mr = d.max(self.core_distance[p]).max(self.core_distance[q]);
        if mr.is_finite() {
            Ok(mr)
        } else {
            Err(MstError::NumericDegeneracy { point_a: p, point_b: q })
        }
    }

    /// Converts a mutual reachability distance from this run's native units
    /// into true distance, for edge emission.
    fn to_true_distance(&self, native: f64) -> f64 {
        match self.tree.kind() {
            TreeKind::Kd => self.metric.rdist_to_dist(native),
            TreeKind::Ball => native,
        }
    }

    /// Recursively compares `q_node` against `r_node`, pruning whenever the
    /// geometric lower bound between them cannot beat `q_node`'s current
    /// bound, or whenever both nodes are already known to lie in the same
    /// component.
    fn traverse(&mut self, q_node: usize, r_node: usize) -> MstResult<()> {
        let cq = self.components.component_of_node[q_node];
        let cr = self.components.component_of_node[r_node];
        if cq >= 0 && cq == cr {
            return Ok(());
        }

        let node_dist = geometric_lower_bound(self.tree, q_node, r_node, &self.metric);
        if node_dist >= self.state.bounds[q_node] {
            return Ok(());
        }

        let q_leaf = self.tree.is_leaf(q_node);
        let r_leaf = self.tree.is_leaf(r_node);

        if q_leaf && r_leaf {
            self.leaf_pair(q_node, r_node)?;
        } else if q_leaf || (!r_leaf && self.tree.radius(q_node) <= self.tree.radius(r_node)) {
            // Descend in the reference tree, nearer child first.
            let (left, right) = T::children(r_node);
            let (near, far) = self.order_by_distance(q_node, left, right);
            self.traverse(q_node, near)?;
            self.traverse(q_node, far)?;
        } else {
            // Descend in the query tree, nearer child first.
            let (left, right) = T::children(q_node);
            let (near, far) = self.order_by_distance(r_node, left, right);
            self.traverse(near, r_node)?;
            self.traverse(far, r_node)?;
        }
        Ok(())
    }

    /// Orders `left` and `right` (both children of the same parent) by
    /// their geometric lower bound to `fixed`, nearer first. Ties favor
    /// `left`.
    fn order_by_distance(&self, fixed: usize, left: usize, right: usize) -> (usize, usize) {
        let dist_left = geometric_lower_bound(self.tree, fixed, left, &self.metric);
        let dist_right = geometric_lower_bound(self.tree, fixed, right, &self.metric);
        if dist_right < dist_left {
            (right, left)
        } else {
            (left, right)
        }
    }

    /// The brute-force base case: every point in `q_node` against every
    /// point in `r_node`, skipping pairs already in the same component and
    /// points whose own core distance already exceeds their component's
    /// current candidate. Updates only `q_node`'s side of each pair; the
    /// dual-tree traversal visits the reverse node ordering elsewhere to
    /// cover the other side.
    fn leaf_pair(&mut self, q_node: usize, r_node: usize) -> MstResult<()> {
        for &p in self.tree.points_of(q_node) {
            let cp = self.components.component_of_point[p] as usize;
            if self.core_distance[p] > self.state.candidate_distance[cp] {
                continue;
            }
            for &q in self.tree.points_of(r_node) {
                if self.core_distance[q] > self.state.candidate_distance[cp] {
                    continue;
                }
                let cq = self.components.component_of_point[q] as usize;
                if cp == cq {
                    continue;
                }
                let mr = self.mutual_reachability(p, q)?;
                self.state.offer(cp, p, q, mr);
            }
        }

        self.tighten_leaf_bound(q_node);
        Ok(())
    }

    /// After a leaf-vs-leaf comparison, tightens `q_node`'s bound to
    /// `min(new_upper, new_lower + 2 * radius)`, where `new_upper` and
    /// `new_lower` are the max and min candidate distances among `q_node`'s
    /// own points' components. Propagates the improvement upward if it
    /// beats the previous bound.
    fn tighten_leaf_bound(&mut self, q_node: usize) {
        let points = self.tree.points_of(q_node);
        if points.is_empty() {
            return;
        }

        let mut new_upper = 0.0_f64;
        let mut new_lower = f64::INFINITY;
        for &p in points {
            let cp = self.components.component_of_point[p] as usize;
            let candidate = self.state.candidate_distance[cp];
            new_upper = new_upper.max(candidate);
            new_lower = new_lower.min(candidate);
        }

        let radius = self.tree.radius(q_node);
        let radius = match self.tree.kind() {
            TreeKind::Kd => self.metric.dist_to_rdist(radius),
            TreeKind::Ball => radius,
        };
        let new_bound = new_upper.min(new_lower + 2.0 * radius);

        if new_bound < self.state.bounds[q_node] {
            self.state.bounds[q_node] = new_bound;
            self.state.propagate(self.tree, q_node);
        }
    }

    /// Unions each component with its best candidate neighbor found this
    /// sweep. Returns whether any merge actually happened.
    fn drain_candidates(&mut self) -> MstResult<bool> {
        let mut merged = false;
        for component in self.uf.components().collect::<Vec<_>>() {
            let distance = self.state.candidate_distance[component];
            let (p, q) = (self.state.candidate_point[component], self.state.candidate_neighbor[component]);
            if p < 0 || q < 0 {
                continue;
            }
            let (p, q) = (p as usize, q as usize);

            if !self.uf.union(p, q) {
                // Already joined earlier this sweep by another component's edge.
                self.state.candidate_point[component] = -1;
                self.state.candidate_neighbor[component] = -1;
                self.state.candidate_distance[component] = f64::INFINITY;
                continue;
            }

            let true_distance = self.to_true_distance(distance);
            ftlog::trace!("merged {p} and {q} at distance {true_distance}");
            self.edges.push(Edge { point_a: p, point_b: q, distance: true_distance });
            merged = true;

            if self.edges.len() == self.tree.n().saturating_sub(1) {
                self.components.update(&mut self.uf, self.tree);
                return Ok(merged);
            }
        }
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::spanning_tree;
    use crate::config::BoruvkaConfig;
    use crate::distance_oracle::Metric;
    use crate::test_support::{ReferenceBallTree, ReferenceKdTree};

    fn total_weight(edges: &[super::Edge]) -> f64 {
        edges.iter().map(|e| e.distance).sum()
    }

    #[test]
    fn single_point_has_no_edges() {
        let tree = ReferenceKdTree::from_rows(&[vec![0.0, 0.0]], 4);
        let edges = spanning_tree(&tree, Metric::Euclidean, BoruvkaConfig { min_samples: 1, ..Default::default() }).unwrap();
        assert!(edges.is_empty());
    }

    #[test]
    fn kd_tree_produces_n_minus_one_edges_and_connects_everything() {
        let rows: Vec<Vec<f64>> = (0..30).map(|i| vec![f64::from(i), f64::from(i % 5)]).collect();
        let tree = ReferenceKdTree::from_rows(&rows, 4);
        let edges = spanning_tree(&tree, Metric::Euclidean, BoruvkaConfig { min_samples: 2, ..Default::default() }).unwrap();
        assert_eq!(edges.len(), 29);

        let mut uf = crate::union_find::UnionFind::new(30);
        for e in &edges {
            uf.union(e.point_a, e.point_b);
        }
        assert_eq!(uf.num_components(), 1);
    }

    #[test]
    fn ball_tree_produces_n_minus_one_edges_and_connects_everything() {
        let rows: Vec<Vec<f64>> = (0..30).map(|i| vec![f64::from(i), f64::from((i * 7) % 11)]).collect();
        let tree = ReferenceBallTree::from_rows(&rows, 4);
        let edges = spanning_tree(&tree, Metric::Euclidean, BoruvkaConfig { min_samples: 2, ..Default::default() }).unwrap();
        assert_eq!(edges.len(), 29);

        let mut uf = crate::union_find::UnionFind::new(30);
        for e in &edges {
            uf.union(e.point_a, e.point_b);
        }
        assert_eq!(uf.num_components(), 1);
    }

    #[test]
    fn kd_and_ball_trees_agree_on_total_weight_for_min_samples_one() {
        let rows: Vec<Vec<f64>> = (0..25).map(|i| vec![f64::from(i * 3 % 17), f64::from(i * 5 % 13)]).collect();
        let kd = ReferenceKdTree::from_rows(&rows, 4);
        let ball = ReferenceBallTree::from_rows(&rows, 4);

        let kd_edges = spanning_tree(&kd, Metric::Euclidean, BoruvkaConfig { min_samples: 1, ..Default::default() }).unwrap();
        let ball_edges = spanning_tree(&ball, Metric::Euclidean, BoruvkaConfig { min_samples: 1, ..Default::default() }).unwrap();

        assert!((total_weight(&kd_edges) - total_weight(&ball_edges)).abs() < 1e-6);
    }

    #[test]
    fn larger_alpha_never_increases_total_weight() {
        let rows: Vec<Vec<f64>> = (0..20).map(|i| vec![f64::from(i)]).collect();
        let tree = ReferenceKdTree::from_rows(&rows, 4);
        let base = spanning_tree(&tree, Metric::Euclidean, BoruvkaConfig { min_samples: 1, alpha: 1.0, ..Default::default() }).unwrap();
        let scaled = spanning_tree(&tree, Metric::Euclidean, BoruvkaConfig { min_samples: 1, alpha: 2.0, ..Default::default() }).unwrap();
        assert!(total_weight(&scaled) <= total_weight(&base) + 1e-9);
    }

    #[test]
    fn rejects_min_samples_larger_than_point_count() {
        let tree = ReferenceKdTree::from_rows(&[vec![0.0], vec![1.0]], 4);
        let result = spanning_tree(&tree, Metric::Euclidean, BoruvkaConfig { min_samples: 5, ..Default::default() });
        assert!(result.is_err());
    }

    #[test]
    fn chebyshev_metric_on_a_kd_tree_produces_a_valid_spanning_tree() {
        let rows: Vec<Vec<f64>> = (0..20).map(|i| vec![f64::from(i % 7), f64::from(i % 3)]).collect();
        let tree = ReferenceKdTree::with_metric(&rows, 4, Metric::Chebyshev);
        let edges = spanning_tree(&tree, Metric::Chebyshev, BoruvkaConfig { min_samples: 1, ..Default::default() }).unwrap();
        assert_eq!(edges.len(), 19);
    }
}

//! Per-point and per-node component assignments, derived from the
//! [`UnionFind`] after each sweep.

use crate::tree_view::TreeView;
use crate::union_find::UnionFind;

/// Derived component bookkeeping that enables O(1) pruning tests during
/// traversal.
///
/// `component_of_node[n]` is non-negative iff every point under node `n` is
/// in the same component, in which case it holds that component's id.
/// Otherwise it holds a sentinel negative value unique to `n`, so two mixed
/// nodes never compare equal.
#[derive(Debug)]
pub struct ComponentMap {
    /// `component_of_point[p]` is the UnionFind root of point `p`.
    pub component_of_point: Vec<i64>,
    /// See the type-level docs.
    pub component_of_node: Vec<i64>,
}

/// Returns the sentinel value used for a mixed-component node, guaranteed
/// to be unique to `node` and never equal to a valid (non-negative)
/// component id.
fn mixed_sentinel(node: usize) -> i64 {
    -(node as i64) - 1
}

impl ComponentMap {
    /// Creates a new `ComponentMap` for `n` points and `m` nodes, with every
    /// entry set to the "unknown" sentinel.
    #[must_use]
    pub fn new(n: usize, m: usize) -> Self {
        Self {
            component_of_point: vec![-1; n],
            component_of_node: (0..m).map(|node| mixed_sentinel(node)).collect(),
        }
    }

    /// Recomputes `component_of_point` from `uf`, then recomputes
    /// `component_of_node` bottom-up over `tree`'s implicit layout.
    ///
    /// Node ids are processed from `m - 1` down to `0`: because children of
    /// node `n` are always `2n + 1` and `2n + 2` (strictly greater than
    /// `n`), a single reverse pass guarantees every node's children are
    /// resolved before the node itself.
    pub fn update<T: TreeView + ?Sized>(&mut self, uf: &mut UnionFind, tree: &T) {
        for p in 0..self.component_of_point.len() {
            self.component_of_point[p] = uf.find(p) as i64;
        }

        for node in (0..self.component_of_node.len()).rev() {
            self.component_of_node[node] = if tree.is_leaf(node) {
                self.leaf_component(tree, node)
            } else {
                let (left, right) = T::children(node);
                let (lc, rc) = (self.component_of_node[left], self.component_of_node[right]);
                if lc >= 0 && lc == rc {
                    lc
                } else {
                    mixed_sentinel(node)
                }
            };
        }
    }

    /// Returns the common component of `node`'s points, or a sentinel if
    /// they disagree.
    fn leaf_component<T: TreeView + ?Sized>(&self, tree: &T, node: usize) -> i64 {
        let points = tree.points_of(node);
        let Some(&first_point) = points.first() else {
            return mixed_sentinel(node);
        };
        let first = self.component_of_point[first_point];
        if points.iter().all(|&p| self.component_of_point[p] == first) {
            first
        } else {
            mixed_sentinel(node)
        }
    }
}

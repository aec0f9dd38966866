//! The narrow interface this engine consumes a spatial tree through.
//!
//! Building the tree itself — partitioning points into a KD-tree or
//! Ball-tree — is an external collaborator's job. This module only
//! describes what the Borůvka driver needs to read off an already-built
//! tree.

/// Which family of spatial tree a [`TreeView`] describes.
///
/// The two kinds differ in (a) whether `rdist` is used throughout the
/// traversal, (b) which node-to-node lower-bound formula applies, (c)
/// whether pairwise centroid distances are precomputed, and (d) how parent
/// bounds are composed from children. Both share the same union-find and
/// driver machinery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeKind {
    /// Axis-aligned bounding boxes; lower bounds come from per-axis
    /// min/max extents.
    Kd,
    /// Bounding hyperspheres; lower bounds come from centroid distances
    /// minus radii.
    Ball,
}

/// A read-only adapter over an externally-built spatial tree.
///
/// Node ids are dense integers in `[0, m())`; node `0` is the root, and for
/// an inner node `n` its children are `2n + 1` and `2n + 2`. Point ids are
/// dense integers in `[0, n())`. The tree owns a permutation `idx_array`
/// such that the points belonging to node `n` are
/// `idx_array()[idx_start(n)..idx_end(n)]`.
pub trait TreeView {
    /// The number of points in the tree.
    fn n(&self) -> usize;

    /// The number of nodes in the tree.
    fn m(&self) -> usize;

    /// The dimensionality of each point.
    fn num_features(&self) -> usize;

    /// Which kind of spatial tree this is.
    fn kind(&self) -> TreeKind;

    /// The row-major, flat data buffer: `n() * num_features()` entries.
    fn raw_data(&self) -> &[f64];

    /// The point-index permutation: points of node `n` are
    /// `idx_array()[idx_start(n)..idx_end(n)]`.
    fn idx_array(&self) -> &[usize];

    /// The start (inclusive) of node `node`'s slice into [`Self::idx_array`].
    fn idx_start(&self, node: usize) -> usize;

    /// The end (exclusive) of node `node`'s slice into [`Self::idx_array`].
    fn idx_end(&self, node: usize) -> usize;

    /// Whether `node` is a leaf (has no children).
    fn is_leaf(&self, node: usize) -> bool;

    /// The radius of `node`: the true-distance bound used both for
    /// query/reference descent ordering and for the bounds formulas of
    /// §4.5/§4.6. Always reported in true-distance units, regardless of
    /// tree kind.
    fn radius(&self, node: usize) -> f64;

    /// For a KD-tree node, the per-axis `(lo, hi)` bounds, each of length
    /// [`Self::num_features`]. `None` for Ball-tree views.
    fn kd_bounds(&self, node: usize) -> Option<(&[f64], &[f64])>;

    /// For a Ball-tree node, the centroid vector, of length
    /// [`Self::num_features`]. `None` for KD-tree views.
    fn centroid(&self, node: usize) -> Option<&[f64]>;

    /// Queries the tree for `point`'s `m` nearest neighbors, including
    /// itself at rank 0.
    ///
    /// Returns `(distances, indices)`, both of length `m`, sorted ascending
    /// by distance. Implementations must break ties deterministically
    /// (e.g. by point id) so that results are stable regardless of how the
    /// caller partitions work across threads.
    fn knn_query(&self, point: usize, m: usize) -> (Vec<f64>, Vec<usize>);

    /// Returns the point ids belonging to the subtree rooted at `node`.
    fn points_of(&self, node: usize) -> &[usize] {
        &self.idx_array()[self.idx_start(node)..self.idx_end(node)]
    }

    /// Returns the feature vector of point `p`.
    fn point(&self, p: usize) -> &[f64] {
        let d = self.num_features();
        &self.raw_data()[p * d..(p + 1) * d]
    }

    /// Returns the node ids of `node`'s left and right children.
    ///
    /// Only meaningful when `!self.is_leaf(node)`.
    fn children(node: usize) -> (usize, usize) {
        (2 * node + 1, 2 * node + 2)
    }

    /// Returns the node id of `node`'s parent, or `None` for the root.
    fn parent(node: usize) -> Option<usize> {
        if node == 0 {
            None
        } else {
            Some((node - 1) / 2)
        }
    }
}

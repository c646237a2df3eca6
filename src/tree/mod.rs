//! Segment tree engine
//!
//! Flat arena of `4L + 5` slots with implicit index arithmetic:
//! root at slot 1, children of slot `i` at `2i` and `2i + 1`.
//! Every internal slot holds `merge(left, right)` for the active
//! merge function; leaves hold the literal user values.
//!
//! Each operation records which slots it touched, both on the nodes
//! themselves (read-and-reset via [`SegmentTree::take_trace`]) and in an
//! explicit [`Trace`].

mod node;
mod trace;

pub use node::{Highlight, Node, NodeSpan};
pub use trace::Trace;

use crate::algebra::{modular, MergeFn};

/// Slot index of the root. The child arithmetic depends on it being 1.
pub const ROOT_INDEX: usize = 1;

/// Arena size for `leaf_count` leaves
pub fn tree_capacity(leaf_count: usize) -> usize {
    4 * leaf_count + 5
}

/// Segment tree over a fixed, power-of-two number of leaves
#[derive(Debug, Clone)]
pub struct SegmentTree {
    /// Slot arena, index 0 unused
    nodes: Vec<Node>,

    /// Authoritative copy of the leaf values
    leaves: Vec<Node>,

    /// Active merge function
    merge_fn: MergeFn,

    /// Slots touched by the last operation
    trace: Trace,
}

impl SegmentTree {
    /// Build with the default merge function ([`MergeFn::Sum`])
    ///
    /// # Panics
    ///
    /// If `values.len()` is not a power of two `>= 2`.
    pub fn build(values: &[i32]) -> Self {
        Self::with_merge_fn(values, MergeFn::default())
    }

    /// Build with an explicit merge function
    pub fn with_merge_fn(values: &[i32], merge_fn: MergeFn) -> Self {
        let leaves = values.iter().copied().map(Node::new).collect();
        Self::from_leaves(leaves, merge_fn)
    }

    /// Build from leaf nodes, highlight tags included
    ///
    /// A highlighted leaf is copied into its slot and recorded in the trace,
    /// so the first render shows it.
    pub fn from_leaves(leaves: Vec<Node>, merge_fn: MergeFn) -> Self {
        let leaf_count = leaves.len();
        assert!(
            leaf_count >= 2 && leaf_count.is_power_of_two(),
            "leaf count must be a power of two >= 2, got {}",
            leaf_count
        );

        let capacity = tree_capacity(leaf_count);
        let mut tree = Self {
            nodes: vec![Node::default(); capacity],
            leaves,
            merge_fn,
            trace: Trace::with_capacity(capacity),
        };
        tree.build_span(NodeSpan::root(leaf_count), false);

        tracing::info!(
            leaf_count,
            merge_fn = %merge_fn,
            values = ?tree.leaves.iter().map(|leaf| leaf.value).collect::<Vec<_>>(),
            "generated new segment tree"
        );
        tree
    }

    /// Set leaf `index` to `value` and recompute its ancestors
    ///
    /// Marks the root-to-leaf route `Path` and the leaf `Compute`.
    ///
    /// # Panics
    ///
    /// If `index >= leaf_count()`.
    pub fn update(&mut self, index: usize, value: i32) {
        assert!(
            index < self.leaf_count(),
            "update index {} out of range for {} leaves",
            index,
            self.leaf_count()
        );

        self.begin_operation();
        self.update_span(self.root_span(), index, value);

        tracing::info!(index, value, root = self.root().value, "updated leaf");
    }

    /// Aggregate of leaves `l..=r` under the active merge function, in `[0, P-1]`
    ///
    /// Marks the canonical decomposition set `Compute` and every other
    /// traversed slot `Path`.
    ///
    /// # Panics
    ///
    /// Unless `l <= r < leaf_count()`.
    pub fn range_query(&mut self, l: usize, r: usize) -> i32 {
        assert!(
            l <= r && r < self.leaf_count(),
            "query range [{}, {}] invalid for {} leaves",
            l,
            r,
            self.leaf_count()
        );

        self.begin_operation();
        let result = modular::reduce(self.query_span(self.root_span(), l, r) as i64);

        tracing::debug!(
            l,
            r,
            result,
            decomposition = ?self.trace.compute_indices(),
            "range query"
        );
        result
    }

    /// Toggle Sum/Product and rebuild every internal slot
    ///
    /// Leaves keep their values and pending highlights stay in place.
    /// Returns the new merge function.
    pub fn flip_merge_fn(&mut self) -> MergeFn {
        let previous = self.merge_fn;
        self.merge_fn = previous.flipped();

        self.build_span(self.root_span(), true);

        tracing::info!(from = %previous, to = %self.merge_fn, "updated merge function");
        self.merge_fn
    }

    /// Active merge function
    pub fn merge_fn(&self) -> MergeFn {
        self.merge_fn
    }

    /// Combine two values with the active merge function
    pub fn merge(&self, left: i32, right: i32) -> i32 {
        self.merge_fn.combine(left, right)
    }

    /// Number of leaves `L`
    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    /// Levels below the root (log2 L)
    pub fn height(&self) -> usize {
        self.root_span().height()
    }

    /// Span of the root slot
    pub fn root_span(&self) -> NodeSpan {
        NodeSpan::root(self.leaf_count())
    }

    /// Root slot
    pub fn root(&self) -> &Node {
        &self.nodes[ROOT_INDEX]
    }

    /// Leaf `index` from the authoritative leaf copy
    pub fn leaf(&self, index: usize) -> &Node {
        &self.leaves[index]
    }

    /// All leaves in order
    pub fn leaves(&self) -> &[Node] {
        &self.leaves
    }

    /// Arena slot `tree_index`
    pub fn node_at(&self, tree_index: usize) -> &Node {
        &self.nodes[tree_index]
    }

    /// The whole arena, slot 0 included
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Trace of the last operation, not yet consumed
    pub fn last_trace(&self) -> &Trace {
        &self.trace
    }

    /// Hand over the last trace and reset the highlights it set
    pub fn take_trace(&mut self) -> Trace {
        for (index, _) in self.trace.iter() {
            self.nodes[index].take_highlight();
        }
        let taken = self.trace.clone();
        self.trace.clear();
        taken
    }

    /// Drop highlights left over from an operation nobody rendered
    fn begin_operation(&mut self) {
        if !self.trace.is_empty() {
            self.take_trace();
        }
    }

    fn mark(&mut self, index: usize, highlight: Highlight) {
        self.nodes[index].highlight = highlight;
        self.trace.mark(index, highlight);
    }

    fn pull(&mut self, index: usize) {
        let merged = self.merge(self.nodes[2 * index].value, self.nodes[2 * index + 1].value);
        self.nodes[index].value = merged;
    }

    /// Post-order fill; with `rebuild` the leaf slots are left alone
    fn build_span(&mut self, span: NodeSpan, rebuild: bool) {
        if span.is_leaf() {
            if !rebuild {
                let leaf = self.leaves[span.left];
                self.nodes[span.index] = leaf;
                if leaf.highlight != Highlight::Default {
                    self.trace.mark(span.index, leaf.highlight);
                }
            }
            return;
        }

        let (left, right) = span.children();
        self.build_span(left, rebuild);
        self.build_span(right, rebuild);
        self.pull(span.index);
    }

    fn update_span(&mut self, span: NodeSpan, target: usize, value: i32) {
        self.mark(span.index, Highlight::Path);

        if span.is_leaf() {
            self.mark(span.index, Highlight::Compute);
            self.nodes[span.index].value = value;
            self.leaves[target].value = value;
            return;
        }

        let (left, right) = span.children();
        if target <= span.midpoint() {
            self.update_span(left, target, value);
        } else {
            self.update_span(right, target, value);
        }
        self.pull(span.index);
    }

    fn query_span(&mut self, span: NodeSpan, l: usize, r: usize) -> i32 {
        // Only reachable through clipping below
        if l > r {
            return self.merge_fn.identity();
        }

        if span.left == l && span.right == r {
            self.mark(span.index, Highlight::Compute);
            let value = self.nodes[span.index].value;
            tracing::trace!(span = %span, value, "decomposition node");
            return value;
        }
        self.mark(span.index, Highlight::Path);

        let mid = span.midpoint();
        let (left, right) = span.children();
        let left_value = self.query_span(left, l, r.min(mid));
        let right_value = self.query_span(right, l.max(mid + 1), r);
        self.merge(left_value, right_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_to(n: i32) -> Vec<i32> {
        (1..=n).collect()
    }

    #[test]
    fn test_capacity_from_leaf_count() {
        let tree = SegmentTree::build(&one_to(16));
        assert_eq!(tree.nodes().len(), 69);
        assert_eq!(tree.height(), 4);
    }

    #[test]
    fn test_internal_slots_merge_children() {
        let tree = SegmentTree::build(&one_to(8));
        for index in 1..8 {
            let expected = tree.node_at(2 * index).value + tree.node_at(2 * index + 1).value;
            assert_eq!(tree.node_at(index).value, expected);
        }
        for k in 0..8 {
            assert_eq!(tree.node_at(8 + k).value, tree.leaf(k).value);
        }
    }

    #[test]
    fn test_update_marks_route() {
        let mut tree = SegmentTree::build(&one_to(4));
        tree.update(2, 10);

        // root 1 -> [2,3] at slot 3 -> leaf 2 at slot 6
        assert_eq!(tree.node_at(1).highlight, Highlight::Path);
        assert_eq!(tree.node_at(3).highlight, Highlight::Path);
        assert_eq!(tree.node_at(6).highlight, Highlight::Compute);
        assert_eq!(tree.node_at(2).highlight, Highlight::Default);
        assert_eq!(tree.leaf(2).value, 10);
        assert_eq!(tree.root().value, 1 + 2 + 10 + 4);
    }

    #[test]
    fn test_empty_clip_marks_nothing() {
        let mut tree = SegmentTree::build(&one_to(4));
        assert_eq!(tree.range_query(0, 1), 3);

        // [0, 1] is exactly slot 2; slot 3 is never visited
        assert_eq!(tree.last_trace().compute_indices(), vec![2]);
        assert_eq!(tree.last_trace().path_indices(), vec![1]);
        assert_eq!(tree.node_at(3).highlight, Highlight::Default);
    }

    #[test]
    fn test_take_trace_resets_highlights() {
        let mut tree = SegmentTree::build(&one_to(8));
        tree.range_query(1, 6);
        let trace = tree.take_trace();

        assert!(!trace.is_empty());
        assert!(tree.last_trace().is_empty());
        assert!(tree.nodes().iter().all(|n| n.highlight == Highlight::Default));
    }

    #[test]
    fn test_new_operation_clears_previous_trail() {
        let mut tree = SegmentTree::build(&one_to(8));
        tree.range_query(0, 0);
        tree.update(7, 1);

        assert_eq!(tree.node_at(8).highlight, Highlight::Default);
        assert_eq!(tree.node_at(15).highlight, Highlight::Compute);
    }

    #[test]
    fn test_flip_leaves_untouched() {
        let mut tree = SegmentTree::build(&[2, 3, 4, 5]);
        assert_eq!(tree.flip_merge_fn(), MergeFn::Product);
        assert_eq!(tree.root().value, 120);
        assert_eq!(tree.leaves().iter().map(|n| n.value).collect::<Vec<_>>(), vec![2, 3, 4, 5]);
        assert!(tree.last_trace().is_empty());
    }

    #[test]
    fn test_flip_keeps_pending_trail() {
        let mut tree = SegmentTree::build(&one_to(4));
        tree.range_query(1, 2);
        let before = tree.last_trace().clone();

        tree.flip_merge_fn();
        assert_eq!(tree.last_trace(), &before);
        assert_eq!(tree.node_at(5).highlight, Highlight::Compute);
    }

    #[test]
    fn test_from_leaves_carries_highlights() {
        let leaves = vec![
            Node::new(1),
            Node::with_highlight(2, Highlight::Path),
            Node::new(3),
            Node::with_highlight(4, Highlight::Compute),
        ];
        let mut tree = SegmentTree::from_leaves(leaves, MergeFn::Sum);

        assert_eq!(tree.node_at(5).highlight, Highlight::Path);
        assert_eq!(tree.node_at(7).highlight, Highlight::Compute);
        assert_eq!(tree.last_trace().path_indices(), vec![5]);
        assert_eq!(tree.last_trace().compute_indices(), vec![7]);
        assert_eq!(tree.root().highlight, Highlight::Default);

        // Consumed once, like any other trail; the leaf copy keeps its tag
        tree.take_trace();
        assert_eq!(tree.node_at(5).highlight, Highlight::Default);
        assert_eq!(tree.leaf(1).highlight, Highlight::Path);
    }

    #[test]
    fn test_take_trace_reuses_buffer() {
        let mut tree = SegmentTree::build(&one_to(8));
        tree.update(5, 0);
        let taken = tree.take_trace();

        assert_eq!(taken.compute_indices(), vec![13]);
        assert!(tree.last_trace().is_empty());
        assert_eq!(tree.last_trace().highlight_of(13), Highlight::Default);
    }

    #[test]
    fn test_leaves_are_not_reduced() {
        let big = i32::MAX;
        let mut tree = SegmentTree::build(&[big, 0]);
        assert_eq!(tree.leaf(0).value, big);
        assert_eq!(tree.node_at(2).value, big);
        assert_eq!(tree.range_query(0, 0), modular::reduce(big as i64));
    }

    #[test]
    #[should_panic(expected = "power of two")]
    fn test_rejects_non_power_of_two() {
        SegmentTree::build(&one_to(6));
    }

    #[test]
    #[should_panic(expected = "query range")]
    fn test_rejects_reversed_range() {
        SegmentTree::build(&one_to(4)).range_query(3, 1);
    }

    #[test]
    #[should_panic(expected = "update index")]
    fn test_rejects_out_of_range_update() {
        SegmentTree::build(&one_to(4)).update(4, 0);
    }
}

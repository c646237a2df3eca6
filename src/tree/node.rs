//! Tree slots and their implicit intervals
//!
//! Slot `i` covers leaves `[left, right]`.
//! Children computed via midpoint: m = left + (right - left) / 2
//!   Left child:  slot 2i,     [left, m]
//!   Right child: slot 2i + 1, [m+1, right]

use std::fmt;

/// Transient tag recording how the last operation used a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Highlight {
    /// Untouched
    #[default]
    Default,

    /// Traversed on the way to the answer
    Path,

    /// Value used directly (query decomposition or updated leaf)
    Compute,
}

/// A single tree slot: value plus highlight tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Node {
    /// Literal user value for leaves, merged aggregate for internal slots
    pub value: i32,

    /// Highlight left by the most recent operation
    pub highlight: Highlight,
}

impl Node {
    /// Unhighlighted node with the given value
    pub fn new(value: i32) -> Self {
        Self {
            value,
            highlight: Highlight::Default,
        }
    }

    /// Node carrying an explicit highlight (restored from a saved tree)
    pub fn with_highlight(value: i32, highlight: Highlight) -> Self {
        Self { value, highlight }
    }

    /// Read the highlight and reset it to [`Highlight::Default`]
    pub fn take_highlight(&mut self) -> Highlight {
        std::mem::take(&mut self.highlight)
    }
}

/// Position of a slot in the implicit tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeSpan {
    /// 1-based slot index in the node arena
    pub index: usize,

    /// Leftmost leaf covered (inclusive)
    pub left: usize,

    /// Rightmost leaf covered (inclusive)
    pub right: usize,
}

impl NodeSpan {
    /// Root spanning `[0, leaf_count - 1]`
    pub fn root(leaf_count: usize) -> Self {
        debug_assert!(leaf_count > 0, "tree needs at least one leaf");
        Self {
            index: super::ROOT_INDEX,
            left: 0,
            right: leaf_count - 1,
        }
    }

    /// Check if leaf (unit interval)
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.left == self.right
    }

    /// Number of leaves covered
    #[inline]
    pub fn length(&self) -> usize {
        self.right - self.left + 1
    }

    /// Last leaf of the left child
    #[inline]
    pub fn midpoint(&self) -> usize {
        self.left + (self.right - self.left) / 2
    }

    /// Get children via midpoint split
    pub fn children(&self) -> (NodeSpan, NodeSpan) {
        debug_assert!(!self.is_leaf(), "Leaf has no children");

        let mid = self.midpoint();
        let left_child = NodeSpan {
            index: 2 * self.index,
            left: self.left,
            right: mid,
        };
        let right_child = NodeSpan {
            index: 2 * self.index + 1,
            left: mid + 1,
            right: self.right,
        };

        (left_child, right_child)
    }

    /// Distance to the leaves (0 for a leaf)
    ///
    /// Every subtree of a power-of-two tree is perfect, so this is log2(length).
    pub fn height(&self) -> usize {
        self.length().ilog2() as usize
    }
}

impl fmt::Display for NodeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_leaf() {
            write!(f, "#{} [{}]", self.index, self.left)
        } else {
            write!(f, "#{} [{}, {}]", self.index, self.left, self.right)
        }
    }
}

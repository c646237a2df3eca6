//! # Segment Tree Visualizer
//!
//! Range aggregates over a fixed-size array, with a picture of which
//! tree nodes each operation touched.
//!
//! ## Core Algorithm
//!
//! 1. **Flat arena**: `4L + 5` slots, root at 1, children of `i` at `2i`, `2i + 1`
//! 2. **Midpoint recursion**: build, point update and range decomposition in O(log L)
//! 3. **Modular merge**: sum or product modulo P = 1,000,000,007
//! 4. **Leveled text layout**: branch padding grows geometrically with height,
//!    so sibling subtrees stay aligned column by column
//!
//! ## Usage Example
//!
//! ```
//! use segviz::{render::ColorStyle, SegmentTree, TreeRenderer};
//!
//! let values: Vec<i32> = (1..=16).collect();
//! let mut tree = SegmentTree::build(&values);
//! assert_eq!(tree.range_query(0, 15), 136);
//!
//! let picture = TreeRenderer::new(5, ColorStyle::Plain).render(&mut tree);
//! assert_eq!(picture.lines().count(), 5);
//! ```

#![warn(missing_docs, missing_debug_implementations)]
#![allow(clippy::new_without_default)]

// Core modules
pub mod algebra;     // Merge functions and modular arithmetic
pub mod tree;        // Segment tree engine
pub mod render;      // ASCII tree layout
// Collaborators
pub mod config;      // Session constants
pub mod persistence; // JSON snapshots
pub mod session;     // Console command interpreter

// Re-exports for convenience
pub use algebra::{MergeFn, MODULUS};
pub use config::{ConfigError, TreeConfig};
pub use persistence::{JsonStore, PersistError, TreeSnapshot};
pub use render::TreeRenderer;
pub use session::{Command, Outcome, Session, SessionError};
pub use tree::{Highlight, Node, NodeSpan, SegmentTree, Trace};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_builds_renderable_tree() {
        let config = TreeConfig::default().validate().expect("valid config");
        let values: Vec<i32> = (1..=config.leaf_count as i32).collect();
        let mut tree = SegmentTree::with_merge_fn(&values, config.default_merge_fn);

        let text = config.renderer().render(&mut tree);
        assert_eq!(text.lines().count(), tree.height() + 1);
    }
}

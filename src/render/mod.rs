//! Text rendering of a segment tree
//!
//! Two passes over the implicit tree:
//! 1. Post-order: format every slot into a fixed-width cell. A slot at
//!    height `h` is flanked by `/---` and `---\` branches whose padding
//!    grows geometrically with `h`, so sibling subtrees stay aligned.
//! 2. Breadth-first: concatenate the cells of each level, one line per
//!    level, root first.
//!
//! With `L` leaves and node width `W`, every line is `2·L·W` columns wide
//! once escape codes are stripped.

mod style;

pub use style::{ansi_color, highlight_from_ansi, legend, strip_ansi, ColorStyle, ANSI_RESET};

use std::collections::VecDeque;

use crate::tree::{Highlight, NodeSpan, SegmentTree, Trace};

/// Default width of a formatted node value
pub const DEFAULT_NODE_WIDTH: usize = 5;

/// Renders a [`SegmentTree`] as leveled ASCII art
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeRenderer {
    node_width: usize,
    style: ColorStyle,
}

impl Default for TreeRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_NODE_WIDTH, ColorStyle::Ansi)
    }
}

impl TreeRenderer {
    /// Renderer with the given cell width and color style
    pub fn new(node_width: usize, style: ColorStyle) -> Self {
        assert!(node_width > 0, "node width must be greater than zero");
        Self { node_width, style }
    }

    /// Render the tree, consuming its highlights
    ///
    /// Afterwards every slot is back to [`Highlight::Default`].
    pub fn render(&self, tree: &mut SegmentTree) -> String {
        let trace = tree.take_trace();
        self.render_traced(tree, &trace)
    }

    /// Render from node values and an explicit trace, without touching the tree
    pub fn render_traced(&self, tree: &SegmentTree, trace: &Trace) -> String {
        let mut cells = vec![String::new(); tree.nodes().len()];
        self.render_subtree(tree, trace, tree.root_span(), &mut cells);
        combine_levels(tree.root_span(), &cells)
    }

    /// Post-order pass; returns the height of `span`
    fn render_subtree(
        &self,
        tree: &SegmentTree,
        trace: &Trace,
        span: NodeSpan,
        cells: &mut [String],
    ) -> usize {
        let mut height = 0;
        if !span.is_leaf() {
            let (left, right) = span.children();
            // Perfect tree: both subtrees have the same height
            self.render_subtree(tree, trace, left, cells);
            height = self.render_subtree(tree, trace, right, cells) + 1;
        }

        let value = self.format_value(tree.node_at(span.index).value, trace.highlight_of(span.index));
        cells[span.index] = self.render_cell(&value, height);
        height
    }

    fn render_cell(&self, value: &str, height: usize) -> String {
        let width = self.node_width;
        if height == 0 {
            return format!("{}{}", value, " ".repeat(width));
        }

        let padding = branch_padding(height, width);
        let mut cell = String::with_capacity(6 * padding + 2 * width + 2 + value.len());
        cell.push_str(&" ".repeat(padding));
        cell.push('/');
        cell.push_str(&"-".repeat(padding));
        cell.push_str(value);
        cell.push_str(&"-".repeat(padding));
        cell.push('\\');
        cell.push_str(&" ".repeat(padding));
        cell.push_str(&" ".repeat(width));
        cell
    }

    /// Center `value` in the cell and wrap it in the highlight color
    fn format_value(&self, value: i32, highlight: Highlight) -> String {
        let text = value.to_string();
        let remaining = self.node_width.saturating_sub(text.len());
        let left = remaining / 2;
        let right = remaining - left;

        format!(
            "{}{}{}{}{}",
            self.style.prefix(highlight),
            " ".repeat(left),
            text,
            " ".repeat(right),
            self.style.suffix()
        )
    }
}

/// Branch padding at `height`: half the previous level's node count,
/// in cells, plus the gaps between them, plus half a cell
fn branch_padding(height: usize, node_width: usize) -> usize {
    let half_count = (1usize << (height - 1)) >> 1;
    half_count * node_width + half_count.saturating_sub(1) * node_width + node_width / 2
}

/// Breadth-first pass joining cells level by level
fn combine_levels(root: NodeSpan, cells: &[String]) -> String {
    let mut rendered = String::new();
    let mut queue = VecDeque::from([root]);

    while !queue.is_empty() {
        for _ in 0..queue.len() {
            let Some(span) = queue.pop_front() else { break };
            rendered.push_str(&cells[span.index]);

            // Stop descending at leaves
            if span.is_leaf() {
                continue;
            }
            let (left, right) = span.children();
            queue.push_back(left);
            queue.push_back(right);
        }
        rendered.push('\n');
    }

    rendered
}

//! Session configuration

use std::path::PathBuf;

use thiserror::Error;

use crate::algebra::MergeFn;
use crate::render::{ColorStyle, TreeRenderer, DEFAULT_NODE_WIDTH};
use crate::tree;

/// Errors raised while validating a [`TreeConfig`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Leaf count is not a power of two, or smaller than two
    #[error("leaf count must be a power of two >= 2, got {0}")]
    InvalidLeafCount(usize),

    /// Zero-width cells cannot hold a value
    #[error("node width must be greater than zero")]
    ZeroNodeWidth,
}

/// Constants shared by the console session, the renderer and the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeConfig {
    /// Number of leaves `L` (fixed for the lifetime of a tree)
    pub leaf_count: usize,

    /// Width of each rendered value cell
    pub node_width: usize,

    /// Merge function a freshly built tree starts with
    pub default_merge_fn: MergeFn,

    /// Where `save` / `load` read and write
    pub store_path: PathBuf,

    /// Color style of rendered trees
    pub color: ColorStyle,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            leaf_count: 16,
            node_width: DEFAULT_NODE_WIDTH,
            default_merge_fn: MergeFn::Sum,
            store_path: PathBuf::from("./data/segtree.json"),
            color: ColorStyle::Ansi,
        }
    }
}

impl TreeConfig {
    /// Set the leaf count (validated by [`TreeConfig::validate`])
    pub fn with_leaf_count(mut self, leaf_count: usize) -> Self {
        self.leaf_count = leaf_count;
        self
    }

    /// Set the cell width
    pub fn with_node_width(mut self, node_width: usize) -> Self {
        self.node_width = node_width;
        self
    }

    /// Set the snapshot location
    pub fn with_store_path(mut self, store_path: impl Into<PathBuf>) -> Self {
        self.store_path = store_path.into();
        self
    }

    /// Set the color style
    pub fn with_color_style(mut self, color: ColorStyle) -> Self {
        self.color = color;
        self
    }

    /// Check the invariants the engine and renderer assert on
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.leaf_count < 2 || !self.leaf_count.is_power_of_two() {
            return Err(ConfigError::InvalidLeafCount(self.leaf_count));
        }
        if self.node_width == 0 {
            return Err(ConfigError::ZeroNodeWidth);
        }
        Ok(self)
    }

    /// Arena size: `4L + 5`
    pub fn tree_capacity(&self) -> usize {
        tree::tree_capacity(self.leaf_count)
    }

    /// Renderer matching this configuration
    pub fn renderer(&self) -> TreeRenderer {
        TreeRenderer::new(self.node_width, self.color)
    }
}

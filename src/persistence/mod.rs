//! Saved trees as JSON
//!
//! ```json
//! { "leaves": [ { "value": 1, "color": "\u001b[47m\u001b[30m" }, ... ],
//!   "mergeFunc": "Addition" }
//! ```
//!
//! Only the leaves and the merge function are stored; internal slots are
//! rebuilt on load.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::algebra::{MergeFn, UnknownMergeFn};
use crate::render::{ansi_color, highlight_from_ansi};
use crate::tree::{Node, SegmentTree};

/// Errors while reading or writing a saved tree
#[derive(Debug, Error)]
pub enum PersistError {
    /// Underlying file operation failed
    #[error("cannot access {path}: {source}")]
    Io {
        /// File that was being read or written
        path: PathBuf,
        /// OS error
        #[source]
        source: io::Error,
    },

    /// Malformed JSON or wrong shape
    #[error("malformed tree snapshot: {0}")]
    Json(#[from] serde_json::Error),

    /// `mergeFunc` names neither merge function
    #[error(transparent)]
    MergeFn(#[from] UnknownMergeFn),

    /// Leaf color is not one of the highlight colors
    #[error("unknown color {color:?} on leaf {index}")]
    UnknownColor {
        /// Leaf position
        index: usize,
        /// Stored color string
        color: String,
    },

    /// Snapshot cannot form a complete binary tree
    #[error("snapshot has {0} leaves; expected a power of two >= 2")]
    LeafCount(usize),
}

/// One stored leaf
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafRecord {
    /// Literal leaf value
    pub value: i32,
    /// ANSI color string of the leaf's highlight
    pub color: String,
}

/// Serialized form of a [`SegmentTree`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeSnapshot {
    /// Leaves in order
    pub leaves: Vec<LeafRecord>,
    /// `"Addition"` or `"Product"`
    #[serde(rename = "mergeFunc")]
    pub merge_func: String,
}

impl TreeSnapshot {
    /// Snapshot of the tree's leaves and merge function
    pub fn capture(tree: &SegmentTree) -> Self {
        let leaves = tree
            .leaves()
            .iter()
            .map(|leaf| LeafRecord {
                value: leaf.value,
                color: ansi_color(leaf.highlight),
            })
            .collect();

        Self {
            leaves,
            merge_func: tree.merge_fn().to_string(),
        }
    }

    /// Rebuild the tree: default merge function first, flipped if the
    /// stored one differs
    pub fn restore(&self) -> Result<SegmentTree, PersistError> {
        let merge_fn: MergeFn = self.merge_func.parse()?;

        let leaf_count = self.leaves.len();
        if leaf_count < 2 || !leaf_count.is_power_of_two() {
            return Err(PersistError::LeafCount(leaf_count));
        }

        let leaves = self
            .leaves
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let highlight =
                    highlight_from_ansi(&record.color).ok_or_else(|| PersistError::UnknownColor {
                        index,
                        color: record.color.clone(),
                    })?;
                Ok(Node::with_highlight(record.value, highlight))
            })
            .collect::<Result<Vec<_>, PersistError>>()?;

        let mut tree = SegmentTree::from_leaves(leaves, MergeFn::default());
        if tree.merge_fn() != merge_fn {
            tree.flip_merge_fn();
        }
        Ok(tree)
    }
}

/// Serialize a tree to pretty-printed JSON
pub fn to_json(tree: &SegmentTree) -> Result<String, PersistError> {
    Ok(serde_json::to_string_pretty(&TreeSnapshot::capture(tree))?)
}

/// Parse a tree from JSON
pub fn from_json(json: &str) -> Result<SegmentTree, PersistError> {
    let snapshot: TreeSnapshot = serde_json::from_str(json)?;
    snapshot.restore()
}

/// A single JSON file holding the most recently saved tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    /// Store backed by `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and rebuild the saved tree
    pub fn read(&self) -> Result<SegmentTree, PersistError> {
        let json = fs::read_to_string(&self.path).map_err(|source| self.io_error(source))?;
        let tree = from_json(&json)?;
        tracing::info!(path = %self.path.display(), "loaded saved tree");
        Ok(tree)
    }

    /// Overwrite the file with `tree`, creating parent directories
    pub fn write(&self, tree: &SegmentTree) -> Result<(), PersistError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }
        fs::write(&self.path, to_json(tree)?).map_err(|source| self.io_error(source))?;
        tracing::info!(path = %self.path.display(), "saved tree");
        Ok(())
    }

    fn io_error(&self, source: io::Error) -> PersistError {
        PersistError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

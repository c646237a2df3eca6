#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use segviz::SegmentTree;

pub fn one_to(n: i32) -> Vec<i32> {
    (1..=n).collect()
}

/// The 16-leaf tree over 1..=16 used throughout the scenario tests
pub fn sixteen() -> SegmentTree {
    SegmentTree::build(&one_to(16))
}

pub fn data_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

/// Expected render stored under `tests/snapshots`
pub fn read_snapshot(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("snapshots")
        .join(name);
    fs::read_to_string(&path).unwrap_or_else(|_| panic!("snapshot {:?} not found", path))
}

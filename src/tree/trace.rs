//! Highlight trace of a single engine operation
//!
//! Records which slots were traversed (`Path`) or used directly
//! (`Compute`), in the order they were first marked.
//! One bit per slot and tag, plus the visit order.

use bitvec::prelude::*;

use super::node::Highlight;

/// Ordered set of highlighted slots
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trace {
    /// Slot indices in first-marking order
    order: Vec<usize>,

    /// Membership bits (1 bit per slot and tag)
    path: BitVec,
    compute: BitVec,
}

impl Trace {
    /// Empty trace able to address `capacity` slots
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            order: Vec::new(),
            path: bitvec![0; capacity],
            compute: bitvec![0; capacity],
        }
    }

    /// Tag a slot; `Compute` supersedes `Path`
    pub fn mark(&mut self, index: usize, highlight: Highlight) {
        if index >= self.path.len() {
            self.path.resize(index + 1, false);
            self.compute.resize(index + 1, false);
        }
        if !self.path[index] && !self.compute[index] {
            self.order.push(index);
        }
        match highlight {
            Highlight::Path => self.path.set(index, true),
            Highlight::Compute => self.compute.set(index, true),
            Highlight::Default => {}
        }
    }

    /// Highlight recorded for a slot
    pub fn highlight_of(&self, index: usize) -> Highlight {
        if self.compute.get(index).map_or(false, |bit| *bit) {
            Highlight::Compute
        } else if self.path.get(index).map_or(false, |bit| *bit) {
            Highlight::Path
        } else {
            Highlight::Default
        }
    }

    /// `(slot, highlight)` pairs in marking order
    pub fn iter(&self) -> impl Iterator<Item = (usize, Highlight)> + '_ {
        self.order
            .iter()
            .map(move |&index| (index, self.highlight_of(index)))
    }

    /// Slots tagged `Compute`, in marking order
    pub fn compute_indices(&self) -> Vec<usize> {
        self.iter()
            .filter(|&(_, highlight)| highlight == Highlight::Compute)
            .map(|(index, _)| index)
            .collect()
    }

    /// Slots tagged only `Path`, in marking order
    pub fn path_indices(&self) -> Vec<usize> {
        self.iter()
            .filter(|&(_, highlight)| highlight == Highlight::Path)
            .map(|(index, _)| index)
            .collect()
    }

    /// Number of distinct slots marked
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True if nothing was marked
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Forget every mark, keeping the capacity
    pub fn clear(&mut self) {
        self.order.clear();
        self.path.fill(false);
        self.compute.fill(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_supersedes_path() {
        let mut trace = Trace::with_capacity(8);
        trace.mark(1, Highlight::Path);
        trace.mark(2, Highlight::Path);
        trace.mark(2, Highlight::Compute);

        assert_eq!(trace.len(), 2);
        assert_eq!(trace.highlight_of(1), Highlight::Path);
        assert_eq!(trace.highlight_of(2), Highlight::Compute);
        assert_eq!(trace.highlight_of(3), Highlight::Default);
        assert_eq!(trace.compute_indices(), vec![2]);
        assert_eq!(trace.path_indices(), vec![1]);
    }

    #[test]
    fn test_out_of_capacity_lookup_is_default() {
        let mut trace = Trace::with_capacity(2);
        assert_eq!(trace.highlight_of(100), Highlight::Default);

        trace.mark(5, Highlight::Compute);
        assert_eq!(trace.highlight_of(5), Highlight::Compute);
    }

    #[test]
    fn test_clear() {
        let mut trace = Trace::with_capacity(4);
        trace.mark(3, Highlight::Path);
        trace.clear();
        assert!(trace.is_empty());
        assert_eq!(trace.highlight_of(3), Highlight::Default);
    }
}

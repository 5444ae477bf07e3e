//! Incremental prefix sums over a sequence of non-negative sizes.
//!
//! [`PrefixSum`] tracks an ordered sequence of `u32` sizes (pixel heights,
//! byte counts, row counts) and answers accumulated-size queries without
//! recomputing the whole sequence on every change. Point updates and prefix
//! queries are both O(log n) via a Fenwick (binary indexed) tree.
//!
//! The structure is resize-free on purpose: growing or shrinking the sequence
//! means building a fresh tracker with [`PrefixSum::from_values`]. Callers
//! that need a resizable collection keep the raw values themselves and
//! rebuild lazily (see the output-height collections in the `nbdiff` crate).
//!
//! # Usage
//!
//! ```
//! use nbdiff_prefix_sum::PrefixSum;
//!
//! let mut sums = PrefixSum::from_values(&[10, 20, 30]);
//! assert_eq!(sums.total(), 60);
//! assert_eq!(sums.sum_before(2), 30);
//!
//! // Report whether the total changed.
//! assert!(sums.set(1, 25));
//! assert_eq!(sums.sum_before(2), 35);
//! assert!(!sums.set(1, 25));
//! ```

/// Fenwick tree over a fixed-length sequence of `u32` sizes.
///
/// Accumulated sums are `u64` so that long sequences of large sizes cannot
/// overflow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixSum {
    /// Stored sizes, index 0-based.
    values: Vec<u32>,
    /// Fenwick tree nodes, index 1-based (`tree[0]` unused).
    tree: Vec<u64>,
}

impl PrefixSum {
    /// Build a tracker over `values` in O(n).
    pub fn from_values(values: &[u32]) -> Self {
        let n = values.len();
        let mut tree = vec![0u64; n + 1];

        // Linear-time Fenwick construction: seed each node with its value,
        // then push partial sums up to the parent node.
        for (i, &value) in values.iter().enumerate() {
            let node = i + 1;
            tree[node] += u64::from(value);
            let parent = node + lowest_set_bit(node);
            if parent <= n {
                tree[parent] += tree[node];
            }
        }

        Self {
            values: values.to_vec(),
            tree,
        }
    }

    /// Number of tracked sizes.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Stored size at `index`, or `None` if out of range.
    pub fn value(&self, index: usize) -> Option<u32> {
        self.values.get(index).copied()
    }

    /// Accumulated size of the whole sequence.
    pub fn total(&self) -> u64 {
        self.sum_before(self.values.len())
    }

    /// Accumulated size of indices `0..index` (excluding `index`).
    ///
    /// `sum_before(0)` is always 0. `index` may be at most `len()`;
    /// `sum_before(len())` equals [`total`](Self::total).
    pub fn sum_before(&self, index: usize) -> u64 {
        debug_assert!(index <= self.values.len());
        let mut i = index.min(self.values.len());
        let mut sum = 0u64;
        while i > 0 {
            sum += self.tree[i];
            i -= lowest_set_bit(i);
        }
        sum
    }

    /// Replace the size at `index`, returning whether the total changed.
    ///
    /// O(log n). `index` must be less than `len()`.
    pub fn set(&mut self, index: usize, value: u32) -> bool {
        debug_assert!(index < self.values.len());
        let Some(slot) = self.values.get_mut(index) else {
            return false;
        };
        let old = *slot;
        if old == value {
            return false;
        }
        *slot = value;

        let delta = i64::from(value) - i64::from(old);
        let n = self.values.len();
        let mut node = index + 1;
        while node <= n {
            self.tree[node] = add_signed(self.tree[node], delta);
            node += lowest_set_bit(node);
        }
        true
    }
}

fn lowest_set_bit(i: usize) -> usize {
    i & i.wrapping_neg()
}

fn add_signed(base: u64, delta: i64) -> u64 {
    if delta >= 0 {
        base + delta as u64
    } else {
        base - delta.unsigned_abs()
    }
}

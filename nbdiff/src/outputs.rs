//! Per-output height collections backed by incremental prefix sums.
//!
//! Outputs report their rendered pixel heights one at a time and at high
//! frequency while the notebook renders, so cumulative offsets are answered
//! by a [`PrefixSum`] tracker instead of an O(n) walk per query.
//!
//! # Tracker lifecycle
//!
//! The tracker is derived state. Any resize of the backing collection
//! (output added, removed, or the set replaced wholesale) drops it; the next
//! offset or total query rebuilds it from the raw heights. Point updates to
//! an existing index keep the tracker live and cost O(log n).
//!
//! # Errors
//!
//! Indexed reads and writes with `index >= len` fail with
//! [`OutputIndexError`]. This is the only error class in the view-model;
//! callers are expected to respect bounds and the error is not recoverable.

use nbdiff_prefix_sum::PrefixSum;
use thiserror::Error;

/// Out-of-range output index on a read or write path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("output index {index} out of range (len {len})")]
pub struct OutputIndexError {
    pub index: usize,
    pub len: usize,
}

/// Which document version an output belongs to in a side-by-side diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffSide {
    Original,
    Modified,
}

/// Ordered per-output pixel heights for one cell side.
#[derive(Debug, Clone, Default)]
pub struct OutputHeights {
    heights: Vec<u32>,
    /// Lazily built cumulative sums; `None` after any resize.
    sums: Option<PrefixSum>,
}

impl OutputHeights {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collection with `count` outputs, all at height 0 (not yet measured).
    pub fn with_output_count(count: usize) -> Self {
        Self {
            heights: vec![0; count],
            sums: None,
        }
    }

    pub fn from_heights(heights: Vec<u32>) -> Self {
        Self {
            heights,
            sums: None,
        }
    }

    pub fn len(&self) -> usize {
        self.heights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Stored height at `index`.
    pub fn height(&self, index: usize) -> Result<u32, OutputIndexError> {
        self.heights
            .get(index)
            .copied()
            .ok_or(self.index_error(index))
    }

    /// Replace the height at `index`, reporting whether the total changed.
    ///
    /// Keeps the tracker live when one exists: a point update is O(log n)
    /// and does not force a rebuild.
    pub fn set_height(&mut self, index: usize, px: u32) -> Result<bool, OutputIndexError> {
        let len = self.heights.len();
        let Some(slot) = self.heights.get_mut(index) else {
            return Err(OutputIndexError { index, len });
        };
        let changed = *slot != px;
        *slot = px;
        if let Some(sums) = &mut self.sums {
            sums.set(index, px);
        }
        Ok(changed)
    }

    /// Accumulated height of outputs `0..index`, excluding `index` itself.
    ///
    /// `offset(0)` is always 0 for a non-empty collection.
    pub fn offset(&mut self, index: usize) -> Result<u64, OutputIndexError> {
        if index >= self.heights.len() {
            return Err(self.index_error(index));
        }
        Ok(self.sums().sum_before(index))
    }

    /// Accumulated height of all outputs.
    pub fn total_height(&mut self) -> u64 {
        if self.heights.is_empty() {
            return 0;
        }
        self.sums().total()
    }

    /// Append an output (initially unmeasured). Invalidates the tracker.
    pub fn push(&mut self, px: u32) {
        self.heights.push(px);
        self.sums = None;
    }

    /// Remove the output at `index`. Invalidates the tracker.
    pub fn remove(&mut self, index: usize) -> Result<u32, OutputIndexError> {
        if index >= self.heights.len() {
            return Err(self.index_error(index));
        }
        self.sums = None;
        Ok(self.heights.remove(index))
    }

    /// Drop all outputs past `len`. Invalidates the tracker when it shrinks.
    pub fn truncate(&mut self, len: usize) {
        if len < self.heights.len() {
            self.heights.truncate(len);
            self.sums = None;
        }
    }

    /// Replace the whole collection. Invalidates the tracker.
    pub fn replace(&mut self, heights: Vec<u32>) {
        self.heights = heights;
        self.sums = None;
    }

    /// True when the derived tracker is currently built.
    #[cfg(test)]
    pub(crate) fn tracker_built(&self) -> bool {
        self.sums.is_some()
    }

    fn sums(&mut self) -> &PrefixSum {
        if self.sums.is_none() {
            self.sums = Some(PrefixSum::from_values(&self.heights));
        }
        // Just populated above.
        match &self.sums {
            Some(sums) => sums,
            None => unreachable!("prefix sums rebuilt on demand"),
        }
    }

    fn index_error(&self, index: usize) -> OutputIndexError {
        OutputIndexError {
            index,
            len: self.heights.len(),
        }
    }
}

/// Output heights for both sides of a side-by-side diff entry.
///
/// The two sides are tracked independently; the shared output region is as
/// tall as the taller side, keeping original and modified outputs vertically
/// aligned.
#[derive(Debug, Clone, Default)]
pub struct SideBySideOutputHeights {
    original: OutputHeights,
    modified: OutputHeights,
}

impl SideBySideOutputHeights {
    pub fn new(original: OutputHeights, modified: OutputHeights) -> Self {
        Self { original, modified }
    }

    pub fn side(&self, side: DiffSide) -> &OutputHeights {
        match side {
            DiffSide::Original => &self.original,
            DiffSide::Modified => &self.modified,
        }
    }

    pub fn side_mut(&mut self, side: DiffSide) -> &mut OutputHeights {
        match side {
            DiffSide::Original => &mut self.original,
            DiffSide::Modified => &mut self.modified,
        }
    }

    /// Update one output height on one side, reporting whether the shared
    /// region height may have changed.
    pub fn set_height(
        &mut self,
        side: DiffSide,
        index: usize,
        px: u32,
    ) -> Result<bool, OutputIndexError> {
        self.side_mut(side).set_height(index, px)
    }

    /// Shared output region height: `max(original total, modified total)`.
    pub fn output_region_height(&mut self) -> u64 {
        self.original.total_height().max(self.modified.total_height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_at_zero_is_zero() {
        let mut heights = OutputHeights::from_heights(vec![30, 40, 50]);
        assert_eq!(heights.offset(0).expect("index 0 in range"), 0);
    }

    #[test]
    fn total_is_sum_of_heights() {
        let mut heights = OutputHeights::from_heights(vec![30, 40, 50]);
        assert_eq!(heights.total_height(), 120);
    }

    #[test]
    fn update_reflected_exactly_once() {
        let mut heights = OutputHeights::from_heights(vec![30, 40, 50]);
        assert!(heights.set_height(1, 45).expect("in range"));
        assert_eq!(heights.offset(1).expect("in range"), 30);
        assert_eq!(heights.offset(2).expect("in range"), 75);
        assert_eq!(heights.total_height(), 125);
    }

    #[test]
    fn set_height_reports_total_change() {
        let mut heights = OutputHeights::from_heights(vec![10, 10]);
        assert!(heights.set_height(0, 20).expect("in range"));
        assert!(!heights.set_height(0, 20).expect("in range"));
    }

    #[test]
    fn out_of_range_read_and_write_fail() {
        let mut heights = OutputHeights::from_heights(vec![10, 20]);
        let expected = OutputIndexError { index: 2, len: 2 };

        assert_eq!(heights.height(2), Err(expected));
        assert_eq!(heights.offset(2), Err(expected));
        assert_eq!(heights.set_height(2, 5), Err(expected));
        assert_eq!(heights.remove(2), Err(expected));
    }

    #[test]
    fn empty_collection_rejects_index_zero() {
        let mut heights = OutputHeights::new();
        assert_eq!(heights.total_height(), 0);
        assert_eq!(heights.offset(0), Err(OutputIndexError { index: 0, len: 0 }));
    }

    #[test]
    fn tracker_is_lazy_and_dropped_on_resize() {
        let mut heights = OutputHeights::from_heights(vec![10, 20, 30]);
        assert!(!heights.tracker_built());

        heights.offset(2).expect("in range");
        assert!(heights.tracker_built());

        // Point update keeps it live.
        heights.set_height(0, 15).expect("in range");
        assert!(heights.tracker_built());

        // Resize drops it.
        heights.push(40);
        assert!(!heights.tracker_built());
        assert_eq!(heights.total_height(), 105);
        assert!(heights.tracker_built());

        heights.remove(0).expect("in range");
        assert!(!heights.tracker_built());
        assert_eq!(heights.total_height(), 90);
    }

    #[test]
    fn rebuild_after_resize_matches_fresh_state() {
        let mut heights = OutputHeights::from_heights(vec![10, 20, 30]);
        heights.offset(2).expect("in range");
        heights.truncate(2);
        assert_eq!(heights.len(), 2);
        assert_eq!(heights.total_height(), 30);
        assert_eq!(heights.offset(1).expect("in range"), 10);

        heights.replace(vec![5, 5, 5, 5]);
        assert_eq!(heights.total_height(), 20);
        assert_eq!(heights.offset(3).expect("in range"), 15);
    }

    #[test]
    fn side_by_side_region_is_max_of_totals() {
        let mut both = SideBySideOutputHeights::new(
            OutputHeights::from_heights(vec![50, 50]),
            OutputHeights::from_heights(vec![30]),
        );
        assert_eq!(both.output_region_height(), 100);

        // Single-side update on the shorter side crosses the max over.
        both.set_height(DiffSide::Modified, 0, 180).expect("in range");
        assert_eq!(both.output_region_height(), 180);

        both.set_height(DiffSide::Original, 1, 10).expect("in range");
        assert_eq!(both.output_region_height(), 180);
    }

    #[test]
    fn side_by_side_bounds_are_per_side() {
        let mut both = SideBySideOutputHeights::new(
            OutputHeights::from_heights(vec![10]),
            OutputHeights::new(),
        );
        assert!(both.set_height(DiffSide::Original, 0, 20).is_ok());
        assert_eq!(
            both.set_height(DiffSide::Modified, 0, 20),
            Err(OutputIndexError { index: 0, len: 0 })
        );
    }
}

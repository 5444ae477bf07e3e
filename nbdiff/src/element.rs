//! Diff entries: one cell pairing across document versions.
//!
//! A [`CellDiffEntry`] is the view-model for one row of the notebook diff
//! view. It owns the entry's layout record, folding state, and output-height
//! tracking, and funnels every mutation through the change-notification
//! path so the hosting view can reposition scrollable regions.
//!
//! Side-by-side entries (unchanged/modified cells) track output heights for
//! both sides independently and size the shared output region to the taller
//! side. Single-side entries (inserted/deleted cells) track only the side
//! that exists.

use crate::{
    cell::{DiffCell, TransientOptions},
    events::{LayoutChange, LayoutChangeEmitter, LayoutChangeSource, SubscriptionId},
    layout::DiffElementLayout,
    metadata,
    outputs::{DiffSide, OutputHeights, OutputIndexError, SideBySideOutputHeights},
};

/// Change kind of a cell pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffKind {
    Unchanged,
    Inserted,
    Deleted,
    Modified,
}

/// Collapsed/expanded display mode for a metadata or output region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FoldingState {
    #[default]
    Expanded,
    Collapsed,
}

/// Output-height storage, shaped by the entry's kind.
#[derive(Debug, Clone)]
enum EntryOutputs {
    SideBySide(SideBySideOutputHeights),
    Single {
        side: DiffSide,
        heights: OutputHeights,
    },
}

/// View-model for one cell-level comparison unit.
pub struct CellDiffEntry {
    kind: DiffKind,
    original: Option<DiffCell>,
    modified: Option<DiffCell>,
    layout: DiffElementLayout,
    metadata_folding: FoldingState,
    output_folding: FoldingState,
    outputs: EntryOutputs,
    emitter: LayoutChangeEmitter,
}

impl CellDiffEntry {
    /// Entry for a cell present and identical on both sides.
    pub fn unchanged(original: DiffCell, modified: DiffCell) -> Self {
        Self::side_by_side(DiffKind::Unchanged, original, modified)
    }

    /// Entry for a cell present on both sides with differing content.
    pub fn modified_pair(original: DiffCell, modified: DiffCell) -> Self {
        Self::side_by_side(DiffKind::Modified, original, modified)
    }

    /// Entry for a cell that exists only in the modified document.
    pub fn inserted(modified: DiffCell) -> Self {
        let heights = OutputHeights::with_output_count(modified.outputs.len());
        Self {
            kind: DiffKind::Inserted,
            original: None,
            modified: Some(modified),
            layout: DiffElementLayout::new(),
            metadata_folding: FoldingState::default(),
            output_folding: FoldingState::default(),
            outputs: EntryOutputs::Single {
                side: DiffSide::Modified,
                heights,
            },
            emitter: LayoutChangeEmitter::new(),
        }
    }

    /// Entry for a cell that exists only in the original document.
    pub fn deleted(original: DiffCell) -> Self {
        let heights = OutputHeights::with_output_count(original.outputs.len());
        Self {
            kind: DiffKind::Deleted,
            original: Some(original),
            modified: None,
            layout: DiffElementLayout::new(),
            metadata_folding: FoldingState::default(),
            output_folding: FoldingState::default(),
            outputs: EntryOutputs::Single {
                side: DiffSide::Original,
                heights,
            },
            emitter: LayoutChangeEmitter::new(),
        }
    }

    fn side_by_side(kind: DiffKind, original: DiffCell, modified: DiffCell) -> Self {
        let outputs = SideBySideOutputHeights::new(
            OutputHeights::with_output_count(original.outputs.len()),
            OutputHeights::with_output_count(modified.outputs.len()),
        );
        Self {
            kind,
            original: Some(original),
            modified: Some(modified),
            layout: DiffElementLayout::new(),
            metadata_folding: FoldingState::default(),
            output_folding: FoldingState::default(),
            outputs: EntryOutputs::SideBySide(outputs),
            emitter: LayoutChangeEmitter::new(),
        }
    }

    pub fn kind(&self) -> DiffKind {
        self.kind
    }

    pub fn original(&self) -> Option<&DiffCell> {
        self.original.as_ref()
    }

    pub fn modified(&self) -> Option<&DiffCell> {
        self.modified.as_ref()
    }

    pub fn layout(&self) -> &DiffElementLayout {
        &self.layout
    }

    pub fn metadata_folding(&self) -> FoldingState {
        self.metadata_folding
    }

    pub fn output_folding(&self) -> FoldingState {
        self.output_folding
    }

    /// Total vertical extent of the entry.
    pub fn total_height(&self) -> u64 {
        self.layout.total_height()
    }

    /// Register a listener for this entry's layout changes.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&LayoutChange) + 'static,
    {
        self.emitter.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.emitter.unsubscribe(id)
    }

    pub fn set_outer_width(&mut self, px: u32) -> LayoutChange {
        let change = self.layout.set_width(px);
        self.emitter.emit(&change);
        change
    }

    pub fn set_editor_margin(&mut self, px: u32) -> LayoutChange {
        let change = self.layout.set_editor_margin(px);
        self.emitter.emit(&change);
        change
    }

    pub fn set_editor_height(&mut self, px: u32) -> LayoutChange {
        let change = self.layout.set_editor_height(px);
        self.emitter.emit(&change);
        change
    }

    pub fn set_metadata_height(&mut self, px: u32) -> LayoutChange {
        let change = self.layout.set_metadata_height(px);
        self.emitter.emit(&change);
        change
    }

    pub fn set_metadata_status_height(&mut self, px: u32) -> LayoutChange {
        let change = self.layout.set_metadata_status_height(px);
        self.emitter.emit(&change);
        change
    }

    pub fn set_output_status_height(&mut self, px: u32) -> LayoutChange {
        let change = self.layout.set_output_status_height(px);
        self.emitter.emit(&change);
        change
    }

    pub fn set_output_metadata_height(&mut self, px: u32) -> LayoutChange {
        let change = self.layout.set_output_metadata_height(px);
        self.emitter.emit(&change);
        change
    }

    pub fn set_bottom_toolbar_height(&mut self, px: u32) -> LayoutChange {
        let change = self.layout.set_bottom_toolbar_height(px);
        self.emitter.emit(&change);
        change
    }

    pub fn set_status_bar_height(&mut self, px: u32) -> LayoutChange {
        let change = self.layout.set_status_bar_height(px);
        self.emitter.emit(&change);
        change
    }

    /// Fold or unfold the metadata region.
    pub fn set_metadata_folding(&mut self, state: FoldingState) -> LayoutChange {
        if self.metadata_folding == state {
            return LayoutChange::none(self.layout.total_height());
        }
        self.metadata_folding = state;
        let change =
            LayoutChange::new(LayoutChangeSource::MetadataEditor, self.layout.total_height());
        self.emitter.emit(&change);
        change
    }

    /// Fold or unfold the output region.
    pub fn set_output_folding(&mut self, state: FoldingState) -> LayoutChange {
        if self.output_folding == state {
            return LayoutChange::none(self.layout.total_height());
        }
        self.output_folding = state;
        let change = LayoutChange::new(LayoutChangeSource::OutputView, self.layout.total_height());
        self.emitter.emit(&change);
        change
    }

    /// Number of tracked outputs on `side`.
    ///
    /// The absent side of a single-side entry has zero outputs.
    pub fn output_len(&self, side: DiffSide) -> usize {
        match &self.outputs {
            EntryOutputs::SideBySide(both) => both.side(side).len(),
            EntryOutputs::Single {
                side: present,
                heights,
            } => {
                if side == *present {
                    heights.len()
                } else {
                    0
                }
            }
        }
    }

    /// Record a rendered output's height, refreshing the output region.
    ///
    /// Returns the resulting change, empty when the height did not move.
    /// Side-by-side entries size the shared output region to the taller
    /// side, so a single-side update may leave the region height unchanged
    /// while still shifting output offsets within the side.
    pub fn update_output_height(
        &mut self,
        side: DiffSide,
        index: usize,
        px: u32,
    ) -> Result<LayoutChange, OutputIndexError> {
        let (changed, region) = match &mut self.outputs {
            EntryOutputs::SideBySide(both) => {
                let changed = both.set_height(side, index, px)?;
                (changed, both.output_region_height())
            }
            EntryOutputs::Single {
                side: present,
                heights,
            } => {
                if side != *present {
                    return Err(OutputIndexError { index, len: 0 });
                }
                let changed = heights.set_height(index, px)?;
                (changed, heights.total_height())
            }
        };

        if !changed {
            return Ok(LayoutChange::none(self.layout.total_height()));
        }

        tracing::debug!(?side, index, px, region, "output height updated");

        let mut change = self.layout.set_output_total_height(clamp_px(region));
        if change.is_empty() {
            // Region height held (other side is taller), but offsets within
            // the side moved.
            change = LayoutChange::new(LayoutChangeSource::OutputView, self.layout.total_height());
        }
        self.emitter.emit(&change);
        Ok(change)
    }

    /// Accumulated height of outputs `0..index` on `side`.
    pub fn output_offset(
        &mut self,
        side: DiffSide,
        index: usize,
    ) -> Result<u64, OutputIndexError> {
        match &mut self.outputs {
            EntryOutputs::SideBySide(both) => both.side_mut(side).offset(index),
            EntryOutputs::Single {
                side: present,
                heights,
            } => {
                if side != *present {
                    return Err(OutputIndexError { index, len: 0 });
                }
                heights.offset(index)
            }
        }
    }

    /// Height of the shared output region.
    pub fn output_region_height(&mut self) -> u64 {
        match &mut self.outputs {
            EntryOutputs::SideBySide(both) => both.output_region_height(),
            EntryOutputs::Single { heights, .. } => heights.total_height(),
        }
    }

    /// Append a (not yet measured) output on `side`.
    pub fn append_output(&mut self, side: DiffSide) -> Result<(), OutputIndexError> {
        match &mut self.outputs {
            EntryOutputs::SideBySide(both) => {
                both.side_mut(side).push(0);
                Ok(())
            }
            EntryOutputs::Single {
                side: present,
                heights,
            } => {
                if side != *present {
                    return Err(OutputIndexError { index: 0, len: 0 });
                }
                heights.push(0);
                Ok(())
            }
        }
    }

    /// Remove the output at `index` on `side`, refreshing the output region.
    pub fn remove_output(
        &mut self,
        side: DiffSide,
        index: usize,
    ) -> Result<LayoutChange, OutputIndexError> {
        let region = match &mut self.outputs {
            EntryOutputs::SideBySide(both) => {
                both.side_mut(side).remove(index)?;
                both.output_region_height()
            }
            EntryOutputs::Single {
                side: present,
                heights,
            } => {
                if side != *present {
                    return Err(OutputIndexError { index, len: 0 });
                }
                heights.remove(index)?;
                heights.total_height()
            }
        };

        let mut change = self.layout.set_output_total_height(clamp_px(region));
        if change.is_empty() {
            change = LayoutChange::new(LayoutChangeSource::OutputView, self.layout.total_height());
        }
        self.emitter.emit(&change);
        Ok(change)
    }

    /// Whether the entry's comparable metadata differs between sides.
    pub fn metadata_modified(&self, policy: &TransientOptions) -> bool {
        metadata::metadata_modified(self.original.as_ref(), self.modified.as_ref(), policy)
    }

    /// Whether the entry's outputs differ between sides.
    pub fn outputs_modified(&self, policy: &TransientOptions) -> bool {
        metadata::outputs_modified(self.original.as_ref(), self.modified.as_ref(), policy)
    }
}

impl std::fmt::Debug for CellDiffEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CellDiffEntry")
            .field("kind", &self.kind)
            .field("layout", &self.layout)
            .field("metadata_folding", &self.metadata_folding)
            .field("output_folding", &self.output_folding)
            .field("outputs", &self.outputs)
            .finish_non_exhaustive()
    }
}

fn clamp_px(height: u64) -> u32 {
    u32::try_from(height).unwrap_or(u32::MAX)
}

//! Mutable layout record for one diff entry.
//!
//! Holds the measured pixel dimensions of every region of a cell pairing:
//! the source editor, the metadata editor and its status row, and the output
//! region. The hosting view measures; this record remembers, sums, and
//! reports what moved.
//!
//! All mutators are explicit methods returning a [`LayoutChange`] -- there
//! are no reactive setters with hidden side effects. A mutation that leaves
//! the field unchanged returns an empty change.

use crate::events::{LayoutChange, LayoutChangeSource};

/// Default height of the metadata status row, in pixels.
pub const DEFAULT_METADATA_STATUS_HEIGHT: u32 = 25;

/// Default height of the output status row, in pixels.
pub const DEFAULT_OUTPUT_STATUS_HEIGHT: u32 = 25;

/// Default height of the per-entry bottom toolbar, in pixels.
pub const DEFAULT_BOTTOM_TOOLBAR_HEIGHT: u32 = 32;

/// Per-entry layout measurements.
///
/// Width and margin describe horizontal geometry and do not contribute to
/// [`total_height`](Self::total_height); every other field is a stacked
/// vertical region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffElementLayout {
    width: u32,
    editor_margin: u32,
    editor_height: u32,
    metadata_height: u32,
    metadata_status_height: u32,
    output_total_height: u32,
    output_status_height: u32,
    output_metadata_height: u32,
    bottom_toolbar_height: u32,
    status_bar_height: u32,
}

impl Default for DiffElementLayout {
    fn default() -> Self {
        Self {
            width: 0,
            editor_margin: 0,
            editor_height: 0,
            metadata_height: 0,
            metadata_status_height: DEFAULT_METADATA_STATUS_HEIGHT,
            output_total_height: 0,
            output_status_height: DEFAULT_OUTPUT_STATUS_HEIGHT,
            output_metadata_height: 0,
            bottom_toolbar_height: DEFAULT_BOTTOM_TOOLBAR_HEIGHT,
            status_bar_height: 0,
        }
    }
}

/// Layout fields addressable by the generic mutator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Width,
    EditorMargin,
    EditorHeight,
    MetadataHeight,
    MetadataStatusHeight,
    OutputTotalHeight,
    OutputStatusHeight,
    OutputMetadataHeight,
    BottomToolbarHeight,
    StatusBarHeight,
}

impl Field {
    fn source(self) -> LayoutChangeSource {
        match self {
            Field::Width | Field::EditorMargin => LayoutChangeSource::OuterWidth,
            Field::EditorHeight | Field::StatusBarHeight => LayoutChangeSource::EditorHeight,
            Field::MetadataHeight | Field::MetadataStatusHeight => {
                LayoutChangeSource::MetadataEditor
            }
            Field::OutputTotalHeight | Field::OutputStatusHeight | Field::BottomToolbarHeight => {
                LayoutChangeSource::OutputView
            }
            Field::OutputMetadataHeight => LayoutChangeSource::OutputEditor,
        }
    }
}

impl DiffElementLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn editor_margin(&self) -> u32 {
        self.editor_margin
    }

    pub fn editor_height(&self) -> u32 {
        self.editor_height
    }

    pub fn metadata_height(&self) -> u32 {
        self.metadata_height
    }

    pub fn metadata_status_height(&self) -> u32 {
        self.metadata_status_height
    }

    pub fn output_total_height(&self) -> u32 {
        self.output_total_height
    }

    pub fn output_status_height(&self) -> u32 {
        self.output_status_height
    }

    pub fn output_metadata_height(&self) -> u32 {
        self.output_metadata_height
    }

    pub fn bottom_toolbar_height(&self) -> u32 {
        self.bottom_toolbar_height
    }

    pub fn status_bar_height(&self) -> u32 {
        self.status_bar_height
    }

    /// Sum of all vertical regions.
    pub fn total_height(&self) -> u64 {
        u64::from(self.editor_height)
            + u64::from(self.metadata_height)
            + u64::from(self.metadata_status_height)
            + u64::from(self.output_total_height)
            + u64::from(self.output_status_height)
            + u64::from(self.output_metadata_height)
            + u64::from(self.bottom_toolbar_height)
            + u64::from(self.status_bar_height)
    }

    pub fn set_width(&mut self, px: u32) -> LayoutChange {
        self.set_field(Field::Width, px)
    }

    pub fn set_editor_margin(&mut self, px: u32) -> LayoutChange {
        self.set_field(Field::EditorMargin, px)
    }

    pub fn set_editor_height(&mut self, px: u32) -> LayoutChange {
        self.set_field(Field::EditorHeight, px)
    }

    pub fn set_metadata_height(&mut self, px: u32) -> LayoutChange {
        self.set_field(Field::MetadataHeight, px)
    }

    pub fn set_metadata_status_height(&mut self, px: u32) -> LayoutChange {
        self.set_field(Field::MetadataStatusHeight, px)
    }

    pub fn set_output_total_height(&mut self, px: u32) -> LayoutChange {
        self.set_field(Field::OutputTotalHeight, px)
    }

    pub fn set_output_status_height(&mut self, px: u32) -> LayoutChange {
        self.set_field(Field::OutputStatusHeight, px)
    }

    pub fn set_output_metadata_height(&mut self, px: u32) -> LayoutChange {
        self.set_field(Field::OutputMetadataHeight, px)
    }

    pub fn set_bottom_toolbar_height(&mut self, px: u32) -> LayoutChange {
        self.set_field(Field::BottomToolbarHeight, px)
    }

    pub fn set_status_bar_height(&mut self, px: u32) -> LayoutChange {
        self.set_field(Field::StatusBarHeight, px)
    }

    fn set_field(&mut self, field: Field, px: u32) -> LayoutChange {
        let changed = {
            let slot = self.field_mut(field);
            if *slot == px {
                false
            } else {
                *slot = px;
                true
            }
        };
        let total = self.total_height();
        if changed {
            LayoutChange::new(field.source(), total)
        } else {
            LayoutChange::none(total)
        }
    }

    fn field_mut(&mut self, field: Field) -> &mut u32 {
        match field {
            Field::Width => &mut self.width,
            Field::EditorMargin => &mut self.editor_margin,
            Field::EditorHeight => &mut self.editor_height,
            Field::MetadataHeight => &mut self.metadata_height,
            Field::MetadataStatusHeight => &mut self.metadata_status_height,
            Field::OutputTotalHeight => &mut self.output_total_height,
            Field::OutputStatusHeight => &mut self.output_status_height,
            Field::OutputMetadataHeight => &mut self.output_metadata_height,
            Field::BottomToolbarHeight => &mut self.bottom_toolbar_height,
            Field::StatusBarHeight => &mut self.status_bar_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_height_is_field_sum() {
        let mut layout = DiffElementLayout::new();
        layout.set_editor_height(100);
        layout.set_metadata_height(50);
        layout.set_output_total_height(200);

        let expected = 100
            + 50
            + u64::from(DEFAULT_METADATA_STATUS_HEIGHT)
            + 200
            + u64::from(DEFAULT_OUTPUT_STATUS_HEIGHT)
            + u64::from(DEFAULT_BOTTOM_TOOLBAR_HEIGHT);
        assert_eq!(layout.total_height(), expected);
    }

    #[test]
    fn width_and_margin_do_not_affect_total() {
        let mut layout = DiffElementLayout::new();
        let before = layout.total_height();
        layout.set_width(900);
        layout.set_editor_margin(32);
        assert_eq!(layout.total_height(), before);
    }

    #[test]
    fn mutators_report_affected_region() {
        let mut layout = DiffElementLayout::new();

        let change = layout.set_editor_height(120);
        assert!(change.affects(LayoutChangeSource::EditorHeight));
        assert_eq!(change.sources().len(), 1);

        let change = layout.set_metadata_height(40);
        assert!(change.affects(LayoutChangeSource::MetadataEditor));

        let change = layout.set_output_total_height(300);
        assert!(change.affects(LayoutChangeSource::OutputView));

        let change = layout.set_output_metadata_height(60);
        assert!(change.affects(LayoutChangeSource::OutputEditor));

        let change = layout.set_width(800);
        assert!(change.affects(LayoutChangeSource::OuterWidth));
    }

    #[test]
    fn noop_mutation_is_empty_change() {
        let mut layout = DiffElementLayout::new();
        layout.set_editor_height(120);

        let change = layout.set_editor_height(120);
        assert!(change.is_empty());
        assert_eq!(change.total_height(), layout.total_height());
    }

    #[test]
    fn change_carries_new_total() {
        let mut layout = DiffElementLayout::new();
        let change = layout.set_editor_height(75);
        assert_eq!(change.total_height(), layout.total_height());
    }
}

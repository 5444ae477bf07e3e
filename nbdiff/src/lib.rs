//! View-model layer for a side-by-side / single-side notebook cell diff view.
//!
//! The hosting editor owns the text models, the diff editor widgets, and the
//! rendering; this crate owns the state in between: per-cell layout
//! measurements, folding state, output-height tracking, and change
//! notifications. Output heights arrive one at a time as outputs render, so
//! cumulative offsets are answered by an incremental prefix-sum tracker
//! (`nbdiff_prefix_sum`) instead of a full recomputation per resize.
//!
//! # Structure
//!
//! - [`CellDiffEntry`] - view-model for one cell pairing (the central type)
//! - [`DiffElementLayout`] - mutable per-entry layout record
//! - [`OutputHeights`] / [`SideBySideOutputHeights`] - per-output pixel
//!   heights with O(log n) offset queries
//! - [`LayoutChange`] / [`LayoutChangeEmitter`] - synchronous change
//!   notifications keyed by affected region
//! - [`formatted_metadata`] / [`metadata_modified`] / [`outputs_modified`] -
//!   transient-aware metadata comparison
//!
//! All state is single-threaded and mutated synchronously; listeners run on
//! the caller's stack before the mutating call returns.

pub mod cell;
pub mod element;
pub mod events;
pub mod layout;
pub mod metadata;
pub mod outputs;

pub use cell::{CellOutput, DiffCell, TransientOptions};
pub use element::{CellDiffEntry, DiffKind, FoldingState};
pub use events::{LayoutChange, LayoutChangeEmitter, LayoutChangeSource, SubscriptionId};
pub use layout::DiffElementLayout;
pub use metadata::{formatted_metadata, metadata_fingerprint, metadata_modified, outputs_modified};
pub use outputs::{DiffSide, OutputHeights, OutputIndexError, SideBySideOutputHeights};

//! Cell-model surface consumed by the diff view-model.
//!
//! The hosting editor owns the real notebook text models; the view-model only
//! needs the slices of a cell that drive diff presentation: its language tag,
//! its metadata object, and its rendered outputs. [`TransientOptions`] is the
//! document-level policy describing which of those are excluded from
//! persistence and comparison.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One rendered output of a notebook cell.
///
/// The payload is opaque to the view-model; it is only compared for equality
/// when deciding whether outputs changed between document versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellOutput {
    /// Stable identifier assigned by the hosting document model.
    pub output_id: String,
    /// Output payload (mime bundle or similar), as JSON.
    #[serde(default)]
    pub data: Value,
}

impl CellOutput {
    pub fn new(output_id: impl Into<String>, data: Value) -> Self {
        Self {
            output_id: output_id.into(),
            data,
        }
    }
}

/// One version of a notebook cell, as seen by the diff view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffCell {
    /// Language tag of the cell's source (e.g. `python`, `markdown`).
    pub language: String,
    /// Cell metadata. Expected to be a JSON object; other shapes are
    /// tolerated and treated as a single opaque value.
    #[serde(default)]
    pub metadata: Value,
    /// Rendered outputs, in document order.
    #[serde(default)]
    pub outputs: Vec<CellOutput>,
}

impl DiffCell {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            metadata: Value::Null,
            outputs: Vec::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_outputs(mut self, outputs: Vec<CellOutput>) -> Self {
        self.outputs = outputs;
        self
    }
}

/// Document-level transient-field policy.
///
/// Transient fields exist at runtime but are excluded from persistence, and
/// therefore from diff comparison: a change confined to transient state is
/// not a change to the document.
#[derive(Debug, Clone, Default)]
pub struct TransientOptions {
    /// Metadata keys excluded from comparison.
    pub transient_cell_metadata: FxHashSet<String>,
    /// When true, outputs are not persisted and never count as modified.
    pub transient_outputs: bool,
}

impl TransientOptions {
    /// Policy with the given transient metadata keys.
    pub fn with_transient_metadata<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            transient_cell_metadata: keys.into_iter().map(Into::into).collect(),
            transient_outputs: false,
        }
    }

    pub fn is_transient_key(&self, key: &str) -> bool {
        self.transient_cell_metadata.contains(key)
    }
}

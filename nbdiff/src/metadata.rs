//! Metadata-change detection between cell versions.
//!
//! Whether a cell's metadata "really" changed depends on the hosting
//! document's transient-field policy: runtime-only fields are stripped
//! before comparison. Comparison works on a canonical textual snapshot of
//! the surviving fields plus the cell's language tag, so two versions are
//! equal exactly when their snapshots (or their cheap fingerprints) are.
//!
//! Canonical form: JSON object with sorted keys (serde_json's default map
//! ordering), pretty-printed, with the language tag folded in as a
//! `language` field.

use crate::cell::{DiffCell, TransientOptions};
use rustc_hash::FxHasher;
use serde_json::{Map, Value};
use std::hash::{Hash, Hasher};

/// Canonical textual snapshot of a cell's comparable metadata.
///
/// Transient keys are dropped; the language tag is included so a
/// language-only change still reads as a metadata change. Non-object
/// metadata is tolerated and carried under a `metadata` key.
pub fn formatted_metadata(cell: &DiffCell, policy: &TransientOptions) -> String {
    let mut canonical = Map::new();

    match &cell.metadata {
        Value::Object(fields) => {
            for (key, value) in fields {
                if !policy.is_transient_key(key) {
                    canonical.insert(key.clone(), value.clone());
                }
            }
        }
        Value::Null => {}
        other => {
            canonical.insert("metadata".to_string(), other.clone());
        }
    }

    // Inserted last so the tag wins over a metadata key named "language".
    canonical.insert("language".to_string(), Value::String(cell.language.clone()));

    // Serializing an in-memory Value cannot fail.
    serde_json::to_string_pretty(&Value::Object(canonical)).unwrap_or_default()
}

/// Hash of [`formatted_metadata`], for cheap equality comparison.
pub fn metadata_fingerprint(cell: &DiffCell, policy: &TransientOptions) -> u64 {
    let mut hasher = FxHasher::default();
    formatted_metadata(cell, policy).hash(&mut hasher);
    hasher.finish()
}

/// Compare metadata across the two sides of an entry.
///
/// One-sided entries (inserted/deleted cells) report a modification only
/// when the present side carries any non-transient metadata.
pub fn metadata_modified(
    original: Option<&DiffCell>,
    modified: Option<&DiffCell>,
    policy: &TransientOptions,
) -> bool {
    match (original, modified) {
        (Some(original), Some(modified)) => {
            metadata_fingerprint(original, policy) != metadata_fingerprint(modified, policy)
        }
        (Some(only), None) | (None, Some(only)) => has_effective_metadata(only, policy),
        (None, None) => false,
    }
}

/// Compare outputs across the two sides of an entry.
///
/// Always false when the policy marks outputs transient. Otherwise outputs
/// are compared in order, by id and payload.
pub fn outputs_modified(
    original: Option<&DiffCell>,
    modified: Option<&DiffCell>,
    policy: &TransientOptions,
) -> bool {
    if policy.transient_outputs {
        return false;
    }
    match (original, modified) {
        (Some(original), Some(modified)) => original.outputs != modified.outputs,
        (Some(only), None) | (None, Some(only)) => !only.outputs.is_empty(),
        (None, None) => false,
    }
}

fn has_effective_metadata(cell: &DiffCell, policy: &TransientOptions) -> bool {
    match &cell.metadata {
        Value::Object(fields) => fields.keys().any(|key| !policy.is_transient_key(key)),
        Value::Null => false,
        _ => true,
    }
}

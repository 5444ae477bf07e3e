//! End-to-end view-model scenarios: a small notebook diff rendering its
//! outputs incrementally while a listener tracks repositioning work.

use nbdiff::{
    CellDiffEntry, CellOutput, DiffCell, DiffSide, FoldingState, LayoutChangeSource,
    OutputIndexError, TransientOptions,
};
use serde_json::json;
use std::{cell::RefCell, rc::Rc};

fn code_cell(count: usize) -> DiffCell {
    let outputs = (0..count)
        .map(|i| CellOutput::new(format!("out-{i}"), json!({ "seq": i })))
        .collect();
    DiffCell::new("python")
        .with_metadata(json!({ "collapsed": false }))
        .with_outputs(outputs)
}

#[test]
fn incremental_output_rendering_repositions_once_per_change() {
    nbdiff_log::test();

    let mut entry = CellDiffEntry::modified_pair(code_cell(3), code_cell(3));
    let notifications = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&notifications);
    entry.subscribe(move |change| sink.borrow_mut().push(change.total_height()));

    // Outputs report their measured heights as they render.
    for (index, px) in [(0, 40), (1, 120), (2, 20)] {
        entry
            .update_output_height(DiffSide::Modified, index, px)
            .expect("index in range");
    }
    assert_eq!(entry.layout().output_total_height(), 180);

    // Re-reporting an unchanged height stays silent.
    entry
        .update_output_height(DiffSide::Modified, 1, 120)
        .expect("index in range");
    assert_eq!(notifications.borrow().len(), 3);

    // Offsets reflect each update exactly once.
    assert_eq!(entry.output_offset(DiffSide::Modified, 0).expect("in range"), 0);
    assert_eq!(entry.output_offset(DiffSide::Modified, 1).expect("in range"), 40);
    assert_eq!(entry.output_offset(DiffSide::Modified, 2).expect("in range"), 160);
}

#[test]
fn side_by_side_region_follows_the_taller_side() {
    let mut entry = CellDiffEntry::unchanged(code_cell(2), code_cell(2));

    entry
        .update_output_height(DiffSide::Original, 0, 300)
        .expect("in range");
    entry
        .update_output_height(DiffSide::Modified, 0, 100)
        .expect("in range");
    assert_eq!(entry.output_region_height(), 300);

    // Modified side grows past the original.
    entry
        .update_output_height(DiffSide::Modified, 1, 250)
        .expect("in range");
    assert_eq!(entry.output_region_height(), 350);
    assert_eq!(entry.layout().output_total_height(), 350);
}

#[test]
fn full_entry_layout_lifecycle() {
    let mut entry = CellDiffEntry::modified_pair(code_cell(1), code_cell(1));
    let regions = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&regions);
    entry.subscribe(move |change| {
        sink.borrow_mut().extend(change.sources().iter().copied());
    });

    entry.set_outer_width(900);
    entry.set_editor_height(140);
    entry.set_metadata_height(60);
    entry
        .update_output_height(DiffSide::Modified, 0, 80)
        .expect("in range");
    entry.set_metadata_folding(FoldingState::Collapsed);

    assert_eq!(
        *regions.borrow(),
        vec![
            LayoutChangeSource::OuterWidth,
            LayoutChangeSource::EditorHeight,
            LayoutChangeSource::MetadataEditor,
            LayoutChangeSource::OutputView,
            LayoutChangeSource::MetadataEditor,
        ]
    );

    let layout = entry.layout();
    let expected_total = u64::from(layout.editor_height())
        + u64::from(layout.metadata_height())
        + u64::from(layout.metadata_status_height())
        + u64::from(layout.output_total_height())
        + u64::from(layout.output_status_height())
        + u64::from(layout.output_metadata_height())
        + u64::from(layout.bottom_toolbar_height())
        + u64::from(layout.status_bar_height());
    assert_eq!(entry.total_height(), expected_total);
}

#[test]
fn out_of_range_indices_fail_on_read_and_write() {
    let mut entry = CellDiffEntry::deleted(code_cell(2));

    assert_eq!(
        entry.update_output_height(DiffSide::Original, 5, 10),
        Err(OutputIndexError { index: 5, len: 2 })
    );
    assert_eq!(
        entry.output_offset(DiffSide::Original, 2),
        Err(OutputIndexError { index: 2, len: 2 })
    );

    // The absent side behaves like an empty collection.
    assert_eq!(
        entry.update_output_height(DiffSide::Modified, 0, 10),
        Err(OutputIndexError { index: 0, len: 0 })
    );
}

#[test]
fn transient_policy_shapes_modification_predicates() {
    let policy = TransientOptions::with_transient_metadata(["execution", "request_id"]);

    let original = DiffCell::new("python")
        .with_metadata(json!({ "collapsed": true, "execution": { "count": 1 } }))
        .with_outputs(vec![CellOutput::new("out-0", json!({ "text": "ok" }))]);
    let modified = DiffCell::new("python")
        .with_metadata(json!({ "collapsed": true, "execution": { "count": 9 } }))
        .with_outputs(vec![CellOutput::new("out-0", json!({ "text": "ok" }))]);

    let entry = CellDiffEntry::modified_pair(original.clone(), modified.clone());
    assert!(!entry.metadata_modified(&policy));
    assert!(!entry.outputs_modified(&policy));

    // A real metadata change survives the transient filter.
    let modified = modified.with_metadata(json!({ "collapsed": false }));
    let entry = CellDiffEntry::modified_pair(original, modified);
    assert!(entry.metadata_modified(&policy));
}

#[test]
fn transient_outputs_suppress_output_comparison() {
    let policy = TransientOptions {
        transient_outputs: true,
        ..TransientOptions::default()
    };
    let entry = CellDiffEntry::modified_pair(code_cell(2), code_cell(0));
    assert!(!entry.outputs_modified(&policy));

    let policy = TransientOptions::default();
    assert!(entry.outputs_modified(&policy));
}

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::numbered_rows;
use merklediff_core::core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_COMPONENT, FIELD_DURATION_MS, FIELD_ERR_CODE,
    FIELD_ERR_KIND, FIELD_ERR_MESSAGE, FIELD_KEY_LEN, FIELD_LEAF_COUNT, FIELD_NODES_VISITED,
    FIELD_RANGE_COUNT, FIELD_ROW_COUNT,
};
use merklediff_core::errors::MerkleDiffError;
use merklediff_core::logging_facility::test_capture::init_test_capture;
use merklediff_core::{
    build_from_reader, build_from_rows, compare, log_op_end, log_op_error, log_op_start,
    MemorySource, Schema,
};

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name);

    capture.assert_event_exists(op_name, EVENT_START);
    let events = capture.events_for(op_name, EVENT_START);
    assert!(events[0]
        .field(FIELD_COMPONENT)
        .is_some_and(|c| c.starts_with("logging_facility_tests")));
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let end_events = capture.events_for(op_name, EVENT_END);
    assert_eq!(end_events.len(), 1, "Should have exactly one end event");
    assert_eq!(end_events[0].field(FIELD_DURATION_MS), Some("42"));
}

#[test]
fn test_log_op_error_includes_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = MerkleDiffError::InvalidInput {
        reason: "bad".to_string(),
    };
    log_op_error!(op_name, &err, duration_ms = 10);

    let error_events = capture.events_for(op_name, EVENT_END_ERROR);
    assert_eq!(error_events.len(), 1, "Should have exactly one error event");
    assert_eq!(error_events[0].field(FIELD_ERR_CODE), Some("ERR_INVALID_INPUT"));
    assert_eq!(error_events[0].field(FIELD_ERR_KIND), Some("InvalidInput"));
    assert_eq!(error_events[0].field(FIELD_ERR_MESSAGE), Some("bad"));
}

#[test]
fn test_build_from_rows_logs_boundaries() {
    let capture = init_test_capture();

    // 17 rows makes the event distinguishable from parallel tests
    let tree = build_from_rows(&numbered_rows(17));
    assert_eq!(tree.leaf_count(), 17);

    let ends = capture.events_for("build_from_rows", EVENT_END);
    let end = ends
        .iter()
        .find(|e| e.field(FIELD_LEAF_COUNT) == Some("17"))
        .expect("end event for 17 leaves");
    assert_eq!(end.field(FIELD_KEY_LEN), Some(tree.key_len().to_string().as_str()));

    let starts = capture.events_for("build_from_rows", EVENT_START);
    assert!(starts.iter().any(|e| e.field(FIELD_ROW_COUNT) == Some("17")));
}

#[test]
fn test_compare_logs_range_count() {
    let capture = init_test_capture();

    let a = build_from_rows(&numbered_rows(11));
    let mut rows = numbered_rows(11);
    rows[10].values.clear();
    let b = build_from_rows(&rows);

    let ranges = compare(&a, &b).unwrap();
    assert_eq!(ranges.len(), 1);
    let ends = capture.events_for("compare", EVENT_END);
    let end = ends
        .iter()
        .find(|e| e.field(FIELD_RANGE_COUNT) == Some("1"))
        .expect("compare end event");
    let visited: u64 = end.field(FIELD_NODES_VISITED).unwrap().parse().unwrap();
    assert!(visited > 1);
}

#[test]
fn test_reader_failure_logs_source_code() {
    let capture = init_test_capture();

    let mut source =
        MemorySource::new(Schema::default(), numbered_rows(5)).fail_after(3, "disk vanished");
    let err = build_from_reader(&mut source).unwrap_err();
    assert!(matches!(err, MerkleDiffError::Source { row: 3, .. }));

    let errors = capture.events_for("build_from_reader", EVENT_END_ERROR);
    assert!(errors
        .iter()
        .any(|e| e.field(FIELD_ERR_CODE) == Some("ERR_SOURCE_FAILURE")));
}

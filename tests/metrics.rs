#![cfg(all(feature = "metrics", not(loom)))]
//! Tests for `ringframe` metrics.
//!
//! These tests verify that parser counters update as expected using
//! `metrics_util::debugging::DebuggingRecorder`.
use metrics_util::debugging::{DebugValue, DebuggingRecorder, Snapshotter};
use ringframe::metrics::{DEFERRALS_TOTAL, FRAMES_TOTAL, FramePart, OVERFLOWS_TOTAL};
use ringframe_testing::{FrameLog, demo_stream};
use rstest::rstest;

/// Creates a debugging recorder and snapshotter for metrics testing.
fn debugging_recorder_setup() -> (Snapshotter, DebuggingRecorder) {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    (snapshotter, recorder)
}

fn counter_value(snapshotter: &Snapshotter, name: &str, part: Option<&str>) -> Option<u64> {
    snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .find_map(|(key, _, _, value)| {
            let key = key.key();
            let labelled = part.is_none_or(|part| {
                key.labels()
                    .any(|l| l.key() == "part" && l.value() == part)
            });
            match value {
                DebugValue::Counter(c) if key.name() == name && labelled => Some(c),
                _ => None,
            }
        })
}

#[rstest]
#[case(FramePart::Header)]
#[case(FramePart::Body)]
fn frame_part_helper_records_label(#[case] part: FramePart) {
    let (snapshotter, recorder) = debugging_recorder_setup();
    metrics::with_local_recorder(&recorder, || ringframe::metrics::inc_frames(part));

    assert_eq!(
        counter_value(&snapshotter, FRAMES_TOTAL, Some(part.as_str())),
        Some(1)
    );
}

#[rstest]
#[case(1)]
#[case(3)]
fn parser_counts_headers_and_bodies(#[case] frames: usize) {
    let (snapshotter, recorder) = debugging_recorder_setup();
    let wire = demo_stream(&vec![b"payload".to_vec(); frames]);

    metrics::with_local_recorder(&recorder, || {
        let log = FrameLog::default();
        let mut parser = log.parser(256);
        assert!(parser.handle_data(&wire));
    });

    let expected = u64::try_from(frames).expect("frame count fits in u64");
    assert_eq!(
        counter_value(&snapshotter, FRAMES_TOTAL, Some("header")),
        Some(expected)
    );
    assert_eq!(
        counter_value(&snapshotter, FRAMES_TOTAL, Some("body")),
        Some(expected)
    );
}

#[test]
fn overflow_and_deferral_are_counted() {
    let (snapshotter, recorder) = debugging_recorder_setup();

    metrics::with_local_recorder(&recorder, || {
        let log = FrameLog::default();
        let mut parser = log.parser(32);
        log.decline_next_bodies(1);
        assert!(!parser.handle_data(&[0u8; 33]));
        assert!(parser.handle_data(&demo_stream(&[b"x".to_vec()])));
    });

    assert_eq!(counter_value(&snapshotter, OVERFLOWS_TOTAL, None), Some(1));
    assert_eq!(counter_value(&snapshotter, DEFERRALS_TOTAL, None), Some(1));
    assert_eq!(
        counter_value(&snapshotter, FRAMES_TOTAL, Some("body")),
        None,
        "a deferred body must not be counted"
    );
}

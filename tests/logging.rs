#![cfg(not(loom))]
//! Log output of the store and parser, captured through `logtest`.

use log::Level;
use ringframe::RingStore;
use ringframe_testing::{FrameLog, LoggerHandle, demo_frame, logger};
use rstest::rstest;

#[rstest]
fn rejected_chunk_is_logged_as_warning(mut logger: LoggerHandle) {
    let log = FrameLog::default();
    let mut parser = log.parser(16);

    assert!(!parser.handle_data(&[0u8; 17]));

    let record = logger
        .find(Level::Warn, "frame parser rejected chunk")
        .expect("overflow warning missing");
    assert!(record.args().contains("buffer overflow"));
}

#[rstest]
fn oversized_body_is_logged_as_warning(mut logger: LoggerHandle) {
    let log = FrameLog::default();
    let mut parser = log.parser(16);

    assert!(parser.handle_data(&demo_frame(0, &[0u8; 4])[..10]));
    assert!(
        logger
            .find(Level::Warn, "can never fit")
            .is_none(),
        "a small body must not be flagged"
    );

    parser.reset();
    let wire = demo_frame(0, &[0u8; 40]);
    assert!(parser.handle_data(&wire[..10]));
    assert!(logger.find(Level::Warn, "can never fit").is_some());
}

#[rstest]
fn stale_zero_copy_commit_is_logged(mut logger: LoggerHandle) {
    let store = RingStore::new(8);
    store.write(b"abcd").expect("fits");

    let consumed = store.read_with(4, |bytes| {
        assert_eq!(bytes, b"abcd");
        assert_eq!(store.drain(1), 1);
        true
    });

    assert_eq!(consumed, 0);
    assert_eq!(store.len(), 3);
    assert!(
        logger
            .find(Level::Debug, "skipped stale commit")
            .is_some()
    );
}

#![cfg(not(loom))]
//! Fragmentation fidelity for `FrameParser`.
//!
//! However a stream is split, the parser must report the same headers and
//! bodies in the same order as when the stream arrives in one piece.

use proptest::{
    collection::vec,
    prelude::{Just, Strategy, any},
    prop_assert_eq,
    test_runner::{Config as ProptestConfig, RngAlgorithm, TestRng, TestRunner},
};
use ringframe::{ParserConfig, ParserState, RejectedHeaderPolicy};
use ringframe_testing::{
    DemoHeader,
    FrameLog,
    byte_by_byte,
    demo_frame,
    demo_stream,
    split_at,
};
use rstest::{fixture, rstest};

fn sample_bodies() -> Vec<Vec<u8>> {
    vec![
        b"first".to_vec(),
        Vec::new(),
        vec![0x5A; 40],
        (0u8..=99).collect(),
    ]
}

#[fixture]
fn sample_stream() -> Vec<u8> { demo_stream(&sample_bodies()) }

fn assert_sample_delivered(log: &FrameLog) {
    let bodies = sample_bodies();
    let headers = log.headers();
    assert_eq!(headers.len(), bodies.len());
    for (index, (header, body)) in headers.iter().zip(&bodies).enumerate() {
        assert_eq!(usize::from(header.msg_type), index);
        assert_eq!(
            header.body_length,
            u32::try_from(body.len()).expect("sample body fits in u32")
        );
        assert_eq!((header.flag0, header.flag1), DemoHeader::FLAGS);
    }
    assert_eq!(log.bodies(), bodies);
}

#[rstest]
fn every_two_way_split_delivers_the_same_frames(sample_stream: Vec<u8>) {
    for cut in 0..=sample_stream.len() {
        let log = FrameLog::default();
        let mut parser = log.parser(256);
        for chunk in split_at(&sample_stream, &[cut]) {
            assert!(parser.handle_data(chunk), "chunk rejected at cut {cut}");
        }
        assert_sample_delivered(&log);
        assert_eq!(parser.state(), ParserState::ReadingHeader);
        assert_eq!(parser.buffered(), 0);
    }
}

#[rstest]
fn byte_by_byte_delivery(sample_stream: Vec<u8>) {
    let log = FrameLog::default();
    let mut parser = log.parser(128);

    for chunk in byte_by_byte(&sample_stream) {
        assert!(parser.handle_data(chunk));
    }

    assert_sample_delivered(&log);
}

#[test]
fn random_splits_match_whole_delivery() {
    let config = ProptestConfig {
        cases: 64,
        ..ProptestConfig::default()
    };
    let mut runner =
        TestRunner::new_with_rng(config, TestRng::deterministic_rng(RngAlgorithm::ChaCha));
    let bodies = vec(vec(any::<u8>(), 0..48), 1..12);
    let strategy = bodies.prop_flat_map(|bodies| {
        let len = demo_stream(&bodies).len();
        (
            Just(bodies),
            vec(0..=len, 0..8).prop_map(|mut points| {
                points.sort_unstable();
                points
            }),
        )
    });

    runner
        .run(&strategy, |(bodies, points)| {
            let wire = demo_stream(&bodies);
            let log = FrameLog::default();
            let mut parser = log.parser(1024);
            for chunk in split_at(&wire, &points) {
                prop_assert_eq!(parser.handle_data(chunk), true);
            }
            prop_assert_eq!(log.bodies(), bodies);
            prop_assert_eq!(parser.buffered(), 0);
            Ok(())
        })
        .expect("fragmented delivery diverged");
}

#[test]
fn deferred_body_is_retried_in_order() {
    let log = FrameLog::default();
    let mut parser = log.parser(64);
    log.decline_next_bodies(2);

    let mut wire = demo_frame(1, b"held back");
    wire.extend(demo_frame(2, b"queued"));

    let progress = parser.feed(&wire).expect("fits");
    assert!(progress.deferred);
    assert_eq!(progress.headers, 1);
    assert!(log.bodies().is_empty());

    let progress = parser.feed(&[]).expect("empty feed");
    assert!(progress.deferred);

    let progress = parser.feed(&[]).expect("empty feed");
    assert!(!progress.deferred);
    assert_eq!(progress.bodies, 2);
    assert_eq!(log.bodies(), [b"held back".to_vec(), b"queued".to_vec()]);
}

#[test]
fn overflow_keeps_earlier_bytes() {
    let log = FrameLog::default();
    let mut parser = log.parser(32);
    let wire = demo_frame(3, &[0xEE; 20]);

    assert!(parser.handle_data(&wire[..12]));
    assert!(!parser.handle_data(&[0u8; 40]));
    assert!(parser.handle_data(&wire[12..]));

    assert_eq!(log.bodies(), [vec![0xEE; 20]]);
}

#[test]
fn discard_policy_skips_bodies_of_rejected_headers() {
    let mut delivered = Vec::new();
    let config = ParserConfig::default()
        .capacity(64)
        .rejected_headers(RejectedHeaderPolicy::Discard);
    let mut parser = ringframe::FrameParser::with_config(
        &config,
        |header: &DemoHeader| header.msg_type != 0,
        |body: &[u8]| {
            delivered.push(body.to_vec());
            true
        },
    )
    .expect("valid config");

    let wire = demo_stream(&[b"dropped".to_vec(), b"kept".to_vec()]);
    let progress = parser.feed(&wire).expect("fits");

    assert_eq!(progress.headers, 2);
    assert_eq!(progress.bodies, 2);
    drop(parser);
    assert_eq!(delivered, [b"kept".to_vec()]);
}

//! Data-path events reaching the verbosity layer.

#![cfg(feature = "subscriber")]

use datapath::logging::{DatapathLayer, DebugFlag, VerbosityConfig, drain_events, init};
use datapath::{Probe, RingBuffer, ssl};
use test_support::ClientHello;
use tracing_subscriber::layer::SubscriberExt;

fn with_layer(config: VerbosityConfig, body: impl FnOnce()) -> Vec<datapath::logging::DiagnosticEvent> {
    init(config);
    let _ = drain_events();
    let subscriber = tracing_subscriber::registry().with(DatapathLayer::new());
    tracing::subscriber::with_default(subscriber, body);
    drain_events()
}

#[test]
fn sniffer_verdicts_are_traced_under_the_ssl_flag() {
    let record = ClientHello::new().server_name("example.com").record();
    let mut buf = RingBuffer::new(256);
    buf.fill(&record);

    let mut config = VerbosityConfig::default();
    config.apply_debug_flags("ssl3").unwrap();
    let events = with_layer(config, || {
        assert!(ssl::sni(&Probe::request(&buf)).is_matched());
    });

    assert!(!events.is_empty());
    assert!(events.iter().all(|event| event.flag == DebugFlag::Ssl));
    assert!(events.iter().any(|event| event.message.contains("matched")));
}

#[test]
fn refused_edits_are_reported_at_edit_level_two() {
    let mut buf = RingBuffer::new(8);
    buf.fill(b"abcdef");

    let events = with_layer(VerbosityConfig::from_verbose_level(2), || {
        assert!(buf.insert_line(0, b"xy").is_err());
    });
    assert!(
        events
            .iter()
            .any(|event| event.flag == DebugFlag::Edit && event.message.contains("edit refused"))
    );

    let events = with_layer(VerbosityConfig::from_verbose_level(0), || {
        assert!(buf.insert_line(0, b"xy").is_err());
    });
    assert!(events.is_empty());
}

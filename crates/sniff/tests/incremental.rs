//! Sniffers re-invoked as bytes trickle into the buffer, the way a
//! connection's inspection loop drives them.

use buffer::RingBuffer;
use proptest::prelude::*;
use sniff::{
    Direction, PayloadLvArgs, Probe, Sniff, SslVersion, Stream, ValueOffset, payload_lv,
    rdp_cookie, ssl,
};
use test_support::{ClientHello, SslV2Hello, rdp_cookie_request, wrapped_buffer};

/// Feeds `data` in chunks of `step` bytes and returns the number of bytes
/// buffered when `sniff` first reached a final verdict, with that verdict.
fn feed<T>(
    capacity: usize,
    data: &[u8],
    step: usize,
    sniff: impl Fn(&RingBuffer) -> Sniff<T>,
) -> (usize, Sniff<T>) {
    let mut buf = RingBuffer::new(capacity);
    let mut fed = 0;
    loop {
        let verdict = sniff(&buf);
        if verdict.is_decided() || fed == data.len() {
            return (fed, verdict);
        }
        let next = (fed + step).min(data.len());
        assert_eq!(buf.fill(&data[fed..next]), next - fed);
        fed = next;
    }
}

#[test]
fn server_name_decided_only_once_the_hello_is_complete() {
    let record = ClientHello::new().server_name("example.com").record();
    for step in [1, 3, 7, 64] {
        let (fed, verdict) = feed(512, &record, step, |buf| {
            ssl::sni(&Probe::request(buf)).map(|name| name.to_vec())
        });
        assert_eq!(fed, record.len(), "step {step}");
        assert_eq!(verdict, Sniff::Matched(b"example.com".to_vec()));
    }
}

#[test]
fn non_tls_traffic_is_rejected_early() {
    let request = b"GET /index.html HTTP/1.1\r\nHost: example.com\r\n\r\n";
    let (fed, verdict) = feed(512, request, 1, |buf| ssl::sni(&Probe::request(buf)).map(|_| ()));
    assert_eq!(verdict, Sniff::NoMatch);
    assert_eq!(fed, 1);

    let (fed, verdict) = feed(512, request, 1, |buf| ssl::version(&Probe::request(buf)));
    assert_eq!(verdict, Sniff::NoMatch);
    assert!(fed <= 4, "decided after {fed} bytes");
}

#[test]
fn sslv3_and_sslv2_paths_are_told_apart() {
    let v3 = ClientHello::new().record_version(3, 0).record();
    let mut buf = RingBuffer::new(512);
    buf.fill(&v3);
    assert_eq!(ssl::version(&Probe::request(&buf)), Sniff::Matched(SslVersion::SSL_3_0));
    assert_eq!(ssl::hello_type(&Probe::request(&buf)), Sniff::Matched(0x01));

    let v2 = SslV2Hello::new(3, 1).bytes();
    let mut buf = RingBuffer::new(512);
    buf.fill(&v2);
    assert_eq!(ssl::version(&Probe::request(&buf)), Sniff::Matched(SslVersion::TLS_1_0));
    assert_eq!(ssl::hello_type(&Probe::request(&buf)), Sniff::NoMatch);
    assert!(ssl::sni(&Probe::request(&buf)).is_no_match());
}

#[test]
fn closing_the_stream_settles_pending_verdicts() {
    let record = ClientHello::new().server_name("example.com").record();
    let mut buf = RingBuffer::new(512);
    buf.fill(&record[..record.len() / 2]);

    let open = Probe::new(&buf, Direction::Request, false);
    assert!(ssl::sni(&open).requires_more_data());
    assert!(ssl::version(&open).requires_more_data());

    let closed = open.closed(true);
    assert!(ssl::sni(&closed).is_no_match());
    assert!(ssl::version(&closed).is_no_match());
}

#[test]
fn rdp_cookie_from_a_wrapped_request() {
    let request = rdp_cookie_request("MSTSHASH", "ABC123");
    let buf = wrapped_buffer(48, 40, &request);
    assert!(buf.pending_wraps());

    let stream = Stream::new(&buf);
    let value = rdp_cookie(&stream.probe(Direction::Request, false), Some(&b"mstshash"[..]))
        .matched()
        .unwrap();
    assert_eq!(value, b"ABC123");
    assert_eq!(value.offset(), 28);

    assert!(rdp_cookie(&stream.probe(Direction::Response, false), None).is_no_match());
}

proptest! {
    #[test]
    fn length_value_matches_once_the_value_is_buffered(
        value in proptest::collection::vec(any::<u8>(), 1..40),
        delta in 0isize..4,
        received in 0usize..64,
    ) {
        let mut data = vec![0u8, value.len() as u8];
        data.extend(std::iter::repeat_n(0xEE, delta as usize));
        data.extend_from_slice(&value);
        let received = received.min(data.len());

        let args = PayloadLvArgs::new(0, 2, ValueOffset::Relative(delta)).unwrap();
        let mut buf = RingBuffer::new(64);
        buf.fill(&data[..received]);

        let verdict = payload_lv(&Probe::request(&buf), &args).map(|slice| slice.to_vec());
        if received == data.len() {
            prop_assert_eq!(verdict, Sniff::Matched(value));
        } else {
            prop_assert_eq!(verdict, Sniff::Incomplete);
        }
    }

    #[test]
    fn length_value_past_capacity_never_matches(
        declared in 1u8..=255,
        received in 0usize..32,
    ) {
        let capacity = 32;
        let mut data = vec![declared];
        data.resize(received.max(1), 0xAB);

        let args: PayloadLvArgs = "0,1".parse().unwrap();
        let mut buf = RingBuffer::new(capacity);
        buf.fill(&data);

        let verdict = payload_lv(&Probe::request(&buf), &args);
        if 1 + usize::from(declared) > capacity {
            prop_assert!(verdict.is_no_match());
        } else {
            prop_assert!(!verdict.is_no_match());
        }
    }
}

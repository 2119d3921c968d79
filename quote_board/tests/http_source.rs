//! `HttpQuoteSource` against a loopback HTTP stub.
//!
//! The stub answers every connection with one canned response and reports the
//! request line it saw, which is enough to pin down the request contract.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, unbounded};
use quote_board::{BoardConfig, HttpQuoteSource, QuoteBoard, QuoteSource};
use quote_common::{DisplayZone, FailureKind, QuoteError};

const BTC_BODY: &str = r#"[{"symbol":"BTC","price":65000,"timestamp":1700000000000}]"#;

/// Serve `status` + `body` to every client. Returns the endpoint URL and a feed
/// of request lines.
fn serve(status: &'static str, body: &'static str) -> (String, Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let (seen_tx, seen_rx) = unbounded();

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let text = String::from_utf8_lossy(&request);
            let _ = seen_tx.send(text.lines().next().unwrap_or_default().to_string());

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });

    (format!("http://{}/quotes", addr), seen_rx)
}

fn source_for(url: &str) -> HttpQuoteSource {
    HttpQuoteSource::new(&BoardConfig::new(url).unwrap()).unwrap()
}

#[test]
fn issues_a_plain_get_and_decodes_the_list() {
    let (url, seen) = serve("200 OK", BTC_BODY);
    let source = source_for(&url);

    let quotes = source.fetch().unwrap();

    assert_eq!(quotes.len(), 1);
    assert_eq!(quotes[0].symbol, "BTC");
    assert_eq!(quotes[0].price, 65000.0);
    assert_eq!(quotes[0].timestamp.timestamp_millis(), 1_700_000_000_000);
    assert_eq!(
        seen.recv_timeout(Duration::from_secs(1)).unwrap(),
        "GET /quotes HTTP/1.1"
    );
    assert_eq!(source.describe(), url);
}

#[test]
fn non_success_status_is_a_network_failure() {
    let (url, _seen) = serve("500 Internal Server Error", r#"{"error":"stream closed"}"#);

    let err = source_for(&url).fetch().unwrap_err();

    assert!(matches!(err, QuoteError::HttpStatus(500)), "got {err:?}");
    assert_eq!(err.kind(), FailureKind::Network);
}

#[test]
fn malformed_body_is_a_parse_failure() {
    let (url, _seen) = serve("200 OK", r#"{"error":"not a list"}"#);

    let err = source_for(&url).fetch().unwrap_err();

    assert!(matches!(err, QuoteError::Parse(_)), "got {err:?}");
    assert_eq!(err.kind(), FailureKind::Parse);
}

#[test]
fn refused_connection_is_a_network_failure() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let err = source_for(&format!("http://127.0.0.1:{}/quotes", port))
        .fetch()
        .unwrap_err();

    assert!(matches!(err, QuoteError::Network(_)), "got {err:?}");
}

#[test]
fn slow_server_hits_the_request_timeout() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        // Accept and hold the connection without answering.
        let held: Vec<_> = listener.incoming().take(1).collect();
        thread::sleep(Duration::from_secs(3));
        drop(held);
    });

    let config = BoardConfig::new(&format!("http://{}/quotes", addr))
        .unwrap()
        .with_timeout(Duration::from_millis(200));
    let started = Instant::now();
    let err = HttpQuoteSource::new(&config).unwrap().fetch().unwrap_err();

    assert!(matches!(err, QuoteError::Network(_)), "got {err:?}");
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[test]
fn mounted_board_renders_the_served_quotes() {
    let (url, _seen) = serve("200 OK", BTC_BODY);
    let config = BoardConfig::new(&url)
        .unwrap()
        .with_interval(Duration::from_millis(50))
        .with_zone(DisplayZone::Utc);
    let source: Arc<dyn QuoteSource> = Arc::new(HttpQuoteSource::new(&config).unwrap());
    let mut board = QuoteBoard::new(source, config);

    board.mount().unwrap();
    let deadline = Instant::now() + Duration::from_secs(3);
    while board.state().latest_applied() == 0 && Instant::now() < deadline {
        board.pump(Duration::from_millis(20));
    }
    board.unmount();

    let text = board.view().to_string();
    assert!(text.contains("| BTC    | $65,000 | 10:13:20 PM |"), "{text}");
    assert!(text.contains(&url));
}

#[test]
fn single_refresh_against_a_dead_endpoint_shows_the_placeholder() {
    let (url, _seen) = serve("503 Service Unavailable", "");
    let config = BoardConfig::new(&url).unwrap();
    let source: Arc<dyn QuoteSource> = Arc::new(HttpQuoteSource::new(&config).unwrap());
    let mut board = QuoteBoard::new(source, config);

    assert!(matches!(board.refresh(), Err(QuoteError::HttpStatus(503))));
    assert_eq!(board.view().body_row_count(), 1);
    assert!(board.view().status.is_none());
}

use lk_news_feed::fetcher::{exceeds_size_cap, is_retryable};
use lk_news_feed::{FeedError, FetchConfig};

fn status(code: u16) -> FeedError {
    FeedError::Status {
        url: "https://raw.githubusercontent.com/nuuuwan/lk_news_digest/main/README.md".to_string(),
        status: code,
    }
}

#[test]
fn test_server_errors_are_retried() {
    assert!(is_retryable(&status(500)));
    assert!(is_retryable(&status(502)));
    assert!(is_retryable(&status(503)));
    assert!(is_retryable(&status(429)));
}

#[test]
fn test_client_errors_fail_fast() {
    assert!(!is_retryable(&status(404)));
    assert!(!is_retryable(&status(403)));
    assert!(!is_retryable(&status(401)));
    assert!(!is_retryable(&FeedError::Network {
        url: "https://example.com/big.md".to_string(),
        reason: "Document too large: 7340032 bytes".to_string(),
    }));
}

#[test]
fn test_size_cap_counts_bytes() {
    let config = FetchConfig::default();
    let max_bytes = config.max_document_bytes();
    assert_eq!(max_bytes, 5 * 1024 * 1024);

    assert!(!exceeds_size_cap(max_bytes, max_bytes));
    assert!(exceeds_size_cap(max_bytes + 1, max_bytes));
    // 5.99 MB is over a 5 MB cap.
    assert!(exceeds_size_cap(6_280_000, max_bytes));
    assert!(!exceeds_size_cap(0, max_bytes));
}

use super::*;

#[test]
fn memory_fetcher_ignores_query_strings() {
    let f = MemoryFetcher::new().with("http://cdn/a.txt", "hello");
    assert_eq!(f.get_text("http://cdn/a.txt").unwrap(), "hello");
    assert_eq!(f.get_bytes("http://cdn/a.txt?_=7").unwrap(), b"hello");
}

#[test]
fn memory_fetcher_missing_url_is_load_error() {
    let f = MemoryFetcher::new();
    assert!(matches!(f.get_text("http://cdn/none"), Err(NinError::Load(_))));
}

#[cfg(feature = "http")]
#[test]
fn http_fetcher_carries_its_timeout() {
    use std::time::Duration;

    assert_eq!(HttpFetcher::new().timeout(), HttpFetcher::DEFAULT_TIMEOUT);
    let f = HttpFetcher::with_timeout(Duration::from_millis(250));
    assert_eq!(f.timeout(), Duration::from_millis(250));
}

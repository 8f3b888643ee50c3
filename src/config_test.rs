use std::collections::HashMap;

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn from_lookup_defaults() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[])).unwrap();
    assert_eq!(cfg.base_url().as_str(), "http://localhost:3001/");
    assert_eq!(cfg.request_timeout(), Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS));
    assert_eq!(cfg.connect_timeout(), Duration::from_millis(DEFAULT_CONNECT_TIMEOUT_MS));
}

#[test]
fn from_lookup_parses_overrides() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[
        (ENV_BASE_URL, "https://arena.example.test/backend/"),
        (ENV_REQUEST_TIMEOUT_MS, "2500"),
        (ENV_CONNECT_TIMEOUT_MS, " 400 "),
    ]))
    .unwrap();
    assert_eq!(cfg.base_url().host_str(), Some("arena.example.test"));
    assert_eq!(cfg.request_timeout(), Duration::from_millis(2500));
    assert_eq!(cfg.connect_timeout(), Duration::from_millis(400));
}

#[test]
fn from_lookup_bad_numbers_fall_back_to_defaults() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[(ENV_REQUEST_TIMEOUT_MS, "soon")])).unwrap();
    assert_eq!(cfg.request_timeout(), Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS));
}

#[test]
fn new_rejects_garbage() {
    let err = ClientConfig::new("not a url").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));
}

#[test]
fn new_rejects_non_http_scheme() {
    let err = ClientConfig::new("ftp://files.example.test").unwrap_err();
    assert!(matches!(err, ConfigError::UnsupportedScheme(ref s) if s == "ftp"));
}

#[test]
fn new_rejects_query() {
    let err = ClientConfig::new("http://localhost:3001/?debug=1").unwrap_err();
    assert!(err.to_string().contains("query"));
}

#[test]
fn endpoint_joins_segments() {
    let cfg = ClientConfig::new("http://localhost:3001").unwrap();
    let url = cfg.endpoint(&["api", "games", "42", "result"]);
    assert_eq!(url.as_str(), "http://localhost:3001/api/games/42/result");
}

#[test]
fn endpoint_keeps_base_path_prefix() {
    let cfg = ClientConfig::new("https://arena.example.test/backend/").unwrap();
    let url = cfg.endpoint(&["api", "health"]);
    assert_eq!(url.as_str(), "https://arena.example.test/backend/api/health");
}

#[test]
fn endpoint_encodes_segment_separators() {
    let cfg = ClientConfig::new("http://localhost:3001").unwrap();
    let url = cfg.endpoint(&["api", "balance", "chain/../admin?x=1"]);
    assert_eq!(url.path(), "/api/balance/chain%2F..%2Fadmin%3Fx=1");
}

// Integration tests for FishySearch
// These drive full runs against a local mock shop server

pub mod run_tests;

use chrono::NaiveDate;
use serde_json::{Value, json};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fishysearch::AppConfig;
use fishysearch::config::FetcherConfig;
use fishysearch::coordinator::{Clock, FixedClock};

pub fn run_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 14).unwrap()
}

pub fn test_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(run_date()))
}

/// Shop entry with a `.product` catalog, `h2` names and `a.more` detail links.
pub fn shop_json(name: &str, base_url: &str) -> Value {
    json!({
        "shop_name": name,
        "base_url": base_url,
        "selectors": {
            "catalog": ".product",
            "linktosubpage": "a.more"
        },
        "mainpage_attributes": {
            "name": "h2",
            "price": ".price",
            "image": "img"
        },
        "subpage_attributes": {
            "latin": ".latin",
            "stock": ".stock"
        },
        "excluded_keywords": ["voucher"]
    })
}

/// Writes the shop document and returns a config pointing into `dir`.
pub fn write_config(dir: &Path, shops: Value) -> AppConfig {
    let config_path = dir.join("config.json");
    std::fs::write(&config_path, serde_json::to_string_pretty(&shops).unwrap()).unwrap();

    let mut config = AppConfig::default();
    config.paths.config_path = config_path;
    config.paths.results_dir = dir.join("results");
    config.fetcher = FetcherConfig {
        user_agent: "FishySearch-Test/1.0".to_string(),
        request_timeout: 5,
    };
    config
}

pub fn setup() -> TempDir {
    tempfile::tempdir().unwrap()
}

pub fn html(body: &str) -> String {
    format!("<!DOCTYPE html><html><body>{}</body></html>", body)
}

pub async fn mount_page(server: &MockServer, route: &str, body: String, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(expected_calls)
        .mount(server)
        .await;
}

pub async fn mount_status(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .expect(1)
        .mount(server)
        .await;
}

pub async fn mount_bytes(server: &MockServer, route: &str, body: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .expect(1)
        .mount(server)
        .await;
}

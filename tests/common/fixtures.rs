//! Test fixtures and mock-server helpers for integration tests.
//!
//! # Usage
//!
//! ```rust,ignore
//! use common::fixtures::*;
//!
//! let rubygems = MockServer::start().await;
//! mount_gem(&rubygems, "rails", 1_234).await;
//! mount_versions(&rubygems, "rails", &rails_versions()).await;
//! ```
#![allow(dead_code)]

use serde_json::{Value, json};
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Body served by the mock badge service.
pub const REMOTE_SVG: &str =
    r#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="20"><title>remote</title></svg>"#;

/// One entry of the RubyGems versions endpoint.
#[must_use]
pub fn version(number: &str, downloads: u64, prerelease: bool) -> Value {
    json!({
        "number": number,
        "downloads_count": downloads,
        "prerelease": prerelease,
        "platform": "ruby",
        "created_at": "2024-01-01T00:00:00.000Z"
    })
}

/// Versions list, newest first, with a prerelease on top.
#[must_use]
pub fn rails_versions() -> Vec<Value> {
    vec![
        version("8.0.0.beta1", 150, true),
        version("7.1.3", 4_200_000, false),
        version("7.1.2", 3_100_000, false),
        version("7.0.0", 12_345, false),
    ]
}

/// Payload of the RubyGems gem endpoint.
#[must_use]
pub fn gem_info(name: &str, downloads: u64) -> Value {
    json!({
        "name": name,
        "downloads": downloads,
        "version": "7.1.3",
        "version_downloads": 4_200_000,
        "info": "Full-stack web application framework."
    })
}

/// Serve `/api/v1/gems/{gem}.json`.
pub async fn mount_gem(server: &MockServer, gem: &str, downloads: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/api/v1/gems/{gem}.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(gem_info(gem, downloads)))
        .mount(server)
        .await;
}

/// Serve `/api/v1/versions/{gem}.json`.
pub async fn mount_versions(server: &MockServer, gem: &str, versions: &[Value]) {
    Mock::given(method("GET"))
        .and(path(format!("/api/v1/versions/{gem}.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(versions))
        .mount(server)
        .await;
}

/// Serve [`REMOTE_SVG`] for every badge path.
pub async fn mount_badge_service(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path_regex(r"^/badge/.+"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/svg+xml")
                .set_body_string(REMOTE_SVG),
        )
        .mount(server)
        .await;
}

/// Answer every badge path with `status`.
pub async fn mount_badge_failure(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path_regex(r"^/badge/.+"))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

//! Common test utilities and fixtures for integration tests.
//!
//! # Modules
//!
//! - `fixtures`: RubyGems payloads, badge bodies and mock server helpers
//! - `log_capture`: Tracing capture for log assertions
//! - `logger`: Structured test logging infrastructure

pub mod fixtures;
pub mod log_capture;
pub mod logger;

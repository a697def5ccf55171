//! Per-test progress logging.
#![allow(dead_code)]
//!
//! `TestLogger` prints the test name, current phase and elapsed time to
//! stderr so a failing run shows how far each test got. Set
//! `TEST_LOG_JSON=1` for JSON lines, `TEST_LOG_QUIET=1` to silence it.

use std::sync::{Mutex, OnceLock};
use std::time::Instant;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use super::log_capture::TestLogCapture;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Output {
    Text,
    Json,
    Quiet,
}

fn output() -> Output {
    static OUTPUT: OnceLock<Output> = OnceLock::new();
    *OUTPUT.get_or_init(|| {
        let flag = |key: &str| {
            std::env::var(key).is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        };
        if flag("TEST_LOG_QUIET") {
            Output::Quiet
        } else if flag("TEST_LOG_JSON") {
            Output::Json
        } else {
            Output::Text
        }
    })
}

#[derive(Serialize)]
struct Line<'a> {
    at: String,
    test: &'a str,
    phase: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    elapsed_ms: Option<u64>,
}

pub struct TestLogger {
    name: String,
    started: Instant,
    phase: Mutex<String>,
}

impl TestLogger {
    #[must_use]
    pub fn new(name: &str) -> Self {
        let logger = Self {
            name: name.to_string(),
            started: Instant::now(),
            phase: Mutex::new("init".to_string()),
        };
        logger.emit("started", None);
        logger
    }

    /// Logger plus a tracing capture for log assertions.
    pub fn with_capture(name: &str) -> (Self, TestLogCapture) {
        let capture = TestLogCapture::start();
        (Self::new(name), capture)
    }

    /// Switch phase, e.g. "setup", "execute", "verify".
    pub fn phase(&self, phase: &str) {
        if let Ok(mut current) = self.phase.lock() {
            phase.clone_into(&mut *current);
        }
        self.emit("phase start", None);
    }

    pub fn info(&self, message: &str) {
        self.emit(message, None);
    }

    pub fn http_request(&self, method: &str, url: &str) {
        self.emit(&format!("{method} {url}"), None);
    }

    pub fn finish_ok(&self) {
        self.emit("passed", Some(self.elapsed_ms()));
    }

    #[must_use]
    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    fn emit(&self, message: &str, elapsed_ms: Option<u64>) {
        let mode = output();
        if mode == Output::Quiet {
            return;
        }
        let phase = self
            .phase
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default();
        let line = Line {
            at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            test: &self.name,
            phase: &phase,
            message,
            elapsed_ms,
        };

        if mode == Output::Json {
            if let Ok(json) = serde_json::to_string(&line) {
                eprintln!("{json}");
            }
        } else {
            let elapsed = elapsed_ms.map(|ms| format!(" ({ms}ms)")).unwrap_or_default();
            eprintln!("[{}] {}/{}: {}{elapsed}", line.at, line.test, line.phase, line.message);
        }
    }
}

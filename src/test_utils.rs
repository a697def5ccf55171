//! Test utilities for dlbadge.
//!
//! Provides fake collaborators, temp directories, and assertion macros for
//! use across all test modules.
//!
//! # Usage
//!
//! ```rust,ignore
//! use dlbadge::test_utils::*;
//!
//! let fetcher = RecordingFetcher::succeeding(b"<svg/>");
//! let resolver = StaticResolver::new(Some(1234));
//! let dir = TestDir::new();
//! dir.create_file("config.toml", "[server]\nlisten = \"127.0.0.1:0\"");
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::core::http::{BadgeFetcher, FetchOptions};
use crate::core::resolver::{CountQuery, DownloadCountResolver};
use crate::error::{BadgeError, Result};

// =============================================================================
// Fake Collaborators
// =============================================================================

/// Fetcher that always answers with the same body.
#[derive(Debug, Clone)]
pub struct StaticFetcher {
    body: Vec<u8>,
}

impl StaticFetcher {
    #[must_use]
    pub fn new(body: impl Into<Vec<u8>>) -> Self {
        Self { body: body.into() }
    }
}

impl BadgeFetcher for StaticFetcher {
    async fn fetch(&self, _url: &str, _options: &FetchOptions) -> Result<Vec<u8>> {
        Ok(self.body.clone())
    }
}

/// Fetcher that always fails with a network error.
#[derive(Debug, Clone)]
pub struct FailingFetcher {
    reason: String,
}

impl FailingFetcher {
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Default for FailingFetcher {
    fn default() -> Self {
        Self::new("connection refused")
    }
}

impl BadgeFetcher for FailingFetcher {
    async fn fetch(&self, _url: &str, _options: &FetchOptions) -> Result<Vec<u8>> {
        Err(BadgeError::Network(self.reason.clone()))
    }
}

/// One call seen by a [`RecordingFetcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedFetch {
    pub url: String,
    pub accept: Option<String>,
}

/// Fetcher that remembers every call and answers with a fixed outcome.
#[derive(Debug)]
pub struct RecordingFetcher {
    body: Option<Vec<u8>>,
    calls: Mutex<Vec<RecordedFetch>>,
}

impl RecordingFetcher {
    /// Records calls and answers with `body`.
    #[must_use]
    pub fn succeeding(body: impl Into<Vec<u8>>) -> Self {
        Self {
            body: Some(body.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Records calls and fails every one of them.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            body: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every call so far, oldest first.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedFetch> {
        self.calls.lock().expect("recording lock").clone()
    }

    /// URLs of every call so far.
    #[must_use]
    pub fn urls(&self) -> Vec<String> {
        self.calls().into_iter().map(|call| call.url).collect()
    }
}

impl BadgeFetcher for RecordingFetcher {
    async fn fetch(&self, url: &str, options: &FetchOptions) -> Result<Vec<u8>> {
        self.calls
            .lock()
            .expect("recording lock")
            .push(RecordedFetch {
                url: url.to_string(),
                accept: options.accept.clone(),
            });
        self.body
            .clone()
            .ok_or_else(|| BadgeError::Network("recording fetcher set to fail".to_string()))
    }
}

/// Resolver that returns the same count for every query and records them.
#[derive(Debug, Default)]
pub struct StaticResolver {
    count: Option<u64>,
    queries: Mutex<Vec<CountQuery>>,
}

impl StaticResolver {
    #[must_use]
    pub fn new(count: Option<u64>) -> Self {
        Self {
            count,
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Every query seen so far.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn queries(&self) -> Vec<CountQuery> {
        self.queries.lock().expect("resolver lock").clone()
    }
}

impl DownloadCountResolver for StaticResolver {
    async fn resolve(&self, query: &CountQuery) -> Option<u64> {
        self.queries
            .lock()
            .expect("resolver lock")
            .push(query.clone());
        self.count
    }
}

// =============================================================================
// Scratch Directories
// =============================================================================

/// Scratch directory for config files and rendered badges, removed on drop.
///
/// ```rust,ignore
/// let dir = TestDir::new();
/// dir.create_file("config.toml", "[badge_service]\ntimeout_seconds = 5");
/// let config = Config::load_from(&dir.file_path("config.toml"))?;
/// ```
pub struct TestDir {
    root: tempfile::TempDir,
}

impl TestDir {
    /// # Panics
    ///
    /// Panics if no temporary directory can be created.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: tempfile::Builder::new()
                .prefix("dlbadge-test-")
                .tempdir()
                .expect("create scratch dir"),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Absolute path of `name` inside the directory; the file need not exist.
    #[must_use]
    pub fn file_path(&self, name: &str) -> PathBuf {
        self.root.path().join(name)
    }

    /// Write `content` to `name`, creating intermediate directories.
    ///
    /// # Panics
    ///
    /// Panics on any I/O failure.
    pub fn create_file(&self, name: &str, content: &str) {
        let target = self.file_path(name);
        if let Some(dir) = target.parent() {
            fs::create_dir_all(dir).expect("create parent dirs");
        }
        fs::write(&target, content).expect("write scratch file");
    }

    /// # Errors
    ///
    /// Returns the I/O error if `name` cannot be read.
    pub fn read_bytes(&self, name: &str) -> io::Result<Vec<u8>> {
        fs::read(self.file_path(name))
    }

    #[must_use]
    pub fn file_exists(&self, name: &str) -> bool {
        self.file_path(name).is_file()
    }
}

impl Default for TestDir {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Assertion Macros
// =============================================================================

/// Assert that `haystack` contains `needle`.
#[macro_export]
macro_rules! assert_contains {
    ($haystack:expr, $needle:expr $(,)?) => {{
        let (haystack, needle) = (&$haystack, $needle);
        assert!(haystack.contains(needle), "{needle:?} not found in {haystack:?}");
    }};
}

/// Assert that `haystack` does not contain `needle`.
#[macro_export]
macro_rules! assert_not_contains {
    ($haystack:expr, $needle:expr $(,)?) => {{
        let (haystack, needle) = (&$haystack, $needle);
        assert!(!haystack.contains(needle), "{needle:?} unexpectedly found in {haystack:?}");
    }};
}

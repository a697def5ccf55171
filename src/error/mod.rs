//! Error types for dlbadge.
//!
//! Uses `thiserror` for structured error types that map to exit codes.
//!
//! ## Error Taxonomy
//!
//! Errors are categorized into five main categories:
//! - **Network**: Connection failures and timeouts talking to remote services
//! - **Upstream**: Remote services answering with errors or unparseable bodies
//! - **Configuration**: Config file parsing, validation, or missing values
//! - **Input**: Caller-supplied identifiers that cannot be used at all
//! - **Internal**: I/O, serialization, and unclassified failures
//!
//! Malformed badge display parameters never surface as errors; they resolve
//! to defaults.
//!
//! Each error has a stable error code (e.g., `DLB-N001`) for programmatic handling.

use thiserror::Error;

// =============================================================================
// Error Categories
// =============================================================================

/// High-level error categories for classification and routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Network issues (timeout, connection refused, DNS).
    Network,
    /// Remote service answered, but not usefully (non-2xx, bad payload).
    Upstream,
    /// Configuration issues (parse errors, invalid values).
    Configuration,
    /// Unusable caller input (gem names, CLI values).
    Input,
    /// Internal errors (I/O, serialization, unclassified).
    Internal,
}

impl ErrorCategory {
    /// Returns a human-readable description of the category.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Network => "Network error",
            Self::Upstream => "Upstream error",
            Self::Configuration => "Configuration error",
            Self::Input => "Input error",
            Self::Internal => "Internal error",
        }
    }

    /// Returns a short code prefix for this category.
    #[must_use]
    pub const fn code_prefix(&self) -> &'static str {
        match self {
            Self::Network => "N",
            Self::Upstream => "U",
            Self::Configuration => "C",
            Self::Input => "I",
            Self::Internal => "X",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

// =============================================================================
// Exit Codes
// =============================================================================

/// Process exit codes for the `dlbadge` binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// Unexpected failure
    GeneralError = 1,
    /// Config/parse errors and unusable input
    ParseError = 3,
    /// Timeout
    Timeout = 4,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as Self
    }
}

/// Main error type for dlbadge operations.
#[derive(Error, Debug)]
pub enum BadgeError {
    // ==========================================================================
    // Network errors (Category: Network)
    // ==========================================================================
    /// Request timed out after the configured duration.
    #[error("request timeout after {0} seconds")]
    Timeout(u64),

    /// Transport-level failure (connect, DNS, TLS, body read).
    #[error("network error: {0}")]
    Network(String),

    // ==========================================================================
    // Upstream errors (Category: Upstream)
    // ==========================================================================
    /// Remote service answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    UpstreamStatus { status: u16, url: String },

    /// Remote service body could not be parsed.
    #[error("failed to parse response: {0}")]
    ParseResponse(String),

    /// Requested version does not exist for the gem.
    #[error("version {version} not found for gem {gem}")]
    VersionNotFound { gem: String, version: String },

    // ==========================================================================
    // Configuration errors (Category: Configuration)
    // ==========================================================================
    /// Error parsing a configuration file.
    #[error("config parse error at {path}: {message}")]
    ConfigParse { path: String, message: String },

    /// Invalid value in configuration.
    #[error("invalid config value for '{key}': {message}")]
    ConfigInvalid {
        key: String,
        value: String,
        message: String,
    },

    /// Generic configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    // ==========================================================================
    // Input errors (Category: Input)
    // ==========================================================================
    /// Gem name contains characters RubyGems never allows.
    #[error("invalid gem name: {0:?}")]
    InvalidGemName(String),

    // ==========================================================================
    // I/O errors (Category: Internal)
    // ==========================================================================
    /// I/O operation failed (including writes to the output sink).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Catch-all for other errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BadgeError {
    /// Map error to a process exit code.
    #[must_use]
    pub const fn exit_code(&self) -> ExitCode {
        match self {
            Self::Config(_)
            | Self::ConfigParse { .. }
            | Self::ConfigInvalid { .. }
            | Self::InvalidGemName(_)
            | Self::ParseResponse(_) => ExitCode::ParseError,

            Self::Timeout(_) => ExitCode::Timeout,

            Self::Network(_)
            | Self::UpstreamStatus { .. }
            | Self::VersionNotFound { .. }
            | Self::Io(_)
            | Self::Json(_)
            | Self::Other(_) => ExitCode::GeneralError,
        }
    }

    /// Returns the error category for classification and routing.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Timeout(_) | Self::Network(_) => ErrorCategory::Network,

            Self::UpstreamStatus { .. } | Self::ParseResponse(_) | Self::VersionNotFound { .. } => {
                ErrorCategory::Upstream
            }

            Self::Config(_) | Self::ConfigParse { .. } | Self::ConfigInvalid { .. } => {
                ErrorCategory::Configuration
            }

            Self::InvalidGemName(_) => ErrorCategory::Input,

            Self::Io(_) | Self::Json(_) | Self::Other(_) => ErrorCategory::Internal,
        }
    }

    /// Returns a stable error code for programmatic handling.
    ///
    /// Format: `DLB-{category}{number}`.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Timeout(_) => "DLB-N001",
            Self::Network(_) => "DLB-N099",

            Self::UpstreamStatus { .. } => "DLB-U001",
            Self::ParseResponse(_) => "DLB-U002",
            Self::VersionNotFound { .. } => "DLB-U003",

            Self::ConfigParse { .. } => "DLB-C001",
            Self::ConfigInvalid { .. } => "DLB-C002",
            Self::Config(_) => "DLB-C099",

            Self::InvalidGemName(_) => "DLB-I001",

            Self::Io(_) => "DLB-X001",
            Self::Json(_) => "DLB-X002",
            Self::Other(_) => "DLB-X099",
        }
    }

    /// Returns whether the error is potentially recoverable by retrying.
    ///
    /// Only transport failures and server-side (5xx) or rate-limit (429)
    /// answers qualify. The badge core itself never retries; this is for
    /// callers that wrap a fetch collaborator with their own policy.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout(_) | Self::Network(_) => true,
            Self::UpstreamStatus { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Result type alias for dlbadge operations.
pub type Result<T> = std::result::Result<T, BadgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_carry_category_prefix() {
        let errors = [
            BadgeError::Timeout(10),
            BadgeError::Network("refused".to_string()),
            BadgeError::UpstreamStatus {
                status: 502,
                url: "https://img.shields.io/badge/x".to_string(),
            },
            BadgeError::Config("bad".to_string()),
            BadgeError::InvalidGemName("../etc".to_string()),
            BadgeError::Io(std::io::Error::other("sink closed")),
            BadgeError::from(anyhow::anyhow!("writing badge to out.svg")),
        ];

        for err in &errors {
            let prefix = format!("DLB-{}", err.category().code_prefix());
            assert!(
                err.error_code().starts_with(&prefix),
                "{} should start with {prefix}",
                err.error_code()
            );
        }
    }

    #[test]
    fn exit_codes() {
        assert_eq!(BadgeError::Timeout(5).exit_code(), ExitCode::Timeout);
        assert_eq!(
            BadgeError::Config("x".to_string()).exit_code(),
            ExitCode::ParseError
        );
        assert_eq!(
            BadgeError::InvalidGemName("a b".to_string()).exit_code(),
            ExitCode::ParseError
        );
        assert_eq!(
            BadgeError::Network("x".to_string()).exit_code(),
            ExitCode::GeneralError
        );
        assert_eq!(i32::from(ExitCode::Timeout), 4);
    }

    #[test]
    fn contextual_errors_keep_their_message() {
        let err = BadgeError::from(anyhow::anyhow!("writing badge to out.svg"));
        assert_eq!(err.error_code(), "DLB-X099");
        assert_eq!(err.exit_code(), ExitCode::GeneralError);
        assert_eq!(err.to_string(), "writing badge to out.svg");
    }

    #[test]
    fn retryable_statuses() {
        let status = |status| BadgeError::UpstreamStatus {
            status,
            url: String::new(),
        };
        assert!(status(503).is_retryable());
        assert!(status(429).is_retryable());
        assert!(!status(404).is_retryable());
        assert!(BadgeError::Timeout(3).is_retryable());
        assert!(!BadgeError::ParseResponse("x".to_string()).is_retryable());
    }

    #[test]
    fn display_messages() {
        let err = BadgeError::UpstreamStatus {
            status: 404,
            url: "https://rubygems.org/api/v1/gems/nope.json".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "HTTP 404 from https://rubygems.org/api/v1/gems/nope.json"
        );
        assert_eq!(
            BadgeError::InvalidGemName("a/b".to_string()).to_string(),
            "invalid gem name: \"a/b\""
        );
    }
}

//! Configuration file loading and management.
//!
//! Loads configuration from:
//! - Linux: `~/.config/dlbadge/config.toml`
//! - macOS: `~/Library/Application Support/dlbadge/config.toml`
//! - Windows: `%APPDATA%/dlbadge/config/config.toml`
//!
//! ## Precedence
//!
//! Settings are resolved with the following precedence (highest first):
//! 1. CLI flags
//! 2. Environment variables
//! 3. Config file
//! 4. Built-in defaults
//!
//! ## Environment Variables
//!
//! - `DLBADGE_LISTEN`: Server listen address (e.g., "0.0.0.0:8080")
//! - `DLBADGE_BADGE_URL`: Badge service base URL
//! - `DLBADGE_RUBYGEMS_URL`: RubyGems API base URL
//! - `DLBADGE_TIMEOUT`: Timeout in seconds for both remote services
//! - `DLBADGE_CONFIG`: Override config file path

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use super::AppPaths;
use crate::cli::args::Cli;
use crate::core::badge_url::DEFAULT_BADGE_SERVICE_URL;
use crate::core::logging::{LogDefaults, LogFormat, LogLevel};
use crate::core::resolver::DEFAULT_RUBYGEMS_URL;
use crate::error::{BadgeError, Result};

// =============================================================================
// Environment Variable Names
// =============================================================================

/// Environment variable for the server listen address.
pub const ENV_LISTEN: &str = "DLBADGE_LISTEN";
/// Environment variable for the badge service base URL.
pub const ENV_BADGE_URL: &str = "DLBADGE_BADGE_URL";
/// Environment variable for the RubyGems API base URL.
pub const ENV_RUBYGEMS_URL: &str = "DLBADGE_RUBYGEMS_URL";
/// Environment variable for timeout in seconds.
pub const ENV_TIMEOUT: &str = "DLBADGE_TIMEOUT";
/// Environment variable to override config file path.
pub const ENV_CONFIG: &str = "DLBADGE_CONFIG";

/// Default listen address for `dlbadge serve`.
pub const DEFAULT_LISTEN: &str = "127.0.0.1:8080";
/// Default timeout for remote services, in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
/// Upper bound accepted for any timeout, in seconds.
pub const MAX_TIMEOUT_SECONDS: u64 = 300;

// =============================================================================
// Resolved Configuration
// =============================================================================

/// Fully resolved configuration after merging CLI, env vars, and config file.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Address the badge server binds to.
    pub listen: SocketAddr,
    /// Badge service base URL, without trailing slash.
    pub badge_url: String,
    /// Timeout for badge service requests.
    pub badge_timeout: Duration,
    /// RubyGems API base URL, without trailing slash.
    pub rubygems_url: String,
    /// Timeout for RubyGems requests.
    pub rubygems_timeout: Duration,
    /// Source of each setting for debugging.
    pub sources: ConfigSources,
}

/// Tracks the source of each configuration value.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    pub listen: ConfigSource,
    pub badge_url: ConfigSource,
    pub badge_timeout: ConfigSource,
    pub rubygems_url: ConfigSource,
    pub rubygems_timeout: ConfigSource,
}

/// Where a configuration value came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Value from CLI flag.
    Cli,
    /// Value from environment variable.
    Env,
    /// Value from config file.
    ConfigFile,
    /// Built-in default.
    #[default]
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI flag"),
            Self::Env => write!(f, "environment variable"),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// Values supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub listen: Option<String>,
    pub badge_url: Option<String>,
    pub rubygems_url: Option<String>,
    pub timeout: Option<u64>,
}

impl ConfigOverrides {
    /// Collect overrides from global flags plus a command's `--listen`.
    #[must_use]
    pub fn from_cli(cli: &Cli, listen: Option<&str>) -> Self {
        Self {
            config_path: cli.config.clone(),
            listen: listen.map(str::to_string),
            badge_url: cli.badge_url.clone(),
            rubygems_url: cli.rubygems_url.clone(),
            timeout: cli.timeout,
        }
    }
}

impl ResolvedConfig {
    /// Resolve final configuration from CLI args, environment variables, and config file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file exists but cannot be parsed
    /// - Its logging section names an unknown level or format
    /// - Any resolved value is invalid (e.g., a non-http base URL)
    pub fn resolve(overrides: &ConfigOverrides) -> Result<Self> {
        let config = Config::load_with_override(overrides.config_path.as_deref())?;
        config.validate()?;
        Self::resolve_from(overrides, &config, |key| std::env::var(key).ok())
    }

    /// Resolve against an explicit config and environment lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if any resolved value is invalid.
    pub fn resolve_from<E>(overrides: &ConfigOverrides, config: &Config, env: E) -> Result<Self>
    where
        E: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| env(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut sources = ConfigSources::default();

        let listen = pick(
            overrides.listen.clone(),
            env(ENV_LISTEN),
            config.server.listen.clone(),
            DEFAULT_LISTEN.to_string(),
            &mut sources.listen,
        );
        let listen = parse_listen(&listen)?;

        let badge_url = pick(
            overrides.badge_url.clone(),
            env(ENV_BADGE_URL),
            config.badge_service.base_url.clone(),
            DEFAULT_BADGE_SERVICE_URL.to_string(),
            &mut sources.badge_url,
        );
        let badge_url = validate_base_url("badge_service.base_url", &badge_url)?;

        let rubygems_url = pick(
            overrides.rubygems_url.clone(),
            env(ENV_RUBYGEMS_URL),
            config.rubygems.base_url.clone(),
            DEFAULT_RUBYGEMS_URL.to_string(),
            &mut sources.rubygems_url,
        );
        let rubygems_url = validate_base_url("rubygems.base_url", &rubygems_url)?;

        let env_timeout = env(ENV_TIMEOUT)
            .map(|raw| {
                raw.parse::<u64>().map_err(|_| BadgeError::ConfigInvalid {
                    key: ENV_TIMEOUT.to_string(),
                    value: raw.clone(),
                    message: "expected a whole number of seconds".to_string(),
                })
            })
            .transpose()?;

        let badge_timeout = pick(
            overrides.timeout,
            env_timeout,
            config.badge_service.timeout_seconds,
            DEFAULT_TIMEOUT_SECONDS,
            &mut sources.badge_timeout,
        );
        let rubygems_timeout = pick(
            overrides.timeout,
            env_timeout,
            config.rubygems.timeout_seconds,
            DEFAULT_TIMEOUT_SECONDS,
            &mut sources.rubygems_timeout,
        );

        Ok(Self {
            listen,
            badge_url,
            badge_timeout: Duration::from_secs(validate_timeout("badge_service.timeout_seconds", badge_timeout)?),
            rubygems_url,
            rubygems_timeout: Duration::from_secs(validate_timeout("rubygems.timeout_seconds", rubygems_timeout)?),
            sources,
        })
    }
}

/// First present value by precedence, recording where it came from.
fn pick<T>(cli: Option<T>, env: Option<T>, file: Option<T>, default: T, source: &mut ConfigSource) -> T {
    if let Some(value) = cli {
        *source = ConfigSource::Cli;
        value
    } else if let Some(value) = env {
        *source = ConfigSource::Env;
        value
    } else if let Some(value) = file {
        *source = ConfigSource::ConfigFile;
        value
    } else {
        *source = ConfigSource::Default;
        default
    }
}

fn parse_listen(raw: &str) -> Result<SocketAddr> {
    raw.trim().parse().map_err(|_| BadgeError::ConfigInvalid {
        key: "server.listen".to_string(),
        value: raw.to_string(),
        message: "expected a socket address such as 127.0.0.1:8080".to_string(),
    })
}

fn validate_base_url(key: &str, raw: &str) -> Result<String> {
    let invalid = |message: &str| BadgeError::ConfigInvalid {
        key: key.to_string(),
        value: raw.to_string(),
        message: message.to_string(),
    };
    let parsed = Url::parse(raw.trim()).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid("only http and https URLs are supported"));
    }
    if parsed.host_str().is_none() {
        return Err(invalid("URL has no host"));
    }
    Ok(raw.trim().trim_end_matches('/').to_string())
}

fn validate_timeout(key: &str, seconds: u64) -> Result<u64> {
    if seconds == 0 || seconds > MAX_TIMEOUT_SECONDS {
        return Err(BadgeError::ConfigInvalid {
            key: key.to_string(),
            value: seconds.to_string(),
            message: format!("Timeout must be between 1 and {MAX_TIMEOUT_SECONDS} seconds"),
        });
    }
    Ok(seconds)
}

// =============================================================================
// Config File
// =============================================================================

/// Application configuration as written in the file.
///
/// Every key is optional; an absent key falls through to the built-in
/// default during resolution.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Badge server settings.
    pub server: ServerConfig,
    /// Badge rendering service settings.
    pub badge_service: BadgeServiceConfig,
    /// RubyGems API settings.
    pub rubygems: RubyGemsConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Badge server settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to bind.
    pub listen: Option<String>,
}

/// Badge rendering service settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BadgeServiceConfig {
    /// Base URL of a shields-compatible service.
    pub base_url: Option<String>,
    /// Request timeout in seconds.
    pub timeout_seconds: Option<u64>,
}

/// RubyGems API settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RubyGemsConfig {
    /// Base URL of the RubyGems instance.
    pub base_url: Option<String>,
    /// Request timeout in seconds.
    pub timeout_seconds: Option<u64>,
}

/// Logging settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level (error, warn, info, debug, trace).
    pub level: Option<String>,
    /// Default log format (human, compact, json).
    pub format: Option<String>,
}

impl Config {
    /// Load configuration from the default config file path.
    ///
    /// Returns default config if the file doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns error only if the file exists but is invalid.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load from `path`, else `DLBADGE_CONFIG`, else the default location.
    ///
    /// # Errors
    ///
    /// Returns error only if the chosen file exists but is invalid.
    pub fn load_with_override(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => match std::env::var(ENV_CONFIG) {
                Ok(path) if !path.trim().is_empty() => Self::load_from(Path::new(path.trim())),
                _ => Self::load(),
            },
        }
    }

    /// Load configuration from a specific path.
    ///
    /// Returns default config if the file doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns error only if the file exists but is invalid.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(?path, "Config file not found, using defaults");
            return Ok(Self::default());
        }

        tracing::debug!(?path, "Loading config file");
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| BadgeError::ConfigParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Get the config file path.
    #[must_use]
    pub fn config_path() -> PathBuf {
        AppPaths::new().config_file()
    }

    /// Configured log level, if any.
    #[must_use]
    pub fn log_level(&self) -> Option<LogLevel> {
        self.logging.level.as_deref().and_then(LogLevel::from_arg)
    }

    /// Configured log format, if any.
    #[must_use]
    pub fn log_format(&self) -> Option<LogFormat> {
        self.logging.format.as_deref().and_then(LogFormat::from_arg)
    }

    /// Logging defaults contributed by this file.
    #[must_use]
    pub fn log_defaults(&self) -> LogDefaults {
        LogDefaults {
            level: self.log_level(),
            format: self.log_format(),
        }
    }

    /// Validate the values no flag or environment variable can override.
    ///
    /// Listen address, base URLs and timeouts are checked after resolution
    /// in [`ResolvedConfig::resolve_from`], so a bad file value is only an
    /// error when it is the one that wins.
    ///
    /// # Errors
    ///
    /// Returns an error for an unrecognized logging level or format.
    pub fn validate(&self) -> Result<()> {
        if let Some(level) = &self.logging.level
            && LogLevel::from_arg(level).is_none()
        {
            return Err(BadgeError::ConfigInvalid {
                key: "logging.level".to_string(),
                value: level.clone(),
                message: "Valid levels: trace, debug, info, warn, error".to_string(),
            });
        }
        if let Some(format) = &self.logging.format
            && LogFormat::from_arg(format).is_none()
        {
            return Err(BadgeError::ConfigInvalid {
                key: "logging.format".to_string(),
                value: format.clone(),
                message: "Valid formats: human, compact, json".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn no_env(_key: &str) -> Option<String> {
        None
    }

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.badge_service.base_url, None);
        assert_eq!(config.rubygems.timeout_seconds, None);
    }

    #[test]
    fn load_missing_file_returns_default() {
        let config = Config::load_from(Path::new("/nonexistent/path/config.toml")).unwrap();
        assert_eq!(config.server.listen, None);
    }

    #[test]
    fn load_valid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[server]
listen = "0.0.0.0:9000"

[badge_service]
base_url = "http://badges.internal/"
timeout_seconds = 5

[logging]
level = "debug"
format = "json"
"#
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.server.listen.as_deref(), Some("0.0.0.0:9000"));
        assert_eq!(config.badge_service.timeout_seconds, Some(5));
        assert_eq!(config.rubygems.base_url, None);
        assert_eq!(config.log_level(), Some(LogLevel::Debug));
        assert_eq!(config.log_format(), Some(LogFormat::Json));
    }

    #[test]
    fn load_invalid_toml_returns_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "this is not valid toml {{{{").unwrap();

        let err = Config::load_from(file.path()).unwrap_err();
        assert!(matches!(err, BadgeError::ConfigParse { .. }));
    }

    #[test]
    fn validate_rejects_bad_logging_values() {
        let mut config = Config::default();
        config.logging.level = Some("chatty".to_string());
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.logging.format = Some("xml".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn bad_file_values_fail_only_when_they_win() {
        let mut config = Config::default();
        config.badge_service.timeout_seconds = Some(0);
        config.rubygems.timeout_seconds = Some(0);
        config.rubygems.base_url = Some("ftp://rubygems.org".to_string());
        config.server.listen = Some("localhost".to_string());
        assert!(config.validate().is_ok());

        let err = ResolvedConfig::resolve_from(&ConfigOverrides::default(), &config, no_env).unwrap_err();
        assert!(matches!(err, BadgeError::ConfigInvalid { ref key, .. } if key == "server.listen"));

        let overrides = ConfigOverrides {
            listen: Some("127.0.0.1:9000".to_string()),
            rubygems_url: Some("https://rubygems.org".to_string()),
            ..ConfigOverrides::default()
        };
        let err = ResolvedConfig::resolve_from(&overrides, &config, no_env).unwrap_err();
        assert!(err.to_string().contains("between 1 and 300"), "{err}");

        let overrides = ConfigOverrides {
            timeout: Some(5),
            ..overrides
        };
        let resolved = ResolvedConfig::resolve_from(&overrides, &config, no_env).unwrap();
        assert_eq!(resolved.badge_timeout, Duration::from_secs(5));
        assert_eq!(resolved.rubygems_timeout, Duration::from_secs(5));
    }

    #[test]
    fn file_zero_timeout_is_overridden_by_env() {
        let mut config = Config::default();
        config.badge_service.timeout_seconds = Some(0);
        let env = env_of(&[(ENV_TIMEOUT, "7")]);

        let resolved = ResolvedConfig::resolve_from(&ConfigOverrides::default(), &config, env).unwrap();
        assert_eq!(resolved.badge_timeout, Duration::from_secs(7));
        assert_eq!(resolved.sources.badge_timeout, ConfigSource::Env);
    }

    #[test]
    fn file_value_equal_to_default_is_reported_as_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[server]\nlisten = \"{DEFAULT_LISTEN}\"\n\n[rubygems]\ntimeout_seconds = {DEFAULT_TIMEOUT_SECONDS}"
        )
        .unwrap();
        let config = Config::load_from(file.path()).unwrap();

        let resolved = ResolvedConfig::resolve_from(&ConfigOverrides::default(), &config, no_env).unwrap();
        assert_eq!(resolved.sources.listen, ConfigSource::ConfigFile);
        assert_eq!(resolved.sources.rubygems_timeout, ConfigSource::ConfigFile);
        assert_eq!(resolved.sources.badge_timeout, ConfigSource::Default);
        assert_eq!(resolved.sources.badge_url, ConfigSource::Default);
    }

    #[test]
    fn defaults_when_nothing_set() {
        let resolved =
            ResolvedConfig::resolve_from(&ConfigOverrides::default(), &Config::default(), no_env)
                .unwrap();
        assert_eq!(resolved.listen, "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(resolved.badge_url, "https://img.shields.io");
        assert_eq!(resolved.badge_timeout, Duration::from_secs(10));
        assert_eq!(resolved.sources.badge_url, ConfigSource::Default);
        assert_eq!(resolved.sources.listen, ConfigSource::Default);
    }

    #[test]
    fn env_beats_file_and_cli_beats_env() {
        let mut config = Config::default();
        config.badge_service.base_url = Some("http://file.example".to_string());
        let env = env_of(&[
            (ENV_BADGE_URL, "http://env.example/"),
            (ENV_TIMEOUT, "20"),
            (ENV_LISTEN, "0.0.0.0:7000"),
        ]);

        let resolved = ResolvedConfig::resolve_from(&ConfigOverrides::default(), &config, env_of(&[])).unwrap();
        assert_eq!(resolved.badge_url, "http://file.example");
        assert_eq!(resolved.sources.badge_url, ConfigSource::ConfigFile);

        let resolved = ResolvedConfig::resolve_from(&ConfigOverrides::default(), &config, &env).unwrap();
        assert_eq!(resolved.badge_url, "http://env.example");
        assert_eq!(resolved.sources.badge_url, ConfigSource::Env);
        assert_eq!(resolved.rubygems_timeout, Duration::from_secs(20));
        assert_eq!(resolved.listen.port(), 7000);

        let overrides = ConfigOverrides {
            badge_url: Some("http://cli.example".to_string()),
            timeout: Some(3),
            ..ConfigOverrides::default()
        };
        let resolved = ResolvedConfig::resolve_from(&overrides, &config, &env).unwrap();
        assert_eq!(resolved.badge_url, "http://cli.example");
        assert_eq!(resolved.sources.badge_url, ConfigSource::Cli);
        assert_eq!(resolved.badge_timeout, Duration::from_secs(3));
        assert_eq!(resolved.sources.badge_timeout, ConfigSource::Cli);
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let env = env_of(&[(ENV_RUBYGEMS_URL, "   ")]);
        let resolved =
            ResolvedConfig::resolve_from(&ConfigOverrides::default(), &Config::default(), env).unwrap();
        assert_eq!(resolved.rubygems_url, DEFAULT_RUBYGEMS_URL);
    }

    #[test]
    fn invalid_overrides_are_errors() {
        let env = env_of(&[(ENV_TIMEOUT, "soon")]);
        let err = ResolvedConfig::resolve_from(&ConfigOverrides::default(), &Config::default(), env)
            .unwrap_err();
        assert!(matches!(err, BadgeError::ConfigInvalid { ref key, .. } if key == ENV_TIMEOUT));

        let overrides = ConfigOverrides {
            timeout: Some(301),
            ..ConfigOverrides::default()
        };
        assert!(ResolvedConfig::resolve_from(&overrides, &Config::default(), no_env).is_err());

        let overrides = ConfigOverrides {
            listen: Some("not-an-address".to_string()),
            ..ConfigOverrides::default()
        };
        assert!(ResolvedConfig::resolve_from(&overrides, &Config::default(), no_env).is_err());
    }

    #[test]
    fn config_source_display() {
        assert_eq!(ConfigSource::Cli.to_string(), "CLI flag");
        assert_eq!(ConfigSource::Default.to_string(), "default");
    }
}

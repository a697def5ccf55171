//! Structured logging setup.
//!
//! Human, compact or JSON output to stderr (or a file), filtered by level.
//! [`LogSettings`] layers the sources: CLI flag, then `DLBADGE_LOG*`
//! environment, then the config file, then defaults. `RUST_LOG` overrides
//! the resulting filter entirely.

use std::fs::OpenOptions;
use std::path::PathBuf;

use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

pub const LOG_LEVEL_ENV: &str = "DLBADGE_LOG";
pub const LOG_FORMAT_ENV: &str = "DLBADGE_LOG_FORMAT";
pub const LOG_FILE_ENV: &str = "DLBADGE_LOG_FILE";

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Human,
    /// One JSON object per event.
    Json,
    Compact,
}

impl LogFormat {
    /// Case-insensitive name lookup.
    #[must_use]
    pub fn from_arg(s: &str) -> Option<Self> {
        [Self::Human, Self::Json, Self::Compact]
            .into_iter()
            .find(|format| format.name().eq_ignore_ascii_case(s.trim()))
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Human => "human",
            Self::Json => "json",
            Self::Compact => "compact",
        }
    }
}

/// Minimum level logged for the `dlbadge` target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Case-insensitive name lookup; `verbose`, `warning` and `critical`
    /// are accepted as aliases.
    #[must_use]
    pub fn from_arg(s: &str) -> Option<Self> {
        let name = s.trim().to_ascii_lowercase();
        let level = match name.as_str() {
            "verbose" => Self::Debug,
            "warning" => Self::Warn,
            "critical" => Self::Error,
            other => [Self::Error, Self::Warn, Self::Info, Self::Debug, Self::Trace]
                .into_iter()
                .find(|level| level.as_filter() == other)?,
        };
        Some(level)
    }

    /// Directive name understood by [`EnvFilter`].
    #[must_use]
    pub const fn as_filter(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }

    /// `--verbose` raises the level to at least debug.
    #[must_use]
    pub fn raised_to_debug(self) -> Self {
        self.max(Self::Debug)
    }
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Self::ERROR,
            LogLevel::Warn => Self::WARN,
            LogLevel::Info => Self::INFO,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Trace => Self::TRACE,
        }
    }
}

/// Command-line inputs that affect logging.
#[derive(Debug, Clone, Default)]
pub struct LogArgs<'a> {
    pub level: Option<&'a str>,
    pub json: bool,
    pub verbose: bool,
}

/// Defaults taken from the config file.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDefaults {
    pub level: Option<LogLevel>,
    pub format: Option<LogFormat>,
}

/// Effective logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogSettings {
    pub level: LogLevel,
    pub format: LogFormat,
    pub file: Option<PathBuf>,
}

impl LogSettings {
    /// Resolve settings against the process environment.
    #[must_use]
    pub fn resolve(args: &LogArgs<'_>, defaults: LogDefaults) -> Self {
        Self::resolve_from(args, defaults, |key| std::env::var(key).ok())
    }

    /// Resolve settings with an injected environment lookup.
    pub fn resolve_from<E>(args: &LogArgs<'_>, defaults: LogDefaults, env: E) -> Self
    where
        E: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| {
            env(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let level = args
            .level
            .and_then(LogLevel::from_arg)
            .or_else(|| env(LOG_LEVEL_ENV).and_then(|v| LogLevel::from_arg(&v)))
            .or(defaults.level)
            .unwrap_or_default();
        let level = if args.verbose { level.raised_to_debug() } else { level };

        let format = if args.json {
            LogFormat::Json
        } else {
            env(LOG_FORMAT_ENV)
                .and_then(|v| LogFormat::from_arg(&v))
                .or(defaults.format)
                .unwrap_or_default()
        };

        Self {
            level,
            format,
            file: env(LOG_FILE_ENV).map(PathBuf::from),
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("dlbadge={}", self.level.as_filter())))
    }

    /// Log file if set and writable, otherwise stderr.
    fn writer(&self) -> BoxMakeWriter {
        let file = self.file.as_ref().and_then(|path| {
            OpenOptions::new().create(true).append(true).open(path).ok()
        });
        match file {
            Some(file) => BoxMakeWriter::new(file),
            None => BoxMakeWriter::new(std::io::stderr),
        }
    }
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(settings: &LogSettings) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(settings.filter())
        .with_writer(settings.writer());

    let installed = match settings.format {
        LogFormat::Json => builder
            .json()
            .with_span_events(FmtSpan::CLOSE)
            .try_init(),
        LogFormat::Compact => builder.compact().with_target(true).try_init(),
        LogFormat::Human => builder.with_target(false).try_init(),
    };

    if installed.is_ok() {
        tracing::debug!(
            level = settings.level.as_filter(),
            format = settings.format.name(),
            "Logging initialized"
        );
    }
}

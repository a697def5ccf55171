//! Storage for configuration.

pub mod config;
pub mod paths;

pub use config::{
    Config, ConfigSource, ConfigSources, ENV_BADGE_URL, ENV_CONFIG, ENV_LISTEN, ENV_RUBYGEMS_URL,
    ENV_TIMEOUT, ResolvedConfig,
};
pub use paths::AppPaths;

//! Application paths for configuration.

use directories::ProjectDirs;
use std::path::PathBuf;

/// Application paths.
pub struct AppPaths {
    /// Configuration directory.
    pub config: PathBuf,
}

impl AppPaths {
    /// Create paths for the dlbadge application.
    #[must_use]
    pub fn new() -> Self {
        ProjectDirs::from("", "", "dlbadge").map_or_else(
            || {
                let home = directories::BaseDirs::new()
                    .map_or_else(|| PathBuf::from("."), |d| d.home_dir().to_path_buf());
                Self {
                    config: home.join(".config/dlbadge"),
                }
            },
            |dirs| Self {
                config: dirs.config_dir().to_path_buf(),
            },
        )
    }

    /// Path to the main config file.
    #[must_use]
    pub fn config_file(&self) -> PathBuf {
        self.config.join("config.toml")
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

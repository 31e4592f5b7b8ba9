use std::path::{Path, PathBuf};
use anyhow::{Context, Result};

/// Settings read from the rc file (`~/.funnelboard/rc`)
///
/// The file holds `key=value` lines. Blank lines and lines starting with `#`
/// are ignored, as are unknown keys.
///
/// ```text
/// data.location=./board.db
/// user=1
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Database file location, already resolved against the rc directory
    pub data_location: Option<PathBuf>,
    /// Default principal for CLI commands
    pub user: Option<i64>,
}

impl Config {
    /// Directory holding the rc file and the default database
    pub fn home_dir() -> PathBuf {
        let home = std::env::var_os("HOME")
            .map(PathBuf::from)
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        home.join(".funnelboard")
    }

    /// Get the configuration file path
    pub fn path() -> PathBuf {
        Self::home_dir().join("rc")
    }

    /// Load the rc file, returning defaults when it does not exist
    pub fn load() -> Result<Self> {
        let path = Self::path();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content, path.parent().unwrap_or_else(|| Path::new(".")))
    }

    /// Parse rc content; relative `data.location` values resolve against `base_dir`
    pub fn parse(content: &str, base_dir: &Path) -> Result<Self> {
        let mut config = Self::default();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                log::warn!("Ignoring malformed config line: {}", line);
                continue;
            };
            let value = value.trim();
            match key.trim() {
                "data.location" => {
                    let path = PathBuf::from(value);
                    config.data_location = Some(if path.is_relative() {
                        base_dir.join(path)
                    } else {
                        path
                    });
                }
                "user" => {
                    let id = value.parse::<i64>()
                        .with_context(|| format!("Invalid user id in config: '{}'", value))?;
                    config.user = Some(id);
                }
                other => log::debug!("Ignoring unknown config key: {}", other),
            }
        }

        Ok(config)
    }
}

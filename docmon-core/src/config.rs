use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::command::DEFAULT_KILL_SIGNAL;

const CONFIG_NAMES: [&str; 4] = ["docmon.yaml", "docmon.yml", ".docmon.yaml", ".docmon.yml"];
const MIN_REFRESH_INTERVAL_MS: u64 = 100;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeName {
    #[default]
    Dark,
    HighContrast,
}

impl FromStr for ThemeName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dark" => Ok(Self::Dark),
            "high-contrast" => Ok(Self::HighContrast),
            other => Err(format!("unknown theme `{other}` (expected dark or high-contrast)")),
        }
    }
}

/// Root configuration file structure
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct DocmonConfig {
    /// How often the list is refreshed
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,

    /// List stopped containers as well as running ones
    #[serde(default = "default_true")]
    pub include_stopped: bool,

    /// Signal sent by the kill key
    #[serde(default = "default_kill_signal")]
    pub kill_signal: String,

    #[serde(default)]
    pub theme: ThemeName,
}

fn default_refresh_interval_ms() -> u64 {
    1000
}
fn default_true() -> bool {
    true
}
fn default_kill_signal() -> String {
    DEFAULT_KILL_SIGNAL.into()
}

impl Default for DocmonConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: default_refresh_interval_ms(),
            include_stopped: true,
            kill_signal: default_kill_signal(),
            theme: ThemeName::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("no config file found, searched: {searched:?}")]
    NotFound { searched: Vec<PathBuf> },
}

impl DocmonConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: DocmonConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Search `$DOCMON_CONFIG`, then `start_dir` and its parents, then the user config dir.
    pub fn discover(start_dir: &Path) -> Result<(PathBuf, Self), ConfigError> {
        let env_path = std::env::var_os("DOCMON_CONFIG").map(PathBuf::from);
        let user_dir = dirs::config_dir().map(|d| d.join("docmon"));
        Self::discover_in(env_path, start_dir, user_dir.as_deref())
    }

    fn discover_in(
        env_path: Option<PathBuf>,
        start_dir: &Path,
        user_dir: Option<&Path>,
    ) -> Result<(PathBuf, Self), ConfigError> {
        let mut searched = Vec::new();

        if let Some(path) = env_path {
            if path.exists() {
                let config = Self::load(&path)?;
                return Ok((path, config));
            }
            searched.push(path);
        }

        let mut dir = Some(start_dir);
        while let Some(current) = dir {
            if let Some(found) = Self::probe(current, &CONFIG_NAMES, &mut searched)? {
                return Ok(found);
            }
            dir = current.parent();
        }

        if let Some(user_dir) = user_dir {
            if let Some(found) = Self::probe(user_dir, &CONFIG_NAMES[..2], &mut searched)? {
                return Ok(found);
            }
        }

        Err(ConfigError::NotFound { searched })
    }

    /// Load the first of `names` present in `dir`, recording every miss.
    fn probe(
        dir: &Path,
        names: &[&str],
        searched: &mut Vec<PathBuf>,
    ) -> Result<Option<(PathBuf, Self)>, ConfigError> {
        for name in names {
            let path = dir.join(name);
            if path.exists() {
                let config = Self::load(&path)?;
                return Ok(Some((path, config)));
            }
            searched.push(path);
        }
        Ok(None)
    }

    /// Apply command-line overrides and validate the result.
    pub fn with_overrides(
        mut self,
        refresh_interval_ms: Option<u64>,
        theme: Option<ThemeName>,
    ) -> Result<Self, ConfigError> {
        if let Some(ms) = refresh_interval_ms {
            self.refresh_interval_ms = ms;
        }
        if let Some(theme) = theme {
            self.theme = theme;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh_interval_ms < MIN_REFRESH_INTERVAL_MS {
            return Err(ConfigError::Invalid {
                field: "refresh_interval_ms",
                reason: format!(
                    "{} is below the minimum of {MIN_REFRESH_INTERVAL_MS}",
                    self.refresh_interval_ms
                ),
            });
        }
        if self.kill_signal.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "kill_signal",
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }
}

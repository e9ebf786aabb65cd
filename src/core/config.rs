//! Configuration management with layered hierarchy
//!
//! Sources, lowest priority first:
//! 1. Built-in defaults (full window, butterfly pleat)
//! 2. User config (`~/.config/curtain/config.yaml` or platform equivalent)
//! 3. Project config (`.curtain.yaml`, found by walking up from the cwd)
//! 4. Explicit file (`--config` / `CURTAIN_CONFIG`)
//! 5. Environment variables (`CURTAIN_WINDOW`, `CURTAIN_STYLE`, `CURTAIN_FORMAT`)

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::sizing::{PleatStyle, SizingError, WindowType};

/// File name of the per-project config
pub const PROJECT_CONFIG_FILE: &str = ".curtain.yaml";

/// A config file that was asked for by name but cannot be used
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("Config file not found: {}", path.display())]
    #[diagnostic(
        code(curtain::config::not_found),
        help("Check the --config path or the CURTAIN_CONFIG variable")
    )]
    NotFound { path: PathBuf },

    #[error("Cannot read config file {}", path.display())]
    #[diagnostic(code(curtain::config::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot parse config file {}", path.display())]
    #[diagnostic(
        code(curtain::config::parse),
        help("Config files are YAML maps, e.g. `style: plain`")
    )]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yml::Error,
    },
}

/// Calculator configuration
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default window type when none is given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<String>,

    /// Default pleat style when none is given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,

    /// Default output format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_format: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    ///
    /// The user and project files are skipped when missing or malformed.
    /// An explicit file must exist and parse.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut paths = Vec::new();
        if let Some(global) = Self::global_config_path() {
            paths.push(global);
        }
        if let Some(project) = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::find_project_config(&cwd))
        {
            paths.push(project);
        }

        let mut config = Self::load_from(&paths);
        if let Some(path) = explicit {
            config.merge(Self::read_required(path)?);
        }
        config.apply_env();
        Ok(config)
    }

    /// Merge the given files in order; later files take precedence
    pub fn load_from(paths: &[PathBuf]) -> Self {
        let mut config = Config::default();
        for path in paths {
            if let Some(layer) = Self::read_file(path) {
                config.merge(layer);
            }
        }
        config
    }

    /// Read one config file, skipping it if missing or malformed
    pub fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        match Self::read_required(path) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring config file");
                None
            }
        }
    }

    /// Read one config file that must exist and parse
    pub fn read_required(path: &Path) -> Result<Config, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if contents.trim().is_empty() {
            return Ok(Config::default());
        }
        let config = serde_yml::from_str::<Config>(&contents).map_err(|source| {
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })?;
        debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Get the path to the user config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "curtain")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Find `.curtain.yaml` in `start` or any of its parents
    pub fn find_project_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(PROJECT_CONFIG_FILE);
            if candidate.is_file() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.window.is_some() {
            self.window = other.window;
        }
        if other.style.is_some() {
            self.style = other.style;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
    }

    fn apply_env(&mut self) {
        if let Ok(window) = std::env::var("CURTAIN_WINDOW") {
            self.window = Some(window);
        }
        if let Ok(style) = std::env::var("CURTAIN_STYLE") {
            self.style = Some(style);
        }
        if let Ok(format) = std::env::var("CURTAIN_FORMAT") {
            self.default_format = Some(format);
        }
    }

    /// Configured window type, or full window
    pub fn window_type(&self) -> Result<WindowType, SizingError> {
        self.window
            .as_deref()
            .map_or(Ok(WindowType::default()), str::parse::<WindowType>)
    }

    /// Configured pleat style, or butterfly pleat
    pub fn pleat_style(&self) -> Result<PleatStyle, SizingError> {
        self.style
            .as_deref()
            .map_or(Ok(PleatStyle::default()), str::parse::<PleatStyle>)
    }

    /// Look up a key by name
    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            "window" => self.window.as_deref(),
            "style" => self.style.as_deref(),
            "default_format" => self.default_format.as_deref(),
            _ => None,
        }
    }
}

//! # Configuration
//!
//! Settings come from three layers, later ones winning:
//!
//! 1. `agromercado.toml` (optional)
//! 2. Environment: `AGROMERCADO_API_URL`, `AGROMERCADO_TIMEOUT_SECS`,
//!    `AGROMERCADO_SESSION`
//! 3. Command-line flags
//!
//! Layers 2 and 3 are merged by clap before they reach [`Settings::resolve`].

use crate::error::AppError;
use agromercado_client::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file read from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "agromercado.toml";

/// Session file used when nothing else is configured.
pub const DEFAULT_SESSION_FILE: &str = ".agromercado-session.json";

/// Contents of `agromercado.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub session_path: Option<PathBuf>,
}

impl FileConfig {
    pub fn parse(text: &str) -> Result<Self, AppError> {
        toml::from_str(text).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Load a config file.
    ///
    /// An explicitly requested file must exist; the default one may be absent.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let (path, required) = match path {
            Some(p) => (p, true),
            None => (Path::new(DEFAULT_CONFIG_FILE), false),
        };
        match std::fs::read_to_string(path) {
            Ok(text) => {
                tracing::debug!(path = %path.display(), "loaded config file");
                Self::parse(&text)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => Ok(Self::default()),
            Err(e) => Err(AppError::Config(format!(
                "cannot read {}: {e}",
                path.display()
            ))),
        }
    }
}

/// Values given on the command line or through the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub session_path: Option<PathBuf>,
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub timeout: Duration,
    pub session_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            session_path: PathBuf::from(DEFAULT_SESSION_FILE),
        }
    }
}

impl Settings {
    /// Layer overrides on top of the file, on top of the defaults.
    pub fn resolve(file: FileConfig, overrides: Overrides) -> Self {
        let defaults = Self::default();
        Self {
            api_url: overrides
                .api_url
                .or(file.api_url)
                .unwrap_or(defaults.api_url),
            timeout: overrides
                .timeout_secs
                .or(file.timeout_secs)
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            session_path: overrides
                .session_path
                .or(file.session_path)
                .unwrap_or(defaults.session_path),
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.api_url.clone()).with_timeout(self.timeout)
    }
}

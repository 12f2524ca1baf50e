use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::error::{FxError, Result};

/// Where the configuration lives unless the caller says otherwise.
pub const DEFAULT_CONFIG_PATH: &str = "configuration.json";

pub const DEFAULT_BASE_URL: &str = "https://api.apilayer.com/fixer";

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Client configuration stored on disk.
///
/// Example JSON:
/// ```json
/// { "api_key": "...", "base_url": "https://api.apilayer.com/fixer" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Missing keys deserialize to an empty string so `load` can report them
    /// as `ConfigInvalid` instead of a parse error.
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Config {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Load and validate the configuration at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(FxError::ConfigNotFound {
                    path: path.to_path_buf(),
                });
            }
            Err(err) => {
                return Err(FxError::ConfigInvalid {
                    path: path.to_path_buf(),
                    reason: format!("failed to read file: {err}"),
                });
            }
        };

        let parsed = serde_json::from_str::<Config>(&contents);
        let mut cfg = parsed.map_err(|err| FxError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: format!("failed to parse JSON: {err}"),
        })?;

        // The key goes into a request header verbatim.
        cfg.api_key = cfg.api_key.trim().to_string();
        cfg.validate(path)?;
        tracing::debug!(path = %path.display(), base_url = %cfg.base_url, "configuration loaded");

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let write_err = |source| FxError::ConfigWrite {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|err| write_err(io::Error::new(io::ErrorKind::InvalidData, err)))?;

        fs::write(path, json).map_err(write_err)?;

        Ok(())
    }

    fn validate(&self, path: &Path) -> Result<()> {
        let invalid = |reason: &str| FxError::ConfigInvalid {
            path: PathBuf::from(path),
            reason: reason.to_string(),
        };

        if self.api_key.trim().is_empty() {
            return Err(invalid(
                "`api_key` is missing or empty.\n\
                 Hint: run `fx configure` and enter your API key.",
            ));
        }
        if self.base_url.trim().is_empty() {
            return Err(invalid("`base_url` must not be empty"));
        }
        if self.timeout_secs == 0 {
            return Err(invalid("`timeout_secs` must be greater than zero"));
        }

        Ok(())
    }
}

/// Load the configuration at `path`; see [`Config::load`].
pub fn load_configuration(path: impl AsRef<Path>) -> Result<Config> {
    Config::load(path)
}

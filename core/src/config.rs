//! Configuration loading
//!
//! Sources, lowest priority first:
//!
//! 1. Built-in defaults
//! 2. A TOML file: the explicit path, else `FLUXO_CONFIG_PATH`, else `fluxo.toml`
//!    in the working directory when it exists
//! 3. `FLUXO_*` environment variables, `__` between section and key
//!    (`FLUXO_TRANSCRIPT__VISIBLE_WINDOW=20`). A `.env` file is read first.
//!
//! ```ignore
//! let config = Config::builder()
//!     .config_path(Some(PathBuf::from("bot.toml")))
//!     .build()?;
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::runtime::{Messages, RuntimeOptions, DEFAULT_VISIBLE_WINDOW, NAME_PLACEHOLDER};

pub const ENV_PREFIX: &str = "FLUXO";
pub const CONFIG_PATH_ENV: &str = "FLUXO_CONFIG_PATH";
const DEFAULT_FILE_STEM: &str = "fluxo";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/* ===================== Sections ===================== */

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub messages: Messages,
    pub transcript: TranscriptConfig,
    pub display: DisplaySettings,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptConfig {
    pub visible_window: usize,
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            visible_window: DEFAULT_VISIBLE_WINDOW,
        }
    }
}

/// Branding shown around the chat. Passed through to the presentation
/// layer as is; the compiler and runtime never read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub business_name: String,
    pub primary_color: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            business_name: "Fluxo".to_string(),
            primary_color: "#25d366".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is not set
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/* ===================== Loading ===================== */

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    pub fn runtime_options(&self) -> RuntimeOptions {
        RuntimeOptions {
            messages: self.messages.clone(),
            visible_window: self.transcript.visible_window,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.transcript.visible_window == 0 {
            return Err(ConfigError::Invalid(
                "transcript.visible_window must be greater than 0".to_string(),
            ));
        }
        if !self.messages.capture_confirmation.contains(NAME_PLACEHOLDER) {
            return Err(ConfigError::Invalid(format!(
                "messages.capture_confirmation must contain {}",
                NAME_PLACEHOLDER
            )));
        }
        Ok(())
    }
}

pub struct ConfigBuilder {
    config_path: Option<PathBuf>,
    use_env: bool,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self {
            config_path: None,
            use_env: true,
        }
    }
}

impl ConfigBuilder {
    /// Explicit config file; overrides `FLUXO_CONFIG_PATH`
    pub fn config_path(mut self, path: Option<PathBuf>) -> Self {
        self.config_path = path;
        self
    }

    /// Whether `.env` and `FLUXO_*` variables are read (default true)
    pub fn use_env(mut self, use_env: bool) -> Self {
        self.use_env = use_env;
        self
    }

    pub fn build(self) -> Result<Config, ConfigError> {
        if self.use_env {
            // A missing .env is fine
            let _ = dotenvy::dotenv();
        }

        let explicit = self.config_path.or_else(|| {
            self.use_env
                .then(|| std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from))
                .flatten()
        });

        let mut builder = ::config::Config::builder();
        builder = match &explicit {
            Some(path) => {
                debug!(path = %path.display(), "loading configuration file");
                builder.add_source(::config::File::from(path.as_path()).required(true))
            }
            None => builder.add_source(::config::File::with_name(DEFAULT_FILE_STEM).required(false)),
        };
        if self.use_env {
            builder = builder.add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );
        }

        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}

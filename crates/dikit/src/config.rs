//! Container configuration
//!
//! Settings are layered: built-in defaults, then an optional config file,
//! then `DIKIT_*` environment variables.

use std::path::Path;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::DIResult;

/// Environment variable prefix for container settings
pub const ENV_PREFIX: &str = "DIKIT";

/// What a fail-fast resolution does with an error
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureMode {
    /// Unwind with a panic carrying the error message
    #[default]
    Panic,
    /// Terminate the process immediately
    Abort,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// Name attached to the container's log events
    pub label: String,
    pub failure_mode: FailureMode,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            label: "default".to_string(),
            failure_mode: FailureMode::Panic,
        }
    }
}

impl ContainerConfig {
    /// Load settings from `DIKIT_*` environment variables only
    pub fn from_env() -> DIResult<Self> {
        Self::load(None)
    }

    /// Load settings from an optional file overlaid with the environment
    ///
    /// A missing file is not an error.
    pub fn load(path: Option<&Path>) -> DIResult<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }
        builder = builder.add_source(Environment::with_prefix(ENV_PREFIX));

        let config: Self = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_failure_mode(mut self, failure_mode: FailureMode) -> Self {
        self.failure_mode = failure_mode;
        self
    }
}

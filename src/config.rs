//! Decompiler configuration loading.
//!
//! The external engine is described by a `decompiler-config.json` installed
//! under the platform data directory. The file names the decompiler
//! executable and any arguments that must be passed on every invocation;
//! relative paths are resolved against the directory the configuration was
//! loaded from, so an installation can ship the engine next to its config.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Errors raised while locating or loading the decompiler configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to locate decompiler configuration: {}", .0.display())]
    NotFound(PathBuf),

    #[error("unable to read decompiler configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("unable to parse decompiler configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("decompiler configuration has an empty executable path")]
    MissingExecutable,
}

/// How to reach the external decompilation engine.
#[derive(Debug, Clone, Deserialize)]
pub struct DecompilerConfig {
    /// Path to the decompiler executable.
    pub executable: PathBuf,
    /// Arguments passed through on every invocation.
    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl DecompilerConfig {
    /// The installed location of the configuration file.
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("retdec-annotate")
            .join("decompiler-config.json")
    }

    /// Load the configuration from its installed location.
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::from_file(&Self::default_path())
    }

    /// Load the configuration from `path`.
    ///
    /// The path must point at a regular file; an absent file is reported as
    /// [`ConfigError::NotFound`], an unreadable one as [`ConfigError::Io`].
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let text = fs::read_to_string(path)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Self::parse(&text, base)
    }

    /// Parse configuration text, resolving a relative executable against
    /// `base`.
    fn parse(text: &str, base: &Path) -> Result<Self, ConfigError> {
        let mut config: DecompilerConfig = serde_json::from_str(text)?;
        if config.executable.as_os_str().is_empty() {
            return Err(ConfigError::MissingExecutable);
        }
        if config.executable.is_relative() {
            config.executable = base.join(&config.executable);
        }
        Ok(config)
    }
}

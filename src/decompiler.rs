//! Invocation of the external decompilation engine.
//!
//! The engine is a separate process. It is pointed at an input binary and a
//! selected address range, told which output format to produce (plain source
//! or the token-stream JSON consumed by [`crate::annotate`]), and its stdout
//! is captured as the raw document.

use std::path::Path;
use std::process::Command;
use std::str::FromStr;

use thiserror::Error;
use tracing::debug;

use crate::config::DecompilerConfig;
use crate::OutputFormat;

/// Errors raised while running the external decompiler.
#[derive(Debug, Error)]
pub enum DecompileError {
    #[error("unable to launch decompiler {executable}: {source}")]
    Spawn {
        executable: String,
        source: std::io::Error,
    },

    #[error("decompilation was not successful ({status}): {stderr}")]
    Failed {
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("decompiler produced non-UTF-8 output")]
    NonUtf8(#[from] std::string::FromUtf8Error),
}

/// A range of addresses selected for decompilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressRange {
    pub start: u64,
    pub end: u64,
}

impl std::fmt::Display for AddressRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:x}-0x{:x}", self.start, self.end)
    }
}

/// Parse error for [`AddressRange`].
#[derive(Debug, Error)]
#[error("invalid address range (expected 0x<start>-0x<end>): {0}")]
pub struct ParseRangeError(String);

impl FromStr for AddressRange {
    type Err = ParseRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once('-')
            .ok_or_else(|| ParseRangeError(s.to_string()))?;
        let parse_hex = |part: &str| {
            let part = part.trim();
            let digits = part
                .strip_prefix("0x")
                .or_else(|| part.strip_prefix("0X"))
                .unwrap_or(part);
            u64::from_str_radix(digits, 16).map_err(|_| ParseRangeError(s.to_string()))
        };
        let range = AddressRange {
            start: parse_hex(start)?,
            end: parse_hex(end)?,
        };
        if range.start >= range.end {
            return Err(ParseRangeError(s.to_string()));
        }
        Ok(range)
    }
}

/// Handle to the configured external decompiler.
#[derive(Debug, Clone)]
pub struct Decompiler {
    config: DecompilerConfig,
}

impl Decompiler {
    pub fn new(config: DecompilerConfig) -> Self {
        Self { config }
    }

    /// Decompile `range` of `input`, returning the engine's raw output.
    pub fn decompile(
        &self,
        input: &Path,
        range: AddressRange,
        format: OutputFormat,
    ) -> Result<String, DecompileError> {
        let args = self.build_args(input, range, format);
        debug!(
            executable = %self.config.executable.display(),
            ?args,
            "invoking decompiler"
        );

        let output = Command::new(&self.config.executable)
            .args(&args)
            .output()
            .map_err(|source| DecompileError::Spawn {
                executable: self.config.executable.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(DecompileError::Failed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8(output.stdout)?)
    }

    fn build_args(&self, input: &Path, range: AddressRange, format: OutputFormat) -> Vec<String> {
        let mut args = vec![
            "--output-format".to_string(),
            format.as_arg().to_string(),
            "--select-range".to_string(),
            range.to_string(),
        ];
        args.extend(self.config.extra_args.iter().cloned());
        args.push(input.display().to_string());
        args
    }
}

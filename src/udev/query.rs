//! Invoke `udevadm` to read device properties.

use crate::model::DeviceFile;
use std::path::PathBuf;
use std::process::Command;
use thiserror::Error;
use tracing::trace;

/// Default metadata tool, looked up on `PATH`.
pub const DEFAULT_TOOL: &str = "udevadm";

/// Errors from a property query.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("failed to run {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{tool} exited with {status} for {device}: {stderr}")]
    Failed {
        tool: String,
        device: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
}

/// Source of raw `KEY=VALUE` property text for a device.
pub trait PropertyQuery {
    /// Return the property listing for `device`.
    fn query(&self, device: &DeviceFile) -> Result<String, QueryError>;
}

/// Runs `<tool> info --query=property -n <device>`.
#[derive(Debug, Clone)]
pub struct Udevadm {
    tool: PathBuf,
}

impl Default for Udevadm {
    fn default() -> Self {
        Self::new()
    }
}

impl Udevadm {
    /// Use `udevadm` from `PATH`.
    pub fn new() -> Self {
        Self {
            tool: PathBuf::from(DEFAULT_TOOL),
        }
    }

    /// Use a specific tool binary.
    pub fn with_tool(tool: impl Into<PathBuf>) -> Self {
        Self { tool: tool.into() }
    }

    pub fn tool(&self) -> &std::path::Path {
        &self.tool
    }
}

impl PropertyQuery for Udevadm {
    fn query(&self, device: &DeviceFile) -> Result<String, QueryError> {
        let tool = self.tool.display().to_string();
        trace!("Running {} info --query=property -n {}", tool, device);

        let output = Command::new(&self.tool)
            .args(["info", "--query=property", "-n"])
            .arg(device.path())
            .output()
            .map_err(|source| QueryError::Spawn {
                tool: tool.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(QueryError::Failed {
                tool,
                device: device.to_string(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        // Vendor strings are not always UTF-8; keep the rest of the listing.
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

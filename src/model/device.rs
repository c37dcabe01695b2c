//! Serial device file handle.

use std::fmt;
use std::path::{Path, PathBuf};

/// A character device node created by the kernel for a USB serial adapter
/// (e.g., `/dev/ttyUSB0`, `/dev/ttyACM1`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceFile(pub PathBuf);

impl DeviceFile {
    /// Create a new device file handle.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    /// Filesystem path of the node.
    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Node name without the directory (e.g., "ttyUSB0").
    pub fn name(&self) -> Option<&str> {
        self.0.file_name().and_then(|n| n.to_str())
    }

    /// Check whether the node currently exists.
    pub fn exists(&self) -> bool {
        self.0.exists()
    }
}

impl fmt::Display for DeviceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl From<&str> for DeviceFile {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

//! Physical USB port paths.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of segments in a normalized port path: controller, then port.
pub const NORMALIZED_DEPTH: usize = 2;

/// Errors from parsing a user-supplied port path.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PortPathError {
    #[error("port path is empty")]
    Empty,
    #[error("invalid segment '{segment}' in port path '{path}'")]
    InvalidSegment { path: String, segment: String },
}

/// Physical topology of a USB port: controller number followed by one
/// port number per hub level, dot-separated.
///
/// Examples:
/// - "1.3" -> controller 1, port 3
/// - "1.5.2" -> controller 1, hub on port 5, port 2 of that hub
///
/// The string is kept exactly as udev reports it in `ID_PATH`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PortPath(pub String);

impl PortPath {
    /// Create a port path from a string taken verbatim.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Rendered form (e.g., "1.3").
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Integer segments, or `None` if any segment is not a positive integer.
    pub fn segments(&self) -> Option<Vec<u32>> {
        self.0
            .split('.')
            .map(|s| s.parse::<u32>().ok().filter(|n| *n > 0))
            .collect()
    }

    /// Number of dot-separated segments.
    pub fn depth(&self) -> usize {
        self.0.split('.').count()
    }

    /// Controller number (first segment).
    pub fn controller(&self) -> Option<u32> {
        self.segments().and_then(|s| s.first().copied())
    }

    /// True if this is a controller/port pair with no hub in between.
    pub fn is_normalized(&self) -> bool {
        self.segments().is_some_and(|s| s.len() == NORMALIZED_DEPTH)
    }
}

impl FromStr for PortPath {
    type Err = PortPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PortPathError::Empty);
        }
        for segment in s.split('.') {
            if !matches!(segment.parse::<u32>(), Ok(n) if n > 0) {
                return Err(PortPathError::InvalidSegment {
                    path: s.to_string(),
                    segment: segment.to_string(),
                });
            }
        }
        Ok(Self(s.to_string()))
    }
}

impl fmt::Display for PortPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Ord for PortPath {
    /// Numeric order by segment, so "1.10" sorts after "1.9". Paths that
    /// are not all positive integers sort after numeric ones, by string.
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use std::cmp::Ordering;

        match (self.segments(), other.segments()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for PortPath {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

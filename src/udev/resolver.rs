//! Resolve a device file to its physical port path.
//!
//! udev's `ID_PATH` for a USB serial interface looks like
//! `platform-3f980000.usb-usb-0:1.3:1.0`: a bus prefix, the port chain,
//! and the interface. The port chain is the middle colon-separated field.
//! Only values with exactly three fields are accepted.

use super::properties::Properties;
use super::query::{PropertyQuery, QueryError, Udevadm};
use crate::model::{DeviceFile, PortPath};
use std::fmt;
use tracing::{debug, trace};

/// Colon-separated fields expected in `ID_PATH`.
const ID_PATH_FIELDS: usize = 3;

/// Why a device has no port path. None of these are errors.
#[derive(Debug)]
pub enum Unresolvable {
    /// Metadata query failed (tool missing, device gone, non-zero exit).
    QueryFailed(QueryError),
    /// No `ID_PATH` property.
    MissingIdPath,
    /// `ID_PATH` did not have exactly three colon-separated fields.
    SegmentCount(usize),
}

impl fmt::Display for Unresolvable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QueryFailed(e) => write!(f, "query failed: {}", e),
            Self::MissingIdPath => write!(f, "no ID_PATH property"),
            Self::SegmentCount(n) => write!(
                f,
                "ID_PATH has {} field(s), expected {}",
                n, ID_PATH_FIELDS
            ),
        }
    }
}

/// Outcome of resolving one device.
#[derive(Debug)]
pub enum Resolution {
    Resolved(PortPath),
    Unresolvable(Unresolvable),
}

impl Resolution {
    /// The port path, discarding the reason for failure.
    pub fn port_path(self) -> Option<PortPath> {
        match self {
            Self::Resolved(path) => Some(path),
            Self::Unresolvable(_) => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

/// Anything that can map a device file to a port path.
pub trait Resolve {
    fn resolve(&self, device: &DeviceFile) -> Resolution;

    /// Optional-value view of [`Resolve::resolve`].
    fn port_path(&self, device: &DeviceFile) -> Option<PortPath> {
        self.resolve(device).port_path()
    }
}

/// Extract the port path from parsed udev properties.
pub fn resolve_properties(props: &Properties) -> Resolution {
    let Some(id_path) = props.id_path() else {
        return Resolution::Unresolvable(Unresolvable::MissingIdPath);
    };

    let fields: Vec<&str> = id_path.split(':').collect();
    if fields.len() != ID_PATH_FIELDS {
        return Resolution::Unresolvable(Unresolvable::SegmentCount(fields.len()));
    }

    Resolution::Resolved(PortPath::new(fields[1]))
}

/// Resolver backed by a property query (normally `udevadm`).
#[derive(Debug, Clone, Default)]
pub struct TopologyResolver<Q = Udevadm> {
    query: Q,
}

impl TopologyResolver<Udevadm> {
    /// Resolver using `udevadm` from `PATH`.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<Q: PropertyQuery> TopologyResolver<Q> {
    /// Resolver using a custom property source.
    pub fn with_query(query: Q) -> Self {
        Self { query }
    }
}

impl<Q: PropertyQuery> Resolve for TopologyResolver<Q> {
    fn resolve(&self, device: &DeviceFile) -> Resolution {
        let text = match self.query.query(device) {
            Ok(text) => text,
            Err(e) => {
                debug!("{}: {}", device, e);
                return Resolution::Unresolvable(Unresolvable::QueryFailed(e));
            }
        };
        trace!("{} properties:\n{}", device, text);

        let resolution = resolve_properties(&Properties::parse(&text));
        match &resolution {
            Resolution::Resolved(path) => debug!("{} -> port {}", device, path),
            Resolution::Unresolvable(reason) => debug!("{}: {}", device, reason),
        }
        resolution
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Canned property output per device path; unknown devices fail.
    struct FakeQuery(HashMap<String, String>);

    impl PropertyQuery for FakeQuery {
        fn query(&self, device: &DeviceFile) -> Result<String, QueryError> {
            self.0
                .get(&device.to_string())
                .cloned()
                .ok_or_else(|| QueryError::Spawn {
                    tool: "fake".to_string(),
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                })
        }
    }

    fn resolve_text(text: &str) -> Resolution {
        resolve_properties(&Properties::parse(text))
    }

    #[test]
    fn test_three_fields_resolves_middle() {
        match resolve_text("ID_PATH='1.5.2:1.0:x'") {
            Resolution::Resolved(path) => assert_eq!(path.as_str(), "1.5.2"),
            other => panic!("expected resolved, got {:?}", other),
        }
    }

    #[test]
    fn test_real_id_path() {
        let text = "DEVNAME=/dev/ttyACM0\nID_PATH=platform-3f980000.usb-usb-0:1.3:1.0\n";
        let path = resolve_text(text).port_path().unwrap();
        assert_eq!(path, PortPath::new("1.3"));
        assert!(path.is_normalized());
    }

    #[test]
    fn test_two_fields_rejected() {
        assert!(matches!(
            resolve_text("ID_PATH='1.3:1.0'"),
            Resolution::Unresolvable(Unresolvable::SegmentCount(2))
        ));
    }

    #[test]
    fn test_pci_id_path_rejected() {
        // PCI addresses add colons of their own.
        assert!(matches!(
            resolve_text("ID_PATH=pci-0000:00:14.0-usb-0:2:1.0"),
            Resolution::Unresolvable(Unresolvable::SegmentCount(5))
        ));
    }

    #[test]
    fn test_missing_id_path() {
        assert!(matches!(
            resolve_text("DEVNAME=/dev/ttyUSB0\nSUBSYSTEM=tty\n"),
            Resolution::Unresolvable(Unresolvable::MissingIdPath)
        ));
        assert!(resolve_text("").port_path().is_none());
    }

    #[test]
    fn test_last_id_path_wins() {
        let text = "ID_PATH=a:1.2:b\nID_PATH=a:1.4:b\n";
        assert_eq!(resolve_text(text).port_path(), Some(PortPath::new("1.4")));
    }

    #[test]
    fn test_query_failure_is_unresolvable() {
        let resolver = TopologyResolver::with_query(FakeQuery(HashMap::new()));
        let resolution = resolver.resolve(&DeviceFile::new("/dev/ttyUSB0"));
        assert!(matches!(
            resolution,
            Resolution::Unresolvable(Unresolvable::QueryFailed(_))
        ));
        assert!(resolver.port_path(&DeviceFile::new("/dev/ttyUSB0")).is_none());
    }

    #[test]
    fn test_resolver_uses_query_output() {
        let query = FakeQuery(HashMap::from([(
            "/dev/ttyACM1".to_string(),
            "ID_PATH='usb-0:1.2:1.0'\n".to_string(),
        )]));
        let resolver = TopologyResolver::with_query(query);
        let resolution = resolver.resolve(&DeviceFile::new("/dev/ttyACM1"));
        assert!(resolution.is_resolved());
        assert_eq!(resolution.port_path(), Some(PortPath::new("1.2")));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_property_does_not_hide_id_path() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::TempDir::new().unwrap();
        let tool = dir.path().join("udevadm");
        std::fs::write(
            &tool,
            "#!/bin/sh\nprintf 'ID_MODEL=caf\\377\\nID_PATH=platform-3f980000.usb-usb-0:1.3:1.0\\n'\n",
        )
        .unwrap();
        std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755)).unwrap();

        let resolver = TopologyResolver::with_query(Udevadm::with_tool(&tool));
        let resolution = resolver.resolve(&DeviceFile::new("/dev/ttyUSB0"));
        assert_eq!(resolution.port_path(), Some(PortPath::new("1.3")));
    }

    #[test]
    fn test_missing_udevadm_is_unresolvable() {
        let resolver =
            TopologyResolver::with_query(Udevadm::with_tool("/nonexistent/usbports-test/udevadm"));
        assert!(resolver.port_path(&DeviceFile::new("/dev/ttyUSB0")).is_none());
    }
}

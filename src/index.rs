//! Port path to device file index.

use crate::config::Config;
use crate::model::{DeviceFile, PortPath};
use crate::scan::{CandidateSource, PortScanner};
use crate::udev::{Resolution, Resolve, TopologyResolver, Udevadm};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Snapshot of which serial device sits on which physical port.
///
/// Built once from the current system state and never refreshed; build a
/// new index to pick up devices plugged in since.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortIndex {
    ports: HashMap<PortPath, DeviceFile>,
    candidates: Vec<DeviceFile>,
}

impl PortIndex {
    /// Build an index from the given scanner and resolver.
    ///
    /// Candidates that do not resolve are left out. If two candidates
    /// resolve to the same port path, the later one wins.
    pub fn build(scanner: &impl CandidateSource, resolver: &impl Resolve) -> Self {
        let candidates = scanner.list_candidates();
        let mut ports = HashMap::new();

        for device in &candidates {
            let Resolution::Resolved(path) = resolver.resolve(device) else {
                continue;
            };
            if let Some(previous) = ports.insert(path.clone(), device.clone()) {
                warn!("Port {} reported by both {} and {}", path, previous, device);
            }
        }

        info!(
            "Mapped {} of {} serial device(s) to ports",
            ports.len(),
            candidates.len()
        );

        Self { ports, candidates }
    }

    /// Build an index of `/dev/ttyUSB*` and `/dev/ttyACM*` using `udevadm`.
    pub fn scan() -> Self {
        Self::build(&PortScanner::new(), &TopologyResolver::new())
    }

    /// Build an index using scanner and udev settings from configuration.
    pub fn from_config(config: &Config) -> Self {
        debug!(
            "Scanning {:?} up to index {}",
            config.scan.prefixes, config.scan.max_index
        );
        let scanner = PortScanner::with_config(config.scanner_config());
        let resolver = TopologyResolver::with_query(Udevadm::with_tool(&config.udev.tool));
        Self::build(&scanner, &resolver)
    }

    /// Device file on the given port, if any.
    pub fn lookup(&self, port: &PortPath) -> Option<&DeviceFile> {
        self.ports.get(port)
    }

    /// Device file on a port given in its rendered form (e.g., "1.3").
    pub fn device_at(&self, port: &str) -> Option<&DeviceFile> {
        self.ports.get(&PortPath::new(port.trim()))
    }

    /// All mapped ports, sorted by port path.
    pub fn ports(&self) -> Vec<(&PortPath, &DeviceFile)> {
        let mut ports: Vec<_> = self.ports.iter().collect();
        ports.sort_by(|a, b| a.0.cmp(b.0));
        ports
    }

    /// Every candidate the scanner found, resolved or not, in scan order.
    pub fn available_ports(&self) -> &[DeviceFile] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }
}

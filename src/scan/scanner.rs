//! Probe fixed device name patterns for USB serial nodes.

use crate::model::DeviceFile;
use std::path::PathBuf;
use tracing::{debug, info};

/// Number of indices probed per prefix when not configured.
pub const DEFAULT_MAX_INDEX: u32 = 16;

/// USB-serial converters (ftdi_sio, cp210x, ch341...) then CDC-ACM devices.
pub const DEFAULT_PREFIXES: [&str; 2] = ["/dev/ttyUSB", "/dev/ttyACM"];

/// Anything that can list device files that might be USB serial ports.
pub trait CandidateSource {
    /// List candidate device files currently present.
    fn list_candidates(&self) -> Vec<DeviceFile>;
}

/// Scanner configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannerConfig {
    /// Path prefixes, probed in this order at each index.
    pub prefixes: Vec<String>,
    /// Indices `0..max_index` are probed. Nodes beyond are not seen.
    pub max_index: u32,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            prefixes: DEFAULT_PREFIXES.iter().map(|p| p.to_string()).collect(),
            max_index: DEFAULT_MAX_INDEX,
        }
    }
}

/// Filesystem scanner for serial device nodes.
#[derive(Debug, Clone, Default)]
pub struct PortScanner {
    config: ScannerConfig,
}

impl PortScanner {
    /// Create a scanner probing `/dev/ttyUSB0-15` and `/dev/ttyACM0-15`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scanner with custom configuration.
    pub fn with_config(config: ScannerConfig) -> Self {
        Self { config }
    }

    /// Current configuration.
    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// All paths the scanner would probe, in probe order.
    ///
    /// For each index, every prefix is tried before moving on, giving
    /// ttyUSB0, ttyACM0, ttyUSB1, ttyACM1, ...
    pub fn probe_paths(&self) -> impl Iterator<Item = PathBuf> + '_ {
        (0..self.config.max_index).flat_map(move |index| {
            self.config
                .prefixes
                .iter()
                .map(move |prefix| PathBuf::from(format!("{}{}", prefix, index)))
        })
    }
}

impl CandidateSource for PortScanner {
    fn list_candidates(&self) -> Vec<DeviceFile> {
        let candidates: Vec<DeviceFile> = self
            .probe_paths()
            .map(DeviceFile::new)
            .filter(DeviceFile::exists)
            .collect();

        if candidates.is_empty() {
            info!("No serial device nodes found");
        } else {
            info!("Found {} serial device node(s)", candidates.len());
            for dev in &candidates {
                debug!("  {}", dev);
            }
        }

        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    fn scanner_in(dir: &TempDir, max_index: u32) -> PortScanner {
        let base = dir.path().display();
        PortScanner::with_config(ScannerConfig {
            prefixes: vec![format!("{}/ttyUSB", base), format!("{}/ttyACM", base)],
            max_index,
        })
    }

    fn touch(dir: &TempDir, name: &str) {
        File::create(dir.path().join(name)).unwrap();
    }

    fn names(candidates: &[DeviceFile]) -> Vec<&str> {
        candidates.iter().filter_map(|d| d.name()).collect()
    }

    #[test]
    fn test_default_config() {
        let config = ScannerConfig::default();
        assert_eq!(config.max_index, 16);
        assert_eq!(config.prefixes, vec!["/dev/ttyUSB", "/dev/ttyACM"]);
    }

    #[test]
    fn test_probe_order_interleaves_prefixes() {
        let scanner = PortScanner::with_config(ScannerConfig {
            prefixes: vec!["/a".to_string(), "/b".to_string()],
            max_index: 2,
        });
        let paths: Vec<PathBuf> = scanner.probe_paths().collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/a0"),
                PathBuf::from("/b0"),
                PathBuf::from("/a1"),
                PathBuf::from("/b1"),
            ]
        );
        assert_eq!(PortScanner::new().probe_paths().count(), 32);
    }

    #[test]
    fn test_list_candidates_order_and_filtering() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "ttyACM0");
        touch(&dir, "ttyUSB2");
        touch(&dir, "ttyUSB0");
        touch(&dir, "ttyACM2");
        touch(&dir, "ttyS0");

        let candidates = scanner_in(&dir, 16).list_candidates();
        assert_eq!(
            names(&candidates),
            vec!["ttyUSB0", "ttyACM0", "ttyUSB2", "ttyACM2"]
        );
    }

    #[test]
    fn test_list_candidates_respects_max_index() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "ttyUSB3");
        touch(&dir, "ttyUSB15");
        touch(&dir, "ttyUSB16");

        assert_eq!(
            names(&scanner_in(&dir, 16).list_candidates()),
            vec!["ttyUSB3", "ttyUSB15"]
        );
        assert_eq!(
            names(&scanner_in(&dir, 4).list_candidates()),
            vec!["ttyUSB3"]
        );
    }

    #[test]
    fn test_with_config_keeps_config() {
        let config = ScannerConfig {
            prefixes: vec!["/dev/ttyS".to_string()],
            max_index: 4,
        };
        let scanner = PortScanner::with_config(config.clone());
        assert_eq!(scanner.config(), &config);
        assert_eq!(PortScanner::new().config(), &ScannerConfig::default());
    }

    #[test]
    fn test_list_candidates_empty_dir() {
        let dir = TempDir::new().unwrap();
        assert!(scanner_in(&dir, 16).list_candidates().is_empty());
    }
}

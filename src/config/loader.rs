//! Configuration loading and management.

use crate::index::PortIndex;
use crate::model::PortPath;
use crate::scan::{DEFAULT_MAX_INDEX, DEFAULT_PREFIXES, ScannerConfig};
use crate::udev::DEFAULT_TOOL;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid setting: {0}")]
    Invalid(String),
}

/// Application configuration.
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Device node scanning.
    #[serde(default)]
    pub scan: ScanSettings,

    /// udev metadata tool.
    #[serde(default)]
    pub udev: UdevSettings,

    /// Port labels by port path (e.g., "1.3" = "GPS receiver").
    #[serde(default)]
    pub labels: HashMap<String, String>,
}

/// Device node scanning settings.
#[derive(Debug, Deserialize)]
pub struct ScanSettings {
    /// Device path prefixes, probed in order at each index.
    #[serde(default = "default_prefixes")]
    pub prefixes: Vec<String>,

    /// Number of indices probed per prefix.
    #[serde(default = "default_max_index")]
    pub max_index: u32,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            prefixes: default_prefixes(),
            max_index: default_max_index(),
        }
    }
}

fn default_prefixes() -> Vec<String> {
    DEFAULT_PREFIXES.iter().map(|p| p.to_string()).collect()
}

fn default_max_index() -> u32 {
    DEFAULT_MAX_INDEX
}

/// udev settings.
#[derive(Debug, Deserialize)]
pub struct UdevSettings {
    /// Path or name of the `udevadm` binary.
    #[serde(default = "default_tool")]
    pub tool: PathBuf,
}

impl Default for UdevSettings {
    fn default() -> Self {
        Self {
            tool: default_tool(),
        }
    }
}

fn default_tool() -> PathBuf {
    PathBuf::from(DEFAULT_TOOL)
}

impl Config {
    /// Load configuration from default locations.
    /// Search order:
    /// 1. ./usbports.toml
    /// 2. ~/.config/usbports/config.toml
    /// 3. /etc/usbports.toml
    pub fn load() -> Result<Self, ConfigError> {
        for path in Self::config_paths().into_iter().flatten() {
            if path.exists() {
                return Self::load_from_path(&path);
            }
        }

        // No config file found - use defaults
        Ok(Config::default())
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.scan.prefixes.is_empty() {
            return Err(ConfigError::Invalid("scan.prefixes must not be empty".to_string()));
        }
        if let Some(key) = self.labels.keys().find(|k| k.parse::<PortPath>().is_err()) {
            return Err(ConfigError::Invalid(format!(
                "label key '{}' is not a port path",
                key
            )));
        }
        Ok(())
    }

    /// Get list of possible config paths.
    fn config_paths() -> Vec<Option<PathBuf>> {
        vec![
            std::env::current_dir().ok().map(|p| p.join("usbports.toml")),
            dirs::config_dir().map(|p| p.join("usbports").join("config.toml")),
            Some(PathBuf::from("/etc/usbports.toml")),
        ]
    }

    /// Scanner configuration from the `[scan]` section.
    pub fn scanner_config(&self) -> ScannerConfig {
        ScannerConfig {
            prefixes: self.scan.prefixes.clone(),
            max_index: self.scan.max_index,
        }
    }

    /// Get label for a port.
    pub fn port_label(&self, port: &PortPath) -> Option<&str> {
        self.labels.get(port.as_str()).map(|s| s.as_str())
    }

    /// Find the port path carrying a label, for lookups by name.
    pub fn port_for_label(&self, label: &str) -> Option<PortPath> {
        let mut matches: Vec<&String> = self
            .labels
            .iter()
            .filter(|(_, l)| l.eq_ignore_ascii_case(label))
            .map(|(port, _)| port)
            .collect();
        matches.sort();
        matches.first().map(|p| PortPath::new(p.as_str()))
    }
}

/// Generate example configuration content.
pub fn example_config() -> &'static str {
    r#"# usbports configuration file
# Place in ./usbports.toml, ~/.config/usbports/config.toml, or /etc/usbports.toml

[scan]
# Device node prefixes, probed in this order at each index
prefixes = ["/dev/ttyUSB", "/dev/ttyACM"]
# Indices 0..max_index are probed per prefix
max_index = 16

[udev]
# udevadm binary used to read device properties
tool = "udevadm"

# Port labels
# Format: "controller.port" = "label"
[labels]
# "1.3" = "GPS receiver"
# "1.5.2" = "Motor controller"
"#
}

/// Generate a configuration file listing every currently mapped port.
pub fn generate_config(index: &PortIndex) -> String {
    let mut output = String::new();

    output.push_str("# usbports configuration file - auto-generated\n");
    output.push_str("# Generated from currently attached serial devices\n");
    output.push_str("#\n");
    output.push_str(
        "# Place in ./usbports.toml, ~/.config/usbports/config.toml, or /etc/usbports.toml\n\n",
    );

    output.push_str("[scan]\n");
    output.push_str("prefixes = [\"/dev/ttyUSB\", \"/dev/ttyACM\"]\n");
    output.push_str(&format!("max_index = {}\n\n", DEFAULT_MAX_INDEX));

    output.push_str("[udev]\n");
    output.push_str(&format!("tool = \"{}\"\n\n", DEFAULT_TOOL));

    output.push_str("# Edit labels to name the device on each port\n");
    output.push_str("[labels]\n");

    if index.is_empty() {
        output.push_str("# No serial devices mapped to ports on this system\n");
        output.push_str("# \"1.3\" = \"GPS receiver\"\n");
    }
    for (port, device) in index.ports() {
        // Labels must be keyed by a parseable port path to load again.
        if port.as_str().parse::<PortPath>().is_err() {
            output.push_str(&format!(
                "# \"{}\" is not a valid port path; {} left unlabelled\n",
                sanitize_toml_string(port.as_str()),
                device
            ));
            continue;
        }
        let name = device.name().unwrap_or("device");
        output.push_str(&format!(
            "\"{}\" = \"{}\"  # currently {}\n",
            port,
            sanitize_toml_string(name),
            device
        ));
    }

    output
}

/// Sanitize a string for use as a TOML value (escape special chars).
fn sanitize_toml_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

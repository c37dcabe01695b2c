//! Configuration loading and management.

mod loader;

pub use loader::{Config, ConfigError, ScanSettings, UdevSettings, example_config, generate_config};

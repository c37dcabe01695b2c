//! USB serial port mapping
//!
//! A library and CLI tool that maps USB serial device files on Linux
//! (`/dev/ttyUSB*`, `/dev/ttyACM*`) to the physical port they are plugged
//! into, so devices can be addressed by slot instead of by kernel name.
//!
//! # Example
//!
//! ```rust,no_run
//! use usbports::PortIndex;
//!
//! let index = PortIndex::scan();
//! if let Some(device) = index.device_at("1.3") {
//!     println!("Port 1.3: {}", device);
//! }
//! ```

pub mod config;
pub mod index;
pub mod model;
pub mod scan;
pub mod udev;

pub use config::Config;
pub use index::PortIndex;
pub use model::{DeviceFile, PortPath};
pub use scan::{CandidateSource, PortScanner, ScannerConfig};
pub use udev::{Resolution, Resolve, TopologyResolver, Udevadm};

//! Data model types.

pub mod device;
pub mod port_path;

pub use device::DeviceFile;
pub use port_path::{NORMALIZED_DEPTH, PortPath, PortPathError};

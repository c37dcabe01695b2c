//! Candidate device file enumeration.

mod scanner;

pub use scanner::{CandidateSource, DEFAULT_MAX_INDEX, DEFAULT_PREFIXES, PortScanner, ScannerConfig};

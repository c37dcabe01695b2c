//! udev metadata: property queries and port path resolution.

mod properties;
mod query;
mod resolver;

pub use properties::{ID_PATH, Properties};
pub use query::{DEFAULT_TOOL, PropertyQuery, QueryError, Udevadm};
pub use resolver::{Resolution, Resolve, TopologyResolver, Unresolvable, resolve_properties};

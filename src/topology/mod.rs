//! Fat-tree topology construction and export.
//!
//! [`builder`] enumerates every switch, host, and link of the fabric with
//! explicit port numbers taken from the shared addressing convention.
//! [`export`] writes the resulting plan as a YAML descriptor for the network
//! emulator and a JSON registry for tooling.

pub mod builder;
pub mod export;
pub mod types;

// Re-export key types and functions for easier access
pub use builder::build;
pub use export::{write_emulator_yaml, write_registry_json};
pub use types::{HostRecord, LinkRecord, SwitchRecord, TopologyPlan};

//! Switch identity and host address encoding.
//!
//! This module is the single source of truth for the byte layout of switch
//! identities, the structure of host addresses, and the port numbering
//! convention. The topology builder and the rule compiler both consume it
//! and never re-derive any of its arithmetic, so the wiring a fabric is
//! built with always matches the ports its forwarding rules output to.

pub mod codec;
pub mod host;
pub mod ports;

// Re-export commonly used items
pub use codec::{decode, encode, SwitchPosition, SwitchRole, POD_SWITCH_MARKER};
pub use host::{
    gateway_address, host_address, host_mac, host_name, pod_prefix, subnet_address,
    HOST_OCTET_BASE, NETWORK_OCTET,
};
pub use ports::{
    agg_downlink_port, agg_uplink_port, core_downlink_port, edge_host_port, edge_uplink_port,
    uplink_for_suffix, PortNo,
};

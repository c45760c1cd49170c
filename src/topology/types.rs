//! Topology descriptor types.

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

use crate::addressing::{PortNo, SwitchPosition, SwitchRole};

/// One switch in the fabric, with its encoded identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchRecord {
    pub name: String,
    pub id: u32,
    pub role: SwitchRole,
    pub position: SwitchPosition,
}

impl SwitchRecord {
    pub fn new(position: SwitchPosition, id: u32) -> Self {
        SwitchRecord {
            name: position.name(),
            id,
            role: position.role(),
            position,
        }
    }
}

/// One host with its assigned address and MAC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostRecord {
    pub name: String,
    pub address: Ipv4Addr,
    pub mac: String,
}

/// One cable, annotated with the port it occupies on each endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub endpoint_a: String,
    pub port_a: PortNo,
    pub endpoint_b: String,
    pub port_b: PortNo,
}

/// Complete wiring plan for one fabric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyPlan {
    pub k: u8,
    pub switches: Vec<SwitchRecord>,
    pub hosts: Vec<HostRecord>,
    pub links: Vec<LinkRecord>,
}

impl TopologyPlan {
    /// Number of switches in one tier.
    pub fn role_count(&self, role: SwitchRole) -> usize {
        self.switches.iter().filter(|sw| sw.role == role).count()
    }
}

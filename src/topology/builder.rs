//! Topology construction.
//!
//! Builds the full wiring plan for a fabric: the core grid, each pod's
//! aggregation and edge switches, the hosts behind every edge switch, and
//! every link with its port on both endpoints. All port numbers come from
//! the shared addressing convention, and a ledger rejects any double
//! assignment of a port before the plan can leave this module.

use std::collections::{HashMap, HashSet};

use log::info;

use crate::addressing::{self, PortNo, SwitchPosition};
use crate::error::FabricError;
use crate::fabric::Fabric;

use super::types::{HostRecord, LinkRecord, SwitchRecord, TopologyPlan};

/// Port occupancy per endpoint while wiring.
#[derive(Debug, Default)]
struct PortLedger {
    used: HashMap<String, HashSet<PortNo>>,
}

impl PortLedger {
    fn claim(&mut self, endpoint: &str, port: PortNo) -> Result<(), FabricError> {
        if self.used.entry(endpoint.to_string()).or_default().insert(port) {
            Ok(())
        } else {
            Err(FabricError::PortConflict {
                switch: endpoint.to_string(),
                port,
            })
        }
    }

    fn link(
        &mut self,
        a: String,
        port_a: PortNo,
        b: String,
        port_b: PortNo,
    ) -> Result<LinkRecord, FabricError> {
        self.claim(&a, port_a)?;
        self.claim(&b, port_b)?;
        Ok(LinkRecord {
            endpoint_a: a,
            port_a,
            endpoint_b: b,
            port_b,
        })
    }
}

/// Build the complete topology plan for one fabric.
///
/// Deterministic: the same fabric always yields the same plan, element order
/// included. Core switches come first in row-major order, then each pod's
/// aggregation and edge switches.
pub fn build(fabric: Fabric) -> Result<TopologyPlan, FabricError> {
    let half = fabric.half();
    let mut switches = Vec::new();
    let mut hosts = Vec::new();
    let mut links = Vec::new();
    let mut ledger = PortLedger::default();

    // Core grid, row-major.
    for row in 0..half {
        for col in 0..half {
            let position = SwitchPosition::Core { row, col };
            switches.push(SwitchRecord::new(position, addressing::encode(position, fabric)?));
        }
    }

    for pod in 0..fabric.k() {
        for index in 0..half {
            let position = SwitchPosition::Agg { pod, index };
            switches.push(SwitchRecord::new(position, addressing::encode(position, fabric)?));
        }

        for index in 0..half {
            let position = SwitchPosition::Edge { pod, index };
            switches.push(SwitchRecord::new(position, addressing::encode(position, fabric)?));

            // Hosts hang off edge ports [0, k/2); each host uses its own
            // port 0.
            for host in 0..half {
                let name = addressing::host_name(pod, index, host);
                hosts.push(HostRecord {
                    name: name.clone(),
                    address: addressing::host_address(fabric, pod, index, host)?,
                    mac: addressing::host_mac(fabric, pod, index, host)?,
                });
                links.push(ledger.link(
                    position.name(),
                    addressing::edge_host_port(host),
                    name,
                    0,
                )?);
            }
        }

        // Full bipartite wiring between the pod's two tiers.
        for agg in 0..half {
            for edge in 0..half {
                links.push(ledger.link(
                    SwitchPosition::Agg { pod, index: agg }.name(),
                    addressing::agg_downlink_port(edge),
                    SwitchPosition::Edge { pod, index: edge }.name(),
                    addressing::edge_uplink_port(fabric, agg),
                )?);
            }
        }
    }

    // Core column c serves aggregation index c of every pod; the core row
    // selects which uplink port the aggregation switch uses.
    for col in 0..half {
        for row in 0..half {
            let core = SwitchPosition::Core { row, col };
            for pod in 0..fabric.k() {
                links.push(ledger.link(
                    core.name(),
                    addressing::core_downlink_port(pod),
                    SwitchPosition::Agg { pod, index: col }.name(),
                    addressing::agg_uplink_port(fabric, row),
                )?);
            }
        }
    }

    info!(
        "Built fat-tree topology: k={}, {} switches, {} hosts, {} links",
        fabric.k(),
        switches.len(),
        hosts.len(),
        links.len()
    );

    Ok(TopologyPlan {
        k: fabric.k(),
        switches,
        hosts,
        links,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addressing::SwitchRole;

    #[test]
    fn k4_tier_and_element_counts() {
        let plan = build(Fabric::new(4).unwrap()).unwrap();
        assert_eq!(plan.role_count(SwitchRole::Core), 4);
        assert_eq!(plan.role_count(SwitchRole::Agg), 8);
        assert_eq!(plan.role_count(SwitchRole::Edge), 8);
        assert_eq!(plan.hosts.len(), 16);
        // 16 host links, 16 intra-pod links, 16 core links.
        assert_eq!(plan.links.len(), 48);
    }

    #[test]
    fn every_switch_port_is_used_at_most_once() {
        let plan = build(Fabric::new(8).unwrap()).unwrap();
        let mut seen = HashSet::new();
        for link in &plan.links {
            assert!(seen.insert((link.endpoint_a.clone(), link.port_a)));
            assert!(seen.insert((link.endpoint_b.clone(), link.port_b)));
        }
    }

    #[test]
    fn pod_switches_use_all_k_ports() {
        let fabric = Fabric::new(4).unwrap();
        let plan = build(fabric).unwrap();
        let mut ports: HashMap<&str, Vec<PortNo>> = HashMap::new();
        for link in &plan.links {
            ports.entry(&link.endpoint_a).or_default().push(link.port_a);
            ports.entry(&link.endpoint_b).or_default().push(link.port_b);
        }
        for sw in &plan.switches {
            let mut used = ports.remove(sw.name.as_str()).unwrap();
            used.sort_unstable();
            let expected: Vec<PortNo> = (0..fabric.k() as PortNo).collect();
            assert_eq!(used, expected, "ports on {}", sw.name);
        }
    }

    #[test]
    fn core_ports_reach_their_pods() {
        let plan = build(Fabric::new(4).unwrap()).unwrap();
        for link in &plan.links {
            if link.endpoint_a.starts_with("core_") {
                // Core port number equals the pod of the aggregation peer.
                let pod: PortNo = link
                    .endpoint_b
                    .split('_')
                    .nth(1)
                    .unwrap()
                    .parse()
                    .unwrap();
                assert_eq!(link.port_a, pod);
            }
        }
    }

    #[test]
    fn double_port_assignment_is_rejected() {
        let mut ledger = PortLedger::default();
        ledger.claim("edge_0_0", 2).unwrap();
        assert_eq!(
            ledger.claim("edge_0_0", 2),
            Err(FabricError::PortConflict {
                switch: "edge_0_0".to_string(),
                port: 2,
            })
        );
        // Same port on another switch is fine.
        ledger.claim("edge_0_1", 2).unwrap();
    }

    #[test]
    fn builds_are_deterministic() {
        let fabric = Fabric::new(4).unwrap();
        let first = build(fabric).unwrap();
        let second = build(fabric).unwrap();
        assert_eq!(first, second);
    }
}

//! Topology descriptor export.
//!
//! Writes the wiring plan in two forms: a YAML descriptor consumed by the
//! network emulator harness, and a JSON registry keyed by element name for
//! other tooling.

use std::collections::BTreeMap;
use std::fs;
use std::net::Ipv4Addr;
use std::path::Path;

use color_eyre::eyre::WrapErr;
use log::info;
use serde::Serialize;

use crate::addressing::{SwitchPosition, SwitchRole};
use crate::config::ControllerConfig;

use super::types::{LinkRecord, TopologyPlan};

/// OpenFlow protocol tag advertised for every switch in the descriptor.
const SWITCH_PROTOCOLS: &str = "OpenFlow13";

#[derive(Serialize, Debug)]
struct EmulatorDescriptor<'a> {
    controller: ControllerSection<'a>,
    switches: Vec<SwitchSection<'a>>,
    hosts: Vec<HostSection<'a>>,
    links: &'a [LinkRecord],
}

#[derive(Serialize, Debug)]
struct ControllerSection<'a> {
    address: &'a str,
    port: u16,
}

#[derive(Serialize, Debug)]
struct SwitchSection<'a> {
    name: &'a str,
    dpid: String,
    role: SwitchRole,
    protocols: &'static str,
}

#[derive(Serialize, Debug)]
struct HostSection<'a> {
    name: &'a str,
    ip: Ipv4Addr,
    mac: &'a str,
}

/// Switch identities travel as 16-hex-digit datapath ids on the wire.
fn format_dpid(id: u32) -> String {
    format!("{:016x}", id)
}

/// Write the YAML descriptor the emulator builds the network from.
pub fn write_emulator_yaml(
    plan: &TopologyPlan,
    controller: &ControllerConfig,
    path: &Path,
) -> color_eyre::eyre::Result<()> {
    let descriptor = EmulatorDescriptor {
        controller: ControllerSection {
            address: &controller.address,
            port: controller.port,
        },
        switches: plan
            .switches
            .iter()
            .map(|sw| SwitchSection {
                name: &sw.name,
                dpid: format_dpid(sw.id),
                role: sw.role,
                protocols: SWITCH_PROTOCOLS,
            })
            .collect(),
        hosts: plan
            .hosts
            .iter()
            .map(|host| HostSection {
                name: &host.name,
                ip: host.address,
                mac: &host.mac,
            })
            .collect(),
        links: &plan.links,
    };

    let yaml = serde_yaml::to_string(&descriptor)
        .wrap_err("Failed to serialize emulator descriptor")?;
    fs::write(path, yaml)
        .wrap_err_with(|| format!("Failed to write emulator descriptor '{}'", path.display()))?;
    info!("Wrote emulator descriptor: {:?}", path);
    Ok(())
}

#[derive(Serialize, Debug)]
struct SwitchEntry<'a> {
    id: u32,
    dpid: String,
    role: SwitchRole,
    position: &'a SwitchPosition,
}

#[derive(Serialize, Debug)]
struct HostEntry<'a> {
    address: Ipv4Addr,
    mac: &'a str,
}

#[derive(Serialize, Debug)]
struct Registry<'a> {
    k: u8,
    switches: BTreeMap<&'a str, SwitchEntry<'a>>,
    hosts: BTreeMap<&'a str, HostEntry<'a>>,
}

/// Write the JSON registry used by provisioning and analysis tooling.
pub fn write_registry_json(plan: &TopologyPlan, path: &Path) -> color_eyre::eyre::Result<()> {
    let registry = Registry {
        k: plan.k,
        switches: plan
            .switches
            .iter()
            .map(|sw| {
                (
                    sw.name.as_str(),
                    SwitchEntry {
                        id: sw.id,
                        dpid: format_dpid(sw.id),
                        role: sw.role,
                        position: &sw.position,
                    },
                )
            })
            .collect(),
        hosts: plan
            .hosts
            .iter()
            .map(|host| {
                (
                    host.name.as_str(),
                    HostEntry {
                        address: host.address,
                        mac: &host.mac,
                    },
                )
            })
            .collect(),
    };

    let json = serde_json::to_string_pretty(&registry)
        .wrap_err("Failed to serialize topology registry")?;
    fs::write(path, json)
        .wrap_err_with(|| format!("Failed to write topology registry '{}'", path.display()))?;
    info!("Wrote topology registry: {:?}", path);
    Ok(())
}

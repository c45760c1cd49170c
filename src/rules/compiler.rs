//! Forwarding-rule compilation.
//!
//! Turns a decoded switch position into the complete rule plan for that
//! switch. Downward rules follow the unique shortest path toward the
//! destination; upward rules pick an uplink with the static last-octet
//! round-robin from the shared port convention. Compilation is pure in
//! `(position, fabric)`, so reconnecting switches recompile to the identical
//! plan.

use crate::addressing::{self, SwitchPosition};
use crate::error::FabricError;
use crate::fabric::Fabric;

use super::types::{priority, Action, Ipv4Dst, MatchSpec, Rule, RulePlan};

/// Rules every switch receives regardless of classification: the priority-0
/// table-miss drop and the ARP flood that lets address resolution work
/// before any IPv4 rule can match.
pub fn universal_rules() -> Vec<Rule> {
    vec![
        Rule::new(priority::TABLE_MISS, MatchSpec::any(), vec![]),
        Rule::new(priority::ARP_FLOOD, MatchSpec::arp(), vec![Action::Flood]),
    ]
}

/// Compile the full ordered rule plan for one classified switch.
///
/// Emission order is fixed: table-miss drop, ARP flood, then the role rules
/// in coordinate order, so identical inputs always serialize identically.
pub fn compile(fabric: Fabric, position: SwitchPosition) -> Result<RulePlan, FabricError> {
    let mut rules = universal_rules();
    match position {
        SwitchPosition::Edge { pod, index } => edge_rules(fabric, pod, index, &mut rules)?,
        SwitchPosition::Agg { pod, index } => agg_rules(fabric, pod, index, &mut rules)?,
        SwitchPosition::Core { .. } => core_rules(fabric, &mut rules)?,
    }
    Ok(RulePlan { rules })
}

/// Edge tier: exact `/32` delivery to local hosts, last-octet round-robin
/// toward the aggregation tier for everything else.
fn edge_rules(fabric: Fabric, pod: u8, edge: u8, rules: &mut Vec<Rule>) -> Result<(), FabricError> {
    for host in 0..fabric.half() {
        let dst = addressing::host_address(fabric, pod, edge, host)?;
        rules.push(Rule::new(
            priority::HOST_EXACT,
            MatchSpec::ipv4_dst(Ipv4Dst::Exact(dst)),
            vec![Action::Output(addressing::edge_host_port(host))],
        ));
    }
    push_suffix_uplinks(fabric, edge, rules);
    Ok(())
}

/// Aggregation tier: `/24` subnet delivery to edge switches, last-octet
/// round-robin toward the core for everything else.
fn agg_rules(fabric: Fabric, pod: u8, agg: u8, rules: &mut Vec<Rule>) -> Result<(), FabricError> {
    for edge in 0..fabric.half() {
        let subnet = addressing::subnet_address(fabric, pod, edge)?;
        rules.push(Rule::new(
            priority::SUBNET_PREFIX,
            MatchSpec::ipv4_dst(Ipv4Dst::Prefix(subnet, 24)),
            vec![Action::Output(addressing::agg_downlink_port(edge))],
        ));
    }
    push_suffix_uplinks(fabric, agg, rules);
    Ok(())
}

/// Core tier: one `/16` rule per pod, out the port wired to that pod.
fn core_rules(fabric: Fabric, rules: &mut Vec<Rule>) -> Result<(), FabricError> {
    for pod in 0..fabric.k() {
        let prefix = addressing::pod_prefix(fabric, pod)?;
        rules.push(Rule::new(
            priority::POD_PREFIX,
            MatchSpec::ipv4_dst(Ipv4Dst::Prefix(prefix, 16)),
            vec![Action::Output(addressing::core_downlink_port(pod))],
        ));
    }
    Ok(())
}

/// One uplink rule per possible destination host suffix, keyed by this
/// switch's own tier index.
fn push_suffix_uplinks(fabric: Fabric, own_index: u8, rules: &mut Vec<Rule>) {
    let base = addressing::HOST_OCTET_BASE;
    for suffix in base..base + fabric.half() {
        rules.push(Rule::new(
            priority::SUFFIX_UPLINK,
            MatchSpec::ipv4_dst(Ipv4Dst::LastOctet(suffix)),
            vec![Action::Output(addressing::uplink_for_suffix(
                fabric, suffix, own_index,
            ))],
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn fabric4() -> Fabric {
        Fabric::new(4).unwrap()
    }

    fn output_port(rule: &Rule) -> u16 {
        match rule.actions.as_slice() {
            [Action::Output(port)] => *port,
            other => panic!("expected a single output action, got {:?}", other),
        }
    }

    #[test]
    fn every_plan_starts_with_the_universal_rules() {
        let plan = compile(fabric4(), SwitchPosition::Core { row: 0, col: 0 }).unwrap();
        assert_eq!(plan.rules[0].priority, priority::TABLE_MISS);
        assert!(plan.rules[0].actions.is_empty());
        assert_eq!(plan.rules[1].priority, priority::ARP_FLOOD);
        assert_eq!(plan.rules[1].actions, vec![Action::Flood]);
    }

    #[test]
    fn edge_plan_for_pod1_edge0() {
        let plan = compile(fabric4(), SwitchPosition::Edge { pod: 1, index: 0 }).unwrap();
        assert_eq!(plan.rules.len(), 6);

        let hosts: Vec<_> = plan
            .rules
            .iter()
            .filter(|rule| rule.priority == priority::HOST_EXACT)
            .collect();
        assert_eq!(hosts.len(), 2);
        assert_eq!(
            hosts[0].matches.ipv4_dst,
            Some(Ipv4Dst::Exact(Ipv4Addr::new(10, 1, 0, 2)))
        );
        assert_eq!(output_port(hosts[0]), 0);
        assert_eq!(
            hosts[1].matches.ipv4_dst,
            Some(Ipv4Dst::Exact(Ipv4Addr::new(10, 1, 0, 3)))
        );
        assert_eq!(output_port(hosts[1]), 1);

        let uplinks: Vec<_> = plan
            .rules
            .iter()
            .filter(|rule| rule.priority == priority::SUFFIX_UPLINK)
            .collect();
        assert_eq!(uplinks.len(), 2);
        assert_eq!(uplinks[0].matches.ipv4_dst, Some(Ipv4Dst::LastOctet(2)));
        assert_eq!(output_port(uplinks[0]), 2);
        assert_eq!(uplinks[1].matches.ipv4_dst, Some(Ipv4Dst::LastOctet(3)));
        assert_eq!(output_port(uplinks[1]), 3);
    }

    #[test]
    fn agg_plan_routes_subnets_down_and_suffixes_up() {
        let plan = compile(fabric4(), SwitchPosition::Agg { pod: 2, index: 1 }).unwrap();
        assert_eq!(plan.rules.len(), 6);

        let subnets: Vec<_> = plan
            .rules
            .iter()
            .filter(|rule| rule.priority == priority::SUBNET_PREFIX)
            .collect();
        assert_eq!(subnets.len(), 2);
        assert_eq!(
            subnets[0].matches.ipv4_dst,
            Some(Ipv4Dst::Prefix(Ipv4Addr::new(10, 2, 0, 0), 24))
        );
        assert_eq!(output_port(subnets[0]), 0);
        assert_eq!(
            subnets[1].matches.ipv4_dst,
            Some(Ipv4Dst::Prefix(Ipv4Addr::new(10, 2, 1, 0), 24))
        );
        assert_eq!(output_port(subnets[1]), 1);

        // index 1 skews the round-robin by one uplink.
        let uplinks: Vec<_> = plan
            .rules
            .iter()
            .filter(|rule| rule.priority == priority::SUFFIX_UPLINK)
            .collect();
        assert_eq!(output_port(uplinks[0]), 3);
        assert_eq!(output_port(uplinks[1]), 2);
    }

    #[test]
    fn core_plan_has_one_rule_per_pod() {
        let plan = compile(fabric4(), SwitchPosition::Core { row: 0, col: 1 }).unwrap();
        let pods: Vec<_> = plan
            .rules
            .iter()
            .filter(|rule| rule.priority == priority::POD_PREFIX)
            .collect();
        assert_eq!(pods.len(), 4);
        for (pod, rule) in pods.iter().enumerate() {
            assert_eq!(
                rule.matches.ipv4_dst,
                Some(Ipv4Dst::Prefix(Ipv4Addr::new(10, pod as u8, 0, 0), 16))
            );
            assert_eq!(output_port(rule), pod as u16);
        }
    }

    #[test]
    fn load_spread_across_a_pod() {
        // Suffix 2 must exit a different uplink from each aggregation switch
        // of one pod.
        let fabric = fabric4();
        let mut chosen = Vec::new();
        for agg in 0..fabric.half() {
            let plan = compile(fabric, SwitchPosition::Agg { pod: 0, index: agg }).unwrap();
            let rule = plan
                .rules
                .iter()
                .find(|rule| rule.matches.ipv4_dst == Some(Ipv4Dst::LastOctet(2)))
                .unwrap();
            chosen.push(output_port(rule));
        }
        chosen.sort_unstable();
        assert_eq!(chosen, vec![2, 3]);
    }

    #[test]
    fn compilation_is_deterministic() {
        let fabric = fabric4();
        for position in [
            SwitchPosition::Edge { pod: 3, index: 1 },
            SwitchPosition::Agg { pod: 0, index: 0 },
            SwitchPosition::Core { row: 1, col: 1 },
        ] {
            let first = compile(fabric, position).unwrap();
            let second = compile(fabric, position).unwrap();
            assert_eq!(
                serde_json::to_vec(&first).unwrap(),
                serde_json::to_vec(&second).unwrap()
            );
        }
    }

    #[test]
    fn no_plan_contains_conflicting_rules() {
        let fabric = Fabric::new(8).unwrap();
        let mut positions = Vec::new();
        for row in 0..fabric.half() {
            for col in 0..fabric.half() {
                positions.push(SwitchPosition::Core { row, col });
            }
        }
        for pod in 0..fabric.k() {
            for index in 0..fabric.half() {
                positions.push(SwitchPosition::Edge { pod, index });
                positions.push(SwitchPosition::Agg { pod, index });
            }
        }
        for position in positions {
            let plan = compile(fabric, position).unwrap();
            assert!(
                plan.find_conflict().is_none(),
                "conflicting rules on {}",
                position
            );
        }
    }
}

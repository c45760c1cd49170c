//! Switch provisioning on connect events.
//!
//! One connect event drives one switch through
//! `Connected -> Classified -> RulesInstalled`. A switch whose identity
//! cannot be decoded ends `Unclassified` with just the universal drop and
//! ARP-flood rules installed, so it fails safe instead of forwarding blind
//! or sitting with an empty table. Classification failures are recovered
//! locally and logged; only sink failures propagate, leaving the switch
//! under-configured until its next connect event.

use std::collections::HashMap;

use log::{info, warn};

use crate::addressing::{decode, SwitchPosition};
use crate::error::FabricError;
use crate::fabric::Fabric;
use crate::rules::{compile, universal_rules, Rule};

/// Destination for compiled rules. Implemented by the SDN runtime and by
/// test doubles.
pub trait RuleSink {
    /// Install one rule on a switch. Re-invocation with an identical
    /// priority and match must replace the existing entry, not duplicate it.
    fn install_rule(&mut self, switch: u32, rule: &Rule) -> Result<(), FabricError>;
}

/// Per-switch provisioning state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchState {
    /// Session established, identity not yet examined.
    Connected,
    /// Identity decoded; rules not yet fully installed.
    Classified(SwitchPosition),
    /// Full role-specific plan installed. Terminal for a healthy switch.
    RulesInstalled(SwitchPosition),
    /// Identity unrecognized; only the universal rules are installed.
    /// Terminal until the switch reconnects with a recognizable identity.
    Unclassified,
}

/// Outcome of one connect event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionReport {
    pub switch: u32,
    pub state: SwitchState,
    pub rules_installed: usize,
}

/// Compiles and installs forwarding plans as switches connect.
///
/// Holds the one piece of fabric-wide state, the validated `k`, supplied at
/// construction. Nothing is ever inferred from a connecting switch's
/// identity; an unexpected identity only affects that switch.
#[derive(Debug)]
pub struct SwitchProvisioner {
    fabric: Fabric,
    sessions: HashMap<u32, SwitchState>,
}

impl SwitchProvisioner {
    pub fn new(fabric: Fabric) -> Self {
        SwitchProvisioner {
            fabric,
            sessions: HashMap::new(),
        }
    }

    /// Current state of a switch, if it has ever connected.
    pub fn state(&self, switch: u32) -> Option<&SwitchState> {
        self.sessions.get(&switch)
    }

    /// Handle one switch-connect event.
    ///
    /// Compilation is pure in `(identity, k)`, so a reconnecting switch
    /// recompiles and re-installs the identical plan; with an idempotent
    /// sink that is a no-op replacement.
    pub fn on_switch_connect<S: RuleSink>(
        &mut self,
        sink: &mut S,
        switch: u32,
        port_count: u16,
    ) -> Result<ProvisionReport, FabricError> {
        info!("Switch connected: dpid={:016x}, {} ports", switch, port_count);
        self.sessions.insert(switch, SwitchState::Connected);

        let position = match decode(switch, self.fabric) {
            Ok(position) => position,
            Err(error) => {
                warn!(
                    "Leaving switch {:016x} unclassified with fail-safe rules: {}",
                    switch, error
                );
                let installed = self.install(sink, switch, &universal_rules())?;
                self.sessions.insert(switch, SwitchState::Unclassified);
                return Ok(ProvisionReport {
                    switch,
                    state: SwitchState::Unclassified,
                    rules_installed: installed,
                });
            }
        };

        self.sessions
            .insert(switch, SwitchState::Classified(position));

        let plan = compile(self.fabric, position)?;
        if let Some(highest) = plan.max_output_port() {
            if port_count <= highest {
                warn!(
                    "Switch {:016x} ({}) reports {} ports but its plan outputs to port {}",
                    switch, position, port_count, highest
                );
            }
        }

        let installed = self.install(sink, switch, &plan.rules)?;
        self.sessions
            .insert(switch, SwitchState::RulesInstalled(position));
        info!(
            "Installed {} rules on {} (dpid={:016x})",
            installed, position, switch
        );

        Ok(ProvisionReport {
            switch,
            state: SwitchState::RulesInstalled(position),
            rules_installed: installed,
        })
    }

    fn install<S: RuleSink>(
        &self,
        sink: &mut S,
        switch: u32,
        rules: &[Rule],
    ) -> Result<usize, FabricError> {
        for rule in rules {
            sink.install_rule(switch, rule)?;
        }
        Ok(rules.len())
    }
}

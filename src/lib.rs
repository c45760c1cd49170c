//! # FatFabric - Forwarding-plan compiler for k-ary fat-tree fabrics
//!
//! This library derives everything a three-tier fat-tree data-center fabric
//! needs to forward traffic: the topology itself and the match-action rules
//! each switch must install.
//!
//! ## Overview
//!
//! A k-ary fat tree has `k` pods, each with `k/2` edge and `k/2` aggregation
//! switches, topped by a `(k/2) x (k/2)` core grid. Every structural fact
//! follows from `k` and a handful of shared conventions: the byte layout of
//! switch identities, the `10.pod.edge.host` address scheme, and a 0-based
//! port numbering per tier. FatFabric keeps those conventions in one module
//! and derives both the wiring plan and the forwarding rules from it, so the
//! two can never disagree.
//!
//! Traffic moves down the tree on longest-prefix routes (`/32` at the edge,
//! `/24` at aggregation, `/16` at the core) and up the tree on a static
//! last-octet round-robin that spreads load across uplinks without runtime
//! measurement.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - `fabric`: validated fabric parameter `k`
//! - `addressing`: identity codec, host addressing, and the port convention
//! - `topology`: wiring plan construction and emulator/registry export
//! - `rules`: match-action rule model and the per-switch compiler
//! - `controller`: provisioning state machine over a rule-installation sink
//! - `config`: YAML configuration structures and validation
//! - `error`: shared error taxonomy
//!
//! ## Example Usage
//!
//! ```rust
//! use fatfabric::addressing::{decode, SwitchPosition};
//! use fatfabric::fabric::Fabric;
//! use fatfabric::rules::compile;
//! use fatfabric::topology;
//!
//! let fabric = Fabric::new(4)?;
//!
//! // Build the wiring plan the emulator constructs the network from.
//! let plan = topology::build(fabric)?;
//! assert_eq!(plan.hosts.len(), 16);
//!
//! // Compile the forwarding rules for one switch identity.
//! let position = decode(0x010001, fabric)?;
//! assert_eq!(position, SwitchPosition::Edge { pod: 1, index: 0 });
//! let rules = compile(fabric, position)?;
//! assert_eq!(rules.rules.len(), 6);
//! # Ok::<(), fatfabric::error::FabricError>(())
//! ```
//!
//! ## Error Handling
//!
//! Fabric validation, identity decoding, and topology construction return
//! `Result<T, FabricError>`. Decode failures are recoverable per switch (the
//! provisioner installs a fail-safe drop-plus-ARP plan); configuration and
//! wiring failures are fatal before anything reaches a switch.

pub mod addressing;
pub mod config;
pub mod controller;
pub mod error;
pub mod fabric;
pub mod rules;
pub mod topology;

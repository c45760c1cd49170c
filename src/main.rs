use clap::Parser;
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::fs;
use std::path::PathBuf;

use fatfabric::config::{self, Config};
use fatfabric::fabric::Fabric;
use fatfabric::rules;
use fatfabric::topology;

/// Forwarding-plan compiler and topology generator for k-ary fat-tree fabrics
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the fabric configuration YAML file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fabric parameter k (overrides the configuration file)
    #[arg(short, long)]
    k: Option<u16>,

    /// Output directory for topology descriptors and rule plans
    #[arg(short, long, default_value = "fabric_output")]
    output: PathBuf,

    /// Also compile and write every switch's forwarding rules
    #[arg(long)]
    emit_rules: bool,
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse command-line arguments
    let args = Args::parse();

    // Initialize logging with default filter level of "info"
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    info!("Starting FatFabric forwarding-plan compiler");

    // Resolve the configuration: file first, then command-line overrides.
    let mut config = match &args.config {
        Some(path) => {
            info!("Configuration file: {:?}", path);
            config::load_config(path)?
        }
        None => {
            let k = args
                .k
                .ok_or_else(|| eyre!("either --config or --k is required"))?;
            Config::for_k(k)
        }
    };
    if let Some(k) = args.k {
        config.fabric.k = k;
    }
    config.validate()?;

    let fabric = Fabric::new(config.fabric.k)?;
    info!("Fabric parameter k = {}", fabric.k());

    // Build the wiring plan and export it for the emulator and tooling.
    let plan = topology::build(fabric)?;

    fs::create_dir_all(&args.output)
        .wrap_err_with(|| format!("Failed to create output directory '{}'", args.output.display()))?;
    topology::write_emulator_yaml(&plan, &config.controller, &args.output.join("topology.yaml"))?;
    topology::write_registry_json(&plan, &args.output.join("registry.json"))?;

    // Optionally compile every switch's rules offline, one file per switch.
    // Useful for diffing against what a live controller installed.
    if args.emit_rules {
        let rules_dir = args.output.join("rules");
        fs::create_dir_all(&rules_dir)
            .wrap_err_with(|| format!("Failed to create rules directory '{}'", rules_dir.display()))?;
        for switch in &plan.switches {
            let rule_plan = rules::compile(fabric, switch.position)?;
            let path = rules_dir.join(format!("{}.json", switch.name));
            let json = serde_json::to_string_pretty(&rule_plan)
                .wrap_err_with(|| format!("Failed to serialize rule plan for '{}'", switch.name))?;
            fs::write(&path, json)
                .wrap_err_with(|| format!("Failed to write rule plan '{}'", path.display()))?;
        }
        info!(
            "Wrote {} rule plans to {:?}",
            plan.switches.len(),
            rules_dir
        );
    }

    info!("Fabric plan generation completed successfully");
    Ok(())
}

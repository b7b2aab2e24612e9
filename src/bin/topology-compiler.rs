// Copyright (c) 2025 - Cowboy AI, Inc.
//! Topology Compiler CLI
//!
//! Compiles a JSON `TopologyInput` into a topology plan and prints it.
//!
//! Run with: cargo run --bin topology-compiler -- input.json [--apply]
//!
//! With `--apply`, the plan is additionally run through the in-memory
//! orchestration engine and the resulting export set is printed, previewing
//! what a real engine would resolve.

use anyhow::{Context, Result};
use cim_topology::compiler::{TopologyCompiler, TopologyInput};
use cim_topology::service::{
    FixedOffsetProvisioner, InMemoryEngine, OrchestrationEngine,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let input_path = args
        .next()
        .context("usage: topology-compiler <input.json> [--apply]")?;
    let apply = args.next().as_deref() == Some("--apply");

    let raw = std::fs::read_to_string(&input_path)
        .with_context(|| format!("failed to read {}", input_path))?;
    let input: TopologyInput =
        serde_json::from_str(&raw).context("failed to parse topology input")?;

    info!(spokes = input.spokes.len(), "compiling topology");
    let plan = TopologyCompiler::default().compile(&input)?;

    println!("{}", plan.to_canonical_json()?);

    if apply {
        let engine = InMemoryEngine::new(FixedOffsetProvisioner::default());
        let applied = engine.apply(&plan).await?;
        println!("{}", serde_json::to_string_pretty(&applied.exports.flatten())?);
    }

    Ok(())
}

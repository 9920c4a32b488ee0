mod cli;

use anyhow::Context;
use clap::Parser;
use cli::Cli;
use plantops::{PipelineManager, PlantType, SensorSnapshot};
use std::io::Read;
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let input = match cli.input.as_deref() {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        _ => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            buffer
        }
    };

    let snapshot: SensorSnapshot =
        serde_json::from_str(&input).context("invalid sensor snapshot")?;

    // CLI override first, then the snapshot's own identifiers.
    let plant_type = cli
        .plant_type
        .as_deref()
        .or(snapshot.plant_type.as_deref())
        .or(snapshot.species.as_deref())
        .map(PlantType::resolve)
        .unwrap_or_default();

    let manager = PipelineManager::new(plant_type);
    let report = manager.process(snapshot);

    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{}", rendered);

    if !report.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "plantops",
    version,
    about = "Irrigation and fertilization recommendations from sensor data"
)]
pub struct Cli {
    /// JSON sensor snapshot file, or '-' for stdin
    #[arg(default_value = "-")]
    pub input: Option<PathBuf>,

    /// Override the snapshot's plant_type/species for strategy selection
    #[arg(short, long)]
    pub plant_type: Option<String>,

    /// Pretty-print the report JSON
    #[arg(long)]
    pub pretty: bool,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;
use crate::config::DIR_ENV;

/// Study schedule generator and daily tracker.
/// Storage defaults to ~/.study or a directory passed via --dir.
#[derive(Parser)]
#[command(name = "study", version, about = "Study schedule generator and daily tracker")]
pub struct Cli {
    /// Directory holding schedules.json and streak.json.
    #[arg(long, global = true, env = DIR_ENV)]
    pub dir: Option<PathBuf>,

    /// Schedule to operate on (id or unique id prefix). Defaults to the active one.
    #[arg(long, global = true)]
    pub schedule: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

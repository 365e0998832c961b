//! Data directory resolution and logging setup.

use std::path::{Path, PathBuf};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{PlannerError, Result};

/// Directory name used under the home directory when nothing else is given.
pub const DEFAULT_DIR_NAME: &str = ".study";

/// Environment variable that overrides the data directory.
pub const DIR_ENV: &str = "STUDY_PLANNER_DIR";

/// Resolve the data directory: an explicit path (from `--dir` or
/// `STUDY_PLANNER_DIR`) wins, otherwise `~/.study`.
pub fn resolve_data_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir.to_path_buf());
    }
    dirs::home_dir()
        .map(|home| home.join(DEFAULT_DIR_NAME))
        .ok_or(PlannerError::NoDataDir)
}

/// Log to stderr, `warn` and above unless `RUST_LOG` says otherwise.
pub fn init_logging() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

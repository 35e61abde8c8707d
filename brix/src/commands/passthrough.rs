// brix/src/commands/passthrough.rs
//
// USE CASE: Forward unknown `brix dbt` subcommands to dbt.

use std::path::PathBuf;

use tracing::debug;

use brix_core::infrastructure::config::CacheSettings;
use brix_core::infrastructure::passthrough::{DbtLauncher, ProjectCache};

/// Returns the exit code the process should terminate with.
pub fn execute(project: Option<PathBuf>, args: Vec<String>) -> anyhow::Result<i32> {
    let cache = ProjectCache::new(CacheSettings::resolve()?.cache_file);

    let project_dir = match project {
        Some(dir) => Some(cache.save(&dir)?),
        None => cache.load()?,
    };
    debug!(project = ?project_dir, "Resolved dbt project directory");

    let code = DbtLauncher::default().run(args.as_slice(), project_dir.as_deref())?;
    Ok(code)
}

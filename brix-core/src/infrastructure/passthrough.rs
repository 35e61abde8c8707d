// brix-core/src/infrastructure/passthrough.rs
//
// Forwards arguments to the dbt executable and remembers which project
// directory it last ran in.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::{atomic_write, ensure_parent_dir};

pub const DBT_EXECUTABLE: &str = "dbt";

/// Runs an external executable with inherited stdio.
#[derive(Debug, Clone)]
pub struct DbtLauncher {
    executable: String,
}

impl Default for DbtLauncher {
    fn default() -> Self {
        Self::new(DBT_EXECUTABLE)
    }
}

impl DbtLauncher {
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    pub fn executable(&self) -> &str {
        &self.executable
    }

    /// Runs the executable and returns its exit code. A child killed by a
    /// signal has no code and reports 1.
    #[instrument(skip(self, args), fields(executable = %self.executable))]
    pub fn run<S: AsRef<str>>(
        &self,
        args: &[S],
        project_dir: Option<&Path>,
    ) -> Result<i32, InfrastructureError> {
        let args: Vec<&str> = args.iter().map(|arg| arg.as_ref()).collect();
        let mut command = Command::new(&self.executable);
        command.args(&args);

        if let Some(dir) = project_dir {
            if !dir.is_dir() {
                return Err(InfrastructureError::InvalidProjectPath(dir.to_path_buf()));
            }
            command.current_dir(dir);
        }

        debug!(?args, "Executing");
        let status = command.status().map_err(|e| match e.kind() {
            ErrorKind::NotFound => InfrastructureError::DbtNotFound(self.executable.clone()),
            _ => InfrastructureError::Io(e),
        })?;

        let code = status.code().unwrap_or(1);
        debug!(code, "Process exited");
        Ok(code)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CachedProject {
    project_path: PathBuf,
}

/// JSON file holding the last `--project` directory.
#[derive(Debug, Clone)]
pub struct ProjectCache {
    cache_file: PathBuf,
}

impl ProjectCache {
    pub fn new(cache_file: impl Into<PathBuf>) -> Self {
        Self {
            cache_file: cache_file.into(),
        }
    }

    /// Canonicalizes `project_path`, stores it and returns the stored value.
    #[instrument(skip(self), fields(cache = %self.cache_file.display()))]
    pub fn save(&self, project_path: &Path) -> Result<PathBuf, InfrastructureError> {
        if !project_path.is_dir() {
            return Err(InfrastructureError::InvalidProjectPath(
                project_path.to_path_buf(),
            ));
        }
        let project_path = project_path.canonicalize()?;
        let content = serde_json::to_string_pretty(&CachedProject {
            project_path: project_path.clone(),
        })?;

        ensure_parent_dir(&self.cache_file)?;
        atomic_write(&self.cache_file, content)?;
        debug!(path = %project_path.display(), "Cached project path");
        Ok(project_path)
    }

    /// `Ok(None)` when nothing has been cached yet.
    pub fn load(&self) -> Result<Option<PathBuf>, InfrastructureError> {
        let content = match fs::read_to_string(&self.cache_file) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let cached: CachedProject = serde_json::from_str(&content)?;

        if !cached.project_path.is_dir() {
            return Err(InfrastructureError::CachedPathNotFound(cached.project_path));
        }
        Ok(Some(cached.project_path))
    }
}

// brix-core/src/infrastructure/config/settings.rs
//
// Locations are resolved once at the CLI boundary and passed explicitly to
// every persistence call. Precedence: explicit value > environment > default.

use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

use tracing::debug;

use crate::infrastructure::error::InfrastructureError;

pub const PROFILE_PATH_ENV: &str = "BRIX_DBT_PROFILE_PATH";
pub const PROJECT_BASE_DIR_ENV: &str = "BRIX_DBT_PROJECT_BASE_DIR";
pub const CACHE_DIR_ENV: &str = "BRIX_CACHE_DIR";

const PROJECT_CACHE_FILE: &str = "dbt_project_path.json";
const VERSION_CACHE_FILE: &str = "version_check.json";

/// Where `profiles.yml` lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSettings {
    pub profile_path: PathBuf,
}

impl ProfileSettings {
    pub fn new(profile_path: impl Into<PathBuf>) -> Self {
        Self {
            profile_path: profile_path.into(),
        }
    }

    pub fn resolve(explicit: Option<PathBuf>) -> Result<Self, InfrastructureError> {
        Self::resolve_with(explicit, env::var_os(PROFILE_PATH_ENV), dirs::home_dir())
    }

    pub fn resolve_with(
        explicit: Option<PathBuf>,
        env_value: Option<OsString>,
        home: Option<PathBuf>,
    ) -> Result<Self, InfrastructureError> {
        if let Some(path) = explicit.or_else(|| non_empty(env_value)) {
            debug!(path = %path.display(), "Using configured profile path");
            return Ok(Self::new(path));
        }
        let home = home.ok_or(InfrastructureError::HomeDirUnavailable)?;
        Ok(Self::new(home.join(".dbt").join("profiles.yml")))
    }
}

/// Base directory new projects are scaffolded under. `None` means the cwd.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectSettings {
    pub base_dir: Option<PathBuf>,
}

impl ProjectSettings {
    pub fn from_env() -> Self {
        Self {
            base_dir: non_empty(env::var_os(PROJECT_BASE_DIR_ENV)),
        }
    }
}

/// Locations of the passthrough project-path cache and the update-check cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    pub cache_file: PathBuf,
    pub version_file: PathBuf,
}

impl CacheSettings {
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            cache_file: dir.join(PROJECT_CACHE_FILE),
            version_file: dir.join(VERSION_CACHE_FILE),
        }
    }

    pub fn resolve() -> Result<Self, InfrastructureError> {
        Self::resolve_with(env::var_os(CACHE_DIR_ENV), dirs::home_dir())
    }

    pub fn resolve_with(
        env_value: Option<OsString>,
        home: Option<PathBuf>,
    ) -> Result<Self, InfrastructureError> {
        if let Some(dir) = non_empty(env_value) {
            return Ok(Self::in_dir(dir));
        }
        let home = home.ok_or(InfrastructureError::HomeDirUnavailable)?;
        Ok(Self::in_dir(home.join(".cache").join("brix")))
    }
}

fn non_empty(value: Option<OsString>) -> Option<PathBuf> {
    value.filter(|v| !v.is_empty()).map(PathBuf::from)
}

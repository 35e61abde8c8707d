// brix-core/src/application/profile_init.rs

use std::fmt;
use std::path::PathBuf;

use tracing::{debug, info, instrument};

use crate::domain::profile::ProfileDocument;
use crate::error::BrixError;
use crate::infrastructure::config::ProfileSettings;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::{atomic_write, ensure_parent_dir};
use crate::infrastructure::templates::get_template;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitAction {
    Created,
    Overwritten,
}

impl fmt::Display for InitAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitAction::Created => write!(f, "created"),
            InitAction::Overwritten => write!(f, "overwritten"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileInitResult {
    pub path: PathBuf,
    pub action: InitAction,
    pub message: String,
}

/// Returns a bundled template together with its parsed form.
pub fn load_template(name: &str) -> Result<(&'static str, ProfileDocument), BrixError> {
    debug!(template = name, "Loading template");
    let content = get_template(name)?;
    let document = ProfileDocument::from_text(content)?;
    Ok((content, document))
}

/// Writes a bundled template to the configured profile path, verbatim.
#[instrument(skip(settings), fields(path = %settings.profile_path.display()))]
pub fn init_profile(
    settings: &ProfileSettings,
    force: bool,
    template: &str,
) -> Result<ProfileInitResult, BrixError> {
    let path = settings.profile_path.clone();
    let exists = path.exists();
    if exists && !force {
        return Err(InfrastructureError::ProfileFileExists(path).into());
    }

    let (content, _) = load_template(template)?;

    ensure_parent_dir(&path)?;
    atomic_write(&path, content)?;

    let action = if exists {
        InitAction::Overwritten
    } else {
        InitAction::Created
    };
    info!(%action, "Profile initialized");

    Ok(ProfileInitResult {
        message: format!("Profile {} at {}", action, path.display()),
        path,
        action,
    })
}

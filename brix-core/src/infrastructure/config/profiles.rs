// brix-core/src/infrastructure/config/profiles.rs

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::{debug, instrument};

use crate::domain::profile::ProfileDocument;
use crate::error::BrixError;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::{atomic_write, ensure_parent_dir};

/// Reads and parses `profiles.yml`. A missing file is an error here;
/// substituting an empty document is the caller's decision.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_profiles(path: &Path) -> Result<ProfileDocument, BrixError> {
    debug!("Loading profiles");
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(InfrastructureError::NotFound(path.to_path_buf()).into());
        }
        Err(e) => return Err(e.into()),
    };
    Ok(ProfileDocument::from_text(&content)?)
}

/// Serializes `document`, checks the text parses back, then writes it.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn save_profiles(document: &ProfileDocument, path: &Path) -> Result<(), BrixError> {
    let content = document.to_text()?;

    // Never persist a document we could not read back.
    ProfileDocument::from_text(&content)?;

    ensure_parent_dir(path)?;
    atomic_write(path, &content)?;
    debug!(profiles = document.len(), "Saved profiles");
    Ok(())
}

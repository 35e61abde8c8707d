// brix-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, PartialEq, Eq)]
pub enum DomainError {
    // --- DOCUMENT SHAPE ---
    #[error("Invalid YAML: {0}")]
    #[diagnostic(
        code(brix::domain::malformed),
        help("Check your YAML syntax (indentation, quoting).")
    )]
    MalformedDocument(String),

    #[error("Schema Error: {0}")]
    #[diagnostic(code(brix::domain::schema))]
    Schema(String),

    // --- CRUD PRECONDITIONS ---
    #[error("Profile '{0}' not found")]
    #[diagnostic(code(brix::domain::profile_not_found))]
    ProfileNotFound(String),

    #[error("Profile '{0}' already exists")]
    #[diagnostic(code(brix::domain::profile_exists))]
    ProfileAlreadyExists(String),

    #[error("Output '{output}' not found in profile '{profile}'")]
    #[diagnostic(code(brix::domain::output_not_found))]
    OutputNotFound { profile: String, output: String },

    #[error("Output '{output}' already exists in profile '{profile}'")]
    #[diagnostic(code(brix::domain::output_exists))]
    OutputAlreadyExists { profile: String, output: String },

    #[error("Cannot delete the only output of profile '{0}'")]
    #[diagnostic(
        code(brix::domain::last_output),
        help("Delete the profile instead.")
    )]
    LastOutput(String),

    // --- SCAFFOLDING ---
    #[error("Invalid project name '{0}'")]
    #[diagnostic(
        code(brix::domain::project_name),
        help("Project names must start with a letter or underscore and contain only letters, digits and underscores.")
    )]
    InvalidProjectName(String),
}

impl DomainError {
    pub fn schema(msg: impl Into<String>) -> Self {
        DomainError::Schema(msg.into())
    }

    /// Prefixes a schema error with the location it was raised at.
    pub(crate) fn within(self, location: &str) -> Self {
        match self {
            DomainError::Schema(msg) => DomainError::Schema(format!("{}: {}", location, msg)),
            other => other,
        }
    }
}

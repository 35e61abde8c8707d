// brix-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum BrixError {
    // --- Domain (document schema, CRUD preconditions) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Domain(#[from] DomainError),

    // --- Infrastructure (IO, templates, launcher) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Infrastructure(#[from] InfrastructureError),
}

impl From<std::io::Error> for BrixError {
    fn from(err: std::io::Error) -> Self {
        BrixError::Infrastructure(InfrastructureError::Io(err))
    }
}

pub mod config;
pub mod error;
pub mod fs;
pub mod passthrough;
pub mod templates;
pub mod version_check;

pub use error::InfrastructureError;

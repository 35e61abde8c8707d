pub mod error;
pub mod profile;
pub mod project;

pub use error::DomainError;

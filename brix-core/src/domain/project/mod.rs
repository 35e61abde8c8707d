// brix-core/src/domain/project/mod.rs

pub mod configuration;
pub mod packages;

pub use configuration::{DbtProject, Materialization, validate_project_name};
pub use packages::{DbtPackages, GitPackage, HubPackage, LocalPackage, Package};

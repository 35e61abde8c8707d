// brix-core/src/domain/profile/mod.rs

pub mod databricks;
pub mod document;
pub mod output;

pub use databricks::{AuthMode, AuthType, DatabricksOutput, DatabricksOutputBuilder};
pub use document::{Profile, ProfileDocument};
pub use output::{DuckDbOutput, MEMORY_PATH, OutputConfig, OutputUpdate};

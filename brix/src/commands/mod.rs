// brix/src/commands/mod.rs

pub mod passthrough;
pub mod profile;
pub mod project;

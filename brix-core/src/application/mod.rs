// brix-core/src/application/mod.rs

pub mod editor;
pub mod profile_init;
pub mod project_init;

pub use profile_init::{InitAction, ProfileInitResult, init_profile, load_template};
pub use project_init::{ProjectInitOptions, ProjectInitResult, init_project, resolve_project_path};

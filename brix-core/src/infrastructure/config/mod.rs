pub mod profiles;
pub mod settings;

pub use profiles::{load_profiles, save_profiles};
pub use settings::{CacheSettings, ProfileSettings, ProjectSettings};

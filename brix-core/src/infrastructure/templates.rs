// brix-core/src/infrastructure/templates.rs

use crate::infrastructure::error::InfrastructureError;

pub const PROFILES_TEMPLATE: &str = "profiles.yml";
pub const GITIGNORE_TEMPLATE: &str = "dbt_gitignore";
pub const EXAMPLE_MODEL_TEMPLATE: &str = "example_model.sql";
pub const EXAMPLE_SCHEMA_TEMPLATE: &str = "example_schema.yml";

/// Templates shipped inside the binary.
const TEMPLATES: [(&str, &str); 4] = [
    (
        PROFILES_TEMPLATE,
        include_str!("../../templates/profiles.yml"),
    ),
    (
        GITIGNORE_TEMPLATE,
        include_str!("../../templates/dbt_gitignore"),
    ),
    (
        EXAMPLE_MODEL_TEMPLATE,
        include_str!("../../templates/example_model.sql"),
    ),
    (
        EXAMPLE_SCHEMA_TEMPLATE,
        include_str!("../../templates/example_schema.yml"),
    ),
];

pub fn get_template(name: &str) -> Result<&'static str, InfrastructureError> {
    TEMPLATES
        .iter()
        .find(|(template, _)| *template == name)
        .map(|(_, content)| *content)
        .ok_or_else(|| InfrastructureError::TemplateNotFound(name.to_string()))
}

// brix-core/src/domain/project/configuration.rs

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;

use crate::domain::error::DomainError;

/// Default materialization for a scaffolded project's models.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Materialization {
    #[default]
    View,
    Table,
    Ephemeral,
}

impl Materialization {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Table => "table",
            Self::Ephemeral => "ephemeral",
        }
    }
}

impl std::str::FromStr for Materialization {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "view" => Ok(Self::View),
            "table" => Ok(Self::Table),
            "ephemeral" => Ok(Self::Ephemeral),
            _ => Err(format!("Unknown materialization: {}", s)),
        }
    }
}

/// `dbt_project.yml`
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DbtProject {
    pub name: String,

    #[serde(default = "default_version")]
    pub version: String,

    pub profile: String,

    #[serde(rename = "config-version", default = "default_config_version")]
    pub config_version: u32,

    #[serde(rename = "model-paths", default = "default_model_paths")]
    pub model_paths: Vec<String>,

    #[serde(rename = "analysis-paths", default = "default_analysis_paths")]
    pub analysis_paths: Vec<String>,

    #[serde(rename = "test-paths", default = "default_test_paths")]
    pub test_paths: Vec<String>,

    #[serde(rename = "seed-paths", default = "default_seed_paths")]
    pub seed_paths: Vec<String>,

    #[serde(rename = "macro-paths", default = "default_macro_paths")]
    pub macro_paths: Vec<String>,

    #[serde(rename = "snapshot-paths", default = "default_snapshot_paths")]
    pub snapshot_paths: Vec<String>,

    #[serde(rename = "clean-targets", default = "default_clean_targets")]
    pub clean_targets: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub models: Option<Mapping>,
}

impl DbtProject {
    pub fn new(name: impl Into<String>, profile: impl Into<String>) -> Result<Self, DomainError> {
        let name: String = name.into();
        validate_project_name(&name)?;
        Ok(Self {
            name,
            version: default_version(),
            profile: profile.into(),
            config_version: default_config_version(),
            model_paths: default_model_paths(),
            analysis_paths: default_analysis_paths(),
            test_paths: default_test_paths(),
            seed_paths: default_seed_paths(),
            macro_paths: default_macro_paths(),
            snapshot_paths: default_snapshot_paths(),
            clean_targets: default_clean_targets(),
            models: None,
        })
    }

    /// Adds the `models: {<project>: {...}}` block for non-default settings.
    pub fn with_model_defaults(mut self, materialization: Materialization, persist_docs: bool) -> Self {
        let mut config = Mapping::new();
        if materialization != Materialization::View {
            config.insert("+materialized".into(), materialization.as_str().into());
        }
        if persist_docs {
            let mut docs = Mapping::new();
            docs.insert("relation".into(), true.into());
            docs.insert("columns".into(), true.into());
            config.insert("+persist_docs".into(), docs.into());
        }
        if !config.is_empty() {
            let mut models = Mapping::new();
            models.insert(self.name.clone().into(), config.into());
            self.models = Some(models);
        }
        self
    }

    pub fn from_yaml(content: &str) -> Result<Self, DomainError> {
        let project: DbtProject = serde_yaml::from_str(content)
            .map_err(|e| DomainError::MalformedDocument(e.to_string()))?;
        validate_project_name(&project.name)?;
        Ok(project)
    }

    pub fn to_yaml(&self) -> Result<String, DomainError> {
        serde_yaml::to_string(self).map_err(|e| DomainError::schema(e.to_string()))
    }
}

/// dbt project names must be valid identifiers.
pub fn validate_project_name(name: &str) -> Result<&str, DomainError> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    let valid = PATTERN
        .get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(name));

    if valid {
        Ok(name)
    } else {
        Err(DomainError::InvalidProjectName(name.to_string()))
    }
}

fn default_version() -> String {
    "1.0.0".to_string()
}
fn default_config_version() -> u32 {
    2
}
fn default_model_paths() -> Vec<String> {
    vec!["models".to_string()]
}
fn default_analysis_paths() -> Vec<String> {
    vec!["analyses".to_string()]
}
fn default_test_paths() -> Vec<String> {
    vec!["tests".to_string()]
}
fn default_seed_paths() -> Vec<String> {
    vec!["seeds".to_string()]
}
fn default_macro_paths() -> Vec<String> {
    vec!["macros".to_string()]
}
fn default_snapshot_paths() -> Vec<String> {
    vec!["snapshots".to_string()]
}
fn default_clean_targets() -> Vec<String> {
    vec!["target".to_string(), "dbt_packages".to_string()]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_valid_project_names() {
        for name in ["my_project", "MyProject", "_private", "project123", "a", "_"] {
            assert_eq!(validate_project_name(name).unwrap(), name);
        }
    }

    #[test]
    fn test_invalid_project_names() {
        for name in ["my-project", "123project", "my project", "my.project", "", "project@name"] {
            assert_eq!(
                validate_project_name(name),
                Err(DomainError::InvalidProjectName(name.to_string()))
            );
        }
    }

    #[test]
    fn test_parse_simple_project() -> Result<()> {
        let yaml = r#"
name: my_project
version: '1.0.0'
profile: default
config-version: 2
model-paths: ["models"]
seed-paths: ["seeds"]
"#;
        let project = DbtProject::from_yaml(yaml)?;
        assert_eq!(project.name, "my_project");
        assert_eq!(project.profile, "default");
        assert_eq!(project.config_version, 2);
        assert_eq!(project.test_paths, vec!["tests"]);
        assert_eq!(project.clean_targets, vec!["target", "dbt_packages"]);
        Ok(())
    }

    #[test]
    fn test_invalid_name_in_file_rejected() {
        let result = DbtProject::from_yaml("name: bad-name\nprofile: default\n");
        assert!(matches!(result, Err(DomainError::InvalidProjectName(_))));
    }

    #[test]
    fn test_model_defaults_block() -> Result<()> {
        let project = DbtProject::new("analytics", "databricks_dev")?
            .with_model_defaults(Materialization::Table, true);
        let yaml = project.to_yaml()?;
        assert!(yaml.contains("+materialized: table"));
        assert!(yaml.contains("+persist_docs"));
        assert!(yaml.contains("relation: true"));

        let reparsed = DbtProject::from_yaml(&yaml)?;
        assert_eq!(reparsed, project);
        Ok(())
    }

    #[test]
    fn test_view_materialization_adds_nothing() -> Result<()> {
        let project =
            DbtProject::new("analytics", "default")?.with_model_defaults(Materialization::View, false);
        assert!(project.models.is_none());
        Ok(())
    }
}

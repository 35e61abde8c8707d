// brix-core/src/domain/profile/output.rs

use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::{Mapping, Value};

use super::databricks::DatabricksOutput;
use crate::domain::error::DomainError;

pub const MEMORY_PATH: &str = ":memory:";
const MEMORY_DATABASE: &str = "memory";

/// Connection payload of one output, discriminated by its `type` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OutputConfig {
    #[serde(rename = "duckdb")]
    DuckDb(DuckDbOutput),
    #[serde(rename = "databricks")]
    Databricks(DatabricksOutput),
}

/// Partial update accepted by the editor. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputUpdate {
    pub path: Option<String>,
    pub threads: Option<u32>,
}

impl OutputUpdate {
    pub fn is_empty(&self) -> bool {
        self.path.is_none() && self.threads.is_none()
    }
}

impl OutputConfig {
    /// Decodes one output record and brings it to canonical form.
    pub fn from_yaml_value(value: Value) -> Result<Self, DomainError> {
        let mut output: OutputConfig =
            serde_yaml::from_value(value).map_err(|e| DomainError::schema(e.to_string()))?;
        output.canonicalize()?;
        Ok(output)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            OutputConfig::DuckDb(_) => "duckdb",
            OutputConfig::Databricks(_) => "databricks",
        }
    }

    pub fn threads(&self) -> u32 {
        match self {
            OutputConfig::DuckDb(o) => o.threads,
            OutputConfig::Databricks(o) => o.threads,
        }
    }

    /// Applies normalization rules, then field and cross-field checks.
    pub fn canonicalize(&mut self) -> Result<(), DomainError> {
        match self {
            OutputConfig::DuckDb(o) => o.canonicalize(),
            OutputConfig::Databricks(o) => o.canonicalize(),
        }
    }

    /// Returns an updated copy; `self` is left untouched when validation fails.
    pub fn with_update(&self, update: &OutputUpdate) -> Result<Self, DomainError> {
        let mut next = self.clone();
        match &mut next {
            OutputConfig::DuckDb(o) => {
                if let Some(path) = &update.path {
                    o.path = path.clone();
                }
                if let Some(threads) = update.threads {
                    o.threads = threads;
                }
            }
            OutputConfig::Databricks(o) => {
                if update.path.is_some() {
                    return Err(DomainError::schema(
                        "path cannot be set on a databricks output",
                    ));
                }
                if let Some(threads) = update.threads {
                    o.threads = threads;
                }
            }
        }
        next.canonicalize()?;
        Ok(next)
    }
}

impl From<DuckDbOutput> for OutputConfig {
    fn from(output: DuckDbOutput) -> Self {
        OutputConfig::DuckDb(output)
    }
}

impl From<DatabricksOutput> for OutputConfig {
    fn from(output: DatabricksOutput) -> Self {
        OutputConfig::Databricks(output)
    }
}

// =============================================================================
//  DUCKDB
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuckDbOutput {
    #[serde(default = "default_path")]
    pub path: String,

    #[serde(default = "default_main")]
    pub schema: String,

    #[serde(default = "default_main")]
    pub database: String,

    #[serde(default = "default_threads", deserialize_with = "deserialize_threads")]
    pub threads: u32,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub settings: IndexMap<String, Value>,

    #[serde(flatten)]
    pub extra: Mapping,
}

impl Default for DuckDbOutput {
    fn default() -> Self {
        Self {
            path: default_path(),
            schema: default_main(),
            database: MEMORY_DATABASE.to_string(),
            threads: default_threads(),
            extensions: Vec::new(),
            settings: IndexMap::new(),
            extra: Mapping::new(),
        }
    }
}

impl DuckDbOutput {
    pub fn new(path: impl Into<String>, threads: u32) -> Result<Self, DomainError> {
        let mut output = Self {
            path: path.into(),
            threads,
            ..Self::default()
        };
        output.database = default_main();
        output.canonicalize()?;
        Ok(output)
    }

    pub fn canonicalize(&mut self) -> Result<(), DomainError> {
        check_threads(self.threads)?;

        if let Some((key, _)) = self.settings.iter().find(|(_, v)| !is_scalar(v)) {
            return Err(DomainError::schema(format!(
                "settings.{} must be a scalar value",
                key
            )));
        }

        // In-memory databases are always attached as "memory".
        if self.path == MEMORY_PATH {
            self.database = MEMORY_DATABASE.to_string();
        }
        Ok(())
    }
}

pub(crate) fn check_threads(threads: u32) -> Result<(), DomainError> {
    if threads < 1 {
        return Err(DomainError::schema("threads must be at least 1"));
    }
    Ok(())
}

/// Reads `threads` as a signed integer so negative counts report the same
/// message as zero instead of a type mismatch.
pub(crate) fn deserialize_threads<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let threads = i64::deserialize(deserializer)?;
    if threads < 1 {
        return Err(D::Error::custom("threads must be at least 1"));
    }
    u32::try_from(threads)
        .map_err(|_| D::Error::custom(format!("threads must be at most {}", u32::MAX)))
}

fn is_scalar(value: &Value) -> bool {
    matches!(
        value,
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_)
    )
}

fn default_path() -> String {
    MEMORY_PATH.to_string()
}

fn default_main() -> String {
    "main".to_string()
}

pub(crate) fn default_threads() -> u32 {
    1
}

// brix-core/src/domain/profile/document.rs

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_yaml::{Mapping, Value};

use super::output::OutputConfig;
use crate::domain::error::DomainError;

/// Top-level keys dbt reserves for global settings rather than profiles.
const RESERVED_KEYS: [&str; 1] = ["config"];

/// One named connection profile: a default target and its outputs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    pub target: String,
    pub outputs: IndexMap<String, OutputConfig>,

    #[serde(flatten)]
    pub extra: Mapping,
}

#[derive(Deserialize)]
struct RawProfile {
    target: String,
    outputs: Mapping,

    #[serde(flatten)]
    extra: Mapping,
}

impl Profile {
    pub fn new(
        target: impl Into<String>,
        output_name: impl Into<String>,
        output: OutputConfig,
    ) -> Self {
        let mut outputs = IndexMap::new();
        outputs.insert(output_name.into(), output);
        Self {
            target: target.into(),
            outputs,
            extra: Mapping::new(),
        }
    }

    fn from_yaml_value(value: Value) -> Result<Self, DomainError> {
        let raw: RawProfile =
            serde_yaml::from_value(value).map_err(|e| DomainError::schema(e.to_string()))?;

        let mut outputs = IndexMap::with_capacity(raw.outputs.len());
        for (key, value) in raw.outputs {
            let name = entry_name(&key, "output")?;
            let output = OutputConfig::from_yaml_value(value)
                .map_err(|e| e.within(&format!("output '{}'", name)))?;
            outputs.insert(name, output);
        }

        Ok(Self {
            target: raw.target,
            outputs,
            extra: raw.extra,
        })
    }
}

/// The whole `profiles.yml` document, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileDocument {
    pub(crate) profiles: IndexMap<String, Profile>,
    /// Reserved top-level blocks (e.g. `config:`), kept verbatim.
    pub(crate) extra: Mapping,
}

impl ProfileDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_text(content: &str) -> Result<Self, DomainError> {
        let value: Value = serde_yaml::from_str(content)
            .map_err(|e| DomainError::MalformedDocument(e.to_string()))?;

        let Value::Mapping(root) = value else {
            return Err(DomainError::schema("profiles.yml must be a YAML mapping"));
        };

        let mut document = Self::default();
        for (key, value) in root {
            let name = entry_name(&key, "profile")?;
            if RESERVED_KEYS.contains(&name.as_str()) {
                document.extra.insert(key, value);
                continue;
            }
            let profile = Profile::from_yaml_value(value)
                .map_err(|e| e.within(&format!("profile '{}'", name)))?;
            document.profiles.insert(name, profile);
        }

        Ok(document)
    }

    pub fn to_text(&self) -> Result<String, DomainError> {
        serde_yaml::to_string(self).map_err(|e| DomainError::schema(e.to_string()))
    }

    pub fn get(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.profiles.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Profile)> {
        self.profiles.iter()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn extra(&self) -> &Mapping {
        &self.extra
    }
}

impl Serialize for ProfileDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.extra.len() + self.profiles.len()))?;
        for (key, value) in &self.extra {
            map.serialize_entry(key, value)?;
        }
        for (name, profile) in &self.profiles {
            map.serialize_entry(name, profile)?;
        }
        map.end()
    }
}

fn entry_name(key: &Value, kind: &str) -> Result<String, DomainError> {
    match key.as_str() {
        Some("") => Err(DomainError::schema(format!("{} names must be non-empty", kind))),
        Some(name) => Ok(name.to_string()),
        None => Err(DomainError::schema(format!(
            "{} names must be strings, found {:?}",
            kind, key
        ))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::profile::{DatabricksOutput, DuckDbOutput};
    use anyhow::Result;

    const SAMPLE: &str = r#"
default:
  target: dev
  outputs:
    dev:
      type: duckdb
      path: dev.duckdb
      threads: 1
"#;

    #[test]
    fn test_parse_simple_duckdb_profile() -> Result<()> {
        let doc = ProfileDocument::from_text(SAMPLE)?;
        let profile = doc.get("default").unwrap();
        assert_eq!(profile.target, "dev");
        assert_eq!(profile.outputs.len(), 1);
        match &profile.outputs["dev"] {
            OutputConfig::DuckDb(duck) => {
                assert_eq!(duck.path, "dev.duckdb");
                assert_eq!(duck.threads, 1);
            }
            other => anyhow::bail!("Expected duckdb output, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_invalid_yaml_is_malformed() {
        let err = ProfileDocument::from_text("{ invalid yaml").unwrap_err();
        assert!(matches!(err, DomainError::MalformedDocument(_)));
    }

    #[test]
    fn test_non_mapping_is_schema_error() {
        let err = ProfileDocument::from_text("- list item").unwrap_err();
        assert_eq!(err, DomainError::schema("profiles.yml must be a YAML mapping"));

        assert!(matches!(
            ProfileDocument::from_text("42"),
            Err(DomainError::Schema(_))
        ));
    }

    #[test]
    fn test_nested_errors_carry_location() {
        let yaml = r#"
default:
  target: dev
  outputs:
    dev:
      type: duckdb
      threads: 0
"#;
        let err = ProfileDocument::from_text(yaml).unwrap_err();
        assert_eq!(
            err,
            DomainError::schema("profile 'default': output 'dev': threads must be at least 1")
        );
    }

    #[test]
    fn test_empty_profile_name_rejected() {
        let yaml = "'':\n  target: dev\n  outputs: {}\n";
        let err = ProfileDocument::from_text(yaml).unwrap_err();
        assert_eq!(err, DomainError::schema("profile names must be non-empty"));
    }

    #[test]
    fn test_missing_outputs_rejected() {
        let err = ProfileDocument::from_text("default:\n  target: dev\n").unwrap_err();
        match err {
            DomainError::Schema(msg) => assert!(msg.starts_with("profile 'default'")),
            other => panic!("Expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_roundtrip_duckdb_with_all_options() -> Result<()> {
        let yaml = r#"
default:
  target: dev
  outputs:
    dev:
      type: duckdb
      path: data.duckdb
      schema: analytics
      database: warehouse
      threads: 4
      extensions:
        - parquet
        - httpfs
      settings:
        memory_limit: 4GB
        threads: 8
"#;
        let doc = ProfileDocument::from_text(yaml)?;
        let reparsed = ProfileDocument::from_text(&doc.to_text()?)?;
        assert_eq!(doc, reparsed);

        let OutputConfig::DuckDb(duck) = &reparsed.get("default").unwrap().outputs["dev"] else {
            anyhow::bail!("Expected duckdb output");
        };
        assert_eq!(duck.schema, "analytics");
        assert_eq!(duck.database, "warehouse");
        assert_eq!(duck.extensions, vec!["parquet", "httpfs"]);
        assert_eq!(
            duck.settings.keys().collect::<Vec<_>>(),
            vec!["memory_limit", "threads"]
        );
        assert_eq!(duck.settings["threads"].as_u64(), Some(8));
        Ok(())
    }

    #[test]
    fn test_roundtrip_databricks() -> Result<()> {
        let yaml = r#"
databricks_project:
  target: dev
  outputs:
    dev:
      type: databricks
      schema: my_schema
      host: https://myorg.databricks.com
      http_path: sql/1.0/warehouses/abc123
      token: dapi123456789
      catalog: main
      threads: 4
"#;
        let doc = ProfileDocument::from_text(yaml)?;
        let text = doc.to_text()?;
        assert!(text.contains("schema: my_schema"));
        assert!(text.contains("host: myorg.databricks.com"));
        assert!(text.contains("http_path: /sql/1.0/warehouses/abc123"));

        let reparsed = ProfileDocument::from_text(&text)?;
        assert_eq!(doc, reparsed);
        Ok(())
    }

    #[test]
    fn test_unknown_fields_survive_roundtrip() -> Result<()> {
        let yaml = r#"
config:
  send_anonymous_usage_stats: false
default:
  target: dev
  description: local sandbox
  outputs:
    dev:
      type: duckdb
      path: dev.duckdb
      module_paths:
        - ./plugins
"#;
        let doc = ProfileDocument::from_text(yaml)?;
        assert_eq!(doc.len(), 1);
        assert!(doc.extra().contains_key("config"));

        let profile = doc.get("default").unwrap();
        assert_eq!(
            profile.extra.get("description"),
            Some(&Value::from("local sandbox"))
        );

        let reparsed = ProfileDocument::from_text(&doc.to_text()?)?;
        assert_eq!(doc, reparsed);
        Ok(())
    }

    #[test]
    fn test_profile_order_is_preserved() -> Result<()> {
        let mut doc = ProfileDocument::new();
        for name in ["zeta", "alpha", "mid"] {
            doc.profiles.insert(
                name.to_string(),
                Profile::new("dev", "dev", DuckDbOutput::default().into()),
            );
        }
        let reparsed = ProfileDocument::from_text(&doc.to_text()?)?;
        let names: Vec<&String> = reparsed.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
        Ok(())
    }

    #[test]
    fn test_empty_document_roundtrip() -> Result<()> {
        let doc = ProfileDocument::new();
        let reparsed = ProfileDocument::from_text(&doc.to_text()?)?;
        assert!(reparsed.is_empty());
        Ok(())
    }

    #[test]
    fn test_serialized_field_order() -> Result<()> {
        let mut doc = ProfileDocument::from_text(SAMPLE)?;
        let warehouse = DatabricksOutput::builder(
            "analytics",
            "myorg.databricks.com",
            "/sql/1.0/warehouses/abc123",
        )
        .oauth()
        .catalog("main")
        .threads(4)
        .build()?;
        doc.profiles
            .insert("warehouse".to_string(), Profile::new("prod", "prod", warehouse.into()));

        insta::assert_snapshot!(doc.to_text()?.trim_end(), @r"
default:
  target: dev
  outputs:
    dev:
      type: duckdb
      path: dev.duckdb
      schema: main
      database: main
      threads: 1
warehouse:
  target: prod
  outputs:
    prod:
      type: databricks
      schema: analytics
      host: myorg.databricks.com
      http_path: /sql/1.0/warehouses/abc123
      auth_type: oauth
      catalog: main
      threads: 4
      connect_retries: 0
");
        Ok(())
    }
}

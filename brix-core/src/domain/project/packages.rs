// brix-core/src/domain/project/packages.rs

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// One entry of `packages.yml`. The variant is inferred from its keys.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum Package {
    Hub(HubPackage),
    Git(GitPackage),
    Local(LocalPackage),
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct HubPackage {
    pub package: String,
    pub version: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct GitPackage {
    pub git: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subdirectory: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct LocalPackage {
    pub local: String,
}

/// `packages.yml`
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct DbtPackages {
    #[serde(default)]
    pub packages: Vec<Package>,
}

impl DbtPackages {
    pub fn from_yaml(content: &str) -> Result<Self, DomainError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| DomainError::MalformedDocument(e.to_string()))
    }

    pub fn to_yaml(&self) -> Result<String, DomainError> {
        serde_yaml::to_string(self).map_err(|e| DomainError::schema(e.to_string()))
    }

    pub fn add_hub_package(&mut self, package: impl Into<String>, version: impl Into<String>) {
        self.packages.push(Package::Hub(HubPackage {
            package: package.into(),
            version: version.into(),
        }));
    }

    pub fn add_git_package(&mut self, git: impl Into<String>, revision: Option<String>) {
        self.packages.push(Package::Git(GitPackage {
            git: git.into(),
            revision,
            subdirectory: None,
        }));
    }
}

// brix-core/src/domain/profile/databricks.rs

use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;

use super::output::{check_threads, default_threads, deserialize_threads};
use crate::domain::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthType {
    #[serde(rename = "oauth")]
    OAuth,
}

/// Authentication mode resolved from the credential fields of an output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Nothing set; the value usually comes from `env_var()` at dbt runtime.
    Deferred,
    /// Personal access token.
    Token,
    /// OAuth user-to-machine (browser flow).
    OAuthInteractive,
    /// OAuth machine-to-machine with a Databricks service principal (AWS/GCP).
    OAuthClientCredentials,
    /// OAuth machine-to-machine with an Azure service principal.
    OAuthAzure,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabricksOutput {
    pub schema: String,

    pub host: String,

    pub http_path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_type: Option<AuthType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azure_client_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azure_client_secret: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,

    #[serde(default = "default_threads", deserialize_with = "deserialize_threads")]
    pub threads: u32,

    #[serde(default)]
    pub connect_retries: i32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connect_timeout: Option<u32>,

    #[serde(flatten)]
    pub extra: Mapping,
}

impl DatabricksOutput {
    pub fn builder(
        schema: impl Into<String>,
        host: impl Into<String>,
        http_path: impl Into<String>,
    ) -> DatabricksOutputBuilder {
        DatabricksOutputBuilder {
            inner: DatabricksOutput {
                schema: schema.into(),
                host: host.into(),
                http_path: http_path.into(),
                token: None,
                auth_type: None,
                client_id: None,
                client_secret: None,
                azure_client_id: None,
                azure_client_secret: None,
                catalog: None,
                threads: default_threads(),
                connect_retries: 0,
                connect_timeout: None,
                extra: Mapping::new(),
            },
        }
    }

    pub fn canonicalize(&mut self) -> Result<(), DomainError> {
        // Scheme prefixes and missing leading slashes are canonicalized, not rejected.
        let stripped = self
            .host
            .strip_prefix("https://")
            .or_else(|| self.host.strip_prefix("http://"))
            .map(str::to_string);
        if let Some(host) = stripped {
            self.host = host;
        }
        if !self.http_path.starts_with('/') {
            self.http_path = format!("/{}", self.http_path);
        }

        check_threads(self.threads)?;
        if self.connect_retries < 0 {
            return Err(DomainError::schema("connect_retries must be non-negative"));
        }

        self.auth_mode().map(|_| ())
    }

    /// Resolves which authentication mode the credential fields describe.
    ///
    /// Exactly one mode may be configured: a token, interactive OAuth, or
    /// OAuth with one complete credential pair (generic cloud or Azure).
    pub fn auth_mode(&self) -> Result<AuthMode, DomainError> {
        let oauth = self.auth_type == Some(AuthType::OAuth);
        let has_client = self.client_id.is_some() || self.client_secret.is_some();
        let has_azure = self.azure_client_id.is_some() || self.azure_client_secret.is_some();

        if self.token.is_some() && (oauth || has_client || has_azure) {
            return Err(DomainError::schema(
                "Cannot use token authentication with OAuth settings; choose one method",
            ));
        }
        if (has_client || has_azure) && !oauth {
            return Err(DomainError::schema(
                "OAuth credentials require auth_type='oauth'",
            ));
        }
        if has_client && has_azure {
            return Err(DomainError::schema(
                "Cannot mix AWS/GCP and Azure OAuth credentials",
            ));
        }
        if has_client && (self.client_id.is_none() || self.client_secret.is_none()) {
            return Err(DomainError::schema(
                "Both client_id and client_secret are required for OAuth M2M",
            ));
        }
        if has_azure && (self.azure_client_id.is_none() || self.azure_client_secret.is_none()) {
            return Err(DomainError::schema(
                "Both azure_client_id and azure_client_secret are required for Azure OAuth M2M",
            ));
        }

        Ok(match (self.token.is_some(), oauth, has_client, has_azure) {
            (true, _, _, _) => AuthMode::Token,
            (false, true, true, _) => AuthMode::OAuthClientCredentials,
            (false, true, _, true) => AuthMode::OAuthAzure,
            (false, true, false, false) => AuthMode::OAuthInteractive,
            (false, false, _, _) => AuthMode::Deferred,
        })
    }
}

pub struct DatabricksOutputBuilder {
    inner: DatabricksOutput,
}

impl DatabricksOutputBuilder {
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.inner.token = Some(token.into());
        self
    }

    pub fn oauth(mut self) -> Self {
        self.inner.auth_type = Some(AuthType::OAuth);
        self
    }

    pub fn client_id(mut self, value: impl Into<String>) -> Self {
        self.inner.client_id = Some(value.into());
        self
    }

    pub fn client_secret(mut self, value: impl Into<String>) -> Self {
        self.inner.client_secret = Some(value.into());
        self
    }

    pub fn azure_client_id(mut self, value: impl Into<String>) -> Self {
        self.inner.azure_client_id = Some(value.into());
        self
    }

    pub fn azure_client_secret(mut self, value: impl Into<String>) -> Self {
        self.inner.azure_client_secret = Some(value.into());
        self
    }

    pub fn catalog(mut self, catalog: impl Into<String>) -> Self {
        self.inner.catalog = Some(catalog.into());
        self
    }

    pub fn threads(mut self, threads: u32) -> Self {
        self.inner.threads = threads;
        self
    }

    pub fn connect_retries(mut self, retries: i32) -> Self {
        self.inner.connect_retries = retries;
        self
    }

    pub fn connect_timeout(mut self, seconds: u32) -> Self {
        self.inner.connect_timeout = Some(seconds);
        self
    }

    pub fn build(self) -> Result<DatabricksOutput, DomainError> {
        let mut output = self.inner;
        output.canonicalize()?;
        Ok(output)
    }
}

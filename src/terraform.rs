use crate::error;
use anyhow::{Context, Result};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, instrument, warn};

pub const DEFAULT_TFC_API_ROOT: &str = "https://app.terraform.io/api/v2";
const JSON_API: &str = "application/vnd.api+json";

/// Token and workspace that app variables are provisioned into.
#[derive(Clone, PartialEq, Eq)]
pub struct TerraformSettings {
    pub token: String,
    pub workspace_id: String,
}

impl TerraformSettings {
    pub fn new(token: impl Into<String>, workspace_id: impl Into<String>) -> Self {
        TerraformSettings {
            token: token.into(),
            workspace_id: workspace_id.into(),
        }
    }

    /// Reads `TFC_TOKEN` and `TFC_WORKSPACE_ID`; both must be set and non-empty.
    pub fn from_env() -> Option<Self> {
        let read = |name: &str| {
            std::env::var(name)
                .ok()
                .filter(|value| !value.trim().is_empty())
        };
        Some(Self::new(read("TFC_TOKEN")?, read("TFC_WORKSPACE_ID")?))
    }
}

impl std::fmt::Debug for TerraformSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerraformSettings")
            .field("token", &"<redacted>")
            .field("workspace_id", &self.workspace_id)
            .finish()
    }
}

#[derive(Deserialize, Debug)]
struct VariableList {
    #[serde(default)]
    data: Vec<VariableResource>,
}

#[derive(Deserialize, Debug)]
struct VariableResource {
    attributes: ExistingAttributes,
}

#[derive(Deserialize, Debug)]
struct ExistingAttributes {
    key: String,
}

#[derive(Serialize, Debug)]
struct CreateVariable<'a> {
    data: VariableData<'a>,
}

#[derive(Serialize, Debug)]
struct VariableData<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    attributes: NewVariable<'a>,
}

/// Attributes of a workspace variable to create.
#[derive(Serialize, Debug, Clone, Copy)]
pub struct NewVariable<'a> {
    pub key: &'a str,
    pub value: &'a str,
    pub description: &'a str,
    pub category: &'static str,
    pub hcl: bool,
    pub sensitive: bool,
}

impl<'a> NewVariable<'a> {
    /// A sensitive, non-HCL Terraform variable.
    pub fn sensitive(key: &'a str, value: &'a str, description: &'a str) -> Self {
        NewVariable {
            key,
            value,
            description,
            category: "terraform",
            hcl: false,
            sensitive: true,
        }
    }
}

/// What happened to each variable of an upload.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UploadReport {
    pub created: Vec<String>,
    /// Keys already present in the workspace; their values are left alone.
    pub skipped: Vec<String>,
    /// Keys that could not be created, with the reason.
    pub failed: Vec<(String, String)>,
}

impl UploadReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if !self.created.is_empty() {
            lines.push(format!("Created variables: {}", self.created.join(", ")));
        }
        if !self.skipped.is_empty() {
            lines.push(format!(
                "Skipped existing variables: {}",
                self.skipped.join(", ")
            ));
        }
        if self.failed.is_empty() {
            lines.push("All variables provisioned.".to_string());
        } else {
            lines.extend(
                self.failed
                    .iter()
                    .map(|(key, reason)| format!("Failed to create {key}: {reason}")),
            );
        }
        lines
    }
}

/// Client for the variables of one Terraform Cloud workspace.
#[derive(Debug)]
pub struct TerraformCloudClient {
    vars_url: String,
    headers: HeaderMap,
    http: reqwest::Client,
}

impl TerraformCloudClient {
    pub fn new(settings: &TerraformSettings) -> Result<Self> {
        Self::with_api_root(settings, DEFAULT_TFC_API_ROOT)
    }

    pub fn with_api_root(settings: &TerraformSettings, api_root: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_API));
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", settings.token))
            .context("Terraform token contains characters not allowed in an HTTP header")?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(TerraformCloudClient {
            vars_url: format!(
                "{}/workspaces/{}/vars",
                api_root.trim_end_matches('/'),
                settings.workspace_id
            ),
            headers,
            http,
        })
    }

    /// Keys of the variables already defined in the workspace.
    #[instrument(skip_all)]
    pub async fn workspace_variable_keys(&self) -> Result<HashSet<String>> {
        debug!(url = %self.vars_url, "listing workspace variables");
        let response = self
            .http
            .get(&self.vars_url)
            .headers(self.headers.clone())
            .send()
            .await?;

        let response = error::check_terraform_status(response)?;
        let list = response
            .json::<VariableList>()
            .await
            .context("Unexpected workspace variables response")?;
        Ok(list.data.into_iter().map(|v| v.attributes.key).collect())
    }

    #[instrument(skip_all, fields(key = variable.key))]
    pub async fn create_variable(&self, variable: NewVariable<'_>) -> Result<serde_json::Value> {
        let payload = serde_json::to_vec(&CreateVariable {
            data: VariableData {
                kind: "vars",
                attributes: variable,
            },
        })?;
        let response = self
            .http
            .post(&self.vars_url)
            .headers(self.headers.clone())
            .body(payload)
            .send()
            .await?;

        let response = error::check_terraform_status(response)?;
        Ok(response.json::<serde_json::Value>().await?)
    }

    /// Creates every variable the workspace does not have yet.
    ///
    /// A failed creation is recorded in the report and the upload moves on;
    /// only a failure to list the workspace aborts it.
    pub async fn upload_variables(
        &self,
        app_name: &str,
        variables: &[(String, String)],
    ) -> Result<UploadReport> {
        let existing = self.workspace_variable_keys().await?;
        let mut report = UploadReport::default();

        for (key, value) in variables {
            if existing.contains(key) {
                debug!(%key, "variable exists, skipping");
                report.skipped.push(key.clone());
                continue;
            }
            let description =
                format!("GitHub App variable {key} for app {app_name}, provisioned by issue-ops");
            match self
                .create_variable(NewVariable::sensitive(key, value, &description))
                .await
            {
                Ok(_) => report.created.push(key.clone()),
                Err(err) => {
                    warn!(%key, error = %err, "failed to create variable");
                    report.failed.push((key.clone(), err.to_string()));
                }
            }
        }
        Ok(report)
    }
}

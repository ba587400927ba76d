use crate::error;
use crate::github::client::{DEFAULT_API_ROOT, github_headers};
use anyhow::{Context, Result};
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Credentials returned by a manifest conversion.
#[derive(Deserialize, Clone, PartialEq, Eq)]
pub struct AppCredentials {
    pub id: u64,
    pub slug: String,
    pub name: String,
    pub client_id: String,
    pub client_secret: String,
    /// `None` when the manifest declares no webhook.
    pub webhook_secret: Option<String>,
    pub pem: String,
    pub html_url: String,
}

impl std::fmt::Debug for AppCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppCredentials")
            .field("id", &self.id)
            .field("slug", &self.slug)
            .field("name", &self.name)
            .field("client_id", &self.client_id)
            .field("html_url", &self.html_url)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize, Debug)]
struct InstallationRequest<'a> {
    client_id: &'a str,
    repository_selection: &'a str,
}

/// Client for turning an app-manifest code into a GitHub App and installing it.
#[derive(Debug)]
pub struct AppManifestClient {
    api_root: String,
    headers: HeaderMap,
    authorized_headers: HeaderMap,
    http: reqwest::Client,
}

impl AppManifestClient {
    /// Manifest conversion needs no token; installing does.
    pub fn new(token: Option<&str>) -> Result<Self> {
        Self::with_api_root(token, DEFAULT_API_ROOT)
    }

    pub fn with_api_root(token: Option<&str>, api_root: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(AppManifestClient {
            api_root: api_root.trim_end_matches('/').to_string(),
            headers: github_headers(None)?,
            authorized_headers: github_headers(token)?,
            http,
        })
    }

    /// Exchanges the code from the manifest redirect for the app credentials.
    ///
    /// The code itself authorizes the request, so no token is sent.
    #[instrument(skip_all)]
    pub async fn complete_app_creation(&self, code: &str) -> Result<AppCredentials> {
        let url = format!("{}/app-manifests/{code}/conversions", self.api_root);
        debug!("converting app manifest");
        let response = self
            .http
            .post(&url)
            .headers(self.headers.clone())
            .send()
            .await?;

        let response = error::check_status(response)?;
        let credentials = response
            .json::<AppCredentials>()
            .await
            .context("Unexpected manifest conversion response")?;
        debug!(slug = %credentials.slug, id = credentials.id, "app created");
        Ok(credentials)
    }

    /// Installs the app on an organization of an enterprise, without
    /// repository access.
    #[instrument(skip(self, client_id))]
    pub async fn install_app(
        &self,
        enterprise: &str,
        org: &str,
        client_id: &str,
    ) -> Result<serde_json::Value> {
        let url = format!(
            "{}/enterprises/{enterprise}/apps/organizations/{org}/installations",
            self.api_root
        );
        debug!(url = %url, "installing app");
        let response = self
            .http
            .post(&url)
            .headers(self.authorized_headers.clone())
            .json(&InstallationRequest {
                client_id,
                repository_selection: "none",
            })
            .send()
            .await?;

        let response = error::check_status(response)?;
        Ok(response.json::<serde_json::Value>().await?)
    }
}

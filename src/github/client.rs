use crate::error;
use crate::github::issues::{IssueRequest, IssueResponse, ListQuery};
use crate::issue_body;
use anyhow::{Context, Result};
use reqwest::Url;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use tracing::{debug, instrument};

pub const DEFAULT_API_ROOT: &str = "https://api.github.com";
pub const API_VERSION: &str = "2022-11-28";
const USER_AGENT_NAME: &str = "github-issue-ops";

/// Repository coordinates and credentials for an [`IssueClient`].
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub owner: String,
    pub repo: String,
    pub token: String,
}

impl ClientConfig {
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        ClientConfig {
            owner: owner.into(),
            repo: repo.into(),
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Builds the header set sent on every GitHub API request.
///
/// Without a token the `Authorization` header is left out.
pub fn github_headers(token: Option<&str>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
    headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_NAME));
    if let Some(token) = token {
        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .context("Token contains characters not allowed in an HTTP header")?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
    }
    Ok(headers)
}

/// Client for the issues endpoint of a single repository.
#[derive(Debug)]
pub struct IssueClient {
    config: ClientConfig,
    base_url: Url,
    headers: HeaderMap,
    http: reqwest::Client,
}

impl IssueClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_api_root(config, DEFAULT_API_ROOT)
    }

    /// Same as [`IssueClient::new`] but against another API root, such as a
    /// GitHub Enterprise host or a local mock server.
    pub fn with_api_root(config: ClientConfig, api_root: &str) -> Result<Self> {
        let base_url = Url::parse(&format!(
            "{}/repos/{}/{}/issues",
            api_root.trim_end_matches('/'),
            config.owner,
            config.repo
        ))
        .with_context(|| format!("Invalid API root: {api_root}"))?;
        let headers = github_headers(Some(&config.token))?;
        let http = reqwest::Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(IssueClient {
            config,
            base_url,
            headers,
            http,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// See [`issue_body::format_issue_body`].
    pub fn format_issue_body(&self, code: &str, manifest_name: &str) -> String {
        issue_body::format_issue_body(code, manifest_name)
    }

    /// Creates an issue and returns the created issue as sent by GitHub.
    #[instrument(skip_all, fields(owner = %self.config.owner, repo = %self.config.repo))]
    pub async fn create_issue(&self, request: &IssueRequest) -> Result<IssueResponse> {
        debug!(url = %self.base_url, title = %request.title, "creating issue");
        let response = self
            .http
            .post(self.base_url.clone())
            .headers(self.headers.clone())
            .json(request)
            .send()
            .await?;

        let response = error::check_status(response)?;
        Ok(response.json::<IssueResponse>().await?)
    }

    /// Lists issues matching `query`. Only the first page is returned.
    #[instrument(skip_all, fields(owner = %self.config.owner, repo = %self.config.repo))]
    pub async fn list_issues(&self, query: &ListQuery) -> Result<Vec<IssueResponse>> {
        let mut url = self.base_url.clone();
        url.set_query(Some(&query.to_query_string()));
        debug!(url = %url, "listing issues");

        let response = self
            .http
            .get(url)
            .headers(self.headers.clone())
            .send()
            .await?;

        let response = error::check_status(response)?;
        Ok(response.json::<Vec<IssueResponse>>().await?)
    }
}

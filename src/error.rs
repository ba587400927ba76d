use thiserror::Error;

/// Non-success response from the GitHub REST API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("GitHub API error: {status} {status_text}")]
pub struct ApiError {
    /// Numeric HTTP status code.
    pub status: u16,
    /// Reason phrase for the status code, empty when the code has none.
    pub status_text: String,
}

impl ApiError {
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        ApiError {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
        }
    }
}

/// Non-success response from the Terraform Cloud API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Terraform Cloud API error: {status} {status_text}")]
pub struct TerraformApiError {
    pub status: u16,
    pub status_text: String,
}

impl TerraformApiError {
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        TerraformApiError {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
        }
    }
}

/// Passes successful responses through and turns every other status into an
/// [`ApiError`].
pub fn check_status(response: reqwest::Response) -> anyhow::Result<reqwest::Response> {
    ensure_success(response, "GitHub", ApiError::from_status)
}

/// Same as [`check_status`] for Terraform Cloud, failing with a
/// [`TerraformApiError`].
pub fn check_terraform_status(response: reqwest::Response) -> anyhow::Result<reqwest::Response> {
    ensure_success(response, "Terraform Cloud", TerraformApiError::from_status)
}

fn ensure_success<E>(
    response: reqwest::Response,
    service: &str,
    to_error: fn(reqwest::StatusCode) -> E,
) -> anyhow::Result<reqwest::Response>
where
    E: std::error::Error + Send + Sync + 'static,
{
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    tracing::warn!(status = status.as_u16(), url = %response.url(), "{service} API request failed");
    Err(to_error(status).into())
}

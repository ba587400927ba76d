//! Create and list GitHub issues for the GitHub App creation workflow.
//!
//! [`github::client::IssueClient`] talks to the issues endpoint of one
//! repository, [`issue_body`] encodes and decodes the app creation request
//! carried in an issue, and [`github::apps::AppManifestClient`] turns a
//! submitted request into an installed app whose credentials
//! [`terraform::TerraformCloudClient`] stores as workspace variables.

pub mod cli {
    pub mod parser;
}
pub mod config;
pub mod error;
pub mod github {
    pub mod apps;
    pub mod client;
    pub mod issues;
}
pub mod issue_body;
pub mod logging;
pub mod naming;
pub mod output;
pub mod run;
pub mod storage;
pub mod terraform;

pub use error::{ApiError, TerraformApiError};
pub use github::client::{ClientConfig, IssueClient};
pub use github::issues::{IssueRequest, IssueResponse, ListQuery};

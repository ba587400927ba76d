use crate::issue_body::{self, AppCreationRequest};
use serde::Serialize;

/// Issue JSON exactly as returned by the API.
pub type IssueResponse = serde_json::Value;

/// Payload for creating an issue.
#[derive(Serialize, Debug, Clone, PartialEq, Default)]
pub struct IssueRequest {
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
}

impl IssueRequest {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        IssueRequest {
            title: title.into(),
            body: body.into(),
            labels: Vec::new(),
        }
    }

    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = labels;
        self
    }
}

/// Filter for listing issues.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    /// `open`, `closed` or `all`.
    pub state: String,
    pub labels: Vec<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        ListQuery {
            state: "open".to_string(),
            labels: Vec::new(),
        }
    }
}

impl ListQuery {
    pub fn new(state: impl Into<String>, labels: Vec<String>) -> Self {
        ListQuery {
            state: state.into(),
            labels,
        }
    }

    /// Query string sent to the API. Labels are comma-joined and both keys
    /// are always present.
    pub fn to_query_string(&self) -> String {
        format!("state={}&labels={}", self.state, self.labels.join(","))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GitHubIssue {
    pub number: u64,
    pub title: String,
    pub state: IssueState,
    pub body: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueState {
    Open,
    Closed,
}

impl IssueState {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueState::Open => "open",
            IssueState::Closed => "closed",
        }
    }
}

/// Converts raw issue JSON into typed issues.
///
/// Entries without a numeric `number`, a string `title` or a known `state`
/// are dropped, as are pull requests (the issues endpoint returns both).
pub fn parse_github_issues(issues_json: &[IssueResponse]) -> Vec<GitHubIssue> {
    issues_json
        .iter()
        .filter(|issue| issue.get("pull_request").is_none_or(|pr| pr.is_null()))
        .filter_map(|issue| {
            let number = issue["number"].as_u64()?;
            let title = issue["title"].as_str()?;
            let state = match issue["state"].as_str()? {
                "open" => IssueState::Open,
                "closed" => IssueState::Closed,
                _ => return None,
            };
            Some(GitHubIssue {
                number,
                title: title.to_string(),
                state,
                body: issue["body"].as_str().map(str::to_string),
            })
        })
        .collect()
}

/// Open issues whose body carries an app creation request, in input order.
pub fn pending_app_requests(issues: &[GitHubIssue]) -> Vec<(u64, AppCreationRequest)> {
    issues
        .iter()
        .filter(|issue| issue.state == IssueState::Open)
        .filter_map(|issue| {
            issue
                .body
                .as_deref()
                .and_then(issue_body::parse_issue_body)
                .map(|request| (issue.number, request))
        })
        .collect()
}

use crate::cli;
use crate::config;
use crate::github::apps::{AppCredentials, AppManifestClient};
use crate::github::client::{ClientConfig, DEFAULT_API_ROOT, IssueClient};
use crate::github::issues::{self, IssueRequest, ListQuery};
use crate::issue_body;
use crate::naming;
use crate::output;
use crate::storage::TokenStorage;
use crate::terraform::{DEFAULT_TFC_API_ROOT, TerraformCloudClient, TerraformSettings};
use anyhow::Context;
use std::collections::HashMap;
use std::path::PathBuf;

const NO_REPOSITORY: &str = "No repository configured. Run \"use <owner>/<repo>\" first.";
const NO_TOKEN: &str = "No token found. Run \"token <value>\" first.";
const NO_TERRAFORM: &str = "TFC_TOKEN and TFC_WORKSPACE_ID must be set to provision variables.";

/// Everything a command needs from its surroundings.
pub struct RunContext<'a> {
    pub storage: &'a dyn TokenStorage,
    /// Directory holding `.issue-ops/config.json`.
    pub project_dir: PathBuf,
    pub api_root: String,
    /// Workspace that `provision` uploads app variables to.
    pub terraform: Option<TerraformSettings>,
    pub terraform_api_root: String,
}

impl<'a> RunContext<'a> {
    pub fn new(storage: &'a dyn TokenStorage, project_dir: PathBuf) -> Self {
        RunContext {
            storage,
            project_dir,
            api_root: DEFAULT_API_ROOT.to_string(),
            terraform: None,
            terraform_api_root: DEFAULT_TFC_API_ROOT.to_string(),
        }
    }

    pub fn with_api_root(mut self, api_root: impl Into<String>) -> Self {
        self.api_root = api_root.into();
        self
    }

    pub fn with_terraform(mut self, settings: Option<TerraformSettings>) -> Self {
        self.terraform = settings;
        self
    }

    pub fn with_terraform_api_root(mut self, api_root: impl Into<String>) -> Self {
        self.terraform_api_root = api_root.into();
        self
    }

    fn token(&self) -> anyhow::Result<String> {
        self.storage
            .load()?
            .ok_or_else(|| anyhow::anyhow!(NO_TOKEN))
    }

    fn issue_client(&self) -> anyhow::Result<(IssueClient, Vec<String>)> {
        let project_config = config::load_config(&self.project_dir)?;
        let settings = config::repository_settings(&project_config)
            .ok_or_else(|| anyhow::anyhow!(NO_REPOSITORY))?;
        let token = self.token()?;
        let client = IssueClient::with_api_root(
            ClientConfig::new(settings.owner, settings.repo, token),
            &self.api_root,
        )?;
        Ok((client, settings.labels))
    }
}

pub async fn run(
    args: Vec<String>,
    ctx: &RunContext<'_>,
    mut stdout_additional: Option<&mut dyn std::io::Write>,
) -> anyhow::Result<()> {
    match cli::parser::parse_args(&args) {
        cli::parser::Command::Help => {
            output::println(cli::parser::USAGE, &mut stdout_additional)?;
        }
        cli::parser::Command::Use { owner, repo } => {
            let current = config::load_config(&ctx.project_dir)?;
            let updates = HashMap::from([
                (config::ConfigKey::Owner, serde_json::Value::from(owner.as_str())),
                (config::ConfigKey::Repo, serde_json::Value::from(repo.as_str())),
            ]);
            config::save_config(&ctx.project_dir, &config::update_config(&current, &updates))?;
            output::println(
                &format!("Repository set to {owner}/{repo}"),
                &mut stdout_additional,
            )?;
        }
        cli::parser::Command::Token { token } => {
            ctx.storage.save(&token).context("Failed to save token")?;
            output::println("✓ Token saved", &mut stdout_additional)?;
        }
        cli::parser::Command::TokenClear => {
            ctx.storage.delete().context("Failed to delete token")?;
            output::println("✓ Token removed", &mut stdout_additional)?;
        }
        cli::parser::Command::Body {
            code,
            manifest_name,
        } => {
            output::println(
                &issue_body::format_issue_body(&code, &manifest_name),
                &mut stdout_additional,
            )?;
        }
        cli::parser::Command::Submit {
            code,
            manifest_name,
        } => {
            let (client, labels) = ctx.issue_client()?;
            let request = IssueRequest::new(
                format!("GitHub App Creation: {manifest_name}"),
                client.format_issue_body(&code, &manifest_name),
            )
            .with_labels(labels);
            let issue = client.create_issue(&request).await?;
            let message = match issue["number"].as_u64() {
                Some(number) => format!("Created issue #{number}"),
                None => "Created issue".to_string(),
            };
            output::println(&message, &mut stdout_additional)?;
        }
        cli::parser::Command::List { state, labels } => {
            let (client, _) = ctx.issue_client()?;
            let raw = client.list_issues(&ListQuery::new(state, labels)).await?;
            let listed = issues::parse_github_issues(&raw);
            if listed.is_empty() {
                output::println("No issues found", &mut stdout_additional)?;
            }
            output::println_all(
                listed.iter().map(|issue| {
                    format!("#{} [{}] {}", issue.number, issue.state.as_str(), issue.title)
                }),
                &mut stdout_additional,
            )?;
        }
        cli::parser::Command::Pending => {
            let (client, labels) = ctx.issue_client()?;
            let raw = client.list_issues(&ListQuery::new("open", labels)).await?;
            let pending = issues::pending_app_requests(&issues::parse_github_issues(&raw));
            if pending.is_empty() {
                output::println("No pending app creation requests", &mut stdout_additional)?;
            }
            output::println_all(
                pending
                    .iter()
                    .map(|(number, request)| format!("#{number} {}", request.manifest_name)),
                &mut stdout_additional,
            )?;
        }
        cli::parser::Command::Convert { code } => {
            let token = ctx.storage.load()?;
            let client = AppManifestClient::with_api_root(token.as_deref(), &ctx.api_root)?;
            let app = client.complete_app_creation(&code).await?;
            output::println_all(created_app_lines(&app), &mut stdout_additional)?;
        }
        cli::parser::Command::Provision {
            code,
            enterprise,
            org,
        } => {
            // Checked before the code is spent: it cannot be exchanged twice.
            let token = ctx.token()?;
            let terraform = ctx
                .terraform
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!(NO_TERRAFORM))?;
            let tfc = TerraformCloudClient::with_api_root(terraform, &ctx.terraform_api_root)?;

            let client = AppManifestClient::with_api_root(Some(&token), &ctx.api_root)?;
            let app = client.complete_app_creation(&code).await?;
            output::println_all(created_app_lines(&app), &mut stdout_additional)?;

            let installation = client.install_app(&enterprise, &org, &app.client_id).await?;
            let installation_id = installation["id"]
                .as_u64()
                .context("Installation response has no id")?;
            output::println(
                &format!("Installation ID: {installation_id}"),
                &mut stdout_additional,
            )?;

            let variables = naming::app_variables(&app, installation_id);
            let report = tfc
                .upload_variables(&naming::variable_prefix(&app.name), &variables)
                .await
                .context("Failed to upload app variables to Terraform Cloud")?;
            output::println_all(report.summary_lines(), &mut stdout_additional)?;
            if !report.is_complete() {
                anyhow::bail!(
                    "Failed to upload {} of {} variables to Terraform Cloud",
                    report.failed.len(),
                    variables.len()
                );
            }
        }
        cli::parser::Command::Unknown(detail) => {
            return Err(anyhow::anyhow!("{detail}\nRun `issue-ops help` for usage."));
        }
    }
    Ok(())
}

fn created_app_lines(app: &AppCredentials) -> [String; 3] {
    [
        format!("GitHub App '{}' created successfully.", app.name),
        format!("Application Slug: {}", app.slug),
        format!("Application ID: {}", app.id),
    ]
}

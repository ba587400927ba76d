use github_issue_ops::run::{RunContext, run};
use github_issue_ops::storage::FileTokenStorage;
use github_issue_ops::terraform::TerraformSettings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    github_issue_ops::logging::init();

    let args: Vec<String> = std::env::args().collect();
    let storage = FileTokenStorage::new()?;
    let project_dir = std::env::current_dir()?;
    let ctx = RunContext::new(&storage, project_dir).with_terraform(TerraformSettings::from_env());

    run(args, &ctx, None).await
}

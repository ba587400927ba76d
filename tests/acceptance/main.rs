use cucumber::World;
use github_issue_ops::storage::TokenStorage;
use std::sync::Mutex;
use wiremock::MockServer;

/// Token storage kept in memory so scenarios never touch `~/.issue-ops`.
#[derive(Debug, Default)]
pub struct MemoryTokenStorage {
    token: Mutex<Option<String>>,
}

impl TokenStorage for MemoryTokenStorage {
    fn load(&self) -> anyhow::Result<Option<String>> {
        Ok(self.token.lock().unwrap().clone())
    }

    fn save(&self, token: &str) -> anyhow::Result<()> {
        *self.token.lock().unwrap() = Some(token.to_string());
        Ok(())
    }

    fn delete(&self) -> anyhow::Result<()> {
        *self.token.lock().unwrap() = None;
        Ok(())
    }
}

#[derive(Default, World)]
pub struct IssueOpsWorld {
    pub mock_server: Option<MockServer>,
    pub project_dir: Option<tempfile::TempDir>,
    pub storage: MemoryTokenStorage,
    pub listed_issues: Vec<serde_json::Value>,
    pub terraform_workspace: Option<String>,
    pub existing_variables: Vec<String>,
    pub captured_output: Vec<u8>,
    pub command_result: Option<anyhow::Result<()>>,
}

impl std::fmt::Debug for IssueOpsWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssueOpsWorld")
            .field("mock_server", &self.mock_server.as_ref().map(MockServer::uri))
            .field("project_dir", &self.project_dir)
            .field("storage", &self.storage)
            .field("listed_issues", &self.listed_issues)
            .field("terraform_workspace", &self.terraform_workspace)
            .field("existing_variables", &self.existing_variables)
            .field(
                "captured_output",
                &String::from_utf8_lossy(&self.captured_output),
            )
            .field("command_result", &self.command_result)
            .finish()
    }
}

impl IssueOpsWorld {
    pub async fn server(&mut self) -> &MockServer {
        if self.mock_server.is_none() {
            self.mock_server = Some(MockServer::start().await);
        }
        self.mock_server.as_ref().unwrap()
    }

    pub fn project_path(&mut self) -> std::path::PathBuf {
        self.project_dir
            .get_or_insert_with(|| tempfile::tempdir().expect("Failed to create project dir"))
            .path()
            .to_path_buf()
    }
}

#[tokio::main]
async fn main() {
    IssueOpsWorld::cucumber().run_and_exit("features").await;
}

mod steps;

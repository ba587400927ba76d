use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Configuration keys enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    Owner,
    Repo,
    Labels,
}

impl ConfigKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKey::Owner => "owner",
            ConfigKey::Repo => "repo",
            ConfigKey::Labels => "labels",
        }
    }

    /// Get all config keys
    pub fn all() -> &'static [ConfigKey] {
        &[ConfigKey::Owner, ConfigKey::Repo, ConfigKey::Labels]
    }
}

/// Filename for the project-specific configuration within the .issue-ops directory.
pub const PROJECT_CONFIG_FILENAME: &str = "config.json";
/// Directory name for project-specific configuration.
pub const PROJECT_CONFIG_DIR: &str = ".issue-ops";

/// Repository settings resolved from the project configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositorySettings {
    pub owner: String,
    pub repo: String,
    pub labels: Vec<String>,
}

pub fn config_path(project_dir: &Path) -> PathBuf {
    project_dir
        .join(PROJECT_CONFIG_DIR)
        .join(PROJECT_CONFIG_FILENAME)
}

/// Parses a JSON configuration file content into a map of configuration values.
///
/// - Returns an empty map if `content` is empty or only whitespace.
/// - Keys other than those in [`ConfigKey::all`] are skipped.
/// - Returns an `Err` if the content is not valid JSON or not an object.
pub fn parse_config(content: &[u8]) -> Result<HashMap<ConfigKey, Value>> {
    if content.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(HashMap::new());
    }

    let value: Value = serde_json::from_slice(content).context("Failed to parse config JSON")?;

    let Value::Object(map) = &value else {
        return Err(anyhow::anyhow!("Config must be a JSON object"));
    };

    Ok(ConfigKey::all()
        .iter()
        .filter_map(|key| map.get(key.as_str()).map(|val| (*key, val.clone())))
        .collect())
}

/// Merges `updates` into `base_config` and returns a new configuration map.
///
/// If a key exists in both, the value from `updates` wins.
pub fn update_config(
    base_config: &HashMap<ConfigKey, Value>,
    updates: &HashMap<ConfigKey, Value>,
) -> HashMap<ConfigKey, Value> {
    let mut new_config = base_config.clone();
    for (key, value) in updates {
        new_config.insert(*key, value.clone());
    }
    new_config
}

/// Serializes a configuration map as a pretty-printed JSON object.
pub fn serialize_config(config: &HashMap<ConfigKey, Value>) -> String {
    let object: serde_json::Map<String, Value> = ConfigKey::all()
        .iter()
        .filter_map(|key| {
            config
                .get(key)
                .map(|val| (key.as_str().to_string(), val.clone()))
        })
        .collect();
    format!("{:#}\n", Value::Object(object))
}

/// Loads the project configuration under `project_dir`. A missing file is an
/// empty configuration.
pub fn load_config(project_dir: &Path) -> Result<HashMap<ConfigKey, Value>> {
    let path = config_path(project_dir);
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let content = std::fs::read(&path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    parse_config(&content)
}

pub fn save_config(project_dir: &Path, config: &HashMap<ConfigKey, Value>) -> Result<()> {
    let path = config_path(project_dir);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }
    std::fs::write(&path, serialize_config(config))
        .with_context(|| format!("Failed to write config file {}", path.display()))
}

/// Extracts owner, repository and default labels from a configuration map.
///
/// Returns `None` when owner or repository is missing or empty. Non-string
/// labels are ignored.
pub fn repository_settings(config: &HashMap<ConfigKey, Value>) -> Option<RepositorySettings> {
    let text = |key: ConfigKey| {
        config
            .get(&key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let labels = config
        .get(&ConfigKey::Labels)
        .and_then(Value::as_array)
        .map(|labels| {
            labels
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Some(RepositorySettings {
        owner: text(ConfigKey::Owner)?,
        repo: text(ConfigKey::Repo)?,
        labels,
    })
}

use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Configuration keys enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    Repository,
    Label,
    Branch,
    Extension,
    Output,
}

impl ConfigKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKey::Repository => "repository",
            ConfigKey::Label => "label",
            ConfigKey::Branch => "branch",
            ConfigKey::Extension => "extension",
            ConfigKey::Output => "output",
        }
    }

    /// Get all config keys
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::Repository,
            ConfigKey::Label,
            ConfigKey::Branch,
            ConfigKey::Extension,
            ConfigKey::Output,
        ]
    }
}

/// Filename for the project-specific configuration within the .reqdoc directory.
pub const PROJECT_CONFIG_FILENAME: &str = "config.json";
/// Directory name for project-specific configuration.
pub const PROJECT_CONFIG_DIR: &str = ".reqdoc";

pub const DEFAULT_LABEL: &str = "requirement";
pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_EXTENSION: &str = ".py";
pub const DEFAULT_OUTPUT: &str = "docs/requirements.md";

/// Environment variables read at startup.
pub mod env_vars {
    pub const TOKEN: &str = "GITHUB_TOKEN";
    pub const REPOSITORY: &str = "GITHUB_REPO";
}

/// Settings shared by every stage of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub token: String,
    /// `owner/name`
    pub repository: String,
    pub label: String,
    pub branch: String,
    /// Suffix a path must end with to be scanned, e.g. `.py`.
    pub extension: String,
    pub output: PathBuf,
}

impl Config {
    /// A configuration with every optional setting at its default.
    pub fn new(token: &str, repository: &str) -> Self {
        Config {
            token: token.to_string(),
            repository: repository.to_string(),
            label: DEFAULT_LABEL.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

/// Returns true when `repo` has the form `<owner>/<repo>` with both parts
/// non-empty.
pub fn is_valid_repository(repo: &str) -> bool {
    let parts: Vec<&str> = repo.split('/').collect();
    parts.len() == 2 && parts.iter().all(|part| !part.is_empty())
}

/// Parses a JSON configuration file content into a map of configuration values.
///
/// - Returns the known keys of a JSON object; unknown keys are skipped.
/// - Returns an empty map if `content` is empty or whitespace only.
/// - Returns an `Err` for invalid JSON or a non-object document.
pub fn parse_config(content: &[u8]) -> Result<HashMap<ConfigKey, Value>> {
    if content.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(HashMap::new());
    }

    let value: Value = serde_json::from_slice(content).context("Failed to parse config JSON")?;

    if let Value::Object(map) = &value {
        let config_map = ConfigKey::all()
            .iter()
            .filter_map(|key| map.get(key.as_str()).map(|val| (*key, val.clone())))
            .collect();
        return Ok(config_map);
    }

    Err(anyhow::anyhow!("Config must be a JSON object"))
}

/// Merges `updates` into `base_config` and returns a new configuration map.
///
/// If a key exists in both, the value from `updates` wins. Neither input is
/// modified.
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

fn string_setting(settings: &HashMap<ConfigKey, Value>, key: ConfigKey) -> Result<Option<String>> {
    match settings.get(&key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(anyhow::anyhow!(
            "Config value `{}` must be a string, got {other}",
            key.as_str()
        )),
    }
}

/// Builds a `Config` from file settings, command-line overrides and the
/// environment.
///
/// The repository comes from the overrides, then `GITHUB_REPO`, then the
/// file; every other setting from the overrides, then the file, then its
/// default. The token only comes from `GITHUB_TOKEN`.
pub fn resolve_config<E>(
    file_settings: &HashMap<ConfigKey, Value>,
    overrides: &HashMap<ConfigKey, Value>,
    env: E,
) -> Result<Config>
where
    E: Fn(&str) -> Option<String>,
{
    let token = env(env_vars::TOKEN)
        .filter(|token| !token.trim().is_empty())
        .ok_or_else(|| anyhow::anyhow!("{} is not set", env_vars::TOKEN))?;

    let repository = match string_setting(overrides, ConfigKey::Repository)? {
        Some(repo) => Some(repo),
        None => env(env_vars::REPOSITORY)
            .filter(|repo| !repo.is_empty())
            .or(string_setting(file_settings, ConfigKey::Repository)?),
    }
    .ok_or_else(|| {
        anyhow::anyhow!(
            "{} is not set. Set it or pass --repo <owner>/<repo>.",
            env_vars::REPOSITORY
        )
    })?;
    if !is_valid_repository(&repository) {
        return Err(anyhow::anyhow!(
            "Invalid repository format `{repository}`. Please use <owner>/<repo>."
        ));
    }

    let merged = update_config(file_settings, overrides);
    let mut config = Config::new(&token, &repository);
    if let Some(label) = string_setting(&merged, ConfigKey::Label)? {
        config.label = label;
    }
    if let Some(branch) = string_setting(&merged, ConfigKey::Branch)? {
        config.branch = branch;
    }
    if let Some(extension) = string_setting(&merged, ConfigKey::Extension)? {
        config.extension = extension;
    }
    if let Some(output) = string_setting(&merged, ConfigKey::Output)? {
        config.output = PathBuf::from(output);
    }
    Ok(config)
}

/// Reads `<dir>/.reqdoc/config.json`. A missing file is an empty config.
pub fn read_project_config(dir: &Path) -> Result<HashMap<ConfigKey, Value>> {
    let path = dir.join(PROJECT_CONFIG_DIR).join(PROJECT_CONFIG_FILENAME);
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let content = std::fs::read(&path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Invalid config file {}", path.display()))
}

/// Loads the configuration for a run from the current directory and the
/// process environment.
pub fn load_config(overrides: &HashMap<ConfigKey, Value>) -> Result<Config> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    let file_settings = read_project_config(&current_dir)?;
    resolve_config(&file_settings, overrides, |name| std::env::var(name).ok())
}

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;

pub const CONFIG_FILE_ENV: &str = "STORYBLOCKS_CONFIG_FILE";
pub const BASE_URL_ENV: &str = "JIRA_BASE_URL";
pub const EMAIL_ENV: &str = "JIRA_EMAIL";
pub const API_TOKEN_ENV: &str = "JIRA_API_TOKEN";

/// Tracker connection settings. Missing values stay `None`; callers decide
/// which ones they require.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoryConfig {
    pub jira_base_url: Option<String>,
    pub jira_email: Option<String>,
    pub jira_api_token: Option<String>,
    pub insecure: bool,
}

#[derive(Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    jira: RawJira,
    base_url: Option<String>,
    email: Option<String>,
    api_token: Option<String>,
    insecure: Option<bool>,
}

#[derive(Default, Deserialize)]
struct RawJira {
    base_url: Option<String>,
    email: Option<String>,
    api_token: Option<String>,
    insecure: Option<bool>,
}

impl StoryConfig {
    /// Loads the config file (explicit path, or the default location when it
    /// exists) and overlays the `JIRA_*` environment variables.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let raw = match explicit_path {
            Some(path) => read_raw_config(path)?,
            None => {
                let path = default_config_path();
                if path.is_file() {
                    read_raw_config(&path)?
                } else {
                    RawConfig::default()
                }
            }
        };
        Ok(Self::from_sources(raw, |name| env::var(name).ok()))
    }

    fn from_sources<F>(raw: RawConfig, env_lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let from_env = |name: &str| env_lookup(name).and_then(non_empty);

        let jira_base_url = from_env(BASE_URL_ENV)
            .or_else(|| first_some(raw.jira.base_url, raw.base_url).and_then(non_empty))
            .and_then(normalize_base_url);
        let jira_email = from_env(EMAIL_ENV)
            .or_else(|| first_some(raw.jira.email, raw.email).and_then(non_empty));
        let jira_api_token = from_env(API_TOKEN_ENV)
            .or_else(|| first_some(raw.jira.api_token, raw.api_token).and_then(non_empty));
        let insecure = raw.jira.insecure.or(raw.insecure).unwrap_or(false);

        Self {
            jira_base_url,
            jira_email,
            jira_api_token,
            insecure,
        }
    }
}

pub fn default_config_path() -> PathBuf {
    if let Some(override_path) = env::var_os(CONFIG_FILE_ENV) {
        return PathBuf::from(override_path);
    }

    let mut base = env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    base.push(".config");
    base.push("storyblocks");
    base.push("config.yaml");
    base
}

fn read_raw_config(path: &Path) -> Result<RawConfig> {
    let payload = fs::read_to_string(path)
        .with_context(|| format!("failed to read config at {}", path.display()))?;
    if payload.trim().is_empty() {
        return Ok(RawConfig::default());
    }
    serde_yaml::from_str(&payload)
        .with_context(|| format!("invalid YAML config format in {}", path.display()))
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}

fn normalize_base_url(value: String) -> Option<String> {
    let trimmed = value.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Some(trimmed.to_string())
    } else {
        Some(format!("https://{trimmed}"))
    }
}

fn first_some<T>(first: Option<T>, second: Option<T>) -> Option<T> {
    first.or(second)
}

use reqwest::{
    blocking::Client,
    header::{ACCEPT, HeaderValue},
    StatusCode,
};
use serde::Deserialize;
use serde_json::Value;
use storyblocks_config::StoryConfig;
use storyblocks_domain::{IssueKey, ParsedStoryBlocks};
use thiserror::Error;
use tracing::debug;

pub mod adf;

pub use adf::{description_text, Document, Node};

const ISSUE_API_PATH: &str = "rest/api/3/issue";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("jira credentials are not configured: missing {0}")]
    Configuration(&'static str),

    #[error("jira api error: {status} {status_text}")]
    Remote { status: u16, status_text: String },

    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("failed to decode jira issue response")]
    Decode(#[source] reqwest::Error),
}

impl FetchError {
    fn remote(status: StatusCode) -> Self {
        Self::Remote {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
        }
    }

    /// HTTP status of a rejected request, if the tracker answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub struct JiraClient {
    base_url: String,
    email: String,
    api_token: String,
    http: Client,
}

#[derive(Deserialize)]
struct IssuePayload {
    #[serde(default)]
    fields: IssueFields,
}

#[derive(Default, Deserialize)]
struct IssueFields {
    summary: Option<String>,
    description: Option<Value>,
}

impl JiraClient {
    pub fn from_config(config: &StoryConfig) -> Result<Self, FetchError> {
        let base_url = config
            .jira_base_url
            .as_deref()
            .ok_or(FetchError::Configuration("JIRA_BASE_URL"))?;
        let email = config
            .jira_email
            .as_deref()
            .ok_or(FetchError::Configuration("JIRA_EMAIL"))?;
        let api_token = config
            .jira_api_token
            .as_deref()
            .ok_or(FetchError::Configuration("JIRA_API_TOKEN"))?;

        let http = Client::builder()
            .danger_accept_invalid_certs(config.insecure)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            email: email.to_string(),
            api_token: api_token.to_string(),
            http,
        })
    }

    pub fn issue_url(&self, key: &IssueKey) -> String {
        format!("{}/browse/{}", self.base_url, key)
    }

    /// Fetches an issue by key or URL and splits its description into story
    /// blocks.
    pub fn fetch_story(&self, issue_key_or_url: &str) -> Result<ParsedStoryBlocks, FetchError> {
        let key = IssueKey::resolve(issue_key_or_url);
        let payload = self.get_issue(&key)?;

        let summary = payload.fields.summary.unwrap_or_default();
        let description = description_text(payload.fields.description);
        debug!(
            issue_key = %key,
            description_len = description.len(),
            "segmenting issue description"
        );

        Ok(ParsedStoryBlocks::from_description(summary, &description))
    }

    fn get_issue(&self, key: &IssueKey) -> Result<IssuePayload, FetchError> {
        let endpoint = format!("{}/{}/{}", self.base_url, ISSUE_API_PATH, key);
        debug!(issue_key = %key, %endpoint, "fetching jira issue");

        let response = self
            .http
            .get(endpoint)
            .basic_auth(&self.email, Some(&self.api_token))
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            debug!(issue_key = %key, %status, "jira issue request rejected");
            return Err(FetchError::remote(status));
        }

        response.json().map_err(FetchError::Decode)
    }
}

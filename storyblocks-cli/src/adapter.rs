use std::{
    fs,
    io::{self, Read},
    path::Path,
};

use anyhow::{Context, Result};
use storyblocks_config::StoryConfig;
use storyblocks_domain::IssueKey;
use storyblocks_jira::{FetchError, JiraClient};

use crate::types::{FailureReport, FetchOutcome, FetchReport, StoryReport};

pub fn load_client(config_path: Option<&Path>) -> Result<JiraClient> {
    let config = StoryConfig::load(config_path)?;
    let client = JiraClient::from_config(&config)?;
    Ok(client)
}

/// Reads a description from `file`, or from stdin when no file is given.
pub fn read_description(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read description from {}", path.display())),
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .with_context(|| "failed to read description from stdin")?;
            Ok(text)
        }
    }
}

pub fn into_report(client: &JiraClient, outcome: FetchOutcome) -> FetchReport {
    let issue_key = IssueKey::resolve(&outcome.input);
    match outcome.result {
        Ok(story) => FetchReport::Story(StoryReport {
            url: client.issue_url(&issue_key),
            issue_key,
            story,
        }),
        Err(error) => FetchReport::Failure(FailureReport {
            input: outcome.input,
            issue_key,
            error: describe_error(error),
        }),
    }
}

fn describe_error(error: FetchError) -> String {
    format!("{:#}", anyhow::Error::new(error))
}

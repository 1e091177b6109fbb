use serde::Serialize;
use storyblocks_domain::{IssueKey, ParsedStoryBlocks};
use storyblocks_jira::FetchError;

pub struct FetchOutcome {
    pub input: String,
    pub result: Result<ParsedStoryBlocks, FetchError>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryReport {
    pub issue_key: IssueKey,
    pub url: String,
    #[serde(flatten)]
    pub story: ParsedStoryBlocks,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureReport {
    pub input: String,
    pub issue_key: IssueKey,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum FetchReport {
    Story(StoryReport),
    Failure(FailureReport),
}

impl FetchReport {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }
}

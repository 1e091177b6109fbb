use std::{fmt, sync::OnceLock};

use regex::Regex;
use serde::Serialize;

mod segment;

pub use segment::{segment, StoryBlocks};

/// Tracker issue identifier such as `DEMO-42`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct IssueKey(String);

impl IssueKey {
    /// Resolves a key from either a bare key or a full issue URL.
    ///
    /// The first `PROJECT-NUMBER` substring wins. When nothing matches, the
    /// trimmed input is kept as-is and the tracker gets to reject it.
    pub fn resolve(raw: &str) -> Self {
        let trimmed = raw.trim();
        let key = issue_key_regex()
            .find(trimmed)
            .map(|found| found.as_str())
            .unwrap_or(trimmed);
        Self(key.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IssueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Story details handed to the test-case generator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedStoryBlocks {
    pub summary: String,
    #[serde(flatten)]
    pub blocks: StoryBlocks,
    /// Reserved; always empty for now.
    pub additional_info: String,
}

impl ParsedStoryBlocks {
    pub fn new(summary: String, blocks: StoryBlocks) -> Self {
        Self {
            summary,
            blocks,
            additional_info: String::new(),
        }
    }

    pub fn from_description(summary: String, description: &str) -> Self {
        Self::new(summary, segment(description))
    }
}

fn issue_key_regex() -> &'static Regex {
    static ISSUE_KEY: OnceLock<Regex> = OnceLock::new();
    ISSUE_KEY.get_or_init(|| Regex::new(r"[A-Z]+-[0-9]+").expect("regex"))
}

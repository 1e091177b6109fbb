use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "storyblocks",
    version,
    about = "Fetch Jira user stories and split them into test-ready blocks",
    after_help = "EXAMPLES:
    storyblocks fetch PAY-42
    storyblocks fetch https://acme.atlassian.net/browse/PAY-42 PAY-43
    storyblocks segment description.txt
    pbpaste | storyblocks segment

ENVIRONMENT:
    JIRA_BASE_URL, JIRA_EMAIL, JIRA_API_TOKEN   override config file values
    STORYBLOCKS_CONFIG_FILE                     default config file location
    STORYBLOCKS_LOG                             log filter (e.g. info, storyblocks_jira=debug)"
)]
pub struct Cli {
    /// YAML config file (defaults to ~/.config/storyblocks/config.yaml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch issues and print their story blocks as JSON
    Fetch {
        /// Issue keys or browse URLs; several are fetched in parallel
        #[arg(required = true, value_name = "KEY_OR_URL")]
        issues: Vec<String>,
    },

    /// Split a description read from FILE (or stdin) without contacting Jira
    Segment {
        file: Option<PathBuf>,
    },

    /// Print the issue key resolved from a key or URL
    Key {
        input: String,
    },
}

//! Splits a free-text issue description into its heading-delimited blocks.
//!
//! Headings only count at the start of a line and are matched without regard
//! to case. Each block runs from the end of its heading to the first
//! terminating heading that follows it, or to the end of the text.

use std::sync::OnceLock;

use regex::{Regex, RegexBuilder};
use serde::Serialize;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryBlocks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_requisite_block: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_condition_block: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acceptance_criteria_block: Option<String>,
    /// Pre-requisite and pre-condition blocks combined, or the raw text when
    /// neither heading is present.
    pub description: String,
    pub acceptance_criteria: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Heading {
    PreRequisite,
    PreCondition,
    AcceptanceCriteria,
}

impl Heading {
    fn label(self) -> &'static str {
        match self {
            Self::PreRequisite => "Pre-requisite:",
            Self::PreCondition => "Pre-condition:",
            Self::AcceptanceCriteria => "Acceptance Criteria:",
        }
    }

    /// Headings that close this heading's block.
    fn terminators(self) -> &'static [Heading] {
        match self {
            Self::PreRequisite => &[Self::PreCondition, Self::AcceptanceCriteria],
            Self::PreCondition => &[Self::AcceptanceCriteria],
            Self::AcceptanceCriteria => &[],
        }
    }

    fn matcher(self) -> &'static Regex {
        static PRE_REQUISITE: OnceLock<Regex> = OnceLock::new();
        static PRE_CONDITION: OnceLock<Regex> = OnceLock::new();
        static ACCEPTANCE_CRITERIA: OnceLock<Regex> = OnceLock::new();

        let (cell, pattern) = match self {
            Self::PreRequisite => (&PRE_REQUISITE, r"^pre-?requisites?:"),
            Self::PreCondition => (&PRE_CONDITION, r"^pre-?conditions?:"),
            Self::AcceptanceCriteria => (&ACCEPTANCE_CRITERIA, r"^acceptance criteria:"),
        };
        cell.get_or_init(|| {
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .multi_line(true)
                .crlf(true)
                .build()
                .expect("regex")
        })
    }

    fn extract(self, text: &str) -> Option<String> {
        let heading = self.matcher().find(text)?;
        let body_start = heading.end();
        let body_end = self
            .terminators()
            .iter()
            .filter_map(|terminator| terminator.matcher().find_at(text, body_start))
            .map(|found| found.start())
            .min()
            .unwrap_or(text.len());

        let body = text[body_start..body_end].trim();
        Some(format!("{}\n\n{}", self.label(), body))
    }
}

pub fn segment(text: &str) -> StoryBlocks {
    let pre_requisite_block = Heading::PreRequisite.extract(text);
    let pre_condition_block = Heading::PreCondition.extract(text);
    let acceptance_criteria_block = Heading::AcceptanceCriteria.extract(text);

    let parts = [
        pre_requisite_block.as_deref(),
        pre_condition_block.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>();
    let description = if parts.is_empty() {
        text.to_string()
    } else {
        parts.join("\n\n")
    };
    let acceptance_criteria = acceptance_criteria_block.clone().unwrap_or_default();

    StoryBlocks {
        pre_requisite_block,
        pre_condition_block,
        acceptance_criteria_block,
        description,
        acceptance_criteria,
    }
}

#[cfg(test)]
mod tests {
    use super::segment;

    #[test]
    fn splits_all_three_sections() {
        let blocks = segment(
            "Pre-requisite:\nUser is logged in\n\nPre-condition:\nAccount has funds\n\nAcceptance Criteria:\nTransfer succeeds",
        );

        assert_eq!(
            blocks.pre_requisite_block.as_deref(),
            Some("Pre-requisite:\n\nUser is logged in")
        );
        assert_eq!(
            blocks.pre_condition_block.as_deref(),
            Some("Pre-condition:\n\nAccount has funds")
        );
        assert_eq!(
            blocks.acceptance_criteria_block.as_deref(),
            Some("Acceptance Criteria:\n\nTransfer succeeds")
        );
        assert_eq!(
            blocks.description,
            "Pre-requisite:\n\nUser is logged in\n\nPre-condition:\n\nAccount has funds"
        );
        assert_eq!(
            Some(blocks.acceptance_criteria.as_str()),
            blocks.acceptance_criteria_block.as_deref()
        );
    }

    #[test]
    fn pre_requisite_body_stops_at_later_headings() {
        let blocks = segment(
            "Pre-requisites:\n- VPN access\n- Admin role\nPre-conditions:\nCart is empty\nAcceptance Criteria:\nGiven a cart\nThen checkout works",
        );

        let pre_requisite = blocks.pre_requisite_block.expect("pre-requisite block");
        assert!(!pre_requisite.contains("Pre-condition"));
        assert!(!pre_requisite.contains("Acceptance Criteria"));
        assert_eq!(pre_requisite, "Pre-requisite:\n\n- VPN access\n- Admin role");

        let pre_condition = blocks.pre_condition_block.expect("pre-condition block");
        assert_eq!(pre_condition, "Pre-condition:\n\nCart is empty");
    }

    #[test]
    fn only_pre_requisite_heading() {
        let blocks = segment("Pre-requisite:\n  Feature flag enabled  \n");

        assert_eq!(
            blocks.pre_requisite_block.as_deref(),
            Some("Pre-requisite:\n\nFeature flag enabled")
        );
        assert_eq!(blocks.pre_condition_block, None);
        assert_eq!(blocks.acceptance_criteria_block, None);
        assert_eq!(
            Some(blocks.description.as_str()),
            blocks.pre_requisite_block.as_deref()
        );
        assert_eq!(blocks.acceptance_criteria, "");
    }

    #[test]
    fn falls_back_to_raw_text_without_headings() {
        let text = "As a user I want to export reports.\nSo that I can share them.";
        let blocks = segment(text);

        assert_eq!(blocks.pre_requisite_block, None);
        assert_eq!(blocks.pre_condition_block, None);
        assert_eq!(blocks.acceptance_criteria_block, None);
        assert_eq!(blocks.description, text);
        assert_eq!(blocks.acceptance_criteria, "");
    }

    #[test]
    fn empty_text_yields_empty_description() {
        let blocks = segment("");
        assert_eq!(blocks, super::StoryBlocks::default());
    }

    #[test]
    fn headings_match_case_insensitively_and_in_plural() {
        for heading in [
            "PRE-REQUISITE:",
            "pre-requisite:",
            "Pre-Requisites:",
            "Prerequisite:",
        ] {
            let blocks = segment(&format!("{heading}\nStaging is up"));
            assert_eq!(
                blocks.pre_requisite_block.as_deref(),
                Some("Pre-requisite:\n\nStaging is up"),
                "heading {heading:?}"
            );
        }

        let blocks = segment("PRECONDITIONS:\nx\nacceptance CRITERIA:\ny");
        assert_eq!(blocks.pre_condition_block.as_deref(), Some("Pre-condition:\n\nx"));
        assert_eq!(
            blocks.acceptance_criteria_block.as_deref(),
            Some("Acceptance Criteria:\n\ny")
        );
    }

    #[test]
    fn headings_must_start_a_line() {
        let text = "Note the Pre-condition: wording is informal.\nAcceptance Criteria: mid";
        let blocks = segment(text);

        assert_eq!(blocks.pre_condition_block, None);
        assert_eq!(
            blocks.acceptance_criteria_block.as_deref(),
            Some("Acceptance Criteria:\n\nmid")
        );
        assert_eq!(blocks.description, text);
    }

    #[test]
    fn whitespace_only_body_still_renders_block() {
        let blocks = segment("Pre-condition:   \n\nAcceptance Criteria:\nWorks");

        assert_eq!(blocks.pre_condition_block.as_deref(), Some("Pre-condition:\n\n"));
        assert_eq!(blocks.description, "Pre-condition:\n\n");
    }

    #[test]
    fn acceptance_criteria_runs_to_end_of_text() {
        let blocks = segment("Acceptance Criteria:\n1. Login\nPre-requisite:\nlate section");

        assert_eq!(
            blocks.acceptance_criteria_block.as_deref(),
            Some("Acceptance Criteria:\n\n1. Login\nPre-requisite:\nlate section")
        );
        assert_eq!(
            blocks.pre_requisite_block.as_deref(),
            Some("Pre-requisite:\n\nlate section")
        );
    }

    #[test]
    fn repeated_heading_uses_first_occurrence() {
        let blocks = segment("Pre-requisite:\nfirst\nPre-requisite:\nsecond\nPre-condition:\nc");

        assert_eq!(
            blocks.pre_requisite_block.as_deref(),
            Some("Pre-requisite:\n\nfirst\nPre-requisite:\nsecond")
        );
    }

    #[test]
    fn handles_windows_line_endings() {
        let blocks = segment("Pre-requisite:\r\nLogged in\r\nAcceptance Criteria:\r\nDone");

        assert_eq!(
            blocks.pre_requisite_block.as_deref(),
            Some("Pre-requisite:\n\nLogged in")
        );
        assert_eq!(
            blocks.acceptance_criteria_block.as_deref(),
            Some("Acceptance Criteria:\n\nDone")
        );
    }
}

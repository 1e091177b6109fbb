//! Atlassian Document Format (ADF) descriptions reduced to plain text.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Text(String),
    HardBreak,
    /// Inline node without a text payload (mention, emoji, status, card).
    Empty,
    Block(Vec<Node>),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Document {
    pub blocks: Vec<Node>,
}

#[derive(Deserialize)]
struct RawNode {
    #[serde(rename = "type")]
    kind: Option<String>,
    text: Option<String>,
    content: Option<Vec<RawNode>>,
}

impl From<RawNode> for Node {
    fn from(raw: RawNode) -> Self {
        if let Some(text) = raw.text {
            return Node::Text(text);
        }
        if raw.kind.as_deref() == Some("hardBreak") {
            return Node::HardBreak;
        }
        match raw.content {
            Some(children) => Node::Block(children.into_iter().map(Node::from).collect()),
            None => Node::Empty,
        }
    }
}

impl Node {
    fn write_text(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(text),
            Node::HardBreak => out.push('\n'),
            Node::Empty => {}
            Node::Block(children) => {
                for child in children {
                    // Nested blocks (list items, quoted paragraphs) get their own line.
                    if matches!(child, Node::Block(_)) && !out.is_empty() && !out.ends_with('\n') {
                        out.push('\n');
                    }
                    child.write_text(out);
                }
            }
        }
    }
}

impl Document {
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let root: RawNode = serde_json::from_value(value)?;
        Ok(Self {
            blocks: root
                .content
                .unwrap_or_default()
                .into_iter()
                .map(Node::from)
                .collect(),
        })
    }

    /// Inline text is concatenated inside each block; top-level blocks are
    /// joined with a single newline.
    pub fn flatten(&self) -> String {
        self.blocks
            .iter()
            .map(|block| {
                let mut out = String::new();
                block.write_text(&mut out);
                out
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Plain text for an issue's `description` field. Never fails: absent or
/// unreadable descriptions become an empty string.
pub fn description_text(value: Option<Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text,
        Some(doc @ Value::Object(_)) => match Document::from_value(doc) {
            Ok(document) => document.flatten(),
            Err(error) => {
                warn!(%error, "ignoring unreadable issue description");
                String::new()
            }
        },
        Some(_) => String::new(),
    }
}

//! Converts stored messages into displayable blocks.
//!
//! History keeps agent replies exactly as received; segmentation and tool
//! decoding only happen here.

use crate::events::{Message, Role};
use crate::parser::extract_segments;
use crate::tools::{SearchResults, ToolKind, ToolOutput};

#[derive(Debug, Clone, PartialEq)]
pub enum RenderBlock {
    /// `role: text`
    Line { role: Role, text: String },
    /// Tabular tool output
    Table { tool: ToolKind, results: SearchResults },
}

impl RenderBlock {
    fn line(role: Role, text: impl Into<String>) -> Self {
        RenderBlock::Line {
            role,
            text: text.into(),
        }
    }
}

pub fn render_conversation(messages: &[Message], default_kind: &str) -> Vec<RenderBlock> {
    messages
        .iter()
        .flat_map(|message| render_message(message, default_kind))
        .collect()
}

pub fn render_message(message: &Message, default_kind: &str) -> Vec<RenderBlock> {
    if message.role != Role::Agent {
        return vec![RenderBlock::line(message.role.clone(), message.content.clone())];
    }

    let kind = ToolKind::detect(&message.content)
        .map(ToolKind::tag)
        .unwrap_or(default_kind);

    extract_segments(&message.content, kind)
        .into_iter()
        .map(|segment| match segment.role {
            Role::Tool(tag) => render_tool(&tag, segment.content),
            role => RenderBlock::line(role, segment.content),
        })
        .collect()
}

fn render_tool(tag: &str, raw: String) -> RenderBlock {
    let Some(kind) = ToolKind::parse(tag) else {
        return RenderBlock::line(Role::tool(tag), raw);
    };

    match ToolOutput::decode(kind, &raw) {
        Ok(ToolOutput::Search(results)) if results.is_empty() => {
            RenderBlock::line(Role::tool(tag), format!("{} -> no result", kind.title()))
        }
        Ok(ToolOutput::Search(results)) => RenderBlock::Table {
            tool: kind,
            results,
        },
        Err(e) => {
            tracing::warn!(error = %e, "tool output could not be decoded");
            RenderBlock::line(Role::Info, raw)
        }
    }
}

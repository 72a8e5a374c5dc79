//! Splits an agent reply into plain-text and tool segments.
//!
//! A reply carries at most one tool block, delimited by `<tool-{kind}>` and
//! `</tool-{kind}>`. Anything around the block is plain agent text.

use crate::events::Role;

/// A contiguous span of an agent reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub role: Role,
    pub content: String,
}

impl Segment {
    fn new(role: Role, content: &str) -> Option<Self> {
        let content = content.trim();
        if content.is_empty() {
            return None;
        }
        Some(Self {
            role,
            content: content.to_string(),
        })
    }
}

pub fn opening_marker(tool_kind: &str) -> String {
    format!("<tool-{}>", tool_kind)
}

pub fn closing_marker(tool_kind: &str) -> String {
    format!("</tool-{}>", tool_kind)
}

/// Split `content` into ordered segments around a single `tool_kind` block.
///
/// Segments whose trimmed text is empty are dropped. An opening marker with
/// no closing marker is not a tool block: the whole reply is returned as
/// plain agent text.
pub fn extract_segments(content: &str, tool_kind: &str) -> Vec<Segment> {
    let plain = || -> Vec<Segment> {
        Segment::new(Role::Agent, content).into_iter().collect()
    };

    let Some((before, rest)) = content.split_once(&opening_marker(tool_kind)) else {
        return plain();
    };
    let Some((inner, after)) = rest.split_once(&closing_marker(tool_kind)) else {
        tracing::debug!(tool_kind, "unterminated tool block, rendering as text");
        return plain();
    };

    [
        Segment::new(Role::Agent, before),
        Segment::new(Role::tool(tool_kind), inner),
        Segment::new(Role::Agent, after),
    ]
    .into_iter()
    .flatten()
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(text: &str) -> Segment {
        Segment {
            role: Role::Agent,
            content: text.to_string(),
        }
    }

    fn tool(kind: &str, text: &str) -> Segment {
        Segment {
            role: Role::tool(kind),
            content: text.to_string(),
        }
    }

    #[test]
    fn text_without_marker_is_one_trimmed_segment() {
        assert_eq!(
            extract_segments("  here are some ideas \n", "search"),
            vec![agent("here are some ideas")]
        );
    }

    #[test]
    fn blank_text_yields_nothing() {
        assert!(extract_segments("", "search").is_empty());
        assert!(extract_segments(" \n\t", "search").is_empty());
    }

    #[test]
    fn markers_of_another_kind_are_plain_text() {
        let reply = "<tool-download>x</tool-download>";
        assert_eq!(extract_segments(reply, "search"), vec![agent(reply)]);
    }

    #[test]
    fn splits_leading_tool_and_trailing_text() {
        let reply = "Found these:\n<tool-search> {\"torrents\":[]} </tool-search>\nEnjoy!";
        assert_eq!(
            extract_segments(reply, "search"),
            vec![
                agent("Found these:"),
                tool("search", "{\"torrents\":[]}"),
                agent("Enjoy!"),
            ]
        );
    }

    #[test]
    fn omits_blank_surroundings() {
        assert_eq!(
            extract_segments("  <tool-X>mid</tool-X>post", "X"),
            vec![tool("X", "mid"), agent("post")]
        );
        assert_eq!(
            extract_segments("pre<tool-X>mid</tool-X>\n", "X"),
            vec![agent("pre"), tool("X", "mid")]
        );
    }

    #[test]
    fn empty_tool_block_is_dropped() {
        assert_eq!(
            extract_segments("pre<tool-X>  </tool-X>post", "X"),
            vec![agent("pre"), agent("post")]
        );
    }

    #[test]
    fn unterminated_block_falls_back_to_plain_text() {
        let reply = "hold on <tool-search>{\"torrents\":";
        assert_eq!(extract_segments(reply, "search"), vec![agent(reply)]);
    }

    #[test]
    fn only_first_block_is_split() {
        let reply = "a<tool-X>b</tool-X>c<tool-X>d</tool-X>";
        assert_eq!(
            extract_segments(reply, "X"),
            vec![agent("a"), tool("X", "b"), agent("c<tool-X>d</tool-X>")]
        );
    }

    #[test]
    fn malformed_payload_is_still_a_tool_segment() {
        assert_eq!(
            extract_segments("<tool-search>not json</tool-search>", "search"),
            vec![tool("search", "not json")]
        );
    }
}

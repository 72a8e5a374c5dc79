pub mod search;

use std::str::FromStr;

use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};
use thiserror::Error;

pub use search::{SearchResults, Torrent, TorrentRow};

/// Tools the agent can embed in a reply as `<tool-{kind}>…</tool-{kind}>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum ToolKind {
    /// Torrent search results
    Search,
}

impl ToolKind {
    /// Tag name used inside the markers.
    pub fn tag(self) -> &'static str {
        self.into()
    }

    /// Label shown above the rendered output.
    pub fn title(self) -> &'static str {
        match self {
            ToolKind::Search => "search-torrents",
        }
    }

    /// First known tool whose opening marker occurs in `content`.
    pub fn detect(content: &str) -> Option<ToolKind> {
        ToolKind::iter().find(|kind| content.contains(&crate::parser::opening_marker(kind.tag())))
    }

    pub fn parse(tag: &str) -> Option<ToolKind> {
        ToolKind::from_str(tag).ok()
    }
}

/// Payload of a tool segment could not be decoded
#[derive(Debug, Error)]
#[error("invalid {kind} payload: {source}")]
pub struct ToolPayloadError {
    pub kind: ToolKind,
    #[source]
    pub source: serde_json::Error,
}

/// Decoded structured output of a tool segment
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    Search(SearchResults),
}

impl ToolOutput {
    pub fn decode(kind: ToolKind, raw: &str) -> Result<Self, ToolPayloadError> {
        match kind {
            ToolKind::Search => serde_json::from_str(raw)
                .map(ToolOutput::Search)
                .map_err(|source| ToolPayloadError { kind, source }),
        }
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of a message or segment in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Role {
    /// Text typed by the user
    User,
    /// Plain text produced by the agent
    Agent,
    /// Structured output of a named agent tool (e.g. `search`)
    Tool(String),
    /// Client-side notices and fallbacks
    Info,
}

impl Role {
    pub fn tool(kind: impl Into<String>) -> Self {
        Role::Tool(kind.into())
    }

    /// Label shown in front of a rendered line.
    pub fn label(&self) -> &str {
        match self {
            Role::User => "you",
            Role::Agent => "agent",
            Role::Tool(kind) => kind,
            Role::Info => "info",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => f.write_str("user"),
            Role::Agent => f.write_str("agent"),
            Role::Tool(kind) => write!(f, "tool:{}", kind),
            Role::Info => f.write_str("info"),
        }
    }
}

/// Error returned when a role string is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "agent" => Ok(Role::Agent),
            "info" => Ok(Role::Info),
            other => match other.strip_prefix("tool:") {
                Some(kind) if !kind.is_empty() => Ok(Role::Tool(kind.to_string())),
                _ => Err(UnknownRole(other.to_string())),
            },
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.to_string()
    }
}

impl TryFrom<String> for Role {
    type Error = UnknownRole;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A single entry of a conversation history. Never mutated once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn agent(content: impl Into<String>) -> Self {
        Self::new(Role::Agent, content)
    }

    pub fn info(content: impl Into<String>) -> Self {
        Self::new(Role::Info, content)
    }
}

/// The user and the conversations they own. The last id is the active one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: String,
    pub conversation_ids: Vec<String>,
}

impl Profile {
    pub fn new(user_id: impl Into<String>, conversation_ids: Vec<String>) -> Self {
        Self {
            user_id: user_id.into(),
            conversation_ids,
        }
    }

    pub fn active_conversation_id(&self) -> Option<&str> {
        self.conversation_ids.last().map(String::as_str)
    }
}

/// Views the front end can be sent to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Normal conversation terminal
    Terminal,
    /// Shown after every attempt to reach the agent failed
    Unavailable,
}

impl View {
    pub fn title(&self) -> &'static str {
        match self {
            View::Terminal => "terminal",
            View::Unavailable => "lost signal",
        }
    }
}

//! Conversation flow: controller, rendering and slash commands

pub mod commands;
pub mod controller;
pub mod render;

pub use commands::{Input, SlashCommand, get_help_text, parse_input};
pub use controller::{ConversationController, RejectReason, SendOutcome};
pub use render::{RenderBlock, render_conversation, render_message};

//! Client-side conversation core for the AIPFS library agent.
//!
//! [`conversation::ConversationController`] sends user input through the
//! retrying [`dispatcher`] to an [`transport::AgentTransport`] and records
//! both sides in the [`store::ConversationStore`]. Agent replies are split
//! into text and tool output only when rendered.

pub mod config;
pub mod conversation;
pub mod dispatcher;
pub mod events;
pub mod parser;
pub mod store;
pub mod terminal;
pub mod tools;
pub mod transport;

use std::sync::Arc;
use std::time::Duration;

use crate::dispatcher::dispatch_or_escape;
use crate::events::{Message, Profile};
use crate::store::{SharedStore, new_conversation_id};
use crate::transport::{AgentReply, AgentTransport, ChatPayload};

/// Callback run when the agent could not be reached at all
pub type EscapeFn = Arc<dyn Fn() + Send + Sync>;

/// Why a message was not sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    EmptyMessage,
    Busy,
    NoConversation,
}

/// What became of a call to [`ConversationController::send_message`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The agent reply was appended to the conversation
    Delivered,
    /// Every attempt failed and the escape callback ran
    Exhausted,
    /// Nothing changed
    Rejected(RejectReason),
}

/// Turns user input into agent round trips and records both sides.
pub struct ConversationController<T> {
    store: SharedStore,
    transport: T,
    max_retries: u32,
    escape: EscapeFn,
}

impl<T: AgentTransport> ConversationController<T> {
    pub fn new(store: SharedStore, transport: T, max_retries: u32) -> Self {
        Self {
            store,
            transport,
            max_retries,
            escape: Arc::new(|| tracing::warn!("agent unavailable")),
        }
    }

    pub fn with_escape(mut self, escape: impl Fn() + Send + Sync + 'static) -> Self {
        self.escape = Arc::new(escape);
        self
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Create a new conversation and make it the active one
    pub async fn start_conversation(&self) -> String {
        let chat_id = new_conversation_id();
        let mut store = self.store.write().await;

        let mut ids = store.profile().conversation_ids.clone();
        ids.push(chat_id.clone());
        let profile = Profile::new(store.profile().user_id.clone(), ids);

        let mut history = store.history().clone();
        history.insert(chat_id.clone(), Vec::new());

        store.set_profile(profile);
        store.set_history(history);
        tracing::info!(chat_id = %chat_id, "started conversation");
        chat_id
    }

    /// Send `text` to the agent in the active conversation.
    ///
    /// Rejected while another message is in flight. Never fails: transport
    /// problems end up as retries and, at worst, as [`SendOutcome::Exhausted`].
    pub async fn send_message(&self, text: &str) -> SendOutcome {
        if text.trim().is_empty() {
            return SendOutcome::Rejected(RejectReason::EmptyMessage);
        }

        let payload = {
            let mut store = self.store.write().await;
            if store.loading() {
                tracing::debug!("message rejected, dispatch in flight");
                return SendOutcome::Rejected(RejectReason::Busy);
            }
            let Some(chat_id) = store.active_conversation_id().map(str::to_string) else {
                return SendOutcome::Rejected(RejectReason::NoConversation);
            };

            let mut history = store.history().clone();
            history
                .entry(chat_id.clone())
                .or_default()
                .push(Message::user(text));
            store.set_history(history);
            store.set_loading(true);

            ChatPayload {
                user_id: store.profile().user_id.clone(),
                chat_id,
                message: text.to_string(),
            }
        };

        let chat_id = payload.chat_id.clone();
        let reply = dispatch_or_escape(
            |payload| self.call(payload),
            payload,
            self.max_retries,
            || (self.escape)(),
        )
        .await;

        let mut store = self.store.write().await;
        let outcome = match reply {
            Some(reply) => {
                tracing::info!(chat_id = %chat_id, "agent replied");
                let mut history = store.history().clone();
                history
                    .entry(chat_id)
                    .or_default()
                    .push(Message::agent(reply.message));
                store.set_history(history);
                SendOutcome::Delivered
            }
            None => {
                tracing::warn!(chat_id = %chat_id, "agent unreachable");
                SendOutcome::Exhausted
            }
        };
        store.set_loading(false);
        outcome
    }

    /// [`Self::send_message`], running `on_wait` once if the dispatch is still
    /// in flight after `patience`
    pub async fn send_message_watched(
        &self,
        text: &str,
        patience: Duration,
        on_wait: impl FnOnce(),
    ) -> SendOutcome {
        let send = self.send_message(text);
        tokio::pin!(send);

        tokio::select! {
            outcome = &mut send => return outcome,
            _ = tokio::time::sleep(patience) => {}
        }
        if self.store.read().await.loading() {
            on_wait();
        }
        send.await
    }

    /// One attempt; every failure is logged and reported as `None`
    async fn call(&self, payload: ChatPayload) -> Option<AgentReply> {
        match self.transport.chat(&payload).await {
            Ok(reply) => Some(reply),
            Err(e) => {
                tracing::error!(chat_id = %payload.chat_id, error = %e, "agent call failed");
                None
            }
        }
    }
}

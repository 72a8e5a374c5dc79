use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::events::{Message, Profile};

/// Conversation id -> messages in the order they were appended
pub type History = HashMap<String, Vec<Message>>;

/// Store shared between the controller and the front end.
///
/// Never hold the lock across a transport call.
pub type SharedStore = Arc<RwLock<ConversationStore>>;

/// Owner of the profile, the conversation histories and the loading flag.
///
/// Every mutator replaces the whole value it manages. Callers build the next
/// value from the current one and write it back in one step.
#[derive(Debug, Clone, Default)]
pub struct ConversationStore {
    profile: Profile,
    history: History,
    loading: bool,
}

impl ConversationStore {
    pub fn new(profile: Profile, history: History) -> Self {
        Self {
            profile,
            history,
            loading: false,
        }
    }

    /// Store for `user_id` with one fresh, empty conversation
    pub fn bootstrap(user_id: impl Into<String>) -> Self {
        let chat_id = new_conversation_id();
        let mut history = History::new();
        history.insert(chat_id.clone(), Vec::new());
        Self::new(Profile::new(user_id, vec![chat_id]), history)
    }

    pub fn into_shared(self) -> SharedStore {
        Arc::new(RwLock::new(self))
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn set_profile(&mut self, profile: Profile) {
        self.profile = profile;
    }

    pub fn set_history(&mut self, history: History) {
        self.history = history;
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn active_conversation_id(&self) -> Option<&str> {
        self.profile.active_conversation_id()
    }

    /// Messages of a conversation, empty when the id is unknown
    pub fn messages(&self, chat_id: &str) -> &[Message] {
        self.history.get(chat_id).map(Vec::as_slice).unwrap_or(&[])
    }
}

pub fn new_conversation_id() -> String {
    Uuid::new_v4().to_string()
}

//! Test doubles shared by the integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use aipfs_chat::transport::{
    AgentReply, AgentTransport, ChatFuture, ChatPayload, TransportError,
};
use futures::FutureExt;
use tokio::sync::Notify;

/// Transport that plays back queued results and records every payload
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<AgentReply, TransportError>>>,
    pub requests: Mutex<Vec<ChatPayload>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_reply(self, message: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Ok(AgentReply::new(message)));
        self
    }

    pub fn queue_error(self, error: TransportError) -> Self {
        self.replies.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn recorded_requests(&self) -> Vec<ChatPayload> {
        self.requests.lock().unwrap().clone()
    }
}

impl AgentTransport for ScriptedTransport {
    fn chat<'a>(&'a self, payload: &'a ChatPayload) -> ChatFuture<'a> {
        self.requests.lock().unwrap().push(payload.clone());
        let next = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(TransportError::Status(503)));
        futures::future::ready(next).boxed()
    }
}

/// Transport that holds every call until the gate is opened
#[derive(Default)]
pub struct GatedTransport {
    pub gate: Notify,
    pub calls: AtomicUsize,
}

impl AgentTransport for GatedTransport {
    fn chat<'a>(&'a self, payload: &'a ChatPayload) -> ChatFuture<'a> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        async move {
            self.gate.notified().await;
            Ok(AgentReply::new(format!("echo: {}", payload.message)))
        }
        .boxed()
    }
}

/// Counts how often a callback such as the escape ran
#[derive(Clone, Default)]
pub struct CallbackCounter(Arc<AtomicUsize>);

impl CallbackCounter {
    pub fn callback(&self) -> impl Fn() + Send + Sync + 'static {
        let count = self.0.clone();
        move || {
            count.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

use std::future::Future;

/// Result of one dispatch cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome<T> {
    /// A usable result arrived on attempt number `attempts`
    Success { value: T, attempts: u32 },
    /// Every attempt came back empty
    Exhausted { attempts: u32 },
}

impl<T> DispatchOutcome<T> {
    pub fn attempts(&self) -> u32 {
        match self {
            DispatchOutcome::Success { attempts, .. } | DispatchOutcome::Exhausted { attempts } => {
                *attempts
            }
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            DispatchOutcome::Success { value, .. } => Some(value),
            DispatchOutcome::Exhausted { .. } => None,
        }
    }
}

/// Invoke `call` until it yields a value, at most `max_retries` times in total.
///
/// `None` from `call` counts as a failed attempt. Attempts follow each other
/// immediately. `max_retries == 0` makes no attempt at all.
pub async fn dispatch<D, T, F, Fut>(mut call: F, data: D, max_retries: u32) -> DispatchOutcome<T>
where
    D: Clone,
    F: FnMut(D) -> Fut,
    Fut: Future<Output = Option<T>>,
{
    for attempt in 1..=max_retries {
        if let Some(value) = call(data.clone()).await {
            tracing::debug!(attempt, "dispatch succeeded");
            return DispatchOutcome::Success {
                value,
                attempts: attempt,
            };
        }
        tracing::debug!(attempt, max_retries, "dispatch attempt failed");
    }

    tracing::warn!(attempts = max_retries, "dispatch exhausted all attempts");
    DispatchOutcome::Exhausted {
        attempts: max_retries,
    }
}

/// Like [`dispatch`], but runs `escape` once when every attempt failed.
pub async fn dispatch_or_escape<D, T, F, Fut, E>(
    call: F,
    data: D,
    max_retries: u32,
    escape: E,
) -> Option<T>
where
    D: Clone,
    F: FnMut(D) -> Fut,
    Fut: Future<Output = Option<T>>,
    E: FnOnce(),
{
    match dispatch(call, data, max_retries).await {
        DispatchOutcome::Success { value, .. } => Some(value),
        DispatchOutcome::Exhausted { .. } => {
            escape();
            None
        }
    }
}

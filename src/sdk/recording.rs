//! SDK double that records every call and parks completions until the
//! caller decides how each challenge ends.
//!
//! Test support only: the console never wires it up. It stays public so
//! the integration tests and the binary's unit tests can drive a `Session`
//! without the demo SDK's timing.

use super::{Completion, WalletSdk};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecuteCall {
    pub user_token: String,
    pub secret_key: String,
    pub challenge_ids: Vec<String>,
}

#[derive(Default)]
struct Recorded {
    initializations: Vec<(String, String)>,
    executions: Vec<ExecuteCall>,
    pending: VecDeque<Completion>,
}

/// Fake [`WalletSdk`] for tests; not meant for the running console
#[derive(Default)]
pub struct RecordingSdk {
    inner: Mutex<Recorded>,
}

impl RecordingSdk {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Recorded> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// `(endpoint_url, app_id)` for every `initialize`, oldest first
    pub fn initializations(&self) -> Vec<(String, String)> {
        self.lock().initializations.clone()
    }

    pub fn executions(&self) -> Vec<ExecuteCall> {
        self.lock().executions.clone()
    }

    /// Oldest completion not yet handed out
    pub fn take_completion(&self) -> Option<Completion> {
        self.lock().pending.pop_front()
    }
}

impl WalletSdk for RecordingSdk {
    fn initialize(&self, endpoint_url: &str, app_id: &str) {
        self.lock()
            .initializations
            .push((endpoint_url.to_string(), app_id.to_string()));
    }

    fn execute(&self, user_token: &str, secret_key: &str, challenge_ids: Vec<String>, completion: Completion) {
        let mut recorded = self.lock();
        recorded.executions.push(ExecuteCall {
            user_token: user_token.to_string(),
            secret_key: secret_key.to_string(),
            challenge_ids,
        });
        recorded.pending.push_back(completion);
    }
}

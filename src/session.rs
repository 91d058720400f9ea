//! Everything behind the form: configuration, field values, the execute
//! button state machine and the toast channel. All methods run on the event
//! loop; the only asynchronous hop is the SDK completion, which the caller
//! routes back in through [`Session::complete`].

use crate::executor::{ChallengeExecutor, Completed};
use crate::feedback::{FeedbackChannel, FeedbackEvent};
use crate::form::{FormField, FormInput, ValidationError};
use crate::sdk::{ExecutionResult, WalletSdk};
use crate::settings::{ConfigurationManager, Endpoint};
use crate::storage::AppIdStore;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Execute button states. `Validating`, `Rejected`, `Succeeded` and `Failed`
/// are passed through within a single call; between events the button is
/// `Idle` or `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecuteState {
    Idle,
    Validating,
    Rejected,
    Pending,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Rejected(ValidationError),
    Dispatched,
}

pub struct Session {
    config: ConfigurationManager,
    form: FormInput,
    feedback: FeedbackChannel,
    executor: ChallengeExecutor,
    state: ExecuteState,
    outstanding: usize,
}

impl Session {
    /// Wire up the shared SDK handle and run startup configuration
    pub fn start(sdk: Arc<dyn WalletSdk>, store: Box<dyn AppIdStore>, endpoint: Endpoint) -> Self {
        Self {
            config: ConfigurationManager::startup(sdk.clone(), store, endpoint),
            form: FormInput::default(),
            feedback: FeedbackChannel::new(),
            executor: ChallengeExecutor::new(sdk),
            state: ExecuteState::Idle,
            outstanding: 0,
        }
    }

    pub fn endpoint(&self) -> Endpoint {
        self.config.endpoint()
    }

    pub fn app_id(&self) -> &str {
        self.config.app_id()
    }

    pub fn form(&self) -> &FormInput {
        &self.form
    }

    pub fn feedback(&self) -> &FeedbackChannel {
        &self.feedback
    }

    pub fn feedback_mut(&mut self) -> &mut FeedbackChannel {
        &mut self.feedback
    }

    pub fn state(&self) -> ExecuteState {
        self.state
    }

    pub fn set_endpoint(&mut self, endpoint: Endpoint, now: Instant) {
        let event = self.config.set_endpoint(endpoint);
        self.feedback.raise(event, now);
    }

    pub fn set_app_id(&mut self, app_id: impl Into<String>, now: Instant) {
        if let Err(e) = self.config.set_app_id(app_id) {
            warn!("Failed to persist App ID: {}", e);
            self.feedback.raise(FeedbackEvent::general(format!("Failed to save App ID: {}", e)), now);
        }
    }

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        *self.form.field_mut(field) = value.into();
    }

    /// Execute button pressed. On a valid form the challenge is handed to the
    /// SDK and `on_complete` will receive its single result.
    pub fn submit<F>(&mut self, now: Instant, on_complete: F) -> SubmitOutcome
    where
        F: FnOnce(ExecutionResult) + Send + 'static,
    {
        let overlapping = self.outstanding > 0;
        self.state = ExecuteState::Validating;

        match self.form.validate() {
            Err(e) => {
                self.state = ExecuteState::Rejected;
                debug!("Submit rejected: {}", e);
                self.feedback.raise(FeedbackEvent::general(e.to_string()), now);
                self.settle();
                SubmitOutcome::Rejected(e)
            }
            Ok(request) => {
                if overlapping {
                    warn!("Submitting while {} challenge(s) are still pending", self.outstanding);
                }
                self.state = ExecuteState::Pending;
                self.outstanding += 1;
                self.executor.execute(&request, on_complete);
                SubmitOutcome::Dispatched
            }
        }
    }

    /// Deliver an SDK result (on the event loop). Returns the terminal state
    /// this result produced.
    pub fn complete(&mut self, result: ExecutionResult, now: Instant) -> ExecuteState {
        self.outstanding = self.outstanding.saturating_sub(1);
        self.state = match self.executor.complete(result, &mut self.feedback, now) {
            Completed::Succeeded => ExecuteState::Succeeded,
            Completed::Failed => ExecuteState::Failed,
        };
        let terminal = self.state;
        self.settle();
        terminal
    }

    /// Periodic tick: hide an expired toast. Returns true if one was hidden.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.feedback.tick(now)
    }

    fn settle(&mut self) {
        self.state = if self.outstanding > 0 { ExecuteState::Pending } else { ExecuteState::Idle };
    }
}

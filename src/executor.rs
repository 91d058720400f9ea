use crate::feedback::{FeedbackChannel, FeedbackEvent};
use crate::form::ChallengeRequest;
use crate::sdk::{ErrorCode, ExecutionResult, SdkError, WalletSdk};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// How a finished challenge ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completed {
    Succeeded,
    Failed,
}

/// One-shot bridge between a validated request and the SDK
pub struct ChallengeExecutor {
    sdk: Arc<dyn WalletSdk>,
}

impl ChallengeExecutor {
    pub fn new(sdk: Arc<dyn WalletSdk>) -> Self {
        Self { sdk }
    }

    /// Hand the request to the SDK. `on_complete` receives the single result;
    /// it is responsible for getting it back onto the event loop.
    pub fn execute<F>(&self, request: &ChallengeRequest, on_complete: F)
    where
        F: FnOnce(ExecutionResult) + Send + 'static,
    {
        info!("Executing challenge {}", request.challenge_id);
        self.sdk.execute(
            &request.user_token,
            &request.secret_key,
            vec![request.challenge_id.clone()],
            Box::new(on_complete),
        );
    }

    /// Turn the SDK's result into feedback, then run error side effects
    pub fn complete(&self, result: ExecutionResult, feedback: &mut FeedbackChannel, now: Instant) -> Completed {
        match result {
            Ok(result) => {
                info!("Challenge finished: {} - {}", result.result_type, result.status);
                feedback.raise(
                    FeedbackEvent::success(format!("{} - {}", result.result_type, result.status)),
                    now,
                );
                Completed::Succeeded
            }
            Err(err) => {
                warn!("Challenge failed ({}): {}", err.code.as_str(), err.message);
                feedback.raise(FeedbackEvent::failure(format!("Error: {}", err.message)), now);
                handle_error(err);
                Completed::Failed
            }
        }
    }
}

/// Side effects for specific SDK error codes. Returns true if a modal was dismissed.
pub fn handle_error(err: SdkError) -> bool {
    match err.code {
        ErrorCode::UserHasSetPin => match err.recovery {
            Some(handle) => {
                handle.dismiss();
                true
            }
            None => false,
        },
        _ => false,
    }
}

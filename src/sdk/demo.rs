//! Offline stand-in for the vendor SDK.
//!
//! Behaves like the real thing from the caller's side: it must be
//! initialized, it "presents" a modal while a challenge runs, and it
//! completes exactly once on another task after some latency. The outcome
//! is scripted from the command line.

use super::{
    ChallengeResult, ChallengeStatus, ChallengeType, Completion, Dismissable, ErrorCode, ExecutionResult, SdkError,
    WalletSdk,
};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, info};

/// What every challenge run against the demo SDK ends with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum DemoOutcome {
    #[default]
    Success,
    Failure,
    /// Fail with `user_has_set_pin` and leave the modal up for the caller
    PinAlreadySet,
}

/// Modal lifecycle notifications for the UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalEvent {
    Presented(String),
    Dismissed,
}

pub type ModalPresenter = Arc<dyn Fn(ModalEvent) + Send + Sync>;

#[derive(Debug, Clone)]
struct Registration {
    endpoint_url: String,
    app_id: String,
}

pub struct DemoSdk {
    outcome: DemoOutcome,
    latency: Duration,
    registration: Mutex<Option<Registration>>,
    presenter: Option<ModalPresenter>,
}

impl DemoSdk {
    pub fn new(outcome: DemoOutcome, latency: Duration) -> Self {
        Self {
            outcome,
            latency,
            registration: Mutex::new(None),
            presenter: None,
        }
    }

    /// Report modal presentation and dismissal through `presenter`
    pub fn with_presenter(mut self, presenter: ModalPresenter) -> Self {
        self.presenter = Some(presenter);
        self
    }

    /// Endpoint URL and App ID from the latest `initialize`
    pub fn registration(&self) -> Option<(String, String)> {
        self.registration
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|r| (r.endpoint_url.clone(), r.app_id.clone()))
    }

    fn present(&self, event: ModalEvent) {
        if let Some(presenter) = &self.presenter {
            presenter(event);
        }
    }

    fn scripted_result(&self, challenge_ids: &[String]) -> ExecutionResult {
        match self.outcome {
            DemoOutcome::Success => Ok(ChallengeResult {
                status: ChallengeStatus::Complete,
                result_type: ChallengeType::SetPin,
            }),
            DemoOutcome::Failure => Err(SdkError::new(
                ErrorCode::InvalidChallengeId,
                format!("Challenge {} was not found", challenge_ids.join(", ")),
            )),
            DemoOutcome::PinAlreadySet => {
                let err = SdkError::new(ErrorCode::UserHasSetPin, "User has already set PIN");
                match &self.presenter {
                    Some(presenter) => Err(err.with_recovery(Box::new(ModalHandle { presenter: presenter.clone() }))),
                    None => Err(err),
                }
            }
        }
    }
}

impl WalletSdk for DemoSdk {
    fn initialize(&self, endpoint_url: &str, app_id: &str) {
        debug!("SDK initialize: endpoint={} app_id={}", endpoint_url, app_id);
        *self.registration.lock().unwrap_or_else(PoisonError::into_inner) = Some(Registration {
            endpoint_url: endpoint_url.to_string(),
            app_id: app_id.to_string(),
        });
    }

    fn execute(&self, user_token: &str, secret_key: &str, challenge_ids: Vec<String>, completion: Completion) {
        info!(
            "SDK execute: challenges={:?} token_len={} key_len={}",
            challenge_ids,
            user_token.len(),
            secret_key.len()
        );

        let result = if self.registration().is_none() {
            Err(SdkError::new(ErrorCode::SdkNotInitialized, "SDK is not initialized"))
        } else {
            self.present(ModalEvent::Presented(format!("Challenge {}", challenge_ids.join(", "))));
            self.scripted_result(&challenge_ids)
        };

        // The SDK takes its own UI down unless it hands the handle to the caller
        let leaves_modal = matches!(&result, Err(e) if e.recovery.is_some());
        let presenter = if leaves_modal { None } else { self.presenter.clone() };
        let presented = !matches!(&result, Err(e) if e.code == ErrorCode::SdkNotInitialized);
        let latency = self.latency;

        tokio::spawn(async move {
            tokio::time::sleep(latency).await;
            if presented {
                if let Some(presenter) = presenter {
                    presenter(ModalEvent::Dismissed);
                }
            }
            completion(result);
        });
    }
}

/// Recovery handle given out with `user_has_set_pin`
struct ModalHandle {
    presenter: ModalPresenter,
}

impl Dismissable for ModalHandle {
    fn dismiss(&self) {
        (self.presenter)(ModalEvent::Dismissed);
    }
}

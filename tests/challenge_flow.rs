//! End-to-end behavior of the form session against a recording SDK.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use wallet_challenge_lib::config;
use wallet_challenge_lib::error::{self, StorageError};
use wallet_challenge_lib::feedback::FeedbackStyle;
use wallet_challenge_lib::form::{FormField, ValidationError};
use wallet_challenge_lib::sdk::{
    ChallengeResult, ChallengeStatus, ChallengeType, Dismissable, ErrorCode, ExecutionResult, RecordingSdk, SdkError,
};
use wallet_challenge_lib::session::{ExecuteState, Session, SubmitOutcome};
use wallet_challenge_lib::settings::Endpoint;
use wallet_challenge_lib::storage::{AppIdStore, JsonFileStore, MemoryStore};

fn session_with(store: MemoryStore) -> (Session, Arc<RecordingSdk>) {
    let sdk = Arc::new(RecordingSdk::new());
    let session = Session::start(sdk.clone(), Box::new(store), Endpoint::Sandbox);
    (session, sdk)
}

fn fill(session: &mut Session, token: &str, secret: &str, challenge: &str) {
    session.set_field(FormField::UserToken, token);
    session.set_field(FormField::SecretKey, secret);
    session.set_field(FormField::ChallengeId, challenge);
}

/// Submit and return a receiver for whatever the SDK completes with
fn submit(session: &mut Session, now: Instant) -> (SubmitOutcome, mpsc::Receiver<ExecutionResult>) {
    let (tx, rx) = mpsc::channel();
    let outcome = session.submit(now, move |result| {
        let _ = tx.send(result);
    });
    (outcome, rx)
}

/// Store on a read-only disk: loads nothing, every save fails
struct ReadOnlyStore;

impl AppIdStore for ReadOnlyStore {
    fn load_app_id(&self) -> error::Result<Option<String>> {
        Ok(None)
    }

    fn save_app_id(&mut self, _app_id: &str) -> error::Result<()> {
        Err(StorageError::Write {
            path: "settings.json".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        })
    }
}

struct Flag(Arc<AtomicBool>);

impl Dismissable for Flag {
    fn dismiss(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

#[test]
fn test_empty_field_blocks_sdk_call() {
    let cases = [
        (("", "s", "c"), "User Token is Empty"),
        (("t", "", "c"), "Secret Key is Empty"),
        (("t", "s", ""), "Challenge ID is Empty"),
    ];

    for ((token, secret, challenge), expected) in cases {
        let (mut session, sdk) = session_with(MemoryStore::default());
        fill(&mut session, token, secret, challenge);

        let (outcome, _rx) = submit(&mut session, Instant::now());

        assert!(matches!(outcome, SubmitOutcome::Rejected(ValidationError(_))));
        assert!(sdk.executions().is_empty(), "no SDK call for {}", expected);
        let toast = session.feedback().active().unwrap();
        assert_eq!(toast.message, expected);
        assert_eq!(toast.style, FeedbackStyle::General);
        assert_eq!(session.state(), ExecuteState::Idle);
    }
}

#[test]
fn test_valid_form_makes_exactly_one_call() {
    let (mut session, sdk) = session_with(MemoryStore::default());
    fill(&mut session, "user-token", "secret-key", "challenge-id");

    let (outcome, _rx) = submit(&mut session, Instant::now());

    assert_eq!(outcome, SubmitOutcome::Dispatched);
    assert_eq!(session.state(), ExecuteState::Pending);
    let calls = sdk.executions();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].user_token, "user-token");
    assert_eq!(calls[0].secret_key, "secret-key");
    assert_eq!(calls[0].challenge_ids, vec!["challenge-id".to_string()]);
}

#[test]
fn test_success_toast() {
    let (mut session, sdk) = session_with(MemoryStore::default());
    fill(&mut session, "t", "s", "c");
    let now = Instant::now();
    let (_, rx) = submit(&mut session, now);

    sdk.take_completion().unwrap()(Ok(ChallengeResult {
        status: ChallengeStatus::Complete,
        result_type: ChallengeType::SetPin,
    }));
    let state = session.complete(rx.recv().unwrap(), now);

    assert_eq!(state, ExecuteState::Succeeded);
    assert_eq!(session.state(), ExecuteState::Idle);
    let toast = session.feedback().active().unwrap();
    assert_eq!(toast.message, "SET_PIN - COMPLETE");
    assert_eq!(toast.style, FeedbackStyle::Success);

    // Gone after two seconds
    assert!(!session.tick(now + Duration::from_millis(1900)));
    assert!(session.tick(now + Duration::from_secs(2)));
    assert!(session.feedback().active().is_none());
}

#[test]
fn test_failure_toast_and_pin_dismissal() {
    let (mut session, sdk) = session_with(MemoryStore::default());
    fill(&mut session, "t", "s", "c");
    let now = Instant::now();
    let (_, rx) = submit(&mut session, now);

    let dismissed = Arc::new(AtomicBool::new(false));
    let err = SdkError::new(ErrorCode::UserHasSetPin, "PIN already set").with_recovery(Box::new(Flag(dismissed.clone())));
    sdk.take_completion().unwrap()(Err(err));
    let state = session.complete(rx.recv().unwrap(), now);

    assert_eq!(state, ExecuteState::Failed);
    let toast = session.feedback().active().unwrap();
    assert_eq!(toast.message, "Error: PIN already set");
    assert_eq!(toast.style, FeedbackStyle::Failure);
    assert!(dismissed.load(Ordering::SeqCst));

    // Still visible at 9.9s, hidden at 10s
    assert!(!session.tick(now + Duration::from_millis(9900)));
    assert!(session.tick(now + Duration::from_secs(10)));
}

#[test]
fn test_unclassified_error_has_no_side_effect() {
    let (mut session, sdk) = session_with(MemoryStore::default());
    fill(&mut session, "t", "s", "c");
    let now = Instant::now();
    let (_, rx) = submit(&mut session, now);

    let dismissed = Arc::new(AtomicBool::new(false));
    let err = SdkError::new(ErrorCode::Unknown, "Something odd").with_recovery(Box::new(Flag(dismissed.clone())));
    sdk.take_completion().unwrap()(Err(err));
    session.complete(rx.recv().unwrap(), now);

    assert_eq!(session.feedback().active().unwrap().message, "Error: Something odd");
    assert!(!dismissed.load(Ordering::SeqCst));
}

#[test]
fn test_rejection_while_pending_keeps_pending() {
    let (mut session, sdk) = session_with(MemoryStore::default());
    fill(&mut session, "t", "s", "c");
    let now = Instant::now();
    let (_, rx) = submit(&mut session, now);

    session.set_field(FormField::ChallengeId, "");
    let (outcome, _) = submit(&mut session, now);

    assert!(matches!(outcome, SubmitOutcome::Rejected(_)));
    assert_eq!(session.state(), ExecuteState::Pending);

    sdk.take_completion().unwrap()(Ok(ChallengeResult {
        status: ChallengeStatus::Complete,
        result_type: ChallengeType::ChangePin,
    }));
    session.complete(rx.recv().unwrap(), now);
    assert_eq!(session.state(), ExecuteState::Idle);
}

#[test]
fn test_endpoint_change_reinitializes_and_announces() {
    let (mut session, sdk) = session_with(MemoryStore::with_app_id("my-app"));

    session.set_endpoint(Endpoint::Production, Instant::now());

    assert_eq!(
        sdk.initializations().last().unwrap(),
        &(config::PRODUCTION_URL.to_string(), "my-app".to_string())
    );
    let toast = session.feedback().active().unwrap();
    assert_eq!(toast.style, FeedbackStyle::General);
    assert!(toast.message.contains(config::PRODUCTION_URL));
}

#[test]
fn test_app_id_survives_restart() {
    let store = MemoryStore::default();
    let (mut session, _) = session_with(store.clone());

    session.set_app_id("persisted-app", Instant::now());
    drop(session);

    let (restarted, sdk) = session_with(store);
    assert_eq!(restarted.app_id(), "persisted-app");
    // Endpoint is not remembered
    assert_eq!(restarted.endpoint(), Endpoint::Sandbox);
    assert_eq!(sdk.initializations()[0].1, config::DEFAULT_APP_ID);
}

#[test]
fn test_restart_falls_back_to_default() {
    let (never_set, _) = session_with(MemoryStore::default());
    assert_eq!(never_set.app_id(), config::DEFAULT_APP_ID);

    let store = MemoryStore::default();
    let (mut session, _) = session_with(store.clone());
    session.set_app_id("", Instant::now());
    drop(session);

    let (restarted, _) = session_with(store);
    assert_eq!(restarted.app_id(), config::DEFAULT_APP_ID);
}

#[test]
fn test_app_id_survives_restart_on_disk() {
    let dir = tempfile::tempdir().unwrap();

    let sdk = Arc::new(RecordingSdk::new());
    let mut session = Session::start(sdk, Box::new(JsonFileStore::new(dir.path())), Endpoint::Sandbox);
    session.set_app_id("disk-app", Instant::now());
    drop(session);

    assert_eq!(JsonFileStore::new(dir.path()).load_app_id().unwrap().as_deref(), Some("disk-app"));

    let sdk = Arc::new(RecordingSdk::new());
    let restarted = Session::start(sdk, Box::new(JsonFileStore::new(dir.path())), Endpoint::Production);
    assert_eq!(restarted.app_id(), "disk-app");
}

#[test]
fn test_app_id_save_failure_keeps_session_going() {
    let sdk = Arc::new(RecordingSdk::new());
    let mut session = Session::start(sdk.clone(), Box::new(ReadOnlyStore), Endpoint::Sandbox);

    session.set_app_id("unsaved-app", Instant::now());

    let toast = session.feedback().active().unwrap();
    assert!(toast.message.starts_with("Failed to save App ID: "), "got {}", toast.message);
    assert!(toast.message.contains("read-only"));
    assert_eq!(toast.style, FeedbackStyle::General);
    assert_eq!(session.app_id(), "unsaved-app");
    assert_eq!(
        sdk.initializations().last().unwrap(),
        &(config::SANDBOX_URL.to_string(), "unsaved-app".to_string())
    );

    // The form still works after the failed save
    fill(&mut session, "t", "s", "c");
    let (outcome, _rx) = submit(&mut session, Instant::now());
    assert_eq!(outcome, SubmitOutcome::Dispatched);
}

//! Boundary to the external wallet SDK.
//!
//! The SDK owns challenge execution, PIN entry UI, cryptography and
//! transport. This crate only registers configuration with it and hands it
//! challenges; everything it needs is expressed by [`WalletSdk`].

pub mod demo;
pub mod recording;

use std::fmt;
use thiserror::Error;

pub use demo::{DemoOutcome, DemoSdk, ModalEvent};
// Test double, see `recording`
pub use recording::RecordingSdk;

/// Final state of a challenge as reported by the SDK
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeStatus {
    Complete,
    Failed,
    InProgress,
    Pending,
    Expired,
}

impl ChallengeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ChallengeStatus::Complete => "COMPLETE",
            ChallengeStatus::Failed => "FAILED",
            ChallengeStatus::InProgress => "IN_PROGRESS",
            ChallengeStatus::Pending => "PENDING",
            ChallengeStatus::Expired => "EXPIRED",
        }
    }
}

impl fmt::Display for ChallengeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What kind of challenge completed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeType {
    SetPin,
    RestorePin,
    ChangePin,
    SetSecurityQuestions,
    CreateWallet,
    CreateTransaction,
    AccelerateTransaction,
    CancelTransaction,
    ContractExecution,
    SignMessage,
    SignTypedData,
    Unknown,
}

impl ChallengeType {
    pub fn as_str(self) -> &'static str {
        match self {
            ChallengeType::SetPin => "SET_PIN",
            ChallengeType::RestorePin => "RESTORE_PIN",
            ChallengeType::ChangePin => "CHANGE_PIN",
            ChallengeType::SetSecurityQuestions => "SET_SECURITY_QUESTIONS",
            ChallengeType::CreateWallet => "CREATE_WALLET",
            ChallengeType::CreateTransaction => "CREATE_TRANSACTION",
            ChallengeType::AccelerateTransaction => "ACCELERATE_TRANSACTION",
            ChallengeType::CancelTransaction => "CANCEL_TRANSACTION",
            ChallengeType::ContractExecution => "CONTRACT_EXECUTION",
            ChallengeType::SignMessage => "SIGN_MESSAGE",
            ChallengeType::SignTypedData => "SIGN_TYPEDDATA",
            ChallengeType::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for ChallengeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Successful completion payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChallengeResult {
    pub status: ChallengeStatus,
    pub result_type: ChallengeType,
}

/// SDK error codes this console knows by name. Anything else lands in `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Unknown,
    SdkNotInitialized,
    ApiParameterMissing,
    ApiParameterInvalid,
    Unauthorized,
    NetworkError,
    UserCanceled,
    UserTokenExpired,
    InvalidUserToken,
    IncorrectAppId,
    InvalidChallengeId,
    InvalidEncryptionKey,
    UserHasSetPin,
    UserPinLocked,
    IncorrectUserPin,
    PinCodeNotMatched,
    InsecurePinCode,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Unknown => "unknown",
            ErrorCode::SdkNotInitialized => "sdk_not_initialized",
            ErrorCode::ApiParameterMissing => "api_parameter_missing",
            ErrorCode::ApiParameterInvalid => "api_parameter_invalid",
            ErrorCode::Unauthorized => "unauthorized",
            ErrorCode::NetworkError => "network_error",
            ErrorCode::UserCanceled => "user_canceled",
            ErrorCode::UserTokenExpired => "user_token_expired",
            ErrorCode::InvalidUserToken => "invalid_user_token",
            ErrorCode::IncorrectAppId => "incorrect_app_id",
            ErrorCode::InvalidChallengeId => "invalid_challenge_id",
            ErrorCode::InvalidEncryptionKey => "invalid_encryption_key",
            ErrorCode::UserHasSetPin => "user_has_set_pin",
            ErrorCode::UserPinLocked => "user_pin_locked",
            ErrorCode::IncorrectUserPin => "incorrect_user_pin",
            ErrorCode::PinCodeNotMatched => "pin_code_not_matched",
            ErrorCode::InsecurePinCode => "insecure_pin_code",
        }
    }
}

/// Handle to UI the SDK presented on its own (e.g. a PIN screen) that the
/// caller may have to take down.
pub trait Dismissable: Send {
    fn dismiss(&self);
}

/// Failure payload. `recovery` is present when the SDK left UI on screen.
#[derive(Error)]
#[error("{message}")]
pub struct SdkError {
    pub code: ErrorCode,
    pub message: String,
    pub recovery: Option<Box<dyn Dismissable>>,
}

impl SdkError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self { code, message: message.into(), recovery: None }
    }

    pub fn with_recovery(mut self, handle: Box<dyn Dismissable>) -> Self {
        self.recovery = Some(handle);
        self
    }
}

impl fmt::Debug for SdkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SdkError")
            .field("code", &self.code)
            .field("message", &self.message)
            .field("recovery", &self.recovery.is_some())
            .finish()
    }
}

pub type ExecutionResult = Result<ChallengeResult, SdkError>;

/// Called exactly once per `execute`, possibly from another task
pub type Completion = Box<dyn FnOnce(ExecutionResult) + Send + 'static>;

pub trait WalletSdk: Send + Sync {
    /// Register (or re-register) the backend and app. Idempotent.
    fn initialize(&self, endpoint_url: &str, app_id: &str);

    /// Start the given challenges. Returns immediately; `completion` fires later.
    fn execute(&self, user_token: &str, secret_key: &str, challenge_ids: Vec<String>, completion: Completion);
}

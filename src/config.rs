/// Centralized configuration constants
/// Single source of truth for app defaults

/// Sandbox backend the SDK talks to
pub const SANDBOX_URL: &str = "https://api-sandbox.circle.com/v1/w3s/";

/// Production backend the SDK talks to
pub const PRODUCTION_URL: &str = "https://api.circle.com/v1/w3s/";

/// App ID used until the user enters one (or a stored one is restored)
pub const DEFAULT_APP_ID: &str = "your-app-id";

/// Toast display durations in seconds
pub const GENERAL_TOAST_SECS: f64 = 2.0;
pub const SUCCESS_TOAST_SECS: f64 = 2.0;
pub const FAILURE_TOAST_SECS: f64 = 10.0;

/// Number of past feedback messages kept for the history panel
pub const FEEDBACK_HISTORY_LIMIT: usize = 20;

/// UI tick interval in milliseconds (drives toast auto-hide)
pub const TICK_RATE_MS: u64 = 250;

/// Simulated SDK round-trip for the demo backend
pub const DEFAULT_DEMO_LATENCY_MS: u64 = 800;

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "WALLET_CHALLENGE_DATA_DIR";

/// Directory name under the platform data dir
pub const DATA_DIR_NAME: &str = "wallet-challenge";

/// App name
pub const APP_NAME: &str = "Wallet Challenge Console";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

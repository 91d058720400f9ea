use crate::config;
use crate::error::Result;
use crate::feedback::FeedbackEvent;
use crate::sdk::WalletSdk;
use crate::storage::AppIdStore;
use std::sync::Arc;
use tracing::{info, warn};

/// Backend environment the SDK talks to. Not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Endpoint {
    #[default]
    Sandbox,
    Production,
}

impl Endpoint {
    pub fn url(self) -> &'static str {
        match self {
            Endpoint::Sandbox => config::SANDBOX_URL,
            Endpoint::Production => config::PRODUCTION_URL,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Endpoint::Sandbox => "Sandbox",
            Endpoint::Production => "Production",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Endpoint::Sandbox => Endpoint::Production,
            Endpoint::Production => Endpoint::Sandbox,
        }
    }
}

/// Owns endpoint + App ID and keeps the SDK registration in step with them.
/// Every change re-registers immediately; nothing is batched.
pub struct ConfigurationManager {
    endpoint: Endpoint,
    app_id: String,
    sdk: Arc<dyn WalletSdk>,
    store: Box<dyn AppIdStore>,
}

impl ConfigurationManager {
    /// Register defaults with the SDK, then restore a previously stored App ID
    pub fn startup(sdk: Arc<dyn WalletSdk>, store: Box<dyn AppIdStore>, endpoint: Endpoint) -> Self {
        sdk.initialize(endpoint.url(), config::DEFAULT_APP_ID);

        let mut manager = Self {
            endpoint,
            app_id: config::DEFAULT_APP_ID.to_string(),
            sdk,
            store,
        };

        match manager.store.load_app_id() {
            Ok(Some(stored)) if !stored.is_empty() => {
                info!("Restored App ID from storage");
                manager.app_id = stored;
                manager.sdk.initialize(manager.endpoint.url(), &manager.app_id);
            }
            Ok(_) => {}
            Err(e) => warn!("Could not load stored App ID: {}", e),
        }

        manager
    }

    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Switch backend and announce the new URL
    pub fn set_endpoint(&mut self, endpoint: Endpoint) -> FeedbackEvent {
        self.endpoint = endpoint;
        self.sdk.initialize(endpoint.url(), &self.app_id);
        info!("Endpoint set to {}", endpoint.url());
        FeedbackEvent::general(format!("Endpoint: {}", endpoint.url()))
    }

    /// Re-register with the new App ID and persist it. The in-memory value
    /// and SDK registration change even when persisting fails.
    pub fn set_app_id(&mut self, app_id: impl Into<String>) -> Result<()> {
        self.app_id = app_id.into();
        self.sdk.initialize(self.endpoint.url(), &self.app_id);
        self.store.save_app_id(&self.app_id)
    }
}

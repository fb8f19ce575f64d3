//! Application state shared across handlers.

use std::sync::Arc;

use crate::agrigen::AgrigenClient;
use crate::config::WebConfig;
use crate::services::payments::StripeClient;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources: the configuration, the backend API client, and the
/// optional payment tokenization client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: WebConfig,
    agrigen: AgrigenClient,
    payments: Option<StripeClient>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Card payments are enabled only when the configuration carries a
    /// Stripe secret key.
    #[must_use]
    pub fn new(config: WebConfig) -> Self {
        let agrigen = AgrigenClient::new(&config.api_base_url);
        let payments = config
            .stripe_secret_key
            .as_ref()
            .map(|key| StripeClient::new(key.clone()));

        Self {
            inner: Arc::new(AppStateInner {
                config,
                agrigen,
                payments,
            }),
        }
    }

    /// Get a reference to the web configuration.
    #[must_use]
    pub fn config(&self) -> &WebConfig {
        &self.inner.config
    }

    /// Get a reference to the AgriZen backend API client.
    #[must_use]
    pub fn agrigen(&self) -> &AgrigenClient {
        &self.inner.agrigen
    }

    /// Get the Stripe tokenization client, if card payments are configured.
    #[must_use]
    pub fn payments(&self) -> Option<&StripeClient> {
        self.inner.payments.as_ref()
    }
}

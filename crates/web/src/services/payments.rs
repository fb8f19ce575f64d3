//! Stripe card tokenization.
//!
//! The card payment path never sends card details to the AgriZen backend:
//! they are exchanged for a single-use token against the Stripe tokens
//! API, and only the token travels with the order payload.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

/// Stripe tokens endpoint.
const TOKENS_URL: &str = "https://api.stripe.com/v1/tokens";

/// Errors that can occur during tokenization.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Stripe rejected the card details.
    #[error("Card was rejected: {0}")]
    Rejected(String),

    /// Card details failed local validation before any request was made.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// No Stripe secret key is configured.
    #[error("Card payments are not configured")]
    NotConfigured,
}

/// Card fields from the checkout form.
///
/// Implements `Debug` manually so card numbers never reach the logs.
#[derive(Clone)]
pub struct CardDetails {
    pub number: String,
    pub exp_month: String,
    pub exp_year: String,
    pub cvc: String,
}

impl std::fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardDetails")
            .field("number", &"[REDACTED]")
            .field("exp_month", &self.exp_month)
            .field("exp_year", &self.exp_year)
            .field("cvc", &"[REDACTED]")
            .finish()
    }
}

impl CardDetails {
    /// Required-field validation, run before any network call.
    ///
    /// # Errors
    ///
    /// Returns the first missing field.
    pub fn validate(&self) -> Result<(), PaymentError> {
        if self.number.trim().is_empty() {
            return Err(PaymentError::MissingField("card number"));
        }
        if self.exp_month.trim().is_empty() {
            return Err(PaymentError::MissingField("expiry month"));
        }
        if self.exp_year.trim().is_empty() {
            return Err(PaymentError::MissingField("expiry year"));
        }
        if self.cvc.trim().is_empty() {
            return Err(PaymentError::MissingField("cvc"));
        }
        Ok(())
    }
}

/// Successful token creation response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    id: String,
}

/// Error body returned by Stripe.
#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

/// Client for the Stripe tokens API.
#[derive(Clone)]
pub struct StripeClient {
    client: reqwest::Client,
    secret_key: SecretString,
}

impl StripeClient {
    /// Create a new tokenization client.
    #[must_use]
    pub fn new(secret_key: SecretString) -> Self {
        Self {
            client: reqwest::Client::new(),
            secret_key,
        }
    }

    /// Exchange card details for a single-use token id.
    ///
    /// # Errors
    ///
    /// Returns an error when validation fails, the request fails, or
    /// Stripe rejects the card.
    pub async fn tokenize(&self, card: &CardDetails) -> Result<String, PaymentError> {
        card.validate()?;

        let response = self
            .client
            .post(TOKENS_URL)
            .basic_auth(self.secret_key.expose_secret(), None::<&str>)
            .form(&[
                ("card[number]", card.number.trim()),
                ("card[exp_month]", card.exp_month.trim()),
                ("card[exp_year]", card.exp_year.trim()),
                ("card[cvc]", card.cvc.trim()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<StripeErrorBody>(&body)
                .ok()
                .and_then(|b| b.error.message)
                .unwrap_or_else(|| format!("HTTP {status}"));
            tracing::warn!(status = %status, "Stripe rejected tokenization");
            return Err(PaymentError::Rejected(message));
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn card() -> CardDetails {
        CardDetails {
            number: "4242424242424242".to_string(),
            exp_month: "12".to_string(),
            exp_year: "2030".to_string(),
            cvc: "123".to_string(),
        }
    }

    #[test]
    fn test_validate_requires_every_field() {
        assert!(card().validate().is_ok());

        let mut missing = card();
        missing.number = String::new();
        assert!(matches!(
            missing.validate().unwrap_err(),
            PaymentError::MissingField("card number")
        ));

        let mut missing = card();
        missing.cvc = "  ".to_string();
        assert!(matches!(
            missing.validate().unwrap_err(),
            PaymentError::MissingField("cvc")
        ));
    }

    #[test]
    fn test_debug_redacts_card_number() {
        let debug = format!("{:?}", card());
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("4242424242424242"));
        assert!(!debug.contains("123"));
    }

    #[test]
    fn test_token_response_parse() {
        let token: TokenResponse =
            serde_json::from_str(r#"{"id":"tok_1abc","object":"token"}"#).unwrap();
        assert_eq!(token.id, "tok_1abc");
    }

    #[test]
    fn test_error_body_parse() {
        let body: StripeErrorBody = serde_json::from_str(
            r#"{"error":{"message":"Your card number is incorrect.","type":"card_error"}}"#,
        )
        .unwrap();
        assert_eq!(
            body.error.message.unwrap(),
            "Your card number is incorrect."
        );
    }
}

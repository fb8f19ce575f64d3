//! Customer order history.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::nav::Nav;
use crate::state::AppState;

/// Shipping address as stored on the order: a serialized JSON string with
/// every field optional, parse-guarded at display time.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedShippingAddress {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl ParsedShippingAddress {
    /// Parse the serialized address, falling back to an empty record when
    /// the stored value is malformed.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or_default()
    }

    /// One display line, skipping absent fields.
    #[must_use]
    pub fn display_line(&self) -> String {
        let parts: Vec<&str> = [
            self.full_name.as_deref(),
            self.street.as_deref(),
            self.city.as_deref(),
            self.state.as_deref(),
            self.zip.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect();
        parts.join(", ")
    }
}

/// Order display data.
#[derive(Debug, Clone)]
pub struct OrderView {
    pub order_id: i32,
    pub total_amount: Decimal,
    pub payment_method: String,
    pub status: String,
    pub created_at: String,
    pub address_line: String,
}

/// Order history template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersTemplate {
    pub nav: Nav,
    pub orders: Vec<OrderView>,
}

/// Display the order history for the session user.
#[instrument(skip(state, session))]
pub async fn index(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
) -> Result<OrdersTemplate> {
    let orders = state.agrigen().orders_for_user(user.id).await?;

    let views = orders
        .into_iter()
        .map(|order| OrderView {
            order_id: order.order_id.as_i32(),
            total_amount: order.total_amount,
            payment_method: order.payment_method,
            status: order.status,
            created_at: order.created_at,
            address_line: ParsedShippingAddress::parse(&order.shipping_address).display_line(),
        })
        .collect();

    Ok(OrdersTemplate {
        nav: Nav::load(&session).await,
        orders: views,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_well_formed_address() {
        let raw = r#"{"fullName":"Dhanya Kumar","phone":"9876543210","street":"12 Canal Road","city":"Thrissur","state":"Kerala","zip":"680001"}"#;
        let parsed = ParsedShippingAddress::parse(raw);
        assert_eq!(parsed.full_name.as_deref(), Some("Dhanya Kumar"));
        assert_eq!(
            parsed.display_line(),
            "Dhanya Kumar, 12 Canal Road, Thrissur, Kerala, 680001"
        );
    }

    #[test]
    fn test_parse_guard_on_malformed_address() {
        // A broken stored value renders as an empty address, not a crash.
        let parsed = ParsedShippingAddress::parse("not json at all");
        assert!(parsed.full_name.is_none());
        assert_eq!(parsed.display_line(), "");

        let parsed = ParsedShippingAddress::parse("");
        assert_eq!(parsed.display_line(), "");
    }

    #[test]
    fn test_partial_address_skips_missing_fields() {
        let parsed = ParsedShippingAddress::parse(r#"{"city":"Thrissur","zip":"680001"}"#);
        assert_eq!(parsed.display_line(), "Thrissur, 680001");
    }
}

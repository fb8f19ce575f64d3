//! The cart snapshot: a session-cached mirror of the last cart fetch.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::agrigen::types::CartItem;

/// Mirror of the server's current cart contents for the session user.
///
/// Refreshed on every cart fetch; `count` feeds the navbar badge. The
/// snapshot is a cache, not an authority - the backend owns the cart.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CartSnapshot {
    /// Line items exactly as the server returned them.
    pub items: Vec<CartItem>,
    /// Number of line items, recomputed on each fetch.
    pub count: usize,
}

impl CartSnapshot {
    /// Build a snapshot from a fresh fetch.
    #[must_use]
    pub fn from_items(items: Vec<CartItem>) -> Self {
        let count = items.len();
        Self { items, count }
    }

    /// Whether the cart has no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of the server-supplied line totals. This is what the UI
    /// displays, trusting the server's arithmetic.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(|item| item.total).sum()
    }

    /// Sum of `price × quantity` recomputed locally. Kept alongside the
    /// displayed subtotal so a server/client mismatch is detectable
    /// instead of silently trusted.
    #[must_use]
    pub fn recomputed_subtotal(&self) -> Decimal {
        self.items
            .iter()
            .map(|item| item.price * Decimal::from(item.quantity))
            .sum()
    }

    /// Whether every line's `total` equals `price × quantity`.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.items
            .iter()
            .all(|item| item.total == item.price * Decimal::from(item.quantity))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use agrizen_core::{CartItemId, ProductId};

    fn line(cart_id: i32, product_id: i32, price: &str, quantity: u32, total: &str) -> CartItem {
        CartItem {
            cart_id: CartItemId::new(cart_id),
            product_id: ProductId::new(product_id),
            name: format!("product-{product_id}"),
            image: String::new(),
            price: price.parse().unwrap(),
            quantity,
            total: total.parse().unwrap(),
        }
    }

    #[test]
    fn test_count_matches_item_list_length() {
        let snapshot = CartSnapshot::from_items(vec![
            line(1, 4, "24.99", 2, "49.98"),
            line(2, 9, "5.00", 1, "5.00"),
        ]);
        assert_eq!(snapshot.count, 2);
        assert!(!snapshot.is_empty());
    }

    #[test]
    fn test_subtotal_equals_recomputed_sum_when_server_is_honest() {
        let snapshot = CartSnapshot::from_items(vec![
            line(1, 4, "24.99", 2, "49.98"),
            line(2, 9, "5.00", 3, "15.00"),
        ]);
        assert_eq!(snapshot.subtotal(), "64.98".parse().unwrap());
        assert_eq!(snapshot.subtotal(), snapshot.recomputed_subtotal());
        assert!(snapshot.is_consistent());
    }

    #[test]
    fn test_server_arithmetic_drift_is_detectable() {
        // The displayed subtotal trusts the server value; the recomputed
        // sum is how a mismatch shows up.
        let snapshot = CartSnapshot::from_items(vec![line(1, 4, "24.99", 2, "45.00")]);
        assert_eq!(snapshot.subtotal(), "45.00".parse().unwrap());
        assert_eq!(snapshot.recomputed_subtotal(), "49.98".parse().unwrap());
        assert!(!snapshot.is_consistent());
    }

    #[test]
    fn test_duplicate_lines_for_same_product_both_count() {
        // A double submit of add-to-cart creates two line items; the
        // snapshot reports both rather than merging them.
        let snapshot = CartSnapshot::from_items(vec![
            line(1, 4, "24.99", 1, "24.99"),
            line(2, 4, "24.99", 1, "24.99"),
        ]);
        assert_eq!(snapshot.count, 2);
        assert_eq!(snapshot.subtotal(), "49.98".parse().unwrap());
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = CartSnapshot::default();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.subtotal(), Decimal::ZERO);
    }
}

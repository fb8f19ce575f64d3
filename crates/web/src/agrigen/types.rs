//! Wire types for the AgriZen backend API.
//!
//! Fetched records mirror what the controllers actually emit, including
//! their duck-typed numeric fields (normalized by the flexible
//! deserializers in `agrizen-core`). Statuses on fetched records stay as
//! plain strings because the backend owns that vocabulary; the enums in
//! core cover only the values this UI submits.

use agrizen_core::api::{flex_bool, flex_decimal, flex_u32};
use agrizen_core::{
    CartItemId, CategoryId, CropId, NotificationId, OrderId, PaymentMethod, ProductId,
    RecordStatus, Role, UserId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::address::ShippingAddress;

// =============================================================================
// Identity
// =============================================================================

/// User record returned by the login controller.
///
/// Note the `userid` key: the login controller names the primary key
/// differently from the user management controller's `id`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthenticatedUser {
    pub userid: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// User row from the user management controller.
#[derive(Debug, Clone, Deserialize)]
pub struct ManagedUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub created_at: String,
}

/// Payload for creating or updating a managed user.
#[derive(Debug, Clone, Serialize)]
pub struct UserPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub role: Role,
}

// =============================================================================
// Catalog
// =============================================================================

/// Category record.
#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub created_at: String,
}

/// Payload for creating or updating a category.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<CategoryId>,
    pub name: String,
    pub description: String,
    pub user_id: Option<UserId>,
    pub status: RecordStatus,
}

/// Product record from the product controller.
#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category_id: CategoryId,
    #[serde(deserialize_with = "flex_decimal")]
    pub price: Decimal,
    #[serde(default, deserialize_with = "flex_u32")]
    pub stock_quantity: u32,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub created_at: String,
    pub user_id: UserId,
    #[serde(default)]
    pub image: String,
}

/// Product record from the marketplace listing, which joins the category
/// name in place of the raw id.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketProduct {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(deserialize_with = "flex_decimal")]
    pub price: Decimal,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub image: String,
}

// =============================================================================
// Cart
// =============================================================================

/// A line item in the fetched cart.
///
/// `total` is the server's arithmetic; the snapshot keeps it verbatim and
/// exposes a recomputed sum separately so drift can be detected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub cart_id: CartItemId,
    pub product_id: ProductId,
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(deserialize_with = "flex_decimal")]
    pub price: Decimal,
    #[serde(deserialize_with = "flex_u32")]
    pub quantity: u32,
    #[serde(deserialize_with = "flex_decimal")]
    pub total: Decimal,
}

/// Payload for adding a line item to the cart.
///
/// Keyed by `(user_id, product_id, quantity, price)` with no idempotency
/// key; submitting it twice creates two line items.
#[derive(Debug, Clone, Serialize)]
pub struct NewCartItem {
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub price: Decimal,
}

// =============================================================================
// Orders
// =============================================================================

/// Order row from the customer order history.
#[derive(Debug, Clone, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    #[serde(deserialize_with = "flex_decimal")]
    pub total_amount: Decimal,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub created_at: String,
    /// Serialized JSON; parse-guarded at display time.
    #[serde(default)]
    pub shipping_address: String,
}

/// Order row from the admin order controller.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminOrder {
    pub order_id: OrderId,
    pub user_id: UserId,
    #[serde(deserialize_with = "flex_decimal")]
    pub total_amount: Decimal,
    #[serde(default)]
    pub order_status: String,
    #[serde(default)]
    pub payment_status: String,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub shipping_address: String,
    #[serde(default)]
    pub created_at: String,
}

/// Payload submitted when placing an order.
///
/// Both payment paths converge on this shape; the card path adds the
/// token produced by the payment service.
#[derive(Debug, Clone, Serialize)]
pub struct OrderPayload {
    pub user_id: UserId,
    pub total_amount: Decimal,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stripe_token: Option<String>,
    pub cart_items: Vec<CartItem>,
}

/// Payload for the admin order status dropdowns.
#[derive(Debug, Clone, Serialize)]
pub struct OrderStatusUpdate {
    pub order_id: OrderId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<String>,
}

// =============================================================================
// Crops
// =============================================================================

/// Crop guide record.
#[derive(Debug, Clone, Deserialize)]
pub struct Crop {
    pub id: CropId,
    pub name: String,
    #[serde(default)]
    pub variety: String,
    #[serde(default)]
    pub season: String,
    #[serde(default, deserialize_with = "flex_u32")]
    pub duration_days: u32,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub soil_type: String,
    #[serde(default)]
    pub sowing_method: String,
    #[serde(default, deserialize_with = "flex_decimal")]
    pub yield_kg_per_hectare: Decimal,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
}

// =============================================================================
// Notifications
// =============================================================================

/// Notification row.
#[derive(Debug, Clone, Deserialize)]
pub struct Notification {
    pub notification_id: NotificationId,
    #[serde(default)]
    pub name: String,
    pub message: String,
    #[serde(default, deserialize_with = "flex_bool")]
    pub is_read: bool,
    #[serde(default)]
    pub created_at: String,
}

// =============================================================================
// Dashboard
// =============================================================================

/// Aggregate counters for the admin dashboard.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(default, deserialize_with = "flex_u32")]
    pub total_users: u32,
    #[serde(default, deserialize_with = "flex_u32")]
    pub total_products: u32,
    #[serde(default, deserialize_with = "flex_u32")]
    pub total_orders: u32,
    #[serde(default, deserialize_with = "flex_u32")]
    pub active_alerts: u32,
}

// =============================================================================
// Multipart forms (image-bearing resources)
// =============================================================================

/// An uploaded image carried through to the backend untouched.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub(crate) fn to_part(&self) -> reqwest::multipart::Part {
        let part = reqwest::multipart::Part::bytes(self.bytes.clone())
            .file_name(self.file_name.clone());
        part.mime_str(&self.content_type).unwrap_or_else(|_| {
            reqwest::multipart::Part::bytes(self.bytes.clone()).file_name(self.file_name.clone())
        })
    }
}

/// Multipart payload for creating or updating a product.
///
/// On edit, `existing_image` must carry the previously stored filename
/// whenever no new file is chosen, or the backend record loses its image
/// reference.
#[derive(Debug, Clone)]
pub struct ProductForm {
    pub id: Option<ProductId>,
    pub name: String,
    pub description: String,
    pub category_id: CategoryId,
    pub price: Decimal,
    pub stock_quantity: u32,
    pub unit: String,
    pub status: RecordStatus,
    pub user_id: UserId,
    pub image: Option<ImageUpload>,
    pub existing_image: Option<String>,
}

impl ProductForm {
    pub(crate) fn to_multipart(&self) -> reqwest::multipart::Form {
        let mut form = reqwest::multipart::Form::new()
            .text("id", self.id.map(|id| id.to_string()).unwrap_or_default())
            .text("name", self.name.clone())
            .text("description", self.description.clone())
            .text("category_id", self.category_id.to_string())
            .text("price", self.price.to_string())
            .text("stock_quantity", self.stock_quantity.to_string())
            .text("unit", self.unit.clone())
            .text("status", self.status.to_string())
            .text("user_id", self.user_id.to_string());

        if let Some(image) = &self.image {
            form = form.part("image", image.to_part());
        }
        if let Some(existing) = &self.existing_image {
            form = form.text("existingImage", existing.clone());
        }

        form
    }
}

/// Multipart payload for creating or updating a crop.
#[derive(Debug, Clone)]
pub struct CropForm {
    pub id: Option<CropId>,
    pub name: String,
    pub variety: String,
    pub season: String,
    pub duration_days: u32,
    pub region: String,
    pub soil_type: String,
    pub sowing_method: String,
    pub yield_kg_per_hectare: Decimal,
    pub description: String,
    pub image: Option<ImageUpload>,
    pub existing_image: Option<String>,
}

impl CropForm {
    pub(crate) fn to_multipart(&self) -> reqwest::multipart::Form {
        let mut form = reqwest::multipart::Form::new()
            .text("name", self.name.clone())
            .text("variety", self.variety.clone())
            .text("season", self.season.clone())
            .text("duration_days", self.duration_days.to_string())
            .text("region", self.region.clone())
            .text("soil_type", self.soil_type.clone())
            .text("sowing_method", self.sowing_method.clone())
            .text("yield_kg_per_hectare", self.yield_kg_per_hectare.to_string())
            .text("description", self.description.clone());

        if let Some(id) = self.id {
            form = form.text("id", id.to_string());
        }
        if let Some(image) = &self.image {
            form = form.part("image", image.to_part());
        }
        if let Some(existing) = &self.existing_image {
            form = form.text("existingImage", existing.clone());
        }

        form
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_market_product_with_string_price() {
        let json = r#"{
            "id": "4",
            "name": "Organic Wheat Seed",
            "description": "High-yield winter wheat",
            "price": "24.99",
            "category": "Seeds",
            "unit": "kg",
            "image": "wheat.jpg"
        }"#;
        let product: MarketProduct = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(4));
        assert_eq!(product.price, Decimal::new(2499, 2));
        assert_eq!(product.category, "Seeds");
    }

    #[test]
    fn test_cart_item_roundtrip() {
        let json = r#"{
            "cart_id": 11,
            "product_id": "4",
            "name": "Organic Wheat Seed",
            "image": "wheat.jpg",
            "price": "24.99",
            "quantity": "2",
            "total": "49.98"
        }"#;
        let item: CartItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.quantity, 2);
        assert_eq!(item.total, Decimal::new(4998, 2));

        // Snapshot items serialize back out for the session store.
        let out = serde_json::to_string(&item).unwrap();
        let again: CartItem = serde_json::from_str(&out).unwrap();
        assert_eq!(again.cart_id, item.cart_id);
        assert_eq!(again.total, item.total);
    }

    #[test]
    fn test_notification_flag_shapes() {
        let json = r#"{"notification_id": 3, "name": "Low stock", "message": "Wheat below 10 units", "is_read": "0"}"#;
        let n: Notification = serde_json::from_str(json).unwrap();
        assert!(!n.is_read);

        let json = r#"{"notification_id": 4, "message": "Order received", "is_read": 1}"#;
        let n: Notification = serde_json::from_str(json).unwrap();
        assert!(n.is_read);
    }

    #[test]
    fn test_dashboard_stats_camel_case() {
        let json = r#"{"totalUsers": "42", "totalProducts": 17, "totalOrders": 8, "activeAlerts": 0}"#;
        let stats: DashboardStats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.total_users, 42);
        assert_eq!(stats.total_products, 17);
    }

    #[test]
    fn test_order_payload_skips_absent_token() {
        let payload = OrderPayload {
            user_id: UserId::new(7),
            total_amount: Decimal::new(4998, 2),
            shipping_address: ShippingAddress::sample(),
            payment_method: PaymentMethod::Cod,
            stripe_token: None,
            cart_items: vec![],
        };
        let json = serde_json::to_string(&payload).unwrap();
        assert!(!json.contains("stripe_token"));
        assert!(json.contains("\"payment_method\":\"cod\""));
    }

    #[test]
    fn test_status_update_sends_only_changed_field() {
        let update = OrderStatusUpdate {
            order_id: OrderId::new(9),
            order_status: Some("Processing".to_string()),
            payment_status: None,
        };
        let json = serde_json::to_string(&update).unwrap();
        assert!(json.contains("order_status"));
        assert!(!json.contains("payment_status"));
    }
}

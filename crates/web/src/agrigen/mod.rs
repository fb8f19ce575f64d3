//! AgriZen backend API client.
//!
//! # Architecture
//!
//! - One `reqwest` client behind a single configurable base URL; the
//!   controllers live at `{base}/adminController/{name}Controller.php`
//! - The backend is the source of truth - no local sync, no response
//!   caching, direct calls per page load
//! - Every response body is parsed into the shared envelope before the
//!   transport status is trusted, and normalized into `Result`
//!
//! # Example
//!
//! ```rust,ignore
//! use agrizen_web::agrigen::AgrigenClient;
//!
//! let client = AgrigenClient::new("https://api.agrizen.example");
//!
//! // Authenticate and fetch the cart
//! let user = client.login("dhanya@farm.example", "...").await?;
//! let items = client.cart_items(user.userid).await?;
//! ```

pub mod types;

use std::sync::Arc;

use agrizen_core::api::{ApiFailure, Envelope, ListResponse};
use agrizen_core::{CartItemId, CategoryId, CropId, NotificationId, OrderId, ProductId, Role, UserId};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;

use types::{
    AdminOrder, AuthenticatedUser, Category, CategoryPayload, CartItem, Crop, CropForm,
    DashboardStats, ManagedUser, MarketProduct, NewCartItem, Notification, Order, OrderPayload,
    OrderStatusUpdate, Product, ProductForm, UserPayload,
};

/// Errors that can occur when talking to the AgriZen backend.
#[derive(Debug, Error)]
pub enum AgrigenError {
    /// HTTP request failed (network, DNS, timeout at the socket level).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the expected JSON shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The envelope reported an application-level failure.
    #[error("{0}")]
    Api(#[from] ApiFailure),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Client for the AgriZen backend API.
///
/// Cheaply cloneable; all state lives behind an `Arc`.
#[derive(Clone)]
pub struct AgrigenClient {
    inner: Arc<AgrigenClientInner>,
}

struct AgrigenClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl AgrigenClient {
    /// Create a new backend client over the given base URL.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            inner: Arc::new(AgrigenClientInner {
                client: reqwest::Client::new(),
                base_url: base_url.trim_end_matches('/').to_string(),
            }),
        }
    }

    /// Controller endpoint URL for an endpoint family.
    fn controller(&self, name: &str) -> String {
        format!(
            "{}/adminController/{name}Controller.php",
            self.inner.base_url
        )
    }

    /// Public URL of an uploaded image (`kind` is `products` or `crops`).
    #[must_use]
    pub fn upload_url(&self, kind: &str, file: &str) -> String {
        format!("{}/uploads/{kind}/{file}", self.inner.base_url)
    }

    /// Parse a response body into the envelope, trusting the envelope's
    /// own status field over the transport-level status code.
    async fn decode<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<Envelope<T>, AgrigenError> {
        let status = response.status();
        let text = response.text().await?;

        match serde_json::from_str::<Envelope<T>>(&text) {
            Ok(envelope) => Ok(envelope),
            Err(e) => {
                tracing::error!(
                    status = %status,
                    body = %text.chars().take(500).collect::<String>(),
                    "Failed to parse backend response"
                );
                Err(AgrigenError::Parse(e))
            }
        }
    }

    /// Like [`Self::decode`], but tolerates bare-array list responses.
    async fn decode_list<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<Vec<T>, AgrigenError> {
        let status = response.status();
        let text = response.text().await?;

        match serde_json::from_str::<ListResponse<T>>(&text) {
            Ok(list) => Ok(list.into_result()?),
            Err(e) => {
                tracing::error!(
                    status = %status,
                    body = %text.chars().take(500).collect::<String>(),
                    "Failed to parse backend list response"
                );
                Err(AgrigenError::Parse(e))
            }
        }
    }

    // =========================================================================
    // Identity
    // =========================================================================

    /// Authenticate with email and password.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected or the request fails.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedUser, AgrigenError> {
        let response = self
            .inner
            .client
            .post(self.controller("login"))
            .form(&[("tag", "login"), ("email", email), ("password", password)])
            .send()
            .await?;

        Ok(Self::decode::<AuthenticatedUser>(response)
            .await?
            .into_result()?)
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the registration.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<(), AgrigenError> {
        let form = reqwest::multipart::Form::new()
            .text("tag", "register")
            .text("name", name.to_string())
            .text("email", email.to_string())
            .text("password", password.to_string())
            .text("role", role.to_string());

        let response = self
            .inner
            .client
            .post(self.controller("register"))
            .multipart(form)
            .send()
            .await?;

        Self::decode::<serde_json::Value>(response)
            .await?
            .into_ack()?;
        Ok(())
    }

    /// Update the profile name and email of a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the update.
    #[instrument(skip(self))]
    pub async fn update_profile(
        &self,
        user_id: UserId,
        name: &str,
        email: &str,
    ) -> Result<(), AgrigenError> {
        let response = self
            .inner
            .client
            .put(self.controller("profile"))
            .json(&serde_json::json!({
                "userid": user_id,
                "name": name,
                "email": email,
            }))
            .send()
            .await?;

        Self::decode::<serde_json::Value>(response)
            .await?
            .into_ack()?;
        Ok(())
    }

    /// Change a user's password.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the change.
    #[instrument(skip(self, password))]
    pub async fn change_password(
        &self,
        user_id: UserId,
        password: &str,
    ) -> Result<(), AgrigenError> {
        let response = self
            .inner
            .client
            .put(self.controller("profile"))
            .json(&serde_json::json!({
                "userid": user_id,
                "password": password,
            }))
            .send()
            .await?;

        Self::decode::<serde_json::Value>(response)
            .await?
            .into_ack()?;
        Ok(())
    }

    // =========================================================================
    // Marketplace
    // =========================================================================

    /// Fetch the full marketplace listing.
    ///
    /// The whole catalog comes back in one response; category and search
    /// filters are applied in memory by the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the envelope is rejected.
    #[instrument(skip(self))]
    pub async fn marketplace(&self) -> Result<Vec<MarketProduct>, AgrigenError> {
        let response = self
            .inner
            .client
            .get(self.controller("marketplace"))
            .send()
            .await?;
        Self::decode_list(response).await
    }

    /// Fetch a single product by id.
    ///
    /// # Errors
    ///
    /// Returns [`AgrigenError::NotFound`] if the product does not exist.
    #[instrument(skip(self))]
    pub async fn product_details(&self, id: ProductId) -> Result<Product, AgrigenError> {
        let response = self
            .inner
            .client
            .get(self.controller("productdetails"))
            .query(&[("id", id.to_string())])
            .send()
            .await?;

        Self::decode::<Product>(response)
            .await?
            .into_result()
            .map_err(|failure| match failure {
                ApiFailure::MissingData => AgrigenError::NotFound(format!("product {id}")),
                other => AgrigenError::Api(other),
            })
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Fetch the cart for a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the envelope is rejected.
    #[instrument(skip(self))]
    pub async fn cart_items(&self, user_id: UserId) -> Result<Vec<CartItem>, AgrigenError> {
        let response = self
            .inner
            .client
            .get(self.controller("cart"))
            .query(&[("user_id", user_id.to_string())])
            .send()
            .await?;
        Self::decode_list(response).await
    }

    /// Add a line item to the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the item.
    #[instrument(skip(self, item), fields(product_id = %item.product_id))]
    pub async fn add_cart_item(&self, item: &NewCartItem) -> Result<(), AgrigenError> {
        let response = self
            .inner
            .client
            .post(self.controller("cart"))
            .json(item)
            .send()
            .await?;

        Self::decode::<serde_json::Value>(response)
            .await?
            .into_ack()?;
        Ok(())
    }

    /// Remove a line item from the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the removal.
    #[instrument(skip(self))]
    pub async fn remove_cart_item(&self, cart_id: CartItemId) -> Result<(), AgrigenError> {
        let response = self
            .inner
            .client
            .delete(self.controller("cart"))
            .query(&[("cart_id", cart_id.to_string())])
            .send()
            .await?;

        Self::decode::<serde_json::Value>(response)
            .await?
            .into_ack()?;
        Ok(())
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Fetch the order history for a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the envelope is rejected.
    #[instrument(skip(self))]
    pub async fn orders_for_user(&self, user_id: UserId) -> Result<Vec<Order>, AgrigenError> {
        let response = self
            .inner
            .client
            .get(self.controller("order"))
            .query(&[("user_id", user_id.to_string())])
            .send()
            .await?;
        Self::decode_list(response).await
    }

    /// Place an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the order.
    #[instrument(skip(self, payload), fields(user_id = %payload.user_id))]
    pub async fn place_order(&self, payload: &OrderPayload) -> Result<(), AgrigenError> {
        let response = self
            .inner
            .client
            .post(self.controller("order"))
            .json(payload)
            .send()
            .await?;

        Self::decode::<serde_json::Value>(response)
            .await?
            .into_ack()?;
        Ok(())
    }

    /// Fetch every order (admin view).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the envelope is rejected.
    #[instrument(skip(self))]
    pub async fn all_orders(&self) -> Result<Vec<AdminOrder>, AgrigenError> {
        let response = self
            .inner
            .client
            .get(self.controller("adminorders"))
            .send()
            .await?;
        Self::decode_list(response).await
    }

    /// Update the order or payment status of an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the update.
    #[instrument(skip(self, update), fields(order_id = %update.order_id))]
    pub async fn update_order_status(
        &self,
        update: &OrderStatusUpdate,
    ) -> Result<(), AgrigenError> {
        let response = self
            .inner
            .client
            .put(self.controller("adminorders"))
            .json(update)
            .send()
            .await?;

        Self::decode::<serde_json::Value>(response)
            .await?
            .into_ack()?;
        Ok(())
    }

    /// Delete an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the deletion.
    #[instrument(skip(self))]
    pub async fn delete_order(&self, order_id: OrderId) -> Result<(), AgrigenError> {
        let response = self
            .inner
            .client
            .delete(self.controller("adminorders"))
            .query(&[("order_id", order_id.to_string())])
            .send()
            .await?;

        Self::decode::<serde_json::Value>(response)
            .await?
            .into_ack()?;
        Ok(())
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Fetch every managed user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the envelope is rejected.
    #[instrument(skip(self))]
    pub async fn users(&self) -> Result<Vec<ManagedUser>, AgrigenError> {
        let response = self
            .inner
            .client
            .get(self.controller("usermanage"))
            .send()
            .await?;
        Self::decode_list(response).await
    }

    /// Create a managed user.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the user.
    #[instrument(skip(self, payload), fields(email = %payload.email))]
    pub async fn create_user(&self, payload: &UserPayload) -> Result<(), AgrigenError> {
        let response = self
            .inner
            .client
            .post(self.controller("usermanage"))
            .json(payload)
            .send()
            .await?;

        Self::decode::<serde_json::Value>(response)
            .await?
            .into_ack()?;
        Ok(())
    }

    /// Update a managed user.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the update.
    #[instrument(skip(self, payload), fields(email = %payload.email))]
    pub async fn update_user(&self, payload: &UserPayload) -> Result<(), AgrigenError> {
        let response = self
            .inner
            .client
            .put(self.controller("usermanage"))
            .json(payload)
            .send()
            .await?;

        Self::decode::<serde_json::Value>(response)
            .await?
            .into_ack()?;
        Ok(())
    }

    /// Delete a managed user.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the deletion.
    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: UserId) -> Result<(), AgrigenError> {
        let response = self
            .inner
            .client
            .delete(self.controller("usermanage"))
            .query(&[("id", id.to_string())])
            .send()
            .await?;

        Self::decode::<serde_json::Value>(response)
            .await?
            .into_ack()?;
        Ok(())
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// Fetch every category.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the envelope is rejected.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, AgrigenError> {
        let response = self
            .inner
            .client
            .get(self.controller("category"))
            .send()
            .await?;
        Self::decode_list(response).await
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the category.
    #[instrument(skip(self, payload), fields(name = %payload.name))]
    pub async fn create_category(&self, payload: &CategoryPayload) -> Result<(), AgrigenError> {
        let response = self
            .inner
            .client
            .post(self.controller("category"))
            .json(payload)
            .send()
            .await?;

        Self::decode::<serde_json::Value>(response)
            .await?
            .into_ack()?;
        Ok(())
    }

    /// Update a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the update.
    #[instrument(skip(self, payload), fields(name = %payload.name))]
    pub async fn update_category(&self, payload: &CategoryPayload) -> Result<(), AgrigenError> {
        let response = self
            .inner
            .client
            .put(self.controller("category"))
            .json(payload)
            .send()
            .await?;

        Self::decode::<serde_json::Value>(response)
            .await?
            .into_ack()?;
        Ok(())
    }

    /// Delete a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the deletion.
    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: CategoryId) -> Result<(), AgrigenError> {
        let response = self
            .inner
            .client
            .delete(self.controller("category"))
            .query(&[("id", id.to_string())])
            .send()
            .await?;

        Self::decode::<serde_json::Value>(response)
            .await?
            .into_ack()?;
        Ok(())
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Fetch products, optionally scoped by owning user.
    ///
    /// The scope parameter is advisory: the backend has been observed to
    /// return other suppliers' records regardless, so callers that need a
    /// strict scope must filter again on their side.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the envelope is rejected.
    #[instrument(skip(self))]
    pub async fn products(&self, user_id: Option<UserId>) -> Result<Vec<Product>, AgrigenError> {
        let mut request = self.inner.client.get(self.controller("product"));
        if let Some(user_id) = user_id {
            request = request.query(&[("user_id", user_id.to_string())]);
        }
        let response = request.send().await?;
        Self::decode_list(response).await
    }

    /// Create a product (multipart, optional image).
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the product.
    #[instrument(skip(self, form), fields(name = %form.name))]
    pub async fn create_product(&self, form: &ProductForm) -> Result<(), AgrigenError> {
        let response = self
            .inner
            .client
            .post(self.controller("product"))
            .multipart(form.to_multipart())
            .send()
            .await?;

        Self::decode::<serde_json::Value>(response)
            .await?
            .into_ack()?;
        Ok(())
    }

    /// Update a product (multipart, optional image).
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the update.
    #[instrument(skip(self, form), fields(name = %form.name))]
    pub async fn update_product(&self, form: &ProductForm) -> Result<(), AgrigenError> {
        let response = self
            .inner
            .client
            .put(self.controller("product"))
            .multipart(form.to_multipart())
            .send()
            .await?;

        Self::decode::<serde_json::Value>(response)
            .await?
            .into_ack()?;
        Ok(())
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the deletion.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: ProductId) -> Result<(), AgrigenError> {
        let response = self
            .inner
            .client
            .delete(self.controller("product"))
            .query(&[("id", id.to_string())])
            .send()
            .await?;

        Self::decode::<serde_json::Value>(response)
            .await?
            .into_ack()?;
        Ok(())
    }

    // =========================================================================
    // Crops
    // =========================================================================

    /// Fetch every crop guide record.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the envelope is rejected.
    #[instrument(skip(self))]
    pub async fn crops(&self) -> Result<Vec<Crop>, AgrigenError> {
        let response = self
            .inner
            .client
            .get(self.controller("crop"))
            .send()
            .await?;
        Self::decode_list(response).await
    }

    /// Create a crop (multipart, optional image).
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the crop.
    #[instrument(skip(self, form), fields(name = %form.name))]
    pub async fn create_crop(&self, form: &CropForm) -> Result<(), AgrigenError> {
        let response = self
            .inner
            .client
            .post(self.controller("crop"))
            .multipart(form.to_multipart())
            .send()
            .await?;

        Self::decode::<serde_json::Value>(response)
            .await?
            .into_ack()?;
        Ok(())
    }

    /// Update a crop.
    ///
    /// The crop controller encodes update-intent as a `_method=PUT` query
    /// override on a `POST`, unlike the other multipart endpoints.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the update.
    #[instrument(skip(self, form), fields(name = %form.name))]
    pub async fn update_crop(&self, form: &CropForm) -> Result<(), AgrigenError> {
        let response = self
            .inner
            .client
            .post(self.controller("crop"))
            .query(&[("_method", "PUT")])
            .multipart(form.to_multipart())
            .send()
            .await?;

        Self::decode::<serde_json::Value>(response)
            .await?
            .into_ack()?;
        Ok(())
    }

    /// Delete a crop.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the deletion.
    #[instrument(skip(self))]
    pub async fn delete_crop(&self, id: CropId) -> Result<(), AgrigenError> {
        let response = self
            .inner
            .client
            .delete(self.controller("crop"))
            .query(&[("id", id.to_string())])
            .send()
            .await?;

        Self::decode::<serde_json::Value>(response)
            .await?
            .into_ack()?;
        Ok(())
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    /// Fetch every notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is unreadable.
    #[instrument(skip(self))]
    pub async fn notifications(&self) -> Result<Vec<Notification>, AgrigenError> {
        let response = self
            .inner
            .client
            .get(self.controller("notification"))
            .send()
            .await?;
        Self::decode_list(response).await
    }

    /// Set the read flag on a notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the update.
    #[instrument(skip(self))]
    pub async fn mark_notification(
        &self,
        id: NotificationId,
        is_read: bool,
    ) -> Result<(), AgrigenError> {
        let response = self
            .inner
            .client
            .put(self.controller("notification"))
            .json(&serde_json::json!({
                "notification_id": id,
                "is_read": u8::from(is_read),
            }))
            .send()
            .await?;

        Self::decode::<serde_json::Value>(response)
            .await?
            .into_ack()?;
        Ok(())
    }

    /// Delete a notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the deletion.
    #[instrument(skip(self))]
    pub async fn delete_notification(&self, id: NotificationId) -> Result<(), AgrigenError> {
        let response = self
            .inner
            .client
            .delete(self.controller("notification"))
            .query(&[("notification_id", id.to_string())])
            .send()
            .await?;

        Self::decode::<serde_json::Value>(response)
            .await?
            .into_ack()?;
        Ok(())
    }

    // =========================================================================
    // Dashboard
    // =========================================================================

    /// Fetch the admin dashboard counters.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the envelope is rejected.
    #[instrument(skip(self))]
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, AgrigenError> {
        let response = self
            .inner
            .client
            .get(self.controller("admin"))
            .send()
            .await?;

        Ok(Self::decode::<DashboardStats>(response)
            .await?
            .into_result()?)
    }

    /// Whether the backend answers at all; used by the readiness probe.
    pub async fn ping(&self) -> bool {
        self.inner
            .client
            .get(self.controller("marketplace"))
            .send()
            .await
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_controller_url_shape() {
        let client = AgrigenClient::new("https://api.agrizen.example/");
        assert_eq!(
            client.controller("cart"),
            "https://api.agrizen.example/adminController/cartController.php"
        );
    }

    #[test]
    fn test_upload_url_shape() {
        let client = AgrigenClient::new("https://api.agrizen.example");
        assert_eq!(
            client.upload_url("products", "wheat.jpg"),
            "https://api.agrizen.example/uploads/products/wheat.jpg"
        );
        assert_eq!(
            client.upload_url("crops", "rice.png"),
            "https://api.agrizen.example/uploads/crops/rice.png"
        );
    }
}

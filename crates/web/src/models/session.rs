//! Session-related types.
//!
//! Types stored in the session for authentication and cached page state.

use agrizen_core::{Role, UserId};
use serde::{Deserialize, Serialize};

/// Session-stored user identity.
///
/// Created on login or registration, rewritten on profile edit, removed on
/// logout. Its presence is the sole client-side authorization signal; the
/// backend re-validates every mutating call on its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's backend ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Marketplace role.
    pub role: Role,
}

impl CurrentUser {
    /// Whether this user may enter the admin dashboard.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Whether this user may enter the supplier dashboard.
    #[must_use]
    pub fn is_supplier(&self) -> bool {
        self.role == Role::Supplier
    }
}

/// Session keys for cached state.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the mirror of the last cart fetch.
    pub const CART_SNAPSHOT: &str = "cart_snapshot";

    /// Key for the locally kept shipping address book.
    pub const ADDRESSES: &str = "addresses";
}

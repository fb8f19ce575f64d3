//! Navigation shell data.
//!
//! The chrome variant is decided by the router (dashboard routes render
//! the sidebar layout, everything else the public navbar), and this module
//! supplies what each variant needs: the logged-in user plus the cart
//! badge for the navbar, and the static role-keyed menu for the sidebar.

use agrizen_core::Role;
use tower_sessions::Session;

use crate::models::cart::CartSnapshot;
use crate::models::session::{CurrentUser, keys};

/// Context for the public chrome (navbar and footer).
#[derive(Debug, Clone, Default)]
pub struct Nav {
    /// Logged-in user, if any.
    pub user: Option<CurrentUser>,
    /// Cart badge count, from the session's cart snapshot.
    pub cart_count: usize,
}

impl Nav {
    /// Read the chrome context out of the session.
    ///
    /// Malformed stored values read as "no session" / "empty cart".
    pub async fn load(session: &Session) -> Self {
        let user = session
            .get::<CurrentUser>(keys::CURRENT_USER)
            .await
            .ok()
            .flatten();
        let cart_count = session
            .get::<CartSnapshot>(keys::CART_SNAPSHOT)
            .await
            .ok()
            .flatten()
            .map_or(0, |snapshot| snapshot.count);

        Self { user, cart_count }
    }
}

/// One sidebar entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    /// Icon name rendered by the sidebar template.
    pub icon: &'static str,
    /// Display label.
    pub label: &'static str,
    /// Route path; also used for active-item highlighting.
    pub path: &'static str,
}

const ADMIN_MENU: &[MenuItem] = &[
    MenuItem { icon: "home", label: "Dashboard", path: "/admin/dashboard" },
    MenuItem { icon: "user", label: "Profile", path: "/admin/profile" },
    MenuItem { icon: "users", label: "User Management", path: "/admin/users" },
    MenuItem { icon: "folder", label: "Categories", path: "/admin/categories" },
    MenuItem { icon: "package", label: "Products", path: "/admin/products" },
    MenuItem { icon: "sprout", label: "Crop Management", path: "/admin/crops" },
    MenuItem { icon: "cart", label: "Orders", path: "/admin/orders" },
    MenuItem { icon: "bell", label: "Notifications", path: "/admin/notifications" },
];

const SUPPLIER_MENU: &[MenuItem] = &[
    MenuItem { icon: "home", label: "Dashboard", path: "/supplier/dashboard" },
    MenuItem { icon: "user", label: "Profile", path: "/supplier/profile" },
    MenuItem { icon: "folder", label: "Categories", path: "/supplier/categories" },
    MenuItem { icon: "package", label: "My Products", path: "/supplier/products" },
    MenuItem { icon: "cart", label: "Orders", path: "/supplier/orders" },
];

/// The static sidebar menu for a dashboard role.
///
/// Farmers have no dashboard; their entry points live in the public
/// navbar, so their menu is empty.
#[must_use]
pub fn sidebar_items(role: Role) -> &'static [MenuItem] {
    match role {
        Role::Admin => ADMIN_MENU,
        Role::Supplier => SUPPLIER_MENU,
        Role::Farmer => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_menu_covers_every_panel() {
        let paths: Vec<&str> = sidebar_items(Role::Admin).iter().map(|i| i.path).collect();
        assert!(paths.contains(&"/admin/users"));
        assert!(paths.contains(&"/admin/categories"));
        assert!(paths.contains(&"/admin/products"));
        assert!(paths.contains(&"/admin/crops"));
        assert!(paths.contains(&"/admin/orders"));
        assert!(paths.contains(&"/admin/notifications"));
        assert!(paths.iter().all(|p| p.starts_with("/admin/")));
    }

    #[test]
    fn test_supplier_menu_is_the_scoped_subset() {
        let labels: Vec<&str> = sidebar_items(Role::Supplier)
            .iter()
            .map(|i| i.label)
            .collect();
        assert!(labels.contains(&"My Products"));
        assert!(!labels.contains(&"User Management"));
        assert!(!labels.contains(&"Notifications"));
        assert!(
            sidebar_items(Role::Supplier)
                .iter()
                .all(|i| i.path.starts_with("/supplier/"))
        );
    }

    #[test]
    fn test_farmers_have_no_sidebar() {
        assert!(sidebar_items(Role::Farmer).is_empty());
    }
}

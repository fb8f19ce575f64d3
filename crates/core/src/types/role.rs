//! Marketplace roles.

use serde::{Deserialize, Serialize};

/// Role of an authenticated user.
///
/// The role decides which dashboard a user lands on after login and which
/// route families the guards admit. These three values are the complete
/// recognized set; the backend echoes them back capitalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Marketplace customer: browse, cart, checkout, order history.
    Farmer,
    /// Full back-office access.
    Admin,
    /// Scoped back-office access limited to the supplier's own records.
    Supplier,
}

impl Role {
    /// Every recognized role.
    pub const ALL: [Self; 3] = [Self::Farmer, Self::Admin, Self::Supplier];

    /// Wire representation, as the backend emits it.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Farmer => "Farmer",
            Self::Admin => "Admin",
            Self::Supplier => "Supplier",
        }
    }

    /// Where a user of this role lands after a successful login.
    #[must_use]
    pub const fn landing_path(self) -> &'static str {
        match self {
            Self::Farmer => "/",
            Self::Admin => "/admin/dashboard",
            Self::Supplier => "/supplier/dashboard",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    // Case-insensitive: the registration form submits lowercase role
    // values while the login response capitalizes them.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "farmer" => Ok(Self::Farmer),
            "admin" => Ok(Self::Admin),
            "supplier" => Ok(Self::Supplier),
            _ => Err(format!("unrecognized role: {s}")),
        }
    }
}

impl Serialize for Role {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_wire_form() {
        for role in Role::ALL {
            let json = serde_json::to_string(&role).unwrap();
            let parsed: Role = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("farmer".parse::<Role>().unwrap(), Role::Farmer);
        assert_eq!("Admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("SUPPLIER".parse::<Role>().unwrap(), Role::Supplier);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!("manager".parse::<Role>().is_err());
        assert!(serde_json::from_str::<Role>("\"root\"").is_err());
    }

    #[test]
    fn test_landing_paths() {
        assert_eq!(Role::Farmer.landing_path(), "/");
        assert_eq!(Role::Admin.landing_path(), "/admin/dashboard");
        assert_eq!(Role::Supplier.landing_path(), "/supplier/dashboard");
    }
}

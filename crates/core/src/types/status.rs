//! Status vocabularies for catalog and order records.
//!
//! Fetched records keep their statuses as plain strings, since the backend
//! owns that data and is free-form about it. These enums exist for the
//! values the UI itself offers: form select options and the order-status
//! dropdowns in the admin panel.

use serde::{Deserialize, Serialize};

/// Publication status of a catalog record (category, product).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RecordStatus {
    #[default]
    Active,
    Inactive,
}

impl RecordStatus {
    /// Select options offered by the panel forms.
    pub const ALL: [Self; 2] = [Self::Active, Self::Inactive];

    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

/// Fulfillment state of an order, as offered by the admin dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Select options offered by the admin orders panel.
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::Processing,
        Self::Completed,
        Self::Cancelled,
    ];

    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }
}

/// Payment state of an order, as offered by the admin dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    Paid,
    Failed,
    Refunded,
}

impl PaymentStatus {
    /// Select options offered by the admin orders panel.
    pub const ALL: [Self; 4] = [Self::Unpaid, Self::Paid, Self::Failed, Self::Refunded];

    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unpaid => "Unpaid",
            Self::Paid => "Paid",
            Self::Failed => "Failed",
            Self::Refunded => "Refunded",
        }
    }
}

/// How an order is paid for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PaymentMethod {
    /// Cash on delivery: the order is created directly.
    #[default]
    Cod,
    /// Card payment: card details are tokenized first, and the token is
    /// submitted with the order.
    Stripe,
}

impl PaymentMethod {
    /// Wire representation, matching the order payload contract.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cod => "cod",
            Self::Stripe => "stripe",
        }
    }
}

macro_rules! string_enum_impls {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(format!(concat!("unrecognized ", stringify!($name), ": {}"), s)),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

string_enum_impls!(RecordStatus {
    Active => "active",
    Inactive => "inactive",
});

string_enum_impls!(OrderStatus {
    Pending => "pending",
    Processing => "processing",
    Completed => "completed",
    Cancelled => "cancelled",
});

string_enum_impls!(PaymentStatus {
    Unpaid => "unpaid",
    Paid => "paid",
    Failed => "failed",
    Refunded => "refunded",
});

string_enum_impls!(PaymentMethod {
    Cod => "cod",
    Stripe => "stripe",
});

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_record_status_wire_form() {
        assert_eq!(RecordStatus::Active.to_string(), "active");
        assert_eq!("Inactive".parse::<RecordStatus>().unwrap(), RecordStatus::Inactive);
    }

    #[test]
    fn test_order_status_options_match_dropdown() {
        let options: Vec<&str> = OrderStatus::ALL.iter().map(|s| s.as_str()).collect();
        assert_eq!(options, ["Pending", "Processing", "Completed", "Cancelled"]);
    }

    #[test]
    fn test_payment_status_parse() {
        assert_eq!("paid".parse::<PaymentStatus>().unwrap(), PaymentStatus::Paid);
        assert!("settled".parse::<PaymentStatus>().is_err());
    }

    #[test]
    fn test_payment_method_wire_form() {
        assert_eq!(PaymentMethod::Cod.as_str(), "cod");
        assert_eq!(PaymentMethod::Stripe.as_str(), "stripe");
        assert_eq!("COD".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cod);
    }

    #[test]
    fn test_serde_roundtrip() {
        let json = serde_json::to_string(&OrderStatus::Processing).unwrap();
        assert_eq!(json, "\"Processing\"");
        let parsed: OrderStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, OrderStatus::Processing);
    }
}

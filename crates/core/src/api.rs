//! Wire envelope for the AgriZen backend API.
//!
//! Every controller responds with a JSON body of the shape
//! `{status, message?, data?}` where `status` is an HTTP-like code that
//! signals success regardless of the transport-level status. The envelope
//! must be parsed before the transport response is trusted.
//!
//! The backend is duck-typed: `status` arrives as a number on some
//! endpoints and as a string on others, and numeric record fields (ids,
//! prices, quantities, flags) show the same inconsistency. The flexible
//! deserializers in this module normalize all of those shapes once, so the
//! rest of the codebase only ever sees one discriminated result type.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Fallback message when the backend rejects a request without explanation.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// Application-level failure reported inside an otherwise successful
/// HTTP response.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiFailure {
    /// The envelope carried a non-200 status.
    #[error("{message}")]
    Rejected {
        /// HTTP-like code from the envelope's `status` field.
        status: u16,
        /// Server-provided message, or [`GENERIC_FAILURE`].
        message: String,
    },

    /// The envelope reported success but carried no `data` payload.
    #[error("response reported success but carried no data")]
    MissingData,
}

/// Response envelope shared by every backend controller.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    /// HTTP-like status code; `200` signals success.
    #[serde(deserialize_with = "status_code")]
    pub status: u16,
    /// Human-readable outcome description.
    #[serde(default)]
    pub message: Option<String>,
    /// Resource payload; absent on most mutations.
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Whether the envelope signals success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status == 200
    }

    /// Normalize into `Ok(data)` or `Err(message)`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiFailure::Rejected`] for a non-200 envelope status and
    /// [`ApiFailure::MissingData`] when a successful envelope carries no
    /// payload.
    pub fn into_result(self) -> Result<T, ApiFailure> {
        if !self.is_success() {
            return Err(self.rejection());
        }
        self.data.ok_or(ApiFailure::MissingData)
    }

    /// Normalize a data-less acknowledgement (create/update/delete).
    ///
    /// Returns the server message on success, since several flows surface
    /// it to the user verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`ApiFailure::Rejected`] for a non-200 envelope status.
    pub fn into_ack(self) -> Result<Option<String>, ApiFailure> {
        if !self.is_success() {
            return Err(self.rejection());
        }
        Ok(self.message)
    }

    fn rejection(self) -> ApiFailure {
        ApiFailure::Rejected {
            status: self.status,
            message: self
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| GENERIC_FAILURE.to_string()),
        }
    }
}

/// List response that tolerates both the standard envelope and the bare
/// JSON array one controller (notifications) responds with.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    /// `{status, message?, data?}` with an array payload.
    Enveloped(Envelope<Vec<T>>),
    /// A bare JSON array with no envelope at all.
    Bare(Vec<T>),
}

impl<T> ListResponse<T> {
    /// Normalize into the fetched collection.
    ///
    /// A successful envelope with `data` absent or `null` is an empty
    /// collection, matching how the pages treated `data.data || []`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiFailure::Rejected`] for a non-200 envelope status.
    pub fn into_result(self) -> Result<Vec<T>, ApiFailure> {
        match self {
            Self::Bare(items) => Ok(items),
            Self::Enveloped(envelope) => {
                if !envelope.is_success() {
                    return Err(envelope.rejection());
                }
                Ok(envelope.data.unwrap_or_default())
            }
        }
    }
}

// =============================================================================
// Flexible field deserializers
// =============================================================================

/// A JSON value that should be a number but may arrive as a string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    /// Native integer.
    Int(i64),
    /// Native float.
    Float(f64),
    /// Stringly-typed number, e.g. `"200"` or `"12.50"`.
    Text(String),
}

impl RawNumber {
    /// Interpret as an integer.
    ///
    /// # Errors
    ///
    /// Returns a description of the offending value when it is not an
    /// integer in any representation.
    pub fn as_i64(&self) -> Result<i64, String> {
        match self {
            Self::Int(n) => Ok(*n),
            Self::Float(f) => Err(format!("expected an integer, got {f}")),
            Self::Text(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| format!("expected an integer, got {s:?}")),
        }
    }

    /// Interpret as an exact decimal.
    ///
    /// # Errors
    ///
    /// Returns a description of the offending value when it cannot be
    /// represented as a decimal.
    pub fn as_decimal(&self) -> Result<Decimal, String> {
        match self {
            Self::Int(n) => Ok(Decimal::from(*n)),
            Self::Float(f) => {
                Decimal::try_from(*f).map_err(|_| format!("expected a decimal, got {f}"))
            }
            Self::Text(s) => s
                .trim()
                .parse::<Decimal>()
                .map_err(|_| format!("expected a decimal, got {s:?}")),
        }
    }
}

/// Deserialize an HTTP-like status code from a number or string.
///
/// # Errors
///
/// Returns a deserialization error when the value is not a code in either
/// representation.
pub fn status_code<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = RawNumber::deserialize(deserializer)?;
    let n = raw.as_i64().map_err(serde::de::Error::custom)?;
    u16::try_from(n).map_err(|_| serde::de::Error::custom(format!("status out of range: {n}")))
}

/// Deserialize an `i32` from a number or string.
///
/// # Errors
///
/// Returns a deserialization error for non-integer values.
pub fn flex_i32<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = RawNumber::deserialize(deserializer)?;
    let n = raw.as_i64().map_err(serde::de::Error::custom)?;
    i32::try_from(n).map_err(|_| serde::de::Error::custom(format!("value out of range: {n}")))
}

/// Deserialize a `u32` from a number or string.
///
/// # Errors
///
/// Returns a deserialization error for negative or non-integer values.
pub fn flex_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = RawNumber::deserialize(deserializer)?;
    let n = raw.as_i64().map_err(serde::de::Error::custom)?;
    u32::try_from(n).map_err(|_| serde::de::Error::custom(format!("value out of range: {n}")))
}

/// Deserialize a [`Decimal`] from a number or string.
///
/// # Errors
///
/// Returns a deserialization error for values with no decimal
/// representation.
pub fn flex_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = RawNumber::deserialize(deserializer)?;
    raw.as_decimal().map_err(serde::de::Error::custom)
}

/// Deserialize a boolean flag from `true`/`false`, `0`/`1`, or `"0"`/`"1"`.
///
/// # Errors
///
/// Returns a deserialization error for unrecognized flag values.
pub fn flex_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawFlag {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    match RawFlag::deserialize(deserializer)? {
        RawFlag::Bool(b) => Ok(b),
        RawFlag::Int(n) => Ok(n != 0),
        RawFlag::Text(s) => match s.trim() {
            "0" | "false" | "" => Ok(false),
            "1" | "true" => Ok(true),
            other => Err(serde::de::Error::custom(format!(
                "expected a flag, got {other:?}"
            ))),
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        name: String,
    }

    #[test]
    fn test_envelope_numeric_status() {
        let envelope: Envelope<Item> =
            serde_json::from_str(r#"{"status":200,"data":{"name":"Wheat"}}"#).unwrap();
        assert_eq!(
            envelope.into_result().unwrap(),
            Item {
                name: "Wheat".to_string()
            }
        );
    }

    #[test]
    fn test_envelope_string_status() {
        let envelope: Envelope<Item> =
            serde_json::from_str(r#"{"status":"200","message":"ok","data":{"name":"Rice"}}"#)
                .unwrap();
        assert!(envelope.is_success());
    }

    #[test]
    fn test_envelope_rejection_carries_message() {
        let envelope: Envelope<Item> =
            serde_json::from_str(r#"{"status":401,"message":"Invalid credentials"}"#).unwrap();
        let err = envelope.into_result().unwrap_err();
        assert_eq!(
            err,
            ApiFailure::Rejected {
                status: 401,
                message: "Invalid credentials".to_string(),
            }
        );
        assert_eq!(err.to_string(), "Invalid credentials");
    }

    #[test]
    fn test_envelope_rejection_generic_fallback() {
        let envelope: Envelope<Item> = serde_json::from_str(r#"{"status":"500"}"#).unwrap();
        let err = envelope.into_result().unwrap_err();
        assert_eq!(err.to_string(), GENERIC_FAILURE);
    }

    #[test]
    fn test_envelope_success_without_data() {
        let envelope: Envelope<Item> =
            serde_json::from_str(r#"{"status":200,"message":"Deleted"}"#).unwrap();
        assert_eq!(envelope.into_ack().unwrap(), Some("Deleted".to_string()));

        let envelope: Envelope<Item> = serde_json::from_str(r#"{"status":200}"#).unwrap();
        assert_eq!(envelope.into_result().unwrap_err(), ApiFailure::MissingData);
    }

    #[test]
    fn test_list_response_enveloped() {
        let list: ListResponse<Item> =
            serde_json::from_str(r#"{"status":200,"data":[{"name":"Maize"}]}"#).unwrap();
        assert_eq!(list.into_result().unwrap().len(), 1);
    }

    #[test]
    fn test_list_response_bare_array() {
        // The notification controller skips the envelope entirely.
        let list: ListResponse<Item> =
            serde_json::from_str(r#"[{"name":"a"},{"name":"b"}]"#).unwrap();
        assert_eq!(list.into_result().unwrap().len(), 2);
    }

    #[test]
    fn test_list_response_null_data_is_empty() {
        let list: ListResponse<Item> =
            serde_json::from_str(r#"{"status":200,"data":null}"#).unwrap();
        assert!(list.into_result().unwrap().is_empty());
    }

    #[test]
    fn test_list_response_rejection() {
        let list: ListResponse<Item> =
            serde_json::from_str(r#"{"status":"404","message":"No records"}"#).unwrap();
        assert!(list.into_result().is_err());
    }

    #[derive(Debug, Deserialize)]
    struct Priced {
        #[serde(deserialize_with = "flex_decimal")]
        price: Decimal,
        #[serde(deserialize_with = "flex_u32")]
        quantity: u32,
    }

    #[test]
    fn test_flex_decimal_from_string_and_number() {
        let a: Priced = serde_json::from_str(r#"{"price":"12.50","quantity":"3"}"#).unwrap();
        assert_eq!(a.price, Decimal::new(1250, 2));
        assert_eq!(a.quantity, 3);

        let b: Priced = serde_json::from_str(r#"{"price":12.5,"quantity":3}"#).unwrap();
        assert_eq!(b.price.round_dp(2), Decimal::new(1250, 2));
    }

    #[test]
    fn test_flex_decimal_rejects_garbage() {
        let result: Result<Priced, _> =
            serde_json::from_str(r#"{"price":"twelve","quantity":1}"#);
        assert!(result.is_err());
    }

    #[derive(Debug, Deserialize)]
    struct Flagged {
        #[serde(deserialize_with = "flex_bool")]
        is_read: bool,
    }

    #[test]
    fn test_flex_bool_variants() {
        for (json, expected) in [
            (r#"{"is_read":1}"#, true),
            (r#"{"is_read":0}"#, false),
            (r#"{"is_read":"1"}"#, true),
            (r#"{"is_read":"0"}"#, false),
            (r#"{"is_read":true}"#, true),
        ] {
            let flagged: Flagged = serde_json::from_str(json).unwrap();
            assert_eq!(flagged.is_read, expected, "input: {json}");
        }
    }
}

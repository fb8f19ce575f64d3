//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Format an amount as a dollar price.
///
/// Usage in templates: `{{ item.price|money }}`
#[askama::filter_fn]
pub fn money(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format!("${value:.2}"))
}

/// Format a backend timestamp (`YYYY-MM-DD HH:MM:SS`) for display.
///
/// Falls back to the raw value when the timestamp does not parse, since
/// the backend is not consistent about the field.
///
/// Usage in templates: `{{ order.created_at|date }}`
#[askama::filter_fn]
pub fn date(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let raw = value.to_string();
    let formatted = chrono::NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.format("%b %e, %Y").to_string());
    Ok(formatted.unwrap_or(raw))
}

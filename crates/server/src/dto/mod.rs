//! # Data Transfer Objects
//!
//! Request and response types for the HTTP API, plus the serde helpers they share.

pub mod auth;
pub mod companies;
pub mod dashboard;
pub mod leads;
pub mod mobile;
pub mod users;
pub mod visitors;

use std::{fmt::Display, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize};

/// Default page size for admin lists.
pub const DEFAULT_PAGE_SIZE: u64 = 50;
/// Largest page a client may request.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Page and limit shared by every list endpoint
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
    #[serde(default, deserialize_with = "query_opt")]
    pub page:  Option<u64>,
    #[serde(default, deserialize_with = "query_opt")]
    pub limit: Option<u64>,
}

impl PageParams {
    /// Page number (1-based, default: 1)
    pub fn page(&self) -> u64 { self.page.unwrap_or(1).max(1) }

    /// Items per page, clamped to `1..=100`
    pub fn limit_or(&self, default: u64) -> u64 { self.limit.unwrap_or(default).clamp(1, MAX_PAGE_SIZE) }

    /// Items per page with the admin default of 50
    pub fn limit(&self) -> u64 { self.limit_or(DEFAULT_PAGE_SIZE) }
}

/// Body for mutations that only acknowledge
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Deserialize an optional JSON value, treating `null` and blank strings as absent.
///
/// Form-driven clients send `""` for untouched optional inputs.
pub fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(value) => T::deserialize(value).map(Some).map_err(de::Error::custom),
    }
}

/// Deserialize a patch field: absent stays `None`, `null` or blank becomes `Some(None)`.
///
/// Pair with `#[serde(default)]`.
pub fn patch_field<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    blank_as_none(deserializer).map(Some)
}

/// Deserialize an optional query parameter through `FromStr`, treating blank values as absent.
pub fn query_opt<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => raw.trim().parse().map(Some).map_err(de::Error::custom),
        _ => Ok(None),
    }
}

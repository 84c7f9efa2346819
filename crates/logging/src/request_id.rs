//! # Request ID Tracking
//!
//! Request identifiers attached to every HTTP request and its tracing span.
//! Uses CUID2 for collision-resistant, URL-safe identifiers.

/// Header carrying the request ID in both directions.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// A request ID type using CUID2.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(String);

impl RequestId {
    /// Generate a new random request ID.
    #[inline]
    pub fn new() -> Self { Self(cuid2::create_id()) }

    /// Accept a caller-supplied ID if it looks sane: 8 to 64 characters of
    /// ASCII alphanumerics, `-` or `_`.
    pub fn from_header(value: &str) -> Option<Self> {
        let value = value.trim();
        let valid = (8 ..= 64).contains(&value.len()) &&
            value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        valid.then(|| Self(value.to_string()))
    }

    /// Get the request ID as a string.
    #[inline]
    pub fn as_str(&self) -> &str { &self.0 }

    /// Consume and return the inner string.
    #[inline]
    pub fn into_string(self) -> String { self.0 }
}

impl Default for RequestId {
    #[inline]
    fn default() -> Self { Self::new() }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(&self.0) }
}

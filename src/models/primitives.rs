//! Primitive types and newtypes for type-safe API interactions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A HubSpot deal's object ID.
///
/// HubSpot returns IDs as strings even though they are numeric.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DealId(String);

impl DealId {
    /// Create a new deal ID.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the deal ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DealId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for DealId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for DealId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for DealId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// An opaque continuation token returned in `paging.next.after`.
///
/// # Example
///
/// ```
/// use hubspot_deals::Cursor;
///
/// assert!(Cursor::new("").is_none());
/// assert_eq!(Cursor::new("12345").unwrap().as_str(), "12345");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    /// Create a cursor, or `None` for an empty token.
    pub fn new(s: impl Into<String>) -> Option<Self> {
        let s = s.into();
        if s.is_empty() {
            None
        } else {
            Some(Self(s))
        }
    }

    /// Get the token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Cursor {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Base URL of HubSpot's production API.
pub const DEFAULT_BASE_URL: &str = "https://api.hubapi.com";

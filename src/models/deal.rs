//! Deal records and the page envelope they arrive in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::primitives::{Cursor, DealId};

/// One HubSpot deal.
///
/// The client passes deals through without interpreting them. Fields that
/// HubSpot always sends are typed; anything else on the object is kept in
/// [`extra`](Self::extra) so a round trip loses nothing.
///
/// Only `id` is required. A timestamp or `archived` flag that does not have
/// the expected shape is left untyped in `extra` under its original key, and
/// a `null` or missing `properties` reads as an empty map, so one unusual
/// record never fails the page it arrived on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "Map<String, Value>")]
pub struct Deal {
    /// Object ID
    pub id: DealId,
    /// Requested properties, keyed by internal property name
    pub properties: Map<String, Value>,
    /// When the deal was created
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// When the deal was last modified
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Whether the deal is archived
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
    /// Any other top-level fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TryFrom<Map<String, Value>> for Deal {
    type Error = String;

    fn try_from(mut raw: Map<String, Value>) -> Result<Self, Self::Error> {
        let id = match raw.remove("id") {
            Some(Value::String(id)) => DealId::new(id),
            Some(Value::Number(id)) => DealId::new(id.to_string()),
            Some(other) => return Err(format!("deal id must be a string, got {}", other)),
            None => return Err("deal is missing an `id`".to_string()),
        };

        let properties = match raw.remove("properties") {
            Some(Value::Object(properties)) => properties,
            Some(Value::Null) | None => Map::new(),
            Some(other) => {
                tracing::warn!(deal = %id, "Ignoring non-object deal properties: {}", other);
                Map::new()
            }
        };

        let created_at = take_timestamp(&mut raw, "createdAt");
        let updated_at = take_timestamp(&mut raw, "updatedAt");
        let archived = match raw.remove("archived") {
            Some(Value::Bool(archived)) => Some(archived),
            Some(Value::Null) | None => None,
            Some(other) => {
                raw.insert("archived".to_string(), other);
                None
            }
        };

        Ok(Self {
            id,
            properties,
            created_at,
            updated_at,
            archived,
            extra: raw,
        })
    }
}

/// Remove and parse an RFC 3339 timestamp, putting it back untouched if it
/// does not parse.
fn take_timestamp(raw: &mut Map<String, Value>, key: &str) -> Option<DateTime<Utc>> {
    let value = raw.remove(key)?;
    let parsed = value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|t| t.with_timezone(&Utc));

    if parsed.is_none() && !value.is_null() {
        raw.insert(key.to_string(), value);
    }
    parsed
}

impl Deal {
    /// Look up a property as a string.
    ///
    /// Returns `None` when the property is missing, null, or not a string.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).and_then(Value::as_str)
    }

    /// The deal's display name (`dealname`), if requested and set.
    pub fn name(&self) -> Option<&str> {
        self.property("dealname")
    }
}

/// One page of the deals listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DealsPage {
    /// Deals on this page, in server order
    #[serde(default)]
    pub results: Vec<Deal>,
    /// Continuation metadata; absent on the last page
    #[serde(default)]
    pub paging: Option<Paging>,
}

impl DealsPage {
    /// The cursor for the following page, if there is one.
    pub fn next_cursor(&self) -> Option<Cursor> {
        self.paging
            .as_ref()
            .and_then(|p| p.next.as_ref())
            .and_then(|n| n.after.clone())
            .and_then(Cursor::new)
    }
}

/// The `paging` object of a list response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Paging {
    /// Link to the following page
    #[serde(default)]
    pub next: Option<NextPage>,
}

/// The `paging.next` object of a list response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NextPage {
    /// Continuation token
    #[serde(default)]
    pub after: Option<String>,
    /// Fully-qualified link to the next page
    #[serde(default)]
    pub link: Option<String>,
}

//! Wire types for the public JSON API
//!
//! Every object the API returns is a "thing": a `kind` tag plus a `data`
//! payload. Listings wrap a page of child things and a pagination cursor.
//! Payload fields are read leniently through the accessors at the bottom of
//! this file, because the API mixes types freely (`edited` is a bool or a
//! float, `replies` is an empty string or a listing, and so on).

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Kind tag of a comment
pub const KIND_COMMENT: &str = "t1";

/// Kind tag of a post (link or self post)
pub const KIND_POST: &str = "t3";

/// Kind tag of a "load more comments" placeholder
pub const KIND_MORE: &str = "more";

/// A tagged API object
#[derive(Debug, Clone, Deserialize)]
pub struct Thing {
    #[serde(default)]
    pub kind: String,

    #[serde(default)]
    pub data: Value,
}

impl Thing {
    /// Returns the payload as an object, if it is one
    pub fn fields(&self) -> Option<&Map<String, Value>> {
        self.data.as_object()
    }

    pub fn is_comment(&self) -> bool {
        self.kind == KIND_COMMENT
    }

    pub fn is_placeholder(&self) -> bool {
        self.kind == KIND_MORE
    }
}

/// One page of a listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Listing {
    /// Cursor for the next page; absent on the last page
    #[serde(default)]
    pub after: Option<String>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub children: Vec<Thing>,
}

/// The `{"kind": "Listing", "data": {...}}` envelope
#[derive(Debug, Clone, Deserialize)]
struct ListingEnvelope {
    data: Option<Listing>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Thing>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<Thing>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parses a listing envelope
///
/// # Returns
///
/// * `Ok(Listing)` - The page, possibly with no children
/// * `Err(String)` - The value is not a listing envelope
pub fn parse_listing(value: &Value) -> Result<Listing, String> {
    let envelope = ListingEnvelope::deserialize(value).map_err(|e| e.to_string())?;
    envelope
        .data
        .ok_or_else(|| "listing has no data object".to_string())
}

/// Parses the comments endpoint response: `[post listing, comment listing]`
///
/// Returns the children of the comment listing, i.e. the top level of the
/// reply tree.
pub fn parse_comment_page(value: &Value) -> Result<Vec<Thing>, String> {
    let parts = value
        .as_array()
        .ok_or_else(|| "expected a JSON array".to_string())?;

    if parts.len() < 2 {
        return Err(format!(
            "expected post and comment listings, got {} element(s)",
            parts.len()
        ));
    }

    Ok(parse_listing(&parts[1])?.children)
}

/// Returns the direct replies of a comment
///
/// `replies` is an empty string for leaf comments and a listing otherwise.
pub fn replies_of(fields: &Map<String, Value>) -> Vec<Thing> {
    match fields.get("replies") {
        Some(value @ Value::Object(_)) => parse_listing(value)
            .map(|listing| listing.children)
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// Reads a string field; any other JSON type counts as missing
pub fn str_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Reads an integer field; floats and strings count as missing
pub fn int_field(fields: &Map<String, Value>, key: &str) -> Option<i64> {
    fields.get(key).and_then(Value::as_i64)
}

/// Reads a numeric field as a float
pub fn float_field(fields: &Map<String, Value>, key: &str) -> Option<f64> {
    fields.get(key).and_then(Value::as_f64)
}

/// Reads a boolean field
pub fn bool_field(fields: &Map<String, Value>, key: &str) -> Option<bool> {
    fields.get(key).and_then(Value::as_bool)
}

/// Renders an epoch-seconds field as an RFC 3339 UTC timestamp
///
/// Accepts numbers and numeric strings.
pub fn timestamp_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    let epoch = match fields.get(key)? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    epoch_to_rfc3339(epoch)
}

fn epoch_to_rfc3339(epoch: f64) -> Option<String> {
    if !epoch.is_finite() {
        return None;
    }
    let secs = epoch.floor();
    let nanos = ((epoch - secs) * 1e9).round().min(999_999_999.0) as u32;
    let dt: DateTime<Utc> = DateTime::from_timestamp(secs as i64, nanos)?;
    // Whole seconds print bare, anything else with six fractional digits
    let format = if nanos == 0 {
        SecondsFormat::Secs
    } else {
        SecondsFormat::Micros
    };
    Some(dt.to_rfc3339_opts(format, false))
}

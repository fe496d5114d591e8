//! Decode boundary between the backing store's loosely-typed documents and
//! the strongly-typed domain records.
//!
//! The swipe feed and the restaurant fetch service both deliver free-form
//! JSON documents. Everything that enters the pipeline passes through this
//! module first: a document either becomes a fully validated record or is
//! rejected with a [`SwipeDataError`] naming the offending field. Batch
//! decoding of the swipe feed treats malformed entries as data hygiene, not
//! a fault: they are skipped with a warning and never counted.

use serde_json::Value;
use tracing::warn;

use crate::error::{Result, SwipeDataError};
use crate::geo::Coordinate;
use crate::types::{PriceTier, RestaurantRecord, SwipeRecord, Vote};

fn require_str<'a>(doc: &'a Value, field: &str) -> Result<&'a str> {
    doc.get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| SwipeDataError::MissingField {
            field: field.to_string(),
        })
}

fn require_i64(doc: &Value, field: &str) -> Result<i64> {
    doc.get(field)
        .and_then(Value::as_i64)
        .ok_or_else(|| SwipeDataError::MissingField {
            field: field.to_string(),
        })
}

fn require_f64(doc: &Value, field: &str) -> Result<f64> {
    doc.get(field)
        .and_then(Value::as_f64)
        .ok_or_else(|| SwipeDataError::MissingField {
            field: field.to_string(),
        })
}

/// Decode a single swipe document.
///
/// Required fields: `restaurantId` (non-empty string), `value` (+1 or -1),
/// `timestamp` (milliseconds since epoch).
pub fn decode_swipe(doc: &Value) -> Result<SwipeRecord> {
    let restaurant_id = require_str(doc, "restaurantId")?;
    if restaurant_id.is_empty() {
        return Err(SwipeDataError::InvalidValue {
            field: "restaurantId".to_string(),
            value: String::new(),
        });
    }
    let vote = Vote::from_value(require_i64(doc, "value")?)?;
    let timestamp_ms = require_i64(doc, "timestamp")?;

    Ok(SwipeRecord {
        restaurant_id: restaurant_id.to_string(),
        vote,
        timestamp_ms,
    })
}

/// Decode a batch of swipe documents, skipping malformed entries.
///
/// Skipped entries are logged at warn level and never reach the aggregator.
pub fn decode_swipes(docs: &[Value]) -> Vec<SwipeRecord> {
    let mut records = Vec::with_capacity(docs.len());
    for doc in docs {
        match decode_swipe(doc) {
            Ok(record) => records.push(record),
            Err(err) => warn!("skipping malformed swipe document: {err}"),
        }
    }
    records
}

/// Decode a restaurant document as returned by the fetch service.
///
/// Required fields: `id`, `name`, `latitude`, `longitude`. Cuisine tags,
/// price tier, and rating data are optional in the store and default to
/// empty/lowest values when absent; a present-but-invalid price tier is
/// still an error.
pub fn decode_restaurant(doc: &Value) -> Result<RestaurantRecord> {
    let id = require_str(doc, "id")?;
    if id.is_empty() {
        return Err(SwipeDataError::InvalidValue {
            field: "id".to_string(),
            value: String::new(),
        });
    }
    let name = require_str(doc, "name")?;
    let latitude = require_f64(doc, "latitude")?;
    let longitude = require_f64(doc, "longitude")?;

    let cuisines = doc
        .get("cuisines")
        .and_then(Value::as_array)
        .map(|tags| {
            tags.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let price = match doc.get("priceRange") {
        Some(value) => {
            let level = value.as_u64().ok_or_else(|| SwipeDataError::InvalidValue {
                field: "priceRange".to_string(),
                value: value.to_string(),
            })?;
            PriceTier::from_level(level)?
        }
        None => PriceTier::Casual,
    };

    let rating = doc.get("rating").and_then(Value::as_f64).unwrap_or(0.0) as f32;
    let rating_count = doc
        .get("ratingCount")
        .and_then(Value::as_u64)
        .unwrap_or(0) as u32;

    Ok(RestaurantRecord {
        id: id.to_string(),
        name: name.to_string(),
        cuisines,
        price,
        location: Coordinate::new(latitude, longitude),
        rating,
        rating_count,
    })
}

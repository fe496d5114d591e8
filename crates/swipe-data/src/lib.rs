//! # Swipe Data Crate
//!
//! Domain types and the decode boundary for the SwipeByte favourites engine.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (SwipeRecord, RestaurantRecord, UserPreferences)
//! - **geo**: Coordinate type and Haversine great-circle distance
//! - **document**: Validation of loosely-typed store documents into typed records
//! - **error**: Error types shared across the workspace
//!
//! ## Example Usage
//!
//! ```ignore
//! use swipe_data::{document, haversine_km, Coordinate};
//!
//! // Decode a batch of swipe documents from the live feed
//! let records = document::decode_swipes(&docs);
//!
//! // Distance between the user and a restaurant
//! let km = haversine_km(user_location, restaurant.location);
//! ```

// Public modules
pub mod document;
pub mod error;
pub mod geo;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{Result, SwipeDataError};
pub use geo::{haversine_km, Coordinate, EARTH_RADIUS_KM};
pub use types::{
    // Type aliases
    RestaurantId,
    TimestampMs,
    // Core types
    RestaurantRecord,
    SwipeRecord,
    UserPreferences,
    // Enums
    PriceTier,
    TimeWindow,
    Vote,
    // Constants
    RECENT_WINDOW_MS,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_window_is_one_day() {
        assert_eq!(RECENT_WINDOW_MS, 24 * 60 * 60 * 1000);
    }

    #[test]
    fn test_swipe_record_construction() {
        let record = SwipeRecord {
            restaurant_id: "r1".to_string(),
            vote: Vote::Like,
            timestamp_ms: 1_700_000_000_000,
        };
        assert_eq!(record.vote.value(), 1);
    }
}

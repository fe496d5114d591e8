//! Core domain types for the SwipeByte favourites engine.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SwipeDataError};
use crate::geo::Coordinate;

// =============================================================================
// Type Aliases
// =============================================================================

/// Opaque restaurant identifier, issued by the backing store.
pub type RestaurantId = String;

/// Milliseconds since the Unix epoch.
pub type TimestampMs = i64;

/// Length of the "recent" tally window in milliseconds (24 hours).
pub const RECENT_WINDOW_MS: i64 = 86_400_000;

// =============================================================================
// Swipe Types
// =============================================================================

/// Direction of a single swipe on a restaurant card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Vote {
    Like,
    Dislike,
}

impl Vote {
    /// Signed vote value: +1 for a like, -1 for a dislike.
    pub fn value(self) -> i64 {
        match self {
            Vote::Like => 1,
            Vote::Dislike => -1,
        }
    }

    /// Parse a raw vote value. Only +1 and -1 are valid.
    pub fn from_value(value: i64) -> Result<Self> {
        match value {
            1 => Ok(Vote::Like),
            -1 => Ok(Vote::Dislike),
            other => Err(SwipeDataError::InvalidVote(other)),
        }
    }
}

/// One user action on one restaurant, immutable once created.
///
/// Records are created by the swipe UI and persisted by the backing store;
/// the aggregator only ever reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwipeRecord {
    pub restaurant_id: RestaurantId,
    pub vote: Vote,
    pub timestamp_ms: TimestampMs,
}

/// Tally window selectable by the consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeWindow {
    AllTime,
    Last24Hours,
}

// =============================================================================
// Restaurant Types
// =============================================================================

/// Price tier as displayed on a restaurant card ($ through $$$$).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriceTier {
    Budget,
    Casual,
    Upscale,
    Fine,
}

impl PriceTier {
    /// Parse the numeric tier stored in restaurant documents (1..=4).
    pub fn from_level(level: u64) -> Result<Self> {
        match level {
            1 => Ok(PriceTier::Budget),
            2 => Ok(PriceTier::Casual),
            3 => Ok(PriceTier::Upscale),
            4 => Ok(PriceTier::Fine),
            other => Err(SwipeDataError::InvalidPriceTier(other)),
        }
    }

    pub fn level(self) -> u64 {
        match self {
            PriceTier::Budget => 1,
            PriceTier::Casual => 2,
            PriceTier::Upscale => 3,
            PriceTier::Fine => 4,
        }
    }
}

/// Descriptive restaurant entity as returned by the fetch service.
///
/// Net votes and distance are attached downstream at ranking time; they are
/// never persisted on the record itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantRecord {
    pub id: RestaurantId,
    pub name: String,
    pub cuisines: Vec<String>,
    pub price: PriceTier,
    pub location: Coordinate,
    pub rating: f32,
    pub rating_count: u32,
}

// =============================================================================
// User Preferences
// =============================================================================

/// Shared mutable user preferences, written by the settings screen and read
/// by the ranking pipeline.
///
/// Invariant: `radius_km > 0`, enforced by [`UserPreferences::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    pub cuisines: Vec<String>,
    pub price_tiers: Vec<PriceTier>,
    pub radius_km: f64,
}

impl UserPreferences {
    pub fn new(cuisines: Vec<String>, price_tiers: Vec<PriceTier>, radius_km: f64) -> Result<Self> {
        if !(radius_km > 0.0) {
            return Err(SwipeDataError::InvalidRadius(radius_km));
        }
        Ok(Self {
            cuisines,
            price_tiers,
            radius_km,
        })
    }

    /// Preferences with no cuisine/price selection and the given radius.
    pub fn with_radius(radius_km: f64) -> Result<Self> {
        Self::new(Vec::new(), Vec::new(), radius_km)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vote_values() {
        assert_eq!(Vote::Like.value(), 1);
        assert_eq!(Vote::Dislike.value(), -1);
        assert_eq!(Vote::from_value(1).unwrap(), Vote::Like);
        assert_eq!(Vote::from_value(-1).unwrap(), Vote::Dislike);
    }

    #[test]
    fn test_vote_rejects_out_of_domain_values() {
        assert!(Vote::from_value(0).is_err());
        assert!(Vote::from_value(2).is_err());
        assert!(Vote::from_value(-7).is_err());
    }

    #[test]
    fn test_price_tier_round_trip() {
        for level in 1..=4 {
            let tier = PriceTier::from_level(level).unwrap();
            assert_eq!(tier.level(), level);
        }
        assert!(PriceTier::from_level(0).is_err());
        assert!(PriceTier::from_level(5).is_err());
    }

    #[test]
    fn test_preferences_require_positive_radius() {
        assert!(UserPreferences::with_radius(5.0).is_ok());
        assert!(UserPreferences::with_radius(0.0).is_err());
        assert!(UserPreferences::with_radius(-1.0).is_err());
        assert!(UserPreferences::with_radius(f64::NAN).is_err());
    }
}

//! Trait seams for the external collaborators the pipeline consumes.
//!
//! The backing store and the platform location service sit behind these
//! traits so the pipeline can be driven by an in-memory fetcher in tests
//! and by the real service clients in the application.

use std::future::Future;

use thiserror::Error;

use swipe_data::{Coordinate, RestaurantId, RestaurantRecord, SwipeDataError};

/// Failure resolving one restaurant record.
///
/// Fetch failures are transient by definition: the pipeline omits the
/// restaurant from the current pass and retries naturally on the next
/// recomputation trigger.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The fetch service could not be reached or answered with an error
    #[error("restaurant fetch failed: {0}")]
    Unavailable(String),

    /// The service answered but the document failed schema validation
    #[error("malformed restaurant document for {id}")]
    Malformed {
        id: RestaurantId,
        #[source]
        source: SwipeDataError,
    },
}

/// Asynchronous restaurant-record fetch service.
///
/// `Ok(None)` means the restaurant does not exist in the store; `Err`
/// is a transient failure. This is the only suspension point in the
/// ranking pipeline.
pub trait RestaurantFetcher: Send + Sync {
    fn fetch_restaurant(
        &self,
        id: &RestaurantId,
    ) -> impl Future<Output = Result<Option<RestaurantRecord>, FetchError>> + Send;
}

/// Provider of the user's current coordinate.
///
/// `None` means the location is unknown; the pipeline then measures
/// distances from `(0, 0)`, which shows up as a large synthetic distance
/// rather than "unknown".
pub trait LocationProvider: Send + Sync {
    fn current_location(&self) -> Option<Coordinate>;
}

/// A location provider that always answers with the same coordinate.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Option<Coordinate>);

impl LocationProvider for FixedLocation {
    fn current_location(&self) -> Option<Coordinate> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_location_reports_its_coordinate() {
        let here = Coordinate::new(40.0, -86.0);
        assert_eq!(FixedLocation(Some(here)).current_location(), Some(here));
        assert_eq!(FixedLocation(None).current_location(), None);
    }
}

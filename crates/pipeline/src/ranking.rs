//! The ranking pass that turns vote tallies into the published list.
//!
//! ## Algorithm
//! 1. Take the active window's tallies, net votes descending
//!    (arrival-order tie-break, provided by the aggregator)
//! 2. Resolve each restaurant through the cache, fetching on a miss and
//!    inserting the fetched record
//! 3. Attach the net votes and a freshly computed distance from the
//!    user's current location
//! 4. Keep the restaurant only when the distance is within the preferred
//!    radius; records outside the radius stay cached for reuse
//!
//! A failed or empty fetch omits that restaurant from this pass only; the
//! pass itself always completes with whatever resolved.

use tracing::{debug, warn};

use aggregator::TallyBook;
use swipe_data::{haversine_km, Coordinate, RestaurantRecord, TimeWindow, UserPreferences};

use crate::cache::RestaurantCache;
use crate::traits::RestaurantFetcher;

/// One entry of the published favourites list: the restaurant record with
/// its net votes for the active window and the distance from the user.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedRestaurant {
    pub restaurant: RestaurantRecord,
    pub net_votes: i64,
    pub distance_km: f64,
}

/// The published list: net votes descending, radius-filtered.
pub type RankedFavourites = Vec<RankedRestaurant>;

/// Produce the ranked, radius-filtered favourites list for one window.
///
/// This function never errors: fetch failures degrade to omission and are
/// retried naturally on the next recomputation trigger.
pub async fn recompute<F: RestaurantFetcher>(
    tallies: &TallyBook,
    window: TimeWindow,
    preferences: &UserPreferences,
    location: Option<Coordinate>,
    cache: &mut RestaurantCache,
    fetcher: &F,
) -> RankedFavourites {
    let origin = match location {
        Some(coordinate) => coordinate,
        None => {
            debug!("user location unknown, measuring distances from (0, 0)");
            Coordinate::ORIGIN
        }
    };

    let ranked_tallies = tallies.ranked(window);
    let mut favourites = Vec::with_capacity(ranked_tallies.len());

    for tally in ranked_tallies {
        let record = match cache.get(&tally.restaurant_id) {
            Some(record) => record.clone(),
            None => match fetcher.fetch_restaurant(&tally.restaurant_id).await {
                Ok(Some(record)) => {
                    cache.put(tally.restaurant_id.clone(), record.clone());
                    record
                }
                Ok(None) => {
                    warn!("restaurant {} not found, omitting", tally.restaurant_id);
                    continue;
                }
                Err(err) => {
                    warn!("fetch failed for {}, omitting: {err}", tally.restaurant_id);
                    continue;
                }
            },
        };

        let distance_km = haversine_km(origin, record.location);
        if distance_km > preferences.radius_km {
            // Outside the search radius; the record stays cached for reuse
            continue;
        }

        favourites.push(RankedRestaurant {
            restaurant: record,
            net_votes: tally.net_votes,
            distance_km,
        });
    }

    debug!(
        "ranked {} favourites within {} km",
        favourites.len(),
        preferences.radius_km
    );
    favourites
}

//! Ranking pipeline for community favourites.
//!
//! This crate provides:
//! - RestaurantCache, the read-through detail cache
//! - PreferencesHub, the shared preferences holder with observers
//! - The RestaurantFetcher/LocationProvider seams to external services
//! - The recompute pass producing the ranked, radius-filtered list
//!
//! ## Architecture
//! A recomputation pass runs in stages:
//! 1. Select the active window's tallies (net votes descending)
//! 2. Resolve restaurant records through the cache, fetching on a miss
//! 3. Attach net votes and a freshly computed distance
//! 4. Filter by the user's preferred radius and publish
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{recompute, RestaurantCache};
//! use swipe_data::TimeWindow;
//!
//! let mut cache = RestaurantCache::new();
//! let favourites = recompute(
//!     &tallies,
//!     TimeWindow::AllTime,
//!     &hub.current(),
//!     location.current_location(),
//!     &mut cache,
//!     &fetcher,
//! )
//! .await;
//! ```

pub mod cache;
pub mod preferences;
pub mod ranking;
pub mod traits;

// Re-export main types
pub use cache::RestaurantCache;
pub use preferences::{PreferenceObserver, PreferencesHub};
pub use ranking::{recompute, RankedFavourites, RankedRestaurant};
pub use traits::{FetchError, FixedLocation, LocationProvider, RestaurantFetcher};

//! Integration tests for the favourites pipeline.
//!
//! These tests run the full path a live update takes: loosely-typed swipe
//! documents are decoded, aggregated into tallies, and ranked through the
//! cache and distance filter.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::json;

use aggregator::aggregate;
use pipeline::{recompute, FetchError, RestaurantCache, RestaurantFetcher};
use swipe_data::{document, Coordinate, PriceTier, RestaurantId, RestaurantRecord, TimeWindow, UserPreferences};

struct MapFetcher {
    records: HashMap<RestaurantId, RestaurantRecord>,
    calls: AtomicUsize,
}

impl MapFetcher {
    fn new(records: Vec<RestaurantRecord>) -> Self {
        Self {
            records: records.into_iter().map(|r| (r.id.clone(), r)).collect(),
            calls: AtomicUsize::new(0),
        }
    }
}

impl RestaurantFetcher for MapFetcher {
    async fn fetch_restaurant(
        &self,
        id: &RestaurantId,
    ) -> Result<Option<RestaurantRecord>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.records.get(id).cloned())
    }
}

fn restaurant(id: &str, name: &str, latitude: f64, longitude: f64) -> RestaurantRecord {
    RestaurantRecord {
        id: id.to_string(),
        name: name.to_string(),
        cuisines: vec!["American".to_string()],
        price: PriceTier::Budget,
        location: Coordinate::new(latitude, longitude),
        rating: 4.1,
        rating_count: 40,
    }
}

#[tokio::test]
async fn test_documents_to_ranked_favourites() {
    // Three valid swipe documents and one malformed entry in the feed
    let docs = vec![
        json!({"restaurantId": "burger", "value": 1, "timestamp": 10}),
        json!({"restaurantId": "burger", "value": 1, "timestamp": 20}),
        json!({"restaurantId": "noodle", "value": 1, "timestamp": 30}),
        json!({"value": -1, "timestamp": 40}),
    ];

    let records = document::decode_swipes(&docs);
    assert_eq!(records.len(), 3, "malformed entry should be dropped");

    let tallies = aggregate(&records, 100);
    let fetcher = MapFetcher::new(vec![
        restaurant("burger", "Burger Barn", 0.0, 0.0),
        restaurant("noodle", "Noodle House", 0.0, 0.02),
    ]);
    let mut cache = RestaurantCache::new();

    let favourites = recompute(
        &tallies,
        TimeWindow::AllTime,
        &UserPreferences::with_radius(10.0).unwrap(),
        Some(Coordinate::new(0.0, 0.0)),
        &mut cache,
        &fetcher,
    )
    .await;

    assert_eq!(favourites.len(), 2);
    assert_eq!(favourites[0].restaurant.name, "Burger Barn");
    assert_eq!(favourites[0].net_votes, 2);
    assert_eq!(favourites[1].restaurant.name, "Noodle House");
    assert_eq!(favourites[1].net_votes, 1);

    // Every published entry respects the radius
    for favourite in &favourites {
        assert!(favourite.distance_km <= 10.0);
    }
}

#[tokio::test]
async fn test_repeated_updates_only_fetch_new_restaurants() {
    let first_docs = vec![json!({"restaurantId": "burger", "value": 1, "timestamp": 10})];
    let second_docs = vec![
        json!({"restaurantId": "burger", "value": 1, "timestamp": 10}),
        json!({"restaurantId": "burger", "value": 1, "timestamp": 50}),
        json!({"restaurantId": "taco", "value": 1, "timestamp": 60}),
    ];

    let fetcher = MapFetcher::new(vec![
        restaurant("burger", "Burger Barn", 0.0, 0.0),
        restaurant("taco", "Taco Stand", 0.0, 0.01),
    ]);
    let prefs = UserPreferences::with_radius(10.0).unwrap();
    let mut cache = RestaurantCache::new();

    let tallies = aggregate(&document::decode_swipes(&first_docs), 100);
    recompute(
        &tallies,
        TimeWindow::AllTime,
        &prefs,
        Some(Coordinate::new(0.0, 0.0)),
        &mut cache,
        &fetcher,
    )
    .await;
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);

    let tallies = aggregate(&document::decode_swipes(&second_docs), 100);
    let favourites = recompute(
        &tallies,
        TimeWindow::AllTime,
        &prefs,
        Some(Coordinate::new(0.0, 0.0)),
        &mut cache,
        &fetcher,
    )
    .await;

    // Only the newly seen restaurant required a fetch
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
    assert_eq!(favourites.len(), 2);
    assert_eq!(favourites[0].restaurant.id, "burger");
}

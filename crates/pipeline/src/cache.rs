//! Read-through cache for restaurant detail records.
//!
//! Avoids refetching static descriptive data on every recomputation. The
//! cache exclusively owns its copies: entries are created on first fetch,
//! overwritten unconditionally on put (last-write-wins, no versioning),
//! and never invalidated except by process restart. There is no eviction
//! policy; the restaurant universe is assumed bounded.

use std::collections::HashMap;

use swipe_data::{RestaurantId, RestaurantRecord};

#[derive(Debug, Default)]
pub struct RestaurantCache {
    entries: HashMap<RestaurantId, RestaurantRecord>,
}

impl RestaurantCache {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, id: &RestaurantId) -> Option<&RestaurantRecord> {
        self.entries.get(id)
    }

    pub fn put(&mut self, id: RestaurantId, record: RestaurantRecord) {
        self.entries.insert(id, record);
    }

    pub fn contains(&self, id: &RestaurantId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//! # Favourites Engine
//!
//! This module coordinates the favourites pipeline end to end:
//! 1. Decode pushed swipe documents at the schema boundary
//! 2. Aggregate votes for both time windows
//! 3. Rank through the cache, distance, and radius filter
//! 4. Publish snapshots on a watch channel for the UI to subscribe to
//!
//! All recomputation triggers (swipe pushes, window switches, radius
//! changes, source outages) funnel through one unbounded channel into a
//! single worker task, so two triggers can never interleave inside a
//! recomputation and a published list is never partial. Triggers are
//! applied in arrival order; an in-flight recomputation that is superseded
//! by a newer trigger is abandoned without publishing.

use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use aggregator::aggregate;
use pipeline::{
    recompute, LocationProvider, PreferenceObserver, PreferencesHub, RankedFavourites,
    RestaurantCache, RestaurantFetcher,
};
use swipe_data::{document, SwipeRecord, TimeWindow, TimestampMs};

/// One push from the swipe-data source.
#[derive(Debug, Clone)]
pub enum SwipeEvent {
    /// The full refreshed set of swipe documents currently in the store.
    /// After an outage, the first snapshot doubles as the recovery signal.
    Snapshot(Vec<serde_json::Value>),
    /// The live subscription dropped; recomputation pauses until the next
    /// snapshot arrives.
    Disconnected(String),
}

/// Lifecycle of the published list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// No swipe data has arrived yet
    Idle,
    /// A recomputation is in flight
    Loading,
    /// The current list reflects the latest processed trigger
    Ready,
}

/// Value published to subscribers on every engine transition.
#[derive(Debug, Clone)]
pub struct FavouritesSnapshot {
    pub favourites: RankedFavourites,
    pub state: PipelineState,
    /// Set while the swipe feed is down. The favourites list keeps its
    /// last published value for the duration of the outage.
    pub source_error: Option<String>,
}

impl FavouritesSnapshot {
    fn idle() -> Self {
        Self {
            favourites: Vec::new(),
            state: PipelineState::Idle,
            source_error: None,
        }
    }

    pub fn loading(&self) -> bool {
        self.state == PipelineState::Loading
    }
}

/// Internal recomputation trigger, one per external stimulus.
#[derive(Debug)]
enum Trigger {
    Swipes(Vec<SwipeRecord>),
    Window(TimeWindow),
    RadiusChanged,
    SourceDown(String),
}

/// Preference observer that forwards updates to the worker, but only when
/// the search radius actually changed. Cuisine or price updates that leave
/// the radius alone do not trigger a recomputation.
struct RadiusWatch {
    last_radius: Mutex<f64>,
    triggers: mpsc::UnboundedSender<Trigger>,
}

impl PreferenceObserver for RadiusWatch {
    fn preferences_changed(&self, preferences: &swipe_data::UserPreferences) {
        let mut last = self.last_radius.lock().expect("radius lock poisoned");
        if *last == preferences.radius_km {
            debug!("preferences changed without touching the radius, ignoring");
            return;
        }
        *last = preferences.radius_km;
        let _ = self.triggers.send(Trigger::RadiusChanged);
    }
}

fn now_ms() -> TimestampMs {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// The engine handle: feeds events in, hands out snapshot subscriptions.
///
/// Must be created inside a tokio runtime; the worker task lives until the
/// handle is dropped.
pub struct FavouritesEngine {
    triggers: mpsc::UnboundedSender<Trigger>,
    snapshots: watch::Receiver<FavouritesSnapshot>,
    observer: Arc<RadiusWatch>,
    hub: Arc<PreferencesHub>,
}

impl FavouritesEngine {
    /// Spawn the worker task and wire the preference observer.
    pub fn spawn<F, L>(fetcher: F, location: L, hub: Arc<PreferencesHub>) -> Self
    where
        F: RestaurantFetcher + 'static,
        L: LocationProvider + 'static,
    {
        let (trigger_tx, trigger_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(FavouritesSnapshot::idle());

        let observer = Arc::new(RadiusWatch {
            last_radius: Mutex::new(hub.current().radius_km),
            triggers: trigger_tx.clone(),
        });
        hub.register_observer(observer.clone());

        tokio::spawn(worker(trigger_rx, snapshot_tx, fetcher, location, hub.clone()));
        info!("favourites engine started");

        Self {
            triggers: trigger_tx,
            snapshots: snapshot_rx,
            observer,
            hub,
        }
    }

    /// Feed one push from the swipe-data source.
    pub fn push_event(&self, event: SwipeEvent) {
        match event {
            SwipeEvent::Snapshot(docs) => {
                let records = document::decode_swipes(&docs);
                debug!("swipe snapshot with {} valid records", records.len());
                let _ = self.triggers.send(Trigger::Swipes(records));
            }
            SwipeEvent::Disconnected(reason) => {
                warn!("swipe feed disconnected: {reason}");
                let _ = self.triggers.send(Trigger::SourceDown(reason));
            }
        }
    }

    /// Switch the tally window the published list is ranked by.
    pub fn set_active_window(&self, window: TimeWindow) {
        debug!("switching active window to {window:?}");
        let _ = self.triggers.send(Trigger::Window(window));
    }

    /// Subscribe to published snapshots.
    pub fn subscribe(&self) -> watch::Receiver<FavouritesSnapshot> {
        self.snapshots.clone()
    }
}

impl Drop for FavouritesEngine {
    fn drop(&mut self) {
        let observer = self.observer.clone() as Arc<dyn PreferenceObserver>;
        self.hub.unregister_observer(&observer);
    }
}

/// The single-writer worker: applies triggers in arrival order, recomputes,
/// and publishes. Holds exclusive ownership of the record set and cache.
async fn worker<F, L>(
    mut triggers: mpsc::UnboundedReceiver<Trigger>,
    snapshots: watch::Sender<FavouritesSnapshot>,
    fetcher: F,
    location: L,
    hub: Arc<PreferencesHub>,
) where
    F: RestaurantFetcher,
    L: LocationProvider,
{
    let mut records: Vec<SwipeRecord> = Vec::new();
    let mut window = TimeWindow::AllTime;
    let mut cache = RestaurantCache::new();
    let mut outage: Option<String> = None;
    let mut pending: Option<Trigger> = None;

    loop {
        let first = match pending.take() {
            Some(trigger) => trigger,
            None => match triggers.recv().await {
                Some(trigger) => trigger,
                None => break,
            },
        };

        // Apply the trigger plus any backlog, in arrival order; only the
        // final state matters for the recomputation that follows.
        apply_trigger(first, &mut records, &mut window, &mut outage);
        while let Ok(trigger) = triggers.try_recv() {
            apply_trigger(trigger, &mut records, &mut window, &mut outage);
        }

        if let Some(reason) = &outage {
            // Keep the last published list visible, expose the outage, and
            // hold off recomputation until the feed delivers a snapshot
            let reason = reason.clone();
            snapshots.send_modify(|snap| snap.source_error = Some(reason));
            continue;
        }

        snapshots.send_modify(|snap| {
            snap.state = PipelineState::Loading;
            snap.source_error = None;
        });

        let tallies = aggregate(&records, now_ms());
        let preferences = hub.current();
        let user_location = location.current_location();

        let pass = recompute(
            &tallies,
            window,
            &preferences,
            user_location,
            &mut cache,
            &fetcher,
        );
        tokio::pin!(pass);

        let favourites = tokio::select! {
            biased;
            next = triggers.recv() => {
                match next {
                    Some(trigger) => {
                        // Superseded mid-flight: abandon this pass without
                        // publishing and start over from the newer trigger
                        debug!("recomputation superseded, restarting");
                        pending = Some(trigger);
                        continue;
                    }
                    // Engine handle dropped; nobody is left to observe
                    None => break,
                }
            }
            favourites = &mut pass => favourites,
        };

        debug!("publishing {} favourites", favourites.len());
        snapshots.send_modify(|snap| {
            snap.favourites = favourites;
            snap.state = PipelineState::Ready;
            snap.source_error = None;
        });
    }

    debug!("favourites engine worker stopped");
}

fn apply_trigger(
    trigger: Trigger,
    records: &mut Vec<SwipeRecord>,
    window: &mut TimeWindow,
    outage: &mut Option<String>,
) {
    match trigger {
        Trigger::Swipes(new_records) => {
            *records = new_records;
            // A fresh snapshot is the recovery signal after an outage
            *outage = None;
        }
        Trigger::Window(new_window) => *window = new_window,
        Trigger::RadiusChanged => {}
        Trigger::SourceDown(reason) => *outage = Some(reason),
    }
}

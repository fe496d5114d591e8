//! Shared user-preferences holder with a synchronous observer substrate.
//!
//! A single hub instance is injected into every component that reads
//! preferences; the settings screen is its only writer. On each update all
//! registered observers are invoked synchronously, in registration order,
//! with the complete new preferences value (not a diff).

use std::sync::{Arc, Mutex};

use tracing::debug;

use swipe_data::UserPreferences;

/// Callback invoked with the full new preferences value on every update.
pub trait PreferenceObserver: Send + Sync {
    fn preferences_changed(&self, preferences: &UserPreferences);
}

struct HubInner {
    current: UserPreferences,
    observers: Vec<Arc<dyn PreferenceObserver>>,
}

/// Process-wide holder for the current [`UserPreferences`].
pub struct PreferencesHub {
    inner: Mutex<HubInner>,
}

impl PreferencesHub {
    pub fn new(initial: UserPreferences) -> Self {
        Self {
            inner: Mutex::new(HubInner {
                current: initial,
                observers: Vec::new(),
            }),
        }
    }

    /// A copy of the current preferences.
    pub fn current(&self) -> UserPreferences {
        self.inner.lock().expect("preferences lock poisoned").current.clone()
    }

    /// Replace the preferences and notify every observer, in registration
    /// order, with the new value.
    pub fn update(&self, preferences: UserPreferences) {
        // Snapshot the observer list before invoking callbacks so an
        // observer may call back into the hub without deadlocking.
        let observers = {
            let mut inner = self.inner.lock().expect("preferences lock poisoned");
            inner.current = preferences.clone();
            inner.observers.clone()
        };

        debug!("notifying {} preference observers", observers.len());
        for observer in observers {
            observer.preferences_changed(&preferences);
        }
    }

    /// Register an observer. Registering the same observer twice is a no-op.
    pub fn register_observer(&self, observer: Arc<dyn PreferenceObserver>) {
        let mut inner = self.inner.lock().expect("preferences lock poisoned");
        if inner
            .observers
            .iter()
            .any(|existing| Arc::ptr_eq(existing, &observer))
        {
            return;
        }
        inner.observers.push(observer);
    }

    /// Remove an observer. Removing one that is not registered is a no-op.
    pub fn unregister_observer(&self, observer: &Arc<dyn PreferenceObserver>) {
        let mut inner = self.inner.lock().expect("preferences lock poisoned");
        inner
            .observers
            .retain(|existing| !Arc::ptr_eq(existing, observer));
    }

    pub fn observer_count(&self) -> usize {
        self.inner.lock().expect("preferences lock poisoned").observers.len()
    }
}

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError, Weak,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use toml::Value;
use tracing::trace;

use super::{ConfigChange, coercion::same_value};

type ChangeCallback = Arc<dyn Fn(&ConfigChange) + Send + Sync>;
type UpdateCallback = Arc<dyn Fn() + Send + Sync>;

/// Options controlling how an observation starts.
#[derive(Debug, Clone, Copy)]
pub struct ObserveOptions {
    /// Deliver the current value to the callback before `observe` returns.
    pub call_now: bool,
}

impl Default for ObserveOptions {
    fn default() -> Self {
        Self { call_now: true }
    }
}

/// A path observer with its own cache of the last value it reported.
struct PathObserver {
    id: usize,
    path: String,
    callback: ChangeCallback,
    last_value: Mutex<Option<Value>>,
    active: Arc<AtomicBool>,
}

/// A listener on the generic "updated" event.
struct UpdateListener {
    id: usize,
    callback: UpdateCallback,
    active: Arc<AtomicBool>,
}

#[derive(Default)]
struct Entries {
    // Keyed by the exact path string, so distinct paths never share a bucket.
    observers: HashMap<String, Vec<Arc<PathObserver>>>,
    listeners: Vec<Arc<UpdateListener>>,
}

enum Target {
    Path(String),
    Updates,
}

/// Registry of path observers and update listeners.
///
/// Dispatch takes a snapshot of the registered entries and releases the lock
/// before running any callback, so callbacks may freely read, write, observe
/// or cancel on the store that notified them.
#[derive(Clone, Default)]
pub(super) struct ObservationRegistry {
    entries: Arc<Mutex<Entries>>,
    next_id: Arc<AtomicUsize>,
}

/// Handle to a single registered callback.
///
/// The callback stays registered until [`Subscription::cancel`] is called or
/// the handle is dropped. After cancellation returns, the callback is never
/// invoked again, even by a dispatch that is already under way.
#[must_use = "dropping a Subscription cancels it"]
pub struct Subscription {
    id: usize,
    target: Target,
    active: Arc<AtomicBool>,
    entries: Weak<Mutex<Entries>>,
}

impl ObservationRegistry {
    /// Registers `callback` for `path`, seeding its cache with `current`.
    pub(super) fn observe(
        &self,
        path: &str,
        current: Option<Value>,
        callback: ChangeCallback,
    ) -> Subscription {
        let id = self.next_id();
        let active = Arc::new(AtomicBool::new(true));

        let observer = Arc::new(PathObserver {
            id,
            path: path.to_string(),
            callback,
            last_value: Mutex::new(current),
            active: active.clone(),
        });

        self.lock()
            .observers
            .entry(path.to_string())
            .or_default()
            .push(observer);

        trace!(path, id, "Registered path observer");

        Subscription {
            id,
            target: Target::Path(path.to_string()),
            active,
            entries: Arc::downgrade(&self.entries),
        }
    }

    /// Registers `callback` on the generic "updated" event.
    pub(super) fn on_did_update(&self, callback: UpdateCallback) -> Subscription {
        let id = self.next_id();
        let active = Arc::new(AtomicBool::new(true));

        self.lock().listeners.push(Arc::new(UpdateListener {
            id,
            callback,
            active: active.clone(),
        }));

        Subscription {
            id,
            target: Target::Updates,
            active,
            entries: Arc::downgrade(&self.entries),
        }
    }

    /// Removes every observer registered for exactly `path`.
    pub(super) fn unobserve(&self, path: &str) {
        let removed = self.lock().observers.remove(path).unwrap_or_default();

        for observer in &removed {
            observer.active.store(false, Ordering::SeqCst);
        }

        trace!(path, count = removed.len(), "Removed path observers");
    }

    /// Number of live observers on `path`.
    #[cfg(test)]
    pub(super) fn observer_count(&self, path: &str) -> usize {
        self.lock().observers.get(path).map_or(0, Vec::len)
    }

    /// Fires the "updated" event.
    ///
    /// Every path observer re-resolves its path through `resolve` and is
    /// called only when the value differs from the one it last reported.
    /// Update listeners are called unconditionally afterwards.
    pub(super) fn notify_updated(&self, resolve: impl Fn(&str) -> Option<Value>) {
        let (observers, listeners) = {
            let entries = self.lock();
            let mut observers: Vec<Arc<PathObserver>> =
                entries.observers.values().flatten().cloned().collect();
            observers.sort_by_key(|observer| observer.id);

            (observers, entries.listeners.clone())
        };

        for observer in observers {
            if !observer.is_active() {
                continue;
            }

            let current = resolve(&observer.path);
            let previous = {
                let mut last = observer
                    .last_value
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);

                if same_value(last.as_ref(), current.as_ref()) {
                    continue;
                }

                std::mem::replace(&mut *last, current.clone())
            };

            // A callback earlier in this loop may have cancelled this one.
            if observer.is_active() {
                let change = ConfigChange::new(observer.path.clone(), previous, current);
                (observer.callback)(&change);
            }
        }

        for listener in listeners {
            if listener.active.load(Ordering::SeqCst) {
                (listener.callback)();
            }
        }
    }

    fn next_id(&self) -> usize {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    fn lock(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PathObserver {
    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

impl Subscription {
    /// Removes this callback and only this callback. Calling it again is a no-op.
    pub fn cancel(&self) {
        if !self.active.swap(false, Ordering::SeqCst) {
            return;
        }

        let Some(entries) = self.entries.upgrade() else {
            return;
        };
        let mut entries = entries.lock().unwrap_or_else(PoisonError::into_inner);

        match &self.target {
            Target::Path(path) => {
                if let Some(observers) = entries.observers.get_mut(path) {
                    observers.retain(|observer| observer.id != self.id);

                    if observers.is_empty() {
                        entries.observers.remove(path);
                    }
                }
            }
            Target::Updates => entries.listeners.retain(|listener| listener.id != self.id),
        }
    }

    /// Whether the callback is still registered.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// The observed path, or `None` for an "updated" listener.
    pub fn path(&self) -> Option<&str> {
        match &self.target {
            Target::Path(path) => Some(path),
            Target::Updates => None,
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

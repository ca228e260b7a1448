//! Auth-state propagation for the hosted backend.
//!
//! Subscribers register a callback and receive sign-in, sign-out, and
//! token-refresh transitions together with a snapshot of the session. On
//! `SignedIn` and `TokenRefreshed` a subscriber is expected to re-fetch the
//! profile for the snapshot's user id; on `SignedOut` it clears its cached
//! user. Dropping or explicitly unsubscribing the returned handle removes the
//! callback; unsubscribing twice is a no-op.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

/// Kinds of auth-state transitions reported to subscribers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn,
    SignedOut,
    TokenRefreshed,
}

/// Snapshot of the session handed to subscribers alongside an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub user_id: String,
    pub email: String,
    pub access_token: String,
}

type Callback = Arc<dyn Fn(AuthEvent, Option<&SessionSnapshot>) + Send + Sync>;

#[derive(Default)]
struct BusInner {
    next_id: AtomicU64,
    subscribers: Mutex<HashMap<u64, Callback>>,
}

/// Registry of auth-state subscribers. Cheap to clone; clones share the same
/// subscriber set.
#[derive(Clone, Default)]
pub struct AuthEventBus {
    inner: Arc<BusInner>,
}

impl std::fmt::Debug for AuthEventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthEventBus")
            .field("subscribers", &self.inner.subscribers.lock().len())
            .finish()
    }
}

impl AuthEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback; the returned handle cancels it
    pub fn subscribe<F>(&self, callback: F) -> AuthSubscription
    where
        F: Fn(AuthEvent, Option<&SessionSnapshot>) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .subscribers
            .lock()
            .insert(id, Arc::new(callback));
        AuthSubscription {
            id,
            bus: Arc::downgrade(&self.inner),
        }
    }

    /// Deliver an event to every current subscriber.
    ///
    /// Callbacks run outside the registry lock, so a subscriber may subscribe
    /// or unsubscribe from within its own callback; the change takes effect on
    /// the next emission.
    pub fn emit(&self, event: AuthEvent, session: Option<&SessionSnapshot>) {
        let subscribers: Vec<Callback> = self.inner.subscribers.lock().values().cloned().collect();
        tracing::debug!(?event, subscribers = subscribers.len(), "dispatching auth event");
        for callback in subscribers {
            callback(event, session);
        }
    }

    #[cfg(test)]
    fn subscriber_count(&self) -> usize {
        self.inner.subscribers.lock().len()
    }
}

/// Handle returned by [`AuthEventBus::subscribe`]. Cancels the callback on
/// [`unsubscribe`](Self::unsubscribe) or drop.
pub struct AuthSubscription {
    id: u64,
    bus: Weak<BusInner>,
}

impl AuthSubscription {
    /// Remove the callback. Calling this more than once, or after the bus has
    /// been torn down, is harmless.
    pub fn unsubscribe(&self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.subscribers.lock().remove(&self.id);
        }
    }
}

impl Drop for AuthSubscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

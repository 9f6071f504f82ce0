//! Change notification

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

/// Observer told that a canvas finished changing. No payload.
pub trait ChangeListener: Send + Sync {
    fn on_change(&self);
}

impl<F> ChangeListener for F
where
    F: Fn() + Send + Sync,
{
    fn on_change(&self) {
        self()
    }
}

/// Listener set shared between a canvas and any thread that observes it.
///
/// This is the only canvas state behind a lock: registration may race with a
/// transaction closing on the drawing thread.
#[derive(Default)]
pub struct ListenerSet {
    listeners: Mutex<Vec<Arc<dyn ChangeListener>>>,
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a listener. Returns false if it was already registered.
    pub fn register(&self, listener: Arc<dyn ChangeListener>) -> bool {
        let mut listeners = self.listeners.lock();
        if listeners.iter().any(|l| same_listener(l, &listener)) {
            return false;
        }
        listeners.push(listener);
        true
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unregister(&self, listener: &Arc<dyn ChangeListener>) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|l| !same_listener(l, listener));
        listeners.len() != before
    }

    pub fn len(&self) -> usize {
        self.listeners.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Call every listener once. The lock is released before calling out so a
    /// listener may register or unregister from inside `on_change`.
    pub fn notify(&self) {
        let listeners: Vec<_> = self.listeners.lock().clone();
        trace!(count = listeners.len(), "notifying change listeners");
        for listener in listeners {
            listener.on_change();
        }
    }
}

impl std::fmt::Debug for ListenerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerSet").field("len", &self.len()).finish()
    }
}

fn same_listener(a: &Arc<dyn ChangeListener>, b: &Arc<dyn ChangeListener>) -> bool {
    Arc::as_ptr(a).cast::<()>() == Arc::as_ptr(b).cast::<()>()
}

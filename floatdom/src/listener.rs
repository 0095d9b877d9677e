//! Explicit listener registry.
//!
//! Document-level listeners (outside-click detection, resize/scroll tracking,
//! global shortcuts) are registered here instead of being ambient globals.
//! Every registration yields a [`Subscription`]; dropping it detaches the
//! listener, which ties listener lifetime to the owning component.

use std::sync::{Arc, Mutex, Weak};

use crate::event::{Event, EventKind};

/// Listener callback.
pub type Listener = Arc<dyn Fn(&Event) + Send + Sync>;

/// Unique identifier for a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl std::fmt::Display for ListenerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__listener_{}", self.0)
    }
}

/// Dispatch phase. Capture listeners run before bubble listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    Capture,
    #[default]
    Bubble,
}

struct Entry {
    id: ListenerId,
    kinds: Vec<EventKind>,
    phase: Phase,
    callback: Listener,
}

#[derive(Default)]
struct RegistryInner {
    next_id: u64,
    entries: Vec<Entry>,
}

impl RegistryInner {
    fn is_registered(&self, id: ListenerId) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }
}

/// Shared registry of document-level listeners.
///
/// Cloning yields another handle to the same registry.
#[derive(Clone, Default)]
pub struct ListenerRegistry {
    inner: Arc<Mutex<RegistryInner>>,
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.len())
            .finish()
    }
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for one or more event kinds.
    pub fn subscribe(
        &self,
        kinds: &[EventKind],
        phase: Phase,
        callback: impl Fn(&Event) + Send + Sync + 'static,
    ) -> Subscription {
        let Ok(mut guard) = self.inner.lock() else {
            log::warn!("[listener] registry poisoned, subscription is inert");
            return Subscription::inert();
        };
        guard.next_id += 1;
        let id = ListenerId(guard.next_id);
        guard.entries.push(Entry {
            id,
            kinds: kinds.to_vec(),
            phase,
            callback: Arc::new(callback),
        });
        log::trace!("[listener] subscribed {} for {:?} ({:?})", id, kinds, phase);
        Subscription {
            id: Some(id),
            registry: Arc::downgrade(&self.inner),
        }
    }

    /// Remove a listener. Returns true if it was registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        remove_entry(&self.inner, id)
    }

    /// Total number of registered listeners.
    pub fn len(&self) -> usize {
        self.inner.lock().map(|g| g.entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of listeners registered for an event kind.
    pub fn count_for(&self, kind: EventKind) -> usize {
        self.inner
            .lock()
            .map(|g| g.entries.iter().filter(|e| e.kinds.contains(&kind)).count())
            .unwrap_or(0)
    }

    pub fn is_registered(&self, id: ListenerId) -> bool {
        self.inner
            .lock()
            .map(|g| g.is_registered(id))
            .unwrap_or(false)
    }

    /// Deliver an event to every matching listener.
    ///
    /// Capture listeners run first, then bubble listeners, each group in
    /// registration order. Listeners are snapshotted before any callback runs
    /// (callbacks may subscribe or unsubscribe), and each one is re-checked
    /// right before it is invoked: a listener removed by an earlier callback
    /// in the same dispatch never sees the event.
    ///
    /// Returns the number of callbacks invoked.
    pub fn dispatch(&self, event: &Event) -> usize {
        let kind = event.kind();
        let snapshot: Vec<(ListenerId, Listener)> = match self.inner.lock() {
            Ok(guard) => [Phase::Capture, Phase::Bubble]
                .into_iter()
                .flat_map(|phase| {
                    guard
                        .entries
                        .iter()
                        .filter(|e| e.phase == phase && e.kinds.contains(&kind))
                        .map(|e| (e.id, Arc::clone(&e.callback)))
                        .collect::<Vec<_>>()
                })
                .collect(),
            Err(_) => return 0,
        };

        let mut invoked = 0;
        for (id, callback) in snapshot {
            if !self.is_registered(id) {
                log::trace!("[listener] skipping {} removed during dispatch", id);
                continue;
            }
            callback(event);
            invoked += 1;
        }
        invoked
    }
}

fn remove_entry(inner: &Mutex<RegistryInner>, id: ListenerId) -> bool {
    let Ok(mut guard) = inner.lock() else {
        return false;
    };
    let before = guard.entries.len();
    guard.entries.retain(|entry| entry.id != id);
    let removed = guard.entries.len() != before;
    if removed {
        log::trace!("[listener] unsubscribed {}", id);
    }
    removed
}

/// Registration handle. The listener is detached when this is dropped.
#[must_use = "dropping a Subscription immediately detaches the listener"]
#[derive(Debug)]
pub struct Subscription {
    id: Option<ListenerId>,
    registry: Weak<Mutex<RegistryInner>>,
}

impl Subscription {
    fn inert() -> Self {
        Self {
            id: None,
            registry: Weak::new(),
        }
    }

    pub fn id(&self) -> Option<ListenerId> {
        self.id
    }

    /// Whether the listener is still attached.
    pub fn is_active(&self) -> bool {
        match (self.id, self.registry.upgrade()) {
            (Some(id), Some(inner)) => inner.lock().map(|g| g.is_registered(id)).unwrap_or(false),
            _ => false,
        }
    }

    /// Detach now. Equivalent to dropping the handle.
    pub fn unsubscribe(mut self) {
        self.detach();
    }

    fn detach(&mut self) {
        if let (Some(id), Some(inner)) = (self.id.take(), self.registry.upgrade()) {
            remove_entry(&inner, id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach();
    }
}

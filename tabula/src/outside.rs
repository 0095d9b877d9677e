//! Outside-interaction detection for open overlays.
//!
//! Each open overlay attaches exactly one document listener covering both
//! pointer-down and touch-start. The listener lives as long as the returned
//! guard; closing the overlay drops the guard.

use floatdom::{Document, Event, EventKind, ListenerId, Phase, Subscription};

/// Attached outside-interaction listener. Dropping it detaches the listener.
#[derive(Debug)]
pub struct OutsideClickGuard {
    subscription: Subscription,
}

impl OutsideClickGuard {
    pub fn listener_id(&self) -> Option<ListenerId> {
        self.subscription.id()
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_active()
    }

    /// Detach now.
    pub fn detach(self) {
        self.subscription.unsubscribe();
    }
}

/// Watch for presses outside `owned` elements.
///
/// `on_outside` fires when a pointer-down or touch-start lands on no element
/// at all, or on an element not contained in any of `owned`.
pub fn attach(
    document: &Document,
    owned: Vec<String>,
    on_outside: impl Fn(&Event) + Send + Sync + 'static,
) -> OutsideClickGuard {
    let doc = document.clone();
    let subscription = document.listeners().subscribe(
        &[EventKind::PointerDown, EventKind::TouchStart],
        Phase::Bubble,
        move |event| {
            if is_outside(&doc, &owned, event.target()) {
                log::debug!("[outside] press outside {:?}", owned);
                on_outside(event);
            }
        },
    );
    OutsideClickGuard { subscription }
}

/// Whether `target` falls outside every owned element.
pub fn is_outside(document: &Document, owned: &[String], target: Option<&str>) -> bool {
    match target {
        None => true,
        Some(target) => !owned.iter().any(|id| document.contains(id, target)),
    }
}

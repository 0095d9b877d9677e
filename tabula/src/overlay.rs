//! Overlay surface for floating UI elements.
//!
//! Overlays are floating UI elements that render above the normal content layer.
//! They are used for dropdowns, context menus and the search palette.
//!
//! The application shell owns one [`OverlaySurface`] and paints whatever it
//! lists, on top of the page, in order. Components never own the painted node:
//! they hold an [`OverlaySlot`], a weak handle through which they publish or
//! withdraw their placement. A slot whose surface is gone silently does
//! nothing; dropping a slot withdraws its overlay.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock, Weak};

use crate::position::Placement;

/// Unique identifier for an overlay slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayId(usize);

impl OverlayId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for OverlayId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__overlay_{}", self.0)
    }
}

/// An overlay currently shown on the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveOverlay {
    pub id: OverlayId,
    /// ID of the component that owns this overlay.
    pub owner_id: String,
    /// Element id the shell should give the painted overlay content.
    pub content_id: String,
    pub placement: Placement,
}

#[derive(Debug, Default)]
struct SurfaceInner {
    /// Paint order: last entry is on top.
    entries: Vec<ActiveOverlay>,
}

/// Top-level surface that paints overlays outside their logical parents.
#[derive(Debug, Clone, Default)]
pub struct OverlaySurface {
    inner: Arc<RwLock<SurfaceInner>>,
    dirty: Arc<AtomicBool>,
}

impl OverlaySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a slot for a component.
    pub fn slot(&self, owner_id: impl Into<String>) -> OverlaySlot {
        let id = OverlayId::new();
        OverlaySlot {
            id,
            owner_id: owner_id.into(),
            content_id: format!("{}_content", id),
            surface: Arc::downgrade(&self.inner),
            dirty: Arc::downgrade(&self.dirty),
        }
    }

    /// Overlays to paint, bottom first.
    pub fn active(&self) -> Vec<ActiveOverlay> {
        self.inner
            .read()
            .map(|g| g.entries.clone())
            .unwrap_or_default()
    }

    pub fn topmost(&self) -> Option<ActiveOverlay> {
        self.inner
            .read()
            .ok()
            .and_then(|g| g.entries.last().cloned())
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|g| g.entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_shown(&self, id: OverlayId) -> bool {
        self.inner
            .read()
            .map(|g| g.entries.iter().any(|e| e.id == id))
            .unwrap_or(false)
    }

    /// Check if the surface changed since the last paint.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}

/// A component's weak handle onto the overlay surface.
#[derive(Debug)]
pub struct OverlaySlot {
    id: OverlayId,
    owner_id: String,
    content_id: String,
    surface: Weak<RwLock<SurfaceInner>>,
    dirty: Weak<AtomicBool>,
}

impl OverlaySlot {
    pub fn id(&self) -> OverlayId {
        self.id
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    /// Element id of the painted overlay content.
    pub fn content_id(&self) -> &str {
        &self.content_id
    }

    /// Whether the surface this slot points at still exists.
    pub fn is_connected(&self) -> bool {
        self.surface.strong_count() > 0
    }

    pub fn is_shown(&self) -> bool {
        self.surface
            .upgrade()
            .and_then(|s| s.read().ok().map(|g| g.entries.iter().any(|e| e.id == self.id)))
            .unwrap_or(false)
    }

    /// Show the overlay at `placement`, or move it if already shown.
    ///
    /// A newly shown overlay goes on top of the others.
    pub fn show(&self, placement: Placement) {
        let Some(surface) = self.surface.upgrade() else {
            log::debug!("[overlay] {} has no surface, show ignored", self.id);
            return;
        };
        if let Ok(mut guard) = surface.write() {
            match guard.entries.iter_mut().find(|e| e.id == self.id) {
                Some(entry) => entry.placement = placement,
                None => guard.entries.push(ActiveOverlay {
                    id: self.id,
                    owner_id: self.owner_id.clone(),
                    content_id: self.content_id.clone(),
                    placement,
                }),
            }
            self.mark_dirty();
        }
    }

    /// Update the placement of a shown overlay. Hidden overlays stay hidden.
    pub fn update(&self, placement: Placement) -> bool {
        let Some(surface) = self.surface.upgrade() else {
            return false;
        };
        let Ok(mut guard) = surface.write() else {
            return false;
        };
        match guard.entries.iter_mut().find(|e| e.id == self.id) {
            Some(entry) => {
                entry.placement = placement;
                self.mark_dirty();
                true
            }
            None => false,
        }
    }

    /// Withdraw the overlay from the surface.
    pub fn hide(&self) {
        let Some(surface) = self.surface.upgrade() else {
            return;
        };
        if let Ok(mut guard) = surface.write() {
            let before = guard.entries.len();
            guard.entries.retain(|e| e.id != self.id);
            if guard.entries.len() != before {
                self.mark_dirty();
            }
        }
    }

    fn mark_dirty(&self) {
        if let Some(dirty) = self.dirty.upgrade() {
            dirty.store(true, Ordering::SeqCst);
        }
    }
}

impl Drop for OverlaySlot {
    fn drop(&mut self) {
        self.hide();
    }
}

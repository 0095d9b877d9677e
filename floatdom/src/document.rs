//! The document: element tree, viewport, focus and document-level channels.
//!
//! A `Document` is owned by the application shell and handed (cloned) to the
//! components that need it. All clones share the same state.
//!
//! Element rects are page coordinates and do not move when the page scrolls.
//! Pointer events carry client coordinates; the document adds the page scroll
//! before hit testing.

use std::sync::{Arc, RwLock};

use crate::element::ElementTree;
use crate::event::Event;
use crate::focus::FocusState;
use crate::frame::FrameScheduler;
use crate::layout::{Rect, Viewport};
use crate::listener::ListenerRegistry;

#[derive(Debug, Clone, Default)]
pub struct Document {
    elements: Arc<RwLock<ElementTree>>,
    viewport: Arc<RwLock<Viewport>>,
    focus: Arc<RwLock<FocusState>>,
    listeners: ListenerRegistry,
    frames: FrameScheduler,
}

impl Document {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport: Arc::new(RwLock::new(viewport)),
            ..Default::default()
        }
    }

    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    pub fn frames(&self) -> &FrameScheduler {
        &self.frames
    }

    // -------------------------------------------------------------------------
    // Viewport
    // -------------------------------------------------------------------------

    pub fn viewport(&self) -> Viewport {
        self.viewport.read().map(|g| *g).unwrap_or_default()
    }

    pub fn set_viewport(&self, viewport: Viewport) {
        if let Ok(mut guard) = self.viewport.write() {
            *guard = viewport;
        }
    }

    // -------------------------------------------------------------------------
    // Elements
    // -------------------------------------------------------------------------

    pub fn insert_element(&self, id: impl Into<String>, parent: Option<&str>, rect: Rect) {
        if let Ok(mut guard) = self.elements.write() {
            guard.insert(id, parent, rect);
        }
    }

    /// Insert an element on the overlay layer, above all page content.
    pub fn insert_overlay_element(&self, id: impl Into<String>, rect: Rect) {
        if let Ok(mut guard) = self.elements.write() {
            guard.insert_layered(id, None, rect, OVERLAY_LAYER);
        }
    }

    pub fn set_element_rect(&self, id: &str, rect: Rect) -> bool {
        self.elements
            .write()
            .map(|mut g| g.set_rect(id, rect))
            .unwrap_or(false)
    }

    pub fn remove_element(&self, id: &str) {
        if let Ok(mut guard) = self.elements.write() {
            guard.remove(id);
        }
    }

    /// Page-space rect of an element.
    pub fn element_rect(&self, id: &str) -> Option<Rect> {
        self.elements.read().ok().and_then(|g| g.rect(id))
    }

    /// Where an element currently sits in the window.
    pub fn client_rect(&self, id: &str) -> Option<Rect> {
        let rect = self.element_rect(id)?;
        Some(self.viewport().to_client(rect))
    }

    /// Whether `node` is `ancestor` or one of its descendants.
    pub fn contains(&self, ancestor: &str, node: &str) -> bool {
        self.elements
            .read()
            .map(|g| g.contains(ancestor, node))
            .unwrap_or(false)
    }

    /// Topmost element at a page-space point.
    pub fn hit_test(&self, x: i32, y: i32) -> Option<String> {
        self.elements.read().ok().and_then(|g| g.hit_test(x, y))
    }

    /// Topmost element under a client-space point.
    pub fn element_at(&self, x: i32, y: i32) -> Option<String> {
        let viewport = self.viewport();
        self.hit_test(x + viewport.scroll_x, y + viewport.scroll_y)
    }

    // -------------------------------------------------------------------------
    // Focus
    // -------------------------------------------------------------------------

    pub fn focused(&self) -> Option<String> {
        self.focus
            .read()
            .ok()
            .and_then(|g| g.focused().map(str::to_string))
    }

    /// Move focus to an element, dispatching Blur/Focus events.
    pub fn focus(&self, id: &str) {
        let change = self.focus.write().ok().and_then(|mut g| g.focus(id));
        if let Some(previous) = change {
            log::debug!("[document] focus {:?} -> {}", previous, id);
            if let Some(previous) = previous {
                self.listeners.dispatch(&Event::Blur { target: previous });
            }
            self.listeners.dispatch(&Event::Focus {
                target: id.to_string(),
            });
        }
    }

    pub fn blur(&self) {
        let previous = self.focus.write().ok().and_then(|mut g| g.blur());
        if let Some(previous) = previous {
            self.listeners.dispatch(&Event::Blur { target: previous });
        }
    }

    // -------------------------------------------------------------------------
    // Dispatch
    // -------------------------------------------------------------------------

    /// Apply an input event to the document and deliver it to listeners.
    ///
    /// Untargeted pointer events are hit tested at their client position
    /// plus the page scroll, untargeted key events go to
    /// the focused element, resize and page scroll update the viewport before
    /// any listener runs.
    pub fn dispatch(&self, event: Event) -> usize {
        let event = self.resolve(event);
        match &event {
            Event::Resize { width, height } => {
                if let Ok(mut guard) = self.viewport.write() {
                    guard.width = *width;
                    guard.height = *height;
                }
            }
            Event::Scroll {
                target: None,
                delta_x,
                delta_y,
            } => {
                if let Ok(mut guard) = self.viewport.write() {
                    guard.scroll_x = (guard.scroll_x + delta_x).max(0);
                    guard.scroll_y = (guard.scroll_y + delta_y).max(0);
                }
            }
            _ => {}
        }
        log::trace!("[document] dispatch {:?}", event);
        self.listeners.dispatch(&event)
    }

    fn resolve(&self, event: Event) -> Event {
        match event {
            Event::PointerDown {
                target: None,
                x,
                y,
                button,
            } => Event::PointerDown {
                target: self.element_at(x, y),
                x,
                y,
                button,
            },
            Event::TouchStart { target: None, x, y } => Event::TouchStart {
                target: self.element_at(x, y),
                x,
                y,
            },
            Event::Key {
                target: None,
                key,
                modifiers,
            } => Event::Key {
                target: self.focused(),
                key,
                modifiers,
            },
            other => other,
        }
    }
}

/// Stacking layer used for overlay-surface elements.
pub const OVERLAY_LAYER: i32 = 1000;

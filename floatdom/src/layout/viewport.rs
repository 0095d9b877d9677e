use super::Rect;

/// The visible window onto the page.
///
/// `width`/`height` are the window's inner size. `scroll_x`/`scroll_y` are the
/// page scroll offsets; adding them to a client rect yields page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub width: i32,
    pub height: i32,
    pub scroll_x: i32,
    pub scroll_y: i32,
}

impl Viewport {
    pub const fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            scroll_x: 0,
            scroll_y: 0,
        }
    }

    pub const fn with_scroll(mut self, scroll_x: i32, scroll_y: i32) -> Self {
        self.scroll_x = scroll_x;
        self.scroll_y = scroll_y;
        self
    }

    /// The viewport as a client-space rectangle.
    pub const fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    /// Convert a client-space rectangle into page coordinates.
    pub const fn to_page(&self, rect: Rect) -> Rect {
        rect.offset(self.scroll_x, self.scroll_y)
    }

    /// Convert a page-space rectangle into client coordinates.
    pub const fn to_client(&self, rect: Rect) -> Rect {
        rect.offset(-self.scroll_x, -self.scroll_y)
    }
}

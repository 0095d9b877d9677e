//! Overlay placement relative to a trigger element.
//!
//! Placement is computed in page coordinates (client coordinates plus page
//! scroll) because overlays render in a top-level surface outside the normal
//! layout of their trigger.

use floatdom::{Rect, Size, Viewport};
use serde::{Deserialize, Serialize};

/// Alignment of the overlay against the trigger.
///
/// Below/above placement: horizontal alignment. Beside placement: vertical
/// alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    #[default]
    Start,
    End,
    Center,
}

/// Preferred side of the trigger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Below, or above when there is more room there
    #[default]
    Auto,
    /// Beside the trigger, on its left
    Left,
    /// Beside the trigger, on its right
    Right,
}

/// Side the overlay actually ended up on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacedSide {
    Above,
    Below,
    Left,
    Right,
}

/// Horizontal anchor of a placed overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Horizontal {
    /// Distance from the page's left edge to the overlay's left edge
    Left(i32),
    /// Distance from the page's right edge to the overlay's right edge
    Right(i32),
}

/// Computed overlay placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub top: i32,
    pub horizontal: Horizontal,
    pub width: i32,
    pub side: PlacedSide,
}

impl Placement {
    /// Left edge in page coordinates.
    pub fn left(&self, viewport: Viewport) -> i32 {
        match self.horizontal {
            Horizontal::Left(left) => left,
            Horizontal::Right(right) => viewport.width - right - self.width,
        }
    }

    /// The overlay's page-space rectangle for a given height.
    pub fn rect(&self, viewport: Viewport, height: i32) -> Rect {
        Rect::new(self.left(viewport), self.top, self.width, height)
    }
}

/// Placement configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionOptions {
    pub align: Align,
    pub side: Side,
    /// Gap between trigger and overlay
    pub offset: i32,
    /// Size the overlay to the trigger's width (selects)
    pub match_trigger_width: bool,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            align: Align::Start,
            side: Side::Auto,
            offset: 4,
            match_trigger_width: false,
        }
    }
}

impl PositionOptions {
    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    pub fn offset(mut self, offset: i32) -> Self {
        self.offset = offset;
        self
    }

    pub fn match_trigger_width(mut self) -> Self {
        self.match_trigger_width = true;
        self
    }
}

/// Compute where an overlay goes.
///
/// * `trigger` - trigger rectangle in client coordinates
/// * `overlay` - overlay size (estimated before first paint, measured after)
/// * `viewport` - window size and page scroll
pub fn compute(
    trigger: Rect,
    overlay: Size,
    viewport: Viewport,
    options: &PositionOptions,
) -> Placement {
    let width = if options.match_trigger_width {
        trigger.width
    } else {
        overlay.width
    };

    match options.side {
        Side::Auto => place_vertical(trigger, width, overlay.height, viewport, options),
        Side::Left | Side::Right => {
            place_beside(trigger, width, overlay.height, viewport, options)
        }
    }
}

fn place_vertical(
    trigger: Rect,
    width: i32,
    height: i32,
    viewport: Viewport,
    options: &PositionOptions,
) -> Placement {
    let space_below = viewport.height - trigger.bottom();
    let space_above = trigger.top();
    let below = space_below >= height || space_below >= space_above;

    let (top, side) = if below {
        (trigger.bottom() + options.offset, PlacedSide::Below)
    } else {
        (trigger.top() - height - options.offset, PlacedSide::Above)
    };

    let horizontal = match options.align {
        Align::Start => Horizontal::Left(constrain_x(
            trigger.left() + viewport.scroll_x,
            width,
            viewport,
        )),
        Align::End => {
            Horizontal::Right(viewport.width - trigger.right() - viewport.scroll_x)
        }
        Align::Center => Horizontal::Left(constrain_x(
            trigger.left() + (trigger.width - width) / 2 + viewport.scroll_x,
            width,
            viewport,
        )),
    };

    Placement {
        top: top + viewport.scroll_y,
        horizontal,
        width,
        side,
    }
}

fn place_beside(
    trigger: Rect,
    width: i32,
    height: i32,
    viewport: Viewport,
    options: &PositionOptions,
) -> Placement {
    let space_right = viewport.width - trigger.right() - options.offset;
    let space_left = trigger.left() - options.offset;

    // Flip only when the preferred side is too small and the other is larger.
    let side = match options.side {
        Side::Left if space_left < width && space_right > space_left => PlacedSide::Right,
        Side::Left => PlacedSide::Left,
        _ if space_right < width && space_left > space_right => PlacedSide::Left,
        _ => PlacedSide::Right,
    };

    let left = match side {
        PlacedSide::Left => trigger.left() - width - options.offset,
        _ => trigger.right() + options.offset,
    };

    let top = match options.align {
        Align::Start => trigger.top(),
        Align::End => trigger.bottom() - height,
        Align::Center => trigger.top() + (trigger.height - height) / 2,
    };

    Placement {
        top: top + viewport.scroll_y,
        horizontal: Horizontal::Left(left + viewport.scroll_x),
        width,
        side,
    }
}

/// Keep a left edge within the visible page area.
fn constrain_x(x: i32, width: i32, viewport: Viewport) -> i32 {
    let min_x = viewport.scroll_x;
    let max_x = viewport.scroll_x + viewport.width - width;
    x.min(max_x).max(min_x)
}

/// Measure-then-place bookkeeping for one overlay.
///
/// The overlay's size is unknown until it has been painted, so placement runs
/// once optimistically with an estimate when the overlay opens, then again
/// with the measured size. Later recomputations (resize, scroll) reuse the
/// measurement.
#[derive(Debug, Clone)]
pub struct PlacementTracker {
    options: PositionOptions,
    estimate: Size,
    measured: Option<Size>,
    placement: Option<Placement>,
    computations: usize,
}

impl PlacementTracker {
    pub fn new(options: PositionOptions, estimate: Size) -> Self {
        Self {
            options,
            estimate,
            measured: None,
            placement: None,
            computations: 0,
        }
    }

    pub fn options(&self) -> &PositionOptions {
        &self.options
    }

    pub fn placement(&self) -> Option<Placement> {
        self.placement
    }

    pub fn is_measured(&self) -> bool {
        self.measured.is_some()
    }

    /// The size used for the next computation.
    pub fn size(&self) -> Size {
        self.measured.unwrap_or(self.estimate)
    }

    /// How many placements were computed since the tracker was created.
    pub fn computations(&self) -> usize {
        self.computations
    }

    pub fn set_estimate(&mut self, estimate: Size) {
        self.estimate = estimate;
    }

    /// First, optimistic placement when the overlay opens.
    pub fn open(&mut self, trigger: Rect, viewport: Viewport) -> Placement {
        self.measured = None;
        self.place(trigger, viewport)
    }

    /// Second placement once the overlay's real size is known.
    pub fn painted(&mut self, measured: Size, trigger: Rect, viewport: Viewport) -> Placement {
        self.measured = Some(measured);
        self.place(trigger, viewport)
    }

    /// Recompute after a viewport change. No-op while closed.
    pub fn recompute(&mut self, trigger: Rect, viewport: Viewport) -> Option<Placement> {
        self.placement?;
        Some(self.place(trigger, viewport))
    }

    /// Forget everything on close.
    pub fn discard(&mut self) {
        self.placement = None;
        self.measured = None;
    }

    fn place(&mut self, trigger: Rect, viewport: Viewport) -> Placement {
        let placement = compute(trigger, self.size(), viewport, &self.options);
        self.computations += 1;
        self.placement = Some(placement);
        placement
    }
}

mod rect;
mod viewport;

pub use rect::{Rect, Size};
pub use viewport::Viewport;

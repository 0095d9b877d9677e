//! Floating combobox shared by select, dropdown-menu and search-palette
//! surfaces.
//!
//! Composes option filtering, the selection model, keyboard navigation,
//! overlay placement and outside-press detection behind one handle.

mod config;
mod events;
mod render;
mod state;

pub use config::ComboboxConfig;
pub use events::{ComboState, EventResult};
pub use render::OverlayRow;
pub use state::{Combobox, ComboboxId, SearchCallback};

pub mod combobox;
pub mod dataview;
pub mod error;
pub mod keybinds;
pub mod navigation;
pub mod options;
pub mod outside;
pub mod overlay;
pub mod ownership;
pub mod position;
pub mod selection;

pub use combobox::{ComboState, Combobox, ComboboxConfig};
pub use dataview::{Column, ColumnKind, DataView, DataViewConfig, RenderedView, Renderers};
pub use error::{SelectionError, ViewError};
pub use overlay::{OverlaySlot, OverlaySurface};
pub use ownership::{Emit, Ownership};

pub mod prelude {
    pub use crate::combobox::{ComboState, Combobox, ComboboxConfig, EventResult, OverlayRow};
    pub use crate::dataview::{
        Accessor, Column, ColumnKind, DataView, DataViewConfig, PageRange, Record, RenderedView,
        Renderers, SortDirection, SortState, ViewState, ViewType,
    };
    pub use crate::error::{SelectionError, ViewError};
    pub use crate::keybinds::{HandlerId, KeyCombo, Keybinds, Platform};
    pub use crate::navigation::{HighlightReset, NavigableList};
    pub use crate::options::{MatchMode, OptionItem, OptionState};
    pub use crate::overlay::{OverlaySlot, OverlaySurface};
    pub use crate::ownership::{Emit, Ownership};
    pub use crate::position::{Align, Placement, PositionOptions, Side};
    pub use crate::selection::{SelectionMode, SelectionModel, SelectionValue};
}

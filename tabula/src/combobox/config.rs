//! Combobox configuration.

use floatdom::Size;
use serde::{Deserialize, Serialize};

use crate::navigation::HighlightReset;
use crate::options::MatchMode;
use crate::position::{Align, PositionOptions};
use crate::selection::SelectionMode;

/// Behaviour of one floating combobox instance.
///
/// The three presets cover the surfaces that share the engine: a select, a
/// dropdown menu and a search palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComboboxConfig {
    /// Single commits close, multiple commits toggle and stay open
    pub mode: SelectionMode,
    /// Highlight policy when the filtered list is replaced
    pub highlight_reset: HighlightReset,
    /// Typed characters edit the search term
    pub searchable: bool,
    /// Bucket options by group when rendering
    pub grouped: bool,
    pub match_mode: MatchMode,
    pub position: PositionOptions,
    /// Overlay size assumed before the first paint
    pub estimated_width: i32,
    pub estimated_height: i32,
    /// Keep the committed value (menus fire an action and forget it)
    pub retain_selection: bool,
    pub placeholder: String,
}

impl Default for ComboboxConfig {
    fn default() -> Self {
        Self {
            mode: SelectionMode::Single,
            highlight_reset: HighlightReset::None,
            searchable: true,
            grouped: false,
            match_mode: MatchMode::Substring,
            position: PositionOptions::default(),
            estimated_width: 24,
            estimated_height: 8,
            retain_selection: true,
            placeholder: String::new(),
        }
    }
}

impl ComboboxConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Closed-option select: first option highlighted, overlay as wide as
    /// the trigger, no typing filter.
    pub fn select() -> Self {
        Self {
            highlight_reset: HighlightReset::First,
            searchable: false,
            position: PositionOptions::default().match_trigger_width(),
            placeholder: "Select...".to_string(),
            ..Self::default()
        }
    }

    /// Action menu anchored to the trigger's end edge.
    pub fn dropdown_menu() -> Self {
        Self {
            highlight_reset: HighlightReset::First,
            searchable: false,
            position: PositionOptions::default().align(Align::End),
            retain_selection: false,
            ..Self::default()
        }
    }

    /// Free-text search surface with grouped results.
    pub fn search_palette() -> Self {
        Self {
            highlight_reset: HighlightReset::None,
            searchable: true,
            grouped: true,
            estimated_width: 48,
            estimated_height: 12,
            placeholder: "Search...".to_string(),
            ..Self::default()
        }
    }

    pub fn mode(mut self, mode: SelectionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn multiple(self) -> Self {
        self.mode(SelectionMode::Multiple)
    }

    pub fn highlight_reset(mut self, reset: HighlightReset) -> Self {
        self.highlight_reset = reset;
        self
    }

    pub fn searchable(mut self, searchable: bool) -> Self {
        self.searchable = searchable;
        self
    }

    pub fn grouped(mut self, grouped: bool) -> Self {
        self.grouped = grouped;
        self
    }

    pub fn match_mode(mut self, mode: MatchMode) -> Self {
        self.match_mode = mode;
        self
    }

    pub fn position(mut self, position: PositionOptions) -> Self {
        self.position = position;
        self
    }

    pub fn estimated_size(mut self, width: i32, height: i32) -> Self {
        self.estimated_width = width;
        self.estimated_height = height;
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub(crate) fn estimate(&self) -> Size {
        Size::new(self.estimated_width, self.estimated_height)
    }
}

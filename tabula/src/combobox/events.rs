//! Event handling types for the combobox.

/// Interaction states of a floating combobox.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ComboState {
    #[default]
    Closed,
    /// Open with an empty search term
    OpenUnfiltered,
    /// Open with a non-empty search term
    OpenFiltered,
    /// Open after keyboard navigation; the term is retained
    OpenHighlighted,
}

impl ComboState {
    pub fn is_open(self) -> bool {
        self != ComboState::Closed
    }
}

/// Result of handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Event was ignored, try other handlers.
    Ignored,
    /// Event was consumed, stop propagation.
    Consumed,
}

impl EventResult {
    /// Check if the event was handled.
    pub fn is_handled(&self) -> bool {
        matches!(self, EventResult::Consumed)
    }
}

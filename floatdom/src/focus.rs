/// Tracks which element is currently focused.
#[derive(Debug, Default)]
pub struct FocusState {
    focused: Option<String>,
}

impl FocusState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the currently focused element ID.
    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    /// Programmatically focus an element by ID.
    /// Returns the previously focused element if focus changed.
    pub fn focus(&mut self, id: &str) -> Option<Option<String>> {
        if self.focused.as_deref() == Some(id) {
            return None;
        }
        Some(self.focused.replace(id.to_string()))
    }

    /// Clear focus.
    /// Returns the element that lost focus, if any.
    pub fn blur(&mut self) -> Option<String> {
        self.focused.take()
    }
}

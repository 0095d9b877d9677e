//! Data view configuration.

use serde::{Deserialize, Serialize};

use super::state::ViewState;

/// Data view configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataViewConfig {
    /// Rows per page
    pub page_size: usize,
    /// Dotted paths searched by the global filter. Empty means every
    /// column's accessor.
    pub filter_paths: Vec<String>,
    /// State restored on creation
    pub initial: ViewState,
}

impl Default for DataViewConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            filter_paths: Vec::new(),
            initial: ViewState::default(),
        }
    }
}

impl DataViewConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size. Zero is raised to one.
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn filter_path(mut self, path: impl Into<String>) -> Self {
        self.filter_paths.push(path.into());
        self
    }

    pub fn initial(mut self, state: ViewState) -> Self {
        self.initial = state;
        self
    }
}

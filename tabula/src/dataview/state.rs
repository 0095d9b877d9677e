//! Serializable view state.

use serde::{Deserialize, Serialize};

use super::sort::SortState;

/// How the current page is presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewType {
    #[default]
    Table,
    List,
    Grid,
}

/// Everything the user changed about a data view.
///
/// Saved and restored by the shell; switching `view_type` never touches the
/// other fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewState {
    pub view_type: ViewType,
    pub sort: Option<SortState>,
    pub filter_term: String,
    /// Zero-based
    pub page_index: usize,
}

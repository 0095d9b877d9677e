//! Rejected operations.
//!
//! Nothing in this crate performs I/O. These errors only report requests the
//! engines refused; the engine state is unchanged when one is returned.

use thiserror::Error;

/// Errors from [`DataView`](crate::dataview::DataView) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    /// Requested page is outside `1..=page_count`.
    #[error("page {requested} is out of range (1..={page_count})")]
    PageOutOfRange { requested: usize, page_count: usize },

    /// No column with this id.
    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    /// Column exists but is not sortable.
    #[error("column '{0}' is not sortable")]
    NotSortable(String),

    /// Page size must be at least 1.
    #[error("page size must be at least 1")]
    ZeroPageSize,
}

/// Errors from [`SelectionModel`](crate::selection::SelectionModel) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// An external value was pushed into an uncontrolled model.
    #[error("selection is uncontrolled; external values cannot be synced")]
    NotControlled,

    /// The value is not part of the current option domain.
    #[error("value is not one of the available options")]
    OutsideDomain,
}

//! Column definitions.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::record::Accessor;

/// Renders one cell: the row and the value its accessor resolved to.
pub type CellRenderer<T, N> = Arc<dyn Fn(&T, Option<&Value>) -> N + Send + Sync>;

/// Declared sort type of a column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Case-insensitive lexicographic
    #[default]
    Text,
    /// Numeric; values that are not numbers sort last
    Number,
    /// Decided at sort time by the first present value in the filtered rows
    Inferred,
}

/// A data view column.
pub struct Column<T, N = String> {
    /// Unique identifier for this column.
    pub id: String,
    /// Header text displayed at the top.
    pub header: String,
    pub accessor: Accessor,
    pub sortable: bool,
    pub kind: ColumnKind,
    /// Overrides the view's default cell renderer.
    pub cell: Option<CellRenderer<T, N>>,
}

impl<T, N> Column<T, N> {
    /// Create a column whose accessor is its id, read as a dotted path.
    pub fn new(id: impl Into<String>, header: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            accessor: Accessor::path(&id),
            id,
            header: header.into(),
            sortable: false,
            kind: ColumnKind::Text,
            cell: None,
        }
    }

    pub fn accessor(mut self, accessor: impl Into<Accessor>) -> Self {
        self.accessor = accessor.into();
        self
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn kind(mut self, kind: ColumnKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sortable numeric column.
    pub fn numeric(self) -> Self {
        self.sortable().kind(ColumnKind::Number)
    }

    pub fn cell(mut self, render: impl Fn(&T, Option<&Value>) -> N + Send + Sync + 'static) -> Self {
        self.cell = Some(Arc::new(render));
        self
    }
}

impl<T, N> Clone for Column<T, N> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            header: self.header.clone(),
            accessor: self.accessor.clone(),
            sortable: self.sortable,
            kind: self.kind,
            cell: self.cell.clone(),
        }
    }
}

impl<T, N> std::fmt::Debug for Column<T, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.id)
            .field("header", &self.header)
            .field("accessor", &self.accessor)
            .field("sortable", &self.sortable)
            .field("kind", &self.kind)
            .field("custom_cell", &self.cell.is_some())
            .finish()
    }
}

//! Render contract between the data view and the caller.
//!
//! The view decides which rows are shown and in which layout; every node is
//! produced by caller-supplied functions. Renderer panics are not caught.

use serde_json::Value;

use super::column::Column;
use super::sort::SortDirection;
use super::state::ViewType;

type HeaderFn<T, N> = Box<dyn Fn(&Column<T, N>, Option<SortDirection>) -> N>;
type CellFn<T, N> = Box<dyn Fn(&T, &Column<T, N>, Option<&Value>) -> N>;
type RowFn<T, N> = Box<dyn Fn(&T) -> N>;
type ViewFn<N> = Box<dyn Fn(ViewType) -> N>;

/// Caller-supplied renderers.
///
/// Header, cell and placeholder renderers are required. List items and grid
/// cards fall back to the first column's cell when not set.
pub struct Renderers<T, N> {
    pub(crate) header: HeaderFn<T, N>,
    pub(crate) cell: CellFn<T, N>,
    pub(crate) placeholder: ViewFn<N>,
    pub(crate) list_item: Option<RowFn<T, N>>,
    pub(crate) card: Option<RowFn<T, N>>,
    pub(crate) create: Option<ViewFn<N>>,
}

impl<T, N> Renderers<T, N> {
    pub fn new(
        header: impl Fn(&Column<T, N>, Option<SortDirection>) -> N + 'static,
        cell: impl Fn(&T, &Column<T, N>, Option<&Value>) -> N + 'static,
        placeholder: impl Fn(ViewType) -> N + 'static,
    ) -> Self {
        Self {
            header: Box::new(header),
            cell: Box::new(cell),
            placeholder: Box::new(placeholder),
            list_item: None,
            card: None,
            create: None,
        }
    }

    pub fn list_item(mut self, render: impl Fn(&T) -> N + 'static) -> Self {
        self.list_item = Some(Box::new(render));
        self
    }

    pub fn card(mut self, render: impl Fn(&T) -> N + 'static) -> Self {
        self.card = Some(Box::new(render));
        self
    }

    /// Trailing "create new" affordance. Rendered only when the view has a
    /// create callback.
    pub fn create(mut self, render: impl Fn(ViewType) -> N + 'static) -> Self {
        self.create = Some(Box::new(render));
        self
    }

    /// One cell, honouring a column's own renderer.
    pub(crate) fn render_cell(&self, row: &T, column: &Column<T, N>, value: Option<&Value>) -> N {
        match &column.cell {
            Some(render) => render(row, value),
            None => (self.cell)(row, column, value),
        }
    }
}

/// Output of [`DataView::render`](super::DataView::render).
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedView<N> {
    Table {
        header: Vec<N>,
        /// One entry per row, one node per column
        rows: Vec<Vec<N>>,
        create: Option<N>,
    },
    List {
        items: Vec<N>,
        create: Option<N>,
    },
    Grid {
        cards: Vec<N>,
        create: Option<N>,
    },
    /// Nothing matched: a single placeholder replaces the normal chrome
    Empty {
        placeholder: N,
        create: Option<N>,
    },
}

impl<N> RenderedView<N> {
    pub fn is_empty(&self) -> bool {
        matches!(self, RenderedView::Empty { .. })
    }

    /// Number of row-level nodes (rows, items or cards).
    pub fn row_count(&self) -> usize {
        match self {
            RenderedView::Table { rows, .. } => rows.len(),
            RenderedView::List { items, .. } => items.len(),
            RenderedView::Grid { cards, .. } => cards.len(),
            RenderedView::Empty { .. } => 0,
        }
    }

    pub fn create(&self) -> Option<&N> {
        match self {
            RenderedView::Table { create, .. }
            | RenderedView::List { create, .. }
            | RenderedView::Grid { create, .. }
            | RenderedView::Empty { create, .. } => create.as_ref(),
        }
    }
}

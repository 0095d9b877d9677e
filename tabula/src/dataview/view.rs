//! Data view state.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::error::ViewError;
use crate::options::normalize_term;

use super::column::Column;
use super::config::DataViewConfig;
use super::pagination::{PageRange, page_bounds, page_count};
use super::record::{Accessor, Record};
use super::render::{RenderedView, Renderers};
use super::sort::{SortDirection, SortState, comparison_for, sort_indices};
use super::state::{ViewState, ViewType};

/// Callback behind the "create new" affordance.
pub type CreateCallback = Arc<dyn Fn() + Send + Sync>;

/// Unique identifier for a DataView instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DataViewId(usize);

impl DataViewId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for DataViewId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__dataview_{}", self.0)
    }
}

struct DataViewInner<T, N> {
    columns: Vec<Column<T, N>>,
    /// Source rows, never reordered
    rows: Vec<T>,
    config: DataViewConfig,
    state: ViewState,
    /// Indices into `rows` after filtering and sorting
    visible: Vec<usize>,
    on_create: Option<CreateCallback>,
}

impl<T: Record, N> DataViewInner<T, N> {
    fn filter_accessors(&self) -> Vec<Accessor> {
        if self.config.filter_paths.is_empty() {
            self.columns
                .iter()
                .map(|column| column.accessor.clone())
                .collect()
        } else {
            self.config
                .filter_paths
                .iter()
                .map(|path| Accessor::path(path))
                .collect()
        }
    }

    fn column(&self, id: &str) -> Result<&Column<T, N>, ViewError> {
        self.columns
            .iter()
            .find(|column| column.id == id)
            .ok_or_else(|| ViewError::UnknownColumn(id.to_string()))
    }

    fn sortable_column(&self, id: &str) -> Result<&Column<T, N>, ViewError> {
        let column = self.column(id)?;
        if column.sortable {
            Ok(column)
        } else {
            Err(ViewError::NotSortable(id.to_string()))
        }
    }

    /// Recompute the visible index list: filter, then sort, then clamp the
    /// page.
    fn derive(&mut self) {
        let needle = normalize_term(&self.state.filter_term);
        let accessors = self.filter_accessors();
        let mut visible: Vec<usize> = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| {
                needle.is_empty()
                    || accessors.iter().any(|accessor| {
                        accessor
                            .resolve_text(*row)
                            .is_some_and(|text| text.to_lowercase().contains(&needle))
                    })
            })
            .map(|(index, _)| index)
            .collect();

        if let Some(sort) = &self.state.sort
            && let Some(column) = self.columns.iter().find(|c| c.id == sort.column_id)
        {
            let comparison = comparison_for(
                column.kind,
                &column.accessor,
                visible.iter().filter_map(|&index| self.rows.get(index)),
            );
            sort_indices(
                &self.rows,
                &mut visible,
                &column.accessor,
                comparison,
                sort.direction,
            );
        }

        self.visible = visible;
        self.clamp_page();
    }

    fn page_count(&self) -> usize {
        page_count(self.visible.len(), self.config.page_size)
    }

    fn clamp_page(&mut self) {
        let last = self.page_count() - 1;
        if self.state.page_index > last {
            log::debug!(
                "[dataview] page {} clamped to {}",
                self.state.page_index + 1,
                last + 1
            );
            self.state.page_index = last;
        }
    }

    fn page_indices(&self) -> &[usize] {
        let bounds = page_bounds(
            self.visible.len(),
            self.config.page_size,
            self.state.page_index,
        );
        &self.visible[bounds]
    }
}

/// Search, sort, pagination and view switching over a caller's rows.
///
/// The view never mutates or reorders the rows it is given: it keeps an
/// index list of the rows that pass the global filter, in sort order, and
/// pages over that list. Table, list and grid layouts all render the same
/// page.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use tabula::dataview::{Column, DataView, DataViewConfig};
///
/// let view: DataView<serde_json::Value> = DataView::new(
///     vec![Column::new("name", "Name").sortable()],
///     DataViewConfig::default(),
/// );
/// view.set_rows(Some(vec![json!({"name": "Zeta"}), json!({"name": "Alpha"})]));
/// view.toggle_sort("name").unwrap();
/// let names: Vec<_> = view.page_rows().iter().map(|r| r["name"].clone()).collect();
/// assert_eq!(names, vec![json!("Alpha"), json!("Zeta")]);
/// ```
pub struct DataView<T, N = String> {
    id: DataViewId,
    inner: Arc<RwLock<DataViewInner<T, N>>>,
    dirty: Arc<AtomicBool>,
}

impl<T, N> DataView<T, N>
where
    T: Record + Clone,
{
    /// Create an empty view in the config's initial state.
    ///
    /// The initial page is clamped like any restored page, so with no rows
    /// it starts on the first page; use [`with_rows`](Self::with_rows) to
    /// open on a later page.
    pub fn new(columns: Vec<Column<T, N>>, config: DataViewConfig) -> Self {
        let mut inner = DataViewInner {
            columns,
            rows: Vec::new(),
            state: ViewState::default(),
            config,
            visible: Vec::new(),
            on_create: None,
        };
        inner.config.page_size = inner.config.page_size.max(1);
        let initial = inner.config.initial.clone();
        let view = Self {
            id: DataViewId::new(),
            inner: Arc::new(RwLock::new(inner)),
            dirty: Arc::new(AtomicBool::new(false)),
        };
        view.restore(initial);
        view
    }

    /// Create a view over rows, then apply the config's initial state.
    pub fn with_rows(columns: Vec<Column<T, N>>, config: DataViewConfig, rows: Vec<T>) -> Self {
        let initial = config.initial.clone();
        let view = Self::new(columns, config);
        view.set_rows(Some(rows));
        view.restore(initial);
        view
    }

    /// Get the unique ID for this view.
    pub fn id(&self) -> DataViewId {
        self.id
    }

    pub fn id_string(&self) -> String {
        self.id.to_string()
    }

    fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::SeqCst);
    }

    // -------------------------------------------------------------------------
    // Rows and columns
    // -------------------------------------------------------------------------

    /// Replace the source rows. `None` is treated as no rows.
    ///
    /// Filter, sort and page survive; the page is clamped if the result
    /// shrank.
    pub fn set_rows(&self, rows: Option<Vec<T>>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.rows = rows.unwrap_or_default();
            guard.derive();
            log::debug!(
                "[dataview] {} rows set: {} total, {} visible",
                self.id,
                guard.rows.len(),
                guard.visible.len()
            );
            self.mark_dirty();
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|g| g.rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of rows passing the filter.
    pub fn filtered_len(&self) -> usize {
        self.inner.read().map(|g| g.visible.len()).unwrap_or(0)
    }

    /// All rows passing the filter, in sort order.
    pub fn filtered_rows(&self) -> Vec<T> {
        self.inner
            .read()
            .map(|g| {
                g.visible
                    .iter()
                    .filter_map(|&index| g.rows.get(index).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Rows on the current page, in sort order.
    pub fn page_rows(&self) -> Vec<T> {
        self.inner
            .read()
            .map(|g| {
                g.page_indices()
                    .iter()
                    .filter_map(|&index| g.rows.get(index).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn columns(&self) -> Vec<Column<T, N>> {
        self.inner
            .read()
            .map(|g| g.columns.clone())
            .unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Filtering
    // -------------------------------------------------------------------------

    pub fn filter_term(&self) -> String {
        self.inner
            .read()
            .map(|g| g.state.filter_term.clone())
            .unwrap_or_default()
    }

    /// Set the global filter term and go back to the first page.
    pub fn set_filter(&self, term: impl Into<String>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.state.filter_term = term.into();
            guard.state.page_index = 0;
            guard.derive();
            log::debug!(
                "[dataview] {} filter {:?}: {} of {} rows",
                self.id,
                guard.state.filter_term,
                guard.visible.len(),
                guard.rows.len()
            );
            self.mark_dirty();
        }
    }

    // -------------------------------------------------------------------------
    // Sorting
    // -------------------------------------------------------------------------

    /// Get current sort state.
    pub fn sort(&self) -> Option<SortState> {
        self.inner.read().ok().and_then(|g| g.state.sort.clone())
    }

    /// Toggle sort for a column.
    ///
    /// If the column is already sorted, toggles the direction.
    /// If sorting a different column, sorts ascending.
    /// Returns the new sort state.
    pub fn toggle_sort(&self, column_id: &str) -> Result<SortState, ViewError> {
        let Ok(mut guard) = self.inner.write() else {
            return Err(ViewError::UnknownColumn(column_id.to_string()));
        };
        guard.sortable_column(column_id)?;
        let next = match &guard.state.sort {
            Some(sort) if sort.column_id == column_id => {
                SortState::new(column_id, sort.direction.toggled())
            }
            _ => SortState::ascending(column_id),
        };
        guard.state.sort = Some(next.clone());
        guard.derive();
        log::debug!("[dataview] {} sort {:?}", self.id, next);
        self.mark_dirty();
        Ok(next)
    }

    /// Set sort by column and direction.
    pub fn set_sort(&self, column_id: &str, direction: SortDirection) -> Result<(), ViewError> {
        let Ok(mut guard) = self.inner.write() else {
            return Err(ViewError::UnknownColumn(column_id.to_string()));
        };
        guard.sortable_column(column_id)?;
        guard.state.sort = Some(SortState::new(column_id, direction));
        guard.derive();
        self.mark_dirty();
        Ok(())
    }

    /// Clear sort state: rows go back to source order.
    pub fn clear_sort(&self) {
        if let Ok(mut guard) = self.inner.write()
            && guard.state.sort.take().is_some()
        {
            guard.derive();
            self.mark_dirty();
        }
    }

    // -------------------------------------------------------------------------
    // Pagination
    // -------------------------------------------------------------------------

    pub fn page_size(&self) -> usize {
        self.inner.read().map(|g| g.config.page_size).unwrap_or(1)
    }

    /// Change the page size and go back to the first page.
    pub fn set_page_size(&self, page_size: usize) -> Result<(), ViewError> {
        if page_size == 0 {
            return Err(ViewError::ZeroPageSize);
        }
        if let Ok(mut guard) = self.inner.write() {
            guard.config.page_size = page_size;
            guard.state.page_index = 0;
            self.mark_dirty();
        }
        Ok(())
    }

    /// Number of pages, at least one.
    pub fn page_count(&self) -> usize {
        self.inner.read().map(|g| g.page_count()).unwrap_or(1)
    }

    /// Current page, 1-based.
    pub fn current_page(&self) -> usize {
        self.page_index() + 1
    }

    /// Current page, zero-based.
    pub fn page_index(&self) -> usize {
        self.inner.read().map(|g| g.state.page_index).unwrap_or(0)
    }

    pub fn can_next(&self) -> bool {
        self.current_page() < self.page_count()
    }

    pub fn can_prev(&self) -> bool {
        self.page_index() > 0
    }

    /// Advance one page. No-op on the last page.
    pub fn next_page(&self) -> bool {
        self.step_page(|index, count| (index + 1 < count).then_some(index + 1))
    }

    /// Go back one page. No-op on the first page.
    pub fn prev_page(&self) -> bool {
        self.step_page(|index, _| index.checked_sub(1))
    }

    pub fn first_page(&self) -> bool {
        self.step_page(|index, _| (index != 0).then_some(0))
    }

    pub fn last_page(&self) -> bool {
        self.step_page(|index, count| (index + 1 != count).then_some(count - 1))
    }

    fn step_page(&self, step: impl FnOnce(usize, usize) -> Option<usize>) -> bool {
        let Ok(mut guard) = self.inner.write() else {
            return false;
        };
        let count = guard.page_count();
        match step(guard.state.page_index, count) {
            Some(next) => {
                guard.state.page_index = next;
                log::trace!("[dataview] {} page {}/{}", self.id, next + 1, count);
                self.mark_dirty();
                true
            }
            None => false,
        }
    }

    /// Jump to a 1-based page. Out-of-range requests leave the page as is.
    pub fn go_to_page(&self, page: usize) -> Result<(), ViewError> {
        let Ok(mut guard) = self.inner.write() else {
            return Ok(());
        };
        let page_count = guard.page_count();
        if page == 0 || page > page_count {
            return Err(ViewError::PageOutOfRange {
                requested: page,
                page_count,
            });
        }
        guard.state.page_index = page - 1;
        self.mark_dirty();
        Ok(())
    }

    /// Rows shown on the current page, for "Showing 11-20 of 23".
    pub fn page_range(&self) -> PageRange {
        self.inner
            .read()
            .map(|g| {
                let bounds =
                    page_bounds(g.visible.len(), g.config.page_size, g.state.page_index);
                PageRange::new(bounds, g.visible.len())
            })
            .unwrap_or(PageRange {
                first: 0,
                last: 0,
                total: 0,
            })
    }

    // -------------------------------------------------------------------------
    // View type and state
    // -------------------------------------------------------------------------

    pub fn view_type(&self) -> ViewType {
        self.inner
            .read()
            .map(|g| g.state.view_type)
            .unwrap_or_default()
    }

    /// Switch layout. Filter, sort and page are untouched.
    pub fn set_view_type(&self, view_type: ViewType) {
        if let Ok(mut guard) = self.inner.write()
            && guard.state.view_type != view_type
        {
            guard.state.view_type = view_type;
            log::debug!("[dataview] {} view {:?}", self.id, view_type);
            self.mark_dirty();
        }
    }

    /// Snapshot of the user-facing state.
    pub fn view_state(&self) -> ViewState {
        self.inner
            .read()
            .map(|g| g.state.clone())
            .unwrap_or_default()
    }

    /// Restore a saved state.
    ///
    /// A sort on an unknown or non-sortable column is dropped; the page is
    /// clamped to the current rows.
    pub fn restore(&self, mut state: ViewState) {
        if let Ok(mut guard) = self.inner.write() {
            if let Some(sort) = &state.sort
                && let Err(err) = guard.sortable_column(&sort.column_id)
            {
                log::warn!("[dataview] ignoring saved sort: {}", err);
                state.sort = None;
            }
            guard.state = state;
            guard.derive();
            self.mark_dirty();
        }
    }

    // -------------------------------------------------------------------------
    // Create affordance
    // -------------------------------------------------------------------------

    /// Register the "create new" callback. Without one, no create affordance
    /// is rendered.
    pub fn on_create(&self, callback: impl Fn() + Send + Sync + 'static) {
        if let Ok(mut guard) = self.inner.write() {
            guard.on_create = Some(Arc::new(callback));
            self.mark_dirty();
        }
    }

    /// Activate the create affordance. Returns false when there is none.
    pub fn create_new(&self) -> bool {
        let callback = self.inner.read().ok().and_then(|g| g.on_create.clone());
        match callback {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }

    // -------------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------------

    /// Render the current page in the current layout.
    ///
    /// Renderers run after the view's lock is released, on copies of the
    /// page rows.
    pub fn render(&self, renderers: &Renderers<T, N>) -> RenderedView<N> {
        let (view_type, sort, columns, rows, has_create) = match self.inner.read() {
            Ok(g) => (
                g.state.view_type,
                g.state.sort.clone(),
                g.columns.clone(),
                g.page_indices()
                    .iter()
                    .filter_map(|&index| g.rows.get(index).cloned())
                    .collect::<Vec<T>>(),
                g.on_create.is_some(),
            ),
            Err(_) => (ViewType::default(), None, Vec::new(), Vec::new(), false),
        };

        let create = if has_create {
            renderers.create.as_ref().map(|render| render(view_type))
        } else {
            None
        };

        if rows.is_empty() {
            return RenderedView::Empty {
                placeholder: (renderers.placeholder)(view_type),
                create,
            };
        }

        let first_cell = |row: &T| match columns.first() {
            Some(column) => renderers.render_cell(row, column, column.accessor.resolve(row)),
            None => (renderers.placeholder)(view_type),
        };

        match view_type {
            ViewType::Table => RenderedView::Table {
                header: columns
                    .iter()
                    .map(|column| {
                        let direction = sort
                            .as_ref()
                            .filter(|sort| sort.column_id == column.id)
                            .map(|sort| sort.direction);
                        (renderers.header)(column, direction)
                    })
                    .collect(),
                rows: rows
                    .iter()
                    .map(|row| {
                        columns
                            .iter()
                            .map(|column| {
                                renderers.render_cell(row, column, column.accessor.resolve(row))
                            })
                            .collect()
                    })
                    .collect(),
                create,
            },
            ViewType::List => RenderedView::List {
                items: rows
                    .iter()
                    .map(|row| match &renderers.list_item {
                        Some(render) => render(row),
                        None => first_cell(row),
                    })
                    .collect(),
                create,
            },
            ViewType::Grid => RenderedView::Grid {
                cards: rows
                    .iter()
                    .map(|row| match &renderers.card {
                        Some(render) => render(row),
                        None => first_cell(row),
                    })
                    .collect(),
                create,
            },
        }
    }

    // -------------------------------------------------------------------------
    // Dirty tracking
    // -------------------------------------------------------------------------

    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}

impl<T, N> Clone for DataView<T, N> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: Arc::clone(&self.inner),
            dirty: Arc::clone(&self.dirty),
        }
    }
}

impl<T, N> std::fmt::Debug for DataView<T, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.read().map(|g| g.state.clone()).ok();
        f.debug_struct("DataView")
            .field("id", &self.id)
            .field("state", &state)
            .finish()
    }
}

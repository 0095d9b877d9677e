//! Floating combobox state.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock, Weak};

use floatdom::{
    Document, Event, EventKind, FrameHandle, FrameScheduler, Key, Modifiers, Phase, Rect,
    Subscription, Viewport,
};

use crate::error::SelectionError;
use crate::navigation::{CommitOutcome, NavigableList};
use crate::options::{OptionItem, OptionState, filter_indices, group_indices, normalize_term};
use crate::outside::{self, OutsideClickGuard};
use crate::overlay::{OverlaySlot, OverlaySurface};
use crate::position::{Placement, PlacementTracker};
use crate::selection::{SelectionModel, SelectionValue};

use super::config::ComboboxConfig;
use super::events::{ComboState, EventResult};
use super::render::{OverlayRow, RowKind, layout_rows, row_of, scroll_to_reveal};

/// Callback fired with the raw search term on every term change.
pub type SearchCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Unique identifier for a Combobox instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComboboxId(usize);

impl ComboboxId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for ComboboxId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__combobox_{}", self.0)
    }
}

/// Where the combobox lives while mounted.
struct Mount {
    document: Document,
    trigger_id: String,
    slot: OverlaySlot,
    /// Trigger and overlay input (pointer, touch, keys)
    _input: Subscription,
}

/// Resources held only while the overlay is open.
///
/// Dropping the session detaches its listeners and cancels its frames.
struct OpenSession {
    frames: FrameScheduler,
    _outside: OutsideClickGuard,
    _viewport: Subscription,
    measure_frame: Option<FrameHandle>,
    scroll_frame: Option<FrameHandle>,
}

impl Drop for OpenSession {
    fn drop(&mut self) {
        for handle in [self.measure_frame.take(), self.scroll_frame.take()]
            .into_iter()
            .flatten()
        {
            if self.frames.cancel(handle) {
                log::trace!("[combobox] cancelled pending frame {:?}", handle);
            }
        }
    }
}

struct ComboboxInner<T> {
    config: ComboboxConfig,
    state: ComboState,
    options: Vec<OptionItem<T>>,
    term: String,
    /// Indices into `options`, in display order
    filtered: Vec<usize>,
    selection: SelectionModel<T>,
    list: NavigableList,
    tracker: PlacementTracker,
    /// First visible row of the overlay list
    scroll_offset: usize,
    mount: Option<Mount>,
    session: Option<OpenSession>,
    on_search: Option<SearchCallback>,
}

impl<T: Clone + PartialEq> ComboboxInner<T> {
    fn refilter(&mut self) {
        let matched = filter_indices(&self.options, &self.term, self.config.match_mode);
        self.filtered = if self.config.grouped {
            group_indices(&self.options, &matched)
                .into_iter()
                .flat_map(|group| group.indices)
                .collect()
        } else {
            matched
        };
    }

    fn rows(&self) -> Vec<RowKind> {
        layout_rows(&self.options, &self.filtered, self.config.grouped)
    }

    fn domain(&self) -> Vec<T> {
        self.options.iter().map(|option| option.value.clone()).collect()
    }

    fn visible_rows(&self) -> usize {
        usize::try_from(self.tracker.size().height).unwrap_or(1)
    }

    fn scroll_highlight_into_view(&mut self) {
        let Some(position) = self.list.highlighted() else {
            return;
        };
        if let Some(row) = row_of(&self.rows(), position) {
            self.scroll_offset = scroll_to_reveal(self.scroll_offset, row, self.visible_rows());
        }
    }

    fn trigger_rect(&self) -> Option<(Rect, Viewport)> {
        let mount = self.mount.as_ref()?;
        let trigger = mount.document.client_rect(&mount.trigger_id)?;
        Some((trigger, mount.document.viewport()))
    }
}

/// Non-owning handle captured by listener and frame callbacks.
struct WeakCombobox<T> {
    id: ComboboxId,
    inner: Weak<RwLock<ComboboxInner<T>>>,
    dirty: Weak<AtomicBool>,
}

impl<T> WeakCombobox<T> {
    fn upgrade(&self) -> Option<Combobox<T>> {
        Some(Combobox {
            id: self.id,
            inner: self.inner.upgrade()?,
            dirty: self.dirty.upgrade()?,
        })
    }
}

/// What an input event means for this combobox.
enum Route {
    Toggle,
    Row(usize),
    Key(Key, Modifiers),
}

/// A floating combobox: option list, search term, highlight and selection
/// behind one shared handle.
///
/// Select, dropdown-menu and search-palette surfaces are all this type with a
/// different [`ComboboxConfig`]. The combobox works unmounted (pure state, no
/// overlay) and, once [`mount`](Combobox::mount)ed, positions its overlay in
/// an [`OverlaySurface`] and listens for outside presses and viewport
/// changes while open.
///
/// Change and search callbacks always run after the internal lock is
/// released, so they may call back into the combobox.
///
/// # Example
///
/// ```
/// use tabula::combobox::{ComboState, Combobox, ComboboxConfig};
/// use tabula::options::OptionItem;
///
/// let combobox = Combobox::new(ComboboxConfig::search_palette());
/// combobox.set_options(vec![
///     OptionItem::new("a", "Apple"),
///     OptionItem::new("b", "Banana"),
/// ]);
/// combobox.set_search_term("an");
/// assert_eq!(combobox.state(), ComboState::OpenFiltered);
/// assert_eq!(combobox.filtered_labels(), vec!["Banana".to_string()]);
/// ```
pub struct Combobox<T> {
    id: ComboboxId,
    inner: Arc<RwLock<ComboboxInner<T>>>,
    dirty: Arc<AtomicBool>,
}

impl<T> Combobox<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Create an uncontrolled combobox in the config's selection mode.
    pub fn new(config: ComboboxConfig) -> Self {
        let selection = SelectionModel::uncontrolled(config.mode);
        Self::with_selection(config, selection)
    }

    /// Create a combobox over an existing selection model.
    ///
    /// The model's mode wins over `config.mode`.
    pub fn with_selection(mut config: ComboboxConfig, selection: SelectionModel<T>) -> Self {
        config.mode = selection.mode();
        let tracker = PlacementTracker::new(config.position, config.estimate());
        let list = NavigableList::new(config.highlight_reset);
        Self {
            id: ComboboxId::new(),
            inner: Arc::new(RwLock::new(ComboboxInner {
                config,
                state: ComboState::Closed,
                options: Vec::new(),
                term: String::new(),
                filtered: Vec::new(),
                selection,
                list,
                tracker,
                scroll_offset: 0,
                mount: None,
                session: None,
                on_search: None,
            })),
            dirty: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Controlled combobox: the caller owns the value.
    pub fn controlled(
        config: ComboboxConfig,
        value: SelectionValue<T>,
        on_change: impl Fn(&SelectionValue<T>) + Send + Sync + 'static,
    ) -> Self {
        Self::with_selection(config, SelectionModel::controlled(value, on_change))
    }

    /// Get the unique ID for this combobox.
    pub fn id(&self) -> ComboboxId {
        self.id
    }

    /// Get the ID as a string (for node binding).
    pub fn id_string(&self) -> String {
        self.id.to_string()
    }

    fn downgrade(&self) -> WeakCombobox<T> {
        WeakCombobox {
            id: self.id,
            inner: Arc::downgrade(&self.inner),
            dirty: Arc::downgrade(&self.dirty),
        }
    }

    fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::SeqCst);
    }

    // -------------------------------------------------------------------------
    // Configuration
    // -------------------------------------------------------------------------

    pub fn config(&self) -> ComboboxConfig {
        self.inner
            .read()
            .map(|guard| guard.config.clone())
            .unwrap_or_default()
    }

    pub fn placeholder(&self) -> String {
        self.inner
            .read()
            .map(|guard| guard.config.placeholder.clone())
            .unwrap_or_default()
    }

    /// Register the search callback, fired with the raw term on every change.
    pub fn on_search(&self, callback: impl Fn(&str) + Send + Sync + 'static) {
        if let Ok(mut guard) = self.inner.write() {
            guard.on_search = Some(Arc::new(callback));
        }
    }

    // -------------------------------------------------------------------------
    // Options
    // -------------------------------------------------------------------------

    /// Replace the option set.
    ///
    /// The term is kept, so the highlight is clamped rather than reset.
    /// Uncontrolled values that are no longer offered are dropped.
    pub fn set_options(&self, options: Vec<OptionItem<T>>) {
        let emit = {
            let Ok(mut guard) = self.inner.write() else {
                return;
            };
            guard.options = options;
            guard.refilter();
            let len = guard.filtered.len();
            guard.list.resize(len);
            let rows = guard.rows().len();
            guard.scroll_offset = guard.scroll_offset.min(rows.saturating_sub(1));
            let domain = guard.domain();
            guard.selection.retain_domain(&domain)
        };
        self.mark_dirty();
        if let Some(emit) = emit {
            emit.dispatch();
        }
    }

    pub fn options_count(&self) -> usize {
        self.inner
            .read()
            .map(|guard| guard.options.len())
            .unwrap_or(0)
    }

    /// Options matching the current term, in display order.
    pub fn filtered(&self) -> Vec<OptionItem<T>> {
        self.inner
            .read()
            .map(|guard| {
                guard
                    .filtered
                    .iter()
                    .filter_map(|&index| guard.options.get(index).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn filtered_labels(&self) -> Vec<String> {
        self.filtered()
            .into_iter()
            .map(|option| option.label)
            .collect()
    }

    pub fn filtered_count(&self) -> usize {
        self.inner
            .read()
            .map(|guard| guard.filtered.len())
            .unwrap_or(0)
    }

    // -------------------------------------------------------------------------
    // Search term
    // -------------------------------------------------------------------------

    pub fn term(&self) -> String {
        self.inner
            .read()
            .map(|guard| guard.term.clone())
            .unwrap_or_default()
    }

    /// Replace the search term. Opens the overlay if it is closed.
    pub fn set_search_term(&self, term: impl Into<String>) {
        let term = term.into();
        if !self.is_open() {
            self.open();
        }
        let callback = {
            let Ok(mut guard) = self.inner.write() else {
                return;
            };
            if guard.term == term || !guard.state.is_open() {
                return;
            }
            guard.term = term.clone();
            guard.refilter();
            let len = guard.filtered.len();
            guard.list.reset_to(len);
            guard.scroll_offset = 0;
            guard.state = if normalize_term(&term).is_empty() {
                ComboState::OpenUnfiltered
            } else {
                ComboState::OpenFiltered
            };
            log::trace!(
                "[combobox] {} term {:?} -> {} matches",
                self.id,
                term,
                len
            );
            guard.on_search.clone()
        };
        self.mark_dirty();
        if let Some(callback) = callback {
            callback(&term);
        }
    }

    // -------------------------------------------------------------------------
    // Open/close state
    // -------------------------------------------------------------------------

    pub fn state(&self) -> ComboState {
        self.inner
            .read()
            .map(|guard| guard.state)
            .unwrap_or_default()
    }

    /// Check if the overlay is open.
    pub fn is_open(&self) -> bool {
        self.state().is_open()
    }

    /// Open the overlay with an empty term.
    ///
    /// When mounted, the overlay is placed with the estimated size, then a
    /// frame measures the painted overlay and places it again. Outside
    /// presses, resize and scroll are watched until the overlay closes.
    pub fn open(&self) {
        let Ok(mut guard) = self.inner.write() else {
            return;
        };
        if guard.state.is_open() {
            return;
        }
        guard.term.clear();
        guard.refilter();
        let len = guard.filtered.len();
        guard.list.reset_to(len);
        guard.scroll_offset = 0;
        guard.state = ComboState::OpenUnfiltered;

        let inner = &mut *guard;
        if let Some(mount) = &inner.mount {
            let trigger = mount
                .document
                .client_rect(&mount.trigger_id)
                .unwrap_or_default();
            let placement = inner.tracker.open(trigger, mount.document.viewport());
            mount.slot.show(placement);
            inner.session = Some(self.start_session(mount));
        }
        log::debug!("[combobox] {} opened with {} options", self.id, len);
        self.mark_dirty();
    }

    /// Close the overlay. The selection is not touched.
    ///
    /// Listeners and pending frames of the open session are released before
    /// this returns.
    pub fn close(&self) -> bool {
        let session = {
            let Ok(mut guard) = self.inner.write() else {
                return false;
            };
            if !guard.state.is_open() {
                return false;
            }
            guard.state = ComboState::Closed;
            guard.list.clear_highlight();
            guard.tracker.discard();
            guard.scroll_offset = 0;
            if let Some(mount) = &guard.mount {
                mount.slot.hide();
            }
            guard.session.take()
        };
        drop(session);
        log::debug!("[combobox] {} closed", self.id);
        self.mark_dirty();
        true
    }

    /// Toggle the overlay open/closed.
    pub fn toggle(&self) {
        if self.is_open() {
            self.close();
        } else {
            self.open();
        }
    }

    /// Escape: close without changing the selection.
    pub fn escape(&self) -> bool {
        if let Ok(mut guard) = self.inner.write() {
            guard.list.escape();
        }
        self.close()
    }

    fn start_session(&self, mount: &Mount) -> OpenSession {
        let owned = vec![
            mount.trigger_id.clone(),
            mount.slot.content_id().to_string(),
        ];
        let weak = self.downgrade();
        let outside = outside::attach(&mount.document, owned, move |_| {
            if let Some(combobox) = weak.upgrade() {
                combobox.close();
            }
        });

        let weak = self.downgrade();
        let viewport = mount.document.listeners().subscribe(
            &[EventKind::Resize, EventKind::Scroll],
            Phase::Capture,
            move |_| {
                if let Some(combobox) = weak.upgrade() {
                    combobox.reposition();
                }
            },
        );

        let frames = mount.document.frames().clone();
        let weak = self.downgrade();
        let measure_frame = frames.request(move || {
            if let Some(combobox) = weak.upgrade() {
                combobox.measure();
            }
        });

        OpenSession {
            frames,
            _outside: outside,
            _viewport: viewport,
            measure_frame,
            scroll_frame: None,
        }
    }

    /// Second placement pass with the painted overlay's size.
    fn measure(&self) {
        let Ok(mut guard) = self.inner.write() else {
            return;
        };
        if let Some(session) = guard.session.as_mut() {
            session.measure_frame = None;
        }
        let Some((trigger, viewport)) = guard.trigger_rect() else {
            return;
        };
        let inner = &mut *guard;
        let Some(mount) = &inner.mount else {
            return;
        };
        if !inner.state.is_open() {
            return;
        }
        let measured = mount
            .document
            .element_rect(mount.slot.content_id())
            .map(|rect| rect.size())
            .unwrap_or_else(|| inner.tracker.size());
        let placement = inner.tracker.painted(measured, trigger, viewport);
        mount.slot.update(placement);
        log::trace!("[combobox] {} measured {:?}", self.id, measured);
        self.mark_dirty();
    }

    /// Recompute placement after a viewport change.
    fn reposition(&self) {
        let Ok(mut guard) = self.inner.write() else {
            return;
        };
        let Some((trigger, viewport)) = guard.trigger_rect() else {
            return;
        };
        let inner = &mut *guard;
        if let Some(placement) = inner.tracker.recompute(trigger, viewport)
            && let Some(mount) = &inner.mount
        {
            mount.slot.update(placement);
            self.mark_dirty();
        }
    }

    /// Current overlay placement (None while closed or unmounted).
    pub fn placement(&self) -> Option<Placement> {
        self.inner
            .read()
            .ok()
            .and_then(|guard| guard.tracker.placement())
    }

    /// Number of placement computations so far.
    pub fn placement_computations(&self) -> usize {
        self.inner
            .read()
            .map(|guard| guard.tracker.computations())
            .unwrap_or(0)
    }

    // -------------------------------------------------------------------------
    // Highlight navigation
    // -------------------------------------------------------------------------

    /// Highlighted filtered position, -1 when nothing is highlighted.
    pub fn highlighted_index(&self) -> isize {
        self.inner
            .read()
            .map(|guard| guard.list.highlighted_index())
            .unwrap_or(-1)
    }

    pub fn highlighted(&self) -> Option<OptionItem<T>> {
        self.inner.read().ok().and_then(|guard| {
            let position = guard.list.highlighted()?;
            let index = *guard.filtered.get(position)?;
            guard.options.get(index).cloned()
        })
    }

    pub fn move_next(&self) -> Option<usize> {
        self.navigate(NavigableList::move_next)
    }

    pub fn move_prev(&self) -> Option<usize> {
        self.navigate(NavigableList::move_prev)
    }

    pub fn move_first(&self) -> Option<usize> {
        self.navigate(NavigableList::move_first)
    }

    pub fn move_last(&self) -> Option<usize> {
        self.navigate(NavigableList::move_last)
    }

    /// Highlight a filtered position (pointer hover).
    pub fn highlight(&self, position: usize) -> bool {
        self.navigate(|list| list.set_highlight(position).then_some(position))
            .is_some()
    }

    fn navigate(&self, step: impl FnOnce(&mut NavigableList) -> Option<usize>) -> Option<usize> {
        let moved = {
            let Ok(mut guard) = self.inner.write() else {
                return None;
            };
            if !guard.state.is_open() {
                return None;
            }
            let moved = step(&mut guard.list);
            if moved.is_some() {
                guard.state = ComboState::OpenHighlighted;
            }
            moved
        };
        if moved.is_some() {
            self.mark_dirty();
            self.schedule_scroll_into_view();
        }
        moved
    }

    /// Bring the highlighted row into view on the next frame.
    ///
    /// A newer request replaces a pending one. Unmounted comboboxes scroll
    /// immediately.
    fn schedule_scroll_into_view(&self) {
        let weak = self.downgrade();
        let Ok(mut guard) = self.inner.write() else {
            return;
        };
        match guard.session.as_mut() {
            Some(session) => {
                if let Some(pending) = session.scroll_frame.take() {
                    session.frames.cancel(pending);
                }
                session.scroll_frame = session.frames.request(move || {
                    if let Some(combobox) = weak.upgrade() {
                        combobox.reveal_highlight();
                    }
                });
            }
            None => guard.scroll_highlight_into_view(),
        }
    }

    fn reveal_highlight(&self) {
        if let Ok(mut guard) = self.inner.write() {
            if let Some(session) = guard.session.as_mut() {
                session.scroll_frame = None;
            }
            guard.scroll_highlight_into_view();
            self.mark_dirty();
        }
    }

    /// First visible row of the overlay list.
    pub fn scroll_offset(&self) -> usize {
        self.inner
            .read()
            .map(|guard| guard.scroll_offset)
            .unwrap_or(0)
    }

    // -------------------------------------------------------------------------
    // Commit
    // -------------------------------------------------------------------------

    /// Commit the highlighted option. Returns false when nothing is
    /// highlighted.
    pub fn commit_highlighted(&self) -> bool {
        let position = self
            .inner
            .read()
            .ok()
            .and_then(|guard| guard.list.highlighted());
        match position {
            Some(position) => self.commit(position),
            None => false,
        }
    }

    /// Commit the option at a filtered position.
    ///
    /// Single mode selects and closes; multiple mode toggles and stays open.
    pub fn commit(&self, position: usize) -> bool {
        let (emit, outcome) = {
            let Ok(mut guard) = self.inner.write() else {
                return false;
            };
            if !guard.state.is_open() {
                return false;
            }
            let inner = &mut *guard;
            let Some(commit) = inner.list.commit(position, inner.selection.mode()) else {
                return false;
            };
            let Some(option) = inner
                .filtered
                .get(commit.index)
                .and_then(|&index| inner.options.get(index))
            else {
                return false;
            };
            let emit = inner.selection.commit(option.value.clone());
            if !inner.config.retain_selection {
                inner
                    .selection
                    .reset(SelectionValue::empty(inner.selection.mode()));
            }
            log::debug!("[combobox] {} committed position {}", self.id, position);
            (emit, commit.outcome)
        };
        self.mark_dirty();
        if outcome == CommitOutcome::Close {
            self.close();
        }
        emit.dispatch();
        true
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    pub fn value(&self) -> SelectionValue<T> {
        let mode = self.config().mode;
        self.inner
            .read()
            .map(|guard| guard.selection.value().clone())
            .unwrap_or_else(|_| SelectionValue::empty(mode))
    }

    pub fn is_controlled(&self) -> bool {
        self.inner
            .read()
            .map(|guard| guard.selection.is_controlled())
            .unwrap_or(false)
    }

    pub fn is_selected(&self, value: &T) -> bool {
        self.inner
            .read()
            .map(|guard| guard.selection.is_selected(value))
            .unwrap_or(false)
    }

    /// Labels of the selected options, in option order.
    pub fn selected_labels(&self) -> Vec<String> {
        self.inner
            .read()
            .map(|guard| {
                guard
                    .options
                    .iter()
                    .filter(|option| guard.selection.is_selected(&option.value))
                    .map(|option| option.label.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Text shown on the trigger: selected labels, or the placeholder.
    pub fn trigger_text(&self) -> String {
        let labels = self.selected_labels();
        if labels.is_empty() {
            self.placeholder()
        } else {
            labels.join(", ")
        }
    }

    /// Feed the caller's value back into a controlled combobox.
    pub fn sync(&self, value: SelectionValue<T>) -> Result<(), SelectionError> {
        let result = match self.inner.write() {
            Ok(mut guard) => guard.selection.sync(value),
            Err(_) => return Ok(()),
        };
        if result.is_ok() {
            self.mark_dirty();
        }
        result
    }

    /// Clear the selection.
    pub fn clear(&self) {
        let emit = match self.inner.write() {
            Ok(mut guard) => guard.selection.clear(),
            Err(_) => return,
        };
        self.mark_dirty();
        emit.dispatch();
    }

    // -------------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------------

    /// Rows of the overlay list, headings included.
    pub fn rows(&self) -> Vec<OverlayRow<T>> {
        let Ok(guard) = self.inner.read() else {
            return Vec::new();
        };
        guard
            .rows()
            .into_iter()
            .filter_map(|row| match row {
                RowKind::Heading(name) => Some(OverlayRow::Heading(name)),
                RowKind::Option(position) => {
                    let option = guard
                        .filtered
                        .get(position)
                        .and_then(|&index| guard.options.get(index))?;
                    Some(OverlayRow::Option {
                        position,
                        item: option.clone(),
                        state: OptionState {
                            highlighted: guard.list.highlighted() == Some(position),
                            selected: guard.selection.is_selected(&option.value),
                        },
                    })
                }
            })
            .collect()
    }

    /// Render every row with caller-supplied renderers.
    pub fn render<N>(
        &self,
        heading: impl Fn(&str) -> N,
        option: impl Fn(&OptionItem<T>, OptionState) -> N,
    ) -> Vec<N> {
        self.rows()
            .iter()
            .map(|row| match row {
                OverlayRow::Heading(name) => heading(name),
                OverlayRow::Option { item, state, .. } => option(item, *state),
            })
            .collect()
    }

    // -------------------------------------------------------------------------
    // Input
    // -------------------------------------------------------------------------

    /// Handle a key press aimed at the trigger or the overlay.
    pub fn handle_key(&self, key: Key, modifiers: Modifiers) -> EventResult {
        // Shortcuts belong to the shell
        if modifiers.ctrl || modifiers.alt || modifiers.meta {
            return EventResult::Ignored;
        }
        let searchable = self.config().searchable;

        if !self.is_open() {
            return match key {
                Key::Enter | Key::Down | Key::Up => {
                    self.open();
                    EventResult::Consumed
                }
                Key::Char(' ') if !searchable => {
                    self.open();
                    EventResult::Consumed
                }
                Key::Char(c) if searchable => {
                    self.set_search_term(c.to_string());
                    EventResult::Consumed
                }
                _ => EventResult::Ignored,
            };
        }

        match key {
            Key::Up => {
                self.move_prev();
                EventResult::Consumed
            }
            Key::Down => {
                self.move_next();
                EventResult::Consumed
            }
            Key::Home => {
                self.move_first();
                EventResult::Consumed
            }
            Key::End => {
                self.move_last();
                EventResult::Consumed
            }
            Key::Enter => {
                self.commit_highlighted();
                EventResult::Consumed
            }
            Key::Char(' ') if !searchable => {
                self.commit_highlighted();
                EventResult::Consumed
            }
            Key::Escape => {
                self.escape();
                EventResult::Consumed
            }
            Key::Tab | Key::BackTab => {
                self.close();
                EventResult::Ignored
            }
            Key::Char(c) if searchable => {
                let mut term = self.term();
                term.push(c);
                self.set_search_term(term);
                EventResult::Consumed
            }
            Key::Backspace if searchable => {
                let mut term = self.term();
                term.pop();
                self.set_search_term(term);
                EventResult::Consumed
            }
            _ => EventResult::Ignored,
        }
    }

    /// Commit the option painted at an overlay row (0 = first visible row).
    pub fn click_row(&self, row: usize) -> EventResult {
        let target = self.inner.read().ok().and_then(|guard| {
            let rows = guard.rows();
            match rows.get(row + guard.scroll_offset)? {
                RowKind::Option(position) => Some(*position),
                RowKind::Heading(_) => None,
            }
        });
        match target {
            Some(position) => {
                self.commit(position);
                EventResult::Consumed
            }
            None => EventResult::Ignored,
        }
    }

    fn route(&self, event: &Event) -> Option<Route> {
        let guard = self.inner.read().ok()?;
        let mount = guard.mount.as_ref()?;
        let content_id = mount.slot.content_id();
        match event {
            Event::PointerDown {
                target: Some(target),
                y,
                ..
            }
            | Event::TouchStart {
                target: Some(target),
                y,
                ..
            } => {
                if mount.document.contains(&mount.trigger_id, target) {
                    Some(Route::Toggle)
                } else if mount.document.contains(content_id, target) {
                    let content = mount.document.element_rect(content_id)?;
                    usize::try_from(y - content.top()).ok().map(Route::Row)
                } else {
                    None
                }
            }
            Event::Key {
                target: Some(target),
                key,
                modifiers,
            } if *target == mount.trigger_id || mount.document.contains(content_id, target) => {
                Some(Route::Key(*key, *modifiers))
            }
            _ => None,
        }
    }

    // -------------------------------------------------------------------------
    // Mounting
    // -------------------------------------------------------------------------

    /// Attach to a document and overlay surface.
    ///
    /// `trigger_id` names the trigger element; presses on it toggle the
    /// overlay and keys aimed at it drive navigation. Remounting unmounts
    /// first.
    pub fn mount(
        &self,
        document: &Document,
        surface: &OverlaySurface,
        trigger_id: impl Into<String>,
    ) {
        self.unmount();
        let trigger_id = trigger_id.into();
        let slot = surface.slot(self.id_string());

        let weak = self.downgrade();
        let input = document.listeners().subscribe(
            &[EventKind::PointerDown, EventKind::TouchStart, EventKind::Key],
            Phase::Bubble,
            move |event| {
                let Some(combobox) = weak.upgrade() else {
                    return;
                };
                match combobox.route(event) {
                    Some(Route::Toggle) => combobox.toggle(),
                    Some(Route::Row(row)) => {
                        combobox.click_row(row);
                    }
                    Some(Route::Key(key, modifiers)) => {
                        combobox.handle_key(key, modifiers);
                    }
                    None => {}
                }
            },
        );

        if let Ok(mut guard) = self.inner.write() {
            log::debug!("[combobox] {} mounted on {}", self.id, trigger_id);
            guard.mount = Some(Mount {
                document: document.clone(),
                trigger_id,
                slot,
                _input: input,
            });
        }
    }

    /// Force the overlay closed and release every listener, frame and the
    /// overlay slot.
    pub fn unmount(&self) {
        self.close();
        let mount = self.inner.write().ok().and_then(|mut guard| guard.mount.take());
        if let Some(mount) = mount {
            log::debug!("[combobox] {} unmounted from {}", self.id, mount.trigger_id);
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.inner
            .read()
            .map(|guard| guard.mount.is_some())
            .unwrap_or(false)
    }

    /// Element id the shell gives the painted overlay content.
    pub fn content_id(&self) -> Option<String> {
        self.inner.read().ok().and_then(|guard| {
            guard
                .mount
                .as_ref()
                .map(|mount| mount.slot.content_id().to_string())
        })
    }

    // -------------------------------------------------------------------------
    // Dirty tracking
    // -------------------------------------------------------------------------

    /// Check if the combobox state has changed.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Clear the dirty flag.
    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}

impl<T> Clone for Combobox<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: Arc::clone(&self.inner),
            dirty: Arc::clone(&self.dirty),
        }
    }
}

impl<T> std::fmt::Debug for Combobox<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.read().map(|guard| guard.state).ok();
        f.debug_struct("Combobox")
            .field("id", &self.id)
            .field("state", &state)
            .finish()
    }
}

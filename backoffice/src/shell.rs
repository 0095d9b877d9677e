//! The back-office screen: a product table with a status filter, an actions
//! menu and the global search palette, sharing one document and one overlay
//! surface.
//!
//! Input goes through [`Shell::dispatch`]; after every event the shell paints
//! the overlay surface into the document and runs one frame, so overlays get
//! their measured placement the way a terminal front end would.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use floatdom::{Document, Event, Key, Modifiers, MouseButton, Rect, Subscription, Viewport};
use serde_json::Value;
use tabula::combobox::{Combobox, OverlayRow};
use tabula::dataview::{
    Accessor, Column, DataView, RenderedView, Renderers, SortDirection, ViewState, ViewType,
    stringify,
};
use tabula::keybinds::{KeyCombo, Platform, mount_focus_search};
use tabula::options::OptionItem;
use tabula::overlay::OverlaySurface;
use tabula::ownership::Ownership;
use tabula::selection::{SelectionModel, SelectionValue};

use crate::config::ShellConfig;
use crate::error::ShellError;
use crate::text;

/// Product fixture shipped with the binary.
pub const PRODUCTS_JSON: &str = include_str!("../fixtures/products.json");

pub const TOOLBAR: &str = "toolbar";
pub const STATUS_TRIGGER: &str = "status-trigger";
pub const ACTIONS_TRIGGER: &str = "actions-trigger";
pub const SEARCH_INPUT: &str = "search-input";
pub const PRODUCTS: &str = "products";

const MAX_CELL: usize = 22;

/// Parse a JSON array of product records.
pub fn load_products(json: &str) -> Result<Vec<Value>, ShellError> {
    serde_json::from_str(json).map_err(|e| ShellError::json("product fixture", e))
}

/// Entries of the actions menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    ShowTable,
    ShowList,
    ShowGrid,
    ClearFilters,
}

impl MenuAction {
    pub const ALL: [MenuAction; 4] = [
        MenuAction::ShowTable,
        MenuAction::ShowList,
        MenuAction::ShowGrid,
        MenuAction::ClearFilters,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuAction::ShowTable => "Show as table",
            MenuAction::ShowList => "Show as list",
            MenuAction::ShowGrid => "Show as grid",
            MenuAction::ClearFilters => "Clear filters",
        }
    }
}

/// Status values offered by the status filter.
pub const STATUSES: [(&str, &str); 3] = [
    ("active", "Active"),
    ("draft", "Draft"),
    ("discontinued", "Discontinued"),
];

fn text_at(row: &Value, path: &str) -> String {
    Accessor::path(path).resolve_text(row).unwrap_or_default()
}

fn number(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

fn price(value: Option<&Value>) -> String {
    match value.and_then(number) {
        Some(amount) => format!("{:.2}", amount),
        None => "-".to_string(),
    }
}

/// Columns of the product table.
pub fn product_columns() -> Vec<Column<Value>> {
    vec![
        Column::new("name", "Name").sortable(),
        Column::new("sku", "SKU"),
        Column::new("category.name", "Category").sortable(),
        Column::new("price", "Price")
            .numeric()
            .cell(|_, value| price(value)),
        Column::new("stock", "Stock").numeric(),
        Column::new("status", "Status").sortable(),
    ]
}

/// Text renderers for the product view.
pub fn product_renderers() -> Renderers<Value, String> {
    Renderers::new(
        |column: &Column<Value>, direction| match direction {
            Some(SortDirection::Ascending) => format!("{} ^", column.header),
            Some(SortDirection::Descending) => format!("{} v", column.header),
            None => column.header.clone(),
        },
        |_, _, value| value.map(stringify).unwrap_or_default(),
        |view_type| {
            let layout = match view_type {
                ViewType::Table => "table",
                ViewType::List => "list",
                ViewType::Grid => "grid",
            };
            format!("No products to show in the {} view", layout)
        },
    )
    .list_item(|row| format!("- {} ({})", text_at(row, "name"), text_at(row, "sku")))
    .card(|row| {
        format!(
            "[{} | {} | {}]",
            text_at(row, "name"),
            text_at(row, "category.name"),
            price(row.get("price"))
        )
    })
    .create(|_| "+ New product".to_string())
}

/// Options of the search palette: one per product, grouped by category.
pub fn palette_options(rows: &[Value]) -> Vec<OptionItem<String>> {
    rows.iter()
        .map(|row| {
            let mut option = OptionItem::new(text_at(row, "sku"), text_at(row, "name"))
                .keywords([text_at(row, "sku"), text_at(row, "supplier.name")]);
            let category = text_at(row, "category.name");
            if !category.is_empty() {
                option = option.group(category);
            }
            option
        })
        .collect()
}

/// Lines painted for a combobox overlay, starting at its scroll offset.
fn overlay_lines<T>(combobox: &Combobox<T>, height: usize) -> Vec<String>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    combobox
        .render(
            |heading| format!("-- {} --", heading),
            |option, state| {
                let cursor = if state.highlighted { '>' } else { ' ' };
                let mark = if state.selected { '*' } else { ' ' };
                format!("{}{} {}", cursor, mark, option.label)
            },
        )
        .into_iter()
        .skip(combobox.scroll_offset())
        .take(height)
        .collect()
}

/// Painted height of a combobox overlay.
fn overlay_height<T>(combobox: &Combobox<T>) -> usize
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    let cap = usize::try_from(combobox.config().estimated_height.max(1)).unwrap_or(1);
    combobox.rows().len().clamp(1, cap)
}

/// The back-office screen.
pub struct Shell {
    document: Document,
    surface: OverlaySurface,
    platform: Platform,
    products: DataView<Value>,
    renderers: Renderers<Value, String>,
    status: Combobox<String>,
    actions: Combobox<MenuAction>,
    palette: Combobox<String>,
    focus_search: Arc<AtomicBool>,
    _shortcut: Subscription,
    /// Overlay content elements currently in the document
    painted: Vec<String>,
}

impl Shell {
    pub fn new(config: &ShellConfig, rows: Vec<Value>) -> Self {
        let screen = config.screen;
        let document = Document::new(Viewport::new(screen.width, screen.height));
        document.insert_element(TOOLBAR, None, Rect::new(0, 0, screen.width, 1));
        document.insert_element(STATUS_TRIGGER, Some(TOOLBAR), Rect::new(0, 0, 20, 1));
        document.insert_element(ACTIONS_TRIGGER, Some(TOOLBAR), Rect::new(22, 0, 12, 1));
        let search_width = 40.min(screen.width);
        document.insert_element(
            SEARCH_INPUT,
            Some(TOOLBAR),
            Rect::new(screen.width - search_width, 0, search_width, 1),
        );
        document.insert_element(
            PRODUCTS,
            None,
            Rect::new(0, 2, screen.width, (screen.height - 2).max(1)),
        );
        let surface = OverlaySurface::new();

        let palette_options = palette_options(&rows);
        let products = DataView::with_rows(product_columns(), config.products.clone(), rows);
        products.on_create(|| log::info!("[shell] create product requested"));

        let view = products.clone();
        let status = Combobox::with_selection(
            config.status_filter.clone(),
            SelectionModel::new(Ownership::uncontrolled_with(
                SelectionValue::Single(None),
                move |value: &SelectionValue<String>| {
                    let term = match value {
                        SelectionValue::Single(Some(status)) => status.clone(),
                        _ => String::new(),
                    };
                    log::info!("[shell] status filter {:?}", term);
                    view.set_filter(term);
                },
            )),
        );
        status.set_options(
            STATUSES
                .iter()
                .map(|(value, label)| OptionItem::new(value.to_string(), *label))
                .collect(),
        );

        let view = products.clone();
        let status_filter = status.clone();
        let actions = Combobox::with_selection(
            config.actions.clone(),
            SelectionModel::new(Ownership::uncontrolled_with(
                SelectionValue::Single(None),
                move |value: &SelectionValue<MenuAction>| {
                    let SelectionValue::Single(Some(action)) = value else {
                        return;
                    };
                    log::info!("[shell] action {:?}", action);
                    match action {
                        MenuAction::ShowTable => view.set_view_type(ViewType::Table),
                        MenuAction::ShowList => view.set_view_type(ViewType::List),
                        MenuAction::ShowGrid => view.set_view_type(ViewType::Grid),
                        MenuAction::ClearFilters => {
                            status_filter.clear();
                            view.set_filter("");
                        }
                    }
                },
            )),
        );
        actions.set_options(
            MenuAction::ALL
                .iter()
                .map(|action| OptionItem::new(*action, action.label()))
                .collect(),
        );

        let view = products.clone();
        let status_filter = status.clone();
        let palette = Combobox::with_selection(
            config.palette.clone(),
            SelectionModel::new(Ownership::uncontrolled_with(
                SelectionValue::Single(None),
                move |value: &SelectionValue<String>| {
                    if let SelectionValue::Single(Some(sku)) = value {
                        log::info!("[shell] jump to {}", sku);
                        status_filter.clear();
                        view.set_filter(sku.clone());
                    }
                },
            )),
        );
        palette.set_options(palette_options);
        palette.on_search(|term| log::debug!("[shell] palette search {:?}", term));

        status.mount(&document, &surface, STATUS_TRIGGER);
        actions.mount(&document, &surface, ACTIONS_TRIGGER);
        palette.mount(&document, &surface, SEARCH_INPUT);

        let platform = config
            .platform
            .as_deref()
            .map(Platform::sniff)
            .unwrap_or_else(Platform::current);
        let focus_search = Arc::new(AtomicBool::new(false));
        let request = Arc::clone(&focus_search);
        let shortcut = mount_focus_search(&document, platform, move || {
            request.store(true, Ordering::SeqCst);
        });

        log::info!(
            "[shell] ready: {} products, {} listeners",
            products.len(),
            document.listeners().len()
        );

        Self {
            document,
            surface,
            platform,
            products,
            renderers: product_renderers(),
            status,
            actions,
            palette,
            focus_search,
            _shortcut: shortcut,
            painted: Vec::new(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn surface(&self) -> &OverlaySurface {
        &self.surface
    }

    pub fn products(&self) -> &DataView<Value> {
        &self.products
    }

    pub fn status(&self) -> &Combobox<String> {
        &self.status
    }

    pub fn actions(&self) -> &Combobox<MenuAction> {
        &self.actions
    }

    pub fn palette(&self) -> &Combobox<String> {
        &self.palette
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    // -------------------------------------------------------------------------
    // Input
    // -------------------------------------------------------------------------

    /// Deliver an event, then paint.
    pub fn dispatch(&mut self, event: Event) -> usize {
        let delivered = self.document.dispatch(event);
        if self.focus_search.swap(false, Ordering::SeqCst) {
            self.document.focus(SEARCH_INPUT);
            self.palette.open();
        }
        self.paint();
        delivered
    }

    /// Pointer press: focus whatever is under the pointer, then dispatch.
    pub fn press(&mut self, x: i32, y: i32) -> usize {
        if let Some(id) = self.document.element_at(x, y) {
            self.document.focus(&id);
        }
        self.dispatch(Event::pointer_down(x, y))
    }

    /// Press on a painted overlay row of one of the shell's comboboxes.
    pub fn press_overlay_row(&mut self, content_id: &str, row: i32) -> bool {
        match self.document.client_rect(content_id) {
            Some(rect) if row < rect.height => {
                self.press(rect.x, rect.y + row);
                true
            }
            _ => false,
        }
    }

    /// Feed one terminal event. Presses focus what they land on, like
    /// [`Shell::press`]. Returns None for events with no counterpart.
    pub fn handle_terminal_event(&mut self, event: &crossterm::event::Event) -> Option<usize> {
        match Event::from_crossterm(event)? {
            Event::PointerDown {
                target: None,
                x,
                y,
                button: MouseButton::Left,
            } => Some(self.press(x, y)),
            event => Some(self.dispatch(event)),
        }
    }

    pub fn key(&mut self, key: Key, modifiers: Modifiers) -> usize {
        self.dispatch(Event::key(key, modifiers))
    }

    pub fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.key(Key::Char(c), Modifiers::NONE);
        }
    }

    /// The focus-search shortcut for this platform.
    pub fn press_focus_search(&mut self) -> usize {
        let combo = KeyCombo::focus_search(self.platform);
        self.key(combo.key, combo.modifiers)
    }

    pub fn resize(&mut self, width: i32, height: i32) -> usize {
        self.dispatch(Event::Resize { width, height })
    }

    /// Scroll the page by whole rows.
    pub fn scroll(&mut self, delta_y: i32) -> usize {
        self.dispatch(Event::Scroll {
            target: None,
            delta_x: 0,
            delta_y,
        })
    }

    // -------------------------------------------------------------------------
    // Painting
    // -------------------------------------------------------------------------

    /// Give every shown overlay an element, run one frame, then move the
    /// elements to wherever the frame placed them.
    pub fn paint(&mut self) {
        self.place_overlays();
        if self.document.frames().run_frame() > 0 {
            self.place_overlays();
        }
        self.surface.clear_dirty();
    }

    fn place_overlays(&mut self) {
        let viewport = self.document.viewport();
        let active = self.surface.active();
        for id in std::mem::take(&mut self.painted) {
            if !active.iter().any(|overlay| overlay.content_id == id) {
                self.document.remove_element(&id);
            }
        }
        for overlay in active {
            let height = self.overlay_height(&overlay.owner_id);
            let rect = overlay
                .placement
                .rect(viewport, i32::try_from(height).unwrap_or(1));
            if !self.document.set_element_rect(&overlay.content_id, rect) {
                self.document
                    .insert_overlay_element(overlay.content_id.clone(), rect);
            }
            self.painted.push(overlay.content_id);
        }
    }

    fn overlay_height(&self, owner_id: &str) -> usize {
        if owner_id == self.status.id_string() {
            overlay_height(&self.status)
        } else if owner_id == self.actions.id_string() {
            overlay_height(&self.actions)
        } else if owner_id == self.palette.id_string() {
            overlay_height(&self.palette)
        } else {
            1
        }
    }

    fn overlay_text(&self, owner_id: &str) -> Vec<String> {
        let height = self.overlay_height(owner_id);
        if owner_id == self.status.id_string() {
            overlay_lines(&self.status, height)
        } else if owner_id == self.actions.id_string() {
            overlay_lines(&self.actions, height)
        } else if owner_id == self.palette.id_string() {
            overlay_lines(&self.palette, height)
        } else {
            Vec::new()
        }
    }

    fn toolbar(&self) -> String {
        let term = self.palette.term();
        let search = if term.is_empty() {
            format!(
                "{} ({})",
                self.palette.placeholder(),
                KeyCombo::focus_search(self.platform).label(self.platform)
            )
        } else {
            term
        };
        format!(
            "[{}] [{}] [{}]",
            text::fit(&self.status.trigger_text(), 18),
            text::fit(&self.actions.placeholder(), 10),
            text::fit(&search, 38)
        )
    }

    fn view_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        let create = match self.products.render(&self.renderers) {
            RenderedView::Table {
                header,
                rows,
                create,
            } => {
                lines.extend(text::table(&header, &rows, MAX_CELL));
                create
            }
            RenderedView::List { items, create } => {
                lines.extend(items);
                create
            }
            RenderedView::Grid { cards, create } => {
                lines.extend(cards.chunks(2).map(|pair| pair.join("  ")));
                create
            }
            RenderedView::Empty {
                placeholder,
                create,
            } => {
                lines.push(placeholder);
                create
            }
        };
        lines.extend(create);
        lines
    }

    /// The whole screen as text: toolbar, current view, pager, then every
    /// shown overlay in paint order.
    pub fn screen(&self) -> Vec<String> {
        let mut lines = vec![self.toolbar()];
        lines.extend(self.view_lines());
        lines.push(format!(
            "{} (page {}/{})",
            self.products.page_range(),
            self.products.current_page(),
            self.products.page_count()
        ));
        let viewport = self.document.viewport();
        for overlay in self.surface.active() {
            let rect = self.document.element_rect(&overlay.content_id);
            let (x, y) = rect
                .map(|r| (r.x, r.y))
                .unwrap_or((overlay.placement.left(viewport), overlay.placement.top));
            lines.push(format!(
                "overlay {} at ({}, {}) {:?}, width {}",
                overlay.id, x, y, overlay.placement.side, overlay.placement.width
            ));
            lines.extend(
                self.overlay_text(&overlay.owner_id)
                    .into_iter()
                    .map(|line| format!("  |{}", line)),
            );
        }
        lines
    }

    /// Serialized view state, as a front end would persist it.
    pub fn view_state_json(&self) -> Result<String, ShellError> {
        serde_json::to_string(&self.products.view_state())
            .map_err(|e| ShellError::json("view state", e))
    }

    pub fn restore_view_state(&self, json: &str) -> Result<(), ShellError> {
        let state: ViewState =
            serde_json::from_str(json).map_err(|e| ShellError::json("view state", e))?;
        self.products.restore(state);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Scripted session
    // -------------------------------------------------------------------------

    fn snapshot(&self, transcript: &mut Vec<String>, title: &str) {
        log::debug!("[shell] snapshot {:?}", title);
        transcript.push(format!("== {} ==", title));
        transcript.extend(self.screen());
        transcript.push(String::new());
    }

    /// Drive the screen through a fixed sequence of user actions and return
    /// the painted screens.
    pub fn run_script(&mut self) -> Result<Vec<String>, ShellError> {
        let mut transcript = Vec::new();
        self.paint();
        self.snapshot(&mut transcript, "products");

        self.products.toggle_sort("price")?;
        self.snapshot(&mut transcript, "sorted by price");
        self.products.toggle_sort("price")?;
        self.products.next_page();
        self.snapshot(&mut transcript, "price descending, page 2");

        self.press(1, 0);
        self.snapshot(&mut transcript, "status filter open");
        self.key(Key::Down, Modifiers::NONE);
        self.key(Key::Enter, Modifiers::NONE);
        self.snapshot(&mut transcript, "filtered to drafts");

        self.press(23, 0);
        if let Some(content) = self.actions.content_id() {
            self.press_overlay_row(&content, 2);
        }
        self.snapshot(&mut transcript, "grid view");

        self.press_focus_search();
        self.type_text("lamp");
        self.snapshot(&mut transcript, "searching");
        self.key(Key::Down, Modifiers::NONE);
        self.key(Key::Down, Modifiers::NONE);
        self.key(Key::Enter, Modifiers::NONE);
        self.snapshot(&mut transcript, "jumped to product");

        self.document.focus(ACTIONS_TRIGGER);
        self.key(Key::Enter, Modifiers::NONE);
        self.key(Key::End, Modifiers::NONE);
        self.key(Key::Enter, Modifiers::NONE);
        self.snapshot(&mut transcript, "filters cleared");

        self.press(1, 0);
        self.resize(self.document.viewport().width, 8);
        self.snapshot(&mut transcript, "status filter after resize");
        self.press(60, 3);
        self.snapshot(&mut transcript, "closed by outside press");

        let state = self.view_state_json()?;
        transcript.push(format!("view state: {}", state));
        transcript.push(format!(
            "listeners: {}, pending frames: {}",
            self.document.listeners().len(),
            self.document.frames().pending_count()
        ));
        Ok(transcript)
    }
}

use std::sync::{Arc, Mutex};

use floatdom::{Document, Event, Key, Modifiers, Rect, Viewport};
use tabula::combobox::{ComboState, Combobox, ComboboxConfig, EventResult, OverlayRow};
use tabula::options::OptionItem;
use tabula::overlay::OverlaySurface;
use tabula::ownership::Ownership;
use tabula::position::PlacedSide;
use tabula::selection::{SelectionModel, SelectionValue};

type Value = SelectionValue<&'static str>;

fn fruit() -> Vec<OptionItem<&'static str>> {
    vec![
        OptionItem::new("a", "Apple"),
        OptionItem::new("b", "Banana"),
        OptionItem::new("c", "Cherry"),
    ]
}

fn pantry() -> Vec<OptionItem<&'static str>> {
    vec![
        OptionItem::new("apple", "Apple").group("Fruit"),
        OptionItem::new("carrot", "Carrot").group("Veg"),
        OptionItem::new("banana", "Banana").group("Fruit"),
        OptionItem::new("bread", "Bread"),
    ]
}

fn many(count: usize) -> Vec<OptionItem<String>> {
    (0..count)
        .map(|i| OptionItem::new(format!("item-{i}"), format!("Item {i}")))
        .collect()
}

fn combobox(config: ComboboxConfig) -> Combobox<&'static str> {
    let combobox = Combobox::new(config);
    combobox.set_options(fruit());
    combobox
}

fn recorder() -> (
    Arc<Mutex<Vec<Value>>>,
    impl Fn(&Value) + Send + Sync + 'static,
) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let inner = Arc::clone(&log);
    (log, move |value: &Value| inner.lock().unwrap().push(value.clone()))
}

/// Document with a trigger at `trigger_y` and an unrelated element far away.
fn page(trigger_y: i32) -> Document {
    let doc = Document::new(Viewport::new(100, 40));
    doc.insert_element("trigger", None, Rect::new(10, trigger_y, 20, 1));
    doc.insert_element("elsewhere", None, Rect::new(60, 30, 10, 2));
    doc
}

fn mounted(config: ComboboxConfig) -> (Document, OverlaySurface, Combobox<&'static str>) {
    let doc = page(5);
    let surface = OverlaySurface::new();
    let combobox = combobox(config);
    combobox.mount(&doc, &surface, "trigger");
    (doc, surface, combobox)
}

// ============================================================================
// State machine
// ============================================================================

#[test]
fn test_palette_filters_by_term() {
    let combobox = Combobox::new(ComboboxConfig::search_palette());
    combobox.set_options(vec![
        OptionItem::new("a", "Apple"),
        OptionItem::new("b", "Banana"),
    ]);

    combobox.set_search_term("an");
    assert_eq!(combobox.state(), ComboState::OpenFiltered);
    assert_eq!(combobox.filtered_labels(), vec!["Banana"]);
    assert_eq!(combobox.highlighted_index(), -1);
}

#[test]
fn test_full_state_cycle() {
    let combobox = combobox(ComboboxConfig::new());
    assert_eq!(combobox.state(), ComboState::Closed);

    combobox.open();
    assert_eq!(combobox.state(), ComboState::OpenUnfiltered);

    combobox.set_search_term("a");
    assert_eq!(combobox.state(), ComboState::OpenFiltered);

    combobox.move_next();
    assert_eq!(combobox.state(), ComboState::OpenHighlighted);
    assert_eq!(combobox.term(), "a");

    combobox.set_search_term("ap");
    assert_eq!(combobox.state(), ComboState::OpenFiltered);
    assert_eq!(combobox.filtered_labels(), vec!["Apple"]);

    combobox.set_search_term("");
    assert_eq!(combobox.state(), ComboState::OpenUnfiltered);

    assert!(combobox.escape());
    assert_eq!(combobox.state(), ComboState::Closed);
    assert!(combobox.value().is_empty());
}

#[test]
fn test_open_clears_previous_term() {
    let combobox = combobox(ComboboxConfig::new());
    combobox.set_search_term("ch");
    combobox.close();
    combobox.open();
    assert_eq!(combobox.term(), "");
    assert_eq!(combobox.filtered_count(), 3);
}

#[test]
fn test_navigation_requires_open_overlay() {
    let combobox = combobox(ComboboxConfig::select());
    assert_eq!(combobox.move_next(), None);
    assert!(!combobox.commit(0));
    assert_eq!(combobox.state(), ComboState::Closed);
}

#[test]
fn test_select_highlights_first_on_open() {
    let combobox = combobox(ComboboxConfig::select());
    combobox.open();
    assert_eq!(combobox.highlighted_index(), 0);
    assert_eq!(combobox.highlighted().unwrap().label, "Apple");
}

#[test]
fn test_new_term_resets_highlight() {
    let combobox = combobox(ComboboxConfig::new().highlight_reset(
        tabula::navigation::HighlightReset::First,
    ));
    combobox.open();
    combobox.move_last();
    assert_eq!(combobox.highlighted_index(), 2);

    combobox.set_search_term("e");
    assert_eq!(combobox.highlighted_index(), 0);
}

#[test]
fn test_set_options_clamps_highlight() {
    let combobox = combobox(ComboboxConfig::select());
    combobox.open();
    combobox.move_last();
    combobox.set_options(fruit().into_iter().take(2).collect());
    assert_eq!(combobox.highlighted_index(), 1);
    assert!(combobox.is_open());
}

// ============================================================================
// Commit
// ============================================================================

#[test]
fn test_single_commit_selects_and_closes() {
    let combobox = combobox(ComboboxConfig::select());
    combobox.open();
    combobox.move_next();
    assert!(combobox.commit_highlighted());

    assert_eq!(combobox.value(), SelectionValue::Single(Some("b")));
    assert_eq!(combobox.state(), ComboState::Closed);
    assert_eq!(combobox.trigger_text(), "Banana");
}

#[test]
fn test_multi_commit_toggles_and_stays_open() {
    let combobox = combobox(ComboboxConfig::new().multiple());
    combobox.open();
    combobox.commit(0);
    combobox.commit(2);
    assert_eq!(combobox.value(), SelectionValue::Multi(vec!["a", "c"]));
    assert!(combobox.is_open());

    combobox.commit(0);
    assert_eq!(combobox.value(), SelectionValue::Multi(vec!["c"]));
    assert_eq!(combobox.selected_labels(), vec!["Cherry"]);
}

#[test]
fn test_trigger_text_falls_back_to_placeholder() {
    let combobox = combobox(ComboboxConfig::select());
    assert_eq!(combobox.trigger_text(), "Select...");
}

#[test]
fn test_controlled_commit_only_proposes() {
    let (log, on_change) = recorder();
    let combobox = Combobox::controlled(
        ComboboxConfig::select(),
        SelectionValue::Single(None),
        on_change,
    );
    combobox.set_options(fruit());

    combobox.open();
    combobox.commit_highlighted();
    assert_eq!(*log.lock().unwrap(), vec![SelectionValue::Single(Some("a"))]);
    assert_eq!(combobox.value(), SelectionValue::Single(None));
    assert!(!combobox.is_open());

    combobox.sync(SelectionValue::Single(Some("a"))).unwrap();
    assert_eq!(combobox.value(), SelectionValue::Single(Some("a")));
}

#[test]
fn test_controlled_callback_can_sync_back() {
    let slot: Arc<Mutex<Option<Combobox<&'static str>>>> = Arc::new(Mutex::new(None));
    let echo = Arc::clone(&slot);
    let combobox = Combobox::controlled(
        ComboboxConfig::select(),
        SelectionValue::Single(None),
        move |value: &Value| {
            if let Some(combobox) = echo.lock().unwrap().as_ref() {
                combobox.sync(value.clone()).unwrap();
            }
        },
    );
    combobox.set_options(fruit());
    *slot.lock().unwrap() = Some(combobox.clone());

    combobox.open();
    combobox.move_last();
    combobox.commit_highlighted();
    assert_eq!(combobox.value(), SelectionValue::Single(Some("c")));

    slot.lock().unwrap().take();
}

#[test]
fn test_sync_on_uncontrolled_combobox_fails() {
    let combobox = combobox(ComboboxConfig::select());
    assert!(combobox.sync(SelectionValue::Single(Some("a"))).is_err());
}

#[test]
fn test_menu_forgets_committed_value() {
    let (log, on_change) = recorder();
    let combobox = Combobox::with_selection(
        ComboboxConfig::dropdown_menu(),
        SelectionModel::new(Ownership::uncontrolled_with(
            SelectionValue::Single(None),
            on_change,
        )),
    );
    combobox.set_options(fruit());

    combobox.open();
    combobox.move_next();
    combobox.commit_highlighted();
    assert_eq!(*log.lock().unwrap(), vec![SelectionValue::Single(Some("b"))]);
    assert_eq!(combobox.value(), SelectionValue::Single(None));
    assert!(!combobox.is_open());
}

#[test]
fn test_dropped_options_leave_uncontrolled_selection() {
    let combobox = combobox(ComboboxConfig::select());
    combobox.open();
    combobox.move_last();
    combobox.commit_highlighted();
    assert_eq!(combobox.value(), SelectionValue::Single(Some("c")));

    combobox.set_options(fruit().into_iter().take(2).collect());
    assert_eq!(combobox.value(), SelectionValue::Single(None));
}

#[test]
fn test_clear_selection() {
    let combobox = combobox(ComboboxConfig::new().multiple());
    combobox.open();
    combobox.commit(1);
    combobox.clear();
    assert_eq!(combobox.value(), SelectionValue::Multi(vec![]));
}

// ============================================================================
// Search callback
// ============================================================================

#[test]
fn test_on_search_reports_raw_term_changes() {
    let terms = Arc::new(Mutex::new(Vec::new()));
    let combobox = combobox(ComboboxConfig::search_palette());
    let inner = Arc::clone(&terms);
    combobox.on_search(move |term| inner.lock().unwrap().push(term.to_string()));

    combobox.set_search_term("A");
    combobox.set_search_term("Ap ");
    combobox.set_search_term("Ap ");
    assert_eq!(*terms.lock().unwrap(), vec!["A", "Ap "]);
}

#[test]
fn test_on_search_may_replace_options() {
    let combobox = Combobox::new(ComboboxConfig::search_palette());
    let handle = combobox.clone();
    combobox.on_search(move |term| {
        // Server-side search: results arrive for the term
        handle.set_options(vec![OptionItem::new("r", format!("Result for {term}"))]);
    });

    combobox.set_search_term("res");
    assert_eq!(combobox.filtered_labels(), vec!["Result for res"]);
    assert!(combobox.is_open());
}

// ============================================================================
// Grouped rows
// ============================================================================

#[test]
fn test_grouped_rows_have_headings() {
    let combobox = Combobox::new(ComboboxConfig::search_palette());
    combobox.set_options(pantry());
    combobox.open();

    assert_eq!(
        combobox.filtered_labels(),
        vec!["Apple", "Banana", "Carrot", "Bread"]
    );

    let rows = combobox.rows();
    assert_eq!(rows.len(), 7);
    assert_eq!(rows[0], OverlayRow::Heading("Fruit".to_string()));
    assert_eq!(rows[3], OverlayRow::Heading("Veg".to_string()));
    assert_eq!(rows[5], OverlayRow::Heading("Other".to_string()));
    match &rows[4] {
        OverlayRow::Option { position, item, .. } => {
            assert_eq!(*position, 2);
            assert_eq!(item.label, "Carrot");
        }
        other => panic!("expected an option row, got {other:?}"),
    }
}

#[test]
fn test_grouped_navigation_follows_display_order() {
    let combobox = Combobox::new(ComboboxConfig::search_palette());
    combobox.set_options(pantry());
    combobox.open();
    combobox.move_next();
    combobox.move_next();
    assert_eq!(combobox.highlighted().unwrap().label, "Banana");
}

#[test]
fn test_render_with_caller_renderers() {
    let combobox = Combobox::new(ComboboxConfig::search_palette());
    combobox.set_options(pantry());
    combobox.open();
    combobox.move_next();

    let lines = combobox.render(
        |heading| format!("# {heading}"),
        |option, state| {
            if state.highlighted {
                format!("> {}", option.label)
            } else {
                option.label.clone()
            }
        },
    );
    assert_eq!(
        lines,
        vec!["# Fruit", "> Apple", "Banana", "# Veg", "Carrot", "# Other", "Bread"]
    );
}

#[test]
fn test_click_row_skips_headings() {
    let combobox = Combobox::new(ComboboxConfig::search_palette());
    combobox.set_options(pantry());
    combobox.open();

    assert_eq!(combobox.click_row(0), EventResult::Ignored);
    assert!(combobox.is_open());
    assert_eq!(combobox.click_row(4), EventResult::Consumed);
    assert_eq!(combobox.value(), SelectionValue::Single(Some("carrot")));
}

// ============================================================================
// Keyboard
// ============================================================================

#[test]
fn test_select_keyboard_flow() {
    let combobox = combobox(ComboboxConfig::select());
    assert!(combobox.handle_key(Key::Down, Modifiers::NONE).is_handled());
    assert!(combobox.is_open());
    assert_eq!(combobox.highlighted_index(), 0);

    combobox.handle_key(Key::Down, Modifiers::NONE);
    combobox.handle_key(Key::Enter, Modifiers::NONE);
    assert_eq!(combobox.value(), SelectionValue::Single(Some("b")));
    assert!(!combobox.is_open());
}

#[test]
fn test_select_space_opens_and_commits() {
    let combobox = combobox(ComboboxConfig::select());
    combobox.handle_key(Key::Char(' '), Modifiers::NONE);
    assert!(combobox.is_open());
    combobox.handle_key(Key::Char(' '), Modifiers::NONE);
    assert_eq!(combobox.value(), SelectionValue::Single(Some("a")));
}

#[test]
fn test_typing_opens_searchable_surface() {
    let combobox = combobox(ComboboxConfig::search_palette());
    combobox.handle_key(Key::Char('b'), Modifiers::NONE);
    assert!(combobox.is_open());
    assert_eq!(combobox.term(), "b");
    assert_eq!(combobox.state(), ComboState::OpenFiltered);

    combobox.handle_key(Key::Backspace, Modifiers::NONE);
    assert_eq!(combobox.term(), "");
    assert_eq!(combobox.state(), ComboState::OpenUnfiltered);
}

#[test]
fn test_modified_keys_are_left_to_the_shell() {
    let combobox = combobox(ComboboxConfig::search_palette());
    let result = combobox.handle_key(Key::Char('k'), Modifiers::ctrl());
    assert_eq!(result, EventResult::Ignored);
    assert!(!combobox.is_open());
}

#[test]
fn test_escape_and_tab_close_without_selecting() {
    let combobox = combobox(ComboboxConfig::select());
    combobox.open();
    combobox.handle_key(Key::Escape, Modifiers::NONE);
    assert!(!combobox.is_open());

    combobox.open();
    assert_eq!(combobox.handle_key(Key::Tab, Modifiers::NONE), EventResult::Ignored);
    assert!(!combobox.is_open());
    assert!(combobox.value().is_empty());
}

// ============================================================================
// Mounted: listeners, frames, placement
// ============================================================================

#[test]
fn test_close_releases_every_session_listener() {
    let (doc, _surface, combobox) = mounted(ComboboxConfig::select());
    let baseline = doc.listeners().len();
    assert_eq!(baseline, 1);

    combobox.open();
    assert_eq!(doc.listeners().len(), baseline + 2);

    combobox.close();
    assert_eq!(doc.listeners().len(), baseline);
}

#[test]
fn test_repeated_open_close_does_not_leak() {
    let (doc, _surface, combobox) = mounted(ComboboxConfig::select());
    for _ in 0..5 {
        combobox.open();
        combobox.close();
    }
    assert_eq!(doc.listeners().len(), 1);
    assert_eq!(doc.frames().pending_count(), 0);
}

#[test]
fn test_open_places_with_estimate() {
    let (_doc, surface, combobox) = mounted(ComboboxConfig::select());
    combobox.open();

    let placement = combobox.placement().unwrap();
    assert_eq!(placement.side, PlacedSide::Below);
    assert_eq!(placement.top, 10);
    assert_eq!(placement.width, 20);
    assert_eq!(combobox.placement_computations(), 1);

    let shown = surface.topmost().unwrap();
    assert_eq!(shown.owner_id, combobox.id_string());
    assert_eq!(Some(shown.content_id), combobox.content_id());
}

#[test]
fn test_measure_frame_repositions_with_painted_size() {
    let doc = page(30);
    let surface = OverlaySurface::new();
    let combobox = combobox(ComboboxConfig::select());
    combobox.mount(&doc, &surface, "trigger");

    combobox.open();
    assert_eq!(combobox.placement().unwrap().side, PlacedSide::Below);
    assert_eq!(doc.frames().pending_count(), 1);

    // The shell paints the overlay taller than estimated
    let content_id = combobox.content_id().unwrap();
    doc.insert_overlay_element(content_id, Rect::new(10, 35, 20, 12));
    assert_eq!(doc.frames().run_frame(), 1);

    let placement = combobox.placement().unwrap();
    assert_eq!(placement.side, PlacedSide::Above);
    assert_eq!(placement.top, 14);
    assert_eq!(surface.topmost().unwrap().placement, placement);
    assert_eq!(combobox.placement_computations(), 2);
}

#[test]
fn test_close_cancels_pending_frames() {
    let (doc, _surface, combobox) = mounted(ComboboxConfig::select());
    combobox.open();
    combobox.move_last();
    assert_eq!(doc.frames().pending_count(), 2);

    combobox.close();
    assert_eq!(doc.frames().pending_count(), 0);
    assert_eq!(doc.frames().run_frame(), 0);
}

#[test]
fn test_scroll_into_view_runs_on_next_frame() {
    let doc = page(5);
    let surface = OverlaySurface::new();
    let combobox = Combobox::new(ComboboxConfig::select());
    combobox.set_options(many(20));
    combobox.mount(&doc, &surface, "trigger");

    combobox.open();
    combobox.move_last();
    assert_eq!(combobox.scroll_offset(), 0);

    doc.frames().run_frame();
    // 8 visible rows, last of 20 revealed
    assert_eq!(combobox.scroll_offset(), 12);

    combobox.move_first();
    doc.frames().run_frame();
    assert_eq!(combobox.scroll_offset(), 0);
}

#[test]
fn test_newer_scroll_request_replaces_pending_one() {
    let (doc, _surface, combobox) = mounted(ComboboxConfig::select());
    combobox.open();
    doc.frames().run_frame();

    combobox.move_next();
    combobox.move_next();
    combobox.move_next();
    assert_eq!(doc.frames().pending_count(), 1);
}

#[test]
fn test_unmounted_combobox_scrolls_immediately() {
    let combobox = Combobox::new(ComboboxConfig::select());
    combobox.set_options(many(20));
    combobox.open();
    combobox.move_last();
    assert_eq!(combobox.scroll_offset(), 12);
}

#[test]
fn test_resize_and_scroll_reposition_while_open() {
    let (doc, _surface, combobox) = mounted(ComboboxConfig::select());
    combobox.open();
    assert_eq!(combobox.placement().unwrap().top, 10);

    doc.dispatch(Event::Resize {
        width: 100,
        height: 20,
    });
    assert_eq!(combobox.placement_computations(), 2);

    doc.dispatch(Event::Scroll {
        target: None,
        delta_x: 0,
        delta_y: 3,
    });
    assert_eq!(combobox.placement_computations(), 3);
    assert_eq!(combobox.placement().unwrap().top, 10);

    combobox.close();
    let computations = combobox.placement_computations();
    doc.dispatch(Event::Resize {
        width: 100,
        height: 40,
    });
    assert_eq!(combobox.placement_computations(), computations);
}

#[test]
fn test_page_scroll_keeps_overlay_anchored_to_trigger() {
    let (doc, _surface, combobox) = mounted(ComboboxConfig::select());
    combobox.open();
    let trigger = doc.element_rect("trigger").unwrap();
    let gap = combobox.placement().unwrap().top - trigger.bottom();
    assert_eq!(gap, 4);

    for _ in 0..3 {
        doc.dispatch(Event::Scroll {
            target: None,
            delta_x: 0,
            delta_y: 2,
        });
        assert_eq!(doc.element_rect("trigger"), Some(trigger));
        assert_eq!(combobox.placement().unwrap().top - trigger.bottom(), gap);
    }
    assert_eq!(doc.client_rect("trigger"), Some(Rect::new(10, -1, 20, 1)));

    // Client-space presses land on the scrolled page
    doc.dispatch(Event::pointer_down(12, -1));
    assert!(!combobox.is_open());
}

#[test]
fn test_press_outside_closes() {
    let (doc, surface, combobox) = mounted(ComboboxConfig::select());
    combobox.open();
    assert_eq!(surface.len(), 1);

    doc.dispatch(Event::pointer_down(65, 31));
    assert!(!combobox.is_open());
    assert!(surface.is_empty());
    assert_eq!(doc.listeners().len(), 1);
}

#[test]
fn test_trigger_press_toggles() {
    let (doc, _surface, combobox) = mounted(ComboboxConfig::select());
    doc.dispatch(Event::pointer_down(12, 5));
    assert!(combobox.is_open());

    doc.dispatch(Event::pointer_down(12, 5));
    assert!(!combobox.is_open());
    assert_eq!(doc.listeners().len(), 1);
}

#[test]
fn test_press_on_overlay_row_commits() {
    let (doc, _surface, combobox) = mounted(ComboboxConfig::select());
    combobox.open();
    let content_id = combobox.content_id().unwrap();
    doc.insert_overlay_element(content_id, Rect::new(10, 10, 20, 3));

    doc.dispatch(Event::pointer_down(12, 11));
    assert_eq!(combobox.value(), SelectionValue::Single(Some("b")));
    assert!(!combobox.is_open());
}

#[test]
fn test_keys_on_focused_trigger() {
    let (doc, _surface, combobox) = mounted(ComboboxConfig::select());
    doc.focus("trigger");

    doc.dispatch(Event::key(Key::Down, Modifiers::NONE));
    assert!(combobox.is_open());

    doc.dispatch(Event::key(Key::Enter, Modifiers::NONE));
    assert_eq!(combobox.value(), SelectionValue::Single(Some("a")));
    assert!(!combobox.is_open());
}

#[test]
fn test_keys_elsewhere_are_ignored() {
    let (doc, _surface, combobox) = mounted(ComboboxConfig::select());
    doc.focus("elsewhere");
    doc.dispatch(Event::key(Key::Down, Modifiers::NONE));
    assert!(!combobox.is_open());
}

#[test]
fn test_unmount_releases_everything() {
    let (doc, surface, combobox) = mounted(ComboboxConfig::select());
    combobox.open();
    combobox.move_next();

    combobox.unmount();
    assert!(!combobox.is_mounted());
    assert!(!combobox.is_open());
    assert!(doc.listeners().is_empty());
    assert_eq!(doc.frames().pending_count(), 0);
    assert!(surface.is_empty());
}

#[test]
fn test_dropping_last_handle_releases_everything() {
    let (doc, surface, combobox) = mounted(ComboboxConfig::select());
    combobox.open();

    drop(combobox);
    assert!(doc.listeners().is_empty());
    assert_eq!(doc.frames().pending_count(), 0);
    assert!(surface.is_empty());
}

#[test]
fn test_remount_replaces_previous_mount() {
    let (doc, surface, combobox) = mounted(ComboboxConfig::select());
    combobox.mount(&doc, &surface, "trigger");
    assert_eq!(doc.listeners().len(), 1);
}

#[test]
fn test_two_open_overlays_each_own_one_outside_listener() {
    let doc = page(5);
    doc.insert_element("second", None, Rect::new(40, 5, 10, 1));
    let surface = OverlaySurface::new();

    let first = combobox(ComboboxConfig::select());
    let second = combobox(ComboboxConfig::dropdown_menu());
    first.mount(&doc, &surface, "trigger");
    second.mount(&doc, &surface, "second");

    first.open();
    second.open();
    assert_eq!(doc.listeners().count_for(floatdom::EventKind::TouchStart), 4);

    second.close();
    assert_eq!(doc.listeners().count_for(floatdom::EventKind::TouchStart), 3);
    assert!(first.is_open());
}

#[test]
fn test_dirty_flag() {
    let combobox = combobox(ComboboxConfig::select());
    combobox.clear_dirty();
    combobox.open();
    assert!(combobox.is_dirty());
    combobox.clear_dirty();
    assert!(!combobox.is_dirty());
}

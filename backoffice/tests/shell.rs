use backoffice::shell::{
    ACTIONS_TRIGGER, MenuAction, PRODUCTS_JSON, SEARCH_INPUT, STATUS_TRIGGER, Shell,
    load_products, palette_options,
};
use backoffice::{ShellConfig, ShellError};
use floatdom::{Event, Key, Modifiers, Rect};
use serde_json::Value;
use tabula::dataview::{SortDirection, ViewType, stringify};
use tabula::keybinds::Platform;
use tabula::selection::SelectionValue;

fn config(platform: &str) -> ShellConfig {
    ShellConfig {
        platform: Some(platform.to_string()),
        ..ShellConfig::default()
    }
}

fn shell() -> Shell {
    let rows = load_products(PRODUCTS_JSON).unwrap();
    let mut shell = Shell::new(&config("Win32"), rows);
    shell.paint();
    shell
}

fn names(shell: &Shell) -> Vec<String> {
    shell
        .products()
        .page_rows()
        .iter()
        .map(|row| stringify(&row["name"]))
        .collect()
}

// ============================================================================
// Fixture
// ============================================================================

#[test]
fn test_fixture_loads() {
    let rows = load_products(PRODUCTS_JSON).unwrap();
    assert_eq!(rows.len(), 12);
}

#[test]
fn test_fixture_must_be_an_array() {
    assert!(matches!(
        load_products(r#"{"name": "Desk Lamp"}"#),
        Err(ShellError::Json { .. })
    ));
}

#[test]
fn test_palette_options_grouped_by_category() {
    let rows = load_products(PRODUCTS_JSON).unwrap();
    let options = palette_options(&rows);
    assert_eq!(options.len(), 12);
    assert_eq!(options[0].value, "LMP-001");
    assert_eq!(options[0].label, "Desk Lamp");
    assert_eq!(options[0].group_name(), Some("Lighting"));
    assert!(options[0].keywords.contains(&"Lumen & Co".to_string()));
    // Filing Cabinet has no category
    assert_eq!(options[9].group_name(), None);
}

// ============================================================================
// Product view
// ============================================================================

#[test]
fn test_initial_screen() {
    let shell = shell();
    let screen = shell.screen();
    assert!(screen[0].contains("Any status"));
    assert!(screen[0].contains("Search... (Ctrl+K)"));
    assert!(screen[1].starts_with("Name"));
    assert!(screen.iter().any(|line| line == "+ New product"));
    assert_eq!(
        screen.last().map(String::as_str),
        Some("Showing 1-5 of 12 (page 1/3)")
    );
}

#[test]
fn test_price_sort_parses_numeric_strings() {
    let shell = shell();
    shell.products().toggle_sort("price").unwrap();
    assert_eq!(
        names(&shell),
        vec!["Cable Tray", "Desk Organizer", "Desk Lamp", "Monitor Arm", "Floor Lamp"]
    );
    assert!(shell.screen()[1].contains("Price ^"));

    shell.products().toggle_sort("price").unwrap();
    assert_eq!(
        shell.products().sort().map(|sort| sort.direction),
        Some(SortDirection::Descending)
    );
    assert_eq!(names(&shell)[0], "Standing Desk");

    // The product without a price stays last
    shell.products().go_to_page(3).unwrap();
    assert_eq!(names(&shell), vec!["Cable Tray", "Wrist Rest"]);
}

#[test]
fn test_price_cell_formatting() {
    let shell = shell();
    shell.products().set_filter("wrist");
    let screen = shell.screen();
    assert!(screen[3].contains("Wrist Rest"));
    assert!(screen[3].contains(" - "));

    shell.products().set_filter("standing");
    assert!(shell.screen()[3].contains("499.00"));
}

#[test]
fn test_unsortable_column_is_rejected() {
    let shell = shell();
    assert!(matches!(
        shell.products().toggle_sort("sku"),
        Err(tabula::ViewError::NotSortable(_))
    ));
}

#[test]
fn test_view_state_round_trip() {
    let shell = shell();
    shell
        .restore_view_state(r#"{"view_type": "list", "filter_term": "desk"}"#)
        .unwrap();
    assert_eq!(shell.products().view_type(), ViewType::List);
    // Names, plus the "Tidy Desk" supplier
    assert_eq!(shell.products().filtered_len(), 5);
    assert!(shell.screen()[1].starts_with("- Desk Lamp"));

    let json = shell.view_state_json().unwrap();
    let state: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(state["view_type"], "list");
    assert_eq!(state["filter_term"], "desk");
}

#[test]
fn test_empty_result_placeholder() {
    let shell = shell();
    shell.products().set_filter("no such product");
    let screen = shell.screen();
    assert_eq!(screen[1], "No products to show in the table view");
    assert_eq!(screen[2], "+ New product");
    assert!(screen[3].starts_with("Showing 0-0 of 0"));
}

// ============================================================================
// Status filter
// ============================================================================

#[test]
fn test_status_filter_opens_below_trigger() {
    let mut shell = shell();
    shell.press(1, 0);

    assert!(shell.status().is_open());
    assert_eq!(shell.surface().len(), 1);
    let content = shell.status().content_id().unwrap();
    assert_eq!(
        shell.document().element_rect(&content),
        Some(Rect::new(0, 5, 20, 3))
    );
    assert!(shell.status().placement_computations() >= 2);
    assert_eq!(shell.document().frames().pending_count(), 0);
}

#[test]
fn test_status_filter_commit_filters_products() {
    let mut shell = shell();
    shell.press(1, 0);
    let content = shell.status().content_id().unwrap();
    shell.key(Key::Down, Modifiers::NONE);
    shell.key(Key::Enter, Modifiers::NONE);

    assert!(!shell.status().is_open());
    assert_eq!(
        shell.status().value(),
        SelectionValue::Single(Some("draft".to_string()))
    );
    assert_eq!(shell.status().trigger_text(), "Draft");
    assert_eq!(shell.products().filter_term(), "draft");
    assert_eq!(names(&shell), vec!["Monitor Arm", "Wrist Rest"]);
    assert!(shell.surface().is_empty());
    assert_eq!(shell.document().element_rect(&content), None);
}

#[test]
fn test_outside_press_closes_and_releases_listeners() {
    let mut shell = shell();
    let idle = shell.document().listeners().len();
    assert_eq!(idle, 4);

    shell.press(1, 0);
    assert!(shell.document().listeners().len() > idle);

    shell.press(60, 20);
    assert!(!shell.status().is_open());
    assert_eq!(shell.status().value(), SelectionValue::Single(None));
    assert_eq!(shell.document().listeners().len(), idle);
}

#[test]
fn test_trigger_press_toggles() {
    let mut shell = shell();
    shell.press(1, 0);
    shell.press(1, 0);
    assert!(!shell.status().is_open());
    assert!(shell.surface().is_empty());
}

#[test]
fn test_resize_keeps_overlay_attached() {
    let mut shell = shell();
    shell.press(1, 0);
    let before = shell.status().placement_computations();
    shell.resize(100, 8);
    assert!(shell.status().placement_computations() > before);
    assert!(shell.status().is_open());
}

#[test]
fn test_page_scroll_keeps_overlay_below_trigger() {
    let mut shell = shell();
    shell.press(1, 0);
    let content = shell.status().content_id().unwrap();
    let trigger = shell.document().element_rect(STATUS_TRIGGER).unwrap();
    let before = shell.document().element_rect(&content).unwrap();

    shell.scroll(3);
    assert_eq!(shell.document().element_rect(STATUS_TRIGGER), Some(trigger));
    assert_eq!(shell.document().element_rect(&content), Some(before));
    assert_eq!(
        shell.document().client_rect(&content),
        Some(Rect::new(0, 2, 20, 3))
    );

    // Rows are still pressable at their scrolled position
    assert!(shell.press_overlay_row(&content, 1));
    assert_eq!(
        shell.status().value(),
        SelectionValue::Single(Some("draft".to_string()))
    );
}

// ============================================================================
// Actions menu
// ============================================================================

#[test]
fn test_actions_menu_row_press_switches_view() {
    let mut shell = shell();
    shell.press(23, 0);
    let content = shell.actions().content_id().unwrap();
    assert_eq!(
        shell.document().element_rect(&content),
        Some(Rect::new(10, 5, 24, 4))
    );

    assert!(shell.press_overlay_row(&content, 2));
    assert_eq!(shell.products().view_type(), ViewType::Grid);
    assert!(!shell.actions().is_open());
    // Menus forget the committed action
    assert_eq!(shell.actions().value(), SelectionValue::Single(None));
    assert!(shell.screen()[1].starts_with("[Desk Lamp | Lighting | 39.90]"));
}

#[test]
fn test_actions_menu_keyboard_clears_filters() {
    let mut shell = shell();
    shell.press(1, 0);
    shell.key(Key::Enter, Modifiers::NONE);
    assert_eq!(shell.products().filter_term(), "active");

    shell.document().focus(ACTIONS_TRIGGER);
    shell.key(Key::Enter, Modifiers::NONE);
    assert_eq!(shell.actions().highlighted_index(), 0);
    shell.key(Key::End, Modifiers::NONE);
    shell.key(Key::Enter, Modifiers::NONE);

    assert_eq!(shell.products().filter_term(), "");
    assert_eq!(shell.status().value(), SelectionValue::Single(None));
    assert_eq!(shell.products().filtered_len(), 12);
}

#[test]
fn test_press_outside_painted_rows_is_refused() {
    let mut shell = shell();
    shell.press(23, 0);
    let content = shell.actions().content_id().unwrap();
    assert!(!shell.press_overlay_row(&content, 4));
    assert!(!shell.press_overlay_row("missing", 0));
    assert!(shell.actions().is_open());
}

#[test]
fn test_menu_action_labels() {
    let labels: Vec<&str> = MenuAction::ALL.iter().map(|action| action.label()).collect();
    assert_eq!(
        labels,
        vec!["Show as table", "Show as list", "Show as grid", "Clear filters"]
    );
}

// ============================================================================
// Search palette
// ============================================================================

#[test]
fn test_focus_search_opens_palette() {
    let mut shell = shell();
    assert_eq!(shell.platform(), Platform::Other);
    shell.press_focus_search();

    assert!(shell.palette().is_open());
    assert_eq!(shell.document().focused().as_deref(), Some(SEARCH_INPUT));
}

#[test]
fn test_apple_shortcut() {
    let rows = load_products(PRODUCTS_JSON).unwrap();
    let mut shell = Shell::new(&config("MacIntel"), rows);
    assert_eq!(shell.platform(), Platform::Apple);

    shell.dispatch(Event::key(Key::Char('k'), Modifiers::ctrl()));
    assert!(!shell.palette().is_open());
    shell.dispatch(Event::key(Key::Char('k'), Modifiers::meta()));
    assert!(shell.palette().is_open());
    assert!(shell.screen()[0].contains("Search..."));
}

#[test]
fn test_palette_search_and_jump() {
    let mut shell = shell();
    shell.press(1, 0);
    shell.key(Key::Down, Modifiers::NONE);
    shell.key(Key::Enter, Modifiers::NONE);

    shell.press_focus_search();
    shell.type_text("lamp");
    assert_eq!(shell.palette().term(), "lamp");
    assert_eq!(
        shell.palette().filtered_labels(),
        vec!["Desk Lamp".to_string(), "Floor Lamp".to_string()]
    );
    let screen = shell.screen();
    assert!(screen.iter().any(|line| line == "  |-- Lighting --"));
    assert!(screen[0].contains("lamp"));

    shell.key(Key::Down, Modifiers::NONE);
    shell.key(Key::Down, Modifiers::NONE);
    shell.key(Key::Enter, Modifiers::NONE);

    assert!(!shell.palette().is_open());
    assert_eq!(shell.products().filter_term(), "LMP-002");
    assert_eq!(names(&shell), vec!["Floor Lamp"]);
    assert_eq!(shell.status().value(), SelectionValue::Single(None));
}

#[test]
fn test_palette_matches_supplier_keywords() {
    let mut shell = shell();
    shell.press_focus_search();
    shell.type_text("northwood");
    assert_eq!(shell.palette().filtered_count(), 4);
}

// ============================================================================
// Scripted session
// ============================================================================

#[test]
fn test_script_runs_to_completion() {
    let mut shell = shell();
    let transcript = shell.run_script().unwrap();

    for title in [
        "== products ==",
        "== filtered to drafts ==",
        "== grid view ==",
        "== jumped to product ==",
        "== closed by outside press ==",
    ] {
        assert!(transcript.iter().any(|line| line == title), "{title}");
    }
    assert!(transcript.iter().any(|line| line.starts_with("view state: ")
        && line.contains("\"view_type\":\"grid\"")));
    assert_eq!(
        transcript.last().map(String::as_str),
        Some("listeners: 4, pending frames: 0")
    );
    assert!(shell.surface().is_empty());
}

#[test]
fn test_fixture_is_embedded() {
    assert!(PRODUCTS_JSON.trim_start().starts_with('['));
}

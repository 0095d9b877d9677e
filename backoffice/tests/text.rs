use backoffice::text::{display_width, fit, table, truncate_to_width};

// ============================================================================
// Widths
// ============================================================================

#[test]
fn test_display_width_counts_wide_chars() {
    assert_eq!(display_width("Café"), 4);
    assert_eq!(display_width("日本"), 4);
}

#[test]
fn test_truncate_adds_ellipsis() {
    assert_eq!(truncate_to_width("Café Table", 5), "Café…");
    assert_eq!(truncate_to_width("short", 10), "short");
    assert_eq!(truncate_to_width("anything", 0), "");
}

#[test]
fn test_fit_pads_and_truncates() {
    assert_eq!(fit("abc", 5), "abc  ");
    assert_eq!(fit("日本語", 5), "日本…");
    assert_eq!(display_width(&fit("日本語", 4)), 4);
}

// ============================================================================
// Tables
// ============================================================================

#[test]
fn test_table_aligns_columns() {
    let header = vec!["Name".to_string(), "N".to_string()];
    let rows = vec![
        vec!["Apple".to_string(), "1".to_string()],
        vec!["Fig".to_string(), "10".to_string()],
    ];
    assert_eq!(
        table(&header, &rows, 10),
        vec!["Name  | N", "------+---", "Apple | 1", "Fig   | 10"]
    );
}

#[test]
fn test_table_caps_cell_width() {
    let header = vec!["Name".to_string()];
    let rows = vec![vec!["Ergonomic Chair".to_string()]];
    let lines = table(&header, &rows, 6);
    assert_eq!(lines[0], "Name");
    assert_eq!(lines[2], "Ergon…");
}

#[test]
fn test_table_missing_cells_are_blank() {
    let header = vec!["A".to_string(), "B".to_string()];
    let rows = vec![vec!["x".to_string()]];
    assert_eq!(table(&header, &rows, 5)[2], "x |");
}

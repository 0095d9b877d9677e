//! Plain-text painting of the rendered views.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn display_width(s: &str) -> usize {
    s.width()
}

pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if display_width(s) <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let target_width = max_width - 1;
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > target_width {
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result.push('…');
    result
}

/// Truncate or right-pad to exactly `width` columns.
pub fn fit(s: &str, width: usize) -> String {
    let mut text = truncate_to_width(s, width);
    let used = display_width(&text);
    text.extend(std::iter::repeat_n(' ', width.saturating_sub(used)));
    text
}

/// Lay out a header and rows as aligned columns separated by ` | `.
///
/// Column widths come from the widest cell, capped at `max_cell`.
pub fn table(header: &[String], rows: &[Vec<String>], max_cell: usize) -> Vec<String> {
    let mut widths: Vec<usize> = header.iter().map(|h| display_width(h)).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(display_width(cell));
            }
        }
    }
    for width in &mut widths {
        *width = (*width).min(max_cell);
    }

    let line = |cells: &[String]| {
        widths
            .iter()
            .enumerate()
            .map(|(i, &width)| fit(cells.get(i).map(String::as_str).unwrap_or(""), width))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(line(header));
    lines.push(
        widths
            .iter()
            .map(|&width| "-".repeat(width))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    lines.extend(rows.iter().map(|row| line(row)));
    lines
}

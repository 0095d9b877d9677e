//! Rows painted inside the combobox overlay.

use crate::options::{DEFAULT_GROUP, OptionItem, OptionState};

/// One painted row of the overlay list.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayRow<T> {
    /// Group heading (grouped surfaces only)
    Heading(String),
    Option {
        /// Position in the filtered list, as used by the highlight
        position: usize,
        item: OptionItem<T>,
        state: OptionState,
    },
}

/// Row layout without the option payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RowKind {
    Heading(String),
    Option(usize),
}

/// Lay out filtered options as rows, inserting a heading whenever the group
/// changes.
///
/// `filtered` must already be in group order when `grouped` is set.
pub(crate) fn layout_rows<T>(
    options: &[OptionItem<T>],
    filtered: &[usize],
    grouped: bool,
) -> Vec<RowKind> {
    if !grouped {
        return (0..filtered.len()).map(RowKind::Option).collect();
    }
    let mut rows = Vec::with_capacity(filtered.len());
    let mut current: Option<&str> = None;
    for (position, &source) in filtered.iter().enumerate() {
        let group = options
            .get(source)
            .and_then(|option| option.group_name())
            .unwrap_or(DEFAULT_GROUP);
        if current != Some(group) {
            rows.push(RowKind::Heading(group.to_string()));
            current = Some(group);
        }
        rows.push(RowKind::Option(position));
    }
    rows
}

/// Row index of a filtered position.
pub(crate) fn row_of(rows: &[RowKind], position: usize) -> Option<usize> {
    rows.iter()
        .position(|row| *row == RowKind::Option(position))
}

/// Scroll offset that keeps `row` inside a window of `visible` rows.
pub(crate) fn scroll_to_reveal(offset: usize, row: usize, visible: usize) -> usize {
    let visible = visible.max(1);
    if row < offset {
        row
    } else if row >= offset + visible {
        row + 1 - visible
    } else {
        offset
    }
}

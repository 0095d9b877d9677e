//! Single-column sorting.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::column::ColumnKind;
use super::record::{Accessor, Record, stringify};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn is_ascending(self) -> bool {
        self == SortDirection::Ascending
    }
}

/// Current sort: one column, one direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub column_id: String,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(column_id: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column_id: column_id.into(),
            direction,
        }
    }

    pub fn ascending(column_id: impl Into<String>) -> Self {
        Self::new(column_id, SortDirection::Ascending)
    }
}

/// Comparator actually applied to a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Numeric,
    Lexicographic,
}

/// Pick the comparator for a column over the given rows.
///
/// Declared kinds map directly. `Inferred` looks at the first row whose value
/// is present: a JSON number selects numeric comparison, anything else
/// lexicographic.
pub fn comparison_for<'a, T: Record + 'a>(
    kind: ColumnKind,
    accessor: &Accessor,
    rows: impl IntoIterator<Item = &'a T>,
) -> Comparison {
    match kind {
        ColumnKind::Number => Comparison::Numeric,
        ColumnKind::Text => Comparison::Lexicographic,
        ColumnKind::Inferred => match rows.into_iter().find_map(|row| accessor.resolve(row)) {
            Some(Value::Number(_)) => Comparison::Numeric,
            _ => Comparison::Lexicographic,
        },
    }
}

/// Comparable form of a resolved value.
#[derive(Debug, Clone, PartialEq)]
enum SortKey {
    Number(f64),
    Text(String),
    /// Absent, or not a number under numeric comparison
    Unordered,
}

impl SortKey {
    fn of(value: Option<&Value>, comparison: Comparison) -> Self {
        match (value, comparison) {
            (None, _) => SortKey::Unordered,
            (Some(value), Comparison::Numeric) => {
                as_number(value).map_or(SortKey::Unordered, SortKey::Number)
            }
            (Some(value), Comparison::Lexicographic) => {
                SortKey::Text(stringify(value).to_lowercase())
            }
        }
    }

    fn cmp_ordered(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            (SortKey::Unordered, SortKey::Unordered) => Ordering::Equal,
            (SortKey::Unordered, _) => Ordering::Greater,
            (_, SortKey::Unordered) => Ordering::Less,
            _ => Ordering::Equal,
        }
    }
}

/// Finite numeric value; `"NaN"` and `"inf"` strings are not numbers here.
fn as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

/// Compare two resolved values ascending. Absent values sort after present
/// ones; in numeric mode so do values that are not numbers.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>, comparison: Comparison) -> Ordering {
    SortKey::of(a, comparison).cmp_ordered(&SortKey::of(b, comparison))
}

/// Stable sort of row indices by one column.
///
/// Descending reverses the order of comparable values; unordered values
/// (absent, or non-numeric in numeric mode) stay last in both directions.
pub fn sort_indices<T: Record>(
    rows: &[T],
    indices: &mut Vec<usize>,
    accessor: &Accessor,
    comparison: Comparison,
    direction: SortDirection,
) {
    let mut keyed: Vec<(SortKey, usize)> = indices
        .iter()
        .map(|&index| {
            let value = rows.get(index).and_then(|row| accessor.resolve(row));
            (SortKey::of(value, comparison), index)
        })
        .collect();

    keyed.sort_by(|(a, _), (b, _)| match (a, b) {
        (SortKey::Unordered, _) | (_, SortKey::Unordered) => a.cmp_ordered(b),
        _ if direction.is_ascending() => a.cmp_ordered(b),
        _ => b.cmp_ordered(a),
    });

    *indices = keyed.into_iter().map(|(_, index)| index).collect();
}

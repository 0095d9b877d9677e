//! Selection model for single and multi-select option lists.

use serde::{Deserialize, Serialize};

use crate::error::SelectionError;
use crate::ownership::{Emit, Ownership};

/// Selection mode for components.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// One value, committing closes the overlay
    #[default]
    Single,
    /// A set of values, committing toggles membership
    Multiple,
}

/// The selected value(s).
///
/// An emptied multi-selection is `Multi(vec![])`; there is no separate
/// "nothing selected" marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionValue<T> {
    Single(Option<T>),
    Multi(Vec<T>),
}

impl<T: Clone + PartialEq> SelectionValue<T> {
    pub fn empty(mode: SelectionMode) -> Self {
        match mode {
            SelectionMode::Single => SelectionValue::Single(None),
            SelectionMode::Multiple => SelectionValue::Multi(Vec::new()),
        }
    }

    pub fn mode(&self) -> SelectionMode {
        match self {
            SelectionValue::Single(_) => SelectionMode::Single,
            SelectionValue::Multi(_) => SelectionMode::Multiple,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            SelectionValue::Single(value) => value.is_none(),
            SelectionValue::Multi(values) => values.is_empty(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SelectionValue::Single(value) => usize::from(value.is_some()),
            SelectionValue::Multi(values) => values.len(),
        }
    }

    pub fn contains(&self, candidate: &T) -> bool {
        match self {
            SelectionValue::Single(value) => value.as_ref() == Some(candidate),
            SelectionValue::Multi(values) => values.contains(candidate),
        }
    }

    pub fn values(&self) -> Vec<&T> {
        match self {
            SelectionValue::Single(value) => value.iter().collect(),
            SelectionValue::Multi(values) => values.iter().collect(),
        }
    }

    /// Reshape to the given mode. Single → Multi keeps the value; Multi →
    /// Single keeps the first value.
    pub fn coerce(self, mode: SelectionMode) -> Self {
        match (self, mode) {
            (SelectionValue::Single(value), SelectionMode::Multiple) => {
                SelectionValue::Multi(value.into_iter().collect())
            }
            (SelectionValue::Multi(values), SelectionMode::Single) => {
                SelectionValue::Single(values.into_iter().next())
            }
            (same, _) => same,
        }
    }

    /// The selection restricted to values present in `domain`.
    pub fn restricted_to(&self, domain: &[T]) -> Self {
        match self {
            SelectionValue::Single(value) => {
                SelectionValue::Single(value.clone().filter(|v| domain.contains(v)))
            }
            SelectionValue::Multi(values) => SelectionValue::Multi(
                values
                    .iter()
                    .filter(|v| domain.contains(v))
                    .cloned()
                    .collect(),
            ),
        }
    }

    fn with_selected(&self, value: T) -> Self {
        match self {
            SelectionValue::Single(_) => SelectionValue::Single(Some(value)),
            SelectionValue::Multi(values) => {
                let mut values = values.clone();
                if !values.contains(&value) {
                    values.push(value);
                }
                SelectionValue::Multi(values)
            }
        }
    }

    fn without(&self, value: &T) -> Self {
        match self {
            SelectionValue::Single(current) => {
                SelectionValue::Single(current.clone().filter(|v| v != value))
            }
            SelectionValue::Multi(values) => {
                SelectionValue::Multi(values.iter().filter(|v| *v != value).cloned().collect())
            }
        }
    }
}

/// Resolves single/multi selection over controlled or uncontrolled ownership.
///
/// Every mutating call returns an [`Emit`]; call `.dispatch()` to notify the
/// owner. In controlled mode the model's value only changes through
/// [`SelectionModel::sync`].
///
/// # Example
///
/// ```
/// use tabula::selection::{SelectionMode, SelectionModel, SelectionValue};
///
/// let mut model = SelectionModel::uncontrolled(SelectionMode::Multiple);
/// model.toggle("a").dispatch();
/// model.toggle("b").dispatch();
/// model.toggle("a").dispatch();
/// assert_eq!(model.value(), &SelectionValue::Multi(vec!["b"]));
/// ```
#[derive(Debug)]
pub struct SelectionModel<T> {
    mode: SelectionMode,
    ownership: Ownership<SelectionValue<T>>,
}

impl<T: Clone + PartialEq> SelectionModel<T> {
    /// Wrap an ownership variant. The value's shape decides the mode.
    pub fn new(ownership: Ownership<SelectionValue<T>>) -> Self {
        let mode = ownership.current().mode();
        Self { mode, ownership }
    }

    /// Uncontrolled, initially empty.
    pub fn uncontrolled(mode: SelectionMode) -> Self {
        Self::new(Ownership::uncontrolled(SelectionValue::empty(mode)))
    }

    /// Controlled by the caller. An empty value (`Single(None)`) still makes
    /// the model controlled.
    pub fn controlled(
        value: SelectionValue<T>,
        on_change: impl Fn(&SelectionValue<T>) + Send + Sync + 'static,
    ) -> Self {
        Self::new(Ownership::controlled(value, on_change))
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn is_controlled(&self) -> bool {
        self.ownership.is_controlled()
    }

    pub fn value(&self) -> &SelectionValue<T> {
        self.ownership.current()
    }

    pub fn is_selected(&self, value: &T) -> bool {
        self.value().contains(value)
    }

    /// The current value restricted to the option domain.
    pub fn selected_in(&self, domain: &[T]) -> SelectionValue<T> {
        self.value().restricted_to(domain)
    }

    /// Select a value. Single replaces, multi adds.
    pub fn select(&mut self, value: T) -> Emit<SelectionValue<T>> {
        let next = self.value().with_selected(value);
        self.ownership.propose(next)
    }

    /// Select a value only if it belongs to `domain`.
    pub fn try_select(
        &mut self,
        value: T,
        domain: &[T],
    ) -> Result<Emit<SelectionValue<T>>, SelectionError> {
        if !domain.contains(&value) {
            return Err(SelectionError::OutsideDomain);
        }
        Ok(self.select(value))
    }

    /// Toggle membership. In single mode, toggling the current value clears it.
    pub fn toggle(&mut self, value: T) -> Emit<SelectionValue<T>> {
        let next = if self.value().contains(&value) {
            self.value().without(&value)
        } else {
            self.value().with_selected(value)
        };
        self.ownership.propose(next)
    }

    /// Commit from a list: single selects, multi toggles.
    pub fn commit(&mut self, value: T) -> Emit<SelectionValue<T>> {
        match self.mode {
            SelectionMode::Single => self.select(value),
            SelectionMode::Multiple => self.toggle(value),
        }
    }

    pub fn deselect(&mut self, value: &T) -> Emit<SelectionValue<T>> {
        let next = self.value().without(value);
        self.ownership.propose(next)
    }

    pub fn clear(&mut self) -> Emit<SelectionValue<T>> {
        self.ownership.propose(SelectionValue::empty(self.mode))
    }

    /// Accept the caller's value on re-render (controlled only).
    pub fn sync(&mut self, value: SelectionValue<T>) -> Result<(), SelectionError> {
        self.ownership.sync(value.coerce(self.mode))
    }

    /// Drop uncontrolled values that are no longer offered.
    ///
    /// Returns an emit when the stored value changed. Controlled models are
    /// never rewritten; read them through [`selected_in`](Self::selected_in).
    pub fn retain_domain(&mut self, domain: &[T]) -> Option<Emit<SelectionValue<T>>> {
        if self.is_controlled() {
            return None;
        }
        let restricted = self.value().restricted_to(domain);
        if &restricted == self.value() {
            return None;
        }
        log::debug!("[selection] dropping values outside the option domain");
        Some(self.ownership.propose(restricted))
    }

    /// Overwrite an uncontrolled value silently (used when an owning
    /// component is reset). No-op when controlled.
    pub fn reset(&mut self, value: SelectionValue<T>) -> bool {
        self.ownership.replace_internal(value.coerce(self.mode))
    }
}

//! Controlled vs. uncontrolled value ownership.
//!
//! A component either owns its value (uncontrolled) or mirrors a value owned
//! by the caller (controlled). The choice is made once, at construction, by
//! picking a variant; it cannot change afterwards.

use std::sync::Arc;

use crate::error::SelectionError;

/// Change notification callback.
pub type ChangeCallback<V> = Arc<dyn Fn(&V) + Send + Sync>;

/// Who owns a component's value.
pub enum Ownership<V> {
    /// The caller owns the value. Changes are only proposed through
    /// `on_change`; the caller feeds the accepted value back with
    /// [`Ownership::sync`].
    Controlled {
        value: V,
        on_change: ChangeCallback<V>,
    },
    /// The component owns the value. `on_change` is notified after updates.
    Uncontrolled {
        value: V,
        on_change: Option<ChangeCallback<V>>,
    },
}

impl<V: std::fmt::Debug> std::fmt::Debug for Ownership<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ownership::Controlled { value, .. } => {
                f.debug_struct("Controlled").field("value", value).finish()
            }
            Ownership::Uncontrolled { value, on_change } => f
                .debug_struct("Uncontrolled")
                .field("value", value)
                .field("notifies", &on_change.is_some())
                .finish(),
        }
    }
}

impl<V: Clone> Ownership<V> {
    pub fn controlled(value: V, on_change: impl Fn(&V) + Send + Sync + 'static) -> Self {
        Ownership::Controlled {
            value,
            on_change: Arc::new(on_change),
        }
    }

    pub fn uncontrolled(initial: V) -> Self {
        Ownership::Uncontrolled {
            value: initial,
            on_change: None,
        }
    }

    pub fn uncontrolled_with(initial: V, on_change: impl Fn(&V) + Send + Sync + 'static) -> Self {
        Ownership::Uncontrolled {
            value: initial,
            on_change: Some(Arc::new(on_change)),
        }
    }

    pub fn is_controlled(&self) -> bool {
        matches!(self, Ownership::Controlled { .. })
    }

    /// The value as of the last render (controlled) or the last change
    /// (uncontrolled).
    pub fn current(&self) -> &V {
        match self {
            Ownership::Controlled { value, .. } | Ownership::Uncontrolled { value, .. } => value,
        }
    }

    /// Propose a new value.
    ///
    /// Controlled: nothing is stored, the proposal is only emitted.
    /// Uncontrolled: the value is stored, then emitted if a callback exists.
    pub fn propose(&mut self, next: V) -> Emit<V> {
        match self {
            Ownership::Controlled { on_change, .. } => Emit {
                callback: Some(Arc::clone(on_change)),
                value: next,
            },
            Ownership::Uncontrolled { value, on_change } => {
                *value = next.clone();
                Emit {
                    callback: on_change.clone(),
                    value: next,
                }
            }
        }
    }

    /// Accept the caller's value on re-render. Only valid when controlled.
    pub fn sync(&mut self, external: V) -> Result<(), SelectionError> {
        match self {
            Ownership::Controlled { value, .. } => {
                *value = external;
                Ok(())
            }
            Ownership::Uncontrolled { .. } => Err(SelectionError::NotControlled),
        }
    }

    /// Replace an uncontrolled value without notifying. Controlled values are
    /// left alone; returns false in that case.
    pub(crate) fn replace_internal(&mut self, next: V) -> bool {
        match self {
            Ownership::Uncontrolled { value, .. } => {
                *value = next;
                true
            }
            Ownership::Controlled { .. } => false,
        }
    }
}

/// A pending change notification.
///
/// Returned instead of invoking the callback in place, so that components can
/// release their locks before caller code runs. Call [`Emit::dispatch`].
#[must_use = "the change callback only runs when the Emit is dispatched"]
pub struct Emit<V> {
    callback: Option<ChangeCallback<V>>,
    value: V,
}

impl<V> Emit<V> {
    /// The proposed or stored value.
    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }

    /// Invoke the callback (if any) and return the value.
    pub fn dispatch(self) -> V {
        if let Some(callback) = &self.callback {
            callback(&self.value);
        }
        self.value
    }
}

impl<V: std::fmt::Debug> std::fmt::Debug for Emit<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emit")
            .field("value", &self.value)
            .field("has_callback", &self.callback.is_some())
            .finish()
    }
}

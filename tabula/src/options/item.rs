//! Option items shown by select, dropdown-menu and search-palette overlays.

/// A selectable option.
///
/// Options are owned by the caller and handed to the combobox each time the
/// set changes. The engine never mutates them.
///
/// # Example
///
/// ```
/// use tabula::options::OptionItem;
///
/// let option = OptionItem::new("sku-42", "Espresso beans")
///     .keywords(["coffee", "roast"])
///     .group("Pantry");
/// assert_eq!(option.group_name(), Some("Pantry"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct OptionItem<T> {
    /// Value committed when the option is selected
    pub value: T,
    /// Display label
    pub label: String,
    /// Extra search terms that are not displayed
    pub keywords: Vec<String>,
    /// Icon name, interpreted by the caller's renderer
    pub icon: Option<String>,
    /// Group heading for grouped rendering
    pub group: Option<String>,
}

impl<T> OptionItem<T> {
    pub fn new(value: T, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
            keywords: Vec::new(),
            icon: None,
            group: None,
        }
    }

    pub fn keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn group_name(&self) -> Option<&str> {
        self.group.as_deref()
    }
}

/// Render-time state of an option, passed to option renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OptionState {
    /// Keyboard highlight
    pub highlighted: bool,
    /// Part of the committed selection
    pub selected: bool,
}

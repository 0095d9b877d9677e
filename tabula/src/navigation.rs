//! Keyboard highlight over a filtered option list.
//!
//! The highlight is distinct from the committed selection: arrows move it,
//! Enter commits whatever it points at.

use serde::{Deserialize, Serialize};

use crate::selection::SelectionMode;

/// Where the highlight goes when the filtered list changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightReset {
    /// Nothing highlighted (-1). Used by free-text search surfaces, where
    /// Enter without an explicit highlight should not pick an option.
    #[default]
    None,
    /// First option highlighted (0). Used by closed-option selects.
    First,
}

/// What the owning overlay should do after a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Single-select: emit the value and close
    Close,
    /// Multi-select: toggle membership, keep the list open
    StayOpen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Commit {
    pub index: usize,
    pub outcome: CommitOutcome,
}

#[derive(Debug, Clone, Default)]
pub struct NavigableList {
    len: usize,
    highlighted: Option<usize>,
    reset: HighlightReset,
}

impl NavigableList {
    pub fn new(reset: HighlightReset) -> Self {
        Self {
            len: 0,
            highlighted: None,
            reset,
        }
    }

    pub fn reset_policy(&self) -> HighlightReset {
        self.reset
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    /// The highlight as a signed index, -1 meaning none.
    pub fn highlighted_index(&self) -> isize {
        self.highlighted
            .and_then(|i| isize::try_from(i).ok())
            .unwrap_or(-1)
    }

    /// The filtered list was replaced (new search term): reset the highlight.
    pub fn reset_to(&mut self, len: usize) {
        self.len = len;
        self.highlighted = match self.reset {
            HighlightReset::First if len > 0 => Some(0),
            _ => None,
        };
    }

    /// The list length changed without a new term: keep the highlight, clamped.
    pub fn resize(&mut self, len: usize) {
        self.len = len;
        if let Some(index) = self.highlighted
            && index >= len
        {
            self.highlighted = len.checked_sub(1);
        }
    }

    /// Highlight a specific index. Returns false if out of range.
    pub fn set_highlight(&mut self, index: usize) -> bool {
        if index < self.len {
            self.highlighted = Some(index);
            true
        } else {
            false
        }
    }

    pub fn clear_highlight(&mut self) {
        self.highlighted = None;
    }

    /// Move down, wrapping from the last option to the first.
    pub fn move_next(&mut self) -> Option<usize> {
        if self.len == 0 {
            self.highlighted = None;
            return None;
        }
        let next = match self.highlighted {
            None => 0,
            Some(index) => (index + 1) % self.len,
        };
        self.highlighted = Some(next);
        self.highlighted
    }

    /// Move up, wrapping from the first option to the last.
    pub fn move_prev(&mut self) -> Option<usize> {
        if self.len == 0 {
            self.highlighted = None;
            return None;
        }
        let prev = match self.highlighted {
            None => self.len - 1,
            Some(index) => (index + self.len - 1) % self.len,
        };
        self.highlighted = Some(prev);
        self.highlighted
    }

    pub fn move_first(&mut self) -> Option<usize> {
        self.highlighted = (self.len > 0).then_some(0);
        self.highlighted
    }

    pub fn move_last(&mut self) -> Option<usize> {
        self.highlighted = self.len.checked_sub(1);
        self.highlighted
    }

    /// Commit the option at `index` under the given selection mode.
    pub fn commit(&self, index: usize, mode: SelectionMode) -> Option<Commit> {
        if index >= self.len {
            return None;
        }
        let outcome = match mode {
            SelectionMode::Single => CommitOutcome::Close,
            SelectionMode::Multiple => CommitOutcome::StayOpen,
        };
        Some(Commit { index, outcome })
    }

    /// Commit the highlighted option, if any.
    pub fn commit_highlighted(&self, mode: SelectionMode) -> Option<Commit> {
        self.highlighted.and_then(|index| self.commit(index, mode))
    }

    /// Escape: drop the highlight. The selection is not touched.
    pub fn escape(&mut self) {
        self.highlighted = None;
    }
}

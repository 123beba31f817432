//! Row selection for the payables and receivables tables
//!
//! Snapshots are immutable; every change produces a new [`SelectionState`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A change to the selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SelectionAction {
    /// Header checkbox
    SelectAll { visible: Vec<String>, checked: bool },
    /// Row checkbox
    Toggle { id: String, checked: bool },
    /// Visible rows changed (filter or data); drop hidden ids
    Prune { visible: Vec<String> },
    Clear,
}

/// Set of selected row ids
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    selected: BTreeSet<String>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reduce(&self, action: SelectionAction) -> Self {
        match action {
            SelectionAction::SelectAll { visible, checked } => self.select_all(&visible, checked),
            SelectionAction::Toggle { id, checked } => self.toggle(&id, checked),
            SelectionAction::Prune { visible } => self.prune(&visible),
            SelectionAction::Clear => Self::default(),
        }
    }

    /// Checked selects exactly the visible rows; unchecked selects nothing
    pub fn select_all<S: AsRef<str>>(&self, visible: &[S], checked: bool) -> Self {
        if checked {
            Self {
                selected: visible.iter().map(|id| id.as_ref().to_string()).collect(),
            }
        } else {
            Self::default()
        }
    }

    pub fn toggle(&self, id: &str, checked: bool) -> Self {
        let mut selected = self.selected.clone();
        if checked {
            selected.insert(id.to_string());
        } else {
            selected.remove(id);
        }
        Self { selected }
    }

    /// Keep only ids that are still visible
    pub fn prune<S: AsRef<str>>(&self, visible: &[S]) -> Self {
        let visible: BTreeSet<&str> = visible.iter().map(|id| id.as_ref()).collect();
        Self {
            selected: self
                .selected
                .iter()
                .filter(|id| visible.contains(id.as_str()))
                .cloned()
                .collect(),
        }
    }

    /// Header checkbox state: a non-empty visible set, all of it selected
    pub fn all_selected<S: AsRef<str>>(&self, visible: &[S]) -> bool {
        !visible.is_empty() && visible.iter().all(|id| self.selected.contains(id.as_ref()))
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn ids(&self) -> Vec<String> {
        self.selected.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

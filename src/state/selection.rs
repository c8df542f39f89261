//! Row selection state for bulk actions.
//!
//! The selection is a set of record identifiers held independently of the
//! page currently displayed, so rows stay selected across page turns until
//! explicitly cleared or consumed by a bulk action.

use std::collections::BTreeSet;

/// Set of selected record identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<String>,
}

impl Selection {
    /// Creates an empty selection.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ids: BTreeSet::new(),
        }
    }

    /// Adds an identifier to the selection.
    pub fn select(&mut self, id: impl Into<String>) {
        self.ids.insert(id.into());
    }

    /// Removes an identifier from the selection.
    pub fn deselect(&mut self, id: &str) {
        self.ids.remove(id);
    }

    /// Toggles an identifier in or out of the selection.
    pub fn toggle(&mut self, id: impl Into<String>) {
        let id = id.into();
        if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
    }

    /// Returns true when the identifier is selected.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Returns true when nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns the number of selected rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Clears the selection.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Returns the selected identifiers for submission to a bulk endpoint.
    #[must_use]
    pub fn to_ids(&self) -> Vec<String> {
        self.ids.iter().cloned().collect()
    }

    /// Consumes the selection for a bulk action, leaving it empty.
    pub fn take_ids(&mut self) -> Vec<String> {
        std::mem::take(&mut self.ids).into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::Selection;

    #[test]
    fn selection_survives_rows_not_on_current_page() {
        let mut selection = Selection::new();
        selection.select("id-1");
        selection.select("id-2");

        // Page turned; the displayed items changed but the selection did not.
        assert_eq!(selection.len(), 2);
        assert!(selection.contains("id-1"));
    }

    #[test]
    fn toggle_flips_membership() {
        let mut selection = Selection::new();
        selection.toggle("id-1");
        assert!(selection.contains("id-1"));
        selection.toggle("id-1");
        assert!(!selection.contains("id-1"));
    }

    #[test]
    fn take_ids_empties_the_selection() {
        let mut selection = Selection::new();
        selection.select("b");
        selection.select("a");

        let ids = selection.take_ids();
        assert_eq!(ids, vec!["a".to_owned(), "b".to_owned()]);
        assert!(selection.is_empty());
    }
}

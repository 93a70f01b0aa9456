//! Product selection state for building a pricing profile.
//!
//! The selection is a plain value owned by whoever drives the form; nothing
//! here is global.

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How many products a profile applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricingScope {
    One,
    #[default]
    Multiple,
    All,
}

/// Rejected selection change.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Only one product can be selected. Please change to 'Multiple Products' to select more.")]
    SingleProductOnly,
}

/// Selected product ids plus the active scope.
///
/// # Invariants
///
/// - In `One` scope at most one product is selected
/// - `selected_ids` returns ids in the order they were selected
#[derive(Debug, Clone, Default)]
pub struct ProductSelection {
    selected: Vec<u32>,
    scope: PricingScope,
}

impl ProductSelection {
    pub fn new(scope: PricingScope) -> Self {
        ProductSelection {
            selected: Vec::new(),
            scope,
        }
    }

    pub fn scope(&self) -> PricingScope {
        self.scope
    }

    pub fn is_selected(&self, id: u32) -> bool {
        self.selected.contains(&id)
    }

    pub fn selected_ids(&self) -> &[u32] {
        &self.selected
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selects or deselects a product.
    ///
    /// In `One` scope a second product cannot be added. In `All` scope,
    /// deselecting a product drops the scope to `Multiple`.
    pub fn toggle(&mut self, id: u32) -> Result<(), SelectionError> {
        if let Some(pos) = self.selected.iter().position(|&s| s == id) {
            self.selected.remove(pos);
            if self.scope == PricingScope::All {
                debug!("Product {} deselected, scope all -> multiple", id);
                self.scope = PricingScope::Multiple;
            }
            return Ok(());
        }

        if self.scope == PricingScope::One && !self.selected.is_empty() {
            return Err(SelectionError::SingleProductOnly);
        }

        self.selected.push(id);
        Ok(())
    }

    /// Replaces the selection with `ids`. Ignored in `One` scope.
    pub fn select_all(&mut self, ids: &[u32]) {
        if self.scope == PricingScope::One {
            debug!("Ignoring select-all in single product scope");
            return;
        }
        self.replace(ids);
    }

    /// Clears the selection regardless of scope.
    pub fn deselect_all(&mut self) {
        self.selected.clear();
    }

    /// Changes scope.
    ///
    /// Switching to `One` keeps only the first selected product; switching to
    /// `All` selects every id in `all_ids` when it is non-empty.
    pub fn set_scope(&mut self, scope: PricingScope, all_ids: &[u32]) {
        match scope {
            PricingScope::One => self.selected.truncate(1),
            PricingScope::All if !all_ids.is_empty() => self.replace(all_ids),
            _ => {}
        }
        self.scope = scope;
    }

    fn replace(&mut self, ids: &[u32]) {
        self.selected.clear();
        for &id in ids {
            if !self.selected.contains(&id) {
                self.selected.push(id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_multiple() {
        let mut selection = ProductSelection::default();
        selection.toggle(1).unwrap();
        selection.toggle(2).unwrap();
        selection.toggle(1).unwrap();

        assert_eq!(selection.selected_ids(), &[2]);
        assert_eq!(selection.scope(), PricingScope::Multiple);
    }

    #[test]
    fn test_one_scope_rejects_second_product() {
        let mut selection = ProductSelection::new(PricingScope::One);
        selection.toggle(1).unwrap();

        let err = selection.toggle(2).unwrap_err();
        assert_eq!(err, SelectionError::SingleProductOnly);
        assert_eq!(selection.selected_ids(), &[1]);

        // Deselecting the only product is still allowed
        selection.toggle(1).unwrap();
        assert!(selection.is_empty());
        selection.toggle(2).unwrap();
        assert_eq!(selection.selected_ids(), &[2]);
    }

    #[test]
    fn test_deselect_in_all_scope_switches_to_multiple() {
        let mut selection = ProductSelection::default();
        selection.set_scope(PricingScope::All, &[1, 2, 3]);
        assert_eq!(selection.len(), 3);

        selection.toggle(2).unwrap();
        assert_eq!(selection.scope(), PricingScope::Multiple);
        assert_eq!(selection.selected_ids(), &[1, 3]);
    }

    #[test]
    fn test_select_all_ignored_in_one_scope() {
        let mut selection = ProductSelection::new(PricingScope::One);
        selection.select_all(&[1, 2, 3]);
        assert!(selection.is_empty());

        let mut selection = ProductSelection::default();
        selection.select_all(&[3, 1, 3]);
        assert_eq!(selection.selected_ids(), &[3, 1]);
    }

    #[test]
    fn test_deselect_all_any_scope() {
        let mut selection = ProductSelection::default();
        selection.set_scope(PricingScope::All, &[1, 2]);
        selection.deselect_all();
        assert!(selection.is_empty());
        assert_eq!(selection.scope(), PricingScope::All);
    }

    #[test]
    fn test_switch_to_one_keeps_first() {
        let mut selection = ProductSelection::default();
        selection.toggle(5).unwrap();
        selection.toggle(9).unwrap();
        selection.set_scope(PricingScope::One, &[]);

        assert_eq!(selection.selected_ids(), &[5]);
        assert!(!selection.is_selected(9));
    }

    #[test]
    fn test_switch_to_all_without_ids_keeps_selection() {
        let mut selection = ProductSelection::default();
        selection.toggle(4).unwrap();
        selection.set_scope(PricingScope::All, &[]);

        assert_eq!(selection.scope(), PricingScope::All);
        assert_eq!(selection.selected_ids(), &[4]);
    }

    #[test]
    fn test_error_message() {
        assert_eq!(
            SelectionError::SingleProductOnly.to_string(),
            "Only one product can be selected. Please change to 'Multiple Products' to select more."
        );
    }
}

//! The favorites store: a curated subset of the installed catalog
//! (made by FontLab https://www.fontlab.com/)
//!
//! Favorites are kept in an unordered set; display order is derived by
//! sorting at render time. Every name in the set is present in the catalog
//! the store was last reconciled against.

use std::collections::HashSet;

use crate::catalog::{FontName, InstalledCatalog};

/// Separator used by the persisted form.
pub const PERSISTED_SEPARATOR: char = ',';

#[derive(Debug, Clone, Default)]
pub struct FavoritesStore {
    favorites: HashSet<FontName>,
    catalog: InstalledCatalog,
}

impl FavoritesStore {
    /// An empty store validating against `catalog`.
    pub fn new(catalog: InstalledCatalog) -> Self {
        Self {
            favorites: HashSet::new(),
            catalog,
        }
    }

    /// Insert `name` when it is installed and not already a favorite.
    pub fn add(&mut self, name: &str) -> bool {
        if !self.catalog.contains(name) {
            return false;
        }
        self.favorites.insert(name.to_string())
    }

    /// Remove `name`; absent names are a no-op.
    pub fn remove(&mut self, name: &str) -> bool {
        self.favorites.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.favorites.contains(name)
    }

    /// Adopt `catalog` and drop every favorite it no longer lists.
    ///
    /// Returns the dropped names in sorted order. Calling again with the same
    /// catalog drops nothing.
    pub fn reconcile(&mut self, catalog: InstalledCatalog) -> Vec<FontName> {
        self.catalog = catalog;
        let catalog = &self.catalog;

        let mut removed: Vec<FontName> = self
            .favorites
            .iter()
            .filter(|name| !catalog.contains(name))
            .cloned()
            .collect();
        for name in &removed {
            self.favorites.remove(name);
        }
        removed.sort();

        for name in &removed {
            log::info!("favorite font no longer installed: {name}");
        }
        removed
    }

    /// Sorted, comma-joined names; the empty set yields `""`.
    pub fn to_persisted_form(&self) -> String {
        self.sorted().join(&PERSISTED_SEPARATOR.to_string())
    }

    /// Parse the persisted form and reconcile it against `catalog`.
    pub fn from_persisted_form(s: &str, catalog: InstalledCatalog) -> Self {
        Self::from_persisted_form_reporting(s, catalog).0
    }

    /// Like [`FavoritesStore::from_persisted_form`], also returning the
    /// persisted names that were dropped because they are not installed.
    pub fn from_persisted_form_reporting(
        s: &str,
        catalog: InstalledCatalog,
    ) -> (Self, Vec<FontName>) {
        let favorites: HashSet<FontName> = s
            .split(PERSISTED_SEPARATOR)
            .filter(|piece| !piece.is_empty())
            .map(str::to_string)
            .collect();

        let mut store = Self {
            favorites,
            catalog: InstalledCatalog::default(),
        };
        let removed = store.reconcile(catalog);
        (store, removed)
    }

    /// Favorites in display order.
    pub fn sorted(&self) -> Vec<FontName> {
        let mut names: Vec<FontName> = self.favorites.iter().cloned().collect();
        names.sort();
        names
    }

    pub fn favorites(&self) -> &HashSet<FontName> {
        &self.favorites
    }

    pub fn catalog(&self) -> &InstalledCatalog {
        &self.catalog
    }

    pub fn len(&self) -> usize {
        self.favorites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.favorites.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> InstalledCatalog {
        InstalledCatalog::from_names(["Arial", "Calibri", "Verdana"])
    }

    #[test]
    fn add_rejects_uninstalled_and_duplicate_names() {
        let mut store = FavoritesStore::new(catalog());
        assert!(store.add("Arial"));
        assert!(!store.add("Arial"));
        assert!(!store.add("Helvetica"));
        assert!(!store.add(""));
        assert_eq!(store.sorted(), vec!["Arial"]);
    }

    #[test]
    fn remove_absent_is_noop() {
        let mut store = FavoritesStore::new(catalog());
        assert!(!store.remove("Arial"));
        store.add("Arial");
        assert!(store.remove("Arial"));
        assert!(store.is_empty());
    }

    #[test]
    fn persisted_form_is_sorted() {
        let mut store = FavoritesStore::new(catalog());
        store.add("Verdana");
        store.add("Arial");
        assert_eq!(store.to_persisted_form(), "Arial,Verdana");
    }

    #[test]
    fn empty_string_parses_to_empty_set() {
        let store = FavoritesStore::from_persisted_form("", catalog());
        assert!(store.is_empty());
        assert_eq!(store.to_persisted_form(), "");
    }

    #[test]
    fn stray_separators_do_not_produce_empty_names() {
        let store = FavoritesStore::from_persisted_form(",Arial,,Arial,", catalog());
        assert_eq!(store.sorted(), vec!["Arial"]);
    }

    #[test]
    fn pieces_are_not_trimmed() {
        let store = FavoritesStore::from_persisted_form("Arial, Calibri", catalog());
        assert_eq!(store.sorted(), vec!["Arial"]);
    }
}

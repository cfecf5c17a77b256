//! Mutation primitives a version definition applies to its working copy.
//!
//! Every primitive checks all of its preconditions before touching the
//! catalog, so a failed call leaves the working copy exactly as it was.

use crate::catalog::identity::{EntryId, Label};
use crate::catalog::model::{Category, Entry};
use crate::catalog::store::Catalog;
use crate::error::{CatalogError, Result};
use indexmap::IndexMap;
use std::collections::HashSet;
use tracing::debug;

impl Catalog {
    /// Deep, independent copy to derive the next version from.
    ///
    /// Refuses to copy a catalog that already breaks referential integrity,
    /// so a broken published version cannot seed later ones.
    pub fn fork(&self) -> Result<Catalog> {
        self.validate()
            .map_err(|err| CatalogError::CloneFailed(Box::new(err)))?;
        Ok(self.clone())
    }

    /// Insert `entries` immediately after `after`, keeping their given order.
    pub fn insert_after<I>(&mut self, after: &str, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = Entry>,
    {
        let anchor = self.position(after)?;
        let entries: Vec<Entry> = entries.into_iter().collect();
        self.check_new_entries(&entries)?;

        let count = entries.len();
        for (offset, entry) in entries.into_iter().enumerate() {
            self.entries
                .shift_insert(anchor + 1 + offset, entry.id().clone(), entry);
        }
        debug!(after, count, "inserted entries");
        Ok(())
    }

    /// Add `entries` at the end of the display order.
    pub fn append<I>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = Entry>,
    {
        let entries: Vec<Entry> = entries.into_iter().collect();
        self.check_new_entries(&entries)?;

        for entry in entries {
            debug!(entry = %entry.id(), "appended entry");
            self.entries.insert(entry.id().clone(), entry);
        }
        Ok(())
    }

    /// Relocate `id` to sit immediately after `after`.
    ///
    /// The entry is taken out of its old slot first, so moving an entry after
    /// itself or after its current predecessor leaves the order unchanged.
    pub fn move_after(&mut self, id: &str, after: &str) -> Result<()> {
        let from = self.position(id)?;
        let anchor = self.position(after)?;
        if from == anchor {
            return Ok(());
        }

        let to = if anchor < from { anchor + 1 } else { anchor };
        self.entries.move_index(from, to);
        debug!(entry = id, after, from, to, "moved entry");
        Ok(())
    }

    /// Delete an entry and hand it back. Categories are never touched.
    pub fn remove(&mut self, id: &str) -> Result<Entry> {
        let entry = self
            .entries
            .shift_remove(id)
            .ok_or_else(|| CatalogError::EntryNotFound(EntryId::from(id)))?;
        debug!(entry = id, "removed entry");
        Ok(entry)
    }

    /// Replace the whole category list, in the given order.
    ///
    /// Duplicate ids are rejected here. Entries left pointing at a dropped
    /// category are not: the version may still re-categorize or remove them,
    /// and [`Catalog::validate`] reports any that remain when it is sealed.
    pub fn replace_categories<I>(&mut self, categories: I) -> Result<()>
    where
        I: IntoIterator<Item = Category>,
    {
        let mut replacement = IndexMap::new();
        for category in categories {
            if replacement.contains_key(category.id()) {
                return Err(CatalogError::DuplicateCategory(category.id().clone()));
            }
            replacement.insert(category.id().clone(), category);
        }

        let orphaned = self
            .entries
            .values()
            .filter(|entry| !replacement.contains_key(&entry.category))
            .count();
        debug!(count = replacement.len(), orphaned, "replaced categories");
        self.categories = replacement;
        Ok(())
    }

    /// Move an entry to another existing category.
    pub fn set_category(&mut self, id: &str, category: &str) -> Result<()> {
        let category = self.find_category(category)?.id().clone();
        let entry = self.find_mut(id)?;
        debug!(entry = id, from = %entry.category, to = %category, "re-categorized entry");
        entry.category = category;
        Ok(())
    }

    /// Drop an entry's label, returning the previous one.
    pub fn clear_label(&mut self, id: &str) -> Result<Option<Label>> {
        Ok(self.find_mut(id)?.label.take())
    }

    pub fn set_label(&mut self, id: &str, label: Label) -> Result<()> {
        self.find_mut(id)?.label = Some(label);
        Ok(())
    }

    pub fn set_edit(&mut self, id: &str, edit: impl Into<String>) -> Result<()> {
        self.find_mut(id)?.edit = edit.into();
        Ok(())
    }

    fn check_new_entries(&self, entries: &[Entry]) -> Result<()> {
        let mut seen = HashSet::new();
        for entry in entries {
            if self.entries.contains_key(entry.id()) || !seen.insert(entry.id()) {
                return Err(CatalogError::DuplicateEntry(entry.id().clone()));
            }
            if !self.categories.contains_key(&entry.category) {
                return Err(CatalogError::DanglingCategory {
                    entry: entry.id().clone(),
                    category: entry.category.clone(),
                });
            }
        }
        Ok(())
    }
}

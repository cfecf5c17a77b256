//! Ordered, indexed storage for one catalog version.
//!
//! Categories and entries live in insertion-ordered maps keyed by id, so
//! lookups are O(1) while the sequence order (display order, and the operand
//! order for moves) is preserved exactly. Keys always equal the stored
//! value's id; ids are read-only on the values to keep it that way.

use crate::catalog::identity::{CategoryId, EntryId, VersionKey};
use crate::catalog::model::{CATALOG_SCHEMA_VERSION, Category, CatalogDocument, Entry};
use crate::error::{CatalogError, Result};
use crate::schema_loader::catalog_schema;
use anyhow::Context;
use indexmap::IndexMap;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

#[derive(Clone, Debug, Default)]
/// The categories and entries of one version.
pub struct Catalog {
    pub(crate) categories: IndexMap<CategoryId, Category>,
    pub(crate) entries: IndexMap<EntryId, Entry>,
}

impl Catalog {
    /// Build a catalog from authored sequences, rejecting duplicate ids and
    /// entries whose category does not resolve.
    pub fn from_parts(categories: Vec<Category>, entries: Vec<Entry>) -> Result<Self> {
        let mut catalog = Catalog::default();
        for category in categories {
            if catalog.categories.contains_key(category.id()) {
                return Err(CatalogError::DuplicateCategory(category.id().clone()));
            }
            catalog.categories.insert(category.id().clone(), category);
        }
        for entry in entries {
            if catalog.entries.contains_key(entry.id()) {
                return Err(CatalogError::DuplicateEntry(entry.id().clone()));
            }
            catalog.entries.insert(entry.id().clone(), entry);
        }
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load a catalog document from disk.
    ///
    /// The document is checked against the bundled JSON Schema first, then
    /// against the catalog invariants. Returns the declared version key with
    /// the catalog.
    pub fn load(path: &Path) -> anyhow::Result<(VersionKey, Catalog)> {
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        let value: Value = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing {}", path.display()))?;
        Self::from_value(value, &path.display().to_string())
    }

    /// Decode an already-parsed catalog document. `label` names it in errors.
    pub fn from_value(value: Value, label: &str) -> anyhow::Result<(VersionKey, Catalog)> {
        let schema = catalog_schema()?;
        schema.validate(&value, label)?;
        debug!(schema = %schema.schema_version, document = label, "schema check passed");
        let document: CatalogDocument =
            serde_json::from_value(value).with_context(|| format!("decoding {label}"))?;
        let version = document.version;
        let catalog = Catalog::from_parts(document.categories, document.entries)
            .with_context(|| format!("catalog {label} (version {version}) is inconsistent"))?;
        Ok((version, catalog))
    }

    /// Snapshot this catalog as a serializable document.
    pub fn to_document(&self, version: &VersionKey) -> CatalogDocument {
        CatalogDocument {
            schema_version: CATALOG_SCHEMA_VERSION.to_string(),
            version: version.clone(),
            categories: self.categories.values().cloned().collect(),
            entries: self.entries.values().cloned().collect(),
        }
    }

    /// Categories in display order.
    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.categories.values()
    }

    /// Entries in display order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    /// Entries in display order, for bulk in-place edits.
    pub fn entries_mut(&mut self) -> impl Iterator<Item = &mut Entry> {
        self.entries.values_mut()
    }

    pub fn entry_ids(&self) -> impl Iterator<Item = &EntryId> {
        self.entries.keys()
    }

    pub fn category_ids(&self) -> impl Iterator<Item = &CategoryId> {
        self.categories.keys()
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn contains_category(&self, id: &str) -> bool {
        self.categories.contains_key(id)
    }

    /// Resolve an entry by id.
    pub fn find(&self, id: &str) -> Result<&Entry> {
        self.entries
            .get(id)
            .ok_or_else(|| CatalogError::EntryNotFound(EntryId::from(id)))
    }

    /// Resolve an entry for in-place edits.
    ///
    /// Changes made through the handle are part of the catalog immediately.
    /// A category assigned this way is checked when the version is sealed.
    pub fn find_mut(&mut self, id: &str) -> Result<&mut Entry> {
        self.entries
            .get_mut(id)
            .ok_or_else(|| CatalogError::EntryNotFound(EntryId::from(id)))
    }

    /// Resolve a category by id.
    pub fn find_category(&self, id: &str) -> Result<&Category> {
        self.categories
            .get(id)
            .ok_or_else(|| CatalogError::CategoryNotFound(CategoryId::from(id)))
    }

    /// Position of an entry in display order.
    pub fn position(&self, id: &str) -> Result<usize> {
        self.entries
            .get_index_of(id)
            .ok_or_else(|| CatalogError::EntryNotFound(EntryId::from(id)))
    }

    /// Check referential integrity of every entry.
    ///
    /// Id uniqueness is enforced structurally by the maps; this reports the
    /// first entry whose category is missing from the category list.
    pub fn validate(&self) -> Result<()> {
        for entry in self.entries.values() {
            if !self.categories.contains_key(&entry.category) {
                return Err(CatalogError::DanglingCategory {
                    entry: entry.id().clone(),
                    category: entry.category.clone(),
                });
            }
        }
        Ok(())
    }

    /// Entries grouped under their category, both in display order.
    ///
    /// This is the read-only view a renderer consumes. Categories without
    /// entries are kept so navigation order stays stable.
    pub fn grouped(&self) -> Vec<(&Category, Vec<&Entry>)> {
        self.categories
            .values()
            .map(|category| {
                let members = self
                    .entries
                    .values()
                    .filter(|entry| &entry.category == category.id())
                    .collect();
                (category, members)
            })
            .collect()
    }
}

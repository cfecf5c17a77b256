//! Value types for categories and entries, plus their on-disk document form.
//!
//! The types mirror `schema/catalog.schema.json`. Ids are private because the
//! store keys on them; every other field is plain data the engine carries
//! through untouched unless an edit targets it.

use crate::catalog::identity::{CategoryId, EntryId, Label, VersionKey};
use serde::{Deserialize, Serialize};

/// Schema key every catalog document declares.
pub const CATALOG_SCHEMA_VERSION: &str = "catalog_v1";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// Opaque presentation handle for a category (an icon name plus styling hint).
pub struct Icon {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
}

impl Icon {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            class: None,
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
/// Navigation grouping; the catalog's category order is the display order.
pub struct Category {
    id: CategoryId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
}

impl Category {
    pub fn new(id: impl Into<CategoryId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon: None,
        }
    }

    pub fn with_icon(mut self, icon: Icon) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn id(&self) -> &CategoryId {
        &self.id
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
/// One documented component.
///
/// `category` must name a category of the same catalog; the store checks this
/// on insert and again when a version is sealed.
pub struct Entry {
    id: EntryId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: CategoryId,
    #[serde(default)]
    pub href: String,
    #[serde(default)]
    pub repository: String,
    #[serde(default)]
    pub edit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
}

impl Entry {
    pub fn new(
        id: impl Into<EntryId>,
        name: impl Into<String>,
        category: impl Into<CategoryId>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            category: category.into(),
            href: String::new(),
            repository: String::new(),
            edit: String::new(),
            examples: None,
            label: None,
        }
    }

    pub fn id(&self) -> &EntryId {
        &self.id
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = href.into();
        self
    }

    pub fn with_repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = repository.into();
        self
    }

    pub fn with_edit(mut self, edit: impl Into<String>) -> Self {
        self.edit = edit.into();
        self
    }

    pub fn with_examples(mut self, examples: impl Into<String>) -> Self {
        self.examples = Some(examples.into());
        self
    }

    pub fn with_label(mut self, label: Label) -> Self {
        self.label = Some(label);
        self
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
/// A catalog as stored on disk or emitted by `catalog-build`.
pub struct CatalogDocument {
    pub schema_version: String,
    pub version: VersionKey,
    pub categories: Vec<Category>,
    pub entries: Vec<Entry>,
}

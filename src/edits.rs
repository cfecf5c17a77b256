//! Edit scripts: one version definition written as data.
//!
//! A script names the version it produces, the published version it is
//! derived from, and the ordered edits to apply to a fork of that base. The
//! edits map one-to-one onto the catalog primitives, plus two bulk rewrites
//! used when a release moves documentation links.

use crate::catalog::{Catalog, Category, CategoryId, Entry, EntryId, Label, VersionKey};
use crate::error::CatalogError;
use anyhow::{Context, Result, bail};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Placeholder expanded to the entry id by `rewrite_edit_links`.
pub const ID_PLACEHOLDER: &str = "{id}";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
/// A version expressed as edits against its base version.
pub struct EditScript {
    pub version: VersionKey,
    pub base: VersionKey,
    #[serde(default)]
    pub edits: Vec<Edit>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case", deny_unknown_fields)]
/// One step of an edit script.
pub enum Edit {
    ReplaceCategories {
        categories: Vec<CategorySlot>,
    },
    Remove {
        id: EntryId,
    },
    Move {
        id: EntryId,
        after: EntryId,
    },
    Insert {
        after: EntryId,
        entries: Vec<Entry>,
    },
    Append {
        entries: Vec<Entry>,
    },
    SetCategory {
        id: EntryId,
        category: CategoryId,
    },
    ClearLabel {
        id: EntryId,
    },
    SetLabel {
        id: EntryId,
        label: Label,
    },
    SetEdit {
        id: EntryId,
        edit: String,
    },
    /// Regex rewrite of every entry's examples link. Only the first match in
    /// each link is replaced unless `all` is set.
    RewriteExamples {
        pattern: String,
        replacement: String,
        #[serde(default)]
        all: bool,
    },
    /// Point every entry's edit link at `template` with `{id}` expanded.
    RewriteEditLinks {
        template: String,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
/// A slot in a replacement category list.
pub enum CategorySlot {
    /// Carry a category over from the working copy.
    Inherit(InheritedCategory),
    /// A category introduced by this version.
    Define(Category),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
/// `{ "inherit": id }` and nothing else.
pub struct InheritedCategory {
    pub inherit: CategoryId,
}

impl CategorySlot {
    fn resolve(&self, catalog: &Catalog) -> Result<Category, CatalogError> {
        match self {
            CategorySlot::Inherit(slot) => catalog.find_category(slot.inherit.as_str()).cloned(),
            CategorySlot::Define(category) => Ok(category.clone()),
        }
    }
}

impl EditScript {
    /// Read an edit script from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let script: EditScript = serde_json::from_str(&data)
            .with_context(|| format!("parsing edit script {}", path.display()))?;
        Ok(script)
    }

    /// Apply every edit in order, stopping at the first failure.
    pub fn apply(&self, catalog: &mut Catalog) -> Result<()> {
        for (index, edit) in self.edits.iter().enumerate() {
            edit.apply(catalog)
                .with_context(|| format!("edit #{} ({edit})", index + 1))?;
        }
        Ok(())
    }
}

impl Edit {
    pub fn apply(&self, catalog: &mut Catalog) -> Result<()> {
        match self {
            Edit::ReplaceCategories { categories } => {
                let resolved = categories
                    .iter()
                    .map(|slot| slot.resolve(catalog))
                    .collect::<Result<Vec<_>, _>>()?;
                catalog.replace_categories(resolved)?;
            }
            Edit::Remove { id } => {
                catalog.remove(id.as_str())?;
            }
            Edit::Move { id, after } => catalog.move_after(id.as_str(), after.as_str())?,
            Edit::Insert { after, entries } => {
                catalog.insert_after(after.as_str(), entries.iter().cloned())?
            }
            Edit::Append { entries } => catalog.append(entries.iter().cloned())?,
            Edit::SetCategory { id, category } => {
                catalog.set_category(id.as_str(), category.as_str())?
            }
            Edit::ClearLabel { id } => {
                catalog.clear_label(id.as_str())?;
            }
            Edit::SetLabel { id, label } => catalog.set_label(id.as_str(), label.clone())?,
            Edit::SetEdit { id, edit } => catalog.set_edit(id.as_str(), edit.as_str())?,
            Edit::RewriteExamples {
                pattern,
                replacement,
                all,
            } => {
                let regex = Regex::new(pattern)
                    .with_context(|| format!("invalid examples pattern {pattern:?}"))?;
                let changed = rewrite_examples(catalog, &regex, replacement, *all);
                if changed == 0 {
                    warn!(pattern = pattern.as_str(), "examples rewrite matched no entries");
                } else {
                    debug!(pattern = pattern.as_str(), changed, "rewrote examples links");
                }
            }
            Edit::RewriteEditLinks { template } => {
                if !template.contains(ID_PLACEHOLDER) {
                    bail!("edit link template {template:?} has no {ID_PLACEHOLDER} placeholder");
                }
                for entry in catalog.entries_mut() {
                    entry.edit = template.replace(ID_PLACEHOLDER, entry.id().as_str());
                }
            }
        }
        Ok(())
    }
}

fn rewrite_examples(catalog: &mut Catalog, regex: &Regex, replacement: &str, all: bool) -> usize {
    let mut changed = 0;
    for entry in catalog.entries_mut() {
        let Some(examples) = entry.examples.as_deref() else {
            continue;
        };
        let rewritten = if all {
            regex.replace_all(examples, replacement)
        } else {
            regex.replace(examples, replacement)
        };
        if rewritten != examples {
            let rewritten = rewritten.into_owned();
            entry.examples = Some(rewritten);
            changed += 1;
        }
    }
    changed
}

impl fmt::Display for Edit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edit::ReplaceCategories { categories } => {
                write!(f, "replace categories with {} slots", categories.len())
            }
            Edit::Remove { id } => write!(f, "remove {id}"),
            Edit::Move { id, after } => write!(f, "move {id} after {after}"),
            Edit::Insert { after, entries } => {
                write!(f, "insert {} entries after {after}", entries.len())
            }
            Edit::Append { entries } => write!(f, "append {} entries", entries.len()),
            Edit::SetCategory { id, category } => write!(f, "set category of {id} to {category}"),
            Edit::ClearLabel { id } => write!(f, "clear label of {id}"),
            Edit::SetLabel { id, label } => write!(f, "label {id} as {label}"),
            Edit::SetEdit { id, .. } => write!(f, "set edit link of {id}"),
            Edit::RewriteExamples { pattern, .. } => write!(f, "rewrite examples matching {pattern}"),
            Edit::RewriteEditLinks { .. } => write!(f, "rewrite edit links"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn base() -> Catalog {
        Catalog::from_parts(
            vec![
                Category::new("core", "Core"),
                Category::new("web", "Web"),
                Category::new("sync", "Sync"),
            ],
            vec![
                Entry::new("vertx-core", "Core", "core"),
                Entry::new("vertx-web", "Web", "web")
                    .with_examples("https://github.com/vert-x3/vertx-examples/tree/3.x/web-examples")
                    .with_label(Label::TechnicalPreview),
                Entry::new("vertx-sync", "Sync", "sync"),
            ],
        )
        .unwrap()
    }

    fn ids(catalog: &Catalog) -> Vec<&str> {
        catalog.entry_ids().map(EntryId::as_str).collect()
    }

    #[test]
    fn parses_every_op() {
        let script: EditScript = serde_json::from_value(json!({
            "version": "4.0.2",
            "base": "3.9.4",
            "edits": [
                {"op": "replace_categories", "categories": [
                    {"inherit": "core"},
                    {"id": "monitoring", "name": "Monitoring", "icon": {"name": "Monitor"}}
                ]},
                {"op": "remove", "id": "vertx-sync"},
                {"op": "move", "id": "a", "after": "b"},
                {"op": "insert", "after": "a", "entries": [{"id": "x", "name": "X", "category": "core"}]},
                {"op": "append", "entries": []},
                {"op": "set_category", "id": "a", "category": "core"},
                {"op": "clear_label", "id": "a"},
                {"op": "set_label", "id": "a", "label": "Deprecated"},
                {"op": "set_edit", "id": "a", "edit": "https://example.com"},
                {"op": "rewrite_examples", "pattern": "3\\.x", "replacement": "4.x"},
                {"op": "rewrite_edit_links", "template": "https://example.com/{id}/java"}
            ]
        }))
        .unwrap();
        assert_eq!(script.edits.len(), 11);
        assert!(matches!(
            &script.edits[0],
            Edit::ReplaceCategories { categories }
                if matches!(categories[0], CategorySlot::Inherit(_))
                    && matches!(categories[1], CategorySlot::Define(_))
        ));
        assert!(matches!(
            &script.edits[9],
            Edit::RewriteExamples { all: false, .. }
        ));
    }

    #[test]
    fn rejects_unknown_op() {
        let parsed = serde_json::from_value::<Edit>(json!({"op": "rename", "id": "a"}));
        assert!(parsed.is_err());
    }

    #[test]
    fn rejects_stray_keys() {
        let misspelled_flag = serde_json::from_value::<Edit>(json!({
            "op": "rewrite_examples",
            "pattern": "3\\.x",
            "replacement": "4.x",
            "al": true
        }));
        assert!(misspelled_flag.is_err());

        let extra_anchor =
            serde_json::from_value::<Edit>(json!({"op": "remove", "id": "a", "after": "b"}));
        assert!(extra_anchor.is_err());

        let renamed_inherit = serde_json::from_value::<CategorySlot>(json!({
            "inherit": "core",
            "name": "Renamed"
        }));
        assert!(renamed_inherit.is_err());

        let replace = serde_json::from_value::<Edit>(json!({
            "op": "replace_categories",
            "categories": [{"inherit": "core", "name": "Renamed"}]
        }));
        assert!(replace.is_err());
    }

    #[test]
    fn replace_then_remove_orphans_applies_cleanly() {
        let script: EditScript = serde_json::from_value(json!({
            "version": "4.0.2",
            "base": "3.9.4",
            "edits": [
                {"op": "replace_categories", "categories": [
                    {"inherit": "core"},
                    {"inherit": "web"},
                    {"id": "monitoring", "name": "Monitoring"}
                ]},
                {"op": "remove", "id": "vertx-sync"},
                {"op": "insert", "after": "vertx-core", "entries": [
                    {"id": "vertx-zipkin", "name": "Zipkin", "category": "monitoring"}
                ]},
                {"op": "clear_label", "id": "vertx-web"}
            ]
        }))
        .unwrap();

        let mut catalog = base().fork().unwrap();
        script.apply(&mut catalog).unwrap();
        catalog.validate().unwrap();
        assert_eq!(ids(&catalog), vec!["vertx-core", "vertx-zipkin", "vertx-web"]);
        assert_eq!(catalog.find("vertx-web").unwrap().label, None);
        let categories: Vec<&str> = catalog.category_ids().map(CategoryId::as_str).collect();
        assert_eq!(categories, vec!["core", "web", "monitoring"]);
    }

    #[test]
    fn failure_names_the_step_and_keeps_typed_error() {
        let script = EditScript {
            version: VersionKey::from("4.0.2"),
            base: VersionKey::from("3.9.4"),
            edits: vec![
                Edit::Remove {
                    id: EntryId::from("vertx-sync"),
                },
                Edit::Move {
                    id: EntryId::from("vertx-sync"),
                    after: EntryId::from("vertx-core"),
                },
            ],
        };
        let mut catalog = base();
        let err = script.apply(&mut catalog).unwrap_err();
        let rendered = format!("{err:#}");
        assert!(rendered.contains("edit #2 (move vertx-sync after vertx-core)"));
        assert_eq!(
            err.downcast_ref::<CatalogError>(),
            Some(&CatalogError::EntryNotFound(EntryId::from("vertx-sync")))
        );
    }

    #[test]
    fn inherit_of_unknown_category_fails() {
        let edit = Edit::ReplaceCategories {
            categories: vec![CategorySlot::Inherit(InheritedCategory {
                inherit: CategoryId::from("messaging"),
            })],
        };
        let mut catalog = base();
        let err = edit.apply(&mut catalog).unwrap_err();
        assert_eq!(
            err.downcast_ref::<CatalogError>(),
            Some(&CatalogError::CategoryNotFound(CategoryId::from("messaging")))
        );
        assert_eq!(catalog.category_count(), 3);
    }

    #[test]
    fn rewrite_examples_replaces_first_match_by_default() {
        let mut catalog = base();
        catalog.find_mut("vertx-core").unwrap().examples =
            Some("https://example.com/3.x/core/3.x".to_string());

        Edit::RewriteExamples {
            pattern: r"3\.x".to_string(),
            replacement: "4.x".to_string(),
            all: false,
        }
        .apply(&mut catalog)
        .unwrap();

        assert_eq!(
            catalog.find("vertx-core").unwrap().examples.as_deref(),
            Some("https://example.com/4.x/core/3.x")
        );
        assert_eq!(
            catalog.find("vertx-web").unwrap().examples.as_deref(),
            Some("https://github.com/vert-x3/vertx-examples/tree/4.x/web-examples")
        );
        assert_eq!(catalog.find("vertx-sync").unwrap().examples, None);

        Edit::RewriteExamples {
            pattern: r"3\.x".to_string(),
            replacement: "4.x".to_string(),
            all: true,
        }
        .apply(&mut catalog)
        .unwrap();
        assert_eq!(
            catalog.find("vertx-core").unwrap().examples.as_deref(),
            Some("https://example.com/4.x/core/4.x")
        );
    }

    #[test]
    fn rewrite_examples_rejects_bad_pattern() {
        let mut catalog = base();
        let err = Edit::RewriteExamples {
            pattern: "(".to_string(),
            replacement: String::new(),
            all: false,
        }
        .apply(&mut catalog)
        .unwrap_err();
        assert!(err.to_string().contains("invalid examples pattern"));
    }

    #[test]
    fn rewrite_edit_links_expands_id() {
        let mut catalog = base();
        Edit::RewriteEditLinks {
            template: "https://github.com/vertx-china/vertx-web-site/tree/master/docs/translation/{id}/java"
                .to_string(),
        }
        .apply(&mut catalog)
        .unwrap();
        assert_eq!(
            catalog.find("vertx-web").unwrap().edit,
            "https://github.com/vertx-china/vertx-web-site/tree/master/docs/translation/vertx-web/java"
        );

        let err = Edit::RewriteEditLinks {
            template: "https://example.com/static".to_string(),
        }
        .apply(&mut catalog)
        .unwrap_err();
        assert!(err.to_string().contains("placeholder"));
    }
}

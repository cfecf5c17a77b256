//! Versioned component catalogs built as a chain of derivations.
//!
//! One release's catalog is authored in full; each later release is defined
//! as edits against an earlier, already published release. The crate exposes
//! the catalog model and its mutation primitives, edit scripts as data, the
//! chain that forks, edits, validates and seals each version, and discovery
//! of the on-disk catalog directory used by the binaries.

use anyhow::{Result, bail};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

pub mod catalog;
pub mod chain;
pub mod edits;
pub mod error;
pub mod logging;
pub mod manifest;
mod schema_loader;

pub use catalog::{
    Catalog, CatalogDocument, CatalogRepository, Category, CategoryId, Entry, EntryId, Icon,
    Label, VersionKey,
};
pub use chain::{Derivation, FnDerivation, VersionChain};
pub use edits::{CategorySlot, Edit, EditScript, InheritedCategory};
pub use error::CatalogError;
pub use manifest::{ChainManifest, MANIFEST_FILE, load_chain};

/// Directory name searched for when walking up from the working directory.
pub const CATALOG_DIR: &str = "catalog";

fn is_catalog_root(candidate: &Path) -> bool {
    candidate.join(MANIFEST_FILE).is_file()
}

/// Accept an explicit hint only when it names a real catalog directory.
fn catalog_root_from_hint(hint: &str) -> Option<PathBuf> {
    if hint.is_empty() {
        return None;
    }
    let hint_path = PathBuf::from(hint);
    if !is_catalog_root(&hint_path) {
        return None;
    }
    fs::canonicalize(hint_path).ok()
}

fn search_upwards(start: &Path) -> Option<PathBuf> {
    let mut dir = fs::canonicalize(start).ok()?;
    loop {
        let candidate = dir.join(CATALOG_DIR);
        if is_catalog_root(&candidate) {
            return Some(candidate);
        }
        if is_catalog_root(&dir) {
            return Some(dir);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

/// Locate the catalog directory from `start`, with an optional explicit hint.
///
/// The hint wins when it points at a directory holding `chain.json`; then the
/// search climbs from `start` looking for `catalog/chain.json` or a bare
/// `chain.json`.
pub fn find_catalog_root_from(start: &Path, hint: Option<&str>) -> Option<PathBuf> {
    if let Some(root) = hint.and_then(catalog_root_from_hint) {
        return Some(root);
    }
    search_upwards(start)
}

/// Locate the catalog directory for the binaries.
///
/// Honors `CATALOG_CHAIN_ROOT`, then climbs from the current directory, then
/// falls back to the directory recorded at build time.
pub fn find_catalog_root() -> Result<PathBuf> {
    let env_hint = env::var("CATALOG_CHAIN_ROOT").ok();
    if let Ok(cwd) = env::current_dir() {
        if let Some(root) = find_catalog_root_from(&cwd, env_hint.as_deref()) {
            return Ok(root);
        }
    }

    if let Some(hint) = option_env!("CATALOG_CHAIN_ROOT_HINT") {
        if let Some(root) = catalog_root_from_hint(hint) {
            return Ok(root);
        }
    }

    bail!("Unable to locate a catalog directory. Pass --root or set CATALOG_CHAIN_ROOT.");
}

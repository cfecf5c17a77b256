//! Published catalogs, one per version key.
//!
//! Once a version is published it is only reachable through shared
//! references; later versions must `fork` it rather than edit it in place.

use crate::catalog::identity::VersionKey;
use crate::catalog::model::Entry;
use crate::catalog::store::Catalog;
use anyhow::{Result, bail};
use std::collections::BTreeMap;

#[derive(Default)]
/// Frozen catalogs keyed by `VersionKey`, remembering publication order.
pub struct CatalogRepository {
    catalogs: BTreeMap<VersionKey, Catalog>,
    order: Vec<VersionKey>,
}

impl CatalogRepository {
    /// Publish a sealed catalog. Each key can be published once.
    pub fn publish(&mut self, version: VersionKey, catalog: Catalog) -> Result<()> {
        if self.catalogs.contains_key(&version) {
            bail!("version {version} is already published");
        }
        self.order.push(version.clone());
        self.catalogs.insert(version, catalog);
        Ok(())
    }

    /// Fetch a catalog by key, if present.
    pub fn get(&self, version: &VersionKey) -> Option<&Catalog> {
        self.catalogs.get(version)
    }

    /// The most recently published version.
    pub fn latest(&self) -> Option<(&VersionKey, &Catalog)> {
        let version = self.order.last()?;
        self.catalogs.get(version).map(|catalog| (version, catalog))
    }

    /// Version keys in publication order.
    pub fn versions(&self) -> impl Iterator<Item = &VersionKey> {
        self.order.iter()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Resolve an entry inside a published version.
    pub fn find_entry(&self, version: &VersionKey, id: &str) -> Option<&Entry> {
        self.get(version)?.find(id).ok()
    }
}

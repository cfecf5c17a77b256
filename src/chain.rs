//! Version derivation chain.
//!
//! The root version is authored in full. Every later version names a base
//! that is already published, receives a fork of it, applies its edits, and
//! is sealed once the result validates. Nothing a derivation does can reach
//! its base.

use crate::catalog::{Catalog, CatalogRepository, VersionKey};
use crate::edits::EditScript;
use crate::error::CatalogError;
use anyhow::{Context, Result, anyhow, bail};
use tracing::info;

/// A version defined relative to a published base.
pub trait Derivation {
    fn version(&self) -> &VersionKey;
    fn base(&self) -> &VersionKey;
    /// Mutate the working copy forked from `base` into this version.
    fn apply(&self, working: &mut Catalog) -> Result<()>;
}

impl Derivation for EditScript {
    fn version(&self) -> &VersionKey {
        &self.version
    }

    fn base(&self) -> &VersionKey {
        &self.base
    }

    fn apply(&self, working: &mut Catalog) -> Result<()> {
        EditScript::apply(self, working)
    }
}

/// A derivation written as a closure over the catalog primitives.
pub struct FnDerivation<F> {
    version: VersionKey,
    base: VersionKey,
    edit: F,
}

impl<F> FnDerivation<F>
where
    F: Fn(&mut Catalog) -> Result<(), CatalogError>,
{
    pub fn new(version: impl Into<VersionKey>, base: impl Into<VersionKey>, edit: F) -> Self {
        Self {
            version: version.into(),
            base: base.into(),
            edit,
        }
    }
}

impl<F> Derivation for FnDerivation<F>
where
    F: Fn(&mut Catalog) -> Result<(), CatalogError>,
{
    fn version(&self) -> &VersionKey {
        &self.version
    }

    fn base(&self) -> &VersionKey {
        &self.base
    }

    fn apply(&self, working: &mut Catalog) -> Result<()> {
        (self.edit)(working)?;
        Ok(())
    }
}

/// A root catalog plus the derivations that follow it, in build order.
pub struct VersionChain {
    root_version: VersionKey,
    root: Catalog,
    derivations: Vec<Box<dyn Derivation>>,
}

impl VersionChain {
    pub fn new(root_version: impl Into<VersionKey>, root: Catalog) -> Self {
        Self {
            root_version: root_version.into(),
            root,
            derivations: Vec::new(),
        }
    }

    /// Builder form of [`VersionChain::push`].
    pub fn derive<D: Derivation + 'static>(mut self, derivation: D) -> Self {
        self.push(Box::new(derivation));
        self
    }

    pub fn push(&mut self, derivation: Box<dyn Derivation>) {
        self.derivations.push(derivation);
    }

    pub fn root_version(&self) -> &VersionKey {
        &self.root_version
    }

    /// Version keys in build order, root first.
    pub fn versions(&self) -> Vec<&VersionKey> {
        std::iter::once(&self.root_version)
            .chain(self.derivations.iter().map(|d| d.version()))
            .collect()
    }

    /// Build and seal every version.
    ///
    /// Stops at the first failure; versions are only published once their
    /// own edits succeed and the result validates.
    pub fn build(self) -> Result<CatalogRepository> {
        let mut repository = CatalogRepository::default();
        self.root
            .validate()
            .with_context(|| format!("root version {} is inconsistent", self.root_version))?;
        info!(
            version = %self.root_version,
            categories = self.root.category_count(),
            entries = self.root.entry_count(),
            "sealed root version"
        );
        repository.publish(self.root_version, self.root)?;

        for derivation in &self.derivations {
            let version = derivation.version();
            let base = derivation.base();
            if repository.get(version).is_some() {
                bail!("version {version} is defined more than once");
            }
            let published = repository
                .get(base)
                .ok_or_else(|| anyhow!("version {version} derives from unknown version {base}"))?;
            let mut working = published
                .fork()
                .with_context(|| format!("forking {base} for version {version}"))?;
            derivation
                .apply(&mut working)
                .with_context(|| format!("deriving version {version} from {base}"))?;
            working
                .validate()
                .with_context(|| format!("version {version} is inconsistent after its edits"))?;
            info!(
                version = %version,
                base = %base,
                categories = working.category_count(),
                entries = working.entry_count(),
                "sealed version"
            );
            repository.publish(version.clone(), working)?;
        }
        Ok(repository)
    }
}

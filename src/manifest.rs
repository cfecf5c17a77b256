//! On-disk chain layout.
//!
//! A catalog directory holds `chain.json`, which names the root catalog
//! document and the edit scripts to derive from it, in build order. Paths are
//! relative to the directory.

use crate::catalog::Catalog;
use crate::chain::VersionChain;
use crate::edits::EditScript;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const MANIFEST_FILE: &str = "chain.json";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
/// Contents of `chain.json`.
pub struct ChainManifest {
    pub root: PathBuf,
    #[serde(default)]
    pub versions: Vec<PathBuf>,
}

impl ChainManifest {
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(MANIFEST_FILE);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("reading chain manifest {}", path.display()))?;
        let manifest: ChainManifest = serde_json::from_str(&data)
            .with_context(|| format!("parsing chain manifest {}", path.display()))?;
        Ok(manifest)
    }
}

/// Load the root catalog and every edit script named by `dir/chain.json`.
///
/// Scripts are parsed but not applied; bases and version keys are checked
/// when the chain is built.
pub fn load_chain(dir: &Path) -> Result<VersionChain> {
    let manifest = ChainManifest::load(dir)?;
    let root_path = dir.join(&manifest.root);
    let (root_version, root) = Catalog::load(&root_path)?;
    debug!(version = %root_version, path = %root_path.display(), "loaded root catalog");

    let mut chain = VersionChain::new(root_version, root);
    for relative in &manifest.versions {
        let path = dir.join(relative);
        let script = EditScript::load(&path)?;
        debug!(
            version = %script.version,
            base = %script.base,
            edits = script.edits.len(),
            "loaded edit script"
        );
        chain.push(Box::new(script));
    }
    Ok(chain)
}

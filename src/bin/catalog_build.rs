//! Builds the version chain and prints one sealed catalog.
//!
//! The catalog directory comes from `--root` or discovery. Every version is
//! derived and validated before anything is printed, so a broken edit in any
//! release fails the run even when an earlier release is requested.

use anyhow::{Context, Result};
use catalog_chain::{Catalog, VersionKey, find_catalog_root, load_chain, logging};
use clap::Parser;
use std::fmt::Write as _;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[derive(Parser, Debug)]
#[command(
    name = "catalog-build",
    version,
    about = "Build the catalog version chain and print one version"
)]
struct Cli {
    /// Catalog directory holding chain.json (discovered when omitted)
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Release to print; defaults to the last version in the chain
    #[arg(long, value_name = "KEY")]
    release: Option<String>,

    /// Write output to FILE instead of stdout
    #[arg(long, value_name = "FILE")]
    out: Option<PathBuf>,

    /// Print entries grouped by category instead of JSON
    #[arg(long)]
    summary: bool,

    /// List published versions and exit
    #[arg(long, conflicts_with_all = ["release", "summary"])]
    list: bool,

    /// Log every mutation
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let root = match cli.root {
        Some(root) => root,
        None => find_catalog_root()?,
    };
    let repository = load_chain(&root)
        .with_context(|| format!("loading catalog chain from {}", root.display()))?
        .build()?;

    let rendered = if cli.list {
        let mut listing = String::new();
        for version in repository.versions() {
            writeln!(listing, "{version}")?;
        }
        listing
    } else {
        let (version, catalog) = match cli.release.as_deref() {
            Some(key) => {
                let version = VersionKey::from(key);
                let catalog = repository
                    .get(&version)
                    .with_context(|| format!("unknown release {key}"))?;
                (version, catalog)
            }
            None => {
                let (version, catalog) = repository
                    .latest()
                    .context("catalog chain has no versions")?;
                (version.clone(), catalog)
            }
        };
        if cli.summary {
            render_summary(&version, catalog)?
        } else {
            let mut json = serde_json::to_string_pretty(&catalog.to_document(&version))?;
            json.push('\n');
            json
        }
    };

    match cli.out {
        Some(path) => write_atomically(&path, &rendered),
        None => {
            print!("{rendered}");
            Ok(())
        }
    }
}

fn render_summary(version: &VersionKey, catalog: &Catalog) -> Result<String> {
    let mut out = String::new();
    writeln!(
        out,
        "catalog {version}: {} categories, {} entries",
        catalog.category_count(),
        catalog.entry_count()
    )?;
    for (category, entries) in catalog.grouped() {
        writeln!(out, "\n{} ({})", category.name, category.id())?;
        for entry in entries {
            match &entry.label {
                Some(label) => writeln!(out, "  {:<32} {} [{label}]", entry.id(), entry.name)?,
                None => writeln!(out, "  {:<32} {}", entry.id(), entry.name)?,
            }
        }
    }
    Ok(out)
}

fn write_atomically(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(parent)
        .with_context(|| format!("creating temporary file in {}", parent.display()))?;
    tmp.write_all(contents.as_bytes())
        .with_context(|| format!("writing {}", path.display()))?;
    tmp.persist(path)
        .with_context(|| format!("replacing {}", path.display()))?;
    Ok(())
}

//! Validates catalog documents, edit scripts, and whole chains.
//!
//! Every input is checked and reported; the exit status is non-zero when any
//! of them failed.

use anyhow::{Context, Result, bail};
use catalog_chain::{Catalog, EditScript, load_chain, logging};
use clap::Parser;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "catalog-check",
    version,
    about = "Validate catalog documents and edit scripts"
)]
struct Cli {
    /// Build the chain in each catalog directory without printing it
    #[arg(long = "chain", value_name = "DIR")]
    chains: Vec<PathBuf>,

    /// Catalog documents or edit scripts (files with an `edits` key)
    #[arg(value_name = "PATH", required_unless_present = "chains")]
    paths: Vec<PathBuf>,

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

    let mut failures = 0usize;
    for path in &cli.paths {
        match check_file(path) {
            Ok(summary) => println!("ok   {}: {summary}", path.display()),
            Err(err) => {
                failures += 1;
                println!("FAIL {}: {err:#}", path.display());
            }
        }
    }
    for dir in &cli.chains {
        match check_chain(dir) {
            Ok(summary) => println!("ok   {}: {summary}", dir.display()),
            Err(err) => {
                failures += 1;
                println!("FAIL {}: {err:#}", dir.display());
            }
        }
    }

    if failures > 0 {
        bail!("{failures} input(s) failed validation");
    }
    Ok(())
}

fn check_file(path: &Path) -> Result<String> {
    let data = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let value: Value =
        serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))?;

    if value.get("edits").is_some() {
        let script: EditScript =
            serde_json::from_value(value).context("decoding edit script")?;
        return Ok(format!(
            "edit script {} (base {}, {} edits)",
            script.version,
            script.base,
            script.edits.len()
        ));
    }

    let (version, catalog) = Catalog::from_value(value, &path.display().to_string())?;
    Ok(format!(
        "catalog {version} ({} categories, {} entries)",
        catalog.category_count(),
        catalog.entry_count()
    ))
}

fn check_chain(dir: &Path) -> Result<String> {
    let repository = load_chain(dir)?.build()?;
    let versions: Vec<String> = repository
        .versions()
        .map(|version| {
            let entries = repository
                .get(version)
                .map(Catalog::entry_count)
                .unwrap_or_default();
            format!("{version} ({entries} entries)")
        })
        .collect();
    Ok(format!("chain {}", versions.join(", ")))
}

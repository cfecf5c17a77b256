//! JSON Schema loading for catalog documents.
//!
//! The schema ships inside the binary so installed helpers validate the same
//! contract the repository tests against. The loader checks that the schema's
//! `schema_version` const is one this build understands before compiling it.

use crate::catalog::model::CATALOG_SCHEMA_VERSION;
use anyhow::{Context, Result, anyhow, bail};
use jsonschema::JSONSchema;
use serde_json::Value;
use std::collections::BTreeSet;

const BUNDLED_CATALOG_SCHEMA: &str = include_str!("../schema/catalog.schema.json");
const SCHEMA_VERSION_POINTER: &str = "/properties/schema_version/const";

/// Result of loading and compiling a JSON Schema.
pub(crate) struct SchemaLoadResult {
    pub schema_version: String,
    pub compiled: JSONSchema,
}

impl SchemaLoadResult {
    /// Validate `instance`, folding every schema violation into one error.
    pub fn validate(&self, instance: &Value, label: &str) -> Result<()> {
        if let Err(errors) = self.compiled.validate(instance) {
            let details = errors
                .map(|err| format!("{} at {}", err, err.instance_path))
                .collect::<Vec<_>>()
                .join("\n");
            bail!("{label} failed schema validation:\n{details}");
        }
        Ok(())
    }
}

/// Compile the bundled catalog document schema.
pub(crate) fn catalog_schema() -> Result<SchemaLoadResult> {
    let allowed = BTreeSet::from_iter([CATALOG_SCHEMA_VERSION.to_string()]);
    load_json_schema(BUNDLED_CATALOG_SCHEMA, "catalog schema", Some(&allowed))
}

pub(crate) fn load_json_schema(
    raw: &str,
    label: &str,
    allowed_versions: Option<&BTreeSet<String>>,
) -> Result<SchemaLoadResult> {
    let schema: Value = serde_json::from_str(raw).with_context(|| format!("parsing {label}"))?;

    let schema_version = extract_schema_version(&schema, SCHEMA_VERSION_POINTER)
        .ok_or_else(|| anyhow!("{label} missing schema_version const"))?;

    if let Some(allowed) = allowed_versions {
        if !allowed.contains(&schema_version) {
            bail!(
                "schema_version '{}' not in allowed set {:?}",
                schema_version,
                allowed
            );
        }
    }

    // The compile error borrows the schema value, so render it before returning.
    let compiled =
        JSONSchema::compile(&schema).map_err(|err| anyhow!("compiling {label}: {err}"))?;

    Ok(SchemaLoadResult {
        schema_version,
        compiled,
    })
}

fn extract_schema_version(schema: &Value, pointer: &str) -> Option<String> {
    let version = schema.pointer(pointer).and_then(Value::as_str)?;
    if version
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        Some(version.to_string())
    } else {
        None
    }
}

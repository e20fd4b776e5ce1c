//! Style registry load helpers with schema + invariant validation.
//!
//! The registry is authored as TOML, checked against
//! `schemas/style_registry/v1.schema.json`, then against the semantic
//! invariants in [`crate::core::invariants`].

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use jsonschema::validator_for;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::core::invariants::validate_registry_invariants;
use crate::core::style::{StyleConfig, StyleRegistry};
use crate::io::config::RuncardConfig;

const BUILTIN_REGISTRY: &str = include_str!("../../styles/registry.toml");
const V1_SCHEMA: &str = include_str!("../../../schemas/style_registry/v1.schema.json");

/// On-disk registry document. `version` is pinned by the schema.
#[derive(Debug, Deserialize)]
struct RegistryFile {
    styles: Vec<StyleConfig>,
}

/// Load the styles shipped with the binary.
pub fn builtin_registry() -> Result<StyleRegistry> {
    parse_registry(BUILTIN_REGISTRY).context("load built-in style registry")
}

/// Load and validate a registry file from disk (schema + invariants).
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_registry(path: &Path) -> Result<StyleRegistry> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read registry {}", path.display()))?;
    parse_registry(&contents).with_context(|| format!("load registry {}", path.display()))
}

/// Registry selected by config: the configured file, or the built-in set.
///
/// A relative `registry_path` resolves against `base_dir` (the config file's directory).
pub fn registry_for_config(cfg: &RuncardConfig, base_dir: &Path) -> Result<StyleRegistry> {
    match &cfg.registry_path {
        Some(path) => load_registry(&base_dir.join(path)),
        None => builtin_registry(),
    }
}

/// Parse registry TOML, validating schema and invariants before building.
pub fn parse_registry(contents: &str) -> Result<StyleRegistry> {
    let value: Value = toml::from_str(contents).context("parse registry toml")?;
    validate_schema(&value)?;
    let file: RegistryFile =
        serde_json::from_value(value).context("deserialize registry styles")?;
    validate_invariants(&file.styles)?;
    debug!(styles = file.styles.len(), "loaded style registry");
    Ok(StyleRegistry::from_styles(file.styles))
}

fn validate_schema(registry: &Value) -> Result<()> {
    let schema_value: Value = serde_json::from_str(V1_SCHEMA).context("parse registry schema")?;
    let compiled =
        validator_for(&schema_value).map_err(|err| anyhow!("invalid schema: {}", err))?;
    if !compiled.is_valid(registry) {
        let messages = compiled
            .iter_errors(registry)
            .map(|err| err.to_string())
            .collect::<Vec<_>>();
        return Err(anyhow!(
            "registry schema validation failed: {}",
            messages.join("; ")
        ));
    }
    Ok(())
}

fn validate_invariants(styles: &[StyleConfig]) -> Result<()> {
    let errors = validate_registry_invariants(styles);
    if errors.is_empty() {
        return Ok(());
    }
    Err(anyhow!("registry invariants failed: {}", errors.join("; ")))
}

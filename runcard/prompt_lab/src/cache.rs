//! Result caching with content-addressed storage.
//!
//! Results are stored at `results/{style}/{prompt_hash}/{input_id}.json`.
//! The prompt hash is derived from the rendered prompt text, so editing a
//! style (or a fixture) produces a fresh cache entry.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::runner::CombinationResult;

/// Compute a short hash of content for cache keys.
pub fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    hex::encode(&result[..8]) // First 8 bytes = 16 hex chars
}

/// Cache for storing and retrieving combination results.
pub struct ResultCache {
    results_dir: PathBuf,
}

impl ResultCache {
    pub fn new(lab_root: &Path) -> Self {
        Self {
            results_dir: lab_root.join("results"),
        }
    }

    /// Directory holding every artifact for one style × prompt version.
    pub fn entry_dir(&self, style: &str, prompt_hash: &str) -> PathBuf {
        self.results_dir.join(style).join(prompt_hash)
    }

    /// Get the cache path for a combination.
    pub fn cache_path(&self, style: &str, prompt_hash: &str, input_id: &str) -> PathBuf {
        self.entry_dir(style, prompt_hash)
            .join(format!("{}.json", input_id))
    }

    /// Load a cached result if one exists.
    pub fn get_cached(
        &self,
        style: &str,
        prompt_hash: &str,
        input_id: &str,
    ) -> Result<Option<CombinationResult>> {
        let path = self.cache_path(style, prompt_hash, input_id);
        if !path.exists() {
            return Ok(None);
        }

        debug!(path = %path.display(), "loading cached result");
        let content =
            fs::read_to_string(&path).with_context(|| format!("read cache {}", path.display()))?;
        let result: CombinationResult = serde_json::from_str(&content)
            .with_context(|| format!("parse cache {}", path.display()))?;
        Ok(Some(result))
    }

    /// Save a result to the cache.
    pub fn save_result(&self, result: &CombinationResult) -> Result<()> {
        let path = self.cache_path(&result.style_id, &result.prompt_hash, &result.input_id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create cache dir {}", parent.display()))?;
        }

        debug!(path = %path.display(), "saving result to cache");
        let content = serde_json::to_string_pretty(result)?;
        fs::write(&path, content).with_context(|| format!("write cache {}", path.display()))?;
        Ok(())
    }

    /// List all cached results across styles.
    pub fn list_results(&self) -> Result<Vec<CombinationResult>> {
        if !self.results_dir.exists() {
            return Ok(vec![]);
        }

        let mut results = Vec::new();
        for style_entry in fs::read_dir(&self.results_dir)? {
            let style_entry = style_entry?;
            if !style_entry.file_type()?.is_dir() {
                continue;
            }
            for prompt_entry in fs::read_dir(style_entry.path())? {
                let prompt_entry = prompt_entry?;
                if !prompt_entry.file_type()?.is_dir() {
                    continue;
                }
                for input_entry in fs::read_dir(prompt_entry.path())? {
                    let path = input_entry?.path();
                    if path.extension().is_some_and(|e| e == "json") {
                        let content = fs::read_to_string(&path)?;
                        if let Ok(result) = serde_json::from_str::<CombinationResult>(&content) {
                            results.push(result);
                        }
                    }
                }
            }
        }

        results.sort_by(|a, b| {
            (&a.style_id, &a.input_id, &a.timestamp).cmp(&(&b.style_id, &b.input_id, &b.timestamp))
        });
        Ok(results)
    }

    /// Write `results/index.json` listing styles, inputs and every result.
    pub fn generate_index(&self) -> Result<PathBuf> {
        let results = self.list_results()?;
        let styles: BTreeSet<&str> = results.iter().map(|r| r.style_id.as_str()).collect();
        let inputs: BTreeSet<&str> = results.iter().map(|r| r.input_id.as_str()).collect();

        let index = serde_json::json!({
            "styles": styles,
            "inputs": inputs,
            "results": results,
        });

        fs::create_dir_all(&self.results_dir)
            .with_context(|| format!("create {}", self.results_dir.display()))?;
        let index_path = self.results_dir.join("index.json");
        fs::write(&index_path, serde_json::to_string_pretty(&index)?)
            .with_context(|| format!("write {}", index_path.display()))?;
        debug!(path = %index_path.display(), "wrote index.json");

        Ok(index_path)
    }
}

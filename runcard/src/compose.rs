//! Prompt composition helpers for `runcard prompt` and `runcard generate`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, instrument};

use crate::core::clock::Clock;
use crate::core::prompt::{ComposeOptions, PromptComposer};
use crate::core::stats::RunStats;
use crate::core::style::StyleRegistry;
use crate::io::config::{RuncardConfig, load_config};
use crate::io::registry::registry_for_config;

/// Config and registry, loaded once per process.
#[derive(Debug, Clone)]
pub struct Session {
    pub config: RuncardConfig,
    pub registry: StyleRegistry,
    /// Directory relative paths in the config resolve against.
    pub base_dir: PathBuf,
}

impl Session {
    /// Load config from `config_path` (defaults when missing) and its registry.
    #[instrument(skip_all, fields(config = %config_path.display()))]
    pub fn load(config_path: &Path) -> Result<Self> {
        let config = load_config(config_path).context("load config")?;
        let base_dir = config_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let registry = registry_for_config(&config, &base_dir).context("load style registry")?;
        debug!(styles = registry.len(), "session ready");
        Ok(Self {
            config,
            registry,
            base_dir,
        })
    }

    pub fn compose_options(&self) -> ComposeOptions {
        ComposeOptions {
            append_output_trailer: self.config.append_output_trailer,
        }
    }

    /// Compose the prompt for `style_id`.
    ///
    /// An unknown id surfaces as [`crate::core::error::ComposeError`] inside
    /// the returned error, so callers can `downcast_ref` it.
    pub fn compose<C: Clock>(
        &self,
        style_id: &str,
        stats: &RunStats,
        clock: C,
        options: ComposeOptions,
    ) -> Result<String> {
        let prompt = PromptComposer::new(&self.registry, clock)
            .with_options(options)
            .compose(style_id, stats)?;
        debug!(style = style_id, bytes = prompt.len(), "composed prompt");
        Ok(prompt)
    }
}

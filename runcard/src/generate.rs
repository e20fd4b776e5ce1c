//! Compose-then-generate helper for `runcard generate`.

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::info;

use crate::compose::Session;
use crate::core::clock::Clock;
use crate::core::stats::RunStats;
use crate::io::generator::{GenerateRequest, Generator, generate_image};

/// Files produced by one generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOutcome {
    pub image_path: PathBuf,
    pub log_path: PathBuf,
    pub prompt: String,
}

/// Compose the prompt for `style_id` and hand it to `generator` with the photo.
///
/// The style is resolved before the generator is touched, so an unknown id
/// never starts a generation.
pub fn generate_styled_image<G: Generator, C: Clock>(
    session: &Session,
    generator: &G,
    style_id: &str,
    stats: &RunStats,
    image_path: &Path,
    output_path: &Path,
    clock: C,
) -> Result<GenerateOutcome> {
    let prompt = session.compose(style_id, stats, clock, session.compose_options())?;
    let log_path = generator_log_path(output_path);
    let request = GenerateRequest {
        prompt,
        image_path: image_path.to_path_buf(),
        output_path: output_path.to_path_buf(),
        log_path: log_path.clone(),
        timeout: session.config.generator.timeout(),
        output_limit_bytes: session.config.generator.output_limit_bytes,
    };

    info!(style = style_id, "generating styled image");
    let image_path = generate_image(generator, &request)?;
    Ok(GenerateOutcome {
        image_path,
        log_path,
        prompt: request.prompt,
    })
}

/// `<output>.generator.log`, kept distinct from the output whatever its extension.
fn generator_log_path(output_path: &Path) -> PathBuf {
    let mut name = output_path.as_os_str().to_owned();
    name.push(".generator.log");
    PathBuf::from(name)
}

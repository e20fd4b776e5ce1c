//! Combination runner for style × input testing.
//!
//! Discovers stats fixtures, renders every selected style against each one,
//! optionally runs the generator on a test photo, and caches results.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use runcard::compose::Session;
use runcard::core::clock::Clock;
use runcard::io::generator::{GenerateRequest, Generator, generate_image};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cache::{ResultCache, content_hash};
use crate::render::{TestInput, render_prompt};

/// Result of rendering (and optionally generating) a single combination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombinationResult {
    pub style_id: String,
    pub style_name: String,
    pub prompt_hash: String,
    pub input_id: String,
    pub input_name: String,
    pub prompt_path: String,
    pub image_path: Option<String>,
    pub error: Option<String>,
    pub duration_ms: u64,
    pub timestamp: String,
}

/// What to run and how.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Style ids to run; every registered style when `None`.
    pub styles: Option<Vec<String>>,
    /// Test photo; prompts are rendered only when `None`.
    pub image: Option<PathBuf>,
    /// Re-run even if cached.
    pub force: bool,
}

/// Counts reported after a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub ran: usize,
    pub cached: usize,
    pub skipped_styles: Vec<String>,
    pub errors: usize,
}

/// Run all style × input combinations.
pub fn run_styles<C: Clock>(
    lab_root: &Path,
    session: &Session,
    generator: Option<&dyn Generator>,
    options: &RunOptions,
    clock: C,
) -> Result<RunSummary> {
    let inputs = discover_inputs(lab_root)?;
    if inputs.is_empty() {
        anyhow::bail!("No inputs found in {}/inputs/", lab_root.display());
    }

    let mut summary = RunSummary::default();
    let style_ids: Vec<String> = match &options.styles {
        Some(ids) => ids.clone(),
        None => session.registry.ids().map(str::to_string).collect(),
    };

    info!(
        styles = style_ids.len(),
        inputs = inputs.len(),
        total = style_ids.len() * inputs.len(),
        "discovered combinations"
    );

    let cache = ResultCache::new(lab_root);

    for style_id in &style_ids {
        let style = match session.registry.get(style_id) {
            Ok(style) => style,
            Err(err) => {
                warn!(style = %style_id, error = %err, "skipping unknown style");
                summary.skipped_styles.push(style_id.clone());
                continue;
            }
        };

        for input in &inputs {
            let start = Instant::now();
            let prompt = render_prompt(session, style_id, input, &clock)?;
            let prompt_hash = content_hash(&prompt);

            let wants_image = generator.is_some() && options.image.is_some();
            if !options.force
                && let Some(cached) = cache.get_cached(style_id, &prompt_hash, &input.id)?
                && (!wants_image || cached.image_path.is_some())
            {
                debug!(style = %style_id, input = %input.id, "skipping cached combination");
                summary.cached += 1;
                continue;
            }

            info!(style = %style_id, input = %input.id, "running combination");
            let entry_dir = cache.entry_dir(style_id, &prompt_hash);
            fs::create_dir_all(&entry_dir)
                .with_context(|| format!("create {}", entry_dir.display()))?;
            let prompt_path = entry_dir.join(format!("{}.prompt.txt", input.id));
            fs::write(&prompt_path, &prompt)
                .with_context(|| format!("write prompt {}", prompt_path.display()))?;

            let (image_path, error) = match (generator, &options.image) {
                (Some(generator), Some(image)) => {
                    let request = GenerateRequest {
                        prompt,
                        image_path: image.clone(),
                        output_path: entry_dir.join(format!("{}.png", input.id)),
                        log_path: entry_dir.join(format!("{}.log", input.id)),
                        timeout: session.config.generator.timeout(),
                        output_limit_bytes: session.config.generator.output_limit_bytes,
                    };
                    match generate_image(generator, &request) {
                        Ok(path) => (Some(path.display().to_string()), None),
                        Err(e) => {
                            warn!(error = %e, "generation failed");
                            (None, Some(format!("{:#}", e)))
                        }
                    }
                }
                _ => (None, None),
            };

            let result = CombinationResult {
                style_id: style_id.clone(),
                style_name: style.name_en.clone(),
                prompt_hash,
                input_id: input.id.clone(),
                input_name: input.name.clone(),
                prompt_path: prompt_path.display().to_string(),
                image_path,
                error,
                duration_ms: start.elapsed().as_millis() as u64,
                timestamp: chrono::Utc::now().to_rfc3339(),
            };

            let status = if result.error.is_some() {
                summary.errors += 1;
                "error"
            } else if result.image_path.is_some() {
                "generated"
            } else {
                "rendered"
            };
            info!(
                style = %style_id,
                input = %input.id,
                status = status,
                duration_ms = result.duration_ms,
                "combination completed"
            );

            cache.save_result(&result)?;
            summary.ran += 1;
        }
    }

    cache.generate_index()?;
    Ok(summary)
}

/// One consistency comparison: the same prompt generated `count` times.
#[derive(Debug, Clone)]
pub struct Comparison<'a> {
    pub style_id: &'a str,
    pub input: &'a TestInput,
    pub image: &'a Path,
    pub count: usize,
}

/// Generate the same style repeatedly to eyeball output consistency.
///
/// Writes `comparisons/{style}-{timestamp}/prompt.txt` and `run-{n}.png`.
/// Individual failures are recorded and do not stop the remaining runs.
pub fn compare_style<C: Clock>(
    lab_root: &Path,
    session: &Session,
    generator: &dyn Generator,
    comparison: &Comparison<'_>,
    clock: C,
) -> Result<Vec<Result<PathBuf, String>>> {
    let Comparison {
        style_id,
        input,
        image,
        count,
    } = *comparison;
    let prompt = render_prompt(session, style_id, input, clock)?;
    let stamp = chrono::Utc::now().format("%Y%m%dT%H%M%S");
    let out_dir = lab_root
        .join("comparisons")
        .join(format!("{}-{}", style_id, stamp));
    fs::create_dir_all(&out_dir).with_context(|| format!("create {}", out_dir.display()))?;
    fs::write(out_dir.join("prompt.txt"), &prompt).context("write comparison prompt")?;

    let mut outcomes = Vec::with_capacity(count);
    for run in 1..=count {
        info!(style = style_id, run, count, "generating comparison run");
        let request = GenerateRequest {
            prompt: prompt.clone(),
            image_path: image.to_path_buf(),
            output_path: out_dir.join(format!("run-{}.png", run)),
            log_path: out_dir.join(format!("run-{}.log", run)),
            timeout: session.config.generator.timeout(),
            output_limit_bytes: session.config.generator.output_limit_bytes,
        };
        let outcome = generate_image(generator, &request).map_err(|e| {
            warn!(run, error = %e, "comparison run failed");
            format!("{:#}", e)
        });
        outcomes.push(outcome);
    }
    Ok(outcomes)
}

/// Discover stats fixtures in `inputs/`.
pub fn discover_inputs(lab_root: &Path) -> Result<Vec<TestInput>> {
    let inputs_dir = lab_root.join("inputs");
    if !inputs_dir.exists() {
        return Ok(vec![]);
    }

    let mut inputs = Vec::new();
    for entry in fs::read_dir(&inputs_dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().is_some_and(|e| e == "json") {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("read input {}", path.display()))?;
            let input: TestInput = serde_json::from_str(&content)
                .with_context(|| format!("parse input {}", path.display()))?;
            inputs.push(input);
        }
    }

    inputs.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use runcard::test_support::fixed_clock;

    struct EchoGenerator;

    impl Generator for EchoGenerator {
        fn generate(&self, request: &GenerateRequest) -> Result<()> {
            fs::write(&request.output_path, request.prompt.as_bytes())?;
            Ok(())
        }
    }

    fn lab() -> (tempfile::TempDir, Session) {
        let temp = tempfile::tempdir().expect("tempdir");
        let inputs = temp.path().join("inputs");
        fs::create_dir_all(&inputs).expect("inputs dir");
        fs::write(
            inputs.join("easy_5k.json"),
            r#"{"id":"easy_5k","name":"Easy 5K","distance":"5.2","time":"2814"}"#,
        )
        .expect("write input");
        fs::write(
            inputs.join("half.json"),
            r#"{"id":"half","name":"Half","distance":"21.1","time":"14530","date":"2025-11-20"}"#,
        )
        .expect("write input");
        let session = Session::load(&temp.path().join("runcard.toml")).expect("session");
        (temp, session)
    }

    fn only(styles: &[&str]) -> RunOptions {
        RunOptions {
            styles: Some(styles.iter().map(|s| s.to_string()).collect()),
            ..RunOptions::default()
        }
    }

    #[test]
    fn renders_prompts_then_uses_cache() {
        let (temp, session) = lab();
        let options = only(&["film", "pixel"]);

        let first = run_styles(temp.path(), &session, None, &options, fixed_clock()).unwrap();
        assert_eq!(first.ran, 4);
        assert_eq!(first.cached, 0);

        let second = run_styles(temp.path(), &session, None, &options, fixed_clock()).unwrap();
        assert_eq!(second.ran, 0);
        assert_eq!(second.cached, 4);

        let results = ResultCache::new(temp.path()).list_results().unwrap();
        assert_eq!(results.len(), 4);
        let film_half = results
            .iter()
            .find(|r| r.style_id == "film" && r.input_id == "half")
            .expect("film × half");
        let prompt = fs::read_to_string(&film_half.prompt_path).unwrap();
        assert!(prompt.contains("reading \"2025-11-20\""));
        assert!(prompt.contains("\"21.1km  5'00\"  1:45:30\""));
        assert!(temp.path().join("results/index.json").exists());
    }

    #[test]
    fn force_reruns_cached_combinations() {
        let (temp, session) = lab();
        run_styles(temp.path(), &session, None, &only(&["gta"]), fixed_clock()).unwrap();
        let options = RunOptions {
            force: true,
            ..only(&["gta"])
        };
        let summary = run_styles(temp.path(), &session, None, &options, fixed_clock()).unwrap();
        assert_eq!(summary.ran, 2);
    }

    #[test]
    fn unknown_styles_are_skipped() {
        let (temp, session) = lab();
        let summary =
            run_styles(temp.path(), &session, None, &only(&["nike", "film"]), fixed_clock())
                .unwrap();
        assert_eq!(summary.skipped_styles, vec!["nike".to_string()]);
        assert_eq!(summary.ran, 2);
    }

    #[test]
    fn generates_images_when_photo_given() {
        let (temp, session) = lab();
        let photo = temp.path().join("photo.jpg");
        fs::write(&photo, b"jpeg").unwrap();
        let options = RunOptions {
            image: Some(photo),
            ..only(&["receipt"])
        };

        let summary = run_styles(
            temp.path(),
            &session,
            Some(&EchoGenerator as &dyn Generator),
            &options,
            fixed_clock(),
        )
        .unwrap();
        assert_eq!(summary.ran, 2);
        assert_eq!(summary.errors, 0);

        let results = ResultCache::new(temp.path()).list_results().unwrap();
        assert!(results.iter().all(|r| r.image_path.is_some()));
    }

    #[test]
    fn render_only_cache_does_not_block_generation() {
        let (temp, session) = lab();
        let options = only(&["film"]);
        run_styles(temp.path(), &session, None, &options, fixed_clock()).unwrap();

        let photo = temp.path().join("photo.jpg");
        fs::write(&photo, b"jpeg").unwrap();
        let with_photo = RunOptions {
            image: Some(photo),
            ..only(&["film"])
        };
        let generator = Some(&EchoGenerator as &dyn Generator);
        let summary =
            run_styles(temp.path(), &session, generator, &with_photo, fixed_clock()).unwrap();
        assert_eq!(summary.ran, 2);
        assert_eq!(summary.cached, 0);

        let results = ResultCache::new(temp.path()).list_results().unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.image_path.is_some()));

        let again =
            run_styles(temp.path(), &session, generator, &with_photo, fixed_clock()).unwrap();
        assert_eq!(again.ran, 0);
        assert_eq!(again.cached, 2);
    }

    #[test]
    fn compare_records_each_run() {
        let (temp, session) = lab();
        let photo = temp.path().join("photo.jpg");
        fs::write(&photo, b"jpeg").unwrap();
        let inputs = discover_inputs(temp.path()).unwrap();

        let comparison = Comparison {
            style_id: "magazine",
            input: &inputs[0],
            image: &photo,
            count: 3,
        };
        let outcomes =
            compare_style(temp.path(), &session, &EchoGenerator, &comparison, fixed_clock())
                .unwrap();
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes.iter().all(Result::is_ok));
    }

    #[test]
    fn missing_inputs_is_an_error() {
        let temp = tempfile::tempdir().unwrap();
        let session = Session::load(&temp.path().join("runcard.toml")).unwrap();
        let err = run_styles(
            temp.path(),
            &session,
            None,
            &RunOptions::default(),
            fixed_clock(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("No inputs found"));
    }
}

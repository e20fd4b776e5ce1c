//! Generator abstraction for the external image-generation call.
//!
//! The [`Generator`] trait decouples prompt composition from the actual image
//! backend. Runcard never sees the backend's request/response shape: it hands
//! over the prompt text and the photo path, and expects an image file back.
//! Tests use fakes that write a file without spawning processes.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use tracing::{debug, info, instrument, warn};

use crate::io::config::GeneratorConfig;
use crate::io::process::run_command_with_timeout;

/// Parameters for one generation.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// Composed prompt, passed unmodified.
    pub prompt: String,
    /// Photo to transform, passed unmodified.
    pub image_path: PathBuf,
    /// Where the generator must write the resulting image.
    pub output_path: PathBuf,
    /// Path to write generator stdout/stderr log.
    pub log_path: PathBuf,
    /// Maximum time to wait for the generator to complete.
    pub timeout: Duration,
    /// Truncate generator output logs beyond this many bytes.
    pub output_limit_bytes: usize,
}

/// Abstraction over image-generation backends.
pub trait Generator {
    /// Run one generation. Must write the image to `request.output_path`.
    fn generate(&self, request: &GenerateRequest) -> Result<()>;
}

/// Generator that spawns a user-configured command.
///
/// The prompt goes to stdin; `<image-path> <output-path>` are appended to
/// the configured arguments.
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    program: String,
    args: Vec<String>,
}

impl CommandGenerator {
    pub fn from_config(cfg: &GeneratorConfig) -> Result<Self> {
        let (program, args) = cfg
            .command
            .split_first()
            .ok_or_else(|| anyhow!("generator.command is not configured"))?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

impl Generator for CommandGenerator {
    #[instrument(skip_all, fields(program = %self.program, timeout_secs = request.timeout.as_secs()))]
    fn generate(&self, request: &GenerateRequest) -> Result<()> {
        info!(image = %request.image_path.display(), "starting generator");

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg(&request.image_path)
            .arg(&request.output_path);

        let output = run_command_with_timeout(
            cmd,
            Some(request.prompt.as_bytes()),
            request.timeout,
            request.output_limit_bytes,
        )
        .with_context(|| format!("run generator {}", self.program))?;

        write_log(
            &request.log_path,
            &output.to_log("generator"),
            request.output_limit_bytes,
        )?;

        if output.timed_out {
            warn!(timeout_secs = request.timeout.as_secs(), "generator timed out");
            bail!("generator timed out after {:?}", request.timeout);
        }
        if !output.status.success() {
            warn!(exit_code = ?output.status.code(), "generator failed");
            bail!("generator failed with status {:?}", output.status.code());
        }

        debug!("generator completed successfully");
        Ok(())
    }
}

/// Run the generator and verify it produced an image file.
#[instrument(skip_all, fields(output_path = %request.output_path.display()))]
pub fn generate_image<G: Generator + ?Sized>(
    generator: &G,
    request: &GenerateRequest,
) -> Result<PathBuf> {
    if !request.image_path.is_file() {
        bail!("missing input image {}", request.image_path.display());
    }
    if request.log_path == request.output_path {
        bail!(
            "generator log would overwrite output {}",
            request.output_path.display()
        );
    }
    if let Some(parent) = request.output_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create output dir {}", parent.display()))?;
    }
    generator.generate(request)?;
    ensure_output_exists(&request.output_path)?;
    Ok(request.output_path.clone())
}

fn ensure_output_exists(path: &Path) -> Result<()> {
    let populated = fs::metadata(path).map(|m| m.len() > 0).unwrap_or(false);
    if !populated {
        return Err(anyhow!("missing generator output {}", path.display()));
    }
    Ok(())
}

fn write_log(path: &Path, log: &str, output_limit: usize) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create generator log dir {}", parent.display()))?;
    }

    if log.len() > output_limit {
        let cut = floor_char_boundary(log, output_limit);
        let truncated = format!("{}\n[truncated {} bytes]\n", &log[..cut], log.len() - cut);
        return fs::write(path, truncated)
            .with_context(|| format!("write generator log {}", path.display()));
    }

    fs::write(path, log).with_context(|| format!("write generator log {}", path.display()))
}

fn floor_char_boundary(s: &str, mut index: usize) -> usize {
    while !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeGenerator {
        image: Option<&'static [u8]>,
    }

    impl Generator for FakeGenerator {
        fn generate(&self, request: &GenerateRequest) -> Result<()> {
            if let Some(bytes) = self.image {
                fs::write(&request.output_path, bytes)?;
            }
            Ok(())
        }
    }

    fn request(root: &Path) -> GenerateRequest {
        let image_path = root.join("photo.jpg");
        fs::write(&image_path, b"jpeg").expect("write photo");
        GenerateRequest {
            prompt: "prompt".to_string(),
            image_path,
            output_path: root.join("out.png"),
            log_path: root.join("generator.log"),
            timeout: Duration::from_secs(1),
            output_limit_bytes: 1000,
        }
    }

    #[test]
    fn generate_image_returns_output_path() {
        let temp = tempfile::tempdir().expect("tempdir");
        let request = request(temp.path());
        let fake = FakeGenerator {
            image: Some(b"png".as_slice()),
        };
        let path = generate_image(&fake, &request).expect("generate");
        assert_eq!(path, temp.path().join("out.png"));
    }

    #[test]
    fn generate_image_errors_on_missing_output() {
        let temp = tempfile::tempdir().expect("tempdir");
        let request = request(temp.path());
        let err = generate_image(&FakeGenerator { image: None }, &request).unwrap_err();
        assert!(err.to_string().contains("missing generator output"));
    }

    #[test]
    fn generate_image_errors_on_missing_photo() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut request = request(temp.path());
        request.image_path = temp.path().join("nope.jpg");
        let fake = FakeGenerator {
            image: Some(b"png".as_slice()),
        };
        let err = generate_image(&fake, &request).unwrap_err();
        assert!(err.to_string().contains("missing input image"));
    }

    #[test]
    fn generate_image_rejects_log_at_output_path() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut request = request(temp.path());
        request.log_path = request.output_path.clone();
        let fake = FakeGenerator {
            image: Some(b"png".as_slice()),
        };
        let err = generate_image(&fake, &request).unwrap_err();
        assert!(err.to_string().contains("would overwrite output"));
        assert!(!request.output_path.exists());
    }

    #[test]
    fn unconfigured_command_is_rejected() {
        let err = CommandGenerator::from_config(&GeneratorConfig::default()).unwrap_err();
        assert!(err.to_string().contains("generator.command is not configured"));
    }

    #[cfg(unix)]
    #[test]
    fn command_generator_passes_prompt_and_paths() {
        let temp = tempfile::tempdir().expect("tempdir");
        let request = request(temp.path());
        // `sh -c SCRIPT gen <image> <output>`: copy stdin (the prompt) to the output path.
        let cfg = GeneratorConfig {
            command: vec![
                "sh".to_string(),
                "-c".to_string(),
                "test -f \"$1\" && cat > \"$2\"".to_string(),
                "gen".to_string(),
            ],
            ..GeneratorConfig::default()
        };
        let generator = CommandGenerator::from_config(&cfg).expect("generator");
        generate_image(&generator, &request).expect("generate");
        assert_eq!(
            fs::read_to_string(&request.output_path).expect("read output"),
            "prompt"
        );
        assert!(request.log_path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn command_generator_reports_failure_status() {
        let temp = tempfile::tempdir().expect("tempdir");
        let request = request(temp.path());
        let cfg = GeneratorConfig {
            command: vec!["sh".to_string(), "-c".to_string(), "exit 3".to_string()],
            ..GeneratorConfig::default()
        };
        let generator = CommandGenerator::from_config(&cfg).expect("generator");
        let err = generate_image(&generator, &request).unwrap_err();
        assert!(err.to_string().contains("generator failed with status Some(3)"));
    }
}

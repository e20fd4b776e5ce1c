//! Prompt Laboratory CLI for reviewing style prompts.
//!
//! Renders every style against fixed stats fixtures, optionally generates
//! images from a test photo, and repeats one style to check consistency.

mod cache;
mod render;
mod runner;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use runcard::compose::Session;
use runcard::core::clock::SystemClock;
use runcard::io::config::DEFAULT_CONFIG_FILE;
use runcard::io::generator::{CommandGenerator, Generator};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::runner::{Comparison, RunOptions, compare_style, discover_inputs, run_styles};

#[derive(Parser)]
#[command(name = "prompt-lab")]
#[command(about = "Prompt Laboratory - render style prompts against fixed running stats")]
struct Cli {
    /// Runcard config (generator command, registry path).
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render style × input combinations
    Run {
        /// Comma-separated style ids (default: all)
        #[arg(long, value_delimiter = ',')]
        styles: Option<Vec<String>>,

        /// Test photo; also runs the configured generator when given
        #[arg(long)]
        image: Option<PathBuf>,

        /// Force re-run even if cached
        #[arg(long)]
        force: bool,
    },

    /// Generate one style several times with the same prompt
    Compare {
        /// Style id
        style: String,

        /// Test photo
        #[arg(long)]
        image: PathBuf,

        /// Input fixture id (default: first fixture)
        #[arg(long)]
        input: Option<String>,

        /// Number of generations
        #[arg(short = 'n', long, default_value = "3")]
        count: usize,
    },

    /// List available styles and inputs
    List,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let lab_root = find_lab_root()?;
    let session = Session::load(&cli.config)?;

    match cli.command {
        Commands::Run {
            styles,
            image,
            force,
        } => {
            info!(force = force, generate = image.is_some(), "running combinations");
            let generator = match &image {
                Some(_) => Some(CommandGenerator::from_config(&session.config.generator)?),
                None => None,
            };
            let options = RunOptions {
                styles,
                image,
                force,
            };
            let summary = run_styles(
                &lab_root,
                &session,
                generator.as_ref().map(|g| g as &dyn Generator),
                &options,
                SystemClock,
            )?;
            println!(
                "ran {} (cached {}, errors {}), results in {}",
                summary.ran,
                summary.cached,
                summary.errors,
                lab_root.join("results").display()
            );
            if !summary.skipped_styles.is_empty() {
                println!("skipped unknown styles: {}", summary.skipped_styles.join(", "));
            }
        }
        Commands::Compare {
            style,
            image,
            input,
            count,
        } => {
            let inputs = discover_inputs(&lab_root)?;
            let fixture = match input.as_deref() {
                Some(id) => inputs.iter().find(|i| i.id == id),
                None => inputs.first(),
            }
            .with_context(|| format!("no matching input in {}", lab_root.join("inputs").display()))?;
            let generator = CommandGenerator::from_config(&session.config.generator)?;
            let comparison = Comparison {
                style_id: &style,
                input: fixture,
                image: &image,
                count,
            };
            let outcomes =
                compare_style(&lab_root, &session, &generator, &comparison, SystemClock)?;
            for (n, outcome) in outcomes.iter().enumerate() {
                match outcome {
                    Ok(path) => println!("[{}/{}] {}", n + 1, count, path.display()),
                    Err(err) => println!("[{}/{}] failed: {}", n + 1, count, err),
                }
            }
        }
        Commands::List => list_resources(&lab_root, &session)?,
    }

    Ok(())
}

/// Find the prompt_lab root directory (where inputs/ lives).
fn find_lab_root() -> Result<PathBuf> {
    // First check compile-time manifest directory (most reliable)
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    if manifest_dir.join("inputs").exists() {
        return Ok(manifest_dir);
    }

    // Check cwd and relative paths
    let cwd = std::env::current_dir().ok();
    let candidates = [
        cwd.clone(),
        cwd.as_ref().map(|p| p.join("runcard/prompt_lab")),
        cwd.as_ref().map(|p| p.join("prompt_lab")),
    ];

    for candidate in candidates.into_iter().flatten() {
        if candidate.join("inputs").exists() {
            return Ok(candidate);
        }
    }

    // Default to manifest dir even if inputs don't exist yet
    Ok(manifest_dir)
}

/// List available styles and inputs.
fn list_resources(lab_root: &Path, session: &Session) -> Result<()> {
    println!("Styles:");
    for style in session.registry.iter() {
        println!("  - {} ({})", style.id, style.name_en);
    }

    let inputs_dir = lab_root.join("inputs");
    println!("\nInputs ({}):", inputs_dir.display());
    let inputs = discover_inputs(lab_root)?;
    if inputs.is_empty() {
        println!("  (none)");
    }
    for input in inputs {
        println!(
            "  - {}: {} (distance {:?}, time {:?})",
            input.id, input.name, input.distance, input.time
        );
    }

    println!("\nUse `prompt-lab run --styles <a,b>` to render a subset.");
    Ok(())
}

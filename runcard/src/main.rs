//! Running-stats image prompt CLI.
//!
//! Normalizes distance/time keystrokes, derives pace, and composes the styled
//! prompt sent with a photo to an image-generation command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use runcard::compose::Session;
use runcard::core::clock::SystemClock;
use runcard::core::error::ComposeError;
use runcard::core::pace::calc_pace;
use runcard::core::stats::RunStats;
use runcard::exit_codes;
use runcard::generate::generate_styled_image;
use runcard::io::config::DEFAULT_CONFIG_FILE;
use runcard::io::generator::CommandGenerator;
use runcard::io::registry::{builtin_registry, load_registry};
use runcard::logging;
use runcard::normalize::normalize;

#[derive(Parser)]
#[command(
    name = "runcard",
    version,
    about = "Turn running stats and a photo into a styled image prompt"
)]
struct Cli {
    /// Config file (missing file means defaults).
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

/// Raw distance and time exactly as typed; normalized before use.
#[derive(clap::Args, Debug, Clone, Default, PartialEq, Eq)]
struct RawStatsArgs {
    /// Distance, e.g. `5.2` (non-numeric characters are dropped).
    #[arg(long, default_value = "")]
    distance: String,
    /// Elapsed time as digits or `MM:SS` / `H:MM:SS`, e.g. `2814`.
    #[arg(long, default_value = "")]
    time: String,
}

/// Stats for a prompt: raw distance and time plus an optional date.
#[derive(clap::Args, Debug, Clone, Default, PartialEq, Eq)]
struct StatsArgs {
    #[command(flatten)]
    raw: RawStatsArgs,
    /// Date text for `{date}`; defaults to the current month and year.
    #[arg(long)]
    date: Option<String>,
}

impl StatsArgs {
    fn to_stats(&self) -> RunStats {
        let mut stats = RunStats::from_raw(&self.raw.distance, &self.raw.time);
        stats.set_date(self.date.clone());
        stats
    }
}

#[derive(Subcommand)]
enum Command {
    /// List registered styles.
    Styles,
    /// Print canonical distance, time and pace for raw input.
    Normalize {
        #[command(flatten)]
        stats: RawStatsArgs,
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Print the pace for a canonical distance and time.
    Pace { distance: String, time: String },
    /// Print the composed prompt for a style.
    Prompt {
        /// Style id (see `runcard styles`).
        #[arg(short, long)]
        style: String,
        #[command(flatten)]
        stats: StatsArgs,
        /// Append the `[OUTPUT] aspectRatio=..., style=...` trailer.
        #[arg(long)]
        trailer: bool,
    },
    /// Compose the prompt and run the configured generator on a photo.
    Generate {
        /// Style id (see `runcard styles`).
        #[arg(short, long)]
        style: String,
        /// Photo to transform.
        #[arg(long)]
        image: PathBuf,
        /// Where to write the generated image.
        #[arg(short, long)]
        out: PathBuf,
        #[command(flatten)]
        stats: StatsArgs,
    },
    /// Check a registry file against the schema and invariants.
    ValidateRegistry {
        /// Registry TOML; the built-in registry when omitted.
        path: Option<PathBuf>,
    },
}

fn main() {
    logging::init();
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(exit_code_for(&err));
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Styles => cmd_styles(&cli.config),
        Command::Normalize { stats, json } => cmd_normalize(&stats, json),
        Command::Pace { distance, time } => {
            println!("{}", calc_pace(&distance, &time));
            Ok(())
        }
        Command::Prompt {
            style,
            stats,
            trailer,
        } => cmd_prompt(&cli.config, &style, &stats, trailer),
        Command::Generate {
            style,
            image,
            out,
            stats,
        } => cmd_generate(&cli.config, &style, &stats, &image, &out),
        Command::ValidateRegistry { path } => cmd_validate_registry(path.as_deref()),
    }
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<ComposeError>() {
        Some(ComposeError::UnknownStyle { .. }) => exit_codes::UNKNOWN_STYLE,
        None => exit_codes::INVALID,
    }
}

fn cmd_styles(config: &Path) -> Result<()> {
    let session = Session::load(config)?;
    for style in session.registry.iter() {
        println!(
            "{}\t{} ({})\t{} {}",
            style.id,
            style.name_en,
            style.name,
            style.output_format.aspect_ratio,
            style.output_format.style
        );
    }
    Ok(())
}

fn cmd_normalize(stats: &RawStatsArgs, json: bool) -> Result<()> {
    let outcome = normalize(&stats.distance, &stats.time);
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&outcome).context("serialize outcome")?
        );
        return Ok(());
    }
    println!("distance: {}", outcome.distance);
    println!("time: {}", outcome.time);
    println!("pace: {}", outcome.pace);
    if let Some(warning) = &outcome.warning {
        eprintln!("warning: time {}: {}", outcome.time, warning);
    }
    Ok(())
}

fn cmd_prompt(config: &Path, style: &str, stats: &StatsArgs, trailer: bool) -> Result<()> {
    let session = Session::load(config)?;
    let stats = stats.to_stats();
    warn_on_time(&stats);
    let mut options = session.compose_options();
    options.append_output_trailer |= trailer;
    let prompt = session.compose(style, &stats, SystemClock, options)?;
    println!("{}", prompt);
    Ok(())
}

fn cmd_generate(
    config: &Path,
    style: &str,
    stats: &StatsArgs,
    image: &Path,
    out: &Path,
) -> Result<()> {
    let session = Session::load(config)?;
    let stats = stats.to_stats();
    warn_on_time(&stats);
    // Resolve the style first so a bad id reports as such even without a generator.
    session.registry.get(style)?;
    let generator = CommandGenerator::from_config(&session.config.generator)?;
    let outcome =
        generate_styled_image(&session, &generator, style, &stats, image, out, SystemClock)?;
    println!("{}", outcome.image_path.display());
    Ok(())
}

fn cmd_validate_registry(path: Option<&Path>) -> Result<()> {
    let registry = match path {
        Some(path) => load_registry(path)?,
        None => builtin_registry()?,
    };
    println!("ok: {} styles", registry.len());
    Ok(())
}

fn warn_on_time(stats: &RunStats) {
    if let Some(warning) = stats.time_warning() {
        eprintln!("warning: time {}: {}", stats.time(), warning);
    }
}

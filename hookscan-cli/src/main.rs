//! hookscan command-line entry point

mod fetch;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use hookscan_core::{CoreConfig, ExecutionMode, Extractor, SourceModule};
use hookscan_utils::logging::{self, LogLevel};
use hookscan_utils::{write_json_pretty, ExtractConfig};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "hookscan")]
#[command(about = "Extract declarative hooks from a battle simulator's ability table")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every detector over the given modules and write the hook IR as JSON
    Extract {
        /// Ability modules, in override order (later modules win)
        inputs: Vec<PathBuf>,

        /// Output JSON path
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Configuration file path (TOML, JSON or YAML)
        #[arg(short = 'c', long)]
        config: Option<PathBuf>,

        /// Run the per-ability pass on the rayon pool
        #[arg(long)]
        parallel: bool,

        /// Scheduling mode; overrides --parallel and the config file
        #[arg(long, value_enum, conflicts_with = "parallel")]
        mode: Option<ExecutionMode>,

        /// Enable debug logging
        #[arg(short = 'd', long)]
        debug: bool,
    },

    /// Print the hook IR of a single ability
    Inspect {
        /// Ability module to read
        input: PathBuf,

        /// Ability id (the object key, e.g. `ironfist`)
        ability: String,
    },

    /// List registered detectors in execution order
    Detectors,

    /// Download ability modules (and optionally the other data tables) from the
    /// upstream simulator repository.
    ///
    /// Only the TypeScript data tables are mirrored; sprites and other CDN
    /// assets are not.
    Fetch {
        /// Branch, tag or commit to download from
        #[arg(long = "ref", default_value = "master")]
        git_ref: String,

        /// Directory the repository layout is mirrored into
        #[arg(long, default_value = "ps_raw")]
        out: PathBuf,

        /// Also download the gen9 mod override
        #[arg(long)]
        gen9: bool,

        /// Also download the pokedex, moves, items, typechart and conditions tables
        #[arg(long)]
        all: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Extract { inputs, output, config, parallel, mode, debug } => {
            let parallel = parallel || mode == Some(ExecutionMode::Parallel);
            let settings = resolve_extract_config(inputs, output, config.as_deref(), parallel, debug)?;
            init_logging(settings.log_level.as_deref())?;

            let mode = mode.unwrap_or(if settings.parallel {
                ExecutionMode::Parallel
            } else {
                ExecutionMode::Sequential
            });
            run_extract(&settings, mode)
        }
        Commands::Inspect { input, ability } => {
            init_logging(None)?;
            run_inspect(&input, &ability)
        }
        Commands::Detectors => {
            for (index, name) in Extractor::default().registry().names().iter().enumerate() {
                println!("{:>2}. {name}", index + 1);
            }
            Ok(())
        }
        Commands::Fetch { git_ref, out, gen9, all } => {
            init_logging(None)?;
            let report = fetch::fetch_modules(&git_ref, &out, gen9, all).await?;
            for path in &report.fetched {
                println!("  {}", path.display());
            }
            println!("fetched {}/{}", report.fetched.len(), report.attempted);
            if report.fetched.is_empty() {
                bail!("nothing fetched from ref '{git_ref}'");
            }
            Ok(())
        }
    }
}

fn init_logging(level: Option<&str>) -> Result<()> {
    let level = level
        .map(str::parse::<LogLevel>)
        .transpose()
        .context("Invalid log level")?;
    logging::basic_config(level).context("Failed to initialize logging")
}

/// File values first, command-line flags on top
fn resolve_extract_config(
    inputs: Vec<PathBuf>,
    output: Option<PathBuf>,
    config: Option<&Path>,
    parallel: bool,
    debug: bool,
) -> Result<ExtractConfig> {
    let base = match config {
        Some(path) => ExtractConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ExtractConfig::default(),
    };

    let mut overlay = serde_json::Map::new();
    if !inputs.is_empty() {
        overlay.insert("inputs".to_string(), serde_json::to_value(inputs)?);
    }
    if let Some(output) = output {
        overlay.insert("output".to_string(), serde_json::to_value(output)?);
    }
    if parallel {
        overlay.insert("parallel".to_string(), serde_json::Value::Bool(true));
    }
    if debug {
        overlay.insert("log_level".to_string(), serde_json::Value::String("debug".to_string()));
    }

    let settings = base.merged_with(serde_json::Value::Object(overlay))?;
    settings.validate()?;
    Ok(settings)
}

fn run_extract(settings: &ExtractConfig, mode: ExecutionMode) -> Result<()> {
    let extractor = Extractor::new(CoreConfig { mode });
    let output = extractor
        .extract_paths(&settings.inputs)
        .context("Extraction failed")?;

    write_json_pretty(&settings.output, &output)
        .with_context(|| format!("Failed to write {}", settings.output.display()))?;

    println!("wrote {} abilities to {}", output.len(), settings.output.display());
    Ok(())
}

fn run_inspect(input: &Path, ability: &str) -> Result<()> {
    let module = SourceModule::load(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let Some(source) = module.find_ability(ability) else {
        bail!("ability '{ability}' not found in {}", input.display());
    };

    match Extractor::default().extract_ability(&source) {
        Some(ir) => println!("{}", serde_json::to_string_pretty(&ir)?),
        None => println!("{ability}: no hooks detected"),
    }
    Ok(())
}

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use scribe_consolidate::{Language, LanguageProfile, parse_word_kind};
use scribe_data::{discover_jobs, format_records, run_batch};
use scribe_json::{LoadMode, load_records_with_mode, to_json_string, write_json};
use scribe_types::WordKind;

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_OUTPUT_DIR: &str = "formatted";
const DEFAULT_JOBS: usize = 4;

#[derive(Parser)]
#[command(name = "scribe-data")]
#[command(about = "Consolidate queried lexical records into keyboard data")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Format a single queried file.
    Format {
        #[arg(long, required_unless_present = "profile")]
        language: Option<Language>,
        #[arg(long, value_parser = parse_word_kind)]
        kind: WordKind,
        input: PathBuf,
        /// Write here instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
        /// JSON language profile to use instead of a built-in one.
        #[arg(long)]
        profile: Option<PathBuf>,
        #[arg(long)]
        load_mode: Option<LoadMode>,
    },
    /// Format every queried file found under the data directory.
    Update {
        #[arg(long)]
        data_dir: Option<PathBuf>,
        #[arg(long)]
        output_dir: Option<PathBuf>,
        #[arg(long)]
        language: Vec<Language>,
        #[arg(long, default_value_t = DEFAULT_JOBS)]
        jobs: usize,
        #[arg(long)]
        load_mode: Option<LoadMode>,
    },
    /// Print a built-in language profile as JSON.
    Profile {
        #[arg(long)]
        language: Language,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Format {
            language,
            kind,
            input,
            output,
            profile,
            load_mode,
        } => {
            let profile = match (profile, language) {
                (Some(path), _) => load_profile(&path)?,
                (None, Some(language)) => language.profile(),
                (None, None) => bail!("either --language or --profile is required"),
            };
            let load_mode = load_mode.unwrap_or_else(default_load_mode);

            let start = Instant::now();
            let records = load_records_with_mode(&input, load_mode)?;
            let formatted = format_records(&profile, kind, &records)
                .with_context(|| format!("format {}", input.display()))?;
            info!(
                language = %profile.name,
                %kind,
                records = records.len(),
                entries = formatted.len(),
                "formatted in {} ms",
                start.elapsed().as_millis()
            );

            match output {
                Some(path) => write_json(&path, &formatted)?,
                None => print!("{}", to_json_string(&formatted)?),
            }
        }
        Commands::Update {
            data_dir,
            output_dir,
            language,
            jobs,
            load_mode,
        } => {
            let data_dir =
                data_dir.unwrap_or_else(|| env_path("SCRIBE_DATA_DIR", DEFAULT_DATA_DIR));
            let output_dir =
                output_dir.unwrap_or_else(|| env_path("SCRIBE_OUTPUT_DIR", DEFAULT_OUTPUT_DIR));
            let load_mode = load_mode.unwrap_or_else(default_load_mode);
            info!("reading queried data from {}", data_dir.display());
            info!("writing formatted data to {}", output_dir.display());

            let found = discover_jobs(&data_dir, &output_dir, &language, load_mode);
            if found.is_empty() {
                bail!("no queried data found under {}", data_dir.display());
            }
            let report = run_batch(found, jobs).await;
            for done in &report.completed {
                println!(
                    "{} {}: {} records -> {} entries ({})",
                    done.language,
                    done.kind,
                    done.records,
                    done.entries,
                    done.output.display()
                );
            }
            if !report.is_success() {
                for failure in &report.failed {
                    eprintln!("{}: {:#}", failure.label, failure.error);
                }
                let total = report.failed.len() + report.completed.len();
                bail!("{} of {} jobs failed", report.failed.len(), total);
            }
        }
        Commands::Profile { language } => {
            print!("{}", to_json_string(&language.profile())?);
        }
    }

    Ok(())
}

fn load_profile(path: &Path) -> Result<LanguageProfile> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    LanguageProfile::from_json(&raw).with_context(|| format!("load profile {}", path.display()))
}

fn env_path(var: &str, default: &str) -> PathBuf {
    env::var(var)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(default))
}

fn default_load_mode() -> LoadMode {
    env::var("SCRIBE_LOAD_MODE")
        .ok()
        .and_then(|m| m.parse().ok())
        .unwrap_or_default()
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .init();
}

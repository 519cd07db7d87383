//! Healthlog CLI — analyze a folder of daily notes.
//!
//! Usage:
//!   healthlog analyze <dir> [--llm] [--basis max|entries] [--no-cache]
//!   healthlog parse <file>
//!   healthlog cache clear

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use healthlog::{
    build_extractor, extract_section, parse_section, Association, BatchOrchestrator,
    CancellationToken, DirectorySource, ExtractionCache, FileCacheStore, ParsedEntry,
    PercentageBasis, Settings, Strategy,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "healthlog",
    version,
    about = "Extract health events from daily notes and rank trigger-symptom associations"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// More log output on stderr (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// Path to a YAML settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze every daily note under a directory
    Analyze {
        /// Directory holding the daily notes
        dir: PathBuf,
        /// Heading of the health-log section
        #[arg(long)]
        heading: Option<String>,
        /// Use the extraction service instead of the heuristic parser
        #[arg(long)]
        llm: bool,
        /// Model name for the extraction service
        #[arg(long)]
        model: Option<String>,
        /// Base URL of the extraction service
        #[arg(long)]
        endpoint: Option<String>,
        /// Percentage denominator
        #[arg(long, value_enum)]
        basis: Option<Basis>,
        /// Neither read nor write the extraction cache
        #[arg(long)]
        no_cache: bool,
    },
    /// Print the heuristic parse of one note
    Parse {
        file: PathBuf,
        #[arg(long)]
        heading: Option<String>,
    },
    /// Manage the extraction cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Delete the persisted cache
    Clear,
}

#[derive(Clone, Copy, ValueEnum)]
enum Basis {
    /// The trigger's most frequent symptom is 100%
    Max,
    /// Share of the days the trigger appears on
    Entries,
}

impl From<Basis> for PercentageBasis {
    fn from(basis: Basis) -> Self {
        match basis {
            Basis::Max => PercentageBasis::MaxCoOccurrence,
            Basis::Entries => PercentageBasis::TriggerEntries,
        }
    }
}

#[derive(Serialize)]
struct Report<'a> {
    entries: &'a [ParsedEntry],
    associations: &'a [Association],
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_settings(config: Option<&Path>) -> Result<Settings, String> {
    Settings::load(config).map_err(|e| format!("Failed to load settings: {}", e))
}

fn print_json<T: Serialize>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

struct AnalyzeArgs {
    dir: PathBuf,
    heading: Option<String>,
    llm: bool,
    model: Option<String>,
    endpoint: Option<String>,
    basis: Option<Basis>,
    no_cache: bool,
}

async fn cmd_analyze(mut settings: Settings, args: AnalyzeArgs) -> i32 {
    if let Some(heading) = args.heading {
        settings.heading = heading;
    }
    if args.llm {
        settings.strategy = Strategy::Llm;
    }
    if let Some(model) = args.model {
        settings.llm.model = model;
    }
    if let Some(endpoint) = args.endpoint {
        settings.llm.endpoint = endpoint;
    }
    if let Some(basis) = args.basis {
        settings.percentage_basis = basis.into();
    }

    let extractor = match build_extractor(&settings) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let date_pattern = match settings.date_regex() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let source = DirectorySource::new(&args.dir, date_pattern);

    let mut orchestrator = BatchOrchestrator::new(extractor, settings.heading.clone())
        .with_basis(settings.percentage_basis);
    if !args.no_cache {
        if let Some(dir) = settings.cache_dir() {
            let store = Arc::new(FileCacheStore::new(dir));
            orchestrator = orchestrator.with_cache(ExtractionCache::load(store));
        }
    }

    let token = CancellationToken::new();
    let interrupt = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, stopping after the current note");
            interrupt.cancel();
        }
    });

    match orchestrator.run(&source, &token).await {
        Ok(outcome) => {
            if outcome.cancelled {
                eprintln!(
                    "Cancelled after {} notes; results are partial",
                    outcome.stats.documents
                );
            }
            for failure in &outcome.failures {
                eprintln!("Warning: {}: {}", failure.document_id, failure.message);
            }
            print_json(&Report {
                entries: &outcome.entries,
                associations: &outcome.associations,
            })
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_parse(settings: &Settings, file: &Path, heading: Option<&str>) -> i32 {
    let heading = heading.unwrap_or(settings.heading.as_str());
    let text = match std::fs::read_to_string(file) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error: cannot read '{}': {}", file.display(), e);
            return 1;
        }
    };
    let Some(section) = extract_section(&text, heading) else {
        eprintln!("Error: no '{}' section in '{}'", heading, file.display());
        return 1;
    };
    let date = file
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let entry = ParsedEntry::new(file.display().to_string(), date, parse_section(&section));
    print_json(&entry)
}

fn cmd_cache_clear(settings: &Settings) -> i32 {
    let Some(dir) = settings.cache_dir() else {
        eprintln!("Error: no cache directory configured");
        return 1;
    };
    match ExtractionCache::clear(&FileCacheStore::new(&dir)) {
        Ok(()) => {
            println!("Cleared cache in {}", dir.display());
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = match load_settings(cli.config.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let code = match cli.command {
        Commands::Analyze {
            dir,
            heading,
            llm,
            model,
            endpoint,
            basis,
            no_cache,
        } => {
            let args = AnalyzeArgs {
                dir,
                heading,
                llm,
                model,
                endpoint,
                basis,
                no_cache,
            };
            cmd_analyze(settings, args).await
        }
        Commands::Parse { file, heading } => cmd_parse(&settings, &file, heading.as_deref()),
        Commands::Cache {
            action: CacheAction::Clear,
        } => cmd_cache_clear(&settings),
    };
    std::process::exit(code);
}

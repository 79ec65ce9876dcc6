//! CLI sequencer for the sort and generate stages.
//!
//! Usage:
//!   scr-pipe sort <input> <output>
//!   scr-pipe generate <input> <template> <output>
//!   scr-pipe run <input> <template> <output> [--sorted <path>]
//!
//! `run` executes both stages in sequence and skips generation entirely
//! when the sort stage fails. Exit status is 0 on success, 1 on any stage
//! failure.

use cadscript_rs::{
    DEFAULT_REFERENCE_COLUMN, EnvStore, GenerateSummary, PipelineError, SortSummary,
    generate_stage, sort_stage,
};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Sort CAD extract rows by reference code and generate AutoCAD scripts.
#[derive(Parser)]
#[command(name = "scr-pipe")]
struct Cli {
    /// Field delimiter (single character)
    #[arg(short, long, default_value = ";", global = true)]
    delimiter: char,

    /// Column index of the reference field
    #[arg(short, long, default_value_t = DEFAULT_REFERENCE_COLUMN, global = true)]
    column: usize,

    /// Show per-stage progress and the sort preview on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sort a delimited extract file by its reference column
    Sort {
        /// Input extract file (delimiter-separated rows)
        input: PathBuf,
        /// Sorted output file
        output: PathBuf,
    },
    /// Generate a script from an already-sorted extract file
    Generate {
        /// Sorted extract file
        input: PathBuf,
        /// Command template with {CBER_REF}, {CBER_DATE}, {CBER_NR} placeholders
        template: PathBuf,
        /// Output script file (.scr), overwritten each run
        output: PathBuf,
    },
    /// Run both stages: sort, then generate only if the sort succeeded
    Run {
        /// Input extract file
        input: PathBuf,
        /// Command template
        template: PathBuf,
        /// Output script file
        output: PathBuf,
        /// Where to write the sorted intermediate (default: <output dir>/sorted.txt)
        #[arg(long)]
        sorted: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if !cli.delimiter.is_ascii() {
        error!("delimiter must be a single ASCII character");
        process::exit(1);
    }
    let delimiter = cli.delimiter as u8;

    let ok = match &cli.command {
        Commands::Sort { input, output } => run_sort(input, output, cli.column, delimiter),
        Commands::Generate {
            input,
            template,
            output,
        } => run_generate(input, template, output, cli.column, delimiter),
        Commands::Run {
            input,
            template,
            output,
            sorted,
        } => {
            let sorted = sorted.clone().unwrap_or_else(|| {
                output
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_default()
                    .join("sorted.txt")
            });

            // Stage 2 runs only if stage 1 succeeded
            if run_sort(input, &sorted, cli.column, delimiter) {
                run_generate(&sorted, template, output, cli.column, delimiter)
            } else {
                warn!("generation skipped: sort stage failed");
                false
            }
        }
    };

    if !ok {
        process::exit(1);
    }
}

/// Execute the sort stage, reporting the outcome. Returns success.
fn run_sort(input: &Path, output: &Path, column: usize, delimiter: u8) -> bool {
    info!("sorting {} -> {}", input.display(), output.display());
    match sort_stage(input, output, column, delimiter) {
        Ok(SortSummary { rows, preview }) => {
            info!("sorted {rows} rows into {}", output.display());
            for (i, (reference, key)) in preview.iter().enumerate() {
                info!("  {}. {} -> {:?}", i + 1, reference, key);
            }
            true
        }
        Err(e) => {
            report(&e, "sort");
            false
        }
    }
}

/// Execute the generation stage, reporting the outcome. Returns success.
fn run_generate(
    input: &Path,
    template: &Path,
    output: &Path,
    column: usize,
    delimiter: u8,
) -> bool {
    info!(
        "generating {} from {} with template {}",
        output.display(),
        input.display(),
        template.display()
    );
    match generate_stage(input, template, output, &EnvStore, column, delimiter) {
        Ok(GenerateSummary { rows, missing_refs }) => {
            info!("wrote {rows} blocks to {}", output.display());
            if missing_refs > 0 {
                warn!("{missing_refs} rows had no reference field");
            }
            true
        }
        Err(e) => {
            report(&e, "generate");
            false
        }
    }
}

fn report(e: &PipelineError, stage: &str) {
    error!("{stage} stage failed: {e}");
}

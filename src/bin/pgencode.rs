//! pgencode — JSON rows to a COPY text stream
//!
//! Reads one JSON value per line and writes one COPY record per line,
//! ready to pipe into `psql -c "COPY t FROM STDIN"`.
//!
//! # Usage
//!
//! ```bash
//! # stdin to stdout
//! printf '[1, "a", null]\n' | pgencode
//!
//! # files, with a nesting bound
//! pgencode --input rows.ndjson --output rows.copy --max-depth 8
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use pgencode::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pgencode")]
#[command(version)]
#[command(about = "Encode newline-delimited JSON rows as PostgreSQL COPY text", long_about = None)]
#[command(after_help = "EXAMPLES:
    printf '[1, \"a\", null]\\n' | pgencode
    pgencode -i rows.ndjson -o rows.copy
    pgencode -i rows.ndjson --skip-invalid -v")]
struct Cli {
    /// Input file (newline-delimited JSON); stdin when omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file; stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Config file (defaults to ./pgencode.toml, then the user config dir)
    #[arg(short, long, env = "PGENCODE_CONFIG")]
    config: Option<PathBuf>,

    /// Maximum sequence nesting depth (overrides config)
    #[arg(long)]
    max_depth: Option<usize>,

    /// Skip lines that are not valid JSON instead of aborting
    #[arg(long)]
    skip_invalid: bool,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "pgencode=debug" } else { "pgencode=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let (mut config, source) =
        EncoderConfig::discover(cli.config.as_deref(), &EncoderConfig::search_paths())
            .context("loading config")?;
    if let Some(path) = &source {
        tracing::debug!(path = %path.display(), "config loaded");
    }
    if let Some(depth) = cli.max_depth {
        config = EncoderConfig::builder()
            .initial_capacity(config.initial_capacity)
            .max_depth(depth)
            .build()?;
    }

    let encoder = CopyEncoder::from_config(&config, JsonStringify)?;

    let reader: Box<dyn BufRead> = match &cli.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("opening {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };
    let sink: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let mut writer = CopyWriter::new(sink, encoder);
    let summary = copy_ndjson(reader, &mut writer, cli.skip_invalid)?;
    writer.into_inner()?;

    tracing::info!(records = summary.records, skipped = summary.skipped, "done");
    if cli.verbose {
        eprintln!(
            "{} {} record(s) encoded, {} skipped",
            "✓".green(),
            summary.records.to_string().cyan(),
            summary.skipped
        );
    }
    Ok(())
}

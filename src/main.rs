use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::{info, Level};

use nlu_annotator::fixture_writer::{DEFAULT_DEVICES, DEFAULT_FIXTURE_DIR};
use nlu_annotator::{
    process_records, AnnotationDispatcher, FixtureWriter, InterpretationLoader, LoaderConfig,
    WriterConfig,
};

#[derive(Parser, Debug)]
#[command(name = "nlu-annotator")]
#[command(about = "Annotate NLU interpretation exports into tab-delimited fixture rows")]
#[command(version)]
struct Args {
    /// Path to the interpretation export JSON
    #[arg(long)]
    json: PathBuf,

    /// Language to interpret every record as, e.g. ja or es (detected per record otherwise)
    #[arg(long)]
    lang: Option<String>,

    /// Base directory for fixture files
    #[arg(long, default_value = DEFAULT_FIXTURE_DIR)]
    out_dir: PathBuf,

    /// Comma-separated device list written into every row
    #[arg(long, value_delimiter = ',')]
    devices: Option<Vec<String>>,

    /// Abort on first failed record
    #[arg(long)]
    fail_fast: bool,

    /// Suppress console progress bar
    #[arg(long)]
    no_progress: bool,

    /// Stats output file path
    #[arg(long)]
    stats_out: Option<PathBuf>,

    /// Log at debug level
    #[arg(long)]
    verbose: bool,
}

fn progress_bar(len: u64, hidden: bool) -> Result<ProgressBar> {
    if hidden {
        return Ok(ProgressBar::hidden());
    }
    let bar = ProgressBar::new(len);
    bar.set_style(ProgressStyle::with_template(
        "{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} records {msg}",
    )?);
    Ok(bar)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // WHY: structured JSON logging on stderr keeps stdout free for the summary
    tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .json()
        .init();

    info!("Starting nlu-annotator");
    info!(?args, "Parsed CLI arguments");

    if !args.json.is_file() {
        anyhow::bail!("Input JSON does not exist: {}", args.json.display());
    }

    let loader = InterpretationLoader::new(LoaderConfig {
        lang: args.lang.clone(),
        fail_fast: args.fail_fast,
    });
    let records = loader.load(&args.json).await?;

    let writer = FixtureWriter::new(WriterConfig {
        base_dir: args.out_dir.clone(),
        devices: args
            .devices
            .clone()
            .unwrap_or_else(|| DEFAULT_DEVICES.iter().map(|device| device.to_string()).collect()),
    });

    // WHY: the CLI language travels with each record, so the shared sticky override stays unset
    let dispatcher = AnnotationDispatcher::get_instance(None);
    let progress = progress_bar(records.len() as u64, args.no_progress)?;

    let stats = process_records(&records, dispatcher, &writer, args.fail_fast, &progress).await?;

    if let Some(ref stats_path) = args.stats_out {
        stats.save(stats_path).await?;
        info!("Wrote run stats to {}", stats_path.display());
    }

    println!("nlu-annotator v{} - annotation complete", env!("CARGO_PKG_VERSION"));
    println!("  Records loaded: {}", stats.records_loaded);
    println!("  Rows written: {}", stats.rows_written);
    if stats.records_skipped > 0 {
        println!("  Records skipped: {}", stats.records_skipped);
    }
    if stats.rows_failed > 0 {
        println!("  Rows failed: {}", stats.rows_failed);
    }
    println!("  Output directory: {}", args.out_dir.display());

    Ok(())
}

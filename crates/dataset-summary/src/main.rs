//! CLI entry point for the dataset summary report.

use anyhow::Result;
use clap::Parser;
use dataset_summary::config::install_root;
use dataset_summary::{ReportConfig, ReportRunner, ReportRunnerBuilder};
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Summarize cleaned CSV datasets into a multi-page PDF",
    long_about = "Writes one PDF page per dataset: existence, estimated row count, \
                  column names and a preview of the first rows.\n\n\
                  With no arguments, summarizes the four cleaned pollution datasets in \
                  <root>/outputs and writes <root>/outputs/cleaned_datasets_summary.pdf, \
                  where <root> is the parent of the directory holding this executable \
                  (for a cargo build, the directory holding target/).\n\n\
                  EXAMPLES:\n  \
                  # Default datasets\n  \
                  dataset-summary\n\n  \
                  # Datasets under another project root\n  \
                  dataset-summary --root /srv/pollution\n\n  \
                  # Custom dataset list, JSON summary alongside the PDF\n  \
                  dataset-summary --config datasets.json --emit-summary"
)]
struct Args {
    /// Project root holding the `outputs/` directory [default: parent of the
    /// executable's directory, or the directory holding `target/` for cargo builds]
    #[arg(long)]
    root: Option<PathBuf>,

    /// JSON configuration file (datasets, output location, limits)
    #[arg(short, long, conflicts_with = "root")]
    config: Option<PathBuf>,

    /// Write the PDF to this path instead of the configured one
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print page contents instead of writing a PDF
    #[arg(long)]
    dry_run: bool,

    /// Also write <name>_summary.json next to the PDF
    #[arg(long)]
    emit_summary: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber. Logs go to stderr so stdout only
/// carries the result line.
fn init_logging(level: &str, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level, args.quiet);

    match run(&args) {
        Ok(()) => Ok(()),
        Err(e) => {
            eprintln!("Failed: {e}");
            Err(e)
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let config = load_config(args)?;
    debug!("Configuration: {:?}", config);

    let runner = runner_builder(args).config(config).build()?;

    if args.dry_run {
        return run_dry_run(&runner);
    }

    let summary = runner.run()?;
    let written = summary
        .output_file
        .unwrap_or_else(|| runner.config().output_path().display().to_string());
    println!("Wrote PDF: {written}");
    Ok(())
}

fn load_config(args: &Args) -> Result<ReportConfig> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            ReportConfig::from_json_file(path)?
        }
        None => {
            let root = args.root.clone().unwrap_or_else(install_root);
            debug!("Project root: {}", root.display());
            ReportConfig::for_root(root)
        }
    };

    if let Some(output) = &args.output {
        if let Some(dir) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            config.output_dir = dir.to_path_buf();
        }
        if let Some(name) = output.file_name() {
            config.output_name = name.to_string_lossy().into_owned();
        }
    }
    if args.emit_summary {
        config.emit_summary = true;
    }

    Ok(config)
}

fn runner_builder(args: &Args) -> ReportRunnerBuilder {
    let builder = ReportRunner::builder();
    if args.quiet {
        return builder;
    }
    builder.on_progress(|update| {
        info!(
            "[{:.0}%] {}: {}",
            update.progress() * 100.0,
            update.stage.display_name(),
            update.message
        );
    })
}

/// Print every page's text. Uses `println!` on purpose: the page text is
/// the output of a dry run.
fn run_dry_run(runner: &ReportRunner) -> Result<()> {
    let (pages, _) = runner.dry_run()?;

    for (index, page) in pages.iter().enumerate() {
        println!("{}", "=".repeat(80));
        println!("PAGE {} of {}", index + 1, pages.len());
        println!("{}", "-".repeat(80));
        println!("{}", page.plain_text());
    }
    println!("{}", "=".repeat(80));
    println!(
        "Dry run: nothing written. PDF would be {}",
        runner.config().output_path().display()
    );
    Ok(())
}

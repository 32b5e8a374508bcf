//! Device Recon CLI
//!
//! Command-line tool for reconciling device inventories exported from
//! identity, ticketing, endpoint-protection and recovery-tracking systems.

use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use recon_core::{
    build_report, detect, load_datasets, output_file_name, parse_csv, scan_directory,
    OutputFormat, ReconConfig, Report, SourceKind,
};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "device-recon")]
#[command(about = "Reconcile device inventories across asset-tracking exports", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to ./device-recon.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge all exports in a folder into one report for a base source
    Reconcile {
        /// Folder containing the CSV exports
        #[arg(short, long)]
        dir: PathBuf,

        /// Source whose devices drive the report (identity, ticketing,
        /// endpoint_protection, recovery_tracking)
        #[arg(short, long)]
        base: Option<SourceKind>,

        /// Output file path (defaults to a timestamped name in the output folder)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
    },

    /// Show which export file was detected for each source
    Detect {
        /// Folder containing the CSV exports
        #[arg(short, long)]
        dir: PathBuf,
    },

    /// List the known sources and their columns
    Sources,

    /// Parse and display a single CSV file
    Parse {
        /// Path to CSV file
        #[arg(short, long)]
        file: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Csv,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => OutputFormat::Csv,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match verbose {
        0 if quiet => "error",
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> recon_core::Result<()> {
    let config = ReconConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Reconcile {
            dir,
            base,
            output,
            format,
        } => cmd_reconcile(&config, &dir, base, output, format.map(Into::into)),
        Commands::Detect { dir } => cmd_detect(&config, &dir),
        Commands::Sources => cmd_sources(),
        Commands::Parse { file } => cmd_parse(&file),
    }
}

fn cmd_reconcile(
    config: &ReconConfig,
    dir: &Path,
    base: Option<SourceKind>,
    output: Option<PathBuf>,
    format: Option<OutputFormat>,
) -> recon_core::Result<()> {
    let base = config.resolve_base(base)?;
    let format = format.unwrap_or(config.format);

    let scan = scan_directory(dir, &config.limits)?;
    let datasets = load_datasets(&scan)?;
    let assignment = detect(&datasets);
    let report = build_report(base, &assignment)?;

    print_summary(&report);

    if report.is_empty() {
        warn!(base = %base, "base source has no records, nothing to export");
        println!("Nothing to export.");
        return Ok(());
    }

    let path = output.unwrap_or_else(|| {
        let folder = config.output_dir.as_deref().unwrap_or(dir);
        folder.join(output_file_name(base, format, &Local::now()))
    });

    report.write_to_path(&path, format)?;
    info!(file = %path.display(), rows = report.len(), "report written");
    println!("Exported {} rows to {}", report.len(), path.display());

    Ok(())
}

fn print_summary(report: &Report) {
    let summary = report.summary();

    println!("Base source: {}", summary.base);
    println!("Devices: {}", summary.total);
    println!("Missing from at least one source: {}", summary.incomplete);
    println!();

    for kind in SourceKind::ALL {
        if kind == summary.base {
            continue;
        }
        let source = summary.source(kind);
        if source.provided {
            println!(
                "  {:<20} {} matched, {} not found",
                kind.label(),
                source.matched,
                source.not_found
            );
        } else {
            println!("  {:<20} not provided", kind.label());
        }
    }
    println!();
}

fn cmd_detect(config: &ReconConfig, dir: &Path) -> recon_core::Result<()> {
    let scan = scan_directory(dir, &config.limits)?;
    let datasets = load_datasets(&scan)?;
    let assignment = detect(&datasets);

    println!("Scanned {} file(s) in {}", scan.file_count(), scan.root.display());
    for skipped in &scan.skipped_reports {
        println!("  skipped report {}", skipped.display());
    }
    println!();

    for kind in SourceKind::ALL {
        match assignment.get(kind) {
            Some(dataset) => println!(
                "  {:<20} {} ({} records)",
                kind.label(),
                dataset.display_name(),
                dataset.record_count()
            ),
            None => println!("  {:<20} not found", kind.label()),
        }
    }

    let missing = assignment.missing();
    if !missing.is_empty() {
        let labels: Vec<&str> = missing.iter().map(|k| k.label()).collect();
        println!();
        println!("Missing sources: {}", labels.join(", "));
    }

    Ok(())
}

fn cmd_sources() -> recon_core::Result<()> {
    for kind in SourceKind::ALL {
        println!("{} [{}]", kind.label(), kind.slug());
        println!("  fingerprint column: {}", kind.fingerprint_column());
        println!("  name column:        {}", kind.name_column());
        println!("  fields:");
        for (native, canonical) in kind.field_map() {
            println!("    {:<32} -> {}", native, canonical);
        }
        println!();
    }

    Ok(())
}

fn cmd_parse(file: &Path) -> recon_core::Result<()> {
    let dataset = parse_csv(file)?;

    println!("File: {}", file.display());
    println!("Columns: {}", dataset.columns.len());
    println!("Records: {}", dataset.record_count());
    println!();

    println!("{}", dataset.columns.join("\t"));
    println!("{}", "-".repeat(dataset.columns.len() * 12));

    // Print first 10 records
    for record in dataset.records.iter().take(10) {
        let values: Vec<&str> = dataset.columns.iter().map(|c| record.value(c)).collect();
        println!("{}", values.join("\t"));
    }

    if dataset.record_count() > 10 {
        println!("... ({} more records)", dataset.record_count() - 10);
    }

    Ok(())
}

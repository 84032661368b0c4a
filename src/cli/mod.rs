//! # CLI Module
//!
//! Command-line interface for the media sorter.
//!
//! ## Usage
//! ```bash
//! # Copy photos and videos into /out/2024/06/15/...
//! media-sorter organize ~/Camera --dest /out
//!
//! # Year/month folders with Spanish month names, nothing written
//! media-sorter organize ~/Camera ~/Phone --dest /out --sort year-month --month-names --language spanish --dry-run
//!
//! # What would be picked up
//! media-sorter scan ~/Camera
//!
//! # How the folders will look
//! media-sorter preview --sort year-month-day --month-names
//!
//! # Count what ended up where
//! media-sorter verify /out
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use media_sorter::core::metadata::{DateResolver, DateSource, ExifTool, ToolCapabilities};
use media_sorter::core::organize::{
    verify_destination, BatchOrganizer, MonthLanguage, NamingMode, OrganizationRunner,
    OrganizeConfig, OrganizeReport, PathPlanner, SortGranularity, VerifyReport,
};
use media_sorter::core::scanner::{MediaScanner, ScanConfig, ScanResult, WalkDirScanner};
use media_sorter::events::{BatchEvent, Event, EventChannel, OrganizeEvent};
use media_sorter::{init_tracing, MediaSorterError, Result};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

/// Errors shown in the pretty report before the rest are summarized
const MAX_ERRORS_SHOWN: usize = 20;

/// Media Sorter - Copy photos and videos into dated folders
#[derive(Parser, Debug)]
#[command(name = "media-sorter")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Copy media files into a dated folder tree
    Organize {
        /// Source folders
        #[arg(required = true)]
        sources: Vec<PathBuf>,

        /// Destination root
        #[arg(short, long)]
        dest: PathBuf,

        /// Folder depth: year, year-month or year-month-day (also 0, 1, 2)
        #[arg(short, long, default_value = "year-month-day")]
        sort: SortGranularity,

        /// Use month names instead of numbers
        #[arg(short, long)]
        month_names: bool,

        /// Month name language (english, spanish, french, german, italian, portuguese)
        #[arg(short, long, default_value = "english")]
        language: String,

        /// Show what would happen without copying anything
        #[arg(long)]
        dry_run: bool,

        #[command(flatten)]
        scan: ScanArgs,

        /// Date source to try first
        #[arg(long)]
        prefer: Option<Source>,

        /// Seconds to wait for exiftool per file
        #[arg(long, default_value = "5")]
        exiftool_timeout: u64,

        /// Never run exiftool
        #[arg(long)]
        no_exiftool: bool,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// List the media files that would be organized
    Scan {
        /// Folders to scan
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        #[command(flatten)]
        scan: ScanArgs,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show the folder layout for a few sample dates
    Preview {
        /// Folder depth: year, year-month or year-month-day (also 0, 1, 2)
        #[arg(short, long, default_value = "year-month-day")]
        sort: SortGranularity,

        /// Use month names instead of numbers
        #[arg(short, long)]
        month_names: bool,

        /// Month name language
        #[arg(short, long, default_value = "english")]
        language: String,
    },

    /// Count the files in an organized destination
    Verify {
        /// Destination root
        path: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,
    },
}

#[derive(clap::Args, Debug)]
struct ScanArgs {
    /// Only these extensions (comma separated, e.g. jpg,mp4)
    #[arg(short, long, value_delimiter = ',')]
    extensions: Vec<String>,

    /// Skip hidden files and folders
    #[arg(long)]
    skip_hidden: bool,

    /// Follow symbolic links
    #[arg(long)]
    follow_symlinks: bool,
}

impl From<ScanArgs> for ScanConfig {
    fn from(args: ScanArgs) -> Self {
        ScanConfig {
            extensions: (!args.extensions.is_empty()).then_some(args.extensions),
            include_hidden: !args.skip_hidden,
            follow_symlinks: args.follow_symlinks,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Source {
    /// Embedded EXIF tags
    Exif,
    /// MP4/MOV header dates
    Container,
    /// The exiftool program
    Exiftool,
    /// File creation/modification time
    Filesystem,
}

impl From<Source> for DateSource {
    fn from(s: Source) -> Self {
        match s {
            Source::Exif => DateSource::Exif,
            Source::Container => DateSource::Container,
            Source::Exiftool => DateSource::ExternalTool,
            Source::Filesystem => DateSource::Filesystem,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
    /// Minimal output (paths only)
    Minimal,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Organize {
            sources,
            dest,
            sort,
            month_names,
            language,
            dry_run,
            scan,
            prefer,
            exiftool_timeout,
            no_exiftool,
            output,
            verbose,
        } => {
            init_tracing(if verbose { "debug" } else { "warn" });
            let config = OrganizeConfig {
                destination: dest,
                granularity: sort,
                naming: NamingMode::from(month_names),
                language: MonthLanguage::from_code(&language),
                dry_run,
            };
            let tools = if no_exiftool {
                ToolCapabilities::none()
            } else {
                ToolCapabilities::probe_with(
                    ExifTool::new("exiftool").with_timeout(Duration::from_secs(exiftool_timeout)),
                )
            };
            let sources_order = DateSource::order_preferring(prefer.map(DateSource::from));
            let resolver = DateResolver::with_sources(&sources_order, &tools);
            run_organize(sources, config, scan.into(), resolver, output, verbose)
        }
        Commands::Scan {
            paths,
            scan,
            output,
            verbose,
        } => {
            init_tracing(if verbose { "debug" } else { "warn" });
            run_scan(paths, scan.into(), output)
        }
        Commands::Preview {
            sort,
            month_names,
            language,
        } => {
            run_preview(
                sort,
                NamingMode::from(month_names),
                MonthLanguage::from_code(&language),
            );
            Ok(())
        }
        Commands::Verify { path, output } => {
            init_tracing("warn");
            run_verify(&path, output)
        }
    }
}

fn print_header(term: &Term) {
    term.write_line(&format!(
        "{} {}",
        style("Media Sorter").bold().cyan(),
        style(format!("v{}", env!("CARGO_PKG_VERSION"))).dim()
    ))
    .ok();
    term.write_line("").ok();
}

fn run_organize(
    sources: Vec<PathBuf>,
    config: OrganizeConfig,
    scan_config: ScanConfig,
    resolver: DateResolver,
    output: OutputFormat,
    verbose: bool,
) -> Result<()> {
    let term = Term::stderr();

    if matches!(output, OutputFormat::Pretty) {
        print_header(&term);
        term.write_line(&format!(
            "  {} {}",
            style("Date sources:").dim(),
            resolver.strategy_names().join(" → ")
        ))
        .ok();
        if config.dry_run {
            term.write_line(&format!(
                "  {}",
                style("Dry run: nothing will be copied").yellow()
            ))
            .ok();
        }
        term.write_line("").ok();
    }

    let runner = OrganizationRunner::new(config, resolver);
    let organizer = BatchOrganizer::new(scan_config, runner);

    let (sender, receiver) = EventChannel::new();

    // Progress bar for pretty output
    let progress = if matches!(output, OutputFormat::Pretty) {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .map_err(|e| MediaSorterError::Config(e.to_string()))?
                .progress_chars("█▓░"),
        );
        Some(pb)
    } else {
        None
    };

    let progress_clone = progress.clone();

    // Handle events in a separate thread
    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            let Some(ref pb) = progress_clone else {
                continue;
            };
            match event {
                Event::Batch(BatchEvent::FolderStarted {
                    folder_index,
                    total_folders,
                    folder_path,
                }) => {
                    pb.set_message(format!(
                        "[{}/{}] scanning {}",
                        folder_index + 1,
                        total_folders,
                        folder_path.display()
                    ));
                }
                Event::Organize(OrganizeEvent::Started { total_files, .. }) => {
                    pb.set_length(total_files as u64);
                    pb.set_position(0);
                }
                Event::Organize(OrganizeEvent::Progress(p)) => {
                    pb.set_position(p.processed as u64);
                    if verbose {
                        match p.destination {
                            Some(dest) => {
                                pb.set_message(format!("{} → {}", p.current_file, dest.display()))
                            }
                            None => pb.set_message(p.current_file),
                        }
                    }
                }
                Event::Organize(OrganizeEvent::FileError { message, .. }) if verbose => {
                    pb.println(format!("  {} {}", style("!").yellow(), message));
                }
                Event::Batch(BatchEvent::Completed { .. }) => {
                    pb.finish_and_clear();
                }
                _ => {}
            }
        }
    });

    let result = organizer.run_with_events(&sources, &sender);

    // Drop sender to signal event thread to finish
    drop(sender);
    event_thread.join().ok();
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    let report = result?;
    match output {
        OutputFormat::Pretty => print_pretty_report(&term, &report, verbose),
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Minimal => {
            for placement in &report.placements {
                println!("{}", placement.destination.display());
            }
        }
    }

    Ok(())
}

fn print_pretty_report(term: &Term, report: &OrganizeReport, verbose: bool) {
    let title = match (report.cancelled, report.dry_run) {
        (true, _) => "Organize Cancelled",
        (false, true) => "Dry Run Complete",
        (false, false) => "Organize Complete",
    };
    term.write_line(&format!("{} {}", style("✓").green().bold(), title))
        .ok();
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} of {} files {} in {:.1}s",
        style(report.processed).cyan(),
        style(report.total_files).cyan(),
        if report.dry_run { "planned" } else { "copied" },
        report.duration_ms as f64 / 1000.0
    ))
    .ok();
    term.write_line(&format!(
        "  {} skipped",
        if report.skipped > 0 {
            style(report.skipped).yellow()
        } else {
            style(report.skipped).dim()
        }
    ))
    .ok();
    term.write_line(&format!(
        "  {} total",
        style(format_bytes(report.statistics.total_bytes())).yellow()
    ))
    .ok();

    if !report.statistics.is_empty() {
        term.write_line("").ok();
        term.write_line(&format!("{}", style("By Year:").bold().underlined()))
            .ok();
        for (year, stats) in report.statistics.iter() {
            term.write_line(&format!(
                "  {}  {:>6} files  {}",
                style(year).bold(),
                stats.count,
                style(format_bytes(stats.total_bytes)).dim()
            ))
            .ok();
        }
    }

    if verbose {
        let renamed = report.placements.iter().filter(|p| p.renamed).count();
        if renamed > 0 {
            term.write_line(&format!(
                "  {} renamed to avoid overwriting",
                style(renamed).dim()
            ))
            .ok();
        }
    }

    if !report.errors.is_empty() {
        term.write_line("").ok();
        term.write_line(&format!("{}", style("Errors:").bold().red()))
            .ok();
        for error in report.errors.iter().take(MAX_ERRORS_SHOWN) {
            term.write_line(&format!("  {} {}", style("✗").red(), error))
                .ok();
        }
        if report.errors.len() > MAX_ERRORS_SHOWN {
            term.write_line(&format!(
                "  {}",
                style(format!(
                    "… and {} more",
                    report.errors.len() - MAX_ERRORS_SHOWN
                ))
                .dim()
            ))
            .ok();
        }
    }

    if !report.scan_warnings.is_empty() {
        term.write_line("").ok();
        for warning in &report.scan_warnings {
            term.write_line(&format!("  {} {}", style("!").yellow(), warning))
                .ok();
        }
    }

    term.write_line("").ok();
    term.write_line(&format!(
        "{}",
        style("Source files were not modified.").dim()
    ))
    .ok();
}

fn run_scan(paths: Vec<PathBuf>, scan_config: ScanConfig, output: OutputFormat) -> Result<()> {
    let term = Term::stderr();
    let scanner = WalkDirScanner::new(scan_config);

    let mut combined = ScanResult::default();
    for path in &paths {
        let result = scanner.scan(path)?;
        combined.files.extend(result.files);
        combined.errors.extend(result.errors);
        for (ext, count) in result.extension_counts {
            *combined.extension_counts.entry(ext).or_insert(0) += count;
        }
    }

    match output {
        OutputFormat::Pretty => {
            print_header(&term);
            term.write_line(&format!(
                "  {} media files found",
                style(combined.files.len()).cyan()
            ))
            .ok();
            let total: u64 = combined.files.iter().map(|f| f.size).sum();
            term.write_line(&format!("  {} total", style(format_bytes(total)).yellow()))
                .ok();
            term.write_line("").ok();
            for (ext, count) in &combined.extension_counts {
                term.write_line(&format!("  {:<8} {:>6}", ext, count)).ok();
            }
            for error in &combined.errors {
                term.write_line(&format!("  {} {}", style("!").yellow(), error))
                    .ok();
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "total_files": combined.files.len(),
                "total_bytes": combined.files.iter().map(|f| f.size).sum::<u64>(),
                "extension_counts": combined.extension_counts,
                "files": combined.files,
                "errors": combined.errors.iter().map(|e| e.to_string()).collect::<Vec<_>>(),
            });
            print_json(&output)?;
        }
        OutputFormat::Minimal => {
            for file in &combined.files {
                println!("{}", file.path.display());
            }
        }
    }

    Ok(())
}

fn run_preview(granularity: SortGranularity, naming: NamingMode, language: MonthLanguage) {
    let term = Term::stdout();
    term.write_line(&format!(
        "{} ({})",
        style("Folder structure").bold(),
        granularity
    ))
    .ok();
    for line in PathPlanner::preview(granularity, naming, language) {
        term.write_line(&format!("  {}", line)).ok();
    }
}

fn run_verify(path: &Path, output: OutputFormat) -> Result<()> {
    let report = verify_destination(path)?;
    match output {
        OutputFormat::Pretty => print_pretty_verify(&Term::stderr(), path, &report),
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Minimal => {
            for (folder, stats) in &report.by_year {
                println!("{}\t{}", folder, stats.count);
            }
        }
    }
    Ok(())
}

fn print_pretty_verify(term: &Term, path: &Path, report: &VerifyReport) {
    print_header(term);
    term.write_line(&format!(
        "  {} files, {} in {}",
        style(report.total_files).cyan(),
        style(format_bytes(report.total_bytes)).yellow(),
        path.display()
    ))
    .ok();
    term.write_line("").ok();
    for (folder, stats) in &report.by_year {
        term.write_line(&format!(
            "  {:<10} {:>6} files  {}",
            style(folder).bold(),
            stats.count,
            style(format_bytes(stats.total_bytes)).dim()
        ))
        .ok();
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| MediaSorterError::Config(e.to_string()))?;
    println!("{}", json);
    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

/*!
 * Command-line interface for repo-flattener
 */

use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::ThreadPoolBuilder;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use repo_flattener::config::{Args, Config};
use repo_flattener::error::Result;
use repo_flattener::pipeline::{collect_paths, flattener_for};
use repo_flattener::report::{ReportFormat, Reporter, RunSummary};
use repo_flattener::selection::{Selection, Step, HELP};
use repo_flattener::stats::calculate_file_statistics;
use repo_flattener::types::RelativePath;

fn main() -> ExitCode {
    // Parse command line arguments
    let args = Args::parse();

    if let Some(shell) = args.generate {
        clap_complete::generate(shell, &mut Args::command(), "repo-flattener", &mut io::stdout());
        return ExitCode::SUCCESS;
    }

    init_logging(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Tip: {}", e.tip());
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr; RUST_LOG overrides the -v level
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn run(args: Args) -> Result<()> {
    // Create and validate configuration
    let config = Config::from_args(args)?;
    config.validate()?;

    // Configure thread pool
    if config.num_threads > 1 {
        if let Err(e) = ThreadPoolBuilder::new()
            .num_threads(config.num_threads)
            .build_global()
        {
            warn!("Failed to set thread pool size: {}", e);
        }
    }

    let start_time = Instant::now();
    let mut paths = collect_paths(&config)?;

    if config.interactive {
        match interactive_selection(&paths)? {
            Some(selected) => paths = selected,
            None => {
                println!("\nCancelled by user.");
                return Ok(());
            }
        }
    }

    let reporter = Reporter::new(ReportFormat::ConsoleTable);

    if config.dry_run {
        let stats = calculate_file_statistics(&config.repo_path, &paths);
        println!("\n{}", reporter.dry_run_report(&config.output_dir, &stats));
        return Ok(());
    }

    let progress = ProgressBar::new(paths.len() as u64);
    match ProgressStyle::default_bar()
        .template("{spinner:.green} {prefix:.bold.cyan} {wide_msg:.dim.white} {pos}/{len} ({percent}%) ⏱️  Elapsed: {elapsed_precise}")
    {
        Ok(style) => progress.set_style(style),
        Err(e) => warn!("Invalid progress template: {}", e),
    }
    progress.enable_steady_tick(std::time::Duration::from_millis(100));
    progress.set_prefix("📊 Flattening");

    let flattener = flattener_for(&config, Arc::new(progress.clone()));
    let report = flattener.flatten(&paths);
    progress.finish_and_clear();
    let report = report?;

    let summary = RunSummary {
        output_dir: config.output_dir.clone(),
        report,
        duration: start_time.elapsed(),
    };
    println!("\n{}", reporter.run_report(&summary));

    Ok(())
}

/// Drive the selection menu from stdin. `None` means the user cancelled.
fn interactive_selection(files: &[RelativePath]) -> Result<Option<Vec<RelativePath>>> {
    if files.is_empty() {
        println!("No files found to process.");
        return Ok(Some(Vec::new()));
    }

    let mut selection = Selection::new(files);
    println!("\nFound {} files in the repository.", files.len());
    println!("\nInteractive File Selection");
    println!("{}", "=".repeat(50));
    println!("\n{}", HELP);
    println!("{}", "=".repeat(50));
    println!("\n{}", selection.render_page());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("\n> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            return Ok(None);
        };
        match selection.apply_line(&line?) {
            Step::Continue(message) => {
                if !message.is_empty() {
                    println!("{}", message);
                }
            }
            Step::Finished(selected) => {
                println!("\nProceeding with {} selected files.", selected.len());
                return Ok(Some(selected));
            }
            Step::Cancelled => return Ok(None),
        }
    }
}

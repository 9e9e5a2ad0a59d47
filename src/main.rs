use anyhow::{Context, Result};
use clap::Parser;
use noshow_analyzer::cli::{Args, OutputFormat, render};
use noshow_analyzer::{Analysis, FlightReport, NoshowAnalyzer};
use std::path::Path;
use std::process;
use tracing::{debug, error, info, warn};

fn main() {
    let args = Args::parse();

    if let Err(e) = setup_logging(&args) {
        eprintln!("Failed to initialise logging: {}", e);
    }

    match run(&args) {
        Ok(true) => process::exit(0),
        Ok(false) => process::exit(1),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Set up structured logging on stderr
fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("noshow_analyzer={}", log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Analyse every file independently; `Ok(false)` when any of them failed
fn run(args: &Args) -> Result<bool> {
    let config = args.load_config().context("Failed to load configuration")?;
    let today = args.reference_date().context("Invalid --today value")?;
    let analyzer = NoshowAnalyzer::new(config).context("Invalid configuration")?;
    info!("Reference date {}", today.format("%d.%m.%Y"));

    let mut all_succeeded = true;
    let mut json_results = Vec::new();

    for path in &args.files {
        match analyzer.analyze_file(path) {
            Ok(analysis) => {
                let reports = select_reports(&analysis, args.flight.as_deref(), today);
                match args.format {
                    OutputFormat::Human => print_human(path, &analysis, &reports),
                    OutputFormat::Json => json_results.push(serde_json::json!({
                        "file": path.display().to_string(),
                        "analysis": analysis,
                        "reports": reports,
                    })),
                }
            }
            Err(e) => {
                all_succeeded = false;
                if e.is_recoverable() {
                    info!("Skipping {}: {}", path.display(), e);
                } else {
                    error!("Failed to analyse {}: {}", path.display(), e);
                }
                match args.format {
                    OutputFormat::Human => render::failure(path, &e.to_string()),
                    OutputFormat::Json => json_results.push(serde_json::json!({
                        "file": path.display().to_string(),
                        "error": e.to_string(),
                        "recoverable": e.is_recoverable(),
                    })),
                }
            }
        }
    }

    if args.format == OutputFormat::Json {
        let output = serde_json::to_string_pretty(&json_results)
            .context("Failed to serialise results")?;
        println!("{}", output);
    }

    Ok(all_succeeded)
}

fn select_reports(
    analysis: &Analysis,
    flight: Option<&str>,
    today: chrono::NaiveDate,
) -> Vec<FlightReport> {
    match flight {
        Some(flight_id) => {
            if !analysis.contains_flight(flight_id) {
                warn!("Flight {} is not in this file", flight_id);
            }
            vec![analysis.flight_report(flight_id, today)]
        }
        None => analysis.all_reports(today),
    }
}

fn print_human(path: &Path, analysis: &Analysis, reports: &[FlightReport]) {
    render::file_summary(path, analysis);
    for report in reports {
        render::flight(report);
    }
    println!();
}

//! Command-line interface components.

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::AnalyzerConfig;
use crate::constants::DEFAULT_DATE_FORMAT;
use crate::error::{NoshowError, Result};

#[derive(Parser, Debug)]
#[command(name = "noshow-analyzer")]
#[command(about = "Per-weekday no-show rates, a 7-day forecast and overbooking advice from flight booking exports")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Booking export files (CSV, `;` or `,` delimited); each is analysed on its own
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Flight to report on (defaults to every flight in the file)
    #[arg(short, long, value_name = "ID")]
    pub flight: Option<String>,

    /// Reference date for the forecast, DD.MM.YYYY (defaults to today)
    #[arg(long, value_name = "DATE")]
    pub today: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,

    /// JSON configuration file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Average bookings assumed for weekdays without history
    #[arg(long, value_name = "N")]
    pub default_bookings: Option<u64>,

    /// Number of days to forecast
    #[arg(long, value_name = "DAYS")]
    pub horizon: Option<u32>,

    /// chrono format of the date column in the export (default %d.%m.%Y)
    #[arg(long, value_name = "FORMAT")]
    pub date_format: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

impl Args {
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Parse `--today`, falling back to the local calendar date
    pub fn reference_date(&self) -> Result<NaiveDate> {
        match &self.today {
            Some(value) => NaiveDate::parse_from_str(value.trim(), DEFAULT_DATE_FORMAT).map_err(
                |_| NoshowError::InvalidDate {
                    value: value.clone(),
                    format: "DD.MM.YYYY".to_string(),
                },
            ),
            None => Ok(chrono::Local::now().date_naive()),
        }
    }

    /// Configuration file (or defaults) with command-line overrides applied.
    /// Validation happens when the analyzer is built.
    pub fn load_config(&self) -> Result<AnalyzerConfig> {
        let mut config = match &self.config {
            Some(path) => AnalyzerConfig::from_file(path)?,
            None => AnalyzerConfig::default(),
        };
        if let Some(bookings) = self.default_bookings {
            config = config.with_default_avg_bookings(bookings);
        }
        if let Some(days) = self.horizon {
            config = config.with_forecast_days(days);
        }
        if let Some(format) = &self.date_format {
            config = config.with_date_format(format.as_str());
        }
        Ok(config)
    }
}

/// Rendering of analysis results for the terminal
pub mod render {
    use colored::*;
    use std::path::Path;

    use crate::parser::ParseStats;
    use crate::processor::{Analysis, FlightReport};

    pub fn file_summary(path: &Path, analysis: &Analysis) {
        println!(
            "{} {}",
            "File:".bright_cyan(),
            path.display().to_string().bright_white().bold()
        );
        println!("  {} {}", "Encoding:".bright_cyan(), analysis.encoding);
        print_stats(&analysis.stats);
        println!(
            "  {} {}",
            "Flights:".bright_cyan(),
            analysis.flights.join(", ")
        );
    }

    fn print_stats(stats: &ParseStats) {
        println!(
            "  {} total {}, processed {}, skipped {} ({:.1}% parsed)",
            "Rows:".bright_cyan(),
            stats.total_rows,
            stats.processed_rows.to_string().bright_green(),
            if stats.skipped_rows > 0 {
                stats.skipped_rows.to_string().bright_yellow()
            } else {
                stats.skipped_rows.to_string().normal()
            },
            stats.success_rate()
        );
        for (reason, count) in &stats.skip_reasons {
            println!("    {} {}: {}", "-".bright_black(), reason, count);
        }
    }

    pub fn flight(report: &FlightReport) {
        println!();
        println!(
            "{} {} {}",
            "Flight".bright_green().bold(),
            report.flight_id.bright_white().bold(),
            report.segment.bright_black()
        );

        if !report.has_data() {
            println!("  {}", "No data for the selected flight".bright_yellow());
            return;
        }

        println!("  {}", "Weekday statistics:".bright_cyan());
        for stat in &report.stats {
            println!(
                "    {:<9} rate={:.3} noshow={} bookings={} flights={}",
                stat.weekday.to_string(),
                stat.rate,
                stat.total_noshows,
                stat.total_bookings,
                stat.record_count
            );
        }

        println!("  {}", "Forecast:".bright_cyan());
        for entry in &report.forecast {
            let marker = if entry.date == report.today {
                " (today)".bright_green().to_string()
            } else {
                String::new()
            };
            println!(
                "    {} {:<9} {:.1} noshow{}",
                entry.date.format("%d.%m.%Y"),
                entry.weekday.to_string(),
                entry.predicted_noshow,
                marker
            );
        }

        if let Some(recommendation) = &report.recommendation {
            println!("  {}", "Recommendation:".bright_cyan());
            println!(
                "    Highest no-show rate on {}: {:.3} ({:.1}%)",
                recommendation.weekday.to_string().bright_white().bold(),
                recommendation.rate,
                recommendation.rate * 100.0
            );
            println!(
                "    Overbook {} by {} seats",
                recommendation.weekday,
                recommendation
                    .recommended_extra_seats
                    .to_string()
                    .bright_green()
                    .bold()
            );
        }
    }

    pub fn failure(path: &Path, message: &str) {
        eprintln!(
            "{} {}: {}",
            "Error".bright_red().bold(),
            path.display(),
            message
        );
    }
}

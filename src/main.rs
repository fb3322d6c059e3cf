use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use grade_band_analytics::config::AppConfig;
use grade_band_analytics::export::ExportFormat;
use grade_band_analytics::locale::Locale;
use grade_band_analytics::ranges::RangeSet;
use grade_band_analytics::report::{self, format_average};
use grade_band_analytics::roster::{RosterQuery, SortOrder};
use grade_band_analytics::session::Session;

#[derive(Parser)]
#[command(name = "grade-band")]
#[command(about = "Categorize student grades into custom bands and report on them", long_about = None)]
struct Cli {
    /// JSON config file (falls back to $GRADE_BAND_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print summary statistics and the band distribution
    Stats {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        ranges: Option<PathBuf>,
    },
    /// List students, optionally filtered by name
    Roster {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        ranges: Option<PathBuf>,
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, value_enum, default_value_t = SortOrder::Desc)]
        order: SortOrder,
    },
    /// Export name, grade and category for every student
    Export {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        ranges: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, value_enum)]
        locale: Option<Locale>,
    },
    /// Generate a markdown summary report
    Report {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        ranges: Option<PathBuf>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Work with grade band files
    Ranges {
        #[command(subcommand)]
        command: RangesCommand,
    },
}

#[derive(Subcommand)]
enum RangesCommand {
    /// Write the standard F-A bands to a file for editing
    Init {
        #[arg(long, default_value = "ranges.json")]
        out: PathBuf,
    },
    /// Report overlaps, gaps and inverted bounds
    Check {
        #[arg(long)]
        ranges: Option<PathBuf>,
    },
}

/// Logs go to stderr so command output on stdout stays clean.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "grade_band_analytics=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn resolve_ranges(config: &AppConfig, ranges: Option<&Path>) -> anyhow::Result<RangeSet> {
    match ranges {
        Some(path) => RangeSet::from_path(path)
            .with_context(|| format!("failed to load grade bands from {}", path.display())),
        None => Ok(config.ranges.clone()),
    }
}

fn load_session(
    config: &AppConfig,
    input: &Path,
    ranges: Option<&Path>,
) -> anyhow::Result<Session> {
    let ranges = resolve_ranges(config, ranges)?;
    let mut session = Session::with_config(config);
    session
        .upload_file(input)
        .with_context(|| format!("error processing {}", input.display()))?;
    session.save_ranges(ranges);
    Ok(session)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = AppConfig::load(cli.config.as_deref()).context("failed to load config")?;

    match cli.command {
        Commands::Stats { input, ranges } => {
            let session = load_session(&config, &input, ranges.as_deref())?;
            let Some(dashboard) = session.dashboard() else {
                println!("No students to summarize in {}.", input.display());
                return Ok(());
            };

            let stats = &dashboard.stats;
            let labels = config.locale.display_labels();
            println!("{}: {}", labels.total_students, stats.total_students);
            println!(
                "{}: {}",
                labels.average_grade,
                format_average(stats.average_grade)
            );
            println!("{}: {}", labels.top_performers, stats.top_performers);
            println!("{}: {}", labels.at_risk, stats.at_risk);
            println!("{}:", labels.distribution);
            for band in &stats.distribution {
                println!(
                    "- {} ({}-{}, {}): {}",
                    band.label, band.min, band.max, band.color, band.count
                );
            }
            if stats.unmatched > 0 {
                println!("- {}: {}", labels.outside_bands, stats.unmatched);
            }
        }
        Commands::Roster {
            input,
            ranges,
            search,
            order,
        } => {
            let session = load_session(&config, &input, ranges.as_deref())?;
            let students = session.view(&RosterQuery::new(search, order));

            if students.is_empty() {
                println!("No matching students.");
                return Ok(());
            }

            for student in students {
                println!(
                    "{}\t{}%\t{}",
                    student.name,
                    student.grade,
                    student.grade_category.as_deref().unwrap_or("")
                );
            }
        }
        Commands::Export {
            input,
            ranges,
            format,
            out,
            locale,
        } => {
            let session = load_session(&config, &input, ranges.as_deref())?;
            let locale = locale.unwrap_or(config.locale);
            let written = session
                .export_to_path(&out, format, locale)
                .with_context(|| format!("failed to export to {}", out.display()))?;
            println!("Exported {written} students to {}.", out.display());
        }
        Commands::Report { input, ranges, out } => {
            let session = load_session(&config, &input, ranges.as_deref())?;
            let Some(dashboard) = session.dashboard() else {
                println!("No students to report on in {}.", input.display());
                return Ok(());
            };

            let today = chrono::Local::now().date_naive();
            let source = input.display().to_string();
            let report = report::build_report(&source, today, &dashboard, config.locale);
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Ranges { command } => match command {
            RangesCommand::Init { out } => {
                RangeSet::standard()
                    .write_to(&out)
                    .with_context(|| format!("failed to write {}", out.display()))?;
                println!("Standard bands written to {}.", out.display());
            }
            RangesCommand::Check { ranges } => {
                let ranges = resolve_ranges(&config, ranges.as_deref())?;
                let issues = ranges.diagnose();

                if issues.is_empty() {
                    println!("{} bands cover 0-100 with no overlaps.", ranges.len());
                    return Ok(());
                }

                for issue in issues {
                    println!("- {issue}");
                }
            }
        },
    }

    Ok(())
}

//! CLI entry point for the air quality analyzer.
//!
//! Each subcommand loads and cleans the dataset, runs one aggregation, and
//! reports the resulting table as log output, JSON, or a CSV file.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use air_quality::analyzers::{
    CoordinateMap, PolicyImpact, attach_coordinates, box_plot, coordinate_grid,
    high_pollution_events, histogram, monthly_average, regional_average, seasonal_average, shorten_label,
    top_categories, top_regions, yearly_average,
};
use air_quality::loader::{DEFAULT_DATE_FORMAT, DEFAULT_SOURCE, LoadOptions, load_dataset};
use air_quality::output::{print_json, print_pretty, write_csv};
use air_quality::record::Dataset;
use air_quality::stats::summary_statistics;
use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fmt::Debug;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "air_quality")]
#[command(about = "Descriptive statistics over an air quality CSV dataset", long_about = None)]
struct Cli {
    /// CSV file to analyze
    #[arg(short, long, global = true, default_value = DEFAULT_SOURCE)]
    source: PathBuf,

    /// chrono format string used to parse Start_Date
    #[arg(long, global = true, default_value = DEFAULT_DATE_FORMAT)]
    date_format: String,

    /// How to report the resulting table
    #[arg(short, long, global = true, value_enum, default_value_t = Format::Pretty)]
    format: Format,

    /// Optional CSV file to write the resulting table to
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Pretty,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Most common pollutant categories
    TopCategories {
        #[arg(short = 'n', long, default_value_t = 10)]
        top_n: usize,

        /// Shorten category names to this many characters
        #[arg(long)]
        label_width: Option<usize>,
    },
    /// Average value per calendar month
    Monthly,
    /// Average value per year
    Yearly,
    /// Average value per season
    Seasonal,
    /// Average value per place, highest first
    Regions {
        /// Only report the first N places
        #[arg(short = 'n', long)]
        top_n: Option<usize>,
    },
    /// Records whose value exceeds a threshold
    Events {
        #[arg(short, long)]
        threshold: f64,
    },
    /// Difference of means between two datasets (after - before)
    Impact {
        #[arg(long)]
        before: PathBuf,

        #[arg(long)]
        after: PathBuf,
    },
    /// Mean, median, standard deviation, min and max of the values
    Summary,
    /// Histogram and box-plot summary of the values
    Distribution {
        #[arg(short, long, default_value_t = 20)]
        bins: usize,
    },
    /// Mean value per coordinate for places found in a coordinate map
    Heatmap {
        /// JSON file mapping place names to {"lat": .., "lon": ..}
        #[arg(short, long)]
        coordinates: PathBuf,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/air_quality.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("air_quality.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let report = Report {
        format: cli.format,
        output: cli.output.clone(),
    };
    let options = LoadOptions {
        source: cli.source.clone(),
        date_format: cli.date_format.clone(),
    };

    match cli.command {
        Commands::TopCategories { top_n, label_width } => {
            let data = load_dataset(&options)?;
            let mut table = top_categories(&data, top_n);
            if let Some(width) = label_width {
                for row in &mut table {
                    row.name = shorten_label(&row.name, width);
                }
            }
            report.table(&table)?;
        }
        Commands::Monthly => {
            let data = load_dataset(&options)?;
            report.table(&monthly_average(&data))?;
        }
        Commands::Yearly => {
            let data = load_dataset(&options)?;
            report.table(&yearly_average(&data))?;
        }
        Commands::Seasonal => {
            let data = load_dataset(&options)?;
            report.table(&seasonal_average(&data))?;
        }
        Commands::Regions { top_n } => {
            let data = load_dataset(&options)?;
            let table = match top_n {
                Some(n) => top_regions(&data, n),
                None => regional_average(&data),
            };
            report.table(&table)?;
        }
        Commands::Events { threshold } => {
            let data = load_dataset(&options)?;
            let events = high_pollution_events(&data, threshold);
            info!(threshold, events = events.len(), total = data.len(), "High pollution events");
            report.table(&events.records)?;
        }
        Commands::Impact { before, after } => {
            impact(&report, &options, before, after)?;
        }
        Commands::Summary => {
            let data = load_dataset(&options)?;
            let stats = summary_statistics(&data)?;
            report.table(std::slice::from_ref(&stats))?;
        }
        Commands::Distribution { bins } => {
            let data = load_dataset(&options)?;
            distribution(&report, &data, bins)?;
        }
        Commands::Heatmap { coordinates } => {
            let data = load_dataset(&options)?;
            let map = CoordinateMap::load(&coordinates)?;
            let located = attach_coordinates(&data, &map);
            info!(
                places = map.len(),
                located = located.len(),
                total = data.len(),
                "Coordinates attached"
            );
            report.table(&coordinate_grid(&located))?;
        }
    }

    Ok(())
}

/// Where and how a derived table is reported.
struct Report {
    format: Format,
    output: Option<PathBuf>,
}

impl Report {
    fn table<T: Serialize + Debug>(&self, rows: &[T]) -> Result<()> {
        match self.format {
            Format::Pretty => print_pretty(rows),
            Format::Json => print_json(rows)?,
        }
        if let Some(path) = &self.output {
            write_csv(path, rows)?;
            info!(path = %path.display(), rows = rows.len(), "Table written");
        }
        Ok(())
    }
}

/// Loads the before/after datasets and reports the change in mean value.
#[tracing::instrument(
    skip(report, options, before, after),
    fields(before = %before.display(), after = %after.display())
)]
fn impact(report: &Report, options: &LoadOptions, before: PathBuf, after: PathBuf) -> Result<()> {
    let before_data = load_dataset(&LoadOptions {
        source: before,
        ..options.clone()
    })?;
    let after_data = load_dataset(&LoadOptions {
        source: after,
        ..options.clone()
    })?;

    let impact = PolicyImpact::compare(&before_data, &after_data)?;
    info!(delta = impact.delta, "Policy impact (after - before)");
    report.table(std::slice::from_ref(&impact))
}

/// Reports the histogram, then logs the box-plot summary alongside it.
#[tracing::instrument(skip(report, data), fields(records = data.len()))]
fn distribution(report: &Report, data: &Dataset, bins: usize) -> Result<()> {
    let table = histogram(data, bins)?;
    report.table(&table)?;

    let summary = box_plot(data)?;
    info!(
        q1 = summary.q1,
        median = summary.median,
        q3 = summary.q3,
        lower_whisker = summary.lower_whisker,
        upper_whisker = summary.upper_whisker,
        outliers = summary.outliers,
        "Box plot"
    );
    Ok(())
}

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};

use wellness_risk_monitor::models::HealthRecord;
use wellness_risk_monitor::{analysis, ingest, plot, report, risk};

#[derive(Parser)]
#[command(name = "wellness-risk-monitor", version)]
#[command(about = "Workplace wellness risk monitor for employee health readings", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a CSV of readings, print the table and write the plot and risk report
    Analyze {
        /// Input CSV, or - for stdin
        #[arg(long)]
        csv: PathBuf,
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
        /// Print annotated rows as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Classify a single reading
    Classify {
        #[arg(long, allow_hyphen_values = true, value_parser = parse_reading)]
        heart_rate: f64,
        #[arg(long, allow_hyphen_values = true, value_parser = parse_reading)]
        stress: f64,
        #[arg(long, allow_hyphen_values = true, value_parser = parse_reading)]
        sleep_hours: f64,
        #[arg(long)]
        json: bool,
    },
    /// Generate a markdown report with the plot alongside it
    Report {
        /// Input CSV, or - for stdin
        #[arg(long)]
        csv: PathBuf,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Write a demonstration CSV covering every risk tier
    Sample {
        #[arg(long, default_value = "sample_health.csv")]
        out: PathBuf,
    },
}

fn parse_reading(raw: &str) -> Result<f64, String> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(format!("{raw:?} is not a finite number")),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn write_file(path: &Path, contents: &[u8]) -> anyhow::Result<()> {
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))?;
    log::info!("Wrote {} ({} bytes)", path.display(), contents.len());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Analyze { csv, out_dir, json } => {
            let source = ingest::open_input(&csv)
                .with_context(|| format!("failed to open {}", csv.display()))?;
            let result = analysis::run(source)
                .with_context(|| format!("failed to analyze {}", csv.display()))?;

            fs::create_dir_all(&out_dir)
                .with_context(|| format!("failed to create {}", out_dir.display()))?;
            let plot_path = out_dir.join(plot::PLOT_FILE_NAME);
            let report_path = out_dir.join(result.export.file_name);
            write_file(&plot_path, result.plot_svg.as_bytes())?;
            write_file(&report_path, &result.export.bytes)?;

            if json {
                let rows: Vec<_> = result.rows.iter().map(|row| row.row()).collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
                return Ok(());
            }

            println!("Risk Analysis Table:");
            print!("{}", result.table);
            println!();
            println!("Risk plot written to {}.", plot_path.display());
            println!(
                "Risk report written to {} ({}).",
                report_path.display(),
                result.export.content_type
            );
        }
        Commands::Classify {
            heart_rate,
            stress,
            sleep_hours,
            json,
        } => {
            let record = HealthRecord {
                id: "-".to_string(),
                heart_rate,
                stress,
                sleep_hours,
                extra: Vec::new(),
            };
            let assessment = risk::assess(&record);

            if json {
                println!("{}", serde_json::to_string_pretty(&assessment)?);
            } else {
                println!("Risk level: {}", assessment.risk_level);
                println!("Reason: {}", assessment.risk_reason);
                println!("Intervention: {}", assessment.intervention);
            }
        }
        Commands::Report { csv, out } => {
            let source = ingest::open_input(&csv)
                .with_context(|| format!("failed to open {}", csv.display()))?;
            let records = ingest::load_records(source)
                .with_context(|| format!("failed to load {}", csv.display()))?;
            let rows = risk::annotate(records);

            let plot_path = out.with_file_name(plot::PLOT_FILE_NAME);
            write_file(&plot_path, plot::scatter_svg(&rows).as_bytes())?;

            let report = report::build_report(
                Utc::now().date_naive(),
                &csv.display().to_string(),
                &rows,
                Some(plot::PLOT_FILE_NAME),
            );
            write_file(&out, report.as_bytes())?;
            println!("Report written to {}.", out.display());
        }
        Commands::Sample { out } => {
            let file = fs::File::create(&out)
                .with_context(|| format!("failed to create {}", out.display()))?;
            let written = ingest::write_sample(file)?;
            println!("Sample data ({written} records) written to {}.", out.display());
        }
    }

    Ok(())
}

//! xer-cli - inspect schedule interchange files
//!
//! Summaries, critical activity listings, integrity checks and JSON/CSV export.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use schedule_xer::{
    Activity, AnalyticsConfig, Schedule, ScheduleView, parse_file, validate_schedule,
    write_activities_csv, write_schedule_json,
};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "xer-cli")]
#[command(version, about = "Schedule interchange file parser and analytics", long_about = None)]
struct Cli {
    /// Verbose output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Working hours per day used to convert hours into days
    #[arg(long, env = "XER_HOURS_PER_DAY", global = true)]
    hours_per_day: Option<f64>,

    /// JSON analytics config file
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print schedule statistics
    Summary {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Restrict to one project (defaults to the whole file)
        #[arg(short, long)]
        project: Option<String>,

        /// One-line output instead of JSON
        #[arg(long)]
        compact: bool,
    },

    /// List critical activities
    Critical {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[arg(short, long)]
        project: Option<String>,
    },

    /// Export the schedule
    Export {
        #[arg(value_enum)]
        format: ExportFormat,

        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(short, long)]
        project: Option<String>,
    },

    /// Report data-quality issues
    Check {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// List the tables present in a file
    Tables {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    Json,
    Csv,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn analytics_config(cli: &Cli) -> Result<AnalyticsConfig> {
    let config = match &cli.config {
        Some(path) => AnalyticsConfig::from_json_file(path)?,
        None => AnalyticsConfig::default(),
    };
    match cli.hours_per_day {
        Some(hours) => Ok(AnalyticsConfig::with_hours_per_day(hours)?),
        None => Ok(config),
    }
}

fn load(path: &Path) -> Result<Schedule> {
    parse_file(path).with_context(|| format!("failed to parse {}", path.display()))
}

fn select<'a>(schedule: &'a Schedule, project: Option<&str>) -> Result<ScheduleView<'a>> {
    let Some(proj_id) = project else {
        return Ok(schedule.view());
    };
    if schedule.project(Some(proj_id)).is_none() {
        bail!("project {proj_id} not found");
    }
    Ok(schedule.project_view(Some(proj_id)))
}

fn render_activity_table(activities: &[&Activity], hours_per_day: f64) -> String {
    let headers = ["task_code", "task_name", "status", "dur_days", "float_days"];
    let rows: Vec<[String; 5]> = activities
        .iter()
        .map(|activity| {
            [
                activity.task_code.clone(),
                activity.task_name.clone(),
                activity.status_code.clone(),
                format!("{:.1}", activity.duration_hr / hours_per_day),
                format!("{:.1}", activity.total_float_hr / hours_per_day),
            ]
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (ci, cell) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(cell.chars().count());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let render_row = |cells: &[&str]| {
        let mut line = String::from("|");
        for (ci, cell) in cells.iter().enumerate() {
            let pad = widths[ci].saturating_sub(cell.chars().count());
            line.push(' ');
            line.push_str(cell);
            line.push_str(&" ".repeat(pad));
            line.push_str(" |");
        }
        line
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(&headers[..]));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in &rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push_str(&render_row(&cells));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn output_writer(output: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("cannot create {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = analytics_config(&cli)?;

    match &cli.command {
        Commands::Summary {
            file,
            project,
            compact,
        } => {
            let schedule = load(file)?;
            let view = select(&schedule, project.as_deref())?;
            let stats = view.analytics(config).statistics();
            if *compact {
                println!("{}", stats.to_cli_summary());
            } else {
                if let Some(header) = view.header_project() {
                    println!("Project            : {} ({})", header.display_name(), header.proj_id);
                }
                println!("{}", serde_json::to_string_pretty(&stats)?);
            }
        }
        Commands::Critical { file, project } => {
            let schedule = load(file)?;
            let view = select(&schedule, project.as_deref())?;
            let critical = view.analytics(config).critical();
            println!("{} critical activities", critical.len());
            print!("{}", render_activity_table(&critical, config.hours_per_day()));
        }
        Commands::Export {
            format,
            file,
            output,
            project,
        } => {
            let schedule = load(file)?;
            let view = select(&schedule, project.as_deref())?;
            let mut writer = output_writer(output.as_deref())?;
            match format {
                ExportFormat::Json => write_schedule_json(&view, &mut writer)?,
                ExportFormat::Csv => {
                    write_activities_csv(view.activities().iter().copied(), &mut writer)?
                }
            }
            writer.flush()?;
        }
        Commands::Check { file } => {
            let schedule = load(file)?;
            let issues = validate_schedule(&schedule);
            if issues.is_empty() {
                println!("No issues found.");
            } else {
                println!("{} issue(s):", issues.len());
                for issue in &issues {
                    println!("  - {issue}");
                }
            }
        }
        Commands::Tables { file } => {
            let bytes =
                std::fs::read(file).with_context(|| format!("cannot read {}", file.display()))?;
            let text = String::from_utf8_lossy(&bytes);
            let extraction = schedule_xer::xer::extract_tables(&text);
            for name in extraction.table_names() {
                let rows = extraction.table(name).map(|t| t.row_count()).unwrap_or(0);
                println!("{name:<16} {rows}");
            }
        }
    }

    Ok(())
}

//! Command-line interface for the VSM pipeline.

use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::PathBuf;
use std::time::Instant;

use crate::config::PipelineConfig;
use crate::core::indexer::Selection;
use crate::core::loader;
use crate::processors::batch;

#[derive(Parser)]
#[command(name = "vsm-pipeline")]
#[command(about = "VSM measurement data pipeline", version)]
pub struct Cli {
    /// Path to YAML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List indexed data files in a directory
    List {
        /// Directory containing the data files
        directory: PathBuf,

        #[command(flatten)]
        select: SelectArgs,
    },

    /// Load a single data file and print a column summary
    Show {
        /// Path to the data file
        file: PathBuf,

        /// Skip CGS-to-SI unit conversion
        #[arg(long)]
        raw: bool,
    },

    /// Compute hysteresis area and mean temperature per file
    Analyze {
        /// Directory containing the data files
        directory: PathBuf,

        #[command(flatten)]
        select: SelectArgs,
    },
}

/// Index selection flags. At most one may be given; the default is all
/// indexed files.
#[derive(Args)]
#[group(multiple = false)]
struct SelectArgs {
    /// Select the file with exactly this index
    #[arg(long)]
    index: Option<u32>,

    /// Select files whose index is in this comma-separated list
    #[arg(long, value_delimiter = ',')]
    indices: Option<Vec<u32>>,

    /// Select files with index in an inclusive range
    #[arg(long, num_args = 2, value_names = ["LOW", "HIGH"])]
    range: Option<Vec<u32>>,

    /// Select only the lowest-indexed file
    #[arg(long)]
    first: bool,

    /// Select only the highest-indexed file
    #[arg(long)]
    last: bool,
}

impl SelectArgs {
    fn to_selection(&self) -> Selection {
        if let Some(index) = self.index {
            Selection::Exact(index)
        } else if let Some(indices) = &self.indices {
            Selection::List(indices.clone())
        } else if let Some(range) = &self.range {
            Selection::Range(range[0], range[1])
        } else if self.first {
            Selection::First
        } else if self.last {
            Selection::Last
        } else {
            Selection::All
        }
    }
}

/// Create a spinner for indeterminate operations
fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Print a summary box
fn print_summary(title: &str, items: &[(&str, String)]) {
    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║ {:<62} ║", title);
    println!("╠══════════════════════════════════════════════════════════════╣");
    for (key, value) in items {
        let display_value = if value.len() > 39 {
            format!("{}...", &value[..36])
        } else {
            value.clone()
        };
        println!("║ {:<20}: {:<39} ║", key, display_value);
    }
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
}

pub fn run() {
    let cli = Cli::parse();

    // Initialize logging based on verbosity (must come first)
    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .format_timestamp_secs()
        .init();

    // Load config
    let config = match &cli.config {
        Some(path) => match PipelineConfig::from_yaml(path) {
            Ok(cfg) => {
                info!("Loaded config from: {}", path.display());
                cfg
            }
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}, using defaults",
                    path.display(),
                    e
                );
                PipelineConfig::default()
            }
        },
        None => PipelineConfig::default(),
    };

    // Dispatch to subcommands
    match cli.command {
        Commands::List { directory, select } => {
            cmd_list(&directory, &select.to_selection(), &config);
        }
        Commands::Show { file, raw } => {
            cmd_show(&file, raw, &config);
        }
        Commands::Analyze { directory, select } => {
            cmd_analyze(&directory, &select.to_selection(), &config);
        }
    }
}

fn cmd_list(directory: &PathBuf, selection: &Selection, config: &PipelineConfig) {
    use crate::core::indexer;

    let start = Instant::now();

    let spinner = create_spinner("Scanning directory for data files...");

    let result = indexer::match_files(
        directory,
        &config.indexing.extension,
        &config.indexing.marker,
        selection,
    );

    spinner.finish_and_clear();

    match result {
        Ok(files) => {
            for file in &files {
                println!("{:>6}  {}", file.index, file.name);
            }

            print_summary(
                "File Listing Complete",
                &[
                    ("Directory", directory.display().to_string()),
                    ("Extension", config.indexing.extension.clone()),
                    ("Index marker", config.indexing.marker.clone()),
                    ("Matched files", files.len().to_string()),
                    ("Duration", format!("{:.2?}", start.elapsed())),
                ],
            );
        }
        Err(e) => {
            error!("Listing failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn cmd_show(file: &PathBuf, raw: bool, config: &PipelineConfig) {
    let start = Instant::now();

    let mut loader_config = config.loader.clone();
    if raw {
        loader_config.si_units = false;
    }

    let spinner = create_spinner("Loading data file...");

    let table = match loader::load_table(file, &loader_config) {
        Ok(t) => {
            spinner.finish_and_clear();
            t
        }
        Err(e) => {
            spinner.finish_and_clear();
            error!("Load failed: {}", e);
            std::process::exit(1);
        }
    };

    println!("{:<20} {:>14} {:>14}", "Column", "Min", "Max");
    for col in &table.columns {
        let min = col.values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = col.values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        println!("{:<20} {:>14.6} {:>14.6}", col.name, min, max);
    }

    print_summary(
        "Load Complete",
        &[
            ("File", file.display().to_string()),
            ("Columns", table.num_columns().to_string()),
            ("Rows", table.num_rows().to_string()),
            ("SI units", (!raw && config.loader.si_units).to_string()),
            ("Duration", format!("{:.2?}", start.elapsed())),
        ],
    );
}

fn cmd_analyze(directory: &PathBuf, selection: &Selection, config: &PipelineConfig) {
    let start = Instant::now();

    let spinner = create_spinner("Loading and analyzing data files...");

    let reports = match batch::analyze_directory(directory, selection, config) {
        Ok(r) => {
            spinner.finish_and_clear();
            r
        }
        Err(e) => {
            spinner.finish_and_clear();
            error!("Analysis failed: {}", e);
            std::process::exit(1);
        }
    };

    println!(
        "{:>6}  {:<28} {:>16} {:>12}",
        "Index", "File", "Loop area", "Mean temp"
    );
    for report in &reports {
        match (&report.area, &report.mean_temperature) {
            (Some(area), Some(temp)) => {
                println!(
                    "{:>6}  {:<28} {:>16.6e} {:>12.3}",
                    report.index, report.name, area, temp
                );
            }
            _ => {
                let reason = report.error.as_deref().unwrap_or("unknown failure");
                println!("{:>6}  {:<28} {}", report.index, report.name, reason);
            }
        }
    }

    let failures = reports.iter().filter(|r| r.error.is_some()).count();

    print_summary(
        "Analysis Complete",
        &[
            ("Directory", directory.display().to_string()),
            ("Files analyzed", reports.len().to_string()),
            ("Files with errors", failures.to_string()),
            ("Duration", format!("{:.2?}", start.elapsed())),
        ],
    );
}

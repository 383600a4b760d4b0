use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::{env, path::PathBuf};
use teripang_core::analysis::AnalysisParams;
use teripang_schemas::mode::AnalysisMode;
use tracing::{warn, Level};
use tracing_subscriber::FmtSubscriber;

use crate::{request::AnalysisRequest, workflow::RunOptions};

mod config;
mod request;
mod workflow;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding species_database and classification_rules
    #[arg(long, global = true, default_value = "./data")]
    data_dir: PathBuf,
    /// Directory under which each run gets its own timestamped folder
    #[arg(long, global = true, default_value = "./runs")]
    output_dir: PathBuf,
    /// Print the report without writing any files
    #[arg(long, global = true)]
    no_export: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Estimate age from length with the Von Bertalanffy growth model
    Age(AgeArgs),
    /// Fit or apply a length-weight relationship and condition factors
    Lwr(LwrArgs),
    /// Per-species growth and condition summary for a mixed sample
    Multispecies(MultispeciesArgs),
    /// Run an analysis described by a YAML request file
    Request {
        #[arg(long)]
        file: PathBuf,
    },
}

#[derive(Debug, Args)]
struct AgeArgs {
    /// CSV file with one length (cm) per line
    #[arg(short, long)]
    input: PathBuf,
    #[arg(long)]
    species: Option<String>,
    /// Asymptotic length in cm
    #[arg(long)]
    linf: Option<f64>,
    /// Growth coefficient per year
    #[arg(long)]
    k: Option<f64>,
}

#[derive(Debug, Args)]
struct LwrArgs {
    /// CSV file with `length,weight` rows
    #[arg(short, long)]
    input: PathBuf,
    #[arg(long)]
    species: Option<String>,
    /// Supply with --b to skip fitting
    #[arg(long, requires = "b")]
    a: Option<f64>,
    #[arg(long, requires = "a")]
    b: Option<f64>,
}

#[derive(Debug, Args)]
struct MultispeciesArgs {
    /// CSV file with `species,length,weight` rows
    #[arg(short, long)]
    input: PathBuf,
    #[arg(long)]
    location: String,
    /// Fallback asymptotic length for species missing from the table
    #[arg(long)]
    linf: Option<f64>,
    #[arg(long)]
    k: Option<f64>,
    #[arg(long)]
    no_age: bool,
    #[arg(long)]
    no_lwr: bool,
}

impl Command {
    fn into_run(self) -> Result<(AnalysisMode, PathBuf, AnalysisParams, Option<PathBuf>)> {
        let run = match self {
            Command::Age(args) => {
                let params = AnalysisParams {
                    species: args.species,
                    linf: args.linf,
                    k: args.k,
                    ..AnalysisParams::default()
                };
                (AnalysisMode::Age, args.input, params, None)
            }
            Command::Lwr(args) => {
                let params = AnalysisParams {
                    species: args.species,
                    a: args.a,
                    b: args.b,
                    ..AnalysisParams::default()
                };
                (AnalysisMode::Lwr, args.input, params, None)
            }
            Command::Multispecies(args) => {
                let params = AnalysisParams {
                    linf: args.linf,
                    k: args.k,
                    location: Some(args.location),
                    include_age: !args.no_age,
                    include_lwr: !args.no_lwr,
                    ..AnalysisParams::default()
                };
                (AnalysisMode::Multispecies, args.input, params, None)
            }
            Command::Request { file } => {
                let request = AnalysisRequest::load(&file)?;
                (request.mode, request.input, request.params, Some(file))
            }
        };
        Ok(run)
    }
}

/// Maximum log level from a `RUST_LOG` value. Only bare level names are
/// understood; anything else is returned as the error.
fn max_log_level(rust_log: Option<&str>) -> Result<Level, &str> {
    match rust_log {
        None => Ok(Level::INFO),
        Some(value) => value.trim().parse().map_err(|_| value),
    }
}

fn main() -> Result<()> {
    let rust_log = env::var("RUST_LOG").ok();
    let level = max_log_level(rust_log.as_deref());
    FmtSubscriber::builder()
        .with_max_level(level.unwrap_or(Level::INFO))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
    if let Err(value) = level {
        warn!("RUST_LOG='{value}' is not a level name (trace, debug, info, warn, error); logging at info");
    }

    let cli = Cli::parse();
    println!("--- Teripang Growth Analysis ---");

    let tables = config::load_reference_tables(&cli.data_dir)?;
    let (mode, input, params, request_file) = cli.command.into_run()?;
    let options = RunOptions {
        output_dir: cli.output_dir,
        export: !cli.no_export,
        request_file,
    };

    workflow::run_analysis(mode, &input, &params, &tables, &options)?;

    println!("\nAnalysis complete.");
    Ok(())
}

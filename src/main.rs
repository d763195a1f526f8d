//! Motor Diagnostics Core - Batch Entry Point
//!
//! Thin driver around the batch transforms: reads an upload CSV, runs the
//! requested analysis, writes the augmented CSV, and logs the summary.
//! All semantics live under `logic`; this file only wires I/O together.

mod logic;
pub mod constants;

use std::path::Path;
use std::process::ExitCode;

use logic::batch::{self, BatchReport};
use logic::table::Table;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 4 {
        eprintln!(
            "Usage: {} <diagnose|health|damage> <input.csv> <output.csv>",
            args.first().map(String::as_str).unwrap_or(constants::ENGINE_NAME)
        );
        return ExitCode::FAILURE;
    }

    log::info!(
        "Starting {} v{} ({} analysis)",
        constants::ENGINE_NAME,
        constants::ENGINE_VERSION,
        args[1]
    );

    match run(&args[1], Path::new(&args[2]), Path::new(&args[3])) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(analysis: &str, input: &Path, output: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let table = Table::from_csv_path(input)?;
    log::info!(
        "Loaded {}: {} rows, {} columns",
        input.display(),
        table.n_rows(),
        table.n_cols()
    );

    let report: BatchReport = match analysis {
        "diagnose" => batch::diagnose_batch(&table)?,
        "health" => batch::health_batch(&table, constants::get_average_life())?,
        "damage" => batch::damage_batch(&table, constants::get_mixture_seed())?,
        other => return Err(format!("unknown analysis '{other}'").into()),
    };

    report.table.write_csv_path(output)?;
    log::info!(
        "Wrote {} ({} rows); summary: {}",
        output.display(),
        report.table.n_rows(),
        serde_json::to_string(&report.summary)?
    );
    Ok(())
}

//! Benchmark runner for the sparse direct solver libraries.
//!
//! This executable solves every matrix of the two corpora (`matrici_def_pos` and
//! `matrici_non_def_pos` under the data directory) with the selected library, repeating
//! the whole sweep `num_runs` times, and appends one CSV row per solve to
//! `{output_dir}/{system}-{log_name}.csv`.
//!
//! Before any work starts, the process prints its PID and waits for the operator to
//! confirm, so a memory or CPU profiler can be attached first.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use solver_bench::{
    backends::{Backend, probe_capabilities, solver_for},
    config::{BenchConfig, DEFAULT_LOG_NAME},
    results::log_results,
    runner::{ProblemClass, run},
    utils::prompt::wait_for_confirmation,
};
use std::{io, path::PathBuf};

/// Command-line arguments of the benchmark runner.
#[derive(Parser, Debug)]
#[clap(
    name = "benchmark",
    about = "Benchmarks a sparse direct solver library on the Matrix Market corpora."
)]
struct BenchArgs {
    /// Solver library: one of 'mkl', 'superlu', 'umfpack'.
    library: String,

    /// Number of runs over the whole corpus; must be >= 1.
    #[clap(allow_negative_numbers = true)]
    num_runs: i64,

    /// Directory containing the 'matrici_def_pos' and 'matrici_non_def_pos' folders.
    #[clap(long, value_name = "PATH", default_value = "data")]
    data_dir: PathBuf,

    /// Directory the CSV result log is written to.
    #[clap(long, value_name = "PATH", default_value = ".")]
    output_dir: PathBuf,

    /// Base name of the CSV result log.
    #[clap(long, default_value = DEFAULT_LOG_NAME)]
    log_name: String,

    /// Start immediately instead of asking for confirmation.
    #[clap(long, short = 'y')]
    yes: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logger: {}", e))?;

    let args = BenchArgs::parse();
    let config = BenchConfig::new(&args.library, args.num_runs)?
        .with_data_dir(args.data_dir)
        .with_output_dir(args.output_dir)
        .with_log_name(args.log_name);

    let capabilities = probe_capabilities();
    for backend in Backend::ALL {
        if !capabilities.supports(backend) {
            log::warn!(
                "Solver library '{backend}' not available in this build (enable the '{backend}' feature)."
            );
        }
    }
    let solver = solver_for(config.backend)?;

    println!("\n------------------------------");
    println!("Current process PID is: {}", std::process::id());
    println!("------------------------------\n");

    if !args.yes {
        wait_for_confirmation(io::stdin().lock(), io::stdout())
            .context("Benchmark was not confirmed")?;
    }

    let mut all_results = Vec::with_capacity(ProblemClass::ALL.len());
    for class in ProblemClass::ALL {
        let matrices = config
            .corpus(class)
            .with_context(|| format!("Failed to list matrices in {:?}", config.corpus_dir(class)))?;
        if matrices.is_empty() {
            log::warn!("No .mtx files found in {:?}", config.corpus_dir(class));
        }
        let results = run(&matrices, class, solver.as_ref(), config.num_runs)?;
        all_results.push(results);
    }

    let destination = config.destination();
    for results in &all_results {
        log_results(results, &destination)?;
    }

    log::info!(
        "Benchmark complete. Results saved to {:?}.",
        destination.path()
    );
    Ok(())
}

//! The benchmark loop.
//!
//! For every trial, every matrix of a corpus is loaded from disk again, paired with its
//! right-hand side, solved once and scored against the exact all-ones solution. Loading
//! anew on each trial keeps solver libraries from reusing anything across runs, so each
//! measurement is a cold solve. The matrix and right-hand side are dropped before the
//! next file is read to bound the peak memory of the process.

use crate::{
    backends::{Backend, DirectSolver, SolveOutcome, timed_solve},
    error::{BenchError, BenchErrorKind},
    problem::{Problem, exact_solution, relative_error},
    utils::{data_loader::load_matrix, perf::get_peak_rss_kb},
};
use serde::{Deserialize, Serialize};
use std::{fmt, path::Path};

/// Relative error recorded when the solver produced no solution.
pub const FAILED_SOLVE_ERROR: f64 = -1.0;

/// The problem class of a corpus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemClass {
    /// Symmetric positive definite matrices.
    DefPos,
    /// Matrices that are not symmetric positive definite.
    NonDefPos,
}

impl ProblemClass {
    pub const ALL: [ProblemClass; 2] = [ProblemClass::DefPos, ProblemClass::NonDefPos];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProblemClass::DefPos => "def_pos",
            ProblemClass::NonDefPos => "non_def_pos",
        }
    }

    /// Folder under the data directory holding this class of matrices.
    pub fn corpus_dir(&self) -> &'static str {
        match self {
            ProblemClass::DefPos => "matrici_def_pos",
            ProblemClass::NonDefPos => "matrici_non_def_pos",
        }
    }
}

impl fmt::Display for ProblemClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Measurements of one solve of one matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    pub matrix_name: String,
    pub matrix_type: ProblemClass,
    pub matrix_dimensions: String,
    pub start_time: f64,
    pub end_time: f64,
    /// `||x_e - x|| / ||x_e||`, or [`FAILED_SOLVE_ERROR`] when no solution was produced.
    pub relative_error: f64,
    pub solver_library: Backend,
    /// Set when UMFPACK ran out of memory.
    pub umfpack_error: bool,
}

fn matrix_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Benchmarks `solver` on every matrix in `matrices`, `num_runs` times over.
///
/// `matrices` is expected in the order it should be solved in (the discovery step
/// sorts it). Any failure other than a solver reporting it ran out of memory aborts
/// the run.
pub fn run<P: AsRef<Path>>(
    matrices: &[P],
    matrices_type: ProblemClass,
    solver: &dyn DirectSolver,
    num_runs: usize,
) -> Result<Vec<RunResult>, BenchError> {
    if num_runs == 0 {
        return Err(BenchErrorKind::InvalidRunCount(0).into());
    }
    let backend = solver.backend();

    log::info!("Discovered these matrices:");
    for m in matrices {
        log::info!("{}", m.as_ref().display());
    }

    let mut results = Vec::with_capacity(num_runs * matrices.len());

    for i in 0..num_runs {
        log::info!("## ------------------------ ##");
        log::info!("Run {}/{} with all matrices", i + 1, num_runs);

        for (index, path) in matrices.iter().enumerate() {
            let path = path.as_ref();
            let name = matrix_name(path);

            let matrix = load_matrix(path, backend.layout()).map_err(|source| {
                BenchError::from(BenchErrorKind::Load {
                    path: path.display().to_string(),
                    source,
                })
            })?;
            log::info!(
                "Iter {}, matrix '{}' {}/{}, shape ({}, {})",
                i + 1,
                name,
                index + 1,
                matrices.len(),
                matrix.nrows(),
                matrix.ncols()
            );

            let problem = Problem::new(matrix);
            let (outcome, timing) = timed_solve(solver, &problem.matrix, problem.rhs.as_ref())?;

            let (relative_error, umfpack_error) = match outcome {
                SolveOutcome::Solved(x) => {
                    let xe = exact_solution(problem.matrix.ncols());
                    (relative_error(xe.as_ref(), x.as_ref()), false)
                }
                SolveOutcome::OutOfMemory { reason } => {
                    log::warn!("Got MemoryError for {backend} on '{name}': {reason}");
                    (FAILED_SOLVE_ERROR, true)
                }
            };
            log::debug!(
                "'{}' solved in {:.6}s, relative error {:e}, peak RSS {} KB",
                name,
                timing.elapsed.as_secs_f64(),
                relative_error,
                get_peak_rss_kb()
            );

            results.push(RunResult {
                matrix_dimensions: problem.matrix.dimensions(),
                matrix_name: name,
                matrix_type: matrices_type,
                start_time: timing.start_time,
                end_time: timing.end_time,
                relative_error,
                solver_library: backend,
                umfpack_error,
            });

            drop(problem);
            log::info!("Matrix released, next run...");
        }
    }

    log::info!("Done!");
    Ok(results)
}

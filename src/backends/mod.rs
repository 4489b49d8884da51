//! Sparse direct solver backends.
//!
//! Every solver library the harness can benchmark sits behind the [`DirectSolver`]
//! trait, so the runner is written once and the library is chosen a single time at
//! startup through [`solver_for`].
//!
//! # Backends
//!
//! Each library is a native dependency and is compiled in only with its cargo feature:
//!
//! - **`umfpack`** (`--features umfpack`): SuiteSparse UMFPACK through `russell_sparse`,
//!   on compressed sparse columns.
//! - **`superlu`** (`--features superlu`): SuperLU `dgssv` through `superlu-sys`, on
//!   compressed sparse columns.
//! - **`mkl`** (`--features mkl`): Intel MKL PARDISO on compressed sparse rows.
//!
//! A library missing from the build is reported by [`probe_capabilities`] and refused
//! by [`solver_for`] with [`BenchErrorKind::BackendUnavailable`].
//!
//! Only the UMFPACK backend recovers from running out of memory: it reports
//! [`SolveOutcome::OutOfMemory`] so the benchmark can move on to the next matrix.
//! Every other failure is an error and aborts the run.

#[cfg(feature = "mkl")]
pub mod pardiso;
#[cfg(feature = "superlu")]
pub mod superlu;
#[cfg(feature = "umfpack")]
pub mod umfpack;

use crate::{
    error::{BenchError, BenchErrorKind},
    matrix::{Layout, SparseMatrix},
    utils::perf::unix_timestamp,
};
use faer::{Mat, MatRef};
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    str::FromStr,
    time::{Duration, Instant},
};

#[cfg(feature = "mkl")]
pub use pardiso::PardisoSolver;
#[cfg(feature = "superlu")]
pub use superlu::SuperLuSolver;
#[cfg(feature = "umfpack")]
pub use umfpack::UmfpackSolver;

/// The solver libraries under benchmark.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Mkl,
    SuperLu,
    Umfpack,
}

impl Backend {
    pub const ALL: [Backend; 3] = [Backend::Mkl, Backend::SuperLu, Backend::Umfpack];

    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Mkl => "mkl",
            Backend::SuperLu => "superlu",
            Backend::Umfpack => "umfpack",
        }
    }

    /// Storage layout the library consumes.
    pub fn layout(&self) -> Layout {
        match self {
            Backend::Mkl => Layout::Csr,
            Backend::SuperLu | Backend::Umfpack => Layout::Csc,
        }
    }

    /// Whether running out of memory is recorded as an outcome instead of an error.
    pub fn recovers_out_of_memory(&self) -> bool {
        matches!(self, Backend::Umfpack)
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Backend::ALL
            .into_iter()
            .find(|b| b.as_str() == s)
            .ok_or_else(|| {
                BenchErrorKind::InvalidArgument(format!(
                    "Accepted values for library are: 'mkl', 'superlu', 'umfpack', got '{s}' instead."
                ))
                .into()
            })
    }
}

/// Result of a single solve attempt.
#[derive(Debug)]
pub enum SolveOutcome {
    /// The computed solution vector.
    Solved(Mat<f64>),
    /// The library ran out of memory; no solution exists to compare.
    OutOfMemory { reason: String },
}

/// A failure reported by a native library, classified once by its backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverFailure {
    /// The library could not allocate what the factorization needed.
    OutOfMemory(String),
    /// Any other status: singular matrix, invalid input, internal error.
    Other(String),
}

/// Maps a library failure to what the runner sees.
///
/// Out-of-memory becomes [`SolveOutcome::OutOfMemory`] for backends that
/// [recover](Backend::recovers_out_of_memory) from it; everything else is a
/// [`BenchErrorKind::Solver`] error.
pub fn failure_outcome(backend: Backend, failure: SolverFailure) -> Result<SolveOutcome, BenchError> {
    match failure {
        SolverFailure::OutOfMemory(reason) if backend.recovers_out_of_memory() => {
            log::warn!("Got out-of-memory error for {backend}!");
            Ok(SolveOutcome::OutOfMemory { reason })
        }
        SolverFailure::OutOfMemory(message) | SolverFailure::Other(message) => {
            Err(BenchErrorKind::Solver { backend, message }.into())
        }
    }
}

/// Wall-clock bounds of a solve call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveTiming {
    /// UNIX time in seconds right before the call.
    pub start_time: f64,
    /// UNIX time in seconds right after the call returned.
    pub end_time: f64,
    /// Monotonic duration of the call.
    pub elapsed: Duration,
}

/// A sparse direct solver for `A x = b`.
pub trait DirectSolver {
    /// Which library this solver drives.
    fn backend(&self) -> Backend;

    /// Solves `matrix * x = rhs` for a single right-hand side.
    ///
    /// The matrix must be square, stored in `self.backend().layout()`, and `rhs` must
    /// be a column with one entry per matrix row.
    fn solve(&self, matrix: &SparseMatrix, rhs: MatRef<'_, f64>) -> Result<SolveOutcome, BenchError>;
}

/// Validates the shape of a system and the layout its matrix is stored in.
pub fn check_system(
    backend: Backend,
    matrix: &SparseMatrix,
    rhs: MatRef<'_, f64>,
) -> Result<(), BenchError> {
    if matrix.layout() != backend.layout() {
        return Err(BenchErrorKind::InvalidArgument(format!(
            "solver library '{backend}' needs a '{}' matrix, got '{}'",
            backend.layout(),
            matrix.layout()
        ))
        .into());
    }
    if !matrix.is_square() {
        return Err(BenchErrorKind::InvalidArgument(format!(
            "a direct solve needs a square matrix, got {}",
            matrix.dimensions()
        ))
        .into());
    }
    if rhs.nrows() != matrix.nrows() || rhs.ncols() != 1 {
        return Err(BenchErrorKind::InvalidArgument(format!(
            "right-hand side is {}x{}, expected {}x1",
            rhs.nrows(),
            rhs.ncols(),
            matrix.nrows()
        ))
        .into());
    }
    Ok(())
}

/// Runs one solve, timing only the library call.
pub fn timed_solve(
    solver: &dyn DirectSolver,
    matrix: &SparseMatrix,
    rhs: MatRef<'_, f64>,
) -> Result<(SolveOutcome, SolveTiming), BenchError> {
    let start_time = unix_timestamp();
    let start = Instant::now();

    let outcome = solver.solve(matrix, rhs)?;

    let elapsed = start.elapsed();
    let end_time = unix_timestamp();

    Ok((
        outcome,
        SolveTiming {
            start_time,
            end_time,
            elapsed,
        },
    ))
}

/// Which backends this build can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub mkl: bool,
    pub superlu: bool,
    pub umfpack: bool,
}

impl Capabilities {
    pub fn supports(&self, backend: Backend) -> bool {
        match backend {
            Backend::Mkl => self.mkl,
            Backend::SuperLu => self.superlu,
            Backend::Umfpack => self.umfpack,
        }
    }

    /// The backends this build can run, in [`Backend::ALL`] order.
    pub fn available(&self) -> Vec<Backend> {
        Backend::ALL
            .into_iter()
            .filter(|b| self.supports(*b))
            .collect()
    }
}

/// Reports the backends compiled into this build.
///
/// A missing library is not fatal here: callers warn and only fail if it is selected.
pub fn probe_capabilities() -> Capabilities {
    Capabilities {
        mkl: cfg!(feature = "mkl"),
        superlu: cfg!(feature = "superlu"),
        umfpack: cfg!(feature = "umfpack"),
    }
}

/// Builds the solver for `backend`.
pub fn solver_for(backend: Backend) -> Result<Box<dyn DirectSolver>, BenchError> {
    match backend {
        #[cfg(feature = "umfpack")]
        Backend::Umfpack => Ok(Box::new(UmfpackSolver::new())),
        #[cfg(feature = "superlu")]
        Backend::SuperLu => Ok(Box::new(SuperLuSolver::new())),
        #[cfg(feature = "mkl")]
        Backend::Mkl => Ok(Box::new(PardisoSolver::new())),
        #[allow(unreachable_patterns)]
        unavailable => Err(BenchErrorKind::BackendUnavailable(unavailable).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faer::{
        mat,
        sparse::{SparseColMat, Triplet},
    };

    /// Solves diagonal systems by division, standing in for a native library.
    struct DiagonalSolver;

    impl DirectSolver for DiagonalSolver {
        fn backend(&self) -> Backend {
            Backend::Umfpack
        }

        fn solve(&self, matrix: &SparseMatrix, rhs: MatRef<'_, f64>) -> Result<SolveOutcome, BenchError> {
            check_system(self.backend(), matrix, rhs)?;
            let SparseMatrix::Csc(a) = matrix else {
                unreachable!();
            };
            let a = a.as_ref();
            let mut diag = vec![0.0; a.ncols()];
            for (j, d) in diag.iter_mut().enumerate() {
                for (i, v) in a.row_idx_of_col(j).zip(a.val_of_col(j)) {
                    if i == j {
                        *d += *v;
                    }
                }
            }
            Ok(SolveOutcome::Solved(Mat::from_fn(rhs.nrows(), 1, |i, _| {
                rhs[(i, 0)] / diag[i]
            })))
        }
    }

    #[test]
    fn test_backend_names_round_trip() {
        for backend in Backend::ALL {
            assert_eq!(backend.as_str().parse::<Backend>().unwrap(), backend);
        }
    }

    #[test]
    fn test_unknown_backend_is_invalid_argument() {
        let err = "foo".parse::<Backend>().unwrap_err();
        assert!(matches!(err.kind(), BenchErrorKind::InvalidArgument(_)));
        assert!(err.to_string().contains("got 'foo' instead"));
    }

    #[test]
    fn test_layouts() {
        assert_eq!(Backend::Mkl.layout(), Layout::Csr);
        assert_eq!(Backend::SuperLu.layout(), Layout::Csc);
        assert_eq!(Backend::Umfpack.layout(), Layout::Csc);
    }

    #[test]
    fn test_capabilities_follow_features() {
        let caps = probe_capabilities();
        assert_eq!(caps.supports(Backend::Mkl), cfg!(feature = "mkl"));
        assert_eq!(caps.supports(Backend::SuperLu), cfg!(feature = "superlu"));
        assert_eq!(caps.supports(Backend::Umfpack), cfg!(feature = "umfpack"));
        for backend in Backend::ALL {
            assert_eq!(solver_for(backend).is_ok(), caps.supports(backend));
        }
    }

    #[test]
    fn test_missing_backend_is_unavailable() {
        let caps = probe_capabilities();
        for backend in Backend::ALL.into_iter().filter(|b| !caps.supports(*b)) {
            let err = solver_for(backend).err().unwrap();
            assert!(matches!(
                err.kind(),
                BenchErrorKind::BackendUnavailable(b) if *b == backend
            ));
        }
    }

    #[test]
    fn test_available_lists_supported_backends_in_order() {
        let caps = Capabilities {
            mkl: true,
            superlu: false,
            umfpack: true,
        };
        assert_eq!(caps.available(), [Backend::Mkl, Backend::Umfpack]);
    }

    #[test]
    fn test_umfpack_recovers_from_out_of_memory() {
        let outcome =
            failure_outcome(Backend::Umfpack, SolverFailure::OutOfMemory("Error(-1)".into())).unwrap();
        assert!(matches!(outcome, SolveOutcome::OutOfMemory { reason } if reason == "Error(-1)"));
    }

    #[test]
    fn test_superlu_and_mkl_propagate_out_of_memory() {
        for backend in [Backend::SuperLu, Backend::Mkl] {
            let err = failure_outcome(backend, SolverFailure::OutOfMemory("no memory".into()))
                .unwrap_err();
            assert!(matches!(
                err.kind(),
                BenchErrorKind::Solver { backend: b, message } if *b == backend && message == "no memory"
            ));
        }
    }

    #[test]
    fn test_other_failures_always_propagate() {
        for backend in Backend::ALL {
            let err = failure_outcome(backend, SolverFailure::Other("singular".into())).unwrap_err();
            assert!(matches!(err.kind(), BenchErrorKind::Solver { .. }));
        }
    }

    #[test]
    fn test_check_system_rejects_wrong_shapes() {
        let triplets = vec![Triplet::new(0, 0, 1.0), Triplet::new(1, 1, 1.0)];
        let square = SparseMatrix::Csc(SparseColMat::try_new_from_triplets(2, 2, &triplets).unwrap());
        let wide = SparseMatrix::Csc(SparseColMat::try_new_from_triplets(2, 3, &triplets).unwrap());
        let rhs: Mat<f64> = mat![[1.0], [1.0]];
        let short: Mat<f64> = mat![[1.0]];

        assert!(check_system(Backend::Umfpack, &square, rhs.as_ref()).is_ok());
        assert!(check_system(Backend::Umfpack, &wide, rhs.as_ref()).is_err());
        assert!(check_system(Backend::Umfpack, &square, short.as_ref()).is_err());
        assert!(check_system(Backend::Mkl, &square, rhs.as_ref()).is_err());
    }

    #[test]
    fn test_timed_solve_orders_timestamps() {
        let triplets = vec![Triplet::new(0, 0, 2.0), Triplet::new(1, 1, 4.0)];
        let a = SparseMatrix::Csc(SparseColMat::try_new_from_triplets(2, 2, &triplets).unwrap());
        let b: Mat<f64> = mat![[2.0], [4.0]];

        let (outcome, timing) = timed_solve(&DiagonalSolver, &a, b.as_ref()).unwrap();
        let SolveOutcome::Solved(x) = outcome else {
            panic!("diagonal solve failed");
        };
        assert_eq!(x, mat![[1.0], [1.0]]);
        assert!(timing.end_time >= timing.start_time);
    }
}

//! SuiteSparse UMFPACK backend (feature-gated), driven through `russell_sparse`.
//!
//! The compressed columns are copied into a coordinate matrix, which `russell_sparse`
//! hands to UMFPACK for a fresh symbolic and numeric factorization on every solve.
//!
//! # Requirements
//!
//! - SuiteSparse installed where `russell_sparse` can link it
//! - Build with `cargo build --features umfpack`

use super::{Backend, DirectSolver, SolveOutcome, SolverFailure, check_system, failure_outcome};
use crate::{error::BenchError, matrix::SparseMatrix};
use faer::{Mat, MatRef, sparse::SparseColMatRef};
use russell_lab::Vector;
use russell_sparse::prelude::{CooMatrix, Genie, LinSolver, SparseMatrix as RussellMatrix};

/// UMFPACK from SuiteSparse, for compressed sparse column matrices.
#[derive(Debug, Default, Clone, Copy)]
pub struct UmfpackSolver;

impl UmfpackSolver {
    pub fn new() -> Self {
        Self
    }
}

/// Classifies a `russell_sparse` failure message.
///
/// UMFPACK's out-of-memory status and `russell_sparse`'s own allocation failures both
/// mention memory in their message.
fn classify(message: &str) -> SolverFailure {
    if message.to_ascii_lowercase().contains("memory") {
        SolverFailure::OutOfMemory(message.to_string())
    } else {
        SolverFailure::Other(message.to_string())
    }
}

fn to_coo(a: SparseColMatRef<'_, usize, f64>) -> Result<CooMatrix, &'static str> {
    let n = a.nrows();
    let mut coo = CooMatrix::new(n, a.ncols(), a.compute_nnz(), None, false)?;
    for j in 0..a.ncols() {
        for (i, &v) in a.row_idx_of_col(j).zip(a.val_of_col(j)) {
            coo.put(i, j, v)?;
        }
    }
    Ok(coo)
}

fn factorize_and_solve(a: SparseColMatRef<'_, usize, f64>, rhs: MatRef<'_, f64>) -> Result<Mat<f64>, &'static str> {
    let n = a.nrows();
    let mut matrix = RussellMatrix::from_coo(to_coo(a)?);

    let mut b = Vector::new(n);
    for i in 0..n {
        b[i] = rhs[(i, 0)];
    }
    let mut x = Vector::new(n);

    let mut solver = LinSolver::new(Genie::Umfpack)?;
    solver.actual.factorize(&mut matrix, None)?;
    solver.actual.solve(&mut x, &matrix, &b, false)?;

    Ok(Mat::from_fn(n, 1, |i, _| x[i]))
}

impl DirectSolver for UmfpackSolver {
    fn backend(&self) -> Backend {
        Backend::Umfpack
    }

    fn solve(&self, matrix: &SparseMatrix, rhs: MatRef<'_, f64>) -> Result<SolveOutcome, BenchError> {
        check_system(Backend::Umfpack, matrix, rhs)?;
        let SparseMatrix::Csc(a) = matrix else {
            unreachable!("check_system accepted a non-CSC matrix for umfpack");
        };

        match factorize_and_solve(a.as_ref(), rhs) {
            Ok(x) => Ok(SolveOutcome::Solved(x)),
            Err(message) => failure_outcome(Backend::Umfpack, classify(message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::BenchErrorKind,
        problem::{Problem, exact_solution, relative_error},
    };
    use faer::sparse::{SparseColMat, Triplet};

    #[test]
    fn test_solves_unsymmetric_system() {
        let triplets = vec![
            Triplet::new(0, 0, 4.0),
            Triplet::new(0, 1, 1.0),
            Triplet::new(1, 0, 2.0),
            Triplet::new(1, 1, 5.0),
            Triplet::new(2, 2, 3.0),
            Triplet::new(2, 0, -1.0),
        ];
        let a = SparseMatrix::Csc(SparseColMat::try_new_from_triplets(3, 3, &triplets).unwrap());
        let problem = Problem::new(a);

        match UmfpackSolver::new().solve(&problem.matrix, problem.rhs.as_ref()).unwrap() {
            SolveOutcome::Solved(x) => {
                let err = relative_error(exact_solution(3).as_ref(), x.as_ref());
                assert!(err < 1e-12, "relative error too high: {err}");
            }
            SolveOutcome::OutOfMemory { reason } => panic!("unexpected out-of-memory: {reason}"),
        }
    }

    #[test]
    fn test_memory_messages_become_out_of_memory_outcomes() {
        let outcome = failure_outcome(
            Backend::Umfpack,
            classify("Error(-1): Not enough memory"),
        )
        .unwrap();
        assert!(matches!(outcome, SolveOutcome::OutOfMemory { .. }));
    }

    #[test]
    fn test_singular_matrix_is_an_error() {
        let failure = classify("Error(1): Matrix is singular");
        assert_eq!(failure, SolverFailure::Other("Error(1): Matrix is singular".into()));
        let err = failure_outcome(Backend::Umfpack, failure).unwrap_err();
        assert!(matches!(err.kind(), BenchErrorKind::Solver { .. }));
    }
}

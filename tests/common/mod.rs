//! Shared test support: a pure-Rust reference solver.
//!
//! The native libraries are optional features, so the pipeline is also exercised with
//! faer's sparse LU standing in for them. The reference solver reports itself as any
//! backend the test asks for.

#![allow(dead_code)]

use faer::{MatRef, prelude::*};
use solver_bench::{
    BenchError, DirectSolver, SolveOutcome,
    backends::{Backend, check_system},
    error::BenchErrorKind,
    matrix::SparseMatrix,
};

/// faer's sparse LU, tagged with the backend whose place it takes.
pub struct ReferenceLu {
    pub backend: Backend,
}

impl ReferenceLu {
    pub fn tagged(backend: Backend) -> Self {
        Self { backend }
    }
}

impl DirectSolver for ReferenceLu {
    fn backend(&self) -> Backend {
        self.backend
    }

    fn solve(&self, matrix: &SparseMatrix, rhs: MatRef<'_, f64>) -> Result<SolveOutcome, BenchError> {
        check_system(Backend::Umfpack, matrix, rhs)?;
        let SparseMatrix::Csc(a) = matrix else {
            unreachable!();
        };
        let lu = a.as_ref().sp_lu().map_err(|e| {
            BenchError::from(BenchErrorKind::Solver {
                backend: self.backend,
                message: format!("{e:?}"),
            })
        })?;
        Ok(SolveOutcome::Solved(lu.solve(rhs.to_owned())))
    }
}

//! SuperLU backend (feature-gated), calling the sequential `dgssv` driver.
//!
//! `dgssv` orders the columns (COLAMD by default), factorizes `Pr A Pc = L U` with
//! partial pivoting, and overwrites the right-hand side with the solution. The matrix
//! and right-hand side buffers stay owned by Rust; SuperLU only allocates the factors,
//! which are destroyed before returning.
//!
//! # Requirements
//!
//! - A C toolchain for `superlu-sys` to build SuperLU
//! - Build with `cargo build --features superlu`

use super::{Backend, DirectSolver, SolveOutcome, SolverFailure, check_system, failure_outcome};
use crate::{
    error::{BenchError, BenchErrorKind},
    matrix::SparseMatrix,
};
use faer::{Mat, MatRef};
use std::{mem, os::raw::c_int};
use superlu_sys::{
    Destroy_CompCol_Matrix, Destroy_SuperMatrix_Store, Destroy_SuperNode_Matrix, Dtype_t,
    Mtype_t, StatFree, StatInit, Stype_t, SuperLUStat_t, SuperMatrix, dCreate_CompCol_Matrix,
    dCreate_Dense_Matrix, dgssv, set_default_options, superlu_options_t,
};

/// SuperLU, for compressed sparse column matrices.
#[derive(Debug, Default, Clone, Copy)]
pub struct SuperLuSolver;

impl SuperLuSolver {
    pub fn new() -> Self {
        Self
    }
}

/// Interprets the `info` output of `dgssv` for an `n x n` system.
///
/// `0 < info <= n` means `U(info, info)` is exactly zero; `info > n` means an allocation
/// failed after `info - n` bytes.
fn classify(info: c_int, n: usize) -> Option<SolverFailure> {
    let info = i64::from(info);
    let n = n as i64;
    match info {
        0 => None,
        i if i < 0 => Some(SolverFailure::Other(format!(
            "argument {} of dgssv had an illegal value",
            -i
        ))),
        i if i <= n => Some(SolverFailure::Other(format!(
            "U({i}, {i}) is exactly zero, the matrix is singular"
        ))),
        i => Some(SolverFailure::OutOfMemory(format!(
            "memory allocation failed after {} bytes",
            i - n
        ))),
    }
}

fn index(value: usize) -> Result<c_int, BenchError> {
    c_int::try_from(value).map_err(|_| {
        BenchErrorKind::Solver {
            backend: Backend::SuperLu,
            message: format!("index {value} does not fit a 32-bit SuperLU integer"),
        }
        .into()
    })
}

impl DirectSolver for SuperLuSolver {
    fn backend(&self) -> Backend {
        Backend::SuperLu
    }

    fn solve(&self, matrix: &SparseMatrix, rhs: MatRef<'_, f64>) -> Result<SolveOutcome, BenchError> {
        check_system(Backend::SuperLu, matrix, rhs)?;
        let SparseMatrix::Csc(a) = matrix else {
            unreachable!("check_system accepted a non-CSC matrix for superlu");
        };
        let a = a.as_ref();
        let n = a.nrows();

        let mut col_ptr = Vec::with_capacity(n + 1);
        let mut row_idx = Vec::with_capacity(a.compute_nnz());
        let mut values = Vec::with_capacity(a.compute_nnz());
        col_ptr.push(0);
        for j in 0..n {
            for (i, &v) in a.row_idx_of_col(j).zip(a.val_of_col(j)) {
                row_idx.push(index(i)?);
                values.push(v);
            }
            col_ptr.push(index(row_idx.len())?);
        }
        let nc = index(n)?;
        let nnz = index(values.len())?;

        let mut x: Vec<f64> = (0..n).map(|i| rhs[(i, 0)]).collect();
        let mut perm_c: Vec<c_int> = vec![0; n];
        let mut perm_r: Vec<c_int> = vec![0; n];
        let mut info: c_int = 0;

        // SAFETY: `A` and `B` borrow `values`/`row_idx`/`col_ptr` and `x`, which outlive
        // both and are only released by Rust; `Destroy_SuperMatrix_Store` frees just the
        // store headers SuperLU allocated for them. `L` and `U` are owned by SuperLU and
        // destroyed here. All C structs are plain data for which zero is a valid value.
        unsafe {
            let mut options: superlu_options_t = mem::zeroed();
            let mut stat: SuperLUStat_t = mem::zeroed();
            let mut a_mat: SuperMatrix = mem::zeroed();
            let mut b_mat: SuperMatrix = mem::zeroed();
            let mut l_mat: SuperMatrix = mem::zeroed();
            let mut u_mat: SuperMatrix = mem::zeroed();

            set_default_options(&mut options);
            dCreate_CompCol_Matrix(
                &mut a_mat,
                nc,
                nc,
                nnz,
                values.as_mut_ptr(),
                row_idx.as_mut_ptr(),
                col_ptr.as_mut_ptr(),
                Stype_t::SLU_NC,
                Dtype_t::SLU_D,
                Mtype_t::SLU_GE,
            );
            dCreate_Dense_Matrix(
                &mut b_mat,
                nc,
                1,
                x.as_mut_ptr(),
                nc,
                Stype_t::SLU_DN,
                Dtype_t::SLU_D,
                Mtype_t::SLU_GE,
            );
            StatInit(&mut stat);

            dgssv(
                &mut options,
                &mut a_mat,
                perm_c.as_mut_ptr(),
                perm_r.as_mut_ptr(),
                &mut l_mat,
                &mut u_mat,
                &mut b_mat,
                &mut stat,
                &mut info,
            );

            // The factors exist unless an argument was rejected before factorization.
            if info >= 0 && info as usize <= n {
                Destroy_SuperNode_Matrix(&mut l_mat);
                Destroy_CompCol_Matrix(&mut u_mat);
            }
            Destroy_SuperMatrix_Store(&mut a_mat);
            Destroy_SuperMatrix_Store(&mut b_mat);
            StatFree(&mut stat);
        }

        match classify(info, n) {
            None => Ok(SolveOutcome::Solved(Mat::from_fn(n, 1, |i, _| x[i]))),
            Some(failure) => failure_outcome(Backend::SuperLu, failure),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{Problem, exact_solution, relative_error};
    use faer::sparse::{SparseColMat, Triplet};

    #[test]
    fn test_solves_system_needing_pivoting() {
        let triplets = vec![
            Triplet::new(0, 1, 3.0),
            Triplet::new(1, 0, 1.0),
            Triplet::new(1, 2, -2.0),
            Triplet::new(2, 2, -4.0),
            Triplet::new(2, 0, 0.5),
        ];
        let a = SparseMatrix::Csc(SparseColMat::try_new_from_triplets(3, 3, &triplets).unwrap());
        let problem = Problem::new(a);

        match SuperLuSolver::new().solve(&problem.matrix, problem.rhs.as_ref()).unwrap() {
            SolveOutcome::Solved(x) => {
                let err = relative_error(exact_solution(3).as_ref(), x.as_ref());
                assert!(err < 1e-12, "relative error too high: {err}");
            }
            SolveOutcome::OutOfMemory { reason } => panic!("unexpected out-of-memory: {reason}"),
        }
    }

    #[test]
    fn test_info_codes() {
        assert_eq!(classify(0, 10), None);
        assert!(matches!(classify(3, 10), Some(SolverFailure::Other(_))));
        assert!(matches!(classify(-2, 10), Some(SolverFailure::Other(_))));
        assert!(matches!(classify(1034, 10), Some(SolverFailure::OutOfMemory(m)) if m.contains("1024")));
    }

    #[test]
    fn test_allocation_failure_propagates() {
        let err = failure_outcome(Backend::SuperLu, classify(11, 10).unwrap()).unwrap_err();
        assert!(matches!(err.kind(), BenchErrorKind::Solver { backend: Backend::SuperLu, .. }));
    }
}

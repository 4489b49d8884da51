//! Intel MKL PARDISO backend (feature-gated).
//!
//! PARDISO is driven through its C interface with the whole pipeline in a single call
//! (phase 13: analysis, numerical factorization, solve), followed by a release of the
//! internal memory (phase -1). The matrix is passed as zero-based CSR.
//!
//! # Requirements
//!
//! - Intel MKL installed where `intel-mkl-src` can find it
//! - Build with `cargo build --features mkl`

use super::{Backend, DirectSolver, SolveOutcome, SolverFailure, check_system, failure_outcome};
use crate::{
    error::{BenchError, BenchErrorKind},
    matrix::SparseMatrix,
};
use faer::{Mat, MatRef};
use std::{
    ffi::c_void,
    os::raw::c_int,
    ptr,
};

// Linked for its side effect of providing the MKL symbols.
use intel_mkl_src as _;

unsafe extern "C" {
    fn pardisoinit(pt: *mut *mut c_void, mtype: *const c_int, iparm: *mut c_int);

    fn pardiso(
        pt: *mut *mut c_void,
        maxfct: *const c_int,
        mnum: *const c_int,
        mtype: *const c_int,
        phase: *const c_int,
        n: *const c_int,
        a: *const c_void,
        ia: *const c_int,
        ja: *const c_int,
        perm: *mut c_int,
        nrhs: *const c_int,
        iparm: *mut c_int,
        msglvl: *const c_int,
        b: *mut c_void,
        x: *mut c_void,
        error: *mut c_int,
    );
}

/// Real and unsymmetric.
const MTYPE_REAL_UNSYMMETRIC: c_int = 11;
const PHASE_SOLVE: c_int = 13;
const PHASE_RELEASE: c_int = -1;
/// `iparm[34]`: use zero-based `ia`/`ja`.
const IPARM_ZERO_BASED: usize = 34;

/// Maps a PARDISO error code to its documented meaning.
fn describe(error: c_int) -> &'static str {
    match error {
        -1 => "input inconsistent",
        -2 => "not enough memory",
        -3 => "reordering problem",
        -4 => "zero pivot, numerical factorization or iterative refinement problem",
        -5 => "unclassified (internal) error",
        -6 => "reordering failed",
        -7 => "diagonal matrix is singular",
        -8 => "32-bit integer overflow problem",
        -9 => "not enough memory for out-of-core solver",
        -10 => "error opening out-of-core files",
        -11 => "read/write error with out-of-core files",
        _ => "unknown error",
    }
}

/// Interprets the `error` output of a PARDISO call.
fn classify(error: c_int) -> Option<SolverFailure> {
    let message = format!("PARDISO error {error}: {}", describe(error));
    match error {
        0 => None,
        -2 | -9 => Some(SolverFailure::OutOfMemory(message)),
        _ => Some(SolverFailure::Other(message)),
    }
}

/// PARDISO from Intel MKL, for compressed sparse row matrices.
#[derive(Debug, Default, Clone, Copy)]
pub struct PardisoSolver;

impl PardisoSolver {
    pub fn new() -> Self {
        Self
    }

    fn index(&self, value: usize) -> Result<c_int, BenchError> {
        c_int::try_from(value).map_err(|_| {
            BenchErrorKind::Solver {
                backend: Backend::Mkl,
                message: format!("index {value} does not fit a 32-bit PARDISO integer"),
            }
            .into()
        })
    }
}

impl DirectSolver for PardisoSolver {
    fn backend(&self) -> Backend {
        Backend::Mkl
    }

    fn solve(&self, matrix: &SparseMatrix, rhs: MatRef<'_, f64>) -> Result<SolveOutcome, BenchError> {
        check_system(Backend::Mkl, matrix, rhs)?;
        let SparseMatrix::Csr(a) = matrix else {
            unreachable!("check_system accepted a non-CSR matrix for mkl");
        };
        let a = a.as_ref();

        let n = self.index(a.nrows())?;
        let ia = a
            .symbolic()
            .row_ptr()
            .iter()
            .map(|&p| self.index(p))
            .collect::<Result<Vec<_>, _>>()?;
        let ja = a
            .symbolic()
            .col_idx()
            .iter()
            .map(|&j| self.index(j))
            .collect::<Result<Vec<_>, _>>()?;
        let values = a.val();

        let mut b: Vec<f64> = (0..rhs.nrows()).map(|i| rhs[(i, 0)]).collect();
        let mut x = vec![0.0f64; rhs.nrows()];

        let mut pt: [*mut c_void; 64] = [ptr::null_mut(); 64];
        let mut iparm: [c_int; 64] = [0; 64];
        let mut perm: Vec<c_int> = vec![0; a.nrows()];
        let (maxfct, mnum, nrhs, msglvl) = (1, 1, 1, 0);
        let mtype = MTYPE_REAL_UNSYMMETRIC;
        let mut error: c_int = 0;
        let mut release_error: c_int = 0;

        // SAFETY: every pointer refers to a live buffer of the size PARDISO expects:
        // `pt` and `iparm` hold 64 entries, `ia` holds n + 1, `ja` and `values` hold nnz,
        // and `perm`, `b`, `x` hold n. The handle is released before the buffers drop.
        unsafe {
            pardisoinit(pt.as_mut_ptr(), &mtype, iparm.as_mut_ptr());
            iparm[IPARM_ZERO_BASED] = 1;

            pardiso(
                pt.as_mut_ptr(),
                &maxfct,
                &mnum,
                &mtype,
                &PHASE_SOLVE,
                &n,
                values.as_ptr() as *const c_void,
                ia.as_ptr(),
                ja.as_ptr(),
                perm.as_mut_ptr(),
                &nrhs,
                iparm.as_mut_ptr(),
                &msglvl,
                b.as_mut_ptr() as *mut c_void,
                x.as_mut_ptr() as *mut c_void,
                &mut error,
            );

            pardiso(
                pt.as_mut_ptr(),
                &maxfct,
                &mnum,
                &mtype,
                &PHASE_RELEASE,
                &n,
                ptr::null(),
                ia.as_ptr(),
                ja.as_ptr(),
                perm.as_mut_ptr(),
                &nrhs,
                iparm.as_mut_ptr(),
                &msglvl,
                ptr::null_mut(),
                ptr::null_mut(),
                &mut release_error,
            );
        }

        if release_error != 0 {
            log::warn!(
                "PARDISO failed to release its memory, error {release_error}: {}",
                describe(release_error)
            );
        }
        if let Some(failure) = classify(error) {
            return failure_outcome(Backend::Mkl, failure);
        }

        Ok(SolveOutcome::Solved(Mat::from_fn(x.len(), 1, |i, _| x[i])))
    }
}

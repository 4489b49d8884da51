//! This module defines the sparse matrix container handed from the loader to the solvers.
//!
//! The solver libraries disagree on the storage they consume: PARDISO works on
//! compressed sparse rows, while the LU backends factorize compressed sparse columns.
//! [`SparseMatrix`] keeps whichever of the two [`faer`] representations was requested
//! at load time, tagged by its [`Layout`], so no conversion ever happens between the
//! loader and the solve call being timed.

use crate::error::{BenchError, BenchErrorKind};
use faer::{
    Mat,
    sparse::{SparseColMat, SparseRowMat},
};
use std::{fmt, str::FromStr};

/// Compressed storage layout of a sparse matrix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layout {
    /// Compressed sparse rows.
    Csr,
    /// Compressed sparse columns.
    Csc,
}

impl Layout {
    pub fn as_str(&self) -> &'static str {
        match self {
            Layout::Csr => "csr",
            Layout::Csc => "csc",
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Layout {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "csr" => Ok(Layout::Csr),
            "csc" => Ok(Layout::Csc),
            other => Err(BenchErrorKind::InvalidFormat(other.to_string()).into()),
        }
    }
}

/// A loaded sparse matrix in the storage layout its solver expects.
///
/// # Implementation Notes
///
/// We use `usize` for the matrix indices (`I` in `SparseColMat<I, T>`), matching the
/// index type produced by triplet assembly.
#[derive(Debug, Clone)]
pub enum SparseMatrix {
    Csr(SparseRowMat<usize, f64>),
    Csc(SparseColMat<usize, f64>),
}

impl SparseMatrix {
    pub fn layout(&self) -> Layout {
        match self {
            SparseMatrix::Csr(_) => Layout::Csr,
            SparseMatrix::Csc(_) => Layout::Csc,
        }
    }

    pub fn nrows(&self) -> usize {
        match self {
            SparseMatrix::Csr(a) => a.nrows(),
            SparseMatrix::Csc(a) => a.nrows(),
        }
    }

    pub fn ncols(&self) -> usize {
        match self {
            SparseMatrix::Csr(a) => a.ncols(),
            SparseMatrix::Csc(a) => a.ncols(),
        }
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        match self {
            SparseMatrix::Csr(a) => a.symbolic().compute_nnz(),
            SparseMatrix::Csc(a) => a.symbolic().compute_nnz(),
        }
    }

    pub fn is_square(&self) -> bool {
        self.nrows() == self.ncols()
    }

    /// The `"{rows}x{cols}"` string recorded in the result log.
    pub fn dimensions(&self) -> String {
        format!("{}x{}", self.nrows(), self.ncols())
    }

    /// Sparse-matrix times dense-matrix product `A * rhs`.
    ///
    /// # Panics
    ///
    /// Panics if `rhs` does not have `self.ncols()` rows.
    pub fn mul_dense(&self, rhs: &Mat<f64>) -> Mat<f64> {
        assert_eq!(
            self.ncols(),
            rhs.nrows(),
            "Dimension mismatch: matrix columns ({}) do not match vector rows ({}).",
            self.ncols(),
            rhs.nrows(),
        );
        match self {
            SparseMatrix::Csr(a) => a * rhs,
            SparseMatrix::Csc(a) => a * rhs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faer::{mat, sparse::Triplet};

    fn triplets() -> Vec<Triplet<usize, usize, f64>> {
        vec![
            Triplet::new(0, 0, 4.0),
            Triplet::new(0, 2, 1.0),
            Triplet::new(1, 1, 3.0),
            Triplet::new(2, 0, -1.0),
            Triplet::new(2, 2, 5.0),
        ]
    }

    #[test]
    fn test_layout_parsing() {
        assert_eq!("csr".parse::<Layout>().unwrap(), Layout::Csr);
        assert_eq!("csc".parse::<Layout>().unwrap(), Layout::Csc);
        let err = "coo".parse::<Layout>().unwrap_err();
        assert!(matches!(err.kind(), BenchErrorKind::InvalidFormat(s) if s == "coo"));
    }

    #[test]
    fn test_both_layouts_agree_on_product() {
        let csc = SparseMatrix::Csc(SparseColMat::try_new_from_triplets(3, 3, &triplets()).unwrap());
        let csr = SparseMatrix::Csr(SparseRowMat::try_new_from_triplets(3, 3, &triplets()).unwrap());
        let x: Mat<f64> = mat![[1.0], [2.0], [3.0]];

        let expected: Mat<f64> = mat![[7.0], [6.0], [14.0]];
        assert_eq!(csc.mul_dense(&x), expected);
        assert_eq!(csr.mul_dense(&x), expected);
    }

    #[test]
    fn test_metadata() {
        let a = SparseMatrix::Csc(SparseColMat::try_new_from_triplets(3, 3, &triplets()).unwrap());
        assert_eq!(a.layout(), Layout::Csc);
        assert_eq!(a.nnz(), 5);
        assert_eq!(a.dimensions(), "3x3");
        assert!(a.is_square());
    }

    #[test]
    #[should_panic(expected = "Dimension mismatch: matrix columns (3) do not match vector rows (2).")]
    fn test_dimension_mismatch_panic() {
        let a = SparseMatrix::Csc(SparseColMat::try_new_from_triplets(3, 3, &triplets()).unwrap());
        let x: Mat<f64> = mat![[1.0], [2.0]];
        a.mul_dense(&x);
    }
}

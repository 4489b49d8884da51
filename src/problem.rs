//! Construction of benchmark problems with a known exact solution.
//!
//! The right-hand side is synthesized as `b = A * x_e` with `x_e` the all-ones vector,
//! so the accuracy of any computed solution can be measured against `x_e` without an
//! external reference solution.

use crate::matrix::SparseMatrix;
use faer::{Mat, MatRef};

/// A matrix paired with its synthesized right-hand side.
pub struct Problem {
    pub matrix: SparseMatrix,
    pub rhs: Mat<f64>,
}

impl Problem {
    /// Takes ownership of `matrix` and builds `rhs = matrix * ones`.
    pub fn new(matrix: SparseMatrix) -> Self {
        let rhs = build_rhs(&matrix);
        Self { matrix, rhs }
    }
}

/// The exact solution `[1, 1, ..., 1]^T` of length `n`.
pub fn exact_solution(n: usize) -> Mat<f64> {
    Mat::from_fn(n, 1, |_, _| 1.0)
}

/// Builds the right-hand side `b = A * x_e` through a sparse-dense product.
pub fn build_rhs(matrix: &SparseMatrix) -> Mat<f64> {
    let xe = exact_solution(matrix.ncols());
    matrix.mul_dense(&xe)
}

/// Relative error `||x_e - x||_2 / ||x_e||_2` between the exact and computed solutions.
pub fn relative_error(exact: MatRef<'_, f64>, computed: MatRef<'_, f64>) -> f64 {
    (exact - computed).norm_l2() / exact.norm_l2()
}

#[cfg(test)]
mod tests {
    use super::*;
    use faer::{
        mat,
        sparse::{SparseColMat, Triplet},
    };

    #[test]
    fn test_rhs_is_row_sums() {
        let triplets = vec![
            Triplet::new(0, 0, 2.0),
            Triplet::new(0, 1, -1.0),
            Triplet::new(1, 0, -1.0),
            Triplet::new(1, 1, 2.0),
            Triplet::new(1, 2, -1.0),
            Triplet::new(2, 1, -1.0),
            Triplet::new(2, 2, 2.0),
        ];
        let a = SparseMatrix::Csc(SparseColMat::try_new_from_triplets(3, 3, &triplets).unwrap());
        let problem = Problem::new(a);

        let expected: Mat<f64> = mat![[1.0], [0.0], [1.0]];
        assert_eq!(problem.rhs, expected);
    }

    #[test]
    fn test_rhs_of_rectangular_matrix_has_row_count() {
        let triplets = vec![Triplet::new(0, 0, 1.0), Triplet::new(1, 2, 3.0)];
        let a = SparseMatrix::Csc(SparseColMat::try_new_from_triplets(2, 3, &triplets).unwrap());
        let rhs = build_rhs(&a);
        assert_eq!(rhs.nrows(), 2);
        assert_eq!(rhs.ncols(), 1);
    }

    #[test]
    fn test_relative_error_of_exact_solution_is_zero() {
        let xe = exact_solution(5);
        assert_eq!(relative_error(xe.as_ref(), xe.as_ref()), 0.0);
    }

    #[test]
    fn test_relative_error_value() {
        let xe = exact_solution(4);
        let x: Mat<f64> = mat![[1.0], [1.0], [1.0], [3.0]];
        // ||(0, 0, 0, -2)|| / ||(1, 1, 1, 1)|| = 2 / 2
        assert!((relative_error(xe.as_ref(), x.as_ref()) - 1.0).abs() < 1e-15);
    }
}

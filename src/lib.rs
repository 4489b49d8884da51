//! Benchmark harness for sparse direct linear solvers.
//!
//! This crate measures how long three sparse direct solver libraries take to solve
//! `A x = b` for a corpus of Matrix Market matrices, and how accurate the solutions are.
//! The right-hand side is built as `b = A * x_e` with `x_e = [1, ..., 1]^T`, so the
//! relative error `||x_e - x||_2 / ||x_e||_2` is known exactly for every computed `x`.
//!
//! ## Solver libraries
//!
//! | id        | storage | library                                   | cargo feature |
//! |-----------|---------|-------------------------------------------|---------------|
//! | `umfpack` | CSC     | SuiteSparse UMFPACK (via `russell_sparse`) | `umfpack`     |
//! | `superlu` | CSC     | SuperLU `dgssv` (via `superlu-sys`)        | `superlu`     |
//! | `mkl`     | CSR     | Intel MKL PARDISO                         | `mkl`         |
//!
//! A library left out of the build is reported as unavailable. Only `umfpack` recovers
//! from running out of memory; the run then records a relative error of `-1` and moves
//! on to the next matrix.
//!
//! ## Pipeline
//!
//! Each benchmark iteration is strictly linear:
//!
//! 1. [`utils::data_loader::load_matrix`] reads a `.mtx` file in the layout of the solver.
//! 2. [`problem::Problem::new`] computes the right-hand side with a sparse-dense product.
//! 3. [`backends::timed_solve`] runs the solver, timing only the library call.
//! 4. [`runner::run`] scores the solution and stores a [`runner::RunResult`].
//! 5. [`results::log_results`] appends the results to a CSV file.
//!
//! ## Example Usage
//!
//! ```rust
//! use faer::sparse::{SparseColMat, Triplet};
//! use solver_bench::{
//!     backends::{Backend, SolveOutcome, probe_capabilities, solver_for, timed_solve},
//!     matrix::SparseMatrix,
//!     problem::{Problem, exact_solution, relative_error},
//! };
//!
//! let triplets = vec![
//!     Triplet::new(0, 0, 4.0),
//!     Triplet::new(0, 1, -1.0),
//!     Triplet::new(1, 0, -1.0),
//!     Triplet::new(1, 1, 4.0),
//! ];
//! let a = SparseColMat::try_new_from_triplets(2, 2, &triplets).unwrap();
//! let problem = Problem::new(SparseMatrix::Csc(a));
//!
//! for backend in probe_capabilities().available() {
//!     if backend != Backend::Umfpack && backend != Backend::SuperLu {
//!         continue;
//!     }
//!     let solver = solver_for(backend).unwrap();
//!     let (outcome, _timing) =
//!         timed_solve(solver.as_ref(), &problem.matrix, problem.rhs.as_ref()).unwrap();
//!     if let SolveOutcome::Solved(x) = outcome {
//!         let err = relative_error(exact_solution(2).as_ref(), x.as_ref());
//!         assert!(err < 1e-12);
//!     }
//! }
//! ```

pub mod backends;
pub mod config;
pub mod error;
pub mod matrix;
pub mod problem;
pub mod results;
pub mod runner;
pub mod utils;

pub use backends::{Backend, DirectSolver, SolveOutcome, solver_for};
pub use config::BenchConfig;
pub use error::{BenchError, BenchErrorKind};
pub use results::{ResultDestination, SystemTag, log_results};
pub use runner::{ProblemClass, RunResult, run};

//! This module defines the custom error types for the library.
//!
//! Every failure the harness can report, apart from matrix parsing, is
//! collected in a single enum: [`BenchErrorKind`], exposed through the opaque
//! [`BenchError`] wrapper. Parsing failures keep their own, more detailed type
//! ([`DataLoaderError`]) and are wrapped here when they cross the runner.
//!
//! Using the [`thiserror`] crate allows us to create idiomatic error types with minimal
//! boilerplate. The native libraries report failures as status codes or static strings,
//! so solver failures are stored by their rendered message.
use crate::{backends::Backend, utils::data_loader::DataLoaderError};
use thiserror::Error;

/// Represents all possible errors that can occur while configuring or running a benchmark.
#[derive(Error, Debug)]
#[error(transparent)]
pub struct BenchError(#[from] BenchErrorKind);

/// The distinct kinds of errors.
#[derive(Error, Debug)]
pub enum BenchErrorKind {
    /// A storage layout other than `csr` or `csc` was requested.
    #[error("Invalid matrix format: expected one of 'csr', 'csc', got '{0}' instead.")]
    InvalidFormat(String),

    /// A solver library name outside `{mkl, superlu, umfpack}`, or an argument
    /// that does not fit the selected backend.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The number of benchmark runs must be at least one.
    #[error("Number of runs must be >= 1, got {0} instead.")]
    InvalidRunCount(i64),

    /// The backend was not compiled into this binary.
    #[error("Solver library '{0}' is not available in this build.")]
    BackendUnavailable(Backend),

    /// Wraps a failure raised by the numerical backend itself.
    #[error("Solver library '{backend}' failed: {message}")]
    Solver { backend: Backend, message: String },

    /// Wraps a matrix loading failure.
    #[error("Failed to load matrix '{path}': {source}")]
    Load {
        path: String,
        #[source]
        source: DataLoaderError,
    },

    /// Wraps a failure while writing the result log.
    #[error("Failed to write results to '{path}': {source}")]
    ResultLog {
        path: String,
        #[source]
        source: csv::Error,
    },
}

impl BenchError {
    /// Returns the kind of failure, for callers that need to branch on it.
    pub fn kind(&self) -> &BenchErrorKind {
        &self.0
    }
}

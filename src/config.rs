//! Validated benchmark configuration.
//!
//! Command-line values arrive as raw strings and integers. [`BenchConfig::new`] checks
//! them before anything touches the filesystem, so a bad library name or run count
//! stops the process before a single matrix is read.

use crate::{
    backends::Backend,
    error::{BenchError, BenchErrorKind},
    results::{ResultDestination, SystemTag},
    runner::ProblemClass,
    utils::data_loader::{DataLoaderError, discover_matrices},
};
use std::path::PathBuf;

/// Base name of the result log when none is given.
pub const DEFAULT_LOG_NAME: &str = "rust-result-log";

/// Everything a benchmark invocation needs to know.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchConfig {
    pub backend: Backend,
    pub num_runs: usize,
    /// Folder holding the `matrici_def_pos` and `matrici_non_def_pos` corpora.
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub log_name: String,
}

impl BenchConfig {
    /// Validates the library name and the number of runs.
    pub fn new(library: &str, num_runs: i64) -> Result<Self, BenchError> {
        let backend: Backend = library.parse()?;
        if num_runs < 1 {
            return Err(BenchErrorKind::InvalidRunCount(num_runs).into());
        }
        let num_runs = usize::try_from(num_runs)
            .map_err(|_| BenchErrorKind::InvalidArgument(format!("too many runs: {num_runs}")))?;

        Ok(Self {
            backend,
            num_runs,
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("."),
            log_name: DEFAULT_LOG_NAME.to_string(),
        })
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_log_name(mut self, log_name: impl Into<String>) -> Self {
        self.log_name = log_name.into();
        self
    }

    /// Folder of the corpus for `class`.
    pub fn corpus_dir(&self, class: ProblemClass) -> PathBuf {
        self.data_dir.join(class.corpus_dir())
    }

    /// Sorted `.mtx` files of the corpus for `class`.
    pub fn corpus(&self, class: ProblemClass) -> Result<Vec<PathBuf>, DataLoaderError> {
        discover_matrices(self.corpus_dir(class))
    }

    /// Result log for the platform this binary runs on.
    pub fn destination(&self) -> ResultDestination {
        self.destination_for(SystemTag::current())
    }

    pub fn destination_for(&self, system: SystemTag) -> ResultDestination {
        ResultDestination::new(&self.output_dir, system, &self.log_name)
    }
}

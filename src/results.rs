//! Persistence of benchmark results.
//!
//! Results go to an append-only CSV file. The header row is written only when the file
//! is created, so invocations across separate processes accumulate rows in one table.

use crate::{
    error::{BenchError, BenchErrorKind},
    runner::{FAILED_SOLVE_ERROR, RunResult},
};
use serde::{Serialize, Serializer};
use std::{
    fmt,
    fs::OpenOptions,
    path::{Path, PathBuf},
};

/// Platform tag recorded with every row and used in the file name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemTag {
    /// Linux hosts.
    Ubuntu,
    /// Every other host.
    Windows,
}

impl SystemTag {
    /// The tag of the platform this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(target_os = "linux") {
            SystemTag::Ubuntu
        } else {
            SystemTag::Windows
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SystemTag::Ubuntu => "ubuntu",
            SystemTag::Windows => "windows",
        }
    }
}

impl fmt::Display for SystemTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a set of results is written: `{dir}/{system}-{base_name}.csv`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultDestination {
    system: SystemTag,
    path: PathBuf,
}

impl ResultDestination {
    pub fn new(dir: impl AsRef<Path>, system: SystemTag, base_name: &str) -> Self {
        let path = dir.as_ref().join(format!("{system}-{base_name}.csv"));
        Self { system, path }
    }

    pub fn system(&self) -> SystemTag {
        self.system
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// One row of the result log. Field order is the column order of the file.
#[derive(Debug, Serialize)]
struct LogRow<'a> {
    matrix: &'a str,
    dimensions: &'a str,
    #[serde(rename = "type")]
    matrix_type: &'a str,
    start_time: f64,
    end_time: f64,
    #[serde(serialize_with = "serialize_rel_error")]
    rel_error: f64,
    system: &'a str,
    library: &'a str,
    umfpack_error: u8,
}

/// Writes the failed-solve sentinel as the integer `-1`, every other error as a float.
fn serialize_rel_error<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if *value == FAILED_SOLVE_ERROR {
        serializer.serialize_i64(-1)
    } else {
        serializer.serialize_f64(*value)
    }
}

impl<'a> LogRow<'a> {
    fn new(result: &'a RunResult, system: SystemTag) -> Self {
        Self {
            matrix: &result.matrix_name,
            dimensions: &result.matrix_dimensions,
            matrix_type: result.matrix_type.as_str(),
            start_time: result.start_time,
            end_time: result.end_time,
            rel_error: result.relative_error,
            system: system.as_str(),
            library: result.solver_library.as_str(),
            umfpack_error: u8::from(result.umfpack_error),
        }
    }
}

/// The header written when the log file is created.
pub const CSV_FIELDS: [&str; 9] = [
    "matrix",
    "dimensions",
    "type",
    "start_time",
    "end_time",
    "rel_error",
    "system",
    "library",
    "umfpack_error",
];

/// Appends `results` to the log at `destination`.
///
/// Does nothing, not even opening the file, when `results` is empty. A missing file is
/// created with the [`CSV_FIELDS`] header first; an existing one only gets new rows.
pub fn log_results(results: &[RunResult], destination: &ResultDestination) -> Result<(), BenchError> {
    if results.is_empty() {
        return Ok(());
    }

    let path = destination.path();
    let wrap = |source: csv::Error| {
        BenchError::from(BenchErrorKind::ResultLog {
            path: path.display().to_string(),
            source,
        })
    };

    let write_header = !path.is_file();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| wrap(e.into()))?;

    log::info!("Saving to {}", path.display());
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    if write_header {
        writer.write_record(CSV_FIELDS).map_err(wrap)?;
    }
    for result in results {
        writer
            .serialize(LogRow::new(result, destination.system()))
            .map_err(wrap)?;
    }
    writer.flush().map_err(|e| wrap(e.into()))?;
    log::info!("Saved!");
    Ok(())
}

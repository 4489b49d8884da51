//! Common utilities for data loading, performance measurement and operator interaction.
//!
//! - **`data_loader`**: Parses Matrix Market (.mtx) files into the compressed layout
//!   a solver library expects, and discovers the matrix files of a corpus folder.
//!
//! - **`perf`**: Wall-clock timestamps for the result log and a Linux-only reader for
//!   the peak resident set size of the process.
//!
//! - **`prompt`**: The blocking confirmation asked before a benchmark starts, which
//!   leaves time to attach a profiler to the process.
//!

pub mod data_loader;
pub mod perf;
pub mod prompt;

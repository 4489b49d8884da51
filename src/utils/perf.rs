//! Performance measurement utilities for memory and timing analysis.
//!
//! Solve timings are recorded as UNIX timestamps so rows from different processes
//! and machines can be put on the same time axis. Peak memory is read from
//! /proc/self/status on Linux to watch the footprint of long corpus runs.

use std::time::{SystemTime, UNIX_EPOCH};

/// Seconds since the UNIX epoch, with sub-second precision.
///
/// Returns 0.0 if the system clock is set before the epoch.
pub fn unix_timestamp() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// Reads the peak resident set size (VmHWM) from /proc/self/status on Linux.
///
/// # Returns
/// The peak memory usage in kilobytes (KB), or 0 if the value cannot be read
/// or the platform is not Linux.
#[cfg(target_os = "linux")]
pub fn get_peak_rss_kb() -> u64 {
    let status_content = match std::fs::read_to_string("/proc/self/status") {
        Ok(content) => content,
        Err(_) => return 0,
    };

    status_content
        .lines()
        .find(|line| line.starts_with("VmHWM:"))
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|value| value.parse().ok())
        .unwrap_or(0)
}

/// A dummy implementation for non-Linux platforms to ensure the code compiles.
#[cfg(not(target_os = "linux"))]
pub fn get_peak_rss_kb() -> u64 {
    use std::sync::Once;
    static WARN_ONCE: Once = Once::new();
    WARN_ONCE.call_once(|| {
        log::warn!("Peak RSS measurement is only supported on Linux; returning 0.");
    });
    0
}

//! Step-by-step search traces.
//!
//! When the `trace` feature is enabled, every decision the branch-and-bound
//! engine takes is written to a `TraceWriter`. Tests use the trace to check
//! properties of a run (bound monotonicity, visit order) without hooking into
//! the engine itself.
//!
//! The trace output format is a series of tagged lines:
//! ```text
//! TRACE EVAL depth=<d> box=[<xlo>,<xhi>]x[<ylo>,<yhi>] lo=<val> hi=<val>
//! TRACE PRUNE depth=<d> lo=<val> min_ub=<val>
//! TRACE TIGHTEN old=<val> new=<val> purged=<n>
//! TRACE RECORD depth=<d> lo=<val> hi=<val>
//! TRACE SPLIT depth=<d>
//! ```

use std::fmt::Write as FmtWrite;
use std::io::Write;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A thread-safe buffer that collects trace lines.
pub struct TraceWriter {
    buffer: Mutex<String>,
}

impl TraceWriter {
    pub fn new() -> Self {
        Self {
            buffer: Mutex::new(String::with_capacity(16 * 1024)),
        }
    }

    // A panic while holding the lock leaves whole lines behind, so a
    // poisoned buffer is still readable.
    fn lock(&self) -> MutexGuard<'_, String> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Write a trace line.
    pub fn write_line(&self, line: &str) {
        let mut buf = self.lock();
        buf.push_str(line);
        buf.push('\n');
    }

    /// Write a trace line using format args.
    pub fn write_fmt(&self, args: std::fmt::Arguments<'_>) {
        let mut buf = self.lock();
        let _ = buf.write_fmt(args);
        buf.push('\n');
    }

    pub fn get_output(&self) -> String {
        self.lock().clone()
    }

    pub fn get_lines(&self) -> Vec<String> {
        self.lock().lines().map(|s| s.to_string()).collect()
    }

    /// Lines carrying the given tag, e.g. `"TIGHTEN"`.
    pub fn lines_tagged(&self, tag: &str) -> Vec<String> {
        let prefix = format!("TRACE {} ", tag);
        self.lock()
            .lines()
            .filter(|l| l.starts_with(&prefix))
            .map(|s| s.to_string())
            .collect()
    }

    pub fn dump_to_stderr(&self) {
        let buf = self.lock();
        let _ = std::io::stderr().write_all(buf.as_bytes());
    }
}

impl Default for TraceWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract `key=<value>` from a trace line.
pub fn trace_field<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let prefix = format!("{}=", key);
    line.split_whitespace()
        .find_map(|tok| tok.strip_prefix(prefix.as_str()))
}

/// Conditional trace output (only active with the `trace` feature).
#[cfg(feature = "trace")]
#[macro_export]
macro_rules! trace_write {
    ($tracer:expr, $($arg:tt)*) => {
        if let Some(ref tw) = $tracer {
            tw.write_fmt(format_args!($($arg)*));
        }
    };
}

/// No-op when the `trace` feature is disabled.
#[cfg(not(feature = "trace"))]
#[macro_export]
macro_rules! trace_write {
    ($tracer:expr, $($arg:tt)*) => {};
}

/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use super::types::RqHandle;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Scheduler errors with serialization support
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum IoSchedError {
    #[error("Out of memory: could not reserve {requested} request slots")]
    #[diagnostic(
        code(iosched::out_of_memory),
        help("Lower the initial queue capacity or free memory before creating the scheduler.")
    )]
    OutOfMemory { requested: usize },

    #[error("Request {0} is not queued")]
    #[diagnostic(
        code(iosched::not_queued),
        help("The request was already dispatched or merged away. Merge only resident requests.")
    )]
    NotQueued(RqHandle),

    #[error("Unknown tunable: {0}")]
    #[diagnostic(
        code(iosched::unknown_tunable),
        help("Valid keys: sync_read_expire, sync_write_expire, async_read_expire, async_write_expire, fifo_batch, sleep_latency_multiple.")
    )]
    UnknownTunable(String),

    #[error("Trace line {line}: {message}")]
    #[diagnostic(
        code(iosched::trace),
        help("Each trace line must be a JSON object with `at` and `op` fields.")
    )]
    Trace { line: usize, message: String },

    #[error("I/O error: {0}")]
    #[diagnostic(code(iosched::io), help("Check that the file exists and is readable."))]
    Io(String),
}

impl From<std::io::Error> for IoSchedError {
    fn from(err: std::io::Error) -> Self {
        IoSchedError::Io(err.to_string())
    }
}

/// Result alias for scheduler operations
pub type IoSchedResult<T> = Result<T, IoSchedError>;

/*!
 * Core Module
 * Fundamental scheduler types, limits, time base and error handling
 */

pub mod errors;
pub mod limits;
pub mod time;
pub mod types;

// Re-export for convenience
pub use errors::*;
pub use time::{msecs_to_ticks, ticks_to_msecs, Clock, ManualClock, MonotonicClock};
pub use types::*;

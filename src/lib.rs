/*!
 * Marrow I/O Scheduler Library
 *
 * Block-device request scheduler: per-class FIFOs with deadlines, batched
 * expiry sweeps, and a read/write bias driven by the display state.
 */

pub mod block;
pub mod core;
pub mod iosched;
pub mod monitoring;
pub mod signal;
pub mod trace;

// Re-exports
pub use crate::core::errors::{IoSchedError, IoSchedResult};
pub use crate::core::time::{Clock, ManualClock, MonotonicClock};
pub use crate::core::types::{Direction, RequestClass, RequestId, RqHandle, Tick};
pub use block::DeviceQueue;
pub use iosched::{
    Admission, Elevator, IoSchedStats, MarrowScheduler, Request, TunableKey, Tunables,
    TunablesConfig,
};
pub use monitoring::init_tracing;
pub use signal::{DisplayState, InteractiveSignal};
pub use trace::{load_trace, parse_trace, ReplayReport, Replayer, TraceEvent, TraceOp};

/*!
 * Scheduler Limits and Defaults
 *
 * Centralized location for tunable defaults, clamp bounds and the tick rate.
 * Time values are milliseconds unless the name says otherwise.
 */

// =============================================================================
// TIME BASE
// =============================================================================

/// Ticks per second of the scheduler's monotonic clock
pub const TICK_HZ: u64 = 250;

// =============================================================================
// BATCHING
// =============================================================================

/// Normal dispatches between expiry sweeps while interactive at init
pub const DEFAULT_FIFO_BATCH: u32 = 4;

/// Normal dispatches between expiry sweeps when initialized with the display off
pub const DEFAULT_FIFO_BATCH_SCREEN_OFF: u32 = 40;

/// Admission check multiplier while the display is off
pub const DEFAULT_SLEEP_LATENCY_MULTIPLE: u32 = 50;

// =============================================================================
// EXPIRY (milliseconds)
// =============================================================================

pub const DEFAULT_SYNC_READ_EXPIRE_MS: u64 = 500;
pub const DEFAULT_SYNC_WRITE_EXPIRE_MS: u64 = 2_000;
pub const DEFAULT_ASYNC_READ_EXPIRE_MS: u64 = 4_000;
pub const DEFAULT_ASYNC_WRITE_EXPIRE_MS: u64 = 16_000;

// =============================================================================
// STORE CLAMPS
// =============================================================================

/// Lower bound for expire fields (0 disables tracking for the class)
pub const MIN_EXPIRE_MS: i64 = 0;

/// Lower bound for count fields
pub const MIN_COUNT: i64 = 1;

/// Upper bound for every tunable
pub const MAX_TUNABLE: i64 = i32::MAX as i64;

// =============================================================================
// ARENA
// =============================================================================

/// Request slots reserved by `init` before the first admission
pub const DEFAULT_QUEUE_CAPACITY: usize = 128;

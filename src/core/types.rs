/*!
 * Core Types
 * Common types used across the scheduler
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Monotonic time unit used for deadlines (see [`TICK_HZ`](super::limits::TICK_HZ))
pub type Tick = u64;

/// Caller-assigned request identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rq#{}", self.0)
    }
}

/// Stable handle to a queued request
///
/// Handles are generational: once the request leaves the scheduler, its
/// handle stops resolving even if the slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RqHandle {
    index: u32,
    generation: u32,
}

impl RqHandle {
    #[inline(always)]
    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    #[inline(always)]
    pub(crate) const fn index(self) -> usize {
        self.index as usize
    }

    #[inline(always)]
    pub(crate) const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for RqHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// Data direction of a request
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Read = 0,
    Write = 1,
}

impl Direction {
    /// The other direction
    #[inline(always)]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Read => Self::Write,
            Self::Write => Self::Read,
        }
    }

    #[inline(always)]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
        }
    }
}

/// One of the four (sync/async x read/write) request classes
///
/// # Performance
/// - Two-byte value, indexes directly into per-class tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestClass {
    pub synchronous: bool,
    pub direction: Direction,
}

impl RequestClass {
    pub const SYNC_READ: Self = Self::new(true, Direction::Read);
    pub const SYNC_WRITE: Self = Self::new(true, Direction::Write);
    pub const ASYNC_READ: Self = Self::new(false, Direction::Read);
    pub const ASYNC_WRITE: Self = Self::new(false, Direction::Write);

    /// All classes in index order
    pub const ALL: [Self; 4] = [
        Self::ASYNC_READ,
        Self::ASYNC_WRITE,
        Self::SYNC_READ,
        Self::SYNC_WRITE,
    ];

    pub const fn new(synchronous: bool, direction: Direction) -> Self {
        Self {
            synchronous,
            direction,
        }
    }

    /// Synchronous class for `direction`
    pub const fn sync(direction: Direction) -> Self {
        Self::new(true, direction)
    }

    /// Asynchronous class for `direction`
    pub const fn async_(direction: Direction) -> Self {
        Self::new(false, direction)
    }

    /// Dense index in `0..4`, laid out as `[sync][dir]`
    #[inline(always)]
    pub const fn index(self) -> usize {
        (self.synchronous as usize) << 1 | self.direction as usize
    }

    pub const fn as_str(&self) -> &'static str {
        match (self.synchronous, self.direction) {
            (true, Direction::Read) => "sync_read",
            (true, Direction::Write) => "sync_write",
            (false, Direction::Read) => "async_read",
            (false, Direction::Write) => "async_write",
        }
    }
}

impl fmt::Display for RequestClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

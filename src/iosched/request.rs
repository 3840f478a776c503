/*!
 * Request Record
 * Per-request metadata the scheduler classifies and stamps
 */

use crate::core::types::{Direction, RequestClass, RequestId, RqHandle, Tick};
use serde::{Deserialize, Serialize};

/// Block I/O request as seen by the scheduler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub id: RequestId,
    /// Starting sector, carried for the caller
    pub sector: u64,
    class: RequestClass,
    deadline: Tick,
}

impl Request {
    pub fn new(id: u64, class: RequestClass) -> Self {
        Self {
            id: RequestId(id),
            sector: 0,
            class,
            deadline: 0,
        }
    }

    pub fn read(id: u64, synchronous: bool) -> Self {
        Self::new(id, RequestClass::new(synchronous, Direction::Read))
    }

    pub fn write(id: u64, synchronous: bool) -> Self {
        Self::new(id, RequestClass::new(synchronous, Direction::Write))
    }

    pub fn at_sector(mut self, sector: u64) -> Self {
        self.sector = sector;
        self
    }

    #[inline(always)]
    pub fn class(&self) -> RequestClass {
        self.class
    }

    #[inline(always)]
    pub fn is_sync(&self) -> bool {
        self.class.synchronous
    }

    #[inline(always)]
    pub fn direction(&self) -> Direction {
        self.class.direction
    }

    /// Tick after which the request is overdue; 0 until admitted
    #[inline(always)]
    pub fn deadline(&self) -> Tick {
        self.deadline
    }

    pub(crate) fn set_deadline(&mut self, deadline: Tick) {
        self.deadline = deadline;
    }
}

/// Outcome of admitting a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Appended to its class FIFO
    Queued(RqHandle),
    /// Not tracked: the active timeout for its class is zero, so ownership
    /// goes straight back to the caller
    Untracked(Request),
}

impl Admission {
    pub fn handle(&self) -> Option<RqHandle> {
        match self {
            Self::Queued(handle) => Some(*handle),
            Self::Untracked(_) => None,
        }
    }

    pub fn is_queued(&self) -> bool {
        matches!(self, Self::Queued(_))
    }
}

/*!
 * Marrow I/O Scheduler
 *
 * Four class FIFOs (sync/async x read/write) with per-request deadlines.
 * Dispatch normally follows a class priority that leans toward reads while
 * the display is on; every `fifo_batch` normal dispatches an expiry sweep
 * forces the oldest overdue request through instead.
 */

mod batch;
mod config;
mod expiry;
mod fifo;
mod operations;
mod policy;
mod request;
mod stats;
mod traits;

pub use batch::BatchCounter;
pub use config::{parse_leading_int, TunableKey, Tunables, TunablesConfig};
pub use expiry::{is_expired, stamp};
pub use policy::{normal_order, preferred_direction, sweep_order};
pub use request::{Admission, Request};
pub use stats::{AtomicIoSchedStats, IoSchedStats};
pub use traits::Elevator;

use crate::core::errors::{IoSchedError, IoSchedResult};
use crate::core::limits::DEFAULT_QUEUE_CAPACITY;
use crate::core::time::{Clock, MonotonicClock};
use crate::core::types::{RequestClass, RqHandle};
use crate::signal::InteractiveSignal;
use fifo::FifoSet;
use std::sync::Arc;
use tracing::{info, warn};

/// Per-device scheduler state
///
/// # Performance
/// - Cache-line aligned; admit, dispatch and neighbour lookups are O(1)
/// - Stats are atomics behind an `Arc` so monitors never need the queue lock
#[repr(C, align(64))]
pub struct MarrowScheduler<S, C = MonotonicClock> {
    fifo: FifoSet,
    batch: BatchCounter,
    tunables: Tunables,
    signal: S,
    clock: C,
    stats: Arc<AtomicIoSchedStats>,
}

impl<S: InteractiveSignal> MarrowScheduler<S, MonotonicClock> {
    /// Create a scheduler on the system monotonic clock
    pub fn new(signal: S) -> IoSchedResult<Self> {
        Self::init(signal, MonotonicClock::new())
    }
}

impl<S: InteractiveSignal, C: Clock> MarrowScheduler<S, C> {
    /// Allocate scheduler state with the default slot reservation
    pub fn init(signal: S, clock: C) -> IoSchedResult<Self> {
        Self::init_with_capacity(signal, clock, DEFAULT_QUEUE_CAPACITY)
    }

    /// Allocate scheduler state, reserving `capacity` request slots
    ///
    /// Defaults that depend on the display state are taken from the signal
    /// once, here.
    pub fn init_with_capacity(signal: S, clock: C, capacity: usize) -> IoSchedResult<Self> {
        let fifo = FifoSet::with_capacity(capacity)
            .map_err(|_| IoSchedError::OutOfMemory { requested: capacity })?;
        let interactive = signal.is_interactive();
        let tunables = Tunables::new(interactive);

        info!(
            elevator = "marrow",
            interactive,
            fifo_batch = tunables.fifo_batch(),
            capacity,
            "I/O scheduler initialized"
        );

        Ok(Self {
            fifo,
            batch: BatchCounter::new(),
            tunables,
            signal,
            clock,
            stats: Arc::new(AtomicIoSchedStats::new()),
        })
    }

    /// Replace the defaults with explicit tunables
    pub fn with_tunables(mut self, tunables: Tunables) -> Self {
        self.tunables = tunables;
        self
    }

    pub fn tunables(&self) -> &Tunables {
        &self.tunables
    }

    pub fn tunables_mut(&mut self) -> &mut Tunables {
        &mut self.tunables
    }

    /// Normal dispatches since the last sweep hit
    pub fn batch_count(&self) -> u32 {
        self.batch.count()
    }

    /// Borrow a queued request
    pub fn request(&self, handle: RqHandle) -> Option<&Request> {
        self.fifo.get(handle)
    }

    /// FIFO a queued request currently sits in
    pub fn class_of(&self, handle: RqHandle) -> Option<RequestClass> {
        self.fifo.lane_of(handle)
    }

    /// Number of requests queued in `class`
    pub fn queued(&self, class: RequestClass) -> usize {
        self.fifo.lane_len(class)
    }

    /// Requests of `class` in dispatch order
    pub fn iter_class(&self, class: RequestClass) -> impl Iterator<Item = &Request> {
        self.fifo.iter_lane(class)
    }

    pub fn len(&self) -> usize {
        self.fifo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fifo.is_empty()
    }

    pub fn signal(&self) -> &S {
        &self.signal
    }

    pub fn stats(&self) -> IoSchedStats {
        self.stats.snapshot()
    }

    /// Shared handle to the live counters
    pub fn stats_handle(&self) -> Arc<AtomicIoSchedStats> {
        Arc::clone(&self.stats)
    }

    /// Release scheduler state without draining it
    pub fn exit_queue(self) {
        let stranded = self.fifo.len();
        if stranded > 0 {
            warn!(stranded, "I/O scheduler exiting with queued requests");
        }
        info!(elevator = "marrow", "I/O scheduler exited");
    }
}

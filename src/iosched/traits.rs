/*!
 * Elevator Traits
 * Interface between the block layer and an I/O scheduling policy
 */

use super::request::{Admission, Request};
use crate::core::errors::IoSchedResult;
use crate::core::types::RqHandle;

/// An I/O scheduling policy for one device queue
///
/// All methods run under the caller's per-device lock; implementations do no
/// locking of their own. Construction is an inherent `init` on each policy.
pub trait Elevator {
    /// Registered policy name
    const NAME: &'static str;

    /// Classify, stamp and queue a request
    fn admit(&mut self, request: Request) -> Admission;

    /// Release the next request to the device, if any
    fn dispatch(&mut self) -> Option<Request>;

    /// Fold `next` into `rq`, returning the absorbed request to its owner
    fn merge(&mut self, rq: RqHandle, next: RqHandle) -> IoSchedResult<Request>;

    /// Queued predecessor of `rq` within its FIFO
    fn former(&self, rq: RqHandle) -> Option<RqHandle>;

    /// Queued successor of `rq` within its FIFO
    fn latter(&self, rq: RqHandle) -> Option<RqHandle>;

    /// Tear down; requests still queued are not drained
    fn exit(self)
    where
        Self: Sized;
}

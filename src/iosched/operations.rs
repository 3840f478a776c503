/*!
 * Scheduler Core Operations
 * Admit, dispatch, merge and neighbour lookup
 */

use super::request::{Admission, Request};
use super::traits::Elevator;
use super::{expiry, policy, MarrowScheduler};
use crate::core::errors::{IoSchedError, IoSchedResult};
use crate::core::time::Clock;
use crate::core::types::{Direction, RequestClass, RqHandle, Tick};
use crate::signal::InteractiveSignal;
use tracing::{debug, trace, warn};

impl<S: InteractiveSignal, C: Clock> MarrowScheduler<S, C> {
    /// Stamp a deadline and append to the request's class FIFO
    pub fn admit(&mut self, mut request: Request) -> Admission {
        let class = request.class();
        let now = self.clock.now();
        let interactive = self.signal.is_interactive();

        let Some(deadline) = expiry::stamp(&self.tunables, class, now, interactive) else {
            self.stats.inc_untracked();
            warn!(
                id = %request.id,
                class = %class,
                interactive,
                "Expire time is zero for class, request not queued"
            );
            return Admission::Untracked(request);
        };

        request.set_deadline(deadline);
        trace!(id = %request.id, class = %class, deadline, "Request admitted");
        let handle = self.fifo.push_back(class, request);
        self.stats.inc_admitted();
        Admission::Queued(handle)
    }

    /// Pick and remove the next request to send to the device
    pub fn dispatch(&mut self) -> Option<Request> {
        let now = self.clock.now();

        if self.batch.sweep_due(self.tunables.fifo_batch()) && self.signal.is_interactive() {
            if let Some(handle) = self.expired_head(now) {
                self.batch.reset();
                return self.release(handle, true);
            }
        }

        let handle = self.choose_request()?;
        self.batch.record_normal();
        self.release(handle, false)
    }

    /// Fold `next` into `rq`; `rq` takes over `next`'s place and deadline if
    /// `next` expires first
    pub fn merge(&mut self, rq: RqHandle, next: RqHandle) -> IoSchedResult<Request> {
        let rq_deadline = self.deadline_of(rq)?;
        let next_deadline = self.deadline_of(next)?;
        if rq == next {
            return Err(IoSchedError::NotQueued(next));
        }

        if next_deadline < rq_deadline {
            self.fifo.move_after(rq, next);
            if let Some(request) = self.fifo.get_mut(rq) {
                request.set_deadline(next_deadline);
            }
        }

        let absorbed = self.fifo.remove(next).ok_or(IoSchedError::NotQueued(next))?;
        self.stats.inc_merged();
        debug!(into = %rq, absorbed = %absorbed.id, "Requests merged");
        Ok(absorbed)
    }

    /// Request queued directly before `rq` in its FIFO
    #[inline]
    pub fn former(&self, rq: RqHandle) -> Option<RqHandle> {
        self.fifo.prev(rq)
    }

    /// Request queued directly after `rq` in its FIFO
    #[inline]
    pub fn latter(&self, rq: RqHandle) -> Option<RqHandle> {
        self.fifo.next(rq)
    }

    fn deadline_of(&self, handle: RqHandle) -> IoSchedResult<Tick> {
        self.fifo
            .get(handle)
            .map(Request::deadline)
            .ok_or(IoSchedError::NotQueued(handle))
    }

    /// First overdue FIFO head in sweep order
    fn expired_head(&self, now: Tick) -> Option<RqHandle> {
        let order = policy::sweep_order(self.signal.is_interactive());
        order.into_iter().find_map(|class| {
            let handle = self.fifo.front(class)?;
            let request = self.fifo.get(handle)?;
            expiry::is_expired(request.deadline(), now).then_some(handle)
        })
    }

    /// Head of the first non-empty FIFO in normal priority order
    fn choose_request(&self) -> Option<RqHandle> {
        let reads_empty = self.fifo.lane_is_empty(RequestClass::sync(Direction::Read))
            && self.fifo.lane_is_empty(RequestClass::async_(Direction::Read));
        let interactive = self.signal.is_interactive();
        let io_type = policy::preferred_direction(interactive, reads_empty);

        policy::normal_order(interactive, io_type)
            .into_iter()
            .find_map(|class| self.fifo.front(class))
    }

    fn release(&mut self, handle: RqHandle, expired: bool) -> Option<Request> {
        let request = self.fifo.remove(handle)?;
        self.stats.inc_dispatched(expired);
        if expired {
            debug!(
                id = %request.id,
                class = %request.class(),
                deadline = request.deadline(),
                "Dispatching overdue request"
            );
        } else {
            trace!(id = %request.id, class = %request.class(), "Dispatching request");
        }
        Some(request)
    }
}

impl<S: InteractiveSignal, C: Clock> Elevator for MarrowScheduler<S, C> {
    const NAME: &'static str = "marrow";

    fn admit(&mut self, request: Request) -> Admission {
        MarrowScheduler::admit(self, request)
    }

    fn dispatch(&mut self) -> Option<Request> {
        MarrowScheduler::dispatch(self)
    }

    fn merge(&mut self, rq: RqHandle, next: RqHandle) -> IoSchedResult<Request> {
        MarrowScheduler::merge(self, rq, next)
    }

    fn former(&self, rq: RqHandle) -> Option<RqHandle> {
        MarrowScheduler::former(self, rq)
    }

    fn latter(&self, rq: RqHandle) -> Option<RqHandle> {
        MarrowScheduler::latter(self, rq)
    }

    fn exit(self) {
        self.exit_queue();
    }
}

/*!
 * Device Queue
 *
 * Owns one elevator and the per-device lock every scheduler call runs under.
 * Submitters and the dispatching side may live on different threads; the
 * elevator itself never sees concurrent access.
 */

use crate::core::errors::IoSchedResult;
use crate::core::types::RqHandle;
use crate::iosched::{Admission, Elevator, Request};
use parking_lot::Mutex;
use tracing::info;

/// One managed device queue
pub struct DeviceQueue<E> {
    name: String,
    elevator: Mutex<E>,
}

impl<E: Elevator> DeviceQueue<E> {
    pub fn new(name: impl Into<String>, elevator: E) -> Self {
        let name = name.into();
        info!(device = %name, elevator = E::NAME, "Device queue attached");
        Self {
            name,
            elevator: Mutex::new(elevator),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn submit(&self, request: Request) -> Admission {
        self.elevator.lock().admit(request)
    }

    pub fn next_request(&self) -> Option<Request> {
        self.elevator.lock().dispatch()
    }

    /// Dispatch until the elevator reports no work
    pub fn drain(&self) -> Vec<Request> {
        let mut elevator = self.elevator.lock();
        std::iter::from_fn(|| elevator.dispatch()).collect()
    }

    pub fn merge(&self, rq: RqHandle, next: RqHandle) -> IoSchedResult<Request> {
        self.elevator.lock().merge(rq, next)
    }

    pub fn former(&self, rq: RqHandle) -> Option<RqHandle> {
        self.elevator.lock().former(rq)
    }

    pub fn latter(&self, rq: RqHandle) -> Option<RqHandle> {
        self.elevator.lock().latter(rq)
    }

    /// Run `f` with the queue lock held (configuration reads and writes)
    pub fn with_elevator<R>(&self, f: impl FnOnce(&mut E) -> R) -> R {
        f(&mut self.elevator.lock())
    }

    /// Detach and tear down the elevator
    pub fn shutdown(self) {
        info!(device = %self.name, "Device queue detached");
        self.elevator.into_inner().exit();
    }
}

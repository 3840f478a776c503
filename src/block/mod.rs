/*!
 * Block Layer Harness
 * Device queue that serializes every elevator call behind one lock
 */

mod queue;

pub use queue::DeviceQueue;

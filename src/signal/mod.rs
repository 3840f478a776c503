/*!
 * Interactive Signal
 * External on/off input that biases dispatch toward latency or throughput
 */

mod display;

pub use display::DisplayState;

use std::sync::Arc;

/// Polled source of the interactive (display on/off) state
///
/// Read without synchronization on every admit and dispatch; a stale value
/// across a transition is acceptable.
pub trait InteractiveSignal {
    fn is_interactive(&self) -> bool;
}

impl<T: InteractiveSignal + ?Sized> InteractiveSignal for Arc<T> {
    #[inline]
    fn is_interactive(&self) -> bool {
        (**self).is_interactive()
    }
}

impl<T: InteractiveSignal + ?Sized> InteractiveSignal for &T {
    #[inline]
    fn is_interactive(&self) -> bool {
        (**self).is_interactive()
    }
}

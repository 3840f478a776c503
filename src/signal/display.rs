/*!
 * Display State
 * Shared display on/off flag
 */

use super::InteractiveSignal;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Display power state; clones observe the same flag
///
/// # Performance
/// - Relaxed atomic load on the dispatch hot path, no locking
#[derive(Debug, Clone)]
pub struct DisplayState {
    on: Arc<AtomicBool>,
}

impl DisplayState {
    pub fn new(on: bool) -> Self {
        Self {
            on: Arc::new(AtomicBool::new(on)),
        }
    }

    pub fn set(&self, on: bool) {
        let was = self.on.swap(on, Ordering::Relaxed);
        if was != on {
            debug!(display_on = on, "Display state changed");
        }
    }

    pub fn set_on(&self) {
        self.set(true);
    }

    pub fn set_off(&self) {
        self.set(false);
    }

    #[inline(always)]
    pub fn is_on(&self) -> bool {
        self.on.load(Ordering::Relaxed)
    }
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::new(true)
    }
}

impl InteractiveSignal for DisplayState {
    #[inline(always)]
    fn is_interactive(&self) -> bool {
        self.is_on()
    }
}

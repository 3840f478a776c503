/*!
 * Batch Counter
 * Normal-priority dispatches since the last forced expiry dispatch
 */

/// Counts consecutive normal selections
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchCounter {
    count: u32,
}

impl BatchCounter {
    pub const fn new() -> Self {
        Self { count: 0 }
    }

    #[inline(always)]
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Whether an expiry sweep is due for `threshold`
    #[inline(always)]
    pub fn sweep_due(&self, threshold: u32) -> bool {
        self.count >= threshold
    }

    /// A dispatch was satisfied by normal class-priority selection
    #[inline(always)]
    pub fn record_normal(&mut self) {
        self.count = self.count.saturating_add(1);
    }

    /// A dispatch was satisfied by the expiry sweep
    #[inline(always)]
    pub fn reset(&mut self) {
        self.count = 0;
    }
}

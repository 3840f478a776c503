/*!
 * Expiry Tracker
 * Deadline stamping at admission and overdue checks at dispatch
 */

use super::config::Tunables;
use crate::core::types::{RequestClass, Tick};

/// Deadline for a request of `class` admitted at `now`
///
/// Returns `None` when the active budget is zero, in which case the request
/// is not tracked at all. While the display is off only the eligibility check
/// is scaled by the sleep multiple; the stored deadline always uses the plain
/// class budget.
#[inline]
pub fn stamp(tunables: &Tunables, class: RequestClass, now: Tick, interactive: bool) -> Option<Tick> {
    let expire = tunables.expire(class);
    let budget = if interactive {
        expire
    } else {
        expire.saturating_mul(tunables.sleep_latency_multiple() as Tick)
    };

    if budget == 0 {
        return None;
    }
    Some(now.saturating_add(expire))
}

/// Overdue once `now` is strictly past the deadline
#[inline(always)]
pub fn is_expired(deadline: Tick, now: Tick) -> bool {
    now > deadline
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iosched::config::TunableKey;

    #[test]
    fn test_stamp_uses_class_budget() {
        let tunables = Tunables::default();
        let budget = tunables.expire(RequestClass::SYNC_READ);
        assert_eq!(stamp(&tunables, RequestClass::SYNC_READ, 100, true), Some(100 + budget));
    }

    #[test]
    fn test_display_off_does_not_scale_deadline() {
        let tunables = Tunables::default();
        let budget = tunables.expire(RequestClass::ASYNC_WRITE);
        assert_eq!(
            stamp(&tunables, RequestClass::ASYNC_WRITE, 7, false),
            Some(7 + budget)
        );
    }

    #[test]
    fn test_zero_budget_is_untracked() {
        let mut tunables = Tunables::default();
        tunables.set(TunableKey::SyncWriteExpire, 0);
        assert_eq!(stamp(&tunables, RequestClass::SYNC_WRITE, 0, true), None);
        assert_eq!(stamp(&tunables, RequestClass::SYNC_WRITE, 0, false), None);
        assert!(stamp(&tunables, RequestClass::SYNC_READ, 0, false).is_some());
    }

    #[test]
    fn test_expired_is_strict() {
        assert!(!is_expired(10, 10));
        assert!(is_expired(10, 11));
        assert!(!is_expired(10, 9));
    }
}

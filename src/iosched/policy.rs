/*!
 * Dispatch Policy Orders
 *
 * Class preference orders for the two selection paths. Both display-off
 * branches are kept exactly as the scheduler has always behaved: the sweep
 * favours writes outright, while normal selection starts from the direction
 * opposite to the preferred one.
 */

use crate::core::types::{Direction, RequestClass};

/// Order in which overdue FIFO heads are considered during an expiry sweep
#[inline]
pub const fn sweep_order(interactive: bool) -> [RequestClass; 4] {
    if interactive {
        [
            RequestClass::SYNC_READ,
            RequestClass::ASYNC_READ,
            RequestClass::SYNC_WRITE,
            RequestClass::ASYNC_WRITE,
        ]
    } else {
        [
            RequestClass::ASYNC_WRITE,
            RequestClass::SYNC_WRITE,
            RequestClass::ASYNC_READ,
            RequestClass::SYNC_READ,
        ]
    }
}

/// Preferred direction for normal selection
///
/// Writes when the display is off or when both read FIFOs are empty.
#[inline]
pub const fn preferred_direction(interactive: bool, reads_empty: bool) -> Direction {
    if !interactive || reads_empty {
        Direction::Write
    } else {
        Direction::Read
    }
}

/// Order in which FIFO heads are considered during normal selection
#[inline]
pub const fn normal_order(interactive: bool, io_type: Direction) -> [RequestClass; 4] {
    let other = io_type.opposite();
    if interactive {
        [
            RequestClass::sync(io_type),
            RequestClass::async_(io_type),
            RequestClass::sync(other),
            RequestClass::async_(other),
        ]
    } else {
        [
            RequestClass::async_(other),
            RequestClass::sync(other),
            RequestClass::async_(io_type),
            RequestClass::sync(io_type),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_order_display_on_prefers_reads() {
        assert_eq!(
            sweep_order(true),
            [
                RequestClass::SYNC_READ,
                RequestClass::ASYNC_READ,
                RequestClass::SYNC_WRITE,
                RequestClass::ASYNC_WRITE
            ]
        );
    }

    #[test]
    fn test_sweep_order_display_off_prefers_writes() {
        assert_eq!(sweep_order(false)[0], RequestClass::ASYNC_WRITE);
        assert_eq!(sweep_order(false)[3], RequestClass::SYNC_READ);
    }

    #[test]
    fn test_preferred_direction() {
        assert_eq!(preferred_direction(true, false), Direction::Read);
        assert_eq!(preferred_direction(true, true), Direction::Write);
        assert_eq!(preferred_direction(false, false), Direction::Write);
    }

    #[test]
    fn test_normal_order_interactive() {
        assert_eq!(
            normal_order(true, Direction::Read),
            [
                RequestClass::SYNC_READ,
                RequestClass::ASYNC_READ,
                RequestClass::SYNC_WRITE,
                RequestClass::ASYNC_WRITE
            ]
        );
    }

    #[test]
    fn test_normal_order_display_off_starts_opposite() {
        // io_type is always Write with the display off, so reads lead
        assert_eq!(
            normal_order(false, Direction::Write),
            [
                RequestClass::ASYNC_READ,
                RequestClass::SYNC_READ,
                RequestClass::ASYNC_WRITE,
                RequestClass::SYNC_WRITE
            ]
        );
    }
}

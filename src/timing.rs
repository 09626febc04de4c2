//! Wrap-safe millisecond deadlines.
//!
//! The controller clock is a `u32` millisecond counter that wraps after
//! roughly 49.7 days.  A [`Deadline`] remembers when it was armed and for
//! how long, and answers [`expired`](Deadline::expired) from the elapsed
//! time (`now - armed_at`, wrapping), so a deadline armed just before the
//! wrap still expires on time after it.
//!
//! Arming uses checked addition.  If `now + duration` does not fit, the
//! caller receives a [`TimerWrap`] to report.  The full duration is still
//! honoured: expiry is measured from the arming instant, so the hold runs
//! its whole length on the far side of the wrap.

use crate::error::{TimerId, TimerWrap};

/// A one-shot timeout measured on the wrapping millisecond clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Deadline {
    armed_at: u32,
    duration: u32,
}

impl Deadline {
    /// A deadline that is already expired at time zero.
    pub const fn expired_at_boot() -> Self {
        Self {
            armed_at: 0,
            duration: 0,
        }
    }

    /// Arm the deadline `duration` ms after `now`.
    ///
    /// If the expiry instant wraps past `u32::MAX` the wrap is returned as
    /// an error.  The deadline is armed for the full duration in both cases.
    pub fn arm(&mut self, timer: TimerId, now: u32, duration: u32) -> Result<(), TimerWrap> {
        self.armed_at = now;
        self.duration = duration;
        match now.checked_add(duration) {
            Some(_) => Ok(()),
            None => Err(TimerWrap {
                timer,
                now_ms: now,
                requested_ms: duration,
            }),
        }
    }

    /// `true` once at least `duration` ms have elapsed since arming.
    pub fn expired(&self, now: u32) -> bool {
        now.wrapping_sub(self.armed_at) >= self.duration
    }

    /// Milliseconds elapsed since the deadline was armed.
    pub fn elapsed(&self, now: u32) -> u32 {
        now.wrapping_sub(self.armed_at)
    }

    /// The clock value at which the deadline expires, wrapped.
    pub fn at(&self) -> u32 {
        self.armed_at.wrapping_add(self.duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arm_and_expire() {
        let mut d = Deadline::default();
        d.arm(TimerId::Override, 1_000, 500).unwrap();
        assert_eq!(d.at(), 1_500);
        assert!(!d.expired(1_000));
        assert!(!d.expired(1_499));
        assert!(d.expired(1_500));
        assert!(d.expired(9_999));
    }

    #[test]
    fn overflow_reports_and_keeps_full_duration() {
        let mut d = Deadline::default();
        let now = u32::MAX - 100;
        let err = d.arm(TimerId::BatteryLow, now, 1_000).unwrap_err();
        assert_eq!(err.timer, TimerId::BatteryLow);
        assert_eq!(err.requested_ms, 1_000);
        assert_eq!(d.at(), 899);
        assert!(!d.expired(u32::MAX));
        assert!(!d.expired(898));
        assert!(d.expired(899));
    }

    #[test]
    fn hold_armed_right_before_wrap_is_not_cut_short() {
        let mut d = Deadline::default();
        assert!(d.arm(TimerId::Override, u32::MAX, 60_000).is_err());
        assert!(!d.expired(0));
        assert!(!d.expired(58_000));
        assert!(d.expired(59_999));
    }

    #[test]
    fn no_overflow_exactly_at_max() {
        let mut d = Deadline::default();
        assert!(d.arm(TimerId::Override, u32::MAX - 10, 10).is_ok());
        assert_eq!(d.at(), u32::MAX);
    }

    #[test]
    fn elapsed_counts_across_the_wrap() {
        let d = Deadline {
            armed_at: u32::MAX - 5,
            duration: 20,
        };
        assert_eq!(d.elapsed(4), 10);
        assert!(!d.expired(4));
        assert!(d.expired(14));
    }

    #[test]
    fn boot_deadline_is_expired() {
        assert!(Deadline::expired_at_boot().expired(0));
    }
}

//! Square-wave blinking.
//!
//! Phase boundaries advance by exactly one phase length from the previous
//! boundary, never to the observed `now`, so a slow or jittery polling loop
//! does not stretch the cycle.  Gaps longer than a full period are skipped
//! arithmetically.

use crate::config::BlinkTiming;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blink {
    timing: BlinkTiming,
    lit: bool,
    /// Start of the current phase.  `None` until the first render.
    changed_at: Option<u32>,
}

impl Blink {
    pub fn new(timing: BlinkTiming) -> Self {
        Self {
            timing,
            lit: true,
            changed_at: None,
        }
    }

    /// Restart at the beginning of the lit phase on the next render.
    pub fn reset(&mut self) {
        self.lit = true;
        self.changed_at = None;
    }

    /// Advance to `now` and return the level for that instant.
    pub fn render(&mut self, now: u32) -> u8 {
        let BlinkTiming {
            on_ms,
            off_ms,
            max_level,
        } = self.timing;
        let mut start = *self.changed_at.get_or_insert(now);
        let period = on_ms.saturating_add(off_ms);
        if period == 0 {
            return max_level;
        }

        let mut elapsed = now.wrapping_sub(start);
        if elapsed >= period {
            let skipped = elapsed - elapsed % period;
            start = start.wrapping_add(skipped);
            elapsed -= skipped;
        }
        // At most two phase changes remain because elapsed < period.
        loop {
            let len = if self.lit { on_ms } else { off_ms };
            if elapsed < len {
                break;
            }
            elapsed -= len;
            start = start.wrapping_add(len);
            self.lit = !self.lit;
        }
        self.changed_at = Some(start);

        if self.lit { max_level } else { 0 }
    }
}

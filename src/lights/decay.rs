//! Flash-and-fade envelope for the position lights.
//!
//! Full level for `on_ms`, then `max · e^(−t/τ)`.  With a fade length
//! configured the flash repeats every `on_ms + decay_ms`.  Rendering is a
//! pure function of the time since the origin.

use crate::config::DecayTiming;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decay {
    timing: DecayTiming,
    origin: Option<u32>,
}

impl Decay {
    pub fn new(timing: DecayTiming) -> Self {
        Self {
            timing,
            origin: None,
        }
    }

    /// Forget the origin; the next render starts a fresh flash.
    pub fn reset(&mut self) {
        self.origin = None;
    }

    pub fn render(&mut self, now: u32) -> u8 {
        let origin = *self.origin.get_or_insert(now);
        level_at(self.timing, now.wrapping_sub(origin))
    }
}

/// Level `dt` ms after the flash origin.
pub fn level_at(timing: DecayTiming, dt: u32) -> u8 {
    let DecayTiming {
        on_ms,
        tau_ms,
        decay_ms,
        max_level,
    } = timing;

    let dt = match decay_ms {
        Some(decay) if on_ms.saturating_add(decay) > 0 => dt % on_ms.saturating_add(decay),
        _ => dt,
    };
    if dt < on_ms {
        return max_level;
    }
    if tau_ms == 0 {
        return 0;
    }

    let x = (dt - on_ms) as f32 / tau_ms as f32;
    let level = libm::roundf(f32::from(max_level) * libm::expf(-x));
    level.clamp(0.0, f32::from(max_level)) as u8
}

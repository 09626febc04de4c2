//! Light pattern hierarchy.
//!
//! A [`Light`] owns an 8-bit level, a `paused` flag and a [`Pattern`].
//! Patterns are a closed set, so they are a tagged enum with one
//! [`render`](Pattern::render) dispatch rather than trait objects.
//!
//! | Pattern      | Unpaused behaviour                         |
//! |--------------|--------------------------------------------|
//! | `Steady`     | holds the last level                       |
//! | `Blink`      | square wave, drift-free boundaries         |
//! | `Decay`      | flash then exponential fade, optional loop |
//! | `Selectable` | fast or slow `Blink`, switchable           |
//!
//! `on()` and `off()` pause the pattern at full or zero level.  `resume()`
//! lets it run again from a fresh origin on the next `update()`.

pub mod blink;
pub mod decay;
pub mod groups;

use serde::Serialize;

use crate::channels::{Channel, ChannelBank};
use crate::config::{BlinkTiming, DecayTiming};

pub use blink::Blink;
pub use decay::Decay;
pub use groups::{LightGroups, LightId};

pub const LEVEL_OFF: u8 = 0;
pub const LEVEL_FULL: u8 = 255;

/// Externally visible projection of a light's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LightMode {
    On,
    Off,
    Flashing,
}

/// Blink rate of a [`Pattern::Selectable`] lamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Speed {
    Fast,
    Slow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selectable {
    fast: Blink,
    slow: Blink,
    speed: Speed,
}

impl Selectable {
    pub fn new(fast: BlinkTiming, slow: BlinkTiming) -> Self {
        Self {
            fast: Blink::new(fast),
            slow: Blink::new(slow),
            speed: Speed::Slow,
        }
    }

    fn active(&mut self) -> &mut Blink {
        match self.speed {
            Speed::Fast => &mut self.fast,
            Speed::Slow => &mut self.slow,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    Steady,
    Blink(Blink),
    Decay(Decay),
    Selectable(Selectable),
}

impl Pattern {
    pub fn blink(timing: BlinkTiming) -> Self {
        Self::Blink(Blink::new(timing))
    }

    pub fn decay(timing: DecayTiming) -> Self {
        Self::Decay(Decay::new(timing))
    }

    pub fn selectable(fast: BlinkTiming, slow: BlinkTiming) -> Self {
        Self::Selectable(Selectable::new(fast, slow))
    }

    /// Level at `now`, or `None` when the pattern leaves the level alone.
    pub fn render(&mut self, now: u32) -> Option<u8> {
        match self {
            Self::Steady => None,
            Self::Blink(b) => Some(b.render(now)),
            Self::Decay(d) => Some(d.render(now)),
            Self::Selectable(s) => Some(s.active().render(now)),
        }
    }

    /// Drop the time origin so the next render starts a fresh cycle.
    pub fn reset(&mut self) {
        match self {
            Self::Steady => {}
            Self::Blink(b) => b.reset(),
            Self::Decay(d) => d.reset(),
            Self::Selectable(s) => {
                s.fast.reset();
                s.slow.reset();
            }
        }
    }
}

/// One lamp or lamp group on a single output channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Light {
    channel: Channel,
    level: u8,
    paused: bool,
    pattern: Pattern,
}

impl Light {
    /// A light that starts off and paused.
    pub fn new(channel: Channel, pattern: Pattern) -> Self {
        Self {
            channel,
            level: LEVEL_OFF,
            paused: true,
            pattern,
        }
    }

    /// Steady full level.
    pub fn on(&mut self) {
        self.paused = true;
        self.level = LEVEL_FULL;
        self.pattern.reset();
    }

    /// Steady off.
    pub fn off(&mut self) {
        self.paused = true;
        self.level = LEVEL_OFF;
        self.pattern.reset();
    }

    /// Let the pattern run.  The origin is taken on the next update.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn toggle(&mut self) {
        if self.level > LEVEL_OFF {
            self.off();
        } else {
            self.on();
        }
    }

    /// Switch a selectable lamp to `speed` and start it flashing.
    /// Lamps without a selectable pattern ignore the request.
    pub fn set_speed(&mut self, speed: Speed) {
        if let Pattern::Selectable(s) = &mut self.pattern {
            s.speed = speed;
            s.active().reset();
            self.paused = false;
        } else {
            log::debug!("{}: speed change ignored, not selectable", self.channel.label());
        }
    }

    pub fn speed(&self) -> Option<Speed> {
        match &self.pattern {
            Pattern::Selectable(s) => Some(s.speed),
            _ => None,
        }
    }

    /// Advance the pattern to `now`.  No-op while paused.
    pub fn update(&mut self, now: u32) {
        if self.paused {
            return;
        }
        if let Some(level) = self.pattern.render(now) {
            self.level = level;
        }
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn light_mode(&self) -> LightMode {
        if !self.paused {
            LightMode::Flashing
        } else if self.level == LEVEL_OFF {
            LightMode::Off
        } else {
            LightMode::On
        }
    }

    /// Copy the current level into the bank.
    pub fn sync(&self, bank: &mut ChannelBank) {
        bank.set(self.channel, self.level);
    }
}

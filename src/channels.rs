//! Output channel bank.
//!
//! Every physical output (lamp driver or motor relay) is addressed by a
//! [`Channel`] index into one owned [`ChannelBank`].  Lights and the motor
//! controller hold indices, never references, and the bank is committed
//! to hardware once per tick.
//!
//! The bank can also snapshot and restore the lamp levels
//! ([`ChannelBank::save`], [`ChannelBank::restore`]) and ramp one lamp to
//! a new level ([`Fade`]).  Neither touches the motor relays, which only
//! the interlocked motor controller writes.

use serde::{Deserialize, Serialize};

/// Output channels, in board order (O1 … O8, O13).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Channel {
    /// O1: identification lights.
    Ident = 0,
    /// O2: landing lights.
    Landing = 1,
    /// O3: actuator up relay.
    MotorUp = 2,
    /// O4: cockpit / wheel-well illumination.
    Illum = 3,
    /// O5: position (wingtip) lights.
    Position = 4,
    /// O6: formation lights.
    Formation = 5,
    /// O7: actuator down relay.
    MotorDown = 6,
    /// O8: blue status lamp.
    BlueStatus = 7,
    /// O13: red status lamp.
    RedStatus = 8,
}

impl Channel {
    pub const COUNT: usize = 9;

    pub const ALL: [Channel; Self::COUNT] = [
        Self::Ident,
        Self::Landing,
        Self::MotorUp,
        Self::Illum,
        Self::Position,
        Self::Formation,
        Self::MotorDown,
        Self::BlueStatus,
        Self::RedStatus,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// The dimmable exhibit lamps (O1, O2, O4, O5, O6).  Excludes the motor
    /// relays and the status lamps.
    pub const fn is_lamp(self) -> bool {
        matches!(
            self,
            Self::Ident | Self::Landing | Self::Illum | Self::Position | Self::Formation
        )
    }

    /// Board silkscreen label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ident => "O1",
            Self::Landing => "O2",
            Self::MotorUp => "O3",
            Self::Illum => "O4",
            Self::Position => "O5",
            Self::Formation => "O6",
            Self::MotorDown => "O7",
            Self::BlueStatus => "O8",
            Self::RedStatus => "O13",
        }
    }
}

/// Current 8-bit level of every output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChannelBank {
    levels: [u8; Channel::COUNT],
}

impl ChannelBank {
    pub const fn new() -> Self {
        Self {
            levels: [0; Channel::COUNT],
        }
    }

    pub fn get(&self, channel: Channel) -> u8 {
        self.levels[channel.index()]
    }

    pub fn set(&mut self, channel: Channel, level: u8) {
        self.levels[channel.index()] = level;
    }

    pub fn is_on(&self, channel: Channel) -> bool {
        self.get(channel) > 0
    }

    pub fn levels(&self) -> [u8; Channel::COUNT] {
        self.levels
    }

    /// `(channel, level)` pairs in board order.
    pub fn iter(&self) -> impl Iterator<Item = (Channel, u8)> + '_ {
        Channel::ALL.iter().map(move |&c| (c, self.get(c)))
    }

    /// Snapshot the current lamp levels.
    pub fn save(&self) -> SavedLevels {
        let mut saved = SavedLevels::default();
        for c in Channel::ALL.into_iter().filter(|c| c.is_lamp()) {
            saved.levels[c.index()] = self.get(c);
        }
        saved
    }

    /// Put the lamp levels from `saved` back.  Relays and status lamps
    /// keep their current level.
    pub fn restore(&mut self, saved: &SavedLevels) {
        for c in Channel::ALL.into_iter().filter(|c| c.is_lamp()) {
            self.set(c, saved.levels[c.index()]);
        }
    }

    /// Move `channel` at most `max_step` counts toward `target`.  Returns
    /// `true` once the channel is at `target`.
    pub fn move_toward(&mut self, channel: Channel, target: u8, max_step: u32) -> bool {
        let step = u8::try_from(max_step).unwrap_or(u8::MAX);
        let current = self.get(channel);
        let next = if current < target {
            current.saturating_add(step).min(target)
        } else {
            current.saturating_sub(step).max(target)
        };
        self.set(channel, next);
        next == target
    }
}

/// Lamp levels captured by [`ChannelBank::save`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SavedLevels {
    levels: [u8; Channel::COUNT],
}

impl SavedLevels {
    pub fn get(&self, channel: Channel) -> u8 {
        self.levels[channel.index()]
    }
}

// ---------------------------------------------------------------------------
// Fade
// ---------------------------------------------------------------------------

/// Ramp of one lamp to a target level, one count every `step_ms`.
///
/// The level is computed from the time since the ramp began, so a late
/// poll catches up instead of stretching the fade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fade {
    channel: Channel,
    from: u8,
    target: u8,
    step_ms: u32,
    started_at: u32,
}

impl Fade {
    /// Start a ramp from the channel's current level.  `None` for channels
    /// that are not lamps.
    pub fn new(bank: &ChannelBank, channel: Channel, target: u8, step_ms: u32, now: u32) -> Option<Self> {
        channel.is_lamp().then(|| Self {
            channel,
            from: bank.get(channel),
            target,
            step_ms,
            started_at: now,
        })
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Write the level for `now` into `bank`.  Returns `true` once the
    /// target has been reached.  A zero step jumps straight there.
    pub fn apply(&self, now: u32, bank: &mut ChannelBank) -> bool {
        let steps = match self.step_ms {
            0 => u32::MAX,
            step => now.wrapping_sub(self.started_at) / step,
        };
        bank.set(self.channel, self.from);
        bank.move_toward(self.channel, self.target, steps)
    }
}

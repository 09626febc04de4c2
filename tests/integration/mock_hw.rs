//! Mock hardware adapter for integration tests.
//!
//! Serves a settable sensor snapshot and records every committed output
//! bank so tests can assert on the full output history without touching
//! real GPIO/PWM registers.

use navlights::app::events::AppEvent;
use navlights::app::ports::{EventSink, OutputPort, SensorPort};
use navlights::app::service::AppService;
use navlights::channels::{Channel, ChannelBank};
use navlights::config::SystemConfig;
use navlights::sensors::SensorSnapshot;

/// Raw 12-bit battery counts for roughly 12.6 V with the default divider.
pub const BATTERY_GOOD_RAW: u16 = 3_141;
/// Roughly 11.8 V: above the low threshold, below the reset threshold.
pub const BATTERY_MID_RAW: u16 = 2_941;
/// Roughly 11.0 V.
pub const BATTERY_LOW_RAW: u16 = 2_742;

pub const BRIGHT: u16 = 3_200;
pub const DARK: u16 = 480;

/// Control-loop period used by the scenarios.
pub const TICK_MS: u32 = 20;

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub snapshot: SensorSnapshot,
    pub writes: Vec<ChannelBank>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            snapshot: SensorSnapshot {
                photocell_1: BRIGHT,
                photocell_2: BRIGHT,
                battery_raw: BATTERY_GOOD_RAW,
                manual_battery_override: false,
            },
            writes: Vec::new(),
        }
    }

    pub fn set_light(&mut self, raw: u16) {
        self.snapshot.photocell_1 = raw;
        self.snapshot.photocell_2 = raw;
    }

    pub fn set_battery(&mut self, raw: u16) {
        self.snapshot.battery_raw = raw;
    }

    pub fn last(&self) -> ChannelBank {
        self.writes.last().copied().unwrap_or_default()
    }

    pub fn level(&self, channel: Channel) -> u8 {
        self.last().get(channel)
    }

    /// True if any commit ever drove both motor outputs at once.
    pub fn ever_drove_both_motors(&self) -> bool {
        self.writes
            .iter()
            .any(|b| b.is_on(Channel::MotorUp) && b.is_on(Channel::MotorDown))
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware {
    fn read_all(&mut self) -> SensorSnapshot {
        self.snapshot
    }
}

impl OutputPort for MockHardware {
    fn write_channels(&mut self, bank: &ChannelBank) {
        self.writes.push(*bank);
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Harness ───────────────────────────────────────────────────

/// Service, hardware and sink plus a simulated clock.
pub struct Rig {
    pub app: AppService,
    pub hw: MockHardware,
    pub sink: RecordingSink,
    pub now: u32,
}

#[allow(dead_code)]
impl Rig {
    pub fn new(config: SystemConfig) -> Self {
        Self::starting_at(config, 0)
    }

    pub fn starting_at(config: SystemConfig, now: u32) -> Self {
        let mut rig = Self {
            app: AppService::new(config),
            hw: MockHardware::new(),
            sink: RecordingSink::new(),
            now,
        };
        rig.app.start(now, &mut rig.hw, &mut rig.sink);
        rig
    }

    /// Started and run past the startup grace period.
    pub fn booted() -> Self {
        let mut rig = Self::new(SystemConfig::default());
        rig.run_for(2_100);
        rig
    }

    pub fn tick(&mut self) {
        self.now = self.now.wrapping_add(TICK_MS);
        self.app.tick(self.now, &mut self.hw, &mut self.sink);
    }

    pub fn run_for(&mut self, ms: u32) {
        for _ in 0..ms / TICK_MS {
            self.tick();
        }
    }

    pub fn press(&mut self, symbol: char) {
        self.app.handle_symbol(symbol, self.now, &mut self.hw, &mut self.sink);
    }
}

//! Shared mutable context threaded through every FSM handler.
//!
//! `FsmContext` is the single struct that mode handlers read from and
//! write to: the per-tick inputs, the light groups, the motor, the output
//! bank, both mode timeouts, the startup flag and any anomalies raised
//! while handling the tick.

use heapless::Deque;
use log::warn;

use crate::channels::{Channel, ChannelBank};
use crate::config::SystemConfig;
use crate::control::UpDownMotor;
use crate::error::{Error, TimerId};
use crate::lights::LightGroups;
use crate::sensors::time_of_day::DayPart;
use crate::timing::Deadline;

use super::Mode;

/// Anomalies held until the service drains them at the end of a tick.
pub const ANOMALY_QUEUE_DEPTH: usize = 8;

// ---------------------------------------------------------------------------
// Mode inputs (written by the service before each FSM tick)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeInputs {
    /// Averaged battery voltage.
    pub battery_volts: f32,
    /// Staff override: ignore a low battery.
    pub manual_battery_override: bool,
    /// Live time-of-day classification.
    pub day_part: DayPart,
}

impl Default for ModeInputs {
    fn default() -> Self {
        Self {
            battery_volts: 0.0,
            manual_battery_override: false,
            day_part: DayPart::Day,
        }
    }
}

// ---------------------------------------------------------------------------
// FsmContext
// ---------------------------------------------------------------------------

pub struct FsmContext {
    // -- Timing --
    /// Clock value for the current tick or command.
    pub now_ms: u32,

    // -- Inputs --
    pub inputs: ModeInputs,

    // -- Outputs --
    pub lights: LightGroups,
    pub motor: UpDownMotor,
    pub channels: ChannelBank,

    // -- Configuration --
    pub config: SystemConfig,

    // -- Mode timers --
    pub override_timeout: Deadline,
    pub battery_low_timeout: Deadline,
    /// Held in battery-low until the startup grace has passed.
    pub in_startup: bool,
    pub started_at: u32,

    // -- Anomalies --
    pub anomalies: Deque<Error, ANOMALY_QUEUE_DEPTH>,
}

impl FsmContext {
    pub fn new(config: SystemConfig) -> Self {
        Self {
            now_ms: 0,
            inputs: ModeInputs {
                day_part: config.injected_day_part.unwrap_or(DayPart::Day),
                ..ModeInputs::default()
            },
            lights: LightGroups::new(&config),
            motor: UpDownMotor::new(
                Channel::MotorUp,
                Channel::MotorDown,
                config.motor_start_delay_ms,
                config.motor_max_run_ms,
            ),
            channels: ChannelBank::new(),
            override_timeout: Deadline::expired_at_boot(),
            battery_low_timeout: Deadline::expired_at_boot(),
            in_startup: false,
            started_at: 0,
            config,
            anomalies: Deque::new(),
        }
    }

    /// The mode that automatic control wants right now.
    pub fn live_mode(&self) -> Mode {
        Mode::from(self.inputs.day_part)
    }

    pub fn begin_startup(&mut self, now: u32) {
        self.in_startup = true;
        self.started_at = now;
    }

    pub fn startup_elapsed(&self) -> u32 {
        self.now_ms.wrapping_sub(self.started_at)
    }

    pub fn battery_is_low(&self) -> bool {
        self.inputs.battery_volts <= self.config.battery_low_volts
    }

    pub fn arm_override_timeout(&mut self) {
        let (now, duration) = (self.now_ms, self.config.override_timeout_ms);
        if let Err(wrap) = self.override_timeout.arm(TimerId::Override, now, duration) {
            self.report(wrap.into());
        }
    }

    pub fn arm_battery_low_timeout(&mut self) {
        let (now, duration) = (self.now_ms, self.config.battery_low_timeout_ms);
        if let Err(wrap) = self.battery_low_timeout.arm(TimerId::BatteryLow, now, duration) {
            self.report(wrap.into());
        }
    }

    /// Named lights off and the motor stopped.  Status lamps are untouched.
    pub fn all_off(&mut self) {
        self.lights.all_lights_off();
        self.motor.stop_all(&mut self.channels);
    }

    /// Queue an anomaly for the service.  The oldest is dropped when full.
    pub fn report(&mut self, anomaly: Error) {
        warn!("ANOMALY: {anomaly}");
        if self.anomalies.is_full() {
            self.anomalies.pop_front();
        }
        let queued = self.anomalies.push_back(anomaly).is_ok();
        debug_assert!(queued, "anomaly queue full after eviction");
    }
}

//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them.

use serde::Serialize;

use crate::channels::Channel;
use crate::error::Error;
use crate::fsm::Mode;
use crate::lights::LightMode;
use crate::sensors::time_of_day::DayPart;

use super::commands::AppCommand;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Status snapshot (on request or periodic).
    Telemetry(TelemetryData),

    /// The operating mode changed.
    ModeChanged { from: Mode, to: Mode },

    /// The photocell classifier moved to a new day part.
    DayPartChanged { from: DayPart, to: DayPart },

    /// A command was accepted and applied.
    CommandApplied(AppCommand),

    /// Something went wrong and was handled (timer wrap, interlock, bad key).
    Anomaly(Error),

    /// The service has started (carries the initial mode).
    Started(Mode),

    /// Controller identification, in response to `i`.
    Info {
        name: &'static str,
        version: &'static str,
    },
}

/// A point-in-time status snapshot suitable for logging or transmission.
#[derive(Debug, Clone, Serialize)]
pub struct TelemetryData {
    pub now_ms: u32,
    /// Control cycles run since start.
    pub ticks: u64,
    pub mode: Mode,
    pub day_part: DayPart,
    pub in_startup: bool,
    pub battery_volts: f32,
    pub manual_battery_override: bool,
    pub photocell_avg: u16,
    pub photocell_threshold: u16,
    pub length_of_night_ms: u32,
    pub override_until_ms: u32,
    pub battery_low_until_ms: u32,
    pub lights: [(Channel, LightMode); 7],
    pub levels: [u8; Channel::COUNT],
    pub motor_up: bool,
    pub motor_down: bool,
    pub anomalies_total: u32,
}

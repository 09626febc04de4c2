//! Photocell-driven time-of-day classifier.
//!
//! Raw photocell readings are accumulated every tick and folded into a
//! short circular history at a fixed interval.  The mean of that history is
//! compared against a threshold placed inside the long-run min/max envelope
//! of everything seen so far.  Crossings of the threshold, plus elapsed-time
//! rules, move the classifier around the day:
//!
//! ```text
//!   DAY ──[dark]──▶ EVENING ──[evening length]──▶ NIGHT ──[night − predawn]──▶ PREDAWN
//!    ▲                 │                            │                             │
//!    │               [light]                      [light]                       [light]
//!    │                 ▼                            ▼                             ▼
//!    └──[morning length]──────────────────────── MORNING ◀────────────────────────┘
//!                                                   │
//!                                                 [dark] ──▶ EVENING
//! ```
//!
//! The night length is learned from the previous night: the dark interval
//! from dusk to dawn, minus the evening phase.

use heapless::HistoryBuffer;
use log::info;
use serde::{Deserialize, Serialize};

use crate::config::SystemConfig;

/// Number of folded averages kept in the running window.
pub const HISTORY_DEPTH: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayPart {
    Evening,
    Night,
    Predawn,
    Morning,
    Day,
}

/// Phase lengths and sampling parameters, copied out of [`SystemConfig`].
#[derive(Debug, Clone, Copy)]
struct Phases {
    history_interval_ms: u32,
    threshold_percent: u8,
    evening_ms: u32,
    morning_ms: u32,
    predawn_ms: u32,
    default_night_ms: u32,
}

pub struct TimeOfDay {
    phases: Phases,
    history: HistoryBuffer<u16, HISTORY_DEPTH>,
    acc_sum: u64,
    acc_count: u32,
    last_fold: u32,
    seeded: bool,
    average: u16,
    min: u16,
    max: u16,
    part: DayPart,
    /// Start of the current Evening, Night or Morning phase.
    phase_start: u32,
    evening_start: u32,
    last_dark_ms: Option<u32>,
    length_of_night: u32,
    injected: Option<DayPart>,
}

impl TimeOfDay {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            phases: Phases {
                history_interval_ms: config.history_interval_ms,
                threshold_percent: config.night_day_threshold_percent.min(100),
                evening_ms: config.evening_length_ms,
                morning_ms: config.morning_length_ms,
                predawn_ms: config.predawn_length_ms,
                default_night_ms: config.default_night_length_ms,
            },
            history: HistoryBuffer::new(),
            acc_sum: 0,
            acc_count: 0,
            last_fold: 0,
            seeded: false,
            average: 0,
            min: config.photocell_initial_min,
            max: config.photocell_initial_max,
            part: DayPart::Day,
            phase_start: 0,
            evening_start: 0,
            last_dark_ms: None,
            length_of_night: config.default_night_length_ms,
            injected: config.injected_day_part,
        }
    }

    /// Feed one raw photocell reading and return the day part.
    pub fn update_average(&mut self, now: u32, raw: u16) -> DayPart {
        if let Some(part) = self.injected {
            return part;
        }
        if !self.seeded {
            self.seed(now, raw);
        }

        self.acc_sum += u64::from(raw);
        self.acc_count += 1;
        if now.wrapping_sub(self.last_fold) >= self.phases.history_interval_ms {
            self.fold();
            self.last_fold = now;
        }

        self.update_time_of_day(now)
    }

    /// Apply the hysteresis rules once.  At most one transition per call.
    pub fn update_time_of_day(&mut self, now: u32) -> DayPart {
        if let Some(part) = self.injected {
            return part;
        }

        let dark = self.average < self.threshold();
        let in_phase = now.wrapping_sub(self.phase_start);
        let next = match self.part {
            DayPart::Morning | DayPart::Day if dark => Some(DayPart::Evening),
            DayPart::Evening if in_phase >= self.phases.evening_ms => Some(DayPart::Night),
            DayPart::Night
                if in_phase >= self.length_of_night.saturating_sub(self.phases.predawn_ms) =>
            {
                Some(DayPart::Predawn)
            }
            DayPart::Evening | DayPart::Night | DayPart::Predawn if !dark => Some(DayPart::Morning),
            DayPart::Morning if in_phase >= self.phases.morning_ms => Some(DayPart::Day),
            _ => None,
        };

        if let Some(next) = next {
            self.enter(next, now);
        }
        self.part
    }

    /// Pin the classifier to `part`, bypassing the photocells.
    pub fn override_day_part(&mut self, part: DayPart) {
        info!("TIME OF DAY: pinned to {:?}", part);
        self.injected = Some(part);
    }

    pub fn clear_day_part_override(&mut self) {
        self.injected = None;
    }

    pub fn day_part(&self) -> DayPart {
        self.injected.unwrap_or(self.part)
    }

    pub fn average(&self) -> u16 {
        self.average
    }

    pub fn envelope(&self) -> (u16, u16) {
        (self.min, self.max)
    }

    /// `min + (max − min) · pct / 100`.
    pub fn threshold(&self) -> u16 {
        let span = u32::from(self.max - self.min);
        (u32::from(self.min) + span * u32::from(self.phases.threshold_percent) / 100) as u16
    }

    pub fn length_of_night(&self) -> u32 {
        self.length_of_night
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn seed(&mut self, now: u32, raw: u16) {
        self.history.write(raw);
        self.average = raw;
        self.widen(raw);
        self.last_fold = now;
        self.seeded = true;
    }

    fn fold(&mut self) {
        if self.acc_count == 0 {
            return;
        }
        let mean = (self.acc_sum / u64::from(self.acc_count)) as u16;
        self.acc_sum = 0;
        self.acc_count = 0;

        self.history.write(mean);
        let len = self.history.len() as u32;
        let sum: u32 = self.history.as_slice().iter().map(|&v| u32::from(v)).sum();
        self.average = (sum / len) as u16;
        self.widen(self.average);
    }

    fn widen(&mut self, value: u16) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    fn enter(&mut self, next: DayPart, now: u32) {
        match next {
            DayPart::Evening => {
                self.evening_start = now;
                self.phase_start = now;
            }
            DayPart::Night => {
                self.length_of_night = self.last_dark_ms.map_or(self.phases.default_night_ms, |dark| {
                    dark.saturating_sub(self.phases.evening_ms)
                });
                self.phase_start = now;
            }
            DayPart::Morning => {
                if matches!(self.part, DayPart::Night | DayPart::Predawn) {
                    self.last_dark_ms = Some(now.wrapping_sub(self.evening_start));
                }
                self.phase_start = now;
            }
            DayPart::Predawn | DayPart::Day => {}
        }
        info!(
            "TIME OF DAY: {:?} -> {:?} (avg={}, threshold={})",
            self.part,
            next,
            self.average,
            self.threshold()
        );
        self.part = next;
    }
}

//! Sensor subsystem: running averages and the time-of-day classifier.
//!
//! The [`SensorHub`] takes one [`SensorSnapshot`] per tick and keeps a
//! short running average of each analog input so a single noisy ADC read
//! cannot flip the battery or day-part decisions.

pub mod time_of_day;

use heapless::HistoryBuffer;
use serde::Serialize;

/// Samples per running average.
pub const AVERAGE_DEPTH: usize = 10;

/// Raw inputs captured at the start of a tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SensorSnapshot {
    /// Photocell on the port side (raw ADC counts).
    pub photocell_1: u16,
    /// Photocell on the starboard side (raw ADC counts).
    pub photocell_2: u16,
    /// Battery divider (raw ADC counts).
    pub battery_raw: u16,
    /// Staff switch forcing the controller to ignore a low battery.
    pub manual_battery_override: bool,
}

/// Mean of the last [`AVERAGE_DEPTH`] samples.
#[derive(Default)]
pub struct RunningAverage {
    samples: HistoryBuffer<u16, AVERAGE_DEPTH>,
}

impl RunningAverage {
    pub fn new() -> Self {
        Self {
            samples: HistoryBuffer::new(),
        }
    }

    pub fn push(&mut self, sample: u16) {
        self.samples.write(sample);
    }

    /// Mean of the samples seen so far; zero before the first.
    pub fn mean(&self) -> u16 {
        let len = self.samples.len() as u32;
        if len == 0 {
            return 0;
        }
        let sum: u32 = self.samples.as_slice().iter().map(|&s| u32::from(s)).sum();
        (sum / len) as u16
    }
}

pub struct SensorHub {
    photocell_1: RunningAverage,
    photocell_2: RunningAverage,
    battery: RunningAverage,
    volts_per_count: f32,
    manual_battery_override: bool,
}

impl SensorHub {
    pub fn new(volts_per_count: f32) -> Self {
        Self {
            photocell_1: RunningAverage::new(),
            photocell_2: RunningAverage::new(),
            battery: RunningAverage::new(),
            volts_per_count,
            manual_battery_override: false,
        }
    }

    pub fn push(&mut self, snapshot: SensorSnapshot) {
        self.photocell_1.push(snapshot.photocell_1);
        self.photocell_2.push(snapshot.photocell_2);
        self.battery.push(snapshot.battery_raw);
        self.manual_battery_override = snapshot.manual_battery_override;
    }

    /// Mean of both photocell averages.
    pub fn photocell_average(&self) -> u16 {
        ((u32::from(self.photocell_1.mean()) + u32::from(self.photocell_2.mean())) / 2) as u16
    }

    pub fn battery_raw_average(&self) -> u16 {
        self.battery.mean()
    }

    pub fn battery_volts(&self) -> f32 {
        f32::from(self.battery.mean()) * self.volts_per_count
    }

    pub fn manual_battery_override(&self) -> bool {
        self.manual_battery_override
    }
}

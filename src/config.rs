//! System configuration parameters
//!
//! All tunable parameters for the exhibit controller.  Defaults match the
//! installed exhibit; a board build may deserialize an override from JSON.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::pins;
use crate::sensors::time_of_day::DayPart;

/// On/off timing for a blinking lamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlinkTiming {
    pub on_ms: u32,
    pub off_ms: u32,
    pub max_level: u8,
}

/// Flash-and-fade timing for a decaying lamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecayTiming {
    /// Time held at full level before the fade starts.
    pub on_ms: u32,
    /// Exponential time constant of the fade.
    pub tau_ms: u32,
    /// Length of the fade before the flash repeats.  `None` fades once.
    pub decay_ms: Option<u32>,
    pub max_level: u8,
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Battery ---
    /// Volts per raw ADC count on the battery divider
    pub battery_volts_per_count: f32,
    /// At or below this voltage the controller sheds load
    pub battery_low_volts: f32,
    /// Battery must rise above this voltage to leave battery-low
    pub battery_low_reset_volts: f32,

    // --- Mode timeouts ---
    /// How long a keypad override holds before automatic control resumes (ms)
    pub override_timeout_ms: u32,
    /// Minimum hold in battery-low after the last low reading (ms)
    pub battery_low_timeout_ms: u32,
    /// Startup period forced into battery-low while averages settle (ms)
    pub startup_grace_ms: u32,

    // --- Time of day ---
    /// Initial lower bound of the photocell envelope (raw counts)
    pub photocell_initial_min: u16,
    /// Initial upper bound of the photocell envelope (raw counts)
    pub photocell_initial_max: u16,
    /// Night/day threshold as a percentage of the envelope span
    pub night_day_threshold_percent: u8,
    /// Period at which photocell samples are folded into history (ms)
    pub history_interval_ms: u32,
    /// Evening phase length after dusk (ms)
    pub evening_length_ms: u32,
    /// Morning phase length after dawn (ms)
    pub morning_length_ms: u32,
    /// Predawn phase length before the expected dawn (ms)
    pub predawn_length_ms: u32,
    /// Night length used until a full dark interval has been measured (ms)
    pub default_night_length_ms: u32,
    /// Pin the day part instead of classifying the photocells (testing)
    pub injected_day_part: Option<DayPart>,

    // --- Motor ---
    /// Delay between a start request and energising the relay (ms)
    pub motor_start_delay_ms: u32,
    /// Maximum run time measured from the start request (ms)
    pub motor_max_run_ms: u32,

    // --- Lights ---
    pub status_fast: BlinkTiming,
    pub status_slow: BlinkTiming,
    /// Landing light cycle during the day
    pub landing_day: BlinkTiming,
    /// Position light flash
    pub position: DecayTiming,

    // --- Timing ---
    /// Control loop interval (milliseconds)
    pub control_loop_interval_ms: u32,
    /// Continuous telemetry interval (milliseconds)
    pub telemetry_interval_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Battery (12 V lead-acid, 43k/10k divider, 12-bit ADC at 12 dB)
            battery_volts_per_count: pins::ADC_FULL_SCALE_VOLTS * pins::BATTERY_DIVIDER_RATIO
                / f32::from(pins::ADC_MAX_COUNT),
            battery_low_volts: 11.5,
            battery_low_reset_volts: 12.0,

            // Mode timeouts
            override_timeout_ms: 2 * HOUR_MS,
            battery_low_timeout_ms: 5 * MINUTE_MS,
            startup_grace_ms: 2_000,

            // Time of day
            photocell_initial_min: 400,
            photocell_initial_max: 3_600,
            night_day_threshold_percent: 30,
            history_interval_ms: 30_000,
            evening_length_ms: 4 * HOUR_MS,
            morning_length_ms: 2 * HOUR_MS,
            predawn_length_ms: 2 * HOUR_MS,
            default_night_length_ms: 8 * HOUR_MS,
            injected_day_part: None,

            // Motor
            motor_start_delay_ms: 2_000,
            motor_max_run_ms: 45_000,

            // Lights
            status_fast: BlinkTiming {
                on_ms: 250,
                off_ms: 250,
                max_level: 255,
            },
            status_slow: BlinkTiming {
                on_ms: 1_000,
                off_ms: 1_000,
                max_level: 255,
            },
            landing_day: BlinkTiming {
                on_ms: 5 * MINUTE_MS,
                off_ms: 5 * MINUTE_MS,
                max_level: 255,
            },
            position: DecayTiming {
                on_ms: 250,
                tau_ms: 200,
                decay_ms: Some(850),
                max_level: 255,
            },

            // Timing
            control_loop_interval_ms: 20,  // 50 Hz, fine enough for the fades
            telemetry_interval_ms: 5_000,
        }
    }
}

const MINUTE_MS: u32 = 60_000;
const HOUR_MS: u32 = 60 * MINUTE_MS;

impl SystemConfig {
    /// Reject configurations the controller cannot run safely.
    pub fn validate(&self) -> Result<()> {
        if self.battery_volts_per_count <= 0.0 {
            return Err(Error::Config("battery_volts_per_count must be positive"));
        }
        if self.battery_low_volts >= self.battery_low_reset_volts {
            return Err(Error::Config(
                "battery_low_volts must be below battery_low_reset_volts",
            ));
        }
        if self.photocell_initial_min > self.photocell_initial_max {
            return Err(Error::Config("photocell envelope min above max"));
        }
        if self.photocell_initial_max > pins::ADC_MAX_COUNT {
            return Err(Error::Config("photocell envelope beyond the ADC range"));
        }
        if self.night_day_threshold_percent > 100 {
            return Err(Error::Config("night_day_threshold_percent above 100"));
        }
        if self.history_interval_ms == 0 || self.control_loop_interval_ms == 0 {
            return Err(Error::Config("intervals must be non-zero"));
        }
        if self.predawn_length_ms >= self.default_night_length_ms {
            return Err(Error::Config("predawn must be shorter than the night"));
        }
        if self.motor_start_delay_ms >= self.motor_max_run_ms {
            return Err(Error::Config("motor start delay must be below max run"));
        }
        for blink in [self.status_fast, self.status_slow, self.landing_day] {
            match blink.on_ms.checked_add(blink.off_ms) {
                None => return Err(Error::Config("blink period overflows")),
                Some(0) => return Err(Error::Config("blink period must be non-zero")),
                Some(_) => {}
            }
        }
        Ok(())
    }
}

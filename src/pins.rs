//! GPIO / peripheral pin assignments for the exhibit controller board.
//!
//! Single source of truth: the board entry point and the ADC setup
//! reference this module rather than hard-coding pin numbers.

use crate::channels::Channel;

// ---------------------------------------------------------------------------
// Output channels (LEDC PWM for dimmable lights, plain GPIO for switched)
// ---------------------------------------------------------------------------

pub const IDENT_GPIO: i32 = 1;
pub const LANDING_GPIO: i32 = 2;
/// Actuator relay, extend.
pub const MOTOR_UP_GPIO: i32 = 3;
pub const ILLUM_GPIO: i32 = 4;
/// Position light, decay-dimmed.
pub const POSITION_GPIO: i32 = 5;
pub const FORMATION_GPIO: i32 = 6;
/// Actuator relay, retract.
pub const MOTOR_DOWN_GPIO: i32 = 7;
pub const BLUE_STATUS_GPIO: i32 = 15;
pub const RED_STATUS_GPIO: i32 = 13;

/// GPIO for each output channel, in [`Channel::ALL`] order.
pub const fn channel_gpio(channel: Channel) -> i32 {
    match channel {
        Channel::Ident => IDENT_GPIO,
        Channel::Landing => LANDING_GPIO,
        Channel::MotorUp => MOTOR_UP_GPIO,
        Channel::Illum => ILLUM_GPIO,
        Channel::Position => POSITION_GPIO,
        Channel::Formation => FORMATION_GPIO,
        Channel::MotorDown => MOTOR_DOWN_GPIO,
        Channel::BlueStatus => BLUE_STATUS_GPIO,
        Channel::RedStatus => RED_STATUS_GPIO,
    }
}

// ---------------------------------------------------------------------------
// Sensors: Analog (ADC1)
// ---------------------------------------------------------------------------

/// Port-side photocell divider.  ADC1 channel 8 (GPIO 9).
pub const PHOTOCELL_1_ADC_CH: u32 = 8;
/// Starboard-side photocell divider.  ADC1 channel 9 (GPIO 10).
pub const PHOTOCELL_2_ADC_CH: u32 = 9;
/// 12 V battery through a resistive divider.  ADC1 channel 7 (GPIO 8).
pub const BATTERY_ADC_CH: u32 = 7;

/// Largest 12-bit oneshot reading.
pub const ADC_MAX_COUNT: u16 = 4095;
/// Input voltage at [`ADC_MAX_COUNT`] with 12 dB attenuation.
pub const ADC_FULL_SCALE_VOLTS: f32 = 3.1;
/// Battery divider, 43k over 10k: battery volts per volt at the pin.
pub const BATTERY_DIVIDER_RATIO: f32 = (43.0 + 10.0) / 10.0;

// ---------------------------------------------------------------------------
// Sensors: Digital
// ---------------------------------------------------------------------------

/// Staff key switch: ignore a low battery.  Active-low with pull-up.
pub const BATTERY_OVERRIDE_GPIO: i32 = 14;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution.  8-bit duty matches the 0..=255 channel levels.
#[cfg(feature = "espidf")]
pub const PWM_RESOLUTION: esp_idf_hal::ledc::Resolution = esp_idf_hal::ledc::Resolution::Bits8;
/// LEDC base frequency for the light channels.
pub const LIGHT_PWM_FREQ_HZ: u32 = 1_000;

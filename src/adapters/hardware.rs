//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! [`ChannelOutputs`] drives the nine output channels through
//! `embedded-hal` PWM and GPIO traits and implements [`OutputPort`].
//! [`BoardSensors`] samples the photocells and battery divider and reads the
//! staff override switch, implementing [`SensorPort`].  [`HardwareAdapter`]
//! combines both so the service can be handed a single `hw` value.

use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::pwm::SetDutyCycle;
use log::warn;

use crate::app::ports::{OutputPort, SensorPort};
use crate::channels::{Channel, ChannelBank};
use crate::drivers::hw_init;
use crate::error::HwError;
use crate::lights::LEVEL_FULL;
use crate::pins;
use crate::sensors::SensorSnapshot;

// ───────────────────────────────────────────────────────────────
// Channel drivers
// ───────────────────────────────────────────────────────────────

/// One physical output.  `level` is the 8-bit channel value.
pub trait ChannelDriver {
    fn drive(&mut self, level: u8) -> Result<(), HwError>;
}

/// Dimmable output on a PWM pin.
pub struct PwmChannel<P> {
    pin: P,
}

impl<P: SetDutyCycle> PwmChannel<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P: SetDutyCycle> ChannelDriver for PwmChannel<P> {
    fn drive(&mut self, level: u8) -> Result<(), HwError> {
        self.pin
            .set_duty_cycle_fraction(u16::from(level), u16::from(LEVEL_FULL))
            .map_err(|_| HwError::PwmWriteFailed)
    }
}

/// On/off output (relay or plain lamp).  Any non-zero level is on.
pub struct SwitchedChannel<P> {
    pin: P,
}

impl<P: OutputPin> SwitchedChannel<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P: OutputPin> ChannelDriver for SwitchedChannel<P> {
    fn drive(&mut self, level: u8) -> Result<(), HwError> {
        let res = if level > 0 {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        res.map_err(|_| HwError::GpioWriteFailed)
    }
}

// ───────────────────────────────────────────────────────────────
// ChannelOutputs (OutputPort)
// ───────────────────────────────────────────────────────────────

/// The board's output bank.  Only channels whose level changed since the
/// last commit are written.
pub struct ChannelOutputs {
    drivers: [Option<Box<dyn ChannelDriver>>; Channel::COUNT],
    committed: ChannelBank,
    primed: bool,
    write_failures: u32,
}

impl Default for ChannelOutputs {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelOutputs {
    pub fn new() -> Self {
        Self {
            drivers: Default::default(),
            committed: ChannelBank::new(),
            primed: false,
            write_failures: 0,
        }
    }

    /// Attach a driver to `channel`, replacing any previous one.
    pub fn attach(&mut self, channel: Channel, driver: impl ChannelDriver + 'static) {
        self.drivers[channel.index()] = Some(Box::new(driver));
        self.primed = false;
    }

    /// Levels as last written to the pins.
    pub fn committed(&self) -> &ChannelBank {
        &self.committed
    }

    pub fn write_failures(&self) -> u32 {
        self.write_failures
    }
}

impl OutputPort for ChannelOutputs {
    fn write_channels(&mut self, bank: &ChannelBank) {
        for (channel, level) in bank.iter() {
            if self.primed && self.committed.get(channel) == level {
                continue;
            }
            let Some(driver) = self.drivers[channel.index()].as_mut() else {
                continue;
            };
            match driver.drive(level) {
                Ok(()) => self.committed.set(channel, level),
                Err(e) => {
                    self.write_failures = self.write_failures.saturating_add(1);
                    warn!("output {} ({}): {}", channel.label(), pins::channel_gpio(channel), e);
                }
            }
        }
        self.primed = true;
    }
}

// ───────────────────────────────────────────────────────────────
// BoardSensors (SensorPort)
// ───────────────────────────────────────────────────────────────

/// ADC sampler: channel number in, raw counts out.
pub type Sampler = fn(u32) -> u16;

pub struct BoardSensors<P> {
    override_switch: P,
    sample: Sampler,
}

impl<P: InputPin> BoardSensors<P> {
    /// Sample through the ADC1 oneshot unit.
    pub fn new(override_switch: P) -> Self {
        Self::with_sampler(override_switch, hw_init::adc1_read)
    }

    pub fn with_sampler(override_switch: P, sample: Sampler) -> Self {
        Self {
            override_switch,
            sample,
        }
    }
}

impl<P: InputPin> SensorPort for BoardSensors<P> {
    fn read_all(&mut self) -> SensorSnapshot {
        // Switch is active-low; an unreadable switch counts as released.
        let manual_battery_override = self.override_switch.is_low().unwrap_or_else(|_| {
            warn!("battery override switch: {}", HwError::GpioReadFailed);
            false
        });
        SensorSnapshot {
            photocell_1: (self.sample)(pins::PHOTOCELL_1_ADC_CH),
            photocell_2: (self.sample)(pins::PHOTOCELL_2_ADC_CH),
            battery_raw: (self.sample)(pins::BATTERY_ADC_CH),
            manual_battery_override,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// HardwareAdapter
// ───────────────────────────────────────────────────────────────

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<P> {
    sensors: BoardSensors<P>,
    outputs: ChannelOutputs,
}

impl<P: InputPin> HardwareAdapter<P> {
    pub fn new(sensors: BoardSensors<P>, outputs: ChannelOutputs) -> Self {
        Self { sensors, outputs }
    }

    pub fn outputs(&self) -> &ChannelOutputs {
        &self.outputs
    }
}

impl<P: InputPin> SensorPort for HardwareAdapter<P> {
    fn read_all(&mut self) -> SensorSnapshot {
        self.sensors.read_all()
    }
}

impl<P: InputPin> OutputPort for HardwareAdapter<P> {
    fn write_channels(&mut self, bank: &ChannelBank) {
        self.outputs.write_channels(bank);
    }
}

//! Unified error types for the navlights controller.
//!
//! Nothing in the control core aborts the polling loop.  Anomalies are
//! detected, logged, counted by [`AnomalyLog`](crate::diagnostics::AnomalyLog)
//! and surfaced as events.  All variants are `Copy` so they travel through
//! the FSM context and event sink without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level controller error
// ---------------------------------------------------------------------------

/// Every anomaly or failure in the controller funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Arming a timeout would have overflowed the millisecond clock.
    TimerWrap(TimerWrap),
    /// The up/down motor interlock was violated.
    Interlock(InterlockViolation),
    /// An unrecognised command symbol arrived from the keypad or console.
    Command(InvalidCommand),
    /// Configuration failed validation.
    Config(&'static str),
    /// An output or input channel could not be driven or read.
    Hardware(HwError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TimerWrap(e) => write!(f, "timer: {e}"),
            Self::Interlock(e) => write!(f, "motor: {e}"),
            Self::Command(e) => write!(f, "command: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Hardware(e) => write!(f, "hardware: {e}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Timer wrap
// ---------------------------------------------------------------------------

/// Which timeout was being armed when the clock would have wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerId {
    Override,
    BatteryLow,
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Override => write!(f, "override"),
            Self::BatteryLow => write!(f, "battery-low"),
        }
    }
}

/// `now + duration` did not fit in 32 bits.  The deadline still runs for
/// the full duration, measured across the wrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerWrap {
    pub timer: TimerId,
    pub now_ms: u32,
    pub requested_ms: u32,
}

impl fmt::Display for TimerWrap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} timeout of {} ms at t={} wraps the clock",
            self.timer, self.requested_ms, self.now_ms
        )
    }
}

impl From<TimerWrap> for Error {
    fn from(e: TimerWrap) -> Self {
        Self::TimerWrap(e)
    }
}

// ---------------------------------------------------------------------------
// Motor interlock
// ---------------------------------------------------------------------------

/// Both motor directions were requested, or both outputs were driven.
/// The controller stops both directions when this is detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterlockViolation {
    /// Both direction flags were set.
    pub both_active: bool,
    /// Both output channels were non-zero.
    pub both_driven: bool,
}

impl fmt::Display for InterlockViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "interlock violated (both_active={}, both_driven={}), motor stopped",
            self.both_active, self.both_driven
        )
    }
}

impl From<InterlockViolation> for Error {
    fn from(e: InterlockViolation) -> Self {
        Self::Interlock(e)
    }
}

// ---------------------------------------------------------------------------
// Command errors
// ---------------------------------------------------------------------------

/// A command symbol with no mapping.  Ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidCommand(pub char);

impl fmt::Display for InvalidCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown command symbol {:?}", self.0)
    }
}

impl From<InvalidCommand> for Error {
    fn from(e: InvalidCommand) -> Self {
        Self::Command(e)
    }
}

// ---------------------------------------------------------------------------
// Hardware errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwError {
    /// PWM duty-cycle write failed.
    PwmWriteFailed,
    /// GPIO set failed.
    GpioWriteFailed,
    /// GPIO read failed.
    GpioReadFailed,
}

impl fmt::Display for HwError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PwmWriteFailed => write!(f, "PWM write failed"),
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
            Self::GpioReadFailed => write!(f, "GPIO read failed"),
        }
    }
}

impl From<HwError> for Error {
    fn from(e: HwError) -> Self {
        Self::Hardware(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Controller-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;

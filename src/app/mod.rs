//! Application core: pure domain logic, zero I/O.
//!
//! Per-tick orchestration of the exhibit: sensor averaging, time-of-day
//! classification, mode arbitration, light patterns and the actuator
//! interlock.  All interaction with hardware happens through **port
//! traits** defined in [`ports`], keeping this layer fully testable without
//! real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;

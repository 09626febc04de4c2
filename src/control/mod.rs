//! Actuator control.

pub mod motor;

pub use motor::{Direction, MotorPhase, UpDownMotor};

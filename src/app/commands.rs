//! Inbound commands to the application service.
//!
//! The remote keypad and the serial console both deliver single symbols.
//! [`AppCommand::from_symbol`] is the one place that maps them.
//!
//! | Symbol      | Command                         |
//! |-------------|---------------------------------|
//! | `0`         | all off, motor stopped          |
//! | `8`         | all named lights on             |
//! | `1 2 4 5 6` | toggle ident / landing / illum / position / formation |
//! | `B` `b`     | battery-low                     |
//! | `U` `D`     | actuator up / down              |
//! | `P`         | play: back to automatic control |
//! | `?`         | one status report               |
//! | `c` `s`     | continuous status on / off      |
//! | `i`         | controller info                 |

use crate::control::Direction;
use crate::error::InvalidCommand;
use crate::lights::LightId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    AllOff,
    AllLightsOn,
    Toggle(LightId),
    BatteryLow,
    Motor(Direction),
    Play,
    Status,
    StatusContinuous(bool),
    Info,
}

impl AppCommand {
    pub fn from_symbol(symbol: char) -> Result<Self, InvalidCommand> {
        let cmd = match symbol {
            '0' => Self::AllOff,
            '8' => Self::AllLightsOn,
            '1' => Self::Toggle(LightId::Ident),
            '2' => Self::Toggle(LightId::Landing),
            '4' => Self::Toggle(LightId::Illum),
            '5' => Self::Toggle(LightId::Position),
            '6' => Self::Toggle(LightId::Formation),
            'B' | 'b' => Self::BatteryLow,
            'U' => Self::Motor(Direction::Up),
            'D' => Self::Motor(Direction::Down),
            'P' => Self::Play,
            '?' => Self::Status,
            'c' => Self::StatusContinuous(true),
            's' => Self::StatusContinuous(false),
            'i' => Self::Info,
            other => return Err(InvalidCommand(other)),
        };
        Ok(cmd)
    }

    /// Commands that hand control to the keypad.
    pub fn routes_to_override(self) -> bool {
        matches!(self, Self::AllOff | Self::AllLightsOn | Self::Toggle(_))
    }
}

//! The exhibit's named light groups.
//!
//! Five "named" groups dress the aircraft (ident, landing, illumination,
//! position, formation).  Two status lamps (red, blue) signal the operating
//! mode to staff.  Keypad "all on / all off" commands act on the named
//! groups only.

use serde::Serialize;

use super::{Light, LightMode, Pattern, Speed};
use crate::channels::{Channel, ChannelBank};
use crate::config::SystemConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LightId {
    Ident,
    Landing,
    Illum,
    Position,
    Formation,
    RedStatus,
    BlueStatus,
}

impl LightId {
    /// Groups switched together by the keypad.
    pub const NAMED: [LightId; 5] = [
        Self::Ident,
        Self::Landing,
        Self::Illum,
        Self::Position,
        Self::Formation,
    ];

    pub const ALL: [LightId; 7] = [
        Self::Ident,
        Self::Landing,
        Self::Illum,
        Self::Position,
        Self::Formation,
        Self::RedStatus,
        Self::BlueStatus,
    ];
}

pub struct LightGroups {
    ident: Light,
    landing: Light,
    illum: Light,
    position: Light,
    formation: Light,
    red_status: Light,
    blue_status: Light,
}

impl LightGroups {
    pub fn new(config: &SystemConfig) -> Self {
        let status = || Pattern::selectable(config.status_fast, config.status_slow);
        Self {
            ident: Light::new(Channel::Ident, Pattern::Steady),
            landing: Light::new(Channel::Landing, Pattern::blink(config.landing_day)),
            illum: Light::new(Channel::Illum, Pattern::Steady),
            position: Light::new(Channel::Position, Pattern::decay(config.position)),
            formation: Light::new(Channel::Formation, Pattern::Steady),
            red_status: Light::new(Channel::RedStatus, status()),
            blue_status: Light::new(Channel::BlueStatus, status()),
        }
    }

    pub fn get(&self, id: LightId) -> &Light {
        match id {
            LightId::Ident => &self.ident,
            LightId::Landing => &self.landing,
            LightId::Illum => &self.illum,
            LightId::Position => &self.position,
            LightId::Formation => &self.formation,
            LightId::RedStatus => &self.red_status,
            LightId::BlueStatus => &self.blue_status,
        }
    }

    pub fn get_mut(&mut self, id: LightId) -> &mut Light {
        match id {
            LightId::Ident => &mut self.ident,
            LightId::Landing => &mut self.landing,
            LightId::Illum => &mut self.illum,
            LightId::Position => &mut self.position,
            LightId::Formation => &mut self.formation,
            LightId::RedStatus => &mut self.red_status,
            LightId::BlueStatus => &mut self.blue_status,
        }
    }

    /// Put one light into `mode`.  `Flashing` runs the light's own pattern.
    pub fn set(&mut self, id: LightId, mode: LightMode) {
        let light = self.get_mut(id);
        match mode {
            LightMode::On => light.on(),
            LightMode::Off => light.off(),
            LightMode::Flashing => {
                light.off();
                light.resume();
            }
        }
    }

    /// Flash a status lamp at `speed`.
    pub fn flash_status(&mut self, id: LightId, speed: Speed) {
        self.get_mut(id).set_speed(speed);
    }

    pub fn toggle(&mut self, id: LightId) {
        self.get_mut(id).toggle();
    }

    pub fn all_lights_on(&mut self) {
        for id in LightId::NAMED {
            self.get_mut(id).on();
        }
    }

    pub fn all_lights_off(&mut self) {
        for id in LightId::NAMED {
            self.get_mut(id).off();
        }
    }

    pub fn mode(&self, id: LightId) -> LightMode {
        self.get(id).light_mode()
    }

    pub fn update(&mut self, now: u32) {
        for id in LightId::ALL {
            self.get_mut(id).update(now);
        }
    }

    pub fn sync(&self, bank: &mut ChannelBank) {
        for id in LightId::ALL {
            self.get(id).sync(bank);
        }
    }
}

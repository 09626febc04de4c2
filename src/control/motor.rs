//! Reversible up/down actuator controller.
//!
//! Two relays on separate channels drive the actuator up or down.  A start
//! request arms a direction; the relay closes only after the start delay and
//! opens again once the maximum run time (measured from the request) is
//! exceeded, so a stuck limit switch cannot run the motor indefinitely.
//!
//! ```text
//!  Idle ──start──▶ Pending ──[elapsed ≥ delay]──▶ Driving ──[elapsed > max run]──▶ Idle
//!    ▲               │                              │
//!    └────stop───────┴──────────────stop────────────┘
//! ```
//!
//! ## Safety contract
//!
//! Both directions are never active and both relays are never closed at
//! once.  [`UpDownMotor::update`] checks this before anything else each
//! tick; on a violation it opens both relays and reports the fault.

use log::{error, info};

use crate::channels::{Channel, ChannelBank};
use crate::error::InterlockViolation;
use crate::lights::{LEVEL_FULL, LEVEL_OFF};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorPhase {
    Idle,
    Pending,
    Driving,
}

#[derive(Debug, Clone, Copy, Default)]
struct Travel {
    active: bool,
    started_at: u32,
}

pub struct UpDownMotor {
    up_channel: Channel,
    down_channel: Channel,
    up: Travel,
    down: Travel,
    start_delay_ms: u32,
    max_run_ms: u32,
}

impl UpDownMotor {
    pub fn new(up_channel: Channel, down_channel: Channel, start_delay_ms: u32, max_run_ms: u32) -> Self {
        Self {
            up_channel,
            down_channel,
            up: Travel::default(),
            down: Travel::default(),
            start_delay_ms,
            max_run_ms,
        }
    }

    /// Request travel in `dir`.  Re-requesting an active direction restarts
    /// its delay and run timer.
    pub fn start(&mut self, dir: Direction, now: u32) {
        let travel = self.travel_mut(dir);
        travel.active = true;
        travel.started_at = now;
        info!("motor {:?}: start requested at t={}", dir, now);
    }

    /// Stop one direction in any phase.
    pub fn stop(&mut self, dir: Direction, bank: &mut ChannelBank) {
        self.travel_mut(dir).active = false;
        bank.set(self.channel(dir), LEVEL_OFF);
    }

    pub fn stop_all(&mut self, bank: &mut ChannelBank) {
        self.stop(Direction::Up, bank);
        self.stop(Direction::Down, bank);
    }

    /// Evaluate both directions for `now` and write their relay levels.
    pub fn update(&mut self, now: u32, bank: &mut ChannelBank) -> Result<(), InterlockViolation> {
        let both_active = self.up.active && self.down.active;
        let both_driven = bank.is_on(self.up_channel) && bank.is_on(self.down_channel);
        if both_active || both_driven {
            self.stop_all(bank);
            let violation = InterlockViolation {
                both_active,
                both_driven,
            };
            error!("MOTOR FAULT: {violation}");
            return Err(violation);
        }

        self.update_direction(Direction::Up, now, bank);
        self.update_direction(Direction::Down, now, bank);
        Ok(())
    }

    pub fn is_active(&self, dir: Direction) -> bool {
        self.travel(dir).active
    }

    pub fn phase(&self, dir: Direction, bank: &ChannelBank) -> MotorPhase {
        if !self.travel(dir).active {
            MotorPhase::Idle
        } else if bank.is_on(self.channel(dir)) {
            MotorPhase::Driving
        } else {
            MotorPhase::Pending
        }
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn update_direction(&mut self, dir: Direction, now: u32, bank: &mut ChannelBank) {
        let (start_delay_ms, max_run_ms) = (self.start_delay_ms, self.max_run_ms);
        let channel = self.channel(dir);
        let travel = self.travel_mut(dir);
        if !travel.active {
            bank.set(channel, LEVEL_OFF);
            return;
        }

        let elapsed = now.wrapping_sub(travel.started_at);
        if elapsed > max_run_ms {
            travel.active = false;
            bank.set(channel, LEVEL_OFF);
            info!("motor {:?}: max run time reached, stopped", dir);
        } else if elapsed >= start_delay_ms {
            bank.set(channel, LEVEL_FULL);
        } else {
            bank.set(channel, LEVEL_OFF);
        }
    }

    fn channel(&self, dir: Direction) -> Channel {
        match dir {
            Direction::Up => self.up_channel,
            Direction::Down => self.down_channel,
        }
    }

    fn travel(&self, dir: Direction) -> &Travel {
        match dir {
            Direction::Up => &self.up,
            Direction::Down => &self.down,
        }
    }

    fn travel_mut(&mut self, dir: Direction) -> &mut Travel {
        match dir {
            Direction::Up => &mut self.up,
            Direction::Down => &mut self.down,
        }
    }
}

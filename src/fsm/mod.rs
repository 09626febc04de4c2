//! Function-pointer operating-mode state machine.
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │  StateTable                                   │
//! │  ┌────────────┬───────────┬─────────────────┐ │
//! │  │ Mode       │ on_enter  │ on_update       │ │
//! │  ├────────────┼───────────┼─────────────────┤ │
//! │  │ NotSet     │ -         │ track/protect   │ │
//! │  │ Override   │ fn(ctx)   │ timeout         │ │
//! │  │ BatteryLow │ fn(ctx)   │ recover/refresh │ │
//! │  │ Evening …  │ fn(ctx)   │ track/protect   │ │
//! │  └────────────┴───────────┴─────────────────┘ │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! Each tick the engine calls `on_update` for the current mode (the
//! "statemap").  A returned mode different from the current one runs its
//! `on_enter`.  [`Fsm::force_transition`] is the keypad's `set_to_mode`:
//! re-selecting the current mode is a no-op, so entry side effects (light
//! patterns, timeout arming) happen exactly once per change.
//!
//! While the context is in startup the statemap is bypassed and the mode is
//! held in `BatteryLow`.  When the grace period is over the track-or-protect
//! rule is applied straight away.

pub mod context;
pub mod states;

use context::FsmContext;
use log::info;
use serde::Serialize;

use crate::sensors::time_of_day::DayPart;

// ---------------------------------------------------------------------------
// Mode identity
// ---------------------------------------------------------------------------

/// Top-level operating mode.
/// Must stay in sync with the table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum Mode {
    NotSet = 0,
    Override = 1,
    BatteryLow = 2,
    Evening = 3,
    Night = 4,
    Predawn = 5,
    Morning = 6,
    Day = 7,
}

impl Mode {
    pub const COUNT: usize = 8;

    /// Convert an index back to `Mode`.  Asserts in debug builds; returns
    /// `BatteryLow` in release.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::NotSet,
            1 => Self::Override,
            2 => Self::BatteryLow,
            3 => Self::Evening,
            4 => Self::Night,
            5 => Self::Predawn,
            6 => Self::Morning,
            7 => Self::Day,
            _ => {
                debug_assert!(false, "invalid mode index: {idx}");
                Self::BatteryLow
            }
        }
    }
}

impl From<DayPart> for Mode {
    fn from(part: DayPart) -> Self {
        match part {
            DayPart::Evening => Self::Evening,
            DayPart::Night => Self::Night,
            DayPart::Predawn => Self::Predawn,
            DayPart::Morning => Self::Morning,
            DayPart::Day => Self::Day,
        }
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Entry action, run once when the mode is selected.
pub type StateActionFn = fn(&mut FsmContext);

/// Per-tick rule.  Returns the wanted mode, or `None` to stay.
pub type StateUpdateFn = fn(&mut FsmContext) -> Option<Mode>;

/// Static descriptor for a single mode.
pub struct StateDescriptor {
    pub id: Mode,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

pub struct Fsm {
    table: [StateDescriptor; Mode::COUNT],
    current: usize,
    tick_count: u64,
}

impl Fsm {
    pub fn new(table: [StateDescriptor; Mode::COUNT], initial: Mode) -> Self {
        Self {
            table,
            current: initial as usize,
            tick_count: 0,
        }
    }

    /// Run the initial `on_enter` for the starting mode.
    pub fn start(&mut self, ctx: &mut FsmContext) {
        info!("FSM starting in mode: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Evaluate the statemap once for `ctx.now_ms`.
    pub fn tick(&mut self, ctx: &mut FsmContext) {
        self.tick_count += 1;

        if ctx.in_startup {
            if ctx.startup_elapsed() <= ctx.config.startup_grace_ms {
                self.force_transition(Mode::BatteryLow, ctx);
                return;
            }
            ctx.in_startup = false;
            info!("FSM: startup grace over at t={}", ctx.now_ms);
            let next = states::track_or_protect(ctx);
            self.force_transition(next, ctx);
            return;
        }

        if let Some(next) = (self.table[self.current].on_update)(ctx) {
            self.force_transition(next, ctx);
        }
    }

    /// Select `next`, running its entry action only if it differs from the
    /// current mode.
    pub fn force_transition(&mut self, next: Mode, ctx: &mut FsmContext) {
        if next as usize != self.current {
            self.transition(next, ctx);
        }
    }

    pub fn current_state(&self) -> Mode {
        Mode::from_index(self.current)
    }

    /// Statemap evaluations since construction.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next: Mode, ctx: &mut FsmContext) {
        let next_idx = next as usize;
        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );
        self.current = next_idx;
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}

//! Concrete mode handler functions and table builder.
//!
//! Entry actions dress the exhibit for a mode.  Update handlers are the
//! per-tick transition rules.
//!
//! ```text
//!  (startup) ──[grace over]──▶ track or protect
//!
//!  OVERRIDE ──[override timeout]──▶ live day-part mode
//!
//!  BATTERYLOW ──[battery > reset AND timeout]──▶ live day-part mode
//!      │  └──[battery ≤ low]──▶ refresh timeout, stay
//!
//!  NOTSET / EVENING / NIGHT / PREDAWN / MORNING / DAY
//!      ├──[override switch OR battery ≥ low]──▶ live day-part mode
//!      └──[otherwise]──────────────────────────▶ BATTERYLOW
//! ```
//!
//! | Mode       | ident | landing  | illum | position | formation | red  | blue |
//! |------------|-------|----------|-------|----------|-----------|------|------|
//! | Override   | off   | off      | off   | off      | off       | slow | slow |
//! | BatteryLow | off   | off      | off   | off      | off       | fast | fast |
//! | Evening    | on    | on       | off   | flashing | on        | off  | slow |
//! | Night      | off   | off      | off   | off      | off       | off  | on   |
//! | Predawn    | on    | on       | off   | flashing | on        | slow | on   |
//! | Morning    | on    | on       | off   | flashing | on        | slow | off  |
//! | Day        | on    | flashing | off   | flashing | on        | on   | off  |

use super::context::FsmContext;
use super::{Mode, StateDescriptor};
use crate::lights::{LightId, LightMode, Speed};
use log::{info, warn};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static mode table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; Mode::COUNT] {
    [
        StateDescriptor {
            id: Mode::NotSet,
            name: "NotSet",
            on_enter: None,
            on_update: tracking_update,
        },
        StateDescriptor {
            id: Mode::Override,
            name: "Override",
            on_enter: Some(override_enter),
            on_update: override_update,
        },
        StateDescriptor {
            id: Mode::BatteryLow,
            name: "BatteryLow",
            on_enter: Some(battery_low_enter),
            on_update: battery_low_update,
        },
        StateDescriptor {
            id: Mode::Evening,
            name: "Evening",
            on_enter: Some(evening_enter),
            on_update: tracking_update,
        },
        StateDescriptor {
            id: Mode::Night,
            name: "Night",
            on_enter: Some(night_enter),
            on_update: tracking_update,
        },
        StateDescriptor {
            id: Mode::Predawn,
            name: "Predawn",
            on_enter: Some(predawn_enter),
            on_update: tracking_update,
        },
        StateDescriptor {
            id: Mode::Morning,
            name: "Morning",
            on_enter: Some(morning_enter),
            on_update: tracking_update,
        },
        StateDescriptor {
            id: Mode::Day,
            name: "Day",
            on_enter: Some(day_enter),
            on_update: tracking_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  Shared rules
// ═══════════════════════════════════════════════════════════════════════════

/// Follow the day part unless the battery needs protecting.
pub fn track_or_protect(ctx: &FsmContext) -> Mode {
    if ctx.inputs.manual_battery_override || ctx.inputs.battery_volts >= ctx.config.battery_low_volts {
        ctx.live_mode()
    } else {
        Mode::BatteryLow
    }
}

fn tracking_update(ctx: &mut FsmContext) -> Option<Mode> {
    Some(track_or_protect(ctx))
}

/// Ident, formation and position lit, illumination off.
fn dress(ctx: &mut FsmContext, landing: LightMode) {
    let lights = &mut ctx.lights;
    lights.set(LightId::Ident, LightMode::On);
    lights.set(LightId::Landing, landing);
    lights.set(LightId::Illum, LightMode::Off);
    lights.set(LightId::Position, LightMode::Flashing);
    lights.set(LightId::Formation, LightMode::On);
}

// ═══════════════════════════════════════════════════════════════════════════
//  OVERRIDE: keypad in control
// ═══════════════════════════════════════════════════════════════════════════

fn override_enter(ctx: &mut FsmContext) {
    ctx.lights.all_lights_off();
    ctx.lights.flash_status(LightId::RedStatus, Speed::Slow);
    ctx.lights.flash_status(LightId::BlueStatus, Speed::Slow);
    ctx.arm_override_timeout();
    info!(
        "OVERRIDE: manual control until t={}",
        ctx.override_timeout.at()
    );
}

fn override_update(ctx: &mut FsmContext) -> Option<Mode> {
    if ctx.override_timeout.expired(ctx.now_ms) {
        info!("OVERRIDE: timed out, resuming automatic control");
        return Some(ctx.live_mode());
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  BATTERYLOW: shed load until the battery recovers
// ═══════════════════════════════════════════════════════════════════════════

fn battery_low_enter(ctx: &mut FsmContext) {
    ctx.all_off();
    ctx.lights.flash_status(LightId::RedStatus, Speed::Fast);
    ctx.lights.flash_status(LightId::BlueStatus, Speed::Fast);
    ctx.arm_battery_low_timeout();
    warn!(
        "BATTERYLOW: load shed at {:.2} V, holding until t={}",
        ctx.inputs.battery_volts,
        ctx.battery_low_timeout.at()
    );
}

fn battery_low_update(ctx: &mut FsmContext) -> Option<Mode> {
    if ctx.battery_is_low() {
        ctx.arm_battery_low_timeout();
        return None;
    }
    if ctx.inputs.battery_volts > ctx.config.battery_low_reset_volts
        && ctx.battery_low_timeout.expired(ctx.now_ms)
    {
        info!(
            "BATTERYLOW: recovered to {:.2} V, resuming automatic control",
            ctx.inputs.battery_volts
        );
        return Some(ctx.live_mode());
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  Day-part modes
// ═══════════════════════════════════════════════════════════════════════════

fn evening_enter(ctx: &mut FsmContext) {
    dress(ctx, LightMode::On);
    ctx.lights.set(LightId::RedStatus, LightMode::Off);
    ctx.lights.flash_status(LightId::BlueStatus, Speed::Slow);
}

fn night_enter(ctx: &mut FsmContext) {
    ctx.lights.all_lights_off();
    ctx.lights.set(LightId::RedStatus, LightMode::Off);
    ctx.lights.set(LightId::BlueStatus, LightMode::On);
}

fn predawn_enter(ctx: &mut FsmContext) {
    dress(ctx, LightMode::On);
    ctx.lights.flash_status(LightId::RedStatus, Speed::Slow);
    ctx.lights.set(LightId::BlueStatus, LightMode::On);
}

fn morning_enter(ctx: &mut FsmContext) {
    dress(ctx, LightMode::On);
    ctx.lights.flash_status(LightId::RedStatus, Speed::Slow);
    ctx.lights.set(LightId::BlueStatus, LightMode::Off);
}

fn day_enter(ctx: &mut FsmContext) {
    dress(ctx, LightMode::Flashing);
    ctx.lights.set(LightId::RedStatus, LightMode::On);
    ctx.lights.set(LightId::BlueStatus, LightMode::Off);
}

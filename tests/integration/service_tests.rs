//! AppService lifecycle: startup grace, battery protection, timeouts and
//! the motor path, driven through mock adapters.

use navlights::app::events::AppEvent;
use navlights::channels::Channel;
use navlights::config::SystemConfig;
use navlights::control::Direction;
use navlights::error::{Error, TimerId};
use navlights::fsm::Mode;
use navlights::lights::{LightId, LightMode, Speed};

use crate::mock_hw::{BATTERY_GOOD_RAW, BATTERY_LOW_RAW, BATTERY_MID_RAW, Rig, TICK_MS};

fn short_override() -> SystemConfig {
    SystemConfig {
        override_timeout_ms: 10_000,
        ..SystemConfig::default()
    }
}

// ── Startup ───────────────────────────────────────────────────

#[test]
fn startup_holds_battery_low_then_tracks_day() {
    let mut rig = Rig::new(SystemConfig::default());
    assert_eq!(rig.app.mode(), Mode::BatteryLow);
    assert!(matches!(rig.sink.events.first(), Some(AppEvent::Started(Mode::BatteryLow))));

    rig.run_for(2_000);
    assert_eq!(rig.app.mode(), Mode::BatteryLow, "grace period is inclusive");

    rig.tick();
    assert_eq!(rig.app.mode(), Mode::Day);
    assert!(rig.sink.events.iter().any(|e| matches!(
        e,
        AppEvent::ModeChanged { from: Mode::BatteryLow, to: Mode::Day }
    )));

    assert_eq!(rig.hw.level(Channel::Ident), 255);
    assert_eq!(rig.hw.level(Channel::Formation), 255);
    assert_eq!(rig.hw.level(Channel::Illum), 0);
    assert_eq!(rig.hw.level(Channel::RedStatus), 255);
    assert_eq!(rig.hw.level(Channel::BlueStatus), 0);
    assert_eq!(rig.app.lights().mode(LightId::Landing), LightMode::Flashing);
    assert_eq!(rig.app.lights().mode(LightId::Position), LightMode::Flashing);
}

#[test]
fn startup_with_low_battery_stays_protected() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.hw.set_battery(BATTERY_LOW_RAW);
    rig.run_for(3_000);
    assert_eq!(rig.app.mode(), Mode::BatteryLow);
    assert_eq!(rig.app.lights().get(LightId::RedStatus).speed(), Some(Speed::Fast));
    assert_eq!(rig.app.lights().mode(LightId::BlueStatus), LightMode::Flashing);
}

#[test]
fn startup_with_mid_battery_goes_live() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.hw.set_battery(BATTERY_MID_RAW);
    rig.run_for(2_100);
    assert_eq!(rig.app.mode(), Mode::Day);
}

// ── Battery protection ────────────────────────────────────────

#[test]
fn falling_battery_enters_battery_low_and_stops_motor() {
    let mut rig = Rig::booted();
    rig.press('U');
    rig.run_for(2_000);
    assert!(rig.hw.last().is_on(Channel::MotorUp));

    rig.hw.set_battery(BATTERY_LOW_RAW);
    rig.run_for(1_000);
    assert_eq!(rig.app.mode(), Mode::BatteryLow);
    assert!(!rig.hw.last().is_on(Channel::MotorUp));
    for id in LightId::NAMED {
        assert_eq!(rig.app.lights().mode(id), LightMode::Off);
    }
}

#[test]
fn battery_low_exit_needs_reset_voltage_and_expired_timeout() {
    let mut rig = Rig::booted();
    rig.hw.set_battery(BATTERY_LOW_RAW);
    rig.run_for(1_000);
    assert_eq!(rig.app.mode(), Mode::BatteryLow);

    // Above the low threshold but never above reset: stays put.
    rig.hw.set_battery(BATTERY_MID_RAW);
    rig.run_for(6 * 60_000);
    assert_eq!(rig.app.mode(), Mode::BatteryLow);

    // Above reset and the timeout long expired: leaves on the next ticks.
    rig.hw.set_battery(BATTERY_GOOD_RAW);
    rig.run_for(1_000);
    assert_eq!(rig.app.mode(), Mode::Day);
}

#[test]
fn recovered_battery_waits_for_timeout() {
    let mut rig = Rig::booted();
    rig.hw.set_battery(BATTERY_LOW_RAW);
    rig.run_for(1_000);
    rig.hw.set_battery(BATTERY_GOOD_RAW);
    rig.run_for(60_000);
    assert_eq!(rig.app.mode(), Mode::BatteryLow);
    rig.run_for(5 * 60_000);
    assert_eq!(rig.app.mode(), Mode::Day);
}

#[test]
fn manual_override_switch_ignores_low_battery() {
    let mut rig = Rig::booted();
    rig.hw.snapshot.manual_battery_override = true;
    rig.hw.set_battery(BATTERY_LOW_RAW);
    rig.run_for(2_000);
    assert_eq!(rig.app.mode(), Mode::Day);
}

// ── Override timeout ──────────────────────────────────────────

#[test]
fn override_times_out_to_live_mode() {
    let mut rig = Rig::new(short_override());
    rig.run_for(2_100);
    rig.press('8');
    assert_eq!(rig.app.mode(), Mode::Override);

    rig.run_for(10_000 - TICK_MS);
    assert_eq!(rig.app.mode(), Mode::Override);
    rig.tick();
    assert_eq!(rig.app.mode(), Mode::Day);
}

#[test]
fn every_key_press_extends_override() {
    let mut rig = Rig::new(short_override());
    rig.run_for(2_100);
    rig.press('8');
    rig.run_for(6_000);
    rig.press('1');
    let deadline = rig.app.context().override_timeout.at();
    assert_eq!(deadline, rig.now + 10_000);

    rig.run_for(6_000);
    assert_eq!(rig.app.mode(), Mode::Override, "second press restarted the hold");
    rig.run_for(4_100);
    assert_eq!(rig.app.mode(), Mode::Day);
}

#[test]
fn override_across_clock_wrap_holds_full_timeout() {
    let mut rig = Rig::starting_at(short_override(), u32::MAX - 3_000);
    rig.run_for(2_100);
    assert_eq!(rig.app.mode(), Mode::Day);
    assert_eq!(rig.now, u32::MAX - 900);

    rig.press('8');
    assert_eq!(rig.app.context().override_timeout.at(), 10_000 - 901);
    let override_wraps = rig.sink.count(|e| {
        matches!(e, AppEvent::Anomaly(Error::TimerWrap(w)) if w.timer == TimerId::Override)
    });
    assert_eq!(override_wraps, 1);

    // Not cut short at the wrap.
    rig.run_for(920);
    assert!(rig.now < 1_000);
    assert_eq!(rig.app.mode(), Mode::Override);

    rig.run_for(10_000 - 920 - TICK_MS);
    assert_eq!(rig.app.mode(), Mode::Override);
    rig.tick();
    assert_eq!(rig.app.mode(), Mode::Day);
}

// ── Motor ─────────────────────────────────────────────────────

#[test]
fn motor_start_delay_and_max_run() {
    let mut rig = Rig::booted();
    rig.press('U');
    assert!(rig.app.context().motor.is_active(Direction::Up));
    rig.run_for(2_000 - TICK_MS);
    assert!(!rig.hw.last().is_on(Channel::MotorUp), "still in start delay");
    rig.tick();
    assert!(rig.hw.last().is_on(Channel::MotorUp));

    rig.run_for(45_000 - 2_000);
    assert!(rig.hw.last().is_on(Channel::MotorUp), "max run is exclusive");
    rig.tick();
    assert!(!rig.hw.last().is_on(Channel::MotorUp));
    assert!(!rig.app.context().motor.is_active(Direction::Up));
}

#[test]
fn reversing_stops_the_other_direction_first() {
    let mut rig = Rig::booted();
    rig.press('U');
    rig.run_for(3_000);
    assert!(rig.hw.last().is_on(Channel::MotorUp));

    rig.press('D');
    assert!(!rig.hw.last().is_on(Channel::MotorUp));
    assert!(!rig.hw.last().is_on(Channel::MotorDown));
    rig.run_for(2_000);
    assert!(rig.hw.last().is_on(Channel::MotorDown));
    assert!(!rig.hw.ever_drove_both_motors());
    assert_eq!(rig.app.mode(), Mode::Day, "motor keys leave the mode alone");
}

// ── Reporting ─────────────────────────────────────────────────

#[test]
fn status_key_emits_telemetry() {
    let mut rig = Rig::booted();
    rig.sink.clear();
    rig.press('?');
    let telemetry = rig.sink.events.iter().find_map(|e| match e {
        AppEvent::Telemetry(t) => Some(t.clone()),
        _ => None,
    });
    let t = telemetry.expect("telemetry emitted");
    assert_eq!(t.mode, Mode::Day);
    assert_eq!(t.ticks, 2_100 / u64::from(TICK_MS));
    assert_eq!(t.ticks, rig.app.tick_count());
    assert!(!t.in_startup);
    assert!(t.battery_volts > 12.0);
    assert_eq!(t.levels[Channel::Ident.index()], 255);

    let json = serde_json::to_string(&t).unwrap();
    assert!(json.contains("\"mode\":\"Day\""));
}

#[test]
fn continuous_status_follows_interval() {
    let mut rig = Rig::booted();
    rig.press('c');
    rig.sink.clear();
    rig.run_for(10_000);
    let n = rig.sink.count(|e| matches!(e, AppEvent::Telemetry(_)));
    assert_eq!(n, 2);

    rig.press('s');
    rig.sink.clear();
    rig.run_for(10_000);
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::Telemetry(_))), 0);
}

#[test]
fn info_key_identifies_controller() {
    let mut rig = Rig::booted();
    rig.press('i');
    assert!(rig.sink.events.iter().any(|e| matches!(
        e,
        AppEvent::Info { name: "navlights", .. }
    )));
}

//! Remote keypad scenarios: every symbol through `handle_symbol`.

use navlights::app::commands::AppCommand;
use navlights::app::events::AppEvent;
use navlights::channels::Channel;
use navlights::error::{Error, InvalidCommand};
use navlights::fsm::Mode;
use navlights::lights::{LightId, LightMode, Speed};

use crate::mock_hw::Rig;

const NAMED_CHANNELS: [Channel; 5] = [
    Channel::Ident,
    Channel::Landing,
    Channel::Illum,
    Channel::Position,
    Channel::Formation,
];

#[test]
fn eight_turns_everything_on_in_override() {
    let mut rig = Rig::booted();
    rig.press('8');
    assert_eq!(rig.app.mode(), Mode::Override);
    for ch in NAMED_CHANNELS {
        assert_eq!(rig.hw.level(ch), 255, "{ch:?}");
    }
    assert_eq!(rig.app.lights().get(LightId::RedStatus).speed(), Some(Speed::Slow));
    assert_eq!(rig.app.lights().get(LightId::BlueStatus).speed(), Some(Speed::Slow));

    // Held steady, not animated.
    rig.run_for(5_000);
    for ch in NAMED_CHANNELS {
        assert_eq!(rig.hw.level(ch), 255, "{ch:?}");
    }
}

#[test]
fn digit_toggles_one_group() {
    let mut rig = Rig::booted();
    rig.press('1');
    assert_eq!(rig.app.mode(), Mode::Override);
    assert_eq!(rig.hw.level(Channel::Ident), 255, "entry cleared it, toggle lit it");
    for ch in [Channel::Landing, Channel::Illum, Channel::Position, Channel::Formation] {
        assert_eq!(rig.hw.level(ch), 0);
    }

    rig.press('1');
    assert_eq!(rig.hw.level(Channel::Ident), 0);

    rig.press('4');
    assert_eq!(rig.hw.level(Channel::Illum), 255);
    assert_eq!(rig.app.lights().mode(LightId::Illum), LightMode::On);
}

#[test]
fn zero_turns_all_off_and_stops_motor() {
    let mut rig = Rig::booted();
    rig.press('U');
    rig.run_for(3_000);
    assert!(rig.hw.last().is_on(Channel::MotorUp));

    rig.press('8');
    rig.press('0');
    assert_eq!(rig.app.mode(), Mode::Override);
    for ch in NAMED_CHANNELS {
        assert_eq!(rig.hw.level(ch), 0);
    }
    assert!(!rig.hw.last().is_on(Channel::MotorUp));
    assert_eq!(rig.app.lights().mode(LightId::RedStatus), LightMode::Flashing);
}

#[test]
fn b_forces_battery_low_and_refreshes_timeout() {
    let mut rig = Rig::booted();
    rig.press('B');
    assert_eq!(rig.app.mode(), Mode::BatteryLow);
    for ch in NAMED_CHANNELS {
        assert_eq!(rig.hw.level(ch), 0);
    }
    let first = rig.app.context().battery_low_timeout.at();
    assert_eq!(first, rig.now + rig.app.config().battery_low_timeout_ms);

    rig.run_for(60_000);
    rig.press('b');
    assert_eq!(rig.app.mode(), Mode::BatteryLow);
    assert_eq!(
        rig.app.context().battery_low_timeout.at(),
        rig.now + rig.app.config().battery_low_timeout_ms
    );

    // Good battery: leaves once the refreshed timeout runs out.
    rig.run_for(5 * 60_000);
    assert_eq!(rig.app.mode(), Mode::Day);
}

#[test]
fn play_returns_to_automatic_control() {
    let mut rig = Rig::booted();
    rig.press('0');
    assert_eq!(rig.app.mode(), Mode::Override);
    rig.press('P');
    assert_eq!(rig.app.mode(), Mode::Day);
    assert_eq!(rig.hw.level(Channel::Ident), 255);
    assert!(rig.sink.events.iter().any(|e| matches!(
        e,
        AppEvent::ModeChanged { from: Mode::Override, to: Mode::Day }
    )));
}

#[test]
fn play_with_low_battery_falls_back_to_protection() {
    let mut rig = Rig::booted();
    rig.press('8');
    rig.hw.set_battery(crate::mock_hw::BATTERY_LOW_RAW);
    rig.run_for(1_000);
    assert_eq!(rig.app.mode(), Mode::Override, "override outranks the battery");

    rig.press('P');
    rig.tick();
    assert_eq!(rig.app.mode(), Mode::BatteryLow);
}

#[test]
fn unknown_key_is_reported_and_ignored() {
    let mut rig = Rig::booted();
    let before = rig.hw.writes.len();
    rig.press('x');
    assert_eq!(rig.app.mode(), Mode::Day);
    assert_eq!(rig.hw.writes.len(), before, "no outputs touched");
    assert!(rig.sink.events.iter().any(|e| matches!(
        e,
        AppEvent::Anomaly(Error::Command(InvalidCommand('x')))
    )));
    assert_eq!(rig.app.anomaly_log().counts().invalid_commands, 1);
}

#[test]
fn commands_are_acknowledged() {
    let mut rig = Rig::booted();
    rig.sink.clear();
    rig.press('5');
    assert!(matches!(
        rig.sink.events.first(),
        Some(AppEvent::CommandApplied(AppCommand::Toggle(LightId::Position)))
    ));
}

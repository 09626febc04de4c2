//! A compressed day: photocells go dark and bright again and the mode
//! follows the classifier through every part of the cycle.

use navlights::app::events::AppEvent;
use navlights::config::SystemConfig;
use navlights::fsm::Mode;
use navlights::lights::{LightId, LightMode, Speed};
use navlights::sensors::time_of_day::DayPart;

use crate::mock_hw::{BRIGHT, DARK, Rig, TICK_MS};

fn fast_day() -> SystemConfig {
    SystemConfig {
        history_interval_ms: 1_000,
        evening_length_ms: 10_000,
        morning_length_ms: 10_000,
        predawn_length_ms: 5_000,
        default_night_length_ms: 50_000,
        ..SystemConfig::default()
    }
}

/// Tick until `mode` is reached.  Returns the elapsed time.
fn run_until(rig: &mut Rig, mode: Mode, limit_ms: u32) -> Option<u32> {
    let mut waited = 0;
    while waited <= limit_ms {
        if rig.app.mode() == mode {
            return Some(waited);
        }
        rig.tick();
        waited += TICK_MS;
    }
    None
}

#[test]
fn full_cycle_walks_every_mode() {
    let mut rig = Rig::new(fast_day());
    rig.run_for(2_100);
    assert_eq!(rig.app.mode(), Mode::Day);

    rig.hw.set_light(DARK);
    assert!(run_until(&mut rig, Mode::Evening, 20_000).is_some());
    assert_eq!(rig.app.lights().mode(LightId::Ident), LightMode::On);
    assert_eq!(rig.app.lights().mode(LightId::Position), LightMode::Flashing);
    assert_eq!(rig.app.lights().get(LightId::BlueStatus).speed(), Some(Speed::Slow));
    assert_eq!(rig.app.lights().mode(LightId::RedStatus), LightMode::Off);

    let evening = run_until(&mut rig, Mode::Night, 20_000).expect("night");
    assert!(evening >= 10_000 - TICK_MS);
    for id in LightId::NAMED {
        assert_eq!(rig.app.lights().mode(id), LightMode::Off);
    }
    assert_eq!(rig.app.lights().mode(LightId::BlueStatus), LightMode::On);

    // No dark interval measured yet: default night minus predawn.
    let night = run_until(&mut rig, Mode::Predawn, 60_000).expect("predawn");
    assert!((45_000 - TICK_MS..=45_000 + TICK_MS).contains(&night), "{night}");
    assert_eq!(rig.app.lights().mode(LightId::BlueStatus), LightMode::On);
    assert_eq!(rig.app.lights().get(LightId::RedStatus).speed(), Some(Speed::Slow));

    rig.hw.set_light(BRIGHT);
    assert!(run_until(&mut rig, Mode::Morning, 20_000).is_some());
    assert_eq!(rig.app.lights().mode(LightId::BlueStatus), LightMode::Off);

    let morning = run_until(&mut rig, Mode::Day, 20_000).expect("day");
    assert!(morning >= 10_000 - TICK_MS);
    assert_eq!(rig.app.lights().mode(LightId::Landing), LightMode::Flashing);

    let changes: Vec<DayPart> = rig
        .sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::DayPartChanged { to, .. } => Some(*to),
            _ => None,
        })
        .collect();
    assert_eq!(
        changes,
        vec![
            DayPart::Evening,
            DayPart::Night,
            DayPart::Predawn,
            DayPart::Morning,
            DayPart::Day
        ]
    );
}

#[test]
fn measured_night_sets_next_length_of_night() {
    let mut rig = Rig::new(fast_day());
    rig.run_for(2_100);
    rig.hw.set_light(DARK);
    run_until(&mut rig, Mode::Night, 40_000).expect("night");
    assert_eq!(rig.app.build_telemetry().length_of_night_ms, 50_000, "default");
    run_until(&mut rig, Mode::Predawn, 60_000).expect("predawn");
    rig.run_for(10_000);
    rig.hw.set_light(BRIGHT);
    run_until(&mut rig, Mode::Day, 40_000).expect("day");

    // Second evening: the estimate is the measured dark interval
    // (evening + night + predawn + lag) minus the evening part.
    rig.hw.set_light(DARK);
    run_until(&mut rig, Mode::Night, 40_000).expect("second night");
    let estimate = rig.app.build_telemetry().length_of_night_ms;
    assert!((55_000..70_000).contains(&estimate), "{estimate}");
}

#[test]
fn injected_day_part_drives_mode_without_photocells() {
    let mut rig = Rig::new(SystemConfig {
        injected_day_part: Some(DayPart::Night),
        ..fast_day()
    });
    rig.run_for(2_100);
    assert_eq!(rig.app.mode(), Mode::Night);

    rig.app.override_day_part(DayPart::Evening);
    rig.tick();
    assert_eq!(rig.app.mode(), Mode::Evening);

    rig.app.clear_day_part_override();
    rig.tick();
    assert_eq!(rig.app.day_part(), DayPart::Day, "bright photocells");
    assert_eq!(rig.app.mode(), Mode::Day);
}

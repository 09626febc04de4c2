//! Application service: the hexagonal core.
//!
//! [`AppService`] owns the mode FSM, its context (lights, motor, output
//! bank), the sensor averages and the time-of-day classifier.  All I/O
//! flows through port traits injected at call sites, making the entire
//! service testable with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                 │          AppService          │
//!  OutputPort ◀── │  averages · time of day · FSM │ ◀── AppCommand
//!                 │  lights · motor interlock     │
//!                 └──────────────────────────────┘
//! ```

use log::{debug, info};

use crate::channels::ChannelBank;
use crate::config::SystemConfig;
use crate::control::Direction;
use crate::diagnostics::AnomalyLog;
use crate::fsm::context::{FsmContext, ModeInputs};
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, Mode};
use crate::lights::{LightGroups, LightId};
use crate::sensors::SensorHub;
use crate::sensors::time_of_day::{DayPart, TimeOfDay};

use super::commands::AppCommand;
use super::events::{AppEvent, TelemetryData};
use super::ports::{EventSink, OutputPort, SensorPort};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

pub struct AppService {
    fsm: Fsm,
    ctx: FsmContext,
    sensors: SensorHub,
    time_of_day: TimeOfDay,
    anomalies: AnomalyLog,
    continuous_status: bool,
    last_status_ms: u32,
}

impl AppService {
    /// Construct the service from configuration.
    ///
    /// Does **not** start the FSM. Call [`start`](Self::start) next.
    pub fn new(config: SystemConfig) -> Self {
        let sensors = SensorHub::new(config.battery_volts_per_count);
        let time_of_day = TimeOfDay::new(&config);
        let ctx = FsmContext::new(config);
        let fsm = Fsm::new(build_state_table(), Mode::NotSet);

        Self {
            fsm,
            ctx,
            sensors,
            time_of_day,
            anomalies: AnomalyLog::new(),
            continuous_status: false,
            last_status_ms: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Enter the startup grace period in battery-low.
    pub fn start(&mut self, now: u32, hw: &mut impl OutputPort, sink: &mut impl EventSink) {
        self.ctx.now_ms = now;
        self.ctx.begin_startup(now);
        self.fsm.start(&mut self.ctx);
        self.fsm.force_transition(Mode::BatteryLow, &mut self.ctx);
        self.commit(hw);
        sink.emit(&AppEvent::Started(self.fsm.current_state()));
        self.drain_anomalies(sink);
        info!("AppService started in {:?} at t={}", self.fsm.current_state(), now);
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one control cycle: sample → classify → statemap → lights and
    /// motor → commit outputs.
    pub fn tick(&mut self, now: u32, hw: &mut (impl SensorPort + OutputPort), sink: &mut impl EventSink) {
        let prev_mode = self.fsm.current_state();

        // 1. Snapshot inputs and refresh the running averages
        let snapshot = hw.read_all();
        self.sensors.push(snapshot);

        // 2. Classify the time of day
        let prev_part = self.time_of_day.day_part();
        let part = self
            .time_of_day
            .update_average(now, self.sensors.photocell_average());
        if part != prev_part {
            sink.emit(&AppEvent::DayPartChanged {
                from: prev_part,
                to: part,
            });
        }

        // 3. Mode statemap (entry actions apply the mode to the lights)
        self.ctx.now_ms = now;
        self.ctx.inputs = ModeInputs {
            battery_volts: self.sensors.battery_volts(),
            manual_battery_override: self.sensors.manual_battery_override(),
            day_part: part,
        };
        self.fsm.tick(&mut self.ctx);

        // 4. Advance patterns and reconcile the motor before committing
        self.ctx.lights.update(now);
        if let Err(violation) = self.ctx.motor.update(now, &mut self.ctx.channels) {
            self.ctx.report(violation.into());
        }
        self.commit(hw);

        // 5. Events
        self.emit_mode_change(prev_mode, sink);
        self.drain_anomalies(sink);
        if self.continuous_status
            && now.wrapping_sub(self.last_status_ms) >= self.ctx.config.telemetry_interval_ms
        {
            self.last_status_ms = now;
            sink.emit(&AppEvent::Telemetry(self.build_telemetry()));
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Map a keypad or console symbol and apply it.  Unknown symbols are
    /// reported and otherwise ignored.
    pub fn handle_symbol(
        &mut self,
        symbol: char,
        now: u32,
        hw: &mut impl OutputPort,
        sink: &mut impl EventSink,
    ) {
        match AppCommand::from_symbol(symbol) {
            Ok(cmd) => self.handle_command(cmd, now, hw, sink),
            Err(invalid) => {
                self.ctx.now_ms = now;
                self.ctx.report(invalid.into());
                self.drain_anomalies(sink);
            }
        }
    }

    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        now: u32,
        hw: &mut impl OutputPort,
        sink: &mut impl EventSink,
    ) {
        debug!("command {:?} at t={}", cmd, now);
        self.ctx.now_ms = now;
        let prev_mode = self.fsm.current_state();

        if cmd.routes_to_override() {
            self.enter_or_refresh(Mode::Override);
        }

        match cmd {
            AppCommand::AllOff => self.ctx.all_off(),
            AppCommand::AllLightsOn => self.ctx.lights.all_lights_on(),
            AppCommand::Toggle(id) => self.ctx.lights.toggle(id),
            AppCommand::BatteryLow => {
                self.enter_or_refresh(Mode::BatteryLow);
                self.ctx.all_off();
            }
            AppCommand::Motor(dir) => {
                let opposite = match dir {
                    Direction::Up => Direction::Down,
                    Direction::Down => Direction::Up,
                };
                self.ctx.motor.stop(opposite, &mut self.ctx.channels);
                self.ctx.motor.start(dir, now);
            }
            AppCommand::Play => {
                let live = self.ctx.live_mode();
                self.fsm.force_transition(live, &mut self.ctx);
            }
            AppCommand::Status => sink.emit(&AppEvent::Telemetry(self.build_telemetry())),
            AppCommand::StatusContinuous(on) => {
                self.continuous_status = on;
                self.last_status_ms = now;
            }
            AppCommand::Info => sink.emit(&AppEvent::Info {
                name: env!("CARGO_PKG_NAME"),
                version: env!("CARGO_PKG_VERSION"),
            }),
        }

        self.commit(hw);
        sink.emit(&AppEvent::CommandApplied(cmd));
        self.emit_mode_change(prev_mode, sink);
        self.drain_anomalies(sink);
    }

    /// Pin the day part, bypassing the photocells.
    pub fn override_day_part(&mut self, part: DayPart) {
        self.time_of_day.override_day_part(part);
    }

    pub fn clear_day_part_override(&mut self) {
        self.time_of_day.clear_day_part_override();
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn build_telemetry(&self) -> TelemetryData {
        let (levels, lights) = (
            self.ctx.channels.levels(),
            LightId::ALL.map(|id| {
                let light = self.ctx.lights.get(id);
                (light.channel(), light.light_mode())
            }),
        );
        TelemetryData {
            now_ms: self.ctx.now_ms,
            ticks: self.fsm.tick_count(),
            mode: self.fsm.current_state(),
            day_part: self.time_of_day.day_part(),
            in_startup: self.ctx.in_startup,
            battery_volts: self.sensors.battery_volts(),
            manual_battery_override: self.sensors.manual_battery_override(),
            photocell_avg: self.time_of_day.average(),
            photocell_threshold: self.time_of_day.threshold(),
            length_of_night_ms: self.time_of_day.length_of_night(),
            override_until_ms: self.ctx.override_timeout.at(),
            battery_low_until_ms: self.ctx.battery_low_timeout.at(),
            lights,
            levels,
            motor_up: self.ctx.motor.is_active(Direction::Up),
            motor_down: self.ctx.motor.is_active(Direction::Down),
            anomalies_total: self.anomalies.counts().total(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.fsm.current_state()
    }

    pub fn day_part(&self) -> DayPart {
        self.time_of_day.day_part()
    }

    pub fn lights(&self) -> &LightGroups {
        &self.ctx.lights
    }

    pub fn channels(&self) -> &ChannelBank {
        &self.ctx.channels
    }

    pub fn context(&self) -> &FsmContext {
        &self.ctx
    }

    pub fn anomaly_log(&self) -> &AnomalyLog {
        &self.anomalies
    }

    pub fn tick_count(&self) -> u64 {
        self.fsm.tick_count()
    }

    pub fn config(&self) -> &SystemConfig {
        &self.ctx.config
    }

    // ── Internal ──────────────────────────────────────────────

    /// Select a timed mode from the keypad.  Entry arms its timeout; a
    /// repeated press while already there re-arms it.
    fn enter_or_refresh(&mut self, mode: Mode) {
        if self.fsm.current_state() != mode {
            self.fsm.force_transition(mode, &mut self.ctx);
            return;
        }
        match mode {
            Mode::Override => self.ctx.arm_override_timeout(),
            Mode::BatteryLow => self.ctx.arm_battery_low_timeout(),
            _ => {}
        }
    }

    fn commit(&mut self, hw: &mut impl OutputPort) {
        self.ctx.lights.sync(&mut self.ctx.channels);
        hw.write_channels(&self.ctx.channels);
    }

    fn emit_mode_change(&self, prev: Mode, sink: &mut impl EventSink) {
        let to = self.fsm.current_state();
        if to != prev {
            sink.emit(&AppEvent::ModeChanged { from: prev, to });
        }
    }

    fn drain_anomalies(&mut self, sink: &mut impl EventSink) {
        while let Some(anomaly) = self.ctx.anomalies.pop_front() {
            self.anomalies.record(self.ctx.now_ms, anomaly);
            sink.emit(&AppEvent::Anomaly(anomaly));
        }
    }
}

//! navlights board firmware: main entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter      LogEventSink   SerialConsole  BoardClock │
//! │  (Sensor+OutputPort)  (EventSink)    (CommandPort)  (Clock)    │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  time of day · mode FSM · lights · motor interlock     │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::{PinDriver, Pull};
use esp_idf_hal::ledc::config::TimerConfig;
use esp_idf_hal::ledc::{LedcDriver, LedcTimerDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::units::Hertz;
use log::info;

use navlights::adapters::console::SerialConsole;
use navlights::adapters::hardware::{BoardSensors, ChannelOutputs, HardwareAdapter, PwmChannel, SwitchedChannel};
use navlights::adapters::log_sink::LogEventSink;
use navlights::adapters::time::BoardClock;
use navlights::app::ports::{ClockPort, CommandPort};
use navlights::app::service::AppService;
use navlights::channels::Channel;
use navlights::config::SystemConfig;
use navlights::drivers::hw_init;
use navlights::pins;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  navlights v{}                    ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = SystemConfig::default();
    config.validate()?;
    let loop_interval_ms = config.control_loop_interval_ms;

    // ── 3. Peripherals ────────────────────────────────────────
    hw_init::init_adc()?;
    let p = Peripherals::take()?;

    // All light channels share one LEDC timer.
    let timer: &'static _ = Box::leak(Box::new(LedcTimerDriver::new(
        p.ledc.timer0,
        &TimerConfig::default()
            .frequency(Hertz(pins::LIGHT_PWM_FREQ_HZ))
            .resolution(pins::PWM_RESOLUTION),
    )?));

    // Typed pins below must match the GPIO numbers in `pins`.
    let mut outputs = ChannelOutputs::new();
    outputs.attach(Channel::Ident, PwmChannel::new(LedcDriver::new(p.ledc.channel0, timer, p.pins.gpio1)?));
    outputs.attach(Channel::Landing, PwmChannel::new(LedcDriver::new(p.ledc.channel1, timer, p.pins.gpio2)?));
    outputs.attach(Channel::Illum, PwmChannel::new(LedcDriver::new(p.ledc.channel2, timer, p.pins.gpio4)?));
    outputs.attach(Channel::Position, PwmChannel::new(LedcDriver::new(p.ledc.channel3, timer, p.pins.gpio5)?));
    outputs.attach(Channel::Formation, PwmChannel::new(LedcDriver::new(p.ledc.channel4, timer, p.pins.gpio6)?));
    outputs.attach(Channel::RedStatus, PwmChannel::new(LedcDriver::new(p.ledc.channel5, timer, p.pins.gpio13)?));
    outputs.attach(Channel::BlueStatus, PwmChannel::new(LedcDriver::new(p.ledc.channel6, timer, p.pins.gpio15)?));
    outputs.attach(Channel::MotorUp, SwitchedChannel::new(PinDriver::output(p.pins.gpio3)?));
    outputs.attach(Channel::MotorDown, SwitchedChannel::new(PinDriver::output(p.pins.gpio7)?));

    let mut override_switch = PinDriver::input(p.pins.gpio14)?;
    override_switch.set_pull(Pull::Up)?;

    let mut hw = HardwareAdapter::new(BoardSensors::new(override_switch), outputs);
    info!(
        "Outputs ready (motor up=GPIO{}, down=GPIO{}), override switch GPIO{}",
        pins::MOTOR_UP_GPIO,
        pins::MOTOR_DOWN_GPIO,
        pins::BATTERY_OVERRIDE_GPIO
    );

    // ── 4. Adapters and service ───────────────────────────────
    let clock = BoardClock::new();
    let mut sink = LogEventSink::new();
    let mut console = SerialConsole::spawn()?;
    let mut app = AppService::new(config);
    app.start(clock.now_ms(), &mut hw, &mut sink);

    info!("System ready. Entering polling loop ({} ms).", loop_interval_ms);

    // ── 5. Polling loop ───────────────────────────────────────
    loop {
        let now = clock.now_ms();
        while let Some(symbol) = console.poll_symbol() {
            app.handle_symbol(symbol, now, &mut hw, &mut sink);
        }
        app.tick(now, &mut hw, &mut sink);
        FreeRtos::delay_ms(loop_interval_ms);
    }
}

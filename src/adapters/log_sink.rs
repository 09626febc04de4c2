//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger (UART / USB-CDC on the board).  Telemetry is rendered as one
//! JSON line so a console capture can be parsed later.

use log::{error, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::error::Error;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => match serde_json::to_string(t) {
                Ok(json) => info!("TELEM | {}", json),
                Err(e) => warn!("TELEM | serialisation failed: {}", e),
            },
            AppEvent::ModeChanged { from, to } => {
                info!("MODE | {:?} -> {:?}", from, to);
            }
            AppEvent::DayPartChanged { from, to } => {
                info!("DAYPART | {:?} -> {:?}", from, to);
            }
            AppEvent::CommandApplied(cmd) => {
                info!("CMD | {:?}", cmd);
            }
            AppEvent::Anomaly(e @ Error::Interlock(_)) => {
                error!("ANOMALY | {}", e);
            }
            AppEvent::Anomaly(e) => {
                warn!("ANOMALY | {}", e);
            }
            AppEvent::Started(mode) => {
                info!("START | initial_mode={:?}", mode);
            }
            AppEvent::Info { name, version } => {
                info!("INFO | {} v{}", name, version);
            }
        }
    }
}

//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (clock, sensors, outputs, keypad, event sinks) implement
//! these traits.  The [`AppService`](super::service::AppService) consumes
//! them via generics, so the domain core never touches hardware directly.

use crate::channels::ChannelBank;
use crate::sensors::SensorSnapshot;

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Millisecond clock.  Wraps at 2^32.
pub trait ClockPort {
    fn now_ms(&self) -> u32;
}

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: called once at the start of every tick.
pub trait SensorPort {
    fn read_all(&mut self) -> SensorSnapshot;
}

// ───────────────────────────────────────────────────────────────
// Output port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: receives the whole bank once per tick and after each
/// command.
pub trait OutputPort {
    fn write_channels(&mut self, bank: &ChannelBank);
}

// ───────────────────────────────────────────────────────────────
// Command port (driven adapter: keypad / console → domain)
// ───────────────────────────────────────────────────────────────

/// Source of single-symbol commands.  Non-blocking.
pub trait CommandPort {
    fn poll_symbol(&mut self) -> Option<char>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

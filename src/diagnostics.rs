//! Anomaly accounting.
//!
//! Every handled anomaly is counted by class and kept in a small ring of
//! recent entries so a status report can show what happened without a
//! persistent log.

use heapless::HistoryBuffer;
use serde::Serialize;

use crate::error::Error;

const RECENT_SLOTS: usize = 8;

/// Per-class anomaly counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AnomalyCounts {
    pub timer_wraps: u32,
    pub interlock_faults: u32,
    pub invalid_commands: u32,
    pub other: u32,
}

impl AnomalyCounts {
    pub fn total(&self) -> u32 {
        self.timer_wraps
            .saturating_add(self.interlock_faults)
            .saturating_add(self.invalid_commands)
            .saturating_add(self.other)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnomalyEntry {
    pub at_ms: u32,
    pub anomaly: Error,
}

#[derive(Default)]
pub struct AnomalyLog {
    counts: AnomalyCounts,
    recent: HistoryBuffer<AnomalyEntry, RECENT_SLOTS>,
}

impl AnomalyLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, at_ms: u32, anomaly: Error) {
        let counter = match anomaly {
            Error::TimerWrap(_) => &mut self.counts.timer_wraps,
            Error::Interlock(_) => &mut self.counts.interlock_faults,
            Error::Command(_) => &mut self.counts.invalid_commands,
            Error::Config(_) | Error::Hardware(_) => &mut self.counts.other,
        };
        *counter = counter.saturating_add(1);
        self.recent.write(AnomalyEntry { at_ms, anomaly });
    }

    pub fn counts(&self) -> AnomalyCounts {
        self.counts
    }

    /// Most recent entry.
    pub fn last(&self) -> Option<&AnomalyEntry> {
        self.recent.recent()
    }

    /// Recent entries, oldest first.
    pub fn recent(&self) -> impl Iterator<Item = &AnomalyEntry> {
        self.recent.oldest_ordered()
    }
}

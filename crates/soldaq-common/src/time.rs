//! ---
//! daq_section: "01-core-functionality"
//! daq_subsection: "module"
//! daq_type: "source"
//! daq_scope: "code"
//! daq_description: "Shared primitives and utilities for the polling runtime."
//! daq_version: "v0.0.1-alpha"
//! daq_owner: "tbd"
//! ---
use chrono::{DateTime, FixedOffset, Local};

/// Source of "now" for everything that is date- or time-sensitive.
///
/// The polling pipeline reads the clock at call time rather than at
/// construction, so a poll crossing midnight sees the new date. Tests inject
/// a [`FixedClock`] for deterministic URL resolution.
pub trait Clock: Send + Sync {
    /// Current wall-clock time in the local offset.
    fn now(&self) -> DateTime<FixedOffset>;

    /// Current local date formatted as an 8-digit `yyyymmdd` token.
    fn today_compact(&self) -> String {
        self.now().format("%Y%m%d").to_string()
    }
}

/// Production clock backed by the system time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Clock pinned to a single instant, for deterministic tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

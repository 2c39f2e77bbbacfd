//! Relic pickup logging
//!
//! Pickups are reported to a sink for out-of-band collection (analytics,
//! a remote scoreboard, a flat file). Reporting is fire-and-forget: the
//! run never waits on a sink and never fails because one did.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sim::ClassId;

/// One relic pickup event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelicRecord {
    pub name: String,
    pub class: ClassId,
    pub floor: u32,
    pub timestamp: DateTime<Utc>,
}

impl RelicRecord {
    pub fn now(name: &str, class: ClassId, floor: u32) -> Self {
        Self {
            name: name.to_string(),
            class,
            floor,
            timestamp: Utc::now(),
        }
    }
}

/// Destination for pickup records. Implementations must not block the
/// caller; errors are theirs to swallow and log.
pub trait RelicSink {
    fn record(&mut self, record: RelicRecord);
}

/// Validate and forward a record. Nameless records are malformed input
/// and are dropped at this boundary.
pub fn report(sink: &mut dyn RelicSink, record: RelicRecord) {
    if record.name.trim().is_empty() {
        log::warn!("relic record with empty name dropped");
        return;
    }
    sink.record(record);
}

/// Keeps records in memory; the default sink for tests and local play
#[derive(Debug, Default)]
pub struct MemoryRelicSink {
    pub records: Vec<RelicRecord>,
}

impl RelicSink for MemoryRelicSink {
    fn record(&mut self, record: RelicRecord) {
        log::debug!(
            "relic logged: {} ({:?}, floor {})",
            record.name,
            record.class,
            record.floor
        );
        self.records.push(record);
    }
}

/// Discards everything
#[derive(Debug, Default)]
pub struct NullRelicSink;

impl RelicSink for NullRelicSink {
    fn record(&mut self, _record: RelicRecord) {}
}

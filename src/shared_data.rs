// src/shared_data.rs

use crate::simulation_engine::intersections::{Aspect, LaneId};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// A lamp change on one signal head, as published and logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalEvent {
    /// Controller clock reading in milliseconds.
    pub at_ms: u64,
    pub lane: LaneId,
    pub aspect: Aspect,
}

/// A `SignalEvent` as stored by the monitoring system, stamped on receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalEventRecord {
    pub received_at: u64,
    pub at_ms: u64,
    pub lane: u8,
    pub aspect: Aspect,
}

impl SignalEventRecord {
    pub fn from_event(event: &SignalEvent, received_at: u64) -> Self {
        Self {
            received_at,
            at_ms: event.at_ms,
            lane: event.lane.into(),
            aspect: event.aspect,
        }
    }
}

/// Seconds since the Unix epoch, for stamping records only.
pub fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

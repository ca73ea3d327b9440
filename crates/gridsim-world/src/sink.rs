//! Update notifications emitted by the simulator.

use gridsim_core::{Category, EntityId, Position};
use serde::{Deserialize, Serialize};
use tracing::info;

/// One entity update during one tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRecord {
    pub tick: u64,
    pub entity: EntityId,
    pub position: Position,
    pub category: Category,
    /// In-bounds neighbor cells of the entity
    pub in_bounds: usize,
    /// Entries handed to the behavior
    pub neighbor_count: usize,
    pub occupied_neighbors: usize,
}

/// Receives every update the simulator performs
pub trait UpdateSink {
    fn record(&mut self, record: &UpdateRecord);
}

/// Logs `Entity at (x, y) updated.` for each update
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl UpdateSink for TracingSink {
    fn record(&mut self, record: &UpdateRecord) {
        info!(
            tick = record.tick,
            entity = %record.entity,
            category = %record.category,
            neighbors = record.occupied_neighbors,
            "Entity at ({}, {}) updated.",
            record.position.x,
            record.position.y
        );
    }
}

/// Keeps every record in memory
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    records: Vec<UpdateRecord>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[UpdateRecord] {
        &self.records
    }

    /// Records emitted during a given tick
    pub fn for_tick(&self, tick: u64) -> Vec<&UpdateRecord> {
        self.records.iter().filter(|r| r.tick == tick).collect()
    }

    pub fn take(&mut self) -> Vec<UpdateRecord> {
        std::mem::take(&mut self.records)
    }
}

impl UpdateSink for RecordingSink {
    fn record(&mut self, record: &UpdateRecord) {
        self.records.push(record.clone());
    }
}

/// Discards every record
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl UpdateSink for NullSink {
    fn record(&mut self, _record: &UpdateRecord) {}
}

impl<S: UpdateSink + ?Sized> UpdateSink for &mut S {
    fn record(&mut self, record: &UpdateRecord) {
        (**self).record(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(tick: u64, x: i32, y: i32) -> UpdateRecord {
        UpdateRecord {
            tick,
            entity: EntityId(0),
            position: Position::new(x, y),
            category: Category::from("Type A"),
            in_bounds: 8,
            neighbor_count: 0,
            occupied_neighbors: 0,
        }
    }

    #[test]
    fn test_recording_sink() {
        let mut sink = RecordingSink::new();
        sink.record(&record(0, 2, 3));
        sink.record(&record(1, 2, 3));
        sink.record(&record(1, 5, 5));

        assert_eq!(sink.records().len(), 3);
        assert_eq!(sink.for_tick(1).len(), 2);

        let taken = sink.take();
        assert_eq!(taken.len(), 3);
        assert!(sink.records().is_empty());
    }

    #[test]
    fn test_borrowed_sink_forwards() {
        fn feed<S: UpdateSink>(mut sink: S) {
            sink.record(&record(0, 1, 1));
        }

        let mut sink = RecordingSink::new();
        feed(&mut sink);
        assert_eq!(sink.records().len(), 1);
    }

    #[test]
    fn test_update_record_serialization() {
        let json = serde_json::to_value(record(4, 2, 3)).unwrap();
        assert_eq!(json["tick"], 4);
        assert_eq!(json["position"]["x"], 2);
        assert_eq!(json["category"], "Type A");
    }
}

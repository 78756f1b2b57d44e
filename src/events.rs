// 📜 Archive Journal - "Every change is an event"
//
// Append-only audit trail of successful archive mutations.
// Failed operations never produce an event.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// EVENT TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    StudentAdded,
    SpellbookAdded,
    SpellbookRented,
    SpellbookRelinquished,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::StudentAdded => "student_added",
            EventType::SpellbookAdded => "spellbook_added",
            EventType::SpellbookRented => "spellbook_rented",
            EventType::SpellbookRelinquished => "spellbook_relinquished",
        }
    }
}

/// Which kind of entity an event is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Student,
    Spellbook,
}

// ============================================================================
// EVENT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveEvent {
    pub event_id: String,
    pub timestamp: DateTime<Utc>,
    pub event_type: EventType,
    pub entity_type: EntityType,
    pub entity_id: i32,
    pub data: serde_json::Value,
}

impl ArchiveEvent {
    pub fn new(
        event_type: EventType,
        entity_type: EntityType,
        entity_id: i32,
        data: serde_json::Value,
    ) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event_type,
            entity_type,
            entity_id,
            data,
        }
    }
}

// ============================================================================
// JOURNAL
// ============================================================================

/// In-memory event log, oldest first
#[derive(Debug, Default, Clone)]
pub struct Journal {
    events: Vec<ArchiveEvent>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: ArchiveEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[ArchiveEvent] {
        &self.events
    }

    /// Events touching one entity, oldest first
    pub fn events_for(&self, entity_type: EntityType, entity_id: i32) -> Vec<&ArchiveEvent> {
        self.events
            .iter()
            .filter(|e| e.entity_type == entity_type && e.entity_id == entity_id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Serialize the whole journal as a pretty JSON array
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.events)
    }
}

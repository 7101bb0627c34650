use std::collections::BTreeSet;

use super::error::ModelError;
use super::event_class::EventClass;
use super::field_type::{references_default_clock, FieldType};

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct StreamClass {
    pub id: u64,
    pub default_clock_class_name: Option<String>,
    pub event_header_type: Option<FieldType>,
    pub packet_context_type: Option<FieldType>,
    pub event_context_type: Option<FieldType>,
    pub event_classes: Vec<EventClass>,
}

impl StreamClass {
    /// Enforces §3.2's invariant: any integer field in the event-header or
    /// packet-context type that carries `DefaultClockTimestamp` or
    /// `PacketEndDefaultClockTimestamp` requires `default_clock_class_name`
    /// to be set. The event-context type is deliberately not scanned — per
    /// §4.4.4 it's the one optional type the emitter does *not* propagate
    /// the stream's default clock class name into, so a clock-timestamp
    /// role there would be meaningless and is instead caught by the
    /// emitter's own `InvalidFieldType` error at emission time rather than
    /// rejected here.
    pub fn new(
        id: u64,
        default_clock_class_name: Option<String>,
        event_header_type: Option<FieldType>,
        packet_context_type: Option<FieldType>,
        event_context_type: Option<FieldType>,
        event_classes: Vec<EventClass>,
    ) -> Result<Self, ModelError> {
        if default_clock_class_name.is_none() {
            let references_clock = event_header_type
                .as_ref()
                .map(references_default_clock)
                .unwrap_or(false)
                || packet_context_type
                    .as_ref()
                    .map(references_default_clock)
                    .unwrap_or(false);
            if references_clock {
                return Err(ModelError::MissingDefaultClockClass { stream_class_id: id });
            }
        }

        let mut seen = BTreeSet::new();
        for event in &event_classes {
            if !seen.insert(event.id) {
                return Err(ModelError::DuplicateEventClassId {
                    stream_class_id: id,
                    event_class_id: event.id,
                });
            }
        }

        Ok(Self {
            id,
            default_clock_class_name,
            event_header_type,
            packet_context_type,
            event_context_type,
            event_classes,
        })
    }
}

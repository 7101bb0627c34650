use std::collections::BTreeSet;

use uuid::Uuid;

use super::abi::Abi;
use super::clock::ClockClass;
use super::env::EnvironmentValue;
use super::error::ModelError;
use super::field_type::FieldType;
use super::stream_class::StreamClass;

/// The root of the Trace Object Model (§3.2). Pure data once constructed;
/// `TraceClass::new` is the only place the cross-cutting invariants that
/// span multiple clock/stream classes are enforced (per-stream-class
/// invariants are enforced by [`StreamClass::new`] itself).
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct TraceClass {
    pub abi: Abi,
    pub uuid: Uuid,
    /// Key/value list; order is significant and preserved (§5's ordering
    /// guarantee applies to the `env` fragment too).
    pub environment: Vec<(String, EnvironmentValue)>,
    pub packet_header: Option<FieldType>,
    pub clock_classes: Vec<ClockClass>,
    pub stream_classes: Vec<StreamClass>,
}

impl TraceClass {
    pub fn new(
        abi: Abi,
        uuid: Uuid,
        environment: Vec<(String, EnvironmentValue)>,
        packet_header: Option<FieldType>,
        clock_classes: Vec<ClockClass>,
        stream_classes: Vec<StreamClass>,
    ) -> Result<Self, ModelError> {
        let mut clock_names = BTreeSet::new();
        for clock in &clock_classes {
            if !clock_names.insert(clock.name.as_str()) {
                return Err(ModelError::DuplicateClockClassName(clock.name.clone()));
            }
        }

        let mut stream_ids = BTreeSet::new();
        for stream in &stream_classes {
            if !stream_ids.insert(stream.id) {
                return Err(ModelError::DuplicateStreamClassId(stream.id));
            }
            if let Some(name) = &stream.default_clock_class_name {
                if !clock_names.contains(name.as_str()) {
                    return Err(ModelError::MissingDefaultClockClass {
                        stream_class_id: stream.id,
                    });
                }
            }
        }

        Ok(Self {
            abi,
            uuid,
            environment,
            packet_header,
            clock_classes,
            stream_classes,
        })
    }
}

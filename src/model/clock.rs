use uuid::Uuid;

/// A CTF clock class: the description of a time source that integer fields
/// can be mapped onto via the `DefaultClockTimestamp` role (§4.4.3).
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ClockClass {
    /// Unique within the owning [`crate::model::TraceClass`]; this is the
    /// name the emitter writes into `map = clock.<name>.value;`.
    pub name: String,
    pub uuid: Option<Uuid>,
    pub description: String,
    pub frequency_hz: u64,
    /// Offset in ticks since the Unix epoch.
    pub offset: i64,
}

impl ClockClass {
    pub fn new(name: impl Into<String>, frequency_hz: u64) -> Self {
        Self {
            name: name.into(),
            uuid: None,
            description: String::new(),
            frequency_hz,
            offset: 0,
        }
    }

    pub fn with_uuid(mut self, uuid: Uuid) -> Self {
        self.uuid = Some(uuid);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }
}

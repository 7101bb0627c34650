use super::field_type::FieldType;

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct EventClass {
    pub id: u64,
    pub name: String,
    pub stream_class_id: u64,
    pub log_level: i32,
    pub emf_uri: Option<String>,
    pub payload: Option<FieldType>,
}

impl EventClass {
    pub fn new(id: u64, name: impl Into<String>, stream_class_id: u64, log_level: i32) -> Self {
        Self {
            id,
            name: name.into(),
            stream_class_id,
            log_level,
            emf_uri: None,
            payload: None,
        }
    }

    pub fn with_emf_uri(mut self, uri: impl Into<String>) -> Self {
        self.emf_uri = Some(uri.into());
        self
    }

    pub fn with_payload(mut self, payload: FieldType) -> Self {
        self.payload = Some(payload);
        self
    }
}

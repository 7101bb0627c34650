use thiserror::Error;

/// Errors raised while constructing or validating the Trace Object Model.
///
/// These are raised at construction time (builder methods on
/// [`crate::model::TraceClass`]/[`crate::model::StreamClass`]/
/// [`crate::model::FieldType`]), not at emission time — the emitter's own
/// [`crate::tsdl::error::EmitError::InvalidFieldType`] exists for the one
/// invariant (§3.2) that can only be checked once a `StreamClass`'s default
/// clock class is known, which the emitter has and the bare `FieldType`
/// does not.
#[derive(Clone, Eq, PartialEq, Debug, Error)]
pub enum ModelError {
    #[error("structure contains a duplicate field name '{0}'")]
    DuplicateFieldName(String),

    #[error("variant '{location}' has a duplicate choice name '{choice}'")]
    DuplicateVariantChoice { location: String, choice: String },

    #[error(
        "dynamic-length field '{field}' references location '{location}', \
         which does not resolve to a sibling field in the same structure"
    )]
    UnresolvedFieldLocation { field: String, location: String },

    #[error(
        "dynamic array/string/blob '{field}' references location '{location}', \
         but the referenced field is not an unsigned integer"
    )]
    LengthFieldNotUnsignedInteger { field: String, location: String },

    #[error(
        "variant '{field}' references tag location '{location}', \
         but the referenced field is not an enumeration"
    )]
    TagFieldNotEnum { field: String, location: String },

    #[error("field location path must not be empty")]
    EmptyFieldLocation,

    #[error(
        "stream class {stream_class_id} has an integer field with a clock-timestamp role \
         but no default clock class name"
    )]
    MissingDefaultClockClass { stream_class_id: u64 },

    #[error("enum has no mappings")]
    EmptyEnum,

    #[error("event class id {event_class_id} is duplicated in stream class {stream_class_id}")]
    DuplicateEventClassId {
        stream_class_id: u64,
        event_class_id: u64,
    },

    #[error("stream class id {0} is duplicated in the trace class")]
    DuplicateStreamClassId(u64),

    #[error("clock class name '{0}' is duplicated in the trace class")]
    DuplicateClockClassName(String),
}

use super::clock::ClockClass;
use super::env::EnvironmentValue;
use super::event_class::EventClass;
use super::field_type::{
    DynamicArrayType, DynamicBlobType, DynamicStringType, EnumType, FieldType, FloatType,
    IntegerType, StaticArrayType, StaticBlobType, StaticStringType, StringEncoding,
    StructureType, VariantType,
};
use super::stream_class::StreamClass;
use super::trace_class::TraceClass;

/// One method per [`FieldType`] variant (§4.2, §9's "closed sum-type ...
/// with a visitor protocol" design note). A visitor is responsible for its
/// own ordering/indentation bookkeeping when it needs to recurse into
/// compound types (`Structure`, `Variant`, arrays); `FieldType` itself does
/// no string emission or recursion.
pub trait FieldTypeVisitor {
    fn visit_integer(&mut self, ty: &IntegerType);
    fn visit_float(&mut self, ty: &FloatType);
    fn visit_signed_enum(&mut self, ty: &EnumType);
    fn visit_unsigned_enum(&mut self, ty: &EnumType);
    fn visit_static_array(&mut self, ty: &StaticArrayType);
    fn visit_dynamic_array(&mut self, ty: &DynamicArrayType);
    fn visit_static_blob(&mut self, ty: &StaticBlobType);
    fn visit_dynamic_blob(&mut self, ty: &DynamicBlobType);
    fn visit_null_terminated_string(&mut self, encoding: StringEncoding);
    fn visit_static_string(&mut self, ty: &StaticStringType);
    fn visit_dynamic_string(&mut self, ty: &DynamicStringType);
    fn visit_structure(&mut self, ty: &StructureType);
    fn visit_variant(&mut self, ty: &VariantType);
}

impl FieldType {
    pub fn accept<V: FieldTypeVisitor + ?Sized>(&self, visitor: &mut V) {
        match self {
            FieldType::Integer(ty) => visitor.visit_integer(ty),
            FieldType::Float(ty) => visitor.visit_float(ty),
            FieldType::SignedEnum(ty) => visitor.visit_signed_enum(ty),
            FieldType::UnsignedEnum(ty) => visitor.visit_unsigned_enum(ty),
            FieldType::StaticArray(ty) => visitor.visit_static_array(ty),
            FieldType::DynamicArray(ty) => visitor.visit_dynamic_array(ty),
            FieldType::StaticBlob(ty) => visitor.visit_static_blob(ty),
            FieldType::DynamicBlob(ty) => visitor.visit_dynamic_blob(ty),
            FieldType::NullTerminatedString(encoding) => {
                visitor.visit_null_terminated_string(*encoding)
            }
            FieldType::StaticString(ty) => visitor.visit_static_string(ty),
            FieldType::DynamicString(ty) => visitor.visit_dynamic_string(ty),
            FieldType::Structure(ty) => visitor.visit_structure(ty),
            FieldType::Variant(ty) => visitor.visit_variant(ty),
        }
    }
}

/// Walks a [`TraceClass`] in the fixed order the emitter (§4.4.4) and the
/// ordering guarantee in §5 both depend on: trace, environment, clocks,
/// streams, events; within each kind, insertion order.
pub trait TraceClassVisitor: FieldTypeVisitor {
    fn on_trace_class(&mut self, trace_class: &TraceClass);
    fn on_environment(&mut self, entries: &[(String, EnvironmentValue)]);
    fn on_clock_class(&mut self, clock: &ClockClass);
    fn on_stream_class(&mut self, stream: &StreamClass);
    fn on_event_class(&mut self, event: &EventClass);
}

impl TraceClass {
    pub fn visit<V: TraceClassVisitor>(&self, visitor: &mut V) {
        visitor.on_trace_class(self);
        visitor.on_environment(&self.environment);
        for clock in &self.clock_classes {
            visitor.on_clock_class(clock);
        }
        for stream in &self.stream_classes {
            visitor.on_stream_class(stream);
            for event in &stream.event_classes {
                visitor.on_event_class(event);
            }
        }
    }
}

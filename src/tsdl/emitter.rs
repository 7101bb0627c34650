use crate::model::{
    Abi, ClockClass, DynamicArrayType, DynamicBlobType, DynamicStringType, EnumType, EventClass,
    FieldType, FieldTypeVisitor, FloatType, IntegerType, NumericBase, StaticArrayType,
    StaticBlobType, StaticStringType, StreamClass, StringEncoding, StructureType, TraceClass,
    TraceClassVisitor, VariantType,
};

use super::error::EmitError;
use super::escape::{escape_tsdl_env_string, escape_tsdl_identifier};
use super::sink::FragmentSink;

/// Emits a complete TSDL 1.8 metadata document for `trace_class`, appending
/// one fragment per top-level item (§4.4.4) to `sink` in the order: trace,
/// env, clocks, streams, events.
pub fn emit_tsdl_document<S: FragmentSink>(
    trace_class: &TraceClass,
    sink: &mut S,
) -> Result<(), EmitError> {
    let mut emitter = Emitter::new(trace_class.abi, sink);
    trace_class.visit(&mut emitter);
    match emitter.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Carries the ambient emission context described in §4.4.3: the trace
/// ABI, the current indentation level, the containing stream class's
/// default clock name (when emitting event-header/packet-context types),
/// a stack of enclosing field names (for padding-struct naming and
/// array/variant declarator suffixes), and an optional integer-encoding
/// override used when lowering strings to byte arrays.
///
/// Fallible steps (identifier escaping, the clock-role invariant) record
/// their first error here rather than threading a `Result` through every
/// [`FieldTypeVisitor`] method, since that trait's methods are infallible
/// by design (§4.2); [`emit_tsdl_document`] surfaces it once traversal
/// completes.
struct Emitter<'a, S> {
    sink: &'a mut S,
    abi: Abi,
    default_clock: Option<String>,
    field_name_stack: Vec<String>,
    bypass_escaping: bool,
    indent: usize,
    out: String,
    error: Option<EmitError>,
}

impl<'a, S: FragmentSink> Emitter<'a, S> {
    fn new(abi: Abi, sink: &'a mut S) -> Self {
        Self {
            sink,
            abi,
            default_clock: None,
            field_name_stack: Vec::new(),
            bypass_escaping: false,
            indent: 0,
            out: String::new(),
            error: None,
        }
    }

    fn set_error(&mut self, err: EmitError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.out.push('\t');
        }
    }

    fn escape_name(&mut self, name: &str) -> String {
        if self.bypass_escaping {
            return name.to_string();
        }
        match escape_tsdl_identifier(name) {
            Ok(escaped) => escaped,
            Err(e) => {
                self.set_error(e);
                String::new()
            }
        }
    }

    fn flush_fragment(&mut self) {
        let text = std::mem::take(&mut self.out);
        if let Err(e) = self.sink.append_fragment(&text) {
            self.set_error(EmitError::IoAppend(e));
        }
    }

    /// Emits one struct field or variant choice: `<type> <name>;` for
    /// "bare" type expressions, or the complete name-bearing declaration
    /// for array/blob/string/variant types that embed the name themselves.
    fn emit_named_field(&mut self, name: &str, ty: &FieldType) {
        self.field_name_stack.push(name.to_string());
        match ty {
            FieldType::StaticArray(_)
            | FieldType::DynamicArray(_)
            | FieldType::StaticBlob(_)
            | FieldType::DynamicBlob(_)
            | FieldType::StaticString(_)
            | FieldType::DynamicString(_)
            | FieldType::Variant(_) => {
                ty.accept(self);
            }
            _ => {
                self.write_indent();
                ty.accept(self);
                let escaped = self.escape_name(name);
                self.out.push(' ');
                self.out.push_str(&escaped);
                self.out.push_str(";\n");
            }
        }
        self.field_name_stack.pop();
    }

    fn emit_padding_if_needed(&mut self, align_bits: u16, field_name: &str) {
        if align_bits == 0 {
            return;
        }
        self.write_indent();
        let escaped = self.escape_name(field_name);
        self.out.push_str(&format!(
            "struct {{ }} align({}) {}_padding;\n",
            align_bits, escaped
        ));
    }

    fn current_field_name(&self) -> String {
        self.field_name_stack
            .last()
            .cloned()
            .unwrap_or_default()
    }

    fn emit_lowered_array(&mut self, element: &FieldType, align_bits: u16, length_suffix: &str) {
        let field_name = self.current_field_name();
        self.emit_padding_if_needed(align_bits, &field_name);
        self.write_indent();
        element.accept(self);
        let escaped = self.escape_name(&field_name);
        self.out.push(' ');
        self.out.push_str(&escaped);
        self.out.push('[');
        self.out.push_str(length_suffix);
        self.out.push_str("];\n");
    }

    fn emit_lowered_string(&mut self, encoding: StringEncoding, align_bits: u16, length_suffix: &str) {
        let field_name = self.current_field_name();
        self.emit_padding_if_needed(align_bits, &field_name);
        self.write_indent();
        self.out.push_str(&format!(
            "integer {{ size = 8; align = 8; base = 10; encoding = {}; }}",
            encoding.tsdl_keyword()
        ));
        let escaped = self.escape_name(&field_name);
        self.out.push(' ');
        self.out.push_str(&escaped);
        self.out.push('[');
        self.out.push_str(length_suffix);
        self.out.push_str("];\n");
    }

    fn byte_integer(base: NumericBase) -> IntegerType {
        IntegerType::new(8, 8, false).with_base(base)
    }
}

impl<'a, S: FragmentSink> FieldTypeVisitor for Emitter<'a, S> {
    fn visit_integer(&mut self, ty: &IntegerType) {
        self.out.push_str("integer { size = ");
        self.out.push_str(&ty.size_bits.to_string());
        self.out.push_str("; align = ");
        self.out.push_str(&ty.align_bits.to_string());
        self.out.push(';');
        if ty.signed {
            self.out.push_str(" signed = true;");
        }
        if let Some(base) = ty.base.tsdl_value() {
            self.out.push_str(&format!(" base = {};", base));
        }
        if let Some(byte_order) = ty.byte_order {
            if byte_order != self.abi.byte_order {
                self.out
                    .push_str(&format!(" byte_order = {};", byte_order.tsdl_keyword()));
            }
        }
        let needs_clock = ty
            .roles
            .iter()
            .any(|role| role.requires_default_clock());
        if needs_clock {
            match &self.default_clock {
                Some(name) => self.out.push_str(&format!(" map = clock.{}.value;", name)),
                None => self.set_error(EmitError::InvalidFieldType {
                    field: self.current_field_name(),
                }),
            }
        }
        self.out.push_str(" }");
    }

    fn visit_float(&mut self, ty: &FloatType) {
        self.out.push_str(&format!(
            "floating_point {{ align = {}; mant_dig = {}; exp_dig = {};",
            ty.align_bits, ty.mantissa_digits, ty.exponent_digits
        ));
        if let Some(byte_order) = ty.byte_order {
            if byte_order != self.abi.byte_order {
                self.out
                    .push_str(&format!(" byte_order = {};", byte_order.tsdl_keyword()));
            }
        }
        self.out.push_str(" }");
    }

    fn visit_signed_enum(&mut self, ty: &EnumType) {
        self.emit_enum(ty);
    }

    fn visit_unsigned_enum(&mut self, ty: &EnumType) {
        self.emit_enum(ty);
    }

    fn visit_static_array(&mut self, ty: &StaticArrayType) {
        self.emit_lowered_array(&ty.element, ty.align_bits, &ty.length.to_string());
    }

    fn visit_dynamic_array(&mut self, ty: &DynamicArrayType) {
        let length_suffix = self.escape_name(ty.length_location.tail());
        self.emit_lowered_array(&ty.element, ty.align_bits, &length_suffix);
    }

    fn visit_static_blob(&mut self, ty: &StaticBlobType) {
        let byte = Self::byte_integer(NumericBase::Hexadecimal);
        self.emit_lowered_array(
            &FieldType::Integer(byte),
            ty.align_bits,
            &ty.length_bytes.to_string(),
        );
    }

    fn visit_dynamic_blob(&mut self, ty: &DynamicBlobType) {
        let byte = Self::byte_integer(NumericBase::Hexadecimal);
        let length_suffix = self.escape_name(ty.length_location.tail());
        self.emit_lowered_array(&FieldType::Integer(byte), ty.align_bits, &length_suffix);
    }

    fn visit_null_terminated_string(&mut self, encoding: StringEncoding) {
        if encoding == StringEncoding::Ascii {
            self.out.push_str("string");
        } else {
            self.out
                .push_str(&format!("string {{ encoding = {}; }}", encoding.tsdl_keyword()));
        }
    }

    /// Static/dynamic strings are lowered to byte arrays (§4.4.3). Unlike a
    /// general-purpose integer, the lowered byte type's `base = 10;` is
    /// always written explicitly rather than omitted under the usual
    /// decimal-is-default rule. The historical string-lowering path never
    /// applied that optimization, and this preserves that bit-for-bit.
    fn visit_static_string(&mut self, ty: &StaticStringType) {
        self.emit_lowered_string(ty.encoding, ty.align_bits, &ty.length_bytes.to_string());
    }

    fn visit_dynamic_string(&mut self, ty: &DynamicStringType) {
        let length_suffix = self.escape_name(ty.length_location.tail());
        self.emit_lowered_string(ty.encoding, ty.align_bits, &length_suffix);
    }

    fn visit_structure(&mut self, ty: &StructureType) {
        self.out.push_str("struct {\n");
        self.indent += 1;
        for field in &ty.fields {
            self.emit_named_field(&field.name, &field.ty);
        }
        self.indent -= 1;
        self.write_indent();
        self.out.push('}');
    }

    fn visit_variant(&mut self, ty: &VariantType) {
        let field_name = self.current_field_name();
        self.emit_padding_if_needed(ty.align_bits, &field_name);

        let tag_suffix = self.escape_name(ty.tag_location.tail());
        self.write_indent();
        self.out.push_str("variant ");
        self.out.push_str(&tag_suffix);
        self.out.push_str(" {\n");
        self.indent += 1;
        let prev_bypass = self.bypass_escaping;
        self.bypass_escaping = true;
        for (choice_name, choice_ty) in &ty.choices {
            self.emit_named_field(choice_name, choice_ty);
        }
        self.bypass_escaping = prev_bypass;
        self.indent -= 1;
        self.write_indent();
        self.out.push_str("}");

        let escaped = self.escape_name(&field_name);
        self.out.push(' ');
        self.out.push_str(&escaped);
        self.out.push_str(";\n");
    }
}

impl<'a, S: FragmentSink> Emitter<'a, S> {
    fn emit_enum(&mut self, ty: &EnumType) {
        self.out.push_str("enum : ");
        self.visit_integer(&ty.underlying);
        self.out.push_str(" {\n");
        self.indent += 1;
        for (i, mapping) in ty.mappings.iter().enumerate() {
            self.write_indent();
            let (begin, end) = (*mapping.range.start(), *mapping.range.end());
            if begin == end {
                self.out
                    .push_str(&format!("\"{}\" = {}", mapping.name, begin));
            } else {
                self.out
                    .push_str(&format!("\"{}\" = {} ... {}", mapping.name, begin, end));
            }
            if i + 1 != ty.mappings.len() {
                self.out.push(',');
            }
            self.out.push('\n');
        }
        self.indent -= 1;
        self.write_indent();
        self.out.push('}');
    }
}

impl<'a, S: FragmentSink> TraceClassVisitor for Emitter<'a, S> {
    fn on_trace_class(&mut self, trace_class: &TraceClass) {
        self.out.push_str("/* CTF 1.8 */\n\n");
        self.out.push_str("trace {\n");
        self.indent += 1;
        self.write_indent();
        self.out.push_str("major = 1;\n");
        self.write_indent();
        self.out.push_str("minor = 8;\n");
        self.write_indent();
        self.out
            .push_str(&format!("uuid = \"{}\";\n", trace_class.uuid));
        self.write_indent();
        self.out.push_str(&format!(
            "byte_order = {};\n",
            trace_class.abi.byte_order.tsdl_keyword()
        ));
        self.write_indent();
        self.out
            .push_str(&format!("long_size = {};\n", trace_class.abi.long_size_bits));
        if let Some(header) = &trace_class.packet_header {
            self.write_indent();
            self.out.push_str("packet.header := ");
            header.accept(self);
            self.out.push_str(";\n");
        }
        self.indent -= 1;
        self.out.push_str("};\n\n");
        self.flush_fragment();
    }

    fn on_environment(&mut self, entries: &[(String, crate::model::EnvironmentValue)]) {
        self.out.push_str("env {\n");
        self.indent += 1;
        for (key, value) in entries {
            self.write_indent();
            match value {
                crate::model::EnvironmentValue::Int(v) => {
                    self.out.push_str(&format!("{} = {};\n", key, v));
                }
                crate::model::EnvironmentValue::String(s) => {
                    self.out
                        .push_str(&format!("{} = \"{}\";\n", key, escape_tsdl_env_string(s)));
                }
            }
        }
        self.indent -= 1;
        self.out.push_str("};\n\n");
        self.flush_fragment();
    }

    fn on_clock_class(&mut self, clock: &ClockClass) {
        self.out.push_str("clock {\n");
        self.indent += 1;
        self.write_indent();
        self.out.push_str(&format!("name = \"{}\";\n", clock.name));
        if let Some(uuid) = clock.uuid {
            self.write_indent();
            self.out.push_str(&format!("uuid = \"{}\";\n", uuid));
        }
        self.write_indent();
        self.out.push_str(&format!(
            "description = \"{}\";\n",
            escape_tsdl_env_string(&clock.description)
        ));
        self.write_indent();
        self.out
            .push_str(&format!("freq = {};\n", clock.frequency_hz));
        self.write_indent();
        self.out.push_str(&format!("offset = {};\n", clock.offset));
        self.indent -= 1;
        self.out.push_str("};\n\n");
        self.flush_fragment();
    }

    fn on_stream_class(&mut self, stream: &StreamClass) {
        self.default_clock = stream.default_clock_class_name.clone();
        self.out.push_str("stream {\n");
        self.indent += 1;
        self.write_indent();
        self.out.push_str(&format!("id = {};\n", stream.id));
        if let Some(header) = &stream.event_header_type {
            self.write_indent();
            self.out.push_str("event.header := ");
            header.accept(self);
            self.out.push_str(";\n");
        }
        if let Some(ctx) = &stream.packet_context_type {
            self.write_indent();
            self.out.push_str("packet.context := ");
            ctx.accept(self);
            self.out.push_str(";\n");
        }
        // The event-context type deliberately does not see the stream's
        // default clock class name (§4.3, `StreamClass::new`'s doc
        // comment): a clock-timestamp role there is an `InvalidFieldType`.
        let default_clock = self.default_clock.take();
        if let Some(ctx) = &stream.event_context_type {
            self.write_indent();
            self.out.push_str("event.context := ");
            ctx.accept(self);
            self.out.push_str(";\n");
        }
        self.default_clock = default_clock;
        self.indent -= 1;
        self.out.push_str("};\n\n");
        self.flush_fragment();
        self.default_clock = None;
    }

    fn on_event_class(&mut self, event: &EventClass) {
        self.out.push_str("event {\n");
        self.indent += 1;
        self.write_indent();
        self.out.push_str(&format!("name = \"{}\";\n", event.name));
        self.write_indent();
        self.out.push_str(&format!("id = {};\n", event.id));
        self.write_indent();
        self.out
            .push_str(&format!("stream_id = {};\n", event.stream_class_id));
        self.write_indent();
        self.out
            .push_str(&format!("loglevel = {};\n", event.log_level));
        if let Some(uri) = &event.emf_uri {
            self.write_indent();
            self.out
                .push_str(&format!("model.emf.uri = \"{}\";\n", escape_tsdl_env_string(uri)));
        }
        if let Some(payload) = &event.payload {
            self.write_indent();
            self.out.push_str("fields := ");
            payload.accept(self);
            self.out.push_str(";\n");
        }
        self.indent -= 1;
        self.out.push_str("};\n\n");
        self.flush_fragment();
    }
}

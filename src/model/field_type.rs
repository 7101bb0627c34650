use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use super::abi::ByteOrder;
use super::error::ModelError;

/// A semantic tag on an integer field identifying it as a well-known
/// element of the packet/event framing (magic number, default-clock
/// timestamp, etc.). The spec describes this as a multiset, but no two
/// consumers distinguish a role present twice on the same field from
/// present once, so a `BTreeSet` is the faithful encoding (see
/// DESIGN.md).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum IntegerRole {
    PacketMagic,
    PacketStreamId,
    PacketContextContentSize,
    PacketContextPacketSize,
    PacketContextEventsDiscarded,
    PacketContextPacketSeqNum,
    DefaultClockTimestamp,
    PacketEndDefaultClockTimestamp,
    StreamInstanceId,
}

impl IntegerRole {
    /// True for the two roles that require the enclosing stream class to
    /// carry a default clock class name (§3.2's invariant).
    pub fn requires_default_clock(self) -> bool {
        matches!(
            self,
            IntegerRole::DefaultClockTimestamp | IntegerRole::PacketEndDefaultClockTimestamp
        )
    }
}

/// The base an integer is rendered in; decimal is CTF's default and is
/// omitted from emitted TSDL (§4.4.3).
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum NumericBase {
    Binary,
    Octal,
    Decimal,
    Hexadecimal,
}

impl NumericBase {
    pub fn tsdl_value(self) -> Option<u8> {
        match self {
            NumericBase::Binary => Some(2),
            NumericBase::Octal => Some(8),
            NumericBase::Decimal => None,
            NumericBase::Hexadecimal => Some(16),
        }
    }
}

/// `ASCII` vs `UTF8`, as carried by string field types and blob/string
/// lowering (§4.4.3).
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum StringEncoding {
    Ascii,
    Utf8,
}

impl StringEncoding {
    pub fn tsdl_keyword(self) -> &'static str {
        match self {
            StringEncoding::Ascii => "ASCII",
            StringEncoding::Utf8 => "UTF8",
        }
    }
}

/// A path (sequence of field names) relative to a well-known scope, used to
/// locate a dynamic array's length field or a variant's tag field.
///
/// Per OQ-4, the emitter only ever uses the last component of this path;
/// multi-level scope traversal is not supported here, so
/// callers are expected to keep referenced fields unique within their
/// immediate containing structure. The full path is still retained on the
/// type (rather than collapsing to a single `String`) so a future consumer
/// of the Trace Object Model that *does* walk scopes has something to work
/// with.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct FieldLocation(Vec<String>);

impl FieldLocation {
    pub fn new(path: Vec<String>) -> Result<Self, ModelError> {
        if path.is_empty() {
            Err(ModelError::EmptyFieldLocation)
        } else {
            Ok(Self(path))
        }
    }

    pub fn single(name: impl Into<String>) -> Self {
        Self(vec![name.into()])
    }

    pub fn components(&self) -> &[String] {
        &self.0
    }

    /// The only component the emitter (and, per OQ-4, this spec) uses.
    pub fn tail(&self) -> &str {
        self.0.last().expect("FieldLocation is never empty")
    }
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct IntegerType {
    pub size_bits: u16,
    pub align_bits: u16,
    pub signed: bool,
    pub base: NumericBase,
    /// `None` means "inherit the trace ABI's byte order"; the emitter omits
    /// `byte_order` from the fragment in that case (§4.4.3).
    pub byte_order: Option<ByteOrder>,
    pub roles: BTreeSet<IntegerRole>,
}

impl IntegerType {
    pub fn new(size_bits: u16, align_bits: u16, signed: bool) -> Self {
        Self {
            size_bits,
            align_bits,
            signed,
            base: NumericBase::Decimal,
            byte_order: None,
            roles: BTreeSet::new(),
        }
    }

    pub fn with_base(mut self, base: NumericBase) -> Self {
        self.base = base;
        self
    }

    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = Some(byte_order);
        self
    }

    pub fn with_role(mut self, role: IntegerRole) -> Self {
        self.roles.insert(role);
        self
    }

    pub fn with_roles(mut self, roles: impl IntoIterator<Item = IntegerRole>) -> Self {
        self.roles.extend(roles);
        self
    }
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct FloatType {
    pub align_bits: u16,
    pub mantissa_digits: u16,
    pub exponent_digits: u16,
    pub byte_order: Option<ByteOrder>,
}

impl FloatType {
    pub fn new(align_bits: u16, mantissa_digits: u16, exponent_digits: u16) -> Self {
        Self {
            align_bits,
            mantissa_digits,
            exponent_digits,
            byte_order: None,
        }
    }

    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = Some(byte_order);
        self
    }
}

/// One `"name" = begin ... end` (or `"name" = value` when `begin == end`)
/// mapping. Ranges may overlap across mappings; mapping order is
/// significant and preserved (§3.2).
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct EnumMapping {
    pub name: String,
    pub range: RangeInclusive<i128>,
}

impl EnumMapping {
    pub fn value(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            range: (value as i128)..=(value as i128),
        }
    }

    pub fn range(name: impl Into<String>, begin: i64, end: i64) -> Self {
        Self {
            name: name.into(),
            range: (begin as i128)..=(end as i128),
        }
    }
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct EnumType {
    pub underlying: IntegerType,
    pub mappings: Vec<EnumMapping>,
}

impl EnumType {
    pub fn new(underlying: IntegerType, mappings: Vec<EnumMapping>) -> Result<Self, ModelError> {
        if mappings.is_empty() {
            return Err(ModelError::EmptyEnum);
        }
        Ok(Self {
            underlying,
            mappings,
        })
    }
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Field {
    pub name: String,
    pub ty: FieldType,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct StructureType {
    pub fields: Vec<Field>,
}

impl StructureType {
    pub fn new(fields: Vec<Field>) -> Result<Self, ModelError> {
        let mut seen = BTreeSet::new();
        for field in &fields {
            if !seen.insert(field.name.as_str()) {
                return Err(ModelError::DuplicateFieldName(field.name.clone()));
            }
        }
        let structure = Self { fields };
        structure.validate_locations()?;
        Ok(structure)
    }

    fn find(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Resolves every dynamic-length/tag `FieldLocation` directly nested in
    /// this structure's fields against sibling fields of this same
    /// structure (per OQ-4, only the tail component is meaningful, so only
    /// single-level, same-scope references can be checked statically).
    fn validate_locations(&self) -> Result<(), ModelError> {
        for field in &self.fields {
            field.ty.validate_locations_against(self, &field.name)?;
        }
        Ok(())
    }
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct StaticArrayType {
    pub element: Box<FieldType>,
    pub length: u64,
    pub align_bits: u16,
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct DynamicArrayType {
    pub element: Box<FieldType>,
    pub length_location: FieldLocation,
    pub align_bits: u16,
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct StaticBlobType {
    pub length_bytes: u64,
    pub align_bits: u16,
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct DynamicBlobType {
    pub length_location: FieldLocation,
    pub align_bits: u16,
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct StaticStringType {
    pub length_bytes: u64,
    pub encoding: StringEncoding,
    pub align_bits: u16,
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct DynamicStringType {
    pub length_location: FieldLocation,
    pub encoding: StringEncoding,
    pub align_bits: u16,
}

/// A variant (tagged union). The spec's `Variant<signed>`/`Variant<unsigned>`
/// sum-type members collapse to this one Rust type: TSDL's `variant`
/// fragment never spells out the tag's signedness (§4.4.3), so the
/// distinction only matters for validating that the tag location resolves
/// to an enum, which `StructureType::validate_locations` already does
/// regardless of that enum's signedness. See DESIGN.md.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct VariantType {
    pub tag_location: FieldLocation,
    /// Ordered tag-name → FieldType choices. Choice names must match an
    /// enumeration mapping name verbatim and bypass identifier escaping
    /// entirely when emitted (§4.4.3).
    pub choices: Vec<(String, FieldType)>,
    pub align_bits: u16,
}

impl VariantType {
    pub fn new(
        tag_location: FieldLocation,
        choices: Vec<(String, FieldType)>,
        align_bits: u16,
    ) -> Result<Self, ModelError> {
        let mut seen = BTreeSet::new();
        for (name, _) in &choices {
            if !seen.insert(name.as_str()) {
                return Err(ModelError::DuplicateVariantChoice {
                    location: tag_location.tail().to_string(),
                    choice: name.clone(),
                });
            }
        }
        Ok(Self {
            tag_location,
            choices,
            align_bits,
        })
    }
}

/// The closed sum-type of field types described in §3.2. No open-ended
/// polymorphism: adding a new kind of field means adding a variant here and
/// a method to [`FieldTypeVisitor`] (§4.2, §9's design note on replacing a
/// "deeply inherited visitor hierarchy").
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum FieldType {
    Integer(IntegerType),
    Float(FloatType),
    SignedEnum(EnumType),
    UnsignedEnum(EnumType),
    StaticArray(StaticArrayType),
    DynamicArray(DynamicArrayType),
    StaticBlob(StaticBlobType),
    DynamicBlob(DynamicBlobType),
    NullTerminatedString(StringEncoding),
    StaticString(StaticStringType),
    DynamicString(DynamicStringType),
    Structure(StructureType),
    Variant(VariantType),
}

impl FieldType {
    fn validate_locations_against(
        &self,
        scope: &StructureType,
        field_name: &str,
    ) -> Result<(), ModelError> {
        match self {
            FieldType::DynamicArray(a) => {
                check_length_location(scope, field_name, &a.length_location)
            }
            FieldType::DynamicBlob(b) => {
                check_length_location(scope, field_name, &b.length_location)
            }
            FieldType::DynamicString(s) => {
                check_length_location(scope, field_name, &s.length_location)
            }
            FieldType::Variant(v) => check_tag_location(scope, field_name, &v.tag_location),
            FieldType::Structure(inner) => {
                // Nested structures establish their own scope; already
                // validated when the inner `StructureType` was constructed.
                let _ = inner;
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

fn check_length_location(
    scope: &StructureType,
    field_name: &str,
    location: &FieldLocation,
) -> Result<(), ModelError> {
    let tail = location.tail();
    let referenced = scope
        .find(tail)
        .ok_or_else(|| ModelError::UnresolvedFieldLocation {
            field: field_name.to_string(),
            location: tail.to_string(),
        })?;
    match &referenced.ty {
        FieldType::Integer(i) if !i.signed => Ok(()),
        _ => Err(ModelError::LengthFieldNotUnsignedInteger {
            field: field_name.to_string(),
            location: tail.to_string(),
        }),
    }
}

/// Recursively scans a field type for an integer field carrying a
/// clock-timestamp role. Used by [`crate::model::StreamClass::new`] to
/// enforce §3.2's invariant that such a role requires the enclosing stream
/// class to carry a default clock class name.
pub(crate) fn references_default_clock(ty: &FieldType) -> bool {
    match ty {
        FieldType::Integer(i) => i.roles.iter().copied().any(IntegerRole::requires_default_clock),
        FieldType::Structure(s) => s.fields.iter().any(|f| references_default_clock(&f.ty)),
        FieldType::Variant(v) => v.choices.iter().any(|(_, ty)| references_default_clock(ty)),
        FieldType::StaticArray(a) => references_default_clock(&a.element),
        FieldType::DynamicArray(a) => references_default_clock(&a.element),
        _ => false,
    }
}

fn check_tag_location(
    scope: &StructureType,
    field_name: &str,
    location: &FieldLocation,
) -> Result<(), ModelError> {
    let tail = location.tail();
    let referenced = scope
        .find(tail)
        .ok_or_else(|| ModelError::UnresolvedFieldLocation {
            field: field_name.to_string(),
            location: tail.to_string(),
        })?;
    match &referenced.ty {
        FieldType::SignedEnum(_) | FieldType::UnsignedEnum(_) => Ok(()),
        _ => Err(ModelError::TagFieldNotEnum {
            field: field_name.to_string(),
            location: tail.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structure_rejects_duplicate_field_names() {
        let result = StructureType::new(vec![
            Field::new("a", FieldType::Integer(IntegerType::new(8, 8, false))),
            Field::new("a", FieldType::Integer(IntegerType::new(8, 8, false))),
        ]);
        assert_eq!(
            result.unwrap_err(),
            ModelError::DuplicateFieldName("a".to_string())
        );
    }

    #[test]
    fn dynamic_array_length_must_resolve_to_unsigned_integer() {
        let result = StructureType::new(vec![
            Field::new("len", FieldType::Integer(IntegerType::new(32, 32, true))),
            Field::new(
                "payload",
                FieldType::DynamicArray(DynamicArrayType {
                    element: Box::new(FieldType::Integer(IntegerType::new(8, 8, false))),
                    length_location: FieldLocation::single("len"),
                    align_bits: 0,
                }),
            ),
        ]);
        assert!(matches!(
            result.unwrap_err(),
            ModelError::LengthFieldNotUnsignedInteger { .. }
        ));
    }

    #[test]
    fn dynamic_array_length_resolves_against_sibling() {
        let result = StructureType::new(vec![
            Field::new("len", FieldType::Integer(IntegerType::new(32, 32, false))),
            Field::new(
                "payload",
                FieldType::DynamicArray(DynamicArrayType {
                    element: Box::new(FieldType::Integer(IntegerType::new(8, 8, false))),
                    length_location: FieldLocation::single("len"),
                    align_bits: 0,
                }),
            ),
        ]);
        assert!(result.is_ok());
    }

    #[test]
    fn variant_tag_must_resolve_to_enum() {
        let enum_ty = EnumType::new(
            IntegerType::new(8, 8, false),
            vec![EnumMapping::value("A", 0)],
        )
        .unwrap();

        let result = StructureType::new(vec![
            Field::new("tag", FieldType::UnsignedEnum(enum_ty)),
            Field::new(
                "payload",
                FieldType::Variant(
                    VariantType::new(
                        FieldLocation::single("tag"),
                        vec![(
                            "A".to_string(),
                            FieldType::Integer(IntegerType::new(32, 32, false)),
                        )],
                        0,
                    )
                    .unwrap(),
                ),
            ),
        ]);
        assert!(result.is_ok());
    }
}

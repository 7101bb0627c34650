/// Byte order, as used throughout the Trace Object Model and the TSDL
/// emitter.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    /// TSDL spelling, as emitted in `byte_order = be|le;`.
    pub fn tsdl_keyword(self) -> &'static str {
        match self {
            ByteOrder::Little => "le",
            ByteOrder::Big => "be",
        }
    }
}

/// The native ABI a trace was captured under: byte order, the
/// alignment/size of each fixed-width unsigned integer type, and the
/// platform's `long` width.
///
/// Provided once at [`crate::model::TraceClass`] construction (§6's
/// configuration boundary) and propagated down to every integer field's
/// default alignment and to the emitter's byte-order-omission rule (§4.4.3:
/// a field's `byte_order` is only emitted when it differs from the trace
/// ABI's).
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Abi {
    pub byte_order: ByteOrder,
    pub uint8_align_bits: u16,
    pub uint16_align_bits: u16,
    pub uint32_align_bits: u16,
    pub uint64_align_bits: u16,
    /// Width in bits of the platform's `long` type (32 or 64, typically).
    ///
    /// Emitted verbatim as the trace fragment's `long_size` field. Per
    /// OQ-3, this is the true size, not the alignment the historical
    /// source emitted here by mistake.
    pub long_size_bits: u16,
}

impl Abi {
    /// The common LP64 little-endian ABI (x86_64, aarch64 Linux).
    pub fn lp64_le() -> Self {
        Self {
            byte_order: ByteOrder::Little,
            uint8_align_bits: 8,
            uint16_align_bits: 16,
            uint32_align_bits: 32,
            uint64_align_bits: 64,
            long_size_bits: 64,
        }
    }

    /// The common ILP32 little-endian ABI (32-bit ARM, x86).
    pub fn ilp32_le() -> Self {
        Self {
            byte_order: ByteOrder::Little,
            uint8_align_bits: 8,
            uint16_align_bits: 16,
            uint32_align_bits: 32,
            uint64_align_bits: 32,
            long_size_bits: 32,
        }
    }
}

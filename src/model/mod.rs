//! The CTF Trace Object Model (§3): a closed,
//! validated, in-memory representation of a CTF 1.8 trace's metadata, built
//! up through per-type constructors that enforce the model's structural
//! invariants (unique names/ids, resolvable dynamic-length and variant-tag
//! locations, default-clock-class requirements) at construction time rather
//! than at emission time.
//!
//! Everything under this module is plain, `Clone`-able data. The object
//! graph that tracks ownership and lifetime (sessions, traces, streams,
//! viewers) lives in [`crate::lifecycle`] and holds these types behind
//! [`crate::reclaim::StrongRef`].

mod abi;
mod clock;
mod env;
mod error;
mod event_class;
mod field_type;
mod stream_class;
mod trace_class;
mod visitor;

pub use abi::{Abi, ByteOrder};
pub use clock::ClockClass;
pub use env::EnvironmentValue;
pub use error::ModelError;
pub use event_class::EventClass;
pub use field_type::{
    DynamicArrayType, DynamicBlobType, DynamicStringType, EnumMapping, EnumType, Field,
    FieldLocation, FieldType, FloatType, IntegerRole, IntegerType, NumericBase, StaticArrayType,
    StaticBlobType, StaticStringType, StringEncoding, StructureType, VariantType,
};
pub use stream_class::StreamClass;
pub use trace_class::TraceClass;
pub use visitor::{FieldTypeVisitor, TraceClassVisitor};

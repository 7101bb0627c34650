//! CTF 1.8 / TSDL metadata emission (§4.4): turns a [`crate::model::TraceClass`]
//! into the text fragments a live viewer or trace reader expects on the
//! metadata stream.

mod emitter;
mod error;
mod escape;
mod sink;

pub use emitter::emit_tsdl_document;
pub use error::EmitError;
pub use escape::{escape_tsdl_env_string, escape_tsdl_identifier};
pub use sink::{FragmentSink, StringSink};

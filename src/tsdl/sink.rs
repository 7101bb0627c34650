use std::io;

/// Collaborator-supplied destination for emitted TSDL fragments (§4.4.5).
/// The emitter calls `append_fragment` once per top-level fragment, in
/// order; concatenating everything it receives produces a valid TSDL
/// document.
pub trait FragmentSink {
    fn append_fragment(&mut self, text: &str) -> io::Result<()>;
}

/// An in-memory sink, used by tests and the demo binary.
#[derive(Default, Debug)]
pub struct StringSink(String);

impl StringSink {
    pub fn new() -> Self {
        Self(String::new())
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FragmentSink for StringSink {
    fn append_fragment(&mut self, text: &str) -> io::Result<()> {
        self.0.push_str(text);
        Ok(())
    }
}

impl<W: io::Write> FragmentSink for W {
    fn append_fragment(&mut self, text: &str) -> io::Result<()> {
        self.write_all(text.as_bytes())
    }
}

use std::ops::{Deref, DerefMut};

/// Text buffer that tracks the indentation of generated code.
///
/// Indentation only changes through [`CodeWriter::indent`], whose guard
/// restores the previous level when dropped, so every emission leaves the
/// writer at the level it found it.
#[derive(Debug, Clone)]
pub struct CodeWriter {
    buf: String,
    level: usize,
    unit: &'static str,
}

impl CodeWriter {
    pub fn new(unit: &'static str) -> Self {
        Self::with_level(unit, 0)
    }

    pub fn with_level(unit: &'static str, level: usize) -> Self {
        Self {
            buf: String::new(),
            level,
            unit,
        }
    }

    /// Writes one line at the current indentation. Blank lines carry no indent.
    pub fn line(&mut self, text: &str) {
        if !text.is_empty() {
            for _ in 0..self.level {
                self.buf.push_str(self.unit);
            }
            self.buf.push_str(text);
        }
        self.buf.push('\n');
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn indent(&mut self) -> Indented<'_> {
        self.level += 1;
        Indented { writer: self }
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}

/// One level deeper for as long as it lives.
pub struct Indented<'a> {
    writer: &'a mut CodeWriter,
}

impl Deref for Indented<'_> {
    type Target = CodeWriter;

    fn deref(&self) -> &CodeWriter {
        self.writer
    }
}

impl DerefMut for Indented<'_> {
    fn deref_mut(&mut self) -> &mut CodeWriter {
        self.writer
    }
}

impl Drop for Indented<'_> {
    fn drop(&mut self) {
        self.writer.level -= 1;
    }
}

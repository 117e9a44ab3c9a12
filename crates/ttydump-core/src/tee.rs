use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Unmodified copy of every byte read from the device.
#[derive(Debug)]
pub struct TeeSink<W: Write> {
    writer: W,
    written: u64,
}

impl TeeSink<BufWriter<File>> {
    /// Create (or truncate) `path` for binary capture.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> TeeSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    pub fn push(&mut self, byte: u8) -> io::Result<()> {
        self.writer.write_all(&[byte])?;
        self.written += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Bytes accepted so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

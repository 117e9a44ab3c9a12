use std::io::{self, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

use crate::format::Formatter;
use crate::tee::TeeSink;
use crate::timestamp::TimestampTracker;

/// Largest read issued to the device per iteration.
pub const READ_CHUNK_SIZE: usize = 254;

/// Why a run ended without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The device returned no data (a zero-length read).
    Timeout,
    /// A stop signal arrived, during or between reads.
    Interrupted,
}

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("read error: {0}")]
    Read(#[source] io::Error),
    #[error("console write failed: {0}")]
    Console(#[source] io::Error),
    #[error("tee write failed: {0}")]
    Tee(#[source] io::Error),
}

/// Reads chunks, renders each byte and copies it to the tee.
pub struct ReadLoop<W: Write, T: Write> {
    formatter: Formatter,
    stamps: TimestampTracker,
    console: W,
    tee: Option<TeeSink<T>>,
    rendered: String,
    stop: Option<&'static AtomicBool>,
}

impl<W: Write, T: Write> ReadLoop<W, T> {
    pub fn new(formatter: Formatter, console: W, tee: Option<TeeSink<T>>) -> Self {
        Self {
            formatter,
            stamps: TimestampTracker::new(),
            console,
            tee,
            rendered: String::new(),
            stop: None,
        }
    }

    /// Check `flag` before every read and stop once it is set.
    pub fn with_stop_flag(mut self, flag: &'static AtomicBool) -> Self {
        self.stop = Some(flag);
        self
    }

    /// Run until the source times out, is interrupted, or fails.
    pub fn run<R: Read>(&mut self, source: &mut R) -> Result<StopReason, MonitorError> {
        let mut buf = [0u8; READ_CHUNK_SIZE];
        loop {
            if self.stop.is_some_and(|flag| flag.load(Ordering::SeqCst)) {
                return self.interrupted();
            }
            match source.read(&mut buf) {
                Ok(0) => return Ok(StopReason::Timeout),
                Ok(n) => self.process_chunk(&buf[..n])?,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => return self.interrupted(),
                Err(e) => return Err(MonitorError::Read(e)),
            }
        }
    }

    fn interrupted(&mut self) -> Result<StopReason, MonitorError> {
        self.console
            .write_all(b"\n")
            .and_then(|()| self.console.flush())
            .map_err(MonitorError::Console)?;
        Ok(StopReason::Interrupted)
    }

    /// Format and tee one chunk, then flush both outputs.
    pub fn process_chunk(&mut self, chunk: &[u8]) -> Result<(), MonitorError> {
        self.rendered.clear();
        for &byte in chunk {
            self.formatter.push(byte, &mut self.stamps, &mut self.rendered);
            if let Some(tee) = self.tee.as_mut() {
                tee.push(byte).map_err(MonitorError::Tee)?;
            }
        }

        // The capture is flushed before console output so a failing
        // terminal cannot cost captured bytes.
        if let Some(tee) = self.tee.as_mut() {
            tee.flush().map_err(MonitorError::Tee)?;
        }
        self.console
            .write_all(self.rendered.as_bytes())
            .and_then(|()| self.console.flush())
            .map_err(MonitorError::Console)
    }

    pub fn tee(&self) -> Option<&TeeSink<T>> {
        self.tee.as_ref()
    }

    pub fn into_parts(self) -> (W, Option<TeeSink<T>>) {
        (self.console, self.tee)
    }
}

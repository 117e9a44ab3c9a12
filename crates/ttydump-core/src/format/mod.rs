//! Per-mode byte renderers.
//!
//! Each formatter consumes one byte at a time, decides whether a new visual
//! line begins, and appends the rendered text to a caller-owned buffer.
//! Rendering never fails: every byte value has a representation.

mod ascii;
mod midi;
mod raw;

pub use ascii::AsciiFormatter;
pub use midi::MidiFormatter;
pub use raw::RawFormatter;

use crate::config::{DisplayOptions, MonitorConfig, NumeralBase, OutputMode};
use crate::timestamp::TimestampTracker;

/// Cursor home plus erase display, used instead of a newline in single-line mode.
pub const CLEAR_SCREEN: &str = "\x1b[1;1H\x1b[2J";
pub const COLOR_RESET: &str = "\x1b[0m";
pub const COLOR_ESCAPED: &str = "\x1b[32m";
pub const COLOR_NOTE_ON: &str = "\x1b[32m";
pub const COLOR_NOTE_OFF: &str = "\x1b[35m";
pub const COLOR_CONTROL_CHANGE: &str = "\x1b[36m";
pub const COLOR_PITCH_BEND: &str = "\x1b[93m";
pub const COLOR_AFTERTOUCH: &str = "\x1b[94m";

/// The single active renderer for a run.
#[derive(Debug)]
pub enum Formatter {
    Raw(RawFormatter),
    Ascii(AsciiFormatter),
    Midi(MidiFormatter),
}

impl Formatter {
    pub fn new(mode: OutputMode, column_width: u8, display: DisplayOptions) -> Self {
        match mode {
            OutputMode::Raw => Self::Raw(RawFormatter::new(column_width, display)),
            OutputMode::Ascii => Self::Ascii(AsciiFormatter::new(column_width, display)),
            OutputMode::Midi => Self::Midi(MidiFormatter::new(display)),
        }
    }

    pub fn from_config(cfg: &MonitorConfig) -> Self {
        Self::new(cfg.mode, cfg.column_width, cfg.display)
    }

    pub fn push(&mut self, byte: u8, stamps: &mut TimestampTracker, out: &mut String) {
        match self {
            Self::Raw(f) => f.push(byte, stamps, out),
            Self::Ascii(f) => f.push(byte, stamps, out),
            Self::Midi(f) => f.push(byte, stamps, out),
        }
    }
}

fn line_boundary(display: &DisplayOptions, out: &mut String) {
    if display.single_line {
        out.push_str(CLEAR_SCREEN);
    } else {
        out.push('\n');
    }
}

fn timestamp(display: &DisplayOptions, stamps: &mut TimestampTracker, out: &mut String) {
    if display.timestamps.any() {
        out.push_str(&stamps.mark_and_report(display.timestamps));
    }
}

/// Right-aligned numeral followed by a separating space.
fn numeral(display: &DisplayOptions, byte: u8, out: &mut String) {
    let text = match (display.base, display.zero_pad) {
        (NumeralBase::Hex, false) => format!("{byte:2x} "),
        (NumeralBase::Hex, true) => format!("{byte:02x} "),
        (NumeralBase::Decimal, false) => format!("{byte:3} "),
        (NumeralBase::Decimal, true) => format!("{byte:03} "),
    };
    out.push_str(&text);
}

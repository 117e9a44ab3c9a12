use ttydump_decode::ByteClass;

use super::{line_boundary, timestamp, CLEAR_SCREEN, COLOR_ESCAPED, COLOR_RESET};
use crate::config::{DisplayOptions, NumeralBase};
use crate::timestamp::TimestampTracker;

/// Text view: literal characters where possible, backslash escapes otherwise.
///
/// Switching between literal and escaped bytes always starts a new line, and
/// runs of escaped bytes wrap every `width` bytes. Timestamps are printed at
/// logical line starts only: before the first byte and after a literal `\n`.
#[derive(Debug)]
pub struct AsciiFormatter {
    width: u8,
    /// Escaped bytes on the current line; reset by any literal byte.
    column: u8,
    previous: Option<u8>,
    display: DisplayOptions,
}

impl AsciiFormatter {
    pub fn new(width: u8, display: DisplayOptions) -> Self {
        Self {
            width: width.max(1),
            column: 0,
            previous: None,
            display,
        }
    }

    pub fn push(&mut self, byte: u8, stamps: &mut TimestampTracker, out: &mut String) {
        let class = ByteClass::of(byte);
        let previous_class = self.previous.map_or(ByteClass::Literal, ByteClass::of);

        let boundary = if class.is_literal() {
            !previous_class.is_literal()
        } else {
            self.column == 0
        };

        // Single-line mode clears after every '\n', on top of any boundary.
        if self.display.single_line && self.previous == Some(b'\n') {
            out.push_str(CLEAR_SCREEN);
        }
        if boundary {
            line_boundary(&self.display, out);
        }
        if matches!(self.previous, None | Some(b'\n')) {
            timestamp(&self.display, stamps, out);
        }

        match class {
            ByteClass::Literal => {
                out.push(char::from(byte));
                self.column = 0;
            }
            ByteClass::Escaped => {
                self.escape(byte, out);
                self.column += 1;
                if self.column >= self.width {
                    self.column = 0;
                }
            }
        }

        self.previous = Some(byte);
    }

    fn escape(&self, byte: u8, out: &mut String) {
        let text = match self.display.base {
            NumeralBase::Hex => format!("\\x{byte:02x}"),
            NumeralBase::Decimal => format!("\\{byte:03}"),
        };
        if self.display.color {
            out.push_str(COLOR_ESCAPED);
            out.push_str(&text);
            out.push_str(COLOR_RESET);
        } else {
            out.push_str(&text);
        }
    }
}

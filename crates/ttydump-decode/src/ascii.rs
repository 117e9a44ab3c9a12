/// How a byte is shown in the ASCII view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteClass {
    /// Written to the terminal as the character itself.
    Literal,
    /// Written as a backslash escape (`\xNN` or `\NNN`).
    Escaped,
}

impl ByteClass {
    pub fn of(byte: u8) -> Self {
        match byte {
            b'\\' => Self::Escaped,
            b'\t' | b'\n' | b'\r' => Self::Literal,
            0x20..=0x7e => Self::Literal,
            _ => Self::Escaped,
        }
    }

    pub fn is_literal(self) -> bool {
        self == Self::Literal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn printable_and_line_controls_are_literal() {
        for b in [b'A', b' ', b'~', b'0', b'\t', b'\n', b'\r'] {
            assert_eq!(ByteClass::of(b), ByteClass::Literal, "byte {b:#04x}");
        }
    }

    #[test]
    fn backslash_is_reserved_for_escapes() {
        assert_eq!(ByteClass::of(b'\\'), ByteClass::Escaped);
    }

    #[test]
    fn other_controls_and_high_bytes_are_escaped() {
        for b in [0x00, 0x01, 0x1b, 0x7f, 0x80, 0xff] {
            assert_eq!(ByteClass::of(b), ByteClass::Escaped, "byte {b:#04x}");
        }
    }
}

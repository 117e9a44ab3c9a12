/// Channel voice message kinds distinguished by the MIDI view.
///
/// Only the upper nibble of a status byte is inspected. Data bytes and
/// status bytes of other kinds map to [`MidiStatus::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiStatus {
    NoteOff,
    NoteOn,
    ControlChange,
    Aftertouch,
    PitchBend,
    Other,
}

impl MidiStatus {
    pub fn of(byte: u8) -> Self {
        match byte & 0xf0 {
            0x80 => Self::NoteOff,
            0x90 => Self::NoteOn,
            0xb0 => Self::ControlChange,
            0xd0 => Self::Aftertouch,
            0xe0 => Self::PitchBend,
            _ => Self::Other,
        }
    }
}

/// A status byte has its high bit set and begins a new message.
pub fn is_status(byte: u8) -> bool {
    byte & 0x80 != 0
}

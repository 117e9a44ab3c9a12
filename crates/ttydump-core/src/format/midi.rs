use ttydump_decode::midi::{self, MidiStatus};

use super::{
    line_boundary, numeral, timestamp, COLOR_AFTERTOUCH, COLOR_CONTROL_CHANGE, COLOR_NOTE_OFF,
    COLOR_NOTE_ON, COLOR_PITCH_BEND, COLOR_RESET,
};
use crate::config::DisplayOptions;
use crate::timestamp::TimestampTracker;

/// One line per MIDI message: every status byte starts a new line.
#[derive(Debug)]
pub struct MidiFormatter {
    display: DisplayOptions,
}

impl MidiFormatter {
    pub fn new(display: DisplayOptions) -> Self {
        Self { display }
    }

    pub fn push(&mut self, byte: u8, stamps: &mut TimestampTracker, out: &mut String) {
        if midi::is_status(byte) {
            line_boundary(&self.display, out);
            timestamp(&self.display, stamps, out);
        }

        if self.display.color {
            out.push_str(color_of(MidiStatus::of(byte)));
        }

        numeral(&self.display, byte, out);
    }
}

fn color_of(status: MidiStatus) -> &'static str {
    match status {
        MidiStatus::NoteOn => COLOR_NOTE_ON,
        MidiStatus::NoteOff => COLOR_NOTE_OFF,
        MidiStatus::ControlChange => COLOR_CONTROL_CHANGE,
        MidiStatus::Aftertouch => COLOR_AFTERTOUCH,
        MidiStatus::PitchBend => COLOR_PITCH_BEND,
        MidiStatus::Other => COLOR_RESET,
    }
}

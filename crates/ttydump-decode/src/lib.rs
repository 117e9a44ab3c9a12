//! Single-byte classification for the serial stream views.

pub mod ascii;
pub mod midi;

pub use ascii::ByteClass;
pub use midi::MidiStatus;

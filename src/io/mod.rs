// Purpose: MIDI boundary, raw bytes to voice messages

pub mod converter;
pub mod midi;

pub use converter::midi_to_message;
pub use midi::MidiEvent;

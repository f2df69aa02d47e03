use crate::{
    io::midi::{MidiEvent, CC_ALL_NOTES_OFF},
    synth::message::VoiceMessage,
};

/// Map a MIDI event on `channel_filter` to a voice message.
///
/// Note-on with velocity 0 is a note-off. Pitch bend, pressure, program
/// change and other controllers have no effect on the voice and map to
/// `None`.
pub fn midi_to_message(midi: MidiEvent, channel_filter: u8) -> Option<VoiceMessage> {
    if midi.channel() != channel_filter {
        return None;
    }

    match midi {
        MidiEvent::NoteOn { key, velocity: 0, .. } | MidiEvent::NoteOff { key, .. } => {
            Some(VoiceMessage::NoteOff { note: key })
        }
        MidiEvent::NoteOn { key, velocity, .. } => Some(VoiceMessage::NoteOn {
            note: key,
            velocity,
        }),
        MidiEvent::ControlChange {
            controller: CC_ALL_NOTES_OFF,
            ..
        } => Some(VoiceMessage::AllNoteOff),
        _ => None,
    }
}

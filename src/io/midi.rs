//! Channel voice messages, decoded from raw MIDI bytes.

/// Controller number for "All Notes Off".
pub const CC_ALL_NOTES_OFF: u8 = 123;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
    PolyAftertouch { channel: u8, key: u8, pressure: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
    ProgramChange { channel: u8, program: u8 },
    ChannelPressure { channel: u8, pressure: u8 },
    /// Centered at 0, range -8192..=8191.
    PitchBend { channel: u8, value: i16 },
}

impl MidiEvent {
    /// Decode one channel message. Returns `None` for system messages,
    /// running status and truncated input.
    pub fn from_bytes(bytes: &[u8]) -> Option<MidiEvent> {
        let (&status, data) = bytes.split_first()?;
        if !(0x80..0xf0).contains(&status) {
            return None;
        }

        let channel = status & 0x0f;
        let byte = |i: usize| data.get(i).map(|b| b & 0x7f);

        let event = match status & 0xf0 {
            0x80 => MidiEvent::NoteOff {
                channel,
                key: byte(0)?,
                velocity: byte(1)?,
            },
            0x90 => MidiEvent::NoteOn {
                channel,
                key: byte(0)?,
                velocity: byte(1)?,
            },
            0xa0 => MidiEvent::PolyAftertouch {
                channel,
                key: byte(0)?,
                pressure: byte(1)?,
            },
            0xb0 => MidiEvent::ControlChange {
                channel,
                controller: byte(0)?,
                value: byte(1)?,
            },
            0xc0 => MidiEvent::ProgramChange {
                channel,
                program: byte(0)?,
            },
            0xd0 => MidiEvent::ChannelPressure {
                channel,
                pressure: byte(0)?,
            },
            _ => {
                let lsb = byte(0)? as i16;
                let msb = byte(1)? as i16;
                MidiEvent::PitchBend {
                    channel,
                    value: ((msb << 7) | lsb) - 8192,
                }
            }
        };

        Some(event)
    }

    pub fn channel(&self) -> u8 {
        match *self {
            MidiEvent::NoteOn { channel, .. }
            | MidiEvent::NoteOff { channel, .. }
            | MidiEvent::PolyAftertouch { channel, .. }
            | MidiEvent::ControlChange { channel, .. }
            | MidiEvent::ProgramChange { channel, .. }
            | MidiEvent::ChannelPressure { channel, .. }
            | MidiEvent::PitchBend { channel, .. } => channel,
        }
    }
}

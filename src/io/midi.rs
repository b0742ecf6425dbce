/// A decoded channel-voice MIDI message.
///
/// The kernel only acts on note on/off (they gate the envelope); the other
/// variants decode so hosts can pass raw streams straight through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
    PitchBend { channel: u8, value: i16 },
    ProgramChange { channel: u8, program: u8 },
}

impl MidiEvent {
    /// Decode a raw message. Returns `None` for system messages, running
    /// status and anything too short to carry its data bytes.
    pub fn from_bytes(message: &[u8]) -> Option<Self> {
        let status = *message.first()?;
        let channel = status & 0x0F;
        let data = |i: usize| message.get(i).map(|b| b & 0x7F);

        match status & 0xF0 {
            0x80 => Some(MidiEvent::NoteOff {
                channel,
                key: data(1)?,
                velocity: data(2)?,
            }),
            // Velocity zero is a note off by convention.
            0x90 if data(2)? == 0 => Some(MidiEvent::NoteOff {
                channel,
                key: data(1)?,
                velocity: 0,
            }),
            0x90 => Some(MidiEvent::NoteOn {
                channel,
                key: data(1)?,
                velocity: data(2)?,
            }),
            0xB0 => Some(MidiEvent::ControlChange {
                channel,
                controller: data(1)?,
                value: data(2)?,
            }),
            0xC0 => Some(MidiEvent::ProgramChange {
                channel,
                program: data(1)?,
            }),
            0xE0 => {
                let raw = (data(2)? as i16) << 7 | data(1)? as i16;
                Some(MidiEvent::PitchBend {
                    channel,
                    value: raw - 8192,
                })
            }
            _ => None,
        }
    }

    pub fn channel(&self) -> u8 {
        match *self {
            MidiEvent::NoteOn { channel, .. }
            | MidiEvent::NoteOff { channel, .. }
            | MidiEvent::ControlChange { channel, .. }
            | MidiEvent::PitchBend { channel, .. }
            | MidiEvent::ProgramChange { channel, .. } => channel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_note_messages() {
        assert_eq!(
            MidiEvent::from_bytes(&[0x91, 60, 100]),
            Some(MidiEvent::NoteOn {
                channel: 1,
                key: 60,
                velocity: 100
            })
        );
        assert_eq!(
            MidiEvent::from_bytes(&[0x80, 60, 64]),
            Some(MidiEvent::NoteOff {
                channel: 0,
                key: 60,
                velocity: 64
            })
        );
    }

    #[test]
    fn channel_comes_from_the_status_nibble() {
        for bytes in [[0x95, 60, 1], [0x85, 60, 0], [0xB5, 7, 100], [0xE5, 0, 64]] {
            let event = MidiEvent::from_bytes(&bytes).unwrap();
            assert_eq!(event.channel(), 5, "{event:?}");
        }
    }

    #[test]
    fn zero_velocity_note_on_is_note_off() {
        assert!(matches!(
            MidiEvent::from_bytes(&[0x90, 60, 0]),
            Some(MidiEvent::NoteOff { key: 60, .. })
        ));
    }

    #[test]
    fn pitch_bend_is_centered() {
        assert_eq!(
            MidiEvent::from_bytes(&[0xE0, 0x00, 0x40]),
            Some(MidiEvent::PitchBend {
                channel: 0,
                value: 0
            })
        );
        assert_eq!(
            MidiEvent::from_bytes(&[0xE0, 0x7F, 0x7F]),
            Some(MidiEvent::PitchBend {
                channel: 0,
                value: 8191
            })
        );
    }

    #[test]
    fn rejects_short_and_system_messages() {
        assert_eq!(MidiEvent::from_bytes(&[]), None);
        assert_eq!(MidiEvent::from_bytes(&[0x90, 60]), None);
        assert_eq!(MidiEvent::from_bytes(&[0xF8]), None);
    }
}

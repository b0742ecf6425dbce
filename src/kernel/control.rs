#[cfg(feature = "rtrb")]
use rtrb::{Consumer, Producer, RingBuffer};

use crate::{io::midi::MidiEvent, params::ParamId};
#[cfg(feature = "rtrb")]
use crate::error::{KernelError, Result};

/// A change sent from the control thread to the render thread.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ControlMessage {
    /// Set a control to a plain value in its own units.
    SetParameter { id: ParamId, value: f64 },
    /// Set a control from a normalized host value in [0, 1].
    SetNormalized { id: ParamId, value: f64 },
    Midi(MidiEvent),
}

/// Control-thread end of the queue into a [`SynthKernel`](super::SynthKernel).
///
/// Every method is non-blocking; a full queue is reported, never waited on.
#[cfg(feature = "rtrb")]
pub struct ControlHandle {
    tx: Producer<ControlMessage>,
}

#[cfg(feature = "rtrb")]
impl ControlHandle {
    pub fn send(&mut self, message: ControlMessage) -> Result<()> {
        self.tx.push(message).map_err(|_| {
            log::warn!("control queue full, dropped {message:?}");
            KernelError::QueueFull
        })
    }

    pub fn set_parameter(&mut self, id: ParamId, value: f64) -> Result<()> {
        log::debug!("{} = {value}", id.range().name);
        self.send(ControlMessage::SetParameter { id, value })
    }

    pub fn set_normalized(&mut self, id: ParamId, value: f64) -> Result<()> {
        log::debug!("{} = {value} (normalized)", id.range().name);
        self.send(ControlMessage::SetNormalized { id, value })
    }

    /// Set a control by its raw host id.
    pub fn set_raw(&mut self, raw: u32, value: f64) -> Result<()> {
        let id = ParamId::try_from(raw)?;
        self.set_parameter(id, value)
    }

    pub fn note_on(&mut self, key: u8, velocity: u8) -> Result<()> {
        log::info!("note on {key} vel {velocity}");
        self.send(ControlMessage::Midi(MidiEvent::NoteOn {
            channel: 0,
            key,
            velocity,
        }))
    }

    pub fn note_off(&mut self, key: u8) -> Result<()> {
        log::info!("note off {key}");
        self.send(ControlMessage::Midi(MidiEvent::NoteOff {
            channel: 0,
            key,
            velocity: 0,
        }))
    }

    pub fn send_midi(&mut self, event: MidiEvent) -> Result<()> {
        self.send(ControlMessage::Midi(event))
    }

    /// Free slots left in the queue.
    pub fn available(&self) -> usize {
        self.tx.slots()
    }
}

/// Build the queue pair. The consumer goes to the render thread.
#[cfg(feature = "rtrb")]
pub fn control_queue(capacity: usize) -> (ControlHandle, Consumer<ControlMessage>) {
    let (tx, rx) = RingBuffer::<ControlMessage>::new(capacity.max(1));
    (ControlHandle { tx }, rx)
}

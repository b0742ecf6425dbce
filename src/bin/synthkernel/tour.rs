//! The scripted sequence of control changes the demo plays.

use std::time::Duration;

use synth_kernel::{
    dsp::{LfoRouting, TableMode, Waveform},
    ControlMessage, MidiEvent, ParamId, Slot,
};

/// A batch of control messages followed by a pause.
pub struct Step {
    pub label: &'static str,
    pub messages: Vec<ControlMessage>,
    pub hold: Duration,
}

impl Step {
    fn new(label: &'static str, hold_ms: u64) -> Self {
        Self {
            label,
            messages: Vec::new(),
            hold: Duration::from_millis(hold_ms),
        }
    }

    fn set(mut self, id: ParamId, value: f64) -> Self {
        self.messages.push(ControlMessage::SetParameter { id, value });
        self
    }

    fn note_on(mut self, key: u8) -> Self {
        self.messages.push(ControlMessage::Midi(MidiEvent::NoteOn {
            channel: 0,
            key,
            velocity: 100,
        }));
        self
    }

    fn note_off(mut self, key: u8) -> Self {
        self.messages.push(ControlMessage::Midi(MidiEvent::NoteOff {
            channel: 0,
            key,
            velocity: 0,
        }));
        self
    }
}

fn waveform(w: Waveform) -> f64 {
    w.index() as f64
}

pub fn steps() -> Vec<Step> {
    let osc = Slot::One;
    let other = Slot::Two;

    vec![
        Step::new("sine 220 Hz", 1500)
            .set(ParamId::OscFrequency(osc), 220.0)
            .set(ParamId::OscStart(osc), 1.0),
        Step::new("naive saw", 1500).set(ParamId::OscWaveform(osc), waveform(Waveform::Saw)),
        Step::new("bandlimited saw", 1500)
            .set(ParamId::OscMode(osc), TableMode::Bandlimited.index() as f64),
        Step::new("square, second oscillator a fifth up", 1500)
            .set(ParamId::OscWaveform(osc), waveform(Waveform::Square))
            .set(ParamId::OscFrequency(other), 330.0)
            .set(ParamId::OscWaveform(other), waveform(Waveform::Triangle))
            .set(ParamId::OscStart(other), 1.0),
        Step::new("LFO 1 on FM, 6 Hz vibrato", 2000)
            .set(ParamId::OscStart(other), 0.0)
            .set(ParamId::LfoRouting(osc), LfoRouting::Fm.index() as f64)
            .set(ParamId::LfoFrequency(osc), 6.0)
            .set(ParamId::LfoStart(osc), 1.0),
        Step::new("LFO 1 on AM", 2000).set(ParamId::LfoRouting(osc), LfoRouting::Am.index() as f64),
        Step::new("cutoff sweep down", 1500)
            .set(ParamId::LfoStart(osc), 0.0)
            .set(ParamId::FilterCutoff, 200.0),
        Step::new("envelope gated notes", 600)
            .set(ParamId::FilterCutoff, 2000.0)
            .set(ParamId::EnvelopeEnabled, 1.0)
            .set(ParamId::EnvelopeAttack, 5.0)
            .set(ParamId::EnvelopeRelease, 400.0)
            .note_on(57),
        Step::new("release", 800).note_off(57),
        Step::new("retrigger", 600).note_on(57),
        Step::new("release", 1000).note_off(57),
    ]
}

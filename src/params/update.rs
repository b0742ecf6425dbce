#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{ParamId, Slot};
use crate::dsp::{
    filter::FilterSelection,
    lfo::LfoRouting,
    wavetable::{TableMode, Waveform},
};

/// A control change decoded into its typed value.
///
/// Built from a [`ParamId`] and a plain value; switches become enums or
/// bools here, so nothing downstream compares floats against indices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamUpdate {
    OscRunning { slot: Slot, running: bool },
    OscVolume { slot: Slot, volume: f64 },
    OscFrequency { slot: Slot, hz: f64 },
    OscWaveform { slot: Slot, waveform: Waveform },
    OscMode { slot: Slot, mode: TableMode },
    LfoRunning { slot: Slot, running: bool },
    LfoFrequency { slot: Slot, hz: f64 },
    LfoRouting { slot: Slot, routing: LfoRouting },
    FilterGain(f64),
    FilterAlfa(f64),
    FilterCutoff(f64),
    EnvelopeEnabled(bool),
    EnvelopeAttack(f64),
    EnvelopeDecay(f64),
    EnvelopeSustain(f64),
    EnvelopeRelease(f64),
    EffectFilter(FilterSelection),
    FeedForwardA0(f64),
    FeedForwardA1(f64),
    FeedbackA0(f64),
    FeedbackB1(f64),
    EffectVolume(f64),
}

impl ParamUpdate {
    /// Clamp `value` into the control's range and decode it.
    pub fn from_plain(id: ParamId, value: f64) -> Self {
        let value = id.range().clamp(value);
        let on = value >= 0.5;
        let index = value as usize;

        match id {
            ParamId::OscStart(slot) => ParamUpdate::OscRunning { slot, running: on },
            ParamId::OscVolume(slot) => ParamUpdate::OscVolume { slot, volume: value },
            ParamId::OscFrequency(slot) => ParamUpdate::OscFrequency { slot, hz: value },
            ParamId::OscWaveform(slot) => ParamUpdate::OscWaveform {
                slot,
                waveform: Waveform::from_index(index),
            },
            ParamId::OscMode(slot) => ParamUpdate::OscMode {
                slot,
                mode: TableMode::from_index(index),
            },
            ParamId::LfoStart(slot) => ParamUpdate::LfoRunning { slot, running: on },
            ParamId::LfoFrequency(slot) => ParamUpdate::LfoFrequency { slot, hz: value },
            ParamId::LfoRouting(slot) => ParamUpdate::LfoRouting {
                slot,
                routing: LfoRouting::from_index(index),
            },
            ParamId::FilterGain => ParamUpdate::FilterGain(value),
            ParamId::FilterAlfa => ParamUpdate::FilterAlfa(value),
            ParamId::FilterCutoff => ParamUpdate::FilterCutoff(value),
            ParamId::EnvelopeEnabled => ParamUpdate::EnvelopeEnabled(on),
            ParamId::EnvelopeAttack => ParamUpdate::EnvelopeAttack(value),
            ParamId::EnvelopeDecay => ParamUpdate::EnvelopeDecay(value),
            ParamId::EnvelopeSustain => ParamUpdate::EnvelopeSustain(value),
            ParamId::EnvelopeRelease => ParamUpdate::EnvelopeRelease(value),
            ParamId::EffectFilter => {
                ParamUpdate::EffectFilter(FilterSelection::from_index(index))
            }
            ParamId::FeedForwardA0 => ParamUpdate::FeedForwardA0(value),
            ParamId::FeedForwardA1 => ParamUpdate::FeedForwardA1(value),
            ParamId::FeedbackA0 => ParamUpdate::FeedbackA0(value),
            ParamId::FeedbackB1 => ParamUpdate::FeedbackB1(value),
            ParamId::EffectVolume => ParamUpdate::EffectVolume(value),
        }
    }

    /// Map a normalized host value through the control's taper, then decode.
    pub fn from_normalized(id: ParamId, normalized: f64) -> Self {
        Self::from_plain(id, id.range().to_plain(normalized))
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OscillatorParams {
    pub running: bool,
    pub volume: f64,
    pub frequency_hz: f64,
    pub waveform: Waveform,
    pub mode: TableMode,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LfoParams {
    pub running: bool,
    pub frequency_hz: f64,
    pub routing: LfoRouting,
}

/// Gain filter and lowpass settings on the synth output.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ToneParams {
    pub gain: f64,
    pub alfa: f64,
    pub cutoff_hz: f64,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EnvelopeParams {
    pub enabled: bool,
    pub attack_ms: f64,
    pub decay_ms: f64,
    pub sustain: f64,
    pub release_ms: f64,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EffectParams {
    pub filter: FilterSelection,
    pub ff_a0: f64,
    pub ff_a1: f64,
    pub fb_a0: f64,
    pub fb_b1: f64,
    pub volume: f64,
}

/// Current plain value of every control.
///
/// `Params::default()` is the factory preset: every control at its
/// range default.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    pub oscillators: [OscillatorParams; 2],
    pub lfos: [LfoParams; 2],
    pub tone: ToneParams,
    pub envelope: EnvelopeParams,
    pub effect: EffectParams,
}

impl Default for Params {
    fn default() -> Self {
        let mut params = Self {
            oscillators: [OscillatorParams::default(); 2],
            lfos: [LfoParams::default(); 2],
            tone: ToneParams::default(),
            envelope: EnvelopeParams::default(),
            effect: EffectParams::default(),
        };
        for id in ParamId::ALL {
            params.apply(ParamUpdate::from_plain(id, id.range().default));
        }
        params
    }
}

impl Params {
    pub fn oscillator(&self, slot: Slot) -> &OscillatorParams {
        &self.oscillators[slot.index()]
    }

    pub fn lfo(&self, slot: Slot) -> &LfoParams {
        &self.lfos[slot.index()]
    }

    /// Store an update. Does not touch any DSP state.
    pub fn apply(&mut self, update: ParamUpdate) {
        match update {
            ParamUpdate::OscRunning { slot, running } => {
                self.oscillators[slot.index()].running = running
            }
            ParamUpdate::OscVolume { slot, volume } => {
                self.oscillators[slot.index()].volume = volume
            }
            ParamUpdate::OscFrequency { slot, hz } => {
                self.oscillators[slot.index()].frequency_hz = hz
            }
            ParamUpdate::OscWaveform { slot, waveform } => {
                self.oscillators[slot.index()].waveform = waveform
            }
            ParamUpdate::OscMode { slot, mode } => self.oscillators[slot.index()].mode = mode,
            ParamUpdate::LfoRunning { slot, running } => self.lfos[slot.index()].running = running,
            ParamUpdate::LfoFrequency { slot, hz } => self.lfos[slot.index()].frequency_hz = hz,
            ParamUpdate::LfoRouting { slot, routing } => {
                self.lfos[slot.index()].routing = routing
            }
            ParamUpdate::FilterGain(gain) => self.tone.gain = gain,
            ParamUpdate::FilterAlfa(alfa) => self.tone.alfa = alfa,
            ParamUpdate::FilterCutoff(hz) => self.tone.cutoff_hz = hz,
            ParamUpdate::EnvelopeEnabled(enabled) => self.envelope.enabled = enabled,
            ParamUpdate::EnvelopeAttack(ms) => self.envelope.attack_ms = ms,
            ParamUpdate::EnvelopeDecay(ms) => self.envelope.decay_ms = ms,
            ParamUpdate::EnvelopeSustain(level) => self.envelope.sustain = level,
            ParamUpdate::EnvelopeRelease(ms) => self.envelope.release_ms = ms,
            ParamUpdate::EffectFilter(selection) => self.effect.filter = selection,
            ParamUpdate::FeedForwardA0(a0) => self.effect.ff_a0 = a0,
            ParamUpdate::FeedForwardA1(a1) => self.effect.ff_a1 = a1,
            ParamUpdate::FeedbackA0(a0) => self.effect.fb_a0 = a0,
            ParamUpdate::FeedbackB1(b1) => self.effect.fb_b1 = b1,
            ParamUpdate::EffectVolume(volume) => self.effect.volume = volume,
        }
    }

    /// Plain value of a control; switches report their position index.
    pub fn value(&self, id: ParamId) -> f64 {
        let flag = |on: bool| if on { 1.0 } else { 0.0 };
        match id {
            ParamId::OscStart(slot) => flag(self.oscillator(slot).running),
            ParamId::OscVolume(slot) => self.oscillator(slot).volume,
            ParamId::OscFrequency(slot) => self.oscillator(slot).frequency_hz,
            ParamId::OscWaveform(slot) => self.oscillator(slot).waveform.index() as f64,
            ParamId::OscMode(slot) => self.oscillator(slot).mode.index() as f64,
            ParamId::LfoStart(slot) => flag(self.lfo(slot).running),
            ParamId::LfoFrequency(slot) => self.lfo(slot).frequency_hz,
            ParamId::LfoRouting(slot) => self.lfo(slot).routing.index() as f64,
            ParamId::FilterGain => self.tone.gain,
            ParamId::FilterAlfa => self.tone.alfa,
            ParamId::FilterCutoff => self.tone.cutoff_hz,
            ParamId::EnvelopeEnabled => flag(self.envelope.enabled),
            ParamId::EnvelopeAttack => self.envelope.attack_ms,
            ParamId::EnvelopeDecay => self.envelope.decay_ms,
            ParamId::EnvelopeSustain => self.envelope.sustain,
            ParamId::EnvelopeRelease => self.envelope.release_ms,
            ParamId::EffectFilter => self.effect.filter.index() as f64,
            ParamId::FeedForwardA0 => self.effect.ff_a0,
            ParamId::FeedForwardA1 => self.effect.ff_a1,
            ParamId::FeedbackA0 => self.effect.fb_a0,
            ParamId::FeedbackB1 => self.effect.fb_b1,
            ParamId::EffectVolume => self.effect.volume,
        }
    }

    /// Normalized value of a control, through its taper.
    pub fn normalized(&self, id: ParamId) -> f64 {
        id.range().to_normalized(self.value(id))
    }
}

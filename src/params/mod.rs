//! Control identifiers, their ranges, and the typed updates they produce.

mod taper;
mod update;

pub use taper::{ParamRange, Taper};
pub use update::{
    EffectParams, EnvelopeParams, LfoParams, OscillatorParams, ParamUpdate, Params, ToneParams,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::KernelError;

/// Which of the two oscillator/LFO pairs a control belongs to.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    One,
    Two,
}

impl Slot {
    pub const ALL: [Slot; 2] = [Slot::One, Slot::Two];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Every host-visible control.
///
/// Raw ids (see [`ParamId::raw`]) are stable and are what a host stores in
/// its automation lanes.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamId {
    OscStart(Slot),
    OscVolume(Slot),
    OscFrequency(Slot),
    OscWaveform(Slot),
    OscMode(Slot),
    LfoStart(Slot),
    LfoFrequency(Slot),
    LfoRouting(Slot),
    FilterGain,
    FilterAlfa,
    FilterCutoff,
    EnvelopeEnabled,
    EnvelopeAttack,
    EnvelopeDecay,
    EnvelopeSustain,
    EnvelopeRelease,
    EffectFilter,
    FeedForwardA0,
    FeedForwardA1,
    FeedbackA0,
    FeedbackB1,
    EffectVolume,
}

impl ParamId {
    pub const ALL: [ParamId; 30] = [
        ParamId::OscStart(Slot::One),
        ParamId::OscVolume(Slot::One),
        ParamId::OscFrequency(Slot::One),
        ParamId::OscWaveform(Slot::One),
        ParamId::OscMode(Slot::One),
        ParamId::LfoStart(Slot::One),
        ParamId::LfoFrequency(Slot::One),
        ParamId::LfoRouting(Slot::One),
        ParamId::OscStart(Slot::Two),
        ParamId::OscVolume(Slot::Two),
        ParamId::OscFrequency(Slot::Two),
        ParamId::OscWaveform(Slot::Two),
        ParamId::OscMode(Slot::Two),
        ParamId::LfoStart(Slot::Two),
        ParamId::LfoFrequency(Slot::Two),
        ParamId::LfoRouting(Slot::Two),
        ParamId::FilterGain,
        ParamId::FilterAlfa,
        ParamId::FilterCutoff,
        ParamId::EnvelopeEnabled,
        ParamId::EnvelopeAttack,
        ParamId::EnvelopeDecay,
        ParamId::EnvelopeSustain,
        ParamId::EnvelopeRelease,
        ParamId::EffectFilter,
        ParamId::FeedForwardA0,
        ParamId::FeedForwardA1,
        ParamId::FeedbackA0,
        ParamId::FeedbackB1,
        ParamId::EffectVolume,
    ];

    /// Stable numeric id. Oscillator pairs sit in blocks of ten
    /// (10.. for slot one, 20.. for slot two).
    pub fn raw(self) -> u32 {
        let slot_base = |slot: Slot| 10 * (slot.index() as u32 + 1);
        match self {
            ParamId::OscStart(s) => slot_base(s),
            ParamId::OscVolume(s) => slot_base(s) + 1,
            ParamId::OscFrequency(s) => slot_base(s) + 2,
            ParamId::OscWaveform(s) => slot_base(s) + 3,
            ParamId::OscMode(s) => slot_base(s) + 4,
            ParamId::LfoStart(s) => slot_base(s) + 7,
            ParamId::LfoFrequency(s) => slot_base(s) + 8,
            ParamId::LfoRouting(s) => slot_base(s) + 9,
            ParamId::FilterGain => 41,
            ParamId::FilterAlfa => 42,
            ParamId::FilterCutoff => 51,
            ParamId::EnvelopeEnabled => 60,
            ParamId::EnvelopeAttack => 61,
            ParamId::EnvelopeDecay => 62,
            ParamId::EnvelopeSustain => 63,
            ParamId::EnvelopeRelease => 64,
            ParamId::EffectFilter => 70,
            ParamId::FeedForwardA0 => 71,
            ParamId::FeedForwardA1 => 72,
            ParamId::FeedbackA0 => 73,
            ParamId::FeedbackB1 => 74,
            ParamId::EffectVolume => 75,
        }
    }

    pub fn from_raw(raw: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.raw() == raw)
    }

    /// Range, default and taper for this control.
    pub fn range(self) -> ParamRange {
        match self {
            ParamId::OscStart(_) => ParamRange::switch("Start Osc", 2),
            ParamId::OscVolume(_) => {
                ParamRange::new("Vol Osc", "", 0.0, 1.0, 0.707, Taper::AntiLog)
            }
            ParamId::OscFrequency(_) => {
                ParamRange::new("Freq Osc", "Hz", 25.0, 4200.0, 440.0, Taper::Linear)
            }
            ParamId::OscWaveform(_) => ParamRange::switch("Osc Type", 4),
            ParamId::OscMode(_) => ParamRange::switch("Osc Mode", 2),
            ParamId::LfoStart(_) => ParamRange::switch("Start LFO", 2),
            ParamId::LfoFrequency(_) => {
                ParamRange::new("Freq LFO", "Hz", 0.1, 20.0, 10.0, Taper::Linear)
            }
            ParamId::LfoRouting(_) => ParamRange::switch("LFO Control", 2),
            ParamId::FilterGain => ParamRange::new("Gain", "", 0.0, 1.0, 0.5, Taper::Linear),
            ParamId::FilterAlfa => ParamRange::new("Alfa", "", -1.0, 1.0, 1.0, Taper::Linear),
            ParamId::FilterCutoff => {
                ParamRange::new("Cutoff", "Hz", 25.0, 4200.0, 440.0, Taper::VoltOctave)
            }
            ParamId::EnvelopeEnabled => ParamRange::switch("Envelope", 2),
            ParamId::EnvelopeAttack => {
                ParamRange::new("Attack", "ms", 1.0, 5000.0, 10.0, Taper::Log)
            }
            ParamId::EnvelopeDecay => {
                ParamRange::new("Decay", "ms", 1.0, 5000.0, 100.0, Taper::Log)
            }
            ParamId::EnvelopeSustain => {
                ParamRange::new("Sustain", "", 0.0, 1.0, 0.7, Taper::Linear)
            }
            ParamId::EnvelopeRelease => {
                ParamRange::new("Release", "ms", 1.0, 10_000.0, 300.0, Taper::Log)
            }
            ParamId::EffectFilter => ParamRange::switch("Filter", 2),
            ParamId::FeedForwardA0 => {
                ParamRange::new("a0 FF", "", -1.0, 1.0, 1.0, Taper::Linear)
            }
            ParamId::FeedForwardA1 => {
                ParamRange::new("a1 FF", "", -1.0, 1.0, 0.0, Taper::Linear)
            }
            ParamId::FeedbackA0 => ParamRange::new("a0 FB", "", -1.0, 1.0, 1.0, Taper::Linear),
            // |b1| < 1 keeps the feedback pole inside the unit circle.
            ParamId::FeedbackB1 => {
                ParamRange::new("b1 FB", "", -0.99, 0.99, 0.0, Taper::Linear)
            }
            ParamId::EffectVolume => {
                ParamRange::new("Volume", "", 0.0, 1.0, 0.707, Taper::AntiLog)
            }
        }
    }
}

impl TryFrom<u32> for ParamId {
    type Error = KernelError;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        ParamId::from_raw(raw).ok_or(KernelError::UnknownParameter(raw))
    }
}

impl From<ParamId> for u32 {
    fn from(id: ParamId) -> Self {
        id.raw()
    }
}

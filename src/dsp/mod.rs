//! Low-level DSP primitives used by the kernel's frame processor.
//!
//! These components are allocation-free once constructed and realtime-safe,
//! so the kernel can own them directly and call into them per sample. They
//! stay focused on the signal-processing math; parameter bookkeeping and
//! channel routing live in [`crate::kernel`].

/// Exponential ADSR envelope generator with analog-style curves.
pub mod envelope;
/// First-order recursive filters: feed-forward, feedback, gain, lowpass.
pub mod filter;
/// Sub-audio oscillators and their AM/FM routing switch.
pub mod lfo;
/// AM/FM routing between an LFO and its audio oscillator.
pub mod modulate;
/// Phase accumulator, frequency cooking and interpolated table reads.
pub mod oscillator;
/// Static single-cycle tables, naive and bandlimited.
pub mod wavetable;

pub use envelope::{Envelope, EnvelopeShape, EnvelopeState};
pub use filter::{
    FeedForwardFilter, FeedbackFilter, FilterSelection, GainFilter, OnePoleLowpass, SampleFilter,
};
pub use lfo::{Lfo, LfoRouting};
pub use modulate::ModulatedOscillator;
pub use oscillator::Oscillator;
pub use wavetable::{TableMode, WaveTables, Waveform};

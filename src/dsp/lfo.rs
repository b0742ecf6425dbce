//! Low Frequency Oscillator (LFO) concepts.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::sync::Arc;

use crate::dsp::{
    oscillator::Oscillator,
    wavetable::{WaveTables, Waveform},
};

/*
Low Frequency Oscillators
=========================

An LFO is simply an oscillator running at sub-audio frequencies. The same
table-reading math applies, but the output drives another oscillator instead
of the speakers.

Vocabulary
----------

  control-rate    Frequencies below human hearing: ~0.1 Hz to ~20 Hz.
                  These oscillators modulate parameters over time.

  routing         What the LFO is wired to. Each LFO here is bound to one
                  audio oscillator and either scales its amplitude (AM) or
                  bends its frequency (FM).

  bipolar         Output swings positive AND negative: -1.0 to +1.0.
                  The LFOs here are always bipolar; AM therefore passes
                  through zero and flips polarity on the negative half.


Typical LFO Frequencies
-----------------------

    0.1 - 0.5 Hz    Slow sweeps
    0.5 - 2 Hz      Classic tremolo
    2 - 7 Hz        Vibrato sweet spot
    7 - 20 Hz       Fast tremolo, "helicopter" effect

The factory setting is 10 Hz.


Implementation Note
-------------------

Lfo wraps an Oscillator locked to the sine table. A stopped LFO outputs 0.0
and holds its phase, exactly like a stopped audio oscillator.
*/

/// What an LFO modulates on its bound oscillator.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LfoRouting {
    /// Multiply the oscillator output by the LFO sample.
    #[default]
    Am,
    /// Offset the oscillator frequency by the LFO sample times the FM depth.
    Fm,
}

impl LfoRouting {
    pub fn from_index(index: usize) -> Self {
        if index == 0 {
            LfoRouting::Am
        } else {
            LfoRouting::Fm
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone)]
pub struct Lfo {
    osc: Oscillator,
    routing: LfoRouting,
}

impl Lfo {
    pub fn new(tables: Arc<WaveTables>) -> Self {
        Self {
            osc: Oscillator::new(tables).with_waveform(Waveform::Sine),
            routing: LfoRouting::Am,
        }
    }

    pub fn set_frequency(&mut self, frequency_hz: f64, sample_rate: f64) {
        self.osc.set_frequency(frequency_hz, sample_rate);
    }

    pub fn recook(&mut self, sample_rate: f64) {
        self.osc.recook(sample_rate);
    }

    pub fn frequency(&self) -> f64 {
        self.osc.frequency()
    }

    pub fn set_running(&mut self, running: bool) {
        self.osc.set_running(running);
    }

    pub fn is_running(&self) -> bool {
        self.osc.is_running()
    }

    pub fn set_routing(&mut self, routing: LfoRouting) {
        self.routing = routing;
    }

    pub fn routing(&self) -> LfoRouting {
        self.routing
    }

    /// True when running and routed to `routing`.
    #[inline]
    pub fn drives(&self, routing: LfoRouting) -> bool {
        self.is_running() && self.routing == routing
    }

    #[inline]
    pub fn next_sample(&mut self) -> f64 {
        self.osc.next_sample()
    }

    pub fn reset(&mut self) {
        self.osc.reset();
    }
}

/// Calculate samples per LFO period.
///
/// # Example
/// ```
/// use synth_kernel::dsp::lfo::samples_per_period;
/// let samples = samples_per_period(5.0, 48000.0);
/// assert_eq!(samples, 9600.0); // 5 Hz at 48kHz = 9600 samples
/// ```
#[inline]
pub fn samples_per_period(frequency_hz: f64, sample_rate: f64) -> f64 {
    sample_rate / frequency_hz
}

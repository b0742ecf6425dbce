//! AM/FM routing between an LFO and its audio oscillator.

use crate::dsp::{
    lfo::{Lfo, LfoRouting},
    oscillator::{cook_frequency, Oscillator},
};

/*
Modulation Routing
==================

Each audio oscillator is paired with one LFO. The LFO can be stopped, or
running and routed to either AM or FM.

Vocabulary
----------

  modulator     The LFO output, a bipolar value in [-1.0, +1.0].

  depth         How far FM bends the pitch, in Hz, at full LFO swing.
                A fixed engine constant (20 Hz by default), not a control.

  recook        Re-running the frequency → increment conversion.


FM: Per-Sample Recook
---------------------

    f[n]   = base_frequency + depth · lfo[n]
    inc[n] = L · f[n] / fs

The increment is recomputed every sample, BEFORE the oscillator renders that
sample. Nothing is cached between samples: when FM is switched off the
oscillator immediately falls back to the increment cooked from its frequency
control.

Example: base 440 Hz, depth 20 Hz
    lfo = -1.0  →  420 Hz
    lfo =  0.0  →  440 Hz
    lfo = +1.0  →  460 Hz


AM: Straight Multiplication
---------------------------

    out[n] = osc[n] · lfo[n]

No bias is added, so the output passes through zero twice per LFO cycle and
is polarity-inverted while the LFO is negative. This is closer to ring
modulation than to classic tremolo.


Order of Operations Per Sample
------------------------------

    1. LFO renders its sample (and advances)
    2. if FM: recook the oscillator increment
    3. oscillator renders its sample (and advances)
    4. if AM: multiply by the LFO sample

The LFO advances even when its oscillator is stopped, so starting the
oscillator later picks up the LFO mid-cycle.


Final Mix
---------

    mix = (vol1 / 2) · out1 + (vol2 / 2) · out2

Halving each volume keeps two full-scale oscillators inside [-1, 1].
*/

/// Instantaneous FM frequency: base + modulator × depth.
#[inline]
pub fn apply_modulation(base_value: f64, modulator: f64, depth: f64) -> f64 {
    base_value + (modulator * depth)
}

/// Two-oscillator mix, each scaled by half its volume.
#[inline]
pub fn mix_pair(sample_1: f64, volume_1: f64, sample_2: f64, volume_2: f64) -> f64 {
    (volume_1 / 2.0) * sample_1 + (volume_2 / 2.0) * sample_2
}

/// An audio oscillator and the LFO bound to it.
#[derive(Debug, Clone)]
pub struct ModulatedOscillator {
    pub osc: Oscillator,
    pub lfo: Lfo,
}

impl ModulatedOscillator {
    pub fn new(osc: Oscillator, lfo: Lfo) -> Self {
        Self { osc, lfo }
    }

    /// Render one sample, applying whichever routing the LFO has.
    #[inline]
    pub fn next_sample(&mut self, sample_rate: f64, fm_depth_hz: f64) -> f64 {
        let modulator = self.lfo.next_sample();

        let sample = if self.lfo.drives(LfoRouting::Fm) {
            let frequency = apply_modulation(self.osc.frequency(), modulator, fm_depth_hz);
            let increment = cook_frequency(frequency, sample_rate);
            self.osc.next_sample_with_increment(increment)
        } else {
            self.osc.next_sample()
        };

        if self.lfo.drives(LfoRouting::Am) {
            sample * modulator
        } else {
            sample
        }
    }

    pub fn recook(&mut self, sample_rate: f64) {
        self.osc.recook(sample_rate);
        self.lfo.recook(sample_rate);
    }

    pub fn reset(&mut self) {
        self.osc.reset();
        self.lfo.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::wavetable::WaveTables;
    use std::sync::Arc;

    const SAMPLE_RATE: f64 = 48_000.0;

    fn pair(osc_freq: f64, lfo_freq: f64) -> ModulatedOscillator {
        let tables = Arc::new(WaveTables::generate());
        let mut osc = Oscillator::new(tables.clone());
        osc.set_frequency(osc_freq, SAMPLE_RATE);
        osc.set_running(true);
        let mut lfo = Lfo::new(tables);
        lfo.set_frequency(lfo_freq, SAMPLE_RATE);
        ModulatedOscillator::new(osc, lfo)
    }

    #[test]
    fn test_apply_modulation() {
        assert_eq!(apply_modulation(440.0, 0.0, 20.0), 440.0);
        assert_eq!(apply_modulation(440.0, 1.0, 20.0), 460.0);
        assert_eq!(apply_modulation(440.0, -1.0, 20.0), 420.0);
        assert_eq!(apply_modulation(440.0, 0.5, 20.0), 450.0);
    }

    #[test]
    fn test_mix_pair_halves_volumes() {
        assert_eq!(mix_pair(1.0, 1.0, 1.0, 1.0), 1.0);
        assert_eq!(mix_pair(1.0, 0.5, 0.0, 1.0), 0.25);
        assert_eq!(mix_pair(-1.0, 1.0, 1.0, 1.0), 0.0);
    }

    #[test]
    fn test_stopped_lfo_passes_oscillator_through() {
        let mut routed = pair(440.0, 10.0);
        let mut plain = routed.osc.clone();

        for _ in 0..256 {
            assert_eq!(routed.next_sample(SAMPLE_RATE, 20.0), plain.next_sample());
        }
    }

    #[test]
    fn test_am_multiplies_without_bias() {
        let mut routed = pair(440.0, 10.0);
        routed.lfo.set_routing(LfoRouting::Am);
        routed.lfo.set_running(true);

        let mut osc = routed.osc.clone();
        let mut lfo = routed.lfo.clone();

        let mut saw_inversion = false;
        for _ in 0..4_800 {
            let modulator = lfo.next_sample();
            let carrier = osc.next_sample();
            let expected = carrier * modulator;
            let actual = routed.next_sample(SAMPLE_RATE, 20.0);
            assert!((actual - expected).abs() < 1e-12);

            if modulator < -0.5 && carrier > 0.5 {
                assert!(actual < 0.0);
                saw_inversion = true;
            }
        }
        assert!(saw_inversion, "AM should invert polarity on negative LFO");
    }

    #[test]
    fn test_fm_recooks_every_sample() {
        let depth = 20.0;
        let mut routed = pair(440.0, 10.0);
        routed.lfo.set_routing(LfoRouting::Fm);
        routed.lfo.set_running(true);

        let mut lfo = routed.lfo.clone();
        let mut expected_position = routed.osc.position();
        for _ in 0..1_000 {
            let modulator = lfo.next_sample();
            let increment = cook_frequency(440.0 + depth * modulator, SAMPLE_RATE);
            routed.next_sample(SAMPLE_RATE, depth);
            expected_position = (expected_position + increment).rem_euclid(1024.0);
            assert!((routed.osc.position() - expected_position).abs() < 1e-6);
        }

        // Base increment is never overwritten by modulation.
        assert_eq!(routed.osc.increment(), cook_frequency(440.0, SAMPLE_RATE));
    }

    #[test]
    fn test_fm_off_restores_base_increment() {
        let mut routed = pair(440.0, 10.0);
        routed.lfo.set_routing(LfoRouting::Fm);
        routed.lfo.set_running(true);
        for _ in 0..100 {
            routed.next_sample(SAMPLE_RATE, 20.0);
        }

        routed.lfo.set_running(false);
        let before = routed.osc.position();
        routed.next_sample(SAMPLE_RATE, 20.0);
        let step = (routed.osc.position() - before).rem_euclid(1024.0);
        assert!((step - routed.osc.increment()).abs() < 1e-9);
    }
}

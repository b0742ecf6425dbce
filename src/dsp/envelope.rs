#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
ADSR Envelope Implementation
============================

This module implements an exponential ADSR envelope generator: the gain
curve applied to a note from key-down to silence.

Vocabulary
----------

  level       The envelope's current output value (0.0 to 1.0).

  stage       Which phase of the envelope we're in: Off, Attack, Decay,
              Sustain, or Release. A state machine governs transitions.

  gate        The note on/off signal. note_on opens it, note_off closes it.

  TCO         Threshold crossover. An exponential curve never actually
              reaches its target, so each stage aims PAST its target by a
              fraction TCO and advances the moment it crosses the real one.
              Small TCO = aim just past the target = long, curved tail.
              Large TCO = aim far past = nearly linear segment.


The Shape: Exponential Segments
-------------------------------

  Level
    1.0 ┐    .─.
        │   /   `.___________
    S   │  /                 `.
        │ /                    `.
    0.0 └/───────────────────────`──→ Time
        Attack Decay  Sustain  Release

Analog envelopes charge and discharge a capacitor, so every segment is an
exponential approach. We reproduce that with a one-pole recursion:

    y[n] = offset + coeff · y[n-1]

which converges geometrically towards offset / (1 - coeff).


The Math: Time to Coefficient
-----------------------------

For a stage lasting `time_ms` at `fs`:

    samples = time_ms · fs / 1000
    coeff   = exp(-ln((1 + TCO) / TCO) / samples)

This is chosen so that, starting from the stage's start level, the curve
crosses the stage target after exactly `samples` steps.

Offsets per stage (the value the curve aims at is offset / (1 - coeff)):

    attack    offset = (1 + TCO_a) · (1 - coeff)        aims at 1 + TCO_a
    decay     offset = (S - TCO_d) · (1 - coeff)        aims at S - TCO_d
    release   offset = -TCO_d · (1 - coeff)             aims at -TCO_d

Coefficients only change when a time/level control or the sample rate
changes, never inside `next_sample`.


The State Machine
-----------------

    Off ──note_on──→ Attack ──level ≥ 1──→ Decay ──level ≤ S──→ Sustain
     ↑                 │                     │                    │
     │                 └──────note_off───────┴───────note_off─────┤
     │                                                            ↓
     └───────────────────────level ≤ 0──────────────────────── Release

note_off from Attack, Decay, or Sustain jumps straight to Release and the
release curve starts from the CURRENT level. A note_off during Attack never
visits Decay or Sustain. note_on during Release re-enters Attack from the
current level, so retriggering does not click.
*/

/// The current stage of the envelope state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeState {
    Off,
    Attack,
    Decay,
    Sustain,
    Release,
}

/// Threshold-crossover constants shared by every envelope in the kernel.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeShape {
    pub attack_tco: f64,
    pub decay_tco: f64,
}

impl Default for EnvelopeShape {
    /// Analog-style curves: fast-rising attack, long-tailed decay.
    fn default() -> Self {
        Self {
            attack_tco: (-1.5f64).exp(),
            decay_tco: (-4.95f64).exp(),
        }
    }
}

/// Shortest stage the envelope will compute, in milliseconds.
const MIN_STAGE_MS: f64 = 0.001;

/// Per-sample coefficient for an exponential stage.
pub fn stage_coefficient(time_ms: f64, sample_rate: f64, tco: f64) -> f64 {
    let samples = (time_ms.max(MIN_STAGE_MS) * sample_rate / 1000.0).max(1.0);
    (-((1.0 + tco) / tco).ln() / samples).exp()
}

#[derive(Debug, Clone)]
pub struct Envelope {
    // User-facing controls
    attack_ms: f64,
    decay_ms: f64,
    sustain_level: f64,
    release_ms: f64,

    shape: EnvelopeShape,
    sample_rate: f64,

    // Cooked coefficients
    attack_coeff: f64,
    attack_offset: f64,
    decay_coeff: f64,
    decay_offset: f64,
    release_coeff: f64,
    release_offset: f64,

    // Runtime state
    stage: EnvelopeState,
    level: f64,
    gate: bool,
}

impl Envelope {
    pub fn new(sample_rate: f64) -> Self {
        Self::adsr(sample_rate, 10.0, 100.0, 0.7, 300.0)
    }

    pub fn adsr(
        sample_rate: f64,
        attack_ms: f64,
        decay_ms: f64,
        sustain_level: f64,
        release_ms: f64,
    ) -> Self {
        let mut env = Self {
            attack_ms,
            decay_ms,
            sustain_level: sustain_level.clamp(0.0, 1.0),
            release_ms,
            shape: EnvelopeShape::default(),
            sample_rate,
            attack_coeff: 0.0,
            attack_offset: 0.0,
            decay_coeff: 0.0,
            decay_offset: 0.0,
            release_coeff: 0.0,
            release_offset: 0.0,
            stage: EnvelopeState::Off,
            level: 0.0,
            gate: false,
        };
        env.recalculate();
        env
    }

    pub fn with_shape(mut self, shape: EnvelopeShape) -> Self {
        self.shape = shape;
        self.recalculate();
        self
    }

    fn recalculate(&mut self) {
        self.calculate_attack();
        self.calculate_decay();
        self.calculate_release();
    }

    fn calculate_attack(&mut self) {
        let tco = self.shape.attack_tco;
        self.attack_coeff = stage_coefficient(self.attack_ms, self.sample_rate, tco);
        self.attack_offset = (1.0 + tco) * (1.0 - self.attack_coeff);
    }

    fn calculate_decay(&mut self) {
        let tco = self.shape.decay_tco;
        self.decay_coeff = stage_coefficient(self.decay_ms, self.sample_rate, tco);
        self.decay_offset = (self.sustain_level - tco) * (1.0 - self.decay_coeff);
    }

    fn calculate_release(&mut self) {
        let tco = self.shape.decay_tco;
        self.release_coeff = stage_coefficient(self.release_ms, self.sample_rate, tco);
        self.release_offset = -tco * (1.0 - self.release_coeff);
    }

    pub fn set_attack_ms(&mut self, attack_ms: f64) {
        self.attack_ms = attack_ms;
        self.calculate_attack();
    }

    pub fn set_decay_ms(&mut self, decay_ms: f64) {
        self.decay_ms = decay_ms;
        self.calculate_decay();
    }

    /// Sustain feeds the decay target, so this recooks the decay stage.
    pub fn set_sustain_level(&mut self, sustain_level: f64) {
        self.sustain_level = sustain_level.clamp(0.0, 1.0);
        self.calculate_decay();
    }

    pub fn set_release_ms(&mut self, release_ms: f64) {
        self.release_ms = release_ms;
        self.calculate_release();
    }

    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
        self.recalculate();
    }

    /// Gate high: enter attack from the current level.
    ///
    /// Ignored while the gate is already held.
    pub fn note_on(&mut self) {
        if matches!(self.stage, EnvelopeState::Off | EnvelopeState::Release) {
            self.stage = EnvelopeState::Attack;
        }
        self.gate = true;
    }

    /// Gate low: release from whatever level we are at.
    pub fn note_off(&mut self) {
        self.gate = false;
        if matches!(
            self.stage,
            EnvelopeState::Attack | EnvelopeState::Decay | EnvelopeState::Sustain
        ) {
            self.stage = EnvelopeState::Release;
        }
    }

    /// Advance the envelope by one sample and return the new level.
    #[inline]
    pub fn next_sample(&mut self) -> f64 {
        match self.stage {
            EnvelopeState::Off => {
                self.level = 0.0;
            }

            EnvelopeState::Attack => {
                self.level = self.attack_offset + self.attack_coeff * self.level;
                if self.level >= 1.0 {
                    self.level = 1.0;
                    self.stage = EnvelopeState::Decay;
                }
            }

            EnvelopeState::Decay => {
                self.level = self.decay_offset + self.decay_coeff * self.level;
                if self.level <= self.sustain_level {
                    self.level = self.sustain_level;
                    self.stage = EnvelopeState::Sustain;
                }
            }

            EnvelopeState::Sustain => {
                self.level = self.sustain_level;
            }

            EnvelopeState::Release => {
                self.level = self.release_offset + self.release_coeff * self.level;
                if self.level <= 0.0 {
                    self.level = 0.0;
                    self.stage = EnvelopeState::Off;
                }
            }
        }

        debug_assert!((0.0..=1.0).contains(&self.level));
        self.level
    }

    pub fn render(&mut self, buffer: &mut [f64]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample();
        }
    }

    /// True while the envelope is producing output.
    pub fn is_active(&self) -> bool {
        !matches!(self.stage, EnvelopeState::Off)
    }

    /// True between note_on and note_off.
    pub fn gate(&self) -> bool {
        self.gate
    }

    pub fn reset(&mut self) {
        self.stage = EnvelopeState::Off;
        self.level = 0.0;
        self.gate = false;
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    pub fn state(&self) -> EnvelopeState {
        self.stage
    }

    pub fn sustain_level(&self) -> f64 {
        self.sustain_level
    }
}

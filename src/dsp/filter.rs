use std::f64::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
First-Order Filters
===================

Every filter here remembers exactly one sample (its "z1" register) and is
described by a one-line difference equation.

| filter         | equation                                   | memory          |
| -------------- | ------------------------------------------ | --------------- |
| feed-forward   | y = a0·x + a1·x[n-1]                       | previous input  |
| feedback       | y = a0·x − b1·y[n-1]                       | previous output |
| gain control   | y = a0·x + alfa·x[n-1]                     | previous input  |
| lowpass (BLT)  | y = b0·x + b1·x[n-1] − a1·y[n-1]           | both            |

Vocabulary
----------

  feed-forward   Output mixes the current and the previous INPUT.
                 Always stable. a1 > 0 dulls the top end, a1 < 0 thins
                 the bottom end.

  feedback       Output mixes the current input and the previous OUTPUT.
                 Stable only while |b1| < 1. b1 < 0 is a lowpass, b1 > 0
                 a highpass.

  bilinear       A way of turning an analog RC lowpass into a digital one
  transform      that keeps the cutoff exactly where you asked for it.


Bilinear Lowpass Coefficients
-----------------------------

    K  = tan(π · fc / fs)
    b0 = b1 = K / (K + 1)
    a1 = (K - 1) / (K + 1)

Limits worth knowing:

    fc → 0        K → 0    b0 → 0,  a1 → -1   output freezes (DC only)
    fc → fs/2     K → ∞    b0 → 1,  a1 → +1   output ≈ input

tan() diverges AT Nyquist. The cutoff control is clamped below Nyquist at
the parameter boundary; the math here does not guard it.


Gain-Control Stage
------------------

A feed-forward stage where a0 is the user's gain and alfa weights the
delayed input. alfa = 1 is the instrument's factory value; with it the stage
is a direct gain plus a unity copy of the previous sample. alfa = 0 turns it
into a plain gain.


When Coefficients Change
------------------------

Only when the owning control changes (or the sample rate does). The
per-sample methods never touch the coefficients.
*/

/// Common interface for the one-sample-memory filters.
pub trait SampleFilter {
    fn process(&mut self, x: f64) -> f64;

    /// Clear the delay memory, keeping the coefficients.
    fn reset(&mut self);

    fn render(&mut self, buffer: &mut [f64]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }
}

/// Which first-order filter the effect path runs.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterSelection {
    #[default]
    FeedForward,
    Feedback,
}

impl FilterSelection {
    pub fn from_index(index: usize) -> Self {
        if index == 0 {
            FilterSelection::FeedForward
        } else {
            FilterSelection::Feedback
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeedForwardFilter {
    pub a0: f64,
    pub a1: f64,
    z1: f64,
}

impl FeedForwardFilter {
    pub fn new(a0: f64, a1: f64) -> Self {
        Self { a0, a1, z1: 0.0 }
    }

    pub fn set_coefficients(&mut self, a0: f64, a1: f64) {
        self.a0 = a0;
        self.a1 = a1;
    }
}

impl Default for FeedForwardFilter {
    fn default() -> Self {
        Self::new(1.0, 0.0)
    }
}

impl SampleFilter for FeedForwardFilter {
    #[inline]
    fn process(&mut self, x: f64) -> f64 {
        let y = self.a0 * x + self.a1 * self.z1;
        self.z1 = x;
        y
    }

    fn reset(&mut self) {
        self.z1 = 0.0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeedbackFilter {
    pub a0: f64,
    pub b1: f64,
    z1: f64,
}

impl FeedbackFilter {
    pub fn new(a0: f64, b1: f64) -> Self {
        Self { a0, b1, z1: 0.0 }
    }

    pub fn set_coefficients(&mut self, a0: f64, b1: f64) {
        self.a0 = a0;
        self.b1 = b1;
    }
}

impl Default for FeedbackFilter {
    fn default() -> Self {
        Self::new(1.0, 0.0)
    }
}

impl SampleFilter for FeedbackFilter {
    #[inline]
    fn process(&mut self, x: f64) -> f64 {
        let y = self.a0 * x - self.b1 * self.z1;
        self.z1 = y;
        y
    }

    fn reset(&mut self) {
        self.z1 = 0.0;
    }
}

/// Gain stage with a weighted copy of the previous input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainFilter {
    gain: f64,
    alfa: f64,
    z1: f64,
}

impl GainFilter {
    pub fn new(gain: f64, alfa: f64) -> Self {
        Self {
            gain,
            alfa,
            z1: 0.0,
        }
    }

    pub fn set_gain(&mut self, gain: f64) {
        self.gain = gain;
    }

    pub fn set_alfa(&mut self, alfa: f64) {
        self.alfa = alfa;
    }

    pub fn gain(&self) -> f64 {
        self.gain
    }

    pub fn alfa(&self) -> f64 {
        self.alfa
    }
}

impl SampleFilter for GainFilter {
    #[inline]
    fn process(&mut self, x: f64) -> f64 {
        let y = self.gain * x + self.alfa * self.z1;
        self.z1 = x;
        y
    }

    fn reset(&mut self) {
        self.z1 = 0.0;
    }
}

/// Coefficients of the bilinear one-pole lowpass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LowpassCoefficients {
    pub b0: f64,
    pub b1: f64,
    pub a1: f64,
}

impl LowpassCoefficients {
    pub fn from_cutoff(cutoff_hz: f64, sample_rate: f64) -> Self {
        let k = (PI * cutoff_hz / sample_rate).tan();
        let b0 = k / (k + 1.0);
        Self {
            b0,
            b1: b0,
            a1: (k - 1.0) / (k + 1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OnePoleLowpass {
    cutoff_hz: f64,
    coefficients: LowpassCoefficients,
    x1: f64,
    y1: f64,
}

impl OnePoleLowpass {
    pub fn new(cutoff_hz: f64, sample_rate: f64) -> Self {
        Self {
            cutoff_hz,
            coefficients: LowpassCoefficients::from_cutoff(cutoff_hz, sample_rate),
            x1: 0.0,
            y1: 0.0,
        }
    }

    pub fn set_cutoff(&mut self, cutoff_hz: f64, sample_rate: f64) {
        self.cutoff_hz = cutoff_hz;
        self.coefficients = LowpassCoefficients::from_cutoff(cutoff_hz, sample_rate);
    }

    /// Recompute coefficients for a new sample rate, keeping the cutoff.
    pub fn recook(&mut self, sample_rate: f64) {
        self.coefficients = LowpassCoefficients::from_cutoff(self.cutoff_hz, sample_rate);
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff_hz
    }

    pub fn coefficients(&self) -> LowpassCoefficients {
        self.coefficients
    }
}

impl SampleFilter for OnePoleLowpass {
    #[inline]
    fn process(&mut self, x: f64) -> f64 {
        let LowpassCoefficients { b0, b1, a1 } = self.coefficients;
        let y = b0 * x + b1 * self.x1 - a1 * self.y1;
        self.x1 = x;
        self.y1 = y;
        y
    }

    fn reset(&mut self) {
        self.x1 = 0.0;
        self.y1 = 0.0;
    }
}

//! Static single-cycle lookup tables for the oscillators and LFOs.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::f64::consts::TAU;

use crate::TABLE_LENGTH;

/*
Wavetables
==========

Every oscillator in the kernel reads from one of seven precomputed tables.
Each table holds exactly one cycle of a periodic waveform, sampled at
TABLE_LENGTH (1024) points. Playing the table back faster or slower changes
the pitch; see `dsp/oscillator.rs` for the phase accumulator.

Naive Shapes
------------

The naive saw, triangle and square are built from straight line segments
(slope and intercept per segment) instead of trig, so the discontinuities
land on exact table indices:

    saw       0 ──╱ ... ╱│            rises 0 → 1 over [0, 512)
                         │╱ ... ╱ 0   rises -1 → 0 over [512, 1024)

    triangle  0 ╱╲                    rises 0 → 1 over [0, 256)
                  ╲                   falls 1 → -1 over [256, 768)
                   ╲╱ 0               rises -1 → 0 over [768, 1024)

    square    +1 for the first half, -1 for the second half. Index 1 is
              pinned to 0.0 to match the edge placement the instrument has
              always shipped with.

These contain every harmonic up to Nyquist and alias audibly at high pitch.

Bandlimited Shapes
------------------

The bandlimited variants are built by additive synthesis, summing a handful
of sine harmonics with Fourier-series weights:

    saw       g = 1..6          (-1)^(g+1) / g       · sin(g·θ)
    triangle  g = 0..3          (-1)^g / (2g+1)²     · sin((2g+1)·θ)
    square    g = 1, 3, 5       1 / g                · sin(g·θ)

A truncated series overshoots or undershoots 1.0 depending on how many
terms are kept, so the peak is only known once the whole table exists.
Generation therefore runs in two passes:

    pass 1: synthesize every sample, tracking the running maximum
    pass 2: divide every sample by that maximum

After pass 2 the bandlimited tables peak at exactly 1.0.
*/

/// Shape selector for oscillators.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Waveform {
    #[default]
    Sine,
    Saw,
    Triangle,
    Square,
}

impl Waveform {
    pub const ALL: [Waveform; 4] = [
        Waveform::Sine,
        Waveform::Saw,
        Waveform::Triangle,
        Waveform::Square,
    ];

    /// Map a discrete switch position (0..=3) onto a waveform.
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => Waveform::Sine,
            1 => Waveform::Saw,
            2 => Waveform::Triangle,
            _ => Waveform::Square,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Which family of tables an oscillator reads from.
///
/// Sine has no bandlimited variant; it reads the same table in both modes.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableMode {
    #[default]
    Normal,
    Bandlimited,
}

impl TableMode {
    pub fn from_index(index: usize) -> Self {
        if index == 0 {
            TableMode::Normal
        } else {
            TableMode::Bandlimited
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// One cycle of a waveform, `TABLE_LENGTH` samples long.
#[derive(Clone)]
pub struct WaveTable {
    samples: Box<[f64; TABLE_LENGTH]>,
}

impl WaveTable {
    fn zeroed() -> Self {
        Self {
            samples: Box::new([0.0; TABLE_LENGTH]),
        }
    }

    /// Build a table by evaluating `f` at every index.
    pub fn from_fn(mut f: impl FnMut(usize) -> f64) -> Self {
        let mut table = Self::zeroed();
        for (i, sample) in table.samples.iter_mut().enumerate() {
            *sample = f(i);
        }
        table
    }

    /// Raw sample at `index`. Panics if `index >= TABLE_LENGTH`.
    #[inline]
    pub fn get(&self, index: usize) -> f64 {
        self.samples[index]
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples[..]
    }

    pub fn len(&self) -> usize {
        TABLE_LENGTH
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Largest absolute sample value.
    pub fn peak(&self) -> f64 {
        self.samples.iter().fold(0.0f64, |acc, &x| acc.max(x.abs()))
    }
}

impl std::fmt::Debug for WaveTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaveTable")
            .field("len", &TABLE_LENGTH)
            .field("peak", &self.peak())
            .finish()
    }
}

/// The full set of tables shared by every oscillator in the kernel.
#[derive(Debug, Clone)]
pub struct WaveTables {
    sine: WaveTable,
    saw: WaveTable,
    triangle: WaveTable,
    square: WaveTable,
    saw_bandlimited: WaveTable,
    triangle_bandlimited: WaveTable,
    square_bandlimited: WaveTable,
}

// Segment slopes/intercepts for the naive shapes.
const SAW_RISE_SLOPE: f64 = 1.0 / 512.0;
const SAW_SECOND_INTERCEPT: f64 = -1.0;
const TRI_RISE_SLOPE: f64 = 1.0 / 256.0;
const TRI_FALL_SLOPE: f64 = -2.0 / 512.0;

const SAW_HARMONICS: usize = 6;
const TRIANGLE_TERMS: usize = 4;
const SQUARE_HARMONICS: [usize; 3] = [1, 3, 5];

impl WaveTables {
    /// Synthesize all seven tables. Runs once, before any audio is rendered.
    pub fn generate() -> Self {
        let len = TABLE_LENGTH as f64;

        let sine = WaveTable::from_fn(|i| (TAU * i as f64 / len).sin());
        let saw = WaveTable::from_fn(naive_saw);
        let triangle = WaveTable::from_fn(naive_triangle);
        let square = WaveTable::from_fn(naive_square);

        let mut saw_bandlimited = WaveTable::zeroed();
        let mut triangle_bandlimited = WaveTable::zeroed();
        let mut square_bandlimited = WaveTable::zeroed();

        // Pass 1: additive synthesis, tracking each table's running maximum.
        let mut max_saw = f64::MIN;
        let mut max_triangle = f64::MIN;
        let mut max_square = f64::MIN;

        for i in 0..TABLE_LENGTH {
            let theta = TAU * i as f64 / len;

            let saw_sample: f64 = (1..=SAW_HARMONICS)
                .map(|g| {
                    let n = g as f64;
                    let sign = if g % 2 == 1 { 1.0 } else { -1.0 };
                    sign / n * (n * theta).sin()
                })
                .sum();

            let triangle_sample: f64 = (0..TRIANGLE_TERMS)
                .map(|g| {
                    let harmonic = (2 * g + 1) as f64;
                    let sign = if g % 2 == 0 { 1.0 } else { -1.0 };
                    sign / (harmonic * harmonic) * (harmonic * theta).sin()
                })
                .sum();

            let square_sample: f64 = SQUARE_HARMONICS
                .iter()
                .map(|&g| {
                    let n = g as f64;
                    (n * theta).sin() / n
                })
                .sum();

            saw_bandlimited.samples[i] = saw_sample;
            triangle_bandlimited.samples[i] = triangle_sample;
            square_bandlimited.samples[i] = square_sample;

            max_saw = max_saw.max(saw_sample);
            max_triangle = max_triangle.max(triangle_sample);
            max_square = max_square.max(square_sample);
        }

        // Pass 2: normalize to unit peak.
        normalize(&mut saw_bandlimited, max_saw);
        normalize(&mut triangle_bandlimited, max_triangle);
        normalize(&mut square_bandlimited, max_square);

        Self {
            sine,
            saw,
            triangle,
            square,
            saw_bandlimited,
            triangle_bandlimited,
            square_bandlimited,
        }
    }

    /// Table for a waveform/mode pair.
    pub fn table(&self, waveform: Waveform, mode: TableMode) -> &WaveTable {
        match (waveform, mode) {
            (Waveform::Sine, _) => &self.sine,
            (Waveform::Saw, TableMode::Normal) => &self.saw,
            (Waveform::Saw, TableMode::Bandlimited) => &self.saw_bandlimited,
            (Waveform::Triangle, TableMode::Normal) => &self.triangle,
            (Waveform::Triangle, TableMode::Bandlimited) => &self.triangle_bandlimited,
            (Waveform::Square, TableMode::Normal) => &self.square,
            (Waveform::Square, TableMode::Bandlimited) => &self.square_bandlimited,
        }
    }

    pub fn sine(&self) -> &WaveTable {
        &self.sine
    }
}

fn normalize(table: &mut WaveTable, max: f64) {
    for sample in table.samples.iter_mut() {
        *sample /= max;
    }
}

fn naive_saw(i: usize) -> f64 {
    let x = i as f64;
    if i < 512 {
        SAW_RISE_SLOPE * x
    } else {
        SAW_RISE_SLOPE * (x - 511.0) + SAW_SECOND_INTERCEPT
    }
}

fn naive_triangle(i: usize) -> f64 {
    let x = i as f64;
    if i < 256 {
        TRI_RISE_SLOPE * x
    } else if i < 768 {
        TRI_FALL_SLOPE * (x - 256.0) + 1.0
    } else {
        TRI_RISE_SLOPE * (x - 768.0) - 1.0
    }
}

fn naive_square(i: usize) -> f64 {
    if i == 1 {
        0.0
    } else if i < 512 {
        1.0
    } else {
        -1.0
    }
}

//! Table-lookup oscillator: frequency cooking, phase accumulation and
//! linear-interpolated table reads.

use std::sync::Arc;

use crate::{
    dsp::wavetable::{TableMode, WaveTable, WaveTables, Waveform},
    TABLE_LENGTH,
};

/*
Wavetable Oscillator
====================

Vocabulary
----------

  read position   Where in the table we are, as a real number in
                  [0, TABLE_LENGTH). The integer part picks a table entry,
                  the fractional part says how far we are towards the next.

  increment       How many table entries the read position advances per
                  output sample. Bigger increment = higher pitch.

  cooking         Turning a user-facing value (Hz) into the number the
                  inner loop actually uses (an increment).


The Math: Hz to Increment
-------------------------

One pass through the table is one cycle of the waveform. To play f cycles
per second at fs samples per second we must cover f · L table entries in fs
samples:

    increment = L · f / fs

Example: 440 Hz at 48 kHz with L = 1024
    increment = 1024 · 440 / 48000 ≈ 9.387 entries per sample

No clamping happens here. Frequencies above fs/2 produce increments above
L/2 and alias; that is accepted for the naive tables.


Phase Accumulation
------------------

Each sample:

    1. read the table at the current position (interpolated)
    2. position += increment
    3. if position >= L: position -= L

Step 3 is a single subtraction, which is only correct while increment < L.
Every supported control range keeps it far below that.


Linear Interpolation
--------------------

The read position almost never lands exactly on a table entry:

    position = 9.387  →  index = 9, frac = 0.387

    y = table[9] + (table[10] - table[9]) · 0.387

The neighbour of the last entry is entry 0, so reads near the end of the
table wrap around instead of running off the end. At frac = 0 the result is
exactly the table entry.


One Type for Voices and LFOs
----------------------------

Audio oscillators and LFOs run the same code; an LFO is an Oscillator reading
the sine table at a sub-audio increment. See `dsp/lfo.rs`.
*/

/// Convert a frequency in Hz into a per-sample table increment.
#[inline]
pub fn cook_frequency(frequency_hz: f64, sample_rate: f64) -> f64 {
    TABLE_LENGTH as f64 * frequency_hz / sample_rate
}

/// Interpolate between `y1` and `y2`; `frac` = 0 returns `y1` exactly.
#[inline]
pub fn linear_interpolation(y1: f64, y2: f64, frac: f64) -> f64 {
    y1 + (y2 - y1) * frac
}

/// Read `table` at a fractional `position` in [0, TABLE_LENGTH).
#[inline]
pub fn read_interpolated(table: &WaveTable, position: f64) -> f64 {
    let whole = position.floor();
    let frac = position - whole;
    let index = (whole as usize) % TABLE_LENGTH;
    let next = if index + 1 >= TABLE_LENGTH { 0 } else { index + 1 };

    linear_interpolation(table.get(index), table.get(next), frac)
}

/// Floating read position with single-step wraparound.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Phasor {
    position: f64,
}

impl Phasor {
    pub fn new(position: f64) -> Self {
        let mut phasor = Self { position: 0.0 };
        phasor.set_position(position);
        phasor
    }

    #[inline]
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Set the read position, folded into [0, TABLE_LENGTH).
    pub fn set_position(&mut self, position: f64) {
        self.position = position.rem_euclid(TABLE_LENGTH as f64);
    }

    /// Advance by `increment` and wrap once.
    #[inline]
    pub fn advance(&mut self, increment: f64) {
        let len = TABLE_LENGTH as f64;
        self.position += increment;

        if self.position >= len {
            self.position -= len;
        } else if self.position < 0.0 {
            // FM with a large depth can push the instantaneous frequency
            // negative; the phasor then runs backwards.
            self.position += len;
            // A tiny negative step rounds back up to exactly `len`.
            if self.position >= len {
                self.position -= len;
            }
        }
    }

    pub fn reset(&mut self) {
        self.position = 0.0;
    }
}

/// A single table-reading oscillator.
///
/// Used for both audio voices and LFOs. Holds a shared handle on the
/// kernel's tables; rendering never allocates.
#[derive(Debug, Clone)]
pub struct Oscillator {
    tables: Arc<WaveTables>,
    phasor: Phasor,
    frequency_hz: f64,
    increment: f64,
    waveform: Waveform,
    mode: TableMode,
    running: bool,
}

impl Oscillator {
    pub fn new(tables: Arc<WaveTables>) -> Self {
        Self {
            tables,
            phasor: Phasor::default(),
            frequency_hz: 0.0,
            increment: 0.0,
            waveform: Waveform::Sine,
            mode: TableMode::Normal,
            running: false,
        }
    }

    pub fn with_waveform(mut self, waveform: Waveform) -> Self {
        self.waveform = waveform;
        self
    }

    pub fn with_mode(mut self, mode: TableMode) -> Self {
        self.mode = mode;
        self
    }

    /// Store a new frequency and cook its increment.
    pub fn set_frequency(&mut self, frequency_hz: f64, sample_rate: f64) {
        self.frequency_hz = frequency_hz;
        self.recook(sample_rate);
    }

    /// Recompute the increment from the stored frequency (stream reset).
    pub fn recook(&mut self, sample_rate: f64) {
        self.increment = cook_frequency(self.frequency_hz, sample_rate);
    }

    pub fn frequency(&self) -> f64 {
        self.frequency_hz
    }

    /// Base increment, as cooked from the frequency control.
    pub fn increment(&self) -> f64 {
        self.increment
    }

    pub fn position(&self) -> f64 {
        self.phasor.position()
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn set_mode(&mut self, mode: TableMode) {
        self.mode = mode;
    }

    pub fn mode(&self) -> TableMode {
        self.mode
    }

    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Next sample at the cooked base increment.
    #[inline]
    pub fn next_sample(&mut self) -> f64 {
        self.next_sample_with_increment(self.increment)
    }

    /// Next sample at an explicit increment, leaving the base untouched.
    ///
    /// The modulation router uses this for per-sample FM.
    #[inline]
    pub fn next_sample_with_increment(&mut self, increment: f64) -> f64 {
        if !self.running {
            return 0.0;
        }

        let table = self.tables.table(self.waveform, self.mode);
        let sample = read_interpolated(table, self.phasor.position());
        self.phasor.advance(increment);
        sample
    }

    /// Fill `out` with consecutive samples.
    pub fn render(&mut self, out: &mut [f64]) {
        for sample in out.iter_mut() {
            *sample = self.next_sample();
        }
    }

    /// Rewind the read position to the start of the table.
    pub fn reset(&mut self) {
        self.phasor.reset();
    }
}

//! Control ranges and the curves that map normalized values onto them.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Tapers
======

Hosts automate in normalized units, [0, 1]. A taper says how that unit
interval is spread across a control's real range [min, max].

    Linear       plain = min + n · (max - min)

    Log          n' = (10^n - 1) / 9
                 Slow start, fast finish. Most of the travel sits at the low
                 end, which suits times in milliseconds.

    AntiLog      n' = log10(1 + 9n)
                 Fast start, slow finish. Suits volume, where the ear wants
                 fine control near the top.

    VoltOctave   plain = min · 2^(n · octaves),  octaves = log2(max / min)
                 Equal travel per octave. Needs min > 0.

    Switch       plain = round(n · (positions - 1))
                 Discrete positions; plain values are indices.

Both Log and AntiLog pin n = 0 to min and n = 1 to max, so every taper
covers the full range exactly.
*/

/// Normalized-to-plain mapping for a control.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Taper {
    Linear,
    Log,
    AntiLog,
    VoltOctave,
    Switch { positions: u8 },
}

impl Taper {
    /// Warp a normalized value before scaling it into the range.
    fn warp(self, normalized: f64) -> f64 {
        match self {
            Taper::Log => (10f64.powf(normalized) - 1.0) / 9.0,
            Taper::AntiLog => (1.0 + 9.0 * normalized).log10(),
            Taper::Linear | Taper::VoltOctave | Taper::Switch { .. } => normalized,
        }
    }

    fn unwarp(self, warped: f64) -> f64 {
        match self {
            Taper::Log => (1.0 + 9.0 * warped).log10(),
            Taper::AntiLog => (10f64.powf(warped) - 1.0) / 9.0,
            Taper::Linear | Taper::VoltOctave | Taper::Switch { .. } => warped,
        }
    }
}

/// Static description of one control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub name: &'static str,
    pub units: &'static str,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub taper: Taper,
}

impl ParamRange {
    pub const fn new(
        name: &'static str,
        units: &'static str,
        min: f64,
        max: f64,
        default: f64,
        taper: Taper,
    ) -> Self {
        Self {
            name,
            units,
            min,
            max,
            default,
            taper,
        }
    }

    pub fn switch(name: &'static str, positions: u8) -> Self {
        Self::new(
            name,
            "",
            0.0,
            (positions - 1) as f64,
            0.0,
            Taper::Switch { positions },
        )
    }

    pub fn is_switch(&self) -> bool {
        matches!(self.taper, Taper::Switch { .. })
    }

    /// Clamp into [min, max]; switches also snap to the nearest position.
    pub fn clamp(&self, value: f64) -> f64 {
        let value = if value.is_nan() { self.default } else { value };
        let clamped = value.clamp(self.min, self.max);
        if self.is_switch() {
            clamped.round()
        } else {
            clamped
        }
    }

    /// Map a normalized value in [0, 1] to a plain value in range.
    pub fn to_plain(&self, normalized: f64) -> f64 {
        let n = if normalized.is_nan() {
            0.0
        } else {
            normalized.clamp(0.0, 1.0)
        };

        let plain = match self.taper {
            Taper::VoltOctave => {
                let octaves = (self.max / self.min).log2();
                self.min * 2f64.powf(n * octaves)
            }
            taper => self.min + taper.warp(n) * (self.max - self.min),
        };
        self.clamp(plain)
    }

    /// Map a plain value back onto [0, 1].
    pub fn to_normalized(&self, plain: f64) -> f64 {
        let plain = self.clamp(plain);
        if self.max == self.min {
            return 0.0;
        }

        let n = match self.taper {
            Taper::VoltOctave => (plain / self.min).log2() / (self.max / self.min).log2(),
            taper => taper.unwarp((plain - self.min) / (self.max - self.min)),
        };
        n.clamp(0.0, 1.0)
    }

    pub fn default_normalized(&self) -> f64 {
        self.to_normalized(self.default)
    }
}

//! Immutable engine configuration, built once before the kernel.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::envelope::EnvelopeShape,
    io::{ChannelConfig, ChannelFormat},
};

/// Whether the kernel generates sound or processes an input.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PluginKind {
    #[default]
    Synth,
    Effect,
}

const SYNTH_CHANNELS: &[ChannelConfig] = &[
    ChannelConfig::new(ChannelFormat::None, ChannelFormat::Mono),
    ChannelConfig::new(ChannelFormat::None, ChannelFormat::Stereo),
];

const EFFECT_CHANNELS: &[ChannelConfig] = &[
    ChannelConfig::new(ChannelFormat::Mono, ChannelFormat::Mono),
    ChannelConfig::new(ChannelFormat::Mono, ChannelFormat::Stereo),
    ChannelConfig::new(ChannelFormat::Stereo, ChannelFormat::Stereo),
];

/// Settings fixed for the lifetime of a kernel.
///
/// Passed by reference into [`SynthKernel::new`](crate::kernel::SynthKernel::new);
/// nothing here can change while audio is running.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub kind: PluginKind,
    /// FM deviation in Hz at full LFO swing.
    pub fm_depth_hz: f64,
    /// Curve constants for the envelope generator.
    pub envelope_shape: EnvelopeShape,
    /// Sample rate assumed until the first stream reset.
    pub initial_sample_rate: f64,
    /// Capacity of the control queue, in messages.
    pub control_queue_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            kind: PluginKind::Synth,
            fm_depth_hz: 20.0,
            envelope_shape: EnvelopeShape::default(),
            initial_sample_rate: 44_100.0,
            control_queue_capacity: 256,
        }
    }
}

impl EngineConfig {
    pub fn synth() -> Self {
        Self::default()
    }

    pub fn effect() -> Self {
        Self {
            kind: PluginKind::Effect,
            ..Self::default()
        }
    }

    pub fn with_fm_depth(mut self, fm_depth_hz: f64) -> Self {
        self.fm_depth_hz = fm_depth_hz;
        self
    }

    pub fn with_envelope_shape(mut self, shape: EnvelopeShape) -> Self {
        self.envelope_shape = shape;
        self
    }

    /// Channel layouts this configuration can render.
    pub fn supported_channels(&self) -> &'static [ChannelConfig] {
        match self.kind {
            PluginKind::Synth => SYNTH_CHANNELS,
            PluginKind::Effect => EFFECT_CHANNELS,
        }
    }

    pub fn supports(&self, channels: ChannelConfig) -> bool {
        self.supported_channels().contains(&channels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synth_has_no_input() {
        let config = EngineConfig::synth();
        assert!(config.supports(ChannelConfig::new(ChannelFormat::None, ChannelFormat::Mono)));
        assert!(config.supports(ChannelConfig::new(ChannelFormat::None, ChannelFormat::Stereo)));
        assert!(!config.supports(ChannelConfig::new(ChannelFormat::Mono, ChannelFormat::Mono)));
    }

    #[test]
    fn effect_never_downmixes() {
        let config = EngineConfig::effect();
        assert!(config.supports(ChannelConfig::new(ChannelFormat::Mono, ChannelFormat::Stereo)));
        assert!(!config.supports(ChannelConfig::new(ChannelFormat::Stereo, ChannelFormat::Mono)));
        assert!(!config.supports(ChannelConfig::new(ChannelFormat::None, ChannelFormat::Stereo)));
    }

    #[test]
    fn default_fm_depth() {
        assert_eq!(EngineConfig::default().fm_depth_hz, 20.0);
        assert_eq!(EngineConfig::default().with_fm_depth(5.0).fm_depth_hz, 5.0);
    }
}

// Purpose - host-facing boundary types: channel layouts, frames, MIDI

pub mod midi;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest channel count on either side of a frame.
pub const MAX_CHANNELS: usize = 2;

/// Channel format of one side of the audio bus.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelFormat {
    /// No channels; a synth has no audio input.
    None,
    Mono,
    Stereo,
}

impl ChannelFormat {
    pub fn channel_count(self) -> usize {
        match self {
            ChannelFormat::None => 0,
            ChannelFormat::Mono => 1,
            ChannelFormat::Stereo => 2,
        }
    }

    /// Format carrying `count` channels, if one exists.
    pub fn from_channel_count(count: usize) -> Option<Self> {
        match count {
            0 => Some(ChannelFormat::None),
            1 => Some(ChannelFormat::Mono),
            2 => Some(ChannelFormat::Stereo),
            _ => None,
        }
    }
}

/// Input and output formats for one stream.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelConfig {
    pub input: ChannelFormat,
    pub output: ChannelFormat,
}

impl ChannelConfig {
    pub const fn new(input: ChannelFormat, output: ChannelFormat) -> Self {
        Self { input, output }
    }
}

/// One frame of audio handed to the kernel: one sample per channel.
///
/// `input` and `output` are interleaved slices holding at least as many
/// samples as `channels` declares for each side.
#[derive(Debug)]
pub struct AudioFrame<'a> {
    /// Index of this frame within the stream.
    pub current_frame: u64,
    pub channels: ChannelConfig,
    pub input: &'a [f64],
    pub output: &'a mut [f64],
}

impl<'a> AudioFrame<'a> {
    pub fn new(
        current_frame: u64,
        channels: ChannelConfig,
        input: &'a [f64],
        output: &'a mut [f64],
    ) -> Self {
        Self {
            current_frame,
            channels,
            input,
            output,
        }
    }

    /// True when the slices are large enough for the declared formats.
    pub fn is_well_formed(&self) -> bool {
        self.input.len() >= self.channels.input.channel_count()
            && self.output.len() >= self.channels.output.channel_count()
    }
}

pub mod config;
pub mod dsp; // Tables, oscillators, envelope, filters
pub mod error;
pub mod io; // Channel layouts, frames, MIDI
pub mod kernel; // Frame processor and control queue
pub mod params; // Control ids, ranges, typed updates

/// Entries per single-cycle wavetable.
pub const TABLE_LENGTH: usize = 1024;

pub use config::{EngineConfig, PluginKind};
pub use error::KernelError;
pub use io::{midi::MidiEvent, AudioFrame, ChannelConfig, ChannelFormat};
#[cfg(feature = "rtrb")]
pub use kernel::control::ControlHandle;
pub use kernel::{control::ControlMessage, ResetInfo, SynthKernel};
pub use params::{ParamId, Params, Slot};

//! Full-kernel benchmarks.
//!
//! These drive `SynthKernel::process_block` the way a host would, including
//! the control-queue drain at the top of each block.

mod kernel;

pub use kernel::{bench_effect, bench_synth};

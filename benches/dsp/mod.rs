//! Benchmarks for the individual DSP blocks.

mod envelope;
mod filter;
mod oscillator;

pub use envelope::bench_envelope;
pub use filter::bench_filter;
pub use oscillator::{bench_modulation, bench_oscillator, bench_tables};

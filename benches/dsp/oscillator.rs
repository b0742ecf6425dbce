//! Benchmarks for table generation, table reads and LFO routing.

use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion};
use synth_kernel::dsp::{
    lfo::{Lfo, LfoRouting},
    modulate::ModulatedOscillator,
    oscillator::Oscillator,
    wavetable::{TableMode, WaveTables, Waveform},
};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f64 = 48_000.0;

/// One-time startup cost: seven tables, bandlimited ones by summation.
pub fn bench_tables(c: &mut Criterion) {
    c.bench_function("dsp/tables/generate", |b| {
        b.iter(|| black_box(WaveTables::generate()))
    });
}

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");
    let tables = Arc::new(WaveTables::generate());

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f64; size];

        for waveform in [Waveform::Sine, Waveform::Saw] {
            for mode in [TableMode::Normal, TableMode::Bandlimited] {
                let mut osc = Oscillator::new(tables.clone())
                    .with_waveform(waveform)
                    .with_mode(mode);
                osc.set_frequency(440.0, SAMPLE_RATE);
                osc.set_running(true);

                let name = format!("{waveform:?}/{mode:?}").to_lowercase();
                group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                    b.iter(|| {
                        osc.render(black_box(&mut buffer));
                    })
                });
            }
        }
    }

    group.finish();
}

pub fn bench_modulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/modulation");
    let tables = Arc::new(WaveTables::generate());

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f64; size];

        for routing in [LfoRouting::Am, LfoRouting::Fm] {
            let mut osc = Oscillator::new(tables.clone()).with_waveform(Waveform::Saw);
            osc.set_frequency(220.0, SAMPLE_RATE);
            osc.set_running(true);
            let mut lfo = Lfo::new(tables.clone());
            lfo.set_frequency(6.0, SAMPLE_RATE);
            lfo.set_routing(routing);
            lfo.set_running(true);
            let mut pair = ModulatedOscillator::new(osc, lfo);

            // FM recooks the increment every sample; AM is one multiply.
            let name = format!("{routing:?}").to_lowercase();
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    for sample in buffer.iter_mut() {
                        *sample = pair.next_sample(SAMPLE_RATE, 20.0);
                    }
                    black_box(&buffer);
                })
            });
        }
    }

    group.finish();
}

//! Benchmarks for the synth and effect paths.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use synth_kernel::{
    ChannelConfig, ChannelFormat, EngineConfig, ParamId, ResetInfo, Slot, SynthKernel,
};

use crate::BLOCK_SIZES;

fn kernel(config: EngineConfig) -> SynthKernel {
    let mut kernel = SynthKernel::new(&config);
    kernel
        .reset(ResetInfo::new(48_000.0, 24))
        .expect("valid sample rate");
    kernel
}

pub fn bench_synth(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/synth");
    let stereo = ChannelConfig::new(ChannelFormat::None, ChannelFormat::Stereo);

    for &size in BLOCK_SIZES {
        let mut left = vec![0.0f64; size];
        let mut right = vec![0.0f64; size];

        // === ONE OSCILLATOR ===
        // Baseline: sine through gain filter and lowpass
        let mut simple = kernel(EngineConfig::synth());
        simple.update_parameter(ParamId::OscStart(Slot::One), 1.0);

        group.bench_with_input(BenchmarkId::new("one_osc", size), &size, |b, _| {
            b.iter(|| {
                simple.process_block(
                    stereo,
                    &[],
                    &mut [left.as_mut_slice(), right.as_mut_slice()],
                );
                black_box(&left);
            })
        });

        // === FULL PATCH ===
        // Both oscillators, both LFOs (one FM, one AM), envelope on
        let mut full = kernel(EngineConfig::synth());
        for slot in Slot::ALL {
            full.update_parameter(ParamId::OscStart(slot), 1.0);
            full.update_parameter(ParamId::OscWaveform(slot), 1.0);
            full.update_parameter(ParamId::OscMode(slot), 1.0);
            full.update_parameter(ParamId::LfoStart(slot), 1.0);
        }
        full.update_parameter(ParamId::LfoRouting(Slot::One), 1.0);
        full.update_parameter(ParamId::EnvelopeEnabled, 1.0);
        full.note_on();

        group.bench_with_input(BenchmarkId::new("full_patch", size), &size, |b, _| {
            b.iter(|| {
                full.process_block(
                    stereo,
                    &[],
                    &mut [left.as_mut_slice(), right.as_mut_slice()],
                );
                black_box(&left);
            })
        });
    }

    group.finish();
}

pub fn bench_effect(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/effect");
    let stereo = ChannelConfig::new(ChannelFormat::Stereo, ChannelFormat::Stereo);

    for &size in BLOCK_SIZES {
        let input: Vec<f64> = (0..size).map(|i| (i as f64 * 0.01).sin()).collect();
        let mut left = vec![0.0f64; size];
        let mut right = vec![0.0f64; size];

        for (name, selection) in [("feed_forward", 0.0), ("feedback", 1.0)] {
            let mut fx = kernel(EngineConfig::effect());
            fx.update_parameter(ParamId::EffectFilter, selection);
            fx.update_parameter(ParamId::FeedbackB1, -0.5);

            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    fx.process_block(
                        stereo,
                        &[input.as_slice(), input.as_slice()],
                        &mut [left.as_mut_slice(), right.as_mut_slice()],
                    );
                    black_box(&left);
                })
            });
        }
    }

    group.finish();
}

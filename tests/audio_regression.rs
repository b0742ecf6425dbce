use std::f64::consts::{PI, TAU};

use synth_kernel::{
    dsp::{EnvelopeState, LfoRouting, TableMode, Waveform},
    ChannelConfig, ChannelFormat, EngineConfig, MidiEvent, ParamId, ResetInfo, Slot, SynthKernel,
};

const MONO: ChannelConfig = ChannelConfig::new(ChannelFormat::None, ChannelFormat::Mono);

fn synth_at(sample_rate: f64) -> SynthKernel {
    let mut kernel = SynthKernel::new(&EngineConfig::synth());
    kernel.reset(ResetInfo::new(sample_rate, 24)).unwrap();
    kernel
}

fn render(kernel: &mut SynthKernel, frames: usize) -> Vec<f64> {
    let mut out = vec![0.0; frames];
    assert!(kernel.process_block(MONO, &[], &mut [out.as_mut_slice()]));
    out
}

fn rising_zero_crossings(samples: &[f64]) -> usize {
    samples
        .windows(2)
        .filter(|pair| pair[0] < 0.0 && pair[1] >= 0.0)
        .count()
}

#[test]
fn renders_silence_with_factory_preset() {
    let mut kernel = synth_at(48_000.0);
    let samples = render(&mut kernel, 2048);
    assert!(samples.iter().all(|s| *s == 0.0));
}

#[test]
fn every_patch_stays_finite_and_bounded() {
    for waveform in Waveform::ALL {
        for mode in [TableMode::Normal, TableMode::Bandlimited] {
            for routing in [LfoRouting::Am, LfoRouting::Fm] {
                let mut kernel = synth_at(44_100.0);
                for slot in Slot::ALL {
                    kernel.update_parameter(ParamId::OscWaveform(slot), waveform.index() as f64);
                    kernel.update_parameter(ParamId::OscMode(slot), mode.index() as f64);
                    kernel.update_parameter(ParamId::OscVolume(slot), 1.0);
                    kernel.update_parameter(ParamId::OscStart(slot), 1.0);
                    kernel.update_parameter(ParamId::LfoRouting(slot), routing.index() as f64);
                    kernel.update_parameter(ParamId::LfoStart(slot), 1.0);
                }
                kernel.update_parameter(ParamId::OscFrequency(Slot::Two), 4200.0);

                let samples = render(&mut kernel, 8192);
                assert!(
                    samples.iter().all(|s| s.is_finite() && s.abs() <= 2.0),
                    "{waveform:?}/{mode:?}/{routing:?} escaped bounds"
                );
                assert!(samples.iter().any(|s| s.abs() > 0.01));
            }
        }
    }
}

#[test]
fn pitch_holds_across_sample_rates() {
    for sample_rate in [44_100.0, 48_000.0, 96_000.0] {
        let mut kernel = synth_at(sample_rate);
        kernel.update_parameter(ParamId::OscStart(Slot::One), 1.0);

        // Skip the filter transient, then count one second of cycles.
        render(&mut kernel, 1024);
        let second = render(&mut kernel, sample_rate as usize);
        let cycles = rising_zero_crossings(&second);
        assert!(
            (439..=441).contains(&cycles),
            "{sample_rate} Hz: {cycles} cycles"
        );
    }
}

#[test]
fn sine_voice_matches_ideal_through_output_filters() {
    let sample_rate = 48_000.0;
    let frequency = 440.0;
    let mut kernel = synth_at(sample_rate);
    kernel.update_parameter(ParamId::OscStart(Slot::One), 1.0);
    kernel.update_parameter(ParamId::OscFrequency(Slot::One), frequency);
    kernel.update_parameter(ParamId::OscVolume(Slot::One), 1.0);
    kernel.update_parameter(ParamId::FilterGain, 1.0);
    kernel.update_parameter(ParamId::FilterAlfa, 0.0);
    kernel.update_parameter(ParamId::FilterCutoff, 0.49 * sample_rate);
    let cutoff = kernel.lowpass().cutoff();
    assert_eq!(cutoff, 4200.0);

    let samples = render(&mut kernel, 1000);

    // Steady-state response of the one-pole lowpass at 440 Hz.
    let w = TAU * frequency / sample_rate;
    let k = (PI * cutoff / sample_rate).tan();
    let (b0, a1) = (k / (k + 1.0), (k - 1.0) / (k + 1.0));
    let (re_num, im_num) = (b0 * (1.0 + w.cos()), -b0 * w.sin());
    let (re_den, im_den) = (1.0 + a1 * w.cos(), -a1 * w.sin());
    let gain = (re_num.hypot(im_num)) / (re_den.hypot(im_den));
    let phase = im_num.atan2(re_num) - im_den.atan2(re_den);
    assert!(gain > 0.99 && phase.abs() < 0.11, "{gain} {phase}");

    // Half the oscillator volume, once the start transient has died out.
    for (n, sample) in samples.iter().enumerate().skip(100) {
        let ideal = 0.5 * gain * (w * n as f64 + phase).sin();
        assert!((sample - ideal).abs() < 1e-4, "frame {n}: {sample} vs {ideal}");
    }
}

#[test]
fn reset_restarts_the_stream() {
    let mut fresh = synth_at(48_000.0);
    let mut reused = synth_at(48_000.0);
    for kernel in [&mut fresh, &mut reused] {
        kernel.update_parameter(ParamId::OscStart(Slot::One), 1.0);
        kernel.update_parameter(ParamId::OscWaveform(Slot::One), 1.0);
        kernel.update_parameter(ParamId::LfoStart(Slot::One), 1.0);
    }

    render(&mut reused, 3000);
    reused.reset(ResetInfo::new(48_000.0, 24)).unwrap();

    assert_eq!(render(&mut fresh, 1024), render(&mut reused, 1024));
}

#[test]
fn midi_bytes_gate_the_envelope() {
    let mut kernel = synth_at(48_000.0);
    kernel.update_parameter(ParamId::OscStart(Slot::One), 1.0);
    kernel.update_parameter(ParamId::EnvelopeEnabled, 1.0);
    kernel.update_parameter(ParamId::EnvelopeRelease, 100.0);

    let note_on = MidiEvent::from_bytes(&[0x90, 60, 100]).unwrap();
    assert!(kernel.process_midi_event(note_on));

    let held = render(&mut kernel, 24_000);
    assert_eq!(kernel.envelope_state(), EnvelopeState::Sustain);
    assert!(held.iter().any(|s| s.abs() > 0.1));

    let note_off = MidiEvent::from_bytes(&[0x80, 60, 0]).unwrap();
    assert!(kernel.process_midi_event(note_off));

    let released = render(&mut kernel, 48_000);
    assert_eq!(kernel.envelope_state(), EnvelopeState::Off);
    assert!(released[released.len() - 100..].iter().all(|s| s.abs() < 1e-6));
}

#[test]
fn effect_filters_each_channel() {
    let mut kernel = SynthKernel::new(&EngineConfig::effect());
    kernel.reset(ResetInfo::new(48_000.0, 24)).unwrap();
    kernel.update_parameter(ParamId::EffectVolume, 1.0);
    kernel.update_parameter(ParamId::FeedForwardA0, 0.5);
    kernel.update_parameter(ParamId::FeedForwardA1, 0.5);

    let impulse = [1.0, 0.0, 0.0, 0.0];
    let step = [1.0, 1.0, 1.0, 1.0];
    let mut left = [0.0; 4];
    let mut right = [0.0; 4];
    let stereo = ChannelConfig::new(ChannelFormat::Stereo, ChannelFormat::Stereo);

    assert!(kernel.process_block(
        stereo,
        &[&impulse[..], &step[..]],
        &mut [&mut left[..], &mut right[..]],
    ));
    assert_eq!(left, [0.5, 0.5, 0.0, 0.0]);
    assert_eq!(right, [0.5, 1.0, 1.0, 1.0]);
}

#[test]
fn effect_output_untouched_for_unknown_layout() {
    let mut kernel = SynthKernel::new(&EngineConfig::effect());
    let input = [1.0; 8];
    let mut output = [3.0; 8];
    let downmix = ChannelConfig::new(ChannelFormat::Stereo, ChannelFormat::Mono);
    assert!(!kernel.process_block(downmix, &[&input[..], &input[..]], &mut [&mut output[..]]));
    assert_eq!(output, [3.0; 8]);
}

#[cfg(feature = "rtrb")]
#[test]
fn control_queue_changes_pitch_between_blocks() {
    let (mut kernel, mut handle) = SynthKernel::with_control_queue(&EngineConfig::synth());
    kernel.reset(ResetInfo::new(48_000.0, 24)).unwrap();

    handle.set_parameter(ParamId::OscStart(Slot::One), 1.0).unwrap();
    render(&mut kernel, 1024);
    let low = rising_zero_crossings(&render(&mut kernel, 48_000));

    handle.set_raw(12, 880.0).unwrap();
    render(&mut kernel, 1024);
    let high = rising_zero_crossings(&render(&mut kernel, 48_000));

    assert!((439..=441).contains(&low), "{low}");
    assert!((879..=881).contains(&high), "{high}");
}

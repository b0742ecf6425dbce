//! Demo - opens the output device and feeds the kernel from the main thread

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use synth_kernel::{
    AudioFrame, ChannelConfig, ChannelFormat, EngineConfig, ResetInfo, SynthKernel,
};

use super::tour::Step;

pub struct Demo {
    config: EngineConfig,
    steps: Vec<Step>,
}

impl Demo {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::synth(),
            steps: Vec::new(),
        }
    }

    pub fn steps(mut self, steps: Vec<Step>) -> Self {
        self.steps = steps;
        self
    }

    /// Play every step, then stop.
    pub fn run(self) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0 as f64;
        let bit_depth = (config.sample_format().sample_size() * 8) as u32;
        let channels = config.channels() as usize;

        let output = ChannelFormat::from_channel_count(channels.min(2))
            .filter(|format| *format != ChannelFormat::None)
            .ok_or_else(|| eyre!("output device reports no channels"))?;
        let layout = ChannelConfig::new(ChannelFormat::None, output);
        let rendered = layout.output.channel_count();

        let (mut kernel, mut handle) = SynthKernel::with_control_queue(&self.config);
        kernel
            .reset(ResetInfo::new(sample_rate, bit_depth))
            .wrap_err("stream reset failed")?;

        log::info!("{sample_rate} Hz, {channels} channels, {bit_depth} bit");

        let stream = device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                kernel.apply_pending_controls();

                let mut out = [0.0f64; 2];
                for frame in data.chunks_mut(channels) {
                    let mut audio = AudioFrame::new(
                        kernel.frames_rendered(),
                        layout,
                        &[],
                        &mut out[..rendered],
                    );
                    if !kernel.process_frame(&mut audio) {
                        frame.fill(0.0);
                        continue;
                    }

                    // Extra device channels repeat the last rendered one.
                    for (ch, sample) in frame.iter_mut().enumerate() {
                        *sample = out[ch.min(rendered - 1)] as f32;
                    }
                }
            },
            |err| log::error!("audio stream error: {err}"),
            None,
        )?;

        stream.play()?;

        for step in self.steps {
            log::info!("{}", step.label);
            for message in step.messages {
                handle.send(message)?;
            }
            std::thread::sleep(step.hold);
        }

        Ok(())
    }
}

impl Default for Demo {
    fn default() -> Self {
        Self::new()
    }
}

//! The frame processor: owns every DSP block and renders one frame at a time.

pub mod control;

#[cfg(feature = "rtrb")]
use rtrb::Consumer;

use std::sync::Arc;

use crate::{
    config::{EngineConfig, PluginKind},
    dsp::{
        envelope::{Envelope, EnvelopeState},
        filter::{
            FeedForwardFilter, FeedbackFilter, FilterSelection, GainFilter, OnePoleLowpass,
            SampleFilter,
        },
        lfo::Lfo,
        modulate::{mix_pair, ModulatedOscillator},
        oscillator::Oscillator,
        wavetable::WaveTables,
    },
    error::{KernelError, Result},
    io::{midi::MidiEvent, AudioFrame, ChannelConfig, ChannelFormat, MAX_CHANNELS},
    params::{ParamId, ParamUpdate, Params, Slot},
};

#[cfg(feature = "rtrb")]
use control::{control_queue, ControlHandle};
use control::ControlMessage;

/*
Frame Processing
================

Synth path, once per frame:

    for each slot:  LFO → (FM recook) → oscillator → (AM)
    mix   = (vol1 / 2) · out1 + (vol2 / 2) · out2
    mix  *= envelope            (only when the envelope switch is on)
    y     = lowpass(gain_filter(mix))
    every output channel ← y

If both oscillators are stopped the frame is written as silence and nothing
advances.

Effect path, per channel:

    y = volume · filter(x)      filter = feed-forward or feedback

Mono in / stereo out runs the left filter once and copies the result.

Control Updates
---------------

Every update goes through the same two steps:

    1. store the clamped value in the `Params` snapshot
    2. post-update hook: recompute whatever depends on that control

Step 2 is where increments get recooked and filter coefficients rebuilt;
controls that are only read per frame (volumes, switches) have nothing to
do there. A stream reset replays step 2 for every control at the new rate.
*/

/// Stream settings delivered by the host before rendering starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResetInfo {
    pub sample_rate: f64,
    pub bit_depth: u32,
}

impl ResetInfo {
    pub fn new(sample_rate: f64, bit_depth: u32) -> Self {
        Self {
            sample_rate,
            bit_depth,
        }
    }
}

/// Fraction of the sample rate the lowpass cutoff may reach. Keeps
/// `tan(π·fc/fs)` finite.
const MAX_CUTOFF_RATIO: f64 = 0.49;

/// Clamp a cutoff strictly below Nyquist.
#[inline]
pub fn clamp_cutoff(cutoff_hz: f64, sample_rate: f64) -> f64 {
    cutoff_hz.min(sample_rate * MAX_CUTOFF_RATIO)
}

pub struct SynthKernel {
    config: EngineConfig,
    params: Params,
    sample_rate: f64,
    bit_depth: u32,
    frames_rendered: u64,

    pairs: [ModulatedOscillator; 2],
    envelope: Envelope,
    gain_filter: GainFilter,
    lowpass: OnePoleLowpass,
    feed_forward: [FeedForwardFilter; MAX_CHANNELS],
    feedback: [FeedbackFilter; MAX_CHANNELS],

    #[cfg(feature = "rtrb")]
    controls: Option<Consumer<ControlMessage>>,
}

impl SynthKernel {
    /// Build a kernel at the factory preset. Tables are generated here;
    /// nothing allocates after this returns.
    pub fn new(config: &EngineConfig) -> Self {
        let tables = Arc::new(WaveTables::generate());
        let sample_rate = config.initial_sample_rate;
        let pair = || {
            ModulatedOscillator::new(Oscillator::new(tables.clone()), Lfo::new(tables.clone()))
        };

        let mut kernel = Self {
            config: config.clone(),
            params: Params::default(),
            sample_rate,
            bit_depth: 24,
            frames_rendered: 0,
            pairs: [pair(), pair()],
            envelope: Envelope::new(sample_rate).with_shape(config.envelope_shape),
            gain_filter: GainFilter::new(0.0, 0.0),
            lowpass: OnePoleLowpass::new(clamp_cutoff(440.0, sample_rate), sample_rate),
            feed_forward: [FeedForwardFilter::default(); MAX_CHANNELS],
            feedback: [FeedbackFilter::default(); MAX_CHANNELS],
            #[cfg(feature = "rtrb")]
            controls: None,
        };
        kernel.sync_all();
        kernel
    }

    /// Build a kernel plus the handle the control thread uses to drive it.
    #[cfg(feature = "rtrb")]
    pub fn with_control_queue(config: &EngineConfig) -> (Self, ControlHandle) {
        let (handle, rx) = control_queue(config.control_queue_capacity);
        let mut kernel = Self::new(config);
        kernel.controls = Some(rx);
        (kernel, handle)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn bit_depth(&self) -> u32 {
        self.bit_depth
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub fn envelope_state(&self) -> EnvelopeState {
        self.envelope.state()
    }

    pub fn envelope_level(&self) -> f64 {
        self.envelope.level()
    }

    /// Cooked base increment of an oscillator.
    pub fn oscillator_increment(&self, slot: Slot) -> f64 {
        self.pairs[slot.index()].osc.increment()
    }

    pub fn lowpass(&self) -> &OnePoleLowpass {
        &self.lowpass
    }

    pub fn gain_filter(&self) -> &GainFilter {
        &self.gain_filter
    }

    /// Stream reset: adopt a new sample rate, recook every coefficient and
    /// clear all phase, filter and envelope state.
    pub fn reset(&mut self, info: ResetInfo) -> Result<()> {
        if !(info.sample_rate.is_finite() && info.sample_rate > 0.0) {
            log::error!("rejected stream reset at {} Hz", info.sample_rate);
            return Err(KernelError::InvalidSampleRate(info.sample_rate));
        }

        self.sample_rate = info.sample_rate;
        self.bit_depth = info.bit_depth;
        self.envelope.set_sample_rate(info.sample_rate);
        self.sync_all();

        for pair in self.pairs.iter_mut() {
            pair.reset();
        }
        self.envelope.reset();
        self.gain_filter.reset();
        self.lowpass.reset();
        for filter in self.feed_forward.iter_mut() {
            filter.reset();
        }
        for filter in self.feedback.iter_mut() {
            filter.reset();
        }
        self.frames_rendered = 0;

        log::info!(
            "stream reset: {} Hz, {} bit",
            info.sample_rate,
            info.bit_depth
        );
        Ok(())
    }

    /// Set a control to a plain value. Returns the value actually stored
    /// after clamping.
    pub fn update_parameter(&mut self, id: ParamId, value: f64) -> f64 {
        self.apply(ParamUpdate::from_plain(id, value));
        self.params.value(id)
    }

    /// Set a control from a normalized value through its taper. Returns the
    /// plain value stored.
    pub fn update_parameter_normalized(&mut self, id: ParamId, normalized: f64) -> f64 {
        self.apply(ParamUpdate::from_normalized(id, normalized));
        self.params.value(id)
    }

    /// Set a control by raw host id.
    pub fn update_parameter_raw(&mut self, raw: u32, value: f64) -> Result<f64> {
        let id = ParamId::try_from(raw)?;
        Ok(self.update_parameter(id, value))
    }

    /// Replace every control at once (preset recall).
    pub fn load_params(&mut self, params: Params) {
        for id in ParamId::ALL {
            self.apply(ParamUpdate::from_plain(id, params.value(id)));
        }
    }

    fn apply(&mut self, update: ParamUpdate) {
        self.params.apply(update);
        self.post_update(update);
    }

    /// Replay the post-update hook for every control.
    fn sync_all(&mut self) {
        for id in ParamId::ALL {
            let update = ParamUpdate::from_plain(id, self.params.value(id));
            self.post_update(update);
        }
    }

    fn post_update(&mut self, update: ParamUpdate) {
        let sample_rate = self.sample_rate;

        match update {
            ParamUpdate::OscRunning { slot, running } => {
                let osc = &mut self.pairs[slot.index()].osc;
                osc.set_running(running);
                if running {
                    osc.recook(sample_rate);
                }
            }
            ParamUpdate::OscFrequency { slot, hz } => {
                self.pairs[slot.index()].osc.set_frequency(hz, sample_rate);
            }
            ParamUpdate::OscWaveform { slot, waveform } => {
                self.pairs[slot.index()].osc.set_waveform(waveform);
            }
            ParamUpdate::OscMode { slot, mode } => {
                self.pairs[slot.index()].osc.set_mode(mode);
            }
            ParamUpdate::LfoRunning { slot, running } => {
                let lfo = &mut self.pairs[slot.index()].lfo;
                lfo.set_running(running);
                if running {
                    lfo.recook(sample_rate);
                }
            }
            ParamUpdate::LfoFrequency { slot, hz } => {
                self.pairs[slot.index()].lfo.set_frequency(hz, sample_rate);
            }
            ParamUpdate::LfoRouting { slot, routing } => {
                self.pairs[slot.index()].lfo.set_routing(routing);
            }
            ParamUpdate::FilterGain(gain) => self.gain_filter.set_gain(gain),
            ParamUpdate::FilterAlfa(alfa) => self.gain_filter.set_alfa(alfa),
            ParamUpdate::FilterCutoff(hz) => {
                self.lowpass
                    .set_cutoff(clamp_cutoff(hz, sample_rate), sample_rate);
            }
            ParamUpdate::EnvelopeAttack(ms) => self.envelope.set_attack_ms(ms),
            ParamUpdate::EnvelopeDecay(ms) => self.envelope.set_decay_ms(ms),
            ParamUpdate::EnvelopeSustain(level) => self.envelope.set_sustain_level(level),
            ParamUpdate::EnvelopeRelease(ms) => self.envelope.set_release_ms(ms),
            ParamUpdate::FeedForwardA0(_) | ParamUpdate::FeedForwardA1(_) => {
                let (a0, a1) = (self.params.effect.ff_a0, self.params.effect.ff_a1);
                for filter in self.feed_forward.iter_mut() {
                    filter.set_coefficients(a0, a1);
                }
            }
            ParamUpdate::FeedbackA0(_) | ParamUpdate::FeedbackB1(_) => {
                let (a0, b1) = (self.params.effect.fb_a0, self.params.effect.fb_b1);
                for filter in self.feedback.iter_mut() {
                    filter.set_coefficients(a0, b1);
                }
            }
            // Read per frame; nothing to recompute.
            ParamUpdate::OscVolume { .. }
            | ParamUpdate::EnvelopeEnabled(_)
            | ParamUpdate::EffectFilter(_)
            | ParamUpdate::EffectVolume(_) => {}
        }
    }

    /// Gate the envelope from a MIDI event. Returns true when the event was
    /// used; everything other than note on/off is ignored.
    pub fn process_midi_event(&mut self, event: MidiEvent) -> bool {
        match event {
            MidiEvent::NoteOn { velocity, .. } if velocity > 0 => {
                self.note_on();
                true
            }
            MidiEvent::NoteOn { .. } | MidiEvent::NoteOff { .. } => {
                self.note_off();
                true
            }
            _ => false,
        }
    }

    pub fn note_on(&mut self) {
        self.envelope.note_on();
    }

    pub fn note_off(&mut self) {
        self.envelope.note_off();
    }

    fn handle_message(&mut self, message: ControlMessage) {
        match message {
            ControlMessage::SetParameter { id, value } => {
                self.update_parameter(id, value);
            }
            ControlMessage::SetNormalized { id, value } => {
                self.update_parameter_normalized(id, value);
            }
            ControlMessage::Midi(event) => {
                self.process_midi_event(event);
            }
        }
    }

    /// Apply everything waiting on the control queue. Returns how many
    /// messages were handled.
    pub fn apply_pending_controls(&mut self) -> usize {
        #[cfg(feature = "rtrb")]
        {
            let mut handled = 0;
            while let Some(message) = self.controls.as_mut().and_then(|rx| rx.pop().ok()) {
                self.handle_message(message);
                handled += 1;
            }
            handled
        }

        #[cfg(not(feature = "rtrb"))]
        {
            0
        }
    }

    /// Apply a control message directly, bypassing the queue.
    pub fn send(&mut self, message: ControlMessage) {
        self.handle_message(message);
    }

    /// Render one frame.
    ///
    /// Returns false, leaving `frame.output` untouched, when the channel
    /// layout is not one this kernel supports or the frame's slices are too
    /// short for it.
    pub fn process_frame(&mut self, frame: &mut AudioFrame) -> bool {
        if !self.config.supports(frame.channels) || !frame.is_well_formed() {
            return false;
        }

        let rendered = match self.config.kind {
            PluginKind::Synth => {
                self.render_synth(frame);
                true
            }
            PluginKind::Effect => self.render_effect(frame),
        };

        if rendered {
            self.frames_rendered += 1;
        }
        rendered
    }

    fn render_synth(&mut self, frame: &mut AudioFrame) {
        let outputs = frame.channels.output.channel_count();
        let out = &mut frame.output[..outputs];

        if !self.pairs.iter().any(|pair| pair.osc.is_running()) {
            out.fill(0.0);
            return;
        }

        let fm_depth = self.config.fm_depth_hz;
        let sample_1 = self.pairs[0].next_sample(self.sample_rate, fm_depth);
        let sample_2 = self.pairs[1].next_sample(self.sample_rate, fm_depth);

        let [osc_1, osc_2] = &self.params.oscillators;
        let mut mix = mix_pair(sample_1, osc_1.volume, sample_2, osc_2.volume);

        let envelope = self.envelope.next_sample();
        if self.params.envelope.enabled {
            mix *= envelope;
        }

        let y = self.lowpass.process(self.gain_filter.process(mix));
        out.fill(y);
    }

    fn render_effect(&mut self, frame: &mut AudioFrame) -> bool {
        let volume = self.params.effect.volume;
        let selection = self.params.effect.filter;

        match (frame.channels.input, frame.channels.output) {
            (ChannelFormat::Mono, ChannelFormat::Mono) => {
                frame.output[0] = volume * self.filter_channel(selection, 0, frame.input[0]);
            }
            (ChannelFormat::Mono, ChannelFormat::Stereo) => {
                let y = volume * self.filter_channel(selection, 0, frame.input[0]);
                frame.output[0] = y;
                frame.output[1] = y;
            }
            (ChannelFormat::Stereo, ChannelFormat::Stereo) => {
                for ch in 0..2 {
                    frame.output[ch] = volume * self.filter_channel(selection, ch, frame.input[ch]);
                }
            }
            _ => return false,
        }
        true
    }

    #[inline]
    fn filter_channel(&mut self, selection: FilterSelection, channel: usize, x: f64) -> f64 {
        match selection {
            FilterSelection::FeedForward => self.feed_forward[channel].process(x),
            FilterSelection::Feedback => self.feedback[channel].process(x),
        }
    }

    /// Drain the control queue, then render a block of planar buffers.
    ///
    /// Renders as many frames as the shortest buffer holds. Returns false,
    /// with no output written, for an unsupported layout.
    pub fn process_block(
        &mut self,
        channels: ChannelConfig,
        inputs: &[&[f64]],
        outputs: &mut [&mut [f64]],
    ) -> bool {
        self.apply_pending_controls();

        let input_count = channels.input.channel_count();
        let output_count = channels.output.channel_count();
        if !self.config.supports(channels)
            || inputs.len() < input_count
            || outputs.len() < output_count
        {
            return false;
        }

        let frames = inputs[..input_count]
            .iter()
            .map(|buffer| buffer.len())
            .chain(outputs[..output_count].iter().map(|buffer| buffer.len()))
            .min()
            .unwrap_or(0);

        let mut frame_in = [0.0; MAX_CHANNELS];
        let mut frame_out = [0.0; MAX_CHANNELS];

        for n in 0..frames {
            for (ch, sample) in frame_in[..input_count].iter_mut().enumerate() {
                *sample = inputs[ch][n];
            }

            let mut frame = AudioFrame::new(
                self.frames_rendered,
                channels,
                &frame_in[..input_count],
                &mut frame_out[..output_count],
            );
            if !self.process_frame(&mut frame) {
                return false;
            }

            for (ch, sample) in frame_out[..output_count].iter().enumerate() {
                outputs[ch][n] = *sample;
            }
        }
        true
    }
}

//! # Flanger Engine
//!
//! Ties the pieces together. For every host block, for every channel,
//! for every sample:
//!
//! ```text
//! LFO ──► × depth ──► × max delay ──► delay time
//!                                         │
//!                                         ▼
//! history ──────────────────────► interpolated read ──► × feedback ──┐
//!    ▲                                                               │
//!    │                                                               ▼
//! Input ─────┬─────────────────────────────────────────────────────►(+)──► × 0.25 ──► Output
//!            │
//!            └──► written into history *after* all reads for the block
//! ```
//!
//! The history is filled from the dry input, so this is a feed-forward
//! comb: each sound is heard once more, delayed and scaled, and never
//! recirculates. The fixed 0.25 output gain keeps the dry + wet sum away
//! from clipping.
//!
//! ## Lifecycle
//!
//! ```text
//! Uninitialized ──prepare()──► Prepared ──process()──► Processing
//!       ▲                         ▲                         │
//!       └── prepare() failed      └──────prepare()──────────┤
//!                                                           ▼
//!                                 Released ◄──release()─────┘
//! ```
//!
//! [`FlangerEngine::prepare`] is the only place that allocates. Outside
//! `Prepared`/`Processing`, [`FlangerEngine::process`] leaves the audio
//! untouched.
//!
//! ## Zero LFO Frequency
//!
//! With the LFO frequency at exactly 0 Hz the depth control is bypassed:
//! the delay becomes `lfo_value * max_delay`, where the LFO holds its
//! value at phase 0 (the delay is half the maximum for sine, zero for
//! sawtooth). The depth ramp is frozen in the meantime. This keeps a
//! stopped LFO usable as a static comb filter.

use std::ops::Range;
use std::sync::Arc;

use nih_plug::{nih_log, nih_warn};
use thiserror::Error;

use crate::controls::{ControlSnapshot, FlangerControls};
use crate::dsp::oscillator::{Lfo, LfoShape};
use crate::dsp::ring_buffer::RingBuffer;
use crate::dsp::smoothed::SmoothedValue;

/// Longest modulated delay, in seconds.
pub const MAX_DELAY_SECONDS: f32 = 0.025;

/// How much past audio the history keeps, in seconds.
pub const HISTORY_SECONDS: f32 = 3.0;

/// Time the depth takes to glide to a new target, in seconds.
pub const RAMP_SECONDS: f32 = 3.0;

/// Gain applied to the final dry + wet sum.
pub const OUTPUT_GAIN: f32 = 0.25;

/// Mono and stereo only.
pub const MAX_CHANNELS: usize = 2;

/// What the host told us about the stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamConfig {
    pub sample_rate: f32,
    /// Largest block `process()` will be handed. Longer blocks are still
    /// handled, in pieces of this size.
    pub max_block_size: usize,
    pub input_channels: usize,
    pub output_channels: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Uninitialized,
    Prepared,
    Processing,
    Released,
}

/// Stream configurations the engine refuses to run with.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PrepareError {
    #[error("sample rate must be a positive, finite number of Hz (got {0})")]
    InvalidSampleRate(f32),

    #[error("block size must be at least one sample")]
    ZeroBlockSize,

    #[error("input has {inputs} channel(s) but output has {outputs}")]
    MismatchedLayout { inputs: usize, outputs: usize },

    #[error("{0} channel(s) requested, only mono and stereo are supported")]
    UnsupportedChannelCount(usize),
}

/// The modulated-delay processor.
pub struct FlangerEngine {
    controls: Arc<FlangerControls>,
    state: EngineState,

    sample_rate: f32,
    max_block_size: usize,

    /// `MAX_DELAY_SECONDS` converted to samples at the current rate.
    max_delay_samples: f32,

    /// Dry input history for every channel.
    history: RingBuffer,

    /// Per-channel LFOs. Channels other than 0 run backwards in
    /// contrary motion.
    lfos: Vec<Lfo>,

    /// Per-channel depth ramps.
    depths: Vec<SmoothedValue>,

    /// Scratch space for the delayed signal, one block per channel.
    wet: Vec<Vec<f32>>,

    /// Controls as of the last block, to spot changes.
    applied: ControlSnapshot,
}

impl FlangerEngine {
    pub fn new(controls: Arc<FlangerControls>) -> Self {
        let applied = controls.snapshot();
        Self {
            controls,
            state: EngineState::Uninitialized,
            sample_rate: 0.0,
            max_block_size: 0,
            max_delay_samples: 0.0,
            history: RingBuffer::new(),
            lfos: Vec::new(),
            depths: Vec::new(),
            wet: Vec::new(),
            applied,
        }
    }

    /// Size every buffer for the stream and start from a clean state.
    ///
    /// Allocates; call it from the host's setup path, never from the
    /// audio thread. On error the engine is left `Uninitialized`.
    pub fn prepare(&mut self, config: StreamConfig) -> Result<(), PrepareError> {
        self.state = EngineState::Uninitialized;

        if let Err(err) = validate(&config) {
            nih_warn!("Rejecting stream configuration {config:?}: {err}");
            return Err(err);
        }

        let num_channels = config.input_channels;
        self.sample_rate = config.sample_rate;
        self.max_block_size = config.max_block_size;
        self.max_delay_samples =
            (f64::from(MAX_DELAY_SECONDS) * f64::from(config.sample_rate)) as f32;

        let capacity = self.history.set_size(
            num_channels,
            HISTORY_SECONDS,
            config.sample_rate,
            config.max_block_size,
        );
        self.history.init();

        let controls = self.controls.snapshot();
        self.lfos = (0..num_channels)
            .map(|_| Lfo::new(config.sample_rate))
            .collect();
        self.depths = (0..num_channels)
            .map(|_| {
                let mut depth = SmoothedValue::new(controls.depth_target);
                depth.reset(config.sample_rate, RAMP_SECONDS);
                depth
            })
            .collect();
        self.wet = vec![vec![0.0; config.max_block_size]; num_channels];

        self.set_lfo_shapes(controls.lfo_shape);
        self.retune_lfos(controls.lfo_frequency, controls.contrary_motion);
        self.applied = controls;

        self.state = EngineState::Prepared;
        nih_log!(
            "Flanger prepared: {} Hz, {} channel(s), blocks up to {} samples, {} samples of history",
            config.sample_rate,
            num_channels,
            config.max_block_size,
            capacity
        );

        Ok(())
    }

    /// Forget all past audio and restart the sweep, keeping the current
    /// configuration. Called when the host stops the transport.
    pub fn reset(&mut self) {
        if !self.is_active() {
            return;
        }

        self.history.init();
        for lfo in &mut self.lfos {
            lfo.set_phase(0.0);
        }
        for depth in &mut self.depths {
            depth.set_current_and_target_value(depth.target_value());
        }
    }

    /// Mark the stream as ended. Safe to call in any state; the buffers
    /// are kept until the next `prepare()`.
    pub fn release(&mut self) {
        if self.is_active() {
            nih_log!("Flanger released");
        }
        self.state = EngineState::Released;
    }

    /// Process one host block in place.
    ///
    /// Never fails and never allocates. Channels beyond the prepared
    /// count are left untouched, and blocks longer than the prepared
    /// maximum are processed in maximum-size pieces.
    pub fn process(&mut self, channels: &mut [&mut [f32]]) {
        if !self.is_active() {
            return;
        }
        self.state = EngineState::Processing;

        let controls = self.controls.snapshot();
        self.apply_controls(controls);

        let num_channels = channels.len().min(self.lfos.len());
        let channels = &mut channels[..num_channels];
        let len = channels.iter().map(|c| c.len()).min().unwrap_or(0);

        let mut start = 0;
        while start < len {
            let end = (start + self.max_block_size).min(len);
            self.process_frames(channels, start..end, &controls);
            start = end;
        }
    }

    fn process_frames(
        &mut self,
        channels: &mut [&mut [f32]],
        frames: Range<usize>,
        controls: &ControlSnapshot,
    ) {
        let len = frames.len();
        let max_delay = self.max_delay_samples;
        let modulated = controls.lfo_frequency > 0.0;

        // Read every channel's delayed signal while the history still
        // ends just before this block.
        for (channel, ((wet, lfo), depth)) in self
            .wet
            .iter_mut()
            .zip(&mut self.lfos)
            .zip(&mut self.depths)
            .enumerate()
            .take(channels.len())
        {
            for (offset, sample) in wet[..len].iter_mut().enumerate() {
                let sweep = lfo.next_sample();
                let delay = if modulated {
                    sweep * depth.next_value() * max_delay
                } else {
                    sweep * max_delay
                };
                *sample = self.history.read_interp_sample(channel, offset, delay);
            }
        }

        // Only the dry input goes into the history.
        self.history.write_frames(channels, frames.clone());

        let feedback = controls.feedback_gain;
        for (samples, wet) in channels.iter_mut().zip(&self.wet) {
            for (out, delayed) in samples[frames.clone()].iter_mut().zip(&wet[..len]) {
                *out = (*out + delayed * feedback) * OUTPUT_GAIN;
            }
        }
    }

    /// Push control changes made since the last block into the LFOs and
    /// depth ramps.
    fn apply_controls(&mut self, controls: ControlSnapshot) {
        let previous = self.applied;

        if controls.lfo_frequency != previous.lfo_frequency
            || controls.contrary_motion != previous.contrary_motion
        {
            self.retune_lfos(controls.lfo_frequency, controls.contrary_motion);
        }
        if controls.lfo_shape != previous.lfo_shape {
            self.set_lfo_shapes(controls.lfo_shape);
        }
        if controls.depth_target != previous.depth_target {
            for depth in &mut self.depths {
                depth.set_target_value(controls.depth_target);
            }
        }

        self.applied = controls;
    }

    /// Set every LFO's frequency and restart all of them from phase 0 so
    /// the channels share a known alignment point. In contrary motion
    /// channel 0 runs forwards and every other channel backwards.
    fn retune_lfos(&mut self, hz: f32, contrary_motion: bool) {
        for (channel, lfo) in self.lfos.iter_mut().enumerate() {
            let signed = if contrary_motion && channel > 0 { -hz } else { hz };
            lfo.set_frequency(signed);
            lfo.set_phase(0.0);
        }
    }

    fn set_lfo_shapes(&mut self, shape: LfoShape) {
        for lfo in &mut self.lfos {
            lfo.set_shape(shape);
        }
    }

    fn is_active(&self) -> bool {
        matches!(self.state, EngineState::Prepared | EngineState::Processing)
    }

    // ─── Parameter access ───

    pub fn controls(&self) -> &Arc<FlangerControls> {
        &self.controls
    }

    pub fn set_lfo_frequency(&self, hz: f32) {
        self.controls.set_lfo_frequency(hz);
    }

    pub fn set_feedback_gain(&self, gain: f32) {
        self.controls.set_feedback_gain(gain);
    }

    pub fn set_depth_target(&self, depth: f32) {
        self.controls.set_depth_target(depth);
    }

    pub fn set_lfo_shape(&self, shape: LfoShape) {
        self.controls.set_lfo_shape(shape);
    }

    pub fn set_contrary_motion(&self, enabled: bool) {
        self.controls.set_contrary_motion(enabled);
    }

    pub fn lfo_frequency(&self) -> f32 {
        self.controls.lfo_frequency()
    }

    pub fn depth_target(&self) -> f32 {
        self.controls.depth_target()
    }

    pub fn lfo_shape(&self) -> LfoShape {
        self.controls.lfo_shape()
    }

    pub fn contrary_motion(&self) -> bool {
        self.controls.contrary_motion()
    }

    // ─── Stream state ───

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn num_channels(&self) -> usize {
        self.lfos.len()
    }

    pub fn max_delay_samples(&self) -> f32 {
        self.max_delay_samples
    }

    pub fn history_capacity(&self) -> usize {
        self.history.capacity()
    }

    /// How long an input keeps producing output: one maximum-length
    /// echo, since nothing recirculates.
    pub fn tail_samples(&self) -> u32 {
        self.max_delay_samples.ceil() as u32
    }
}

fn validate(config: &StreamConfig) -> Result<(), PrepareError> {
    if !(config.sample_rate.is_finite() && config.sample_rate > 0.0) {
        return Err(PrepareError::InvalidSampleRate(config.sample_rate));
    }
    if config.max_block_size == 0 {
        return Err(PrepareError::ZeroBlockSize);
    }
    if config.input_channels != config.output_channels {
        return Err(PrepareError::MismatchedLayout {
            inputs: config.input_channels,
            outputs: config.output_channels,
        });
    }
    if !(1..=MAX_CHANNELS).contains(&config.input_channels) {
        return Err(PrepareError::UnsupportedChannelCount(config.input_channels));
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(sample_rate: f32, block: usize, channels: usize) -> StreamConfig {
        StreamConfig {
            sample_rate,
            max_block_size: block,
            input_channels: channels,
            output_channels: channels,
        }
    }

    fn prepared(sample_rate: f32, block: usize, channels: usize) -> FlangerEngine {
        let mut engine = FlangerEngine::new(Arc::new(FlangerControls::new()));
        engine
            .prepare(stream(sample_rate, block, channels))
            .expect("valid configuration");
        engine
    }

    fn run(engine: &mut FlangerEngine, block: &mut [Vec<f32>]) {
        let mut channels: Vec<&mut [f32]> = block.iter_mut().map(Vec::as_mut_slice).collect();
        engine.process(&mut channels);
    }

    /// Feed a mono signal through in `block`-sized pieces, returning
    /// the concatenated output.
    fn run_mono(engine: &mut FlangerEngine, input: &[f32], block: usize) -> Vec<f32> {
        let mut output = Vec::with_capacity(input.len());
        for chunk in input.chunks(block) {
            let mut data = vec![chunk.to_vec()];
            run(engine, &mut data);
            output.extend_from_slice(&data[0]);
        }
        output
    }

    #[test]
    fn test_prepare_rejects_bad_configurations() {
        let mut engine = FlangerEngine::new(Arc::new(FlangerControls::new()));

        for rate in [0.0, -44100.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(
                engine.prepare(stream(rate, 64, 2)),
                Err(PrepareError::InvalidSampleRate(_))
            ));
        }
        assert_eq!(
            engine.prepare(stream(48000.0, 0, 2)),
            Err(PrepareError::ZeroBlockSize)
        );
        assert_eq!(
            engine.prepare(StreamConfig {
                sample_rate: 48000.0,
                max_block_size: 64,
                input_channels: 2,
                output_channels: 1,
            }),
            Err(PrepareError::MismatchedLayout {
                inputs: 2,
                outputs: 1
            })
        );
        assert_eq!(
            engine.prepare(stream(48000.0, 64, 0)),
            Err(PrepareError::UnsupportedChannelCount(0))
        );
        assert_eq!(
            engine.prepare(stream(48000.0, 64, 6)),
            Err(PrepareError::UnsupportedChannelCount(6))
        );
        assert_eq!(engine.state(), EngineState::Uninitialized);
    }

    #[test]
    fn test_prepare_sizes_buffers() {
        let engine = prepared(48000.0, 64, 2);

        assert_eq!(engine.state(), EngineState::Prepared);
        assert_eq!(engine.sample_rate(), 48000.0);
        assert_eq!(engine.num_channels(), 2);
        assert_eq!(engine.max_delay_samples(), 1200.0);
        assert_eq!(engine.history_capacity(), 144000);
        assert_eq!(engine.tail_samples(), 1200);
        assert!(engine.wet.iter().all(|w| w.len() == 64));
    }

    #[test]
    fn test_lifecycle() {
        let mut engine = prepared(48000.0, 16, 1);

        run(&mut engine, &mut [vec![0.0; 16]]);
        assert_eq!(engine.state(), EngineState::Processing);

        engine.release();
        assert_eq!(engine.state(), EngineState::Released);

        // Released: audio passes through untouched.
        let mut block = [vec![1.0_f32; 16]];
        run(&mut engine, &mut block);
        assert!(block[0].iter().all(|&s| s == 1.0));

        engine
            .prepare(stream(44100.0, 32, 1))
            .expect("re-prepare after release");
        assert_eq!(engine.state(), EngineState::Prepared);

        // Releasing twice, or before any prepare, is harmless.
        engine.release();
        engine.release();
        let mut fresh = FlangerEngine::new(Arc::new(FlangerControls::new()));
        fresh.release();
        assert_eq!(fresh.state(), EngineState::Released);
    }

    #[test]
    fn test_unprepared_engine_passes_audio_through() {
        let mut engine = FlangerEngine::new(Arc::new(FlangerControls::new()));
        let mut block = [vec![0.3_f32; 8], vec![-0.3_f32; 8]];
        run(&mut engine, &mut block);

        assert!(block[0].iter().all(|&s| s == 0.3));
        assert!(block[1].iter().all(|&s| s == -0.3));
    }

    /// With empty history the output is the dry input times 0.25.
    #[test]
    fn test_first_block_is_dry_times_output_gain() {
        let mut engine = prepared(48000.0, 64, 1);
        let mut block = [vec![0.0_f32; 64]];
        block[0][0] = 1.0;
        block[0][10] = -0.5;
        run(&mut engine, &mut block);

        assert_eq!(block[0][0], 0.25);
        assert_eq!(block[0][10], -0.125);
        assert!(block[0]
            .iter()
            .enumerate()
            .all(|(n, &s)| n == 0 || n == 10 || s == 0.0));
    }

    /// A stopped sine LFO bypasses depth and holds the delay at half the
    /// maximum: an impulse returns exactly 600 samples later at 48 kHz,
    /// scaled by feedback and output gain, and only once.
    #[test]
    fn test_stopped_lfo_gives_fixed_echo() {
        let controls = Arc::new(FlangerControls::new());
        controls.set_lfo_frequency(0.0);
        controls.set_lfo_shape(LfoShape::Sine);
        controls.set_feedback_gain(0.5);
        controls.set_depth_target(0.1); // ignored at 0 Hz

        let mut engine = FlangerEngine::new(controls);
        engine.prepare(stream(48000.0, 64, 1)).unwrap();

        let mut input = vec![0.0_f32; 64 * 40];
        input[0] = 1.0;
        let output = run_mono(&mut engine, &input, 64);

        assert_eq!(output[0], 0.25);
        assert!((output[600] - 0.125).abs() < 1e-6, "echo was {}", output[600]);
        for (n, &sample) in output.iter().enumerate() {
            if n != 0 && n != 600 {
                assert!(sample.abs() < 1e-6, "unexpected output {sample} at {n}");
            }
        }
    }

    /// 48 kHz, 64-sample blocks, feedback 0.5, depth 0.5, 1 Hz sawtooth.
    /// The delay grows by 1/80 sample per sample, so an impulse at
    /// sample 7900 is caught by the sweep at sample 8000, where the
    /// delay is exactly 100 samples.
    #[test]
    fn test_sawtooth_sweep_echo_position() {
        let controls = Arc::new(FlangerControls::new());
        controls.set_lfo_frequency(1.0);
        controls.set_lfo_shape(LfoShape::Sawtooth);
        controls.set_feedback_gain(0.5);
        controls.set_depth_target(0.5);

        let mut engine = FlangerEngine::new(controls);
        engine.prepare(stream(48000.0, 64, 1)).unwrap();

        let mut input = vec![0.0_f32; 12000];
        input[0] = 1.0;
        input[7900] = 1.0;
        let output = run_mono(&mut engine, &input, 64);

        assert_eq!(output[0], 0.25);
        assert_eq!(output[7900], 0.25);

        // 0.25 (output gain) * 0.5 (feedback) * 1.0 (impulse)
        assert!((output[8000] - 0.125).abs() < 1e-3, "echo was {}", output[8000]);

        // Neighbours only pick up a sliver through interpolation.
        assert!(output[7999].abs() < 0.01);
        assert!(output[8001].abs() < 0.01);
        for (n, &sample) in output.iter().enumerate().skip(1) {
            if n != 7900 && !(7999..=8001).contains(&n) {
                assert!(sample.abs() < 1e-6, "unexpected output {sample} at {n}");
            }
        }
    }

    /// In contrary motion channel 1 sweeps backwards from the same start.
    #[test]
    fn test_contrary_motion_mirrors_channels() {
        let controls = Arc::new(FlangerControls::new());
        controls.set_lfo_frequency(1.5);
        controls.set_contrary_motion(true);

        let mut engine = FlangerEngine::new(controls);
        engine.prepare(stream(48000.0, 128, 2)).unwrap();

        assert_eq!(engine.lfos[0].frequency(), 1.5);
        assert_eq!(engine.lfos[1].frequency(), -1.5);

        for _ in 0..50 {
            run(&mut engine, &mut [vec![0.0; 128], vec![0.0; 128]]);
            let sum = engine.lfos[0].phase() + engine.lfos[1].phase();
            assert!(
                sum.abs() < 1e-9 || (sum - 1.0).abs() < 1e-9,
                "phases not mirrored: {} and {}",
                engine.lfos[0].phase(),
                engine.lfos[1].phase()
            );
        }
    }

    /// Switching to sync runs every channel forwards from phase 0.
    #[test]
    fn test_switching_motion_realigns_channels() {
        let mut engine = prepared(48000.0, 64, 2);
        engine.set_lfo_frequency(2.0);
        run(&mut engine, &mut [vec![0.0; 64], vec![0.0; 64]]);

        engine.set_contrary_motion(false);
        run(&mut engine, &mut [vec![0.0; 64], vec![0.0; 64]]);

        assert_eq!(engine.lfos[0].frequency(), 2.0);
        assert_eq!(engine.lfos[1].frequency(), 2.0);
        assert_eq!(engine.lfos[0].phase(), engine.lfos[1].phase());
        assert!(engine.lfos[0].phase() > 0.0);
    }

    /// Any frequency change restarts every LFO at phase 0.
    #[test]
    fn test_frequency_change_resets_phase() {
        let mut engine = prepared(48000.0, 64, 2);
        for _ in 0..10 {
            run(&mut engine, &mut [vec![0.0; 64], vec![0.0; 64]]);
        }
        assert!(engine.lfos[0].phase() > 0.0);

        engine.set_lfo_frequency(2.5);
        run(&mut engine, &mut [Vec::new(), Vec::new()]);

        assert_eq!(engine.lfos[0].phase(), 0.0);
        assert_eq!(engine.lfos[1].phase(), 0.0);
        assert_eq!(engine.lfo_frequency(), 2.5);
    }

    /// A shape change keeps the sweep position.
    #[test]
    fn test_shape_change_keeps_phase() {
        let mut engine = prepared(48000.0, 64, 1);
        for _ in 0..10 {
            run(&mut engine, &mut [vec![0.0; 64]]);
        }
        let phase = engine.lfos[0].phase();

        engine.set_lfo_shape(LfoShape::Sine);
        run(&mut engine, &mut [Vec::new()]);

        assert_eq!(engine.lfos[0].shape(), LfoShape::Sine);
        assert_eq!(engine.lfos[0].phase(), phase);
        assert_eq!(engine.lfo_shape(), LfoShape::Sine);
    }

    /// Depth glides over three seconds rather than jumping.
    #[test]
    fn test_depth_ramps_over_three_seconds() {
        let mut engine = prepared(48000.0, 64, 1);
        assert_eq!(engine.depths[0].current_value(), 0.5);

        engine.set_depth_target(1.0);
        run(&mut engine, &mut [vec![0.0; 64]]);

        let expected = 0.5 + 64.0 * (0.5 / 144000.0);
        assert!((engine.depths[0].current_value() - expected).abs() < 1e-5);
        assert!(engine.depths[0].is_smoothing());
        assert_eq!(engine.depth_target(), 1.0);

        // 144000 samples after the change the ramp is done.
        for _ in 0..(144000 / 64 - 1) {
            run(&mut engine, &mut [vec![0.0; 64]]);
        }
        assert_eq!(engine.depths[0].current_value(), 1.0);
        assert!(!engine.depths[0].is_smoothing());
    }

    /// While the LFO is stopped the depth ramp doesn't advance.
    #[test]
    fn test_zero_frequency_freezes_depth() {
        let mut engine = prepared(48000.0, 64, 1);
        engine.set_lfo_frequency(0.0);
        engine.set_depth_target(0.9);

        for _ in 0..100 {
            run(&mut engine, &mut [vec![0.0; 64]]);
        }
        assert_eq!(engine.depths[0].current_value(), 0.5);
        assert!(engine.depths[0].is_smoothing());
    }

    /// A host block bigger than promised gives the same result as the
    /// same audio delivered in promised-size pieces.
    #[test]
    fn test_oversized_blocks_match_split_blocks() {
        let input: Vec<f32> = (0..1000).map(|n| (n as f32 * 0.05).sin()).collect();

        let mut split = prepared(48000.0, 64, 1);
        split.set_lfo_frequency(3.0);
        let mut expected = Vec::new();
        for chunk in input.chunks(200) {
            expected.extend(run_mono(&mut split, chunk, 64));
        }

        let mut oversized = prepared(48000.0, 64, 1);
        oversized.set_lfo_frequency(3.0);
        let actual = run_mono(&mut oversized, &input, 200);

        assert_eq!(expected, actual);
    }

    /// Once the delay is longer than a block, how the host slices the
    /// stream makes no difference to the output.
    #[test]
    fn test_block_slicing_is_transparent_for_long_delays() {
        let controls = Arc::new(FlangerControls::new());
        controls.set_lfo_frequency(0.0);
        controls.set_lfo_shape(LfoShape::Sine); // fixed 551.25-sample delay

        let input: Vec<f32> = (0..3000).map(|n| (n as f32 * 0.01).cos()).collect();

        let mut reference = FlangerEngine::new(Arc::clone(&controls));
        reference.prepare(stream(44100.0, 128, 1)).unwrap();
        let expected = run_mono(&mut reference, &input, 1);

        let mut engine = FlangerEngine::new(controls);
        engine.prepare(stream(44100.0, 128, 1)).unwrap();
        let mut output = Vec::new();
        let mut start = 0;
        for size in [7, 128, 33, 1, 90].iter().cycle() {
            if start >= input.len() {
                break;
            }
            let end = (start + size).min(input.len());
            output.extend(run_mono(&mut engine, &input[start..end], 128));
            start = end;
        }

        assert_eq!(expected, output);
    }

    /// Channels the engine wasn't prepared for pass through.
    #[test]
    fn test_extra_channels_untouched() {
        let mut engine = prepared(48000.0, 16, 1);
        let mut block = [vec![0.5_f32; 16], vec![0.5_f32; 16]];
        run(&mut engine, &mut block);

        assert!(block[0].iter().all(|&s| s == 0.125));
        assert!(block[1].iter().all(|&s| s == 0.5));
    }

    /// After a reset the old audio is gone.
    #[test]
    fn test_reset_forgets_history() {
        let controls = Arc::new(FlangerControls::new());
        controls.set_lfo_frequency(0.0);
        controls.set_lfo_shape(LfoShape::Sine);

        let mut engine = FlangerEngine::new(controls);
        engine.prepare(stream(48000.0, 64, 1)).unwrap();

        let mut input = vec![0.0_f32; 64 * 5];
        input[0] = 1.0;
        run_mono(&mut engine, &input, 64);

        engine.reset();
        let output = run_mono(&mut engine, &vec![0.0; 64 * 20], 64);
        assert!(output.iter().all(|&s| s == 0.0));
    }

    /// Full-scale noise at the most extreme settings stays finite and
    /// within 0.25 * (1 + 0.99).
    #[test]
    fn test_output_bounded_at_extremes() {
        let controls = Arc::new(FlangerControls::new());
        controls.set_lfo_frequency(3.0);
        controls.set_feedback_gain(0.99);
        controls.set_depth_target(1.0);

        let mut engine = FlangerEngine::new(controls);
        engine.prepare(stream(44100.0, 256, 2)).unwrap();

        // Deterministic pseudo-noise in [-1, 1].
        let mut seed = 0x1234_5678_u32;
        let mut noise = || {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            (seed as f32 / u32::MAX as f32) * 2.0 - 1.0
        };

        for _ in 0..400 {
            let mut block = [
                (0..256).map(|_| noise()).collect::<Vec<f32>>(),
                (0..256).map(|_| noise()).collect::<Vec<f32>>(),
            ];
            run(&mut engine, &mut block);
            for sample in block.iter().flatten() {
                assert!(sample.is_finite());
                assert!(sample.abs() <= 0.25 * 1.99 + 1e-6, "sample {sample} out of range");
            }
        }
    }
}

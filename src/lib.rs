//! # Loveless Flanger: An AU/VST3/CLAP Flanger Plugin
//!
//! A flanger built with [nih-plug](https://github.com/robbert-vdh/nih-plug)
//! for learning DSP fundamentals. The same codebase exports Audio Unit
//! (AUv2), VST3 and CLAP.
//!
//! A flanger mixes a signal with a copy of itself delayed by a few
//! milliseconds, while a low-frequency oscillator (LFO) keeps sliding
//! that delay back and forth. The result is a comb filter whose notches
//! sweep up and down the spectrum.
//!
//! ## Signal Flow
//!
//! ```text
//!             ┌──► [LFO] ──► × depth ──► delay time (0–25 ms)
//!             │                              │
//!             │                              ▼
//! Input ──┬───┼──► [History Ring Buffer] ──► interpolated read ──► × feedback ──┐
//!         │   │      (written with dry                                         │
//!         │   │       input after reads)                                       │
//!         │                                                                    ▼
//!         └──────────────────────────────────────────────────────────────────►(+)──► × 0.25 ──► Output
//! ```
//!
//! ## Layout
//!
//! - [`dsp`]: the oscillator, the linear smoother and the ring buffer.
//! - [`engine`]: the block processor that ties them together.
//! - [`controls`]: lock-free parameter cells the engine reads per block.
//! - `params`: the host-facing parameter set.

pub mod controls;
pub mod dsp;
pub mod engine;
mod params;

use std::num::NonZeroU32;
use std::sync::Arc;

use controls::FlangerControls;
use engine::{FlangerEngine, StreamConfig};
use nih_plug::prelude::*;
use params::FlangerParams;

/// The main plugin struct.
///
/// Parameters (`FlangerParams`) are shared with the host and may be
/// read from any thread. The engine and everything inside it belong to
/// the audio thread and are only touched in `initialize()`, `reset()`,
/// `process()` and `deactivate()`.
struct LovelessFlanger {
    params: Arc<FlangerParams>,
    engine: FlangerEngine,
}

impl Default for LovelessFlanger {
    fn default() -> Self {
        Self {
            params: Arc::new(FlangerParams::default()),
            // Nothing is allocated until initialize() tells us the
            // sample rate, block size and channel count.
            engine: FlangerEngine::new(Arc::new(FlangerControls::new())),
        }
    }
}

impl LovelessFlanger {
    /// Copy the host's parameter values into the engine's controls.
    ///
    /// The engine only reacts to values that actually changed, so calling
    /// this every block is cheap and doesn't restart the LFO or the
    /// depth ramp.
    fn sync_controls(&self) {
        let controls = self.engine.controls();
        controls.set_lfo_frequency(self.params.lfo_frequency.value());
        controls.set_feedback_gain(self.params.feedback.value());
        controls.set_depth_target(self.params.depth.value());
        controls.set_lfo_shape(self.params.lfo_shape.value());
        controls.set_contrary_motion(self.params.motion.value().is_contrary());
    }
}

impl Plugin for LovelessFlanger {
    const NAME: &'static str = "Loveless Flanger";
    const VENDOR: &'static str = "Loveless Audio";
    const URL: &'static str = "";
    const EMAIL: &'static str = "steve.loveless@gmail.com";
    const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    // Stereo first since most DAW tracks are stereo. Input and output
    // always match.
    const AUDIO_IO_LAYOUTS: &'static [AudioIOLayout] = &[
        AudioIOLayout {
            main_input_channels: NonZeroU32::new(2),
            main_output_channels: NonZeroU32::new(2),
            aux_input_ports: &[],
            aux_output_ports: &[],
            names: PortNames::const_default(),
        },
        AudioIOLayout {
            main_input_channels: NonZeroU32::new(1),
            main_output_channels: NonZeroU32::new(1),
            aux_input_ports: &[],
            aux_output_ports: &[],
            names: PortNames::const_default(),
        },
    ];

    const MIDI_INPUT: MidiConfig = MidiConfig::None;

    // The engine reads its controls once per block, so splitting blocks
    // at automation points is what makes automation land on time.
    const SAMPLE_ACCURATE_AUTOMATION: bool = true;

    type SysExMessage = ();
    type BackgroundTask = ();

    fn params(&self) -> Arc<dyn Params> {
        self.params.clone()
    }

    /// Size the history buffer, oscillators and scratch blocks for the
    /// host's configuration.
    ///
    /// Returning `false` tells the host this configuration can't be used.
    fn initialize(
        &mut self,
        audio_io_layout: &AudioIOLayout,
        buffer_config: &BufferConfig,
        _context: &mut impl InitContext<Self>,
    ) -> bool {
        let config = StreamConfig {
            sample_rate: buffer_config.sample_rate,
            max_block_size: buffer_config.max_buffer_size as usize,
            input_channels: channel_count(audio_io_layout.main_input_channels),
            output_channels: channel_count(audio_io_layout.main_output_channels),
        };

        // Start from the restored preset rather than the defaults.
        self.sync_controls();

        match self.engine.prepare(config) {
            Ok(()) => true,
            Err(err) => {
                nih_error!("Cannot initialize the flanger: {err}");
                false
            }
        }
    }

    /// Called when playback stops. Clears the history so old audio
    /// doesn't echo into the next take, and restarts the sweep.
    fn reset(&mut self) {
        self.engine.reset();
    }

    fn deactivate(&mut self) {
        self.engine.release();
    }

    fn process(
        &mut self,
        buffer: &mut Buffer,
        _aux: &mut AuxiliaryBuffers,
        _context: &mut impl ProcessContext<Self>,
    ) -> ProcessStatus {
        self.sync_controls();
        self.engine.process(buffer.as_slice());

        // Nothing recirculates, so the tail is a single maximum-length
        // echo.
        ProcessStatus::Tail(self.engine.tail_samples())
    }
}

fn channel_count(channels: Option<NonZeroU32>) -> usize {
    channels.map_or(0, |c| c.get() as usize)
}

// ─────────────────────────────────────────────────────────────────────
// Plugin format trait implementations
// ─────────────────────────────────────────────────────────────────────

impl ClapPlugin for LovelessFlanger {
    const CLAP_ID: &'static str = "com.loveless-audio.loveless-flanger-v1";
    const CLAP_DESCRIPTION: Option<&'static str> =
        Some("A flanger with sine/saw LFO and contrary stereo motion, built for learning DSP");
    const CLAP_MANUAL_URL: Option<&'static str> = None;
    const CLAP_SUPPORT_URL: Option<&'static str> = None;
    const CLAP_FEATURES: &'static [ClapFeature] = &[
        ClapFeature::AudioEffect,
        ClapFeature::Stereo,
        ClapFeature::Mono,
        ClapFeature::Flanger,
    ];
}

impl Vst3Plugin for LovelessFlanger {
    // 16 ASCII bytes, unique to this plugin.
    const VST3_CLASS_ID: [u8; 16] = *b"LvlssFlangr__v01";

    const VST3_SUBCATEGORIES: &'static [Vst3SubCategory] =
        &[Vst3SubCategory::Fx, Vst3SubCategory::Modulation];
}

// ─────────────────────────────────────────────────────────────────────
// Export macros
// ─────────────────────────────────────────────────────────────────────
//
// nih_export_clap! exports `clap_entry` for CLAP hosts and
// nih_export_vst3! exports `GetPluginFactory` for VST3 hosts.
// clap_wrapper re-exports the CLAP entry point as an AUv2 component for
// Logic Pro.

nih_export_clap!(LovelessFlanger);
nih_export_vst3!(LovelessFlanger);

clap_wrapper::export_auv2!();

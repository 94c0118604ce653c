//! # Plugin Parameters
//!
//! The knobs and menus the DAW shows for the flanger. Each parameter has
//! a **stable string ID** (`#[id = "..."]`) that the host uses to save
//! and recall presets, so once published these IDs must never change.
//!
//! None of these carry a `SmoothingStyle`: the engine ramps depth
//! itself, and the other controls restart the sweep or are discrete.
//!
//! The plugin copies these values into the engine's
//! [`FlangerControls`](crate::controls::FlangerControls) at the start
//! of every block.

use nih_plug::prelude::*;

use crate::controls::{
    DEFAULT_CONTRARY_MOTION, DEFAULT_DEPTH, DEFAULT_FEEDBACK_GAIN, DEFAULT_LFO_FREQUENCY,
    DEFAULT_LFO_SHAPE, DEPTH_RANGE, FEEDBACK_GAIN_RANGE, LFO_FREQUENCY_RANGE,
};
use crate::dsp::oscillator::LfoShape;

/// How the channels' sweeps relate to each other.
#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StereoMotion {
    /// The right channel sweeps in mirror image of the left.
    #[id = "contrary"]
    #[name = "Contrary"]
    Contrary,

    /// Every channel sweeps together.
    #[id = "sync"]
    #[name = "Sync"]
    Sync,
}

impl StereoMotion {
    pub fn is_contrary(self) -> bool {
        self == StereoMotion::Contrary
    }
}

/// All user-facing parameters for the Loveless Flanger.
#[derive(Params)]
pub struct FlangerParams {
    /// **Rate**: how fast the sweep moves, 0–3 Hz.
    ///
    /// At exactly 0 Hz the sweep stops and the flanger becomes a fixed
    /// comb filter. Depth is ignored in that position.
    #[id = "rate"]
    pub lfo_frequency: FloatParam,

    /// **Feedback**: level of the delayed copy mixed back with the dry
    /// signal. Shown as 0–99%, stored as a gain of 0.0–0.99.
    #[id = "fdbk"]
    pub feedback: FloatParam,

    /// **Depth**: how much of the 25 ms maximum delay the sweep covers.
    #[id = "depth"]
    pub depth: FloatParam,

    /// **LFO Shape**: sine for a smooth up-and-down sweep, saw for a
    /// rising sweep that snaps back.
    #[id = "shape"]
    pub lfo_shape: EnumParam<LfoShape>,

    /// **Motion**: mirror the sweep between stereo channels, or keep
    /// them in step.
    #[id = "motion"]
    pub motion: EnumParam<StereoMotion>,
}

impl Default for FlangerParams {
    fn default() -> Self {
        Self {
            lfo_frequency: FloatParam::new(
                "Rate",
                DEFAULT_LFO_FREQUENCY,
                FloatRange::Linear {
                    min: LFO_FREQUENCY_RANGE.0,
                    max: LFO_FREQUENCY_RANGE.1,
                },
            )
            .with_unit(" Hz")
            .with_step_size(0.01)
            .with_value_to_string(formatters::v2s_f32_rounded(2)),

            feedback: FloatParam::new(
                "Feedback",
                DEFAULT_FEEDBACK_GAIN,
                FloatRange::Linear {
                    min: FEEDBACK_GAIN_RANGE.0,
                    max: FEEDBACK_GAIN_RANGE.1,
                },
            )
            .with_unit("%")
            .with_step_size(0.01)
            .with_value_to_string(formatters::v2s_f32_percentage(0))
            .with_string_to_value(formatters::s2v_f32_percentage()),

            depth: FloatParam::new(
                "Depth",
                DEFAULT_DEPTH,
                FloatRange::Linear {
                    min: DEPTH_RANGE.0,
                    max: DEPTH_RANGE.1,
                },
            )
            .with_unit("%")
            .with_step_size(0.01)
            .with_value_to_string(formatters::v2s_f32_percentage(0))
            .with_string_to_value(formatters::s2v_f32_percentage()),

            lfo_shape: EnumParam::new("LFO Shape", DEFAULT_LFO_SHAPE),

            motion: EnumParam::new(
                "Motion",
                if DEFAULT_CONTRARY_MOTION {
                    StereoMotion::Contrary
                } else {
                    StereoMotion::Sync
                },
            ),
        }
    }
}

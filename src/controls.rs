//! # Flanger Controls
//!
//! The values the user can change while audio is running. They are
//! written from whichever thread the host delivers parameter changes on
//! and read by the audio thread once per block.
//!
//! Every control is its own atomic cell holding a plain number, so a
//! reader always sees either the old or the new value of each control,
//! never half of one. Floats are stored as their bit patterns in an
//! `AtomicU32`. Nothing here locks or allocates.
//!
//! Ordering between *different* controls isn't guaranteed (a reader
//! may see a new frequency with an old depth), which is fine: each
//! control is applied independently.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

use crate::dsp::oscillator::LfoShape;

/// Slowest and fastest LFO rates, in Hz.
pub const LFO_FREQUENCY_RANGE: (f32, f32) = (0.0, 3.0);

/// Feedback gain is capped just under unity.
pub const FEEDBACK_GAIN_RANGE: (f32, f32) = (0.0, 0.99);

/// Depth is a fraction of the maximum delay time.
pub const DEPTH_RANGE: (f32, f32) = (0.0, 1.0);

pub const DEFAULT_LFO_FREQUENCY: f32 = 0.25;
pub const DEFAULT_FEEDBACK_GAIN: f32 = 0.85;
pub const DEFAULT_DEPTH: f32 = 0.5;
pub const DEFAULT_LFO_SHAPE: LfoShape = LfoShape::Sawtooth;
pub const DEFAULT_CONTRARY_MOTION: bool = true;

/// Lock-free parameter cells shared between the host and the engine.
#[derive(Debug)]
pub struct FlangerControls {
    lfo_frequency: AtomicU32,
    feedback_gain: AtomicU32,
    depth_target: AtomicU32,
    lfo_shape: AtomicU8,
    contrary_motion: AtomicBool,
}

/// All controls read at one instant. Each field is individually
/// consistent; see the module docs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlSnapshot {
    pub lfo_frequency: f32,
    pub feedback_gain: f32,
    pub depth_target: f32,
    pub lfo_shape: LfoShape,
    pub contrary_motion: bool,
}

impl Default for FlangerControls {
    fn default() -> Self {
        Self {
            lfo_frequency: AtomicU32::new(DEFAULT_LFO_FREQUENCY.to_bits()),
            feedback_gain: AtomicU32::new(DEFAULT_FEEDBACK_GAIN.to_bits()),
            depth_target: AtomicU32::new(DEFAULT_DEPTH.to_bits()),
            lfo_shape: AtomicU8::new(shape_to_bits(DEFAULT_LFO_SHAPE)),
            contrary_motion: AtomicBool::new(DEFAULT_CONTRARY_MOTION),
        }
    }
}

impl FlangerControls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the LFO rate, clamped to 0–3 Hz. Non-finite values are ignored.
    pub fn set_lfo_frequency(&self, hz: f32) {
        store_clamped(&self.lfo_frequency, hz, LFO_FREQUENCY_RANGE);
    }

    /// Set the gain applied to the delayed copy, clamped to 0–0.99.
    /// Non-finite values are ignored.
    pub fn set_feedback_gain(&self, gain: f32) {
        store_clamped(&self.feedback_gain, gain, FEEDBACK_GAIN_RANGE);
    }

    /// Set the depth the engine ramps toward, clamped to 0–1.
    /// Non-finite values are ignored.
    pub fn set_depth_target(&self, depth: f32) {
        store_clamped(&self.depth_target, depth, DEPTH_RANGE);
    }

    pub fn set_lfo_shape(&self, shape: LfoShape) {
        self.lfo_shape.store(shape_to_bits(shape), Ordering::Relaxed);
    }

    /// `true` mirrors the sweep between channels, `false` keeps every
    /// channel sweeping in sync.
    pub fn set_contrary_motion(&self, enabled: bool) {
        self.contrary_motion.store(enabled, Ordering::Relaxed);
    }

    pub fn lfo_frequency(&self) -> f32 {
        f32::from_bits(self.lfo_frequency.load(Ordering::Relaxed))
    }

    pub fn feedback_gain(&self) -> f32 {
        f32::from_bits(self.feedback_gain.load(Ordering::Relaxed))
    }

    pub fn depth_target(&self) -> f32 {
        f32::from_bits(self.depth_target.load(Ordering::Relaxed))
    }

    pub fn lfo_shape(&self) -> LfoShape {
        shape_from_bits(self.lfo_shape.load(Ordering::Relaxed))
    }

    pub fn contrary_motion(&self) -> bool {
        self.contrary_motion.load(Ordering::Relaxed)
    }

    /// Read every control once.
    pub fn snapshot(&self) -> ControlSnapshot {
        ControlSnapshot {
            lfo_frequency: self.lfo_frequency(),
            feedback_gain: self.feedback_gain(),
            depth_target: self.depth_target(),
            lfo_shape: self.lfo_shape(),
            contrary_motion: self.contrary_motion(),
        }
    }
}

fn store_clamped(cell: &AtomicU32, value: f32, (min, max): (f32, f32)) {
    if value.is_finite() {
        cell.store(value.clamp(min, max).to_bits(), Ordering::Relaxed);
    }
}

fn shape_to_bits(shape: LfoShape) -> u8 {
    match shape {
        LfoShape::Sine => 0,
        LfoShape::Sawtooth => 1,
    }
}

fn shape_from_bits(bits: u8) -> LfoShape {
    match bits {
        0 => LfoShape::Sine,
        _ => LfoShape::Sawtooth,
    }
}

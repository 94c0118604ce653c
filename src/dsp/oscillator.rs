//! # Low-Frequency Oscillator (LFO)
//!
//! The LFO is what turns a plain short delay into a flanger. It slowly
//! sweeps the delay time up and down, and as the delay moves the comb
//! filter notches created by mixing the signal with its delayed copy
//! slide through the spectrum: the classic "jet plane" whoosh.
//!
//! ## Phase Accumulation
//!
//! The oscillator keeps a single number, its **phase**, which runs from
//! 0.0 to 1.0 once per cycle. Every sample it moves forward by
//!
//! ```text
//! increment = frequency / sample_rate
//! ```
//!
//! and wraps back into `[0, 1)`. A 1 Hz LFO at 48 kHz therefore moves by
//! 1/48000 per sample and completes one cycle per second.
//!
//! A **negative** frequency simply makes the phase run backwards. The
//! waveform is the same, played in reverse. The flanger uses this for
//! stereo "contrary motion": the right channel's sweep mirrors the left's.
//!
//! ## Output Range
//!
//! Both shapes produce a **unipolar** value in `[0.0, 1.0]`, because the
//! output is multiplied straight into a delay time and a delay can't be
//! negative:
//!
//! ```text
//! Sine:     0.5 * (1 + sin(2π * phase))
//! Sawtooth: phase                          (ramps 0 → 1, then drops)
//! ```
//!
//! The phase is kept in `f64`. At 48 kHz a 0.01 Hz LFO has an increment
//! around 2e-7, which an `f32` accumulator can't add to a phase near 1.0
//! without losing most of its bits.

use std::f64::consts::TAU;

use nih_plug::prelude::Enum;

/// The waveform the LFO produces.
#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LfoShape {
    /// A smooth, symmetric sweep up and down.
    #[id = "sine"]
    #[name = "Sine"]
    Sine,

    /// A slow rise followed by an instant reset, giving a one-directional
    /// sweep that repeats.
    #[id = "saw"]
    #[name = "Saw"]
    Sawtooth,
}

impl LfoShape {
    /// Evaluate this shape at `phase` (expected in `[0, 1)`).
    fn evaluate(self, phase: f64) -> f32 {
        match self {
            LfoShape::Sine => (0.5 * (1.0 + (TAU * phase).sin())) as f32,
            LfoShape::Sawtooth => phase as f32,
        }
    }
}

/// A phase-accumulating oscillator running at sub-audio rates.
#[derive(Debug, Clone)]
pub struct Lfo {
    shape: LfoShape,

    /// Current position in the cycle, always in `[0, 1)`.
    phase: f64,

    /// Phase change per sample. Negative when the frequency is negative.
    increment: f64,

    /// Signed frequency in Hz, kept so the increment can be recomputed
    /// when the sample rate changes.
    frequency: f32,

    sample_rate: f32,
}

impl Lfo {
    /// Create a sawtooth LFO at 0 Hz with phase 0.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            shape: LfoShape::Sawtooth,
            phase: 0.0,
            increment: 0.0,
            frequency: 0.0,
            sample_rate,
        }
    }

    pub fn set_shape(&mut self, shape: LfoShape) {
        self.shape = shape;
    }

    pub fn shape(&self) -> LfoShape {
        self.shape
    }

    /// Set the LFO frequency in Hz.
    ///
    /// The sign only picks the direction the phase travels; the
    /// magnitude sets the rate. At exactly 0 Hz the phase stops and the
    /// output holds the value at the current phase.
    pub fn set_frequency(&mut self, hz: f32) {
        self.frequency = hz;
        self.update_increment();
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Jump to a position in the cycle. Values outside `[0, 1)` are
    /// wrapped, so `-0.25` and `0.75` are the same point.
    pub fn set_phase(&mut self, phase: f64) {
        self.phase = wrap_phase(phase);
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Change the sample rate, keeping the current frequency.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.update_increment();
    }

    /// Produce the output at the current phase, then advance one sample.
    ///
    /// The very first call after `set_phase(0.0)` returns the waveform's
    /// value at phase 0 (0.5 for sine, 0.0 for sawtooth).
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let output = self.shape.evaluate(self.phase);
        self.phase = wrap_phase(self.phase + self.increment);
        output
    }

    fn update_increment(&mut self) {
        self.increment = if self.sample_rate > 0.0 {
            f64::from(self.frequency) / f64::from(self.sample_rate)
        } else {
            0.0
        };
    }
}

/// Wrap a phase into `[0, 1)`.
///
/// `rem_euclid` can round a tiny negative input up to exactly 1.0, so the
/// result is folded once more to keep the upper bound exclusive.
#[inline]
fn wrap_phase(phase: f64) -> f64 {
    let wrapped = phase.rem_euclid(1.0);
    if wrapped >= 1.0 {
        wrapped - 1.0
    } else {
        wrapped
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────

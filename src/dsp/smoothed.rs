//! # Smoothed Value (Linear Ramp)
//!
//! When the user drags the depth control from 20% to 80%, jumping there
//! in one sample would yank the delay time and produce an audible click.
//! A smoothed value instead walks from where it is toward the new target
//! in equal steps spread over a fixed ramp time.
//!
//! The stepping itself is nih-plug's [`Smoother`] with
//! [`SmoothingStyle::Linear`], the same smoother that backs a
//! `FloatParam`'s `.smoothed` field. This wrapper gives it the shape the
//! engine wants: the ramp time and sample rate are configured once in
//! [`reset`](SmoothedValue::reset), and targets are plain values.
//!
//! ## Resmoothing Policy
//!
//! The ramp always takes the **full** configured duration, measured from
//! the moment the target changes:
//!
//! ```text
//! steps     = round(ramp_seconds * sample_rate)
//! increment = (target - current) / steps
//! ```
//!
//! If a new target arrives halfway through a ramp, the increment is
//! recomputed from the *current* value over the full number of steps
//! again, rather than squeezing into whatever time was left. Rapid knob
//! movements therefore always glide at a predictable speed. The last
//! step lands exactly on the target.

use nih_plug::prelude::{Smoother, SmoothingStyle};

/// A scalar that ramps linearly toward its target.
pub struct SmoothedValue {
    smoother: Smoother<f32>,

    /// Kept here so repeated targets can be recognised and skipped.
    target: f32,

    sample_rate: f32,

    /// `false` until `reset()` configures a ramp of at least one step.
    ramping: bool,
}

impl SmoothedValue {
    /// Create a value resting at `initial`. Until [`reset`](Self::reset)
    /// configures a ramp time, target changes apply instantly.
    pub fn new(initial: f32) -> Self {
        let smoother = Smoother::none();
        smoother.reset(initial);
        Self {
            smoother,
            target: initial,
            sample_rate: 0.0,
            ramping: false,
        }
    }

    /// Configure the ramp duration and snap the current value to the
    /// target, cancelling any ramp in progress.
    pub fn reset(&mut self, sample_rate: f32, ramp_seconds: f32) {
        let steps = (f64::from(ramp_seconds) * f64::from(sample_rate)).round();
        self.ramping = steps.is_finite() && steps >= 1.0;
        self.sample_rate = sample_rate;
        self.smoother = if self.ramping {
            Smoother::new(SmoothingStyle::Linear(ramp_seconds * 1000.0))
        } else {
            Smoother::none()
        };
        self.set_current_and_target_value(self.target);
    }

    /// Jump straight to `value` with no ramp.
    pub fn set_current_and_target_value(&mut self, value: f32) {
        self.target = value;
        self.smoother.reset(value);
    }

    /// Start ramping toward `value` from wherever the value is now.
    ///
    /// Setting the target it already has is a no-op, so callers may
    /// repeat the same target without restarting the ramp.
    pub fn set_target_value(&mut self, value: f32) {
        if value == self.target {
            return;
        }
        if !self.ramping {
            self.set_current_and_target_value(value);
            return;
        }

        self.target = value;
        self.smoother.set_target(self.sample_rate, value);
    }

    /// Advance one step and return the new current value.
    #[inline]
    pub fn next_value(&mut self) -> f32 {
        self.smoother.next()
    }

    pub fn current_value(&self) -> f32 {
        self.smoother.previous_value()
    }

    pub fn target_value(&self) -> f32 {
        self.target
    }

    pub fn is_smoothing(&self) -> bool {
        self.smoother.is_smoothing()
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────

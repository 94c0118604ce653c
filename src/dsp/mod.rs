//! # DSP (Digital Signal Processing) Primitives
//!
//! The building blocks the flanger engine is assembled from:
//!
//! - **`oscillator`**: a phase-accumulating low-frequency oscillator
//!   (sine or sawtooth) that sweeps the delay time.
//!
//! - **`smoothed`**: a linear ramp that glides a value toward its target
//!   so parameter changes don't click.
//!
//! - **`ring_buffer`**: multi-channel circular audio history with
//!   block writes and fractional, interpolated reads.

pub mod oscillator;
pub mod ring_buffer;
pub mod smoothed;

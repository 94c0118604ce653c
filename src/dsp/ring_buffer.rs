//! # Ring Buffer (Multi-Channel Audio History)
//!
//! The flanger needs to look a few milliseconds into the past of every
//! channel, at positions that move every sample. This module keeps that
//! past: one fixed-length circular buffer per channel, all sharing a
//! single write cursor.
//!
//! ## Block Writes
//!
//! Unlike a sample-at-a-time delay line, the history is fed one whole
//! host block at a time. The capacity is rounded to a whole number of
//! blocks, so a block write normally lands on a block boundary and never
//! needs more than one split at the end of the buffer:
//!
//! ```text
//! capacity = 8, block = 4, write cursor = 6, writing [a b c d]
//!
//!   index:   0   1   2   3   4   5   6   7
//!          [ c   d   .   .   .   .   a   b ]
//!            └─2nd─┘                 └─1st─┘
//!
//! cursor afterwards = (6 + 4) % 8 = 2
//! ```
//!
//! Blocks shorter than the configured size (hosts may send those) simply
//! leave the cursor off a block boundary. The split logic handles that
//! too.
//!
//! ## Read Old, Then Write New
//!
//! Reads are made *before* the block is written. A read for sample
//! `offset` of the incoming block looks back from the slot that sample
//! is about to occupy:
//!
//! ```text
//! read_position = write_cursor + offset - delay
//! ```
//!
//! Slots at or after the write cursor hold the oldest history, not the
//! current block, so the lookback `delay - offset` is clamped to
//! `[1, capacity]`. A delay of 0 thus returns the most recently written
//! sample, and no read can ever see stale data through the cursor.
//!
//! ## Interpolation
//!
//! For a delay of `d + f` (integer `d`, fraction `f`) the two neighbours
//! are the sample `d` back and the one `d + 1` back:
//!
//! ```text
//! result = newer * (1 - f) + older * f
//! ```
//!
//! Neighbour indices are computed modulo the capacity, so the pair may
//! straddle the end of the buffer without skipping or repeating a sample.

use std::ops::Range;

/// Fixed-capacity circular storage for the last `capacity` samples of
/// every channel.
pub struct RingBuffer {
    /// One buffer per channel, each exactly `capacity` samples long.
    channels: Vec<Vec<f32>>,

    /// Number of samples each channel retains. A whole number of host
    /// blocks, or 0 before [`set_size`](Self::set_size).
    capacity: usize,

    /// Slot the next written sample goes into. Shared by all channels.
    write_pos: usize,
}

impl RingBuffer {
    /// Create an empty buffer. Nothing can be stored until
    /// [`set_size`](Self::set_size) is called; reads return silence.
    pub fn new() -> Self {
        Self {
            channels: Vec::new(),
            capacity: 0,
            write_pos: 0,
        }
    }

    /// (Re)allocate storage for `num_channels` channels holding roughly
    /// `duration_seconds` of audio, rounded to the nearest whole number
    /// of `block_size` blocks (at least one block).
    ///
    /// Returns the resulting capacity in samples. This allocates, so it
    /// belongs in stream setup, never on the audio thread. Contents are
    /// not cleared; call [`init`](Self::init) afterwards.
    pub fn set_size(
        &mut self,
        num_channels: usize,
        duration_seconds: f32,
        sample_rate: f32,
        block_size: usize,
    ) -> usize {
        let block_size = block_size.max(1);
        let wanted = f64::from(duration_seconds) * f64::from(sample_rate);
        let blocks = (wanted / block_size as f64).round();
        let blocks = if blocks.is_finite() && blocks >= 1.0 {
            blocks as usize
        } else {
            1
        };

        self.capacity = blocks * block_size;
        self.channels.resize_with(num_channels, Vec::new);
        for channel in &mut self.channels {
            channel.resize(self.capacity, 0.0);
        }
        self.write_pos = 0;

        self.capacity
    }

    /// Fill every channel with silence and move the cursor to slot 0.
    pub fn init(&mut self) {
        for channel in &mut self.channels {
            channel.fill(0.0);
        }
        self.write_pos = 0;
    }

    /// Append a whole block (every sample of every channel).
    pub fn write<S: AsRef<[f32]>>(&mut self, block: &[S]) {
        let len = block.first().map_or(0, |c| c.as_ref().len());
        self.write_frames(block, 0..len);
    }

    /// Append the samples in `frames` of every channel in `block`.
    ///
    /// Channels the buffer has but `block` lacks are written as silence
    /// so all channels stay aligned with the shared cursor. If `frames`
    /// is longer than the capacity only its newest `capacity` samples are
    /// kept, but the cursor still advances by the full length.
    pub fn write_frames<S: AsRef<[f32]>>(&mut self, block: &[S], frames: Range<usize>) {
        let capacity = self.capacity;
        let len = frames.len();
        if capacity == 0 || len == 0 {
            return;
        }

        let skip = len.saturating_sub(capacity);
        let start = (self.write_pos + skip) % capacity;
        let kept = len - skip;
        let first = (capacity - start).min(kept);

        for (idx, dst) in self.channels.iter_mut().enumerate() {
            match block.get(idx).and_then(|c| c.as_ref().get(frames.clone())) {
                Some(src) => {
                    let src = &src[skip..];
                    dst[start..start + first].copy_from_slice(&src[..first]);
                    dst[..kept - first].copy_from_slice(&src[first..]);
                }
                None => {
                    dst[start..start + first].fill(0.0);
                    dst[..kept - first].fill(0.0);
                }
            }
        }

        self.write_pos = (self.write_pos + len) % capacity;
    }

    /// Read `channel`'s history `delay_samples` before sample `offset` of
    /// the block about to be written, with linear interpolation.
    ///
    /// The lookback `delay_samples - offset` is clamped to
    /// `[1, capacity]`: anything newer returns the most recent stored
    /// sample, anything older (`+inf` included) returns the oldest. NaN
    /// reads the most recent sample. Unknown channels read silence.
    #[inline]
    pub fn read_interp_sample(&self, channel: usize, offset: usize, delay_samples: f32) -> f32 {
        let capacity = self.capacity;
        let Some(data) = self.channels.get(channel) else {
            return 0.0;
        };
        if capacity == 0 {
            return 0.0;
        }

        let lookback = if delay_samples.is_nan() {
            1.0
        } else {
            (delay_samples - offset as f32).clamp(1.0, capacity as f32)
        };

        let lookback_int = lookback as usize;
        let frac = lookback - lookback_int as f32;

        // `lookback_int` is in [1, capacity], so adding one or two
        // capacities keeps the subtraction from underflowing.
        let newer = (self.write_pos + capacity - lookback_int) % capacity;
        let older = (self.write_pos + 2 * capacity - lookback_int - 1) % capacity;

        data[newer] * (1.0 - frac) + data[older] * frac
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[cfg(test)]
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    #[cfg(test)]
    pub fn write_position(&self) -> usize {
        self.write_pos
    }
}

impl Default for RingBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────

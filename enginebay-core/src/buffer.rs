//! Fixed-Capacity Sliding Window for Sample Averaging
//!
//! ## Overview
//!
//! A ring buffer of `f32` samples with a running sum, used by
//! [`MovingAverage`](crate::transforms::MovingAverage). Storage is sized at
//! compile time through a const generic; the window length actually used is
//! a runtime limit no larger than that capacity, so the averaging length can
//! be reconfigured without reallocating.
//!
//! ### Memory Layout
//!
//! ```text
//! SlidingWindow<8> with limit = 4 after pushing 1..=6:
//! ┌─────┬─────┬─────┬─────┬─────┬─────┬─────┬─────┐
//! │  5  │  6  │  3  │  4  │  -  │  -  │  -  │  -  │
//! └─────┴─────┴─────┴─────┴─────┴─────┴─────┴─────┘
//!                ↑
//!                └── write_pos = 2, also the oldest sample once full
//! sum = 3 + 4 + 5 + 6 = 18
//! ```
//!
//! Only the first `limit` slots are used. Once full, each push overwrites
//! the oldest retained sample.
//!
//! ### Running Sum
//!
//! `push` adds the new sample and subtracts the evicted one, so the average
//! is O(1). Repeated add/subtract accumulates `f32` rounding error; the sum
//! is recomputed from the retained samples every `limit` evictions, which
//! bounds the drift to one window's worth of rounding.

/// Ring buffer of the most recent `limit` samples with a running sum
#[derive(Clone, Debug)]
pub struct SlidingWindow<const N: usize> {
    /// Sample storage; slots at or beyond `limit` are unused
    data: [f32; N],

    /// Index where the next write will occur, always `< limit`
    write_pos: usize,

    /// Current number of retained samples, `<= limit`
    len: usize,

    /// Active window length, `1..=N`
    limit: usize,

    /// Sum of the retained samples
    sum: f32,

    /// Evictions since the sum was last recomputed
    evictions: usize,
}

impl<const N: usize> SlidingWindow<N> {
    /// Creates an empty window retaining up to `limit` samples
    ///
    /// `limit` is clamped into `1..=N`.
    pub const fn new(limit: usize) -> Self {
        let limit = if limit == 0 {
            1
        } else if limit > N {
            N
        } else {
            limit
        };
        Self { data: [0.0; N], write_pos: 0, len: 0, limit, sum: 0.0, evictions: 0 }
    }

    /// Adds a sample, evicting the oldest one when the window is full
    pub fn push(&mut self, sample: f32) {
        if self.len == self.limit {
            self.sum -= self.data[self.write_pos];
            self.evictions += 1;
        } else {
            self.len += 1;
        }

        self.data[self.write_pos] = sample;
        self.sum += sample;
        self.write_pos = (self.write_pos + 1) % self.limit;

        if self.evictions >= self.limit {
            self.sum = self.iter().sum();
            self.evictions = 0;
        }
    }

    /// Mean of the retained samples, `None` when empty
    pub fn mean(&self) -> Option<f32> {
        if self.len == 0 {
            return None;
        }
        Some(self.sum / self.len as f32)
    }

    /// Sum of the retained samples
    pub fn sum(&self) -> f32 {
        self.sum
    }

    /// Get number of retained samples
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if no samples are retained
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check if the window holds `limit` samples
    pub fn is_full(&self) -> bool {
        self.len == self.limit
    }

    /// Active window length
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Changes the window length and discards retained samples
    ///
    /// `limit` is clamped into `1..=N`.
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit.clamp(1, N);
        self.clear();
    }

    /// Discards all retained samples
    pub fn clear(&mut self) {
        self.write_pos = 0;
        self.len = 0;
        self.sum = 0.0;
        self.evictions = 0;
    }

    /// Iterate over retained samples from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        let start = if self.len < self.limit { 0 } else { self.write_pos };
        (0..self.len).map(move |i| self.data[(start + i) % self.limit])
    }
}

impl<const N: usize> Default for SlidingWindow<N> {
    fn default() -> Self {
        Self::new(N)
    }
}

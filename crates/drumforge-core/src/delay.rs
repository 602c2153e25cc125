//! Fixed-capacity integer delay line.
//!
//! Used to hold a bypass path back by the latency of a processed path, so
//! the two can be blended without comb filtering. The storage is inline;
//! nothing allocates.

/// Integer delay line of up to `N - 1` samples with no heap allocation.
///
/// # Example
///
/// ```rust
/// use drumforge_core::FixedDelayLine;
///
/// let mut delay: FixedDelayLine<8> = FixedDelayLine::new();
/// delay.set_delay(2);
/// assert_eq!(delay.process(1.0), 0.0);
/// assert_eq!(delay.process(0.0), 0.0);
/// assert_eq!(delay.process(0.0), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct FixedDelayLine<const N: usize> {
    buffer: [f32; N],
    write_pos: usize,
    delay: usize,
}

impl<const N: usize> FixedDelayLine<N> {
    /// Creates a zero-delay line.
    pub const fn new() -> Self {
        Self {
            buffer: [0.0; N],
            write_pos: 0,
            delay: 0,
        }
    }

    /// Longest delay this line can hold.
    pub const fn max_delay(&self) -> usize {
        N.saturating_sub(1)
    }

    /// Sets the delay, clamped to [`max_delay`](Self::max_delay), and clears
    /// the history.
    pub fn set_delay(&mut self, samples: usize) {
        self.delay = samples.min(self.max_delay());
        self.clear();
    }

    /// Current delay in samples.
    pub fn delay(&self) -> usize {
        self.delay
    }

    /// Writes `sample` and returns the sample written `delay` calls ago.
    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        if self.delay == 0 {
            return sample;
        }
        self.buffer[self.write_pos] = sample;
        let read_pos = (self.write_pos + N - self.delay) % N;
        self.write_pos = (self.write_pos + 1) % N;
        self.buffer[read_pos]
    }

    /// Delays a slice in place.
    pub fn process_slice(&mut self, samples: &mut [f32]) {
        if self.delay == 0 {
            return;
        }
        for s in samples {
            *s = self.process(*s);
        }
    }

    /// Zeroes the history.
    pub fn clear(&mut self) {
        self.buffer = [0.0; N];
        self.write_pos = 0;
    }
}

impl<const N: usize> Default for FixedDelayLine<N> {
    fn default() -> Self {
        Self::new()
    }
}

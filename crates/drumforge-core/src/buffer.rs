//! Planar multichannel scratch buffer.
//!
//! A [`ChannelBuffer`] owns one contiguous allocation split into per-channel
//! lanes of `capacity` samples. Storage is reserved once by
//! [`try_allocate`](ChannelBuffer::try_allocate) outside the audio thread;
//! per-block calls only change the active shape with
//! [`set_shape`](ChannelBuffer::set_shape), which never allocates.

#[cfg(not(feature = "std"))]
use alloc::collections::TryReserveError;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::collections::TryReserveError;

/// Hard upper bound on channels for any scratch buffer.
pub const MAX_CHANNELS: usize = 8;

/// Hard upper bound on samples per channel for any scratch buffer.
pub const MAX_BLOCK_SIZE: usize = 8192;

/// Planar audio buffer with a fixed allocation and a variable active shape.
///
/// # Example
///
/// ```rust
/// use drumforge_core::ChannelBuffer;
///
/// let mut buf = ChannelBuffer::new();
/// buf.try_allocate(2, 256).unwrap();
/// assert!(buf.set_shape(2, 64));
/// buf.channel_mut(1).fill(0.5);
/// assert_eq!(buf.channel(1).len(), 64);
/// assert!(!buf.set_shape(2, 512));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ChannelBuffer {
    data: Vec<f32>,
    allocated_channels: usize,
    capacity: usize,
    channels: usize,
    len: usize,
}

impl ChannelBuffer {
    /// Creates an empty buffer with no storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves zeroed storage for `channels × capacity` samples.
    ///
    /// Both dimensions are clamped to [`MAX_CHANNELS`] and [`MAX_BLOCK_SIZE`].
    /// Skips the allocation when the existing storage already has that shape.
    /// The active shape becomes the full allocation.
    pub fn try_allocate(&mut self, channels: usize, capacity: usize) -> Result<(), TryReserveError> {
        let channels = channels.min(MAX_CHANNELS);
        let capacity = capacity.min(MAX_BLOCK_SIZE);
        if channels != self.allocated_channels || capacity != self.capacity {
            let total = channels * capacity;
            let mut data = Vec::new();
            data.try_reserve_exact(total)?;
            data.resize(total, 0.0);
            self.data = data;
            self.allocated_channels = channels;
            self.capacity = capacity;
        } else {
            self.data.fill(0.0);
        }
        self.channels = channels;
        self.len = capacity;
        Ok(())
    }

    /// Drops the storage.
    pub fn release(&mut self) {
        *self = Self::default();
    }

    /// Sets the active shape. Returns `false` (shape unchanged) if it does not
    /// fit inside the allocation.
    #[inline]
    pub fn set_shape(&mut self, channels: usize, len: usize) -> bool {
        if !self.fits(channels, len) {
            return false;
        }
        self.channels = channels;
        self.len = len;
        true
    }

    /// Whether `channels × len` fits inside the allocation.
    #[inline]
    pub fn fits(&self, channels: usize, len: usize) -> bool {
        channels <= self.allocated_channels && len <= self.capacity
    }

    /// Active channel count.
    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Active samples per channel.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the active shape holds no samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0 || self.channels == 0
    }

    /// Allocated samples per channel.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Allocated channel count.
    #[inline]
    pub fn allocated_channels(&self) -> usize {
        self.allocated_channels
    }

    /// Active samples of one channel.
    ///
    /// # Panics
    ///
    /// Panics if `ch >= allocated_channels()`.
    #[inline]
    pub fn channel(&self, ch: usize) -> &[f32] {
        let start = ch * self.capacity;
        &self.data[start..start + self.len]
    }

    /// Mutable active samples of one channel.
    ///
    /// # Panics
    ///
    /// Panics if `ch >= allocated_channels()`.
    #[inline]
    pub fn channel_mut(&mut self, ch: usize) -> &mut [f32] {
        let start = ch * self.capacity;
        &mut self.data[start..start + self.len]
    }

    /// Zeroes the active region.
    pub fn clear(&mut self) {
        for ch in 0..self.channels {
            self.channel_mut(ch).fill(0.0);
        }
    }

    /// Copies `other`'s active contents, adopting its shape.
    ///
    /// Returns `false` without copying if the shape does not fit.
    pub fn copy_from(&mut self, other: &ChannelBuffer) -> bool {
        if !self.set_shape(other.channels, other.len) {
            return false;
        }
        for ch in 0..other.channels {
            self.channel_mut(ch).copy_from_slice(other.channel(ch));
        }
        true
    }

    /// Multiplies every active sample by `gain`.
    pub fn apply_gain(&mut self, gain: f32) {
        for ch in 0..self.channels {
            for sample in self.channel_mut(ch) {
                *sample *= gain;
            }
        }
    }

    /// True if every active sample is finite.
    pub fn is_finite(&self) -> bool {
        (0..self.channels).all(|ch| self.channel(ch).iter().all(|s| s.is_finite()))
    }

    /// Largest absolute active sample.
    pub fn peak(&self) -> f32 {
        (0..self.channels)
            .flat_map(|ch| self.channel(ch).iter())
            .fold(0.0_f32, |acc, s| acc.max(s.abs()))
    }
}

//! Audio Buffer Management
//!
//! Provides the core multichannel sample buffer consumed by the comb
//! filters, the comparator, and the quantizer. Samples are stored
//! non-interleaved as 32-bit floats: one `Vec<f32>` row per channel, all
//! rows the same length (rectangular invariant, enforced at construction).

use crate::error::{RecombError, Result};

/// Core audio buffer type for all signal processing in Recomb
///
/// Stores audio as non-interleaved 32-bit floating point samples.
/// Each channel is a separate `Vec<f32>`; all channels share the same
/// frame count.
///
/// Filters and the comparator take buffers by reference and produce new
/// buffers; an output buffer retains no reference to its input.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    /// Sample data: outer Vec is channels, inner Vec is frames
    samples: Vec<Vec<f32>>,
    /// Sample rate in Hz
    sample_rate: u32,
}

impl SampleBuffer {
    /// Create a silent buffer with the given shape
    ///
    /// All samples are initialized to 0.0.
    pub fn new(num_channels: usize, num_frames: usize, sample_rate: u32) -> Self {
        Self {
            samples: vec![vec![0.0_f32; num_frames]; num_channels],
            sample_rate,
        }
    }

    /// Create a buffer from channel-major sample rows
    ///
    /// # Errors
    /// * `InvalidAudio` if the rows have differing lengths or no channel
    ///   rows are provided
    pub fn from_channels(samples: Vec<Vec<f32>>, sample_rate: u32) -> Result<Self> {
        let Some(first) = samples.first() else {
            return Err(RecombError::InvalidAudio {
                reason: "buffer must have at least one channel".to_string(),
                source: None,
            });
        };

        let num_frames = first.len();
        if let Some(bad) = samples.iter().position(|ch| ch.len() != num_frames) {
            return Err(RecombError::InvalidAudio {
                reason: format!(
                    "channel {} has {} frames, expected {}",
                    bad,
                    samples[bad].len(),
                    num_frames
                ),
                source: None,
            });
        }

        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Create a buffer from interleaved sample data
    ///
    /// # Errors
    /// * `InvalidAudio` if the data length is not divisible by the
    ///   channel count, or the channel count is zero
    pub fn from_interleaved(
        interleaved: &[f32],
        num_channels: usize,
        sample_rate: u32,
    ) -> Result<Self> {
        if num_channels == 0 {
            return Err(RecombError::InvalidAudio {
                reason: "buffer must have at least one channel".to_string(),
                source: None,
            });
        }

        if interleaved.len() % num_channels != 0 {
            return Err(RecombError::InvalidAudio {
                reason: format!(
                    "interleaved data length {} is not divisible by channel count {}",
                    interleaved.len(),
                    num_channels
                ),
                source: None,
            });
        }

        let num_frames = interleaved.len() / num_channels;
        let mut samples = vec![Vec::with_capacity(num_frames); num_channels];

        for frame in interleaved.chunks_exact(num_channels) {
            for (ch, &sample) in frame.iter().enumerate() {
                samples[ch].push(sample);
            }
        }

        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Convert the buffer to interleaved (frame-major) order
    pub fn to_interleaved(&self) -> Vec<f32> {
        let num_frames = self.num_frames();
        let mut interleaved = Vec::with_capacity(self.num_channels() * num_frames);

        for frame in 0..num_frames {
            for channel in &self.samples {
                interleaved.push(channel[frame]);
            }
        }

        interleaved
    }

    /// Get the number of channels
    #[inline]
    pub fn num_channels(&self) -> usize {
        self.samples.len()
    }

    /// Get the number of frames (samples per channel)
    #[inline]
    pub fn num_frames(&self) -> usize {
        self.samples.first().map(|ch| ch.len()).unwrap_or(0)
    }

    /// Check if the buffer contains no frames
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.num_frames() == 0
    }

    /// Sample rate in Hz
    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Duration in seconds
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.num_frames() as f64 / self.sample_rate as f64
    }

    /// Get immutable access to a channel's samples
    ///
    /// # Panics
    /// Panics if the channel index is out of bounds.
    #[inline]
    pub fn channel(&self, index: usize) -> &[f32] {
        &self.samples[index]
    }

    /// Get mutable access to a channel's samples
    ///
    /// # Panics
    /// Panics if the channel index is out of bounds.
    #[inline]
    pub fn channel_mut(&mut self, index: usize) -> &mut [f32] {
        &mut self.samples[index]
    }

    /// Iterate over channel rows
    pub fn channels(&self) -> impl Iterator<Item = &[f32]> {
        self.samples.iter().map(|ch| ch.as_slice())
    }

    /// Get a sample at the specified channel and frame
    #[inline]
    pub fn get_sample(&self, channel: usize, frame: usize) -> Option<f32> {
        self.samples
            .get(channel)
            .and_then(|ch| ch.get(frame).copied())
    }

    /// Peak absolute sample value across all channels
    pub fn peak_abs(&self) -> f32 {
        self.samples
            .iter()
            .flat_map(|ch| ch.iter())
            .map(|s| s.abs())
            .fold(0.0_f32, f32::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer() {
        let buf = SampleBuffer::new(2, 1000, 44100);
        assert_eq!(buf.num_channels(), 2);
        assert_eq!(buf.num_frames(), 1000);
        assert_eq!(buf.sample_rate(), 44100);
        assert!(buf.channel(0).iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_from_channels_rectangular() {
        let buf =
            SampleBuffer::from_channels(vec![vec![0.1, 0.2, 0.3], vec![0.4, 0.5, 0.6]], 48000)
                .unwrap();
        assert_eq!(buf.num_channels(), 2);
        assert_eq!(buf.num_frames(), 3);
    }

    #[test]
    fn test_from_channels_ragged_rejected() {
        let result = SampleBuffer::from_channels(vec![vec![0.1, 0.2], vec![0.3]], 48000);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_channels_empty_rejected() {
        let result = SampleBuffer::from_channels(vec![], 48000);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_interleaved_stereo() {
        let buf = SampleBuffer::from_interleaved(&[0.1, 0.2, 0.3, 0.4, 0.5, 0.6], 2, 44100)
            .unwrap();
        assert_eq!(buf.num_channels(), 2);
        assert_eq!(buf.num_frames(), 3);
        assert_eq!(buf.get_sample(0, 0), Some(0.1));
        assert_eq!(buf.get_sample(1, 0), Some(0.2));
        assert_eq!(buf.get_sample(0, 2), Some(0.5));
    }

    #[test]
    fn test_from_interleaved_invalid() {
        // 5 samples can't be evenly split into stereo
        let result = SampleBuffer::from_interleaved(&[0.1, 0.2, 0.3, 0.4, 0.5], 2, 44100);
        assert!(result.is_err());
    }

    #[test]
    fn test_interleaved_roundtrip() {
        let original = vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8];
        let buf = SampleBuffer::from_interleaved(&original, 2, 44100).unwrap();
        assert_eq!(buf.to_interleaved(), original);
    }

    #[test]
    fn test_duration() {
        let buf = SampleBuffer::new(1, 44100, 44100);
        assert!((buf.duration_secs() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_peak_abs() {
        let buf =
            SampleBuffer::from_channels(vec![vec![0.1, -0.7, 0.3], vec![0.2, 0.4, -0.5]], 44100)
                .unwrap();
        assert_eq!(buf.peak_abs(), 0.7);
    }
}

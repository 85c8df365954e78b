//! Signal Comparator
//!
//! Element-wise difference of two equal-shaped buffers, used to verify
//! that filter outputs match bit-for-bit across implementations. Shape
//! validation is strict: rate, channel count, and frame count must all
//! agree or the comparison fails, never truncates or pads.

use crate::dsp::buffer::SampleBuffer;
use crate::error::{RecombError, Result};

/// Per-sample signed residual between two equal-shaped buffers
///
/// Only constructible through [`compare`], which guarantees the shape
/// preconditions hold.
#[derive(Debug, Clone, PartialEq)]
pub struct DifferenceBuffer {
    samples: Vec<Vec<f32>>,
    sample_rate: u32,
}

impl DifferenceBuffer {
    /// Number of channels
    #[inline]
    pub fn num_channels(&self) -> usize {
        self.samples.len()
    }

    /// Number of frames per channel
    #[inline]
    pub fn num_frames(&self) -> usize {
        self.samples.first().map(|ch| ch.len()).unwrap_or(0)
    }

    /// Sample rate in Hz
    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Residuals for one channel
    ///
    /// # Panics
    /// Panics if the channel index is out of bounds.
    #[inline]
    pub fn channel(&self, index: usize) -> &[f32] {
        &self.samples[index]
    }

    /// Peak absolute residual for one channel
    pub fn channel_peak_abs(&self, index: usize) -> f32 {
        self.samples[index]
            .iter()
            .map(|s| s.abs())
            .fold(0.0_f32, f32::max)
    }

    /// Peak absolute residual across all channels
    pub fn peak_abs(&self) -> f32 {
        (0..self.num_channels())
            .map(|ch| self.channel_peak_abs(ch))
            .fold(0.0_f32, f32::max)
    }

    /// True when every residual is exactly zero (bit-identical inputs
    /// up to 0.0 == -0.0)
    pub fn is_zero(&self) -> bool {
        self.samples
            .iter()
            .flat_map(|ch| ch.iter())
            .all(|&s| s == 0.0)
    }

    /// View of the residual as a plain sample buffer, e.g. for writing
    /// the difference signal out for external inspection
    pub fn to_sample_buffer(&self) -> SampleBuffer {
        // Shape is valid by construction, so this cannot fail
        SampleBuffer::from_channels(self.samples.clone(), self.sample_rate)
            .expect("difference buffer is rectangular by construction")
    }
}

/// Compare two equal-shaped buffers sample by sample
///
/// # Errors
/// * `ShapeMismatch` when the sample rates, channel counts, or frame
///   counts differ; neither input is modified
pub fn compare(a: &SampleBuffer, b: &SampleBuffer) -> Result<DifferenceBuffer> {
    if a.sample_rate() != b.sample_rate() {
        return Err(RecombError::ShapeMismatch {
            field: "sample rate",
            left: a.sample_rate() as usize,
            right: b.sample_rate() as usize,
        });
    }
    if a.num_channels() != b.num_channels() {
        return Err(RecombError::ShapeMismatch {
            field: "channel count",
            left: a.num_channels(),
            right: b.num_channels(),
        });
    }
    if a.num_frames() != b.num_frames() {
        return Err(RecombError::ShapeMismatch {
            field: "frame count",
            left: a.num_frames(),
            right: b.num_frames(),
        });
    }

    let samples = (0..a.num_channels())
        .map(|ch| {
            a.channel(ch)
                .iter()
                .zip(b.channel(ch))
                .map(|(&x, &y)| x - y)
                .collect()
        })
        .collect();

    Ok(DifferenceBuffer {
        samples,
        sample_rate: a.sample_rate(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RecombError;

    #[test]
    fn test_compare_with_self_is_zero() {
        let buf = SampleBuffer::from_channels(
            vec![vec![0.1, -0.2, 0.3, 0.4], vec![0.5, 0.6, -0.7, 0.8]],
            44100,
        )
        .unwrap();

        let diff = compare(&buf, &buf).unwrap();

        assert!(diff.is_zero());
        assert_eq!(diff.peak_abs(), 0.0);
        assert_eq!(diff.num_channels(), 2);
        assert_eq!(diff.num_frames(), 4);
        assert_eq!(diff.sample_rate(), 44100);
    }

    #[test]
    fn test_compare_elementwise() {
        let a = SampleBuffer::from_channels(vec![vec![1.0, 0.5, -0.25]], 48000).unwrap();
        let b = SampleBuffer::from_channels(vec![vec![0.25, 0.5, 0.25]], 48000).unwrap();

        let diff = compare(&a, &b).unwrap();

        assert_eq!(diff.channel(0), &[0.75, 0.0, -0.5]);
        assert_eq!(diff.channel_peak_abs(0), 0.75);
        assert!(!diff.is_zero());
    }

    #[test]
    fn test_frame_count_mismatch() {
        // Rate and channel count match; only the frame count differs
        let a = SampleBuffer::new(2, 100, 44100);
        let b = SampleBuffer::new(2, 99, 44100);

        let err = compare(&a, &b).unwrap_err();
        assert!(matches!(
            err,
            RecombError::ShapeMismatch {
                field: "frame count",
                left: 100,
                right: 99,
            }
        ));
    }

    #[test]
    fn test_sample_rate_mismatch() {
        let a = SampleBuffer::new(1, 100, 44100);
        let b = SampleBuffer::new(1, 100, 48000);

        let err = compare(&a, &b).unwrap_err();
        assert!(matches!(
            err,
            RecombError::ShapeMismatch {
                field: "sample rate",
                ..
            }
        ));
    }

    #[test]
    fn test_channel_count_mismatch() {
        let a = SampleBuffer::new(1, 100, 44100);
        let b = SampleBuffer::new(2, 100, 44100);

        let err = compare(&a, &b).unwrap_err();
        assert!(matches!(
            err,
            RecombError::ShapeMismatch {
                field: "channel count",
                ..
            }
        ));
    }

    #[test]
    fn test_inputs_unmodified_on_mismatch() {
        let a = SampleBuffer::from_channels(vec![vec![0.5; 10]], 44100).unwrap();
        let b = SampleBuffer::from_channels(vec![vec![0.5; 11]], 44100).unwrap();
        let (snap_a, snap_b) = (a.clone(), b.clone());

        assert!(compare(&a, &b).is_err());
        assert_eq!(a, snap_a);
        assert_eq!(b, snap_b);
    }

    #[test]
    fn test_to_sample_buffer() {
        let a = SampleBuffer::from_channels(vec![vec![1.0, 2.0]], 8000).unwrap();
        let b = SampleBuffer::from_channels(vec![vec![0.5, 1.0]], 8000).unwrap();

        let diff = compare(&a, &b).unwrap().to_sample_buffer();

        assert_eq!(diff.channel(0), &[0.5, 1.0]);
        assert_eq!(diff.sample_rate(), 8000);
    }
}

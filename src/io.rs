//! Audio file I/O collaborators
//!
//! WAV decoding and encoding around the core. The decoder converts any
//! supported bit depth to 32-bit float, normalizes mono input to a
//! one-row buffer, and resamples to a caller-chosen rate while reporting
//! the rate detected in the file. The encoder writes quantized buffers
//! as uncompressed 16-bit PCM.
//!
//! Sample rate conversion uses linear interpolation.
//! TODO: upgrade to windowed-sinc resampling; linear interpolation
//! aliases on downsampling.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use log::debug;

use crate::dsp::{QuantizedBuffer, SampleBuffer};
use crate::error::{RecombError, Result};

/// A decoded buffer together with the sample rate detected in the file
///
/// When the caller requests a target rate, `buffer` is already resampled
/// to it and `source_rate` records what the file actually contained.
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Decoded (and possibly resampled) samples
    pub buffer: SampleBuffer,
    /// Sample rate found in the file header
    pub source_rate: u32,
}

/// Import a WAV file as a float sample buffer
///
/// Reads the file, converts samples to f32, de-interleaves into
/// channel-major rows (mono becomes a single row), and resamples to
/// `target_rate` when one is given and differs from the file's rate.
///
/// # Arguments
/// * `path` - Path to the WAV file to import
/// * `target_rate` - Desired rate, or `None` to keep the file's rate
///
/// # Errors
/// * `FileNotFound` - If the file does not exist
/// * `InvalidAudio` - If the file is not a valid WAV file
/// * `UnsupportedFormat` - If the bit depth is not supported
/// * `EmptyAudio` - If the file contains no samples
pub fn import_audio(path: &Path, target_rate: Option<u32>) -> Result<DecodedAudio> {
    if !path.exists() {
        return Err(RecombError::FileNotFound {
            path: path.display().to_string(),
            source: None,
        });
    }

    let reader = WavReader::open(path).map_err(|e| RecombError::InvalidAudio {
        reason: format!("Failed to open WAV file: {}", e),
        source: Some(Box::new(e)),
    })?;

    let spec = reader.spec();
    let source_rate = spec.sample_rate;
    let channels = spec.channels as usize;

    let samples_f32 = read_samples_as_f32(reader, spec.bits_per_sample, spec.sample_format)?;
    if samples_f32.is_empty() {
        return Err(RecombError::EmptyAudio);
    }

    let buffer = SampleBuffer::from_interleaved(&samples_f32, channels, source_rate)?;

    let buffer = match target_rate {
        Some(rate) if rate != source_rate => {
            debug!(
                "resampling {} from {} Hz to {} Hz",
                path.display(),
                source_rate,
                rate
            );
            resample_buffer(&buffer, rate)?
        }
        _ => buffer,
    };

    Ok(DecodedAudio {
        buffer,
        source_rate,
    })
}

/// Export a quantized buffer as a 16-bit PCM WAV file
///
/// Channel rows are interleaved into the encoder's frame-major order.
/// Single-channel buffers are written from their flattened sequence.
pub fn export_audio(quantized: &QuantizedBuffer, path: &Path) -> Result<()> {
    let spec = WavSpec {
        channels: quantized.num_channels() as u16,
        sample_rate: quantized.sample_rate(),
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec).map_err(wav_io_error)?;

    match quantized.flatten() {
        Some(mono) => {
            for &sample in mono {
                writer.write_sample(sample).map_err(wav_io_error)?;
            }
        }
        None => {
            for sample in quantized.to_interleaved() {
                writer.write_sample(sample).map_err(wav_io_error)?;
            }
        }
    }

    writer.finalize().map_err(wav_io_error)?;
    Ok(())
}

/// Write a float buffer as 16-bit PCM, e.g. to persist a difference
/// signal for external inspection
pub fn export_float_audio(buffer: &SampleBuffer, path: &Path) -> Result<()> {
    export_audio(&crate::dsp::quantize(buffer), path)
}

/// Generate a mono test tone (sine wave)
pub fn generate_test_tone(frequency: f32, duration_secs: f32, sample_rate: u32) -> SampleBuffer {
    let num_samples = (duration_secs * sample_rate as f32) as usize;
    let mut buffer = SampleBuffer::new(1, num_samples, sample_rate);

    let angular_freq = 2.0 * std::f32::consts::PI * frequency / sample_rate as f32;
    for (i, sample) in buffer.channel_mut(0).iter_mut().enumerate() {
        *sample = (angular_freq * i as f32).sin();
    }

    buffer
}

/// Generate a stereo test tone with a different frequency per channel
pub fn generate_stereo_test_tone(
    freq_left: f32,
    freq_right: f32,
    duration_secs: f32,
    sample_rate: u32,
) -> SampleBuffer {
    let num_samples = (duration_secs * sample_rate as f32) as usize;
    let mut buffer = SampleBuffer::new(2, num_samples, sample_rate);

    for (ch, freq) in [freq_left, freq_right].into_iter().enumerate() {
        let angular_freq = 2.0 * std::f32::consts::PI * freq / sample_rate as f32;
        for (i, sample) in buffer.channel_mut(ch).iter_mut().enumerate() {
            *sample = (angular_freq * i as f32).sin();
        }
    }

    buffer
}

// ============================================================================
// Internal helper functions
// ============================================================================

fn wav_io_error(e: hound::Error) -> RecombError {
    RecombError::Io(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))
}

/// Read samples from a WAV reader and convert to f32
fn read_samples_as_f32<R: std::io::Read>(
    mut reader: WavReader<R>,
    bits_per_sample: u16,
    sample_format: SampleFormat,
) -> Result<Vec<f32>> {
    match sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<Vec<f32>, _>>()
            .map_err(|e| RecombError::InvalidAudio {
                reason: format!("Failed to read float samples: {}", e),
                source: Some(Box::new(e)),
            }),
        SampleFormat::Int => match bits_per_sample {
            8 => reader
                .samples::<i8>()
                .map(|s| s.map(|v| v as f32 / 128.0))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(|e| RecombError::InvalidAudio {
                    reason: format!("Failed to read 8-bit samples: {}", e),
                    source: Some(Box::new(e)),
                }),
            16 => reader
                .samples::<i16>()
                .map(|s| s.map(|v| v as f32 / 32768.0))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(|e| RecombError::InvalidAudio {
                    reason: format!("Failed to read 16-bit samples: {}", e),
                    source: Some(Box::new(e)),
                }),
            24 => {
                // 24-bit stored as i32 in hound
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / 8388608.0))
                    .collect::<std::result::Result<Vec<f32>, _>>()
                    .map_err(|e| RecombError::InvalidAudio {
                        reason: format!("Failed to read 24-bit samples: {}", e),
                        source: Some(Box::new(e)),
                    })
            }
            32 => reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / 2147483648.0))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(|e| RecombError::InvalidAudio {
                    reason: format!("Failed to read 32-bit int samples: {}", e),
                    source: Some(Box::new(e)),
                }),
            _ => Err(RecombError::UnsupportedFormat {
                format: format!("{}-bit integer audio", bits_per_sample),
            }),
        },
    }
}

/// Resample every channel of a buffer to a new rate
fn resample_buffer(buffer: &SampleBuffer, target_rate: u32) -> Result<SampleBuffer> {
    let ratio = target_rate as f64 / buffer.sample_rate() as f64;
    let channels = buffer
        .channels()
        .map(|ch| resample_linear(ch, ratio))
        .collect();
    SampleBuffer::from_channels(channels, target_rate)
}

/// Linear interpolation resampling
fn resample_linear(samples: &[f32], ratio: f64) -> Vec<f32> {
    if samples.is_empty() {
        return Vec::new();
    }

    let source_len = samples.len();
    let target_len = ((source_len as f64) * ratio).ceil() as usize;
    let mut output = Vec::with_capacity(target_len);

    for i in 0..target_len {
        let src_pos = i as f64 / ratio;
        let src_idx = src_pos.floor() as usize;
        let frac = (src_pos - src_idx as f64) as f32;

        let sample = if src_idx + 1 < source_len {
            samples[src_idx] * (1.0 - frac) + samples[src_idx + 1] * frac
        } else if src_idx < source_len {
            samples[src_idx]
        } else {
            0.0
        };

        output.push(sample);
    }

    output
}

// ============================================================================
// Tests
// ============================================================================

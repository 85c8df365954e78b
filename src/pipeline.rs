//! Pipeline orchestration
//!
//! Explicit, stateless composition of the core components:
//! decode -> filter -> quantize -> encode for processing, and
//! decode x2 -> compare -> summarize for verification. Shape and result
//! diagnostics are logged here, at the pipeline boundary, never inside
//! the filter loops.

use std::path::Path;

use log::info;
use serde::Serialize;

use crate::dsp::{self, compare, quantize, FilterParameters, FilterType};
use crate::error::Result;
use crate::io::{export_audio, export_float_audio, import_audio};

/// Summary of one filter run over a file
#[derive(Debug, Clone, Serialize)]
pub struct FilterReport {
    /// Filter algorithm applied
    pub filter_type: FilterType,
    /// Channels processed
    pub channels: usize,
    /// Frames per channel
    pub frames: usize,
    /// Rate detected in the input file before resampling
    pub source_rate: u32,
    /// Rate the file was processed and written at
    pub processed_rate: u32,
    /// Delay length derived from the parameters, in samples
    pub delay_samples: usize,
}

/// Summary of a sample-by-sample comparison of two files
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    /// Channels in both inputs
    pub channels: usize,
    /// Frames per channel in both inputs
    pub frames: usize,
    /// Shared sample rate
    pub sample_rate: u32,
    /// Largest absolute residual per channel
    pub channel_peaks: Vec<f32>,
    /// True when every residual is exactly zero
    pub identical: bool,
}

/// Run the full processing pipeline over one file
///
/// Decodes `input` (resampling to `params.sample_rate_hz`), applies the
/// selected comb filter, quantizes to 16-bit, and writes `output` as
/// uncompressed PCM.
pub fn process_file(
    input: &Path,
    output: &Path,
    filter_type: FilterType,
    params: &FilterParameters,
) -> Result<FilterReport> {
    let decoded = import_audio(input, Some(params.sample_rate_hz))?;
    info!(
        "decoded {}: {} channel(s), {} frames, source rate {} Hz",
        input.display(),
        decoded.buffer.num_channels(),
        decoded.buffer.num_frames(),
        decoded.source_rate
    );

    let filtered = dsp::apply(&decoded.buffer, filter_type, params);
    let quantized = quantize(&filtered);
    export_audio(&quantized, output)?;

    let report = FilterReport {
        filter_type,
        channels: filtered.num_channels(),
        frames: filtered.num_frames(),
        source_rate: decoded.source_rate,
        processed_rate: params.sample_rate_hz,
        delay_samples: params.delay_samples(),
    };
    info!(
        "wrote {}: {:?} comb, delay {} samples, gain {}",
        output.display(),
        filter_type,
        report.delay_samples,
        params.gain
    );

    Ok(report)
}

/// Compare two audio files sample by sample
///
/// Both files are decoded at their native rates; any mismatch in rate,
/// channel count, or frame count surfaces as a `ShapeMismatch` error.
/// When `diff_output` is given, the residual signal itself is written
/// out as a 16-bit WAV for external inspection.
pub fn compare_files(
    left: &Path,
    right: &Path,
    diff_output: Option<&Path>,
) -> Result<ComparisonReport> {
    let a = import_audio(left, None)?;
    let b = import_audio(right, None)?;
    info!(
        "comparing {} ({}ch x {}) against {} ({}ch x {})",
        left.display(),
        a.buffer.num_channels(),
        a.buffer.num_frames(),
        right.display(),
        b.buffer.num_channels(),
        b.buffer.num_frames()
    );

    let diff = compare(&a.buffer, &b.buffer)?;

    let channel_peaks: Vec<f32> = (0..diff.num_channels())
        .map(|ch| diff.channel_peak_abs(ch))
        .collect();
    for (ch, peak) in channel_peaks.iter().enumerate() {
        info!("channel {}: peak residual {}", ch + 1, peak);
    }

    if let Some(path) = diff_output {
        export_float_audio(&diff.to_sample_buffer(), path)?;
        info!("wrote difference signal to {}", path.display());
    }

    Ok(ComparisonReport {
        channels: diff.num_channels(),
        frames: diff.num_frames(),
        sample_rate: diff.sample_rate(),
        channel_peaks,
        identical: diff.is_zero(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RecombError;
    use crate::io::{export_audio, generate_test_tone};
    use tempfile::tempdir;

    #[test]
    fn test_process_file_reports_shape() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.wav");
        let output = dir.path().join("out.wav");

        let tone = generate_test_tone(440.0, 0.5, 44100);
        export_audio(&crate::dsp::quantize(&tone), &input).unwrap();

        let params = FilterParameters::new(44100, 0.5, 0.001);
        let report = process_file(&input, &output, FilterType::Fir, &params).unwrap();

        assert_eq!(report.channels, 1);
        assert_eq!(report.frames, tone.num_frames());
        assert_eq!(report.source_rate, 44100);
        assert_eq!(report.processed_rate, 44100);
        assert_eq!(report.delay_samples, 44);
        assert!(output.exists());
    }

    #[test]
    fn test_compare_file_with_itself() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.wav");

        let tone = generate_test_tone(440.0, 0.25, 44100);
        export_audio(&crate::dsp::quantize(&tone), &input).unwrap();

        let report = compare_files(&input, &input, None).unwrap();

        assert!(report.identical);
        assert!(report.channel_peaks.iter().all(|&p| p == 0.0));
    }

    #[test]
    fn test_compare_mismatched_lengths_fails() {
        let dir = tempdir().unwrap();
        let short = dir.path().join("short.wav");
        let long = dir.path().join("long.wav");

        export_audio(
            &crate::dsp::quantize(&generate_test_tone(440.0, 0.2, 44100)),
            &short,
        )
        .unwrap();
        export_audio(
            &crate::dsp::quantize(&generate_test_tone(440.0, 0.3, 44100)),
            &long,
        )
        .unwrap();

        let err = compare_files(&short, &long, None).unwrap_err();
        assert!(matches!(
            err,
            RecombError::ShapeMismatch {
                field: "frame count",
                ..
            }
        ));
    }

    #[test]
    fn test_compare_writes_diff_signal() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.wav");
        let b = dir.path().join("b.wav");
        let diff = dir.path().join("diff.wav");

        export_audio(
            &crate::dsp::quantize(&generate_test_tone(440.0, 0.2, 44100)),
            &a,
        )
        .unwrap();
        export_audio(
            &crate::dsp::quantize(&generate_test_tone(880.0, 0.2, 44100)),
            &b,
        )
        .unwrap();

        let report = compare_files(&a, &b, Some(&diff)).unwrap();

        assert!(!report.identical);
        assert!(diff.exists());
    }
}

//! The analyzer façade: orchestrates every sub-analysis into one
//! [`crate::types::AnalysisResult`].
//!
//! Grounded on `audio_analyzer.py`'s `analyze_track`: a fixed 30 s mono
//! analysis window at 44.1 kHz, with tempo/key/spectral features computed
//! on shorter leading sub-slices for bounded latency, phase-by-phase
//! progress reporting, and tolerant sub-feature failure handling recorded
//! via `*_defaulted` flags rather than propagated as hard errors.

pub mod frequency;
pub mod genre;
pub mod loudness;
pub mod masking;
pub mod spectrum;
pub mod stereo_analysis;

use crate::error::{DspError, Stage};
use crate::progress::{CancellationToken, ProgressSink};
use crate::types::{AnalysisResult, AudioBuffer, GenrePrediction};

const ANALYSIS_WINDOW_SECS: f64 = 30.0;
const TEMPO_WINDOW_SECS: f64 = 10.0;
const KEY_WINDOW_SECS: f64 = 5.0;
const SPECTRAL_WINDOW_SECS: f64 = 10.0;
const TARGET_SAMPLE_RATE: u32 = 44_100;
const DEFAULT_TEMPO_BPM: f64 = 120.0;
const DEFAULT_KEY: &str = "C";

/// Run the full analysis pipeline. Checks `cancel` between each of the
/// nine named phases (load, tempo, key, loudness, spectral, frequency,
/// masking, stereo, genre) and reports progress through `progress`.
pub fn analyze(
    audio: &AudioBuffer,
    mut progress: impl ProgressSink,
    cancel: &CancellationToken,
) -> Result<AnalysisResult, DspError> {
    log::info!(
        "analyze: {} samples @ {}Hz, {} channel(s)",
        audio.frame_count(),
        audio.sample_rate(),
        audio.channel_count()
    );
    progress.update("load", 0);
    if cancel.is_cancelled() {
        return Err(DspError::Cancelled);
    }

    let mono_full = resample_linear(&audio.to_mono(), audio.sample_rate(), TARGET_SAMPLE_RATE);
    let window_len = ((TARGET_SAMPLE_RATE as f64 * ANALYSIS_WINDOW_SECS) as usize).min(mono_full.len());
    let mono = &mono_full[..window_len];

    let left_full = resample_linear(audio.left(), audio.sample_rate(), TARGET_SAMPLE_RATE);
    let right_full = resample_linear(audio.right(), audio.sample_rate(), TARGET_SAMPLE_RATE);
    let stereo_len = window_len.min(left_full.len()).min(right_full.len());
    let left = &left_full[..stereo_len];
    let right = &right_full[..stereo_len];

    let tempo_slice = leading_window(mono, TEMPO_WINDOW_SECS);
    let key_slice = leading_window(mono, KEY_WINDOW_SECS);
    let spectral_slice = leading_window(mono, SPECTRAL_WINDOW_SECS);

    progress.update("tempo", 10);
    if cancel.is_cancelled() {
        return Err(DspError::Cancelled);
    }
    let (tempo_bpm, tempo_defaulted) = match spectrum::estimate_tempo(tempo_slice, TARGET_SAMPLE_RATE) {
        Some(bpm) => (bpm, false),
        None => (DEFAULT_TEMPO_BPM, true),
    };

    progress.update("key", 25);
    if cancel.is_cancelled() {
        return Err(DspError::Cancelled);
    }
    let (key, key_defaulted) = match spectrum::estimate_key(key_slice, TARGET_SAMPLE_RATE) {
        Some(k) => (k, false),
        None => (DEFAULT_KEY.to_string(), true),
    };

    progress.update("loudness", 40);
    if cancel.is_cancelled() {
        return Err(DspError::Cancelled);
    }
    let loudness_metrics = loudness::metrics(mono, TARGET_SAMPLE_RATE).map_err(|e| retag(e, Stage::Loudness))?;

    progress.update("spectral", 55);
    if cancel.is_cancelled() {
        return Err(DspError::Cancelled);
    }
    let (mfcc_mean, mfcc_std) = spectrum::mfcc_mean_std(spectral_slice, TARGET_SAMPLE_RATE);
    let (spectral_centroid_mean, spectral_rolloff_mean, zcr_mean) =
        spectrum::centroid_rolloff_zcr(spectral_slice, TARGET_SAMPLE_RATE);
    let spectral = crate::types::SpectralFeatures {
        mfcc_mean: mfcc_mean.clone(),
        mfcc_std: mfcc_std.clone(),
        spectral_centroid_mean,
        spectral_rolloff_mean,
        zcr_mean,
    };

    progress.update("frequency", 65);
    if cancel.is_cancelled() {
        return Err(DspError::Cancelled);
    }
    let frequency = frequency::analyze(mono, TARGET_SAMPLE_RATE);

    progress.update("masking", 78);
    if cancel.is_cancelled() {
        return Err(DspError::Cancelled);
    }
    let masking = masking::analyze(mono, TARGET_SAMPLE_RATE);

    progress.update("stereo", 88);
    if cancel.is_cancelled() {
        return Err(DspError::Cancelled);
    }
    let stereo = stereo_analysis::analyze(left, right, audio.is_mono());

    progress.update("genre", 95);
    if cancel.is_cancelled() {
        return Err(DspError::Cancelled);
    }
    let mfcc1_std = mfcc_std.get(1).copied().unwrap_or(0.0);
    let genre_features = genre::GenreFeatures {
        mfcc_mean,
        mfcc1_std,
        spectral_centroid_mean,
        spectral_rolloff_mean,
        zcr_mean,
        tempo_bpm,
    };
    let (genre, genre_defaulted): (GenrePrediction, bool) = genre::predict_with_defaulted(&genre_features);

    progress.update("genre", 100);
    log::debug!("analyze: done — genre {} ({:.2} confidence)", genre.label, genre.confidence);

    Ok(AnalysisResult {
        duration_secs: audio.duration_secs(),
        sample_rate: audio.sample_rate(),
        channels: audio.channel_count() as u16,
        tempo_bpm,
        tempo_defaulted,
        key,
        key_defaulted,
        loudness: loudness_metrics,
        spectral,
        frequency,
        masking,
        stereo,
        genre,
        genre_defaulted,
    })
}

fn leading_window(samples: &[f64], secs: f64) -> &[f64] {
    let n = ((TARGET_SAMPLE_RATE as f64 * secs) as usize).min(samples.len());
    &samples[..n]
}

fn retag(err: DspError, stage: Stage) -> DspError {
    match err {
        DspError::Dsp { cause, index, .. } => DspError::Dsp { stage, cause, index },
        other => other,
    }
}

/// Linear-interpolation resampler. A full polyphase resampler is out of
/// scope (spec.md Non-goals) — this is an acceptable simplification since
/// analysis only ever consumes bounded, mono-downmixed feature windows.
fn resample_linear(samples: &[f64], from_rate: u32, to_rate: u32) -> Vec<f64> {
    if from_rate == to_rate || samples.is_empty() {
        return samples.to_vec();
    }
    let ratio = to_rate as f64 / from_rate as f64;
    let out_len = ((samples.len() as f64) * ratio).round() as usize;
    (0..out_len)
        .map(|i| {
            let src_pos = i as f64 / ratio;
            let idx = src_pos.floor() as usize;
            let frac = src_pos - idx as f64;
            if idx + 1 < samples.len() {
                samples[idx] * (1.0 - frac) + samples[idx + 1] * frac
            } else {
                samples[samples.len() - 1]
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoopProgress;

    fn sine(freq: f64, sample_rate: u32, n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| (2.0 * std::f64::consts::PI * freq * i as f64 / sample_rate as f64).sin())
            .collect()
    }

    #[test]
    fn silence_yields_defaulted_tempo_and_key_with_pop_genre() {
        let sr = 44100;
        let silence = vec![0.0; sr as usize * 2];
        let audio = AudioBuffer::new(vec![silence.clone(), silence], sr).unwrap();
        let result = analyze(&audio, NoopProgress, &CancellationToken::new()).unwrap();
        assert!(result.tempo_defaulted);
        assert_eq!(result.tempo_bpm, DEFAULT_TEMPO_BPM);
        assert_eq!(result.genre.label, crate::types::GenreLabel::Pop);
        assert_eq!(result.genre.confidence, 0.5);
        assert_eq!(result.masking.total_masked_bands, 24);
        assert!(!result.stereo.is_mono);
    }

    #[test]
    fn mono_input_reports_mono_stereo_field() {
        let sr = 44100;
        let mono = sine(440.0, sr, sr as usize);
        let audio = AudioBuffer::new(vec![mono], sr).unwrap();
        let result = analyze(&audio, NoopProgress, &CancellationToken::new()).unwrap();
        assert!(result.stereo.is_mono);
        assert_eq!(result.channels, 1);
    }

    #[test]
    fn cancellation_before_start_returns_cancelled() {
        let sr = 44100;
        let mono = sine(440.0, sr, 4410);
        let audio = AudioBuffer::new(vec![mono.clone(), mono], sr).unwrap();
        let token = CancellationToken::new();
        token.cancel();
        let result = analyze(&audio, NoopProgress, &token);
        assert!(matches!(result, Err(DspError::Cancelled)));
    }

    #[test]
    fn one_khz_tone_reports_dominant_frequency_near_1khz() {
        let sr = 44100;
        let mono = sine(1000.0, sr, sr as usize * 2);
        let audio = AudioBuffer::new(vec![mono.clone(), mono], sr).unwrap();
        let result = analyze(&audio, NoopProgress, &CancellationToken::new()).unwrap();
        assert!((result.frequency.dominant_frequency - 1000.0).abs() < 100.0);
    }
}

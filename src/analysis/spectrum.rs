//! FFT/STFT primitives: windowed FFT, mel-filterbank MFCC, chroma binning,
//! and autocorrelation-based tempo — the spectral half of
//! [`crate::analysis::FeatureExtractor`].
//!
//! Grounded on the teacher's `compute_spectrum` in `src/dsp/spectrum.rs`:
//! same thread-local cached `rustfft` plan and Hann-window approach,
//! upgraded from the teacher's single-frame f32 magnitude spectrum to a
//! full STFT framing pass and extended with a mel filterbank + DCT for
//! MFCC and a chroma pass, per `audio_analyzer.py`'s
//! `_extract_spectral_features`/`_estimate_key`.

use std::cell::RefCell;
use std::sync::Arc;

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

pub const N_FFT: usize = 1024;
pub const HOP: usize = 512;
pub const MEL_BANDS: usize = 40;
pub const MFCC_COUNT: usize = 8;

const EPS: f64 = 1e-10;

struct CachedFft {
    fft: Arc<dyn Fft<f64>>,
    size: usize,
}

thread_local! {
    static FFT_CACHE: RefCell<Option<CachedFft>> = const { RefCell::new(None) };
}

fn get_fft(size: usize) -> Arc<dyn Fft<f64>> {
    FFT_CACHE.with(|cache| {
        let mut cache = cache.borrow_mut();
        if let Some(cached) = cache.as_ref() {
            if cached.size == size {
                return Arc::clone(&cached.fft);
            }
        }
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);
        *cache = Some(CachedFft {
            fft: Arc::clone(&fft),
            size,
        });
        fft
    })
}

fn hann_window(size: usize) -> Vec<f64> {
    (0..size)
        .map(|i| 0.5 * (1.0 - (2.0 * std::f64::consts::PI * i as f64 / (size - 1) as f64).cos()))
        .collect()
}

/// Magnitude spectrum (bins `0..n_fft/2`) of one Hann-windowed frame,
/// zero-padded if `frame` is shorter than `n_fft`.
pub fn magnitude_spectrum(frame: &[f64], n_fft: usize) -> Vec<f64> {
    let window = hann_window(n_fft);
    let mut buffer: Vec<Complex<f64>> = (0..n_fft)
        .map(|i| {
            let s = frame.get(i).copied().unwrap_or(0.0);
            Complex::new(s * window[i], 0.0)
        })
        .collect();

    let fft = get_fft(n_fft);
    fft.process(&mut buffer);

    buffer[..n_fft / 2].iter().map(|c| c.norm()).collect()
}

/// Frame `samples` into overlapping `n_fft`-sized windows with hop `hop`,
/// returning one magnitude spectrum per frame.
pub fn stft_magnitudes(samples: &[f64], n_fft: usize, hop: usize) -> Vec<Vec<f64>> {
    if samples.is_empty() || n_fft == 0 || hop == 0 {
        return Vec::new();
    }
    let mut frames = Vec::new();
    let mut start = 0;
    while start < samples.len() {
        let end = (start + n_fft).min(samples.len());
        frames.push(magnitude_spectrum(&samples[start..end], n_fft));
        start += hop;
    }
    frames
}

/// FFT bin center frequency in Hz.
pub fn bin_frequency(bin: usize, n_fft: usize, sample_rate: u32) -> f64 {
    bin as f64 * sample_rate as f64 / n_fft as f64
}

fn hz_to_mel(hz: f64) -> f64 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

fn mel_to_hz(mel: f64) -> f64 {
    700.0 * (10f64.powf(mel / 2595.0) - 1.0)
}

/// Triangular mel filterbank, `n_mels` filters over `n_fft/2` magnitude
/// bins, spanning 0 Hz to Nyquist.
fn mel_filterbank(n_mels: usize, n_fft: usize, sample_rate: u32) -> Vec<Vec<f64>> {
    let n_bins = n_fft / 2;
    let nyquist = sample_rate as f64 / 2.0;
    let mel_lo = hz_to_mel(0.0);
    let mel_hi = hz_to_mel(nyquist);

    let mel_points: Vec<f64> = (0..n_mels + 2)
        .map(|i| mel_lo + (mel_hi - mel_lo) * i as f64 / (n_mels + 1) as f64)
        .collect();
    let hz_points: Vec<f64> = mel_points.iter().map(|&m| mel_to_hz(m)).collect();
    let bin_points: Vec<usize> = hz_points
        .iter()
        .map(|&hz| ((hz / nyquist) * n_bins as f64).floor() as usize)
        .map(|b| b.min(n_bins.saturating_sub(1)))
        .collect();

    (0..n_mels)
        .map(|m| {
            let (lo, center, hi) = (bin_points[m], bin_points[m + 1], bin_points[m + 2]);
            let mut filter = vec![0.0; n_bins];
            for b in lo..center.max(lo + 1) {
                if b < n_bins && center > lo {
                    filter[b] = (b - lo) as f64 / (center - lo) as f64;
                }
            }
            for b in center..hi.max(center + 1) {
                if b < n_bins && hi > center {
                    filter[b] = 1.0 - (b - center) as f64 / (hi - center) as f64;
                }
            }
            filter
        })
        .collect()
}

/// DCT-II, first `count` coefficients.
fn dct(input: &[f64], count: usize) -> Vec<f64> {
    let n = input.len();
    (0..count)
        .map(|k| {
            let sum: f64 = input
                .iter()
                .enumerate()
                .map(|(i, &x)| x * (std::f64::consts::PI * k as f64 * (2.0 * i as f64 + 1.0) / (2.0 * n as f64)).cos())
                .sum();
            2.0 * sum
        })
        .collect()
}

/// MFCC-like cepstral means/stds across STFT frames: mel filterbank (40
/// bands) of log energy -> DCT -> first `MFCC_COUNT` coefficients per
/// frame, then mean/std across frames.
pub fn mfcc_mean_std(samples: &[f64], sample_rate: u32) -> (Vec<f64>, Vec<f64>) {
    let frames = stft_magnitudes(samples, N_FFT, HOP);
    if frames.is_empty() {
        return (vec![0.0; MFCC_COUNT], vec![0.0; MFCC_COUNT]);
    }
    let filterbank = mel_filterbank(MEL_BANDS, N_FFT, sample_rate);

    let per_frame_mfcc: Vec<Vec<f64>> = frames
        .iter()
        .map(|mag| {
            let mel_energy: Vec<f64> = filterbank
                .iter()
                .map(|filter| {
                    let e: f64 = mag.iter().zip(filter.iter()).map(|(m, f)| m * f).sum();
                    (e + EPS).ln()
                })
                .collect();
            dct(&mel_energy, MFCC_COUNT)
        })
        .collect();

    let n = per_frame_mfcc.len() as f64;
    let mean: Vec<f64> = (0..MFCC_COUNT)
        .map(|k| per_frame_mfcc.iter().map(|f| f[k]).sum::<f64>() / n)
        .collect();
    let std: Vec<f64> = (0..MFCC_COUNT)
        .map(|k| {
            let m = mean[k];
            (per_frame_mfcc.iter().map(|f| (f[k] - m).powi(2)).sum::<f64>() / n).sqrt()
        })
        .collect();
    (mean, std)
}

/// Spectral centroid, 85%-energy rolloff, and zero-crossing rate over the
/// full `samples` slice.
pub fn centroid_rolloff_zcr(samples: &[f64], sample_rate: u32) -> (f64, f64, f64) {
    let frames = stft_magnitudes(samples, N_FFT, HOP);
    if frames.is_empty() {
        return (0.0, 0.0, 0.0);
    }

    let mut centroids = Vec::with_capacity(frames.len());
    let mut rolloffs = Vec::with_capacity(frames.len());
    for mag in &frames {
        let total: f64 = mag.iter().sum();
        if total <= EPS {
            centroids.push(0.0);
            rolloffs.push(0.0);
            continue;
        }
        let weighted: f64 = mag
            .iter()
            .enumerate()
            .map(|(b, &m)| bin_frequency(b, N_FFT, sample_rate) * m)
            .sum();
        centroids.push(weighted / total);

        let target = 0.85 * total;
        let mut acc = 0.0;
        let mut rolloff_bin = mag.len() - 1;
        for (b, &m) in mag.iter().enumerate() {
            acc += m;
            if acc >= target {
                rolloff_bin = b;
                break;
            }
        }
        rolloffs.push(bin_frequency(rolloff_bin, N_FFT, sample_rate));
    }

    let zcr = {
        let crossings = samples.windows(2).filter(|w| (w[0] >= 0.0) != (w[1] >= 0.0)).count();
        crossings as f64 / samples.len().max(1) as f64
    };

    let mean = |v: &[f64]| v.iter().sum::<f64>() / v.len().max(1) as f64;
    (mean(&centroids), mean(&rolloffs), zcr)
}

const PITCH_CLASSES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Chroma vector via STFT-magnitude binning into 12 pitch classes, mean
/// across frames, then argmax -> key name.
pub fn estimate_key(samples: &[f64], sample_rate: u32) -> Option<String> {
    let frames = stft_magnitudes(samples, N_FFT, HOP);
    if frames.is_empty() {
        return None;
    }

    let mut chroma = [0.0f64; 12];
    let mut frame_count = 0usize;
    for mag in &frames {
        let mut any = false;
        for (b, &m) in mag.iter().enumerate().skip(1) {
            let freq = bin_frequency(b, N_FFT, sample_rate);
            if freq < 20.0 {
                continue;
            }
            let midi = 69.0 + 12.0 * (freq / 440.0).log2();
            let pitch_class = midi.round().rem_euclid(12.0) as usize % 12;
            chroma[pitch_class] += m;
            any = true;
        }
        if any {
            frame_count += 1;
        }
    }
    if frame_count == 0 {
        return None;
    }

    let (idx, &max) = chroma
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
        .unwrap();
    if max <= EPS {
        return None;
    }
    Some(PITCH_CLASSES[idx].to_string())
}

/// Tempo in BPM via autocorrelation of a simple spectral-flux onset
/// envelope. Returns `None` (caller defaults to 120) if no clear peak
/// lands in `[60, 200]` BPM.
pub fn estimate_tempo(samples: &[f64], sample_rate: u32) -> Option<f64> {
    let frames = stft_magnitudes(samples, N_FFT, HOP);
    if frames.len() < 4 {
        return None;
    }

    let onset: Vec<f64> = frames
        .windows(2)
        .map(|w| {
            w[1].iter()
                .zip(w[0].iter())
                .map(|(b, a)| (b - a).max(0.0))
                .sum::<f64>()
        })
        .collect();

    let mean = onset.iter().sum::<f64>() / onset.len().max(1) as f64;
    let centered: Vec<f64> = onset.iter().map(|v| v - mean).collect();

    let frame_rate = sample_rate as f64 / HOP as f64;
    let min_lag = (60.0 / 200.0 * frame_rate).round() as usize;
    let max_lag = (60.0 / 60.0 * frame_rate).round() as usize;
    if max_lag == 0 || max_lag >= centered.len() || min_lag >= max_lag {
        return None;
    }

    let mut best_lag = 0usize;
    let mut best_score = f64::MIN;
    for lag in min_lag..=max_lag {
        let score: f64 = (0..centered.len() - lag)
            .map(|i| centered[i] * centered[i + lag])
            .sum();
        if score > best_score {
            best_score = score;
            best_lag = lag;
        }
    }

    if best_lag == 0 || best_score <= 0.0 {
        return None;
    }
    let bpm = 60.0 * frame_rate / best_lag as f64;
    if (60.0..=200.0).contains(&bpm) {
        Some(bpm)
    } else {
        None
    }
}

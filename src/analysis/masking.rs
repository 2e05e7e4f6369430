//! Critical-band (Bark) masking detection.
//!
//! Grounded on `audio_analyzer.py`'s `_analyze_frequency_masking`: mean
//! STFT magnitude per Bark band in dB, `-60 dB` audibility threshold,
//! boost-range recommendation text bucketed by center frequency, sorted by
//! ascending center frequency (insertion order already ascends here since
//! [`crate::bands::BARK_BANDS`] is itself ascending).

use crate::analysis::spectrum::{bin_frequency, stft_magnitudes, N_FFT};
use crate::bands::BARK_BANDS;
use crate::types::{CriticalBand, MaskingAnalysis};

const EPS: f64 = 1e-10;
const AUDIBILITY_THRESHOLD_DB: f64 = -60.0;

pub fn analyze(samples: &[f64], sample_rate: u32) -> MaskingAnalysis {
    let frames = stft_magnitudes(samples, N_FFT, N_FFT / 2);
    let n_bins = N_FFT / 2;

    let mut bands = Vec::with_capacity(BARK_BANDS.len());
    let mut recommendations = Vec::new();
    let mut total_masked = 0usize;

    for &(low, high) in BARK_BANDS.iter() {
        let low_bin = bin_index_for_freq(low, sample_rate, n_bins);
        let high_bin = bin_index_for_freq(high, sample_rate, n_bins).max(low_bin + 1);

        let mean_mag = if frames.is_empty() {
            0.0
        } else {
            let mut sum = 0.0;
            let mut count = 0usize;
            for frame in &frames {
                for b in low_bin..high_bin.min(frame.len()) {
                    sum += frame[b];
                    count += 1;
                }
            }
            if count == 0 {
                0.0
            } else {
                sum / count as f64
            }
        };
        let energy_db = 20.0 * (mean_mag + EPS).log10();
        let is_masked = energy_db < AUDIBILITY_THRESHOLD_DB;
        if is_masked {
            total_masked += 1;
        }

        let center_freq = (low + high) / 2.0;
        if is_masked && center_freq > 100.0 {
            let text = if center_freq < 500.0 {
                format!("Boost {center_freq:.0}Hz (+2-4dB) - masked low frequencies")
            } else if center_freq < 2000.0 {
                format!("Boost {center_freq:.0}Hz (+1-3dB) - masked midrange")
            } else {
                format!("Boost {center_freq:.0}Hz (+2-5dB) - masked high frequencies")
            };
            recommendations.push(text);
        }

        bands.push(CriticalBand {
            center_freq,
            energy_db,
            is_masked,
        });
    }

    MaskingAnalysis {
        bands,
        recommendations,
        total_masked_bands: total_masked,
    }
}

fn bin_index_for_freq(freq: f64, sample_rate: u32, n_bins: usize) -> usize {
    (0..n_bins)
        .min_by(|&a, &b| {
            let da = (bin_frequency(a, N_FFT, sample_rate) - freq).abs();
            let db = (bin_frequency(b, N_FFT, sample_rate) - freq).abs();
            da.partial_cmp(&db).unwrap()
        })
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bark_band_count_is_24() {
        let silence = vec![0.0; 44100];
        let result = analyze(&silence, 44100);
        assert_eq!(result.bands.len(), 24);
    }

    #[test]
    fn silence_masks_every_band() {
        let silence = vec![0.0; 44100];
        let result = analyze(&silence, 44100);
        assert_eq!(result.total_masked_bands, 24);
    }

    #[test]
    fn recommendations_sorted_by_ascending_center_frequency() {
        let silence = vec![0.0; 44100];
        let result = analyze(&silence, 44100);
        let mut freqs: Vec<f64> = Vec::new();
        for band in &result.bands {
            if band.is_masked && band.center_freq > 100.0 {
                freqs.push(band.center_freq);
            }
        }
        let mut sorted = freqs.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(freqs, sorted);
    }
}

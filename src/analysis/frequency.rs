//! Single-FFT frequency-band analysis for mastering suggestions.
//!
//! Grounded on `audio_analyzer.py`'s `_analyze_frequency_spectrum` /
//! `_calculate_spectral_balance`: one FFT over up to 10 s of audio, mean
//! magnitude per named band, dominant-frequency bin, and a three-bucket
//! boost/neutral/cut heuristic on the bass/mid/brilliance bands (the other
//! four bands have no heuristic in the original and stay `Neutral`).

use crate::analysis::spectrum::{bin_frequency, magnitude_spectrum};
use crate::bands::FREQUENCY_BANDS;
use crate::types::{BandEnergies, FrequencyAnalysis, SpectralBalance, SpectralBalanceReport};

const MAX_WINDOW_SECS: f64 = 10.0;
const MIN_DOMINANT_FREQ_HZ: f64 = 20.0;

pub fn analyze(samples: &[f64], sample_rate: u32) -> FrequencyAnalysis {
    let window_len = ((sample_rate as f64 * MAX_WINDOW_SECS) as usize).min(samples.len());
    let windowed = &samples[..window_len];

    let n_fft = window_len.max(1).next_power_of_two();
    let mag = magnitude_spectrum(windowed, n_fft);

    let mut band_energy = [0.0f64; 7];
    for (i, &(_, low, high)) in FREQUENCY_BANDS.iter().enumerate() {
        let mut sum = 0.0;
        let mut count = 0usize;
        for (b, &m) in mag.iter().enumerate() {
            let freq = bin_frequency(b, n_fft, sample_rate);
            if freq >= low && freq <= high {
                sum += m;
                count += 1;
            }
        }
        band_energy[i] = if count == 0 { 0.0 } else { sum / count as f64 };
    }

    let dominant_frequency = mag
        .iter()
        .enumerate()
        .filter(|&(b, _)| bin_frequency(b, n_fft, sample_rate) >= MIN_DOMINANT_FREQ_HZ)
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
        .map(|(b, _)| bin_frequency(b, n_fft, sample_rate))
        .unwrap_or(0.0);

    let energies = BandEnergies {
        sub_bass: band_energy[0],
        bass: band_energy[1],
        low_mid: band_energy[2],
        mid: band_energy[3],
        high_mid: band_energy[4],
        presence: band_energy[5],
        brilliance: band_energy[6],
    };

    FrequencyAnalysis {
        energies,
        dominant_frequency,
        spectral_balance: spectral_balance(&energies),
    }
}

fn spectral_balance(energies: &BandEnergies) -> SpectralBalanceReport {
    let total = energies.sub_bass
        + energies.bass
        + energies.low_mid
        + energies.mid
        + energies.high_mid
        + energies.presence
        + energies.brilliance;

    let ratio = |v: f64| if total > 0.0 { v / total } else { 0.0 };
    let bucket = |r: f64, lo: f64, hi: f64| {
        if r < lo {
            SpectralBalance::Boost
        } else if r > hi {
            SpectralBalance::Cut
        } else {
            SpectralBalance::Neutral
        }
    };

    SpectralBalanceReport {
        sub_bass: SpectralBalance::Neutral,
        bass: bucket(ratio(energies.bass), 0.15, 0.25),
        low_mid: SpectralBalance::Neutral,
        mid: bucket(ratio(energies.mid), 0.20, 0.35),
        high_mid: SpectralBalance::Neutral,
        presence: SpectralBalance::Neutral,
        brilliance: bucket(ratio(energies.brilliance), 0.10, 0.20),
    }
}

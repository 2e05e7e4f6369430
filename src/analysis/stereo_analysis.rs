//! Stereo-field analysis: correlation, mid/side width, L/R balance, phase
//! coherence.
//!
//! Grounded on `audio_analyzer.py`'s `_analyze_stereo_imaging` /
//! `_calculate_phase_coherence`: mono input (a single-channel source,
//! never inferred from comparing sample values) short-circuits to a fixed
//! neutral report; otherwise Pearson correlation, mean-square mid/side
//! "energy" ratio for width, mean-square L/R energy for balance, and a
//! normalized cross-correlation for phase coherence. Recommendation
//! thresholds and wording follow spec.md §4.9 exactly.
//!
//! The phase-coherence search windows the lag range instead of the
//! original's unbounded `np.correlate(..., mode='full')` — an O(n^2) scan
//! over a 30 s analysis window is not something either language can afford
//! at that length; DESIGN.md records this as a deliberate deviation.

use crate::types::StereoAnalysis;

const EPS: f64 = 1e-10;
const MAX_LAG: usize = 4096;

/// `is_mono` must come from the source's real channel count (e.g.
/// [`crate::types::AudioBuffer::is_mono`]) — a genuinely stereo track with
/// identical or silent channels must still report `is_mono=false`.
pub fn analyze(left: &[f64], right: &[f64], is_mono: bool) -> StereoAnalysis {
    if is_mono || left.is_empty() || right.is_empty() {
        return StereoAnalysis {
            is_mono: true,
            width: 0.0,
            correlation: 1.0,
            balance: 0.0,
            phase_coherence: 1.0,
            mid_energy_db: energy_db(mean_square(left)),
            side_energy_db: -100.0,
            recommendations: vec!["Track is mono - consider stereo enhancement".to_string()],
        };
    }

    let n = left.len().min(right.len());
    let mid: Vec<f64> = (0..n).map(|i| (left[i] + right[i]) / 2.0).collect();
    let side: Vec<f64> = (0..n).map(|i| (left[i] - right[i]) / 2.0).collect();

    let correlation = pearson_correlation(left, right);

    let mid_energy = mean_square(&mid);
    let side_energy = mean_square(&side);
    let width = side_energy / (mid_energy + EPS);

    let left_energy = mean_square(left);
    let right_energy = mean_square(right);
    let balance = (right_energy - left_energy) / (right_energy + left_energy + EPS);

    let phase_coherence = estimate_phase_coherence(left, right);

    let mut recommendations = Vec::new();
    if width < 0.1 {
        recommendations.push("Very narrow stereo image - increase stereo width (+20-40%)".to_string());
    } else if width > 2.0 {
        recommendations.push("Overly wide stereo image - reduce width (-10-20%)".to_string());
    }
    if balance.abs() > 0.1 {
        let side_name = if balance > 0.0 { "right" } else { "left" };
        recommendations.push(format!(
            "Stereo imbalance detected - {side_name} channel louder ({:.1}%)",
            balance.abs() * 100.0
        ));
    }
    if correlation < 0.7 {
        recommendations.push("Low stereo correlation - check phase issues".to_string());
    } else if correlation > 0.95 {
        recommendations.push("Very high correlation - consider stereo enhancement".to_string());
    }
    if phase_coherence < 0.8 {
        recommendations.push("Phase coherence issues detected - check stereo alignment".to_string());
    }

    StereoAnalysis {
        is_mono: false,
        width,
        correlation,
        balance,
        phase_coherence,
        mid_energy_db: energy_db(mid_energy),
        side_energy_db: energy_db(side_energy),
        recommendations,
    }
}

fn mean_square(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().map(|s| s * s).sum::<f64>() / samples.len() as f64
}

fn energy_db(mean_sq: f64) -> f64 {
    20.0 * (mean_sq.sqrt() + EPS).log10()
}

fn pearson_correlation(left: &[f64], right: &[f64]) -> f64 {
    let n = left.len().min(right.len());
    if n == 0 {
        return 1.0;
    }
    let mean_l = left[..n].iter().sum::<f64>() / n as f64;
    let mean_r = right[..n].iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_l = 0.0;
    let mut var_r = 0.0;
    for i in 0..n {
        let dl = left[i] - mean_l;
        let dr = right[i] - mean_r;
        cov += dl * dr;
        var_l += dl * dl;
        var_r += dr * dr;
    }
    let denom = (var_l * var_r).sqrt();
    if denom < EPS {
        1.0
    } else {
        (cov / denom).clamp(-1.0, 1.0)
    }
}

/// `|max cross-correlation| / sqrt(autocorr_L(0) * autocorr_R(0))`, searched
/// over lags `[-MAX_LAG, MAX_LAG]` rather than the full signal length.
fn estimate_phase_coherence(left: &[f64], right: &[f64]) -> f64 {
    let n = left.len().min(right.len());
    if n == 0 {
        return 1.0;
    }
    let autocorr_l: f64 = left[..n].iter().map(|v| v * v).sum();
    let autocorr_r: f64 = right[..n].iter().map(|v| v * v).sum();
    let denom = (autocorr_l * autocorr_r).sqrt();
    if denom < EPS {
        return 1.0;
    }

    let max_lag = MAX_LAG.min(n.saturating_sub(1));
    let mut best_abs = 0.0f64;
    for lag in 0..=max_lag {
        let pos: f64 = (0..n - lag).map(|i| left[i + lag] * right[i]).sum();
        best_abs = best_abs.max(pos.abs());
        if lag > 0 {
            let neg: f64 = (0..n - lag).map(|i| left[i] * right[i + lag]).sum();
            best_abs = best_abs.max(neg.abs());
        }
    }

    (best_abs / denom).min(1.0)
}

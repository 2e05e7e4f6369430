//! The AI-mastering collaborator boundary.
//!
//! Grounded on `ai_mastering.py`, which calls out to a real LLM for
//! settings suggestions. The core never does that (Design Notes §9) — it
//! only defines the trait boundary and a deterministic fallback so
//! embedders have something to wire in and to test against.

use crate::error::DspError;
use crate::presets::genre_preset;
use crate::types::{AnalysisResult, MasteringSettings};

pub trait AiSuggester {
    fn suggest(&self, analysis: &AnalysisResult) -> Result<MasteringSettings, DspError>;
}

/// Always falls back to the genre preset matching `analysis.genre.label`.
pub struct NullSuggester;

impl AiSuggester for NullSuggester {
    fn suggest(&self, analysis: &AnalysisResult) -> Result<MasteringSettings, DspError> {
        Ok(genre_preset(analysis.genre.label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        BandEnergies, FrequencyAnalysis, GenreLabel, GenrePrediction, LoudnessMetrics,
        MaskingAnalysis, SpectralBalance, SpectralBalanceReport, SpectralFeatures, StereoAnalysis,
    };

    fn sample_analysis(label: GenreLabel) -> AnalysisResult {
        AnalysisResult {
            duration_secs: 1.0,
            sample_rate: 44100,
            channels: 2,
            tempo_bpm: 120.0,
            tempo_defaulted: false,
            key: "C".to_string(),
            key_defaulted: false,
            loudness: LoudnessMetrics {
                rms_db: -20.0,
                peak_db: -6.0,
                lufs_integrated: -20.0,
                lufs_approx: -17.0,
                dynamic_range: 14.0,
            },
            spectral: SpectralFeatures {
                mfcc_mean: vec![0.0; 8],
                mfcc_std: vec![0.0; 8],
                spectral_centroid_mean: 1500.0,
                spectral_rolloff_mean: 2000.0,
                zcr_mean: 0.05,
            },
            frequency: FrequencyAnalysis {
                energies: BandEnergies {
                    sub_bass: 0.0,
                    bass: 0.0,
                    low_mid: 0.0,
                    mid: 0.0,
                    high_mid: 0.0,
                    presence: 0.0,
                    brilliance: 0.0,
                },
                dominant_frequency: 440.0,
                spectral_balance: SpectralBalanceReport {
                    sub_bass: SpectralBalance::Neutral,
                    bass: SpectralBalance::Neutral,
                    low_mid: SpectralBalance::Neutral,
                    mid: SpectralBalance::Neutral,
                    high_mid: SpectralBalance::Neutral,
                    presence: SpectralBalance::Neutral,
                    brilliance: SpectralBalance::Neutral,
                },
            },
            masking: MaskingAnalysis {
                bands: Vec::new(),
                recommendations: Vec::new(),
                total_masked_bands: 0,
            },
            stereo: StereoAnalysis {
                is_mono: false,
                width: 1.0,
                correlation: 0.5,
                balance: 0.0,
                phase_coherence: 1.0,
                mid_energy_db: -20.0,
                side_energy_db: -24.0,
                recommendations: Vec::new(),
            },
            genre: GenrePrediction {
                label,
                confidence: 0.8,
            },
            genre_defaulted: false,
        }
    }

    #[test]
    fn null_suggester_matches_genre_preset() {
        let analysis = sample_analysis(GenreLabel::Jazz);
        let suggester = NullSuggester;
        let settings = suggester.suggest(&analysis).unwrap();
        assert_eq!(settings, genre_preset(GenreLabel::Jazz));
    }

    #[test]
    fn null_suggester_on_hip_hop_falls_back_to_rock() {
        let analysis = sample_analysis(GenreLabel::HipHop);
        let suggester = NullSuggester;
        let settings = suggester.suggest(&analysis).unwrap();
        assert_eq!(settings, genre_preset(GenreLabel::Rock));
    }
}

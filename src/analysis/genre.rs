//! Deterministic, rule-based genre classification.
//!
//! Transcribed from `audio_analyzer.py`'s `_predict_genre`: five additive
//! scores over MFCC/centroid/rolloff/ZCR/tempo thresholds, argmax wins,
//! confidence below 0.3 forces a pop fallback at confidence 0.5. No
//! machine-learning model, just the same fixed rules as the original.

use crate::types::{GenreLabel, GenrePrediction};

pub struct GenreFeatures {
    pub mfcc_mean: Vec<f64>,
    pub mfcc1_std: f64,
    pub spectral_centroid_mean: f64,
    pub spectral_rolloff_mean: f64,
    pub zcr_mean: f64,
    pub tempo_bpm: f64,
}

/// Returns the prediction plus whether the top score was too weak (< 0.3)
/// and the result is the pop fallback rather than a genuine top scorer.
pub fn predict_with_defaulted(features: &GenreFeatures) -> (GenrePrediction, bool) {
    let prediction = predict(features);
    let defaulted = prediction.label == GenreLabel::Pop && prediction.confidence == 0.5;
    (prediction, defaulted)
}

pub fn predict(features: &GenreFeatures) -> GenrePrediction {
    let centroid = features.spectral_centroid_mean;
    let rolloff = features.spectral_rolloff_mean;
    let zcr = features.zcr_mean;
    let tempo = features.tempo_bpm;
    let mfcc = |i: usize| features.mfcc_mean.get(i).copied().unwrap_or(0.0);

    let mut electronic = 0.0;
    if centroid > 1800.0 {
        electronic += 0.4;
    }
    if zcr > 0.05 {
        electronic += 0.3;
    }
    if tempo > 110.0 && tempo < 180.0 {
        electronic += 0.3;
    }
    if rolloff > 2500.0 {
        electronic += 0.3;
    }
    if mfcc(2) > 10.0 {
        electronic += 0.4;
    }
    if features.mfcc1_std > 20.0 {
        electronic += 0.3;
    }

    let mut rock = 0.0;
    if centroid > 1500.0 && centroid < 3000.0 {
        rock += 0.2;
    }
    if tempo > 100.0 && tempo < 160.0 {
        rock += 0.2;
    }
    if rolloff > 3000.0 {
        rock += 0.3;
    }
    if mfcc(2) < 0.0 {
        rock += 0.3;
    }

    let mut jazz = 0.0;
    if centroid < 1500.0 {
        jazz += 0.2;
    }
    if tempo > 80.0 && tempo < 120.0 {
        jazz += 0.2;
    }
    if zcr < 0.03 {
        jazz += 0.3;
    }
    if features.mfcc1_std < 15.0 {
        jazz += 0.2;
    }
    if rolloff < 2000.0 {
        jazz += 0.3;
    }

    let mut hip_hop = 0.0;
    if tempo > 70.0 && tempo < 100.0 {
        hip_hop += 0.3;
    }
    if centroid < 1800.0 {
        hip_hop += 0.2;
    }
    if mfcc(0) > 0.0 {
        hip_hop += 0.3;
    }
    if rolloff < 2500.0 {
        hip_hop += 0.2;
    }

    let mut pop = 0.0;
    if tempo > 90.0 && tempo < 130.0 {
        pop += 0.2;
    }
    if centroid > 1000.0 && centroid < 2500.0 {
        pop += 0.3;
    }
    if zcr > 0.03 && zcr < 0.08 {
        pop += 0.3;
    }
    if mfcc(1).abs() < 0.5 {
        pop += 0.2;
    }

    let scores = [
        (GenreLabel::Electronic, electronic),
        (GenreLabel::Rock, rock),
        (GenreLabel::Jazz, jazz),
        (GenreLabel::HipHop, hip_hop),
        (GenreLabel::Pop, pop),
    ];

    let (label, confidence) = scores
        .iter()
        .copied()
        .fold((GenreLabel::Electronic, f64::MIN), |best, candidate| {
            if candidate.1 > best.1 {
                candidate
            } else {
                best
            }
        });

    if confidence < 0.3 {
        GenrePrediction {
            label: GenreLabel::Pop,
            confidence: 0.5,
        }
    } else {
        GenrePrediction {
            label,
            confidence: confidence.min(1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weak_evidence_defaults_to_pop_at_half_confidence() {
        // Every rule threshold below is deliberately missed (jazz and
        // hip-hop each pick up a single 0.2 predicate from the low
        // centroid, but nothing reaches the 0.3 floor), so the strongest
        // raw score here is 0.2 and the pop fallback takes over.
        let features = GenreFeatures {
            mfcc_mean: vec![0.0, 1.0, 5.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            mfcc1_std: 15.0,
            spectral_centroid_mean: 900.0,
            spectral_rolloff_mean: 2500.0,
            zcr_mean: 0.03,
            tempo_bpm: 50.0,
        };
        let prediction = predict(&features);
        assert_eq!(prediction.label, GenreLabel::Pop);
        assert_eq!(prediction.confidence, 0.5);
    }

    #[test]
    fn strong_electronic_profile_wins() {
        let features = GenreFeatures {
            mfcc_mean: vec![0.0, 0.0, 15.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            mfcc1_std: 25.0,
            spectral_centroid_mean: 2500.0,
            spectral_rolloff_mean: 3000.0,
            zcr_mean: 0.1,
            tempo_bpm: 128.0,
        };
        let prediction = predict(&features);
        assert_eq!(prediction.label, GenreLabel::Electronic);
        assert!(prediction.confidence >= 0.3);
    }

    #[test]
    fn confidence_is_never_above_one() {
        let features = GenreFeatures {
            mfcc_mean: vec![0.0, 0.0, 15.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            mfcc1_std: 25.0,
            spectral_centroid_mean: 2500.0,
            spectral_rolloff_mean: 3500.0,
            zcr_mean: 0.1,
            tempo_bpm: 128.0,
        };
        let prediction = predict(&features);
        assert!(prediction.confidence <= 1.0);
    }
}

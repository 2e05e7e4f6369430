//! Fixed genre mastering presets.
//!
//! Transcribed verbatim (same frequencies, gains, ratios) from
//! `mastering_engine.py`'s `get_genre_preset`. The Python original only
//! defines `rock`/`electronic`/`jazz` and falls back to `rock` for anything
//! else via `presets.get(genre, presets['rock'])` — `hip-hop` and `pop`
//! inherit the rock preset here too, matching that fallback exactly.

use crate::types::{
    CompressionSettings, EqBand, EqShape, EqSettings, GenreLabel, LimitingSettings,
    MasteringSettings, SaturationKind, SaturationSettings, StereoSettings,
};

pub fn genre_preset(genre: GenreLabel) -> MasteringSettings {
    match genre {
        GenreLabel::Electronic => electronic(),
        GenreLabel::Jazz => jazz(),
        GenreLabel::Rock | GenreLabel::Pop | GenreLabel::HipHop => rock(),
    }
}

fn rock() -> MasteringSettings {
    MasteringSettings {
        eq: Some(EqSettings {
            bands: vec![
                EqBand { frequency_hz: 100.0, gain_db: 2.0, q: 0.7, shape: EqShape::Peak },
                EqBand { frequency_hz: 3000.0, gain_db: -2.0, q: 1.0, shape: EqShape::Peak },
                EqBand { frequency_hz: 10000.0, gain_db: 3.0, q: 0.7, shape: EqShape::Peak },
            ],
        }),
        compression: Some(CompressionSettings {
            threshold_db: -8.0,
            ratio: 4.0,
            attack_secs: 0.003,
            release_secs: 0.1,
            makeup_gain_db: 3.0,
            target_dynamic_range_db: None,
        }),
        saturation: Some(SaturationSettings {
            drive: 1.5,
            kind: SaturationKind::Tube,
            mix: 0.3,
        }),
        stereo: None,
        limiting: Some(LimitingSettings {
            ceiling_db: -0.3,
            release_secs: 0.05,
        }),
    }
}

fn electronic() -> MasteringSettings {
    MasteringSettings {
        eq: Some(EqSettings {
            bands: vec![
                EqBand { frequency_hz: 60.0, gain_db: 4.0, q: 0.7, shape: EqShape::Peak },
                EqBand { frequency_hz: 8000.0, gain_db: 2.0, q: 0.7, shape: EqShape::Peak },
            ],
        }),
        compression: Some(CompressionSettings {
            threshold_db: -6.0,
            ratio: 6.0,
            attack_secs: 0.001,
            release_secs: 0.05,
            makeup_gain_db: 2.0,
            target_dynamic_range_db: None,
        }),
        saturation: None,
        stereo: Some(StereoSettings {
            width: 1.3,
            bass_mono_freq: None,
        }),
        limiting: Some(LimitingSettings {
            ceiling_db: -0.1,
            release_secs: 0.03,
        }),
    }
}

fn jazz() -> MasteringSettings {
    MasteringSettings {
        eq: Some(EqSettings {
            bands: vec![
                EqBand { frequency_hz: 200.0, gain_db: 1.0, q: 0.5, shape: EqShape::Peak },
                EqBand { frequency_hz: 5000.0, gain_db: 1.5, q: 0.7, shape: EqShape::Peak },
            ],
        }),
        compression: Some(CompressionSettings {
            threshold_db: -15.0,
            ratio: 2.5,
            attack_secs: 0.01,
            release_secs: 0.2,
            makeup_gain_db: 1.0,
            target_dynamic_range_db: None,
        }),
        saturation: Some(SaturationSettings {
            drive: 1.1,
            kind: SaturationKind::Tape,
            mix: 0.2,
        }),
        stereo: None,
        limiting: Some(LimitingSettings {
            ceiling_db: -1.0,
            release_secs: 0.1,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hip_hop_and_pop_fall_back_to_rock() {
        assert_eq!(genre_preset(GenreLabel::HipHop), genre_preset(GenreLabel::Rock));
        assert_eq!(genre_preset(GenreLabel::Pop), genre_preset(GenreLabel::Rock));
    }

    #[test]
    fn every_preset_validates_at_44_1khz() {
        for genre in [
            GenreLabel::Rock,
            GenreLabel::Electronic,
            GenreLabel::Jazz,
            GenreLabel::HipHop,
            GenreLabel::Pop,
        ] {
            genre_preset(genre).validate(44100).unwrap();
        }
    }

    #[test]
    fn electronic_preset_widens_stereo_image() {
        let settings = genre_preset(GenreLabel::Electronic);
        assert_eq!(settings.stereo.unwrap().width, 1.3);
    }
}

//! The mastering-chain façade: EQ → Saturation → Compression → Stereo →
//! Limiting, fixed per spec.md §4.6.
//!
//! Grounded on `mastering_engine.py`'s `apply_mastering_chain`, which
//! gates each stage on the corresponding settings subsection being
//! present — "absent subsection = bypass", carried over unchanged. The
//! stage order here intentionally differs from the Python original (EQ →
//! Compression → Saturation → Stereo → Limiting); spec.md §4.6 fixes the
//! new order and DESIGN.md records why (Open Question (2)).

use crate::dsp::biquad::{BiquadDesigner, FilterRunner};
use crate::dsp::dynamics::DynamicsProcessor;
use crate::dsp::saturation::SaturationProcessor;
use crate::dsp::stereo::StereoProcessor;
use crate::error::{DspError, Stage};
use crate::types::{AudioBuffer, MasteringSettings};

/// A value type holding only the sample rate — no ambient singleton state,
/// per the Design Note "Ambient singletons: none."
#[derive(Debug, Clone, Copy)]
pub struct MasteringEngine {
    sample_rate: u32,
}

impl MasteringEngine {
    pub fn new(sample_rate: u32) -> Self {
        Self { sample_rate }
    }

    /// Run the fixed mastering chain. Always emits stereo, even for a mono
    /// input (upmixed at the stereo stage). Aborts with
    /// `DspError::Dsp{stage, ..}` the instant any stage produces a
    /// non-finite sample.
    pub fn master(&self, audio: &AudioBuffer, settings: &MasteringSettings) -> Result<AudioBuffer, DspError> {
        settings.validate(self.sample_rate)?;
        log::debug!("master: {} frames @ {}Hz", audio.frame_count(), self.sample_rate);

        let mut left = audio.left().to_vec();
        let mut right = audio.right().to_vec();

        if let Some(eq) = &settings.eq {
            left = apply_eq_chain(&left, eq, self.sample_rate)?;
            right = apply_eq_chain(&right, eq, self.sample_rate)?;
        }

        if let Some(sat) = &settings.saturation {
            left = SaturationProcessor::process(&left, sat)?;
            right = SaturationProcessor::process(&right, sat)?;
        }

        if let Some(comp) = &settings.compression {
            let resolved_l = DynamicsProcessor::resolve_dynamic_range_target(&left, comp);
            let resolved_r = DynamicsProcessor::resolve_dynamic_range_target(&right, comp);
            left = DynamicsProcessor::compress(&left, &resolved_l, self.sample_rate)?;
            right = DynamicsProcessor::compress(&right, &resolved_r, self.sample_rate)?;
        }

        if let Some(stereo) = &settings.stereo {
            let (l, r) = StereoProcessor::process(&left, &right, stereo, self.sample_rate)?;
            left = l;
            right = r;
        }

        if let Some(limiting) = &settings.limiting {
            left = DynamicsProcessor::limit(&left, limiting, self.sample_rate)?;
            right = DynamicsProcessor::limit(&right, limiting, self.sample_rate)?;
        }

        AudioBuffer::new(vec![left, right], self.sample_rate)
    }
}

fn apply_eq_chain(
    samples: &[f64],
    eq: &crate::types::EqSettings,
    sample_rate: u32,
) -> Result<Vec<f64>, DspError> {
    let mut buf = samples.to_vec();
    for band in &eq.bands {
        if let Some(coeffs) = BiquadDesigner::for_band(band, sample_rate) {
            buf = FilterRunner::run_zero_phase(&coeffs, &buf).map_err(|e| match e {
                DspError::Dsp { cause, index, .. } => DspError::Dsp {
                    stage: Stage::Eq,
                    cause,
                    index,
                },
                other => other,
            })?;
        }
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        CompressionSettings, EqBand, EqShape, EqSettings, LimitingSettings, SaturationKind,
        SaturationSettings, StereoSettings,
    };

    fn sine(freq: f64, sample_rate: u32, n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| (2.0 * std::f64::consts::PI * freq * i as f64 / sample_rate as f64).sin())
            .collect()
    }

    fn rms(samples: &[f64]) -> f64 {
        (samples.iter().map(|s| s * s).sum::<f64>() / samples.len() as f64).sqrt()
    }

    #[test]
    fn identity_settings_is_near_passthrough() {
        let sr = 44100;
        let mono = sine(440.0, sr, 4410);
        let audio = AudioBuffer::new(vec![mono.clone(), mono.clone()], sr).unwrap();
        let engine = MasteringEngine::new(sr);
        let out = engine.master(&audio, &MasteringSettings::default()).unwrap();

        let diff: Vec<f64> = out
            .left()
            .iter()
            .zip(mono.iter())
            .map(|(a, b)| a - b)
            .collect();
        assert!(rms(&diff) < 1e-6);
    }

    #[test]
    fn eq_symmetry_recovers_input() {
        let sr = 44100;
        let mono = sine(1000.0, sr, 8820);
        let audio = AudioBuffer::new(vec![mono.clone(), mono.clone()], sr).unwrap();
        let band_up = EqBand {
            frequency_hz: 1000.0,
            gain_db: 6.0,
            q: 1.0,
            shape: EqShape::Peak,
        };
        let mut band_down = band_up;
        band_down.gain_db = -6.0;

        let engine = MasteringEngine::new(sr);
        let settings = MasteringSettings {
            eq: Some(EqSettings {
                bands: vec![band_up, band_down],
            }),
            ..Default::default()
        };
        let out = engine.master(&audio, &settings).unwrap();
        let diff: Vec<f64> = out
            .left()
            .iter()
            .zip(mono.iter())
            .map(|(a, b)| a - b)
            .collect();
        assert!(rms(&diff) < 1e-3, "rms diff = {}", rms(&diff));
    }

    #[test]
    fn limiter_honors_ceiling_end_to_end() {
        let sr = 44100;
        let mono = sine(300.0, sr, 4410);
        let audio = AudioBuffer::new(vec![mono.clone(), mono.clone()], sr).unwrap();
        let engine = MasteringEngine::new(sr);
        let settings = MasteringSettings {
            limiting: Some(LimitingSettings {
                ceiling_db: -1.0,
                release_secs: 0.05,
            }),
            ..Default::default()
        };
        let out = engine.master(&audio, &settings).unwrap();
        let ceiling_lin = 10f64.powf(-1.0 / 20.0);
        for ch in out.channels() {
            for &s in ch {
                assert!(s.abs() <= ceiling_lin + 1e-9);
            }
        }
    }

    #[test]
    fn silence_stays_silent_through_full_chain() {
        let sr = 44100;
        let silence = vec![0.0; 4410];
        let audio = AudioBuffer::new(vec![silence.clone(), silence.clone()], sr).unwrap();
        let engine = MasteringEngine::new(sr);
        let settings = MasteringSettings {
            eq: Some(EqSettings {
                bands: vec![EqBand {
                    frequency_hz: 1000.0,
                    gain_db: 3.0,
                    q: 1.0,
                    shape: EqShape::Peak,
                }],
            }),
            compression: Some(CompressionSettings {
                threshold_db: -20.0,
                ratio: 4.0,
                ..Default::default()
            }),
            saturation: Some(SaturationSettings {
                drive: 2.0,
                kind: SaturationKind::Tube,
                mix: 0.5,
            }),
            stereo: Some(StereoSettings::default()),
            limiting: Some(LimitingSettings::default()),
        };
        let out = engine.master(&audio, &settings).unwrap();
        for ch in out.channels() {
            for &s in ch {
                assert!(s.abs() < 1e-9);
            }
        }
    }

    #[test]
    fn mono_input_is_upmixed_to_stereo() {
        let sr = 44100;
        let mono = sine(220.0, sr, 2205);
        let audio = AudioBuffer::new(vec![mono], sr).unwrap();
        let engine = MasteringEngine::new(sr);
        let out = engine
            .master(&audio, &MasteringSettings::default())
            .unwrap();
        assert_eq!(out.channel_count(), 2);
    }
}

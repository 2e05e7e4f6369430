//! Element-wise harmonic saturation with wet/dry mix.
//!
//! The teacher has no saturation stage (the WORLD vocoder pipeline has no
//! analogue). Grounded on `mastering_engine.py`'s `_tube_saturation`,
//! `_tape_saturation`, and `_soft_clipper`, written in the teacher's plain
//! free-function style (c.f. `apply_gain`/`apply_biquad` in
//! `src/dsp/effects.rs`).

use crate::error::{DspError, Stage};
use crate::types::{SaturationKind, SaturationSettings};

pub struct SaturationProcessor;

impl SaturationProcessor {
    pub fn process(samples: &[f64], settings: &SaturationSettings) -> Result<Vec<f64>, DspError> {
        if settings.is_neutral() {
            return Ok(samples.to_vec());
        }

        let wet_fn: fn(f64) -> f64 = match settings.kind {
            SaturationKind::Tube => tube,
            SaturationKind::Tape => tape,
            SaturationKind::SoftClip => soft_clip,
        };

        let mut out = Vec::with_capacity(samples.len());
        for (i, &x) in samples.iter().enumerate() {
            let driven = settings.drive * x;
            let wet = wet_fn(driven);
            let y = x * (1.0 - settings.mix) + wet * settings.mix;
            if !y.is_finite() {
                return Err(DspError::dsp_at(Stage::Saturation, "non-finite sample", i));
            }
            out.push(y);
        }
        Ok(out)
    }
}

fn tube(x: f64) -> f64 {
    (0.7 * x).tanh() * 0.95
}

fn tape(x: f64) -> f64 {
    x / (1.0 + x.abs())
}

fn soft_clip(x: f64) -> f64 {
    x.signum() * (1.0 - (-x.abs()).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_mix_is_passthrough() {
        let settings = SaturationSettings {
            drive: 2.0,
            kind: SaturationKind::Tube,
            mix: 0.0,
        };
        let input = vec![0.1, -0.5, 0.9];
        let out = SaturationProcessor::process(&input, &settings).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn all_three_kinds_are_odd_functions() {
        for kind in [SaturationKind::Tube, SaturationKind::Tape, SaturationKind::SoftClip] {
            let settings = SaturationSettings {
                drive: 3.0,
                kind,
                mix: 1.0,
            };
            let pos = SaturationProcessor::process(&[0.3], &settings).unwrap()[0];
            let neg = SaturationProcessor::process(&[-0.3], &settings).unwrap()[0];
            assert!((pos + neg).abs() < 1e-9, "{kind:?}: {pos} + {neg} != 0");
        }
    }

    #[test]
    fn full_drive_mix_stays_bounded() {
        let settings = SaturationSettings {
            drive: 50.0,
            kind: SaturationKind::SoftClip,
            mix: 1.0,
        };
        let out = SaturationProcessor::process(&[1.0, -1.0], &settings).unwrap();
        for y in out {
            assert!(y.abs() <= 1.01);
        }
    }
}

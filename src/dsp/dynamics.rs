//! Feed-forward compressor and brick-wall limiter.
//!
//! Grounded on the teacher's `apply_compressor` in `src/dsp/effects.rs`,
//! generalized from its fixed ratio/attack/release to arbitrary
//! [`CompressionSettings`], and given the dynamic-range auto-targeting
//! from `audio_analyzer.py`'s `_optimize_compression_for_dr`. The limiter
//! is grounded on `mastering_engine.py`'s `_apply_limiting_channel`.
//!
//! Both processors are strictly causal (forward-only) per the Design Note
//! "Zero-phase filtering" — only EQ runs zero-phase.

use crate::dsp::envelope::EnvelopeFollower;
use crate::error::{DspError, Stage};
use crate::types::{CompressionSettings, LimitingSettings};

const EPS: f64 = 1e-10;

pub struct DynamicsProcessor;

impl DynamicsProcessor {
    /// Apply the compressor to one channel. `settings` is resolved (any
    /// dynamic-range auto-targeting already folded in) before this call —
    /// see [`Self::resolve_dynamic_range_target`].
    pub fn compress(
        samples: &[f64],
        settings: &CompressionSettings,
        sample_rate: u32,
    ) -> Result<Vec<f64>, DspError> {
        let mut env = EnvelopeFollower::new(settings.attack_secs, settings.release_secs, sample_rate);
        let makeup_linear = 10f64.powf(settings.makeup_gain_db / 20.0);

        let mut out = Vec::with_capacity(samples.len());
        for (i, &x) in samples.iter().enumerate() {
            let mag = x.abs();
            let x_db = 20.0 * (mag + EPS).log10();
            let gr = (x_db - settings.threshold_db).max(0.0) * (1.0 - 1.0 / settings.ratio);
            let smoothed_gr = env.process(gr);

            let sign = x.signum();
            let out_db = x_db - smoothed_gr;
            let y = sign * 10f64.powf(out_db / 20.0) * makeup_linear;

            if !y.is_finite() {
                return Err(DspError::dsp_at(Stage::Compression, "non-finite sample", i));
            }
            out.push(y);
        }
        Ok(out)
    }

    /// Dynamic-range auto-targeting, per spec.md §4.3: if the measured DR
    /// differs from `target` by more than 2 dB, nudge threshold and ratio
    /// toward it and clamp ratio to [1.5, 10].
    pub fn resolve_dynamic_range_target(
        samples: &[f64],
        settings: &CompressionSettings,
    ) -> CompressionSettings {
        let Some(target) = settings.target_dynamic_range_db else {
            return *settings;
        };

        let peak = samples.iter().fold(0.0f64, |m, &s| m.max(s.abs()));
        let rms = (samples.iter().map(|s| s * s).sum::<f64>() / samples.len().max(1) as f64).sqrt();
        let current_dr = 20.0 * (peak / (rms + EPS)).log10();
        let delta = current_dr - target;

        if delta.abs() <= 2.0 {
            return *settings;
        }

        let mut resolved = *settings;
        if delta > 2.0 {
            resolved.threshold_db -= (delta.abs() * 0.5).min(6.0);
            resolved.ratio = (resolved.ratio * (1.0 + delta.abs() * 0.1)).min(10.0);
        } else {
            resolved.threshold_db += (delta.abs() * 0.3).min(4.0);
            resolved.ratio = (resolved.ratio * (1.0 - delta.abs() * 0.05)).max(1.5);
        }
        resolved.ratio = resolved.ratio.clamp(1.5, 10.0);
        resolved
    }

    /// Brick-wall limiter: attack is instantaneous, release smooths
    /// upward. Guarantees `|y_i| <= ceiling_lin + 1 ULP`.
    pub fn limit(
        samples: &[f64],
        settings: &LimitingSettings,
        sample_rate: u32,
    ) -> Result<Vec<f64>, DspError> {
        let ceiling_lin = 10f64.powf(settings.ceiling_db / 20.0);
        let release_samples = (settings.release_secs * sample_rate as f64).max(1.0);
        let release_coeff = 1.0 - 1.0 / release_samples;

        let mut gain = 1.0f64;
        let mut out = Vec::with_capacity(samples.len());
        for (i, &x) in samples.iter().enumerate() {
            let mag = x.abs();
            let required = if mag > ceiling_lin {
                ceiling_lin / mag
            } else {
                1.0
            };

            gain = if required < gain {
                required // attack: instant drop
            } else {
                // release: smooth climb back toward 1.0, never overshooting `required`.
                (gain * release_coeff + required * (1.0 - release_coeff)).min(required)
            };

            let y = x * gain;
            if !y.is_finite() {
                return Err(DspError::dsp_at(Stage::Limiting, "non-finite sample", i));
            }
            out.push(y);
        }

        let max_abs = out.iter().fold(0.0f64, |m, &s| m.max(s.abs()));
        if max_abs > ceiling_lin + 1e-9 {
            return Err(DspError::dsp(
                Stage::Limiting,
                format!("limiter ceiling violated: {max_abs} > {ceiling_lin}"),
            ));
        }
        Ok(out)
    }
}

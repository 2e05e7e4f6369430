//! Mid/side decomposition, width scaling, and mono-fold safety.
//!
//! The teacher's pipeline is mono end-to-end (WORLD vocoder), so it has no
//! stereo processor. Grounded on `mastering_engine.py`'s
//! `apply_stereo_processing` (mid/side width math, always-stereo output),
//! written using [`crate::dsp::biquad`] for the optional `bass_mono_freq`
//! high-pass-the-side-channel stage, the way the teacher composes its own
//! biquad helper into `apply_eq`/`apply_effects`.

use crate::dsp::biquad::{BiquadDesigner, FilterRunner};
use crate::error::{DspError, Stage};
use crate::types::StereoSettings;

pub struct StereoProcessor;

impl StereoProcessor {
    /// `left`/`right` must already be equal length (mono input is expected
    /// to have been duplicated by the caller before this runs — see
    /// [`crate::mastering::MasteringEngine`]).
    pub fn process(
        left: &[f64],
        right: &[f64],
        settings: &StereoSettings,
        sample_rate: u32,
    ) -> Result<(Vec<f64>, Vec<f64>), DspError> {
        let n = left.len();
        let mut mid = Vec::with_capacity(n);
        let mut side = Vec::with_capacity(n);
        for i in 0..n {
            mid.push((left[i] + right[i]) / 2.0);
            side.push((left[i] - right[i]) / 2.0 * settings.width);
        }

        if let Some(cutoff) = settings.bass_mono_freq {
            let coeffs = BiquadDesigner::highpass(cutoff, sample_rate);
            side = FilterRunner::run_zero_phase(&coeffs, &side)?;
        }

        let mut out_l = Vec::with_capacity(n);
        let mut out_r = Vec::with_capacity(n);
        for i in 0..n {
            let l = mid[i] + side[i];
            let r = mid[i] - side[i];
            if !l.is_finite() || !r.is_finite() {
                return Err(DspError::dsp_at(Stage::StereoShaping, "non-finite sample", i));
            }
            out_l.push(l);
            out_r.push(r);
        }
        Ok((out_l, out_r))
    }
}

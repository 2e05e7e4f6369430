//! Data-model records shared by the analyzer and mastering engine.
//!
//! All internal DSP math runs in `f64`. [`AudioBuffer`] stores samples
//! planar (one `Vec<f64>` per channel) — conversions from/to interleaved
//! `f32`, the I/O boundary's native shape, happen exactly once.

use std::fmt;

use crate::error::DspError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Decoded audio, planar `(channels, samples)`, channel count 1 or 2.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    channels: Vec<Vec<f64>>,
    sample_rate: u32,
}

impl AudioBuffer {
    /// Build a buffer from planar channel data. All channels must have
    /// equal length and every sample must be finite.
    pub fn new(channels: Vec<Vec<f64>>, sample_rate: u32) -> Result<Self, DspError> {
        if sample_rate == 0 {
            return Err(DspError::Unsupported("sample rate is zero".into()));
        }
        if channels.is_empty() || channels.len() > 2 {
            return Err(DspError::Unsupported(format!(
                "unsupported channel count: {}",
                channels.len()
            )));
        }
        let len = channels[0].len();
        if len == 0 {
            return Err(DspError::InvalidAudio("buffer is empty".into()));
        }
        for ch in &channels {
            if ch.len() != len {
                return Err(DspError::InvalidAudio(
                    "channels have mismatched lengths".into(),
                ));
            }
            if ch.iter().any(|s| !s.is_finite()) {
                return Err(DspError::InvalidAudio("non-finite sample".into()));
            }
        }
        Ok(Self {
            channels,
            sample_rate,
        })
    }

    /// Build a buffer from interleaved `f32` PCM (the codec boundary's
    /// native shape), converting to the crate's planar `f64` layout once.
    pub fn from_interleaved_f32(
        samples: &[f32],
        channels: u16,
        sample_rate: u32,
    ) -> Result<Self, DspError> {
        let channels = channels as usize;
        if channels == 0 || channels > 2 {
            return Err(DspError::Unsupported(format!(
                "unsupported channel count: {channels}"
            )));
        }
        if samples.is_empty() || samples.len() % channels != 0 {
            return Err(DspError::InvalidAudio(
                "interleaved buffer length is not a multiple of channel count".into(),
            ));
        }
        let frames = samples.len() / channels;
        let mut planar = vec![Vec::with_capacity(frames); channels];
        for (i, &s) in samples.iter().enumerate() {
            planar[i % channels].push(s as f64);
        }
        Self::new(planar, sample_rate)
    }

    /// Convert back to interleaved `f32` PCM at this buffer's sample rate.
    pub fn to_interleaved_f32(&self) -> Vec<f32> {
        let frames = self.frame_count();
        let ch = self.channels.len();
        let mut out = Vec::with_capacity(frames * ch);
        for i in 0..frames {
            for c in &self.channels {
                out.push(c[i] as f32);
            }
        }
        out
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn frame_count(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    pub fn duration_secs(&self) -> f64 {
        self.frame_count() as f64 / self.sample_rate as f64
    }

    pub fn channel(&self, index: usize) -> &[f64] {
        &self.channels[index]
    }

    pub fn channels(&self) -> &[Vec<f64>] {
        &self.channels
    }

    /// Downmix to mono by averaging channels.
    pub fn to_mono(&self) -> Vec<f64> {
        if self.channels.len() == 1 {
            return self.channels[0].clone();
        }
        let n = self.frame_count();
        let ch = self.channels.len() as f64;
        (0..n)
            .map(|i| self.channels.iter().map(|c| c[i]).sum::<f64>() / ch)
            .collect()
    }

    pub fn left(&self) -> &[f64] {
        &self.channels[0]
    }

    pub fn right(&self) -> &[f64] {
        if self.channels.len() > 1 {
            &self.channels[1]
        } else {
            &self.channels[0]
        }
    }

    pub fn is_mono(&self) -> bool {
        self.channels.len() == 1
    }
}

/// Shape of one parametric EQ band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EqShape {
    Peak,
    LowShelf,
    HighShelf,
    Lowpass,
    Highpass,
}

/// A single parametric EQ band: center frequency, gain, Q, and shape.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EqBand {
    pub frequency_hz: f64,
    pub gain_db: f64,
    pub q: f64,
    pub shape: EqShape,
}

impl EqBand {
    pub fn validate(&self, sample_rate: u32) -> Result<(), DspError> {
        let nyquist = sample_rate as f64 / 2.0;
        if !(self.frequency_hz > 0.0 && self.frequency_hz < nyquist) {
            return Err(DspError::InvalidSettings(format!(
                "eq frequency {} out of range (0, {nyquist})",
                self.frequency_hz
            )));
        }
        if !(-24.0..=24.0).contains(&self.gain_db) {
            return Err(DspError::InvalidSettings(format!(
                "eq gain {} out of range [-24, 24]",
                self.gain_db
            )));
        }
        if !(self.q > 0.0 && self.q <= 10.0) {
            return Err(DspError::InvalidSettings(format!(
                "eq Q {} out of range (0, 10]",
                self.q
            )));
        }
        Ok(())
    }

    /// True when this band is a no-op for peak/shelf shapes per spec.md §4.1
    /// ("if |g|<0.1 dB for shelf/peak, the band is a no-op").
    pub fn is_noop(&self) -> bool {
        matches!(self.shape, EqShape::Peak | EqShape::LowShelf | EqShape::HighShelf)
            && self.gain_db.abs() < 0.1
    }
}

/// Ordered list of EQ bands, at most 16.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EqSettings {
    pub bands: Vec<EqBand>,
}

impl EqSettings {
    pub fn validate(&self, sample_rate: u32) -> Result<(), DspError> {
        if self.bands.len() > 16 {
            return Err(DspError::InvalidSettings(format!(
                "too many eq bands: {} (max 16)",
                self.bands.len()
            )));
        }
        for band in &self.bands {
            band.validate(sample_rate)?;
        }
        Ok(())
    }
}

/// Feed-forward compressor settings, with optional dynamic-range targeting.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CompressionSettings {
    pub threshold_db: f64,
    pub ratio: f64,
    pub attack_secs: f64,
    pub release_secs: f64,
    pub makeup_gain_db: f64,
    pub target_dynamic_range_db: Option<f64>,
}

impl Default for CompressionSettings {
    fn default() -> Self {
        Self {
            threshold_db: 0.0,
            ratio: 1.0,
            attack_secs: 0.003,
            release_secs: 0.1,
            makeup_gain_db: 0.0,
            target_dynamic_range_db: None,
        }
    }
}

impl CompressionSettings {
    pub fn validate(&self) -> Result<(), DspError> {
        if self.threshold_db > 0.0 {
            return Err(DspError::InvalidSettings(
                "compression threshold must be <= 0 dB".into(),
            ));
        }
        if self.ratio < 1.0 {
            return Err(DspError::InvalidSettings(
                "compression ratio must be >= 1".into(),
            ));
        }
        if self.attack_secs <= 0.0 || self.release_secs <= 0.0 {
            return Err(DspError::InvalidSettings(
                "compression attack/release must be > 0 seconds".into(),
            ));
        }
        Ok(())
    }

    /// True when this compressor is a no-op (ratio 1, no makeup gain).
    pub fn is_neutral(&self) -> bool {
        (self.ratio - 1.0).abs() < 1e-9 && self.makeup_gain_db.abs() < 1e-9
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SaturationKind {
    Tube,
    Tape,
    SoftClip,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SaturationSettings {
    pub drive: f64,
    pub kind: SaturationKind,
    pub mix: f64,
}

impl Default for SaturationSettings {
    fn default() -> Self {
        Self {
            drive: 1.0,
            kind: SaturationKind::Tube,
            mix: 0.0,
        }
    }
}

impl SaturationSettings {
    pub fn validate(&self) -> Result<(), DspError> {
        if self.drive < 0.0 {
            return Err(DspError::InvalidSettings(
                "saturation drive must be >= 0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.mix) {
            return Err(DspError::InvalidSettings(
                "saturation mix must be in [0, 1]".into(),
            ));
        }
        Ok(())
    }

    pub fn is_neutral(&self) -> bool {
        self.mix <= 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StereoSettings {
    pub width: f64,
    pub bass_mono_freq: Option<f64>,
}

impl Default for StereoSettings {
    fn default() -> Self {
        Self {
            width: 1.0,
            bass_mono_freq: None,
        }
    }
}

impl StereoSettings {
    pub fn validate(&self) -> Result<(), DspError> {
        if self.width < 0.0 {
            return Err(DspError::InvalidSettings(
                "stereo width must be >= 0".into(),
            ));
        }
        Ok(())
    }

    pub fn is_neutral(&self) -> bool {
        (self.width - 1.0).abs() < 1e-9 && self.bass_mono_freq.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LimitingSettings {
    pub ceiling_db: f64,
    pub release_secs: f64,
}

impl Default for LimitingSettings {
    fn default() -> Self {
        Self {
            ceiling_db: 0.0,
            release_secs: 0.05,
        }
    }
}

impl LimitingSettings {
    pub fn validate(&self) -> Result<(), DspError> {
        if self.ceiling_db > 0.0 {
            return Err(DspError::InvalidSettings(
                "limiter ceiling must be <= 0 dB".into(),
            ));
        }
        if self.release_secs <= 0.0 {
            return Err(DspError::InvalidSettings(
                "limiter release must be > 0 seconds".into(),
            ));
        }
        Ok(())
    }
}

/// A full mastering chain. Absent subsections bypass that stage entirely —
/// they never inherit values from a prior call.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MasteringSettings {
    pub eq: Option<EqSettings>,
    pub compression: Option<CompressionSettings>,
    pub saturation: Option<SaturationSettings>,
    pub stereo: Option<StereoSettings>,
    pub limiting: Option<LimitingSettings>,
}

impl MasteringSettings {
    pub fn validate(&self, sample_rate: u32) -> Result<(), DspError> {
        if let Some(eq) = &self.eq {
            eq.validate(sample_rate)?;
        }
        if let Some(c) = &self.compression {
            c.validate()?;
        }
        if let Some(s) = &self.saturation {
            s.validate()?;
        }
        if let Some(s) = &self.stereo {
            s.validate()?;
        }
        if let Some(l) = &self.limiting {
            l.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LoudnessMetrics {
    pub rms_db: f64,
    pub peak_db: f64,
    pub lufs_integrated: f64,
    pub lufs_approx: f64,
    pub dynamic_range: f64,
}

/// Mel-cepstral / spectral-shape summary. `K` MFCC coefficients, K >= 8.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpectralFeatures {
    pub mfcc_mean: Vec<f64>,
    pub mfcc_std: Vec<f64>,
    pub spectral_centroid_mean: f64,
    pub spectral_rolloff_mean: f64,
    pub zcr_mean: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SpectralBalance {
    Boost,
    Neutral,
    Cut,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BandEnergies {
    pub sub_bass: f64,
    pub bass: f64,
    pub low_mid: f64,
    pub mid: f64,
    pub high_mid: f64,
    pub presence: f64,
    pub brilliance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpectralBalanceReport {
    pub bass: SpectralBalance,
    pub mid: SpectralBalance,
    pub brilliance: SpectralBalance,
    pub sub_bass: SpectralBalance,
    pub low_mid: SpectralBalance,
    pub high_mid: SpectralBalance,
    pub presence: SpectralBalance,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FrequencyAnalysis {
    pub energies: BandEnergies,
    pub dominant_frequency: f64,
    pub spectral_balance: SpectralBalanceReport,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CriticalBand {
    pub center_freq: f64,
    pub energy_db: f64,
    pub is_masked: bool,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MaskingAnalysis {
    pub bands: Vec<CriticalBand>,
    pub recommendations: Vec<String>,
    pub total_masked_bands: usize,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StereoAnalysis {
    pub is_mono: bool,
    pub width: f64,
    pub correlation: f64,
    pub balance: f64,
    pub phase_coherence: f64,
    pub mid_energy_db: f64,
    pub side_energy_db: f64,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GenreLabel {
    Pop,
    Rock,
    Jazz,
    Electronic,
    HipHop,
}

impl GenreLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenreLabel::Pop => "pop",
            GenreLabel::Rock => "rock",
            GenreLabel::Jazz => "jazz",
            GenreLabel::Electronic => "electronic",
            GenreLabel::HipHop => "hip-hop",
        }
    }
}

impl fmt::Display for GenreLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GenrePrediction {
    pub label: GenreLabel,
    pub confidence: f64,
}

/// The full, immutable result of one call to [`crate::analyze`]. Always
/// populated together — there is no partially-filled state.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnalysisResult {
    pub duration_secs: f64,
    pub sample_rate: u32,
    pub channels: u16,
    pub tempo_bpm: f64,
    pub tempo_defaulted: bool,
    pub key: String,
    pub key_defaulted: bool,
    pub loudness: LoudnessMetrics,
    pub spectral: SpectralFeatures,
    pub frequency: FrequencyAnalysis,
    pub masking: MaskingAnalysis,
    pub stereo: StereoAnalysis,
    pub genre: GenrePrediction,
    pub genre_defaulted: bool,
}

use std::fmt;

/// One of the nine analysis phases or five mastering stages a [`DspError`]
/// can be attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Tempo,
    Key,
    Loudness,
    Spectral,
    Frequency,
    Masking,
    StereoAnalysis,
    Genre,
    Eq,
    Saturation,
    Compression,
    StereoShaping,
    Limiting,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Load => "load",
            Stage::Tempo => "tempo",
            Stage::Key => "key",
            Stage::Loudness => "loudness",
            Stage::Spectral => "spectral",
            Stage::Frequency => "frequency",
            Stage::Masking => "masking",
            Stage::StereoAnalysis => "stereo",
            Stage::Genre => "genre",
            Stage::Eq => "eq",
            Stage::Saturation => "saturation",
            Stage::Compression => "compression",
            Stage::StereoShaping => "stereo_shaping",
            Stage::Limiting => "limiting",
        };
        f.write_str(name)
    }
}

/// Errors the DSP core can return. Every failure is a value — nothing in
/// this crate panics or throws on a malformed but reachable input, and
/// nothing here performs logging as a side effect of returning an error.
#[derive(Debug, Clone, PartialEq)]
pub enum DspError {
    /// Input audio is empty, has mismatched channel lengths, or contains a
    /// non-finite sample.
    InvalidAudio(String),
    /// A settings field is out of its documented range.
    InvalidSettings(String),
    /// A processing stage produced non-finite output or otherwise failed.
    Dsp {
        stage: Stage,
        cause: String,
        index: Option<usize>,
    },
    /// The caller's `CancellationToken` was observed cancelled between
    /// phases.
    Cancelled,
    /// Sample rate is zero, or channel count is not 1 or 2.
    Unsupported(String),
}

impl DspError {
    pub fn dsp(stage: Stage, cause: impl Into<String>) -> Self {
        DspError::Dsp {
            stage,
            cause: cause.into(),
            index: None,
        }
    }

    pub fn dsp_at(stage: Stage, cause: impl Into<String>, index: usize) -> Self {
        DspError::Dsp {
            stage,
            cause: cause.into(),
            index: Some(index),
        }
    }
}

impl fmt::Display for DspError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DspError::InvalidAudio(msg) => write!(f, "invalid audio: {msg}"),
            DspError::InvalidSettings(msg) => write!(f, "invalid settings: {msg}"),
            DspError::Dsp {
                stage,
                cause,
                index: Some(i),
            } => write!(f, "dsp error in stage {stage} at sample {i}: {cause}"),
            DspError::Dsp {
                stage,
                cause,
                index: None,
            } => write!(f, "dsp error in stage {stage}: {cause}"),
            DspError::Cancelled => write!(f, "cancelled"),
            DspError::Unsupported(msg) => write!(f, "unsupported: {msg}"),
        }
    }
}

impl std::error::Error for DspError {}

//! Offline audio analysis and mastering DSP core for an auto-mastering
//! pipeline.
//!
//! Three synchronous, pure entry points: [`analyze`] extracts loudness,
//! spectral, frequency, masking, stereo, and genre features from a track;
//! [`master`] runs a fixed EQ -> saturation -> compression -> stereo ->
//! limiting chain; [`genre_preset`] returns the fixed per-genre mastering
//! defaults. No I/O, no ambient singleton state, no logging on error
//! paths — every failure is a returned [`DspError`], never a panic or a
//! thrown exception.
//!
//! Grounded on the teacher crate's module layout (`src/dsp/`,
//! `src/audio/`) and `log`-based tracing convention; see `DESIGN.md` for
//! the full grounding ledger.

pub mod analysis;
pub mod bands;
pub mod dsp;
pub mod error;
pub mod mastering;
pub mod presets;
pub mod progress;
pub mod suggest;
pub mod types;

pub use analysis::analyze as analyze_with_progress;
pub use error::{DspError, Stage};
pub use mastering::MasteringEngine;
pub use presets::genre_preset;
pub use progress::{CancellationToken, NoopProgress, ProgressSink};
pub use suggest::{AiSuggester, NullSuggester};
pub use types::{AnalysisResult, AudioBuffer, GenreLabel, MasteringSettings};

/// Convenience wrapper over [`analyze_with_progress`] for embedders that
/// don't need progress reporting or cancellation.
pub fn analyze(audio: &AudioBuffer) -> Result<AnalysisResult, DspError> {
    analyze_with_progress(audio, NoopProgress, &CancellationToken::new())
}

/// Run the fixed mastering chain at `audio`'s sample rate.
pub fn master(audio: &AudioBuffer, settings: &MasteringSettings) -> Result<AudioBuffer, DspError> {
    MasteringEngine::new(audio.sample_rate()).master(audio, settings)
}

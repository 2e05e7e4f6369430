use automaster_core::progress::CancellationToken;
use automaster_core::types::AudioBuffer;
use automaster_core::{analyze, analyze_with_progress};

fn sine_wave(freq: f64, sample_rate: u32, num_samples: usize) -> Vec<f64> {
    (0..num_samples)
        .map(|i| (2.0 * std::f64::consts::PI * freq * i as f64 / sample_rate as f64).sin())
        .collect()
}

#[test]
fn test_analyze_reports_monotonic_progress_through_every_stage() {
    let sr = 44100;
    let mono = sine_wave(440.0, sr, sr as usize);
    let audio = AudioBuffer::new(vec![mono.clone(), mono], sr).unwrap();

    let mut stages: Vec<(String, u8)> = Vec::new();
    analyze_with_progress(
        &audio,
        |step: &str, percent: u8| stages.push((step.to_string(), percent)),
        &CancellationToken::new(),
    )
    .unwrap();

    assert!(stages.len() >= 8);
    let percents: Vec<u8> = stages.iter().map(|(_, p)| *p).collect();
    for window in percents.windows(2) {
        assert!(window[0] <= window[1], "progress regressed: {percents:?}");
    }
    assert_eq!(percents.last().copied(), Some(100));
}

#[test]
fn test_analyze_simple_wrapper_matches_full_pipeline() {
    let sr = 44100;
    let mono = sine_wave(1000.0, sr, sr as usize);
    let audio = AudioBuffer::new(vec![mono.clone(), mono.clone()], sr).unwrap();

    let simple = analyze(&audio).unwrap();
    let explicit =
        analyze_with_progress(&audio, automaster_core::progress::NoopProgress, &CancellationToken::new())
            .unwrap();
    assert_eq!(simple.genre.label, explicit.genre.label);
    assert_eq!(simple.tempo_bpm, explicit.tempo_bpm);
}

#[test]
fn test_analyze_reports_duration_and_sample_rate_from_input() {
    let sr = 48000;
    let mono = sine_wave(300.0, sr, sr as usize);
    let audio = AudioBuffer::new(vec![mono.clone(), mono], sr).unwrap();
    let result = analyze(&audio).unwrap();
    assert_eq!(result.sample_rate, sr);
    assert!((result.duration_secs - 1.0).abs() < 1e-6);
    assert_eq!(result.channels, 2);
}

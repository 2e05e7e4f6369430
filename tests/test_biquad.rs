use automaster_core::dsp::biquad::{BiquadDesigner, FilterRunner};
use automaster_core::types::{EqBand, EqShape};

fn sine_wave(freq: f64, sample_rate: u32, num_samples: usize) -> Vec<f64> {
    (0..num_samples)
        .map(|i| (2.0 * std::f64::consts::PI * freq * i as f64 / sample_rate as f64).sin())
        .collect()
}

fn rms(samples: &[f64]) -> f64 {
    (samples.iter().map(|s| s * s).sum::<f64>() / samples.len() as f64).sqrt()
}

#[test]
fn test_peak_boost_then_cut_recovers_input() {
    let sr = 44100;
    let input = sine_wave(1000.0, sr, 8820);
    let boost = BiquadDesigner::peak(1000.0, 6.0, 1.0, sr);
    let cut = BiquadDesigner::peak(1000.0, -6.0, 1.0, sr);
    let boosted = FilterRunner::run_zero_phase(&boost, &input).unwrap();
    let recovered = FilterRunner::run_zero_phase(&cut, &boosted).unwrap();

    let diff: Vec<f64> = recovered.iter().zip(input.iter()).map(|(a, b)| a - b).collect();
    assert!(rms(&diff) < 1e-3, "rms diff = {}", rms(&diff));
}

#[test]
fn test_low_shelf_boosts_bass_relative_to_treble() {
    let sr = 44100;
    let bass = sine_wave(80.0, sr, 8820);
    let treble = sine_wave(8000.0, sr, 8820);
    let shelf = BiquadDesigner::low_shelf(200.0, 6.0, sr);

    let bass_out = FilterRunner::run_zero_phase(&shelf, &bass).unwrap();
    let treble_out = FilterRunner::run_zero_phase(&shelf, &treble).unwrap();

    let bass_gain = rms(&bass_out) / rms(&bass);
    let treble_gain = rms(&treble_out) / rms(&treble);
    assert!(bass_gain > treble_gain, "bass_gain={bass_gain} treble_gain={treble_gain}");
}

#[test]
fn test_highpass_attenuates_low_frequency() {
    let sr = 44100;
    let input = sine_wave(100.0, sr, 44100);
    let coeffs = BiquadDesigner::highpass(500.0, sr);
    let output = FilterRunner::run_zero_phase(&coeffs, &input).unwrap();

    let rms_in = rms(&input[2000..]);
    let rms_out = rms(&output[2000..]);
    assert!(rms_out < rms_in * 0.3, "rms_in={rms_in} rms_out={rms_out}");
}

#[test]
fn test_for_band_returns_none_for_near_zero_gain() {
    let band = EqBand {
        frequency_hz: 1000.0,
        gain_db: 0.0,
        q: 1.0,
        shape: EqShape::Peak,
    };
    assert!(BiquadDesigner::for_band(&band, 44100).is_none());
}

#[test]
fn test_for_band_returns_some_for_lowpass_regardless_of_gain() {
    let band = EqBand {
        frequency_hz: 1000.0,
        gain_db: 0.0,
        q: 1.0,
        shape: EqShape::Lowpass,
    };
    assert!(BiquadDesigner::for_band(&band, 44100).is_some());
}

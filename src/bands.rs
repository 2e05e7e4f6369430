//! Fixed frequency tables from spec.md §6: 24 Bark critical bands and the 7
//! named frequency bands used by [`crate::analysis::genre`] and
//! [`crate::types::FrequencyAnalysis`].

/// 24 Bark-scale critical bands, `(low_hz, high_hz)`.
pub const BARK_BANDS: [(f64, f64); 25] = [
    (20.0, 100.0),
    (100.0, 200.0),
    (200.0, 300.0),
    (300.0, 400.0),
    (400.0, 510.0),
    (510.0, 630.0),
    (630.0, 770.0),
    (770.0, 920.0),
    (920.0, 1080.0),
    (1080.0, 1270.0),
    (1270.0, 1480.0),
    (1480.0, 1720.0),
    (1720.0, 2000.0),
    (2000.0, 2320.0),
    (2320.0, 2700.0),
    (2700.0, 3150.0),
    (3150.0, 3700.0),
    (3700.0, 4400.0),
    (4400.0, 5300.0),
    (5300.0, 6400.0),
    (6400.0, 7700.0),
    (7700.0, 9500.0),
    (9500.0, 12000.0),
    (12000.0, 15500.0),
    (15500.0, 20000.0),
];

/// The 7 named frequency bands used for spectral-balance heuristics.
pub const FREQUENCY_BANDS: [(&str, f64, f64); 7] = [
    ("sub_bass", 20.0, 60.0),
    ("bass", 60.0, 250.0),
    ("low_mid", 250.0, 500.0),
    ("mid", 500.0, 2000.0),
    ("high_mid", 2000.0, 4000.0),
    ("presence", 4000.0, 6000.0),
    ("brilliance", 6000.0, 20000.0),
];

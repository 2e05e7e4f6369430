//! Per-sample attack/release smoothing over a dB-domain control signal.
//!
//! Grounded on the teacher's `apply_compressor` envelope coefficients in
//! `src/dsp/effects.rs` (`(-1/(t*sample_rate)).exp()`), lifted into a
//! reusable stateful type so [`crate::dsp::dynamics`] can share it between
//! the compressor and, with a different coefficient convention, the
//! limiter's release-only smoothing.

/// One-pole smoother choosing between an attack and a release coefficient
/// depending on whether the new value rose or fell.
#[derive(Debug, Clone, Copy)]
pub struct EnvelopeFollower {
    attack_coeff: f64,
    release_coeff: f64,
    state: f64,
}

impl EnvelopeFollower {
    /// `attack_secs`/`release_secs` are time constants in seconds;
    /// `sample_rate` in Hz. Coefficients follow spec.md §4.3:
    /// `alpha = 1 - exp(-1/(t*sr))`.
    pub fn new(attack_secs: f64, release_secs: f64, sample_rate: u32) -> Self {
        let sr = sample_rate as f64;
        Self {
            attack_coeff: 1.0 - (-1.0 / (attack_secs * sr)).exp(),
            release_coeff: 1.0 - (-1.0 / (release_secs * sr)).exp(),
            state: 0.0,
        }
    }

    /// Advance the follower by one sample, returning the smoothed value.
    /// Attack branch is chosen when `value` exceeds the current state.
    pub fn process(&mut self, value: f64) -> f64 {
        let coeff = if value > self.state {
            self.attack_coeff
        } else {
            self.release_coeff
        };
        self.state += (value - self.state) * coeff;
        self.state
    }

    pub fn reset(&mut self) {
        self.state = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attack_is_faster_than_release_for_equal_step_size() {
        let mut fast_attack = EnvelopeFollower::new(0.001, 0.5, 44100);
        let mut slow_release = EnvelopeFollower::new(0.001, 0.5, 44100);

        let after_attack = {
            for _ in 0..20 {
                fast_attack.process(10.0);
            }
            fast_attack.process(10.0)
        };
        // Climb to the same point, then drop and compare descent speed.
        for _ in 0..200 {
            slow_release.process(10.0);
        }
        let before_release = slow_release.process(10.0);
        let after_one_release_step = slow_release.process(0.0);

        assert!(after_attack > 9.0, "attack should converge quickly");
        assert!(
            before_release - after_one_release_step < after_attack,
            "a single release step should move less than a full attack convergence"
        );
    }

    #[test]
    fn converges_to_target() {
        let mut env = EnvelopeFollower::new(0.01, 0.01, 44100);
        for _ in 0..10000 {
            env.process(5.0);
        }
        assert!((env.process(5.0) - 5.0).abs() < 1e-6);
    }
}

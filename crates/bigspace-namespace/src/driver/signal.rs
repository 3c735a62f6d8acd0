//! Signal sources for the tick driver

use crate::ports::SignalSource;

/// `amplitude * sin(phase)`, with `phase` advanced by `step` before each sample.
#[derive(Debug, Clone)]
pub struct Sinusoid {
    phase: f64,
    step: f64,
    amplitude: f64,
}

impl Sinusoid {
    pub fn new(amplitude: f64, step: f64) -> Self {
        Self {
            phase: 0.0,
            step,
            amplitude,
        }
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }
}

impl SignalSource for Sinusoid {
    fn next_sample(&mut self) -> f64 {
        self.phase = (self.phase + self.step) % std::f64::consts::TAU;
        self.amplitude * self.phase.sin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_quarter_turn_reaches_amplitude() {
        let mut signal = Sinusoid::new(100.0, FRAC_PI_2);
        assert!((signal.next_sample() - 100.0).abs() < 1e-9);
        assert!(signal.next_sample().abs() < 1e-9);
        assert!((signal.next_sample() + 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_phase_wraps() {
        let mut signal = Sinusoid::new(1.0, PI);
        for _ in 0..5 {
            signal.next_sample();
        }
        assert!(signal.phase() < std::f64::consts::TAU);
    }

    #[test]
    fn test_consecutive_samples_differ() {
        let mut signal = Sinusoid::new(100.0, PI / 180.0);
        let a = signal.next_sample();
        let b = signal.next_sample();
        assert_ne!(a, b);
    }
}

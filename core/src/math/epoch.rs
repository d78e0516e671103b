use crate::prelude::{DispResult, DisplacementError};
use crate::records::SeriesSample;
use serde::{Deserialize, Serialize};

pub const DAYS_PER_YEAR: f64 = 365.25;

/// Samples strictly closer than `half_width` years to `center` belong to the epoch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpochWindow {
    pub center: f64,
    pub half_width: f64,
}

impl EpochWindow {
    pub fn new(center: f64, half_width: f64) -> Self {
        Self { center, half_width }
    }

    /// Window from a full width in days, halved the way the CLI expects.
    pub fn from_days(center: f64, days: f64) -> Self {
        Self::new(center, days / DAYS_PER_YEAR / 2.0)
    }

    pub fn matches(&self, year: f64) -> bool {
        (year - self.center).abs() < self.half_width
    }
}

/// Inverse-variance sums per axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisWeights {
    pub east: f64,
    pub north: f64,
    pub up: f64,
}

/// Weighted mean position (meters) over the samples of one window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EpochAverage {
    pub east: f64,
    pub north: f64,
    pub up: f64,
    pub weights: AxisWeights,
    pub sample_count: usize,
}

impl EpochAverage {
    pub fn is_defined(&self) -> bool {
        self.sample_count >= 1
    }
}

/// Running sums for one station at one epoch.
#[derive(Debug, Clone, Default)]
pub struct EpochAccumulator {
    weighted: AxisWeights,
    weights: AxisWeights,
    count: usize,
}

impl EpochAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sample: &SeriesSample) -> Result<(), f64> {
        let inverse = |sigma: f64| {
            let variance = sigma * sigma;
            if variance > 0.0 && variance.is_finite() {
                Ok(1.0 / variance)
            } else {
                Err(sample.year)
            }
        };
        let w_east = inverse(sample.sig_east)?;
        let w_north = inverse(sample.sig_north)?;
        let w_up = inverse(sample.sig_up)?;

        self.weighted.east += sample.east * w_east;
        self.weighted.north += sample.north * w_north;
        self.weighted.up += sample.up * w_up;
        self.weights.east += w_east;
        self.weights.north += w_north;
        self.weights.up += w_up;
        self.count += 1;
        Ok(())
    }

    pub fn finish(self) -> EpochAverage {
        if self.count == 0 {
            return EpochAverage::default();
        }
        EpochAverage {
            east: self.weighted.east / self.weights.east,
            north: self.weighted.north / self.weights.north,
            up: self.weighted.up / self.weights.up,
            weights: self.weights,
            sample_count: self.count,
        }
    }
}

/// Inverse-variance weighted mean of the samples falling inside `window`.
///
/// A matching sample with a zero sigma is reported as
/// [`DisplacementError::ZeroVarianceSample`] for `station`.
pub fn average(
    station: &str,
    samples: &[SeriesSample],
    window: &EpochWindow,
) -> DispResult<EpochAverage> {
    let mut accumulator = EpochAccumulator::new();
    for sample in samples.iter().filter(|s| window.matches(s.year)) {
        accumulator
            .push(sample)
            .map_err(|year| DisplacementError::ZeroVarianceSample {
                station: station.to_string(),
                year,
            })?;
    }
    Ok(accumulator.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

    fn sample(year: f64, pos: f64, sigma: f64) -> SeriesSample {
        SeriesSample {
            year,
            east: pos,
            north: pos * 2.0,
            up: pos * 3.0,
            sig_east: sigma,
            sig_north: sigma,
            sig_up: sigma,
        }
    }

    #[test]
    fn zero_width_window_matches_nothing() {
        let samples = vec![sample(2010.0, 1.0, 0.001), sample(2010.5, 2.0, 0.001)];
        let avg = average("TEST", &samples, &EpochWindow::new(2010.0, 0.0)).unwrap();
        assert_eq!(avg.sample_count, 0);
        assert!(!avg.is_defined());
    }

    #[test]
    fn weights_favor_precise_samples() {
        let samples = vec![sample(2010.0, 1.0, 0.001), sample(2010.01, 2.0, 0.002)];
        let avg = average("TEST", &samples, &EpochWindow::new(2010.0, 0.1)).unwrap();
        // weights 1e6 and 2.5e5
        let expected = (1.0 * 1.0e6 + 2.0 * 2.5e5) / 1.25e6;
        assert_eq!(avg.sample_count, 2);
        assert!((avg.east - expected).abs() < 1e-12);
        assert!((avg.weights.east - 1.25e6).abs() < 1e-6);
    }

    #[test]
    fn average_is_order_invariant() {
        let mut samples: Vec<SeriesSample> = (0..40)
            .map(|i| sample(2012.0 + i as f64 * 0.001, i as f64 * 0.01, 0.001 + i as f64 * 1e-4))
            .collect();
        let window = EpochWindow::new(2012.02, 0.015);
        let baseline = average("TEST", &samples, &window).unwrap();

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..5 {
            samples.shuffle(&mut rng);
            let shuffled = average("TEST", &samples, &window).unwrap();
            assert_eq!(shuffled.sample_count, baseline.sample_count);
            assert!((shuffled.east - baseline.east).abs() < 1e-12);
            assert!((shuffled.north - baseline.north).abs() < 1e-12);
            assert!((shuffled.up - baseline.up).abs() < 1e-12);
        }
    }

    #[test]
    fn zero_sigma_inside_window_is_an_error() {
        let samples = vec![sample(2010.0, 1.0, 0.0)];
        let err = average("ZERO", &samples, &EpochWindow::new(2010.0, 0.1)).unwrap_err();
        assert!(matches!(
            err,
            DisplacementError::ZeroVarianceSample { ref station, .. } if station == "ZERO"
        ));

        // outside the window the sample is never weighted
        let avg = average("ZERO", &samples, &EpochWindow::new(2011.0, 0.1)).unwrap();
        assert_eq!(avg.sample_count, 0);
    }

    #[test]
    fn window_from_days_is_halved() {
        let window = EpochWindow::from_days(2010.0, 10.0);
        assert!((window.half_width - 10.0 / 365.25 / 2.0).abs() < 1e-15);
    }
}

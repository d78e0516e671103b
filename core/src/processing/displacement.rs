use crate::math::epoch::{average, EpochAverage, EpochWindow};
use crate::prelude::{DispResult, DisplacementError};
use crate::records::{SeriesSample, StationLocation};
use serde::{Deserialize, Serialize};

const M_TO_MM: f64 = 1000.0;

/// Station displacement between two epochs in millimeters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Displacement {
    pub station: String,
    pub lon: f64,
    pub lat: f64,
    pub delta_east: f64,
    pub delta_north: f64,
    pub delta_up: f64,
    pub sigma_east: f64,
    pub sigma_north: f64,
    pub sigma_up: f64,
}

/// Displacement of the reference station, subtracted from every other one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceCorrection {
    pub delta_east: f64,
    pub delta_north: f64,
    pub delta_up: f64,
}

impl ReferenceCorrection {
    /// Correction derived from the reference station's own series.
    ///
    /// Missing data at either epoch is a [`DisplacementError::ReferenceDataGap`].
    pub fn from_series(
        station: &str,
        samples: &[SeriesSample],
        window1: &EpochWindow,
        window2: &EpochWindow,
    ) -> DispResult<Self> {
        match EpochPair::resolve(station, samples, window1, window2)? {
            Some(pair) => Ok(Self {
                delta_east: pair.delta(|a| a.east),
                delta_north: pair.delta(|a| a.north),
                delta_up: pair.delta(|a| a.up),
            }),
            None => Err(DisplacementError::ReferenceDataGap {
                station: station.to_string(),
            }),
        }
    }
}

/// Result of processing one station.
#[derive(Debug, Clone, PartialEq)]
pub enum StationOutcome {
    Displaced(Displacement),
    /// No sample inside one of the windows.
    Skip { epoch: f64 },
}

struct EpochPair {
    first: EpochAverage,
    second: EpochAverage,
}

impl EpochPair {
    fn resolve(
        station: &str,
        samples: &[SeriesSample],
        window1: &EpochWindow,
        window2: &EpochWindow,
    ) -> DispResult<Option<Self>> {
        let first = average(station, samples, window1)?;
        let second = average(station, samples, window2)?;
        if first.is_defined() && second.is_defined() {
            Ok(Some(Self { first, second }))
        } else {
            Ok(None)
        }
    }

    fn delta(&self, axis: impl Fn(&EpochAverage) -> f64) -> f64 {
        M_TO_MM * (axis(&self.second) - axis(&self.first))
    }

    fn sigma(&self, weight: impl Fn(&EpochAverage) -> f64) -> f64 {
        M_TO_MM * (1.0 / weight(&self.first) + 1.0 / weight(&self.second)).sqrt()
    }
}

/// Two-epoch displacement of `station`, corrected by `reference`.
///
/// With `absolute_vertical` the vertical component keeps the reference
/// motion while the horizontal components stay reference-relative.
pub fn compute_displacement(
    station: &StationLocation,
    samples: &[SeriesSample],
    window1: &EpochWindow,
    window2: &EpochWindow,
    reference: &ReferenceCorrection,
    absolute_vertical: bool,
) -> DispResult<StationOutcome> {
    let pair = match EpochPair::resolve(&station.id, samples, window1, window2)? {
        Some(pair) => pair,
        None => {
            let epoch = if average(&station.id, samples, window1)?.is_defined() {
                window2.center
            } else {
                window1.center
            };
            return Ok(StationOutcome::Skip { epoch });
        }
    };

    let mut delta_up = pair.delta(|a| a.up) - reference.delta_up;
    if absolute_vertical {
        delta_up += reference.delta_up;
    }

    Ok(StationOutcome::Displaced(Displacement {
        station: station.id.clone(),
        lon: station.longitude,
        lat: station.latitude,
        delta_east: pair.delta(|a| a.east) - reference.delta_east,
        delta_north: pair.delta(|a| a.north) - reference.delta_north,
        delta_up,
        sigma_east: pair.sigma(|a| a.weights.east),
        sigma_north: pair.sigma(|a| a.weights.north),
        sigma_up: pair.sigma(|a| a.weights.up),
    }))
}

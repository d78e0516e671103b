use crate::math::epoch::EpochWindow;
use crate::records::Provider;
use serde::{Deserialize, Serialize};

/// Geographic selection box, open on every edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub lon_min: f64,
    pub lon_max: f64,
    pub lat_min: f64,
    pub lat_max: f64,
}

impl BoundingBox {
    /// Box of `width` x `height` degrees centered on (`lon`, `lat`).
    pub fn centered(lon: f64, lat: f64, width: f64, height: f64) -> Self {
        Self {
            lon_min: lon - width / 2.0,
            lon_max: lon + width / 2.0,
            lat_min: lat - height / 2.0,
            lat_max: lat + height / 2.0,
        }
    }

    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon > self.lon_min && lon < self.lon_max && lat > self.lat_min && lat < self.lat_max
    }
}

/// Shared settings for one displacement run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSettings {
    pub provider: Provider,
    pub bbox: BoundingBox,
    pub window1: EpochWindow,
    pub window2: EpochWindow,
    pub reference: Option<String>,
    pub absolute_vertical: bool,
}

/// Common error type for parsing and displacement computation.
#[derive(thiserror::Error, Debug)]
pub enum DisplacementError {
    #[error("malformed record: {0}")]
    MalformedRecord(String),
    #[error("station {station} has no samples at epoch {epoch:.4}")]
    InsufficientEpochData { station: String, epoch: f64 },
    #[error("reference station {station} has missing data")]
    ReferenceDataGap { station: String },
    #[error("analysis center supplied as {0} but only JPL, NGL are supported")]
    UnsupportedProvider(String),
    #[error("station {station} has a zero sigma sample at {year:.4}")]
    ZeroVarianceSample { station: String, year: f64 },
    #[error("invalid date {0}, expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("data source failure: {0}")]
    Source(String),
    #[error("io failure: {0}")]
    Io(#[from] std::io::Error),
}

pub type DispResult<T> = Result<T, DisplacementError>;

/// Provider of raw station-directory and time-series lines.
///
/// Implementations own transport concerns; callers only see text rows.
pub trait SeriesSource {
    fn station_directory(&self) -> DispResult<Vec<String>>;
    fn series(&self, station: &str) -> DispResult<Vec<String>>;
}

use crate::records::provider::Provider;
use log::debug;
use serde::{Deserialize, Serialize};

/// Station id with its position in degrees, longitude in (-180, 180].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationLocation {
    pub id: String,
    pub longitude: f64,
    pub latitude: f64,
}

impl StationLocation {
    pub fn new(id: impl Into<String>, longitude: f64, latitude: f64) -> Self {
        Self {
            id: id.into(),
            longitude: normalize_longitude(longitude),
            latitude,
        }
    }
}

/// Wraps a longitude into (-180, 180] by a single turn.
pub fn normalize_longitude(lon: f64) -> f64 {
    if lon > 180.0 {
        lon - 360.0
    } else if lon <= -180.0 {
        lon + 360.0
    } else {
        lon
    }
}

/// Parses one station-directory row; rows of another shape yield `None`.
pub fn parse_station_line(line: &str, provider: Provider) -> Option<StationLocation> {
    let columns = provider.station_columns();
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != columns.field_count {
        return None;
    }
    if let Some((index, tag)) = columns.tag {
        if fields[index] != tag {
            return None;
        }
    }

    let lat = fields[columns.lat].parse::<f64>().ok();
    let lon = fields[columns.lon].parse::<f64>().ok();
    match (lat, lon) {
        (Some(lat), Some(lon)) => Some(StationLocation::new(fields[columns.id], lon, lat)),
        _ => {
            debug!("skipping station row with non-numeric position: {}", line);
            None
        }
    }
}

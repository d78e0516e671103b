use crate::prelude::DisplacementError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Analysis center publishing the station tables and time series.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Provider {
    /// JPL GNSS time series (provider `A`).
    #[default]
    Jpl,
    /// Nevada Geodetic Laboratory tenv3 series (provider `B`).
    Ngl,
}

/// Column layout of one station-directory row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StationColumns {
    pub field_count: usize,
    pub tag: Option<(usize, &'static str)>,
    pub id: usize,
    pub lat: usize,
    pub lon: usize,
}

/// Column layout of one time-series row. Positions and sigmas are meters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesColumns {
    pub year: usize,
    pub east: usize,
    pub north: usize,
    pub up: usize,
    pub sig_east: usize,
    pub sig_north: usize,
    pub sig_up: usize,
}

impl SeriesColumns {
    /// Smallest field count a row needs to cover every column.
    pub fn min_fields(&self) -> usize {
        [
            self.year,
            self.east,
            self.north,
            self.up,
            self.sig_east,
            self.sig_north,
            self.sig_up,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
            + 1
    }
}

const JPL_STATIONS: StationColumns = StationColumns {
    field_count: 8,
    tag: Some((1, "POS")),
    id: 0,
    lat: 2,
    lon: 3,
};

const NGL_STATIONS: StationColumns = StationColumns {
    field_count: 4,
    tag: None,
    id: 0,
    lat: 1,
    lon: 2,
};

const JPL_SERIES: SeriesColumns = SeriesColumns {
    year: 0,
    east: 1,
    north: 2,
    up: 3,
    sig_east: 4,
    sig_north: 5,
    sig_up: 6,
};

// site YYMMMDD yyyy.yyyy MJD week d reflon e0 east n0 north u0 up ant sig_e sig_n sig_u ...
const NGL_SERIES: SeriesColumns = SeriesColumns {
    year: 2,
    east: 8,
    north: 10,
    up: 12,
    sig_east: 14,
    sig_north: 15,
    sig_up: 16,
};

impl Provider {
    pub fn station_columns(&self) -> StationColumns {
        match self {
            Provider::Jpl => JPL_STATIONS,
            Provider::Ngl => NGL_STATIONS,
        }
    }

    pub fn series_columns(&self) -> SeriesColumns {
        match self {
            Provider::Jpl => JPL_SERIES,
            Provider::Ngl => NGL_SERIES,
        }
    }

    pub fn station_directory_url(&self) -> &'static str {
        match self {
            Provider::Jpl => "https://sideshow.jpl.nasa.gov/post/tables/table2.html",
            Provider::Ngl => "http://geodesy.unr.edu/NGLStationPages/llh.out",
        }
    }

    /// Series URL template; `{station}` is replaced by the station id.
    pub fn series_url_template(&self) -> &'static str {
        match self {
            Provider::Jpl => {
                "https://sideshow.jpl.nasa.gov/pub/JPL_GPS_Timeseries/repro2018a/post/point/{station}.series"
            }
            Provider::Ngl => "http://geodesy.unr.edu/gps_timeseries/tenv3/IGS14/{station}.tenv3",
        }
    }

    pub fn station_page_url(&self, station: &str) -> String {
        match self {
            Provider::Jpl => format!("https://sideshow.jpl.nasa.gov/post/links/{}.html", station),
            Provider::Ngl => format!(
                "http://geodesy.unr.edu/NGLStationPages/stations/{}.sta",
                station
            ),
        }
    }

    pub fn station_plot_url(&self, station: &str) -> String {
        match self {
            Provider::Jpl => format!("https://sideshow.jpl.nasa.gov/post/plots/{}.jpg", station),
            Provider::Ngl => format!(
                "http://geodesy.unr.edu/tsplots/IGS14/IGS14/TimeSeries/{}.png",
                station
            ),
        }
    }
}

impl FromStr for Provider {
    type Err = DisplacementError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "JPL" | "A" => Ok(Provider::Jpl),
            "NGL" | "B" => Ok(Provider::Ngl),
            _ => Err(DisplacementError::UnsupportedProvider(value.to_string())),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Jpl => write!(f, "JPL"),
            Provider::Ngl => write!(f, "NGL"),
        }
    }
}

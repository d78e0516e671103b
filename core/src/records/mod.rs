pub mod provider;
pub mod series;
pub mod station;

pub use provider::{Provider, SeriesColumns, StationColumns};
pub use series::{parse_series, parse_series_line, SeriesSample};
pub use station::{normalize_longitude, parse_station_line, StationLocation};

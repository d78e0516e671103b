use crate::records::provider::Provider;
use serde::{Deserialize, Serialize};

/// One epoch observation of a station, positions and sigmas in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesSample {
    pub year: f64,
    pub east: f64,
    pub north: f64,
    pub up: f64,
    pub sig_east: f64,
    pub sig_north: f64,
    pub sig_up: f64,
}

/// Parses one time-series row. Header rows and short rows yield `None`.
pub fn parse_series_line(line: &str, provider: Provider) -> Option<SeriesSample> {
    let columns = provider.series_columns();
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < columns.min_fields() {
        return None;
    }
    let value = |index: usize| fields[index].parse::<f64>().ok();

    Some(SeriesSample {
        year: value(columns.year)?,
        east: value(columns.east)?,
        north: value(columns.north)?,
        up: value(columns.up)?,
        sig_east: value(columns.sig_east)?,
        sig_north: value(columns.sig_north)?,
        sig_up: value(columns.sig_up)?,
    })
}

/// Parses every valid row of a series, returning the samples and the
/// number of rows that were skipped.
pub fn parse_series(lines: &[String], provider: Provider) -> (Vec<SeriesSample>, usize) {
    let mut skipped = 0;
    let samples = lines
        .iter()
        .filter_map(|line| {
            let sample = parse_series_line(line, provider);
            if sample.is_none() {
                skipped += 1;
            }
            sample
        })
        .collect();
    (samples, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;

    const JPL_ROW: &str = "1994.00136893  0.877450 -0.309555  0.011551  0.000609  0.000682  0.002465  0.048078 -0.202782 -0.234850 -189302400.00  1994  1  1 12  0  0";
    const NGL_HEADER: &str = "site YYMMMDD yyyy.yyyy __MJD week d reflon _e0(m) __east(m) ____n0(m) _north(m) u0(m) ____up(m) _ant(m) sig_e(m) sig_n(m) sig_u(m) __corr_en __corr_eu __corr_nu";
    const NGL_ROW: &str = "USC1 96JAN01 1996.0000 50083  834 2 -118.3   1375  0.510258   3766317  0.946300    21  0.941326  0.0614 0.000863 0.001028 0.004216 -0.094302  0.146021 -0.340417";

    #[test]
    fn jpl_series_fields() {
        let sample = parse_series_line(JPL_ROW, Provider::Jpl).unwrap();
        assert_eq!(sample.year, 1994.00136893);
        assert_eq!(sample.east, 0.877450);
        assert_eq!(sample.north, -0.309555);
        assert_eq!(sample.up, 0.011551);
        assert_eq!(sample.sig_up, 0.002465);
    }

    #[test]
    fn ngl_series_fields() {
        let sample = parse_series_line(NGL_ROW, Provider::Ngl).unwrap();
        assert_eq!(sample.year, 1996.0);
        assert_eq!(sample.east, 0.510258);
        assert_eq!(sample.north, 0.946300);
        assert_eq!(sample.up, 0.941326);
        assert_eq!(sample.sig_east, 0.000863);
        assert_eq!(sample.sig_north, 0.001028);
        assert_eq!(sample.sig_up, 0.004216);
    }

    #[test]
    fn header_and_short_rows_are_skipped() {
        let lines = vec![NGL_HEADER.to_string(), NGL_ROW.to_string(), "USC1 96JAN02".to_string()];
        let (samples, skipped) = parse_series(&lines, Provider::Ngl);
        assert_eq!(samples.len(), 1);
        assert_eq!(skipped, 2);
    }
}

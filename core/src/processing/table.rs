use crate::prelude::{DispResult, DisplacementError};
use serde::{Deserialize, Serialize};

/// Position and displacement columns of one table row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TablePoint {
    pub lon: f64,
    pub lat: f64,
    pub delta_east: f64,
    pub delta_north: f64,
    pub delta_up: f64,
}

/// Reads a displacement table back, skipping the header line and blank lines.
pub fn load_table(text: &str) -> DispResult<Vec<TablePoint>> {
    text.lines()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 6 {
                return Err(DisplacementError::MalformedRecord(line.to_string()));
            }
            let value = |index: usize| {
                fields[index]
                    .parse::<f64>()
                    .map_err(|_| DisplacementError::MalformedRecord(line.to_string()))
            };
            Ok(TablePoint {
                lon: value(1)?,
                lat: value(2)?,
                delta_east: value(3)?,
                delta_north: value(4)?,
                delta_up: value(5)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::displacement::Displacement;
    use crate::processing::report::{write_report, ReportOptions};

    #[test]
    fn table_reads_back_written_rows() {
        let rows = vec![Displacement {
            station: "ABCD".into(),
            lon: -115.5,
            lat: 33.25,
            delta_east: 1.5,
            delta_north: -2.0,
            delta_up: 3.125,
            sigma_east: 0.1,
            sigma_north: 0.1,
            sigma_up: 0.4,
        }];
        let report = write_report(&rows, &ReportOptions::default());
        let points = load_table(&report.table).unwrap();
        assert_eq!(
            points,
            vec![TablePoint {
                lon: -115.5,
                lat: 33.25,
                delta_east: 1.5,
                delta_north: -2.0,
                delta_up: 3.125,
            }]
        );
    }

    #[test]
    fn short_rows_are_malformed() {
        let err = load_table("header\nABCD 1.0 2.0\n").unwrap_err();
        assert!(matches!(err, DisplacementError::MalformedRecord(_)));
    }
}

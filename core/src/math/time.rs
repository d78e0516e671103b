use crate::math::epoch::DAYS_PER_YEAR;
use crate::prelude::{DispResult, DisplacementError};
use hifitime::Epoch;

/// Converts a `YYYY-MM-DD` date to a fractional year counted in Julian
/// years from 2000-01-01.
pub fn fractional_year(date: &str) -> DispResult<f64> {
    let invalid = || DisplacementError::InvalidDate(date.to_string());
    if date.len() != 10 {
        return Err(invalid());
    }

    let mut parts = date.split('-');
    let (year, month, day) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(y), Some(m), Some(d), None) => (
            y.parse::<i32>().map_err(|_| invalid())?,
            m.parse::<u8>().map_err(|_| invalid())?,
            d.parse::<u8>().map_err(|_| invalid())?,
        ),
        _ => return Err(invalid()),
    };

    let epoch =
        Epoch::maybe_from_gregorian_utc(year, month, day, 0, 0, 0, 0).map_err(|_| invalid())?;
    let origin = Epoch::maybe_from_gregorian_utc(2000, 1, 1, 0, 0, 0, 0).map_err(|_| invalid())?;

    let days = (epoch.to_mjd_utc_days() - origin.to_mjd_utc_days()).round();
    Ok(2000.0 + days / DAYS_PER_YEAR)
}

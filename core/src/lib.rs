//! Displacement core for GPS station time series.
//!
//! Station tables and per-station series are parsed per analysis center,
//! averaged around two epochs with inverse-variance weights, differenced
//! into east/north/vertical displacements and rendered as KML overlays and
//! a fixed-width table.

pub mod math;
pub mod prelude;
pub mod processing;
pub mod records;
pub mod telemetry;

pub use prelude::{DispResult, DisplacementError, RunSettings, SeriesSource};

pub mod displacement;
pub mod geometry;
pub mod interpolate;
pub mod report;
pub mod run;
pub mod table;

pub use displacement::{compute_displacement, Displacement, ReferenceCorrection, StationOutcome};
pub use interpolate::{interpolate_table, GridNode, InverseDistance, Interpolator, SamplePoint};
pub use report::{write_report, Report, ReportOptions};
pub use run::{select_stations, DisplacementRun, RunOutcome};
pub use table::{load_table, TablePoint};

pub mod epoch;
pub mod grid;
pub mod time;

pub use epoch::{average, AxisWeights, EpochAccumulator, EpochAverage, EpochWindow};
pub use grid::create_grid;
pub use time::fractional_year;

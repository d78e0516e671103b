use crate::math::grid::create_grid;
use crate::processing::table::TablePoint;
use ndarray::{Array1, Array2};

/// Scattered value at a lon/lat position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    pub x: f64,
    pub y: f64,
    pub value: f64,
}

impl SamplePoint {
    pub fn new(x: f64, y: f64, value: f64) -> Self {
        Self { x, y, value }
    }

    #[inline]
    pub fn dist_sq(&self, other_x: f64, other_y: f64) -> f64 {
        let dx = self.x - other_x;
        let dy = self.y - other_y;
        dx * dx + dy * dy
    }
}

/// Scattered-to-grid interpolation. The output has one row per `grid_y`
/// value and one column per `grid_x` value.
pub trait Interpolator {
    fn interpolate(
        &self,
        points: &[SamplePoint],
        grid_x: &Array1<f64>,
        grid_y: &Array1<f64>,
    ) -> Array2<f64>;
}

/// Inverse distance weighting with a configurable power.
#[derive(Debug, Clone, Copy)]
pub struct InverseDistance {
    pub power: f64,
}

impl Default for InverseDistance {
    fn default() -> Self {
        Self { power: 2.0 }
    }
}

impl InverseDistance {
    fn value_at(&self, points: &[SamplePoint], x: f64, y: f64) -> f64 {
        let mut weighted = 0.0;
        let mut total = 0.0;
        for point in points {
            let dist_sq = point.dist_sq(x, y);
            if dist_sq == 0.0 {
                return point.value;
            }
            let weight = 1.0 / dist_sq.powf(self.power / 2.0);
            weighted += weight * point.value;
            total += weight;
        }
        if total > 0.0 {
            weighted / total
        } else {
            f64::NAN
        }
    }
}

impl Interpolator for InverseDistance {
    fn interpolate(
        &self,
        points: &[SamplePoint],
        grid_x: &Array1<f64>,
        grid_y: &Array1<f64>,
    ) -> Array2<f64> {
        Array2::from_shape_fn((grid_y.len(), grid_x.len()), |(row, col)| {
            self.value_at(points, grid_x[col], grid_y[row])
        })
    }
}

pub const DEFAULT_GRID_SPACING: f64 = 0.004;

/// One flattened grid node with the three interpolated components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridNode {
    pub lon: f64,
    pub lat: f64,
    pub delta_east: f64,
    pub delta_north: f64,
    pub delta_up: f64,
}

/// Interpolates east, north and vertical displacement onto a common grid
/// spanning the table's extent, row-major by latitude.
pub fn interpolate_table(
    points: &[TablePoint],
    spacing: f64,
    interpolator: &dyn Interpolator,
) -> Vec<GridNode> {
    let lons: Vec<f64> = points.iter().map(|p| p.lon).collect();
    let lats: Vec<f64> = points.iter().map(|p| p.lat).collect();
    let grid_x = create_grid(&lons, spacing);
    let grid_y = create_grid(&lats, spacing);

    let component = |value: fn(&TablePoint) -> f64| {
        let samples: Vec<SamplePoint> = points
            .iter()
            .map(|p| SamplePoint::new(p.lon, p.lat, value(p)))
            .collect();
        interpolator.interpolate(&samples, &grid_x, &grid_y)
    };
    let east = component(|p| p.delta_east);
    let north = component(|p| p.delta_north);
    let up = component(|p| p.delta_up);

    let mut nodes = Vec::with_capacity(grid_x.len() * grid_y.len());
    for (row, &lat) in grid_y.iter().enumerate() {
        for (col, &lon) in grid_x.iter().enumerate() {
            nodes.push(GridNode {
                lon,
                lat,
                delta_east: east[[row, col]],
                delta_north: north[[row, col]],
                delta_up: up[[row, col]],
            });
        }
    }
    nodes
}

/// Whitespace table of grid nodes with a `Lon Lat Delta E Delta N Delta V` header.
pub fn format_grid(nodes: &[GridNode]) -> String {
    let mut out = String::from("         Lon          Lat      Delta E      Delta N      Delta V\n");
    for node in nodes {
        out.push_str(&format!(
            "{:12.6} {:12.6} {:12.6} {:12.6} {:12.6}\n",
            node.lon, node.lat, node.delta_east, node.delta_north, node.delta_up
        ));
    }
    out
}

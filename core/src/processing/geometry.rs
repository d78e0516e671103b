//! Local-tangent rendering of displacements in lon/lat degrees.
//!
//! Offsets in millimeters are divided by `scale` (mm per degree) and the
//! east component is stretched by `1 / cos(lat)`. This flat approximation
//! only holds for boxes a few degrees across.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Number of segments in every rendered ring; the ring has one more point.
pub const RING_SEGMENTS: usize = 30;

pub const REFERENCE_MARKER_COLOR: &str = "FF0000FF";
pub const STATION_MARKER_COLOR: &str = "FF78FF78";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lon: f64,
    pub lat: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Coordinate,
    pub end: Coordinate,
}

/// Sign of the vertical motion, drives the circle colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalSense {
    Uplift,
    Subsidence,
}

impl VerticalSense {
    pub fn of(delta_up: f64) -> Self {
        if delta_up > 0.0 {
            VerticalSense::Uplift
        } else {
            VerticalSense::Subsidence
        }
    }

    pub fn line_color(&self) -> &'static str {
        match self {
            VerticalSense::Uplift => "FF0000FF",
            VerticalSense::Subsidence => "FFFF0000",
        }
    }

    pub fn fill_color(&self) -> &'static str {
        match self {
            VerticalSense::Uplift => "7F0000FF",
            VerticalSense::Subsidence => "7FFF0000",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VerticalCircle {
    pub ring: Vec<Coordinate>,
    pub sense: VerticalSense,
}

pub fn marker_color(is_reference: bool) -> &'static str {
    if is_reference {
        REFERENCE_MARKER_COLOR
    } else {
        STATION_MARKER_COLOR
    }
}

fn offset(lon: f64, lat: f64, east_mm: f64, north_mm: f64, scale: f64) -> Coordinate {
    Coordinate {
        lon: lon + east_mm / scale / (lat * PI / 180.0).cos(),
        lat: lat + north_mm / scale,
    }
}

#[allow(clippy::too_many_arguments)]
fn ring(
    lon: f64,
    lat: f64,
    center_east: f64,
    center_north: f64,
    semi_east: f64,
    semi_north: f64,
    rotation: f64,
    scale: f64,
) -> Vec<Coordinate> {
    let (sin_t, cos_t) = rotation.sin_cos();
    (0..=RING_SEGMENTS)
        .map(|k| {
            let angle = k as f64 / RING_SEGMENTS as f64 * 2.0 * PI;
            let (sin_a, cos_a) = angle.sin_cos();
            let east = semi_east * cos_a * cos_t - semi_north * sin_a * sin_t;
            let north = semi_east * cos_a * sin_t + semi_north * sin_a * cos_t;
            offset(lon, lat, east + center_east, north + center_north, scale)
        })
        .collect()
}

/// Arrow from the station to its displaced position.
pub fn render_vector(lon: f64, lat: f64, delta_east: f64, delta_north: f64, scale: f64) -> Segment {
    Segment {
        start: Coordinate { lon, lat },
        end: offset(lon, lat, delta_east, delta_north, scale),
    }
}

/// Closed error ellipse around the displaced position.
///
/// `rotation` (radians, counter-clockwise from east) orients the ellipse;
/// pass `0.0` for the axis-aligned form.
#[allow(clippy::too_many_arguments)]
pub fn render_error_ellipse(
    lon: f64,
    lat: f64,
    delta_east: f64,
    delta_north: f64,
    sigma_east: f64,
    sigma_north: f64,
    scale: f64,
    rotation: f64,
) -> Vec<Coordinate> {
    ring(
        lon,
        lat,
        delta_east,
        delta_north,
        sigma_east,
        sigma_north,
        rotation,
        scale,
    )
}

/// Closed circle at the station with radius `|delta_up|`.
pub fn render_vertical_circle(lon: f64, lat: f64, delta_up: f64, scale: f64) -> VerticalCircle {
    let radius = delta_up.abs();
    VerticalCircle {
        ring: ring(lon, lat, 0.0, 0.0, radius, radius, 0.0, scale),
        sense: VerticalSense::of(delta_up),
    }
}

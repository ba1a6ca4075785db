use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use thiserror::Error;

/// Slice 0 opens at the top of the ring so layouts are deterministic.
pub const START_ANGLE: f64 = -PI / 2.0;

pub const FULL_TURN: f64 = 2.0 * PI;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    #[error("a menu must have at least one item")]
    InvalidItemCount,
    #[error("outer radius {outer} must exceed inner radius {inner}, and inner must be >= 0")]
    InvalidRadii { inner: f64, outer: f64 },
}

/// One angular wedge of the ring. Angles grow from `START_ANGLE` without
/// wrapping, so `start_angle < end_angle` always holds and neighbors share
/// their boundary exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub index: usize,
    pub start_angle: f64,
    pub end_angle: f64,
    pub label_anchor: Point,
}

impl Slice {
    pub fn width(&self) -> f64 {
        self.end_angle - self.start_angle
    }
}

pub fn calculate_slices(
    item_count: usize,
    outer_radius: f64,
    inner_radius: f64,
    center: Point,
) -> Result<Vec<Slice>, GeometryError> {
    calculate_slices_offset(item_count, outer_radius, inner_radius, center, 0.0)
}

/// Lay out `item_count` contiguous slices covering the full ring, with label
/// anchors pushed `label_offset` past the radial midpoint (the selection
/// pop-out effect is just a larger offset).
pub fn calculate_slices_offset(
    item_count: usize,
    outer_radius: f64,
    inner_radius: f64,
    center: Point,
    label_offset: f64,
) -> Result<Vec<Slice>, GeometryError> {
    if item_count == 0 {
        return Err(GeometryError::InvalidItemCount);
    }
    if inner_radius < 0.0 || outer_radius <= inner_radius {
        return Err(GeometryError::InvalidRadii {
            inner: inner_radius,
            outer: outer_radius,
        });
    }

    let width = FULL_TURN / item_count as f64;
    let label_radius = (inner_radius + outer_radius) / 2.0 + label_offset;

    Ok((0..item_count)
        .map(|i| {
            let start_angle = START_ANGLE + i as f64 * width;
            let end_angle = start_angle + width;
            let mid = start_angle + width / 2.0;
            Slice {
                index: i,
                start_angle,
                end_angle,
                label_anchor: Point::new(
                    center.x + label_radius * mid.cos(),
                    center.y + label_radius * mid.sin(),
                ),
            }
        })
        .collect())
}

//! Pure input-to-slice mapping. Every entry point returns `Option<usize>`;
//! `None` means "keep whatever was selected before", so selection stays
//! sticky across dead zones and out-of-ring input.

use crate::geometry::{FULL_TURN, Point, Slice};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepDirection {
    Clockwise,
    CounterClockwise,
}

/// Map an angle to the slice whose `[start, end)` span contains it.
///
/// The comparison is done on the angle's offset from slice 0's start, so the
/// half-open bounds are exact: a point sitting on a shared boundary belongs
/// to the slice that starts there, never to the one that ends there.
pub fn slice_at_angle(angle: f64, slices: &[Slice]) -> Option<usize> {
    let first = slices.first()?;
    let rel = (angle - first.start_angle).rem_euclid(FULL_TURN);

    slices
        .iter()
        .position(|s| {
            let lo = s.start_angle - first.start_angle;
            let hi = s.end_angle - first.start_angle;
            lo <= rel && rel < hi
        })
        // rounding at the wrap seam can push rel a hair past the last end
        .or(Some(slices.len() - 1))
}

/// Hit-test a point against the ring. Outside `[inner_radius, outer_radius]`
/// (the center hole or past the rim) returns `None`.
pub fn hit_test(
    point: Point,
    center: Point,
    slices: &[Slice],
    inner_radius: f64,
    outer_radius: f64,
) -> Option<usize> {
    let dist = point.distance_to(center);
    if dist < inner_radius || dist > outer_radius {
        return None;
    }
    slice_at_angle((point.y - center.y).atan2(point.x - center.x), slices)
}

/// Map a normalized stick vector to a slice. Magnitude below the deadzone
/// returns `None` so a stick returning to rest does not collapse the current
/// pick; beyond the deadzone only the direction matters.
pub fn stick_select(x: f64, y: f64, deadzone: f64, slices: &[Slice]) -> Option<usize> {
    let deadzone = deadzone.clamp(0.0, 1.0);
    if x.hypot(y) < deadzone {
        return None;
    }
    slice_at_angle(y.atan2(x), slices)
}

pub fn next_clockwise(current: Option<usize>, count: usize) -> Option<usize> {
    step(current, count, StepDirection::Clockwise)
}

pub fn next_counter_clockwise(current: Option<usize>, count: usize) -> Option<usize> {
    step(current, count, StepDirection::CounterClockwise)
}

pub fn step(current: Option<usize>, count: usize, direction: StepDirection) -> Option<usize> {
    if count == 0 {
        return None;
    }
    let next = match (current, direction) {
        (None, _) => 0,
        (Some(c), StepDirection::Clockwise) => (c + 1) % count,
        (Some(c), StepDirection::CounterClockwise) => (c + count - 1) % count,
    };
    Some(next)
}

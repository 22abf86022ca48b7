use std::f64::consts::{PI, TAU};

/// The fixed "12 o'clock" reference angle in y-down screen coordinates.
///
/// 0 rad points along +x and angles grow clockwise on screen, so straight up is `1.5π`.
pub const TWELVE_OCLOCK: f64 = 1.5 * PI;

/// One full turn.
pub const FULL_TURN: f64 = TAU;

/// Round to one decimal place, the tolerance used for weight sums.
pub fn round_to_tenth(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Point at `radius` and `angle` around `center` (y-down screen coordinates).
pub fn polar(center: kurbo::Point, radius: f64, angle: f64) -> kurbo::Point {
    kurbo::Point::new(
        center.x + radius * angle.cos(),
        center.y + radius * angle.sin(),
    )
}

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

pub(crate) fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;

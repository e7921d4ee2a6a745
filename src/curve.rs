//! Closed-form curves behind the three animations.
//!
//! All functions are pure and total over the pixel domains the renderer
//! samples; progress `p` is `frame / total_frames` in `[0, 1]`.

use crate::params::{circle, derivative, sine, TAU};

/// A point in canvas pixel space (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Normalized session completion.
pub fn progress(frame: u32, total_frames: u32) -> f64 {
    if total_frames == 0 {
        return 0.0;
    }
    f64::from(frame) / f64::from(total_frames)
}

/// `f(x) = x² / 4` in real units.
pub fn parabola(real_x: f64) -> f64 {
    real_x * real_x / 4.0
}

/// `f'(x) = x / 2`.
pub fn parabola_slope(real_x: f64) -> f64 {
    real_x / 2.0
}

/// Canvas y of the parabola for a pixel offset `x` from the horizontal
/// center (`x ∈ [-width/2, width/2)`).
pub fn derivative_y(x: f64, center_y: f64) -> f64 {
    let real_x = x / derivative::SCALE;
    center_y - parabola(real_x) * derivative::SCALE
}

/// Opacity pulse applied to the second pass of an animated derivative frame.
pub fn derivative_alpha(p: f64) -> f64 {
    (p * TAU).sin() * derivative::ALPHA_SWING + derivative::ALPHA_BASE
}

/// Tangent contact point and segment endpoints, in canvas space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tangent {
    pub point: Point,
    pub start: Point,
    pub end: Point,
}

pub fn tangent(center: Point) -> Tangent {
    let x = derivative::TANGENT_AT;
    let slope = parabola_slope(x);
    let point = Point::new(
        center.x + x * derivative::SCALE,
        center.y - parabola(x) * derivative::SCALE,
    );
    let len = derivative::TANGENT_HALF_LEN;
    Tangent {
        point,
        start: Point::new(point.x - len, point.y + slope * len),
        end: Point::new(point.x + len, point.y - slope * len),
    }
}

/// Radius of the growing circle: `p * 60`.
pub fn circle_radius(p: f64) -> f64 {
    p * circle::MAX_RADIUS
}

/// Phase offset of the travelling sine wave: `4πp`.
pub fn sine_phase(p: f64) -> f64 {
    p * sine::PHASE_SWEEP
}

/// `center_y + 50 * sin(0.02 x + 4πp)`.
pub fn sine_y(x: f64, p: f64, center_y: f64) -> f64 {
    center_y + sine::AMPLITUDE * (sine::FREQUENCY * x + sine_phase(p)).sin()
}

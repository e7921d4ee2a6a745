//! Fixed drawing parameters for the three animations.
//!
//! Everything here is a compile-time constant; nothing on the page is
//! configurable beyond picking one of these animations to play.

use std::f64::consts::PI;

/// A full turn, for arcs.
pub const TAU: f64 = 2.0 * PI;

/// Stroke/fill colour and width pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pen {
    pub color: &'static str,
    pub width: f64,
}

pub const AXIS: Pen = Pen { color: "#ccc", width: 1.0 };
pub const CURVE: Pen = Pen { color: "#667eea", width: 2.0 };
pub const CIRCLE: Pen = Pen { color: "#667eea", width: 3.0 };
pub const ACCENT: Pen = Pen { color: "#ff6b6b", width: 2.0 };

/// Fill used for the circle's center dot.
pub const INK: &str = "#333";

pub mod derivative {
    /// Pixels per unit on both axes.
    pub const SCALE: f64 = 50.0;
    /// Tangent is drawn at this real-valued x.
    pub const TANGENT_AT: f64 = 1.0;
    /// Horizontal half-extent of the tangent segment, in pixels.
    pub const TANGENT_HALF_LEN: f64 = 60.0;
    pub const POINT_RADIUS: f64 = 4.0;
    pub const TOTAL_FRAMES: u32 = 60;
    /// Opacity pulse: `sin(2πp) * ALPHA_SWING + ALPHA_BASE`.
    pub const ALPHA_SWING: f64 = 0.3;
    pub const ALPHA_BASE: f64 = 0.7;
}

pub mod circle {
    /// Radius of the static preview and of the fully grown circle.
    pub const MAX_RADIUS: f64 = 60.0;
    pub const CENTER_DOT_RADIUS: f64 = 3.0;
    pub const TOTAL_FRAMES: u32 = 120;
    pub const LABEL: &str = "r";
    pub const LABEL_FONT: &str = "14px Arial";
    /// Label sits this far above the radius line.
    pub const LABEL_RISE: f64 = 10.0;
}

pub mod sine {
    pub const AMPLITUDE: f64 = 50.0;
    pub const FREQUENCY: f64 = 0.02;
    /// Phase swept over one session, in radians (two full periods).
    pub const PHASE_SWEEP: f64 = 4.0 * std::f64::consts::PI;
    pub const TOTAL_FRAMES: u32 = 120;
}

/// Delay after a play request before the trigger control is released.
pub const RELEASE_DELAY_MS: u32 = 3000;

/// Label shown on a play button while its animation is running.
pub const PLAYING_LABEL: &str = "Playing...";

//! Per-animation draw sequences.
//!
//! Each `*_preview` draws the still image shown before anything is played;
//! each `*_frame` draws one tick of a running session at progress `p`.
//! Every function clears the whole surface first, so calling one twice
//! with the same inputs leaves the same picture and the same call log.

use crate::curve::{self, Point};
use crate::kind::AnimationKind;
use crate::params::{self, circle, derivative, Pen, TAU};
use crate::surface::{Surface, TextAlign};

/// What to draw: the still preview or one animated frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Frame {
    Preview,
    Progress(f64),
}

/// Draw `kind` onto `surface`. An absent surface draws nothing.
pub fn render(surface: Option<&mut dyn Surface>, kind: AnimationKind, frame: Frame) {
    let Some(s) = surface else {
        tracing::debug!(%kind, "no surface, skipping draw");
        return;
    };
    match (kind, frame) {
        (AnimationKind::Derivative, Frame::Preview) => derivative_preview(s),
        (AnimationKind::Derivative, Frame::Progress(p)) => derivative_frame(s, p),
        (AnimationKind::Circle, Frame::Preview) => circle_preview(s),
        (AnimationKind::Circle, Frame::Progress(p)) => circle_frame(s, p),
        (AnimationKind::SineWave, Frame::Preview) => sine_preview(s),
        (AnimationKind::SineWave, Frame::Progress(p)) => sine_frame(s, p),
    }
}

fn clear(s: &mut dyn Surface) {
    let (w, h) = (s.width(), s.height());
    s.clear_rect(0.0, 0.0, w, h);
}

fn pen(s: &mut dyn Surface, pen: Pen) {
    s.set_stroke_style(pen.color);
    s.set_line_width(pen.width);
}

fn center(s: &dyn Surface) -> Point {
    Point::new(s.width() / 2.0, s.height() / 2.0)
}

/// Opens a path and traces the points as one connected line.
fn polyline(s: &mut dyn Surface, points: impl IntoIterator<Item = Point>) {
    s.begin_path();
    let mut points = points.into_iter();
    if let Some(first) = points.next() {
        s.move_to(first.x, first.y);
    }
    for p in points {
        s.line_to(p.x, p.y);
    }
}

fn dot(s: &mut dyn Surface, at: Point, radius: f64, color: &str) {
    s.set_fill_style(color);
    s.begin_path();
    s.arc(at.x, at.y, radius, 0.0, TAU);
    s.fill();
}

/// Number of integer pixel samples across the surface width.
fn samples(width: f64) -> u32 {
    width.max(0.0).ceil() as u32
}

pub fn derivative_preview(s: &mut dyn Surface) {
    clear(s);
    let c = center(s);
    let (w, h) = (s.width(), s.height());

    pen(s, params::AXIS);
    s.begin_path();
    s.move_to(0.0, c.y);
    s.line_to(w, c.y);
    s.move_to(c.x, 0.0);
    s.line_to(c.x, h);
    s.stroke();

    // f(x) = x²/4 sampled across [-w/2, w/2)
    pen(s, params::CURVE);
    let left = -w / 2.0;
    polyline(
        s,
        (0..samples(w)).map(|i| {
            let x = left + f64::from(i);
            Point::new(c.x + x, curve::derivative_y(x, c.y))
        }),
    );
    s.stroke();

    let t = curve::tangent(c);
    pen(s, params::ACCENT);
    polyline(s, [t.start, t.end]);
    s.stroke();

    dot(s, t.point, derivative::POINT_RADIUS, params::ACCENT.color);
}

/// The preview, then the preview again at the pulsing opacity.
pub fn derivative_frame(s: &mut dyn Surface, p: f64) {
    derivative_preview(s);
    s.set_global_alpha(curve::derivative_alpha(p));
    derivative_preview(s);
    s.set_global_alpha(1.0);
}

pub fn circle_preview(s: &mut dyn Surface) {
    clear(s);
    let c = center(s);
    let r = circle::MAX_RADIUS;

    pen(s, params::CIRCLE);
    s.begin_path();
    s.arc(c.x, c.y, r, 0.0, TAU);
    s.stroke();

    pen(s, params::ACCENT);
    polyline(s, [c, Point::new(c.x + r, c.y)]);
    s.stroke();

    dot(s, c, circle::CENTER_DOT_RADIUS, params::INK);

    s.set_fill_style(params::ACCENT.color);
    s.set_font(circle::LABEL_FONT);
    s.set_text_align(TextAlign::Center);
    s.fill_text(circle::LABEL, c.x + r / 2.0, c.y - circle::LABEL_RISE);
}

pub fn circle_frame(s: &mut dyn Surface, p: f64) {
    clear(s);
    let c = center(s);
    let r = curve::circle_radius(p);

    pen(s, params::CIRCLE);
    s.begin_path();
    s.arc(c.x, c.y, r, 0.0, TAU);
    s.stroke();

    if r > 0.0 {
        pen(s, params::ACCENT);
        polyline(s, [c, Point::new(c.x + r, c.y)]);
        s.stroke();
    }

    dot(s, c, circle::CENTER_DOT_RADIUS, params::INK);
}

fn center_line(s: &mut dyn Surface, center_y: f64) {
    let w = s.width();
    pen(s, params::AXIS);
    polyline(s, [Point::new(0.0, center_y), Point::new(w, center_y)]);
    s.stroke();
}

fn wave(s: &mut dyn Surface, p: f64, center_y: f64) {
    let w = s.width();
    pen(s, params::CURVE);
    polyline(
        s,
        (0..samples(w)).map(|x| {
            let x = f64::from(x);
            Point::new(x, curve::sine_y(x, p, center_y))
        }),
    );
    s.stroke();
}

pub fn sine_preview(s: &mut dyn Surface) {
    clear(s);
    let cy = s.height() / 2.0;
    wave(s, 0.0, cy);
    center_line(s, cy);
}

pub fn sine_frame(s: &mut dyn Surface, p: f64) {
    clear(s);
    let cy = s.height() / 2.0;
    center_line(s, cy);
    wave(s, p, cy);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCall, Recorder};

    #[test]
    fn every_draw_starts_with_a_full_clear() {
        for kind in AnimationKind::ALL {
            for frame in [Frame::Preview, Frame::Progress(0.5)] {
                let mut rec = Recorder::new(300, 200);
                render(Some(&mut rec), kind, frame);
                assert_eq!(
                    rec.calls()[0],
                    DrawCall::ClearRect { x: 0.0, y: 0.0, w: 300.0, h: 200.0 },
                    "{kind} {frame:?}"
                );
            }
        }
    }

    #[test]
    fn missing_surface_is_a_noop() {
        for kind in AnimationKind::ALL {
            render(None, kind, Frame::Progress(0.3));
        }
    }

    #[test]
    fn derivative_frame_restores_alpha() {
        let mut rec = Recorder::new(400, 300);
        derivative_frame(&mut rec, 0.25);
        let alphas: Vec<_> = rec
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                DrawCall::GlobalAlpha(a) => Some(a),
                _ => None,
            })
            .collect();
        assert_eq!(alphas.len(), 2);
        assert!((alphas[0] - 1.0).abs() < 1e-9);
        assert_eq!(alphas[1], 1.0);
        assert_eq!(rec.count(|c| matches!(c, DrawCall::ClearRect { .. })), 2);
    }

    #[test]
    fn circle_preview_labels_radius() {
        let mut rec = Recorder::new(200, 200);
        circle_preview(&mut rec);
        assert_eq!(
            rec.calls().last(),
            Some(&DrawCall::FillText { text: "r".into(), x: 130.0, y: 90.0 })
        );
    }
}

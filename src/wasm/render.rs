use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

use crate::driver::{Scheduler, Timer};
use crate::error::{PageError, PageResult};
use crate::surface::{Surface, TextAlign};

/// A canvas' 2d context, sized from the element when it was mounted.
pub struct Canvas {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl Canvas {
    pub fn new(canvas: &HtmlCanvasElement) -> PageResult<Self> {
        let unavailable = || PageError::ContextUnavailable(canvas.id());
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(unavailable)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| unavailable())?;
        Ok(Self {
            ctx,
            width: f64::from(canvas.width()),
            height: f64::from(canvas.height()),
        })
    }
}

fn warn_on_err(op: &str, result: Result<(), JsValue>) {
    if let Err(err) = result {
        tracing::warn!(op, error = ?err, "canvas call failed");
    }
}

impl Surface for Canvas {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ctx.clear_rect(x, y, w, h);
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.ctx.set_stroke_style_str(color);
    }

    fn set_fill_style(&mut self, color: &str) {
        self.ctx.set_fill_style_str(color);
    }

    fn set_line_width(&mut self, width: f64) {
        self.ctx.set_line_width(width);
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.ctx.set_global_alpha(alpha);
    }

    fn set_font(&mut self, font: &str) {
        self.ctx.set_font(font);
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.ctx.set_text_align(align.as_css());
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ctx.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ctx.line_to(x, y);
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64) {
        warn_on_err("arc", self.ctx.arc(x, y, radius, start, end));
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }

    fn fill(&mut self) {
        self.ctx.fill();
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        warn_on_err("fill_text", self.ctx.fill_text(text, x, y));
    }
}

/// One-shot `requestAnimationFrame`.
pub struct AnimationFrames {
    window: Window,
}

impl AnimationFrames {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl Scheduler for AnimationFrames {
    fn request_frame(&self, callback: Box<dyn FnOnce()>) {
        // once_into_js frees the closure after its single call
        let f = Closure::once_into_js(move || callback());
        if let Err(err) = self.window.request_animation_frame(f.unchecked_ref()) {
            tracing::warn!(error = ?err, "requestAnimationFrame failed");
        }
    }
}

/// One-shot `setTimeout`.
pub struct Timeouts {
    window: Window,
}

impl Timeouts {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl Timer for Timeouts {
    fn after(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) {
        let f = Closure::once_into_js(move || callback());
        let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
        if let Err(err) = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(f.unchecked_ref(), delay)
        {
            tracing::warn!(error = ?err, "setTimeout failed");
        }
    }
}

//! The 2D drawing capability the renderer depends on.
//!
//! The browser build implements [`Surface`] for `CanvasRenderingContext2d`;
//! [`Recorder`] keeps a log of calls instead of pixels.

use std::cell::RefCell;
use std::rc::Rc;

/// Horizontal text anchoring, mirroring canvas `textAlign`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Center,
}

impl TextAlign {
    pub fn as_css(self) -> &'static str {
        match self {
            TextAlign::Center => "center",
        }
    }
}

pub trait Surface {
    fn width(&self) -> f64;
    fn height(&self) -> f64;

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64);
    fn set_stroke_style(&mut self, color: &str);
    fn set_fill_style(&mut self, color: &str);
    fn set_line_width(&mut self, width: f64);
    fn set_global_alpha(&mut self, alpha: f64);
    fn set_font(&mut self, font: &str);
    fn set_text_align(&mut self, align: TextAlign);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64);
    fn stroke(&mut self);
    fn fill(&mut self);
    fn fill_text(&mut self, text: &str, x: f64, y: f64);
}

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    ClearRect { x: f64, y: f64, w: f64, h: f64 },
    StrokeStyle(String),
    FillStyle(String),
    LineWidth(f64),
    GlobalAlpha(f64),
    Font(String),
    TextAlign(TextAlign),
    BeginPath,
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    Arc { x: f64, y: f64, radius: f64, start: f64, end: f64 },
    Stroke,
    Fill,
    FillText { text: String, x: f64, y: f64 },
}

/// Headless surface that logs every call. Clones share one log, so a
/// handle can be kept while another is handed to the player.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    width: f64,
    height: f64,
    calls: Rc<RefCell<Vec<DrawCall>>>,
}

impl Recorder {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: f64::from(width),
            height: f64::from(height),
            calls: Rc::default(),
        }
    }

    pub fn calls(&self) -> Vec<DrawCall> {
        self.calls.borrow().clone()
    }

    pub fn take(&self) -> Vec<DrawCall> {
        std::mem::take(&mut *self.calls.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.borrow().is_empty()
    }

    pub fn count(&self, pred: impl Fn(&DrawCall) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| pred(c)).count()
    }

    fn push(&self, call: DrawCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl Surface for Recorder {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.push(DrawCall::ClearRect { x, y, w, h });
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.push(DrawCall::StrokeStyle(color.to_owned()));
    }

    fn set_fill_style(&mut self, color: &str) {
        self.push(DrawCall::FillStyle(color.to_owned()));
    }

    fn set_line_width(&mut self, width: f64) {
        self.push(DrawCall::LineWidth(width));
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.push(DrawCall::GlobalAlpha(alpha));
    }

    fn set_font(&mut self, font: &str) {
        self.push(DrawCall::Font(font.to_owned()));
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.push(DrawCall::TextAlign(align));
    }

    fn begin_path(&mut self) {
        self.push(DrawCall::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.push(DrawCall::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.push(DrawCall::LineTo { x, y });
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64) {
        self.push(DrawCall::Arc {
            x,
            y,
            radius,
            start,
            end,
        });
    }

    fn stroke(&mut self) {
        self.push(DrawCall::Stroke);
    }

    fn fill(&mut self) {
        self.push(DrawCall::Fill);
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        self.push(DrawCall::FillText {
            text: text.to_owned(),
            x,
            y,
        });
    }
}

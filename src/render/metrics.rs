//! Deterministic measuring/recording device.
//!
//! `MetricsDevice` draws nothing. It records every draw call and answers
//! text measurement with a fixed glyph model, which makes layout code fully
//! testable without a rasterizer: the same input always produces the same
//! extents on every platform.

use crate::core::types::{RealPoint, RealRect};

use super::{Brush, FillRule, OutputDevice, Pen, TextExtent, TextFont};

/// Glyph advance as a fraction of the point size.
const GLYPH_ASPECT: f64 = 0.6;
/// Line height as a fraction of the point size.
const LINE_ASPECT: f64 = 1.2;

pub(crate) fn approx_text_extent(point_size: f64, text: &str) -> TextExtent {
    let chars = text.chars().count() as f64;
    TextExtent {
        width: chars * GLYPH_ASPECT * point_size,
        height: LINE_ASPECT * point_size,
    }
}

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    Polyline(Vec<RealPoint>),
    Polygon(Vec<RealPoint>, FillRule),
    Rect(RealRect),
    Circle {
        x: f64,
        y: f64,
        radius: f64,
    },
    Text {
        content: String,
        x: f64,
        y: f64,
        angle_degrees: f64,
    },
    Clip(RealRect),
    Unclip,
}

pub struct MetricsDevice {
    base_points: f64,
    pen: Pen,
    brush: Brush,
    font: TextFont,
    antialias: bool,
    ops: Vec<DrawOp>,
}

impl MetricsDevice {
    #[must_use]
    pub fn new(base_points: f64) -> Self {
        Self {
            base_points,
            pen: Pen::default(),
            brush: Brush::default(),
            font: TextFont::default(),
            antialias: false,
            ops: Vec::new(),
        }
    }

    #[must_use]
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    #[must_use]
    pub fn text_ops(&self) -> Vec<&DrawOp> {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Text { .. }))
            .collect()
    }

    #[must_use]
    pub fn antialiasing(&self) -> bool {
        self.antialias
    }

    fn point_size(&self) -> f64 {
        (self.base_points + self.font.point_delta).max(1.0)
    }
}

impl Default for MetricsDevice {
    fn default() -> Self {
        Self::new(12.0)
    }
}

impl OutputDevice for MetricsDevice {
    fn equals(&self, a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn set_antialiasing(&mut self, enable: bool) {
        self.antialias = enable;
    }

    fn set_pen(&mut self, pen: Pen) {
        self.pen = pen;
    }

    fn pen(&self) -> Pen {
        self.pen
    }

    fn set_brush(&mut self, brush: Brush) {
        self.brush = brush;
    }

    fn brush(&self) -> Brush {
        self.brush
    }

    fn set_font(&mut self, font: TextFont) {
        self.font = font;
    }

    fn font(&self) -> TextFont {
        self.font
    }

    fn clip(&mut self, rect: RealRect) {
        self.ops.push(DrawOp::Clip(rect));
    }

    fn unclip(&mut self) {
        self.ops.push(DrawOp::Unclip);
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.ops.push(DrawOp::Line { x1, y1, x2, y2 });
    }

    fn polyline(&mut self, points: &[RealPoint]) {
        self.ops.push(DrawOp::Polyline(points.to_vec()));
    }

    fn polygon(&mut self, points: &[RealPoint], rule: FillRule) {
        self.ops.push(DrawOp::Polygon(points.to_vec(), rule));
    }

    fn rect(&mut self, rect: RealRect) {
        self.ops.push(DrawOp::Rect(rect));
    }

    fn circle(&mut self, x: f64, y: f64, radius: f64) {
        self.ops.push(DrawOp::Circle { x, y, radius });
    }

    fn text(&mut self, text: &str, x: f64, y: f64, angle_degrees: f64) {
        self.ops.push(DrawOp::Text {
            content: text.to_owned(),
            x,
            y,
            angle_degrees,
        });
    }

    fn measure(&mut self, text: &str) -> TextExtent {
        approx_text_extent(self.point_size(), text)
    }
}

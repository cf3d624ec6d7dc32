//! Pure-Rust SVG output device.
//!
//! Draw calls are buffered into an in-memory document; `finish` emits the
//! complete SVG to any `io::Write`. Text measurement uses the same
//! deterministic glyph model as `MetricsDevice`, so layouts are identical
//! between the two backends.

use std::fmt::Write as _;
use std::io::Write;

use crate::core::types::{RealPoint, RealRect};
use crate::error::PlotResult;

use super::metrics::approx_text_extent;
use super::{Brush, BrushStyle, FillRule, LineCap, LineJoin, LineStyle, OutputDevice, Pen, TextExtent, TextFont};

pub struct SvgDevice {
    width: f64,
    height: f64,
    base_points: f64,
    pen: Pen,
    brush: Brush,
    font: TextFont,
    body: String,
    open_clips: usize,
    clip_serial: usize,
}

impl SvgDevice {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            base_points: 12.0,
            pen: Pen::default(),
            brush: Brush::default(),
            font: TextFont::default(),
            body: String::new(),
            open_clips: 0,
            clip_serial: 0,
        }
    }

    /// Writes the complete document and consumes the device.
    pub fn finish<W: Write>(mut self, writer: &mut W) -> PlotResult<()> {
        while self.open_clips > 0 {
            self.body.push_str("</g>\n");
            self.open_clips -= 1;
        }
        writeln!(
            writer,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{:.2}\" height=\"{:.2}\" viewBox=\"0 0 {:.2} {:.2}\">",
            self.width, self.height, self.width, self.height
        )?;
        writer.write_all(self.body.as_bytes())?;
        writeln!(writer, "</svg>")?;
        Ok(())
    }

    fn point_size(&self) -> f64 {
        (self.base_points + self.font.point_delta).max(1.0)
    }

    fn stroke_attrs(&self) -> String {
        if self.pen.style == LineStyle::None || self.pen.width <= 0.0 {
            return "stroke=\"none\"".to_owned();
        }
        let mut s = format!(
            "stroke=\"{}\" stroke-width=\"{:.2}\"",
            css_color(self.pen.color),
            self.pen.width
        );
        if self.pen.color.alpha < 1.0 {
            let _ = write!(s, " stroke-opacity=\"{:.3}\"", self.pen.color.alpha);
        }
        match self.pen.style {
            LineStyle::Dot => s.push_str(" stroke-dasharray=\"1,2\""),
            LineStyle::Dash => s.push_str(" stroke-dasharray=\"4,2\""),
            LineStyle::DotDash => s.push_str(" stroke-dasharray=\"4,2,1,2\""),
            LineStyle::Solid | LineStyle::None => {}
        }
        match self.pen.join {
            LineJoin::Round => s.push_str(" stroke-linejoin=\"round\""),
            LineJoin::Bevel => s.push_str(" stroke-linejoin=\"bevel\""),
            LineJoin::Miter => {}
        }
        match self.pen.cap {
            LineCap::Round => s.push_str(" stroke-linecap=\"round\""),
            LineCap::Square => s.push_str(" stroke-linecap=\"square\""),
            LineCap::Butt => {}
        }
        s
    }

    fn fill_attrs(&self) -> String {
        if self.brush.style == BrushStyle::None {
            return "fill=\"none\"".to_owned();
        }
        let mut s = format!("fill=\"{}\"", css_color(self.brush.color));
        if self.brush.color.alpha < 1.0 {
            let _ = write!(s, " fill-opacity=\"{:.3}\"", self.brush.color.alpha);
        }
        s
    }
}

impl OutputDevice for SvgDevice {
    fn equals(&self, a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    fn set_antialiasing(&mut self, _enable: bool) {
        // vector output, nothing to toggle
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
        self.clip_serial += 1;
        let id = self.clip_serial;
        let _ = write!(
            self.body,
            "<clipPath id=\"clip{id}\"><rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\"/></clipPath>\n<g clip-path=\"url(#clip{id})\">\n",
            rect.x, rect.y, rect.width, rect.height
        );
        self.open_clips += 1;
    }

    fn unclip(&mut self) {
        if self.open_clips > 0 {
            self.body.push_str("</g>\n");
            self.open_clips -= 1;
        }
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        let stroke = self.stroke_attrs();
        let _ = write!(
            self.body,
            "<line x1=\"{x1:.2}\" y1=\"{y1:.2}\" x2=\"{x2:.2}\" y2=\"{y2:.2}\" {stroke}/>\n"
        );
    }

    fn polyline(&mut self, points: &[RealPoint]) {
        if points.len() < 2 {
            return;
        }
        let stroke = self.stroke_attrs();
        let _ = write!(
            self.body,
            "<polyline points=\"{}\" fill=\"none\" {stroke}/>\n",
            point_list(points)
        );
    }

    fn polygon(&mut self, points: &[RealPoint], rule: FillRule) {
        if points.len() < 3 {
            return;
        }
        let stroke = self.stroke_attrs();
        let fill = self.fill_attrs();
        let rule = match rule {
            FillRule::EvenOdd => "evenodd",
            FillRule::Winding => "nonzero",
        };
        let _ = write!(
            self.body,
            "<polygon points=\"{}\" fill-rule=\"{rule}\" {fill} {stroke}/>\n",
            point_list(points)
        );
    }

    fn rect(&mut self, rect: RealRect) {
        let stroke = self.stroke_attrs();
        let fill = self.fill_attrs();
        let _ = write!(
            self.body,
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" {fill} {stroke}/>\n",
            rect.x, rect.y, rect.width, rect.height
        );
    }

    fn circle(&mut self, x: f64, y: f64, radius: f64) {
        let stroke = self.stroke_attrs();
        let fill = self.fill_attrs();
        let _ = write!(
            self.body,
            "<circle cx=\"{x:.2}\" cy=\"{y:.2}\" r=\"{radius:.2}\" {fill} {stroke}/>\n"
        );
    }

    fn text(&mut self, text: &str, x: f64, y: f64, angle_degrees: f64) {
        let size = self.point_size();
        let weight = if self.font.bold { " font-weight=\"bold\"" } else { "" };
        let transform = if angle_degrees != 0.0 {
            format!(" transform=\"rotate({:.2} {x:.2} {y:.2})\"", -angle_degrees)
        } else {
            String::new()
        };
        let _ = write!(
            self.body,
            "<text x=\"{x:.2}\" y=\"{y:.2}\" font-size=\"{size:.2}pt\" fill=\"{}\" dominant-baseline=\"text-before-edge\"{weight}{transform}>{}</text>\n",
            css_color(self.pen.color),
            escape_xml(text)
        );
    }

    fn measure(&mut self, text: &str) -> TextExtent {
        approx_text_extent(self.point_size(), text)
    }
}

fn css_color(c: super::Color) -> String {
    format!(
        "#{:02x}{:02x}{:02x}",
        (c.red.clamp(0.0, 1.0) * 255.0).round() as u8,
        (c.green.clamp(0.0, 1.0) * 255.0).round() as u8,
        (c.blue.clamp(0.0, 1.0) * 255.0).round() as u8
    )
}

fn point_list(points: &[RealPoint]) -> String {
    let mut s = String::with_capacity(points.len() * 12);
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            s.push(' ');
        }
        let _ = write!(s, "{:.2},{:.2}", p.x, p.y);
    }
    s
}

fn escape_xml(text: &str) -> String {
    let mut s = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => s.push_str("&amp;"),
            '<' => s.push_str("&lt;"),
            '>' => s.push_str("&gt;"),
            '"' => s.push_str("&quot;"),
            '\'' => s.push_str("&apos;"),
            _ => s.push(ch),
        }
    }
    s
}

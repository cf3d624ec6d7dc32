use std::path::Path;

use cairo::{Antialias, Context, Format, ImageSurface, PdfSurface, SvgSurface};
use pango::FontDescription;

use crate::core::types::{RealPoint, RealRect};
use crate::error::{PlotError, PlotResult};

use super::{
    Brush, BrushStyle, FillRule, LineCap, LineJoin, LineStyle, OutputDevice, Pen, TextExtent,
    TextFont,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CairoDeviceStats {
    pub lines_drawn: usize,
    pub shapes_drawn: usize,
    pub texts_drawn: usize,
    pub failed_ops: usize,
}

/// Cairo + Pango + PangoCairo output device.
///
/// Wraps any Cairo context: an offscreen image surface for raster output, a
/// PDF surface for paged vector documents, or an external context supplied
/// by the host (for example a drawing-area callback). Cairo latches draw
/// errors into the context, so draw calls stay infallible here and `finish`
/// reports the accumulated status.
pub struct CairoDevice {
    context: Context,
    raster: bool,
    base_points: f64,
    pen: Pen,
    brush: Brush,
    font: TextFont,
    clip_depth: usize,
    stats: CairoDeviceStats,
}

impl CairoDevice {
    #[must_use]
    pub fn new(context: Context, raster: bool) -> Self {
        Self {
            context,
            raster,
            base_points: 12.0,
            pen: Pen::default(),
            brush: Brush::default(),
            font: TextFont::default(),
            clip_depth: 0,
            stats: CairoDeviceStats::default(),
        }
    }

    /// Offscreen ARGB raster device. Returns the surface alongside the
    /// device so the caller can encode it (for example to PNG) afterwards.
    pub fn image(width: i32, height: i32) -> PlotResult<(Self, ImageSurface)> {
        if width <= 0 || height <= 0 {
            return Err(PlotError::InvalidGeometry {
                width: f64::from(width),
                height: f64::from(height),
            });
        }
        let surface = ImageSurface::create(Format::ARgb32, width, height)
            .map_err(|err| map_backend_error("failed to create cairo image surface", err))?;
        let context = Context::new(&surface)
            .map_err(|err| map_backend_error("failed to create cairo context", err))?;
        Ok((Self::new(context, true), surface))
    }

    /// Paged vector document device writing to `path`. Page size is in
    /// points. `cairo::PdfSurface::show_page` starts subsequent pages.
    pub fn pdf<P: AsRef<Path>>(path: P, width_pt: f64, height_pt: f64) -> PlotResult<(Self, PdfSurface)> {
        let surface = PdfSurface::new(width_pt, height_pt, path)
            .map_err(|err| map_backend_error("failed to create cairo pdf surface", err))?;
        let context = Context::new(&surface)
            .map_err(|err| map_backend_error("failed to create cairo context", err))?;
        Ok((Self::new(context, false), surface))
    }

    /// Cairo-native SVG surface device writing to `path`.
    pub fn svg<P: AsRef<Path>>(path: P, width: f64, height: f64) -> PlotResult<(Self, SvgSurface)> {
        let surface = SvgSurface::new(width, height, Some(path))
            .map_err(|err| map_backend_error("failed to create cairo svg surface", err))?;
        let context = Context::new(&surface)
            .map_err(|err| map_backend_error("failed to create cairo context", err))?;
        Ok((Self::new(context, false), surface))
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        "cairo+pango+pangocairo"
    }

    #[must_use]
    pub fn context(&self) -> &Context {
        &self.context
    }

    #[must_use]
    pub fn stats(&self) -> CairoDeviceStats {
        self.stats
    }

    /// Reports any error latched into the context during drawing.
    pub fn finish(&self) -> PlotResult<()> {
        if self.stats.failed_ops > 0 {
            return Err(PlotError::Backend(format!(
                "{} draw operations failed",
                self.stats.failed_ops
            )));
        }
        match self.context.status() {
            Ok(()) => Ok(()),
            Err(err) => Err(map_backend_error("cairo context in error state", err)),
        }
    }

    fn point_size(&self) -> f64 {
        (self.base_points + self.font.point_delta).max(1.0)
    }

    fn font_description(&self) -> FontDescription {
        let weight = if self.font.bold { " Bold" } else { "" };
        FontDescription::from_string(&format!("Sans{weight} {}", self.point_size()))
    }

    fn apply_pen(&self) -> bool {
        if self.pen.style == LineStyle::None || self.pen.width <= 0.0 {
            return false;
        }
        let c = self.pen.color;
        self.context.set_source_rgba(c.red, c.green, c.blue, c.alpha);
        self.context.set_line_width(self.pen.width);
        let unit = self.pen.width.max(1.0);
        match self.pen.style {
            LineStyle::Dot => self.context.set_dash(&[unit, 2.0 * unit], 0.0),
            LineStyle::Dash => self.context.set_dash(&[4.0 * unit, 2.0 * unit], 0.0),
            LineStyle::DotDash => self
                .context
                .set_dash(&[4.0 * unit, 2.0 * unit, unit, 2.0 * unit], 0.0),
            LineStyle::Solid | LineStyle::None => self.context.set_dash(&[], 0.0),
        }
        self.context.set_line_join(match self.pen.join {
            LineJoin::Miter => cairo::LineJoin::Miter,
            LineJoin::Round => cairo::LineJoin::Round,
            LineJoin::Bevel => cairo::LineJoin::Bevel,
        });
        self.context.set_line_cap(match self.pen.cap {
            LineCap::Butt => cairo::LineCap::Butt,
            LineCap::Round => cairo::LineCap::Round,
            LineCap::Square => cairo::LineCap::Square,
        });
        true
    }

    fn apply_brush(&self) -> bool {
        if self.brush.style == BrushStyle::None {
            return false;
        }
        let c = self.brush.color;
        // hatch fills render as translucent solids
        let alpha = if self.brush.style == BrushStyle::Hatch {
            c.alpha * 0.5
        } else {
            c.alpha
        };
        self.context.set_source_rgba(c.red, c.green, c.blue, alpha);
        true
    }

    fn stroke(&mut self) {
        if self.apply_pen() {
            if self.context.stroke().is_err() {
                self.stats.failed_ops += 1;
            }
        } else {
            self.context.new_path();
        }
    }

    fn fill_and_stroke(&mut self) {
        if self.apply_brush() {
            let r = if self.pen.style != LineStyle::None && self.pen.width > 0.0 {
                self.context.fill_preserve()
            } else {
                self.context.fill()
            };
            if r.is_err() {
                self.stats.failed_ops += 1;
            }
        }
        self.stroke();
        self.stats.shapes_drawn += 1;
    }
}

impl OutputDevice for CairoDevice {
    fn equals(&self, a: f64, b: f64) -> bool {
        if self.raster {
            (a.round() - b.round()).abs() < 0.5
        } else {
            (a - b).abs() < 1e-6
        }
    }

    fn set_antialiasing(&mut self, enable: bool) {
        self.context.set_antialias(if enable {
            Antialias::Default
        } else {
            Antialias::None
        });
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
        self.context.save().ok();
        self.context.rectangle(rect.x, rect.y, rect.width, rect.height);
        self.context.clip();
        self.clip_depth += 1;
    }

    fn unclip(&mut self) {
        if self.clip_depth > 0 {
            self.context.restore().ok();
            self.clip_depth -= 1;
        }
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.context.move_to(x1, y1);
        self.context.line_to(x2, y2);
        self.stroke();
        self.stats.lines_drawn += 1;
    }

    fn polyline(&mut self, points: &[RealPoint]) {
        if points.len() < 2 {
            return;
        }
        self.context.move_to(points[0].x, points[0].y);
        for p in &points[1..] {
            self.context.line_to(p.x, p.y);
        }
        self.stroke();
        self.stats.lines_drawn += 1;
    }

    fn polygon(&mut self, points: &[RealPoint], rule: FillRule) {
        if points.len() < 3 {
            return;
        }
        self.context.set_fill_rule(match rule {
            FillRule::EvenOdd => cairo::FillRule::EvenOdd,
            FillRule::Winding => cairo::FillRule::Winding,
        });
        self.context.move_to(points[0].x, points[0].y);
        for p in &points[1..] {
            self.context.line_to(p.x, p.y);
        }
        self.context.close_path();
        self.fill_and_stroke();
    }

    fn rect(&mut self, rect: RealRect) {
        self.context.rectangle(rect.x, rect.y, rect.width, rect.height);
        self.fill_and_stroke();
    }

    fn circle(&mut self, x: f64, y: f64, radius: f64) {
        self.context
            .arc(x, y, radius, 0.0, 2.0 * std::f64::consts::PI);
        self.fill_and_stroke();
    }

    fn text(&mut self, text: &str, x: f64, y: f64, angle_degrees: f64) {
        let layout = pangocairo::functions::create_layout(&self.context);
        layout.set_font_description(Some(&self.font_description()));
        layout.set_text(text);

        let c = self.pen.color;
        self.context.set_source_rgba(c.red, c.green, c.blue, c.alpha);
        if angle_degrees != 0.0 {
            self.context.save().ok();
            self.context.translate(x, y);
            self.context
                .rotate(-angle_degrees * std::f64::consts::PI / 180.0);
            self.context.move_to(0.0, 0.0);
            pangocairo::functions::show_layout(&self.context, &layout);
            self.context.restore().ok();
        } else {
            self.context.move_to(x, y);
            pangocairo::functions::show_layout(&self.context, &layout);
        }
        self.stats.texts_drawn += 1;
    }

    fn measure(&mut self, text: &str) -> TextExtent {
        let layout = pangocairo::functions::create_layout(&self.context);
        layout.set_font_description(Some(&self.font_description()));
        layout.set_text(text);
        let (width, height) = layout.pixel_size();
        TextExtent {
            width: f64::from(width),
            height: f64::from(height),
        }
    }
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> PlotError {
    PlotError::Backend(format!("{prefix}: {err}"))
}

mod metrics;
mod primitives;
mod svg;

pub use metrics::{DrawOp, MetricsDevice};
pub use primitives::Color;
pub use svg::SvgDevice;

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoDevice, CairoDeviceStats};

use serde::{Deserialize, Serialize};

use crate::core::types::{RealPoint, RealRect};

/// Stroke pattern for pens. `None` suppresses the stroke entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineStyle {
    None,
    Solid,
    Dot,
    Dash,
    DotDash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineJoin {
    Miter,
    Round,
    Bevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineCap {
    Butt,
    Round,
    Square,
}

/// Fill pattern for brushes. `None` suppresses the fill entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrushStyle {
    None,
    Solid,
    Hatch,
}

/// Interior rule for self-intersecting polygons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FillRule {
    EvenOdd,
    Winding,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pen {
    pub color: Color,
    pub width: f64,
    pub style: LineStyle,
    pub join: LineJoin,
    pub cap: LineCap,
}

impl Pen {
    #[must_use]
    pub const fn solid(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            style: LineStyle::Solid,
            join: LineJoin::Miter,
            cap: LineCap::Butt,
        }
    }

    #[must_use]
    pub const fn styled(color: Color, width: f64, style: LineStyle) -> Self {
        Self {
            color,
            width,
            style,
            join: LineJoin::Miter,
            cap: LineCap::Butt,
        }
    }

    #[must_use]
    pub const fn none() -> Self {
        Self::styled(Color::BLACK, 0.0, LineStyle::None)
    }
}

impl Default for Pen {
    fn default() -> Self {
        Self::solid(Color::BLACK, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Brush {
    pub color: Color,
    pub style: BrushStyle,
}

impl Brush {
    #[must_use]
    pub const fn solid(color: Color) -> Self {
        Self {
            color,
            style: BrushStyle::Solid,
        }
    }

    #[must_use]
    pub const fn none() -> Self {
        Self {
            color: Color::BLACK,
            style: BrushStyle::None,
        }
    }
}

impl Default for Brush {
    fn default() -> Self {
        Self::solid(Color::BLACK)
    }
}

/// Font state relative to the device's base size.
///
/// `point_delta` is added to the base point size, so `0.0` is the device
/// default, positive values enlarge, negative values shrink.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextFont {
    pub point_delta: f64,
    pub bold: bool,
}

impl TextFont {
    #[must_use]
    pub const fn points(point_delta: f64) -> Self {
        Self {
            point_delta,
            bold: false,
        }
    }

    #[must_use]
    pub const fn with_delta(self, point_delta: f64) -> Self {
        Self {
            point_delta,
            bold: self.bold,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct TextExtent {
    pub width: f64,
    pub height: f64,
}

/// Immediate-mode drawing surface.
///
/// Pen, brush, font, and clip are cumulative session state: a setting stays
/// in effect until changed. All coordinates are physical pixels with the
/// origin at the top-left corner and y increasing downward. Implementations
/// are infallible at draw time; backends that can fail surface errors at
/// creation or finish time instead.
pub trait OutputDevice {
    /// Tolerance-aware coordinate comparison. Raster devices snap to whole
    /// pixels, vector devices compare at sub-pixel precision.
    fn equals(&self, a: f64, b: f64) -> bool;

    fn set_antialiasing(&mut self, enable: bool);

    fn set_pen(&mut self, pen: Pen);
    fn pen(&self) -> Pen;

    fn set_brush(&mut self, brush: Brush);
    fn brush(&self) -> Brush;

    fn set_font(&mut self, font: TextFont);
    fn font(&self) -> TextFont;

    fn clip(&mut self, rect: RealRect);
    fn unclip(&mut self);

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64);
    fn polyline(&mut self, points: &[RealPoint]);
    fn polygon(&mut self, points: &[RealPoint], rule: FillRule);
    fn rect(&mut self, rect: RealRect);
    fn circle(&mut self, x: f64, y: f64, radius: f64);

    /// Draws `text` with its top-left corner at `(x, y)`, rotated
    /// counter-clockwise by `angle_degrees` about that corner.
    fn text(&mut self, text: &str, x: f64, y: f64, angle_degrees: f64);

    /// Measures `text` with the current font.
    fn measure(&mut self, text: &str) -> TextExtent;
}

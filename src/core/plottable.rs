use crate::core::axis::{Axis, LinearAxis};
use crate::core::mapping::DeviceMapping;
use crate::core::types::{RealPoint, RealRect};
use crate::render::{Color, LineStyle, OutputDevice, Pen};

/// Capability set a data series must satisfy to be plotted.
///
/// Samples are an ordered, indexable sequence of world (x, y) pairs.
/// Default methods derive data bounds and suggested axes from the samples,
/// skipping NaN values.
pub trait Plottable {
    fn at(&self, index: usize) -> RealPoint;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn label(&self) -> &str;
    fn set_label(&mut self, label: &str);

    fn is_shown_in_legend(&self) -> bool {
        true
    }

    fn antialiasing(&self) -> bool {
        false
    }

    fn draw(&self, dc: &mut dyn OutputDevice, map: &dyn DeviceMapping);
    fn draw_in_legend(&self, dc: &mut dyn OutputDevice, rect: RealRect);

    /// Data bounds as (min, max) corners; NaN marks an empty dimension.
    fn min_max(&self) -> (RealPoint, RealPoint) {
        let mut min = RealPoint::new(f64::NAN, f64::NAN);
        let mut max = RealPoint::new(f64::NAN, f64::NAN);
        self.extend_min_max(&mut min, &mut max);
        (min, max)
    }

    /// Folds this series' bounds into the given corners, treating NaN as
    /// absent on either side.
    fn extend_min_max(&self, min: &mut RealPoint, max: &mut RealPoint) {
        for i in 0..self.len() {
            let p = self.at(i);
            if !p.x.is_nan() {
                if min.x.is_nan() || p.x < min.x {
                    min.x = p.x;
                }
                if max.x.is_nan() || p.x > max.x {
                    max.x = p.x;
                }
            }
            if !p.y.is_nan() {
                if min.y.is_nan() || p.y < min.y {
                    min.y = p.y;
                }
                if max.y.is_nan() || p.y > max.y {
                    max.y = p.y;
                }
            }
        }
    }

    /// Natural default x axis, adopted when none is assigned explicitly.
    fn suggest_x_axis(&self) -> Box<dyn Axis> {
        let (min, max) = self.min_max();
        Box::new(LinearAxis::new(min.x, max.x, ""))
    }

    /// Natural default y axis, adopted when none is assigned explicitly.
    fn suggest_y_axis(&self) -> Box<dyn Axis> {
        let (min, max) = self.min_max();
        Box::new(LinearAxis::new(min.y, max.y, ""))
    }
}

/// Polyline data series.
#[derive(Debug, Clone)]
pub struct LinePlot {
    points: Vec<RealPoint>,
    label: String,
    pub color: Color,
    pub thickness: f64,
    pub style: LineStyle,
    pub antialias: bool,
    pub show_in_legend: bool,
}

impl LinePlot {
    #[must_use]
    pub fn new(points: Vec<RealPoint>, label: &str, color: Color) -> Self {
        Self {
            points,
            label: label.to_owned(),
            color,
            thickness: 2.0,
            style: LineStyle::Solid,
            antialias: true,
            show_in_legend: true,
        }
    }

    #[must_use]
    pub fn from_xy(xs: &[f64], ys: &[f64], label: &str, color: Color) -> Self {
        let points = xs
            .iter()
            .zip(ys.iter())
            .map(|(&x, &y)| RealPoint::new(x, y))
            .collect();
        Self::new(points, label, color)
    }

    #[must_use]
    pub fn points(&self) -> &[RealPoint] {
        &self.points
    }

    fn pen(&self) -> Pen {
        Pen::styled(self.color, self.thickness, self.style)
    }
}

impl Plottable for LinePlot {
    fn at(&self, index: usize) -> RealPoint {
        self.points[index]
    }

    fn len(&self) -> usize {
        self.points.len()
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn set_label(&mut self, label: &str) {
        self.label = label.to_owned();
    }

    fn is_shown_in_legend(&self) -> bool {
        self.show_in_legend
    }

    fn antialiasing(&self) -> bool {
        self.antialias
    }

    fn draw(&self, dc: &mut dyn OutputDevice, map: &dyn DeviceMapping) {
        if self.points.len() < 2 {
            return;
        }
        // split at NaN samples so gaps stay gaps
        dc.set_pen(self.pen());
        let mut run: Vec<RealPoint> = Vec::with_capacity(self.points.len());
        for p in &self.points {
            if p.x.is_nan() || p.y.is_nan() {
                if run.len() > 1 {
                    dc.polyline(&run);
                }
                run.clear();
            } else {
                run.push(map.to_device(*p));
            }
        }
        if run.len() > 1 {
            dc.polyline(&run);
        }
    }

    fn draw_in_legend(&self, dc: &mut dyn OutputDevice, rect: RealRect) {
        dc.set_pen(self.pen());
        let y = rect.y + rect.height / 2.0;
        dc.line(rect.x, y, rect.x + rect.width, y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_max_skips_nan_samples() {
        let plot = LinePlot::from_xy(
            &[0.0, f64::NAN, 4.0],
            &[1.0, 2.0, -3.0],
            "s",
            Color::BLACK,
        );
        let (min, max) = plot.min_max();
        assert_eq!(min.x, 0.0);
        assert_eq!(max.x, 4.0);
        assert_eq!(min.y, -3.0);
        assert_eq!(max.y, 2.0);
    }

    #[test]
    fn empty_series_has_nan_bounds() {
        let plot = LinePlot::new(Vec::new(), "s", Color::BLACK);
        let (min, max) = plot.min_max();
        assert!(min.x.is_nan() && max.y.is_nan());
    }
}

//! Axes and tick generation.
//!
//! An axis is a pure mapping from (world bounds, physical extent) to tick
//! positions and pixel coordinates. The adaptive time axis additionally
//! memoizes its last computed tick list.

mod label;
mod linear;
mod log;
mod polar;
mod time;

pub use label::LabelAxis;
pub use linear::LinearAxis;
pub use log::LogAxis;
pub use polar::{AngularUnits, PolarAngularAxis, ZeroDirection};
pub use time::TimeAxis;

use serde::{Deserialize, Serialize};

use crate::render::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickSize {
    None,
    Small,
    Large,
}

/// One generated tick. Ephemeral, recomputed from axis state.
#[derive(Debug, Clone, PartialEq)]
pub struct TickData {
    pub world: f64,
    pub label: String,
    pub size: TickSize,
}

impl TickData {
    #[must_use]
    pub fn new(world: f64, label: impl Into<String>, size: TickSize) -> Self {
        Self {
            world,
            label: label.into(),
            size,
        }
    }
}

/// State common to every axis variant.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisBase {
    pub min: f64,
    pub max: f64,
    pub label: String,
    pub units: String,
    pub color: Color,
    pub shown: bool,
    pub show_label: bool,
    pub show_tick_text: bool,
    pub reversed: bool,
    pub small_tick_size: f64,
    pub large_tick_size: f64,
}

impl AxisBase {
    #[must_use]
    pub fn new(min: f64, max: f64, label: &str) -> Self {
        Self {
            min,
            max,
            label: label.to_owned(),
            ..Self::default()
        }
    }
}

impl Default for AxisBase {
    fn default() -> Self {
        Self {
            min: f64::NAN,
            max: f64::NAN,
            label: String::new(),
            units: String::new(),
            color: Color::BLACK,
            shown: true,
            show_label: true,
            show_tick_text: true,
            reversed: false,
            small_tick_size: 2.0,
            large_tick_size: 5.0,
        }
    }
}

pub trait Axis {
    fn base(&self) -> &AxisBase;
    fn base_mut(&mut self) -> &mut AxisBase;

    fn duplicate(&self) -> Box<dyn Axis>;

    /// Appends the ticks for the given physical extent, ordered
    /// non-decreasing in world value.
    fn ticks(&self, phys_min: f64, phys_max: f64, list: &mut Vec<TickData>);

    fn world_to_physical(&self, coord: f64, phys_min: f64, phys_max: f64) -> f64 {
        let b = self.base();
        let range = b.max - b.min;
        if range == 0.0 {
            return phys_min;
        }
        let mut prop = (coord - b.min) / range;
        if b.reversed {
            prop = 1.0 - prop;
        }
        phys_min + prop * (phys_max - phys_min)
    }

    fn physical_to_world(&self, p: f64, phys_min: f64, phys_max: f64) -> f64 {
        let b = self.base();
        let len = phys_max - phys_min;
        if len == 0.0 {
            return b.min;
        }
        let mut prop = (p - phys_min) / len;
        if b.reversed {
            prop = 1.0 - prop;
        }
        prop * (b.max - b.min) + b.min
    }

    fn world_min(&self) -> f64 {
        self.base().min
    }

    fn world_max(&self) -> f64 {
        self.base().max
    }

    fn world_length(&self) -> f64 {
        self.base().max - self.base().min
    }

    fn set_world(&mut self, min: f64, max: f64) {
        let b = self.base_mut();
        b.min = min;
        b.max = max;
    }

    fn set_world_min(&mut self, min: f64) {
        self.base_mut().min = min;
    }

    fn set_world_max(&mut self, max: f64) {
        self.base_mut().max = max;
    }

    /// Axis title, with the units appended in parentheses when set. The
    /// time axis overrides this with its derived span label.
    fn label(&self) -> String {
        let b = self.base();
        if b.units.is_empty() {
            b.label.clone()
        } else {
            format!("{} ({})", b.label, b.units)
        }
    }

    fn set_label(&mut self, label: &str) {
        self.base_mut().label = label.to_owned();
    }

    fn set_units(&mut self, units: &str) {
        self.base_mut().units = units.to_owned();
    }

    /// Merges another axis's bounds into this one. NaN operands are treated
    /// as absent and never propagate.
    fn extend_bound(&mut self, other: &dyn Axis) {
        let (omin, omax) = (other.world_min(), other.world_max());
        let b = self.base_mut();
        if !omin.is_nan() && (b.min.is_nan() || omin < b.min) {
            b.min = omin;
        }
        if !omax.is_nan() && (b.max.is_nan() || omax > b.max) {
            b.max = omax;
        }
    }

    /// Downcast hook for the polar-angular variant.
    fn polar(&self) -> Option<&PolarAngularAxis> {
        None
    }
}

/// Largest value from the {1, 2, 5}×10^k grid that is ≤ `v`.
/// Zero and non-finite values pass through unchanged.
#[must_use]
pub fn nice_below(v: f64) -> f64 {
    if v == 0.0 || !v.is_finite() {
        return v;
    }
    if v < 0.0 {
        return -nice_above(-v);
    }
    let exponent = v.log10().floor();
    let magnitude = 10f64.powf(exponent);
    let mantissa = v / magnitude;
    for m in [5.0, 2.0, 1.0] {
        if m <= mantissa * (1.0 + 1e-12) {
            return m * magnitude;
        }
    }
    0.5 * magnitude
}

/// Smallest value from the {1, 2, 5}×10^k grid that is ≥ `v`.
/// Zero and non-finite values pass through unchanged.
#[must_use]
pub fn nice_above(v: f64) -> f64 {
    if v == 0.0 || !v.is_finite() {
        return v;
    }
    if v < 0.0 {
        return -nice_below(-v);
    }
    let exponent = v.log10().floor();
    let magnitude = 10f64.powf(exponent);
    let mantissa = v / magnitude;
    for m in [1.0, 2.0, 5.0, 10.0] {
        if m >= mantissa * (1.0 - 1e-12) {
            return m * magnitude;
        }
    }
    10.0 * magnitude
}

/// Widens `(min, max)` outward to the nice-number grid. Never narrows.
#[must_use]
pub fn extend_to_nice_numbers(min: f64, max: f64) -> (f64, f64) {
    (nice_below(min), nice_above(max))
}

/// Formats a tick value like `%lg`, clamping near-zero noise to zero.
pub(crate) fn format_tick_value(value: f64) -> (f64, String) {
    let v = if value.abs() < 1e-15 { 0.0 } else { value };
    // %lg: shortest of decimal/scientific at 6 significant digits
    let formatted = format!("{v:.6e}");
    let exp: i32 = formatted
        .rsplit('e')
        .next()
        .and_then(|e| e.parse().ok())
        .unwrap_or(0);
    let text = if (-4..6).contains(&exp) {
        let s = format!("{v:.*}", (5 - exp).max(0) as usize);
        trim_trailing_zeros(&s)
    } else {
        let mantissa = trim_trailing_zeros(&format!("{:.5}", v / 10f64.powi(exp)));
        format!("{mantissa}e{exp:+03}")
    };
    (v, text)
}

fn trim_trailing_zeros(s: &str) -> String {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_owned()
    } else {
        s.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nice_bounds_only_widen() {
        let (lo, hi) = extend_to_nice_numbers(0.013, 97.0);
        assert!(lo <= 0.013 && lo > 0.0);
        assert!(hi >= 97.0);
        assert_eq!(hi, 100.0);
    }

    #[test]
    fn nice_bounds_fixed_points() {
        assert_eq!(nice_below(5.0), 5.0);
        assert_eq!(nice_above(5.0), 5.0);
        assert_eq!(nice_above(0.0), 0.0);
        assert_eq!(nice_below(-3.0), -5.0);
        assert_eq!(nice_above(-3.0), -2.0);
    }

    #[test]
    fn tick_format_matches_printf_lg() {
        assert_eq!(format_tick_value(20.0).1, "20");
        assert_eq!(format_tick_value(0.1).1, "0.1");
        assert_eq!(format_tick_value(2.5e-16).1, "0");
        assert_eq!(format_tick_value(1.0e7).1, "1e+07");
    }
}

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::linear::LinearAxis;
use super::{Axis, AxisBase, TickData, TickSize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AngularUnits {
    Degrees,
    Radians,
    Gradians,
    /// World range maps onto one full turn.
    Unitless,
}

/// Screen direction of the world zero angle. Angles increase clockwise
/// on screen (compass convention, y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZeroDirection {
    Up,
    Right,
    Down,
    Left,
}

/// Angular axis for polar plot rows. Wraps the linear tick generator and
/// reinterprets world values as angles.
#[derive(Debug, Clone)]
pub struct PolarAngularAxis {
    inner: LinearAxis,
    units: AngularUnits,
    zero: ZeroDirection,
    direction_names: bool,
}

impl PolarAngularAxis {
    #[must_use]
    pub fn new(label: &str, units: AngularUnits, zero: ZeroDirection) -> Self {
        let (min, max) = match units {
            AngularUnits::Degrees => (0.0, 360.0),
            AngularUnits::Radians => (0.0, 2.0 * PI),
            AngularUnits::Gradians => (0.0, 400.0),
            AngularUnits::Unitless => (0.0, 1.0),
        };
        Self {
            inner: LinearAxis::new(min, max, label),
            units,
            zero,
            direction_names: false,
        }
    }

    /// Replaces numeric tick labels with compass direction names
    /// (only meaningful for degree axes on 45° ticks).
    pub fn use_direction_names(&mut self, enable: bool) {
        self.direction_names = enable;
    }

    #[must_use]
    pub fn units(&self) -> AngularUnits {
        self.units
    }

    #[must_use]
    pub fn zero_direction(&self) -> ZeroDirection {
        self.zero
    }

    /// Converts a world value to the screen angle in radians used by the
    /// polar device mapping.
    #[must_use]
    pub fn angle_in_radians(&self, world: f64) -> f64 {
        let full_turn = match self.units {
            AngularUnits::Degrees => 360.0,
            AngularUnits::Radians => 2.0 * PI,
            AngularUnits::Gradians => 400.0,
            AngularUnits::Unitless => {
                let len = self.inner.world_length();
                if len == 0.0 { 1.0 } else { len }
            }
        };
        let turn = world / full_turn * 2.0 * PI;
        match self.zero {
            ZeroDirection::Up => turn - PI / 2.0,
            ZeroDirection::Right => turn,
            ZeroDirection::Down => turn + PI / 2.0,
            ZeroDirection::Left => turn + PI,
        }
    }

    /// Inverse of [`angle_in_radians`](Self::angle_in_radians), normalized
    /// into one turn starting at the world minimum.
    #[must_use]
    pub fn world_from_angle(&self, angle: f64) -> f64 {
        let full_turn = match self.units {
            AngularUnits::Degrees => 360.0,
            AngularUnits::Radians => 2.0 * PI,
            AngularUnits::Gradians => 400.0,
            AngularUnits::Unitless => {
                let len = self.inner.world_length();
                if len == 0.0 { 1.0 } else { len }
            }
        };
        let offset = match self.zero {
            ZeroDirection::Up => -PI / 2.0,
            ZeroDirection::Right => 0.0,
            ZeroDirection::Down => PI / 2.0,
            ZeroDirection::Left => PI,
        };
        let world = (angle - offset) / (2.0 * PI) * full_turn;
        let min = self.inner.world_min();
        if min.is_nan() {
            world
        } else {
            min + (world - min).rem_euclid(full_turn)
        }
    }
}

impl Axis for PolarAngularAxis {
    fn base(&self) -> &AxisBase {
        self.inner.base()
    }

    fn base_mut(&mut self) -> &mut AxisBase {
        self.inner.base_mut()
    }

    fn duplicate(&self) -> Box<dyn Axis> {
        Box::new(self.clone())
    }

    fn ticks(&self, phys_min: f64, phys_max: f64, list: &mut Vec<TickData>) {
        let start = list.len();
        self.inner.ticks(phys_min, phys_max, list);
        if self.direction_names && self.units == AngularUnits::Degrees {
            for tick in &mut list[start..] {
                if tick.size == TickSize::Large {
                    if let Some(name) = compass_name(tick.world) {
                        tick.label = name.to_owned();
                    }
                }
            }
        }
    }

    fn polar(&self) -> Option<&PolarAngularAxis> {
        Some(self)
    }
}

fn compass_name(degrees: f64) -> Option<&'static str> {
    let normalized = degrees.rem_euclid(360.0);
    let octant = (normalized / 45.0).round();
    if (normalized - octant * 45.0).abs() > 1e-9 {
        return None;
    }
    Some(match octant as i32 % 8 {
        0 => "N",
        1 => "NE",
        2 => "E",
        3 => "SE",
        4 => "S",
        5 => "SW",
        6 => "W",
        _ => "NW",
    })
}

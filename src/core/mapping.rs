//! World ↔ physical coordinate transforms.
//!
//! A mapping is built per render pass from an axis pair and the pixel
//! extents of one plot row, and is never mutated afterwards.

use crate::core::axis::Axis;
use crate::core::types::RealPoint;

/// Bidirectional transform handed to plottables at draw time.
pub trait DeviceMapping {
    fn to_device(&self, world: RealPoint) -> RealPoint;
    fn to_world(&self, device: RealPoint) -> RealPoint;

    /// World coordinates of the mapped area's corners.
    fn world_min(&self) -> RealPoint;
    fn world_max(&self) -> RealPoint;
}

/// Mapping derived from an (x axis, y axis) pair.
///
/// For a Cartesian row, `phys_y_min` is the bottom edge and `phys_y_max`
/// the top edge, so increasing world y maps upward on screen. When the x
/// axis is polar-angular, world x is an angle and world y a radius from
/// the row center.
pub struct AxisDeviceMapping<'a> {
    x_axis: &'a dyn Axis,
    y_axis: &'a dyn Axis,
    phys_x_min: f64,
    phys_x_max: f64,
    phys_y_min: f64,
    phys_y_max: f64,
}

impl<'a> AxisDeviceMapping<'a> {
    #[must_use]
    pub fn new(
        x_axis: &'a dyn Axis,
        phys_x_min: f64,
        phys_x_max: f64,
        y_axis: &'a dyn Axis,
        phys_y_min: f64,
        phys_y_max: f64,
    ) -> Self {
        Self {
            x_axis,
            y_axis,
            phys_x_min,
            phys_x_max,
            phys_y_min,
            phys_y_max,
        }
    }

    fn center(&self) -> RealPoint {
        RealPoint::new(
            0.5 * (self.phys_x_min + self.phys_x_max),
            0.5 * (self.phys_y_min + self.phys_y_max),
        )
    }

    /// Radius budget for polar rows: half the smaller pixel extent.
    fn physical_constraint(&self) -> f64 {
        let w = (self.phys_x_max - self.phys_x_min).abs();
        let h = (self.phys_y_max - self.phys_y_min).abs();
        w.min(h)
    }
}

impl DeviceMapping for AxisDeviceMapping<'_> {
    fn to_device(&self, world: RealPoint) -> RealPoint {
        if let Some(polar) = self.x_axis.polar() {
            let angle = polar.angle_in_radians(world.x);
            let radius = self
                .y_axis
                .world_to_physical(world.y, 0.0, self.physical_constraint() / 2.0);
            let center = self.center();
            RealPoint::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            )
        } else {
            RealPoint::new(
                self.x_axis
                    .world_to_physical(world.x, self.phys_x_min, self.phys_x_max),
                self.y_axis
                    .world_to_physical(world.y, self.phys_y_min, self.phys_y_max),
            )
        }
    }

    fn to_world(&self, device: RealPoint) -> RealPoint {
        if let Some(polar) = self.x_axis.polar() {
            let center = self.center();
            let dx = device.x - center.x;
            let dy = device.y - center.y;
            let radius = dx.hypot(dy);
            RealPoint::new(
                polar.world_from_angle(dy.atan2(dx)),
                self.y_axis
                    .physical_to_world(radius, 0.0, self.physical_constraint() / 2.0),
            )
        } else {
            RealPoint::new(
                self.x_axis
                    .physical_to_world(device.x, self.phys_x_min, self.phys_x_max),
                self.y_axis
                    .physical_to_world(device.y, self.phys_y_min, self.phys_y_max),
            )
        }
    }

    fn world_min(&self) -> RealPoint {
        RealPoint::new(self.x_axis.world_min(), self.y_axis.world_min())
    }

    fn world_max(&self) -> RealPoint {
        RealPoint::new(self.x_axis.world_max(), self.y_axis.world_max())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::axis::{AngularUnits, LinearAxis, LogAxis, PolarAngularAxis, ZeroDirection};
    use approx::assert_relative_eq;

    #[test]
    fn cartesian_round_trip() {
        let x = LinearAxis::new(0.0, 100.0, "");
        let y = LinearAxis::new(-50.0, 50.0, "");
        let map = AxisDeviceMapping::new(&x, 10.0, 410.0, &y, 300.0, 20.0);

        let world = RealPoint::new(37.5, -12.25);
        let dev = map.to_device(world);
        let back = map.to_world(dev);
        assert_relative_eq!(back.x, world.x, max_relative = 1e-9);
        assert_relative_eq!(back.y, world.y, max_relative = 1e-9);
    }

    #[test]
    fn log_round_trip() {
        let x = LogAxis::new(0.01, 100.0, "");
        let y = LinearAxis::new(0.0, 1.0, "");
        let map = AxisDeviceMapping::new(&x, 0.0, 400.0, &y, 300.0, 0.0);

        let world = RealPoint::new(3.7, 0.5);
        let back = map.to_world(map.to_device(world));
        assert_relative_eq!(back.x, world.x, max_relative = 1e-9);
    }

    #[test]
    fn polar_maps_zero_up_to_top_of_row() {
        let mut x = PolarAngularAxis::new("", AngularUnits::Degrees, ZeroDirection::Up);
        x.use_direction_names(true);
        let y = LinearAxis::new(0.0, 10.0, "");
        let map = AxisDeviceMapping::new(&x, 0.0, 200.0, &y, 200.0, 0.0);

        let dev = map.to_device(RealPoint::new(0.0, 10.0));
        assert_relative_eq!(dev.x, 100.0, epsilon = 1e-9);
        assert_relative_eq!(dev.y, 0.0, epsilon = 1e-9);
    }
}

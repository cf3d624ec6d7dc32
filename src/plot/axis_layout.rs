//! Per-axis tick text layout.
//!
//! An `AxisLayout` measures every tick label once against a device and is
//! cached on the owning axis slot until the axis or geometry changes.

use std::f64::consts::PI;

use crate::core::axis::{Axis, PolarAngularAxis, TickData, TickSize};
use crate::core::types::RealPoint;
use crate::render::OutputDevice;
use crate::text::{TextAlignment, TextLayout};

use super::{AxisPos, TEXT_SPACE};

/// Gap between an axis line and its tick text.
pub(crate) const TEXT_AXIS_OFFSET: f64 = 3.0;

/// Minimum separation between adjacent tick labels before rotation kicks in.
const TICK_LABEL_SPACE: f64 = 4.0;

struct TickLayout {
    text: TextLayout,
    world: f64,
    size: TickSize,
    angle: f64,
}

pub(crate) struct AxisLayout {
    pos: AxisPos,
    ticks: Vec<TickLayout>,
    bounds: RealPoint,
}

impl AxisLayout {
    pub(crate) fn new(
        pos: AxisPos,
        dc: &mut dyn OutputDevice,
        axis: &dyn Axis,
        phys_min: f64,
        phys_max: f64,
    ) -> Self {
        let mut layout = Self {
            pos,
            ticks: Vec::new(),
            bounds: RealPoint::new(0.0, 0.0),
        };

        let mut data: Vec<TickData> = Vec::new();
        axis.ticks(phys_min, phys_max, &mut data);
        if data.is_empty() {
            return layout;
        }

        let show_text = axis.base().show_tick_text;
        layout.ticks.reserve(data.len());
        for td in data {
            let label = if show_text { td.label.as_str() } else { "" };
            layout.ticks.push(TickLayout {
                text: TextLayout::new(dc, label, TextAlignment::Center),
                world: td.world,
                size: td.size,
                angle: 0.0,
            });
        }

        match pos {
            AxisPos::XBottom | AxisPos::XTop => {
                // extents assuming unrotated text
                let mut xmin = phys_min;
                let mut xmax = phys_max;
                let mut ymax = 0.0f64;
                for ti in &layout.ticks {
                    let phys = axis.world_to_physical(ti.world, phys_min, phys_max);
                    xmin = xmin.min(phys - ti.text.width() / 2.0);
                    xmax = xmax.max(phys + ti.text.width() / 2.0);
                    ymax = ymax.max(ti.text.height());
                }
                layout.bounds = RealPoint::new(xmax - xmin, ymax);

                // angular axes place their own labels at render time
                if axis.polar().is_some() {
                    return layout;
                }

                layout.avoid_overlap(axis, phys_min, phys_max);
            }
            AxisPos::YLeft | AxisPos::YRight => {
                let mut ymin = phys_max; // upper coordinate
                let mut ymax = phys_min; // lower coordinate
                let mut xmax = 0.0f64;
                for ti in &layout.ticks {
                    let phys = axis.world_to_physical(ti.world, phys_min, phys_max);
                    ymin = ymin.min(phys - ti.text.height() / 2.0);
                    ymax = ymax.max(phys + ti.text.height() / 2.0);
                    xmax = xmax.max(ti.text.width());
                }
                layout.bounds = RealPoint::new(xmax, ymax - ymin);
            }
        }

        layout
    }

    /// Rotates every tick label by 45° when the widest label would touch
    /// either neighbor, and recomputes the vertical bound.
    fn avoid_overlap(&mut self, axis: &dyn Axis, phys_min: f64, phys_max: f64) {
        let labeled: Vec<usize> = (0..self.ticks.len())
            .filter(|&i| self.ticks[i].text.width() > 0.0)
            .collect();
        if labeled.len() <= 2 {
            return;
        }

        let mut index = 0;
        let mut width = 0.0;
        for (j, &t) in labeled.iter().enumerate() {
            if self.ticks[t].text.width() > width {
                width = self.ticks[t].text.width();
                index = j;
            }
        }
        if index == 0 {
            index += 1;
        } else if index == labeled.len() - 1 {
            index -= 1;
        }

        let left = &self.ticks[labeled[index - 1]];
        let center = &self.ticks[labeled[index]];
        let right = &self.ticks[labeled[index + 1]];

        let phys_left = axis.world_to_physical(left.world, phys_min, phys_max);
        let phys = axis.world_to_physical(center.world, phys_min, phys_max);
        let phys_right = axis.world_to_physical(right.world, phys_min, phys_max);

        let crowded = phys - center.text.width() / 2.0 - TICK_LABEL_SPACE
            < phys_left + left.text.width() / 2.0
            || phys + center.text.width() / 2.0 + TICK_LABEL_SPACE
                > phys_right - right.text.width() / 2.0;
        if !crowded {
            return;
        }

        let angle = 45.0;
        let realign = if self.pos == AxisPos::XTop {
            TextAlignment::Left
        } else {
            TextAlignment::Right
        };
        for ti in &mut self.ticks {
            ti.angle = angle;
            ti.text.align(realign);
        }

        let widest = &self.ticks[labeled[index]];
        self.bounds.y =
            widest.text.height() + (widest.text.width() * (PI / 180.0 * angle).sin()).abs();
    }

    /// Space the tick labels claim beyond the axis line, as (width, height).
    pub(crate) fn bounds(&self) -> RealPoint {
        self.bounds
    }

    /// World positions of the ticks of one size, for grid lines.
    pub(crate) fn tick_worlds(&self, size: TickSize) -> Vec<f64> {
        self.ticks
            .iter()
            .filter(|t| t.size == size)
            .map(|t| t.world)
            .collect()
    }

    /// Draws tick marks and labels along the axis line at `ordinate`.
    /// `ordinate_opposite` mirrors the tick marks on the far plot edge.
    pub(crate) fn render(
        &self,
        dc: &mut dyn OutputDevice,
        ordinate: f64,
        axis: &dyn Axis,
        phys_min: f64,
        phys_max: f64,
        ordinate_opposite: Option<f64>,
    ) {
        // angular axes: ordinate is the radius, (phys_min, phys_max) the center
        if let Some(pa) = axis.polar() {
            self.render_angular(dc, ordinate, axis, pa, phys_min, phys_max);
            return;
        }

        let base = axis.base();
        for ti in &self.ticks {
            let physical = axis.world_to_physical(ti.world, phys_min, phys_max);

            if ti.size != TickSize::None {
                let len = if ti.size == TickSize::Large {
                    base.large_tick_size
                } else {
                    base.small_tick_size
                };

                match self.pos {
                    AxisPos::XBottom => dc.line(physical, ordinate, physical, ordinate - len),
                    AxisPos::XTop => dc.line(physical, ordinate, physical, ordinate + len),
                    AxisPos::YLeft => dc.line(ordinate, physical, ordinate + len, physical),
                    AxisPos::YRight => dc.line(ordinate, physical, ordinate - len, physical),
                }

                if let Some(opp) = ordinate_opposite {
                    if opp > 0.0 {
                        match self.pos {
                            AxisPos::XBottom => dc.line(physical, opp, physical, opp + len),
                            AxisPos::XTop => dc.line(physical, opp, physical, opp - len),
                            AxisPos::YLeft => dc.line(opp, physical, opp - len, physical),
                            AxisPos::YRight => dc.line(opp, physical, opp + len, physical),
                        }
                    }
                }
            }

            if ti.text.width() > 0.0 {
                let (text_x, text_y) = match self.pos {
                    AxisPos::XBottom => {
                        if ti.angle == 0.0 {
                            (
                                physical - ti.text.width() / 2.0,
                                ordinate + TEXT_AXIS_OFFSET,
                            )
                        } else {
                            let rad = -PI / 180.0 * ti.angle;
                            (
                                physical - ti.text.width() * rad.cos(),
                                ordinate + TEXT_AXIS_OFFSET - ti.text.width() * rad.sin(),
                            )
                        }
                    }
                    AxisPos::XTop => {
                        if ti.angle == 0.0 {
                            (
                                physical - ti.text.width() / 2.0,
                                ordinate - TEXT_AXIS_OFFSET - ti.text.height(),
                            )
                        } else {
                            let rad = -PI / 180.0 * ti.angle;
                            (
                                physical + ti.text.height() * rad.sin(),
                                ordinate - TEXT_AXIS_OFFSET - ti.text.height() * rad.cos(),
                            )
                        }
                    }
                    AxisPos::YLeft => (
                        ordinate - ti.text.width() - TEXT_AXIS_OFFSET,
                        physical - ti.text.height() / 2.0,
                    ),
                    AxisPos::YRight => (
                        ordinate + TEXT_AXIS_OFFSET,
                        physical - ti.text.height() / 2.0,
                    ),
                };

                ti.text.render(dc, text_x, text_y, ti.angle, false);
            }
        }
    }

    /// Radial tick marks and quadrant-placed labels around a polar row.
    fn render_angular(
        &self,
        dc: &mut dyn OutputDevice,
        radius: f64,
        axis: &dyn Axis,
        pa: &PolarAngularAxis,
        cntr_x: f64,
        cntr_y: f64,
    ) {
        let base = axis.base();
        for ti in &self.ticks {
            let len = if ti.size == TickSize::Large {
                base.large_tick_size
            } else {
                base.small_tick_size
            };
            let angle = pa.angle_in_radians(ti.world);
            let (sin_a, cos_a) = angle.sin_cos();
            let p0 = RealPoint::new(cntr_x + radius * cos_a, cntr_y + radius * sin_a);
            let p1 = RealPoint::new(
                cntr_x + (radius - len) * cos_a,
                cntr_y + (radius - len) * sin_a,
            );
            dc.line(p0.x, p0.y, p1.x, p1.y);

            if ti.text.width() > 0.0 {
                // text anchors at its top-left corner, so placement
                // depends on which quadrant the tick points into
                let (tx, ty) = if p0.x < p1.x && p0.y >= p1.y {
                    // bottom left
                    (p0.x - ti.text.width() - TEXT_SPACE, p0.y)
                } else if p0.x < p1.x && p0.y < p1.y {
                    // top left
                    (
                        p0.x - ti.text.width() - TEXT_SPACE,
                        p0.y - ti.text.height(),
                    )
                } else if p0.x >= p1.x && p0.y < p1.y {
                    // top right
                    (p0.x + TEXT_SPACE, p0.y - ti.text.height())
                } else {
                    (p0.x + TEXT_SPACE, p0.y)
                };
                ti.text.render(dc, tx, ty, 0.0, false);
            }
        }
    }
}

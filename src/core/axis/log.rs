use super::{Axis, AxisBase, TickData, TickSize, format_tick_value};

/// Minor-tick digits within a decade.
const DECADE_DIGITS: [f64; 8] = [2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0];

/// Logarithmic axis. Bounds must be positive for meaningful output;
/// non-positive inputs map to a sentinel physical position of 0.
#[derive(Debug, Clone)]
pub struct LogAxis {
    base: AxisBase,
}

impl LogAxis {
    #[must_use]
    pub fn new(min: f64, max: f64, label: &str) -> Self {
        Self {
            base: AxisBase::new(min, max, label),
        }
    }

    /// Major-tick spacing in whole decades: one decade, widened until at
    /// most 10 major ticks fit the bound range.
    fn tick_spacing(&self) -> f64 {
        let b = &self.base;
        let mag_range = b.max.log10().floor() - b.min.log10().floor() + 1.0;
        if mag_range > 0.0 {
            let mut dist = 1.0;
            let mut nticks = (mag_range / dist) as i32;
            while nticks > 10 {
                dist += 1.0;
                nticks = (mag_range / dist) as i32;
            }
            dist
        } else {
            0.0
        }
    }

    fn calc_ticks(&self) -> (Vec<f64>, Vec<f64>) {
        let b = &self.base;
        let mut large = Vec::new();
        let mut small = Vec::new();
        if b.min.is_nan() || b.max.is_nan() || b.min <= 0.0 || b.max <= 0.0 {
            return (large, small);
        }

        let spacing = self.tick_spacing();
        if spacing <= 0.0 {
            return (large, small);
        }

        let mut first = ((b.min.log10() / spacing).floor() + 1.0) * spacing;
        if first - spacing >= b.min.log10() {
            first -= spacing;
        }

        let mut mark = first;
        while mark <= b.max.log10() {
            large.push(10f64.powf(mark));
            mark += spacing;
        }

        if spacing > 1.0 {
            let n_small = spacing as usize - 1;
            if let Some(&first_large) = large.first() {
                let mut pos = first_large;
                while pos > b.min {
                    pos /= 10.0;
                    small.push(pos);
                }
                for &lt in &large {
                    let mut pos = lt;
                    for _ in 0..n_small {
                        pos *= 10.0;
                        if pos < b.max {
                            small.push(pos);
                        }
                    }
                }
            }
        } else if let Some(&first_large) = large.first() {
            // digits 2..9 per decade, including the partial decade before
            // the first major tick
            let below = first_large / 10.0;
            for m in DECADE_DIGITS {
                let pos = below * m;
                if pos > b.min {
                    small.push(pos);
                }
            }
            for &lt in &large {
                for m in DECADE_DIGITS {
                    let pos = lt * m;
                    if pos < b.max {
                        small.push(pos);
                    }
                }
            }
        } else {
            // no major tick in range, still place the minors of the
            // enclosing decade
            let below = 10f64.powf(b.min.log10().floor());
            for m in DECADE_DIGITS {
                let pos = below * m;
                if pos > b.min && pos < b.max {
                    small.push(pos);
                }
            }
        }

        (large, small)
    }
}

impl Axis for LogAxis {
    fn base(&self) -> &AxisBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut AxisBase {
        &mut self.base
    }

    fn duplicate(&self) -> Box<dyn Axis> {
        Box::new(self.clone())
    }

    fn ticks(&self, _phys_min: f64, _phys_max: f64, list: &mut Vec<TickData>) {
        let (large, small) = self.calc_ticks();

        let mut out: Vec<TickData> = Vec::with_capacity(large.len() + small.len());
        for v in large {
            let (world, label) = format_tick_value(v);
            out.push(TickData::new(world, label, TickSize::Large));
        }
        for v in small {
            out.push(TickData::new(v, "", TickSize::Small));
        }
        out.sort_by(|a, b| a.world.total_cmp(&b.world));
        list.extend(out);
    }

    fn world_to_physical(&self, coord: f64, phys_min: f64, phys_max: f64) -> f64 {
        let b = &self.base;
        if coord <= 0.0 || b.min <= 0.0 {
            return 0.0;
        }
        let lrange = b.max.log10() - b.min.log10();
        if lrange == 0.0 {
            return phys_min;
        }
        let mut prop = (coord.log10() - b.min.log10()) / lrange;
        if b.reversed {
            prop = 1.0 - prop;
        }
        phys_min + prop * (phys_max - phys_min)
    }

    fn physical_to_world(&self, p: f64, phys_min: f64, phys_max: f64) -> f64 {
        let b = &self.base;
        let len = phys_max - phys_min;
        if len == 0.0 || b.min <= 0.0 {
            return b.min;
        }
        // linear fraction along the extent, re-applied on the log scale
        let mut v = (p - phys_min) / len;
        if b.reversed {
            v = 1.0 - v;
        }
        b.min * (b.max / b.min).powf(v)
    }

    fn set_world(&mut self, min: f64, max: f64) {
        if min > 0.0 {
            self.base.min = min;
        }
        self.base.max = max;
    }

    fn set_world_min(&mut self, min: f64) {
        // non-positive minimums are rejected, the log scale cannot show them
        if min > 0.0 {
            self.base.min = min;
        }
    }

    fn extend_bound(&mut self, other: &dyn Axis) {
        let (omin, omax) = (other.world_min(), other.world_max());
        if !omin.is_nan() && omin > 0.0 && (self.base.min.is_nan() || omin < self.base.min) {
            self.base.min = omin;
        }
        if !omax.is_nan() && (self.base.max.is_nan() || omax > self.base.max) {
            self.base.max = omax;
        }
    }
}

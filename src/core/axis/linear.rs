use super::{Axis, AxisBase, TickData, TickSize, format_tick_value};

/// Minimum physical spacing between large ticks, in pixels.
const MIN_PHYS_LARGE_TICK_STEP: f64 = 40.0;
/// Allowed tick-step mantissas.
const MANTISSAS: [f64; 3] = [1.0, 2.0, 5.0];
/// Small ticks between large ticks, keyed by mantissa.
const SMALL_TICK_COUNTS: [usize; 3] = [4, 1, 4];
/// Loop guard for degenerate step values.
const MAX_TICKS: usize = 5000;

#[derive(Debug, Clone)]
pub struct LinearAxis {
    base: AxisBase,
    scale: f64,
    offset: f64,
}

impl LinearAxis {
    #[must_use]
    pub fn new(min: f64, max: f64, label: &str) -> Self {
        Self {
            base: AxisBase::new(min, max, label),
            scale: 1.0,
            offset: 0.0,
        }
    }

    /// Linear display transform applied to world values before tick
    /// placement, e.g. for unit conversion.
    pub fn set_transform(&mut self, scale: f64, offset: f64) {
        self.scale = scale;
        self.offset = offset;
    }

    fn adjusted(&self, world: f64) -> f64 {
        world * self.scale + self.offset
    }

    /// Chooses the large-tick step for the given physical length. The
    /// returned flag requests demoting the interior large ticks when the
    /// extent fits fewer than two steps.
    fn large_tick_step(&self, physical_len: f64) -> (f64, bool) {
        let b = &self.base;
        if b.min == b.max {
            return (1.0, false);
        }
        let range = self.adjusted(b.max) - self.adjusted(b.min);
        if !(range > 0.0) || !(physical_len > 0.0) {
            return (1.0, false);
        }

        let approx_step = (MIN_PHYS_LARGE_TICK_STEP / physical_len) * range;
        let mut exponent = approx_step.log10().floor();
        let mantissa = 10f64.powf(approx_step.log10() - exponent);

        // next whole mantissa below the approximate one
        let mut index = MANTISSAS.len() as isize - 1;
        for i in 1..MANTISSAS.len() {
            if mantissa < MANTISSAS[i] {
                index = i as isize - 1;
                break;
            }
        }

        // then the next-largest spacing
        index += 1;
        if index == MANTISSAS.len() as isize {
            index = 0;
            exponent += 1.0;
        }

        // back off until at least two large ticks fit
        let mut cull_middle = false;
        let mut tick_step = 10f64.powf(exponent) * MANTISSAS[index as usize];
        let mut physical_step = tick_step / range * physical_len;
        while physical_step > physical_len / 2.0 {
            cull_middle = true;
            index -= 1;
            if index == -1 {
                index = MANTISSAS.len() as isize - 1;
                exponent -= 1.0;
            }
            tick_step = 10f64.powf(exponent) * MANTISSAS[index as usize];
            physical_step = tick_step / range * physical_len;
        }

        (tick_step, cull_middle)
    }

    fn calc_ticks(&self, phys_min: f64, phys_max: f64) -> (Vec<f64>, Vec<f64>) {
        let mut large = Vec::new();
        let mut small = Vec::new();

        let b = &self.base;
        if b.min.is_nan() || b.max.is_nan() || b.min == b.max {
            return (large, small);
        }

        let adjusted_min = self.adjusted(b.min);
        let adjusted_max = self.adjusted(b.max);
        let physical_len = (phys_min - phys_max).abs();
        let (tick_dist, cull_middle) = self.large_tick_step(physical_len);

        let mut first = if adjusted_min > 0.0 {
            ((adjusted_min / tick_dist).floor() + 1.0) * tick_dist
        } else {
            -(((-adjusted_min / tick_dist).floor() - 1.0) * tick_dist)
        };
        // could miss one, if first is just inside the range
        if first - tick_dist >= adjusted_min {
            first -= tick_dist;
        }

        let mut position = first;
        while position <= adjusted_max && large.len() < MAX_TICKS {
            large.push(position);
            position += tick_dist;
        }

        if cull_middle && !large.is_empty() {
            if large.len() > 2 {
                small.extend_from_slice(&large[1..large.len() - 1]);
            }
            large = vec![large[0], large[large.len() - 1]];
        }

        if small.is_empty() {
            let n_small = subdivisions(tick_dist);
            if n_small > 0 {
                let small_spacing = tick_dist / n_small as f64;
                if let Some(&first_large) = large.first() {
                    let mut pos = first_large - small_spacing;
                    while pos > adjusted_min {
                        small.push(pos);
                        pos -= small_spacing;
                    }
                }
                for &lt in &large {
                    for j in 1..n_small {
                        let pos = lt + j as f64 * small_spacing;
                        if pos <= adjusted_max {
                            small.push(pos);
                        }
                    }
                }
            }
        }

        (large, small)
    }
}

impl Axis for LinearAxis {
    fn base(&self) -> &AxisBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut AxisBase {
        &mut self.base
    }

    fn duplicate(&self) -> Box<dyn Axis> {
        Box::new(self.clone())
    }

    fn ticks(&self, phys_min: f64, phys_max: f64, list: &mut Vec<TickData>) {
        let (large, small) = self.calc_ticks(phys_min, phys_max);

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
}

/// Number of small-tick subdivisions for a large-tick step.
fn subdivisions(big_tick_dist: f64) -> usize {
    if big_tick_dist > 0.0 {
        let exponent = big_tick_dist.log10().floor();
        let mantissa = 10f64.powf(big_tick_dist.log10() - exponent);
        for (i, m) in MANTISSAS.iter().enumerate() {
            if (mantissa - m).abs() < 0.001 {
                return SMALL_TICK_COUNTS[i] + 1;
            }
        }
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_width_range_yields_unit_step() {
        let axis = LinearAxis::new(3.0, 3.0, "");
        assert_eq!(axis.large_tick_step(400.0).0, 1.0);
    }

    #[test]
    fn standard_range_uses_nice_step() {
        let axis = LinearAxis::new(0.0, 100.0, "");
        let (step, cull) = axis.large_tick_step(400.0);
        assert_eq!(step, 20.0);
        assert!(!cull);
    }

    #[test]
    fn narrow_extent_culls_middle_ticks() {
        let axis = LinearAxis::new(0.0, 100.0, "");
        let mut ticks = Vec::new();
        axis.ticks(0.0, 60.0, &mut ticks);
        let large: Vec<_> = ticks.iter().filter(|t| t.size == TickSize::Large).collect();
        assert_eq!(large.len(), 2);
    }

    #[test]
    fn subdivision_counts_follow_mantissa() {
        assert_eq!(subdivisions(10.0), 5);
        assert_eq!(subdivisions(20.0), 2);
        assert_eq!(subdivisions(50.0), 5);
        assert_eq!(subdivisions(0.0), 0);
    }
}

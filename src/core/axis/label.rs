use super::{Axis, AxisBase, TickData, TickSize};

/// Discrete-label axis: explicit (world, text) pairs, filtered to the
/// visible window at tick time.
#[derive(Debug, Clone, Default)]
pub struct LabelAxis {
    base: AxisBase,
    tick_labels: Vec<TickData>,
}

impl LabelAxis {
    #[must_use]
    pub fn new(min: f64, max: f64, label: &str) -> Self {
        Self {
            base: AxisBase::new(min, max, label),
            tick_labels: Vec::new(),
        }
    }

    pub fn add(&mut self, world: f64, text: &str) {
        self.tick_labels
            .push(TickData::new(world, text, TickSize::Large));
    }

    pub fn clear(&mut self) {
        self.tick_labels.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tick_labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tick_labels.is_empty()
    }
}

impl Axis for LabelAxis {
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
        let min_shown = self.physical_to_world(phys_min, phys_min, phys_max);
        let max_shown = self.physical_to_world(phys_max, phys_min, phys_max);

        let mut out: Vec<TickData> = self
            .tick_labels
            .iter()
            .filter(|t| t.world >= min_shown && t.world <= max_shown)
            .cloned()
            .collect();
        out.sort_by(|a, b| a.world.total_cmp(&b.world));
        list.extend(out);
    }
}

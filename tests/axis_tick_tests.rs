use plotkit::core::axis::{
    AngularUnits, Axis, LabelAxis, LinearAxis, LogAxis, PolarAngularAxis, TickSize, TimeAxis,
    ZeroDirection, extend_to_nice_numbers,
};

fn large_worlds(axis: &dyn Axis, phys: f64) -> Vec<f64> {
    let mut ticks = Vec::new();
    axis.ticks(0.0, phys, &mut ticks);
    ticks
        .iter()
        .filter(|t| t.size == TickSize::Large)
        .map(|t| t.world)
        .collect()
}

#[test]
fn linear_axis_picks_a_nice_step_at_400px() {
    let axis = LinearAxis::new(0.0, 100.0, "");
    let worlds = large_worlds(&axis, 400.0);
    assert!(worlds.len() >= 2 && worlds.len() <= 10);

    let step = worlds[1] - worlds[0];
    let magnitude = 10f64.powf(step.log10().floor());
    let mantissa = step / magnitude;
    assert!(
        [1.0, 2.0, 5.0]
            .iter()
            .any(|m| (mantissa - m).abs() < 1e-9),
        "step {step} is not from the 1-2-5 grid"
    );
}

#[test]
fn linear_large_ticks_strictly_increase() {
    for (min, max) in [(0.0, 100.0), (-3.0, 7.0), (0.013, 0.094), (1e6, 9e6)] {
        let axis = LinearAxis::new(min, max, "");
        let worlds = large_worlds(&axis, 640.0);
        assert!(
            worlds.windows(2).all(|w| w[0] < w[1]),
            "ticks not increasing for [{min}, {max}]: {worlds:?}"
        );
    }
}

#[test]
fn linear_tick_list_is_sorted_by_world() {
    let axis = LinearAxis::new(0.0, 100.0, "");
    let mut ticks = Vec::new();
    axis.ticks(0.0, 60.0, &mut ticks);
    assert!(ticks.windows(2).all(|w| w[0].world <= w[1].world));
}

#[test]
fn log_axis_majors_are_whole_decades() {
    let axis = LogAxis::new(0.01, 100.0, "");
    let worlds = large_worlds(&axis, 400.0);
    let expected = [0.01, 0.1, 1.0, 10.0, 100.0];
    assert_eq!(worlds.len(), expected.len());
    for (world, want) in worlds.iter().zip(expected) {
        assert!((world - want).abs() < 1e-9 * want, "{world} != {want}");
    }
}

#[test]
fn log_axis_minor_ticks_fill_decades() {
    let axis = LogAxis::new(1.0, 100.0, "");
    let mut ticks = Vec::new();
    axis.ticks(0.0, 400.0, &mut ticks);
    assert!(ticks.iter().any(|t| t.size == TickSize::Small && (t.world - 30.0).abs() < 1e-9));
}

#[test]
fn nice_number_extension_only_widens() {
    for (min, max) in [(0.013, 97.0), (-4.2, 3.1), (250.0, 251.0)] {
        let (lo, hi) = extend_to_nice_numbers(min, max);
        assert!(lo <= min, "{lo} > {min}");
        assert!(hi >= max, "{hi} < {max}");
    }
}

#[test]
fn reversed_axis_mirrors_the_physical_mapping() {
    let mut axis = LinearAxis::new(0.0, 10.0, "");
    let forward = axis.world_to_physical(2.5, 0.0, 640.0);
    axis.base_mut().reversed = true;
    let mirrored = axis.world_to_physical(2.5, 0.0, 640.0);
    assert!((forward - 160.0).abs() < 1e-9);
    assert!((mirrored - 480.0).abs() < 1e-9);
    let back = axis.physical_to_world(mirrored, 0.0, 640.0);
    assert!((back - 2.5).abs() < 1e-9);
}

#[test]
fn axis_label_carries_units_when_set() {
    let mut axis = LinearAxis::new(0.0, 1.0, "power");
    assert_eq!(axis.label(), "power");
    axis.set_units("kW");
    assert_eq!(axis.label(), "power (kW)");
}

#[test]
fn extend_bound_absorbs_nan_operands() {
    let mut axis = LinearAxis::new(f64::NAN, f64::NAN, "");
    let other = LinearAxis::new(2.0, 5.0, "");
    axis.extend_bound(&other);
    assert_eq!(axis.world_min(), 2.0);
    assert_eq!(axis.world_max(), 5.0);

    let nan_axis = LinearAxis::new(f64::NAN, f64::NAN, "");
    axis.extend_bound(&nan_axis);
    assert_eq!(axis.world_min(), 2.0);
    assert_eq!(axis.world_max(), 5.0);
}

#[test]
fn label_axis_only_emits_visible_entries() {
    let mut axis = LabelAxis::new(0.0, 4.0, "");
    axis.add(1.0, "one");
    axis.add(3.0, "three");
    axis.add(9.0, "nine");

    let mut ticks = Vec::new();
    axis.ticks(0.0, 200.0, &mut ticks);
    let labels: Vec<&str> = ticks.iter().map(|t| t.label.as_str()).collect();
    assert_eq!(labels, ["one", "three"]);
}

#[test]
fn time_axis_tick_list_is_cache_stable() {
    let axis = TimeAxis::new(0.0, 36.0);
    let mut first = Vec::new();
    axis.ticks(0.0, 500.0, &mut first);
    let mut second = Vec::new();
    axis.ticks(0.0, 500.0, &mut second);
    assert_eq!(first, second);
    assert!(!first.is_empty());
}

#[test]
fn time_axis_recomputes_after_bounds_change() {
    let mut axis = TimeAxis::new(0.0, 8.0);
    let label_before = axis.label();
    axis.set_world(0.0, 24.0 * 200.0);
    let mut ticks = Vec::new();
    axis.ticks(0.0, 800.0, &mut ticks);
    assert!(ticks.iter().any(|t| t.label.len() == 3), "expected month labels");
    // hourly span labels carry a day range, monthly spans do not
    assert!(!label_before.is_empty());
    assert!(axis.label().is_empty());
}

#[test]
fn time_axis_survives_pathological_world_bounds() {
    for (min, max) in [
        (-1.0e18, 1.0e18),
        (f64::MIN, f64::MAX),
        (f64::NAN, f64::NAN),
    ] {
        let axis = TimeAxis::new(min, max);
        let mut ticks = Vec::new();
        axis.ticks(0.0, 800.0, &mut ticks);
        let _ = axis.label();
    }
}

#[test]
fn polar_degree_axis_reports_compass_names() {
    let mut axis = PolarAngularAxis::new("", AngularUnits::Degrees, ZeroDirection::Up);
    axis.use_direction_names(true);
    let mut ticks = Vec::new();
    axis.ticks(0.0, 400.0, &mut ticks);
    assert!(
        ticks
            .iter()
            .filter(|t| t.size == TickSize::Large)
            .any(|t| t.label == "N" || t.label == "S")
    );
}

use std::cell::RefCell;

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, Timelike};

use super::{Axis, AxisBase, TickData, TickSize};

/// Adaptive time axis. World values are hours since 1970-01-01 00:00
/// (naive, no timezone). Granularity switches on the visible span:
/// hours for up to three days, days for up to a month, months beyond
/// that. Ticks and the derived axis label are memoized against the last
/// computed (min, max) pair.
#[derive(Debug)]
pub struct TimeAxis {
    base: AxisBase,
    cache: RefCell<TimeCache>,
}

#[derive(Debug, Default, Clone)]
struct TimeCache {
    valid: bool,
    last_min: f64,
    last_max: f64,
    ticks: Vec<TickData>,
    label: String,
}

/// Loop guard against degenerate ranges.
const MAX_TICKS: usize = 5000;

impl TimeAxis {
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            base: AxisBase::new(min, max, ""),
            cache: RefCell::new(TimeCache::default()),
        }
    }

    fn ensure_cache(&self) {
        let b = &self.base;
        let mut cache = self.cache.borrow_mut();
        if cache.valid && cache.last_min == b.min && cache.last_max == b.max {
            return;
        }

        cache.ticks.clear();
        cache.label.clear();
        if !b.min.is_nan() && !b.max.is_nan() {
            recalculate(b.min, b.max, &mut cache);
        }
        cache.last_min = b.min;
        cache.last_max = b.max;
        cache.valid = true;
    }
}

impl Clone for TimeAxis {
    fn clone(&self) -> Self {
        Self {
            base: self.base.clone(),
            cache: RefCell::new(TimeCache::default()),
        }
    }
}

impl Axis for TimeAxis {
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
        self.ensure_cache();
        list.extend(self.cache.borrow().ticks.iter().cloned());
    }

    /// Derived span label, e.g. "Jan 05-07" for an hourly view.
    fn label(&self) -> String {
        self.ensure_cache();
        self.cache.borrow().label.clone()
    }
}

fn hours_to_datetime(hours: f64) -> NaiveDateTime {
    // clamp to roughly 100k years either side of the epoch so chrono's
    // date arithmetic stays in range for pathological world bounds
    const HOUR_LIMIT: f64 = 1.0e9;
    let minutes = (hours.clamp(-HOUR_LIMIT, HOUR_LIMIT) * 60.0).round() as i64;
    NaiveDateTime::UNIX_EPOCH
        .checked_add_signed(Duration::minutes(minutes))
        .unwrap_or(NaiveDateTime::UNIX_EPOCH)
}

fn days_in_month(year: i32, month: u32) -> i64 {
    let first = NaiveDate::from_ymd_opt(year, month, 1);
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    match (first, next) {
        (Some(a), Some(b)) => (b - a).num_days(),
        _ => 30,
    }
}

fn mid_month(dt: NaiveDateTime) -> NaiveDateTime {
    let day = (days_in_month(dt.year(), dt.month()) / 2).max(1) as u32;
    dt.with_day(day).unwrap_or(dt)
}

fn first_of_next_month(dt: NaiveDateTime) -> NaiveDateTime {
    (dt + Months::new(1)).with_day(1).unwrap_or(dt)
}

fn recalculate(min: f64, max: f64, cache: &mut TimeCache) {
    let world_len = max - min;
    let mut time = min;
    let mut keeper = hours_to_datetime(time);

    if world_len <= 72.0 {
        hourly_ticks(min, max, world_len, time, keeper, cache);
    } else if world_len < 30.0 * 24.0 {
        // about a month visible, tick every day with a noon label
        let mut aligned = keeper;
        while aligned.hour() % 12 != 0 {
            aligned += Duration::hours(1);
        }
        aligned = aligned.with_minute(0).unwrap_or(aligned);
        time += (aligned - keeper).num_minutes() as f64 / 60.0;
        keeper = aligned;

        if keeper.hour() == 0 {
            cache.ticks.push(TickData::new(time, "", TickSize::Large));
            time += 12.0;
            keeper += Duration::hours(12);
        }

        loop {
            cache.ticks.push(TickData::new(
                time,
                keeper.format("%b %d").to_string(),
                TickSize::None,
            ));
            time += 12.0;
            if time < max {
                // midnight
                cache.ticks.push(TickData::new(time, "", TickSize::Large));
            }
            time += 12.0;
            keeper += Duration::hours(24);
            if time >= max || cache.ticks.len() >= MAX_TICKS {
                break;
            }
        }
    } else {
        monthly_ticks(min, max, time, keeper, cache);
    }

    cache
        .ticks
        .sort_by(|a, b| a.world.total_cmp(&b.world));
}

fn hourly_ticks(
    _min: f64,
    max: f64,
    world_len: f64,
    mut time: f64,
    mut keeper: NaiveDateTime,
    cache: &mut TimeCache,
) {
    if time.floor() != time {
        keeper += Duration::minutes((60.0 * (time.floor() + 2.0 - time)).round() as i64);
        time = time.floor() + 1.0;
    }

    if world_len > 6.0 {
        // label every 3rd hour
        while time % 3.0 != 0.0 {
            time += 1.0;
            keeper += Duration::hours(1);
        }
    }

    // 0:00 the next day is really the same day
    let end = keeper + Duration::minutes((60.0 * world_len).round() as i64) - Duration::minutes(1);
    cache.label = if keeper.day() == end.day() && keeper.month() == end.month() {
        keeper.format("%b %d").to_string()
    } else {
        format!("{}-{}", keeper.format("%b %d"), end.format("%d"))
    };

    loop {
        cache.ticks.push(TickData::new(
            time,
            keeper.format("%H").to_string(),
            TickSize::Large,
        ));
        if world_len > 9.0 {
            time += 3.0;
            keeper += Duration::hours(3);
        } else {
            time += 1.0;
            keeper += Duration::hours(1);
        }
        if time > max || cache.ticks.len() >= MAX_TICKS {
            break;
        }
    }
}

fn monthly_ticks(
    _min: f64,
    max: f64,
    mut time: f64,
    mut keeper: NaiveDateTime,
    cache: &mut TimeCache,
) {
    // widen the first month to whole days at the scale boundary
    let midnight = keeper
        .date()
        .and_hms_opt(0, 0, 0)
        .unwrap_or(keeper);
    let mut keeper2 = midnight + Duration::days(1);
    let mut days_visible = (keeper2 - keeper).num_minutes() as f64 / 60.0 / 24.0;
    while keeper2.month() == keeper.month() {
        days_visible += 1.0;
        keeper2 += Duration::days(1);
    }
    // keeper2 is now 00:00 on the first of the next month

    cache.ticks.push(TickData::new(
        time + days_visible * 24.0,
        "",
        TickSize::Large,
    ));
    let mut end_month_hours = time + days_visible * 24.0;

    if days_visible >= 7.0 {
        // label a month only when at least a week of it is visible
        cache.ticks.push(TickData::new(
            time + days_visible * 24.0 / 2.0,
            keeper.format("%b").to_string(),
            TickSize::None,
        ));
    }

    keeper2 = mid_month(keeper2);
    time += (keeper2 - keeper).num_hours() as f64;
    end_month_hours += 24.0 * days_in_month(keeper2.year(), keeper2.month()) as f64;

    loop {
        cache.ticks.push(TickData::new(
            time,
            keeper2.format("%b").to_string(),
            TickSize::None,
        ));
        keeper = keeper2; // middle of the last labelled month
        keeper2 = first_of_next_month(keeper2);
        cache.ticks.push(TickData::new(
            time + (keeper2 - keeper).num_hours() as f64,
            "",
            TickSize::Large,
        ));
        keeper2 = mid_month(keeper2);
        time += (keeper2 - keeper).num_hours() as f64;
        end_month_hours += 24.0 * days_in_month(keeper2.year(), keeper2.month()) as f64;
        if end_month_hours >= max || cache.ticks.len() >= MAX_TICKS {
            break;
        }
    }

    // the last month still needs a label if at least a week of it shows
    let first_unlabelled = first_of_next_month(keeper);
    time = end_month_hours
        - 24.0 * days_in_month(first_unlabelled.year(), first_unlabelled.month()) as f64;

    let end = hours_to_datetime(max);
    let mut days_visible =
        end.hour() as f64 / 24.0 + end.minute() as f64 / 60.0 / 24.0;
    let mut keeper2 =
        first_unlabelled + Duration::minutes((days_visible * 24.0 * 60.0).round() as i64);
    time += days_visible * 24.0;
    while time < max && keeper2.month() == first_unlabelled.month() {
        days_visible += 1.0;
        keeper2 += Duration::days(1);
        time += 24.0;
    }

    if days_visible >= 7.0 {
        cache.ticks.push(TickData::new(
            time - days_visible * 24.0 / 2.0,
            first_unlabelled.format("%b").to_string(),
            TickSize::None,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hourly_span_labels_hours() {
        let axis = TimeAxis::new(0.0, 8.0);
        let mut ticks = Vec::new();
        axis.ticks(0.0, 400.0, &mut ticks);
        assert!(!ticks.is_empty());
        assert!(ticks.iter().all(|t| t.size == TickSize::Large));
        assert_eq!(ticks[0].label, "00");
        assert_eq!(axis.label(), "Jan 01");
    }

    #[test]
    fn short_span_over_nine_hours_steps_by_three() {
        let axis = TimeAxis::new(0.0, 24.0);
        let mut ticks = Vec::new();
        axis.ticks(0.0, 400.0, &mut ticks);
        let worlds: Vec<f64> = ticks.iter().map(|t| t.world).collect();
        assert_eq!(worlds[0], 0.0);
        assert_eq!(worlds[1], 3.0);
    }

    #[test]
    fn cache_is_stable_for_unchanged_bounds() {
        let axis = TimeAxis::new(0.0, 48.0);
        let mut first = Vec::new();
        axis.ticks(0.0, 400.0, &mut first);
        let mut second = Vec::new();
        axis.ticks(0.0, 400.0, &mut second);
        assert_eq!(first, second);
    }

    #[test]
    fn daily_span_places_midnight_ticks() {
        let axis = TimeAxis::new(0.0, 10.0 * 24.0);
        let mut ticks = Vec::new();
        axis.ticks(0.0, 800.0, &mut ticks);
        assert!(ticks.iter().any(|t| t.size == TickSize::Large));
        assert!(
            ticks
                .iter()
                .any(|t| t.size == TickSize::None && t.label.starts_with("Jan"))
        );
    }

    #[test]
    fn monthly_span_labels_months() {
        let axis = TimeAxis::new(0.0, 120.0 * 24.0);
        let mut ticks = Vec::new();
        axis.ticks(0.0, 800.0, &mut ticks);
        let labels: Vec<_> = ticks
            .iter()
            .filter(|t| t.size == TickSize::None)
            .map(|t| t.label.as_str())
            .collect();
        assert!(labels.contains(&"Jan"));
        assert!(labels.contains(&"Feb"));
    }
}

//! Continuous scales mapping data values and months to canvas pixels.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Affine map from `domain` to `range`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Map `v` into the range. A collapsed domain maps everything to the range midpoint.
    pub fn apply(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return (r0 + r1) / 2.0;
        }
        r0 + (v - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Smallest and largest of `values` as a domain; `(0, 0)` when empty.
    pub fn extent<I: IntoIterator<Item = f64>>(values: I) -> (f64, f64) {
        let (lo, hi) = values
            .into_iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        if lo > hi { (0.0, 0.0) } else { (lo, hi) }
    }
}

/// Linear scale over calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeScale {
    start: NaiveDate,
    end: NaiveDate,
    linear: LinearScale,
}

fn day_number(d: NaiveDate) -> f64 {
    f64::from(d.num_days_from_ce())
}

impl TimeScale {
    pub fn new(domain: (NaiveDate, NaiveDate), range: (f64, f64)) -> Self {
        let (start, end) = domain;
        Self {
            start,
            end,
            linear: LinearScale::new((day_number(start), day_number(end)), range),
        }
    }

    /// Domain spanning the earliest and latest of `months`.
    pub fn from_extent(months: &[NaiveDate], range: (f64, f64)) -> Self {
        let start = months.iter().min().copied().unwrap_or_default();
        let end = months.iter().max().copied().unwrap_or_default();
        Self::new((start, end), range)
    }

    pub fn domain(&self) -> (NaiveDate, NaiveDate) {
        (self.start, self.end)
    }

    pub fn apply(&self, d: NaiveDate) -> f64 {
        self.linear.apply(day_number(d))
    }

    /// January 1st of every year inside the domain.
    pub fn year_ticks(&self) -> Vec<NaiveDate> {
        let first = if self.start.ordinal() == 1 {
            self.start.year()
        } else {
            self.start.year() + 1
        };
        (first..=self.end.year())
            .filter_map(|y| NaiveDate::from_ymd_opt(y, 1, 1))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    #[test]
    fn linear_maps_endpoints_and_midpoint() {
        let s = LinearScale::new((-10.0, 10.0), (100.0, 300.0));
        assert_eq!(s.apply(-10.0), 100.0);
        assert_eq!(s.apply(10.0), 300.0);
        assert_eq!(s.apply(0.0), 200.0);
    }

    #[test]
    fn collapsed_domain_maps_to_range_middle() {
        let s = LinearScale::new((5.0, 5.0), (0.0, 50.0));
        assert_eq!(s.apply(123.0), 25.0);
    }

    #[test]
    fn extent_of_empty_is_zero() {
        assert_eq!(LinearScale::extent(Vec::new()), (0.0, 0.0));
        assert_eq!(LinearScale::extent(vec![3.0, -1.0, 2.0]), (-1.0, 3.0));
    }

    #[test]
    fn time_scale_is_linear_in_days() {
        let s = TimeScale::new((d(2020, 1), d(2021, 1)), (0.0, 366.0));
        assert_eq!(s.apply(d(2020, 1)), 0.0);
        assert_eq!(s.apply(d(2021, 1)), 366.0);
        // 2020 is a leap year: Feb 1st is day 31.
        assert_eq!(s.apply(d(2020, 2)), 31.0);
    }

    #[test]
    fn year_ticks_skip_partial_first_year() {
        let s = TimeScale::from_extent(&[d(2016, 3), d(2019, 6)], (0.0, 1.0));
        let years: Vec<i32> = s.year_ticks().iter().map(|t| t.year()).collect();
        assert_eq!(years, vec![2017, 2018, 2019]);

        let s = TimeScale::from_extent(&[d(2016, 1), d(2017, 1)], (0.0, 1.0));
        let years: Vec<i32> = s.year_ticks().iter().map(|t| t.year()).collect();
        assert_eq!(years, vec![2016, 2017]);
    }
}

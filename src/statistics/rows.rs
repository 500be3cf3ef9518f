use chrono::NaiveDate;

use crate::statistics::hourly::DailyStatistics;

/// Flat view of one hour of one day, as written into the hourly CSV.
#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct HourlyRow {
    pub date: NaiveDate,
    pub hour: usize,
    pub min: f64,
    pub max: f64,
    pub average: f64,
    pub n_samples: usize,
}

/// All 24 rows for every day, idle hours included.
pub fn hourly_rows(days: &[DailyStatistics]) -> impl Iterator<Item = HourlyRow> + '_ {
    days.iter().flat_map(|day| {
        day.hours.iter().map(|statistics| HourlyRow {
            date: day.date,
            hour: statistics.hour(),
            min: statistics.min(),
            max: statistics.max(),
            average: statistics.mean(),
            n_samples: statistics.n_samples(),
        })
    })
}

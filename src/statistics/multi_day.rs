use chrono::NaiveDate;

use crate::{
    quantity::{energy::KilowattHours, power::Watts},
    statistics::{
        HOURS_PER_DAY,
        hourly::{DailyStatistics, HourStatistics},
        moments::{mean, median, sample_std_dev},
    },
};

/// Running cross-day state of one hour of the day.
#[must_use]
#[derive(Clone, Debug)]
pub struct AggregatedHourAccumulator {
    hour: usize,
    n_days: usize,
    min: f64,
    max: f64,
    daily_means: Vec<f64>,
}

impl AggregatedHourAccumulator {
    pub const fn new(hour: usize) -> Self {
        Self { hour, n_days: 0, min: f64::INFINITY, max: f64::NEG_INFINITY, daily_means: Vec::new() }
    }

    /// Fold in the same hour of another day. Idle hours do not contribute.
    pub fn add(&mut self, statistics: &HourStatistics) {
        if statistics.is_idle() {
            return;
        }
        self.n_days += 1;
        if statistics.min() < self.min {
            self.min = statistics.min();
        }
        if statistics.max() > self.max {
            self.max = statistics.max();
        }
        self.daily_means.push(statistics.mean());
    }

    pub fn finalize(self) -> AggregatedHourStatistics {
        if self.n_days == 0 {
            return AggregatedHourStatistics {
                hour: self.hour,
                n_days: 0,
                min: 0.0,
                max: 0.0,
                average: 0.0,
                median: 0.0,
                std_dev: 0.0,
                daily_means: self.daily_means,
            };
        }
        let average = mean(&self.daily_means);
        AggregatedHourStatistics {
            hour: self.hour,
            n_days: self.n_days,
            min: self.min,
            max: self.max,
            average,
            median: median(&self.daily_means),
            std_dev: sample_std_dev(&self.daily_means, average),
            daily_means: self.daily_means,
        }
    }
}

/// One hour of the day across all analysed days.
///
/// The extremes are the raw instantaneous readings, whereas the central tendency and
/// the spread are computed over the per-day hourly means.
#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct AggregatedHourStatistics {
    hour: usize,
    n_days: usize,
    min: f64,
    max: f64,
    average: f64,
    median: f64,
    std_dev: f64,
    daily_means: Vec<f64>,
}

impl AggregatedHourStatistics {
    #[must_use]
    pub const fn hour(&self) -> usize {
        self.hour
    }

    /// Number of days that had readings at this hour.
    #[must_use]
    pub const fn n_days(&self) -> usize {
        self.n_days
    }

    #[must_use]
    pub const fn min(&self) -> f64 {
        self.min
    }

    #[must_use]
    pub const fn max(&self) -> f64 {
        self.max
    }

    #[must_use]
    pub const fn average(&self) -> f64 {
        self.average
    }

    #[must_use]
    pub const fn median(&self) -> f64 {
        self.median
    }

    #[must_use]
    pub const fn std_dev(&self) -> f64 {
        self.std_dev
    }

    /// Hourly means of the contributing days, in the chronological order.
    #[must_use]
    pub fn daily_means(&self) -> &[f64] {
        &self.daily_means
    }
}

#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct MultiDayStatistics {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub n_days: usize,
    pub by_hour: [AggregatedHourStatistics; HOURS_PER_DAY],
    pub total_production: KilowattHours,
    pub daily_average: KilowattHours,

    /// Hour of the day with the highest cross-day average power.
    pub peak_hour: usize,

    pub peak_power_average: Watts,
}

impl MultiDayStatistics {
    /// Roll up the chronologically ordered days.
    ///
    /// The days are not sorted: the period spans from the first to the last element.
    /// Returns [`None`] for an empty slice.
    pub fn aggregate(days: &[DailyStatistics]) -> Option<Self> {
        let (first_day, last_day) = (days.first()?, days.last()?);

        let mut accumulators: [AggregatedHourAccumulator; HOURS_PER_DAY] =
            std::array::from_fn(AggregatedHourAccumulator::new);
        for day in days {
            for (accumulator, statistics) in accumulators.iter_mut().zip(&day.hours) {
                accumulator.add(statistics);
            }
        }
        let by_hour = accumulators.map(AggregatedHourAccumulator::finalize);
        let (peak_hour, peak_power_average) = find_peak(&by_hour);

        let total_production =
            days.iter().map(DailyStatistics::estimated_energy).sum::<KilowattHours>();
        #[expect(clippy::cast_precision_loss)]
        let daily_average = total_production / days.len() as f64;

        Some(Self {
            start_date: first_day.date,
            end_date: last_day.date,
            n_days: days.len(),
            by_hour,
            total_production,
            daily_average,
            peak_hour,
            peak_power_average,
        })
    }

    /// Hours that had readings on at least one day.
    pub fn active_hours(&self) -> impl Iterator<Item = &AggregatedHourStatistics> {
        self.by_hour.iter().filter(|hour| hour.n_days != 0)
    }
}

/// Forward scan with strict comparison: the earliest hour wins a tie,
/// and an all-zero day reports midnight at zero power.
fn find_peak(by_hour: &[AggregatedHourStatistics]) -> (usize, Watts) {
    let mut peak_hour = 0;
    let mut peak_average = 0.0;
    for statistics in by_hour {
        if statistics.average > peak_average {
            peak_hour = statistics.hour;
            peak_average = statistics.average;
        }
    }
    (peak_hour, Watts(peak_average))
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, day).unwrap()
    }

    fn day(day: u32, readings: &[(u32, f64)]) -> DailyStatistics {
        DailyStatistics::aggregate(date(day), readings.iter().copied()).unwrap()
    }

    #[test]
    fn test_empty() {
        assert!(MultiDayStatistics::aggregate(&[]).is_none());
    }

    #[test]
    fn test_cross_day_extremes() {
        let days = [
            day(1, &[(12, 4000.0), (12, 4200.0)]),
            day(2, &[(12, 4500.0), (12, 4700.0)]),
            day(3, &[(12, 4100.0), (12, 4300.0)]),
        ];
        let statistics = MultiDayStatistics::aggregate(&days).unwrap();
        assert_eq!(statistics.n_days, 3);
        assert_eq!(statistics.start_date, date(1));
        assert_eq!(statistics.end_date, date(3));

        let hour_12 = &statistics.by_hour[12];
        assert_eq!(hour_12.n_days, 3);
        assert_abs_diff_eq!(hour_12.min, 4000.0);
        assert_abs_diff_eq!(hour_12.max, 4700.0);
        assert_eq!(hour_12.daily_means, [4100.0, 4600.0, 4200.0]);
        assert_abs_diff_eq!(hour_12.average, 4300.0, epsilon = 1e-9);
        assert_abs_diff_eq!(hour_12.median, 4200.0);
        assert_eq!(statistics.peak_hour, 12);
    }

    #[test]
    fn test_idle_hours_do_not_pull_minimum() {
        let days = [day(1, &[(9, 800.0)]), day(2, &[(10, 100.0)])];
        let statistics = MultiDayStatistics::aggregate(&days).unwrap();
        assert_eq!(statistics.by_hour[9].n_days, 1);
        assert_abs_diff_eq!(statistics.by_hour[9].min, 800.0);
        assert_abs_diff_eq!(statistics.by_hour[9].std_dev, 0.0);

        let hour_0 = &statistics.by_hour[0];
        assert_eq!(hour_0.n_days, 0);
        assert_abs_diff_eq!(hour_0.min, 0.0);
        assert_abs_diff_eq!(hour_0.max, 0.0);
        assert_abs_diff_eq!(hour_0.average, 0.0);
    }

    #[test]
    fn test_peak_tie_goes_to_earlier_hour() {
        let days = [day(1, &[(10, 1000.0), (14, 1000.0), (8, 500.0)])];
        let statistics = MultiDayStatistics::aggregate(&days).unwrap();
        assert_eq!(statistics.peak_hour, 10);
        assert_abs_diff_eq!(statistics.peak_power_average.0, 1000.0);
    }

    #[test]
    fn test_peak_defaults_to_midnight() {
        let days = [day(1, &[(10, 0.0), (14, 0.0)])];
        let statistics = MultiDayStatistics::aggregate(&days).unwrap();
        assert_eq!(statistics.peak_hour, 0);
        assert_abs_diff_eq!(statistics.peak_power_average.0, 0.0);
    }

    #[test]
    fn test_energy_of_single_hour() {
        let statistics = MultiDayStatistics::aggregate(&[day(1, &[(12, 4500.0)])]).unwrap();
        assert_abs_diff_eq!(statistics.total_production.0, 4.5, epsilon = 1e-9);
        assert_abs_diff_eq!(statistics.daily_average.0, 4.5, epsilon = 1e-9);
    }

    #[test]
    fn test_three_days_at_noon() {
        let days = [day(1, &[(12, 4000.0)]), day(2, &[(12, 4500.0)]), day(3, &[(12, 4200.0)])];
        for statistics in &days {
            assert_eq!(statistics.hours[12].n_samples(), 1);
            assert_eq!(statistics.hours.iter().filter(|hour| !hour.is_idle()).count(), 1);
        }

        let statistics = MultiDayStatistics::aggregate(&days).unwrap();
        assert_eq!(statistics.n_days, 3);
        assert_eq!(statistics.by_hour[12].n_days, 3);
        assert_abs_diff_eq!(statistics.by_hour[12].average, 4233.33, epsilon = 0.01);
        assert_abs_diff_eq!(statistics.by_hour[12].std_dev, 251.66, epsilon = 0.01);
        assert_eq!(statistics.peak_hour, 12);
        assert_abs_diff_eq!(statistics.total_production.0, 12.7, epsilon = 1e-9);
        assert_abs_diff_eq!(statistics.daily_average.0, 4.233, epsilon = 0.001);
        assert_eq!(statistics.active_hours().count(), 1);
    }

    #[test]
    fn test_aggregate_is_repeatable() {
        let days = [
            day(1, &[(7, 120.0), (12, 4000.0), (12, 4100.0)]),
            day(2, &[(12, 3900.0), (16, 900.0)]),
        ];
        assert_eq!(MultiDayStatistics::aggregate(&days), MultiDayStatistics::aggregate(&days));
    }
}

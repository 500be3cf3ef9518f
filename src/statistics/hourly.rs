use chrono::{NaiveDate, TimeDelta};

use crate::{
    prelude::*,
    quantity::{energy::KilowattHours, power::Watts},
    statistics::{
        HOURS_PER_DAY,
        moments::{mean, sample_std_dev},
    },
};

/// Running state of a single clock hour while the day is being folded.
///
/// Extremes start at the infinite sentinels, so that the first sample always wins.
/// The sentinels never leave this type: [`HourAccumulator::finalize`] replaces them.
#[must_use]
#[derive(Clone, Debug)]
pub struct HourAccumulator {
    hour: usize,
    n_samples: usize,
    sum: f64,
    min: f64,
    max: f64,
    values: Vec<f64>,
}

impl HourAccumulator {
    pub const fn new(hour: usize) -> Self {
        Self {
            hour,
            n_samples: 0,
            sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            values: Vec::new(),
        }
    }

    pub fn add(&mut self, power: f64) {
        self.n_samples += 1;
        self.sum += power;
        self.values.push(power);
        if power < self.min {
            self.min = power;
        }
        if power > self.max {
            self.max = power;
        }
    }

    pub fn finalize(self) -> HourStatistics {
        if self.n_samples == 0 {
            return HourStatistics::idle(self.hour);
        }
        #[expect(clippy::cast_precision_loss)]
        let mean = self.sum / self.n_samples as f64;
        HourStatistics {
            hour: self.hour,
            n_samples: self.n_samples,
            min: self.min,
            max: self.max,
            sum: self.sum,
            mean,
            std_dev: sample_std_dev(&self.values, mean),
            values: self.values,
        }
    }
}

/// Finalized statistics of one clock hour of one day.
///
/// Only [`HourAccumulator::finalize`] produces it, and it is read-only afterwards.
#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct HourStatistics {
    hour: usize,
    n_samples: usize,
    min: f64,
    max: f64,
    sum: f64,
    mean: f64,
    std_dev: f64,
    values: Vec<f64>,
}

impl HourStatistics {
    const fn idle(hour: usize) -> Self {
        Self {
            hour,
            n_samples: 0,
            min: 0.0,
            max: 0.0,
            sum: 0.0,
            mean: 0.0,
            std_dev: 0.0,
            values: Vec::new(),
        }
    }

    #[must_use]
    pub const fn hour(&self) -> usize {
        self.hour
    }

    #[must_use]
    pub const fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Lowest reading in watts.
    #[must_use]
    pub const fn min(&self) -> f64 {
        self.min
    }

    /// Highest reading in watts.
    #[must_use]
    pub const fn max(&self) -> f64 {
        self.max
    }

    #[must_use]
    pub const fn sum(&self) -> f64 {
        self.sum
    }

    /// Mean power in watts.
    #[must_use]
    pub const fn mean(&self) -> f64 {
        self.mean
    }

    /// Sample standard deviation in watts.
    #[must_use]
    pub const fn std_dev(&self) -> f64 {
        self.std_dev
    }

    /// Readings in the order they were added.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[must_use]
    pub const fn is_idle(&self) -> bool {
        self.n_samples == 0
    }

    pub const fn mean_power(&self) -> Watts {
        Watts(self.mean)
    }
}

/// All 24 hours of one day. Every slot is populated, idle hours are all-zero.
#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct DailyStatistics {
    pub date: NaiveDate,
    pub hours: [HourStatistics; HOURS_PER_DAY],
}

impl DailyStatistics {
    /// Fold one day worth of `(hour, watts)` readings into the hourly buckets.
    ///
    /// Readings outside of `0..24` are dropped. Returns [`None`] when nothing was accepted,
    /// so that an empty day is distinguishable from a day with idle hours.
    pub fn aggregate<I>(date: NaiveDate, readings: I) -> Option<Self>
    where
        I: IntoIterator<Item = (u32, f64)>,
    {
        let mut accumulators: [HourAccumulator; HOURS_PER_DAY] =
            std::array::from_fn(HourAccumulator::new);
        let mut n_accepted = 0_usize;
        for (hour, power) in readings {
            if let Some(accumulator) = accumulators.get_mut(hour as usize) {
                accumulator.add(power);
                n_accepted += 1;
            } else {
                debug!(%date, hour, power, "dropping the reading outside of the day");
            }
        }
        if n_accepted == 0 {
            return None;
        }
        Some(Self { date, hours: accumulators.map(HourAccumulator::finalize) })
    }

    /// Produced energy, assuming that each hourly mean holds for the entire hour.
    pub fn estimated_energy(&self) -> KilowattHours {
        self.hours.iter().map(|hour| hour.mean_power() * TimeDelta::hours(1)).sum()
    }

    /// Mean of the hourly means, over the hours that had readings.
    #[must_use]
    pub fn mean_active_power(&self) -> Watts {
        let means = self
            .hours
            .iter()
            .filter(|hour| !hour.is_idle())
            .map(|hour| hour.mean)
            .collect::<Vec<_>>();
        Watts(mean(&means))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, day).unwrap()
    }

    #[test]
    fn test_accumulator() {
        let mut accumulator = HourAccumulator::new(12);
        for value in [100.0, 200.0, 300.0, 400.0, 500.0] {
            accumulator.add(value);
        }
        let statistics = accumulator.finalize();
        assert_eq!(statistics.hour, 12);
        assert_eq!(statistics.n_samples, 5);
        assert_abs_diff_eq!(statistics.min, 100.0);
        assert_abs_diff_eq!(statistics.max, 500.0);
        assert_abs_diff_eq!(statistics.sum, 1500.0);
        assert_abs_diff_eq!(statistics.mean, 300.0);
        assert_abs_diff_eq!(statistics.std_dev, 158.114, epsilon = 0.001);
        assert_eq!(statistics.values, [100.0, 200.0, 300.0, 400.0, 500.0]);
    }

    #[test]
    fn test_idle_hour_is_normalized() {
        let statistics = HourAccumulator::new(0).finalize();
        assert!(statistics.is_idle());
        assert_abs_diff_eq!(statistics.min, 0.0);
        assert_abs_diff_eq!(statistics.max, 0.0);
        assert_abs_diff_eq!(statistics.mean, 0.0);
        assert_abs_diff_eq!(statistics.std_dev, 0.0);
    }

    #[test]
    fn test_single_sample_has_no_spread() {
        let mut accumulator = HourAccumulator::new(3);
        accumulator.add(42.0);
        let statistics = accumulator.finalize();
        assert_abs_diff_eq!(statistics.std_dev, 0.0);
        assert_abs_diff_eq!(statistics.min, 42.0);
        assert_abs_diff_eq!(statistics.max, 42.0);
    }

    #[test]
    fn test_negative_readings_are_kept() {
        let mut accumulator = HourAccumulator::new(3);
        accumulator.add(-5.0);
        accumulator.add(5.0);
        let statistics = accumulator.finalize();
        assert_abs_diff_eq!(statistics.min, -5.0);
        assert_abs_diff_eq!(statistics.mean, 0.0);
    }

    #[test]
    fn test_aggregate_partitions_by_hour() {
        let readings = [
            (6, 0.0),
            (6, 100.0),
            (6, 200.0),
            (6, 300.0),
            (7, 500.0),
            (7, 600.0),
            (12, 4500.0),
            (12, 4600.0),
        ];
        let statistics = DailyStatistics::aggregate(date(3), readings).unwrap();
        assert_eq!(statistics.date, date(3));

        let hour_6 = &statistics.hours[6];
        assert_eq!(hour_6.n_samples, 4);
        assert_abs_diff_eq!(hour_6.min, 0.0);
        assert_abs_diff_eq!(hour_6.max, 300.0);

        assert_eq!(statistics.hours[7].n_samples, 2);
        assert_eq!(statistics.hours[12].n_samples, 2);
        assert_eq!(statistics.hours[0].n_samples, 0);
        for (index, hour) in statistics.hours.iter().enumerate() {
            assert_eq!(hour.hour, index);
        }
    }

    #[test]
    fn test_aggregate_is_order_independent() {
        let forward = DailyStatistics::aggregate(date(3), [(6, 1.0), (6, 3.0), (7, 2.0)]);
        let backward = DailyStatistics::aggregate(date(3), [(7, 2.0), (6, 3.0), (6, 1.0)]);
        let (forward, backward) = (forward.unwrap(), backward.unwrap());
        assert_abs_diff_eq!(forward.hours[6].mean, backward.hours[6].mean);
        assert_abs_diff_eq!(forward.hours[6].min, backward.hours[6].min);
        assert_eq!(forward.hours[7].n_samples, backward.hours[7].n_samples);
    }

    #[test]
    fn test_aggregate_empty() {
        assert!(DailyStatistics::aggregate(date(3), std::iter::empty()).is_none());
    }

    #[test]
    fn test_aggregate_drops_out_of_range_hours() {
        assert!(DailyStatistics::aggregate(date(3), [(24, 100.0), (99, 1.0)]).is_none());

        let statistics = DailyStatistics::aggregate(date(3), [(24, 100.0), (23, 50.0)]).unwrap();
        assert_eq!(statistics.hours[23].n_samples, 1);
        assert_eq!(statistics.hours.iter().map(|hour| hour.n_samples).sum::<usize>(), 1);
    }

    #[test]
    fn test_estimated_energy() {
        let statistics = DailyStatistics::aggregate(date(3), [(12, 4000.0), (12, 5000.0)]).unwrap();
        assert_abs_diff_eq!(statistics.estimated_energy().0, 4.5);
    }

    #[test]
    fn test_mean_active_power_skips_idle_hours() {
        let statistics = DailyStatistics::aggregate(date(3), [(10, 1000.0), (11, 3000.0)]).unwrap();
        assert_abs_diff_eq!(statistics.mean_active_power().0, 2000.0);
    }
}

use chrono::TimeDelta;

use crate::{
    quantity::energy::KilowattHours,
    statistics::{HOURS_PER_DAY, hourly::DailyStatistics},
};

/// Typical energy per hour of the day, averaged over the days that had readings at that hour.
#[must_use]
pub struct HourlyProfile {
    pub n_days: usize,
    pub hourly_energy: [KilowattHours; HOURS_PER_DAY],
}

impl HourlyProfile {
    pub fn from_days(days: &[DailyStatistics]) -> Self {
        let mut sums = [KilowattHours::ZERO; HOURS_PER_DAY];
        let mut weights = [0_u32; HOURS_PER_DAY];
        for day in days {
            for statistics in day.hours.iter().filter(|statistics| !statistics.is_idle()) {
                sums[statistics.hour()] += statistics.mean_power() * TimeDelta::hours(1);
                weights[statistics.hour()] += 1;
            }
        }
        let hourly_energy = std::array::from_fn(|hour| {
            if weights[hour] == 0 {
                KilowattHours::ZERO
            } else {
                sums[hour] / f64::from(weights[hour])
            }
        });
        Self { n_days: days.len(), hourly_energy }
    }

    pub fn peak(&self) -> KilowattHours {
        self.hourly_energy.iter().copied().max().unwrap_or(KilowattHours::ZERO)
    }

    /// For a single day, this is the day's estimate; otherwise it is a «typical» day.
    pub fn total(&self) -> KilowattHours {
        self.hourly_energy.iter().copied().sum()
    }
}

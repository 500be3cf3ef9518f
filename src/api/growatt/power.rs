use std::{fmt::Display, str::FromStr};

use chrono::NaiveDate;

use crate::{api::growatt::lenient::strip_date, prelude::*, quantity::power::Watts};

/// Wall-clock time of a reading, as reported by the inverter.
///
/// The hour is intentionally not validated here: the statistics decide what to do with it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct TimeOfDay {
    pub hour: u32,
    pub minute: u32,
}

impl FromStr for TimeOfDay {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let mut parts = strip_date(text).split(':');
        let (Some(hour), Some(minute)) = (parts.next(), parts.next()) else {
            bail!("`{text}` is not a time of day");
        };
        Ok(Self {
            hour: hour.parse().with_context(|| format!("invalid hour in `{text}`"))?,
            minute: minute.parse().with_context(|| format!("invalid minute in `{text}`"))?,
        })
    }
}

impl Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PowerSample {
    pub time: TimeOfDay,
    pub power: Watts,
}

/// Intraday power readings of a single day, ordered by the time of day.
#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct DayPower {
    pub date: NaiveDate,
    pub samples: Vec<PowerSample>,
}

impl DayPower {
    /// Build the day from raw `(time, watts)` points, skipping those with unparsable time.
    pub fn from_points<I>(date: NaiveDate, points: I) -> Self
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        let mut samples = points
            .into_iter()
            .filter_map(|(time, power)| match time.parse::<TimeOfDay>() {
                Ok(time) => Some(PowerSample { time, power: Watts(power) }),
                Err(error) => {
                    debug!(%date, "skipping the reading: {error:#}");
                    None
                }
            })
            .collect::<Vec<_>>();
        samples.sort_by_key(|sample| sample.time);
        Self { date, samples }
    }

    /// `(hour, watts)` pairs for the hourly aggregation.
    pub fn readings(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.samples.iter().map(|sample| (sample.time.hour, sample.power.0))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::{api::growatt::lenient::PowerSeries, statistics::DailyStatistics};

    #[test]
    fn test_parse_time_of_day() {
        assert_eq!("12:05".parse::<TimeOfDay>().unwrap(), TimeOfDay { hour: 12, minute: 5 });
        assert_eq!(
            "2025-02-03 07:30".parse::<TimeOfDay>().unwrap(),
            TimeOfDay { hour: 7, minute: 30 },
        );
        assert_eq!("06:15:00".parse::<TimeOfDay>().unwrap(), TimeOfDay { hour: 6, minute: 15 });
        assert_eq!("25:00".parse::<TimeOfDay>().unwrap().hour, 25);
        assert!("noon".parse::<TimeOfDay>().is_err());
        assert!("ab:cd".parse::<TimeOfDay>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(TimeOfDay { hour: 7, minute: 5 }.to_string(), "07:05");
    }

    #[test]
    fn test_from_points() {
        let date = NaiveDate::from_ymd_opt(2025, 2, 3).unwrap();
        let day = DayPower::from_points(
            date,
            [
                ("12:10".to_owned(), 1500.0),
                ("garbage".to_owned(), 1.0),
                ("2025-02-03 06:00".to_owned(), 10.0),
            ],
        );
        assert_eq!(day.samples.len(), 2);
        assert_eq!(day.samples[0].time, TimeOfDay { hour: 6, minute: 0 });
        assert_eq!(day.readings().collect::<Vec<_>>(), [(6, 10.0), (12, 1500.0)]);
    }

    #[test]
    fn test_repeated_times_are_all_counted() {
        let date = NaiveDate::from_ymd_opt(2025, 2, 3).unwrap();
        let series: PowerSeries =
            serde_json::from_str(r#"[["12:05", 100], ["12:05", 300], ["06:00", 5]]"#).unwrap();
        let day = DayPower::from_points(date, series.0);
        assert_eq!(day.readings().collect::<Vec<_>>(), [(6, 5.0), (12, 100.0), (12, 300.0)]);

        let statistics = DailyStatistics::aggregate(date, day.readings()).unwrap();
        assert_eq!(statistics.hours[12].n_samples(), 2);
        assert_abs_diff_eq!(statistics.hours[12].mean(), 200.0);
        assert_abs_diff_eq!(statistics.hours[12].min(), 100.0);
        assert_abs_diff_eq!(statistics.hours[12].max(), 300.0);
    }
}

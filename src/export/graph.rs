use std::fmt::{Display, Formatter};

use crate::{
    quantity::energy::KilowattHours,
    statistics::{DailyStatistics, HOURS_PER_DAY, HourlyProfile},
};

const HEIGHT: usize = 15;
const BAR: &str = "##";
const BAR_WIDTH: usize = BAR.len();

/// ASCII bar chart of the typical energy per hour of the day.
pub struct PowerGraph<'a> {
    days: &'a [DailyStatistics],
    profile: HourlyProfile,
}

impl<'a> PowerGraph<'a> {
    pub fn new(days: &'a [DailyStatistics]) -> Self {
        Self { days, profile: HourlyProfile::from_days(days) }
    }
}

impl Display for PowerGraph<'_> {
    #[expect(clippy::cast_precision_loss)]
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let peak = self.profile.peak();
        if peak <= KilowattHours::ZERO {
            return writeln!(f, "No power data to graph.");
        }

        let total = self.profile.total();
        match self.days {
            [day] => writeln!(f, "Power Production - {} (Total: {total})", day.date)?,
            days => {
                writeln!(f, "Power Production - {} days averaged (Daily avg: {total})", days.len())?;
            }
        }
        writeln!(f)?;

        for row in (1..=HEIGHT).rev() {
            let threshold = peak * (row as f64 / HEIGHT as f64);
            if row == HEIGHT {
                write!(f, "{:5.2} |", peak.0)?;
            } else if row == HEIGHT / 2 + 1 {
                write!(f, "{:5.2} |", peak.0 / 2.0)?;
            } else if row == 1 {
                write!(f, "{:5.2} |", peak.0 / HEIGHT as f64)?;
            } else {
                write!(f, "      |")?;
            }
            for energy in self.profile.hourly_energy {
                let bar = if energy >= threshold { BAR } else { "  " };
                write!(f, "{bar}")?;
            }
            writeln!(f)?;
        }

        writeln!(f, "      +{}", "-".repeat(HOURS_PER_DAY * BAR_WIDTH))?;
        write!(f, "       ")?;
        for hour in (0..HOURS_PER_DAY).step_by(3) {
            write!(f, "{hour:<6}")?;
        }
        writeln!(f)?;
        writeln!(f, "       Hour of day")?;
        writeln!(f)?;
        writeln!(f, "kWh")
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, day).unwrap()
    }

    #[test]
    fn test_single_day() {
        let days = [DailyStatistics::aggregate(date(3), [(12, 3000.0), (13, 1500.0)]).unwrap()];
        let graph = PowerGraph::new(&days).to_string();
        let lines = graph.lines().collect::<Vec<_>>();

        assert_eq!(lines[0], "Power Production - 2025-02-03 (Total: 4.50 kWh)");
        assert_eq!(lines[1], "");

        // Top row: only the peak hour reaches it.
        assert_eq!(lines[2], format!(" 3.00 |{}##{}", " ".repeat(24), " ".repeat(22)));
        assert!(lines[2 + HEIGHT - HEIGHT / 2 - 1].starts_with(" 1.50 |"));
        // Bottom row: both hours.
        assert_eq!(lines[2 + HEIGHT - 1], format!(" 0.20 |{}####{}", " ".repeat(24), " ".repeat(20)));

        assert_eq!(lines[2 + HEIGHT], format!("      +{}", "-".repeat(48)));
        assert_eq!(lines[3 + HEIGHT], "       0     3     6     9     12    15    18    21    ");
        assert_eq!(lines[4 + HEIGHT], "       Hour of day");
        assert_eq!(lines.last(), Some(&"kWh"));
    }

    #[test]
    fn test_multiple_days() {
        let days = [
            DailyStatistics::aggregate(date(1), [(12, 4000.0)]).unwrap(),
            DailyStatistics::aggregate(date(2), [(12, 2000.0)]).unwrap(),
        ];
        let graph = PowerGraph::new(&days).to_string();
        assert!(graph.starts_with("Power Production - 2 days averaged (Daily avg: 3.00 kWh)\n"));
    }

    #[test]
    fn test_no_data() {
        let days = [DailyStatistics::aggregate(date(1), [(12, 0.0)]).unwrap()];
        assert_eq!(PowerGraph::new(&days).to_string(), "No power data to graph.\n");
        assert_eq!(PowerGraph::new(&[]).to_string(), "No power data to graph.\n");
    }
}

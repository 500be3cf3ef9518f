use std::fmt::{Display, Formatter};

use itertools::Itertools;

use crate::statistics::{DailyStatistics, MultiDayStatistics};

/// Multi-day statistics as a Markdown document.
pub struct Report<'a> {
    pub statistics: &'a MultiDayStatistics,

    /// Days the statistics were aggregated from, for the per-day breakdown.
    pub days: &'a [DailyStatistics],
}

impl Display for Report<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let statistics = self.statistics;

        writeln!(f, "# Power Production Statistics")?;
        writeln!(f)?;
        writeln!(f, "**Period:** {} to {}", statistics.start_date, statistics.end_date)?;
        writeln!(f, "**Days Analyzed:** {}", statistics.n_days)?;
        writeln!(f)?;

        writeln!(f, "## Summary")?;
        writeln!(f)?;
        writeln!(f, "| Metric | Value |")?;
        writeln!(f, "|--------|-------|")?;
        writeln!(f, "| Peak Hour (avg) | {:02}:00 |", statistics.peak_hour)?;
        writeln!(f, "| Peak Power (avg) | {} |", statistics.peak_power_average)?;
        writeln!(f, "| Daily Average Production | {} |", statistics.daily_average)?;
        writeln!(f, "| Total Production | {} |", statistics.total_production)?;
        writeln!(f)?;

        writeln!(f, "## Hourly Statistics (All Days Combined)")?;
        writeln!(f)?;
        writeln!(f, "| Hour | Min (W) | Max (W) | Average (W) | Median (W) | Std Dev | Days |")?;
        writeln!(f, "|------|---------|---------|-------------|------------|---------|------|")?;
        for hour in &statistics.by_hour {
            writeln!(
                f,
                "| {:02}:00 | {:.1} | {:.1} | {:.1} | {:.1} | {:.1} | {} |",
                hour.hour(),
                hour.min(),
                hour.max(),
                hour.average(),
                hour.median(),
                hour.std_dev(),
                hour.n_days(),
            )?;
        }
        writeln!(f)?;

        writeln!(f, "## Interpretation Guide")?;
        writeln!(f)?;
        writeln!(
            f,
            "- **Min/Max**: The lowest and highest instantaneous power readings at this hour across all days"
        )?;
        writeln!(f, "- **Average**: Mean power output at this hour across all analyzed days")?;
        writeln!(f, "- **Median**: Middle value of hourly averages (less affected by outliers)")?;
        writeln!(f, "- **Std Dev**: Standard deviation of hourly averages (variability indicator)")?;
        writeln!(f, "- **Days**: Number of days with data at this hour")?;
        writeln!(f)?;

        writeln!(f, "## Raw Hourly Averages by Day")?;
        writeln!(f)?;
        writeln!(
            f,
            "For detailed analysis, the following shows the average power per hour for each day:"
        )?;
        let active_hours = statistics.active_hours().map(|hour| hour.hour()).collect_vec();
        if active_hours.is_empty() {
            return Ok(());
        }
        writeln!(f)?;
        writeln!(
            f,
            "| Day | {} |",
            active_hours.iter().map(|hour| format!("{hour:02}:00")).join(" | ")
        )?;
        writeln!(f, "|-----|{}", "-------|".repeat(active_hours.len()))?;
        for day in self.days {
            let cells = active_hours
                .iter()
                .map(|hour| &day.hours[*hour])
                .map(|hour| {
                    if hour.is_idle() { "-".to_owned() } else { format!("{:.1}", hour.mean()) }
                })
                .join(" | ");
            writeln!(f, "| {} | {cells} |", day.date)?;
        }
        Ok(())
    }
}

use std::ops::RangeInclusive;

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};

use crate::prelude::*;

#[derive(Copy, Clone, ValueEnum)]
enum Shortcut {
    /// Current local date.
    Today,
}

/// Inclusive date range: `today`, a single `--date`, or `--from` and `--to`.
#[derive(Parser)]
pub struct PeriodArgs {
    #[clap(value_enum)]
    shortcut: Option<Shortcut>,

    /// Single date, `YYYY-MM-DD`.
    #[clap(long, conflicts_with_all = ["shortcut", "from", "to"])]
    date: Option<NaiveDate>,

    /// First date, `YYYY-MM-DD`.
    #[clap(long, requires = "to", conflicts_with = "shortcut")]
    from: Option<NaiveDate>,

    /// Last date (inclusive), `YYYY-MM-DD`.
    #[clap(long, requires = "from", conflicts_with = "shortcut")]
    to: Option<NaiveDate>,
}

impl PeriodArgs {
    pub fn dates(&self, today: NaiveDate) -> Result<RangeInclusive<NaiveDate>> {
        let (since, until) = match (self.shortcut, self.date, self.from, self.to) {
            (Some(Shortcut::Today), _, _, _) => (today, today),
            (None, Some(date), _, _) => (date, date),
            (None, None, Some(from), Some(to)) => (from, to),
            _ => bail!("must specify `today`, `--date`, or `--from` and `--to`"),
        };
        ensure!(until >= since, "end date cannot be before start date");
        Ok(since..=until)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Parser)]
    struct TestArgs {
        #[clap(flatten)]
        period: PeriodArgs,
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, day).unwrap()
    }

    fn parse(args: &[&str]) -> Result<PeriodArgs, clap::Error> {
        TestArgs::try_parse_from(std::iter::once("meerkat").chain(args.iter().copied()))
            .map(|args| args.period)
    }

    #[test]
    fn test_today() {
        assert_eq!(parse(&["today"]).unwrap().dates(date(3)).unwrap(), date(3)..=date(3));
    }

    #[test]
    fn test_single_date() {
        let period = parse(&["--date", "2025-02-01"]).unwrap();
        assert_eq!(period.dates(date(3)).unwrap(), date(1)..=date(1));
    }

    #[test]
    fn test_range() {
        let period = parse(&["--from", "2025-02-01", "--to", "2025-02-05"]).unwrap();
        assert_eq!(period.dates(date(9)).unwrap(), date(1)..=date(5));
    }

    #[test]
    fn test_reversed_range() {
        let period = parse(&["--from", "2025-02-05", "--to", "2025-02-01"]).unwrap();
        let error = period.dates(date(9)).unwrap_err();
        assert_eq!(error.to_string(), "end date cannot be before start date");
    }

    #[test]
    fn test_missing_period() {
        assert!(parse(&[]).unwrap().dates(date(3)).is_err());
    }

    #[test]
    fn test_incomplete_range() {
        assert!(parse(&["--from", "2025-02-05"]).is_err());
        assert!(
            parse(&["--date", "2025-02-05", "--from", "2025-02-01", "--to", "2025-02-02"]).is_err()
        );
        assert!(parse(&["--date", "yesterday"]).is_err());
    }
}

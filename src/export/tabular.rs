use std::io::Write;

use crate::{
    api::growatt::DayPower,
    prelude::*,
    statistics::{DailyStatistics, hourly_rows},
};

/// Five-minute readings as `date,time,power_watts`.
pub fn write_raw<W: Write>(writer: W, days: &[DayPower]) -> Result {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(["date", "time", "power_watts"])?;
    for day in days {
        for sample in &day.samples {
            writer.write_record([
                day.date.to_string(),
                sample.time.to_string(),
                format!("{:.2}", sample.power.0),
            ])?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Hourly buckets as `date,hour,min_watts,max_watts,avg_watts,samples`, 24 rows per day.
pub fn write_hourly<W: Write>(writer: W, days: &[DailyStatistics]) -> Result {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(["date", "hour", "min_watts", "max_watts", "avg_watts", "samples"])?;
    for row in hourly_rows(days) {
        // Night-time noise below zero is not worth reporting.
        let min = if row.min > 0.0 { format!("{:.2}", row.min) } else { "0".to_owned() };
        writer.write_record([
            row.date.to_string(),
            row.hour.to_string(),
            min,
            format!("{:.2}", row.max),
            format!("{:.2}", row.average),
            row.n_samples.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

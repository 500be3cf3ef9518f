use std::{fs, fs::File, path::PathBuf};

use chrono::Local;
use clap::Parser;
use itertools::Itertools;

use crate::{
    api::growatt::Api,
    cli::{DeviceArgs, Termination, period::PeriodArgs},
    export::{ExportPaths, PowerGraph, Report, write_hourly, write_raw},
    prelude::*,
    statistics::{DailyStatistics, MultiDayStatistics},
    tables::build_days_table,
};

#[derive(Parser)]
pub struct ExportArgs {
    #[clap(flatten)]
    period: PeriodArgs,

    #[clap(flatten)]
    device: DeviceArgs,

    /// Output directory.
    #[clap(long, default_value = ".")]
    output: PathBuf,

    /// Print the ASCII graph of the hourly production.
    #[clap(short, long)]
    graph: bool,
}

impl ExportArgs {
    #[instrument(skip_all)]
    pub async fn run(self, api: &Api) -> Result {
        let dates = self.period.dates(Local::now().date_naive())?;
        let (device_sn, timezone) = self.device.resolve(api).await?;
        let termination = Termination::register()?;

        fs::create_dir_all(&self.output).with_context(|| {
            format!("failed to create the output directory `{}`", self.output.display())
        })?;

        info!(%device_sn, since = %dates.start(), until = %dates.end(), "fetching the power data…");
        let days = api
            .get_inverter_history_range(&device_sn, dates.clone(), &timezone, termination.flag())
            .await
            .context("failed to fetch the power data")?;
        ensure!(!days.is_empty(), "no data returned");

        let paths = ExportPaths::new(&self.output, &dates);
        write_raw(create(&paths.raw)?, &days).context("failed to write the raw CSV")?;
        info!(path = %paths.raw.display(), "wrote the raw data");

        let statistics = days
            .iter()
            .filter_map(|day| DailyStatistics::aggregate(day.date, day.readings()))
            .collect_vec();
        write_hourly(create(&paths.hourly)?, &statistics)
            .context("failed to write the hourly CSV")?;
        info!(path = %paths.hourly.display(), n_days = statistics.len(), "wrote the hourly data");
        println!("{}", build_days_table(&statistics));

        if self.graph && !statistics.is_empty() {
            println!();
            print!("{}", PowerGraph::new(&statistics));
        }

        if let Some(path) = &paths.report
            && statistics.len() > 1
            && let Some(multi_day) = MultiDayStatistics::aggregate(&statistics)
        {
            let report = Report { statistics: &multi_day, days: &statistics };
            fs::write(path, report.to_string())
                .with_context(|| format!("failed to write `{}`", path.display()))?;
            info!(path = %path.display(), "wrote the statistics");
        }

        Ok(())
    }
}

fn create(path: &std::path::Path) -> Result<File> {
    File::create(path).with_context(|| format!("failed to create `{}`", path.display()))
}

use std::time::Duration;

use chrono::{Local, SecondsFormat};
use clap::Parser;
use serde::Serialize;
use tokio::time::{MissedTickBehavior, interval};

use crate::{
    api::growatt::{Api, Plant},
    cli::Termination,
    prelude::*,
    resolve::only_plant,
};

#[derive(Parser)]
pub struct PowerArgs {
    /// Plant ID, required when the account has more than one plant.
    #[clap(long, env = "GROWATT_PLANT_ID")]
    plant_id: Option<String>,

    /// Print JSON instead of the plain text.
    #[clap(short, long)]
    json: bool,

    /// Poll every N seconds until interrupted.
    #[clap(
        short,
        long,
        value_name = "SECONDS",
        num_args = 0..=1,
        default_missing_value = "60",
        value_parser = clap::value_parser!(u64).range(1..),
    )]
    continuous: Option<u64>,
}

impl PowerArgs {
    pub async fn run(self, api: &Api) -> Result {
        match self.continuous {
            None => self.print_once(api, false).await,
            Some(period) => self.run_continuously(api, Duration::from_secs(period)).await,
        }
    }

    #[instrument(skip_all, fields(period = ?period))]
    async fn run_continuously(&self, api: &Api, period: Duration) -> Result {
        let termination = Termination::register()?;
        let mut interval = interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = interval.tick() => {}
                () = termination.requested() => {
                    info!("stopping…");
                    break Ok(());
                }
            }
            if let Err(error) = self.print_once(api, true).await {
                error!("{error:#}");
            }
        }
    }

    async fn print_once(&self, api: &Api, with_timestamp: bool) -> Result {
        let plants = api.list_plants().await?;
        let plant = select_plant(&plants, self.plant_id.as_deref())?;
        let now = Local::now();
        if self.json {
            let output = PowerOutput {
                plant_id: &plant.id,
                plant_name: &plant.name,
                current_power_watts: plant.current_power.0,
                today_energy_kwh: plant.today_energy.0,
                total_energy_kwh: plant.total_energy.0,
                peak_power_kw: plant.peak_power,
                status: plant.status,
                timestamp: with_timestamp.then(|| now.to_rfc3339_opts(SecondsFormat::Secs, false)),
            };
            println!("{}", serde_json::to_string(&output)?);
        } else if with_timestamp {
            println!("{}  {:.0} W", now.format("%H:%M:%S"), plant.current_power.0);
        } else {
            println!("{:.0} W", plant.current_power.0);
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct PowerOutput<'a> {
    plant_id: &'a str,
    plant_name: &'a str,
    current_power_watts: f64,
    today_energy_kwh: f64,
    total_energy_kwh: f64,
    peak_power_kw: f64,
    status: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<String>,
}

/// Pick the requested plant, or the only one when nothing is requested.
fn select_plant<'a>(plants: &'a [Plant], plant_id: Option<&str>) -> Result<&'a Plant> {
    match plant_id.filter(|plant_id| !plant_id.is_empty()) {
        Some(plant_id) => plants
            .iter()
            .find(|plant| plant.id == plant_id)
            .with_context(|| format!("plant {plant_id} not found")),
        None => only_plant(plants),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn plants(ids: &[&str]) -> Vec<Plant> {
        ids.iter()
            .map(|id| {
                serde_json::from_value(json!({"plant_id": id, "current_power": "1234.5"})).unwrap()
            })
            .collect()
    }

    #[test]
    fn test_select_only_plant() {
        let plants = plants(&["1"]);
        assert_eq!(select_plant(&plants, None).unwrap().id, "1");
    }

    #[test]
    fn test_select_requested_plant() {
        let plants = plants(&["1", "2"]);
        assert_eq!(select_plant(&plants, Some("2")).unwrap().id, "2");
        assert_eq!(select_plant(&plants, Some("3")).unwrap_err().to_string(), "plant 3 not found");
    }

    #[test]
    fn test_select_ambiguous_plant() {
        let plants = plants(&["1", "2"]);
        assert!(select_plant(&plants, None).unwrap_err().to_string().starts_with("multiple plants"));
        assert!(select_plant(&[], None).is_err());
        assert!(select_plant(&[], Some("1")).is_err());
    }

    #[test]
    fn test_json_output() {
        let output = PowerOutput {
            plant_id: "1",
            plant_name: "Home",
            current_power_watts: 1234.5,
            today_energy_kwh: 12.7,
            total_energy_kwh: 1000.0,
            peak_power_kw: 7.6,
            status: 1,
            timestamp: None,
        };
        assert_eq!(
            serde_json::to_value(&output).unwrap(),
            json!({
                "plant_id": "1",
                "plant_name": "Home",
                "current_power_watts": 1234.5,
                "today_energy_kwh": 12.7,
                "total_energy_kwh": 1000.0,
                "peak_power_kw": 7.6,
                "status": 1,
            }),
        );
    }
}

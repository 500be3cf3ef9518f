use chrono::Local;
use clap::{Parser, Subcommand};
use itertools::Itertools;

use crate::{
    api::growatt::{Api, TimeUnit},
    cli::{DeviceArgs, PlantArgs, Termination, period::PeriodArgs},
    prelude::*,
    statistics::DailyStatistics,
    tables::{
        build_days_table,
        build_devices_table,
        build_energy_table,
        build_inverter_table,
        build_plant_data_table,
        build_plants_table,
    },
};

#[derive(Parser)]
pub struct BurrowArgs {
    #[command(subcommand)]
    command: BurrowCommand,
}

impl BurrowArgs {
    pub async fn run(self, api: &Api) -> Result {
        match self.command {
            BurrowCommand::Plants => {
                println!("{}", build_plants_table(&api.list_plants().await?));
            }
            BurrowCommand::Plant(args) => {
                let plant = api.get_plant_details(&args.resolve(api).await?).await?;
                println!("{}", build_plants_table(&[plant]));
            }
            BurrowCommand::PlantData(args) => {
                let data = api.get_plant_data(&args.resolve(api).await?).await?;
                println!("{}", build_plant_data_table(&data));
            }
            BurrowCommand::PlantPower(args) => args.run(api).await?,
            BurrowCommand::Energy(args) => args.run(api).await?,
            BurrowCommand::Devices(args) => {
                let devices = api.list_devices(&args.resolve(api).await?).await?;
                println!("{}", build_devices_table(&devices));
            }
            BurrowCommand::Inverter(args) => {
                let (device_sn, _) = args.resolve(api).await?;
                let data = api.get_inverter_details(&device_sn).await?;
                println!("{}", build_inverter_table(&data));
            }
        }
        Ok(())
    }
}

#[derive(Subcommand)]
enum BurrowCommand {
    /// List the account plants.
    Plants,

    /// Get the plant details.
    Plant(PlantArgs),

    /// Get the plant production overview.
    PlantData(PlantArgs),

    /// Fetch the plant-level power series and summarize it per day.
    PlantPower(BurrowPlantPowerArgs),

    /// Get the produced energy per day or month.
    Energy(BurrowEnergyArgs),

    /// List the plant devices.
    Devices(PlantArgs),

    /// Get the real-time MIN (TLX) inverter readings.
    Inverter(DeviceArgs),
}

#[derive(Parser)]
struct BurrowPlantPowerArgs {
    #[clap(flatten)]
    plant: PlantArgs,

    #[clap(flatten)]
    period: PeriodArgs,
}

impl BurrowPlantPowerArgs {
    #[instrument(skip_all)]
    async fn run(self, api: &Api) -> Result {
        let dates = self.period.dates(Local::now().date_naive())?;
        let plant_id = self.plant.resolve(api).await?;
        let termination = Termination::register()?;
        let statistics = api
            .get_plant_power_range(&plant_id, dates, termination.flag())
            .await?
            .iter()
            .filter_map(|day| DailyStatistics::aggregate(day.date, day.readings()))
            .collect_vec();
        println!("{}", build_days_table(&statistics));
        Ok(())
    }
}

#[derive(Parser)]
struct BurrowEnergyArgs {
    #[clap(flatten)]
    plant: PlantArgs,

    #[clap(flatten)]
    period: PeriodArgs,

    #[clap(long, value_enum, default_value = "day")]
    time_unit: TimeUnit,
}

impl BurrowEnergyArgs {
    #[instrument(skip_all)]
    async fn run(self, api: &Api) -> Result {
        let dates = self.period.dates(Local::now().date_naive())?;
        let plant_id = self.plant.resolve(api).await?;
        let points = api.get_plant_energy(&plant_id, dates, self.time_unit).await?;
        println!("{}", build_energy_table(&points));
        Ok(())
    }
}

mod burrow;
mod export;
mod period;
mod power;

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use clap::{Parser, Subcommand};
use reqwest::Url;
use signal_hook::consts::{SIGINT, SIGTERM};
use tokio::time::interval;

use self::{burrow::BurrowArgs, export::ExportArgs, power::PowerArgs};
use crate::{
    api::growatt::{Api, DEFAULT_TIMEZONE},
    prelude::*,
    resolve::{resolve_device_sn, resolve_plant_id},
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[clap(flatten)]
    api: ApiArgs,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub async fn run(self) -> Result {
        let api = self.api.connect()?;
        match self.command {
            Command::Export(args) => args.run(&api).await,
            Command::Power(args) => args.run(&api).await,
            Command::Burrow(args) => args.run(&api).await,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Export the inverter power history into CSV files and compute the statistics.
    Export(Box<ExportArgs>),

    /// Show the current plant power.
    Power(PowerArgs),

    /// Development tools.
    Burrow(BurrowArgs),
}

#[derive(Parser)]
struct ApiArgs {
    /// Growatt OpenAPI token.
    #[clap(long, env = "GROWATT_API_KEY", hide_env_values = true, global = true)]
    token: Option<String>,

    #[clap(long, env = "GROWATT_BASE_URL", global = true)]
    base_url: Option<Url>,

    #[clap(long, env = "GROWATT_TIMEOUT", default_value = "30s", global = true)]
    timeout: humantime::Duration,

    /// Minimum interval between consecutive API requests.
    #[clap(long, env = "GROWATT_RATE_LIMIT", default_value = "3s", global = true)]
    rate_limit: humantime::Duration,
}

impl ApiArgs {
    fn connect(self) -> Result<Api> {
        let token = self
            .token
            .filter(|token| !token.is_empty())
            .context("API token is not set: use `--token` or set `GROWATT_API_KEY`")?;
        Api::builder()
            .token(&token)
            .maybe_base_url(self.base_url)
            .timeout(self.timeout.into())
            .rate_limit(self.rate_limit.into())
            .build()
    }
}

#[derive(Parser)]
struct PlantArgs {
    /// Plant ID, auto-detected when the account has only one plant.
    #[clap(long, env = "GROWATT_PLANT_ID")]
    plant_id: Option<String>,
}

impl PlantArgs {
    async fn resolve(self, api: &Api) -> Result<String> {
        resolve_plant_id(api, self.plant_id).await
    }
}

#[derive(Parser)]
struct DeviceArgs {
    #[clap(flatten)]
    plant: PlantArgs,

    /// MIN (TLX) inverter serial number, auto-detected when the plant has only one device.
    #[clap(long, env = "GROWATT_DEVICE_SN")]
    device_sn: Option<String>,

    /// Timezone of the inverter history.
    #[clap(long, env = "GROWATT_TIMEZONE", default_value = DEFAULT_TIMEZONE)]
    timezone: String,
}

impl DeviceArgs {
    async fn resolve(self, api: &Api) -> Result<(String, String)> {
        let device_sn = resolve_device_sn(api, self.device_sn, self.plant.plant_id).await?;
        Ok((device_sn, self.timezone))
    }
}

/// Raised on `SIGINT` or `SIGTERM`. The second signal terminates the process right away.
#[derive(Clone)]
struct Termination(Arc<AtomicBool>);

impl Termination {
    const POLL_INTERVAL: Duration = Duration::from_millis(100);

    fn register() -> Result<Self> {
        let flag = Arc::new(AtomicBool::new(false));
        for signal in [SIGINT, SIGTERM] {
            signal_hook::flag::register_conditional_shutdown(signal, 1, Arc::clone(&flag))?;
            signal_hook::flag::register(signal, Arc::clone(&flag))?;
        }
        Ok(Self(flag))
    }

    fn flag(&self) -> &AtomicBool {
        &self.0
    }

    fn is_requested(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Resolves once the termination is requested.
    async fn requested(&self) {
        let mut interval = interval(Self::POLL_INTERVAL);
        while !self.is_requested() {
            interval.tick().await;
        }
    }
}
